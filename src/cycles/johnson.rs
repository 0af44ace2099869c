//! Johnson's algorithm: enumerate all elementary (simple) directed cycles
//! of `DG` (spec §4.4). No weight filter; the caller adds a constraint for
//! every returned cycle. Adjacency lists are sorted ascending (via
//! [`DisjActionLandmarkGraph::adjacency_keys_only`]) so output order is
//! deterministic.

use crate::dalm::DisjActionLandmarkGraph;
use crate::ids::DalmNodeId;
use std::collections::{HashMap, HashSet};

struct Johnson<'a> {
    adj: &'a [Vec<usize>],
    blocked: HashSet<usize>,
    blocked_map: HashMap<usize, HashSet<usize>>,
    stack: Vec<usize>,
    cycles: Vec<Vec<usize>>,
}

impl<'a> Johnson<'a> {
    fn unblock(&mut self, v: usize) {
        self.blocked.remove(&v);
        if let Some(dependents) = self.blocked_map.remove(&v) {
            for w in dependents {
                if self.blocked.contains(&w) {
                    self.unblock(w);
                }
            }
        }
    }

    fn circuit(&mut self, v: usize, start: usize, scc: &HashSet<usize>) -> bool {
        let mut found = false;
        self.stack.push(v);
        self.blocked.insert(v);

        let neighbors: Vec<usize> = self.adj[v].iter().copied().filter(|w| scc.contains(w)).collect();
        for w in neighbors {
            if w == start {
                self.cycles.push(self.stack.clone());
                found = true;
            } else if !self.blocked.contains(&w) && self.circuit(w, start, scc) {
                found = true;
            }
        }

        if found {
            self.unblock(v);
        } else {
            let neighbors: Vec<usize> = self.adj[v].iter().copied().filter(|w| scc.contains(w)).collect();
            for w in neighbors {
                self.blocked_map.entry(w).or_default().insert(v);
            }
        }
        self.stack.pop();
        found
    }
}

/// The strongly connected component of `s` within the subgraph induced by
/// vertices `>= s`, computed with a plain iterative Tarjan pass.
fn least_scc(adj: &[Vec<usize>], s: usize) -> HashSet<usize> {
    let n = adj.len();
    let mut index = vec![None; n];
    let mut lowlink = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut stack = Vec::new();
    let mut sccs: Vec<Vec<usize>> = Vec::new();

    struct Frame {
        v: usize,
        child_idx: usize,
    }
    let mut call_stack: Vec<Frame> = vec![Frame { v: s, child_idx: 0 }];
    index[s] = Some(0);
    lowlink[s] = 0;
    let mut next_index = 1usize;
    stack.push(s);
    on_stack[s] = true;

    while let Some(frame) = call_stack.last_mut() {
        let v = frame.v;
        let neighbors = &adj[v];
        if frame.child_idx < neighbors.len() {
            let w = neighbors[frame.child_idx];
            frame.child_idx += 1;
            if w < s {
                continue;
            }
            if index[w].is_none() {
                index[w] = Some(next_index);
                lowlink[w] = next_index;
                next_index += 1;
                stack.push(w);
                on_stack[w] = true;
                call_stack.push(Frame { v: w, child_idx: 0 });
            } else if on_stack[w] {
                lowlink[v] = lowlink[v].min(index[w].unwrap());
            }
        } else {
            call_stack.pop();
            if let Some(parent) = call_stack.last_mut() {
                lowlink[parent.v] = lowlink[parent.v].min(lowlink[v]);
            }
            if lowlink[v] == index[v].unwrap() {
                let mut component = Vec::new();
                loop {
                    let w = stack.pop().expect("SCC stack must contain the root");
                    on_stack[w] = false;
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                sccs.push(component);
            }
        }
    }

    sccs.into_iter()
        .find(|c| c.contains(&s))
        .map(|c| c.into_iter().collect())
        .unwrap_or_default()
}

/// Enumerates all elementary directed cycles of `DG`.
pub fn enumerate_cycles(dg: &DisjActionLandmarkGraph, ignore_weak: bool) -> Vec<Vec<DalmNodeId>> {
    let adj = dg.adjacency_keys_only(ignore_weak);
    let n = adj.len();
    let mut all_cycles: Vec<Vec<usize>> = Vec::new();

    for s in 0..n {
        let scc = least_scc(&adj, s);
        if scc.len() < 2 && !adj[s].contains(&s) {
            continue;
        }
        let mut johnson = Johnson {
            adj: &adj,
            blocked: HashSet::new(),
            blocked_map: HashMap::new(),
            stack: Vec::new(),
            cycles: Vec::new(),
        };
        johnson.circuit(s, s, &scc);
        all_cycles.extend(johnson.cycles);
    }

    all_cycles
        .into_iter()
        .map(|cycle| cycle.into_iter().map(DalmNodeId::from).collect())
        .collect()
}
