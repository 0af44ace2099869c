//! The disjunctive action landmark graph `DG` (spec §3, §4.1): built from a
//! fact-landmark graph plus a state (and optionally a status manager),
//! collapsing fact landmarks with identical possible-achiever sets into a
//! single node.

use crate::fact_graph::{FactLandmarkGraph, State};
use crate::ids::{DalmNodeId, LandmarkId, OperatorId, RefStore};
use crate::ordering::{EdgeKind, OrderingKind};
use crate::status::{AnyStatusManager, LandmarkStatus, StatusManager};
use std::collections::HashMap;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct DalmNode {
    /// Canonicalised (sorted, deduplicated) possible achievers.
    pub achievers: Vec<OperatorId>,
}

/// The disjunctive action landmark graph itself.
#[derive(Debug, Clone, Default)]
pub struct DisjActionLandmarkGraph {
    nodes: RefStore<DalmNodeId, DalmNode>,
    children: Vec<Vec<(DalmNodeId, OrderingKind)>>,
    parents: Vec<Vec<(DalmNodeId, OrderingKind)>>,
    num_orderings: usize,
    num_weak_orderings: usize,
    fact_to_dalm: HashMap<LandmarkId, DalmNodeId>,
}

impl DisjActionLandmarkGraph {
    fn new() -> Self {
        Self::default()
    }

    fn add_node(&mut self, achievers: Vec<OperatorId>, by_achievers: &mut HashMap<Vec<OperatorId>, DalmNodeId>) -> DalmNodeId {
        let mut key = achievers;
        key.sort_unstable();
        key.dedup();
        if let Some(&id) = by_achievers.get(&key) {
            return id;
        }
        let id = self.nodes.push(DalmNode { achievers: key.clone() });
        self.children.push(Vec::new());
        self.parents.push(Vec::new());
        by_achievers.insert(key, id);
        id
    }

    /// Adds (or upgrades) an edge `u -> v`. A weak edge is never downgraded
    /// from an existing strong one; re-adding an existing edge of the same
    /// or weaker kind is a no-op.
    fn add_edge(&mut self, u: DalmNodeId, v: DalmNodeId, kind: OrderingKind) {
        if u == v {
            return;
        }
        let existing = self.children[usize::from(u)]
            .iter_mut()
            .find(|(t, _)| *t == v);
        match existing {
            Some((_, existing_kind)) if *existing_kind == OrderingKind::Weak && kind == OrderingKind::Strong => {
                *existing_kind = OrderingKind::Strong;
                self.num_weak_orderings -= 1;
                if let Some((_, pk)) = self.parents[usize::from(v)].iter_mut().find(|(s, _)| *s == u) {
                    *pk = OrderingKind::Strong;
                }
            }
            Some(_) => {}
            None => {
                self.children[usize::from(u)].push((v, kind));
                self.parents[usize::from(v)].push((u, kind));
                self.num_orderings += 1;
                if kind == OrderingKind::Weak {
                    self.num_weak_orderings += 1;
                }
            }
        }
    }

    pub fn num_landmarks(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_orderings(&self) -> usize {
        self.num_orderings
    }

    pub fn num_weak_orderings(&self) -> usize {
        self.num_weak_orderings
    }

    pub fn num_strong_orderings(&self) -> usize {
        self.num_orderings - self.num_weak_orderings
    }

    pub fn actions(&self, id: DalmNodeId) -> &[OperatorId] {
        &self.nodes[id].achievers
    }

    pub fn dependencies(&self, id: DalmNodeId) -> &[(DalmNodeId, OrderingKind)] {
        &self.children[usize::from(id)]
    }

    pub fn parents(&self, id: DalmNodeId) -> &[(DalmNodeId, OrderingKind)] {
        &self.parents[usize::from(id)]
    }

    pub fn ids(&self) -> impl Iterator<Item = DalmNodeId> + '_ {
        self.nodes.keys()
    }

    /// `None` if the two nodes have no ordering; `Some(kind)` otherwise.
    pub fn ordering_type(&self, u: DalmNodeId, v: DalmNodeId) -> Option<OrderingKind> {
        self.children[usize::from(u)]
            .iter()
            .find(|(t, _)| *t == v)
            .map(|(_, k)| *k)
    }

    /// The `|DG| x |DG|` "is-weak" adjacency matrix used by the cycle
    /// oracles and Johnson's algorithm.
    pub fn adjacency(&self, ignore_weak: bool) -> Vec<Vec<bool>> {
        let n = self.num_landmarks();
        let mut m = vec![vec![false; n]; n];
        for u in self.ids() {
            for &(v, kind) in &self.children[usize::from(u)] {
                if ignore_weak && kind == OrderingKind::Weak {
                    continue;
                }
                m[usize::from(u)][usize::from(v)] = true;
            }
        }
        m
    }

    /// Integer adjacency lists, sorted ascending, for Johnson's algorithm.
    pub fn adjacency_keys_only(&self, ignore_weak: bool) -> Vec<Vec<usize>> {
        let n = self.num_landmarks();
        let mut out = vec![Vec::new(); n];
        for u in self.ids() {
            let mut vs: Vec<usize> = self.children[usize::from(u)]
                .iter()
                .filter(|(_, kind)| !ignore_weak || *kind == OrderingKind::Strong)
                .map(|(v, _)| usize::from(*v))
                .collect();
            vs.sort_unstable();
            out[usize::from(u)] = vs;
        }
        out
    }

    pub fn fact_landmark_of(&self, fact_id: LandmarkId) -> Option<DalmNodeId> {
        self.fact_to_dalm.get(&fact_id).copied()
    }
}

fn classify_edge(kind: EdgeKind, shares_action: bool) -> Option<OrderingKind> {
    if kind.is_strong() {
        Some(OrderingKind::Strong)
    } else if kind == EdgeKind::Reasonable && !shares_action {
        Some(OrderingKind::Weak)
    } else {
        None
    }
}

/// Builds `DG` from `fg` at `s`, without a status manager: the eager,
/// initial-build mode (spec §4.1).
pub fn build_eager(fg: &FactLandmarkGraph, s: &State) -> DisjActionLandmarkGraph {
    build(fg, s, None)
}

/// Builds `DG` from `fg` at `s` using the status manager to decide which
/// landmarks are still relevant (`status != PAST`).
pub fn build_with_status(fg: &FactLandmarkGraph, s: &State, status: &AnyStatusManager) -> DisjActionLandmarkGraph {
    build(fg, s, Some(status))
}

fn build(fg: &FactLandmarkGraph, s: &State, status: Option<&AnyStatusManager>) -> DisjActionLandmarkGraph {
    let mut dg = DisjActionLandmarkGraph::new();
    let mut by_achievers: HashMap<Vec<OperatorId>, DalmNodeId> = HashMap::new();

    let included: Vec<LandmarkId> = fg
        .ids()
        .filter(|&l| match status {
            None => !(fg.is_true_in_state(l, s) && fg.node(l).parents.is_empty()),
            Some(mgr) => mgr.status(l) != LandmarkStatus::Past,
        })
        .collect();

    for &u in &included {
        let id = dg.add_node(fg.node(u).possible_achievers.clone(), &mut by_achievers);
        dg.fact_to_dalm.insert(u, id);
    }

    for &u in &included {
        let u_status = status.map(|m| m.status(u));
        let u_dalm = dg.fact_to_dalm[&u];
        for &(v, kind) in &fg.node(u).children {
            if !dg.fact_to_dalm.contains_key(&v) {
                continue;
            }
            let eligible = match (status, u_status) {
                (None, _) => !fg.is_true_in_state(u, s),
                (Some(mgr), Some(LandmarkStatus::PastAndFuture)) => {
                    kind.is_greedy_necessary_or_stronger()
                        && !fg.is_true_in_state(u, s)
                        && mgr.status(v) == LandmarkStatus::Future
                }
                (Some(mgr), _) => mgr.status(v) != LandmarkStatus::Past,
            };
            if !eligible {
                continue;
            }
            let v_dalm = dg.fact_to_dalm[&v];
            let shares_action = fg.node(u).possible_achievers.iter().any(|a| fg.node(v).possible_achievers.contains(a));
            if let Some(ordering) = classify_edge(kind, shares_action) {
                dg.add_edge(u_dalm, v_dalm, ordering);
            }
        }
    }

    trace!(
        nodes = dg.num_landmarks(),
        orderings = dg.num_orderings(),
        weak = dg.num_weak_orderings(),
        "built disjunctive action landmark graph"
    );
    dg
}
