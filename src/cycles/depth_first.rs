use super::oracle::CycleOracle;
use crate::dalm::DisjActionLandmarkGraph;
use crate::ids::DalmNodeId;

/// Depth-first search for a single violated cycle, pruning any branch
/// whose accumulated weight already reaches 1 (spec §4.3).
#[derive(Debug, Default)]
pub struct DepthFirstOracle;

impl CycleOracle for DepthFirstOracle {
    fn find_cycle(&self, dg: &DisjActionLandmarkGraph, weights: &[f64], ignore_weak: bool) -> Vec<DalmNodeId> {
        let adj = dg.adjacency_keys_only(ignore_weak);
        let n = adj.len();
        for start in 0..n {
            let mut visited = vec![false; n];
            visited[start] = true;
            let mut stack = vec![start];
            if search(start, start, &adj, weights, weights[start], &mut visited, &mut stack) {
                return stack.into_iter().map(DalmNodeId::from).collect();
            }
        }
        Vec::new()
    }
}

fn search(
    start: usize,
    cur: usize,
    adj: &[Vec<usize>],
    weights: &[f64],
    acc_weight: f64,
    visited: &mut [bool],
    stack: &mut Vec<usize>,
) -> bool {
    for &next in &adj[cur] {
        if next == start {
            if acc_weight < 1.0 {
                return true;
            }
            continue;
        }
        if visited[next] {
            continue;
        }
        let next_weight = acc_weight + weights[next];
        if next_weight >= 1.0 {
            continue;
        }
        visited[next] = true;
        stack.push(next);
        if search(start, next, adj, weights, next_weight, visited, stack) {
            return true;
        }
        stack.pop();
        visited[next] = false;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact_graph::{FactLandmarkGraph, State};
    use crate::ids::OperatorId;
    use crate::ordering::EdgeKind;

    fn three_cycle() -> DisjActionLandmarkGraph {
        let mut g = FactLandmarkGraph::new();
        let a = g.add_landmark(vec![0], vec![OperatorId::from(0usize)], vec![], false);
        let b = g.add_landmark(vec![1], vec![OperatorId::from(1usize)], vec![], false);
        let c = g.add_landmark(vec![2], vec![OperatorId::from(2usize)], vec![], false);
        g.add_edge(a, b, EdgeKind::Reasonable);
        g.add_edge(b, c, EdgeKind::Reasonable);
        g.add_edge(c, a, EdgeKind::Reasonable);
        let s = State::with_capacity(3);
        crate::dalm::build_eager(&g, &s)
    }

    #[test]
    fn finds_violated_three_cycle() {
        let dg = three_cycle();
        let oracle = DepthFirstOracle;
        let weights = vec![0.2, 0.2, 0.2];
        let cycle = oracle.find_cycle(&dg, &weights, false);
        assert_eq!(cycle.len(), 3);
    }

    #[test]
    fn prunes_branch_once_weight_reaches_one() {
        let dg = three_cycle();
        let oracle = DepthFirstOracle;
        let weights = vec![0.5, 0.6, 0.1];
        assert!(oracle.find_cycle(&dg, &weights, false).is_empty());
    }
}
