use super::oracle::CycleOracle;
use crate::dalm::DisjActionLandmarkGraph;
use crate::ids::DalmNodeId;

/// All-pairs minimum cycle weight via Floyd-Warshall, with successor
/// pointers kept for path reconstruction (spec §4.3).
#[derive(Debug, Default)]
pub struct FloydWarshallOracle;

impl CycleOracle for FloydWarshallOracle {
    fn find_cycle(&self, dg: &DisjActionLandmarkGraph, weights: &[f64], ignore_weak: bool) -> Vec<DalmNodeId> {
        let n = dg.num_landmarks();
        if n == 0 {
            return Vec::new();
        }
        let inf = f64::INFINITY;
        let adj = dg.adjacency(ignore_weak);
        let mut d = vec![vec![inf; n]; n];
        let mut next: Vec<Vec<Option<usize>>> = vec![vec![None; n]; n];

        for i in 0..n {
            for j in 0..n {
                if adj[i][j] {
                    d[i][j] = weights[j];
                    next[i][j] = Some(j);
                }
            }
        }

        for k in 0..n {
            for i in 0..n {
                if d[i][k].is_infinite() {
                    continue;
                }
                for j in 0..n {
                    if d[k][j].is_infinite() {
                        continue;
                    }
                    let candidate = d[i][k] + d[k][j] - weights[k];
                    if candidate < d[i][j] {
                        d[i][j] = candidate;
                        next[i][j] = next[i][k];
                    }
                }
            }
        }

        for i in 0..n {
            if d[i][i] < 1.0 {
                let mut path = vec![i];
                let mut cur = next[i][i].expect("d[i][i] finite implies a successor exists");
                while cur != i {
                    path.push(cur);
                    cur = next[cur][i].expect("cycle reconstruction must return to its origin");
                }
                return path.into_iter().map(DalmNodeId::from).collect();
            }
        }
        Vec::new()
    }
}
