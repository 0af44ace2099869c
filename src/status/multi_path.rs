use super::{all_true, LandmarkStatus, PerStateBitset, StatusManager};
use crate::fact_graph::{FactLandmarkGraph, State};
use crate::ids::{LandmarkId, StateId};
use crate::options::HeuristicOptions;
use crate::ordering::EdgeKind;
use tracing::trace;

/// The multi-path status manager (spec §4.2.2): same `past`-bitset core as
/// [`super::LamaStatusManager`], with extra toggleable "needed again"
/// propagation passes run during `update_status`.
pub struct MultiPathStatusManager {
    past: PerStateBitset,
    status: Vec<LandmarkStatus>,
    add_goal_atoms: bool,
    add_gn_parents: bool,
    add_reasonable_children: bool,
}

impl MultiPathStatusManager {
    pub fn new(fg: &FactLandmarkGraph, opts: &HeuristicOptions) -> Self {
        let n = fg.num_landmarks();
        MultiPathStatusManager {
            past: PerStateBitset::new(n),
            status: vec![LandmarkStatus::Future; n],
            add_goal_atoms: opts.add_goal_atoms,
            add_gn_parents: opts.add_gn_parents,
            add_reasonable_children: opts.add_reasonable_children,
        }
    }
}

impl StatusManager for MultiPathStatusManager {
    fn set_landmarks_for_initial_state(&mut self, fg: &FactLandmarkGraph, initial: &State, id: StateId) {
        let n = fg.num_landmarks();
        let mut bits = all_true(n);
        for l in fg.ids() {
            if !fg.is_true_in_state(l, initial) || !fg.node(l).parents.is_empty() {
                bits.set(usize::from(l), false);
            }
        }
        self.past.set_for(id, bits);
    }

    fn update_accepted_landmarks(
        &mut self,
        fg: &FactLandmarkGraph,
        parent_id: StateId,
        _parent: &State,
        child_id: StateId,
        child: &State,
    ) -> bool {
        if child_id == parent_id {
            return false;
        }
        let parent_bits = self
            .past
            .get(parent_id)
            .cloned()
            .expect("parent state must have been visited before its child");
        let bits = self.past.get_or_all_true(child_id);
        bits.intersect_with(&parent_bits);

        for l in fg.ids() {
            if !bits.contains(usize::from(l))
                && fg.is_true_in_state(l, child)
                && fg
                    .node(l)
                    .parents
                    .iter()
                    .all(|&(q, _)| bits.contains(usize::from(q)))
            {
                bits.set(usize::from(l), true);
            }
        }
        true
    }

    fn update_status(&mut self, fg: &FactLandmarkGraph, state_id: StateId, state: &State) {
        let bits = self
            .past
            .get(state_id)
            .cloned()
            .expect("update_status called before set_landmarks_for_initial_state/update_accepted_landmarks");
        let mut status: Vec<LandmarkStatus> = fg
            .ids()
            .map(|l| {
                if bits.contains(usize::from(l)) {
                    LandmarkStatus::Past
                } else {
                    LandmarkStatus::Future
                }
            })
            .collect();

        for l in fg.ids() {
            if status[usize::from(l)] != LandmarkStatus::Past || fg.is_true_in_state(l, state) {
                continue;
            }
            let needed_by_child = fg.node(l).children.iter().any(|&(v, k)| {
                k.is_greedy_necessary_or_stronger() && status[usize::from(v)] == LandmarkStatus::Future
            });
            let needed_as_goal = self.add_goal_atoms && fg.node(l).is_true_in_goal;
            if needed_by_child || needed_as_goal {
                status[usize::from(l)] = LandmarkStatus::PastAndFuture;
            }
        }

        if self.add_gn_parents {
            let future: Vec<LandmarkId> = fg
                .ids()
                .filter(|&l| status[usize::from(l)] == LandmarkStatus::Future)
                .collect();
            for l in future {
                for &(p, k) in &fg.node(l).parents {
                    if k.is_greedy_necessary_or_stronger()
                        && status[usize::from(p)] == LandmarkStatus::Past
                        && !fg.is_true_in_state(p, state)
                    {
                        status[usize::from(p)] = LandmarkStatus::PastAndFuture;
                    }
                }
            }
        }

        if self.add_reasonable_children {
            let future: Vec<LandmarkId> = fg
                .ids()
                .filter(|&l| status[usize::from(l)] == LandmarkStatus::Future)
                .collect();
            for l in future {
                for &(c, k) in &fg.node(l).children {
                    if k == EdgeKind::Reasonable && status[usize::from(c)] == LandmarkStatus::Past {
                        status[usize::from(c)] = LandmarkStatus::PastAndFuture;
                    }
                }
            }
        }

        trace!(
            past = status.iter().filter(|s| **s == LandmarkStatus::Past).count(),
            needed_again = status.iter().filter(|s| **s == LandmarkStatus::PastAndFuture).count(),
            "multi-path status propagated"
        );
        self.status = status;
    }

    fn status(&self, id: LandmarkId) -> LandmarkStatus {
        self.status[usize::from(id)]
    }
}
