use super::{all_true, LandmarkStatus, PerStateBitset, StatusManager};
use crate::fact_graph::{FactLandmarkGraph, State};
use crate::ids::StateId;
use tracing::trace;

/// The LAMA-style single-path status manager (spec §4.2.1): keeps a single
/// `past` bitset per state, computed as an intersection across the parent
/// it was most recently reached from, plus a "leaf" catch-up pass.
pub struct LamaStatusManager {
    past: PerStateBitset,
    status: Vec<LandmarkStatus>,
}

impl LamaStatusManager {
    pub fn new(fg: &FactLandmarkGraph) -> Self {
        let n = fg.num_landmarks();
        LamaStatusManager {
            past: PerStateBitset::new(n),
            status: vec![LandmarkStatus::Future; n],
        }
    }
}

impl StatusManager for LamaStatusManager {
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
            if status[usize::from(l)] != LandmarkStatus::Past {
                continue;
            }
            let needed_again = !fg.is_true_in_state(l, state)
                && (fg.node(l).is_true_in_goal
                    || fg.node(l).children.iter().any(|&(v, k)| {
                        k.is_greedy_necessary_or_stronger() && status[usize::from(v)] == LandmarkStatus::Future
                    }));
            if needed_again {
                status[usize::from(l)] = LandmarkStatus::PastAndFuture;
            }
        }
        trace!(
            past = status.iter().filter(|s| **s == LandmarkStatus::Past).count(),
            needed_again = status.iter().filter(|s| **s == LandmarkStatus::PastAndFuture).count(),
            "lama status propagated"
        );
        self.status = status;
    }

    fn status(&self, id: crate::ids::LandmarkId) -> LandmarkStatus {
        self.status[usize::from(id)]
    }
}
