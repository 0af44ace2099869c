use super::{all_true, LandmarkStatus, PerStateBitset, StatusManager};
use crate::fact_graph::{FactLandmarkGraph, State};
use crate::ids::{LandmarkId, StateId};
use crate::options::HeuristicOptions;
use crate::ordering::EdgeKind;
use fixedbitset::FixedBitSet;
use tracing::trace;

/// The consistent multi-path status manager (spec §4.2.3): tracks two
/// per-state bitsets, `accepted` and `required`, maintaining the invariant
/// `accepted[l] ∨ required[l]` for every landmark `l` at every reachable
/// state — a stronger guarantee than the single-path manager's "`past` is a
/// lower bound over all paths".
pub struct ConsistentStatusManager {
    accepted: PerStateBitset,
    required: PerStateBitset,
    status: Vec<LandmarkStatus>,
    add_goal_atoms: bool,
    add_gn_parents: bool,
    add_reasonable_children: bool,
}

impl ConsistentStatusManager {
    pub fn new(fg: &FactLandmarkGraph, opts: &HeuristicOptions) -> Self {
        let n = fg.num_landmarks();
        ConsistentStatusManager {
            accepted: PerStateBitset::new(n),
            required: PerStateBitset::new(n),
            status: vec![LandmarkStatus::Future; n],
            add_goal_atoms: opts.add_goal_atoms,
            add_gn_parents: opts.add_gn_parents,
            add_reasonable_children: opts.add_reasonable_children,
        }
    }

    /// Marks as `required` the "needed again" relatives of already-accepted
    /// landmarks, via the two optional relative passes from §4.2.2
    /// expressed over the two-bitset representation — the same toggles
    /// `mark_required_again_relatives` gates on in
    /// `status_manager_multi_path_consistent.cc`, and nothing else.
    fn propagate_required_again(&self, fg: &FactLandmarkGraph, state: &State, acc: &FixedBitSet, req: &mut FixedBitSet) {
        if self.add_gn_parents {
            let not_accepted: Vec<LandmarkId> = fg.ids().filter(|&l| !acc.contains(usize::from(l))).collect();
            for l in not_accepted {
                for &(p, k) in &fg.node(l).parents {
                    let pi = usize::from(p);
                    if k.is_greedy_necessary_or_stronger() && acc.contains(pi) && !fg.is_true_in_state(p, state) {
                        req.set(pi, true);
                    }
                }
            }
        }

        if self.add_reasonable_children {
            let not_accepted: Vec<LandmarkId> = fg.ids().filter(|&l| !acc.contains(usize::from(l))).collect();
            for l in not_accepted {
                for &(c, k) in &fg.node(l).children {
                    let ci = usize::from(c);
                    if k == EdgeKind::Reasonable && acc.contains(ci) {
                        req.set(ci, true);
                    }
                }
            }
        }
    }
}

impl StatusManager for ConsistentStatusManager {
    fn set_landmarks_for_initial_state(&mut self, fg: &FactLandmarkGraph, initial: &State, id: StateId) {
        let n = fg.num_landmarks();
        let mut acc = all_true(n);
        let mut req = FixedBitSet::with_capacity(n);
        for l in fg.ids() {
            if !fg.is_true_in_state(l, initial) {
                acc.set(usize::from(l), false);
                req.set(usize::from(l), true);
            }
        }
        self.propagate_required_again(fg, initial, &acc, &mut req);
        self.accepted.set_for(id, acc);
        self.required.set_for(id, req);
    }

    fn update_accepted_landmarks(
        &mut self,
        fg: &FactLandmarkGraph,
        parent_id: StateId,
        parent: &State,
        child_id: StateId,
        child: &State,
    ) -> bool {
        if child_id == parent_id {
            return false;
        }
        let n = fg.num_landmarks();
        let acc_p = self
            .accepted
            .get(parent_id)
            .cloned()
            .expect("parent state must have been visited before its child");
        let req_p = self
            .required
            .get(parent_id)
            .cloned()
            .expect("parent state must have been visited before its child");

        let mut acc_copy = acc_p.clone();
        let mut req_copy = req_p.clone();
        for l in fg.ids() {
            let li = usize::from(l);
            if req_p.contains(li) && fg.is_true_in_state(l, child) {
                acc_copy.set(li, true);
                if !fg.is_true_in_state(l, parent) {
                    req_copy.set(li, false);
                }
            }
        }

        for l in fg.ids() {
            let li = usize::from(l);
            if acc_copy.contains(li)
                && !req_copy.contains(li)
                && fg.node(l).is_true_in_goal
                && self.add_goal_atoms
                && !fg.is_true_in_state(l, child)
            {
                req_copy.set(li, true);
            }
        }
        self.propagate_required_again(fg, child, &acc_copy, &mut req_copy);

        let mut acc_commit = self.accepted.get(child_id).cloned().unwrap_or_else(|| all_true(n));
        acc_commit.intersect_with(&acc_copy);
        let mut req_commit = self
            .required
            .get(child_id)
            .cloned()
            .unwrap_or_else(|| FixedBitSet::with_capacity(n));
        req_commit.union_with(&req_copy);

        self.accepted.set_for(child_id, acc_commit);
        self.required.set_for(child_id, req_commit);
        true
    }

    fn update_status(&mut self, fg: &FactLandmarkGraph, state_id: StateId, _state: &State) {
        let acc = self
            .accepted
            .get(state_id)
            .expect("update_status called before set_landmarks_for_initial_state/update_accepted_landmarks");
        let req = self
            .required
            .get(state_id)
            .expect("update_status called before set_landmarks_for_initial_state/update_accepted_landmarks");
        self.status = fg
            .ids()
            .map(|l| {
                let li = usize::from(l);
                match (acc.contains(li), req.contains(li)) {
                    (true, true) => LandmarkStatus::PastAndFuture,
                    (true, false) => LandmarkStatus::Past,
                    (false, _) => LandmarkStatus::Future,
                }
            })
            .collect();
        trace!(
            past_and_future = self.status.iter().filter(|s| **s == LandmarkStatus::PastAndFuture).count(),
            future = self.status.iter().filter(|s| **s == LandmarkStatus::Future).count(),
            "consistent status propagated"
        );
    }

    fn status(&self, id: LandmarkId) -> LandmarkStatus {
        self.status[usize::from(id)]
    }
}
