//! Status managers: strategies that maintain, per search state, which
//! landmarks are `Past`/`Future`/`PastAndFuture`.
//!
//! The three variants from the spec are dispatched through a closed enum
//! (`AnyStatusManager`) rather than `dyn StatusManager`, following the
//! spec's redesign note that the variant set is small and known statically.

mod consistent;
mod lama;
mod multi_path;

pub use consistent::ConsistentStatusManager;
pub use lama::LamaStatusManager;
pub use multi_path::MultiPathStatusManager;

use crate::fact_graph::{FactLandmarkGraph, State};
use crate::ids::{LandmarkId, StateId};
use crate::options::{HeuristicOptions, StatusManagerKind};
use fixedbitset::FixedBitSet;
use std::collections::HashMap;

/// Per-state classification of a landmark (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkStatus {
    Past,
    Future,
    PastAndFuture,
}

/// Shared, strategy-agnostic operations every status manager provides.
pub trait StatusManager {
    fn set_landmarks_for_initial_state(&mut self, fg: &FactLandmarkGraph, initial: &State, id: StateId);

    /// Returns `false` iff `child == parent` (no-op transition).
    fn update_accepted_landmarks(
        &mut self,
        fg: &FactLandmarkGraph,
        parent_id: StateId,
        parent: &State,
        child_id: StateId,
        child: &State,
    ) -> bool;

    fn update_status(&mut self, fg: &FactLandmarkGraph, state_id: StateId, state: &State);

    fn status(&self, id: LandmarkId) -> LandmarkStatus;

    /// True if any non-derived landmark makes the state a dead end: a
    /// `Future` landmark with no first achiever, or a `PastAndFuture`
    /// landmark with no possible achiever.
    fn dead_end_exists(&self, fg: &FactLandmarkGraph) -> bool {
        fg.ids().any(|id| match self.status(id) {
            LandmarkStatus::Future => fg.node(id).first_achievers.is_empty(),
            LandmarkStatus::PastAndFuture => fg.node(id).possible_achievers.is_empty(),
            LandmarkStatus::Past => false,
        })
    }
}

/// Per-state storage of a single `past`-style bitset, all bits initially
/// true (the identity of intersection), grounded on the teacher's
/// `PerStateBitset` collaborator semantics.
#[derive(Debug, Clone, Default)]
pub(crate) struct PerStateBitset {
    by_state: HashMap<StateId, FixedBitSet>,
    len: usize,
}

pub(super) fn all_true(len: usize) -> FixedBitSet {
    let mut bs = FixedBitSet::with_capacity(len);
    bs.insert_range(..);
    bs
}

impl PerStateBitset {
    fn new(len: usize) -> Self {
        PerStateBitset {
            by_state: HashMap::new(),
            len,
        }
    }

    fn get_or_all_true(&mut self, id: StateId) -> &mut FixedBitSet {
        self.by_state.entry(id).or_insert_with(|| {
            let mut bs = FixedBitSet::with_capacity(self.len);
            bs.insert_range(..);
            bs
        })
    }

    fn get(&self, id: StateId) -> Option<&FixedBitSet> {
        self.by_state.get(&id)
    }

    fn set_for(&mut self, id: StateId, bits: FixedBitSet) {
        self.by_state.insert(id, bits);
    }
}

/// Enum-dispatched status manager selected per [`StatusManagerKind`].
pub enum AnyStatusManager {
    Lama(LamaStatusManager),
    MultiPath(MultiPathStatusManager),
    Consistent(ConsistentStatusManager),
}

impl AnyStatusManager {
    pub fn new(kind: StatusManagerKind, opts: &HeuristicOptions, fg: &FactLandmarkGraph) -> Self {
        match kind {
            StatusManagerKind::Lama => AnyStatusManager::Lama(LamaStatusManager::new(fg)),
            StatusManagerKind::MultiPath => {
                AnyStatusManager::MultiPath(MultiPathStatusManager::new(fg, opts))
            }
            StatusManagerKind::Consistent => {
                AnyStatusManager::Consistent(ConsistentStatusManager::new(fg, opts))
            }
        }
    }
}

impl StatusManager for AnyStatusManager {
    fn set_landmarks_for_initial_state(&mut self, fg: &FactLandmarkGraph, initial: &State, id: StateId) {
        match self {
            AnyStatusManager::Lama(m) => m.set_landmarks_for_initial_state(fg, initial, id),
            AnyStatusManager::MultiPath(m) => m.set_landmarks_for_initial_state(fg, initial, id),
            AnyStatusManager::Consistent(m) => m.set_landmarks_for_initial_state(fg, initial, id),
        }
    }

    fn update_accepted_landmarks(
        &mut self,
        fg: &FactLandmarkGraph,
        parent_id: StateId,
        parent: &State,
        child_id: StateId,
        child: &State,
    ) -> bool {
        match self {
            AnyStatusManager::Lama(m) => {
                m.update_accepted_landmarks(fg, parent_id, parent, child_id, child)
            }
            AnyStatusManager::MultiPath(m) => {
                m.update_accepted_landmarks(fg, parent_id, parent, child_id, child)
            }
            AnyStatusManager::Consistent(m) => {
                m.update_accepted_landmarks(fg, parent_id, parent, child_id, child)
            }
        }
    }

    fn update_status(&mut self, fg: &FactLandmarkGraph, state_id: StateId, state: &State) {
        match self {
            AnyStatusManager::Lama(m) => m.update_status(fg, state_id, state),
            AnyStatusManager::MultiPath(m) => m.update_status(fg, state_id, state),
            AnyStatusManager::Consistent(m) => m.update_status(fg, state_id, state),
        }
    }

    fn status(&self, id: LandmarkId) -> LandmarkStatus {
        match self {
            AnyStatusManager::Lama(m) => m.status(id),
            AnyStatusManager::MultiPath(m) => m.status(id),
            AnyStatusManager::Consistent(m) => m.status(id),
        }
    }
}
