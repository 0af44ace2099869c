//! The constraint handler: an owned, per-search orchestrator that memoises
//! the disjunctive action landmark graph per state and, in path-dependent
//! mode, drives the status manager across transitions (spec §4.6).
//!
//! The teacher's analogous `LandmarkConstraintHandler` is a process-wide
//! singleton reached through `get_instance()`; this crate redesigns it as a
//! value owned by the caller for the lifetime of one search (Design Note,
//! spec §9), so nothing here is `static` or interior-mutable.

use crate::dalm::{self, DisjActionLandmarkGraph};
use crate::error::PlannerError;
use crate::fact_graph::{FactLandmarkGraph, LandmarkFactory, State};
use crate::ids::StateId;
use crate::options::HeuristicOptions;
use crate::status::{AnyStatusManager, StatusManager};
use crate::task::{self, TaskProxy};

/// Running sums across every `get_lm_graph` call, exposed so callers can
/// compute averages exactly as the teacher's `print_statistics` does.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandlerStatistics {
    pub graphs_built: u64,
    pub total_landmarks: u64,
    pub total_orderings: u64,
    pub total_weak_orderings: u64,
    pub total_cycle_constraints: u64,
}

impl HandlerStatistics {
    pub fn average_landmarks(&self) -> f64 {
        average(self.total_landmarks, self.graphs_built)
    }

    pub fn average_orderings(&self) -> f64 {
        average(self.total_orderings, self.graphs_built)
    }

    pub fn average_weak_orderings(&self) -> f64 {
        average(self.total_weak_orderings, self.graphs_built)
    }

    /// Called by the heuristic driver once per evaluation, after the cycle
    /// constraint generator has run, to fold its constraint count into the
    /// running total.
    pub fn record_cycle_constraints(&mut self, count: u64) {
        self.total_cycle_constraints += count;
    }
}

fn average(total: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

/// Caller-owned context: factory, task, optional status manager, the
/// current `DG`, and bookkeeping for when it needs rebuilding.
pub struct ConstraintHandler {
    factory: Box<dyn LandmarkFactory>,
    options: HeuristicOptions,
    initial_fg: FactLandmarkGraph,
    fg: FactLandmarkGraph,
    status: Option<AnyStatusManager>,
    dg: DisjActionLandmarkGraph,
    last_state_id: StateId,
    stats: HandlerStatistics,
}

impl ConstraintHandler {
    pub fn new(
        mut factory: Box<dyn LandmarkFactory>,
        task: &dyn TaskProxy,
        options: HeuristicOptions,
    ) -> Result<Self, PlannerError> {
        task::verify_supported(task)?;
        let fg = factory.compute_lm_graph(task)?;
        Ok(ConstraintHandler {
            factory,
            options,
            initial_fg: fg.clone(),
            fg,
            status: None,
            dg: DisjActionLandmarkGraph::default(),
            last_state_id: StateId::None,
            stats: HandlerStatistics::default(),
        })
    }

    /// Returns the current `DG`, rebuilding it first if `state_id` differs
    /// from the last one seen. The first call also instantiates the status
    /// manager (if `path_dependent`) and seeds it from `state`.
    pub fn get_lm_graph(
        &mut self,
        state_id: StateId,
        state: &State,
    ) -> Result<&DisjActionLandmarkGraph, PlannerError> {
        if state_id != self.last_state_id {
            if self.last_state_id == StateId::None {
                if self.options.path_dependent {
                    let mut mgr = AnyStatusManager::new(self.options.status_manager, &self.options, &self.fg);
                    mgr.set_landmarks_for_initial_state(&self.fg, state, state_id);
                    mgr.update_status(&self.fg, state_id, state);
                    self.status = Some(mgr);
                }
            } else if !self.options.path_dependent {
                self.fg = self.factory.recompute_lm_graph(state)?;
            }

            self.dg = match &self.status {
                Some(mgr) => dalm::build_with_status(&self.fg, state, mgr),
                None => dalm::build_eager(&self.fg, state),
            };
            self.last_state_id = state_id;

            self.stats.graphs_built += 1;
            self.stats.total_landmarks += self.dg.num_landmarks() as u64;
            self.stats.total_orderings += self.dg.num_orderings() as u64;
            self.stats.total_weak_orderings += self.dg.num_weak_orderings() as u64;
        }
        Ok(&self.dg)
    }

    /// Kahn's topological sort of the fact-landmark graph computed at
    /// construction time, treating all edge kinds uniformly. Lets the
    /// heuristic driver skip cycle constraints entirely when there is
    /// nothing cyclic to break.
    pub fn initial_fact_landmark_graph_is_acyclic(&self) -> bool {
        self.initial_fg.is_acyclic()
    }

    pub fn status_manager(&self) -> Option<&AnyStatusManager> {
        self.status.as_ref()
    }

    pub fn status_manager_mut(&mut self) -> Option<&mut AnyStatusManager> {
        self.status.as_mut()
    }

    /// Forwards a transition to the status manager, if one is active.
    /// Spec §5: `update_accepted_landmarks` must run before `update_status`
    /// is consulted for the child state.
    pub fn notify_transition(&mut self, parent_id: StateId, parent: &State, child_id: StateId, child: &State) {
        if let Some(status) = self.status.as_mut() {
            status.update_accepted_landmarks(&self.fg, parent_id, parent, child_id, child);
            status.update_status(&self.fg, child_id, child);
        }
    }

    pub fn fact_graph(&self) -> &FactLandmarkGraph {
        &self.fg
    }

    pub fn statistics(&self) -> &HandlerStatistics {
        &self.stats
    }

    pub fn statistics_mut(&mut self) -> &mut HandlerStatistics {
        &mut self.stats
    }
}
