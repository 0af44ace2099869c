//! The heuristic driver (spec §4.7): per state, resets temporary
//! constraints, lets each constraint generator contribute, solves the LP,
//! and rounds the objective up to an admissible integer bound.

use crate::constraints::{base_constraints, ConstraintGenerator};
use crate::error::PlannerError;
use crate::fact_graph::{LandmarkFactory, State};
use crate::handler::ConstraintHandler;
use crate::ids::{OperatorId, StateId};
use crate::lp::{Constraint, LinearProgram, LpSolver, Variable};
use crate::options::HeuristicOptions;
use crate::status::StatusManager;
use crate::task::TaskProxy;
use std::collections::HashMap;

/// Sentinel returned in place of a real bound when the state is a dead end,
/// matching the teacher's use of a dedicated constant rather than
/// `Option<i32>` so the value composes directly with priority-queue
/// ordering downstream.
pub const DEAD_END: i32 = i32::MAX;

const EPS: f64 = 0.01;

/// Ties a handler, an LP solver, and zero or more constraint generators
/// together into the per-state evaluation described in spec §4.7.
pub struct Heuristic {
    handler: ConstraintHandler,
    solver: Box<dyn LpSolver>,
    generators: Vec<Box<dyn ConstraintGenerator>>,
    op_index: HashMap<OperatorId, usize>,
    variables: Vec<Variable>,
    path_dependent: bool,
}

impl Heuristic {
    pub fn new(
        factory: Box<dyn LandmarkFactory>,
        task: &dyn TaskProxy,
        options: HeuristicOptions,
        solver: Box<dyn LpSolver>,
        generators: Vec<Box<dyn ConstraintGenerator>>,
    ) -> Result<Self, PlannerError> {
        let handler = ConstraintHandler::new(factory, task, options)?;

        let mut op_index = HashMap::new();
        let mut variables = Vec::new();
        for id in task.operator_ids() {
            op_index.insert(id, variables.len());
            variables.push(Variable {
                operator: id,
                cost: task.operator(id).cost as f64,
                integer: options.use_integer_operator_counts,
            });
        }

        Ok(Heuristic {
            handler,
            solver,
            generators,
            op_index,
            variables,
            path_dependent: options.path_dependent,
        })
    }

    /// Evaluates the heuristic at `(state_id, state)`, following spec §4.7
    /// steps 1-5.
    pub fn evaluate(&mut self, state_id: StateId, state: &State) -> Result<i32, PlannerError> {
        debug_assert!(!self.solver.has_temporary_constraints(), "temporary constraints must be cleared between calls");

        let dg = self.handler.get_lm_graph(state_id, state)?.clone();

        if let Some(status) = self.handler.status_manager() {
            if status.dead_end_exists(self.handler.fact_graph()) {
                return Ok(DEAD_END);
            }
        }

        let base: Vec<Constraint> = base_constraints(&dg, &self.op_index);
        let mut problem = LinearProgram::new(self.variables.clone());
        for c in base {
            problem.add_base_constraint(c);
        }
        self.solver.load_problem(problem);

        let mut h = DEAD_END;
        let mut dead_end = false;
        for generator in &mut self.generators {
            if generator.update_constraints(&dg, self.solver.as_mut()) {
                dead_end = true;
                break;
            }
        }

        if !dead_end {
            self.solver.solve();
            if self.solver.has_optimal_solution() {
                h = (self.solver.get_objective_value() - EPS).ceil() as i32;
            }
        }

        self.solver.clear_temporary_constraints();
        Ok(h)
    }

    /// Forwards a state transition to the status manager, if path-dependent
    /// mode is active (spec §5: "`update_accepted_landmarks` must be called
    /// before `update_status` is consulted").
    pub fn notify_transition(&mut self, parent_id: StateId, parent: &State, child_id: StateId, child: &State) {
        if !self.path_dependent {
            return;
        }
        self.handler.notify_transition(parent_id, parent, child_id, child);
    }

    pub fn handler(&self) -> &ConstraintHandler {
        &self.handler
    }
}
