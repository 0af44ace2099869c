//! External collaborator: the planning task abstraction.
//!
//! The real task proxy (variables, operators, initial state, goal) lives
//! outside this core; we only describe the interface it must expose. A
//! minimal [`GroundTask`] is shipped so tests and the reference landmark
//! factory have something concrete to operate on.

use crate::error::PlannerError;
use crate::fact_graph::{FactId, State};
use crate::ids::{OperatorId, RefStore};

/// A single ground operator: preconditions are facts that must all hold,
/// `adds` are facts made true by applying the operator.
///
/// Delete effects are deliberately not modeled: this heuristic core only
/// ever reasons about which operators can *achieve* a fact, never about
/// maintaining a reachable state forward in time, so a STRIPS add-effect
/// list is the only piece the constraint-generation pipeline consumes.
#[derive(Debug, Clone)]
pub struct Operator {
    pub name: String,
    pub cost: i64,
    pub preconditions: Vec<FactId>,
    pub adds: Vec<FactId>,
}

/// External collaborator exposing the planning task to the core.
pub trait TaskProxy {
    fn num_facts(&self) -> usize;
    fn operator_ids(&self) -> Vec<OperatorId>;
    fn operator(&self, id: OperatorId) -> &Operator;
    fn goal(&self) -> &[FactId];
    fn initial_state(&self) -> &State;
    fn has_axioms(&self) -> bool;
    fn has_conditional_effects(&self) -> bool;
}

/// A minimal, fully ground task, adequate for tests and small examples.
#[derive(Debug, Clone, Default)]
pub struct GroundTask {
    num_facts: usize,
    operators: RefStore<OperatorId, Operator>,
    goal: Vec<FactId>,
    initial_state: State,
    has_axioms: bool,
    has_conditional_effects: bool,
}

impl GroundTask {
    pub fn new(num_facts: usize, initial_state: State, goal: Vec<FactId>) -> Self {
        GroundTask {
            num_facts,
            operators: RefStore::new(),
            goal,
            initial_state,
            has_axioms: false,
            has_conditional_effects: false,
        }
    }

    pub fn add_operator(&mut self, op: Operator) -> OperatorId {
        self.operators.push(op)
    }

    pub fn mark_has_axioms(&mut self) {
        self.has_axioms = true;
    }

    pub fn mark_has_conditional_effects(&mut self) {
        self.has_conditional_effects = true;
    }
}

impl TaskProxy for GroundTask {
    fn num_facts(&self) -> usize {
        self.num_facts
    }

    fn operator_ids(&self) -> Vec<OperatorId> {
        self.operators.keys().collect()
    }

    fn operator(&self, id: OperatorId) -> &Operator {
        &self.operators[id]
    }

    fn goal(&self) -> &[FactId] {
        &self.goal
    }

    fn initial_state(&self) -> &State {
        &self.initial_state
    }

    fn has_axioms(&self) -> bool {
        self.has_axioms
    }

    fn has_conditional_effects(&self) -> bool {
        self.has_conditional_effects
    }
}

/// Rejects tasks with axioms or conditional effects, mirroring the
/// teacher's `task_properties::verify_no_axioms` /
/// `verify_no_conditional_effects` used when grounding a classical problem
/// from chronicles.
pub fn verify_supported(task: &dyn TaskProxy) -> Result<(), PlannerError> {
    if task.has_axioms() {
        return Err(PlannerError::UnsupportedTask { reason: "task has axioms" });
    }
    if task.has_conditional_effects() {
        return Err(PlannerError::UnsupportedTask {
            reason: "task has conditional effects",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_axioms() {
        let mut t = GroundTask::new(1, State::with_capacity(1), vec![0]);
        t.mark_has_axioms();
        assert!(matches!(
            verify_supported(&t),
            Err(PlannerError::UnsupportedTask { .. })
        ));
    }

    #[test]
    fn rejects_conditional_effects() {
        let mut t = GroundTask::new(1, State::with_capacity(1), vec![0]);
        t.mark_has_conditional_effects();
        assert!(matches!(
            verify_supported(&t),
            Err(PlannerError::UnsupportedTask { .. })
        ));
    }

    #[test]
    fn accepts_plain_task() {
        let t = GroundTask::new(1, State::with_capacity(1), vec![0]);
        assert!(verify_supported(&t).is_ok());
    }
}
