use super::ConstraintGenerator;
use crate::cycles::{enumerate_cycles, CycleOracle, DepthFirstOracle, FloydWarshallOracle};
use crate::dalm::DisjActionLandmarkGraph;
use crate::error::PlannerError;
use crate::ids::{DalmNodeId, OperatorId};
use crate::lp::{Constraint, LpSolver};
use crate::options::CycleGeneratorKind;
use std::collections::HashMap;
use tracing::trace;

enum Mode {
    Johnson,
    FloydWarshall(FloydWarshallOracle),
    DepthFirst(DepthFirstOracle),
}

/// Adds temporary cycle-breaking constraints to the LP, in one of two
/// modes (spec §4.5): enumerate-once (`Johnson`) or iterative
/// solve-then-ask-an-oracle (`FloydWarshall`/`DepthFirst`).
pub struct CycleConstraintGenerator {
    mode: Mode,
    strong: bool,
    op_index: HashMap<OperatorId, usize>,
}

impl CycleConstraintGenerator {
    /// Fails with [`PlannerError::MissingCycleGenerator`] for
    /// `CycleGeneratorKind::None` — the caller should simply not construct
    /// a cycle generator at all in that case; this exists so call sites
    /// that received `None` by mistake fail loudly instead of silently
    /// skipping cycle constraints.
    pub fn new(kind: CycleGeneratorKind, strong: bool, op_index: HashMap<OperatorId, usize>) -> Result<Self, PlannerError> {
        let mode = match kind {
            CycleGeneratorKind::None => return Err(PlannerError::MissingCycleGenerator),
            CycleGeneratorKind::Johnson => Mode::Johnson,
            CycleGeneratorKind::FloydWarshall => Mode::FloydWarshall(FloydWarshallOracle),
            CycleGeneratorKind::DepthFirst => Mode::DepthFirst(DepthFirstOracle),
        };
        Ok(CycleConstraintGenerator { mode, strong, op_index })
    }

    fn per_landmark_weight(&self, dg: &DisjActionLandmarkGraph, x: &[f64]) -> Vec<f64> {
        dg.ids()
            .map(|u| {
                dg.actions(u)
                    .iter()
                    .map(|op| x[self.op_index[op]])
                    .sum()
            })
            .collect()
    }

    fn build_constraint(&self, dg: &DisjActionLandmarkGraph, cycle: &[DalmNodeId]) -> Constraint {
        let k = cycle.len();
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for i in 0..k {
            let target = cycle[(i + 1) % k];
            for op in dg.actions(target) {
                *counts.entry(self.op_index[op]).or_insert(0.0) += 1.0;
            }
        }
        Constraint::at_least(counts.into_iter().collect(), k as f64 + 1.0)
    }
}

impl ConstraintGenerator for CycleConstraintGenerator {
    fn update_constraints(&mut self, dg: &DisjActionLandmarkGraph, solver: &mut dyn LpSolver) -> bool {
        match &self.mode {
            Mode::Johnson => {
                let cycles = enumerate_cycles(dg, self.strong);
                let constraints: Vec<Constraint> = cycles.iter().map(|c| self.build_constraint(dg, c)).collect();
                solver.add_temporary_constraints(&constraints);
                false
            }
            Mode::FloydWarshall(oracle) => self.iterate(dg, solver, oracle),
            Mode::DepthFirst(oracle) => self.iterate(dg, solver, oracle),
        }
    }
}

impl CycleConstraintGenerator {
    fn iterate(&self, dg: &DisjActionLandmarkGraph, solver: &mut dyn LpSolver, oracle: &dyn CycleOracle) -> bool {
        let mut round = 0;
        loop {
            solver.solve();
            if !solver.has_optimal_solution() {
                trace!(round, "cycle constraint iteration found the LP infeasible");
                return true;
            }
            let solution = solver.extract_solution();
            let weights = self.per_landmark_weight(dg, &solution);
            let cycle = oracle.find_cycle(dg, &weights, self.strong);
            if cycle.is_empty() {
                trace!(round, objective = solver.get_objective_value(), "cycle constraint iteration converged");
                return false;
            }
            let constraint = self.build_constraint(dg, &cycle);
            trace!(round, cycle_len = cycle.len(), "cycle constraint iteration added a violated cycle");
            solver.add_temporary_constraints(std::slice::from_ref(&constraint));
            round += 1;
        }
    }
}
