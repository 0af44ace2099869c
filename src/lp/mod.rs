//! LP abstraction (spec §4.8): the external collaborator trait plus the
//! value types used to build problems. A tiny in-crate reference solver
//! lives in [`reference`] for tests and examples only.

pub mod reference;

use crate::ids::OperatorId;

/// Sense of the objective: this crate only ever minimises total cost, but
/// the type is kept explicit to mirror the teacher's LP value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
}

/// One non-negative operator-count variable, `x_o`.
#[derive(Debug, Clone, Copy)]
pub struct Variable {
    pub operator: OperatorId,
    pub cost: f64,
    pub integer: bool,
}

/// A linear constraint `sum(coeff_i * x_i) >= lower_bound`.
#[derive(Debug, Clone)]
pub struct Constraint {
    /// Sparse `(variable index, coefficient)` pairs.
    pub terms: Vec<(usize, f64)>,
    pub lower_bound: f64,
}

impl Constraint {
    pub fn at_least(terms: Vec<(usize, f64)>, lower_bound: f64) -> Self {
        Constraint { terms, lower_bound }
    }
}

/// The full problem: variables plus the permanent ("base") constraints.
/// Temporary (cycle) constraints are added/cleared separately through
/// [`LpSolver`].
#[derive(Debug, Clone)]
pub struct LinearProgram {
    pub sense: Sense,
    pub variables: Vec<Variable>,
    pub base_constraints: Vec<Constraint>,
}

impl LinearProgram {
    pub fn new(variables: Vec<Variable>) -> Self {
        LinearProgram {
            sense: Sense::Minimize,
            variables,
            base_constraints: Vec::new(),
        }
    }

    pub fn add_base_constraint(&mut self, c: Constraint) {
        self.base_constraints.push(c);
    }
}

/// External collaborator: the LP/MIP solver contract.
pub trait LpSolver {
    fn load_problem(&mut self, problem: LinearProgram);
    fn get_infinity(&self) -> f64;
    fn add_temporary_constraints(&mut self, constraints: &[Constraint]);
    fn clear_temporary_constraints(&mut self);
    fn has_temporary_constraints(&self) -> bool;
    fn solve(&mut self);
    fn has_optimal_solution(&self) -> bool;
    fn get_objective_value(&self) -> f64;
    /// Per-variable solution values, indexed the same way as
    /// [`LinearProgram::variables`].
    fn extract_solution(&self) -> Vec<f64>;
}
