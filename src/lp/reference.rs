//! A tiny in-crate reference LP solver (spec §4.8), sufficient for the
//! small problems produced by this crate's constraint generation and by
//! its own tests. Not a production solver: no presolve, no scaling, and
//! the `integer` flag on [`super::Variable`] is ignored (every variable is
//! solved as continuous) since branch-and-bound is out of scope here.
//!
//! Implemented as a dense Big-M simplex with Bland's rule for both the
//! entering- and leaving-variable choice, which avoids cycling without the
//! bookkeeping of a two-phase method — adequate since the constraint
//! systems this crate produces (cover constraints plus cycle-breaking
//! constraints) are tiny and totally unimodular in practice.

use super::{Constraint, LinearProgram, LpSolver, Variable};

const BIG_M: f64 = 1.0e7;
const EPS: f64 = 1e-9;
const MAX_ITERATIONS: usize = 10_000;

#[derive(Debug, Default)]
pub struct ReferenceLpSolver {
    variables: Vec<Variable>,
    base_constraints: Vec<Constraint>,
    temporary: Vec<Constraint>,
    solution: Vec<f64>,
    objective: f64,
    optimal: bool,
}

impl ReferenceLpSolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LpSolver for ReferenceLpSolver {
    fn load_problem(&mut self, problem: LinearProgram) {
        self.base_constraints = problem.base_constraints;
        self.variables = problem.variables;
        self.temporary.clear();
        self.solution = vec![0.0; self.variables.len()];
        self.objective = 0.0;
        self.optimal = false;
    }

    fn get_infinity(&self) -> f64 {
        f64::INFINITY
    }

    fn add_temporary_constraints(&mut self, constraints: &[Constraint]) {
        self.temporary.extend_from_slice(constraints);
    }

    fn clear_temporary_constraints(&mut self) {
        self.temporary.clear();
    }

    fn has_temporary_constraints(&self) -> bool {
        !self.temporary.is_empty()
    }

    fn solve(&mut self) {
        let mut constraints = self.base_constraints.clone();
        constraints.extend(self.temporary.iter().cloned());
        match solve_min(&self.variables, &constraints) {
            Some((objective, solution)) => {
                self.objective = objective;
                self.solution = solution;
                self.optimal = true;
            }
            None => {
                self.objective = f64::INFINITY;
                self.solution = vec![0.0; self.variables.len()];
                self.optimal = false;
            }
        }
    }

    fn has_optimal_solution(&self) -> bool {
        self.optimal
    }

    fn get_objective_value(&self) -> f64 {
        self.objective
    }

    fn extract_solution(&self) -> Vec<f64> {
        self.solution.clone()
    }
}

/// Minimises `sum(cost_j * x_j)` subject to `sum(a_ij * x_j) >= b_i` and
/// `x_j >= 0`, returning `None` if the problem is infeasible (or the
/// iteration budget is exhausted, treated conservatively as "no optimal
/// solution").
fn solve_min(vars: &[Variable], constraints: &[Constraint]) -> Option<(f64, Vec<f64>)> {
    let n = vars.len();
    let m = constraints.len();
    if m == 0 {
        return Some((0.0, vec![0.0; n]));
    }

    let surplus_col = |i: usize| n + i;
    let artificial_col = |i: usize| n + m + i;
    let total_cols = n + 2 * m;

    let mut tab = vec![vec![0.0; total_cols + 1]; m + 1];
    let mut basis = vec![0usize; m];

    for (i, c) in constraints.iter().enumerate() {
        let sign = if c.lower_bound >= 0.0 { 1.0 } else { -1.0 };
        for &(var_idx, coeff) in &c.terms {
            tab[i][var_idx] += sign * coeff;
        }
        tab[i][surplus_col(i)] = -sign;
        tab[i][artificial_col(i)] = sign;
        tab[i][total_cols] = sign * c.lower_bound;
        basis[i] = if c.lower_bound >= 0.0 { artificial_col(i) } else { surplus_col(i) };
    }

    let mut cost = vec![0.0; total_cols];
    for (j, v) in vars.iter().enumerate() {
        cost[j] = v.cost;
    }
    for i in 0..m {
        cost[artificial_col(i)] = BIG_M;
    }

    for j in 0..total_cols {
        tab[m][j] = cost[j];
    }
    for i in 0..m {
        let factor = cost[basis[i]];
        if factor.abs() > EPS {
            for col in 0..=total_cols {
                tab[m][col] -= factor * tab[i][col];
            }
        }
    }

    for _ in 0..MAX_ITERATIONS {
        let entering = (0..total_cols).find(|&j| tab[m][j] < -EPS);
        let entering = match entering {
            Some(j) => j,
            None => break,
        };

        let mut leaving: Option<usize> = None;
        let mut best_ratio = f64::INFINITY;
        for i in 0..m {
            let a = tab[i][entering];
            if a > EPS {
                let ratio = tab[i][total_cols] / a;
                let better = ratio < best_ratio - EPS;
                let tied_but_smaller_basis = (ratio - best_ratio).abs() <= EPS && leaving.is_some_and(|l| basis[i] < basis[l]);
                if better || tied_but_smaller_basis {
                    best_ratio = ratio;
                    leaving = Some(i);
                }
            }
        }
        let leaving = leaving?;

        let pivot = tab[leaving][entering];
        for col in 0..=total_cols {
            tab[leaving][col] /= pivot;
        }
        for r in 0..=m {
            if r == leaving {
                continue;
            }
            let factor = tab[r][entering];
            if factor.abs() > EPS {
                for col in 0..=total_cols {
                    let pivot_val = tab[leaving][col];
                    tab[r][col] -= factor * pivot_val;
                }
            }
        }
        basis[leaving] = entering;
    }

    for i in 0..m {
        if basis[i] >= n + m && tab[i][total_cols] > 1e-6 {
            return None;
        }
    }

    let mut x = vec![0.0; n];
    for (i, &b) in basis.iter().enumerate() {
        if b < n {
            x[b] = tab[i][total_cols].max(0.0);
        }
    }
    let objective = vars.iter().zip(&x).map(|(v, &xi)| v.cost * xi).sum();
    Some((objective, x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::OperatorId;

    fn var(id: usize, cost: f64) -> Variable {
        Variable {
            operator: OperatorId::from(id),
            cost,
            integer: false,
        }
    }

    #[test]
    fn single_cover_constraint_picks_cheapest_operator() {
        let vars = vec![var(0, 3.0), var(1, 1.0)];
        let constraints = vec![Constraint::at_least(vec![(0, 1.0), (1, 1.0)], 1.0)];
        let (obj, x) = solve_min(&vars, &constraints).unwrap();
        assert!((obj - 1.0).abs() < 1e-6);
        assert!(x[1] >= 1.0 - 1e-6);
    }

    #[test]
    fn disjoint_constraints_sum_costs() {
        let vars = vec![var(0, 2.0), var(1, 5.0)];
        let constraints = vec![
            Constraint::at_least(vec![(0, 1.0)], 1.0),
            Constraint::at_least(vec![(1, 1.0)], 1.0),
        ];
        let (obj, _) = solve_min(&vars, &constraints).unwrap();
        assert!((obj - 7.0).abs() < 1e-6);
    }

    #[test]
    fn infeasible_constraint_with_no_achievers_returns_none() {
        let vars: Vec<Variable> = vec![];
        let constraints = vec![Constraint::at_least(vec![], 1.0)];
        assert!(solve_min(&vars, &constraints).is_none());
    }

    #[test]
    fn shared_operator_across_two_landmarks_is_reused_not_doubled() {
        let vars = vec![var(0, 1.0)];
        let constraints = vec![
            Constraint::at_least(vec![(0, 1.0)], 1.0),
            Constraint::at_least(vec![(0, 1.0)], 1.0),
        ];
        let (obj, x) = solve_min(&vars, &constraints).unwrap();
        assert!((obj - 1.0).abs() < 1e-6);
        assert!(x[0] >= 1.0 - 1e-6);
    }

    #[test]
    fn clearing_temporary_constraints_restores_the_base_objective() {
        let mut solver = ReferenceLpSolver::new();
        let mut problem = LinearProgram::new(vec![var(0, 1.0), var(1, 1.0)]);
        problem.add_base_constraint(Constraint::at_least(vec![(0, 1.0)], 1.0));
        problem.add_base_constraint(Constraint::at_least(vec![(1, 1.0)], 1.0));
        solver.load_problem(problem);

        solver.solve();
        let base_objective = solver.get_objective_value();
        assert!((base_objective - 2.0).abs() < 1e-6);

        solver.add_temporary_constraints(&[Constraint::at_least(vec![(0, 1.0), (1, 1.0)], 3.0)]);
        solver.solve();
        assert!((solver.get_objective_value() - 3.0).abs() < 1e-6);

        solver.clear_temporary_constraints();
        assert!(!solver.has_temporary_constraints());
        solver.solve();
        assert!((solver.get_objective_value() - base_objective).abs() < 1e-6);
    }
}
