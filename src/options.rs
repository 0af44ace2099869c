//! Heuristic configuration, grounded on the teacher's `Options`-style
//! per-component config structs (e.g. `planning::classical::Config`):
//! a plain struct of toggles with a `Default` impl matching the spec's
//! stated defaults, rather than a builder or CLI-parsed struct.

/// Which [`crate::status::StatusManager`] strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusManagerKind {
    Lama,
    #[default]
    MultiPath,
    Consistent,
}

/// Which cycle-breaking strategy the cycle constraints use, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleGeneratorKind {
    #[default]
    None,
    Johnson,
    FloydWarshall,
    DepthFirst,
}

/// Tunables for the constraint handler and heuristic driver (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicOptions {
    /// Round operator-count variables to integers (a MIP rather than an LP).
    pub use_integer_operator_counts: bool,
    /// Reuse the accumulated `past`/`accepted` status across the search
    /// path rather than recomputing it fresh from each state.
    pub path_dependent: bool,
    pub status_manager: StatusManagerKind,
    pub add_goal_atoms: bool,
    pub add_gn_parents: bool,
    pub add_reasonable_children: bool,
    pub cycle_generator: CycleGeneratorKind,
    /// Only strong (non-reasonable) edges participate in cycle detection.
    ///
    /// Soundness of `strong = false` across every ordering kind is not
    /// established here; see `DESIGN.md`.
    pub strong: bool,
}

impl Default for HeuristicOptions {
    fn default() -> Self {
        HeuristicOptions {
            use_integer_operator_counts: false,
            path_dependent: true,
            status_manager: StatusManagerKind::MultiPath,
            add_goal_atoms: false,
            add_gn_parents: false,
            add_reasonable_children: false,
            cycle_generator: CycleGeneratorKind::None,
            strong: true,
        }
    }
}
