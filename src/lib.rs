//! A cyclic-landmark admissible heuristic core for classical planning.
//!
//! Turns a fact-landmark graph into a disjunctive action landmark graph,
//! tracks landmark status across a search path, and encodes both as LP
//! constraints over per-operator counts, with an optional cycle-breaking
//! loop (Johnson enumeration, or an iterative oracle) tightening the bound.
//! The fact-landmark factory, the LP/MIP solver, and the planning task
//! itself are all external collaborators, abstracted behind traits; this
//! crate ships only minimal in-crate implementations of each for tests and
//! small examples.

pub mod constraints;
pub mod cycles;
pub mod dalm;
pub mod error;
pub mod fact_graph;
pub mod handler;
pub mod heuristic;
pub mod lp;
pub mod options;
pub mod ordering;
pub mod ros_file;
pub mod status;
pub mod task;

mod ids;

pub use error::PlannerError;
pub use heuristic::{Heuristic, DEAD_END};
pub use ids::{DalmNodeId, LandmarkId, OperatorId, StateId};
pub use options::HeuristicOptions;
