//! Cycle-related algorithms over the disjunctive action landmark graph:
//! single-violated-cycle oracles (§4.3) and full elementary-cycle
//! enumeration via Johnson's algorithm (§4.4).

pub mod depth_first;
pub mod johnson;
pub mod oracle;

pub use depth_first::DepthFirstOracle;
pub use floyd_warshall::FloydWarshallOracle;
pub use johnson::enumerate_cycles;
pub use oracle::{CycleOracle, EPS};

mod floyd_warshall;
