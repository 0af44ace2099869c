//! Input errors, as distinguished from the `DEAD_END` sentinel (a legitimate
//! heuristic value, never an `Err`) and from programmer-error assertions
//! (`debug_assert!`/`assert!`, which are not recoverable and are not
//! represented here).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("unsupported task: {reason}")]
    UnsupportedTask { reason: &'static str },

    #[error("a second, different task was submitted to the same landmark factory")]
    MultipleTasks,

    #[error("cycle_generator option is required but was not provided")]
    MissingCycleGenerator,

    #[error("malformed reasonable-orders line (expected `<id> -r-> <id>`): {line:?}")]
    MalformedRosLine { line: String },

    #[error("could not read reasonable-orders file {path:?}: {source}")]
    RosFileUnreadable {
        path: String,
        #[source]
        source: std::sync::Arc<std::io::Error>,
    },

    #[error("unknown landmark id {0} referenced in reasonable-orders file")]
    UnknownLandmarkId(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_carry_their_context() {
        let unsupported = PlannerError::UnsupportedTask { reason: "conditional effects" };
        assert_eq!(unsupported.to_string(), "unsupported task: conditional effects");

        let malformed = PlannerError::MalformedRosLine { line: "0 -> 1".into() };
        assert!(malformed.to_string().contains("0 -> 1"));

        let unknown = PlannerError::UnknownLandmarkId(7);
        assert_eq!(unknown.to_string(), "unknown landmark id 7 referenced in reasonable-orders file");

        let unreadable = PlannerError::RosFileUnreadable {
            path: "/tmp/missing.txt".into(),
            source: std::sync::Arc::new(std::io::Error::new(std::io::ErrorKind::NotFound, "not found")),
        };
        let rendered = unreadable.to_string();
        assert!(rendered.contains("/tmp/missing.txt"));
        assert!(rendered.contains("not found"));
    }
}
