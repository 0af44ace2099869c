//! Reasonable-orders-from-file collaborator (spec §4.9/§6): a thin,
//! optional text-format reader that adds reasonable edges to a
//! fact-landmark graph. Not part of the core algorithm; included because
//! nothing in the ambient-stack rule excludes small file-format
//! collaborators the original system ships.

use crate::error::PlannerError;
use crate::fact_graph::FactLandmarkGraph;
use crate::ids::LandmarkId;
use crate::ordering::EdgeKind;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d+) -r-> (\d+)$").unwrap())
}

/// Parses one line of the form `<id> -r-> <id>`, returning the two
/// landmark ids as raw `usize`s.
fn parse_line(line: &str) -> Option<(usize, usize)> {
    let caps = line_pattern().captures(line)?;
    let from = caps[1].parse().ok()?;
    let to = caps[2].parse().ok()?;
    Some((from, to))
}

/// Reads reasonable-order lines from `path` and adds a `Reasonable` edge to
/// `fg` for each one. Lines that don't match `^\d+ -r-> \d+$` (ignoring
/// surrounding whitespace) are rejected with
/// [`PlannerError::MalformedRosLine`]; referencing a landmark id outside
/// `fg`'s range is rejected with [`PlannerError::UnknownLandmarkId`].
pub fn add_reasonable_orders_from_file(fg: &mut FactLandmarkGraph, path: &Path) -> Result<(), PlannerError> {
    let contents = fs::read_to_string(path).map_err(|e| PlannerError::RosFileUnreadable {
        path: path.display().to_string(),
        source: Arc::new(e),
    })?;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (from, to) = parse_line(line).ok_or_else(|| PlannerError::MalformedRosLine { line: line.to_string() })?;
        let n = fg.num_landmarks();
        if from >= n || to >= n {
            return Err(PlannerError::UnknownLandmarkId(from.max(to)));
        }
        fg.add_edge(LandmarkId::from(from), LandmarkId::from(to), EdgeKind::Reasonable);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::OperatorId;
    use std::io::Write;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn two_landmark_graph() -> FactLandmarkGraph {
        let mut g = FactLandmarkGraph::new();
        g.add_landmark(vec![0], vec![OperatorId::from(0usize)], vec![], false);
        g.add_landmark(vec![1], vec![OperatorId::from(1usize)], vec![], false);
        g
    }

    fn write_temp(contents: &str) -> std::path::PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let mut path = std::env::temp_dir();
        path.push(format!("ros_test_{}_{}.txt", std::process::id(), COUNTER.fetch_add(1, Ordering::Relaxed)));
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn well_formed_file_adds_expected_edge() {
        let mut g = two_landmark_graph();
        let path = write_temp("0 -r-> 1\n");
        add_reasonable_orders_from_file(&mut g, &path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(g.node(LandmarkId::from(1usize)).parents.len(), 1);
    }

    #[test]
    fn malformed_line_is_rejected() {
        let mut g = two_landmark_graph();
        let path = write_temp("0 -> 1\n");
        let result = add_reasonable_orders_from_file(&mut g, &path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(PlannerError::MalformedRosLine { .. })));
    }

    #[test]
    fn missing_file_is_reported() {
        let mut g = two_landmark_graph();
        let path = Path::new("/nonexistent/ros.txt");
        let result = add_reasonable_orders_from_file(&mut g, path);
        assert!(matches!(result, Err(PlannerError::RosFileUnreadable { .. })));
    }

    #[test]
    fn unknown_landmark_id_is_rejected() {
        let mut g = two_landmark_graph();
        let path = write_temp("0 -r-> 5\n");
        let result = add_reasonable_orders_from_file(&mut g, &path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(PlannerError::UnknownLandmarkId(5))));
    }
}
