//! The fact-landmark graph `FG`: a minimal, crate-owned representation of
//! what an external landmark factory produces, plus the factory
//! collaborator trait itself.

use crate::error::PlannerError;
use crate::ids::{LandmarkId, OperatorId, RefStore};
use crate::ordering::EdgeKind;
use crate::task::TaskProxy;
use fixedbitset::FixedBitSet;
use std::collections::VecDeque;

/// A boolean proposition about the world. The core never interprets facts
/// beyond testing membership in a [`State`]; their meaning (e.g. `(at bob
/// kitchen)`) lives entirely in the external task/factory collaborators.
pub type FactId = usize;

/// A snapshot of which facts currently hold.
///
/// Grounded on `classical::state::State`'s `FixedBitSet`-backed
/// representation: the i-th bit gives the value of the i-th fact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct State {
    facts: FixedBitSet,
}

impl State {
    pub fn with_capacity(num_facts: usize) -> Self {
        State {
            facts: FixedBitSet::with_capacity(num_facts),
        }
    }

    pub fn from_facts(num_facts: usize, true_facts: impl IntoIterator<Item = FactId>) -> Self {
        let mut s = State::with_capacity(num_facts);
        for f in true_facts {
            s.set(f, true);
        }
        s
    }

    pub fn is_true(&self, fact: FactId) -> bool {
        self.facts.contains(fact)
    }

    pub fn set(&mut self, fact: FactId, value: bool) {
        self.facts.set(fact, value);
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.len() == 0
    }
}

/// A node of the fact-landmark graph: a conjunction of facts that must all
/// hold at some point on every plan.
#[derive(Debug, Clone)]
pub struct LandmarkNode {
    /// Facts whose conjunction makes up this landmark.
    pub facts: Vec<FactId>,
    /// Operators that can achieve this landmark the very first time it is
    /// needed. A subset of `possible_achievers`.
    pub first_achievers: Vec<OperatorId>,
    /// Every operator that could possibly achieve this landmark.
    pub possible_achievers: Vec<OperatorId>,
    pub is_true_in_goal: bool,
    pub children: Vec<(LandmarkId, EdgeKind)>,
    pub parents: Vec<(LandmarkId, EdgeKind)>,
}

impl LandmarkNode {
    pub fn is_true_in_state(&self, state: &State) -> bool {
        self.facts.iter().all(|&f| state.is_true(f))
    }
}

/// The fact-landmark graph itself: an arena of [`LandmarkNode`]s connected
/// by typed, directed edges. Genuinely cyclic by design (that is the whole
/// point of this heuristic), so it is represented as a dense vector plus
/// `(target, kind)` adjacency lists rather than any owned-tree structure.
#[derive(Debug, Clone, Default)]
pub struct FactLandmarkGraph {
    nodes: RefStore<LandmarkId, LandmarkNode>,
}

impl FactLandmarkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_landmark(
        &mut self,
        facts: Vec<FactId>,
        possible_achievers: Vec<OperatorId>,
        first_achievers: Vec<OperatorId>,
        is_true_in_goal: bool,
    ) -> LandmarkId {
        self.nodes.push(LandmarkNode {
            facts,
            first_achievers,
            possible_achievers,
            is_true_in_goal,
            children: Vec::new(),
            parents: Vec::new(),
        })
    }

    /// Adds an edge `from -> to` of the given kind. Duplicate `(from, kind)`
    /// /`(to, kind)` pairs are not re-inserted, matching the teacher's
    /// `edge_add_force` being idempotent for identical edges.
    pub fn add_edge(&mut self, from: LandmarkId, to: LandmarkId, kind: EdgeKind) {
        if !self.nodes[from].children.iter().any(|&(t, k)| t == to && k == kind) {
            self.nodes[from].children.push((to, kind));
        }
        if !self.nodes[to].parents.iter().any(|&(f, k)| f == from && k == kind) {
            self.nodes[to].parents.push((from, kind));
        }
    }

    pub fn num_landmarks(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: LandmarkId) -> &LandmarkNode {
        &self.nodes[id]
    }

    pub fn ids(&self) -> impl Iterator<Item = LandmarkId> + '_ {
        self.nodes.keys()
    }

    pub fn is_true_in_state(&self, id: LandmarkId, state: &State) -> bool {
        self.node(id).is_true_in_state(state)
    }

    /// Kahn's algorithm: succeeds (returns `true`) iff the graph is
    /// acyclic, treating all edge kinds uniformly. Used by the heuristic
    /// driver to skip cycle constraints entirely when the initial fact
    /// landmark graph has no cycles to encode.
    pub fn is_acyclic(&self) -> bool {
        let n = self.num_landmarks();
        let mut sorted = vec![false; n];
        let mut open: VecDeque<LandmarkId> = self
            .ids()
            .filter(|&id| self.node(id).parents.is_empty())
            .collect();

        while let Some(id) = open.pop_front() {
            sorted[usize::from(id)] = true;
            for &(child, _) in &self.node(id).children {
                let all_parents_sorted = self
                    .node(child)
                    .parents
                    .iter()
                    .all(|&(p, _)| sorted[usize::from(p)]);
                if all_parents_sorted && !sorted[usize::from(child)] {
                    open.push_back(child);
                }
            }
        }

        sorted.into_iter().all(|b| b)
    }
}

/// External collaborator: produces a [`FactLandmarkGraph`] from a task.
///
/// Out of scope per the spec (landmark generation itself is not part of
/// this core); this crate ships only [`TrivialLandmarkFactory`] so the
/// end-to-end tests and the orchestrator in [`crate::handler`] have
/// something real to drive.
pub trait LandmarkFactory {
    fn compute_lm_graph(&mut self, task: &dyn TaskProxy) -> Result<FactLandmarkGraph, PlannerError>;

    /// Builds a new fact-landmark graph for a task identical to the one
    /// passed to `compute_lm_graph`, except that `state` replaces the
    /// initial state. Used by the non-path-dependent heuristic mode.
    fn recompute_lm_graph(&mut self, state: &State) -> Result<FactLandmarkGraph, PlannerError>;

    fn computes_reasonable_orders(&self) -> bool {
        false
    }

    fn supports_conditional_effects(&self) -> bool {
        false
    }
}

/// A minimal landmark factory: one fact landmark per goal fact, with no
/// orderings between them. Adequate for driving the handler/heuristic
/// end-to-end but not a substitute for a real landmark-generation
/// algorithm, which is explicitly out of scope for this crate.
pub struct TrivialLandmarkFactory {
    task_goal: Option<Vec<FactId>>,
    task_num_facts: usize,
    achievers: Vec<Vec<OperatorId>>,
}

impl TrivialLandmarkFactory {
    pub fn new() -> Self {
        TrivialLandmarkFactory {
            task_goal: None,
            task_num_facts: 0,
            achievers: Vec::new(),
        }
    }

    fn build(&self, initial_state: State) -> FactLandmarkGraph {
        let mut graph = FactLandmarkGraph::new();
        let goal = self.task_goal.as_deref().unwrap_or(&[]);
        for &fact in goal {
            let possible = self.achievers.get(fact).cloned().unwrap_or_default();
            graph.add_landmark(vec![fact], possible.clone(), possible, true);
        }
        let _ = initial_state; // the trivial factory ignores the initial state's value
        graph
    }
}

impl Default for TrivialLandmarkFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl LandmarkFactory for TrivialLandmarkFactory {
    fn compute_lm_graph(&mut self, task: &dyn TaskProxy) -> Result<FactLandmarkGraph, PlannerError> {
        if let Some(prior) = &self.task_goal {
            if prior.as_slice() != task.goal() {
                return Err(PlannerError::MultipleTasks);
            }
        }
        self.task_goal = Some(task.goal().to_vec());
        self.task_num_facts = task.num_facts();
        self.achievers = vec![Vec::new(); self.task_num_facts];
        for op_id in task.operator_ids() {
            for &eff in task.operator(op_id).adds.iter() {
                self.achievers[eff].push(op_id);
            }
        }
        Ok(self.build(task.initial_state().clone()))
    }

    fn recompute_lm_graph(&mut self, state: &State) -> Result<FactLandmarkGraph, PlannerError> {
        Ok(self.build(state.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_graph(edge: EdgeKind) -> (FactLandmarkGraph, LandmarkId, LandmarkId) {
        let mut g = FactLandmarkGraph::new();
        let a = g.add_landmark(vec![0], vec![0.into()], vec![0.into()], false);
        let b = g.add_landmark(vec![1], vec![1.into()], vec![1.into()], false);
        g.add_edge(a, b, edge);
        (g, a, b)
    }

    #[test]
    fn acyclic_graph_detected() {
        let (g, _, _) = two_node_graph(EdgeKind::Reasonable);
        assert!(g.is_acyclic());
    }

    #[test]
    fn cyclic_graph_detected() {
        let (mut g, a, b) = two_node_graph(EdgeKind::Reasonable);
        g.add_edge(b, a, EdgeKind::Reasonable);
        assert!(!g.is_acyclic());
    }

    #[test]
    fn edge_insertion_is_idempotent_for_identical_edges() {
        let (mut g, a, b) = two_node_graph(EdgeKind::Natural);
        g.add_edge(a, b, EdgeKind::Natural);
        assert_eq!(g.node(b).parents.len(), 1);
        assert_eq!(g.node(a).children.len(), 1);
    }
}
