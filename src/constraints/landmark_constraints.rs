use crate::dalm::DisjActionLandmarkGraph;
use crate::ids::OperatorId;
use crate::lp::Constraint;
use std::collections::HashMap;

/// One `sum(x_o for o in actions(u)) >= 1` constraint per DALM node
/// (spec §4.5).
pub fn base_constraints(dg: &DisjActionLandmarkGraph, op_index: &HashMap<OperatorId, usize>) -> Vec<Constraint> {
    dg.ids()
        .map(|u| {
            let terms = dg
                .actions(u)
                .iter()
                .map(|op| (op_index[op], 1.0))
                .collect();
            Constraint::at_least(terms, 1.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact_graph::{FactLandmarkGraph, State};

    #[test]
    fn one_constraint_per_dalm_node() {
        let mut g = FactLandmarkGraph::new();
        g.add_landmark(vec![0], vec![OperatorId::from(0usize)], vec![], false);
        g.add_landmark(vec![1], vec![OperatorId::from(1usize)], vec![], false);
        let s = State::with_capacity(2);
        let dg = crate::dalm::build_eager(&g, &s);

        let mut op_index = HashMap::new();
        op_index.insert(OperatorId::from(0usize), 0);
        op_index.insert(OperatorId::from(1usize), 1);

        let constraints = base_constraints(&dg, &op_index);
        assert_eq!(constraints.len(), 2);
        assert!(constraints.iter().all(|c| c.lower_bound == 1.0));
    }
}
