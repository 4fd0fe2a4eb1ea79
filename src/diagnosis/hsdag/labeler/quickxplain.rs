use super::{Labeler, LabelerType, Parameters};
use crate::diagnosis::{Label, QuickXPlain, concat};

/// Labels nodes with minimal conflicts.
pub struct QuickXPlainLabeler {
    quickxplain: QuickXPlain,
    initial: Parameters,
}

impl QuickXPlainLabeler {
    pub fn new(quickxplain: QuickXPlain, initial: Parameters) -> Self {
        Self {
            quickxplain,
            initial,
        }
    }

    #[inline]
    pub fn quickxplain(&self) -> &QuickXPlain {
        &self.quickxplain
    }
}

impl Labeler for QuickXPlainLabeler {
    #[inline]
    fn labeler_type(&self) -> LabelerType {
        LabelerType::Conflict
    }

    #[inline]
    fn initial_parameters(&self) -> Parameters {
        self.initial.clone()
    }

    fn label(&mut self, param: &Parameters) -> Option<Label> {
        let mut cs = self
            .quickxplain
            .find_conflict(&param.c, &concat(&param.b, &param.d));
        if cs.is_empty() {
            return None;
        }
        cs.reverse();
        Some(cs)
    }

    fn identify_new_node_parameters(&self, param: &Parameters, arc_label: i32) -> Parameters {
        let c = param.c.iter().copied().filter(|&l| l != arc_label).collect();
        let mut d = param.d.clone();
        d.push(-arc_label);
        Parameters {
            c,
            d,
            b: param.b.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{ConsistencyChecker, SolverKind};

    #[test]
    fn labels_with_conflicts() {
        let kb = vec![vec![1, -3], vec![-1, 2, -4], vec![-1, -2, -5]];
        let checker = ConsistencyChecker::new(SolverKind::Gipsat, &kb, 0).unwrap();
        let mut l =
            QuickXPlainLabeler::new(QuickXPlain::new(checker), Parameters::new(vec![4, 5], vec![3]));
        assert_eq!(l.labeler_type(), LabelerType::Conflict);
        let root = l.initial_parameters();
        assert_eq!(l.label(&root), Some(vec![5, 4]));
        let child = l.identify_new_node_parameters(&root, 5);
        assert_eq!(
            child,
            Parameters {
                c: vec![4],
                d: vec![-5],
                b: vec![3],
            }
        );
        assert_eq!(l.label(&child), None);
        assert_eq!(l.quickxplain().checker().statistic().num_check, 4);
    }
}
