use super::{Labeler, LabelerType, Parameters};
use crate::diagnosis::{FastDiag, Label, concat};

/// Labels nodes with minimal diagnoses.
pub struct FastDiagLabeler {
    fastdiag: FastDiag,
    initial: Parameters,
}

impl FastDiagLabeler {
    pub fn new(fastdiag: FastDiag, initial: Parameters) -> Self {
        Self { fastdiag, initial }
    }

    #[inline]
    pub fn fastdiag(&self) -> &FastDiag {
        &self.fastdiag
    }
}

impl Labeler for FastDiagLabeler {
    #[inline]
    fn labeler_type(&self) -> LabelerType {
        LabelerType::Diagnosis
    }

    #[inline]
    fn initial_parameters(&self) -> Parameters {
        self.initial.clone()
    }

    fn label(&mut self, param: &Parameters) -> Option<Label> {
        if param.c.is_empty() {
            return None;
        }
        // a diagnosis exists only if the background survives without any candidate
        if !param.b.is_empty() {
            let neg_c: Vec<i32> = param.c.iter().map(|l| -l).collect();
            if !self
                .fastdiag
                .checker_mut()
                .is_consistent(&concat(&param.b, &neg_c), &[])
            {
                return None;
            }
        }
        let diag = self.fastdiag.find_diagnosis(&param.c, &param.b);
        (!diag.is_empty()).then_some(diag)
    }

    fn identify_new_node_parameters(&self, param: &Parameters, arc_label: i32) -> Parameters {
        let c = param.c.iter().copied().filter(|&l| l != arc_label).collect();
        let mut b = param.b.clone();
        b.push(arc_label);
        Parameters::new(c, b)
    }
}
