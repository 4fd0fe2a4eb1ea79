mod fastdiag;
mod quickxplain;

pub use fastdiag::FastDiagLabeler;
pub use quickxplain::QuickXPlainLabeler;

use crate::diagnosis::Label;

/// What a labeler puts on a node. Node labels and path labels of the dag are
/// dual: when nodes carry conflicts, the paths are diagnoses and vice versa.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LabelerType {
    Conflict,
    Diagnosis,
}

/// Search state of a node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parameters {
    /// candidates
    pub c: Vec<i32>,
    /// literals accumulated along the path, asserted together with `b`
    pub d: Vec<i32>,
    /// background
    pub b: Vec<i32>,
}

impl Parameters {
    pub fn new(c: Vec<i32>, b: Vec<i32>) -> Self {
        Self {
            c,
            d: Vec::new(),
            b,
        }
    }
}

pub trait Labeler {
    fn labeler_type(&self) -> LabelerType;

    fn initial_parameters(&self) -> Parameters;

    /// A conflict or a diagnosis for `param`, `None` if there is none.
    fn label(&mut self, param: &Parameters) -> Option<Label>;

    /// Parameters of the child reached from a node with `param` over
    /// `arc_label`.
    fn identify_new_node_parameters(&self, param: &Parameters, arc_label: i32) -> Parameters;
}
