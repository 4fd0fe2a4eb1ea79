use super::labeler::Parameters;
use crate::diagnosis::Label;
use giputils::hash::GHashMap;

pub type NodeId = usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeStatus {
    Open,
    /// made redundant by a discovered path label or by a twin open node
    Closed,
    /// unlinked by the cleanup after a smaller label replaced a larger one
    Pruned,
    /// no label exists, the path label is a result
    Checked,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    pub status: NodeStatus,
    pub label: Label,
    pub arc_label: Option<i32>,
    pub parameters: Parameters,
    pub path_label: Label,
    pub level: usize,
    pub parents: Vec<NodeId>,
    pub children: GHashMap<i32, NodeId>,
}

impl Node {
    pub fn root(label: Label, parameters: Parameters) -> Self {
        Self {
            id: 0,
            status: NodeStatus::Open,
            label,
            arc_label: None,
            parameters,
            path_label: Vec::new(),
            level: 0,
            parents: Vec::new(),
            children: GHashMap::default(),
        }
    }

    pub fn child(id: NodeId, parent: &Node, arc_label: i32, parameters: Parameters) -> Self {
        let mut path_label = parent.path_label.clone();
        path_label.push(arc_label);
        Self {
            id,
            status: NodeStatus::Open,
            label: Vec::new(),
            arc_label: Some(arc_label),
            parameters,
            path_label,
            level: parent.level + 1,
            parents: vec![parent.id],
            children: GHashMap::default(),
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.arc_label.is_none()
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == NodeStatus::Open
    }
}
