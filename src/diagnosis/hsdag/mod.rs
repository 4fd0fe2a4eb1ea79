//! Hitting-set directed acyclic graph.
//!
//! Nodes are labeled with conflicts or diagnoses by a [`Labeler`]; every
//! element of a label spawns a child whose path label excludes that element.
//! A node without a label ends a path, and its path label is a minimal hitting
//! set of all node labels. Nodes with equal path label sets are shared, labels
//! disjoint from a path are reused, and labels are kept minimal by replacing
//! supersets and pruning what only hung below the removed elements.

pub mod labeler;
mod node;

use super::{Label, diff, intersects, is_subset, set_key};
use crate::statistic::HsdagStatistic;
use giputils::hash::GHashMap;
use labeler::{Labeler, LabelerType};
use log::{debug, info};
pub use node::{Node, NodeId, NodeStatus};
use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

#[derive(Clone, Debug, Default)]
pub struct HsdagConfig {
    /// stop once this many diagnoses are known
    pub max_number_diagnoses: Option<usize>,
    /// stop once this many conflicts are known
    pub max_number_conflicts: Option<usize>,
    /// nodes deeper than this are not labeled, 0 for unbounded
    pub max_depth: usize,
}

pub struct Hsdag<L: Labeler> {
    labeler: L,
    cfg: HsdagConfig,
    nodes: Vec<Node>,
    open_nodes: VecDeque<NodeId>,
    node_labels: Vec<Label>,
    path_labels: Vec<Label>,
    label_nodes: GHashMap<Label, Vec<NodeId>>,
    nodes_lookup: GHashMap<Label, NodeId>,
    /// path label set of every queued node
    open_lookup: GHashMap<Label, NodeId>,
    stop: Option<Arc<AtomicBool>>,
    statistic: HsdagStatistic,
}

impl<L: Labeler> Hsdag<L> {
    pub fn new(labeler: L, cfg: HsdagConfig) -> Self {
        Self {
            labeler,
            cfg,
            nodes: Vec::new(),
            open_nodes: VecDeque::new(),
            node_labels: Vec::new(),
            path_labels: Vec::new(),
            label_nodes: GHashMap::default(),
            nodes_lookup: GHashMap::default(),
            open_lookup: GHashMap::default(),
            stop: None,
            statistic: HsdagStatistic::default(),
        }
    }

    /// Construction stops at the next node once `stop` is raised.
    pub fn set_stop_flag(&mut self, stop: Arc<AtomicBool>) {
        self.stop = Some(stop);
    }

    #[inline]
    pub fn labeler(&self) -> &L {
        &self.labeler
    }

    #[inline]
    pub fn root(&self) -> Option<&Node> {
        self.nodes.first()
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn statistic(&self) -> &HsdagStatistic {
        &self.statistic
    }

    pub fn diagnoses(&self) -> &[Label] {
        match self.labeler.labeler_type() {
            LabelerType::Conflict => &self.path_labels,
            LabelerType::Diagnosis => &self.node_labels,
        }
    }

    pub fn conflicts(&self) -> &[Label] {
        match self.labeler.labeler_type() {
            LabelerType::Conflict => &self.node_labels,
            LabelerType::Diagnosis => &self.path_labels,
        }
    }

    fn should_stop(&self) -> bool {
        if self.stop.as_ref().is_some_and(|s| s.load(Ordering::Relaxed)) {
            return true;
        }
        let diag = self
            .cfg
            .max_number_diagnoses
            .is_some_and(|m| m <= self.diagnoses().len());
        let conflict = self
            .cfg
            .max_number_conflicts
            .is_some_and(|m| m <= self.conflicts().len());
        diag || conflict
    }

    /// Builds the dag breadth first. Calling it again after an interruption
    /// resumes with the remaining open nodes.
    pub fn construct(&mut self) {
        let start = self.statistic.time.label();
        if self.should_stop() {
            return;
        }
        if self.nodes.is_empty() && !self.create_root() {
            info!("hsdag: nothing to diagnose");
            self.statistic.construct_time += self.statistic.time.from_label(start);
            return;
        }
        self.create_nodes();
        self.statistic.construct_time += self.statistic.time.from_label(start);
        info!(
            "hsdag: {} diagnoses, {} conflicts, {} nodes in {:.2?}",
            self.diagnoses().len(),
            self.conflicts().len(),
            self.nodes.len(),
            self.statistic.construct_time
        );
    }

    fn create_root(&mut self) -> bool {
        let param = self.labeler.initial_parameters();
        self.statistic.num_label_computed += 1;
        let Some(label) = self.labeler.label(&param) else {
            return false;
        };
        debug!("hsdag: root labeled {label:?}");
        self.node_labels.push(label.clone());
        self.add_label_node(&label, 0);
        self.nodes.push(Node::root(label, param));
        self.statistic.num_node += 1;
        self.push_open(0);
        true
    }

    fn create_nodes(&mut self) {
        while !self.should_stop() {
            let Some(n) = self.open_nodes.pop_front() else {
                break;
            };
            let key = set_key(&self.nodes[n].path_label);
            if self.open_lookup.get(&key) == Some(&n) {
                self.open_lookup.remove(&key);
            }
            if !self.nodes[n].is_root() {
                if self.skip_node(n) {
                    continue;
                }
                self.label(n);
                if self.should_stop() {
                    break;
                }
            }
            if self.nodes[n].is_open() {
                self.expand(n);
            }
        }
    }

    fn label(&mut self, n: NodeId) {
        let reused = self
            .node_labels
            .iter()
            .find(|l| !intersects(l, &self.nodes[n].path_label))
            .cloned();
        let label = match reused {
            Some(label) => {
                debug!("hsdag: node {n} reuses label {label:?}");
                self.statistic.num_label_reused += 1;
                Some(label)
            }
            None => {
                self.statistic.num_label_computed += 1;
                match self.labeler.label(&self.nodes[n].parameters) {
                    Some(label) => {
                        if !self.process_label(&label) {
                            self.close(n);
                            return;
                        }
                        Some(label)
                    }
                    None => None,
                }
            }
        };
        match label {
            Some(label) => {
                self.add_label_node(&label, n);
                self.nodes[n].label = label;
            }
            None => {
                let node = &mut self.nodes[n];
                node.status = NodeStatus::Checked;
                debug!("hsdag: path label {:?} at node {n}", node.path_label);
                self.path_labels.push(node.path_label.clone());
                self.statistic.num_path_label += 1;
            }
        }
    }

    /// Keeps the node labels minimal after `label` was computed. Returns false
    /// if `label` is not minimal itself and has been dropped.
    fn process_label(&mut self, label: &Label) -> bool {
        if self.node_labels.iter().any(|l| is_subset(l, label)) {
            debug!("hsdag: drop non-minimal label {label:?}");
            return false;
        }
        let (supersets, kept): (Vec<Label>, Vec<Label>) = self
            .node_labels
            .drain(..)
            .partition(|l| is_subset(label, l));
        self.node_labels = kept;
        for greater in supersets {
            debug!("hsdag: label {greater:?} replaced by {label:?}");
            let nodes = self.label_nodes.remove(&set_key(&greater)).unwrap_or_default();
            for m in nodes {
                if self.nodes[m].is_open() {
                    self.relabel(m, &greater, label);
                }
            }
        }
        self.node_labels.push(label.clone());
        true
    }

    fn relabel(&mut self, m: NodeId, greater: &Label, smaller: &Label) {
        self.nodes[m].label = smaller.clone();
        self.add_label_node(smaller, m);
        for e in diff(greater, smaller) {
            if let Some(child) = self.nodes[m].children.remove(&e) {
                self.unlink(m, child);
            }
        }
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) {
        let node = &mut self.nodes[child];
        node.parents.retain(|&p| p != parent);
        if node.parents.is_empty() {
            self.clean_up(child);
        }
    }

    fn clean_up(&mut self, n: NodeId) {
        let key = set_key(&self.nodes[n].path_label);
        if self.nodes_lookup.get(&key) == Some(&n) {
            self.nodes_lookup.remove(&key);
        }
        if self.nodes[n].is_open() {
            debug!("hsdag: prune node {n}");
            self.nodes[n].status = NodeStatus::Pruned;
            self.statistic.num_pruned += 1;
        }
        let children: Vec<NodeId> = self.nodes[n].children.drain().map(|(_, c)| c).collect();
        for c in children {
            self.unlink(n, c);
        }
    }

    fn expand(&mut self, n: NodeId) {
        let label = self.nodes[n].label.clone();
        for e in label {
            let mut path = self.nodes[n].path_label.clone();
            path.push(e);
            let key = set_key(&path);
            if let Some(&m) = self.nodes_lookup.get(&key) {
                debug!("hsdag: node {m} reused as child of {n} over {e}");
                self.nodes[m].parents.push(n);
                self.nodes[n].children.insert(e, m);
                self.statistic.num_node_reused += 1;
                continue;
            }
            let param = self
                .labeler
                .identify_new_node_parameters(&self.nodes[n].parameters, e);
            let id = self.nodes.len();
            let child = Node::child(id, &self.nodes[n], e, param);
            self.nodes.push(child);
            self.nodes[n].children.insert(e, id);
            self.nodes_lookup.insert(key, id);
            self.statistic.num_node += 1;
            if !self.can_prune(id) {
                self.push_open(id);
            }
        }
    }

    fn push_open(&mut self, n: NodeId) {
        self.open_lookup.insert(set_key(&self.nodes[n].path_label), n);
        self.open_nodes.push_back(n);
    }

    fn add_label_node(&mut self, label: &Label, n: NodeId) {
        self.label_nodes.entry(set_key(label)).or_default().push(n);
    }

    fn skip_node(&mut self, n: NodeId) -> bool {
        let node = &self.nodes[n];
        if !node.is_open() {
            return true;
        }
        if self.cfg.max_depth != 0 && self.cfg.max_depth < node.level {
            return true;
        }
        self.can_prune(n)
    }

    /// Closes `n` if a known path label is contained in its path label, or
    /// if another open node has the same path label set.
    fn can_prune(&mut self, n: NodeId) -> bool {
        let path = &self.nodes[n].path_label;
        let covered = self.path_labels.iter().any(|p| is_subset(p, path));
        let twin = || {
            self.open_lookup
                .get(&set_key(path))
                .is_some_and(|&o| o != n && self.nodes[o].is_open())
        };
        if covered || twin() {
            self.close(n);
            return true;
        }
        false
    }

    fn close(&mut self, n: NodeId) {
        debug!("hsdag: close node {n}");
        self.nodes[n].status = NodeStatus::Closed;
        self.statistic.num_closed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labeler::Parameters;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    /// Treats every listed set as a conflict and labels a node with the first
    /// one that fits into its candidates.
    struct FamilyLabeler {
        family: Vec<Vec<i32>>,
        candidates: Vec<i32>,
        calls: usize,
    }

    impl FamilyLabeler {
        fn new(family: Vec<Vec<i32>>, candidates: Vec<i32>) -> Self {
            Self {
                family,
                candidates,
                calls: 0,
            }
        }
    }

    impl Labeler for FamilyLabeler {
        fn labeler_type(&self) -> LabelerType {
            LabelerType::Conflict
        }

        fn initial_parameters(&self) -> Parameters {
            Parameters::new(self.candidates.clone(), Vec::new())
        }

        fn label(&mut self, param: &Parameters) -> Option<Label> {
            self.calls += 1;
            self.family
                .iter()
                .find(|s| is_subset(s, &param.c))
                .cloned()
        }

        fn identify_new_node_parameters(&self, param: &Parameters, arc_label: i32) -> Parameters {
            Parameters::new(diff(&param.c, &[arc_label]), Vec::new())
        }
    }

    fn sorted(sets: &[Label]) -> Vec<Label> {
        let mut res: Vec<Label> = sets.iter().map(|s| set_key(s)).collect();
        res.sort();
        res
    }

    fn minimal_hitting_sets(family: &[Vec<i32>], candidates: &[i32]) -> Vec<Label> {
        let n = candidates.len();
        let subset = |mask: usize| -> Vec<i32> {
            (0..n).filter(|i| mask >> i & 1 == 1).map(|i| candidates[i]).collect()
        };
        let hitting: Vec<usize> = (0..1usize << n)
            .filter(|&mask| family.iter().all(|s| intersects(s, &subset(mask))))
            .collect();
        let minimal = hitting
            .iter()
            .filter(|&&m| !hitting.iter().any(|&o| o != m && o & m == o))
            .map(|&m| subset(m))
            .collect::<Vec<_>>();
        sorted(&minimal)
    }

    fn construct(family: Vec<Vec<i32>>, candidates: Vec<i32>, cfg: HsdagConfig) -> Hsdag<FamilyLabeler> {
        let mut hsdag = Hsdag::new(FamilyLabeler::new(family, candidates), cfg);
        hsdag.construct();
        hsdag
    }

    #[test]
    fn hitting_sets_of_minimal_conflicts() {
        let family = vec![vec![1, 2], vec![2, 3], vec![1, 3, 4]];
        let hsdag = construct(family.clone(), vec![1, 2, 3, 4], HsdagConfig::default());
        assert_eq!(
            sorted(hsdag.diagnoses()),
            vec![vec![1, 2], vec![1, 3], vec![2, 3], vec![2, 4]]
        );
        assert_eq!(sorted(hsdag.conflicts()), sorted(&family));
        assert!(hsdag.statistic().num_node_reused > 0);
    }

    #[test]
    fn non_minimal_root_label_is_replaced() {
        let hsdag = construct(vec![vec![1, 2], vec![1]], vec![1, 2], HsdagConfig::default());
        assert_eq!(hsdag.diagnoses(), &[vec![1]]);
        assert_eq!(hsdag.conflicts(), &[vec![1]]);
        assert_eq!(hsdag.root().unwrap().label, vec![1]);
        assert_eq!(hsdag.nodes()[2].status, NodeStatus::Pruned);
        assert_eq!(hsdag.statistic().num_pruned, 1);
    }

    #[test]
    fn relabeling_prunes_dropped_branches() {
        let family = vec![vec![1, 2, 3], vec![2], vec![3, 4]];
        let hsdag = construct(family.clone(), vec![1, 2, 3, 4], HsdagConfig::default());
        assert_eq!(sorted(hsdag.diagnoses()), vec![vec![2, 3], vec![2, 4]]);
        assert_eq!(sorted(hsdag.conflicts()), vec![vec![2], vec![3, 4]]);
        assert_eq!(
            sorted(hsdag.diagnoses()),
            minimal_hitting_sets(&family, &[1, 2, 3, 4])
        );
        let root = hsdag.root().unwrap();
        assert_eq!(root.label, vec![2]);
        assert_eq!(root.children.len(), 1);
        assert_eq!(hsdag.statistic().num_pruned, 2);
    }

    #[test]
    fn no_root_label() {
        let hsdag = construct(vec![vec![5]], vec![1, 2], HsdagConfig::default());
        assert!(hsdag.root().is_none());
        assert!(hsdag.diagnoses().is_empty());
        assert!(hsdag.conflicts().is_empty());
    }

    #[test]
    fn bounded_number_of_results() {
        let family = vec![vec![1, 2], vec![3, 4], vec![5, 6]];
        let candidates = vec![1, 2, 3, 4, 5, 6];
        let all = minimal_hitting_sets(&family, &candidates);
        assert_eq!(all.len(), 8);
        for max in 1..=3 {
            let cfg = HsdagConfig {
                max_number_diagnoses: Some(max),
                ..Default::default()
            };
            let hsdag = construct(family.clone(), candidates.clone(), cfg);
            assert_eq!(hsdag.diagnoses().len(), max);
            for d in hsdag.diagnoses() {
                assert!(all.contains(&set_key(d)));
            }
        }
        let cfg = HsdagConfig {
            max_number_conflicts: Some(1),
            ..Default::default()
        };
        let hsdag = construct(family, candidates, cfg);
        assert_eq!(hsdag.conflicts().len(), 1);
        assert!(hsdag.diagnoses().is_empty());
    }

    #[test]
    fn bounded_depth() {
        let family = vec![vec![1, 2], vec![3, 4], vec![5, 6]];
        let cfg = HsdagConfig {
            max_depth: 2,
            ..Default::default()
        };
        let hsdag = construct(family, vec![1, 2, 3, 4, 5, 6], cfg);
        assert!(hsdag.diagnoses().is_empty());
        assert_eq!(hsdag.conflicts().len(), 3);
        assert!(hsdag.nodes().iter().all(|n| n.level <= 3));
    }

    #[test]
    fn stop_flag_interrupts_and_resumes() {
        let family = vec![vec![1, 2], vec![3, 4]];
        let stop = Arc::new(AtomicBool::new(true));
        let mut hsdag = Hsdag::new(
            FamilyLabeler::new(family, vec![1, 2, 3, 4]),
            HsdagConfig::default(),
        );
        hsdag.set_stop_flag(stop.clone());
        hsdag.construct();
        assert!(hsdag.root().is_none());
        assert_eq!(hsdag.labeler().calls, 0);
        stop.store(false, Ordering::Relaxed);
        hsdag.construct();
        assert_eq!(
            sorted(hsdag.diagnoses()),
            vec![vec![1, 3], vec![1, 4], vec![2, 3], vec![2, 4]]
        );
        assert_eq!(hsdag.statistic().num_label_reused, 1);
    }

    #[test]
    fn queued_nodes_are_indexed_by_path_set() {
        let family = vec![vec![1, 2], vec![3, 4], vec![5, 6]];
        let cfg = HsdagConfig {
            max_number_diagnoses: Some(1),
            ..Default::default()
        };
        let mut hsdag = construct(family, vec![1, 2, 3, 4, 5, 6], cfg);
        assert_eq!(hsdag.diagnoses().len(), 1);
        assert!(!hsdag.open_nodes.is_empty());
        for &o in hsdag.open_nodes.iter() {
            let key = set_key(&hsdag.nodes[o].path_label);
            assert_eq!(hsdag.open_lookup.get(&key), Some(&o));
        }
        // a fresh node over a queued path set is its twin
        let o = *hsdag.open_nodes.back().unwrap();
        let id = hsdag.nodes.len();
        let mut twin = hsdag.nodes[o].clone();
        twin.path_label.reverse();
        hsdag.nodes.push(twin);
        assert!(hsdag.can_prune(id));
        assert_eq!(hsdag.nodes[id].status, NodeStatus::Closed);
        assert!(!hsdag.can_prune(o));
    }

    #[test]
    fn random_families_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let n = rng.random_range(1..=7);
            let candidates: Vec<i32> = (1..=n).collect();
            let mut family: Vec<Vec<i32>> = Vec::new();
            for _ in 0..rng.random_range(1..=5) {
                let set: Vec<i32> = candidates
                    .iter()
                    .copied()
                    .filter(|_| rng.random_bool(0.4))
                    .collect();
                if !set.is_empty() {
                    family.push(set);
                }
            }
            // an antichain, so every label handed out is minimal
            let family: Vec<Vec<i32>> = family
                .iter()
                .filter(|s| !family.iter().any(|o| o.len() < s.len() && is_subset(o, s)))
                .cloned()
                .fold(Vec::new(), |mut acc, s| {
                    if !acc.contains(&s) {
                        acc.push(s);
                    }
                    acc
                });
            if family.is_empty() {
                continue;
            }
            let hsdag = construct(family.clone(), candidates.clone(), HsdagConfig::default());
            assert_eq!(
                sorted(hsdag.diagnoses()),
                minimal_hitting_sets(&family, &candidates)
            );
            assert_eq!(sorted(hsdag.conflicts()), sorted(&family));
        }
    }
}
