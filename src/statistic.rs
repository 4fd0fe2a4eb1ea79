use crate::checker::CheckerStatistic;
use giputils::statistic::RunningTime;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct HsdagStatistic {
    pub time: RunningTime,
    pub num_node: usize,
    pub num_node_reused: usize,
    pub num_label_computed: usize,
    pub num_label_reused: usize,
    pub num_closed: usize,
    pub num_pruned: usize,
    pub num_path_label: usize,
    pub construct_time: Duration,
}

/// Everything one diagnosis run measured. Solver counters are logged at
/// debug level when the solver is dropped.
#[allow(unused)]
#[derive(Debug, Default, Clone)]
pub struct Statistic {
    pub time: RunningTime,
    pub num_candidate: usize,
    pub num_background: usize,
    pub num_clause: usize,
    pub hsdag: HsdagStatistic,
    pub checker: CheckerStatistic,
}
