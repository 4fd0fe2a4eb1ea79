use giputils::statistic::AverageDuration;

#[derive(Debug, Default, Clone)]
pub struct SolverStatistic {
    pub num_solve: usize,
    pub num_sat: usize,
    pub num_decision: usize,
    pub num_propagation: usize,
    pub num_conflict: usize,
    pub num_restart: usize,
    pub num_learnt: usize,
    pub num_reduce: usize,
    pub avg_solve_time: AverageDuration,
}
