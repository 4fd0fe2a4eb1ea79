use crate::{
    checker::SolverKind,
    diagnosis::hsdag::HsdagConfig,
    identify::{Engine, IdentifyConfig},
    model::{Assignment, DiagnosisTask},
};
use clap::Parser;
use std::{
    path::PathBuf,
    sync::{Arc, atomic::AtomicBool},
};

/// rDiag: minimal conflicts and minimal diagnoses of inconsistent knowledge bases
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Config {
    /// diagnosis engine
    #[arg(short, long, value_enum, default_value_t = Engine::FastDiag)]
    pub engine: Engine,

    /// model file in dimacs format, constraints are named by `c constraint` comments
    pub model: PathBuf,

    /// sat solver answering the consistency checks
    #[arg(long, value_enum, default_value_t = SolverKind::Gipsat)]
    pub solver: SolverKind,

    /// stop after this many diagnoses
    #[arg(long = "max-diagnoses")]
    pub max_diagnoses: Option<usize>,

    /// stop after this many conflicts
    #[arg(long = "max-conflicts")]
    pub max_conflicts: Option<usize>,

    /// max depth of the hitting-set dag, 0 for unbounded
    #[arg(long = "max-depth", default_value_t = 0)]
    pub max_depth: usize,

    /// configuration to diagnose, one NAME=BOOL per occurrence
    #[arg(long = "config", value_name = "NAME=BOOL", conflicts_with = "test_case")]
    pub configuration: Vec<Assignment>,

    /// test case added to the background, one NAME=BOOL per occurrence
    #[arg(long = "test-case", value_name = "NAME=BOOL")]
    pub test_case: Vec<Assignment>,

    /// random seed
    #[arg(long, default_value_t = 0)]
    pub rseed: u64,

    /// print statistic
    #[arg(long, default_value_t = false)]
    pub statistic: bool,
}

impl Config {
    pub fn task(&self) -> DiagnosisTask {
        if !self.configuration.is_empty() {
            DiagnosisTask::Configuration(self.configuration.clone())
        } else if !self.test_case.is_empty() {
            DiagnosisTask::TestCase(self.test_case.clone())
        } else {
            DiagnosisTask::Model
        }
    }

    pub fn identify(&self, stop: Option<Arc<AtomicBool>>) -> IdentifyConfig {
        IdentifyConfig {
            solver: self.solver,
            rseed: self.rseed,
            hsdag: HsdagConfig {
                max_number_diagnoses: self.max_diagnoses,
                max_number_conflicts: self.max_conflicts,
                max_depth: self.max_depth,
            },
            stop,
        }
    }
}
