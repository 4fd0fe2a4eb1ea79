//! Diagnosis operations: a hitting-set dag driven by FastDiag or by
//! QuickXPlain over a prepared task.

use crate::{
    checker::{ConsistencyChecker, SolverKind},
    diagnosis::{
        FastDiag, Label, QuickXPlain,
        hsdag::{
            Hsdag, HsdagConfig,
            labeler::{FastDiagLabeler, Labeler, Parameters, QuickXPlainLabeler},
        },
    },
    model::PreparedTask,
    statistic::Statistic,
};
use clap::ValueEnum;
use std::sync::{Arc, atomic::AtomicBool};

#[derive(Copy, Clone, ValueEnum, Debug, Default, PartialEq, Eq)]
pub enum Engine {
    /// hsdag labeled with diagnoses by fastdiag
    #[default]
    #[value(name = "fastdiag")]
    FastDiag,
    /// hsdag labeled with conflicts by quickxplain
    #[value(name = "quickxplain")]
    QuickXPlain,
}

#[derive(Clone, Debug, Default)]
pub struct IdentifyConfig {
    pub solver: SolverKind,
    pub rseed: u64,
    pub hsdag: HsdagConfig,
    pub stop: Option<Arc<AtomicBool>>,
}

#[derive(Debug, Default)]
pub struct Identified {
    pub diagnoses: Vec<Label>,
    pub conflicts: Vec<Label>,
    pub messages: Vec<String>,
    pub statistic: Statistic,
}

pub fn run(task: &PreparedTask, engine: Engine, cfg: &IdentifyConfig) -> anyhow::Result<Identified> {
    let mut statistic = Statistic {
        num_candidate: task.c.len(),
        num_background: task.b.len(),
        num_clause: task.kb.len(),
        ..Default::default()
    };
    let checker = ConsistencyChecker::new(cfg.solver, &task.kb, cfg.rseed)?;
    let param = Parameters::new(task.c.clone(), task.b.clone());
    let mut res = match engine {
        Engine::FastDiag => {
            let labeler = FastDiagLabeler::new(FastDiag::new(checker), param);
            let hsdag = construct(labeler, cfg);
            statistic.checker = hsdag.labeler().fastdiag().checker().statistic().clone();
            statistic.hsdag = hsdag.statistic().clone();
            let mut res = Identified::new(hsdag.diagnoses(), hsdag.conflicts());
            let (cs_mess, diag_mess) = messages(task, &res.diagnoses, &res.conflicts);
            res.messages = vec![diag_mess, cs_mess];
            res
        }
        Engine::QuickXPlain => {
            let labeler = QuickXPlainLabeler::new(QuickXPlain::new(checker), param);
            let hsdag = construct(labeler, cfg);
            statistic.checker = hsdag.labeler().quickxplain().checker().statistic().clone();
            statistic.hsdag = hsdag.statistic().clone();
            let mut res = Identified::new(hsdag.diagnoses(), hsdag.conflicts());
            let (cs_mess, diag_mess) = messages(task, &res.diagnoses, &res.conflicts);
            res.messages = vec![cs_mess, diag_mess];
            res
        }
    };
    res.statistic = statistic;
    Ok(res)
}

fn construct<L: Labeler>(labeler: L, cfg: &IdentifyConfig) -> Hsdag<L> {
    let mut hsdag = Hsdag::new(labeler, cfg.hsdag.clone());
    if let Some(stop) = &cfg.stop {
        hsdag.set_stop_flag(stop.clone());
    }
    hsdag.construct();
    hsdag
}

impl Identified {
    fn new(diagnoses: &[Label], conflicts: &[Label]) -> Self {
        Self {
            diagnoses: diagnoses.to_vec(),
            conflicts: conflicts.to_vec(),
            ..Default::default()
        }
    }
}

/// The conflict message and the diagnosis message.
pub fn messages(task: &PreparedTask, diagnoses: &[Label], conflicts: &[Label]) -> (String, String) {
    let diag_mess = match diagnoses.len() {
        0 => "No diagnosis found".to_string(),
        1 => format!("Diagnosis: {}", task.pretty(diagnoses)),
        _ => format!("Diagnoses: {}", task.pretty(diagnoses)),
    };
    let cs_mess = match conflicts.len() {
        0 => "No conflicts found".to_string(),
        1 => format!("Conflict: {}", task.pretty(conflicts)),
        _ => format!("Conflicts: {}", task.pretty(conflicts)),
    };
    (cs_mess, diag_mess)
}
