//! Consistency oracle over a fixed knowledge base.
//!
//! The knowledge base is loaded into one incremental solver at construction.
//! Every query is answered by solving under assumptions only, so the solver is
//! reused across calls and the clauses are never touched again.

use crate::{dimacs, gipsat};
use anyhow::bail;
use clap::ValueEnum;
use giputils::statistic::{Average, AverageDuration};
use log::{debug, trace};
use logicrs::{Lit, LitVec, satif::Satif};
use std::time::Instant;

/// Backing SAT solver of a [`ConsistencyChecker`].
#[derive(Copy, Clone, ValueEnum, Debug, Default, PartialEq, Eq)]
pub enum SolverKind {
    /// embedded cdcl solver
    #[default]
    Gipsat,
}

#[derive(Debug, Default, Clone)]
pub struct CheckerStatistic {
    pub num_check: usize,
    pub num_consistent: usize,
    pub avg_check_time: AverageDuration,
    /// failed assumptions per inconsistent check
    pub avg_core_len: Average,
}

pub struct ConsistencyChecker {
    solver: Box<dyn Satif>,
    statistic: CheckerStatistic,
}

impl ConsistencyChecker {
    /// Loads `kb`, a list of DIMACS clauses. A literal `0` or one outside the
    /// variable range makes the knowledge base malformed.
    pub fn new(kind: SolverKind, kb: &[Vec<i32>], rseed: u64) -> anyhow::Result<Self> {
        let mut solver: Box<dyn Satif> = match kind {
            SolverKind::Gipsat => Box::new(gipsat::Solver::new()),
        };
        solver.set_seed(rseed);
        for (i, cls) in kb.iter().enumerate() {
            let Some(cls) = dimacs::clause(cls) else {
                bail!("malformed clause #{i} in knowledge base: {cls:?}");
            };
            solver.add_clause(&cls);
        }
        debug!("checker: loaded {} clauses into {kind:?}", kb.len());
        Ok(Self {
            solver,
            statistic: CheckerStatistic::default(),
        })
    }

    /// Whether the knowledge base is satisfiable with every id of `enable`
    /// asserted and every id of `disable` negated.
    pub fn is_consistent(&mut self, enable: &[i32], disable: &[i32]) -> bool {
        let start = Instant::now();
        let assumps: LitVec = enable
            .iter()
            .map(|&l| Self::assumption(l))
            .chain(disable.iter().map(|&l| !Self::assumption(l)))
            .collect();
        if let Some(max) = assumps.iter().map(|l| l.var()).max() {
            self.solver.new_var_to(max);
        }
        let res = self.solver.solve(&assumps);
        self.statistic.num_check += 1;
        if res {
            self.statistic.num_consistent += 1;
        } else {
            let core: Vec<i32> = assumps
                .iter()
                .filter(|&&l| self.solver.unsat_has(l))
                .map(|&l| i32::from(l))
                .collect();
            trace!("core {core:?}");
            self.statistic.avg_core_len += core.len();
        }
        self.statistic.avg_check_time += start.elapsed();
        trace!("check +{enable:?} -{disable:?}: {res}");
        res
    }

    #[inline]
    fn assumption(id: i32) -> Lit {
        match dimacs::lit(id) {
            Some(l) => l,
            None => panic!("invalid assumption id {id}"),
        }
    }

    #[inline]
    pub fn num_var(&self) -> usize {
        self.solver.num_var()
    }

    #[inline]
    pub fn statistic(&self) -> &CheckerStatistic {
        &self.statistic
    }
}

impl Drop for ConsistencyChecker {
    fn drop(&mut self) {
        debug!("checker: released solver, {:?}", self.statistic);
    }
}
