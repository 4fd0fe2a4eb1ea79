mod analyze;
mod cdb;
mod propagate;
mod search;
mod statistic;
mod vsids;

use cdb::{CREF_NONE, CRef, ClauseDB, ClauseKind};
use log::debug;
use logicrs::{Lit, LitMap, Var, VarAssign, VarMap, satif::Satif};
use propagate::Watchers;
use rand::{SeedableRng, rngs::StdRng};
pub use statistic::SolverStatistic;
use std::time::Instant;
use vsids::Vsids;

/// Embedded CDCL solver with assumption-based incremental solving.
pub struct Solver {
    cdb: ClauseDB,
    watchers: Watchers,
    value: VarAssign,
    trail: Vec<Lit>,
    trail_lim: Vec<usize>,
    level: VarMap<u32>,
    reason: VarMap<CRef>,
    propagated: usize,
    vsids: Vsids,
    phase_saving: VarMap<bool>,
    seen: VarMap<bool>,
    unsat_core: LitMap<bool>,
    core: Vec<Lit>,
    model: VarAssign,
    num_var: usize,
    ok: bool,
    max_learnt: f64,
    rng: StdRng,

    statistic: SolverStatistic,
}

impl Solver {
    pub fn new() -> Self {
        let mut solver = Self {
            cdb: Default::default(),
            watchers: Default::default(),
            value: Default::default(),
            trail: Default::default(),
            trail_lim: Default::default(),
            level: Default::default(),
            reason: Default::default(),
            propagated: 0,
            vsids: Default::default(),
            phase_saving: Default::default(),
            seen: Default::default(),
            unsat_core: LitMap::new(),
            core: Default::default(),
            model: Default::default(),
            num_var: 0,
            ok: true,
            max_learnt: 0.0,
            rng: StdRng::seed_from_u64(0),
            statistic: Default::default(),
        };
        // VarAssign starts with the constant assigned at level 0
        let c = solver.new_var();
        debug_assert!(c == Var::CONST);
        solver
    }

    fn clear_core(&mut self) {
        for l in self.core.drain(..) {
            self.unsat_core[l] = false;
        }
    }

    fn core_insert(&mut self, lit: Lit) {
        if !self.unsat_core[lit] {
            self.unsat_core[lit] = true;
            self.core.push(lit);
        }
    }

    #[inline]
    fn has_var(&self, var: Var) -> bool {
        usize::from(var) < self.num_var
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Satif for Solver {
    fn new_var(&mut self) -> Var {
        let var = Var::new(self.num_var);
        self.num_var += 1;
        self.value.reserve(var);
        self.model.reserve(var);
        self.watchers.reserve(var);
        self.vsids.reserve(var);
        self.unsat_core.reserve(var);
        self.level.reserve(var);
        self.reason.reserve(var);
        self.reason[var] = CREF_NONE;
        self.phase_saving.reserve(var);
        self.seen.reserve(var);
        self.vsids.push(var);
        var
    }

    #[inline]
    fn num_var(&self) -> usize {
        self.num_var
    }

    fn add_clause(&mut self, clause: &[Lit]) {
        self.backtrack(0);
        if !self.ok {
            return;
        }
        for l in clause.iter() {
            self.new_var_to(l.var());
        }
        let mut cls = clause.to_vec();
        cls.sort();
        cls.dedup();
        if cls.windows(2).any(|w| w[0] == !w[1]) {
            return;
        }
        if cls.iter().any(|l| self.value.v(*l).is_true()) {
            return;
        }
        cls.retain(|l| !self.value.v(*l).is_false());
        match cls.len() {
            0 => self.ok = false,
            1 => {
                self.assign(cls[0], CREF_NONE);
                if self.propagate() != CREF_NONE {
                    self.ok = false;
                }
            }
            _ => {
                let cref = self.cdb.alloc(&cls, ClauseKind::Origin);
                self.watchers.attach(cref, &self.cdb[cref]);
            }
        }
    }

    fn solve(&mut self, assumps: &[Lit]) -> bool {
        let start = Instant::now();
        for l in assumps.iter() {
            self.new_var_to(l.var());
        }
        self.statistic.num_solve += 1;
        let res = self.solve_inner(assumps);
        if res {
            self.statistic.num_sat += 1;
        }
        self.statistic.avg_solve_time += start.elapsed();
        res
    }

    fn sat_value(&self, lit: Lit) -> Option<bool> {
        if !self.has_var(lit.var()) {
            return None;
        }
        self.model.v(lit).into()
    }

    #[inline]
    fn unsat_has(&self, lit: Lit) -> bool {
        self.has_var(lit.var()) && self.unsat_core[lit]
    }

    fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

impl Drop for Solver {
    fn drop(&mut self) {
        debug!("gipsat: {:?}", self.statistic);
    }
}
