use super::{
    Solver,
    cdb::{CREF_NONE, CRef, ClauseKind},
};
use logicrs::{Lit, Var};
use log::trace;
use rand::Rng;

const RANDOM_DECISION_FREQ: f64 = 0.02;
const RESTART_BASE: usize = 100;

fn luby(y: f64, mut x: usize) -> f64 {
    let (mut size, mut seq) = (1, 0);
    while size < x + 1 {
        seq += 1;
        size = 2 * size + 1;
    }
    while size - 1 != x {
        size = (size - 1) >> 1;
        seq -= 1;
        x %= size;
    }
    y.powi(seq)
}

impl Solver {
    #[inline]
    pub(super) fn highest_level(&self) -> usize {
        self.trail_lim.len()
    }

    #[inline]
    fn new_level(&mut self) {
        self.trail_lim.push(self.trail.len());
    }

    #[inline]
    pub(super) fn assign(&mut self, lit: Lit, reason: CRef) {
        let v = lit.var();
        self.value.set(lit);
        self.level[v] = self.highest_level() as u32;
        self.reason[v] = reason;
        self.trail.push(lit);
    }

    pub(super) fn backtrack(&mut self, level: usize) {
        if self.highest_level() <= level {
            return;
        }
        let start = self.trail_lim[level];
        for i in (start..self.trail.len()).rev() {
            let l = self.trail[i];
            let v = l.var();
            self.phase_saving[v] = l.polarity();
            self.value.set_none(v);
            self.reason[v] = CREF_NONE;
            self.vsids.push(v);
        }
        self.trail.truncate(start);
        self.trail_lim.truncate(level);
        self.propagated = self.trail.len();
    }

    fn decide(&mut self) -> Option<Lit> {
        let mut next: Option<Var> = None;
        if self.rng.random_bool(RANDOM_DECISION_FREQ) {
            next = self
                .vsids
                .random(&mut self.rng)
                .filter(|v| self.value.v(v.lit()).is_none());
        }
        while next.is_none() {
            let v = self.vsids.pop()?;
            if self.value.v(v.lit()).is_none() {
                next = Some(v);
            }
        }
        next.map(|v| Lit::new(v, self.phase_saving[v]))
    }

    fn locked(&self, cref: CRef) -> bool {
        let l = self.cdb[cref][0];
        self.value.v(l).is_true() && self.reason[l.var()] == cref
    }

    fn reduce(&mut self) {
        self.statistic.num_reduce += 1;
        let learnt = self.cdb.learnt_by_activity();
        let half = learnt.len() / 2;
        for &c in learnt[..half].iter() {
            if self.cdb[c].len() > 2 && !self.locked(c) {
                self.cdb.remove(c);
            }
        }
        self.cdb.clean_learnt();
        self.max_learnt *= 1.1;
    }

    /// Runs CDCL until a result or until `nof_conflicts` conflicts were seen,
    /// in which case `None` asks for a restart.
    fn search(&mut self, assumps: &[Lit], nof_conflicts: usize) -> Option<bool> {
        let mut conflicts = 0;
        loop {
            let confl = self.propagate();
            if confl != CREF_NONE {
                self.statistic.num_conflict += 1;
                conflicts += 1;
                if self.highest_level() == 0 {
                    self.ok = false;
                    self.clear_core();
                    return Some(false);
                }
                let (learnt, btl) = self.analyze(confl);
                self.backtrack(btl);
                if learnt.len() == 1 {
                    self.assign(learnt[0], CREF_NONE);
                } else {
                    let cref = self.cdb.alloc(&learnt, ClauseKind::Learnt);
                    self.watchers.attach(cref, &self.cdb[cref]);
                    self.cdb.bump(cref);
                    self.assign(learnt[0], cref);
                    self.statistic.num_learnt += 1;
                }
                self.vsids.decay();
                self.cdb.decay();
                continue;
            }
            if conflicts >= nof_conflicts {
                self.backtrack(0);
                return None;
            }
            if self.cdb.num_learnt() as f64 >= self.max_learnt + self.trail.len() as f64 {
                self.reduce();
            }
            let mut next = None;
            while self.highest_level() < assumps.len() {
                let p = assumps[self.highest_level()];
                let v = self.value.v(p);
                if v.is_true() {
                    self.new_level();
                } else if v.is_false() {
                    self.analyze_final(p);
                    return Some(false);
                } else {
                    next = Some(p);
                    break;
                }
            }
            let next = match next {
                Some(p) => p,
                None => match self.decide() {
                    Some(l) => l,
                    None => return Some(true),
                },
            };
            self.statistic.num_decision += 1;
            self.new_level();
            self.assign(next, CREF_NONE);
        }
    }

    pub(super) fn solve_inner(&mut self, assumps: &[Lit]) -> bool {
        self.backtrack(0);
        self.clear_core();
        if !self.ok {
            return false;
        }
        if self.max_learnt == 0.0 {
            self.max_learnt = (self.cdb.num_origin() as f64 / 3.0).max(100.0);
        }
        let mut restarts = 0;
        let res = loop {
            let nof_conflicts = (luby(2.0, restarts) * RESTART_BASE as f64) as usize;
            match self.search(assumps, nof_conflicts) {
                Some(res) => break res,
                None => {
                    restarts += 1;
                    self.statistic.num_restart += 1;
                }
            }
        };
        if res {
            self.model = self.value.clone();
        }
        trace!("gipsat: solve {assumps:?} -> {res}");
        self.backtrack(0);
        res
    }
}

#[cfg(test)]
mod tests {
    use super::luby;

    #[test]
    fn luby_sequence() {
        let seq: Vec<f64> = (0..7).map(|i| luby(2.0, i)).collect();
        assert_eq!(seq, vec![1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 4.0]);
    }
}
