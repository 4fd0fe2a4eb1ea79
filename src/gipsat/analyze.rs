use super::{
    Solver,
    cdb::{CREF_NONE, CRef, ClauseKind},
};
use logicrs::{Lit, LitVec};

impl Solver {
    /// First-UIP learning. Returns the learnt clause, asserting literal
    /// first, and the level to backtrack to.
    pub(super) fn analyze(&mut self, mut confl: CRef) -> (LitVec, usize) {
        let level = self.highest_level() as u32;
        let mut learnt = LitVec::from([Lit::default()]);
        let mut path_c = 0usize;
        let mut uip: Option<Lit> = None;
        let mut index = self.trail.len();
        loop {
            debug_assert!(confl != CREF_NONE);
            if self.cdb[confl].kind == ClauseKind::Learnt {
                self.cdb.bump(confl);
            }
            let start = if uip.is_some() { 1 } else { 0 };
            for i in start..self.cdb[confl].len() {
                let q = self.cdb[confl][i];
                let v = q.var();
                if !self.seen[v] && self.level[v] > 0 {
                    self.vsids.bump(v);
                    self.seen[v] = true;
                    if self.level[v] >= level {
                        path_c += 1;
                    } else {
                        learnt.push(q);
                    }
                }
            }
            loop {
                index -= 1;
                if self.seen[self.trail[index].var()] {
                    break;
                }
            }
            let p = self.trail[index];
            uip = Some(p);
            confl = self.reason[p.var()];
            self.seen[p.var()] = false;
            path_c -= 1;
            if path_c == 0 {
                learnt[0] = !p;
                break;
            }
        }
        let mut btl = 0;
        if learnt.len() > 1 {
            let mut max_i = 1;
            for i in 2..learnt.len() {
                if self.level[learnt[i].var()] > self.level[learnt[max_i].var()] {
                    max_i = i;
                }
            }
            learnt.swap(1, max_i);
            btl = self.level[learnt[1].var()] as usize;
        }
        for l in learnt.iter() {
            self.seen[l.var()] = false;
        }
        (learnt, btl)
    }

    /// Collects the assumptions responsible for `p` being false into the
    /// unsat core. `p` itself is included.
    pub(super) fn analyze_final(&mut self, p: Lit) {
        self.clear_core();
        self.core_insert(p);
        if self.highest_level() == 0 {
            return;
        }
        self.seen[p.var()] = true;
        for i in (self.trail_lim[0]..self.trail.len()).rev() {
            let l = self.trail[i];
            let x = l.var();
            if !self.seen[x] {
                continue;
            }
            let r = self.reason[x];
            if r == CREF_NONE {
                debug_assert!(self.level[x] > 0);
                self.core_insert(l);
            } else {
                for &q in self.cdb[r][1..].iter() {
                    if self.level[q.var()] > 0 {
                        self.seen[q.var()] = true;
                    }
                }
            }
            self.seen[x] = false;
        }
        self.seen[p.var()] = false;
    }
}
