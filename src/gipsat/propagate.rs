use super::{
    Solver,
    cdb::{CREF_NONE, CRef},
};
use logicrs::{Lit, LitMap, Var};
use std::mem::take;

#[derive(Clone, Copy, Debug, Default)]
pub struct Watcher {
    pub clause: CRef,
    pub blocker: Lit,
}

impl Watcher {
    #[inline]
    pub fn new(clause: CRef, blocker: Lit) -> Self {
        Self { clause, blocker }
    }
}

#[derive(Default, Clone)]
pub struct Watchers {
    pub wtrs: LitMap<Vec<Watcher>>,
}

impl Watchers {
    #[inline]
    pub fn reserve(&mut self, var: Var) {
        self.wtrs.reserve(var)
    }

    #[inline]
    pub fn attach(&mut self, cref: CRef, cls: &[Lit]) {
        self.wtrs[!cls[0]].push(Watcher::new(cref, cls[1]));
        self.wtrs[!cls[1]].push(Watcher::new(cref, cls[0]));
    }
}

impl Solver {
    /// Unit propagation over the two watched literals of every clause.
    /// Returns the conflicting clause or `CREF_NONE`.
    pub(super) fn propagate(&mut self) -> CRef {
        while self.propagated < self.trail.len() {
            let p = self.trail[self.propagated];
            self.propagated += 1;
            self.statistic.num_propagation += 1;
            let mut ws = take(&mut self.watchers.wtrs[p]);
            let mut conflict = CREF_NONE;
            let (mut i, mut j) = (0, 0);
            'next_cls: while i < ws.len() {
                let w = ws[i];
                i += 1;
                if self.value.v(w.blocker).is_true() {
                    ws[j] = w;
                    j += 1;
                    continue;
                }
                let cls = &mut self.cdb[w.clause];
                if cls.removed {
                    continue;
                }
                if cls[0] == !p {
                    cls.swap(0, 1);
                }
                debug_assert!(cls[1] == !p);
                let first = cls[0];
                if first != w.blocker && self.value.v(first).is_true() {
                    ws[j] = Watcher::new(w.clause, first);
                    j += 1;
                    continue;
                }
                for k in 2..cls.len() {
                    if !self.value.v(cls[k]).is_false() {
                        cls.swap(1, k);
                        self.watchers.wtrs[!cls[1]].push(Watcher::new(w.clause, first));
                        continue 'next_cls;
                    }
                }
                ws[j] = Watcher::new(w.clause, first);
                j += 1;
                if self.value.v(first).is_false() {
                    conflict = w.clause;
                    while i < ws.len() {
                        ws[j] = ws[i];
                        j += 1;
                        i += 1;
                    }
                } else {
                    self.assign(first, w.clause);
                }
            }
            ws.truncate(j);
            self.watchers.wtrs[p] = ws;
            if conflict != CREF_NONE {
                return conflict;
            }
        }
        CREF_NONE
    }
}
