use super::{Label, concat, split};
use crate::checker::ConsistencyChecker;
use log::trace;

/// QuickXPlain: one minimal conflict set by recursive halving.
pub struct QuickXPlain {
    checker: ConsistencyChecker,
}

impl QuickXPlain {
    pub fn new(checker: ConsistencyChecker) -> Self {
        Self { checker }
    }

    /// A minimal subset of `c` that is inconsistent together with `b`. Empty
    /// when `c` is empty or `b` plus `c` is consistent.
    pub fn find_conflict(&mut self, c: &[i32], b: &[i32]) -> Label {
        trace!("quickxplain C={c:?} B={b:?}");
        if c.is_empty() || self.checker.is_consistent(&concat(b, c), &[]) {
            return Vec::new();
        }
        let cs = self.qx(&[], c, b);
        trace!("quickxplain -> {cs:?}");
        cs
    }

    fn qx(&mut self, d: &[i32], c: &[i32], b: &[i32]) -> Vec<i32> {
        trace!("qx D={d:?} C={c:?} B={b:?}");
        if !d.is_empty() && !self.checker.is_consistent(b, c) {
            return Vec::new();
        }
        if c.len() == 1 {
            return c.to_vec();
        }
        let (c1, c2) = split(c);
        let cs1 = self.qx(c2, c1, &concat(b, c2));
        let cs2 = self.qx(&cs1, c2, &concat(b, &cs1));
        concat(&cs1, &cs2)
    }

    #[inline]
    pub fn checker(&self) -> &ConsistencyChecker {
        &self.checker
    }

    #[inline]
    pub fn checker_mut(&mut self) -> &mut ConsistencyChecker {
        &mut self.checker
    }
}
