use super::{Label, concat, diff, split};
use crate::checker::ConsistencyChecker;
use log::trace;

/// MSS-based FastDiag: one minimal diagnosis with a number of consistency
/// checks logarithmic in the size of the candidate set.
pub struct FastDiag {
    checker: ConsistencyChecker,
}

impl FastDiag {
    pub fn new(checker: ConsistencyChecker) -> Self {
        Self { checker }
    }

    /// A minimal subset of `c` whose removal makes `b` plus the rest of `c`
    /// consistent. Empty when `c` is empty or nothing needs to be removed.
    pub fn find_diagnosis(&mut self, c: &[i32], b: &[i32]) -> Label {
        trace!("fastdiag C={c:?} B={b:?}");
        if c.is_empty() || self.checker.is_consistent(&concat(b, c), &[]) {
            return Vec::new();
        }
        let mss = self.fd(&[], c, b);
        let diag = diff(c, &mss);
        trace!("fastdiag -> {diag:?}");
        diag
    }

    /// Maximal satisfiable subset of `c` with respect to `b`. A non empty
    /// `delta` is what the caller removed from its own candidates, which makes
    /// the consistency of `b` plus `c` worth checking first.
    fn fd(&mut self, delta: &[i32], c: &[i32], b: &[i32]) -> Vec<i32> {
        trace!("fd delta={delta:?} C={c:?} B={b:?}");
        if !delta.is_empty() && self.checker.is_consistent(&concat(b, c), delta) {
            return c.to_vec();
        }
        if c.len() == 1 {
            return Vec::new();
        }
        let (c1, c2) = split(c);
        let delta1 = self.fd(c2, c1, b);
        let delta2 = self.fd(&diff(c1, &delta1), c2, &concat(b, &delta1));
        concat(&delta1, &delta2)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::SolverKind;

    fn fastdiag(kb: &[Vec<i32>]) -> FastDiag {
        FastDiag::new(ConsistencyChecker::new(SolverKind::Gipsat, kb, 0).unwrap())
    }

    #[test]
    fn scenario_diagnosis() {
        let mut fd = fastdiag(&[vec![1, -3], vec![-1, 2, -4], vec![-1, -2, -5]]);
        assert_eq!(fd.find_diagnosis(&[4, 5], &[3]), vec![5]);
        assert_eq!(fd.find_diagnosis(&[5, 4], &[3]), vec![4]);
        assert_eq!(fd.find_diagnosis(&[4, 5], &[3, 4]), vec![5]);
    }

    #[test]
    fn nothing_to_repair() {
        let mut fd = fastdiag(&[vec![1, -3], vec![-1, 2, -4], vec![-1, -2, -5]]);
        assert!(fd.find_diagnosis(&[], &[3]).is_empty());
        assert!(fd.find_diagnosis(&[4], &[3]).is_empty());
        assert_eq!(fd.checker().statistic().num_check, 1);
    }

    #[test]
    fn diagnosis_is_minimal() {
        // 2 -> x1, 3 -> !x1, 4 -> x2, 5 -> !x2, 6 is harmless
        let kb = vec![
            vec![1, -2],
            vec![-1, -3],
            vec![7, -4],
            vec![-7, -5],
            vec![1, 7, -6],
        ];
        let mut fd = fastdiag(&kb);
        let c = [2, 3, 4, 5, 6];
        let diag = fd.find_diagnosis(&c, &[]);
        assert_eq!(diag.len(), 2);
        assert!(diag.contains(&2) ^ diag.contains(&3));
        assert!(diag.contains(&4) ^ diag.contains(&5));
        let rest = diff(&c, &diag);
        assert!(fd.checker_mut().is_consistent(&rest, &[]));
    }
}
