//! Minimal conflicts and minimal diagnoses of an inconsistent knowledge base.
//!
//! Constraints are referred to by their assumption ids. A candidate set `C`
//! holds the suspects and a background set `B` holds what is always asserted.

pub mod fastdiag;
pub mod hsdag;
pub mod quickxplain;

pub use fastdiag::FastDiag;
pub use quickxplain::QuickXPlain;

/// A minimal conflict or a minimal diagnosis, as a list of assumption ids.
pub type Label = Vec<i32>;

/// Splits `c` by index, the first half being the shorter one.
#[inline]
pub(crate) fn split(c: &[i32]) -> (&[i32], &[i32]) {
    c.split_at(c.len() / 2)
}

/// Elements of `x` not in `y`, keeping the order of `x`.
pub(crate) fn diff(x: &[i32], y: &[i32]) -> Vec<i32> {
    x.iter().filter(|e| !y.contains(e)).copied().collect()
}

#[inline]
pub(crate) fn concat(x: &[i32], y: &[i32]) -> Vec<i32> {
    let mut res = Vec::with_capacity(x.len() + y.len());
    res.extend_from_slice(x);
    res.extend_from_slice(y);
    res
}

#[inline]
pub(crate) fn is_subset(small: &[i32], big: &[i32]) -> bool {
    small.iter().all(|e| big.contains(e))
}

#[inline]
pub(crate) fn intersects(x: &[i32], y: &[i32]) -> bool {
    x.iter().any(|e| y.contains(e))
}

/// Order independent key of a set of ids.
#[inline]
pub(crate) fn set_key(x: &[i32]) -> Vec<i32> {
    let mut key = x.to_vec();
    key.sort_unstable();
    key
}
