use logicrs::{Lit, LitVec};
use std::ops::{Deref, DerefMut, Index, IndexMut};

pub type CRef = u32;
pub const CREF_NONE: CRef = u32::MAX;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClauseKind {
    Origin,
    Learnt,
}

pub struct Clause {
    lits: LitVec,
    pub kind: ClauseKind,
    pub act: f32,
    pub removed: bool,
}

impl Deref for Clause {
    type Target = [Lit];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.lits
    }
}

impl DerefMut for Clause {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.lits
    }
}

pub struct ClauseDB {
    clauses: Vec<Clause>,
    learnt: Vec<CRef>,
    num_origin: usize,
    act_inc: f32,
}

impl Default for ClauseDB {
    fn default() -> Self {
        Self {
            clauses: Vec::new(),
            learnt: Vec::new(),
            num_origin: 0,
            act_inc: 1.0,
        }
    }
}

impl ClauseDB {
    pub fn alloc(&mut self, lits: &[Lit], kind: ClauseKind) -> CRef {
        debug_assert!(lits.len() >= 2);
        let cref = self.clauses.len() as CRef;
        self.clauses.push(Clause {
            lits: LitVec::from(lits),
            kind,
            act: 0.0,
            removed: false,
        });
        match kind {
            ClauseKind::Origin => self.num_origin += 1,
            ClauseKind::Learnt => self.learnt.push(cref),
        }
        cref
    }

    #[inline]
    pub fn num_origin(&self) -> usize {
        self.num_origin
    }

    #[inline]
    pub fn num_learnt(&self) -> usize {
        self.learnt.len()
    }

    pub fn bump(&mut self, cref: CRef) {
        let cls = &mut self.clauses[cref as usize];
        cls.act += self.act_inc;
        if cls.act > 1e20 {
            for &l in self.learnt.iter() {
                self.clauses[l as usize].act *= 1e-20;
            }
            self.act_inc *= 1e-20;
        }
    }

    #[inline]
    pub fn decay(&mut self) {
        self.act_inc /= 0.999;
    }

    /// Learnt clauses ordered by increasing activity.
    pub fn learnt_by_activity(&self) -> Vec<CRef> {
        let mut learnt = self.learnt.clone();
        learnt.sort_by(|a, b| {
            self.clauses[*a as usize]
                .act
                .total_cmp(&self.clauses[*b as usize].act)
        });
        learnt
    }

    /// Watchers of a removed clause are dropped lazily during propagation.
    pub fn remove(&mut self, cref: CRef) {
        self.clauses[cref as usize].removed = true;
    }

    pub fn clean_learnt(&mut self) {
        let clauses = &self.clauses;
        self.learnt.retain(|c| !clauses[*c as usize].removed);
    }
}

impl Index<CRef> for ClauseDB {
    type Output = Clause;

    #[inline]
    fn index(&self, cref: CRef) -> &Self::Output {
        &self.clauses[cref as usize]
    }
}

impl IndexMut<CRef> for ClauseDB {
    #[inline]
    fn index_mut(&mut self, cref: CRef) -> &mut Self::Output {
        &mut self.clauses[cref as usize]
    }
}
