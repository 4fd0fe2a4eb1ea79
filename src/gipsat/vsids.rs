use logicrs::{Var, VarMap};
use rand::{Rng, rngs::StdRng};

/// Variable activities with a max-heap of branching candidates.
pub struct Vsids {
    activity: VarMap<f64>,
    heap: Vec<Var>,
    pos: VarMap<Option<u32>>,
    act_inc: f64,
}

impl Default for Vsids {
    fn default() -> Self {
        Self {
            activity: VarMap::new(),
            heap: Vec::new(),
            pos: VarMap::new(),
            act_inc: 1.0,
        }
    }
}

impl Vsids {
    #[inline]
    pub fn reserve(&mut self, var: Var) {
        self.activity.reserve(var);
        self.pos.reserve(var);
    }

    #[inline]
    fn in_heap(&self, var: Var) -> bool {
        self.pos[var].is_some()
    }

    #[inline]
    fn higher(&self, a: Var, b: Var) -> bool {
        self.activity[a] > self.activity[b]
    }

    fn up(&mut self, mut i: usize) {
        let v = self.heap[i];
        while i > 0 {
            let parent = (i - 1) >> 1;
            if !self.higher(v, self.heap[parent]) {
                break;
            }
            self.heap[i] = self.heap[parent];
            self.pos[self.heap[i]] = Some(i as u32);
            i = parent;
        }
        self.heap[i] = v;
        self.pos[v] = Some(i as u32);
    }

    fn down(&mut self, mut i: usize) {
        let v = self.heap[i];
        loop {
            let left = 2 * i + 1;
            if left >= self.heap.len() {
                break;
            }
            let right = left + 1;
            let child = if right < self.heap.len() && self.higher(self.heap[right], self.heap[left])
            {
                right
            } else {
                left
            };
            if !self.higher(self.heap[child], v) {
                break;
            }
            self.heap[i] = self.heap[child];
            self.pos[self.heap[i]] = Some(i as u32);
            i = child;
        }
        self.heap[i] = v;
        self.pos[v] = Some(i as u32);
    }

    pub fn push(&mut self, var: Var) {
        if self.in_heap(var) {
            return;
        }
        self.heap.push(var);
        self.up(self.heap.len() - 1);
    }

    pub fn pop(&mut self) -> Option<Var> {
        let top = *self.heap.first()?;
        let last = self.heap.pop()?;
        self.pos[top] = None;
        if !self.heap.is_empty() {
            self.heap[0] = last;
            self.pos[last] = Some(0);
            self.down(0);
        }
        Some(top)
    }

    /// Any candidate, without removing it.
    pub fn random(&self, rng: &mut StdRng) -> Option<Var> {
        if self.heap.is_empty() {
            return None;
        }
        Some(self.heap[rng.random_range(0..self.heap.len())])
    }

    pub fn bump(&mut self, var: Var) {
        self.activity[var] += self.act_inc;
        if self.activity[var] > 1e100 {
            for a in self.activity.iter_mut() {
                *a *= 1e-100;
            }
            self.act_inc *= 1e-100;
        }
        if let Some(pos) = self.pos[var] {
            self.up(pos as usize);
        }
    }

    #[inline]
    pub fn decay(&mut self) {
        self.act_inc /= 0.95;
    }
}
