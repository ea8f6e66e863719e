use std::collections::TryReserveError;

use crate::error::PercolationError;

/// Weighted quick-union over the labels `0..len`.
///
/// Roots absorb the smaller tree, so any parent chain is at most log2(len)
/// links long. `merge` additionally halves the paths it walks; `connected`
/// only reads, which keeps queries on `&self`.
#[derive(Clone, Debug)]
pub struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<u32>,
    count: usize,
}

impl DisjointSet {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
            count: len,
        }
    }

    /// Like `new`, but reports allocation failure instead of aborting.
    pub fn try_new(len: usize) -> Result<Self, TryReserveError> {
        let mut parent = Vec::new();
        parent.try_reserve_exact(len)?;
        parent.extend(0..len);
        let mut size = Vec::new();
        size.try_reserve_exact(len)?;
        size.resize(len, 1);
        Ok(Self {
            parent,
            size,
            count: len,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of disjoint sets currently in the partition.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    fn check(&self, label: usize) -> Result<(), PercolationError> {
        if label < self.parent.len() {
            Ok(())
        } else {
            Err(PercolationError::LabelOutOfRange {
                label,
                len: self.parent.len(),
            })
        }
    }

    /// Root of the set containing `x`, halving the path on the way up.
    pub fn find(&mut self, x: usize) -> Result<usize, PercolationError> {
        self.check(x)?;
        Ok(self.find_halving(x))
    }

    fn find_halving(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            let grandparent = self.parent[self.parent[x]];
            self.parent[x] = grandparent;
            x = grandparent;
        }
        x
    }

    fn root(&self, mut x: usize) -> usize {
        while self.parent[x] != x {
            x = self.parent[x];
        }
        x
    }

    /// Join the sets containing `a` and `b`. Already joined (or `a == b`) is a no-op.
    pub fn merge(&mut self, a: usize, b: usize) -> Result<(), PercolationError> {
        self.check(a)?;
        self.check(b)?;

        let ra = self.find_halving(a);
        let rb = self.find_halving(b);
        if ra == rb {
            return Ok(());
        }

        // Smaller tree hangs under the larger root
        let (small, large) = if self.size[ra] < self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = large;
        self.size[large] += self.size[small];
        self.count -= 1;
        Ok(())
    }

    pub fn connected(&self, a: usize, b: usize) -> Result<bool, PercolationError> {
        self.check(a)?;
        self.check(b)?;
        Ok(self.same_set(a, b))
    }

    /// `connected` for labels the caller has already range-checked.
    /// Panics on an out-of-range label.
    #[inline]
    pub(crate) fn same_set(&self, a: usize, b: usize) -> bool {
        self.root(a) == self.root(b)
    }
}
