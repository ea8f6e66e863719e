use std::collections::TryReserveError;

/// Row-major flat grid. No per-cell objects.
/// Bounded topology: edges do not wrap.
#[derive(Clone, Debug)]
pub struct Grid<T> {
    pub data: Vec<T>,
    pub w: usize,
    pub h: usize,
}

impl<T: Copy + Default> Grid<T> {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            data: vec![T::default(); w * h],
            w,
            h,
        }
    }

    /// Like `new`, but reports allocation failure instead of aborting.
    pub fn try_new(w: usize, h: usize) -> Result<Self, TryReserveError> {
        let len = w.checked_mul(h).unwrap_or(usize::MAX);
        let mut data = Vec::new();
        data.try_reserve_exact(len)?;
        data.resize(len, T::default());
        Ok(Self { data, w, h })
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.w && y < self.h);
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }
}

/// 4-connected neighbors that lie inside a `w` x `h` grid.
pub fn neighbors4(x: usize, y: usize, w: usize, h: usize) -> impl Iterator<Item = (usize, usize)> {
    let offsets: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
    let mut out = [(0usize, 0usize); 4];
    let mut n = 0;
    for (dx, dy) in offsets {
        let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
            continue;
        };
        if nx < w && ny < h {
            out[n] = (nx, ny);
            n += 1;
        }
    }
    out.into_iter().take(n)
}
