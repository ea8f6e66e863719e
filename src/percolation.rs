use crate::error::PercolationError;
use crate::grid::{Grid, neighbors4};
use crate::union_find::DisjointSet;

/// Label of the virtual site joined to every open top-row site.
const VIRTUAL_TOP: usize = 0;

/// Largest accepted side length. Keeps `n * n + 2` labels inside the `u32`
/// set sizes of `DisjointSet`.
pub const MAX_SIZE: usize = 1 << 15;

/// Check a requested side length without allocating anything.
pub fn validate_size(n: i64) -> Result<usize, PercolationError> {
    usize::try_from(n)
        .ok()
        .filter(|&side| (1..=MAX_SIZE).contains(&side))
        .ok_or(PercolationError::InvalidSize { n })
}

/// Observable state of one site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SiteState {
    Blocked,
    Open,
    Full,
}

/// N-by-N percolation system.
///
/// Sites are labelled `row * n + col + 1`. Label 0 is virtual-top in both
/// structures; `n * n + 1` is virtual-bottom and exists only in `uf`.
///
/// `uf` answers `percolates`. `top_only` never sees virtual-bottom, so a
/// bottom-row site cannot become full by flowing back through it.
#[derive(Clone, Debug)]
pub struct Percolation {
    n: usize,
    open: Grid<bool>,
    uf: DisjointSet,
    top_only: DisjointSet,
    open_count: usize,
}

impl Percolation {
    /// All sites start blocked. Fails unless `0 < n <= MAX_SIZE` and the
    /// grid can be allocated.
    pub fn new(n: i64) -> Result<Self, PercolationError> {
        let side = validate_size(n)?;
        let too_large = |_| PercolationError::InvalidSize { n };
        let sites = side * side;
        Ok(Self {
            n: side,
            open: Grid::try_new(side, side).map_err(too_large)?,
            uf: DisjointSet::try_new(sites + 2).map_err(too_large)?,
            top_only: DisjointSet::try_new(sites + 1).map_err(too_large)?,
            open_count: 0,
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    fn virtual_bottom(&self) -> usize {
        self.n * self.n + 1
    }

    /// Bounds check shared by every public entry point.
    fn validate(&self, row: i64, col: i64) -> Result<(usize, usize), PercolationError> {
        let in_range = |v: i64| usize::try_from(v).ok().filter(|&v| v < self.n);
        match (in_range(row), in_range(col)) {
            (Some(r), Some(c)) => Ok((r, c)),
            _ => Err(PercolationError::OutOfBounds {
                row,
                col,
                n: self.n,
            }),
        }
    }

    /// Coordinates must already be validated; the result is always a valid
    /// label in both structures.
    #[inline]
    fn label(&self, row: usize, col: usize) -> usize {
        row * self.n + col + 1
    }

    /// Open the site at (`row`, `col`) and join it to its open neighbours.
    pub fn open(&mut self, row: i64, col: i64) -> Result<(), PercolationError> {
        let (r, c) = self.validate(row, col)?;
        if self.open.get(c, r) {
            // Unions were made when it was first opened
            return Ok(());
        }
        self.open.set(c, r, true);
        self.open_count += 1;

        let site = self.label(r, c);
        if r == 0 {
            self.uf.merge(site, VIRTUAL_TOP)?;
            self.top_only.merge(site, VIRTUAL_TOP)?;
        }
        if r == self.n - 1 {
            let bottom = self.virtual_bottom();
            self.uf.merge(site, bottom)?;
        }
        for (nc, nr) in neighbors4(c, r, self.n, self.n) {
            if self.open.get(nc, nr) {
                let neighbour = self.label(nr, nc);
                self.uf.merge(site, neighbour)?;
                self.top_only.merge(site, neighbour)?;
            }
        }
        Ok(())
    }

    pub fn is_open(&self, row: i64, col: i64) -> Result<bool, PercolationError> {
        let (r, c) = self.validate(row, col)?;
        Ok(self.open.get(c, r))
    }

    /// An open site reachable from the top row through open sites.
    pub fn is_full(&self, row: i64, col: i64) -> Result<bool, PercolationError> {
        let (r, c) = self.validate(row, col)?;
        Ok(self.full_at(r, c))
    }

    fn full_at(&self, r: usize, c: usize) -> bool {
        if !self.open.get(c, r) {
            return false;
        }
        let site = self.label(r, c);
        self.uf.same_set(VIRTUAL_TOP, site) && self.top_only.same_set(VIRTUAL_TOP, site)
    }

    #[inline]
    pub fn number_of_open_sites(&self) -> usize {
        self.open_count
    }

    /// Fraction of all sites that are open.
    pub fn open_fraction(&self) -> f64 {
        self.open_count as f64 / (self.n * self.n) as f64
    }

    pub fn percolates(&self) -> bool {
        let bottom = self.virtual_bottom();
        debug_assert_eq!(bottom + 1, self.uf.len());
        self.uf.same_set(VIRTUAL_TOP, bottom)
    }

    /// Every site in row-major order as `(row, col, state)`.
    pub fn sites(&self) -> impl Iterator<Item = (usize, usize, SiteState)> + '_ {
        (0..self.n * self.n).map(move |i| {
            let (r, c) = (i / self.n, i % self.n);
            let state = if self.full_at(r, c) {
                SiteState::Full
            } else if self.open.get(c, r) {
                SiteState::Open
            } else {
                SiteState::Blocked
            };
            (r, c, state)
        })
    }
}
