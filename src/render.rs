use rayon::prelude::*;

use crate::percolation::{Percolation, SiteState};

const BLOCKED: [u8; 4] = [24, 24, 28, 255];
const OPEN: [u8; 4] = [250, 250, 250, 255];
const FULL: [u8; 4] = [108, 180, 238, 255];

#[inline]
fn site_color(state: SiteState) -> [u8; 4] {
    match state {
        SiteState::Blocked => BLOCKED,
        SiteState::Open => OPEN,
        SiteState::Full => FULL,
    }
}

/// Render each site as a `cell_px` square. Output is `(n * cell_px)^2` RGBA pixels.
pub fn render_sites(perc: &Percolation, cell_px: usize) -> Vec<u8> {
    let n = perc.size();
    let cell_px = cell_px.max(1);
    let w = n * cell_px;

    let colors: Vec<[u8; 4]> = perc.sites().map(|(_, _, s)| site_color(s)).collect();

    let mut rgba = vec![0u8; w * w * 4];
    rgba.par_chunks_mut(w * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let site_row = y / cell_px;
            for x in 0..w {
                let color = colors[site_row * n + x / cell_px];
                row[x * 4..x * 4 + 4].copy_from_slice(&color);
            }
        });

    rgba
}

/// Pixel side length of a rendered grid.
#[inline]
pub fn image_side(perc: &Percolation, cell_px: usize) -> usize {
    perc.size() * cell_px.max(1)
}
