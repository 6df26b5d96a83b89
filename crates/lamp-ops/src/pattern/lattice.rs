use lamp_kernel::{Kernel, Solid};
use tracing::debug;

use super::{radial_box, PatternContext};
use crate::types::OpError;

/// Rows of rectangular windows. Odd rows are staggered by a fraction of the
/// column step and every row turns a little further than the one below.
pub(super) fn lattice_cutters(
    kernel: &mut dyn Kernel,
    ctx: &PatternContext<'_>,
) -> Result<Vec<Solid>, OpError> {
    let p = ctx.params;
    if p.lattice_rows <= 0 || p.lattice_columns <= 0 {
        return Ok(Vec::new());
    }
    let wall = p.shade_wall;
    let (lo, hi) = ctx.band(p.lattice_margin);
    let available = hi - lo;
    if available <= wall {
        debug!(available, "lattice band too short");
        return Ok(Vec::new());
    }

    let row_step = available / p.lattice_rows as f64;
    let window_height = p.lattice_window_height.min(row_step * 0.85);
    if window_height <= wall {
        debug!(window_height, "lattice windows too short");
        return Ok(Vec::new());
    }

    let extent = ctx.radial_extent(p.lattice_window_depth);
    let angle_step = 360.0 / p.lattice_columns as f64;
    let mut cutters = Vec::new();
    for row in 0..p.lattice_rows {
        let center = lo + row_step * (row as f64 + 0.5);
        let z0 = (center - window_height / 2.0).max(lo);
        let z1 = (center + window_height / 2.0).min(hi);
        if z1 - z0 <= wall {
            continue;
        }

        let twist = row as f64 * p.lattice_twist_degrees;
        let offset = (row % 2) as f64 * p.lattice_offset_ratio * angle_step;
        for col in 0..p.lattice_columns {
            let angle = col as f64 * angle_step + offset + twist;
            cutters.extend(radial_box(kernel, extent, p.lattice_window_width, (z0, z1), angle)?);
        }
    }
    Ok(cutters)
}
