use lamp_kernel::{Kernel, OrNull, Solid};
use tracing::debug;

use super::{polar, PatternContext};
use crate::types::OpError;

/// Rows of spherical holes centered in the wall. Odd rows are staggered,
/// each row is turned by the row twist, and hole size swells and shrinks row
/// by row.
pub(super) fn bubble_cutters(
    kernel: &mut dyn Kernel,
    ctx: &PatternContext<'_>,
) -> Result<Vec<Solid>, OpError> {
    let p = ctx.params;
    if p.bubble_rows <= 0 || p.bubble_columns <= 0 {
        return Ok(Vec::new());
    }
    let (lo, hi) = ctx.band(p.bubble_margin);
    if hi <= lo {
        return Ok(Vec::new());
    }

    let row_step = (hi - lo) / p.bubble_rows as f64;
    let angle_step = 360.0 / p.bubble_columns as f64;
    let mut cutters = Vec::new();
    for row in 0..p.bubble_rows {
        let r = row as f64;
        let swell = 0.5 + 0.5 * (r * p.bubble_wave_frequency).sin();
        let size = (p.bubble_radius * (1.0 - p.bubble_radius_variation * swell))
            .max(0.8 * p.shade_wall);
        let z = lo + row_step * (r + 0.5);
        if z - size < lo || z + size > hi {
            debug!(row, size, "bubble row leaves band");
            continue;
        }

        let radius = ctx.mid_wall_radius_at(z);
        let offset = (row % 2) as f64 * p.bubble_offset_ratio * angle_step;
        let twist = r * p.bubble_twist_degrees;
        for col in 0..p.bubble_columns {
            let angle = col as f64 * angle_step + offset + twist;
            cutters.extend(kernel.add_sphere(polar(radius, angle, z), size).or_null()?);
        }
    }
    Ok(cutters)
}
