use lamp_kernel::{Kernel, Solid};
use tracing::debug;

use super::{radial_box, PatternContext};
use crate::types::OpError;

/// Evenly spaced vertical slots whose heights follow a sine wave around the
/// shade.
pub(super) fn slot_cutters(
    kernel: &mut dyn Kernel,
    ctx: &PatternContext<'_>,
) -> Result<Vec<Solid>, OpError> {
    let p = ctx.params;
    if p.slot_count <= 0 {
        return Ok(Vec::new());
    }
    let wall = p.shade_wall;
    let (lo, hi) = ctx.band(p.slot_margin);
    let body = hi - lo;
    if body <= wall {
        debug!(body, "slot band too short");
        return Ok(Vec::new());
    }

    let extent = ctx.radial_extent(p.slot_depth);
    let step = 360.0 / p.slot_count as f64;
    let mut cutters = Vec::new();
    for i in 0..p.slot_count {
        let angle = step * i as f64;
        let wave = 0.5 + 0.5 * (angle.to_radians() * p.slot_wave_frequency).sin();
        let height = (body * (1.0 - p.slot_variation * wave))
            .max(2.0 * wall)
            .min(body);
        if height <= wall {
            continue;
        }
        cutters.extend(radial_box(kernel, extent, p.slot_width, (lo, lo + height), angle)?);
    }
    Ok(cutters)
}
