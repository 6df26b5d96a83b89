use lamp_kernel::{Kernel, OrNull, Solid};

use super::helix::helix_pipe;
use super::PatternContext;
use crate::types::OpError;

/// Interfering helix families plus horizontal ring accents.
///
/// Per strand: a primary helix, its counter-helix, and a thinner secondary
/// helix at a different turn rate offset by a quarter step. The rings are
/// tori spread evenly through the band.
pub(super) fn moire_cutters(
    kernel: &mut dyn Kernel,
    ctx: &PatternContext<'_>,
) -> Result<Vec<Solid>, OpError> {
    let p = ctx.params;
    let strands = p.moire_strand_count.max(0);
    let rings = p.moire_rings.max(0);
    if strands == 0 && rings == 0 {
        return Ok(Vec::new());
    }
    let band = ctx.band(p.moire_margin);
    let (lo, hi) = band;
    if hi <= lo {
        return Ok(Vec::new());
    }

    let pipe_radius = p.moire_pipe_radius.max(0.45 * p.shade_wall + 0.15);
    let mut cutters = Vec::new();

    if strands > 0 {
        let step = 360.0 / strands as f64;
        for i in 0..strands {
            let phase = step * i as f64;
            cutters.extend(helix_pipe(kernel, ctx, band, p.moire_turns, phase, pipe_radius)?);
            cutters.extend(helix_pipe(kernel, ctx, band, -p.moire_turns, phase, pipe_radius)?);
            cutters.extend(helix_pipe(
                kernel,
                ctx,
                band,
                p.moire_secondary_turns,
                phase + 0.25 * step,
                // Secondary strands are three quarters of the floored primary pipe.
                0.75 * pipe_radius,
            )?);
        }
    }

    let ring_radius = p.moire_ring_radius.max(0.6);
    for k in 0..rings {
        let z = lo + (k + 1) as f64 * (hi - lo) / (rings + 1) as f64;
        let radius = ctx.mid_wall_radius_at(z);
        cutters.extend(kernel.add_torus([0.0, 0.0, z], radius, ring_radius).or_null()?);
    }
    Ok(cutters)
}
