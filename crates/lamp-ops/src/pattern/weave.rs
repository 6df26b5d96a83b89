use lamp_kernel::{Kernel, Solid};

use super::helix::helix_pipe;
use super::PatternContext;
use crate::types::OpError;

/// Helical pipes winding up the shade, crossed by counter-helices offset by
/// half a strand step.
pub(super) fn weave_cutters(
    kernel: &mut dyn Kernel,
    ctx: &PatternContext<'_>,
) -> Result<Vec<Solid>, OpError> {
    let p = ctx.params;
    if p.weave_strand_count <= 0 {
        return Ok(Vec::new());
    }
    let band = ctx.band(p.weave_margin);
    if band.1 <= band.0 {
        return Ok(Vec::new());
    }

    let pipe_radius = p.weave_pipe_radius.max(0.5 * p.shade_wall + 0.2);
    let step = 360.0 / p.weave_strand_count as f64;
    let mut cutters = Vec::new();
    for i in 0..p.weave_strand_count {
        let phase = step * i as f64;
        cutters.extend(helix_pipe(kernel, ctx, band, p.weave_turns, phase, pipe_radius)?);
        cutters.extend(helix_pipe(
            kernel,
            ctx,
            band,
            -p.weave_turns,
            phase + step / 2.0,
            pipe_radius,
        )?);
    }
    Ok(cutters)
}
