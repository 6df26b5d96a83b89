use lamp_kernel::{Kernel, OrNull, Solid, SurfaceDirection};
use tracing::debug;

use super::PatternContext;
use crate::types::OpError;

/// Spheres scattered over the lofted outer surface and pushed out along its
/// normal.
///
/// Samples sit on a `rows x columns` grid in the surface's parameter domain.
/// Each row is twisted around, each sample jitters sideways ("mangle") and
/// outward, and sample size swells along the grid diagonals. Without a
/// pattern surface there is nothing to sample.
pub(super) fn blob_cutters(
    kernel: &mut dyn Kernel,
    ctx: &PatternContext<'_>,
) -> Result<Vec<Solid>, OpError> {
    let p = ctx.params;
    let Some(surface) = ctx.pattern_surface else {
        debug!("no pattern surface, blobtrude skipped");
        return Ok(Vec::new());
    };
    if p.blob_rows <= 0 || p.blob_columns <= 0 {
        return Ok(Vec::new());
    }
    let Some((u0, u1)) = kernel.surface_domain(surface, SurfaceDirection::U).or_null()? else {
        return Ok(Vec::new());
    };
    let Some((v0, v1)) = kernel.surface_domain(surface, SurfaceDirection::V).or_null()? else {
        return Ok(Vec::new());
    };
    let (lo, hi) = ctx.band(p.blob_margin);

    let rows = p.blob_rows as f64;
    let columns = p.blob_columns as f64;
    // Twist in degrees, measured in column steps.
    let twist_columns = p.blob_twist_degrees * columns / 360.0;
    let mut cutters = Vec::new();
    for row in 0..p.blob_rows {
        let r = row as f64;
        let v = v0 + (r + 0.5) / rows * (v1 - v0);
        for col in 0..p.blob_columns {
            let c = col as f64;
            let mangle = p.blob_mangle * ((r * 2.0 + c) * 1.3).sin();
            let frac = ((c + r * twist_columns + mangle) / columns).rem_euclid(1.0);
            let u = u0 + frac * (u1 - u0);

            let Some(point) = kernel.evaluate_surface(surface, u, v).or_null()? else {
                continue;
            };
            let Some(normal) = kernel.surface_normal(surface, u, v).or_null()? else {
                continue;
            };
            let push = p.blob_offset + p.blob_jitter * ((r + c) * 0.8).cos();
            let center = [
                point[0] + normal[0] * push,
                point[1] + normal[1] * push,
                point[2] + normal[2] * push,
            ];
            if center[2] < lo || center[2] > hi {
                continue;
            }

            let swell = 0.5 + 0.5 * ((r * 1.1 + c) * p.blob_wave_frequency).sin();
            let size = p.blob_radius * (1.0 - p.blob_radius_variation * swell);
            cutters.extend(kernel.add_sphere(center, size).or_null()?);
        }
    }
    Ok(cutters)
}
