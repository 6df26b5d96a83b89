use std::f64::consts::TAU;

use lamp_kernel::{Kernel, OrNull, Point3, Solid};

use super::PatternContext;
use crate::types::OpError;

const SEGMENTS_PER_TURN: f64 = 48.0;
const MIN_SEGMENTS: usize = 12;

/// Sample a helix around the Z axis from `z0` to `z1`.
///
/// The helix starts at `phase_degrees` and sweeps `turns` full revolutions;
/// negative turns wind clockwise. Each sample sits at `radius_at(z)` for its
/// own height, so the helix can follow a tapering wall.
pub fn helix_points(
    z0: f64,
    z1: f64,
    turns: f64,
    phase_degrees: f64,
    radius_at: impl Fn(f64) -> f64,
) -> Vec<Point3> {
    let segments = ((turns.abs() * SEGMENTS_PER_TURN).ceil() as usize).max(MIN_SEGMENTS);
    let phase = phase_degrees.to_radians();
    (0..=segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            let angle = phase + t * TAU * turns;
            let z = z0 + t * (z1 - z0);
            let radius = radius_at(z);
            [radius * angle.cos(), radius * angle.sin(), z]
        })
        .collect()
}

/// Round pipe of `pipe_radius` swept along a mid-wall helix; the rail is
/// consumed.
pub(super) fn helix_pipe(
    kernel: &mut dyn Kernel,
    ctx: &PatternContext<'_>,
    (z0, z1): (f64, f64),
    turns: f64,
    phase_degrees: f64,
    pipe_radius: f64,
) -> Result<Option<Solid>, OpError> {
    let points = helix_points(z0, z1, turns, phase_degrees, |z| ctx.mid_wall_radius_at(z));
    let Some(rail) = kernel.add_polyline(&points).or_null()? else {
        return Ok(None);
    };
    Ok(kernel.pipe(rail, pipe_radius, true).or_null()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_segment_count_follows_turns() {
        assert_eq!(helix_points(0.0, 1.0, 1.5, 0.0, |_| 10.0).len(), 72 + 1);
        assert_eq!(helix_points(0.0, 1.0, -1.5, 0.0, |_| 10.0).len(), 72 + 1);
        assert_eq!(helix_points(0.0, 1.0, 0.1, 0.0, |_| 10.0).len(), MIN_SEGMENTS + 1);
    }

    #[test]
    fn test_helix_endpoints() {
        let pts = helix_points(5.0, 25.0, 1.0, 90.0, |_| 10.0);
        let first = pts[0];
        let last = pts[pts.len() - 1];
        assert_abs_diff_eq!(first[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(first[1], 10.0, epsilon = 1e-9);
        assert_eq!(first[2], 5.0);
        // A whole turn lands back over the start.
        assert_abs_diff_eq!(last[0], first[0], epsilon = 1e-9);
        assert_abs_diff_eq!(last[1], first[1], epsilon = 1e-9);
        assert_abs_diff_eq!(last[2], 25.0, epsilon = 1e-12);
    }

    #[test]
    fn test_counter_helix_winds_clockwise() {
        let pts = helix_points(0.0, 10.0, -0.25, 0.0, |_| 10.0);
        // A quarter turn clockwise from +X heads toward -Y.
        let last = pts[pts.len() - 1];
        assert_abs_diff_eq!(last[1], -10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_samples_follow_radius_of_their_height() {
        let pts = helix_points(0.0, 40.0, 2.0, 0.0, |z| 50.0 - z / 4.0);
        for p in &pts {
            let radius = p[0].hypot(p[1]);
            assert_abs_diff_eq!(radius, 50.0 - p[2] / 4.0, epsilon = 1e-9);
        }
        assert_abs_diff_eq!(pts[pts.len() - 1][0], 40.0, epsilon = 1e-9);
    }
}
