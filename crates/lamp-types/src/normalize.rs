//! Parameter normalization: turns user input into a geometrically feasible set.
//!
//! Steps run in dependency order and each only reads values finalized by the
//! steps before it. Nothing here fails; infeasible input is clamped.

use tracing::{debug, info, instrument};

use crate::params::LampParams;

/// Normalize `params` in place and return the port radius.
///
/// After this returns:
/// - `neck_outer_radius >= port_radius + neck_wall_min`
/// - `shade_outer_radius >= neck_outer_radius + tolerance + shade_wall`
/// - `shade_height >= neck_height + 2 * shade_wall`
/// - `neck_height <= sleeve_height <= shade_height - 2 * shade_wall`
///
/// The sleeve clamp applies the floor before the ceiling. Step 4 keeps the
/// ceiling at or above the floor, so the floor-first order only decides the
/// result for non-finite input.
#[instrument(skip_all)]
pub fn normalize(params: &mut LampParams) -> f64 {
    // 1. Port bore.
    let port_radius = params.port_radius();

    // 2. Neck wall around the port.
    let min_neck_outer = port_radius + params.neck_wall_min;
    raise_to(&mut params.neck_outer_radius, min_neck_outer, "neck_outer_radius");

    // 3. Shade must clear the neck, the fit gap and its own wall.
    let min_shade_outer = params.neck_outer_radius + params.tolerance + params.shade_wall;
    raise_to(&mut params.shade_outer_radius, min_shade_outer, "shade_outer_radius");

    // 4. Shade tall enough to hold the neck plus a floor and a lip.
    let min_shade_height = params.neck_height + params.shade_wall * 2.0;
    raise_to(&mut params.shade_height, min_shade_height, "shade_height");

    // 5. Sleeve between the neck height and the usable shade height.
    raise_to(&mut params.sleeve_height, params.neck_height, "sleeve_height");
    let max_sleeve = params.shade_height - params.shade_wall * 2.0;
    if params.sleeve_height > max_sleeve {
        debug!(from = params.sleeve_height, to = max_sleeve, "lowering sleeve_height");
        params.sleeve_height = max_sleeve;
    }

    // 6. Counts and ratios.
    coerce_counts(params);
    coerce_ratios(params);

    info!(
        port_radius,
        neck_outer_radius = params.neck_outer_radius,
        shade_outer_radius = params.shade_outer_radius,
        shade_height = params.shade_height,
        sleeve_height = params.sleeve_height,
        "parameters normalized"
    );
    port_radius
}

fn raise_to(value: &mut f64, minimum: f64, name: &str) {
    if *value < minimum || value.is_nan() {
        debug!(param = name, from = *value, to = minimum, "raising to minimum");
        *value = minimum;
    }
}

fn at_least(value: &mut i64, minimum: i64) {
    *value = (*value).max(minimum);
}

fn within(value: &mut f64, lo: f64, hi: f64) {
    *value = value.max(lo).min(hi);
}

fn coerce_counts(p: &mut LampParams) {
    at_least(&mut p.twisted_sides, 3);
    at_least(&mut p.twisted_layers, 1);
    at_least(&mut p.spiral_waves, 1);
    at_least(&mut p.spiral_points_per_wave, 6);
    at_least(&mut p.spiral_layers, 1);
    at_least(&mut p.ripple_waves, 1);
    at_least(&mut p.ripple_points_per_wave, 6);
    at_least(&mut p.ripple_layers, 1);
    at_least(&mut p.shade_loft_bottom_sides, 3);
    at_least(&mut p.shade_loft_top_sides, 3);

    // Zero is meaningful for pattern counts: it disables the pattern.
    at_least(&mut p.slot_count, 0);
    at_least(&mut p.lattice_rows, 0);
    at_least(&mut p.lattice_columns, 0);
    at_least(&mut p.weave_strand_count, 0);
    at_least(&mut p.moire_strand_count, 0);
    at_least(&mut p.moire_rings, 0);
    at_least(&mut p.bubble_rows, 0);
    at_least(&mut p.bubble_columns, 0);
    at_least(&mut p.blob_rows, 0);
    at_least(&mut p.blob_columns, 0);
}

fn coerce_ratios(p: &mut LampParams) {
    within(&mut p.twisted_top_scale, 0.2, 2.0);
    within(&mut p.spiral_wave_amp, 0.02, 0.45);
    within(&mut p.spiral_top_scale, 0.2, 2.0);
    within(&mut p.ripple_wave_amp, 0.02, 0.45);
    within(&mut p.ripple_top_scale, 0.2, 2.0);
    within(&mut p.shade_loft_top_scale, 0.5, 1.5);
    within(&mut p.slot_variation, 0.0, 0.95);
    within(&mut p.lattice_offset_ratio, 0.0, 1.0);
    within(&mut p.bubble_offset_ratio, 0.0, 1.0);
    within(&mut p.bubble_radius_variation, 0.0, 0.9);
    within(&mut p.blob_mangle, 0.0, 1.0);
    within(&mut p.blob_radius_variation, 0.0, 0.9);
}
