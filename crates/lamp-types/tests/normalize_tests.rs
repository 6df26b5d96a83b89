use approx::{assert_abs_diff_eq, assert_relative_eq};
use proptest::prelude::*;

use lamp_types::{normalize, BaseType, LampParams};

const TOL: f64 = 1e-9;

// ── Scenarios ──────────────────────────────────────────────────────────────

#[test]
fn cube_lamp_keeps_wide_neck() {
    let mut params = LampParams {
        base_type: BaseType::Cube,
        base_width: 80.0,
        base_depth: 80.0,
        base_height: 60.0,
        neck_outer_radius: 24.0,
        neck_height: 12.0,
        cord_diameter: 7.0,
        bulb_diameter: 28.0,
        port_clearance: 2.0,
        ..LampParams::default()
    };
    let port_radius = normalize(&mut params);
    assert_eq!(port_radius, 16.0);
    assert_eq!(params.neck_outer_radius, 24.0);
}

#[test]
fn undersized_neck_raised_to_wall_minimum() {
    let mut params = LampParams {
        neck_outer_radius: 10.0,
        neck_wall_min: 2.4,
        cord_diameter: 7.0,
        bulb_diameter: 28.0,
        port_clearance: 2.0,
        ..LampParams::default()
    };
    let port_radius = normalize(&mut params);
    assert_eq!(port_radius, 16.0);
    assert_relative_eq!(params.neck_outer_radius, 18.4);
}

#[test]
fn short_shade_collapses_sleeve_range_to_neck_height() {
    let mut params = LampParams {
        shade_height: 10.0,
        neck_height: 14.0,
        shade_wall: 2.4,
        ..LampParams::default()
    };
    normalize(&mut params);
    assert_relative_eq!(params.shade_height, 18.8);
    assert_abs_diff_eq!(params.sleeve_height, 14.0, epsilon = TOL);
}

#[test]
fn sleeve_inner_radius_clears_neck_by_tolerance() {
    let mut params = LampParams {
        neck_outer_radius: 10.0,
        tolerance: 0.25,
        ..LampParams::default()
    };
    normalize(&mut params);
    assert_abs_diff_eq!(
        params.sleeve_inner_radius() - params.neck_outer_radius,
        0.25,
        epsilon = TOL
    );
}

#[test]
fn port_radius_tracks_cord_when_it_is_wider() {
    let mut params = LampParams {
        neck_outer_radius: 20.0,
        cord_diameter: 40.0,
        bulb_diameter: 10.0,
        port_clearance: 1.0,
        ..LampParams::default()
    };
    let port_radius = normalize(&mut params);
    assert_eq!(port_radius, 21.0);
    assert_relative_eq!(params.neck_outer_radius, 23.4);
}

// ── Properties ─────────────────────────────────────────────────────────────

fn arb_params() -> impl Strategy<Value = LampParams> {
    (
        (0.5f64..60.0, 0.5f64..40.0, 0.5f64..5.0, 0.0f64..2.0),
        (0.0f64..20.0, 0.0f64..60.0, 0.0f64..5.0),
        (1.0f64..250.0, 1.0f64..120.0, 0.5f64..6.0, 0.0f64..200.0),
        (-5i64..40, -5i64..12, -1.0f64..2.0, -0.5f64..1.0),
    )
        .prop_map(
            |(
                (neck_outer_radius, neck_height, neck_wall_min, tolerance),
                (cord_diameter, bulb_diameter, port_clearance),
                (shade_height, shade_outer_radius, shade_wall, sleeve_height),
                (slot_count, lattice_rows, bubble_offset_ratio, spiral_wave_amp),
            )| LampParams {
                neck_outer_radius,
                neck_height,
                neck_wall_min,
                tolerance,
                cord_diameter,
                bulb_diameter,
                port_clearance,
                shade_height,
                shade_outer_radius,
                shade_wall,
                sleeve_height,
                slot_count,
                lattice_rows,
                bubble_offset_ratio,
                spiral_wave_amp,
                ..LampParams::default()
            },
        )
}

proptest! {
    #[test]
    fn fit_gap_equals_tolerance(mut params in arb_params()) {
        normalize(&mut params);
        let gap = params.sleeve_inner_radius() - params.neck_outer_radius;
        prop_assert!((gap - params.tolerance).abs() < TOL, "gap {} != tolerance {}", gap, params.tolerance);
    }

    #[test]
    fn port_clears_neck_wall(mut params in arb_params()) {
        let port_radius = normalize(&mut params);
        prop_assert!(port_radius <= params.neck_outer_radius - params.neck_wall_min + TOL);
    }

    #[test]
    fn shade_encloses_neck_and_gap(mut params in arb_params()) {
        normalize(&mut params);
        let minimum = params.neck_outer_radius + params.tolerance + params.shade_wall;
        prop_assert!(params.shade_outer_radius >= minimum - TOL);
        prop_assert!(params.shade_height >= params.neck_height + 2.0 * params.shade_wall - TOL);
    }

    #[test]
    fn sleeve_within_neck_and_lip(mut params in arb_params()) {
        normalize(&mut params);
        prop_assert!(params.sleeve_height >= params.neck_height - TOL);
        prop_assert!(params.sleeve_height <= params.shade_height - 2.0 * params.shade_wall + TOL);
    }

    #[test]
    fn normalization_is_idempotent(mut params in arb_params()) {
        let first_port = normalize(&mut params);
        let once = params.clone();
        let second_port = normalize(&mut params);
        prop_assert_eq!(first_port, second_port);
        prop_assert_eq!(once, params);
    }

    #[test]
    fn counts_and_ratios_saturate(mut params in arb_params()) {
        normalize(&mut params);
        prop_assert!(params.slot_count >= 0);
        prop_assert!(params.lattice_rows >= 0);
        prop_assert!((0.0..=1.0).contains(&params.bubble_offset_ratio));
        prop_assert!((0.02..=0.45).contains(&params.spiral_wave_amp));
    }
}
