use approx::assert_abs_diff_eq;
use lamp_kernel::{Kernel, KernelOpKind, MockKernel, Solid};
use lamp_ops::{apply_pattern, build_shade, generate_cutters, PatternContext, ShadeShell};
use lamp_types::{normalize, LampParams, ShadeForm, ShadePattern};

const BASE_HEIGHT: f64 = 60.0;

fn params_with(pattern: ShadePattern) -> LampParams {
    let mut params = LampParams {
        shade_pattern: pattern,
        ..LampParams::default()
    };
    normalize(&mut params);
    params
}

fn context<'a>(params: &'a LampParams, shell: &'a ShadeShell) -> PatternContext<'a> {
    PatternContext::for_shell(params, BASE_HEIGHT, shell)
}

fn lofted(pattern: ShadePattern) -> LampParams {
    let mut params = params_with(pattern);
    params.shade_form = ShadeForm::Lofted;
    params
}

/// Every cutter must cut into the wall where it sits.
///
/// Spheres and tori are checked against the wall at their own height. A
/// helix pipe has its widest sample at the band bottom, which must sit no
/// further out than mid-wall there.
fn assert_cutters_meet_wall(params: &LampParams, margin: f64) {
    let mut kernel = MockKernel::new();
    let shell = build_shade(&mut kernel, params, BASE_HEIGHT).unwrap();
    let ctx = context(params, &shell);
    let (lo, hi) = ctx.band(margin);
    let cutters = generate_cutters(&mut kernel, &ctx).unwrap();
    assert!(!cutters.is_empty());
    let wall = params.shade_wall;
    for cutter in &cutters {
        let b = kernel.bounding_box(cutter).unwrap();
        let (inner, outer, z) = match kernel.origin_of(cutter) {
            Some(KernelOpKind::Sphere) => {
                let size = (b[5] - b[2]) / 2.0;
                let radius = ((b[0] + b[3]) / 2.0).hypot((b[1] + b[4]) / 2.0);
                (radius - size, radius + size, (b[2] + b[5]) / 2.0)
            }
            Some(KernelOpKind::Torus) => {
                let minor = (b[5] - b[2]) / 2.0;
                let major = (b[3] - b[0]) / 2.0 - minor;
                (major - minor, major + minor, (b[2] + b[5]) / 2.0)
            }
            Some(KernelOpKind::Pipe) => {
                let pipe = lo - b[2];
                let reach = [b[0], b[1], b[3], b[4]]
                    .iter()
                    .fold(0.0_f64, |acc, v| acc.max(v.abs()))
                    - pipe;
                assert!(
                    reach <= ctx.mid_wall_radius_at(lo) + 1e-9,
                    "helix reaches {:.2}, wall mid-line at band bottom is {:.2}",
                    reach,
                    ctx.mid_wall_radius_at(lo)
                );
                assert!(reach > ctx.wall_radius_at(hi) - wall);
                continue;
            }
            other => panic!("unexpected cutter kind {:?}", other),
        };
        let face = ctx.wall_radius_at(z);
        assert!(
            inner < face && outer > face - wall,
            "{:?} cutter spans {:.2}..{:.2} at z {:.2}, wall is {:.2}..{:.2}",
            params.shade_pattern,
            inner,
            outer,
            z,
            face - wall,
            face
        );
    }
}

/// Number of cutters the pattern produces on a freshly built shade.
fn cutter_count(params: &LampParams) -> usize {
    let mut kernel = MockKernel::new();
    let shell = build_shade(&mut kernel, params, BASE_HEIGHT).unwrap();
    let cutters = generate_cutters(&mut kernel, &context(params, &shell)).unwrap();
    cutters.len()
}

/// Build a shade, apply its pattern and return the kernel plus the result.
fn patterned(params: &LampParams) -> (MockKernel, Option<Solid>, Option<u64>) {
    let mut kernel = MockKernel::new();
    let mut shell = build_shade(&mut kernel, params, BASE_HEIGHT).unwrap();
    let before = shell.solid.as_ref().map(Solid::raw);
    let shade = shell.solid.take();
    let result = apply_pattern(&mut kernel, shade, &context(params, &shell)).unwrap();
    if let Some(surface) = shell.pattern_surface.take() {
        kernel.delete_surface(surface);
    }
    (kernel, result, before)
}

fn assert_unchanged(params: &LampParams) {
    let (kernel, result, before) = patterned(params);
    assert_eq!(result.as_ref().map(Solid::raw), before);
    // Only the shell's own cavity cut ran.
    assert_eq!(kernel.op_count(KernelOpKind::Difference), 1);
    assert_eq!(kernel.live_solids(), 1);
}

// ── Cutter Counts ──────────────────────────────────────────────────────────

#[test]
fn lattice_six_by_thirty_yields_180_cutters() {
    let mut params = params_with(ShadePattern::Lattice);
    params.lattice_rows = 6;
    params.lattice_columns = 30;
    assert_eq!(cutter_count(&params), 180);
}

#[test]
fn slots_one_cutter_per_slot() {
    assert_eq!(cutter_count(&params_with(ShadePattern::Slots)), 24);
}

#[test]
fn weave_pairs_each_strand_with_a_counter_strand() {
    assert_eq!(cutter_count(&params_with(ShadePattern::Weave)), 2 * 12);
}

#[test]
fn moire_three_helices_per_strand_plus_rings() {
    assert_eq!(cutter_count(&params_with(ShadePattern::Moire)), 3 * 10 + 3);
    let mut params = params_with(ShadePattern::Moire);
    params.moire_strand_count = 0;
    assert_eq!(cutter_count(&params), 3);
}

#[test]
fn bubble_fills_the_grid() {
    assert_eq!(cutter_count(&params_with(ShadePattern::Bubble)), 6 * 16);
}

#[test]
fn bubble_rows_leaving_the_band_are_skipped() {
    let mut params = params_with(ShadePattern::Bubble);
    // Each row is ~4.3 tall; spheres of radius 4 no longer fit.
    params.bubble_rows = 20;
    params.bubble_radius_variation = 0.0;
    assert_eq!(cutter_count(&params), 0);
}

#[test]
fn oversized_bubble_grid_with_no_fitting_rows_is_empty() {
    let mut params = params_with(ShadePattern::Bubble);
    params.bubble_rows = 2;
    params.bubble_columns = i64::MAX;
    // Far too large for either row to fit the band.
    params.bubble_radius = 1000.0;
    assert_eq!(cutter_count(&params), 0);
}

#[test]
fn blobtrude_samples_inside_band_only() {
    let mut params = params_with(ShadePattern::Blobtrude);
    params.shade_form = ShadeForm::Lofted;
    let count = cutter_count(&params);
    assert!(count > 0);
    assert!(count < 8 * 14, "rows near the rim fall outside the band");
}

#[test]
fn pattern_cutters_are_helix_pipes_and_tori() {
    let mut kernel = MockKernel::new();
    let params = params_with(ShadePattern::Moire);
    let shell = build_shade(&mut kernel, &params, BASE_HEIGHT).unwrap();
    generate_cutters(&mut kernel, &context(&params, &shell)).unwrap();
    assert_eq!(kernel.op_count(KernelOpKind::Pipe), 30);
    assert_eq!(kernel.op_count(KernelOpKind::Torus), 3);
    // Helix rails are consumed by the pipes.
    assert_eq!(kernel.live_curves(), 0);
}

// ── Placement ──────────────────────────────────────────────────────────────

#[test]
fn bubbles_follow_lofted_taper() {
    let params = lofted(ShadePattern::Bubble);
    assert_cutters_meet_wall(&params, params.bubble_margin);
}

#[test]
fn weave_helices_follow_lofted_taper() {
    let params = lofted(ShadePattern::Weave);
    assert_cutters_meet_wall(&params, params.weave_margin);
}

#[test]
fn moire_helices_and_rings_follow_lofted_taper() {
    let params = lofted(ShadePattern::Moire);
    assert_cutters_meet_wall(&params, params.moire_margin);
}

#[test]
fn wall_cutters_meet_cylindrical_wall() {
    let bubble = params_with(ShadePattern::Bubble);
    assert_cutters_meet_wall(&bubble, bubble.bubble_margin);
    let weave = params_with(ShadePattern::Weave);
    assert_cutters_meet_wall(&weave, weave.weave_margin);
    let moire = params_with(ShadePattern::Moire);
    assert_cutters_meet_wall(&moire, moire.moire_margin);
}

#[test]
fn weave_helix_starts_mid_wall_at_band_bottom() {
    let mut kernel = MockKernel::new();
    let params = lofted(ShadePattern::Weave);
    let shell = build_shade(&mut kernel, &params, BASE_HEIGHT).unwrap();
    let ctx = context(&params, &shell);
    let cutters = generate_cutters(&mut kernel, &ctx).unwrap();
    let (lo, hi) = ctx.band(params.weave_margin);
    let b = kernel.bounding_box(&cutters[0]).unwrap();
    let pipe = params.weave_pipe_radius;
    // The first strand starts on +X, where the lofted wall is widest.
    assert_abs_diff_eq!(b[3], ctx.mid_wall_radius_at(lo) + pipe, epsilon = 1e-9);
    assert_abs_diff_eq!(b[2], lo - pipe, epsilon = 1e-9);
    assert_abs_diff_eq!(b[5], hi + pipe, epsilon = 1e-9);
}

#[test]
fn moire_secondary_pipe_is_three_quarters_of_primary() {
    let mut kernel = MockKernel::new();
    let params = params_with(ShadePattern::Moire);
    let shell = build_shade(&mut kernel, &params, BASE_HEIGHT).unwrap();
    let ctx = context(&params, &shell);
    let cutters = generate_cutters(&mut kernel, &ctx).unwrap();
    let (lo, _) = ctx.band(params.moire_margin);
    // Per strand: primary, counter, secondary.
    let pipe_of = |cutter: &Solid| lo - kernel.bounding_box(cutter).unwrap()[2];
    let primary = pipe_of(&cutters[0]);
    assert_abs_diff_eq!(pipe_of(&cutters[1]), primary, epsilon = 1e-9);
    assert_abs_diff_eq!(pipe_of(&cutters[2]), 0.75 * primary, epsilon = 1e-9);
    // The primary radius is floored at 0.45 * wall + 0.15.
    assert_abs_diff_eq!(primary, 0.45 * 2.4 + 0.15, epsilon = 1e-9);
}

#[test]
fn lattice_odd_rows_are_staggered_and_twisted() {
    let mut kernel = MockKernel::new();
    let params = params_with(ShadePattern::Lattice);
    let shell = build_shade(&mut kernel, &params, BASE_HEIGHT).unwrap();
    let cutters = generate_cutters(&mut kernel, &context(&params, &shell)).unwrap();
    let columns = params.lattice_columns as usize;
    let step = 360.0 / params.lattice_columns as f64;
    let (lo, hi) = (86.0, 168.0);
    let row_step = (hi - lo) / params.lattice_rows as f64;
    let window = params.lattice_window_height.min(row_step * 0.85);

    for (row, expected_angle) in [(0, 0.0), (1, params.lattice_offset_ratio * step + 8.0)] {
        let b = kernel.bounding_box(&cutters[row * columns]).unwrap();
        let cx = (b[0] + b[3]) / 2.0;
        let cy = (b[1] + b[4]) / 2.0;
        // Radial span 46..59 centered at 52.5.
        assert_abs_diff_eq!(cx.hypot(cy), 52.5, epsilon = 1e-9);
        assert_abs_diff_eq!(cy.atan2(cx).to_degrees(), expected_angle, epsilon = 1e-9);
        let center = lo + row_step * (row as f64 + 0.5);
        assert_abs_diff_eq!(b[2], center - window / 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b[5], center + window / 2.0, epsilon = 1e-9);
    }
    assert_abs_diff_eq!(params.lattice_offset_ratio * step + 8.0, 14.0, epsilon = 1e-12);
}

#[test]
fn slot_heights_follow_sine_around_shade() {
    let mut kernel = MockKernel::new();
    let params = params_with(ShadePattern::Slots);
    let shell = build_shade(&mut kernel, &params, BASE_HEIGHT).unwrap();
    let cutters = generate_cutters(&mut kernel, &context(&params, &shell)).unwrap();
    let (lo, hi) = (86.0, 168.0);
    let body = hi - lo;
    let mut heights = Vec::new();
    for (i, cutter) in cutters.iter().enumerate() {
        let b = kernel.bounding_box(cutter).unwrap();
        let angle = 15.0 * i as f64;
        let wave = 0.5 + 0.5 * (angle.to_radians() * params.slot_wave_frequency).sin();
        let expected = (body * (1.0 - params.slot_variation * wave)).max(2.0 * params.shade_wall);
        assert_abs_diff_eq!(b[2], lo, epsilon = 1e-9);
        assert_abs_diff_eq!(b[5] - b[2], expected, epsilon = 1e-9);
        heights.push(b[5] - b[2]);
    }
    // Crest at 45 degrees, trough at 135.
    assert_abs_diff_eq!(heights[3], body * 0.75, epsilon = 1e-9);
    assert_abs_diff_eq!(heights[9], body, epsilon = 1e-9);
}

// ── Apply ──────────────────────────────────────────────────────────────────

#[test]
fn apply_subtracts_all_cutters_in_one_call() {
    let (kernel, result, before) = patterned(&params_with(ShadePattern::Lattice));
    assert!(result.is_some());
    assert_ne!(result.as_ref().map(Solid::raw), before);
    assert_eq!(kernel.difference_cutter_counts(), &[2, 180]);
    assert_eq!(kernel.live_solids(), 1);
    assert_eq!(kernel.live_curves(), 0);
}

#[test]
fn none_pattern_is_passthrough() {
    let mut params = params_with(ShadePattern::None);
    params.slot_count = 50;
    params.lattice_rows = 9;
    assert_unchanged(&params);
}

#[test]
fn zero_counts_are_passthrough() {
    let mut slots = params_with(ShadePattern::Slots);
    slots.slot_count = 0;
    assert_unchanged(&slots);

    let mut rows = params_with(ShadePattern::Lattice);
    rows.lattice_rows = 0;
    assert_unchanged(&rows);

    let mut columns = params_with(ShadePattern::Lattice);
    columns.lattice_columns = 0;
    assert_unchanged(&columns);

    let mut weave = params_with(ShadePattern::Weave);
    weave.weave_strand_count = 0;
    assert_unchanged(&weave);

    let mut bubble_rows = params_with(ShadePattern::Bubble);
    bubble_rows.bubble_rows = 0;
    assert_unchanged(&bubble_rows);

    let mut bubble_columns = params_with(ShadePattern::Bubble);
    bubble_columns.bubble_columns = 0;
    assert_unchanged(&bubble_columns);
}

#[test]
fn blobtrude_without_surface_is_passthrough() {
    assert_unchanged(&params_with(ShadePattern::Blobtrude));
}

#[test]
fn band_too_short_is_passthrough() {
    let mut params = params_with(ShadePattern::Slots);
    params.slot_margin = 60.0;
    assert_unchanged(&params);
}

#[test]
fn null_shade_builds_no_cutters() {
    let mut kernel = MockKernel::new();
    let params = params_with(ShadePattern::Lattice);
    let shell = build_shade(&mut kernel, &params, BASE_HEIGHT).unwrap();
    let boxes_before = kernel.op_count(KernelOpKind::Box);
    let result = apply_pattern(&mut kernel, None, &context(&params, &shell)).unwrap();
    assert!(result.is_none());
    assert_eq!(kernel.op_count(KernelOpKind::Box), boxes_before);
    if let Some(solid) = shell.solid {
        kernel.delete_solid(solid);
    }
}

#[test]
fn failed_rotation_drops_the_cutter() {
    let mut kernel = MockKernel::new();
    let params = params_with(ShadePattern::Slots);
    let shell = build_shade(&mut kernel, &params, BASE_HEIGHT).unwrap();
    kernel.fail_on(KernelOpKind::Rotate);
    let cutters = generate_cutters(&mut kernel, &context(&params, &shell)).unwrap();
    assert!(cutters.is_empty());
    assert_eq!(kernel.live_solids(), 1);
}

#[test]
fn failed_pattern_difference_nulls_shade() {
    let mut kernel = MockKernel::new();
    let params = params_with(ShadePattern::Bubble);
    let mut shell = build_shade(&mut kernel, &params, BASE_HEIGHT).unwrap();
    kernel.fail_on(KernelOpKind::Difference);
    let shade = shell.solid.take();
    let result = apply_pattern(&mut kernel, shade, &context(&params, &shell)).unwrap();
    assert!(result.is_none());
    assert_eq!(kernel.live_solids(), 0);
}
