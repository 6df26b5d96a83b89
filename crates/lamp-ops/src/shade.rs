use lamp_kernel::{Curve, Kernel, OrNull, Solid, Surface};
use lamp_types::{LampParams, ShadeForm};
use tracing::{info, instrument, warn};

use crate::base::loft_capped;
use crate::boolean::safe_difference;
use crate::profiles::regular_polygon;
use crate::types::{OpError, ShadeShell};

/// Build the shade shell selected by `params.shade_form`, seated on the base
/// at `base_height`.
///
/// Both forms leave an open top, a wide upper cavity and a narrow sleeve at
/// the bottom that slips over the neck.
#[instrument(skip_all, fields(shade_form = params.shade_form.as_str(), base_height = base_height))]
pub fn build_shade(
    kernel: &mut dyn Kernel,
    params: &LampParams,
    base_height: f64,
) -> Result<ShadeShell, OpError> {
    let shell = match params.shade_form {
        ShadeForm::Cylindrical => cylindrical(kernel, params, base_height)?,
        ShadeForm::Lofted => lofted(kernel, params, base_height)?,
    };
    if shell.solid.is_none() {
        warn!("shade shell is null");
    }
    info!(
        outer_radius = shell.outer_radius,
        inner_radius = shell.inner_radius,
        pattern_surface = shell.pattern_surface.is_some(),
        "shade built"
    );
    Ok(shell)
}

fn cylindrical(
    kernel: &mut dyn Kernel,
    p: &LampParams,
    base_height: f64,
) -> Result<ShadeShell, OpError> {
    let outer_radius = p.shade_outer_radius;
    let inner_radius = p.shade_inner_radius();

    let outer = kernel
        .add_cylinder([0.0, 0.0, base_height], p.shade_height, outer_radius, true)
        .or_null()?;
    let upper_height = (p.shade_height - p.sleeve_height).max(2.0 * p.shade_wall);
    let upper = kernel
        .add_cylinder(
            [0.0, 0.0, base_height + p.sleeve_height],
            upper_height,
            inner_radius,
            true,
        )
        .or_null()?;
    let sleeve = sleeve_cavity(kernel, p, base_height)?;

    Ok(ShadeShell {
        solid: safe_difference(kernel, outer, vec![upper, sleeve])?,
        pattern_surface: None,
        outer_radius,
        inner_radius,
        bottom_radius: outer_radius,
        top_radius: outer_radius,
    })
}

fn lofted(kernel: &mut dyn Kernel, p: &LampParams, base_height: f64) -> Result<ShadeShell, OpError> {
    let radius = p.shade_outer_radius;
    let top_radius = radius * p.shade_loft_top_scale;
    let bottom_sides = p.shade_loft_bottom_sides.max(3) as usize;
    let top_sides = p.shade_loft_top_sides.max(3) as usize;
    let top_z = base_height + p.shade_height;

    let mut shell = ShadeShell {
        solid: None,
        pattern_surface: None,
        outer_radius: radius.max(top_radius),
        inner_radius: radius.min(top_radius) - p.shade_wall,
        bottom_radius: radius,
        top_radius,
    };

    let rails = vec![
        regular_polygon(kernel, radius, bottom_sides, base_height, 0.0)?,
        regular_polygon(kernel, top_radius, top_sides, top_z, p.shade_loft_twist)?,
    ];
    let Some((outer, pattern_surface)) = outer_shell(kernel, rails)? else {
        return Ok(shell);
    };

    // The cavity starts at the sleeve top, so its bottom rail follows the
    // outer wall at that height.
    let f = if p.shade_height > 0.0 {
        p.sleeve_height / p.shade_height
    } else {
        0.0
    };
    let cavity_bottom = radius + (top_radius - radius) * f - p.shade_wall;
    let cavity_rails = vec![
        regular_polygon(
            kernel,
            cavity_bottom,
            bottom_sides,
            base_height + p.sleeve_height,
            p.shade_loft_twist * f,
        )?,
        regular_polygon(
            kernel,
            top_radius - p.shade_wall,
            top_sides,
            top_z,
            p.shade_loft_twist,
        )?,
    ];
    let Some(cavity) = loft_capped(kernel, cavity_rails)? else {
        warn!("shade cavity loft failed");
        kernel.delete_solid(outer);
        if let Some(surface) = pattern_surface {
            kernel.delete_surface(surface);
        }
        return Ok(shell);
    };
    let sleeve = sleeve_cavity(kernel, p, base_height)?;

    shell.solid = safe_difference(kernel, Some(outer), vec![Some(cavity), sleeve])?;
    shell.pattern_surface = pattern_surface;
    Ok(shell)
}

/// Loft the outer wall, keep an uncapped copy of it, then cap it.
fn outer_shell(
    kernel: &mut dyn Kernel,
    rails: Vec<Option<Curve>>,
) -> Result<Option<(Solid, Option<Surface>)>, OpError> {
    if rails.iter().any(Option::is_none) {
        for rail in rails.into_iter().flatten() {
            kernel.delete_curve(rail);
        }
        return Ok(None);
    }
    let rails = rails.into_iter().flatten().collect();
    let Some(surface) = kernel.loft(rails).or_null()? else {
        return Ok(None);
    };
    let copy = kernel.duplicate_surface(&surface).or_null()?;
    let Some(outer) = kernel.cap_planar_holes(surface).or_null()? else {
        if let Some(copy) = copy {
            kernel.delete_surface(copy);
        }
        return Ok(None);
    };
    Ok(Some((outer, copy)))
}

/// Narrow cavity at the bottom of the shade that fits over the neck.
fn sleeve_cavity(
    kernel: &mut dyn Kernel,
    p: &LampParams,
    base_height: f64,
) -> Result<Option<Solid>, OpError> {
    Ok(kernel
        .add_cylinder(
            [0.0, 0.0, base_height],
            p.sleeve_height,
            p.sleeve_inner_radius(),
            true,
        )
        .or_null()?)
}
