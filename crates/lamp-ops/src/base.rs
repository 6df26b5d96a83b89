use std::f64::consts::PI;

use lamp_kernel::{Curve, Kernel, OrNull, Point3, Solid};
use lamp_types::{BaseType, LampParams};
use tracing::{info, instrument, warn};

use crate::profiles::{regular_polygon, wave_curve};
use crate::types::{BaseBody, OpError};

/// Build the base body selected by `params.base_type`.
#[instrument(skip_all, fields(base_type = params.base_type.as_str()))]
pub fn build_base(kernel: &mut dyn Kernel, params: &LampParams) -> Result<BaseBody, OpError> {
    let body = match params.base_type {
        BaseType::Cube => cube(kernel, params)?,
        BaseType::Triangle => triangle(kernel, params)?,
        BaseType::Vase => vase(kernel, params)?,
        BaseType::Twisted => twisted(kernel, params)?,
        BaseType::Spiral => spiral(kernel, params)?,
        BaseType::Ripple => ripple(kernel, params)?,
    };
    if body.solid.is_none() {
        warn!("base body is null");
    }
    info!(height = body.height, "base built");
    Ok(body)
}

/// Eight corners of an axis-aligned box centered on the Z axis.
pub(crate) fn centered_box_corners(width: f64, depth: f64, z0: f64, z1: f64) -> [Point3; 8] {
    let x = width / 2.0;
    let y = depth / 2.0;
    [
        [-x, -y, z0],
        [x, -y, z0],
        [x, y, z0],
        [-x, y, z0],
        [-x, -y, z1],
        [x, -y, z1],
        [x, y, z1],
        [-x, y, z1],
    ]
}

fn cube(kernel: &mut dyn Kernel, p: &LampParams) -> Result<BaseBody, OpError> {
    let corners = centered_box_corners(p.base_width, p.base_depth, 0.0, p.base_height);
    Ok(BaseBody {
        solid: kernel.add_box(&corners).or_null()?,
        height: p.base_height,
    })
}

fn triangle(kernel: &mut dyn Kernel, p: &LampParams) -> Result<BaseBody, OpError> {
    let height = p.base_height;
    let circumradius = p.triangle_side / 3f64.sqrt();
    let body = |solid| BaseBody { solid, height };

    // Apex toward +Y.
    let Some(outline) = regular_polygon(kernel, circumradius, 3, 0.0, 90.0)? else {
        return Ok(body(None));
    };
    let Some(profile) = kernel.add_planar_surface(outline).or_null()? else {
        return Ok(body(None));
    };
    let path = match kernel.add_line([0.0; 3], [0.0, 0.0, height]).or_null()? {
        Some(path) => path,
        None => {
            kernel.delete_surface(profile);
            return Ok(body(None));
        }
    };
    let Some(prism) = kernel.extrude_surface(profile, path).or_null()? else {
        return Ok(body(None));
    };
    Ok(body(kernel.cap_planar_holes(prism).or_null()?))
}

fn vase(kernel: &mut dyn Kernel, p: &LampParams) -> Result<BaseBody, OpError> {
    let h = p.vase_height;
    let sections = [
        (0.0, p.vase_base_radius),
        (h * 0.35, p.vase_mid_radius),
        (h * 0.7, p.vase_neck_radius),
        (h, p.vase_neck_radius * 1.05),
    ];
    let mut rails = Vec::with_capacity(sections.len());
    for (z, radius) in sections {
        rails.push(kernel.add_circle([0.0, 0.0, z], radius).or_null()?);
    }
    Ok(BaseBody {
        solid: loft_capped(kernel, rails)?,
        height: h,
    })
}

fn twisted(kernel: &mut dyn Kernel, p: &LampParams) -> Result<BaseBody, OpError> {
    let sides = p.twisted_sides.max(3) as usize;
    let solid = stacked_loft(kernel, p.twisted_layers, p.twisted_height, |kernel, t, z| {
        let radius = p.twisted_radius * (1.0 + (p.twisted_top_scale - 1.0) * t);
        regular_polygon(kernel, radius, sides, z, p.twisted_rotation_degrees * t)
    })?;
    Ok(BaseBody {
        solid,
        height: p.twisted_height,
    })
}

fn spiral(kernel: &mut dyn Kernel, p: &LampParams) -> Result<BaseBody, OpError> {
    let waves = p.spiral_waves.max(1) as usize;
    let per_wave = p.spiral_points_per_wave.max(6) as usize;
    let solid = stacked_loft(kernel, p.spiral_layers, p.spiral_height, |kernel, t, z| {
        let radius = p.spiral_radius * (1.0 + (p.spiral_top_scale - 1.0) * t);
        // Amplitude fades to 70% at the top.
        let amplitude = p.spiral_wave_amp * (1.0 - 0.3 * t);
        wave_curve(kernel, radius, waves, amplitude, per_wave, z, p.spiral_rotation_degrees * t)
    })?;
    Ok(BaseBody {
        solid,
        height: p.spiral_height,
    })
}

fn ripple(kernel: &mut dyn Kernel, p: &LampParams) -> Result<BaseBody, OpError> {
    let waves = p.ripple_waves.max(1) as usize;
    let per_wave = p.ripple_points_per_wave.max(6) as usize;
    let solid = stacked_loft(kernel, p.ripple_layers, p.ripple_height, |kernel, t, z| {
        let radius = p.ripple_radius * (1.0 + (p.ripple_top_scale - 1.0) * t);
        let amplitude = p.ripple_wave_amp * ripple_envelope(t);
        wave_curve(kernel, radius, waves, amplitude, per_wave, z, p.ripple_rotation_degrees * t)
    })?;
    Ok(BaseBody {
        solid,
        height: p.ripple_height,
    })
}

/// Amplitude factor of the ripple base: 0.85 at both ends, 1.1 at mid-height.
pub fn ripple_envelope(t: f64) -> f64 {
    0.85 + 0.25 * (t * PI).sin()
}

/// Loft `layers + 1` rails spaced evenly over `0..=height`.
///
/// `rail` receives the normalized height `t` and the layer's `z`.
fn stacked_loft<F>(
    kernel: &mut dyn Kernel,
    layers: i64,
    height: f64,
    mut rail: F,
) -> Result<Option<Solid>, OpError>
where
    F: FnMut(&mut dyn Kernel, f64, f64) -> Result<Option<Curve>, OpError>,
{
    let layers = layers.max(1) as usize;
    let mut rails = Vec::with_capacity(layers + 1);
    for i in 0..=layers {
        let t = i as f64 / layers as f64;
        rails.push(rail(&mut *kernel, t, height * t)?);
    }
    loft_capped(kernel, rails)
}

/// Loft through the rails in order and cap the ends.
///
/// Any null rail nulls the whole loft; the remaining rails are released.
pub(crate) fn loft_capped(
    kernel: &mut dyn Kernel,
    rails: Vec<Option<Curve>>,
) -> Result<Option<Solid>, OpError> {
    if rails.iter().any(Option::is_none) {
        warn!("loft rail missing, dropping loft");
        for rail in rails.into_iter().flatten() {
            kernel.delete_curve(rail);
        }
        return Ok(None);
    }
    let rails: Vec<Curve> = rails.into_iter().flatten().collect();
    let Some(surface) = kernel.loft(rails).or_null()? else {
        return Ok(None);
    };
    Ok(kernel.cap_planar_holes(surface).or_null()?)
}
