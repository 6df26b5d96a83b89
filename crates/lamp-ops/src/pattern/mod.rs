//! Shade perforation patterns.
//!
//! Each generator builds a list of cutter solids placed in a cylindrical
//! frame around the shade axis, confined to a height band above the sleeve.
//! The engine subtracts the whole list from the shade in one boolean call.

mod blobtrude;
mod bubble;
mod helix;
mod lattice;
mod moire;
mod slots;
mod weave;

use lamp_kernel::{Kernel, OrNull, Solid, Surface};
use lamp_types::{LampParams, ShadePattern};
use tracing::{debug, info, instrument};

use crate::boolean::safe_difference;
use crate::types::{OpError, ShadeShell};

pub use helix::helix_points;

/// Everything a generator may read about the shade it decorates.
#[derive(Debug, Clone, Copy)]
pub struct PatternContext<'a> {
    pub params: &'a LampParams,
    /// Z of the shade bottom.
    pub base_height: f64,
    pub sleeve_height: f64,
    /// Largest outer wall radius anywhere on the shade.
    pub outer_radius: f64,
    /// Smallest inner wall radius anywhere above the sleeve.
    pub inner_radius: f64,
    /// Outer wall radius at the shade bottom.
    pub bottom_radius: f64,
    /// Outer wall radius at the rim.
    pub top_radius: f64,
    /// Uncapped outer loft surface, present only for lofted shades.
    pub pattern_surface: Option<&'a Surface>,
}

impl<'a> PatternContext<'a> {
    /// Context for decorating `shell`, seated at `base_height`.
    pub fn for_shell(params: &'a LampParams, base_height: f64, shell: &'a ShadeShell) -> Self {
        Self {
            params,
            base_height,
            sleeve_height: params.sleeve_height,
            outer_radius: shell.outer_radius,
            inner_radius: shell.inner_radius,
            bottom_radius: shell.bottom_radius,
            top_radius: shell.top_radius,
            pattern_surface: shell.pattern_surface.as_ref(),
        }
    }

    /// Height band `(lo, hi)` open to patterning, `margin` in from the sleeve
    /// top and from the shade rim.
    pub fn band(&self, margin: f64) -> (f64, f64) {
        (
            self.base_height + self.sleeve_height + margin,
            self.base_height + self.params.shade_height - margin,
        )
    }

    /// Outer wall radius at height `z`, interpolated linearly from the shade
    /// bottom to the rim and held constant beyond them.
    pub fn wall_radius_at(&self, z: f64) -> f64 {
        let height = self.params.shade_height;
        let t = if height > 0.0 {
            ((z - self.base_height) / height).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.bottom_radius + (self.top_radius - self.bottom_radius) * t
    }

    /// Radius halfway through the shell wall at height `z`.
    pub fn mid_wall_radius_at(&self, z: f64) -> f64 {
        self.wall_radius_at(z) - self.params.shade_wall / 2.0
    }

    /// Radial span `(inner, outer)` of a box cutter that must pierce the wall
    /// to `depth`.
    fn radial_extent(&self, depth: f64) -> (f64, f64) {
        let depth = depth.max(self.params.shade_wall + 1.0);
        let inner = (self.inner_radius - 1.0)
            .min(self.outer_radius - depth)
            .max(0.5);
        (inner, self.outer_radius + 1.0)
    }
}

/// A pattern generator: builds cutters, never touches the shade itself.
pub type CutterGenerator = fn(&mut dyn Kernel, &PatternContext<'_>) -> Result<Vec<Solid>, OpError>;

/// Generator registered for `pattern`; `None` for [`ShadePattern::None`].
pub fn generator_for(pattern: ShadePattern) -> Option<CutterGenerator> {
    match pattern {
        ShadePattern::None => None,
        ShadePattern::Slots => Some(slots::slot_cutters),
        ShadePattern::Lattice => Some(lattice::lattice_cutters),
        ShadePattern::Weave => Some(weave::weave_cutters),
        ShadePattern::Moire => Some(moire::moire_cutters),
        ShadePattern::Bubble => Some(bubble::bubble_cutters),
        ShadePattern::Blobtrude => Some(blobtrude::blob_cutters),
    }
}

/// Build the cutters for `ctx.params.shade_pattern` without applying them.
pub fn generate_cutters(
    kernel: &mut dyn Kernel,
    ctx: &PatternContext<'_>,
) -> Result<Vec<Solid>, OpError> {
    match generator_for(ctx.params.shade_pattern) {
        Some(generate) => generate(kernel, ctx),
        None => Ok(Vec::new()),
    }
}

/// Carve the selected pattern into `shade`.
///
/// A null shade, the `none` pattern and an empty cutter list all return the
/// shade untouched.
#[instrument(skip_all, fields(pattern = ctx.params.shade_pattern.as_str()))]
pub fn apply_pattern(
    kernel: &mut dyn Kernel,
    shade: Option<Solid>,
    ctx: &PatternContext<'_>,
) -> Result<Option<Solid>, OpError> {
    let Some(shade) = shade else {
        debug!("null shade, pattern skipped");
        return Ok(None);
    };
    let cutters = generate_cutters(kernel, ctx)?;
    if cutters.is_empty() {
        debug!("no cutters");
        return Ok(Some(shade));
    }
    info!(cutters = cutters.len(), "pattern applied");
    safe_difference(kernel, Some(shade), cutters.into_iter().map(Some).collect())
}

/// Box spanning `inner..outer` radially and `width` across, from `z0` to
/// `z1`, turned `angle_degrees` about the Z axis.
fn radial_box(
    kernel: &mut dyn Kernel,
    (inner, outer): (f64, f64),
    width: f64,
    (z0, z1): (f64, f64),
    angle_degrees: f64,
) -> Result<Option<Solid>, OpError> {
    let y = width / 2.0;
    let corners = [
        [inner, -y, z0],
        [outer, -y, z0],
        [outer, y, z0],
        [inner, y, z0],
        [inner, -y, z1],
        [outer, -y, z1],
        [outer, y, z1],
        [inner, y, z1],
    ];
    let Some(cutter) = kernel.add_box(&corners).or_null()? else {
        return Ok(None);
    };
    if kernel
        .rotate(&cutter, [0.0; 3], angle_degrees, [0.0, 0.0, 1.0])
        .or_null()?
        .is_none()
    {
        kernel.delete_solid(cutter);
        return Ok(None);
    }
    Ok(Some(cutter))
}

/// Point at `radius` and `angle_degrees` around the Z axis, at height `z`.
fn polar(radius: f64, angle_degrees: f64, z: f64) -> [f64; 3] {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    [radius * cos, radius * sin, z]
}
