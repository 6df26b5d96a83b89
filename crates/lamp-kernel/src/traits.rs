use crate::types::*;

/// Geometry kernel boundary.
///
/// The generator decides which primitives to build and how to combine them;
/// the kernel does the boundary-representation work. Any call may fail with
/// [`KernelError::EmptyResult`] for degenerate geometry.
///
/// Handles passed by value are consumed: the kernel releases them whether or
/// not the call succeeds. Handles passed by reference stay with the caller.
pub trait Kernel {
    // ── Primitives ──────────────────────────────────────────────────────

    /// Box from eight corners: bottom four counter-clockwise, then top four.
    fn add_box(&mut self, corners: &[Point3; 8]) -> Result<Solid, KernelError>;

    /// Cylinder along +Z with its bottom center at `base`.
    fn add_cylinder(
        &mut self,
        base: Point3,
        height: f64,
        radius: f64,
        cap: bool,
    ) -> Result<Solid, KernelError>;

    fn add_sphere(&mut self, center: Point3, radius: f64) -> Result<Solid, KernelError>;

    /// Torus around the Z axis through `center`.
    fn add_torus(
        &mut self,
        center: Point3,
        major_radius: f64,
        minor_radius: f64,
    ) -> Result<Solid, KernelError>;

    /// Polyline through `points`; closed when the last point repeats the first.
    fn add_polyline(&mut self, points: &[Point3]) -> Result<Curve, KernelError>;

    /// Circle in the plane `z = center[2]`.
    fn add_circle(&mut self, center: Point3, radius: f64) -> Result<Curve, KernelError>;

    fn add_line(&mut self, start: Point3, end: Point3) -> Result<Curve, KernelError>;

    // ── Surface and solid construction ──────────────────────────────────

    /// Planar surface bounded by a closed planar curve.
    fn add_planar_surface(&mut self, boundary: Curve) -> Result<Surface, KernelError>;

    /// Sweep a planar surface along a straight path.
    fn extrude_surface(&mut self, profile: Surface, path: Curve) -> Result<Surface, KernelError>;

    /// Loft through rails in the given order. The result is not capped.
    fn loft(&mut self, rails: Vec<Curve>) -> Result<Surface, KernelError>;

    /// Close the planar openings of a surface into a solid.
    fn cap_planar_holes(&mut self, surface: Surface) -> Result<Solid, KernelError>;

    /// Sweep a circular section of `radius` along `rail`.
    fn pipe(&mut self, rail: Curve, radius: f64, cap: bool) -> Result<Solid, KernelError>;

    fn boolean_union(&mut self, solids: Vec<Solid>) -> Result<Solid, KernelError>;

    /// `target` minus every solid in `cutters`.
    fn boolean_difference(
        &mut self,
        target: Solid,
        cutters: Vec<Solid>,
    ) -> Result<Solid, KernelError>;

    /// Rotate a solid in place about the axis through `center`.
    fn rotate(
        &mut self,
        solid: &Solid,
        center: Point3,
        angle_degrees: f64,
        axis: Vector3,
    ) -> Result<(), KernelError>;

    // ── Surface queries ─────────────────────────────────────────────────

    fn surface_domain(
        &self,
        surface: &Surface,
        direction: SurfaceDirection,
    ) -> Result<(f64, f64), KernelError>;

    fn evaluate_surface(&self, surface: &Surface, u: f64, v: f64) -> Result<Point3, KernelError>;

    /// Unit normal at `(u, v)`, pointing away from the loft axis.
    fn surface_normal(&self, surface: &Surface, u: f64, v: f64) -> Result<Vector3, KernelError>;

    // ── Lifecycle and document ──────────────────────────────────────────

    fn duplicate_surface(&mut self, surface: &Surface) -> Result<Surface, KernelError>;

    fn delete_solid(&mut self, solid: Solid);

    fn delete_surface(&mut self, surface: Surface);

    fn delete_curve(&mut self, curve: Curve);

    fn set_name(&mut self, solid: &Solid, name: &str) -> Result<(), KernelError>;

    fn select(&mut self, solid: &Solid) -> Result<(), KernelError>;

    /// Enable or suspend display updates of the host document.
    fn set_redraw(&mut self, enabled: bool);
}
