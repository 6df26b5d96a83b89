//! Deterministic in-memory `Kernel` for tests.
//!
//! Keeps an axis-aligned bounding box per solid and a ring model per lofted
//! surface, which is enough to check placement, ownership and surface
//! sampling without a real boundary-representation engine.

use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::traits::Kernel;
use crate::types::*;

/// Kernel operations, as recorded in the mock's operation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KernelOpKind {
    Box,
    Cylinder,
    Sphere,
    Torus,
    Polyline,
    Circle,
    Line,
    PlanarSurface,
    Extrude,
    Loft,
    Cap,
    Pipe,
    Union,
    Difference,
    Rotate,
    Duplicate,
}

/// `[min_x, min_y, min_z, max_x, max_y, max_z]`.
type Bbox = [f64; 6];

#[derive(Debug, Clone)]
struct MockSolid {
    origin: KernelOpKind,
    bbox: Bbox,
}

#[derive(Debug, Clone)]
struct MockCurve {
    points: Vec<Point3>,
}

/// A cross-section of a lofted surface, reduced to its mean radius and height.
#[derive(Debug, Clone, Copy)]
struct Ring {
    radius: f64,
    z: f64,
    rotation: f64,
}

#[derive(Debug, Clone)]
struct MockSurface {
    rings: Vec<Ring>,
    bbox: Bbox,
}

/// Deterministic in-memory kernel.
pub struct MockKernel {
    next_handle: u64,
    solids: HashMap<u64, MockSolid>,
    surfaces: HashMap<u64, MockSurface>,
    curves: HashMap<u64, MockCurve>,
    names: HashMap<u64, String>,
    selected: Option<u64>,
    redraw_log: Vec<bool>,
    ops: Vec<KernelOpKind>,
    difference_cutters: Vec<usize>,
    loft_rails: Vec<Vec<Vec<Point3>>>,
    failing: HashSet<KernelOpKind>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            solids: HashMap::new(),
            surfaces: HashMap::new(),
            curves: HashMap::new(),
            names: HashMap::new(),
            selected: None,
            redraw_log: Vec::new(),
            ops: Vec::new(),
            difference_cutters: Vec::new(),
            loft_rails: Vec::new(),
            failing: HashSet::new(),
        }
    }

    /// Make every later `kind` operation return an empty result.
    pub fn fail_on(&mut self, kind: KernelOpKind) -> &mut Self {
        self.failing.insert(kind);
        self
    }

    pub fn live_solids(&self) -> usize {
        self.solids.len()
    }

    pub fn live_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    pub fn live_curves(&self) -> usize {
        self.curves.len()
    }

    /// Every operation attempted so far, in call order.
    pub fn ops(&self) -> &[KernelOpKind] {
        &self.ops
    }

    pub fn op_count(&self, kind: KernelOpKind) -> usize {
        self.ops.iter().filter(|&&op| op == kind).count()
    }

    /// Cutter-list length of each boolean difference, in call order.
    pub fn difference_cutter_counts(&self) -> &[usize] {
        &self.difference_cutters
    }

    /// Rail points of every successful loft, in call order.
    pub fn loft_rails(&self) -> &[Vec<Vec<Point3>>] {
        &self.loft_rails
    }

    pub fn name_of(&self, solid: &Solid) -> Option<&str> {
        self.names.get(&solid.raw()).map(String::as_str)
    }

    pub fn is_selected(&self, solid: &Solid) -> bool {
        self.selected == Some(solid.raw())
    }

    /// Current redraw state; redraw is on until someone suspends it.
    pub fn redraw_enabled(&self) -> bool {
        self.redraw_log.last().copied().unwrap_or(true)
    }

    /// Every `set_redraw` call, in order.
    pub fn redraw_log(&self) -> &[bool] {
        &self.redraw_log
    }

    pub fn bounding_box(&self, solid: &Solid) -> Option<[f64; 6]> {
        self.solids.get(&solid.raw()).map(|s| s.bbox)
    }

    /// Which operation produced the solid.
    pub fn origin_of(&self, solid: &Solid) -> Option<KernelOpKind> {
        self.solids.get(&solid.raw()).map(|s| s.origin)
    }

    fn alloc(&mut self) -> u64 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }

    /// Log the operation and apply failure injection.
    fn begin(&mut self, kind: KernelOpKind) -> Result<(), KernelError> {
        self.ops.push(kind);
        if self.failing.contains(&kind) {
            return Err(KernelError::empty(format!("{:?}", kind)));
        }
        Ok(())
    }

    fn insert_solid(&mut self, origin: KernelOpKind, bbox: Bbox) -> Solid {
        let id = self.alloc();
        self.solids.insert(id, MockSolid { origin, bbox });
        debug!(id, ?origin, "mock solid created");
        Solid::from_raw(id)
    }

    fn insert_surface(&mut self, surface: MockSurface) -> Surface {
        let id = self.alloc();
        self.surfaces.insert(id, surface);
        Surface::from_raw(id)
    }

    fn insert_curve(&mut self, points: Vec<Point3>) -> Curve {
        let id = self.alloc();
        self.curves.insert(id, MockCurve { points });
        Curve::from_raw(id)
    }

    fn take_solid(&mut self, solid: Solid) -> Result<MockSolid, KernelError> {
        let id = solid.raw();
        self.names.remove(&id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.solids
            .remove(&id)
            .ok_or(KernelError::StaleHandle { kind: "solid", id })
    }

    fn take_surface(&mut self, surface: Surface) -> Result<MockSurface, KernelError> {
        let id = surface.raw();
        self.surfaces
            .remove(&id)
            .ok_or(KernelError::StaleHandle { kind: "surface", id })
    }

    fn take_curve(&mut self, curve: Curve) -> Result<MockCurve, KernelError> {
        let id = curve.raw();
        self.curves
            .remove(&id)
            .ok_or(KernelError::StaleHandle { kind: "curve", id })
    }

    fn surface(&self, surface: &Surface) -> Result<&MockSurface, KernelError> {
        let id = surface.raw();
        self.surfaces
            .get(&id)
            .ok_or(KernelError::StaleHandle { kind: "surface", id })
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

fn bbox_of_points(points: &[Point3]) -> Bbox {
    let mut bbox = [f64::MAX, f64::MAX, f64::MAX, f64::MIN, f64::MIN, f64::MIN];
    for p in points {
        for i in 0..3 {
            bbox[i] = bbox[i].min(p[i]);
            bbox[i + 3] = bbox[i + 3].max(p[i]);
        }
    }
    bbox
}

fn bbox_union(a: &Bbox, b: &Bbox) -> Bbox {
    [
        a[0].min(b[0]),
        a[1].min(b[1]),
        a[2].min(b[2]),
        a[3].max(b[3]),
        a[4].max(b[4]),
        a[5].max(b[5]),
    ]
}

fn bbox_expand(b: &Bbox, by: f64) -> Bbox {
    [b[0] - by, b[1] - by, b[2] - by, b[3] + by, b[4] + by, b[5] + by]
}

fn ring_of(points: &[Point3]) -> Option<Ring> {
    let first = points.first()?;
    let n = points.len() as f64;
    let z = points.iter().map(|p| p[2]).sum::<f64>() / n;
    let radius = points.iter().map(|p| p[0].hypot(p[1])).sum::<f64>() / n;
    Some(Ring {
        radius,
        z,
        rotation: first[1].atan2(first[0]),
    })
}

fn is_closed(points: &[Point3]) -> bool {
    match (points.first(), points.last()) {
        (Some(a), Some(b)) if points.len() >= 4 => {
            (a[0] - b[0]).abs() < 1e-9 && (a[1] - b[1]).abs() < 1e-9 && (a[2] - b[2]).abs() < 1e-9
        }
        _ => false,
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Locate `v` on the ring stack: the lower ring index and the fraction toward the next.
fn ring_segment(rings: &[Ring], v: f64) -> (usize, f64) {
    if rings.len() < 2 {
        return (0, 0.0);
    }
    let last = (rings.len() - 1) as f64;
    let v = v.clamp(0.0, last);
    let k = (v.floor() as usize).min(rings.len() - 2);
    (k, v - k as f64)
}

impl Kernel for MockKernel {
    fn add_box(&mut self, corners: &[Point3; 8]) -> Result<Solid, KernelError> {
        self.begin(KernelOpKind::Box)?;
        let bbox = bbox_of_points(corners);
        if bbox[3] - bbox[0] <= 0.0 || bbox[4] - bbox[1] <= 0.0 || bbox[5] - bbox[2] <= 0.0 {
            return Err(KernelError::empty("box"));
        }
        Ok(self.insert_solid(KernelOpKind::Box, bbox))
    }

    fn add_cylinder(
        &mut self,
        base: Point3,
        height: f64,
        radius: f64,
        _cap: bool,
    ) -> Result<Solid, KernelError> {
        self.begin(KernelOpKind::Cylinder)?;
        if radius <= 0.0 || height == 0.0 {
            return Err(KernelError::empty("cylinder"));
        }
        let top = base[2] + height;
        let bbox = [
            base[0] - radius,
            base[1] - radius,
            base[2].min(top),
            base[0] + radius,
            base[1] + radius,
            base[2].max(top),
        ];
        Ok(self.insert_solid(KernelOpKind::Cylinder, bbox))
    }

    fn add_sphere(&mut self, center: Point3, radius: f64) -> Result<Solid, KernelError> {
        self.begin(KernelOpKind::Sphere)?;
        if radius <= 0.0 {
            return Err(KernelError::empty("sphere"));
        }
        let point = [center[0], center[1], center[2], center[0], center[1], center[2]];
        let bbox = bbox_expand(&point, radius);
        Ok(self.insert_solid(KernelOpKind::Sphere, bbox))
    }

    fn add_torus(
        &mut self,
        center: Point3,
        major_radius: f64,
        minor_radius: f64,
    ) -> Result<Solid, KernelError> {
        self.begin(KernelOpKind::Torus)?;
        if minor_radius <= 0.0 || major_radius <= 0.0 {
            return Err(KernelError::empty("torus"));
        }
        let reach = major_radius + minor_radius;
        let bbox = [
            center[0] - reach,
            center[1] - reach,
            center[2] - minor_radius,
            center[0] + reach,
            center[1] + reach,
            center[2] + minor_radius,
        ];
        Ok(self.insert_solid(KernelOpKind::Torus, bbox))
    }

    fn add_polyline(&mut self, points: &[Point3]) -> Result<Curve, KernelError> {
        self.begin(KernelOpKind::Polyline)?;
        if points.len() < 2 {
            return Err(KernelError::empty("polyline"));
        }
        Ok(self.insert_curve(points.to_vec()))
    }

    fn add_circle(&mut self, center: Point3, radius: f64) -> Result<Curve, KernelError> {
        self.begin(KernelOpKind::Circle)?;
        if radius <= 0.0 {
            return Err(KernelError::empty("circle"));
        }
        let points = (0..=64)
            .map(|i| {
                let a = TAU * (i % 64) as f64 / 64.0;
                [center[0] + radius * a.cos(), center[1] + radius * a.sin(), center[2]]
            })
            .collect();
        Ok(self.insert_curve(points))
    }

    fn add_line(&mut self, start: Point3, end: Point3) -> Result<Curve, KernelError> {
        self.begin(KernelOpKind::Line)?;
        if start == end {
            return Err(KernelError::empty("line"));
        }
        Ok(self.insert_curve(vec![start, end]))
    }

    fn add_planar_surface(&mut self, boundary: Curve) -> Result<Surface, KernelError> {
        let curve = self.take_curve(boundary)?;
        self.begin(KernelOpKind::PlanarSurface)?;
        if !is_closed(&curve.points) {
            return Err(KernelError::empty("planar surface"));
        }
        let ring = ring_of(&curve.points).ok_or_else(|| KernelError::empty("planar surface"))?;
        Ok(self.insert_surface(MockSurface {
            rings: vec![ring],
            bbox: bbox_of_points(&curve.points),
        }))
    }

    fn extrude_surface(&mut self, profile: Surface, path: Curve) -> Result<Surface, KernelError> {
        let profile = self.take_surface(profile)?;
        let path = self.take_curve(path)?;
        self.begin(KernelOpKind::Extrude)?;
        let (Some(start), Some(end)) = (path.points.first(), path.points.last()) else {
            return Err(KernelError::empty("extrude"));
        };
        let offset = [end[0] - start[0], end[1] - start[1], end[2] - start[2]];
        if profile.rings.is_empty() || offset == [0.0; 3] {
            return Err(KernelError::empty("extrude"));
        }
        let bottom = profile.rings[0];
        let top = Ring {
            z: bottom.z + offset[2],
            ..bottom
        };
        let b = profile.bbox;
        let moved = [
            b[0] + offset[0],
            b[1] + offset[1],
            b[2] + offset[2],
            b[3] + offset[0],
            b[4] + offset[1],
            b[5] + offset[2],
        ];
        Ok(self.insert_surface(MockSurface {
            rings: vec![bottom, top],
            bbox: bbox_union(&b, &moved),
        }))
    }

    fn loft(&mut self, rails: Vec<Curve>) -> Result<Surface, KernelError> {
        let mut curves = Vec::with_capacity(rails.len());
        for rail in rails {
            curves.push(self.take_curve(rail)?);
        }
        self.begin(KernelOpKind::Loft)?;
        if curves.len() < 2 {
            return Err(KernelError::empty("loft"));
        }
        let mut rings = Vec::with_capacity(curves.len());
        let mut all_points = Vec::new();
        for curve in &curves {
            if curve.points.len() < 2 {
                return Err(KernelError::empty("loft"));
            }
            rings.extend(ring_of(&curve.points));
            all_points.extend_from_slice(&curve.points);
        }
        self.loft_rails.push(curves.into_iter().map(|curve| curve.points).collect());
        Ok(self.insert_surface(MockSurface {
            rings,
            bbox: bbox_of_points(&all_points),
        }))
    }

    fn cap_planar_holes(&mut self, surface: Surface) -> Result<Solid, KernelError> {
        let surface = self.take_surface(surface)?;
        self.begin(KernelOpKind::Cap)?;
        if surface.rings.len() < 2 {
            return Err(KernelError::empty("cap"));
        }
        Ok(self.insert_solid(KernelOpKind::Cap, surface.bbox))
    }

    fn pipe(&mut self, rail: Curve, radius: f64, _cap: bool) -> Result<Solid, KernelError> {
        let rail = self.take_curve(rail)?;
        self.begin(KernelOpKind::Pipe)?;
        if radius <= 0.0 || rail.points.len() < 2 {
            return Err(KernelError::empty("pipe"));
        }
        let bbox = bbox_expand(&bbox_of_points(&rail.points), radius);
        Ok(self.insert_solid(KernelOpKind::Pipe, bbox))
    }

    fn boolean_union(&mut self, solids: Vec<Solid>) -> Result<Solid, KernelError> {
        let mut inputs = Vec::with_capacity(solids.len());
        for solid in solids {
            inputs.push(self.take_solid(solid)?);
        }
        self.begin(KernelOpKind::Union)?;
        let mut iter = inputs.iter();
        let Some(first) = iter.next() else {
            return Err(KernelError::empty("union"));
        };
        let bbox = iter.fold(first.bbox, |acc, s| bbox_union(&acc, &s.bbox));
        Ok(self.insert_solid(KernelOpKind::Union, bbox))
    }

    fn boolean_difference(
        &mut self,
        target: Solid,
        cutters: Vec<Solid>,
    ) -> Result<Solid, KernelError> {
        let target = self.take_solid(target)?;
        let count = cutters.len();
        for cutter in cutters {
            self.take_solid(cutter)?;
        }
        self.difference_cutters.push(count);
        self.begin(KernelOpKind::Difference)?;
        Ok(self.insert_solid(KernelOpKind::Difference, target.bbox))
    }

    fn rotate(
        &mut self,
        solid: &Solid,
        center: Point3,
        angle_degrees: f64,
        axis: Vector3,
    ) -> Result<(), KernelError> {
        self.begin(KernelOpKind::Rotate)?;
        let id = solid.raw();
        let entry = self
            .solids
            .get_mut(&id)
            .ok_or(KernelError::StaleHandle { kind: "solid", id })?;

        // Only rotations about a vertical axis move the box in the mock.
        if axis[0].abs() > 1e-12 || axis[1].abs() > 1e-12 {
            return Ok(());
        }
        let (sin, cos) = angle_degrees.to_radians().sin_cos();
        let b = entry.bbox;
        let corners: Vec<Point3> = [(b[0], b[1]), (b[3], b[1]), (b[3], b[4]), (b[0], b[4])]
            .iter()
            .flat_map(|&(x, y)| {
                let dx = x - center[0];
                let dy = y - center[1];
                let rx = center[0] + dx * cos - dy * sin;
                let ry = center[1] + dx * sin + dy * cos;
                [[rx, ry, b[2]], [rx, ry, b[5]]]
            })
            .collect();
        entry.bbox = bbox_of_points(&corners);
        Ok(())
    }

    fn surface_domain(
        &self,
        surface: &Surface,
        direction: SurfaceDirection,
    ) -> Result<(f64, f64), KernelError> {
        let s = self.surface(surface)?;
        Ok(match direction {
            SurfaceDirection::U => (0.0, 1.0),
            SurfaceDirection::V => (0.0, s.rings.len().saturating_sub(1) as f64),
        })
    }

    fn evaluate_surface(&self, surface: &Surface, u: f64, v: f64) -> Result<Point3, KernelError> {
        let s = self.surface(surface)?;
        let Some(&first) = s.rings.first() else {
            return Err(KernelError::empty("evaluate"));
        };
        let (k, t) = ring_segment(&s.rings, v);
        let (lo, hi) = if s.rings.len() < 2 {
            (first, first)
        } else {
            (s.rings[k], s.rings[k + 1])
        };
        let radius = lerp(lo.radius, hi.radius, t);
        let angle = TAU * u + lerp(lo.rotation, hi.rotation, t);
        Ok([radius * angle.cos(), radius * angle.sin(), lerp(lo.z, hi.z, t)])
    }

    fn surface_normal(&self, surface: &Surface, u: f64, v: f64) -> Result<Vector3, KernelError> {
        let s = self.surface(surface)?;
        if s.rings.len() < 2 {
            return Ok([0.0, 0.0, 1.0]);
        }
        let (k, t) = ring_segment(&s.rings, v);
        let (lo, hi) = (s.rings[k], s.rings[k + 1]);
        let angle = TAU * u + lerp(lo.rotation, hi.rotation, t);
        let dr = hi.radius - lo.radius;
        let dz = hi.z - lo.z;
        let n = [angle.cos() * dz, angle.sin() * dz, -dr];
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        if len < 1e-12 {
            return Err(KernelError::empty("normal"));
        }
        // Rails stacked downward flip the raw normal inward.
        let sign = if dz < 0.0 { -1.0 } else { 1.0 };
        Ok([sign * n[0] / len, sign * n[1] / len, sign * n[2] / len])
    }

    fn duplicate_surface(&mut self, surface: &Surface) -> Result<Surface, KernelError> {
        self.begin(KernelOpKind::Duplicate)?;
        let copy = self.surface(surface)?.clone();
        Ok(self.insert_surface(copy))
    }

    fn delete_solid(&mut self, solid: Solid) {
        if self.take_solid(solid).is_err() {
            debug!("delete of unknown solid ignored");
        }
    }

    fn delete_surface(&mut self, surface: Surface) {
        if self.take_surface(surface).is_err() {
            debug!("delete of unknown surface ignored");
        }
    }

    fn delete_curve(&mut self, curve: Curve) {
        if self.take_curve(curve).is_err() {
            debug!("delete of unknown curve ignored");
        }
    }

    fn set_name(&mut self, solid: &Solid, name: &str) -> Result<(), KernelError> {
        let id = solid.raw();
        if !self.solids.contains_key(&id) {
            return Err(KernelError::StaleHandle { kind: "solid", id });
        }
        self.names.insert(id, name.to_string());
        Ok(())
    }

    fn select(&mut self, solid: &Solid) -> Result<(), KernelError> {
        let id = solid.raw();
        if !self.solids.contains_key(&id) {
            return Err(KernelError::StaleHandle { kind: "solid", id });
        }
        self.selected = Some(id);
        Ok(())
    }

    fn set_redraw(&mut self, enabled: bool) {
        self.redraw_log.push(enabled);
    }
}
