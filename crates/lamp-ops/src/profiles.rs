//! Planar profile curves used as loft rails.
//!
//! The `*_points` functions are pure; the curve builders hand those points
//! to the kernel as closed polylines.

use std::f64::consts::TAU;

use lamp_kernel::{Curve, Kernel, OrNull, Point3};

use crate::types::OpError;

/// Closed regular polygon on a circle of `radius` at height `z`.
///
/// The first vertex sits `rotation_degrees` from +X; the closing point repeats
/// the first, so the result has `sides + 1` points. Fewer than three sides
/// are treated as three.
pub fn regular_polygon_points(
    radius: f64,
    sides: usize,
    z: f64,
    rotation_degrees: f64,
) -> Vec<Point3> {
    let sides = sides.max(3);
    let rotation = rotation_degrees.to_radians();
    let mut points: Vec<Point3> = (0..sides)
        .map(|i| {
            let angle = rotation + TAU * i as f64 / sides as f64;
            [radius * angle.cos(), radius * angle.sin(), z]
        })
        .collect();
    points.push(points[0]);
    points
}

/// Closed wave polygon: `waves * points_per_wave` vertices whose radius is
/// `radius * (1 + amplitude * sin(waves * angle))`, rotated as a whole by
/// `rotation_degrees`.
pub fn wave_points(
    radius: f64,
    waves: usize,
    amplitude: f64,
    points_per_wave: usize,
    z: f64,
    rotation_degrees: f64,
) -> Vec<Point3> {
    let waves = waves.max(1);
    let count = waves * points_per_wave.max(6);
    let rotation = rotation_degrees.to_radians();
    let mut points: Vec<Point3> = (0..count)
        .map(|i| {
            let angle = TAU * i as f64 / count as f64;
            let r = radius * (1.0 + amplitude * (waves as f64 * angle).sin());
            let a = angle + rotation;
            [r * a.cos(), r * a.sin(), z]
        })
        .collect();
    points.push(points[0]);
    points
}

pub fn regular_polygon(
    kernel: &mut dyn Kernel,
    radius: f64,
    sides: usize,
    z: f64,
    rotation_degrees: f64,
) -> Result<Option<Curve>, OpError> {
    let points = regular_polygon_points(radius, sides, z, rotation_degrees);
    Ok(kernel.add_polyline(&points).or_null()?)
}

pub fn wave_curve(
    kernel: &mut dyn Kernel,
    radius: f64,
    waves: usize,
    amplitude: f64,
    points_per_wave: usize,
    z: f64,
    rotation_degrees: f64,
) -> Result<Option<Curve>, OpError> {
    let points = wave_points(radius, waves, amplitude, points_per_wave, z, rotation_degrees);
    Ok(kernel.add_polyline(&points).or_null()?)
}
