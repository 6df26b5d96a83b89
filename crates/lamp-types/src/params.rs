use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::variants::{BaseType, ShadeForm, ShadePattern};

/// Errors from building a parameter set out of host-supplied data.
#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    #[error("malformed parameter document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parameter overrides must be a JSON object, got {found}")]
    NotAnObject { found: String },
}

/// The full parameter set of one lamp.
///
/// Lengths are millimeters, angles degrees. Every field has a default, so any
/// partial JSON object deserializes into a complete set. The normalizer
/// mutates a set once in place; after that it is treated as read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LampParams {
    // ── Base selection ──────────────────────────────────────────────────
    pub base_type: BaseType,
    pub base_width: f64,
    pub base_depth: f64,
    pub base_height: f64,
    pub triangle_side: f64,
    pub vase_height: f64,
    pub vase_base_radius: f64,
    pub vase_mid_radius: f64,
    pub vase_neck_radius: f64,
    pub twisted_height: f64,
    pub twisted_radius: f64,
    #[serde(deserialize_with = "truncated_count")]
    pub twisted_sides: i64,
    #[serde(deserialize_with = "truncated_count")]
    pub twisted_layers: i64,
    pub twisted_top_scale: f64,
    pub twisted_rotation_degrees: f64,
    pub spiral_height: f64,
    pub spiral_radius: f64,
    #[serde(deserialize_with = "truncated_count")]
    pub spiral_waves: i64,
    pub spiral_wave_amp: f64,
    #[serde(deserialize_with = "truncated_count")]
    pub spiral_points_per_wave: i64,
    #[serde(deserialize_with = "truncated_count")]
    pub spiral_layers: i64,
    pub spiral_top_scale: f64,
    pub spiral_rotation_degrees: f64,
    pub ripple_height: f64,
    pub ripple_radius: f64,
    #[serde(deserialize_with = "truncated_count")]
    pub ripple_waves: i64,
    pub ripple_wave_amp: f64,
    #[serde(deserialize_with = "truncated_count")]
    pub ripple_points_per_wave: i64,
    #[serde(deserialize_with = "truncated_count")]
    pub ripple_layers: i64,
    pub ripple_top_scale: f64,
    pub ripple_rotation_degrees: f64,

    // ── Neck and fit ────────────────────────────────────────────────────
    pub neck_outer_radius: f64,
    pub neck_height: f64,
    pub neck_wall_min: f64,
    /// Radial clearance between the sleeve and the neck.
    pub tolerance: f64,

    // ── Port ────────────────────────────────────────────────────────────
    pub cord_diameter: f64,
    pub bulb_diameter: f64,
    pub port_clearance: f64,

    // ── Shade shell ─────────────────────────────────────────────────────
    pub shade_form: ShadeForm,
    pub shade_pattern: ShadePattern,
    pub shade_height: f64,
    pub shade_outer_radius: f64,
    pub shade_wall: f64,
    pub sleeve_height: f64,
    #[serde(deserialize_with = "truncated_count")]
    pub shade_loft_bottom_sides: i64,
    #[serde(deserialize_with = "truncated_count")]
    pub shade_loft_top_sides: i64,
    pub shade_loft_top_scale: f64,
    pub shade_loft_twist: f64,

    // ── Slots ───────────────────────────────────────────────────────────
    #[serde(deserialize_with = "truncated_count")]
    pub slot_count: i64,
    pub slot_width: f64,
    pub slot_depth: f64,
    pub slot_margin: f64,
    pub slot_variation: f64,
    pub slot_wave_frequency: f64,

    // ── Lattice ─────────────────────────────────────────────────────────
    #[serde(deserialize_with = "truncated_count")]
    pub lattice_rows: i64,
    #[serde(deserialize_with = "truncated_count")]
    pub lattice_columns: i64,
    pub lattice_window_width: f64,
    pub lattice_window_height: f64,
    pub lattice_window_depth: f64,
    pub lattice_margin: f64,
    pub lattice_offset_ratio: f64,
    pub lattice_twist_degrees: f64,

    // ── Weave ───────────────────────────────────────────────────────────
    #[serde(deserialize_with = "truncated_count")]
    pub weave_strand_count: i64,
    pub weave_turns: f64,
    pub weave_pipe_radius: f64,
    pub weave_margin: f64,

    // ── Moire ───────────────────────────────────────────────────────────
    #[serde(deserialize_with = "truncated_count")]
    pub moire_strand_count: i64,
    pub moire_turns: f64,
    pub moire_secondary_turns: f64,
    pub moire_pipe_radius: f64,
    #[serde(deserialize_with = "truncated_count")]
    pub moire_rings: i64,
    pub moire_ring_radius: f64,
    pub moire_margin: f64,

    // ── Bubble ──────────────────────────────────────────────────────────
    #[serde(deserialize_with = "truncated_count")]
    pub bubble_rows: i64,
    #[serde(deserialize_with = "truncated_count")]
    pub bubble_columns: i64,
    pub bubble_radius: f64,
    pub bubble_margin: f64,
    pub bubble_offset_ratio: f64,
    pub bubble_twist_degrees: f64,
    pub bubble_radius_variation: f64,
    pub bubble_wave_frequency: f64,

    // ── Blobtrude ───────────────────────────────────────────────────────
    #[serde(deserialize_with = "truncated_count")]
    pub blob_rows: i64,
    #[serde(deserialize_with = "truncated_count")]
    pub blob_columns: i64,
    pub blob_radius: f64,
    pub blob_margin: f64,
    pub blob_offset: f64,
    pub blob_twist_degrees: f64,
    pub blob_mangle: f64,
    pub blob_jitter: f64,
    pub blob_radius_variation: f64,
    pub blob_wave_frequency: f64,
}

impl Default for LampParams {
    fn default() -> Self {
        Self {
            base_type: BaseType::Cube,
            base_width: 80.0,
            base_depth: 80.0,
            base_height: 60.0,
            triangle_side: 90.0,
            vase_height: 75.0,
            vase_base_radius: 42.0,
            vase_mid_radius: 55.0,
            vase_neck_radius: 34.0,
            twisted_height: 70.0,
            twisted_radius: 40.0,
            twisted_sides: 6,
            twisted_layers: 8,
            twisted_top_scale: 0.8,
            twisted_rotation_degrees: 60.0,
            spiral_height: 70.0,
            spiral_radius: 40.0,
            spiral_waves: 6,
            spiral_wave_amp: 0.12,
            spiral_points_per_wave: 12,
            spiral_layers: 10,
            spiral_top_scale: 0.85,
            spiral_rotation_degrees: 90.0,
            ripple_height: 70.0,
            ripple_radius: 40.0,
            ripple_waves: 10,
            ripple_wave_amp: 0.08,
            ripple_points_per_wave: 10,
            ripple_layers: 12,
            ripple_top_scale: 0.9,
            ripple_rotation_degrees: 30.0,

            neck_outer_radius: 24.0,
            neck_height: 12.0,
            neck_wall_min: 2.4,
            tolerance: 0.4,

            cord_diameter: 7.0,
            bulb_diameter: 28.0,
            port_clearance: 2.0,

            shade_form: ShadeForm::Cylindrical,
            shade_pattern: ShadePattern::Lattice,
            shade_height: 120.0,
            shade_outer_radius: 58.0,
            shade_wall: 2.4,
            sleeve_height: 14.0,
            shade_loft_bottom_sides: 8,
            shade_loft_top_sides: 8,
            shade_loft_top_scale: 0.75,
            shade_loft_twist: 22.5,

            slot_count: 24,
            slot_width: 6.0,
            slot_depth: 12.0,
            slot_margin: 12.0,
            slot_variation: 0.25,
            slot_wave_frequency: 2.0,

            lattice_rows: 6,
            lattice_columns: 30,
            lattice_window_width: 8.0,
            lattice_window_height: 18.0,
            lattice_window_depth: 12.0,
            lattice_margin: 12.0,
            lattice_offset_ratio: 0.5,
            lattice_twist_degrees: 8.0,

            weave_strand_count: 12,
            weave_turns: 1.5,
            weave_pipe_radius: 1.6,
            weave_margin: 10.0,

            moire_strand_count: 10,
            moire_turns: 1.25,
            moire_secondary_turns: 2.0,
            moire_pipe_radius: 1.2,
            moire_rings: 3,
            moire_ring_radius: 1.0,
            moire_margin: 10.0,

            bubble_rows: 6,
            bubble_columns: 16,
            bubble_radius: 4.0,
            bubble_margin: 10.0,
            bubble_offset_ratio: 0.5,
            bubble_twist_degrees: 6.0,
            bubble_radius_variation: 0.3,
            bubble_wave_frequency: 1.3,

            blob_rows: 8,
            blob_columns: 14,
            blob_radius: 4.5,
            blob_margin: 10.0,
            blob_offset: 2.0,
            blob_twist_degrees: 10.0,
            blob_mangle: 0.15,
            blob_jitter: 1.0,
            blob_radius_variation: 0.3,
            blob_wave_frequency: 0.9,
        }
    }
}

impl LampParams {
    /// Parse a (possibly partial) JSON object on top of the defaults.
    pub fn from_json(text: &str) -> Result<Self, ParamError> {
        let value: Value = serde_json::from_str(text)?;
        Self::with_overrides(value)
    }

    /// Apply a JSON object of overrides to the defaults.
    ///
    /// Keys that name no parameter are logged and ignored.
    pub fn with_overrides(overrides: Value) -> Result<Self, ParamError> {
        let Value::Object(overrides) = overrides else {
            return Err(ParamError::NotAnObject {
                found: json_kind(&overrides).to_string(),
            });
        };

        let mut merged = match serde_json::to_value(Self::default())? {
            Value::Object(map) => map,
            other => {
                return Err(ParamError::NotAnObject {
                    found: json_kind(&other).to_string(),
                })
            }
        };

        for (key, value) in overrides {
            if merged.contains_key(&key) {
                merged.insert(key, value);
            } else {
                warn!(key = %key, "ignoring unknown lamp parameter");
            }
        }

        Ok(serde_json::from_value(Value::Object(merged))?)
    }

    /// Bore radius for cord and bulb, before any neck clamping.
    pub fn port_radius(&self) -> f64 {
        self.cord_diameter.max(self.bulb_diameter) / 2.0 + self.port_clearance
    }

    /// Inner radius of the sleeve: the neck plus exactly one tolerance gap.
    pub fn sleeve_inner_radius(&self) -> f64 {
        self.neck_outer_radius + self.tolerance
    }

    /// Inner radius of the upper shade cavity.
    pub fn shade_inner_radius(&self) -> f64 {
        self.shade_outer_radius - self.shade_wall
    }
}

/// Counts arrive from hosts that only have one number type, so `6.0` and
/// `6.7` both mean six. Out-of-range values saturate.
fn truncated_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(count) = number.as_i64() {
        return Ok(count);
    }
    if number.as_u64().is_some() {
        return Ok(i64::MAX);
    }
    // Float-to-int `as` truncates toward zero and saturates.
    Ok(number.as_f64().map_or(0, |value| value as i64))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
