//! Closed variant sets for the three dispatch points of the generator.
//!
//! Each enum deserializes from a free-form name through its `From<String>`
//! impl. That impl is the only place where an unrecognized name falls back
//! to the default variant, so builders can match exhaustively.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Which base body to build under the neck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BaseType {
    /// Axis-aligned box, `base_width x base_depth x base_height`.
    #[default]
    Cube,
    /// Extruded equilateral triangle.
    Triangle,
    /// Four-circle lofted vase.
    Vase,
    /// Stacked, rotated regular polygons.
    Twisted,
    /// Stacked wave curves with decaying amplitude.
    Spiral,
    /// Stacked wave curves with mid-height amplitude swell.
    Ripple,
}

impl BaseType {
    pub const ALL: [BaseType; 6] = [
        BaseType::Cube,
        BaseType::Triangle,
        BaseType::Vase,
        BaseType::Twisted,
        BaseType::Spiral,
        BaseType::Ripple,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BaseType::Cube => "cube",
            BaseType::Triangle => "triangle",
            BaseType::Vase => "vase",
            BaseType::Twisted => "twisted",
            BaseType::Spiral => "spiral",
            BaseType::Ripple => "ripple",
        }
    }

    /// Resolve a name, returning `None` when it is not recognized.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "cube" => Some(BaseType::Cube),
            "triangle" => Some(BaseType::Triangle),
            "vase" => Some(BaseType::Vase),
            "twisted" => Some(BaseType::Twisted),
            "spiral" => Some(BaseType::Spiral),
            "ripple" => Some(BaseType::Ripple),
            _ => None,
        }
    }
}

impl From<String> for BaseType {
    fn from(name: String) -> Self {
        BaseType::parse(&name).unwrap_or_else(|| {
            warn!(name = %name, fallback = "cube", "unknown base_type");
            BaseType::default()
        })
    }
}

impl From<BaseType> for String {
    fn from(value: BaseType) -> Self {
        value.as_str().to_string()
    }
}

/// Outer form of the shade shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShadeForm {
    #[default]
    Cylindrical,
    /// Two-rail polygon loft; also yields the pattern surface.
    Lofted,
}

impl ShadeForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShadeForm::Cylindrical => "cylindrical",
            ShadeForm::Lofted => "lofted",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "cylindrical" => Some(ShadeForm::Cylindrical),
            "lofted" => Some(ShadeForm::Lofted),
            _ => None,
        }
    }
}

impl From<String> for ShadeForm {
    fn from(name: String) -> Self {
        ShadeForm::parse(&name).unwrap_or_else(|| {
            warn!(name = %name, fallback = "cylindrical", "unknown shade_form");
            ShadeForm::default()
        })
    }
}

impl From<ShadeForm> for String {
    fn from(value: ShadeForm) -> Self {
        value.as_str().to_string()
    }
}

/// Perforation or ornamentation carved into the shade shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShadePattern {
    None,
    /// Vertical slots with sinusoidal height variation.
    #[default]
    Slots,
    /// Staggered, twisted rows of windows.
    Lattice,
    /// Helix and counter-helix pipes.
    Weave,
    /// Three helix families plus ring accents.
    Moire,
    /// Rows of spherical perforations.
    Bubble,
    /// Spheres pushed out along the lofted surface normal.
    Blobtrude,
}

impl ShadePattern {
    pub const ALL: [ShadePattern; 7] = [
        ShadePattern::None,
        ShadePattern::Slots,
        ShadePattern::Lattice,
        ShadePattern::Weave,
        ShadePattern::Moire,
        ShadePattern::Bubble,
        ShadePattern::Blobtrude,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShadePattern::None => "none",
            ShadePattern::Slots => "slots",
            ShadePattern::Lattice => "lattice",
            ShadePattern::Weave => "weave",
            ShadePattern::Moire => "moire",
            ShadePattern::Bubble => "bubble",
            ShadePattern::Blobtrude => "blobtrude",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" => Some(ShadePattern::None),
            "slots" => Some(ShadePattern::Slots),
            "lattice" => Some(ShadePattern::Lattice),
            "weave" => Some(ShadePattern::Weave),
            "moire" => Some(ShadePattern::Moire),
            "bubble" => Some(ShadePattern::Bubble),
            "blobtrude" | "manglutified" | "mangle" | "blob" => Some(ShadePattern::Blobtrude),
            _ => None,
        }
    }
}

impl From<String> for ShadePattern {
    fn from(name: String) -> Self {
        ShadePattern::parse(&name).unwrap_or_else(|| {
            warn!(name = %name, fallback = "slots", "unknown shade_pattern");
            ShadePattern::default()
        })
    }
}

impl From<ShadePattern> for String {
    fn from(value: ShadePattern) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_type_names_round_trip() {
        for base in BaseType::ALL {
            assert_eq!(BaseType::parse(base.as_str()), Some(base));
        }
    }

    #[test]
    fn test_unknown_base_type_falls_back_to_cube() {
        assert_eq!(BaseType::from("pyramid".to_string()), BaseType::Cube);
    }

    #[test]
    fn test_names_are_case_insensitive() {
        assert_eq!(BaseType::parse("  Vase "), Some(BaseType::Vase));
        assert_eq!(ShadeForm::parse("LOFTED"), Some(ShadeForm::Lofted));
    }

    #[test]
    fn test_blobtrude_aliases() {
        for alias in ["blobtrude", "manglutified", "mangle", "blob"] {
            assert_eq!(ShadePattern::parse(alias), Some(ShadePattern::Blobtrude));
        }
    }

    #[test]
    fn test_unknown_pattern_falls_back_to_slots() {
        assert_eq!(ShadePattern::from("zigzag".to_string()), ShadePattern::Slots);
    }

    #[test]
    fn test_unknown_shade_form_falls_back_to_cylindrical() {
        assert_eq!(ShadeForm::from("conical".to_string()), ShadeForm::Cylindrical);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&ShadePattern::Bubble).unwrap();
        assert_eq!(json, "\"bubble\"");
        let parsed: ShadePattern = serde_json::from_str("\"mangle\"").unwrap();
        assert_eq!(parsed, ShadePattern::Blobtrude);
    }
}
