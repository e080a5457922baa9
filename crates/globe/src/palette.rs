use serde::{Deserialize, Serialize};

/// Hue/saturation/lightness triple, each in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }
}

/// Colors for every themed surface of the globe.
///
/// Strings are CSS color literals handed to the overlay unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub background: String,
    pub globe_surface: Hsl,
    pub globe_emissive: Hsl,
    pub specular: String,
    pub atmosphere: String,
    pub land_fill: String,
    pub land_side: String,
    pub land_stroke: String,
    pub arc: String,
    pub point: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self::flagship()
    }
}

impl Palette {
    /// Refined neutrals on pure black.
    pub fn flagship() -> Self {
        Self {
            background: "#000000".to_string(),
            globe_surface: Hsl::new(0.0, 0.0, 0.10),
            globe_emissive: Hsl::new(0.6, 0.05, 0.02),
            specular: "#111111".to_string(),
            atmosphere: "#1a1a1a".to_string(),
            land_fill: "rgba(255, 255, 255, 0.06)".to_string(),
            land_side: "rgba(0, 0, 0, 0)".to_string(),
            land_stroke: "rgba(255, 255, 255, 0.12)".to_string(),
            arc: "rgba(255, 255, 255, 0.4)".to_string(),
            point: "rgba(255, 255, 255, 0.6)".to_string(),
        }
    }

    /// Deep navy globe with teal arcs.
    pub fn aurora() -> Self {
        Self {
            background: "#020617".to_string(),
            globe_surface: Hsl::new(0.62, 0.45, 0.12),
            globe_emissive: Hsl::new(0.5, 0.6, 0.04),
            specular: "#1e293b".to_string(),
            atmosphere: "#2dd4bf".to_string(),
            land_fill: "rgba(45, 212, 191, 0.10)".to_string(),
            land_side: "rgba(0, 0, 0, 0)".to_string(),
            land_stroke: "rgba(94, 234, 212, 0.25)".to_string(),
            arc: "rgba(94, 234, 212, 0.55)".to_string(),
            point: "rgba(167, 243, 208, 0.85)".to_string(),
        }
    }

    /// Warm charcoal with amber arcs.
    pub fn ember() -> Self {
        Self {
            background: "#0c0a09".to_string(),
            globe_surface: Hsl::new(0.07, 0.12, 0.09),
            globe_emissive: Hsl::new(0.06, 0.5, 0.03),
            specular: "#292524".to_string(),
            atmosphere: "#f59e0b".to_string(),
            land_fill: "rgba(251, 191, 36, 0.08)".to_string(),
            land_side: "rgba(0, 0, 0, 0)".to_string(),
            land_stroke: "rgba(251, 146, 60, 0.22)".to_string(),
            arc: "rgba(251, 146, 60, 0.6)".to_string(),
            point: "rgba(254, 215, 170, 0.8)".to_string(),
        }
    }
}
