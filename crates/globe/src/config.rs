//! Variant presets and JSON configuration.
//!
//! Every deployment is one of a few near-identical variants that differ only
//! in palette, camera framing and timing. A JSON document may name a variant
//! and override any subset of its fields; omitted fields keep the preset.

use foundation::math::LatLng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::camera::CameraConfig;
use crate::feed::FeedStyle;
use crate::lifecycle::LifecycleConfig;
use crate::palette::Palette;
use crate::picking::{GlobeFrame, PickConfig};
use crate::scene::SceneSettings;

pub const DEFAULT_MESSAGES: [&str; 5] = [
    "You are enough",
    "Sending love",
    "Keep going",
    "You matter",
    "Stay strong",
];

/// New York City; used until (and unless) geolocation succeeds.
pub const DEFAULT_LOCATION: LatLng = LatLng {
    lat: 40.7128,
    lng: -74.0060,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Flagship,
    Aurora,
    Ember,
}

impl Variant {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "flagship" | "default" | "mono" => Some(Variant::Flagship),
            "aurora" | "teal" => Some(Variant::Aurora),
            "ember" | "warm" => Some(Variant::Ember),
            _ => None,
        }
    }
}

/// Message flight constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightConfig {
    /// Delay between submit and landing.
    pub flight_ms: u64,
    /// Maximum number of landed points kept.
    pub landed_cap: usize,
    /// Destinations are sampled in `[-lat_extent, lat_extent)`.
    pub lat_extent: f64,
    /// Destinations are sampled in `[-lng_extent, lng_extent)`.
    pub lng_extent: f64,
    pub arc_altitude_min: f64,
    pub arc_altitude_span: f64,
    pub point_radius: f64,
    pub default_messages: Vec<String>,
    pub default_location: LatLng,
}

/// Cosmetic UI delays.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiTiming {
    /// How long the send button shows the pending label.
    pub submit_pending_ms: u64,
    /// How long the send button shows the confirmation label.
    pub submit_confirm_ms: u64,
    pub tooltip_ms: u64,
    pub focus_delay_ms: u64,
}

impl Default for UiTiming {
    fn default() -> Self {
        Self {
            submit_pending_ms: 300,
            submit_confirm_ms: 1_000,
            tooltip_ms: 3_000,
            focus_delay_ms: 800,
        }
    }
}

/// Remote message store settings. Absent means submissions stay local.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistenceSettings {
    pub project_id: String,
    pub api_key: String,
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_collection() -> String {
    "messages".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobeConfig {
    pub variant: Variant,
    pub palette: Palette,
    pub flight: FlightConfig,
    pub ui: UiTiming,
    pub camera: CameraConfig,
    pub picking: PickConfig,
    pub globe: GlobeFrame,
    pub overlay: FeedStyle,
    pub scene: SceneSettings,
    #[serde(default)]
    pub persistence: Option<PersistenceSettings>,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self::for_variant(Variant::Flagship)
    }
}

impl GlobeConfig {
    pub fn for_variant(variant: Variant) -> Self {
        let flagship_flight = FlightConfig {
            flight_ms: 2_500,
            landed_cap: 40,
            lat_extent: 60.0,
            lng_extent: 170.0,
            arc_altitude_min: 0.08,
            arc_altitude_span: 0.12,
            point_radius: 0.25,
            default_messages: DEFAULT_MESSAGES.iter().map(|m| m.to_string()).collect(),
            default_location: DEFAULT_LOCATION,
        };

        match variant {
            Variant::Flagship => Self {
                variant,
                palette: Palette::flagship(),
                flight: flagship_flight,
                ui: UiTiming::default(),
                camera: CameraConfig::default(),
                picking: PickConfig::default(),
                globe: GlobeFrame::default(),
                overlay: FeedStyle::default(),
                scene: SceneSettings::default(),
                persistence: None,
            },
            Variant::Aurora => Self {
                variant,
                palette: Palette::aurora(),
                flight: FlightConfig {
                    flight_ms: 3_000,
                    landed_cap: 50,
                    lat_extent: 70.0,
                    lng_extent: 175.0,
                    point_radius: 0.35,
                    ..flagship_flight
                },
                ui: UiTiming::default(),
                camera: CameraConfig {
                    start_distance: 400.0,
                    auto_rotate_speed: 0.15,
                    ..CameraConfig::default()
                },
                picking: PickConfig { tolerance_deg: 18.0 },
                globe: GlobeFrame::default(),
                overlay: FeedStyle::default(),
                scene: SceneSettings::default(),
                persistence: None,
            },
            Variant::Ember => Self {
                variant,
                palette: Palette::ember(),
                flight: FlightConfig {
                    flight_ms: 4_000,
                    landed_cap: 45,
                    lat_extent: 80.0,
                    lng_extent: 180.0,
                    arc_altitude_min: 0.12,
                    arc_altitude_span: 0.18,
                    ..flagship_flight
                },
                ui: UiTiming {
                    tooltip_ms: 4_000,
                    ..UiTiming::default()
                },
                camera: CameraConfig {
                    fov_deg: 45.0,
                    start_distance: 360.0,
                    min_distance: 280.0,
                    ..CameraConfig::default()
                },
                picking: PickConfig { tolerance_deg: 20.0 },
                globe: GlobeFrame::default(),
                overlay: FeedStyle::default(),
                scene: SceneSettings::default(),
                persistence: None,
            },
        }
    }

    /// Parses a JSON override document.
    ///
    /// An optional `"variant"` key picks the preset (unknown names fall back
    /// to the flagship preset); remaining keys are merged over it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut overrides: Value =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let Some(obj) = overrides.as_object_mut() else {
            return Err(ConfigError::Parse("expected a JSON object".to_string()));
        };

        let variant = match obj.remove("variant") {
            None | Some(Value::Null) => Variant::Flagship,
            Some(Value::String(name)) => Variant::from_name(&name).unwrap_or_else(|| {
                tracing::warn!(variant = %name, "unknown variant; using flagship");
                Variant::Flagship
            }),
            Some(_) => {
                return Err(ConfigError::Invalid {
                    field: "variant",
                    reason: "must be a string",
                });
            }
        };

        let mut merged = serde_json::to_value(Self::for_variant(variant))
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        merge_json(&mut merged, overrides);

        let config: GlobeConfig =
            serde_json::from_value(merged).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        tracing::debug!(variant = ?config.variant, "config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let flight = &self.flight;
        if flight.landed_cap == 0 {
            return Err(ConfigError::Invalid {
                field: "flight.landedCap",
                reason: "must be at least 1",
            });
        }
        if flight.default_messages.is_empty()
            || flight.default_messages.iter().any(|m| m.trim().is_empty())
        {
            return Err(ConfigError::Invalid {
                field: "flight.defaultMessages",
                reason: "must contain only non-empty messages",
            });
        }
        if !(flight.lat_extent > 0.0 && flight.lat_extent <= 90.0) {
            return Err(ConfigError::Invalid {
                field: "flight.latExtent",
                reason: "must be in (0, 90]",
            });
        }
        if !(flight.lng_extent > 0.0 && flight.lng_extent <= 180.0) {
            return Err(ConfigError::Invalid {
                field: "flight.lngExtent",
                reason: "must be in (0, 180]",
            });
        }
        if flight.arc_altitude_min < 0.0 || flight.arc_altitude_span < 0.0 {
            return Err(ConfigError::Invalid {
                field: "flight.arcAltitudeMin",
                reason: "arc altitude must not be negative",
            });
        }
        if !(self.globe.radius > 0.0) {
            return Err(ConfigError::Invalid {
                field: "globe.radius",
                reason: "must be positive",
            });
        }
        if !(self.picking.tolerance_deg > 0.0) {
            return Err(ConfigError::Invalid {
                field: "picking.toleranceDeg",
                reason: "must be positive",
            });
        }
        if self.camera.min_distance > self.camera.max_distance {
            return Err(ConfigError::Invalid {
                field: "camera.minDistance",
                reason: "must not exceed camera.maxDistance",
            });
        }
        if self.camera.min_polar_rad > self.camera.max_polar_rad {
            return Err(ConfigError::Invalid {
                field: "camera.minPolarRad",
                reason: "must not exceed camera.maxPolarRad",
            });
        }
        Ok(())
    }

    /// Lifecycle settings, with arc/point colors taken from the palette.
    pub fn lifecycle(&self) -> LifecycleConfig {
        LifecycleConfig {
            flight_ms: self.flight.flight_ms,
            landed_cap: self.flight.landed_cap,
            lat_extent: self.flight.lat_extent,
            lng_extent: self.flight.lng_extent,
            arc_altitude_min: self.flight.arc_altitude_min,
            arc_altitude_span: self.flight.arc_altitude_span,
            arc_color: self.palette.arc.clone(),
            point_radius: self.flight.point_radius,
            point_color: self.palette.point.clone(),
            default_messages: self.flight.default_messages.clone(),
            default_location: self.flight.default_location,
        }
    }
}

fn merge_json(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, GlobeConfig, Variant};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_is_flagship() {
        let config = GlobeConfig::from_json("{}").unwrap();
        assert_eq!(config, GlobeConfig::default());
        assert_eq!(config.flight.flight_ms, 2_500);
        assert_eq!(config.flight.landed_cap, 40);
        assert_eq!(config.picking.tolerance_deg, 15.0);
    }

    #[test]
    fn variant_selects_preset() {
        let config = GlobeConfig::from_json(r#"{ "variant": "Aurora" }"#).unwrap();
        assert_eq!(config, GlobeConfig::for_variant(Variant::Aurora));
    }

    #[test]
    fn unknown_variant_falls_back_to_flagship() {
        let config = GlobeConfig::from_json(r#"{ "variant": "neon" }"#).unwrap();
        assert_eq!(config.variant, Variant::Flagship);
    }

    #[test]
    fn nested_overrides_keep_other_fields() {
        let config = GlobeConfig::from_json(
            r#"{ "variant": "ember", "flight": { "landedCap": 12 }, "palette": { "arc": "red" } }"#,
        )
        .unwrap();
        let preset = GlobeConfig::for_variant(Variant::Ember);
        assert_eq!(config.flight.landed_cap, 12);
        assert_eq!(config.flight.flight_ms, preset.flight.flight_ms);
        assert_eq!(config.palette.arc, "red");
        assert_eq!(config.palette.point, preset.palette.point);
        assert_eq!(config.lifecycle().arc_color, "red");
    }

    #[test]
    fn persistence_block_is_parsed_with_default_collection() {
        let config = GlobeConfig::from_json(
            r#"{ "persistence": { "projectId": "demo", "apiKey": "k" } }"#,
        )
        .unwrap();
        let persistence = config.persistence.expect("persistence");
        assert_eq!(persistence.project_id, "demo");
        assert_eq!(persistence.collection, "messages");
    }

    #[test]
    fn rejects_zero_cap_and_empty_defaults() {
        let err = GlobeConfig::from_json(r#"{ "flight": { "landedCap": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "flight.landedCap", .. }));

        let err =
            GlobeConfig::from_json(r#"{ "flight": { "defaultMessages": [] } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "flight.defaultMessages", .. }));
    }

    #[test]
    fn rejects_inverted_camera_range_and_bad_json() {
        let err = GlobeConfig::from_json(r#"{ "camera": { "minDistance": 900 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "camera.minDistance", .. }));

        assert!(matches!(
            GlobeConfig::from_json("[1, 2]"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GlobeConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn every_preset_validates() {
        for variant in [Variant::Flagship, Variant::Aurora, Variant::Ember] {
            GlobeConfig::for_variant(variant).validate().unwrap();
        }
    }
}
