//! Renderer, lighting and globe-material settings handed to the overlay once
//! at startup.

use serde::{Deserialize, Serialize};

use crate::config::GlobeConfig;
use crate::feed::FeedStyle;
use crate::palette::Palette;
use crate::picking::GlobeFrame;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererSettings {
    pub antialias: bool,
    pub max_pixel_ratio: f64,
    pub tone_mapping_exposure: f64,
    pub logarithmic_depth_buffer: bool,
    pub soft_shadows: bool,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            antialias: true,
            max_pixel_ratio: 3.0,
            tone_mapping_exposure: 1.0,
            logarithmic_depth_buffer: true,
            soft_shadows: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HemisphereLight {
    pub sky: String,
    pub ground: String,
    pub intensity: f64,
    pub position: [f64; 3],
}

/// Directional light parented to the camera; `position` is camera-relative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub color: String,
    pub intensity: f64,
    pub position: [f64; 3],
}

impl DirectionalLight {
    fn white(intensity: f64, position: [f64; 3]) -> Self {
        Self {
            color: "#ffffff".to_string(),
            intensity,
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lighting {
    pub hemisphere: HemisphereLight,
    pub key: DirectionalLight,
    pub fill: DirectionalLight,
    pub rim: DirectionalLight,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            hemisphere: HemisphereLight {
                sky: "#ffffff".to_string(),
                ground: "#080808".to_string(),
                intensity: 0.3,
                position: [0.0, 200.0, 0.0],
            },
            key: DirectionalLight::white(0.5, [-250.0, 350.0, 250.0]),
            fill: DirectionalLight::white(0.08, [200.0, -50.0, 200.0]),
            rim: DirectionalLight::white(0.06, [0.0, 100.0, -350.0]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobeMaterial {
    pub emissive_intensity: f64,
    pub shininess: f64,
    pub flat_shading: bool,
}

impl Default for GlobeMaterial {
    fn default() -> Self {
        Self {
            emissive_intensity: 0.02,
            shininess: 5.0,
            flat_shading: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSettings {
    pub renderer: RendererSettings,
    pub lighting: Lighting,
    pub material: GlobeMaterial,
    pub polygon_altitude: f64,
    pub show_atmosphere: bool,
    pub atmosphere_altitude: f64,
    pub animate_in: bool,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            renderer: RendererSettings::default(),
            lighting: Lighting::default(),
            material: GlobeMaterial::default(),
            polygon_altitude: 0.002,
            show_atmosphere: true,
            atmosphere_altitude: 0.15,
            animate_in: true,
        }
    }
}

/// Everything the overlay needs to build the scene, in one payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneBootstrap {
    pub palette: Palette,
    pub scene: SceneSettings,
    pub globe: GlobeFrame,
    pub overlay: FeedStyle,
    pub fov_deg: f64,
    pub near: f64,
    pub far: f64,
}

impl SceneBootstrap {
    pub fn from_config(config: &GlobeConfig) -> Self {
        Self {
            palette: config.palette.clone(),
            scene: config.scene.clone(),
            globe: config.globe,
            overlay: config.overlay.clone(),
            fov_deg: config.camera.fov_deg,
            near: config.camera.near,
            far: config.camera.far,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SceneBootstrap, SceneSettings};
    use crate::config::{GlobeConfig, Variant};

    #[test]
    fn default_lighting_matches_studio_rig() {
        let s = SceneSettings::default();
        assert_eq!(s.lighting.hemisphere.intensity, 0.3);
        assert_eq!(s.lighting.key.position, [-250.0, 350.0, 250.0]);
        assert_eq!(s.lighting.fill.intensity, 0.08);
        assert_eq!(s.lighting.rim.position, [0.0, 100.0, -350.0]);
        assert_eq!(s.renderer.max_pixel_ratio, 3.0);
    }

    #[test]
    fn bootstrap_serializes_camel_case() {
        let boot = SceneBootstrap::from_config(&GlobeConfig::for_variant(Variant::Aurora));
        let json = serde_json::to_value(&boot).unwrap();
        assert_eq!(json["fovDeg"], 40.0);
        assert_eq!(json["scene"]["atmosphereAltitude"], 0.15);
        assert_eq!(json["scene"]["renderer"]["maxPixelRatio"], 3.0);
        assert_eq!(json["scene"]["material"]["emissiveIntensity"], 0.02);
        assert_eq!(json["palette"]["atmosphere"], "#2dd4bf");
    }

    #[test]
    fn settings_round_trip_through_config_json() {
        let cfg = GlobeConfig::from_json(r#"{"scene":{"showAtmosphere":false}}"#).unwrap();
        assert!(!cfg.scene.show_atmosphere);
        assert_eq!(cfg.scene.polygon_altitude, 0.002);
    }
}
