//! Orbit camera around the globe center.
//!
//! Spherical coordinates `(radius, theta, phi)` about the origin: `theta` is
//! the azimuth from +Z toward +X, `phi` the polar angle from +Y. Input
//! accumulates into a pending delta that is applied with exponential damping
//! in [`OrbitCamera::update`], which also applies auto-rotation.

use foundation::math::{Ray, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Keeps `phi` away from the poles where the basis degenerates.
const POLAR_EPS: f64 = 1.0e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraConfig {
    pub fov_deg: f64,
    pub near: f64,
    pub far: f64,
    /// Initial distance from the globe center along +Z.
    pub start_distance: f64,
    pub damping: f64,
    pub rotate_speed: f64,
    pub zoom_speed: f64,
    pub enable_zoom: bool,
    pub min_distance: f64,
    pub max_distance: f64,
    pub auto_rotate: bool,
    /// Full turns per minute at 1.0 (overlay convention: 30 s per orbit at 2.0).
    pub auto_rotate_speed: f64,
    pub min_polar_rad: f64,
    pub max_polar_rad: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 40.0,
            near: 1.0,
            far: 2_000.0,
            start_distance: 380.0,
            damping: 0.02,
            rotate_speed: 0.3,
            zoom_speed: 0.4,
            enable_zoom: true,
            min_distance: 300.0,
            max_distance: 500.0,
            auto_rotate: true,
            auto_rotate_speed: 0.08,
            min_polar_rad: std::f64::consts::FRAC_PI_3,
            max_polar_rad: std::f64::consts::PI - std::f64::consts::FRAC_PI_3,
        }
    }
}

/// Canvas rectangle in client pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn aspect(&self) -> f64 {
        if self.height <= 0.0 {
            1.0
        } else {
            (self.width / self.height).max(1e-6)
        }
    }

    /// Client coordinates to normalized device coordinates (+Y up).
    pub fn to_ndc(&self, client_x: f64, client_y: f64) -> Option<Vec2> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            ((client_x - self.left) / self.width) * 2.0 - 1.0,
            -((client_y - self.top) / self.height) * 2.0 + 1.0,
        ))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1280.0, 720.0)
    }
}

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    config: CameraConfig,
    radius: f64,
    theta: f64,
    phi: f64,
    delta_theta: f64,
    delta_phi: f64,
    scale: f64,
    dragging: bool,
    last_pointer: Vec2,
}

impl OrbitCamera {
    pub fn new(config: CameraConfig) -> Self {
        let radius = config
            .start_distance
            .clamp(config.min_distance, config.max_distance);
        let phi = std::f64::consts::FRAC_PI_2.clamp(config.min_polar_rad, config.max_polar_rad);
        Self {
            config,
            radius,
            theta: 0.0,
            phi,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            dragging: false,
            last_pointer: Vec2::new(0.0, 0.0),
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn distance(&self) -> f64 {
        self.radius
    }

    pub fn azimuth(&self) -> f64 {
        self.theta
    }

    pub fn polar(&self) -> f64 {
        self.phi
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn on_pointer_down(&mut self, x_px: f64, y_px: f64) {
        self.dragging = true;
        self.last_pointer = Vec2::new(x_px, y_px);
    }

    /// Drag rotation; a full viewport height of travel is one turn at speed 1.
    pub fn on_pointer_move(&mut self, x_px: f64, y_px: f64, viewport: &Viewport) {
        if !self.dragging {
            return;
        }
        let now = Vec2::new(x_px, y_px);
        let delta = now - self.last_pointer;
        self.last_pointer = now;

        let height = viewport.height.max(1.0);
        let turn = std::f64::consts::TAU * self.config.rotate_speed;
        self.delta_theta -= turn * delta.x / height;
        self.delta_phi -= turn * delta.y / height;
    }

    pub fn on_pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Wheel zoom: negative `delta_y` moves closer.
    pub fn on_wheel(&mut self, delta_y: f64) {
        if !self.config.enable_zoom || delta_y == 0.0 {
            return;
        }
        let step = 0.95f64.powf(self.config.zoom_speed);
        if delta_y < 0.0 {
            self.scale *= step;
        } else {
            self.scale /= step;
        }
    }

    /// Advances damping and auto-rotation by `dt_s` seconds.
    pub fn update(&mut self, dt_s: f64) {
        if self.config.auto_rotate && !self.dragging {
            self.delta_theta -=
                std::f64::consts::TAU / 60.0 * self.config.auto_rotate_speed * dt_s.max(0.0);
        }

        let damping = self.config.damping.clamp(0.0, 1.0);
        self.theta += self.delta_theta * damping;
        self.phi += self.delta_phi * damping;
        self.delta_theta *= 1.0 - damping;
        self.delta_phi *= 1.0 - damping;

        let lo = self.config.min_polar_rad.max(POLAR_EPS);
        let hi = self.config.max_polar_rad.min(std::f64::consts::PI - POLAR_EPS);
        self.phi = self.phi.clamp(lo, hi);

        self.radius = (self.radius * self.scale)
            .clamp(self.config.min_distance, self.config.max_distance);
        self.scale = 1.0;
    }

    pub fn eye(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }

    /// World-space ray through a point in normalized device coordinates.
    pub fn ray_through(&self, ndc: Vec2, aspect: f64) -> Option<Ray> {
        let eye = self.eye();
        let forward = (-eye).normalized()?;
        let right = forward.cross(Vec3::Y).normalized()?;
        let up = right.cross(forward);

        let tan_half = (self.config.fov_deg.to_radians() * 0.5).tan();
        let dir = forward + right * (ndc.x * tan_half * aspect) + up * (ndc.y * tan_half);
        Some(Ray::new(eye, dir.normalized()?))
    }
}
