//! Spherical globe geometry.
//!
//! Convention (matches the overlay's polar-to-cartesian mapping): +Y is the
//! north pole, (lat 0, lng 0) lies on +Z and (lat 0, lng 90) on +X.

use serde::{Deserialize, Serialize};

use super::Vec3;

/// Geographic coordinate in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Planar distance in degrees, `sqrt(dlat^2 + dlng^2)`.
    ///
    /// Longitudes are not wrapped at the antimeridian.
    pub fn planar_degrees_to(self, other: LatLng) -> f64 {
        let dlat = self.lat - other.lat;
        let dlng = self.lng - other.lng;
        (dlat * dlat + dlng * dlng).sqrt()
    }
}

/// Point on (or `altitude` radii above) a sphere of `radius`.
pub fn lat_lng_to_surface(at: LatLng, radius: f64, altitude: f64) -> Vec3 {
    let r = radius * (1.0 + altitude);
    let lat = at.lat.to_radians();
    let lng = at.lng.to_radians();
    Vec3::new(
        r * lat.cos() * lng.sin(),
        r * lat.sin(),
        r * lat.cos() * lng.cos(),
    )
}

/// Inverse projection of a point on a sphere of `radius` centered at the origin.
///
/// `y / radius` is clamped to `[-1, 1]` so points hit slightly above the
/// surface (polygon caps, rounding) still map to a valid latitude.
pub fn surface_to_lat_lng(point: Vec3, radius: f64) -> LatLng {
    let sin_lat = (point.y / radius).clamp(-1.0, 1.0);
    LatLng::new(
        sin_lat.asin().to_degrees(),
        point.x.atan2(point.z).to_degrees(),
    )
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir * t
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// First intersection at `t >= 0` along the (normalized) ray.
    ///
    /// A ray starting inside the sphere reports the exit point.
    pub fn intersect(&self, ray: Ray) -> Option<(f64, Vec3)> {
        let dir = ray.dir.normalized()?;
        let oc = ray.origin - self.center;
        let b = oc.dot(dir);
        let c = oc.dot(oc) - self.radius * self.radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        let near = -b - sq;
        let far = -b + sq;
        let t = if near >= 0.0 {
            near
        } else if far >= 0.0 {
            far
        } else {
            return None;
        };
        Some((t, ray.origin + dir * t))
    }
}
