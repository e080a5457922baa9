use foundation::math::precision::stable_total_cmp_f64;
use foundation::math::{LatLng, Sphere, Vec3, lat_lng_to_surface, surface_to_lat_lng};
use serde::{Deserialize, Serialize};

use crate::camera::{OrbitCamera, Viewport};
use crate::records::PointRecord;

/// Placement of the globe mesh in the scene.
///
/// The overlay applies `rotation_y` and then `rotation_z` in the object's
/// local frame, so `world = Ry * Rz * local`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobeFrame {
    pub radius: f64,
    pub rotation_y: f64,
    pub rotation_z: f64,
}

impl Default for GlobeFrame {
    fn default() -> Self {
        Self {
            radius: 100.0,
            rotation_y: -std::f64::consts::PI * (5.0 / 9.0),
            rotation_z: -std::f64::consts::FRAC_PI_6,
        }
    }
}

impl GlobeFrame {
    pub fn sphere(&self) -> Sphere {
        Sphere::new(Vec3::ZERO, self.radius)
    }

    pub fn to_local(&self, world: Vec3) -> Vec3 {
        world.rotate_y(-self.rotation_y).rotate_z(-self.rotation_z)
    }

    pub fn to_world(&self, local: Vec3) -> Vec3 {
        local.rotate_z(self.rotation_z).rotate_y(self.rotation_y)
    }

    /// Geographic coordinate under a world-space point on the globe.
    pub fn lat_lng_at(&self, world: Vec3) -> LatLng {
        surface_to_lat_lng(self.to_local(world), self.radius)
    }

    /// World-space position of a geographic coordinate.
    pub fn world_at(&self, at: LatLng, altitude: f64) -> Vec3 {
        self.to_world(lat_lng_to_surface(at, self.radius, altitude))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickConfig {
    /// Planar degree distance under which a landed point counts as clicked.
    pub tolerance_deg: f64,
}

impl Default for PickConfig {
    fn default() -> Self {
        Self {
            tolerance_deg: 15.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceHit {
    pub world: Vec3,
    pub lat_lng: LatLng,
    pub distance: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MessagePick<'a> {
    pub point: &'a PointRecord,
    pub surface: LatLng,
    pub distance_deg: f64,
}

/// Ray cast from a pointer position onto the globe sphere.
pub fn pick_surface(
    camera: &OrbitCamera,
    viewport: &Viewport,
    client_x: f64,
    client_y: f64,
    globe: &GlobeFrame,
) -> Option<SurfaceHit> {
    let ndc = viewport.to_ndc(client_x, client_y)?;
    let ray = camera.ray_through(ndc, viewport.aspect())?;
    let (distance, world) = globe.sphere().intersect(ray)?;
    Some(SurfaceHit {
        world,
        lat_lng: globe.lat_lng_at(world),
        distance,
    })
}

/// Closest landed point strictly within `tolerance_deg` of `at`.
///
/// Linear scan with a running minimum over planar degree distance; on a tie
/// the earlier (older) point wins.
pub fn nearest_landed<'a, I>(points: I, at: LatLng, tolerance_deg: f64) -> Option<(&'a PointRecord, f64)>
where
    I: IntoIterator<Item = &'a PointRecord>,
{
    let mut best: Option<(&PointRecord, f64)> = None;
    for point in points {
        let dist = point.position.planar_degrees_to(at);
        if !(dist < tolerance_deg) {
            continue;
        }
        best = match best {
            Some((_, best_dist)) if !stable_total_cmp_f64(dist, best_dist).is_lt() => best,
            _ => Some((point, dist)),
        };
    }
    best
}

/// Pointer position to the landed message under it, if any.
pub fn pick_message<'a, I>(
    camera: &OrbitCamera,
    viewport: &Viewport,
    client_x: f64,
    client_y: f64,
    globe: &GlobeFrame,
    points: I,
    config: &PickConfig,
) -> Option<MessagePick<'a>>
where
    I: IntoIterator<Item = &'a PointRecord>,
{
    let hit = pick_surface(camera, viewport, client_x, client_y, globe)?;
    let (point, distance_deg) = nearest_landed(points, hit.lat_lng, config.tolerance_deg)?;
    Some(MessagePick {
        point,
        surface: hit.lat_lng,
        distance_deg,
    })
}
