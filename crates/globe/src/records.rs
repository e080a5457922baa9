use foundation::Millis;
use foundation::math::LatLng;
use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ArcId(pub u64);

/// A message in flight. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcRecord {
    pub id: ArcId,
    pub start: LatLng,
    pub end: LatLng,
    /// Peak height as a fraction of the globe radius.
    pub altitude: f64,
    pub color: String,
    pub message: String,
    pub created_at: Millis,
}

/// A message that finished its flight, placed at the arc's destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointRecord {
    pub origin: ArcId,
    pub position: LatLng,
    pub message: String,
    pub created_at: Millis,
    pub radius: f64,
    pub color: String,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Counters {
    /// Monotonic; never decremented.
    pub sent: u64,
    /// Arcs currently in flight; floored at zero.
    pub in_transit: u64,
}

impl Counters {
    pub fn record_submit(&mut self) {
        self.sent += 1;
        self.in_transit += 1;
    }

    pub fn record_landing(&mut self) {
        self.in_transit = self.in_transit.saturating_sub(1);
    }
}

/// Sender location: a default until the device reports its position once.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UserLocation {
    current: LatLng,
    resolved: bool,
}

impl UserLocation {
    pub fn new(default: LatLng) -> Self {
        Self {
            current: default,
            resolved: false,
        }
    }

    pub fn get(&self) -> LatLng {
        self.current
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Accepts the first reported position; later reports are ignored.
    pub fn resolve(&mut self, at: LatLng) -> bool {
        if self.resolved {
            return false;
        }
        self.current = at;
        self.resolved = true;
        true
    }
}
