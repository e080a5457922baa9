use serde::{Deserialize, Serialize};

/// Wall-clock-like timestamp in milliseconds.
///
/// The host decides the epoch (the browser app uses `performance.now()`); everything
/// downstream only compares and offsets values, so tests can run on a
/// virtual clock starting at zero.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    /// Converts a JS-style floating point millisecond value, clamping
    /// negatives and NaN to zero.
    pub fn from_f64(ms: f64) -> Self {
        if ms.is_nan() || ms <= 0.0 {
            Millis(0)
        } else {
            Millis(ms as u64)
        }
    }

    pub fn offset(self, delay_ms: u64) -> Self {
        Millis(self.0.saturating_add(delay_ms))
    }

    pub fn saturating_since(self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::fmt::Display for Millis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Time in seconds, used by frame timing.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Time(pub f64);
