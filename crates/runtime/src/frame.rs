use foundation::time::Time;

/// Render-loop tick metadata.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Seconds since the previous frame.
    pub dt_s: f64,
    /// Seconds since the first frame.
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }
}

/// Turns display-refresh timestamps into [`Frame`]s.
///
/// `dt` is clamped so a backgrounded tab resuming does not produce one huge
/// step for damping and auto-rotation.
#[derive(Debug, Clone)]
pub struct FrameClock {
    max_dt_s: f64,
    start_ms: Option<f64>,
    last_ms: Option<f64>,
    index: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl FrameClock {
    pub fn new(max_dt_s: f64) -> Self {
        Self {
            max_dt_s,
            start_ms: None,
            last_ms: None,
            index: 0,
        }
    }

    pub fn tick(&mut self, timestamp_ms: f64) -> Frame {
        let start = *self.start_ms.get_or_insert(timestamp_ms);
        let dt_s = match self.last_ms {
            Some(last) => ((timestamp_ms - last) / 1000.0).clamp(0.0, self.max_dt_s),
            None => 0.0,
        };
        self.last_ms = Some(timestamp_ms);

        let frame = Frame {
            index: self.index,
            dt_s,
            time: Time(((timestamp_ms - start) / 1000.0).max(0.0)),
        };
        self.index = self.index.wrapping_add(1);
        frame
    }
}
