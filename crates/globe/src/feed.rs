//! Projection of lifecycle state into overlay layer data.
//!
//! The overlay is always handed the full data set; there is no diffing.
//! Field names match the overlay's accessor names.

use runtime::Event;
use serde::{Deserialize, Serialize};

use crate::lifecycle::{LifecycleEvent, MessageLifecycle};
use crate::records::{ArcRecord, PointRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcDatum {
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
    pub arc_alt: f64,
    pub color: String,
    pub message: String,
}

impl From<&ArcRecord> for ArcDatum {
    fn from(arc: &ArcRecord) -> Self {
        Self {
            start_lat: arc.start.lat,
            start_lng: arc.start.lng,
            end_lat: arc.end.lat,
            end_lng: arc.end.lng,
            arc_alt: arc.altitude,
            color: arc.color.clone(),
            message: arc.message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointDatum {
    pub lat: f64,
    pub lng: f64,
    pub color: String,
    pub size: f64,
    pub message: String,
}

impl From<&PointRecord> for PointDatum {
    fn from(point: &PointRecord) -> Self {
        Self {
            lat: point.position.lat,
            lng: point.position.lng,
            color: point.color.clone(),
            size: point.radius,
            message: point.message.clone(),
        }
    }
}

/// Hairline dashed arcs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcStyle {
    pub stroke: f64,
    pub dash_length: f64,
    pub dash_gap: f64,
    pub dash_animate_ms: u64,
    pub transition_ms: u64,
}

impl Default for ArcStyle {
    fn default() -> Self {
        Self {
            stroke: 0.3,
            dash_length: 0.9,
            dash_gap: 4.0,
            dash_animate_ms: 1_500,
            transition_ms: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointStyle {
    pub altitude: f64,
    pub merge: bool,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            altitude: 0.005,
            merge: false,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedStyle {
    pub arc: ArcStyle,
    pub point: PointStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcLayer {
    pub data: Vec<ArcDatum>,
    pub style: ArcStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointLayer {
    pub data: Vec<PointDatum>,
    pub style: PointStyle,
}

/// Receiver of full layer data sets (the globe overlay in the browser).
pub trait OverlaySink {
    fn set_arcs(&mut self, layer: &ArcLayer);
    fn set_points(&mut self, layer: &PointLayer);
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    pub arcs: bool,
    pub points: bool,
}

#[derive(Debug, Default, Clone)]
pub struct OverlayFeed {
    style: FeedStyle,
}

impl OverlayFeed {
    pub fn new(style: FeedStyle) -> Self {
        Self { style }
    }

    pub fn arc_layer(&self, lifecycle: &MessageLifecycle) -> ArcLayer {
        ArcLayer {
            data: lifecycle.in_flight().map(ArcDatum::from).collect(),
            style: self.style.arc.clone(),
        }
    }

    pub fn point_layer(&self, lifecycle: &MessageLifecycle) -> PointLayer {
        PointLayer {
            data: lifecycle.landed().iter().map(PointDatum::from).collect(),
            style: self.style.point.clone(),
        }
    }

    /// Re-issues each layer named by `events` at most once.
    pub fn sync(
        &self,
        lifecycle: &MessageLifecycle,
        events: &[Event<LifecycleEvent>],
        sink: &mut impl OverlaySink,
    ) -> SyncSummary {
        let mut summary = SyncSummary::default();
        for event in events {
            match event.kind {
                LifecycleEvent::ArcsChanged => summary.arcs = true,
                LifecycleEvent::PointsChanged => summary.points = true,
                LifecycleEvent::StatsChanged(_) => {}
            }
        }
        if summary.arcs {
            sink.set_arcs(&self.arc_layer(lifecycle));
        }
        if summary.points {
            sink.set_points(&self.point_layer(lifecycle));
        }
        summary
    }

    /// Re-issues both layers unconditionally.
    pub fn sync_all(&self, lifecycle: &MessageLifecycle, sink: &mut impl OverlaySink) {
        sink.set_arcs(&self.arc_layer(lifecycle));
        sink.set_points(&self.point_layer(lifecycle));
    }
}

#[cfg(test)]
mod tests {
    use super::{ArcLayer, OverlayFeed, OverlaySink, PointLayer, SyncSummary};
    use crate::lifecycle::{LifecycleConfig, MessageLifecycle};
    use foundation::Millis;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[derive(Default)]
    struct RecordingSink {
        arcs: Vec<ArcLayer>,
        points: Vec<PointLayer>,
    }

    impl OverlaySink for RecordingSink {
        fn set_arcs(&mut self, layer: &ArcLayer) {
            self.arcs.push(layer.clone());
        }

        fn set_points(&mut self, layer: &PointLayer) {
            self.points.push(layer.clone());
        }
    }

    #[test]
    fn arc_datum_uses_overlay_field_names() {
        let mut lc = MessageLifecycle::new(LifecycleConfig::default());
        lc.submit("hi", Millis(0), &mut StdRng::seed_from_u64(1));
        let layer = OverlayFeed::default().arc_layer(&lc);

        let json = serde_json::to_value(&layer.data[0]).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["arcAlt", "color", "endLat", "endLng", "message", "startLat", "startLng"]
        );
        assert_eq!(json["message"], "hi");
        assert_eq!(json["color"], "rgba(255, 255, 255, 0.4)");

        let style = serde_json::to_value(&layer.style).unwrap();
        assert_eq!(style["dashGap"], 4.0);
        assert_eq!(style["dashAnimateMs"], 1500);
    }

    #[test]
    fn sync_reissues_only_changed_layers_once() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut lc = MessageLifecycle::new(LifecycleConfig::default());
        let feed = OverlayFeed::default();
        let mut sink = RecordingSink::default();

        lc.submit("a", Millis(0), &mut rng);
        lc.submit("b", Millis(1), &mut rng);
        let events = lc.drain_events();
        let summary = feed.sync(&lc, &events, &mut sink);
        assert_eq!(summary, SyncSummary { arcs: true, points: false });
        assert_eq!(sink.arcs.len(), 1);
        let msgs: Vec<_> = sink.arcs[0].data.iter().map(|a| a.message.as_str()).collect();
        assert_eq!(msgs, vec!["a", "b"]);

        lc.advance_to(Millis(2_500));
        let events = lc.drain_events();
        feed.sync(&lc, &events, &mut sink);
        assert_eq!(sink.arcs.len(), 2);
        assert_eq!(sink.arcs[1].data.len(), 1);
        assert_eq!(sink.points.len(), 1);
        assert_eq!(sink.points[0].data[0].message, "a");
        assert_eq!(sink.points[0].data[0].size, 0.25);
    }

    #[test]
    fn sync_all_is_idempotent() {
        let mut lc = MessageLifecycle::new(LifecycleConfig::default());
        lc.submit("a", Millis(0), &mut StdRng::seed_from_u64(1));
        let feed = OverlayFeed::default();
        let mut sink = RecordingSink::default();
        feed.sync_all(&lc, &mut sink);
        feed.sync_all(&lc, &mut sink);
        assert_eq!(sink.arcs[0], sink.arcs[1]);
        assert_eq!(sink.points[0], sink.points[1]);
        assert!(sink.points[0].data.is_empty());
    }
}
