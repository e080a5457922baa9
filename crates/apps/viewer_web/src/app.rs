//! Host-independent application state: everything the browser bindings
//! drive, minus the DOM and the overlay itself.

use foundation::Millis;
use foundation::math::{LatLng, Vec3};
use globe::camera::{OrbitCamera, Viewport};
use globe::interaction::{ButtonView, Interaction, StatsView, TooltipView, UiUpdate};
use globe::picking::pick_message;
use globe::{GlobeConfig, LifecycleEvent, MessageLifecycle, OverlayFeed, OverlaySink};
use rand::rngs::StdRng;
use runtime::{Frame, FrameClock};
use store::{MessageRecord, MessageStore, StoreError};

/// What the page must reflect after a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub button: ButtonView,
    pub stats: Option<StatsView>,
    /// Hand this to the message store; the animation does not wait for it.
    pub record: MessageRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub frame: Frame,
    pub eye: Vec3,
    pub stats: Option<StatsView>,
    pub ui: Vec<UiUpdate>,
}

#[derive(Debug)]
pub struct GlobeApp {
    config: GlobeConfig,
    lifecycle: MessageLifecycle,
    feed: OverlayFeed,
    ui: Interaction,
    camera: OrbitCamera,
    viewport: Viewport,
    clock: FrameClock,
    rng: StdRng,
}

impl GlobeApp {
    pub fn new(config: GlobeConfig, rng: StdRng) -> Self {
        Self {
            lifecycle: MessageLifecycle::new(config.lifecycle()),
            feed: OverlayFeed::new(config.overlay.clone()),
            ui: Interaction::new(config.ui),
            camera: OrbitCamera::new(config.camera.clone()),
            viewport: Viewport::default(),
            clock: FrameClock::default(),
            rng,
            config,
        }
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> &MessageLifecycle {
        &self.lifecycle
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn button(&self) -> ButtonView {
        self.ui.button()
    }

    pub fn stats(&self) -> StatsView {
        self.lifecycle.counters().into()
    }

    /// Publishes the initial (empty) layers and schedules input focus.
    pub fn boot(&mut self, now: Millis, sink: &mut impl OverlaySink) {
        self.feed.sync_all(&self.lifecycle, sink);
        self.ui.schedule_focus(now);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resolve_user_location(&mut self, at: LatLng) -> bool {
        self.lifecycle.resolve_user_location(at)
    }

    pub fn submit(&mut self, text: &str, now: Millis, sink: &mut impl OverlaySink) -> SubmitOutcome {
        let submission = self.lifecycle.submit(text, now, &mut self.rng);
        let record = MessageRecord::from(&submission.record);
        let button = self.ui.begin_submit(now);
        let stats = self.flush(sink);
        SubmitOutcome {
            button,
            stats,
            record,
        }
    }

    /// One display refresh: due timers, camera motion, overlay sync.
    pub fn frame(&mut self, timestamp_ms: f64, sink: &mut impl OverlaySink) -> FrameOutcome {
        let frame = self.clock.tick(timestamp_ms);
        let now = Millis::from_f64(timestamp_ms);

        let landed = self.lifecycle.advance_to(now);
        if !landed.is_empty() {
            tracing::trace!(count = landed.len(), "messages landed");
        }
        let stats = self.flush(sink);
        let ui = self.ui.advance_to(now);
        self.camera.update(frame.dt_s);

        FrameOutcome {
            frame,
            eye: self.camera.eye(),
            stats,
            ui,
        }
    }

    /// Shows the landed message under the pointer, if any.
    pub fn click(&mut self, client_x: f64, client_y: f64, now: Millis) -> Option<TooltipView> {
        let pick = pick_message(
            &self.camera,
            &self.viewport,
            client_x,
            client_y,
            &self.config.globe,
            self.lifecycle.landed(),
            &self.config.picking,
        )?;
        let message = pick.point.message.clone();
        tracing::debug!(distance_deg = pick.distance_deg, "picked landed message");
        Some(self.ui.show_tooltip(&message, client_x, client_y, now))
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.camera.on_pointer_down(x, y);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.camera.on_pointer_move(x, y, &self.viewport);
    }

    pub fn pointer_up(&mut self) {
        self.camera.on_pointer_up();
    }

    pub fn wheel(&mut self, delta_y: f64) {
        self.camera.on_wheel(delta_y);
    }

    fn flush(&mut self, sink: &mut impl OverlaySink) -> Option<StatsView> {
        let events = self.lifecycle.drain_events();
        if events.is_empty() {
            return None;
        }
        self.feed.sync(&self.lifecycle, &events, sink);
        events.iter().rev().find_map(|event| match event.kind {
            LifecycleEvent::StatsChanged(counters) => Some(counters.into()),
            _ => None,
        })
    }
}

/// Persists a submitted message. A failed write is logged and returned; the
/// caller never rolls back the animation, so the arc keeps flying and lands
/// on schedule.
pub async fn save_submission(
    store: &impl MessageStore,
    record: &MessageRecord,
) -> Result<String, StoreError> {
    let result = store.save(record).await;
    if let Err(err) = &result {
        tracing::warn!(error = %err, text = %record.text, "message not persisted; animation continues");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::{GlobeApp, save_submission};
    use foundation::Millis;
    use globe::GlobeConfig;
    use globe::camera::Viewport;
    use globe::feed::{ArcLayer, PointLayer};
    use globe::interaction::{CONFIRMED_LABEL, PENDING_LABEL, UiUpdate};
    use globe::OverlaySink;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use store::{InMemoryMessageStore, StoreError};

    #[derive(Default)]
    struct Sink {
        arcs: Vec<ArcLayer>,
        points: Vec<PointLayer>,
    }

    impl OverlaySink for Sink {
        fn set_arcs(&mut self, layer: &ArcLayer) {
            self.arcs.push(layer.clone());
        }

        fn set_points(&mut self, layer: &PointLayer) {
            self.points.push(layer.clone());
        }
    }

    fn app() -> GlobeApp {
        GlobeApp::new(GlobeConfig::default(), StdRng::seed_from_u64(11))
    }

    #[test]
    fn boot_publishes_empty_layers() {
        let mut app = app();
        let mut sink = Sink::default();
        app.boot(Millis(0), &mut sink);
        assert_eq!(sink.arcs.len(), 1);
        assert!(sink.arcs[0].data.is_empty());
        assert_eq!(sink.points.len(), 1);
    }

    #[test]
    fn submit_then_frames_land_the_message() {
        let mut app = app();
        let mut sink = Sink::default();
        let out = app.submit("  hello  ", Millis(1_000), &mut sink);

        assert_eq!(out.button.label, PENDING_LABEL);
        assert_eq!(out.record.text, "hello");
        let arc = app.lifecycle().in_flight().next().unwrap();
        assert_eq!(out.record.sender, arc.start);
        assert_eq!(out.record.destination, arc.end);
        assert_ne!(out.record.sender, out.record.destination);
        let stats = out.stats.unwrap();
        assert_eq!((stats.sent.as_str(), stats.in_transit.as_str()), ("1", "1"));
        assert_eq!(sink.arcs.last().unwrap().data.len(), 1);

        let mid = app.frame(1_300.0, &mut sink);
        assert_eq!(
            mid.ui,
            vec![UiUpdate::Button(globe::interaction::ButtonView {
                label: CONFIRMED_LABEL,
                disabled: true
            })]
        );
        assert!(mid.stats.is_none());

        let landed = app.frame(3_500.0, &mut sink);
        let stats = landed.stats.unwrap();
        assert_eq!((stats.sent.as_str(), stats.in_transit.as_str()), ("1", "0"));
        assert!(sink.arcs.last().unwrap().data.is_empty());
        assert_eq!(sink.points.last().unwrap().data[0].message, "hello");
    }

    #[test]
    fn failed_persistence_leaves_animation_untouched() {
        let mut app = app();
        let mut sink = Sink::default();
        let store = InMemoryMessageStore::new();
        store.fail_with(StoreError::Transport("offline".to_string()));

        let out = app.submit("lost in the mail", Millis(0), &mut sink);
        let before = app.lifecycle().counters();
        let in_flight_before = app.lifecycle().in_flight().count();

        let saved = pollster::block_on(save_submission(&store, &out.record));
        assert_eq!(saved, Err(StoreError::Transport("offline".to_string())));
        assert!(store.is_empty());
        assert_eq!(app.lifecycle().counters(), before);
        assert_eq!(app.lifecycle().in_flight().count(), in_flight_before);

        // Frames keep landing while the store is down.
        let landed = app.frame(2_500.0, &mut sink);
        let stats = landed.stats.unwrap();
        assert_eq!((stats.sent.as_str(), stats.in_transit.as_str()), ("1", "0"));
        assert_eq!(app.lifecycle().landed().len(), 1);
        assert_eq!(sink.points.last().unwrap().data[0].message, "lost in the mail");

        let next = app.submit("second try", Millis(2_600), &mut sink);
        assert!(pollster::block_on(save_submission(&store, &next.record)).is_err());
        app.frame(5_200.0, &mut sink);
        assert_eq!(app.lifecycle().landed().len(), 2);

        store.recover();
        let id = pollster::block_on(save_submission(&store, &next.record)).unwrap();
        let stored = store.saved();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);
        assert_eq!(stored[0].record, next.record);
    }

    #[test]
    fn click_on_empty_globe_shows_nothing() {
        let mut app = app();
        app.resize(Viewport::new(0.0, 0.0, 800.0, 600.0));
        assert!(app.click(400.0, 300.0, Millis(0)).is_none());
    }

    #[test]
    fn click_near_landed_point_shows_quoted_message() {
        let mut app = app();
        let mut sink = Sink::default();
        app.resize(Viewport::new(0.0, 0.0, 800.0, 600.0));
        app.submit("over here", Millis(0), &mut sink);
        app.frame(2_500.0, &mut sink);

        // Aim the pick at the landed point by projecting it back to the screen.
        let landed = app.lifecycle().landed().newest().unwrap().position;
        let world = app.config().globe.world_at(landed, 0.0);
        let Some((x, y)) = project(&app, world) else {
            // Far side of the globe: nothing to click.
            return;
        };
        let tooltip = app.click(x, y, Millis(2_600)).unwrap();
        assert_eq!(tooltip.text, "\"over here\"");
    }

    /// World point to client pixels for the app's current camera.
    fn project(app: &GlobeApp, world: foundation::math::Vec3) -> Option<(f64, f64)> {
        let eye = app.camera().eye();
        let forward = (foundation::math::Vec3::ZERO - eye).normalized()?;
        let right = forward.cross(foundation::math::Vec3::Y).normalized()?;
        let up = right.cross(forward);
        let rel = world - eye;
        let depth = rel.dot(forward);
        // Hidden behind the globe's limb.
        if rel.length() > (eye.length().powi(2) - 100.0f64.powi(2)).sqrt() {
            return None;
        }
        let half = (app.camera().config().fov_deg.to_radians() / 2.0).tan();
        let vp = app.viewport();
        let ndc_x = rel.dot(right) / (depth * half * vp.aspect());
        let ndc_y = rel.dot(up) / (depth * half);
        Some((
            vp.left + (ndc_x + 1.0) / 2.0 * vp.width,
            vp.top + (1.0 - ndc_y) / 2.0 * vp.height,
        ))
    }
}
