//! Message lifecycle: `Submitted -> InTransit -> Landed -> (Pruned)`.
//!
//! `submit` creates an in-flight arc and schedules its expiry on a virtual
//! clock. `advance_to` (or a direct `expire`) turns the arc into a landed
//! point at the arc's destination. Landed points are pruned oldest-first
//! once the cap is reached.
//!
//! Invariants:
//! - `counters().in_transit == in_flight().count()` at every observation.
//! - `counters().sent` increases by exactly one per submit.
//! - every landed point comes from exactly one expired arc.

use foundation::Millis;
use foundation::math::LatLng;
use rand::Rng;
use rand::seq::SliceRandom;
use runtime::{Event, EventBus, TimerId, TimerQueue};

use crate::config::DEFAULT_MESSAGES;
use crate::landed::LandedPoints;
use crate::records::{ArcId, ArcRecord, Counters, PointRecord, UserLocation};

#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleConfig {
    pub flight_ms: u64,
    pub landed_cap: usize,
    pub lat_extent: f64,
    pub lng_extent: f64,
    pub arc_altitude_min: f64,
    pub arc_altitude_span: f64,
    pub arc_color: String,
    pub point_radius: f64,
    pub point_color: String,
    pub default_messages: Vec<String>,
    pub default_location: LatLng,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        crate::config::GlobeConfig::default().lifecycle()
    }
}

/// What changed; the host re-renders the matching overlay layer or display.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    ArcsChanged,
    PointsChanged,
    StatsChanged(Counters),
}

/// Handle returned by [`MessageLifecycle::submit`].
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub arc: ArcId,
    pub expiry: TimerId,
    pub due: Millis,
    /// Snapshot of the launched arc; `record.message` is the text actually
    /// sent (a default when the input was blank).
    pub record: ArcRecord,
}

#[derive(Debug)]
struct InFlight {
    record: ArcRecord,
    expiry: TimerId,
}

#[derive(Debug)]
pub struct MessageLifecycle {
    config: LifecycleConfig,
    user_location: UserLocation,
    next_arc: u64,
    in_flight: Vec<InFlight>,
    landed: LandedPoints,
    counters: Counters,
    expiries: TimerQueue<ArcId>,
    events: EventBus<LifecycleEvent>,
}

impl MessageLifecycle {
    pub fn new(config: LifecycleConfig) -> Self {
        Self {
            user_location: UserLocation::new(config.default_location),
            landed: LandedPoints::new(config.landed_cap),
            config,
            next_arc: 0,
            in_flight: Vec::new(),
            counters: Counters::default(),
            expiries: TimerQueue::new(),
            events: EventBus::new(),
        }
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn user_location(&self) -> LatLng {
        self.user_location.get()
    }

    /// In-flight arcs in submission order.
    pub fn in_flight(&self) -> impl Iterator<Item = &ArcRecord> + '_ {
        self.in_flight.iter().map(|f| &f.record)
    }

    pub fn arc(&self, id: ArcId) -> Option<&ArcRecord> {
        self.in_flight().find(|a| a.id == id)
    }

    pub fn landed(&self) -> &LandedPoints {
        &self.landed
    }

    pub fn pending_expiries(&self) -> usize {
        self.expiries.len()
    }

    pub fn next_expiry(&self) -> Option<Millis> {
        self.expiries.next_due()
    }

    pub fn drain_events(&mut self) -> Vec<Event<LifecycleEvent>> {
        self.events.drain()
    }

    /// Adopts the device position the first time it is reported.
    pub fn resolve_user_location(&mut self, at: LatLng) -> bool {
        let accepted = self.user_location.resolve(at);
        if accepted {
            tracing::debug!(lat = at.lat, lng = at.lng, "user location resolved");
        }
        accepted
    }

    /// Launches `text` (trimmed; a random default when blank) toward a
    /// random destination.
    pub fn submit<R: Rng + ?Sized>(&mut self, text: &str, now: Millis, rng: &mut R) -> Submission {
        let message = match text.trim() {
            "" => self.default_message(rng),
            trimmed => trimmed.to_string(),
        };

        let end = LatLng::new(
            (rng.r#gen::<f64>() - 0.5) * 2.0 * self.config.lat_extent,
            (rng.r#gen::<f64>() - 0.5) * 2.0 * self.config.lng_extent,
        );
        let altitude = self.config.arc_altitude_min + rng.r#gen::<f64>() * self.config.arc_altitude_span;

        let id = ArcId(self.next_arc);
        self.next_arc += 1;

        let record = ArcRecord {
            id,
            start: self.user_location.get(),
            end,
            altitude,
            color: self.config.arc_color.clone(),
            message,
            created_at: now,
        };
        let expiry = self.expiries.schedule_after(now, self.config.flight_ms, id);
        let due = now.offset(self.config.flight_ms);
        self.in_flight.push(InFlight {
            record: record.clone(),
            expiry,
        });
        self.counters.record_submit();

        tracing::debug!(arc = id.0, %due, lat = end.lat, lng = end.lng, "message launched");
        self.events.emit(now, LifecycleEvent::StatsChanged(self.counters));
        self.events.emit(now, LifecycleEvent::ArcsChanged);

        Submission {
            arc: id,
            expiry,
            due,
            record,
        }
    }

    /// Applies every expiry due at or before `now`, oldest first.
    pub fn advance_to(&mut self, now: Millis) -> Vec<PointRecord> {
        self.expiries
            .advance_to(now)
            .into_iter()
            .filter_map(|fired| self.land(fired.payload, fired.due))
            .collect()
    }

    /// Lands `arc` immediately. Unknown or already-landed arcs are a no-op.
    pub fn expire(&mut self, arc: ArcId, now: Millis) -> Option<PointRecord> {
        let expiry = self.in_flight.iter().find(|f| f.record.id == arc)?.expiry;
        self.expiries.cancel(expiry);
        self.land(arc, now)
    }

    /// Drops every pending expiry; arcs still in flight will never land.
    pub fn cancel_pending(&mut self) -> usize {
        let dropped = self.expiries.clear();
        if dropped > 0 {
            tracing::debug!(dropped, "pending landings canceled");
        }
        dropped
    }

    fn land(&mut self, arc: ArcId, at: Millis) -> Option<PointRecord> {
        let Some(idx) = self.in_flight.iter().position(|f| f.record.id == arc) else {
            tracing::trace!(arc = arc.0, "expiry for unknown arc ignored");
            return None;
        };
        let InFlight { record, .. } = self.in_flight.remove(idx);
        self.counters.record_landing();

        let point = PointRecord {
            origin: record.id,
            position: record.end,
            message: record.message,
            created_at: at,
            radius: self.config.point_radius,
            color: self.config.point_color.clone(),
        };
        let evicted = self.landed.push(point.clone());

        tracing::debug!(
            arc = arc.0,
            landed = self.landed.len(),
            evicted = evicted.len(),
            "message landed"
        );
        self.events.emit(at, LifecycleEvent::StatsChanged(self.counters));
        self.events.emit(at, LifecycleEvent::ArcsChanged);
        self.events.emit(at, LifecycleEvent::PointsChanged);
        Some(point)
    }

    fn default_message<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.config
            .default_messages
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| DEFAULT_MESSAGES[rng.gen_range(0..DEFAULT_MESSAGES.len())].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{LifecycleConfig, LifecycleEvent, MessageLifecycle};
    use crate::config::DEFAULT_MESSAGES;
    use crate::records::{ArcId, Counters};
    use foundation::Millis;
    use foundation::math::LatLng;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn lifecycle(cap: usize) -> MessageLifecycle {
        MessageLifecycle::new(LifecycleConfig {
            landed_cap: cap,
            ..LifecycleConfig::default()
        })
    }

    fn assert_in_transit_matches(lc: &MessageLifecycle) {
        assert_eq!(lc.counters().in_transit as usize, lc.in_flight().count());
    }

    #[test]
    fn submit_then_land_places_point_at_destination() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut lc = lifecycle(40);

        let sub = lc.submit("hello", Millis(1_000), &mut rng);
        assert_eq!(sub.record.message, "hello");
        assert_eq!(sub.due, Millis(3_500));
        let arc = lc.arc(sub.arc).cloned().expect("in flight");
        assert_eq!(arc, sub.record);
        assert_eq!(arc.start, LatLng::new(40.7128, -74.0060));
        assert_eq!(lc.counters(), Counters { sent: 1, in_transit: 1 });

        assert!(lc.advance_to(Millis(3_499)).is_empty());
        let landed = lc.advance_to(Millis(3_500));
        assert_eq!(landed.len(), 1);
        assert_eq!(landed[0].position, arc.end);
        assert_eq!(landed[0].message, "hello");
        assert_eq!(landed[0].origin, sub.arc);
        assert_eq!(lc.landed().len(), 1);
        assert_eq!(lc.counters(), Counters { sent: 1, in_transit: 0 });
        assert_in_transit_matches(&lc);
    }

    #[test]
    fn same_seed_same_destination() {
        let mut a = lifecycle(40);
        let mut b = lifecycle(40);
        let sa = a.submit("hello", Millis(0), &mut StdRng::seed_from_u64(42));
        let sb = b.submit("hello", Millis(0), &mut StdRng::seed_from_u64(42));
        assert_eq!(a.arc(sa.arc), b.arc(sb.arc));
    }

    #[test]
    fn destinations_stay_inside_band() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut lc = lifecycle(40);
        let cfg = lc.config().clone();
        for i in 0..200 {
            let sub = lc.submit("x", Millis(i), &mut rng);
            let arc = lc.arc(sub.arc).unwrap();
            assert!(arc.end.lat.abs() <= cfg.lat_extent);
            assert!(arc.end.lng.abs() <= cfg.lng_extent);
            assert!(arc.altitude >= cfg.arc_altitude_min);
            assert!(arc.altitude < cfg.arc_altitude_min + cfg.arc_altitude_span);
        }
        assert_in_transit_matches(&lc);
    }

    #[test]
    fn blank_submission_uses_a_default_message() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut lc = lifecycle(40);
        for text in ["", "   ", "\n\t"] {
            let sub = lc.submit(text, Millis(0), &mut rng);
            assert!(DEFAULT_MESSAGES.contains(&sub.record.message.as_str()));
        }
        let trimmed = lc.submit("  hi there  ", Millis(0), &mut rng);
        assert_eq!(trimmed.record.message, "hi there");
    }

    #[test]
    fn sent_increases_by_one_per_submit() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut lc = lifecycle(40);
        for n in 1..=5u64 {
            lc.submit("m", Millis(n * 100), &mut rng);
            assert_eq!(lc.counters().sent, n);
            assert_in_transit_matches(&lc);
        }
        lc.advance_to(Millis(10_000));
        assert_eq!(lc.counters().sent, 5);
        assert_eq!(lc.counters().in_transit, 0);
    }

    #[test]
    fn landed_points_are_capped_fifo() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut lc = lifecycle(3);
        for n in 0..5u64 {
            lc.submit(&format!("m{n}"), Millis(n), &mut rng);
        }
        lc.advance_to(Millis(100_000));
        let msgs: Vec<_> = lc.landed().iter().map(|p| p.message.as_str()).collect();
        assert_eq!(msgs, vec!["m2", "m3", "m4"]);
    }

    #[test]
    fn duplicate_and_late_expiry_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut lc = lifecycle(40);
        let first = lc.submit("a", Millis(0), &mut rng);
        lc.submit("b", Millis(10), &mut rng);

        assert!(lc.expire(first.arc, Millis(5)).is_some());
        assert!(lc.expire(first.arc, Millis(6)).is_none());
        assert!(lc.expire(ArcId(999), Millis(6)).is_none());
        assert_eq!(lc.counters(), Counters { sent: 2, in_transit: 1 });
        assert_in_transit_matches(&lc);

        // The canceled timer must not land the arc a second time.
        let later = lc.advance_to(Millis(10_000));
        assert_eq!(later.len(), 1);
        assert_eq!(later[0].message, "b");
        assert_eq!(lc.landed().len(), 2);
        assert_eq!(lc.counters().in_transit, 0);
    }

    #[test]
    fn cancel_pending_keeps_arcs_from_landing() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut lc = lifecycle(40);
        let sub = lc.submit("a", Millis(0), &mut rng);
        lc.submit("b", Millis(100), &mut rng);
        assert_eq!(lc.pending_expiries(), 2);
        assert_eq!(lc.next_expiry(), Some(sub.due));
        assert_eq!(lc.cancel_pending(), 2);
        assert_eq!(lc.pending_expiries(), 0);
        assert_eq!(lc.next_expiry(), None);
        assert!(lc.advance_to(Millis(60_000)).is_empty());
        assert!(lc.landed().is_empty());
        assert_in_transit_matches(&lc);
    }

    #[test]
    fn user_location_is_used_for_new_arcs() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut lc = lifecycle(40);
        let here = LatLng::new(48.85, 2.35);
        assert!(lc.resolve_user_location(here));
        assert!(!lc.resolve_user_location(LatLng::new(0.0, 0.0)));
        let sub = lc.submit("bonjour", Millis(0), &mut rng);
        assert_eq!(lc.arc(sub.arc).unwrap().start, here);
        assert_eq!(lc.user_location(), here);
    }

    #[test]
    fn events_describe_each_transition() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut lc = lifecycle(40);
        lc.submit("a", Millis(0), &mut rng);
        let kinds: Vec<_> = lc.drain_events().into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LifecycleEvent::StatsChanged(Counters { sent: 1, in_transit: 1 }),
                LifecycleEvent::ArcsChanged,
            ]
        );

        lc.advance_to(Millis(2_500));
        let kinds: Vec<_> = lc.drain_events().into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LifecycleEvent::StatsChanged(Counters { sent: 1, in_transit: 0 }),
                LifecycleEvent::ArcsChanged,
                LifecycleEvent::PointsChanged,
            ]
        );
    }
}
