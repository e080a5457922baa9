//! UI state machines driven by the same virtual clock as the lifecycle.
//!
//! Everything here is cosmetic: button feedback and tooltip visibility
//! never gate a submission or a landing.

use foundation::Millis;
use runtime::TimerQueue;

use crate::config::UiTiming;
use crate::records::Counters;

pub const READY_LABEL: &str = "→";
pub const PENDING_LABEL: &str = "...";
pub const CONFIRMED_LABEL: &str = "✓";

/// Enter without Shift submits; Shift+Enter and every other key do not.
pub fn is_submit_key(key: &str, shift: bool) -> bool {
    key == "Enter" && !shift
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub label: &'static str,
    pub disabled: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ButtonStage {
    Ready,
    Pending,
    Confirmed,
}

impl ButtonStage {
    fn view(self) -> ButtonView {
        match self {
            ButtonStage::Ready => ButtonView {
                label: READY_LABEL,
                disabled: false,
            },
            ButtonStage::Pending => ButtonView {
                label: PENDING_LABEL,
                disabled: true,
            },
            ButtonStage::Confirmed => ButtonView {
                label: CONFIRMED_LABEL,
                disabled: true,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipView {
    /// Message wrapped in double quotes.
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub sent: String,
    pub in_transit: String,
}

impl From<Counters> for StatsView {
    fn from(c: Counters) -> Self {
        Self {
            sent: c.sent.to_string(),
            in_transit: c.in_transit.to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UiTask {
    ConfirmSubmit { generation: u64 },
    ResetSubmit { generation: u64 },
    HideTooltip { generation: u64 },
    FocusInput,
}

/// Visible changes produced by [`Interaction::advance_to`].
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Button(ButtonView),
    TooltipHidden,
    FocusInput,
}

#[derive(Debug)]
pub struct Interaction {
    timing: UiTiming,
    timers: TimerQueue<UiTask>,
    button: ButtonStage,
    submit_generation: u64,
    tooltip: Option<TooltipView>,
    tooltip_generation: u64,
}

impl Interaction {
    pub fn new(timing: UiTiming) -> Self {
        Self {
            timing,
            timers: TimerQueue::new(),
            button: ButtonStage::Ready,
            submit_generation: 0,
            tooltip: None,
            tooltip_generation: 0,
        }
    }

    pub fn button(&self) -> ButtonView {
        self.button.view()
    }

    pub fn tooltip(&self) -> Option<&TooltipView> {
        self.tooltip.as_ref()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Schedules the initial input focus after boot.
    pub fn schedule_focus(&mut self, now: Millis) {
        self.timers
            .schedule_after(now, self.timing.focus_delay_ms, UiTask::FocusInput);
    }

    /// Starts the send feedback cycle. A cycle already running is superseded.
    pub fn begin_submit(&mut self, now: Millis) -> ButtonView {
        self.submit_generation += 1;
        let generation = self.submit_generation;
        self.button = ButtonStage::Pending;
        self.timers.schedule_after(
            now,
            self.timing.submit_pending_ms,
            UiTask::ConfirmSubmit { generation },
        );
        self.button.view()
    }

    /// Shows `message` at client coordinates until the tooltip timeout.
    pub fn show_tooltip(&mut self, message: &str, x: f64, y: f64, now: Millis) -> TooltipView {
        self.tooltip_generation += 1;
        let generation = self.tooltip_generation;
        let view = TooltipView {
            text: format!("\"{message}\""),
            x,
            y,
        };
        self.tooltip = Some(view.clone());
        self.timers.schedule_after(
            now,
            self.timing.tooltip_ms,
            UiTask::HideTooltip { generation },
        );
        view
    }

    /// Applies every UI timer due by `now`, including stages chained from
    /// timers that fire in the same call.
    pub fn advance_to(&mut self, now: Millis) -> Vec<UiUpdate> {
        let mut updates = Vec::new();
        loop {
            let fired = self.timers.advance_to(now);
            if fired.is_empty() {
                return updates;
            }
            for timer in fired {
                if let Some(update) = self.apply(timer.payload, timer.due) {
                    updates.push(update);
                }
            }
        }
    }

    fn apply(&mut self, task: UiTask, due: Millis) -> Option<UiUpdate> {
        match task {
            UiTask::ConfirmSubmit { generation } if generation == self.submit_generation => {
                self.button = ButtonStage::Confirmed;
                self.timers.schedule_after(
                    due,
                    self.timing.submit_confirm_ms,
                    UiTask::ResetSubmit { generation },
                );
                Some(UiUpdate::Button(self.button.view()))
            }
            UiTask::ResetSubmit { generation } if generation == self.submit_generation => {
                self.button = ButtonStage::Ready;
                Some(UiUpdate::Button(self.button.view()))
            }
            UiTask::HideTooltip { generation } if generation == self.tooltip_generation => {
                self.tooltip.take().map(|_| UiUpdate::TooltipHidden)
            }
            UiTask::FocusInput => Some(UiUpdate::FocusInput),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CONFIRMED_LABEL, Interaction, PENDING_LABEL, READY_LABEL, StatsView, UiUpdate,
        is_submit_key,
    };
    use crate::config::UiTiming;
    use crate::records::Counters;
    use foundation::Millis;
    use pretty_assertions::assert_eq;

    fn labels(updates: &[UiUpdate]) -> Vec<&'static str> {
        updates
            .iter()
            .filter_map(|u| match u {
                UiUpdate::Button(b) => Some(b.label),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn submit_keys() {
        assert!(is_submit_key("Enter", false));
        assert!(!is_submit_key("Enter", true));
        assert!(!is_submit_key("a", false));
    }

    #[test]
    fn submit_feedback_cycle() {
        let mut ui = Interaction::new(UiTiming::default());
        let view = ui.begin_submit(Millis(0));
        assert_eq!(view.label, PENDING_LABEL);
        assert!(view.disabled);

        assert!(ui.advance_to(Millis(299)).is_empty());
        let updates = ui.advance_to(Millis(300));
        assert_eq!(labels(&updates), vec![CONFIRMED_LABEL]);
        assert!(ui.button().disabled);

        assert!(ui.advance_to(Millis(1_299)).is_empty());
        let updates = ui.advance_to(Millis(1_300));
        assert_eq!(labels(&updates), vec![READY_LABEL]);
        assert!(!ui.button().disabled);
    }

    #[test]
    fn catch_up_applies_every_stage_in_order() {
        let mut ui = Interaction::new(UiTiming::default());
        ui.begin_submit(Millis(0));
        let updates = ui.advance_to(Millis(5_000));
        assert_eq!(labels(&updates), vec![CONFIRMED_LABEL, READY_LABEL]);
    }

    #[test]
    fn restarted_cycle_ignores_stale_stages() {
        let mut ui = Interaction::new(UiTiming::default());
        ui.begin_submit(Millis(0));
        ui.begin_submit(Millis(200));

        // First cycle's confirm at 300 is stale.
        assert!(ui.advance_to(Millis(300)).is_empty());
        assert_eq!(ui.button().label, PENDING_LABEL);
        assert_eq!(labels(&ui.advance_to(Millis(500))), vec![CONFIRMED_LABEL]);
        assert_eq!(labels(&ui.advance_to(Millis(1_500))), vec![READY_LABEL]);
    }

    #[test]
    fn tooltip_quotes_message_and_hides() {
        let mut ui = Interaction::new(UiTiming::default());
        let view = ui.show_tooltip("hello", 12.0, 34.0, Millis(0));
        assert_eq!(view.text, "\"hello\"");
        assert_eq!((view.x, view.y), (12.0, 34.0));
        assert!(ui.tooltip().is_some());

        assert!(ui.advance_to(Millis(2_999)).is_empty());
        assert_eq!(ui.advance_to(Millis(3_000)), vec![UiUpdate::TooltipHidden]);
        assert!(ui.tooltip().is_none());
    }

    #[test]
    fn newer_tooltip_outlives_older_hide() {
        let mut ui = Interaction::new(UiTiming::default());
        ui.show_tooltip("first", 0.0, 0.0, Millis(0));
        ui.show_tooltip("second", 0.0, 0.0, Millis(2_000));
        assert!(ui.advance_to(Millis(3_000)).is_empty());
        assert_eq!(ui.tooltip().unwrap().text, "\"second\"");
        assert_eq!(ui.advance_to(Millis(5_000)), vec![UiUpdate::TooltipHidden]);
    }

    #[test]
    fn focus_fires_once_after_delay() {
        let mut ui = Interaction::new(UiTiming::default());
        ui.schedule_focus(Millis(0));
        assert!(ui.advance_to(Millis(799)).is_empty());
        assert_eq!(ui.advance_to(Millis(800)), vec![UiUpdate::FocusInput]);
        assert_eq!(ui.pending_timers(), 0);
    }

    #[test]
    fn stats_render_counters() {
        let view = StatsView::from(Counters {
            sent: 12,
            in_transit: 3,
        });
        assert_eq!(
            view,
            StatsView {
                sent: "12".to_string(),
                in_transit: "3".to_string()
            }
        );
    }
}
