//! Scheduler state threaded from one cycle to the next

use chrono::{DateTime, Utc};
use inkdash_render::Bitmap;

/// Where the scheduler is within a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Fetching,
    Rendering,
    Updating,
    Sleeping,
}

/// What to do with a freshly rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Same pixels as the frame on the panel; leave the panel alone
    Unchanged,
    /// Send the frame to the display
    Push,
}

/// State carried between cycles. Lives for the whole process, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleState {
    /// When the last non-quiet cycle rendered a frame
    pub last_refresh: Option<DateTime<Utc>>,
    /// Fingerprint of the frame currently on the panel
    pub last_fingerprint: Option<u64>,
}

impl ScheduleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether `bitmap` warrants a display write.
    ///
    /// The refresh time advances either way; the fingerprint is recorded
    /// only for frames that are pushed.
    pub fn step(self, now: DateTime<Utc>, bitmap: &Bitmap) -> (ScheduleState, Action) {
        let fingerprint = bitmap.fingerprint();
        let action = if self.last_fingerprint == Some(fingerprint) {
            Action::Unchanged
        } else {
            Action::Push
        };
        let next = ScheduleState {
            last_refresh: Some(now),
            last_fingerprint: Some(fingerprint),
        };
        (next, action)
    }

    /// Forget the frame on the panel so the next cycle pushes again
    pub fn push_failed(self) -> ScheduleState {
        ScheduleState {
            last_fingerprint: None,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use inkdash_render::Canvas;

    fn blank() -> Bitmap {
        Canvas::new(16, 16).finish()
    }

    fn other() -> Bitmap {
        Canvas::new(16, 8).finish()
    }

    #[test]
    fn test_first_frame_is_pushed() {
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap();
        let (state, action) = ScheduleState::new().step(now, &blank());
        assert_eq!(action, Action::Push);
        assert_eq!(state.last_refresh, Some(now));
        assert_eq!(state.last_fingerprint, Some(blank().fingerprint()));
    }

    #[test]
    fn test_identical_frame_is_skipped_but_refresh_time_advances() {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 3, 14, 9, 10, 0).unwrap();
        let (state, _) = ScheduleState::new().step(t0, &blank());
        let (state, action) = state.step(t1, &blank());
        assert_eq!(action, Action::Unchanged);
        assert_eq!(state.last_refresh, Some(t1));
    }

    #[test]
    fn test_changed_frame_is_pushed() {
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap();
        let (state, _) = ScheduleState::new().step(now, &blank());
        let (_, action) = state.step(now, &other());
        assert_eq!(action, Action::Push);
    }

    #[test]
    fn test_failed_push_is_retried() {
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap();
        let (state, _) = ScheduleState::new().step(now, &blank());
        let (_, action) = state.push_failed().step(now, &blank());
        assert_eq!(action, Action::Push);
    }
}
