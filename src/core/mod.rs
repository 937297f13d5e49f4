//! Refresh loop: per-cycle state and the scheduler that drives it

mod schedule_state;
mod scheduler;

pub use schedule_state::{Action, CyclePhase, ScheduleState};
pub use scheduler::{build_runtime, is_year_end, Clock, CycleOutcome, CycleReport, DisplayMode, RefreshScheduler};
