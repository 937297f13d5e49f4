//! Refresh scheduler
//!
//! One cycle at a time: check quiet hours, fetch every source concurrently
//! (each under its own timeout), render, then push the frame only if it
//! differs from what the panel already shows. Nothing that goes wrong inside
//! a cycle stops the loop.
//!
//! On December 31 (local time) the year-end layout, when one is set, replaces
//! the dashboard and only sources feeding its fields are fetched.

use anyhow::Context;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use futures::future::join_all;
use inkdash_core::{BoxedDataSource, QuietHours, Registry, Unavailable};
use inkdash_render::{AssetStore, DashboardLayout};
use inkdash_types::FrameResult;
use log::{debug, error, info, trace, warn};
use std::time::Duration;
use tokio::time::Instant;

use super::schedule_state::{Action, CyclePhase, ScheduleState};
use crate::config::Settings;
use crate::drivers::DisplayDriver;

/// Source of the current time
pub type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Which screen a cycle drew
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Dashboard,
    YearEnd,
}

/// True on the last day of the year
pub fn is_year_end(date: NaiveDate) -> bool {
    date.month() == 12 && date.day() == 31
}

/// How a cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Quiet hours: no fetch, no display write
    Quiet,
    /// Frame identical to the one on the panel
    Unchanged,
    /// Frame sent to the display
    Pushed,
    /// Layout could not be rendered; cycle aborted
    RenderFailed,
    /// Driver rejected the frame; retried next cycle
    DisplayFailed,
}

/// Summary of one cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub outcome: CycleOutcome,
    pub mode: DisplayMode,
    /// How long to wait before the next cycle
    pub sleep: Duration,
    /// Sources that did not deliver this cycle
    pub failed_sources: Vec<String>,
}

/// Runtime for the refresh loop. One cycle runs at a time, so a single
/// thread is enough.
pub fn build_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread().enable_all().build()
}

/// Drives the fetch, render, update, sleep loop
pub struct RefreshScheduler<D: DisplayDriver> {
    sources: Vec<BoxedDataSource>,
    layout: DashboardLayout,
    year_end_layout: Option<DashboardLayout>,
    driver: D,
    interval: Duration,
    provider_timeout: Duration,
    quiet_hours: Option<QuietHours>,
    timezone: Tz,
    clock: Clock,
    phase: CyclePhase,
}

impl<D: DisplayDriver> RefreshScheduler<D> {
    pub fn new(sources: Vec<BoxedDataSource>, layout: DashboardLayout, driver: D) -> Self {
        Self {
            sources,
            layout,
            year_end_layout: None,
            driver,
            interval: inkdash_core::DEFAULT_REFRESH_INTERVAL,
            provider_timeout: inkdash_core::DEFAULT_PROVIDER_TIMEOUT,
            quiet_hours: None,
            timezone: Tz::UTC,
            clock: Box::new(Utc::now),
            phase: CyclePhase::Idle,
        }
    }

    /// Wire every registered source, the standard layout and `driver`
    /// according to `settings`
    pub fn from_settings(settings: &Settings, driver: D) -> anyhow::Result<Self> {
        let mut registry = Registry::new();
        inkdash_sources::register_all(&mut registry, &settings.sources)
            .context("Failed to register data sources")?;
        let sources = registry.create_all();
        info!("Registered {} data sources", sources.len());

        let mut layout = DashboardLayout::standard(settings.display_width, settings.display_height)
            .context("Invalid dashboard layout")?;
        if let Some(dir) = &settings.icon_dir {
            let assets = AssetStore::load_dir(dir)
                .with_context(|| format!("Failed to load icons from {}", dir.display()))?;
            info!("Loaded {} icon assets from {}", assets.len(), dir.display());
            layout = layout.with_assets(assets);
        }

        let mut scheduler = Self::new(sources, layout, driver);
        if settings.year_end_summary {
            let year_end = DashboardLayout::year_end(settings.display_width, settings.display_height)
                .context("Invalid year-end layout")?;
            scheduler = scheduler.with_year_end_layout(year_end);
        }

        Ok(scheduler
            .with_interval(settings.refresh_interval)
            .with_provider_timeout(settings.provider_timeout)
            .with_quiet_hours(settings.quiet_hours, settings.timezone))
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Shown instead of the dashboard on December 31
    pub fn with_year_end_layout(mut self, layout: DashboardLayout) -> Self {
        self.year_end_layout = Some(layout);
        self
    }

    /// Quiet hours and the year-end date are evaluated in `timezone`
    pub fn with_quiet_hours(mut self, quiet_hours: Option<QuietHours>, timezone: Tz) -> Self {
        self.quiet_hours = quiet_hours;
        self.timezone = timezone;
        self
    }

    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn layout(&self) -> &DashboardLayout {
        &self.layout
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// The screen for `now`: the year-end layout on December 31, if any
    pub fn mode_at(&self, now: DateTime<Utc>) -> DisplayMode {
        let today = now.with_timezone(&self.timezone).date_naive();
        if self.year_end_layout.is_some() && is_year_end(today) {
            DisplayMode::YearEnd
        } else {
            DisplayMode::Dashboard
        }
    }

    fn layout_for(&self, mode: DisplayMode) -> &DashboardLayout {
        match (mode, &self.year_end_layout) {
            (DisplayMode::YearEnd, Some(layout)) => layout,
            _ => &self.layout,
        }
    }

    fn set_phase(&mut self, phase: CyclePhase) {
        trace!("Scheduler {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Time left in the quiet window, if `now` is inside it
    fn quiet_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        let quiet = self.quiet_hours.as_ref()?;
        quiet.remaining(&now.with_timezone(&self.timezone))
    }

    /// Run one full cycle and return the updated state
    pub async fn run_cycle(&mut self, state: ScheduleState) -> (ScheduleState, CycleReport) {
        let started = Instant::now();
        let now = (self.clock)();
        let mode = self.mode_at(now);

        if let Some(remaining) = self.quiet_remaining(now) {
            let sleep = self.interval.min(remaining).max(Duration::from_secs(1));
            info!("Quiet hours, skipping refresh (next check in {:?})", sleep);
            self.set_phase(CyclePhase::Sleeping);
            return (
                state,
                CycleReport {
                    outcome: CycleOutcome::Quiet,
                    mode,
                    sleep,
                    failed_sources: Vec::new(),
                },
            );
        }

        if mode == DisplayMode::YearEnd {
            info!("Last day of the year, showing the year-end summary");
        }

        self.set_phase(CyclePhase::Fetching);
        let (frame, failed_sources) = self.fetch_all(mode).await;

        self.set_phase(CyclePhase::Rendering);
        let rendered = self.layout_for(mode).render(&frame);
        let (state, outcome) = match rendered {
            Ok(bitmap) => {
                self.set_phase(CyclePhase::Updating);
                let (state, action) = state.step(now, &bitmap);
                match action {
                    Action::Unchanged => {
                        debug!("Frame unchanged, skipping display update");
                        (state, CycleOutcome::Unchanged)
                    }
                    Action::Push => match self.driver.push(&bitmap) {
                        Ok(()) => {
                            info!("Display updated via {} driver", self.driver.name());
                            if let Err(e) = self.driver.sleep() {
                                warn!("Failed to put display to sleep: {}", e);
                            }
                            (state, CycleOutcome::Pushed)
                        }
                        Err(e) => {
                            error!("Display update via {} failed: {}", self.driver.name(), e);
                            (state.push_failed(), CycleOutcome::DisplayFailed)
                        }
                    },
                }
            }
            Err(e) => {
                error!("Render failed, skipping this cycle: {}", e);
                (state, CycleOutcome::RenderFailed)
            }
        };

        self.set_phase(CyclePhase::Sleeping);
        let elapsed = started.elapsed();
        trace!("Cycle took {:?}", elapsed);

        let report = CycleReport {
            outcome,
            mode,
            sleep: self.interval.saturating_sub(elapsed),
            failed_sources,
        };
        (state, report)
    }

    /// Fetch every source that feeds the active layout, concurrently. Every
    /// layout field is present in the result; fields of failed sources stay
    /// unavailable.
    async fn fetch_all(&self, mode: DisplayMode) -> (FrameResult, Vec<String>) {
        let mut frame = FrameResult::with_fields(self.layout_for(mode).fields());
        let timeout = self.provider_timeout;

        let wanted = self.sources.iter().filter(|source| {
            let used = source.fields().iter().any(|f| frame.contains(&f.id));
            if !used {
                trace!("Source {} not shown on this screen", source.metadata().id);
            }
            used
        });
        let fetches = wanted.map(|source| async move {
            let result = match tokio::time::timeout(timeout, source.fetch()).await {
                Ok(result) => result,
                Err(_) => Err(Unavailable::Timeout(timeout)),
            };
            (source, result)
        });

        let mut failed = Vec::new();
        for (source, result) in join_all(fetches).await {
            let id = &source.metadata().id;
            match result {
                Ok(points) => {
                    for point in points {
                        let field = point.field.clone();
                        if !frame.record(point) {
                            trace!("Source {} produced unbound field {}", id, field);
                        }
                    }
                }
                Err(Unavailable::NotConfigured(what)) => {
                    debug!("Source {} not configured (missing {})", id, what);
                    failed.push(id.clone());
                }
                Err(reason) => {
                    warn!("Source {} unavailable: {}", id, reason);
                    for field in source.fields() {
                        frame.mark_unavailable(&field.id);
                    }
                    failed.push(id.clone());
                }
            }
        }
        (frame, failed)
    }

    /// Loop forever
    pub async fn run(&mut self) {
        let mut state = ScheduleState::new();
        loop {
            let (next, report) = self.run_cycle(state).await;
            state = next;
            tokio::time::sleep(report.sleep).await;
            self.set_phase(CyclePhase::Idle);
        }
    }
}
