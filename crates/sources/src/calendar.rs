//! Calendar source: current local time and progress through the week

use async_trait::async_trait;
use chrono::{Datelike, Timelike, Utc};
use chrono_tz::Tz;
use inkdash_core::{DataSource, SourceMetadata, Unavailable};
use inkdash_types::{ids, DataPoint, FieldMetadata, FieldType};

const HOURS_PER_WEEK: u32 = 7 * 24;

/// Whole percent of the week elapsed, Monday 00:00 being 0
pub fn week_progress<T: Datelike + Timelike>(now: &T) -> f64 {
    let hours = now.weekday().num_days_from_monday() * 24 + now.hour();
    (hours * 100 / HOURS_PER_WEEK) as f64
}

pub struct CalendarSource {
    metadata: SourceMetadata,
    timezone: Tz,
}

impl CalendarSource {
    pub fn new(timezone: Tz) -> Self {
        Self {
            metadata: SourceMetadata::new("calendar", "Calendar", "Local date, time and week progress"),
            timezone,
        }
    }
}

#[async_trait]
impl DataSource for CalendarSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn fields(&self) -> Vec<FieldMetadata> {
        vec![
            FieldMetadata::new(ids::TIMESTAMP, "Now", "Current local time", FieldType::Timestamp),
            FieldMetadata::new(
                ids::WEEK_PROGRESS,
                "Weekly",
                "Percent of the week elapsed",
                FieldType::Percentage,
            ),
        ]
    }

    async fn fetch(&self) -> Result<Vec<DataPoint>, Unavailable> {
        let now = Utc::now().with_timezone(&self.timezone);
        Ok(vec![
            DataPoint::new(ids::TIMESTAMP, now.fixed_offset()),
            DataPoint::new(ids::WEEK_PROGRESS, week_progress(&now)),
        ])
    }
}
