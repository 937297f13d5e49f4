//! Commit count source (GitHub GraphQL contribution calendar)
//!
//! One query per cycle fetches the contribution calendar for the current
//! calendar year; day/week/month/year totals are summed locally. Weeks start
//! on Monday.

use async_trait::async_trait;
use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use inkdash_core::{DataSource, SourceMetadata, Unavailable};
use inkdash_types::{ids, DataPoint, FieldMetadata, FieldType};
use serde_json::{json, Value};

use crate::http::fetch_json;

const GRAPHQL_URL: &str = "https://api.github.com/graphql";

const CONTRIBUTIONS_QUERY: &str = "query($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        weeks { contributionDays { date contributionCount } }
      }
    }
  }
}";

/// Commit source settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GithubConfig {
    pub username: Option<String>,
    pub token: Option<String>,
}

/// Contribution totals for the periods shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitCounts {
    pub day: u64,
    pub week: u64,
    pub month: u64,
    pub year: u64,
}

impl CommitCounts {
    /// Sum per-day counts relative to `today`
    pub fn from_days(days: &[(NaiveDate, u64)], today: NaiveDate) -> Self {
        let week_start = today - ChronoDuration::days(today.weekday().num_days_from_monday() as i64);
        let mut counts = CommitCounts::default();
        for &(date, count) in days {
            if date > today || date.year() != today.year() {
                continue;
            }
            counts.year += count;
            if date.month() == today.month() {
                counts.month += count;
            }
            if date >= week_start {
                counts.week += count;
            }
            if date == today {
                counts.day += count;
            }
        }
        counts
    }
}

/// Contribution summary shown on the last day of the year
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YearSummary {
    pub total: u64,
    pub max_day: u64,
    /// `total` over the days of the year up to and including `today`
    pub daily_avg: f64,
}

impl YearSummary {
    pub fn from_days(days: &[(NaiveDate, u64)], today: NaiveDate) -> Self {
        let mut summary = YearSummary::default();
        for &(date, count) in days {
            if date > today || date.year() != today.year() {
                continue;
            }
            summary.total += count;
            summary.max_day = summary.max_day.max(count);
        }
        summary.daily_avg = summary.total as f64 / today.ordinal() as f64;
        summary
    }
}

/// Extract `(date, count)` pairs from a GraphQL response
pub fn parse_contributions(data: &Value) -> Result<Vec<(NaiveDate, u64)>, Unavailable> {
    if let Some(errors) = data.get("errors").and_then(Value::as_array) {
        let message = errors
            .first()
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("unknown GraphQL error");
        return Err(Unavailable::Api(message.to_string()));
    }

    let weeks = data
        .pointer("/data/user/contributionsCollection/contributionCalendar/weeks")
        .and_then(Value::as_array)
        .ok_or_else(|| Unavailable::Decode("missing contribution calendar".to_string()))?;

    let mut days = Vec::with_capacity(weeks.len() * 7);
    for day in weeks
        .iter()
        .filter_map(|w| w.get("contributionDays").and_then(Value::as_array))
        .flatten()
    {
        let date = day
            .get("date")
            .and_then(Value::as_str)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .ok_or_else(|| Unavailable::Decode("bad contribution date".to_string()))?;
        let count = day.get("contributionCount").and_then(Value::as_u64).unwrap_or(0);
        days.push((date, count));
    }
    Ok(days)
}

/// Day/week/month/year commit counts and the year summary for one GitHub user
pub struct GithubSource {
    metadata: SourceMetadata,
    config: GithubConfig,
    timezone: Tz,
    client: reqwest::Client,
}

impl GithubSource {
    pub fn new(config: GithubConfig, timezone: Tz, client: reqwest::Client) -> Self {
        Self {
            metadata: SourceMetadata::new("commits", "Commits", "GitHub contribution counts"),
            config,
            timezone,
            client,
        }
    }
}

#[async_trait]
impl DataSource for GithubSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn fields(&self) -> Vec<FieldMetadata> {
        vec![
            FieldMetadata::new(ids::COMMITS_DAY, "Today", "Contributions today", FieldType::Numerical),
            FieldMetadata::new(ids::COMMITS_WEEK, "Week", "Contributions since Monday", FieldType::Numerical),
            FieldMetadata::new(ids::COMMITS_MONTH, "Month", "Contributions this month", FieldType::Numerical),
            FieldMetadata::new(ids::COMMITS_YEAR, "Year", "Contributions this year", FieldType::Numerical),
            FieldMetadata::new(ids::COMMITS_MAX_DAY, "Max Day", "Busiest day this year", FieldType::Numerical),
            FieldMetadata::new(ids::COMMITS_DAILY_AVG, "Daily Avg", "Average contributions per day", FieldType::Numerical),
        ]
    }

    async fn fetch(&self) -> Result<Vec<DataPoint>, Unavailable> {
        let username = self
            .config
            .username
            .as_deref()
            .ok_or_else(|| Unavailable::NotConfigured("GITHUB_USERNAME".to_string()))?;
        let token = self
            .config
            .token
            .as_deref()
            .ok_or_else(|| Unavailable::NotConfigured("GITHUB_TOKEN".to_string()))?;

        let now = Utc::now();
        let today = now.with_timezone(&self.timezone).date_naive();
        let year_start = self
            .timezone
            .with_ymd_and_hms(today.year(), 1, 1, 0, 0, 0)
            .earliest()
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or(now);

        let body = json!({
            "query": CONTRIBUTIONS_QUERY,
            "variables": {
                "login": username,
                "from": year_start.to_rfc3339(),
                "to": now.to_rfc3339(),
            }
        });
        let request = self.client.post(GRAPHQL_URL).bearer_auth(token).json(&body);
        let data = fetch_json(request).await?;
        let days = parse_contributions(&data)?;
        let counts = CommitCounts::from_days(&days, today);
        let summary = YearSummary::from_days(&days, today);
        log::debug!("Commit counts for {}: {:?}, {:?}", username, counts, summary);

        Ok(vec![
            DataPoint::new(ids::COMMITS_DAY, counts.day),
            DataPoint::new(ids::COMMITS_WEEK, counts.week),
            DataPoint::new(ids::COMMITS_MONTH, counts.month),
            DataPoint::new(ids::COMMITS_YEAR, counts.year),
            DataPoint::new(ids::COMMITS_MAX_DAY, summary.max_day),
            DataPoint::new(ids::COMMITS_DAILY_AVG, summary.daily_avg),
        ])
    }

    fn is_configured(&self) -> bool {
        self.config.username.is_some() && self.config.token.is_some()
    }
}
