//! Field metadata describing what data sources provide

use serde::{Deserialize, Serialize};

/// Semantic type of a dashboard field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Free text (e.g., "Clouds")
    Text,
    /// Numerical data (e.g., 13.9, 67250)
    Numerical,
    /// Percentage (0.0 to 100.0)
    Percentage,
    /// Discrete condition code resolved through an icon table
    Icon,
    /// Point in time
    Timestamp,
    /// Ordered list of text items
    List,
}

/// Metadata describing a single data field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Unique identifier for this field (e.g., `weather_temp`)
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Description of what this field represents
    pub description: String,
    /// Type of data this field contains
    pub field_type: FieldType,
}

impl FieldMetadata {
    /// Create a new field metadata
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            field_type,
        }
    }
}

/// Field identifiers shown on the dashboard and year-end screens
pub mod ids {
    pub const TIMESTAMP: &str = "timestamp";
    pub const WEEK_PROGRESS: &str = "week_progress";
    pub const WEATHER_TEMP: &str = "weather_temp";
    pub const WEATHER_CONDITION: &str = "weather_condition";
    pub const WEATHER_DESC: &str = "weather_desc";
    pub const COMMITS_DAY: &str = "commits_day";
    pub const COMMITS_WEEK: &str = "commits_week";
    pub const COMMITS_MONTH: &str = "commits_month";
    pub const COMMITS_YEAR: &str = "commits_year";
    /// Busiest single day of the current year
    pub const COMMITS_MAX_DAY: &str = "commits_max_day";
    /// Year total divided by days elapsed
    pub const COMMITS_DAILY_AVG: &str = "commits_daily_avg";
    pub const VPS_USAGE: &str = "vps_usage";
    pub const BTC_PRICE: &str = "btc_price";
    pub const BTC_CHANGE: &str = "btc_change";
    pub const BTC_TREND: &str = "btc_trend";
    pub const TODO_GOALS: &str = "todo_goals";
    pub const TODO_MUST: &str = "todo_must";
    pub const TODO_OPTIONAL: &str = "todo_optional";
}
