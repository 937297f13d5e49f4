//! Per-cycle data: field values, data points and the frame result set.
//!
//! A `FrameResult` is created with every configured field already present
//! (as `Unavailable`), so a failing provider can never remove a field's
//! slot from the screen. Providers only ever overwrite entries.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::field::FieldType;

/// Value carried by a data point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Number(f64),
    Text(String),
    /// Discrete condition code, looked up in an icon table at render time
    Icon(String),
    Timestamp(DateTime<FixedOffset>),
    List(Vec<String>),
    /// The provider failed or is not configured this cycle
    Unavailable,
}

static UNAVAILABLE: FieldValue = FieldValue::Unavailable;

impl FieldValue {
    /// Whether this value holds real data
    pub fn is_available(&self) -> bool {
        !matches!(self, FieldValue::Unavailable)
    }

    /// Semantic type of the value (`None` for `Unavailable`)
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            FieldValue::Number(_) => Some(FieldType::Numerical),
            FieldValue::Text(_) => Some(FieldType::Text),
            FieldValue::Icon(_) => Some(FieldType::Icon),
            FieldValue::Timestamp(_) => Some(FieldType::Timestamp),
            FieldValue::List(_) => Some(FieldType::List),
            FieldValue::Unavailable => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Icon(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            FieldValue::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<DateTime<FixedOffset>> for FieldValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        FieldValue::Timestamp(value)
    }
}

/// A named field value produced by one provider in one cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub field: String,
    pub value: FieldValue,
}

impl DataPoint {
    pub fn new(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Explicit "no data this cycle" marker for a field
    pub fn unavailable(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: FieldValue::Unavailable,
        }
    }

    /// Validity flag
    pub fn is_valid(&self) -> bool {
        self.value.is_available()
    }
}

/// The complete set of data points for one refresh cycle, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    points: BTreeMap<String, DataPoint>,
}

impl FrameResult {
    /// Create a frame in which every configured field is present and unavailable
    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let points = fields
            .into_iter()
            .map(|field| {
                let field = field.into();
                (field.clone(), DataPoint::unavailable(field))
            })
            .collect();
        Self { points }
    }

    /// Store a data point for a configured field.
    ///
    /// Returns `false` (and drops the point) when the field is not part of
    /// this frame's configuration.
    pub fn record(&mut self, point: DataPoint) -> bool {
        match self.points.get_mut(&point.field) {
            Some(slot) => {
                *slot = point;
                true
            }
            None => false,
        }
    }

    /// Reset a configured field to the unavailable marker
    pub fn mark_unavailable(&mut self, field: &str) {
        if let Some(slot) = self.points.get_mut(field) {
            slot.value = FieldValue::Unavailable;
        }
    }

    pub fn get(&self, field: &str) -> Option<&DataPoint> {
        self.points.get(field)
    }

    /// Value for a field; unknown fields read as `Unavailable`
    pub fn value(&self, field: &str) -> &FieldValue {
        self.points
            .get(field)
            .map(|p| &p.value)
            .unwrap_or(&UNAVAILABLE)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.points.contains_key(field)
    }

    /// Iterate data points in field-name order
    pub fn iter(&self) -> impl Iterator<Item = &DataPoint> {
        self.points.values()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.points.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of fields holding real data
    pub fn available_count(&self) -> usize {
        self.points.values().filter(|p| p.is_valid()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_frame_has_every_field_unavailable() {
        let frame = FrameResult::with_fields(["a", "b", "c"]);
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.available_count(), 0);
        for field in ["a", "b", "c"] {
            assert_eq!(frame.value(field), &FieldValue::Unavailable);
        }
    }

    #[test]
    fn test_record_rejects_unconfigured_field() {
        let mut frame = FrameResult::with_fields(["weather_temp"]);
        assert!(frame.record(DataPoint::new("weather_temp", 21.5)));
        assert!(!frame.record(DataPoint::new("bogus", 1.0)));
        assert_eq!(frame.len(), 1);
        assert!(!frame.contains("bogus"));
        assert_eq!(frame.value("weather_temp").as_f64(), Some(21.5));
    }

    #[test]
    fn test_mark_unavailable_keeps_slot() {
        let mut frame = FrameResult::with_fields(["vps_usage"]);
        frame.record(DataPoint::new("vps_usage", 42.0));
        frame.mark_unavailable("vps_usage");
        assert!(frame.contains("vps_usage"));
        assert!(!frame.get("vps_usage").unwrap().is_valid());
    }

    #[test]
    fn test_unknown_field_reads_unavailable() {
        let frame = FrameResult::default();
        assert_eq!(frame.value("missing"), &FieldValue::Unavailable);
    }

    #[test]
    fn test_field_value_types() {
        assert_eq!(FieldValue::from(1.0).field_type(), Some(FieldType::Numerical));
        assert_eq!(FieldValue::Icon("Rain".into()).as_str(), Some("Rain"));
        assert_eq!(FieldValue::Unavailable.field_type(), None);
    }

    #[test]
    fn test_field_value_serialization() {
        let json = serde_json::to_string(&FieldValue::Number(3.5)).unwrap();
        assert_eq!(json, r#"{"kind":"number","value":3.5}"#);
        let back: FieldValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FieldValue::Number(3.5));
    }
}
