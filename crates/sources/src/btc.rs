//! Bitcoin price source (CoinGecko simple price)

use async_trait::async_trait;
use inkdash_core::{DataSource, SourceMetadata, Unavailable};
use inkdash_types::{ids, DataPoint, FieldMetadata, FieldType, FieldValue};
use serde_json::Value;

use crate::http::{fetch_json, number_at};

const COINGECKO_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

/// 24h change (percent) beyond which the trend is no longer flat
pub const TREND_THRESHOLD: f64 = 0.5;

/// Trend code for a 24h change
pub fn trend(change: f64) -> &'static str {
    if change >= TREND_THRESHOLD {
        "up"
    } else if change <= -TREND_THRESHOLD {
        "down"
    } else {
        "flat"
    }
}

/// Price, 24h change and trend from a CoinGecko response. A missing
/// change counts as zero.
pub fn parse_price(data: &Value) -> Result<Vec<DataPoint>, Unavailable> {
    let price = number_at(data, "/bitcoin/usd")?;
    let change = data
        .pointer("/bitcoin/usd_24h_change")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    Ok(vec![
        DataPoint::new(ids::BTC_PRICE, price),
        DataPoint::new(ids::BTC_CHANGE, change),
        DataPoint::new(ids::BTC_TREND, FieldValue::Icon(trend(change).to_string())),
    ])
}

pub struct BtcSource {
    metadata: SourceMetadata,
    client: reqwest::Client,
}

impl BtcSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            metadata: SourceMetadata::new("btc", "Bitcoin", "BTC/USD price from CoinGecko"),
            client,
        }
    }
}

#[async_trait]
impl DataSource for BtcSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn fields(&self) -> Vec<FieldMetadata> {
        vec![
            FieldMetadata::new(ids::BTC_PRICE, "Price", "BTC price in USD", FieldType::Numerical),
            FieldMetadata::new(ids::BTC_CHANGE, "24h Change", "24 hour change in percent", FieldType::Numerical),
            FieldMetadata::new(ids::BTC_TREND, "Trend", "up, down or flat", FieldType::Icon),
        ]
    }

    async fn fetch(&self) -> Result<Vec<DataPoint>, Unavailable> {
        let request = self.client.get(COINGECKO_URL).query(&[
            ("ids", "bitcoin"),
            ("vs_currencies", "usd"),
            ("include_24hr_change", "true"),
        ]);
        let data = fetch_json(request).await?;
        parse_price(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trend_thresholds() {
        assert_eq!(trend(0.5), "up");
        assert_eq!(trend(3.2), "up");
        assert_eq!(trend(0.49), "flat");
        assert_eq!(trend(0.0), "flat");
        assert_eq!(trend(-0.49), "flat");
        assert_eq!(trend(-0.5), "down");
    }

    #[test]
    fn test_parse_price() {
        let data = json!({"bitcoin": {"usd": 67432.0, "usd_24h_change": -1.73}});
        let points = parse_price(&data).unwrap();
        assert_eq!(points[0].value, FieldValue::Number(67432.0));
        assert_eq!(points[1].value, FieldValue::Number(-1.73));
        assert_eq!(points[2].value, FieldValue::Icon("down".into()));
    }

    #[test]
    fn test_missing_change_is_flat() {
        let data = json!({"bitcoin": {"usd": 100}});
        let points = parse_price(&data).unwrap();
        assert_eq!(points[1].value, FieldValue::Number(0.0));
        assert_eq!(points[2].value, FieldValue::Icon("flat".into()));
    }

    #[test]
    fn test_missing_price() {
        assert!(matches!(parse_price(&json!({})), Err(Unavailable::Decode(_))));
    }
}
