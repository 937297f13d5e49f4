//! VPS bandwidth source (64clouds / KiwiVM `getServiceInfo`)

use async_trait::async_trait;
use inkdash_core::{DataSource, SourceMetadata, Unavailable};
use inkdash_types::{ids, DataPoint, FieldMetadata, FieldType};
use serde::Deserialize;
use serde_json::Value;

use crate::http::fetch_json;

const VPS_API_URL: &str = "https://api.64clouds.com/v1/getServiceInfo";

/// VPS source settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VpsConfig {
    pub veid: Option<String>,
    pub api_key: Option<String>,
}

/// Fields of a `getServiceInfo` response this source reads
#[derive(Debug, Deserialize)]
struct ServiceInfo {
    #[serde(default)]
    error: i64,
    message: Option<String>,
    data_counter: Option<f64>,
    plan_monthly_data: Option<f64>,
}

/// Monthly data usage as a whole percentage of the plan allowance
pub fn parse_usage(data: &Value) -> Result<f64, Unavailable> {
    let info = ServiceInfo::deserialize(data).map_err(|e| Unavailable::Decode(e.to_string()))?;
    if info.error != 0 {
        let message = info
            .message
            .unwrap_or_else(|| format!("error code {}", info.error));
        return Err(Unavailable::Api(message));
    }

    let used = info
        .data_counter
        .ok_or_else(|| Unavailable::Decode("missing data_counter".to_string()))?;
    let plan = info
        .plan_monthly_data
        .ok_or_else(|| Unavailable::Decode("missing plan_monthly_data".to_string()))?;
    if plan <= 0.0 {
        return Err(Unavailable::Decode("plan_monthly_data is zero".to_string()));
    }
    Ok((used / plan * 100.0).trunc())
}

pub struct VpsSource {
    metadata: SourceMetadata,
    config: VpsConfig,
    client: reqwest::Client,
}

impl VpsSource {
    pub fn new(config: VpsConfig, client: reqwest::Client) -> Self {
        Self {
            metadata: SourceMetadata::new("vps", "VPS", "VPS monthly data usage"),
            config,
            client,
        }
    }
}

#[async_trait]
impl DataSource for VpsSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn fields(&self) -> Vec<FieldMetadata> {
        vec![FieldMetadata::new(
            ids::VPS_USAGE,
            "VPS Data",
            "Monthly transfer used, percent of plan",
            FieldType::Percentage,
        )]
    }

    async fn fetch(&self) -> Result<Vec<DataPoint>, Unavailable> {
        let veid = self
            .config
            .veid
            .as_deref()
            .ok_or_else(|| Unavailable::NotConfigured("VPS_VEID".to_string()))?;
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Unavailable::NotConfigured("VPS_API_KEY".to_string()))?;

        let request = self
            .client
            .get(VPS_API_URL)
            .query(&[("veid", veid), ("api_key", api_key)]);
        let data = fetch_json(request).await?;
        Ok(vec![DataPoint::new(ids::VPS_USAGE, parse_usage(&data)?)])
    }

    fn is_configured(&self) -> bool {
        self.config.veid.is_some() && self.config.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_usage_is_truncated_percent() {
        let data = json!({"error": 0, "data_counter": 37_580_963_840u64, "plan_monthly_data": 107_374_182_400u64});
        assert_eq!(parse_usage(&data).unwrap(), 35.0);
    }

    #[test]
    fn test_api_error() {
        let data = json!({"error": 700005, "message": "Authentication failure"});
        assert_eq!(parse_usage(&data), Err(Unavailable::Api("Authentication failure".into())));
    }

    #[test]
    fn test_zero_plan_is_decode_error() {
        let data = json!({"error": 0, "data_counter": 10, "plan_monthly_data": 0});
        assert!(matches!(parse_usage(&data), Err(Unavailable::Decode(_))));
    }

    #[test]
    fn test_missing_counter_is_decode_error() {
        let data = json!({"error": 0, "plan_monthly_data": 100});
        assert!(matches!(parse_usage(&data), Err(Unavailable::Decode(_))));
    }
}
