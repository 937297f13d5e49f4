//! Weather data source (OpenWeatherMap current weather)

use async_trait::async_trait;
use inkdash_core::{DataSource, SourceMetadata, Unavailable};
use inkdash_types::{ids, DataPoint, FieldMetadata, FieldType, FieldValue};
use serde_json::Value;

use crate::http::{fetch_json, number_at, str_at};

const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Weather source settings
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub city: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            city: "Shanghai".to_string(),
        }
    }
}

/// Current temperature, condition code and description for one city
pub struct WeatherSource {
    metadata: SourceMetadata,
    config: WeatherConfig,
    client: reqwest::Client,
}

impl WeatherSource {
    pub fn new(config: WeatherConfig, client: reqwest::Client) -> Self {
        Self {
            metadata: SourceMetadata::new("weather", "Weather", "Current weather from OpenWeatherMap"),
            config,
            client,
        }
    }
}

/// Turn an OpenWeather response into data points
pub fn parse_weather(data: &Value) -> Result<Vec<DataPoint>, Unavailable> {
    let temp = number_at(data, "/main/temp")?;
    let condition = str_at(data, "/weather/0/main")?;
    let description = data
        .pointer("/weather/0/description")
        .and_then(Value::as_str)
        .filter(|d| !d.is_empty())
        .unwrap_or(condition);

    Ok(vec![
        DataPoint::new(ids::WEATHER_TEMP, (temp * 10.0).round() / 10.0),
        DataPoint::new(ids::WEATHER_CONDITION, FieldValue::Icon(condition.to_string())),
        DataPoint::new(ids::WEATHER_DESC, description),
    ])
}

#[async_trait]
impl DataSource for WeatherSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn fields(&self) -> Vec<FieldMetadata> {
        vec![
            FieldMetadata::new(ids::WEATHER_TEMP, "Temperature", "Temperature in °C", FieldType::Numerical),
            FieldMetadata::new(
                ids::WEATHER_CONDITION,
                "Condition",
                "Weather condition code (Clear, Clouds, Rain, ...)",
                FieldType::Icon,
            ),
            FieldMetadata::new(ids::WEATHER_DESC, "Description", "Weather description", FieldType::Text),
        ]
    }

    async fn fetch(&self) -> Result<Vec<DataPoint>, Unavailable> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Unavailable::NotConfigured("OPENWEATHER_API_KEY".to_string()))?;

        let request = self.client.get(OPENWEATHER_URL).query(&[
            ("q", self.config.city.as_str()),
            ("appid", api_key),
            ("units", "metric"),
        ]);
        let data = fetch_json(request).await?;
        parse_weather(&data)
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}
