//! Shared HTTP plumbing for network-backed sources

use inkdash_core::{ConfigError, Unavailable};
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str = concat!("inkdash/", env!("CARGO_PKG_VERSION"));

/// Build the client shared by all network sources
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ConfigError::invalid("PROVIDER_TIMEOUT", format!("{:?}", timeout), e.to_string()))
}

fn request_error(e: reqwest::Error) -> Unavailable {
    if e.is_decode() {
        Unavailable::Decode(e.to_string())
    } else {
        Unavailable::Http(e.to_string())
    }
}

/// Send a request and decode a JSON body. Non-2xx statuses are failures.
pub(crate) async fn fetch_json(request: reqwest::RequestBuilder) -> Result<Value, Unavailable> {
    let response = request.send().await.map_err(request_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(Unavailable::Status(status.as_u16()));
    }
    response.json::<Value>().await.map_err(request_error)
}

/// Fetch a number at a JSON pointer, or report which one was missing
pub(crate) fn number_at(data: &Value, pointer: &str) -> Result<f64, Unavailable> {
    data.pointer(pointer)
        .and_then(Value::as_f64)
        .ok_or_else(|| Unavailable::Decode(format!("missing number at {}", pointer)))
}

/// Fetch a string at a JSON pointer
pub(crate) fn str_at<'a>(data: &'a Value, pointer: &str) -> Result<&'a str, Unavailable> {
    data.pointer(pointer)
        .and_then(Value::as_str)
        .ok_or_else(|| Unavailable::Decode(format!("missing string at {}", pointer)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pointer_helpers() {
        let data = json!({"main": {"temp": 12.5}, "weather": [{"main": "Rain"}]});
        assert_eq!(number_at(&data, "/main/temp").unwrap(), 12.5);
        assert_eq!(str_at(&data, "/weather/0/main").unwrap(), "Rain");
        assert!(matches!(number_at(&data, "/main/humidity"), Err(Unavailable::Decode(_))));
        assert!(matches!(str_at(&data, "/main/temp"), Err(Unavailable::Decode(_))));
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(Duration::from_secs(5)).is_ok());
    }
}
