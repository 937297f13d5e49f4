//! Environment configuration
//!
//! All settings are read once at startup. A missing optional setting takes
//! its documented default; a present but malformed one is a `ConfigError`.

use chrono_tz::Tz;
use inkdash_core::{
    ConfigError, QuietHours, DEFAULT_DISPLAY_HEIGHT, DEFAULT_DISPLAY_WIDTH,
    DEFAULT_PROVIDER_TIMEOUT, DEFAULT_REFRESH_INTERVAL, MAX_DISPLAY_DIMENSION, MIN_DISPLAY_HEIGHT,
    MIN_DISPLAY_WIDTH,
};
use inkdash_sources::{GithubConfig, SourcesConfig, TaskConfig, TaskLists, VpsConfig, WeatherConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Process-wide settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Time between refresh cycles
    pub refresh_interval: Duration,
    /// Write `screenshot.bmp` instead of driving the panel
    pub screenshot_mode: bool,
    pub quiet_hours: Option<QuietHours>,
    pub timezone: Tz,
    pub display_width: u32,
    pub display_height: u32,
    /// Deadline for each provider fetch
    pub provider_timeout: Duration,
    /// Directory with optional 1-bit BMP icons
    pub icon_dir: Option<PathBuf>,
    /// Show the contribution summary instead of the dashboard on December 31
    pub year_end_summary: bool,
    pub sources: SourcesConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            screenshot_mode: false,
            quiet_hours: None,
            timezone: Tz::UTC,
            display_width: DEFAULT_DISPLAY_WIDTH,
            display_height: DEFAULT_DISPLAY_HEIGHT,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            icon_dir: None,
            year_end_summary: true,
            sources: SourcesConfig::default(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let refresh_interval = match get("REFRESH_INTERVAL") {
            Some(v) => Duration::from_secs(parse_positive("REFRESH_INTERVAL", &v)?),
            None => DEFAULT_REFRESH_INTERVAL,
        };
        let provider_timeout = match get("PROVIDER_TIMEOUT") {
            Some(v) => Duration::from_secs(parse_positive("PROVIDER_TIMEOUT", &v)?),
            None => DEFAULT_PROVIDER_TIMEOUT,
        };
        let screenshot_mode = match get("SCREENSHOT_MODE") {
            Some(v) => parse_bool("SCREENSHOT_MODE", &v)?,
            None => false,
        };
        let year_end_summary = match get("YEAR_END_SUMMARY") {
            Some(v) => parse_bool("YEAR_END_SUMMARY", &v)?,
            None => true,
        };

        let quiet_hours = match (get("QUIET_START_HOUR"), get("QUIET_END_HOUR")) {
            (Some(start), Some(end)) => Some(QuietHours::new(
                parse_hour("QUIET_START_HOUR", &start)?,
                parse_hour("QUIET_END_HOUR", &end)?,
            )?),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("QUIET_END_HOUR".to_string())),
            (None, Some(_)) => return Err(ConfigError::Missing("QUIET_START_HOUR".to_string())),
        };

        let timezone = match get("TIMEZONE") {
            Some(v) => v
                .parse::<Tz>()
                .map_err(|_| ConfigError::invalid("TIMEZONE", v.as_str(), "unknown IANA time zone"))?,
            None => Tz::UTC,
        };

        let display_width = match get("DISPLAY_WIDTH") {
            Some(v) => parse_dimension("DISPLAY_WIDTH", &v, MIN_DISPLAY_WIDTH)?,
            None => DEFAULT_DISPLAY_WIDTH,
        };
        let display_height = match get("DISPLAY_HEIGHT") {
            Some(v) => parse_dimension("DISPLAY_HEIGHT", &v, MIN_DISPLAY_HEIGHT)?,
            None => DEFAULT_DISPLAY_HEIGHT,
        };

        let sources = SourcesConfig {
            timezone,
            timeout: provider_timeout,
            weather: WeatherConfig {
                api_key: get("OPENWEATHER_API_KEY"),
                city: get("CITY_NAME").unwrap_or_else(|| WeatherConfig::default().city),
            },
            github: GithubConfig {
                username: get("GITHUB_USERNAME"),
                token: get("GITHUB_TOKEN"),
            },
            vps: VpsConfig {
                veid: get("VPS_VEID"),
                api_key: get("VPS_API_KEY"),
            },
            tasks: TaskConfig {
                lists: TaskLists {
                    goals: parse_list(get("LIST_GOALS")),
                    must: parse_list(get("LIST_MUST")),
                    optional: parse_list(get("LIST_OPTIONAL")),
                },
                todo_file: get("TODO_FILE").map(PathBuf::from),
            },
        };

        Ok(Self {
            refresh_interval,
            screenshot_mode,
            quiet_hours,
            timezone,
            display_width,
            display_height,
            provider_timeout,
            icon_dir: get("ICON_DIR").map(PathBuf::from),
            year_end_summary,
            sources,
        })
    }

    /// Log the effective settings (never the credentials themselves)
    pub fn log_summary(&self) {
        log::info!(
            "Refresh every {:?}, display {}x{}, timezone {}",
            self.refresh_interval,
            self.display_width,
            self.display_height,
            self.timezone
        );
        match &self.quiet_hours {
            Some(quiet) => log::info!("Quiet hours {}", quiet),
            None => log::info!("Quiet hours disabled"),
        }
        if self.screenshot_mode {
            log::info!("Screenshot mode: frames go to a file");
        }
        if !self.year_end_summary {
            log::info!("Year-end summary disabled");
        }
        let configured = |present: bool| if present { "configured" } else { "not configured" };
        log::info!(
            "Weather {}, commits {}, VPS {}",
            configured(self.sources.weather.api_key.is_some()),
            configured(self.sources.github.username.is_some() && self.sources.github.token.is_some()),
            configured(self.sources.vps.veid.is_some() && self.sources.vps.api_key.is_some()),
        );
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u64, ConfigError> {
    let n: u64 = value
        .parse()
        .map_err(|_| ConfigError::invalid(key, value, "expected a positive integer"))?;
    if n == 0 {
        return Err(ConfigError::invalid(key, value, "must be greater than zero"));
    }
    Ok(n)
}

/// Panel dimension in pixels, between `min` and `MAX_DISPLAY_DIMENSION`
fn parse_dimension(key: &str, value: &str, min: u32) -> Result<u32, ConfigError> {
    let n = u32::try_from(parse_positive(key, value)?)
        .map_err(|_| ConfigError::invalid(key, value, "too large for a display dimension"))?;
    if n < min || n > MAX_DISPLAY_DIMENSION {
        return Err(ConfigError::invalid(
            key,
            value,
            format!("must be between {} and {}", min, MAX_DISPLAY_DIMENSION),
        ));
    }
    Ok(n)
}

fn parse_hour(key: &str, value: &str) -> Result<u32, ConfigError> {
    match value.parse::<u32>() {
        Ok(hour) if hour <= 23 => Ok(hour),
        _ => Err(ConfigError::invalid(key, value, "hour must be between 0 and 23")),
    }
}

/// Accepts 1/0, true/false, yes/no, on/off (case-insensitive)
pub fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, value, "expected a boolean")),
    }
}

/// Comma-separated list, blank items dropped
fn parse_list(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.refresh_interval, Duration::from_secs(600));
        assert_eq!((s.display_width, s.display_height), (800, 480));
        assert_eq!(s.sources.weather.city, "Shanghai");
        assert!(s.quiet_hours.is_none());
        assert!(s.year_end_summary);
    }

    #[test]
    fn test_full_environment() {
        let s = settings(&[
            ("REFRESH_INTERVAL", "300"),
            ("SCREENSHOT_MODE", "Yes"),
            ("YEAR_END_SUMMARY", "off"),
            ("QUIET_START_HOUR", "1"),
            ("QUIET_END_HOUR", "6"),
            ("TIMEZONE", "Asia/Shanghai"),
            ("OPENWEATHER_API_KEY", "abc"),
            ("CITY_NAME", "Beijing"),
            ("LIST_GOALS", "Ship v1, Learn Rust ,,"),
            ("TODO_FILE", "/tmp/todo.md"),
        ])
        .unwrap();
        assert_eq!(s.refresh_interval, Duration::from_secs(300));
        assert!(s.screenshot_mode);
        assert!(!s.year_end_summary);
        assert_eq!(s.quiet_hours, Some(QuietHours::new(1, 6).unwrap()));
        assert_eq!(s.timezone, chrono_tz::Asia::Shanghai);
        assert_eq!(s.sources.timezone, chrono_tz::Asia::Shanghai);
        assert_eq!(s.sources.weather.api_key.as_deref(), Some("abc"));
        assert_eq!(s.sources.weather.city, "Beijing");
        assert_eq!(s.sources.tasks.lists.goals, vec!["Ship v1", "Learn Rust"]);
        assert_eq!(s.sources.tasks.todo_file, Some(PathBuf::from("/tmp/todo.md")));
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let s = settings(&[("REFRESH_INTERVAL", "  "), ("GITHUB_TOKEN", "")]).unwrap();
        assert_eq!(s.refresh_interval, DEFAULT_REFRESH_INTERVAL);
        assert!(s.sources.github.token.is_none());
    }

    #[test]
    fn test_invalid_values_fail_fast() {
        for vars in [
            vec![("REFRESH_INTERVAL", "ten")],
            vec![("REFRESH_INTERVAL", "0")],
            vec![("REFRESH_INTERVAL", "-5")],
            vec![("SCREENSHOT_MODE", "maybe")],
            vec![("YEAR_END_SUMMARY", "sometimes")],
            vec![("QUIET_START_HOUR", "24"), ("QUIET_END_HOUR", "6")],
            vec![("TIMEZONE", "Mars/Olympus")],
            vec![("DISPLAY_WIDTH", "0")],
            vec![("DISPLAY_WIDTH", "4294967317")],
            vec![("DISPLAY_WIDTH", "4294967295")],
            vec![("DISPLAY_WIDTH", "21")],
            vec![("DISPLAY_HEIGHT", "5000")],
            vec![("DISPLAY_HEIGHT", "119")],
        ] {
            assert!(
                matches!(settings(&vars), Err(ConfigError::Invalid { .. })),
                "{:?} should be rejected",
                vars
            );
        }
    }

    #[test]
    fn test_display_size_bounds_accepted() {
        let s = settings(&[("DISPLAY_WIDTH", "200"), ("DISPLAY_HEIGHT", "4096")]).unwrap();
        assert_eq!((s.display_width, s.display_height), (200, 4096));
    }

    #[test]
    fn test_quiet_hours_need_both_ends() {
        assert_eq!(
            settings(&[("QUIET_START_HOUR", "22")]),
            Err(ConfigError::Missing("QUIET_END_HOUR".to_string()))
        );
        assert_eq!(
            settings(&[("QUIET_END_HOUR", "6")]),
            Err(ConfigError::Missing("QUIET_START_HOUR".to_string()))
        );
    }

    #[test]
    fn test_parse_bool() {
        for v in ["1", "true", "TRUE", "yes", "on"] {
            assert_eq!(parse_bool("X", v), Ok(true));
        }
        for v in ["0", "false", "No", "off"] {
            assert_eq!(parse_bool("X", v), Ok(false));
        }
    }
}
