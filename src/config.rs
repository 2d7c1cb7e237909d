use std::env;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;

use crate::error::TerminalError;

/// Which weekday the directory numbers as `dow = 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl FromStr for WeekStart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monday" | "mon" => Ok(WeekStart::Monday),
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            other => Err(format!("expected monday or sunday, got {other:?}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub directory_url: String,
    pub geocoder_url: String,
    pub timezone_url: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub log_level: String,
    pub week_start: WeekStart,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory_url: "https://api.tport.online".to_string(),
            geocoder_url: "https://nominatim.openstreetmap.org".to_string(),
            timezone_url: "https://timeapi.io".to_string(),
            http_timeout_secs: 30,
            user_agent: "terminal_status".to_string(),
            log_level: "info".to_string(),
            week_start: WeekStart::Monday,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, TerminalError> {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        Ok(Self {
            directory_url: string_or_default("TERMINAL_DIRECTORY_URL", defaults.directory_url),
            geocoder_url: string_or_default("GEOCODER_URL", defaults.geocoder_url),
            timezone_url: string_or_default("TIMEZONE_URL", defaults.timezone_url),
            http_timeout_secs: parse_or_default("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
            user_agent: string_or_default("USER_AGENT", defaults.user_agent),
            log_level: string_or_default("LOG_LEVEL", defaults.log_level),
            week_start: parse_or_default("WEEK_START", defaults.week_start)?,
        })
    }

    /// Shared HTTP client for the directory, geocoder and timezone services
    pub fn http_client(&self) -> Result<Client, TerminalError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(self.http_timeout_secs))
            .user_agent(self.user_agent.as_str())
            .build()?;
        Ok(client)
    }
}

fn string_or_default(key: &str, default: String) -> String {
    env::var(key)
        .ok()
        .map(|raw| raw.trim().trim_end_matches('/').to_string())
        .filter(|raw| !raw.is_empty())
        .unwrap_or(default)
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, TerminalError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| TerminalError::Config(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
