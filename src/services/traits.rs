use crate::error::TerminalError;
use crate::models::Coordinates;
use async_trait::async_trait;
use chrono_tz::Tz;
use serde_json::Value;

/// Source of raw terminal records
/// Swappable so the batch runner can be driven by a stub in tests
#[async_trait]
pub trait TerminalDirectory: Send + Sync {
    /// Fetch the raw JSON record for one terminal id
    async fn fetch(&self, id: &str) -> Result<Value, TerminalError>;

    /// Get the name of the directory source
    fn source_name(&self) -> &'static str;
}

/// City name -> coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best single match for the query, or an error
    async fn geocode(&self, city_name: &str) -> Result<Coordinates, TerminalError>;
}

/// Coordinates -> IANA timezone
#[async_trait]
pub trait TimezoneLookup: Send + Sync {
    async fn timezone_at(&self, coordinates: Coordinates) -> Result<Tz, TerminalError>;
}
