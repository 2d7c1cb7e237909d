use crate::error::TerminalError;
use crate::models::Coordinates;
use crate::services::traits::TimezoneLookup;
use crate::services::types::CoordinateTimezone;
use async_trait::async_trait;
use chrono_tz::Tz;
use reqwest::Client;
use tracing::debug;

/// Timezone lookup backed by timeapi.io's coordinate endpoint
pub struct TimeApiTimezoneLookup {
    client: Client,
    base_url: String,
}

impl TimeApiTimezoneLookup {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl TimezoneLookup for TimeApiTimezoneLookup {
    async fn timezone_at(&self, coordinates: Coordinates) -> Result<Tz, TerminalError> {
        let url = format!("{}/api/timezone/coordinate", self.base_url);
        let Coordinates { lat, lng } = coordinates;

        let response = self
            .client
            .get(&url)
            .query(&[("latitude", lat), ("longitude", lng)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TerminalError::TimezoneLookup {
                lat,
                lng,
                reason: format!("service returned {}", response.status()),
            });
        }

        let body = response.json::<CoordinateTimezone>().await?;
        debug!("Timezone at ({}, {}) is {}", lat, lng, body.time_zone);

        body.time_zone
            .parse::<Tz>()
            .map_err(|_| TerminalError::UnknownTimezone(body.time_zone.clone()))
    }
}
