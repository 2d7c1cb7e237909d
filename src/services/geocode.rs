use crate::error::TerminalError;
use crate::models::Coordinates;
use crate::services::traits::Geocoder;
use crate::services::types::NominatimPlace;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Geocoder backed by an OpenStreetMap Nominatim instance
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, city_name: &str) -> Result<Coordinates, TerminalError> {
        let url = format!("{}/search", self.base_url);
        debug!("Geocoding {:?} via {}", city_name, url);

        let failure = |reason: String| TerminalError::Geocode {
            query: city_name.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .query(&[("q", city_name), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(failure(format!("service returned {}", response.status())));
        }

        let places = response.json::<Vec<NominatimPlace>>().await?;
        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| failure("no match".to_string()))?;

        let lat = place
            .lat
            .parse::<f64>()
            .map_err(|err| failure(format!("bad latitude {:?}: {err}", place.lat)))?;
        let lng = place
            .lon
            .parse::<f64>()
            .map_err(|err| failure(format!("bad longitude {:?}: {err}", place.lon)))?;

        debug!("Geocoded {:?} to ({}, {})", city_name, lat, lng);
        Ok(Coordinates { lat, lng })
    }
}
