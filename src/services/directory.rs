use crate::error::TerminalError;
use crate::services::traits::TerminalDirectory;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

/// Client for the public terminal directory (`/v2/public-stations/{id}`)
pub struct DirectoryClient {
    client: Client,
    base_url: String,
}

impl DirectoryClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn station_url(&self, id: &str) -> String {
        format!("{}/v2/public-stations/{}", self.base_url, id)
    }
}

#[async_trait]
impl TerminalDirectory for DirectoryClient {
    async fn fetch(&self, id: &str) -> Result<Value, TerminalError> {
        let url = self.station_url(id);
        debug!("Fetching URL: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            warn!("Directory returned status {} for terminal {}", response.status(), id);
            return Err(TerminalError::Fetch {
                id: id.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.json::<Value>().await?;
        debug!("Received record for terminal {}", id);
        Ok(body)
    }

    fn source_name(&self) -> &'static str {
        "tport public stations"
    }
}
