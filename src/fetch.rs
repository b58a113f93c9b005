use crate::error::{ExtractError, Result};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info};

/// Blocking HTTP GET for the dump.
///
/// The returned [`Response`] implements `Read` and streams the body; dropping
/// it closes the connection.
#[derive(Debug, Clone)]
pub struct DumpFetcher {
    client: Client,
}

impl DumpFetcher {
    /// No overall timeout: a full dump body streams for hours.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(ExtractError::HttpClient)?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn fetch(&self, url: &str) -> Result<Response> {
        info!(url, "Downloading dump");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| ExtractError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ExtractError::BadStatus {
                url: url.to_string(),
                status,
            });
        }

        debug!(
            status = %status,
            content_length = ?response.content_length(),
            "Dump response received"
        );
        Ok(response)
    }
}
