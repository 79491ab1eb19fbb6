//! USGS Earthquake API client.
//!
//! Provides blocking HTTP access to the USGS feed and FDSN endpoints.
//! Uses reqwest with rustls for TLS.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use tracing::{debug, instrument, warn};

use crate::errors::GeteqError;

/// Default request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// User agent string for API requests.
const USER_AGENT: &str = concat!("geteq/", env!("CARGO_PKG_VERSION"));

/// Client for USGS earthquake API.
pub struct UsgsClient {
    client: Client,
}

impl UsgsClient {
    /// Create a new USGS client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self, GeteqError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch the full response body for `url`.
    ///
    /// A non-success status is logged but its body is still returned; the
    /// caller decides whether the bytes are usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the body cannot be
    /// read.
    #[instrument(skip_all, fields(url = %url))]
    pub fn fetch(&self, url: &Url) -> Result<Vec<u8>, GeteqError> {
        debug!("sending request");

        let response = self.client.get(url.clone()).send()?;

        let status = response.status();
        if !status.is_success() {
            warn!("USGS API returned HTTP {}", status.as_u16());
        }

        let body = response.bytes()?;

        debug!("received {} bytes (HTTP {})", body.len(), status.as_u16());
        Ok(body.to_vec())
    }
}
