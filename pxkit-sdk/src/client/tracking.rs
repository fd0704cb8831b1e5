//! Tracking endpoint client.

use reqwest::Client;
use url::Url;

use super::{ClientError, expect_success};
use crate::objects::{EventTrackIntent, TrackingIntent};

/// Typed HTTP client for the analytics endpoints.
#[derive(Debug, Clone)]
pub struct TrackingClient {
    http: Client,
    base_url: Url,
}

impl TrackingClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /v1/checkout/tracking/events`
    pub async fn track_events(
        &self,
        public_key: &str,
        intent: &EventTrackIntent,
    ) -> Result<(), ClientError> {
        let url = self.base_url.join("/v1/checkout/tracking/events")?;
        let resp = self
            .http
            .post(url)
            .query(&[("public_key", public_key)])
            .json(intent)
            .send()
            .await?;
        expect_success(resp).await
    }

    /// `POST /v1/checkout/tracking`
    pub async fn track_token(&self, intent: &TrackingIntent) -> Result<(), ClientError> {
        let url = self.base_url.join("/v1/checkout/tracking")?;
        let resp = self.http.post(url).json(intent).send().await?;
        expect_success(resp).await
    }

    /// `POST /v1/checkout/tracking/off`
    pub async fn track_payment(&self, intent: &TrackingIntent) -> Result<(), ClientError> {
        let url = self.base_url.join("/v1/checkout/tracking/off")?;
        let resp = self.http.post(url).json(intent).send().await?;
        expect_success(resp).await
    }
}
