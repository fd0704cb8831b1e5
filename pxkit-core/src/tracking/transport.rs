use async_trait::async_trait;
use pxkit_sdk::client::TrackingClient;
use pxkit_sdk::objects::{ApiException, EventTrackIntent, TrackingIntent};

/// Delivers tracking payloads. Shared by the dispatcher as a trait object.
#[async_trait]
pub trait TrackingTransport: Send + Sync {
    async fn send_events(
        &self,
        public_key: &str,
        intent: &EventTrackIntent,
    ) -> Result<(), ApiException>;

    async fn send_token(&self, intent: &TrackingIntent) -> Result<(), ApiException>;

    async fn send_payment(&self, intent: &TrackingIntent) -> Result<(), ApiException>;
}

#[async_trait]
impl TrackingTransport for TrackingClient {
    async fn send_events(
        &self,
        public_key: &str,
        intent: &EventTrackIntent,
    ) -> Result<(), ApiException> {
        Ok(self.track_events(public_key, intent).await?)
    }

    async fn send_token(&self, intent: &TrackingIntent) -> Result<(), ApiException> {
        Ok(self.track_token(intent).await?)
    }

    async fn send_payment(&self, intent: &TrackingIntent) -> Result<(), ApiException> {
        Ok(self.track_payment(intent).await?)
    }
}
