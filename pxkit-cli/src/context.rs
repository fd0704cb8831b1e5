//! Clients and handles shared by every command.

use std::sync::Arc;
use std::time::Duration;

use pxkit_core::providers::CheckoutProvider;
use pxkit_core::tracking::{Tracker, TrackerConfig, TrackingDispatcher, tracking_channel};
use pxkit_sdk::client::{GatewayClient, MerchantClient, TrackingClient};
use pxkit_sdk::objects::{AppInformation, Site};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::file::{CheckoutConfig, FileConfig};

pub type Provider = CheckoutProvider<GatewayClient, MerchantClient>;

pub struct AppContext {
    pub provider: Arc<Provider>,
    pub checkout: CheckoutConfig,
    pub tracker: Option<Tracker>,
    tracker_config: Option<TrackerConfig>,
    tracking: Option<TrackingTask>,
}

struct TrackingTask {
    handle: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
}

impl AppContext {
    pub fn new(config: FileConfig) -> Self {
        let gateway = GatewayClient::from_config(&config.gateway);
        let public_key = gateway.public_key().to_string();
        let provider = CheckoutProvider::new(
            gateway,
            MerchantClient::new(),
            config.merchant,
            public_key.clone(),
        )
        .with_last_digits_label(config.checkout.last_digits_label.clone());

        let (tracker, tracker_config, tracking) = match config.tracking {
            Some(tracking) => {
                let base_url = tracking
                    .base_url
                    .unwrap_or_else(|| config.gateway.base_url.clone());
                let (jobs_tx, jobs_rx) = tracking_channel();
                let (shutdown_tx, shutdown_rx) = watch::channel(false);
                let dispatcher = TrackingDispatcher::new(
                    Arc::new(TrackingClient::new(base_url)),
                    jobs_rx,
                    shutdown_rx,
                );
                let handle = tokio::spawn(dispatcher.run());

                let tracker_config = TrackerConfig {
                    public_key,
                    site_id: String::new(),
                    sdk_version: env!("CARGO_PKG_VERSION").to_string(),
                    app: Some(AppInformation {
                        package_name: tracking.package_name,
                        checkout_version: tracking.checkout_version,
                        platform: "rust".to_string(),
                    }),
                };
                (
                    Some(Tracker::new(jobs_tx)),
                    Some(tracker_config),
                    Some(TrackingTask {
                        handle,
                        shutdown_tx,
                    }),
                )
            }
            None => (None, None, None),
        };

        Self {
            provider: Arc::new(provider),
            checkout: config.checkout,
            tracker,
            tracker_config,
            tracking,
        }
    }

    /// Start the tracking session once the checkout's site is known.
    pub fn start_tracking(&self, site: Site) {
        let (Some(tracker), Some(config)) = (&self.tracker, &self.tracker_config) else {
            return;
        };
        tracker.init(TrackerConfig {
            site_id: site.id().to_string(),
            ..config.clone()
        });
    }

    /// Site from the preference, falling back to the configured one.
    pub fn site_for(&self, preference_site: Option<Site>) -> Option<Site> {
        preference_site.or(self.checkout.site)
    }

    /// Let queued tracking jobs drain, then stop the dispatcher.
    pub async fn shutdown(self) {
        let Some(TrackingTask {
            mut handle,
            shutdown_tx,
        }) = self.tracking
        else {
            return;
        };
        // Dropping the last tracker closes the channel.
        drop(self.tracker);

        if tokio::time::timeout(Duration::from_secs(5), &mut handle)
            .await
            .is_err()
        {
            tracing::warn!("Tracking dispatcher did not drain in time, stopping it");
            let _ = shutdown_tx.send(true);
            let _ = handle.await;
        }
    }
}
