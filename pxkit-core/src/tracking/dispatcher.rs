//! Background delivery of tracking jobs.

use std::sync::Arc;

use pxkit_sdk::objects::ApiException;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::transport::TrackingTransport;
use super::{TrackingJob, TrackingJobReceiver};

/// Receives tracking jobs and delivers them one at a time.
///
/// Delivery failures are logged and dropped. There is no retry.
pub struct TrackingDispatcher {
    transport: Arc<dyn TrackingTransport>,
    jobs_rx: TrackingJobReceiver,
    shutdown_rx: watch::Receiver<bool>,
}

impl TrackingDispatcher {
    pub fn new(
        transport: Arc<dyn TrackingTransport>,
        jobs_rx: TrackingJobReceiver,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            transport,
            jobs_rx,
            shutdown_rx,
        }
    }

    pub async fn run(mut self) {
        info!("TrackingDispatcher started");

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        info!("TrackingDispatcher received shutdown signal");
                        break;
                    }
                }

                job = self.jobs_rx.recv() => match job {
                    Some(job) => {
                        if let Err(e) = self.deliver(&job).await {
                            warn!(error = %e, job = job.kind(), "Failed to deliver tracking job");
                        }
                    }
                    None => {
                        info!("Tracking channel closed");
                        break;
                    }
                },
            }
        }

        info!("TrackingDispatcher shutdown complete");
    }

    async fn deliver(&self, job: &TrackingJob) -> Result<(), ApiException> {
        match job {
            TrackingJob::Events { public_key, intent } => {
                debug!(events = intent.events.len(), "Delivering tracking events");
                self.transport.send_events(public_key, intent).await
            }
            TrackingJob::Token(intent) => self.transport.send_token(intent).await,
            TrackingJob::Payment(intent) => self.transport.send_payment(intent).await,
        }
    }
}

impl TrackingJob {
    fn kind(&self) -> &'static str {
        match self {
            TrackingJob::Events { .. } => "events",
            TrackingJob::Token(_) => "token",
            TrackingJob::Payment(_) => "payment",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::tracking_channel;
    use async_trait::async_trait;
    use pxkit_sdk::objects::{
        AppInformation, DeviceInfo, Event, EventTrackIntent, TrackingIntent,
    };
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        delivered: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TrackingTransport for RecordingTransport {
        async fn send_events(
            &self,
            public_key: &str,
            intent: &EventTrackIntent,
        ) -> Result<(), ApiException> {
            self.delivered
                .lock()
                .unwrap()
                .push(format!("events:{public_key}:{}", intent.events.len()));
            Err(ApiException::new("tracking unavailable", Some(503)))
        }

        async fn send_token(&self, intent: &TrackingIntent) -> Result<(), ApiException> {
            self.delivered
                .lock()
                .unwrap()
                .push(format!("token:{}", intent.reference));
            Ok(())
        }

        async fn send_payment(&self, intent: &TrackingIntent) -> Result<(), ApiException> {
            self.delivered
                .lock()
                .unwrap()
                .push(format!("payment:{}", intent.reference));
            Ok(())
        }
    }

    fn intent(reference: &str) -> TrackingIntent {
        TrackingIntent {
            public_key: "pk".to_string(),
            reference: reference.to_string(),
            flavor: "3".to_string(),
            platform: "rust".to_string(),
            sdk_type: "native".to_string(),
            sdk_version: "0.1.0".to_string(),
            site_id: "MLA".to_string(),
        }
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_delivery() {
        let transport = Arc::new(RecordingTransport::default());
        let (jobs_tx, jobs_rx) = tracking_channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let dispatcher = TrackingDispatcher::new(transport.clone(), jobs_rx, shutdown_rx);

        jobs_tx
            .send(TrackingJob::Events {
                public_key: "pk".to_string(),
                intent: EventTrackIntent {
                    client_id: "client".to_string(),
                    application: AppInformation {
                        package_name: "com.example.shop".to_string(),
                        checkout_version: "1.0.0".to_string(),
                        platform: "rust".to_string(),
                    },
                    device: DeviceInfo::default(),
                    events: vec![Event::screen_view("DISCOUNTS")],
                },
            })
            .await
            .unwrap();
        jobs_tx.send(TrackingJob::Token(intent("tok-1"))).await.unwrap();
        jobs_tx.send(TrackingJob::Payment(intent("42"))).await.unwrap();
        drop(jobs_tx);

        dispatcher.run().await;

        let delivered = transport.delivered.lock().unwrap().clone();
        assert_eq!(delivered, vec!["events:pk:1", "token:tok-1", "payment:42"]);
    }

    #[tokio::test]
    async fn test_closed_channel_stops_dispatcher_while_shutdown_sender_lives() {
        let transport = Arc::new(RecordingTransport::default());
        let (jobs_tx, jobs_rx) = tracking_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let dispatcher = TrackingDispatcher::new(transport.clone(), jobs_rx, shutdown_rx);

        jobs_tx.send(TrackingJob::Token(intent("tok-2"))).await.unwrap();
        drop(jobs_tx);

        let finished =
            tokio::time::timeout(std::time::Duration::from_secs(2), dispatcher.run()).await;
        assert!(finished.is_ok());
        assert_eq!(
            transport.delivered.lock().unwrap().clone(),
            vec!["token:tok-2"]
        );
        drop(shutdown_tx);
    }

    #[tokio::test]
    async fn test_shutdown_stops_dispatcher() {
        let transport = Arc::new(RecordingTransport::default());
        let (_jobs_tx, jobs_rx) = tracking_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(TrackingDispatcher::new(transport, jobs_rx, shutdown_rx).run());

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
