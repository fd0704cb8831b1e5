//! Fire-and-forget analytics.
//!
//! # Flow
//!
//! 1. Presenters call [`Tracker`], which builds intents and `try_send`s them
//! 2. [`TrackingDispatcher`] receives `TrackingJob`s in a background task
//! 3. The dispatcher hands each job to a [`TrackingTransport`]
//!
//! Nothing here ever blocks the checkout or reports failure back to it.

pub mod dispatcher;
pub mod tracker;
pub mod transport;

pub use dispatcher::TrackingDispatcher;
pub use tracker::{Tracker, TrackerConfig, TracksListener};
pub use transport::TrackingTransport;

use pxkit_sdk::objects::{EventTrackIntent, TrackingIntent};
use tokio::sync::mpsc;

/// Buffer size of the tracking channel. Batches beyond it are dropped.
pub const DEFAULT_TRACKING_BUFFER: usize = 64;

/// A unit of work for the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingJob {
    Events {
        public_key: String,
        intent: EventTrackIntent,
    },
    Token(TrackingIntent),
    Payment(TrackingIntent),
}

pub type TrackingJobSender = mpsc::Sender<TrackingJob>;
pub type TrackingJobReceiver = mpsc::Receiver<TrackingJob>;

pub fn tracking_channel() -> (TrackingJobSender, TrackingJobReceiver) {
    mpsc::channel(DEFAULT_TRACKING_BUFFER)
}
