//! Explicitly constructed tracking handle.

use std::sync::{Arc, OnceLock, RwLock};

use pxkit_sdk::objects::{
    AppInformation, DeviceInfo, Event, EventTrackIntent, TrackingIntent, payment_types,
};
use serde_json::{Map, Value};
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{TrackingJob, TrackingJobSender};

pub const TRACKING_FLAVOR: &str = "3";
pub const TRACKING_SDK_TYPE: &str = "native";

/// Values a tracker must be initialized with before it records anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerConfig {
    pub public_key: String,
    pub site_id: String,
    pub sdk_version: String,
    pub app: Option<AppInformation>,
}

impl TrackerConfig {
    fn into_session(self) -> Option<Session> {
        let app = self.app?;
        let complete = [
            &self.public_key,
            &self.site_id,
            &self.sdk_version,
            &app.package_name,
            &app.checkout_version,
        ]
        .iter()
        .all(|value| !value.is_empty());
        complete.then_some(Session {
            public_key: self.public_key,
            site_id: self.site_id,
            sdk_version: self.sdk_version,
            app,
        })
    }
}

#[derive(Debug)]
struct Session {
    public_key: String,
    site_id: String,
    sdk_version: String,
    app: AppInformation,
}

/// Receives a copy of every tracked event, in the order they are tracked.
pub trait TracksListener: Send + Sync {
    fn on_screen_launched(&self, screen_name: &str);
    fn on_event_performed(&self, event: &Map<String, Value>);
}

/// Cheap to clone; all clones share one session.
#[derive(Clone)]
pub struct Tracker {
    inner: Arc<TrackerInner>,
}

struct TrackerInner {
    session: OnceLock<Session>,
    jobs: TrackingJobSender,
    client_id: String,
    device: DeviceInfo,
    listener: RwLock<Option<Arc<dyn TracksListener>>>,
}

impl Tracker {
    pub fn new(jobs: TrackingJobSender) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                session: OnceLock::new(),
                jobs,
                client_id: Uuid::new_v4().to_string(),
                device: DeviceInfo {
                    os: Some(std::env::consts::OS.to_string()),
                    ..Default::default()
                },
                listener: RwLock::new(None),
            }),
        }
    }

    /// Start the session. Accepted once, and only when every value is
    /// present and non-empty. Returns whether this call initialized it.
    pub fn init(&self, config: TrackerConfig) -> bool {
        if self.is_initialized() {
            debug!("Tracker already initialized, ignoring");
            return false;
        }
        let Some(session) = config.into_session() else {
            warn!("Tracker config incomplete, tracking stays disabled");
            return false;
        };
        let site_id = session.site_id.clone();
        let accepted = self.inner.session.set(session).is_ok();
        if accepted {
            debug!(site_id = %site_id, "Tracker initialized");
        }
        accepted
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.session.get().is_some()
    }

    pub fn set_listener(&self, listener: Arc<dyn TracksListener>) {
        let mut slot = self
            .inner
            .listener
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(listener);
    }

    /// Enqueue one batch. Returns the intent that was built, or `None` when
    /// the tracker is not initialized or there is nothing to send.
    pub fn track_events(&self, events: Vec<Event>) -> Option<EventTrackIntent> {
        let session = self.inner.session.get()?;
        if events.is_empty() {
            return None;
        }

        self.notify_listener(&events);

        let intent = EventTrackIntent {
            client_id: self.inner.client_id.clone(),
            application: session.app.clone(),
            device: self.inner.device.clone(),
            events,
        };
        self.enqueue(TrackingJob::Events {
            public_key: session.public_key.clone(),
            intent: intent.clone(),
        });
        Some(intent)
    }

    pub fn track_screen(&self, screen_name: &str) -> Option<EventTrackIntent> {
        self.track_events(vec![Event::screen_view(screen_name)])
    }

    pub fn track_action(&self, screen_name: &str, action: &str) -> Option<EventTrackIntent> {
        self.track_events(vec![Event::action(screen_name, action)])
    }

    /// Report a created card token.
    pub fn track_token(&self, token_id: &str) -> Option<TrackingIntent> {
        if token_id.is_empty() {
            return None;
        }
        let intent = self.intent(token_id)?;
        self.enqueue(TrackingJob::Token(intent.clone()));
        Some(intent)
    }

    /// Report a payment made with an offline method. Card payments are
    /// tracked through their token instead and are ignored here.
    pub fn track_payment(&self, payment_id: i64, payment_type_id: &str) -> Option<TrackingIntent> {
        if payment_types::is_card(payment_type_id) {
            return None;
        }
        let intent = self.intent(&payment_id.to_string())?;
        self.enqueue(TrackingJob::Payment(intent.clone()));
        Some(intent)
    }

    fn intent(&self, reference: &str) -> Option<TrackingIntent> {
        let session = self.inner.session.get()?;
        Some(TrackingIntent {
            public_key: session.public_key.clone(),
            reference: reference.to_string(),
            flavor: TRACKING_FLAVOR.to_string(),
            platform: session.app.platform.clone(),
            sdk_type: TRACKING_SDK_TYPE.to_string(),
            sdk_version: session.sdk_version.clone(),
            site_id: session.site_id.clone(),
        })
    }

    fn enqueue(&self, job: TrackingJob) {
        match self.inner.jobs.try_send(job) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("Tracking channel full, dropping batch");
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Tracking channel closed, dropping batch");
            }
        }
    }

    fn notify_listener(&self, events: &[Event]) {
        let listener = self
            .inner
            .listener
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        let Some(listener) = listener else {
            return;
        };
        for event in events {
            match event {
                Event::ScreenView { screen_name, .. } => listener.on_screen_launched(screen_name),
                Event::Action { .. } => {
                    if let Ok(Value::Object(map)) = serde_json::to_value(event) {
                        listener.on_event_performed(&map);
                    }
                }
            }
        }
    }
}
