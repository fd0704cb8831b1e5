//! Analytics payloads sent to the tracking endpoint.

use serde::{Deserialize, Serialize};

/// Host application details attached to every tracking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInformation {
    pub package_name: String,
    pub checkout_version: String,
    pub platform: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub system_version: Option<String>,
}

/// A single tracked event. The timestamp is in unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    ScreenView {
        screen_name: String,
        timestamp: i64,
    },
    Action {
        screen_name: String,
        action: String,
        timestamp: i64,
    },
}

impl Event {
    pub fn screen_view(screen_name: impl Into<String>) -> Self {
        Event::ScreenView {
            screen_name: screen_name.into(),
            timestamp: now_millis(),
        }
    }

    pub fn action(screen_name: impl Into<String>, action: impl Into<String>) -> Self {
        Event::Action {
            screen_name: screen_name.into(),
            action: action.into(),
            timestamp: now_millis(),
        }
    }

    pub fn screen_name(&self) -> &str {
        match self {
            Event::ScreenView { screen_name, .. } | Event::Action { screen_name, .. } => {
                screen_name
            }
        }
    }
}

fn now_millis() -> i64 {
    (time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// A batch of events delivered in one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTrackIntent {
    pub client_id: String,
    pub application: AppInformation,
    pub device: DeviceInfo,
    pub events: Vec<Event>,
}

/// Identifies a card token or an offline payment for the gateway's
/// conversion tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingIntent {
    pub public_key: String,
    /// Token id for card flows, payment id for offline methods.
    pub reference: String,
    pub flavor: String,
    pub platform: String,
    pub sdk_type: String,
    pub sdk_version: String,
    pub site_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        let event = Event::Action {
            screen_name: "FINANCIAL_INSTITUTIONS".to_string(),
            action: "BACK_PRESSED".to_string(),
            timestamp: 1,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "action");
        assert_eq!(json["screen_name"], "FINANCIAL_INSTITUTIONS");
        assert_eq!(json["action"], "BACK_PRESSED");
    }
}
