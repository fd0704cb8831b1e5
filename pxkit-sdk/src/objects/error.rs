use serde::{Deserialize, Serialize};

/// Error payload returned by the gateway or a merchant server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message} (status: {status:?})")]
pub struct ApiException {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub cause: Vec<Cause>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ApiException {
    pub fn new(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status,
            ..Default::default()
        }
    }

    /// Everything except a bad request can be retried by the payer.
    pub fn is_recoverable(&self) -> bool {
        self.status != Some(400)
    }

    /// Code of the first reported cause, if any.
    pub fn first_cause_code(&self) -> Option<&str> {
        self.cause.first().map(|c| c.code.as_str())
    }
}
