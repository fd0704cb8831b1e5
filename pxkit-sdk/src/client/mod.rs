//! HTTP clients for the gateway, merchant servers and the tracking endpoint.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod gateway;
mod merchant;
mod tracking;

pub use gateway::GatewayClient;
pub use merchant::MerchantClient;
pub use tracking::TrackingClient;

use reqwest::StatusCode;

use crate::objects::ApiException;

/// Header carrying the transaction id so payment creation is idempotent.
pub const IDEMPOTENCY_HEADER: &str = "X-Idempotency-Key";

/// Errors produced by the SDK HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl From<ClientError> for ApiException {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { status, body } => {
                match serde_json::from_str::<ApiException>(&body) {
                    Ok(mut parsed) => {
                        parsed.status.get_or_insert(status.as_u16());
                        if parsed.message.is_empty() {
                            parsed.message = body;
                        }
                        parsed
                    }
                    Err(_) => ApiException::new(body, Some(status.as_u16())),
                }
            }
            ClientError::Http(e) => {
                let status = e.status().map(|s| s.as_u16());
                ApiException::new(e.to_string(), status)
            }
            other => ApiException::new(other.to_string(), None),
        }
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}

async fn expect_success(resp: reqwest::Response) -> Result<(), ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    Ok(())
}
