//! Gateway credentials.

use serde::{Deserialize, Serialize};
use url::Url;

/// Production gateway root.
pub const DEFAULT_GATEWAY_URL: &str = "https://api.mercadopago.com";

/// Gateway base URL and credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub base_url: Url,
    pub public_key: Option<String>,
    /// Payer access token, used instead of the public key by logged-in flows.
    #[serde(default)]
    pub private_key: Option<String>,
}

impl GatewayConfig {
    /// Whether at least one credential is present and non-empty.
    pub fn has_credentials(&self) -> bool {
        let present = |key: &Option<String>| key.as_deref().is_some_and(|k| !k.is_empty());
        present(&self.public_key) || present(&self.private_key)
    }
}
