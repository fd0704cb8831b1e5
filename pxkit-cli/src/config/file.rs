//! TOML file configuration structures.
//!
//! These structs directly map to the `pxkit.toml` file format.

use pxkit_sdk::config::{GatewayConfig, ServicePreference};
use pxkit_sdk::objects::Site;
use serde::{Deserialize, Serialize};
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub checkout: CheckoutConfig,
    /// Operations served by the merchant's own backend.
    #[serde(default)]
    pub merchant: ServicePreference,
    #[serde(default)]
    pub tracking: Option<TrackingConfig>,
}

/// Checkout behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Site used when a preference does not carry one.
    #[serde(default)]
    pub site: Option<Site>,
    #[serde(default)]
    pub binary_mode: bool,
    #[serde(default = "default_last_digits_label")]
    pub last_digits_label: String,
    /// Resolve a direct discount before asking for a coupon code.
    #[serde(default = "default_true")]
    pub direct_discount: bool,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            site: None,
            binary_mode: false,
            last_digits_label: default_last_digits_label(),
            direct_discount: true,
        }
    }
}

fn default_last_digits_label() -> String {
    pxkit_core::providers::checkout::DEFAULT_LAST_DIGITS_LABEL.to_string()
}

fn default_true() -> bool {
    true
}

/// Analytics section. Tracking is off when the section is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Defaults to the gateway base URL.
    #[serde(default)]
    pub base_url: Option<Url>,
    pub package_name: String,
    #[serde(default = "default_checkout_version")]
    pub checkout_version: String,
}

fn default_checkout_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
