//! Configuration types shared by the clients and the checkout core.

mod gateway;
mod service;

pub use gateway::{DEFAULT_GATEWAY_URL, GatewayConfig};
pub use service::{MerchantEndpoint, ServicePreference};
