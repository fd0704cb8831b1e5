//! Merchant-hosted endpoint preferences.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

/// One merchant server endpoint: base URL, path and the extra fields the
/// merchant wants echoed back on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantEndpoint {
    pub base_url: Url,
    pub uri: String,
    #[serde(default)]
    pub additional_info: Map<String, Value>,
}

impl MerchantEndpoint {
    pub fn new(base_url: Url, uri: impl Into<String>) -> Self {
        Self {
            base_url,
            uri: uri.into(),
            additional_info: Map::new(),
        }
    }

    pub fn with_additional_info(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.additional_info.insert(key.into(), value.into());
        self
    }

    /// Full URL of the endpoint.
    pub fn url(&self) -> Result<Url, url::ParseError> {
        self.base_url.join(&self.uri)
    }
}

/// Which checkout operations are served by the merchant instead of the
/// gateway.
///
/// An absent endpoint means the gateway handles that operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicePreference {
    #[serde(default)]
    pub get_customer: Option<MerchantEndpoint>,
    #[serde(default)]
    pub create_payment: Option<MerchantEndpoint>,
    #[serde(default)]
    pub get_discount: Option<MerchantEndpoint>,
}

impl ServicePreference {
    pub fn has_get_customer_url(&self) -> bool {
        self.get_customer.is_some()
    }

    pub fn has_create_payment_url(&self) -> bool {
        self.create_payment.is_some()
    }

    pub fn has_get_discount_url(&self) -> bool {
        self.get_discount.is_some()
    }

    pub fn with_get_customer(mut self, endpoint: MerchantEndpoint) -> Self {
        self.get_customer = Some(endpoint);
        self
    }

    pub fn with_create_payment(mut self, endpoint: MerchantEndpoint) -> Self {
        self.create_payment = Some(endpoint);
        self
    }

    pub fn with_get_discount(mut self, endpoint: MerchantEndpoint) -> Self {
        self.get_discount = Some(endpoint);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_join() {
        let endpoint = MerchantEndpoint::new(
            Url::parse("https://merchant.example.com/api/").unwrap(),
            "customers/me",
        );
        assert_eq!(
            endpoint.url().unwrap().as_str(),
            "https://merchant.example.com/api/customers/me"
        );
    }

    #[test]
    fn test_flags() {
        let base = Url::parse("https://merchant.example.com").unwrap();
        let preference = ServicePreference::default()
            .with_get_discount(MerchantEndpoint::new(base, "/discounts"));
        assert!(preference.has_get_discount_url());
        assert!(!preference.has_get_customer_url());
        assert!(!preference.has_create_payment_url());
    }
}
