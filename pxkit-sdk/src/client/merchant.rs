//! Merchant server client.
//!
//! Merchants may host customer lookup, discount resolution and payment
//! creation themselves. Each endpoint is described by a
//! [`MerchantEndpoint`]; its additional info is forwarded as query
//! parameters on reads and merged into the JSON body on writes.

use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::{ClientError, IDEMPOTENCY_HEADER, parse_response};
use crate::config::MerchantEndpoint;
use crate::objects::{Customer, Discount, Payment};

/// Typed HTTP client for merchant-hosted checkout endpoints.
#[derive(Debug, Clone, Default)]
pub struct MerchantClient {
    http: Client,
}

impl MerchantClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `GET {customer endpoint}`
    pub async fn get_customer(&self, endpoint: &MerchantEndpoint) -> Result<Customer, ClientError> {
        let resp = self
            .http
            .get(endpoint.url()?)
            .query(&info_as_query(&endpoint.additional_info))
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `GET {discount endpoint}?amount=…&payer_email=…`
    pub async fn get_direct_discount(
        &self,
        endpoint: &MerchantEndpoint,
        amount: Decimal,
        payer_email: &str,
    ) -> Result<Discount, ClientError> {
        let mut query = info_as_query(&endpoint.additional_info);
        query.push(("amount".to_string(), amount.to_string()));
        query.push(("payer_email".to_string(), payer_email.to_string()));

        let resp = self
            .http
            .get(endpoint.url()?)
            .query(&query)
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `POST {payment endpoint}` with the merchant's additional info merged
    /// into `body`. Keys already present in `body` win.
    pub async fn create_payment(
        &self,
        endpoint: &MerchantEndpoint,
        transaction_id: &str,
        body: Map<String, Value>,
    ) -> Result<Payment, ClientError> {
        let mut payload = endpoint.additional_info.clone();
        payload.extend(body);

        let resp = self
            .http
            .post(endpoint.url()?)
            .header(IDEMPOTENCY_HEADER, transaction_id)
            .json(&payload)
            .send()
            .await?;

        parse_response(resp).await
    }
}

fn info_as_query(info: &Map<String, Value>) -> Vec<(String, String)> {
    info.iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_as_query_stringifies_values() {
        let mut info = Map::new();
        info.insert("merchant_access_token".to_string(), Value::from("tok"));
        info.insert("store".to_string(), Value::from(12));
        let query = info_as_query(&info);
        assert!(query.contains(&("merchant_access_token".to_string(), "tok".to_string())));
        assert!(query.contains(&("store".to_string(), "12".to_string())));
    }
}
