//! Gateway API client.
//!
//! Every request is authenticated with the merchant public key (or a payer
//! access token) passed as a query parameter.

use reqwest::Client;
use rust_decimal::Decimal;
use url::Url;

use super::{ClientError, IDEMPOTENCY_HEADER, parse_response};
use crate::config::GatewayConfig;
use crate::objects::{
    CheckoutPreference, Discount, Payer, Payment, PaymentBody, PaymentMethod,
    PaymentMethodSearch, Site,
};

/// Typed HTTP client for the payment gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: Url,
    public_key: String,
    private_key: Option<String>,
}

impl GatewayClient {
    /// Create a new `GatewayClient`.
    ///
    /// * `base_url` – root URL of the gateway API.
    /// * `public_key` – the merchant public key.
    pub fn new(base_url: Url, public_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            public_key: public_key.into(),
            private_key: None,
        }
    }

    /// Build a client from a [`GatewayConfig`].
    pub fn from_config(config: &GatewayConfig) -> Self {
        let mut client = Self::new(
            config.base_url.clone(),
            config.public_key.clone().unwrap_or_default(),
        );
        client.private_key = config.private_key.clone();
        client
    }

    /// Authenticate as a logged-in payer.
    pub fn with_private_key(mut self, private_key: impl Into<String>) -> Self {
        self.private_key = Some(private_key.into());
        self
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    fn credentials(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(2);
        if !self.public_key.is_empty() {
            query.push(("public_key", self.public_key.clone()));
        }
        if let Some(token) = &self.private_key {
            query.push(("access_token", token.clone()));
        }
        query
    }

    /// `GET /v1/checkout/preferences/{id}`
    pub async fn get_preference(&self, id: &str) -> Result<CheckoutPreference, ClientError> {
        let url = self
            .base_url
            .join(&format!("/v1/checkout/preferences/{id}"))?;

        let resp = self
            .http
            .get(url)
            .query(&self.credentials())
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `POST /v1/checkout/payment_methods/search/options` – the payer is
    /// sent as the body, filters as query parameters.
    pub async fn search_payment_methods(
        &self,
        amount: Decimal,
        excluded_payment_types: &[String],
        excluded_payment_methods: &[String],
        payer: &Payer,
        site: Site,
    ) -> Result<PaymentMethodSearch, ClientError> {
        let url = self
            .base_url
            .join("/v1/checkout/payment_methods/search/options")?;

        let mut query = self.credentials();
        query.push(("amount", amount.to_string()));
        query.push(("site_id", site.id().to_string()));
        if !excluded_payment_types.is_empty() {
            query.push(("excluded_payment_types", excluded_payment_types.join(",")));
        }
        if !excluded_payment_methods.is_empty() {
            query.push(("excluded_payment_methods", excluded_payment_methods.join(",")));
        }

        let resp = self
            .http
            .post(url)
            .query(&query)
            .json(payer)
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `GET /v1/payment_methods`
    pub async fn get_payment_methods(&self) -> Result<Vec<PaymentMethod>, ClientError> {
        let url = self.base_url.join("/v1/payment_methods")?;

        let resp = self
            .http
            .get(url)
            .query(&self.credentials())
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `GET /v1/discount_campaigns` – the campaign that applies without a
    /// coupon code.
    pub async fn get_direct_discount(
        &self,
        amount: Decimal,
        payer_email: &str,
    ) -> Result<Discount, ClientError> {
        self.discount_campaign(amount, payer_email, None).await
    }

    /// `GET /v1/discount_campaigns?coupon_code=…`
    pub async fn get_code_discount(
        &self,
        amount: Decimal,
        payer_email: &str,
        coupon_code: &str,
    ) -> Result<Discount, ClientError> {
        self.discount_campaign(amount, payer_email, Some(coupon_code))
            .await
    }

    async fn discount_campaign(
        &self,
        amount: Decimal,
        payer_email: &str,
        coupon_code: Option<&str>,
    ) -> Result<Discount, ClientError> {
        let url = self.base_url.join("/v1/discount_campaigns")?;

        let mut query = self.credentials();
        query.push(("transaction_amount", amount.to_string()));
        query.push(("payer_email", payer_email.to_string()));
        if let Some(code) = coupon_code {
            query.push(("coupon_code", code.to_string()));
        }

        let resp = self.http.get(url).query(&query).send().await?;

        parse_response(resp).await
    }

    /// `POST /v1/checkout/payments` – the transaction id doubles as the
    /// idempotency key.
    pub async fn create_payment(&self, body: &PaymentBody) -> Result<Payment, ClientError> {
        let url = self.base_url.join("/v1/checkout/payments")?;

        let resp = self
            .http
            .post(url)
            .query(&self.credentials())
            .header(IDEMPOTENCY_HEADER, &body.transaction_id)
            .json(body)
            .send()
            .await?;

        parse_response(resp).await
    }
}
