//! Collaborators the checkout depends on.
//!
//! Each remote operation is a query type processed through
//! [`kanau::processor::Processor`]. The SDK clients implement them against
//! the real endpoints; tests substitute in-memory processors.
//!
//! - [`Gateway`]: preference, search, payment methods, discounts, payments
//! - [`MerchantServer`]: customer, merchant discount, merchant payment
//! - [`EntityTypesSource`]: entity types offered for a payment method

pub mod checkout;
pub mod entity_types;
#[cfg(test)]
pub(crate) mod mock;
mod gateway;
mod merchant;

pub use checkout::{
    CardAttachment, CheckoutProvider, Prefetch, SearchResult, excluded_payment_types_for_site,
    unsupported_payment_types,
};
pub use entity_types::{GetEntityTypes, SiteEntityTypes};

use kanau::processor::Processor;
use pxkit_sdk::config::MerchantEndpoint;
use pxkit_sdk::objects::{
    ApiException, CheckoutPreference, Customer, Discount, EntityType, Payer, Payment, PaymentBody,
    PaymentMethod, PaymentMethodSearch, Site,
};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

/// Fetch a checkout preference by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPreference {
    pub preference_id: String,
}

/// Search the payment methods available for an amount.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPaymentMethods {
    pub amount: Decimal,
    pub excluded_payment_types: Vec<String>,
    pub excluded_payment_methods: Vec<String>,
    pub payer: Payer,
    pub site: Site,
}

/// List every payment method of the merchant's site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetPaymentMethods;

/// Discount that applies without a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDirectDiscount {
    pub amount: Decimal,
    pub payer_email: String,
}

/// Discount for a payer-entered coupon code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetCodeDiscount {
    pub amount: Decimal,
    pub payer_email: String,
    pub coupon_code: String,
}

/// Create a payment on the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePayment {
    pub body: PaymentBody,
}

/// Fetch the logged-in customer from the merchant server.
#[derive(Debug, Clone, PartialEq)]
pub struct GetCustomer {
    pub endpoint: MerchantEndpoint,
}

/// Direct discount resolved by the merchant server.
#[derive(Debug, Clone, PartialEq)]
pub struct GetMerchantDiscount {
    pub endpoint: MerchantEndpoint,
    pub amount: Decimal,
    pub payer_email: String,
}

/// Create a payment through the merchant server.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateMerchantPayment {
    pub endpoint: MerchantEndpoint,
    pub transaction_id: String,
    pub body: Map<String, Value>,
}

/// Every gateway operation the checkout flow uses.
pub trait Gateway:
    Processor<GetPreference, Output = CheckoutPreference, Error = ApiException>
    + Processor<SearchPaymentMethods, Output = PaymentMethodSearch, Error = ApiException>
    + Processor<GetPaymentMethods, Output = Vec<PaymentMethod>, Error = ApiException>
    + Processor<GetDirectDiscount, Output = Discount, Error = ApiException>
    + Processor<GetCodeDiscount, Output = Discount, Error = ApiException>
    + Processor<CreatePayment, Output = Payment, Error = ApiException>
{
}

impl<T> Gateway for T where
    T: Processor<GetPreference, Output = CheckoutPreference, Error = ApiException>
        + Processor<SearchPaymentMethods, Output = PaymentMethodSearch, Error = ApiException>
        + Processor<GetPaymentMethods, Output = Vec<PaymentMethod>, Error = ApiException>
        + Processor<GetDirectDiscount, Output = Discount, Error = ApiException>
        + Processor<GetCodeDiscount, Output = Discount, Error = ApiException>
        + Processor<CreatePayment, Output = Payment, Error = ApiException>
{
}

/// Every merchant-hosted operation the checkout flow uses.
pub trait MerchantServer:
    Processor<GetCustomer, Output = Customer, Error = ApiException>
    + Processor<GetMerchantDiscount, Output = Discount, Error = ApiException>
    + Processor<CreateMerchantPayment, Output = Payment, Error = ApiException>
{
}

impl<T> MerchantServer for T where
    T: Processor<GetCustomer, Output = Customer, Error = ApiException>
        + Processor<GetMerchantDiscount, Output = Discount, Error = ApiException>
        + Processor<CreateMerchantPayment, Output = Payment, Error = ApiException>
{
}

/// Source of the entity types a payer can choose from.
pub trait EntityTypesSource:
    Processor<GetEntityTypes, Output = Vec<EntityType>, Error = ApiException>
{
}

impl<T> EntityTypesSource for T where
    T: Processor<GetEntityTypes, Output = Vec<EntityType>, Error = ApiException>
{
}
