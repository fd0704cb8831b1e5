//! Merchant-hosted customer data.

use serde::{Deserialize, Serialize};

use super::payment_method::{Issuer, PaymentMethod};

/// A customer as returned by the merchant server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// A card saved for a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(default)]
    pub last_four_digits: Option<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub issuer: Option<Issuer>,
}
