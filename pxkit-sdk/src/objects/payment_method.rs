//! Payment method descriptors and the selections made for them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment type ids as reported by the gateway.
pub mod payment_types {
    pub const CREDIT_CARD: &str = "credit_card";
    pub const DEBIT_CARD: &str = "debit_card";
    pub const PREPAID_CARD: &str = "prepaid_card";
    pub const TICKET: &str = "ticket";
    pub const ATM: &str = "atm";
    pub const BANK_TRANSFER: &str = "bank_transfer";
    pub const ACCOUNT_MONEY: &str = "account_money";
    pub const DIGITAL_CURRENCY: &str = "digital_currency";

    /// Whether a payment type id denotes a card.
    pub fn is_card(payment_type_id: &str) -> bool {
        matches!(payment_type_id, CREDIT_CARD | DEBIT_CARD | PREPAID_CARD)
    }
}

const ENTITY_TYPE_INFO: &str = "entity_type";

/// Static classification of a payment method.
///
/// Immutable once fetched from the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub payment_type_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub secure_thumbnail: Option<String>,
    /// Extra payer data the method needs (`entity_type`, identification, ...).
    #[serde(default)]
    pub additional_info_needed: Vec<String>,
    #[serde(default)]
    pub financial_institutions: Vec<FinancialInstitution>,
    #[serde(default)]
    pub min_allowed_amount: Option<Decimal>,
    #[serde(default)]
    pub max_allowed_amount: Option<Decimal>,
}

impl PaymentMethod {
    /// The payer must pick an entity type before paying.
    pub fn requires_entity_type(&self) -> bool {
        self.additional_info_needed
            .iter()
            .any(|info| info == ENTITY_TYPE_INFO)
    }

    /// The payer must pick a financial institution before paying.
    pub fn requires_financial_institution(&self) -> bool {
        !self.financial_institutions.is_empty()
    }

    pub fn is_card(&self) -> bool {
        payment_types::is_card(&self.payment_type_id)
    }

    /// Whether `amount` is inside the allowed range, when one is declared.
    pub fn is_amount_allowed(&self, amount: Decimal) -> bool {
        self.min_allowed_amount.is_none_or(|min| amount >= min)
            && self.max_allowed_amount.is_none_or(|max| amount <= max)
    }
}

/// The payer's bank, required by some payment types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FinancialInstitution {
    pub id: String,
    pub description: String,
}

/// Sub-classification of the payer (e.g. individual or association).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityType {
    pub id: String,
    pub name: String,
}

/// Card token created by the tokenization flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    #[serde(default)]
    pub last_four_digits: Option<String>,
}

/// Card issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// One installment option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayerCost {
    pub installments: u32,
    #[serde(default)]
    pub installment_amount: Option<Decimal>,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    #[serde(default)]
    pub recommended_message: Option<String>,
}
