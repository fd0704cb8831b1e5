//! Payment creation request and response types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::preference::Payer;

/// Request body for creating a payment on the gateway.
///
/// Built once, right before submission, and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBody {
    pub transaction_id: String,
    pub pref_id: String,
    pub public_key: String,
    pub payment_method_id: String,
    pub binary_mode: bool,
    pub payer: Payer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_amount: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_details: Option<TransactionDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDetails {
    pub financial_institution: String,
}

/// Payment fields forwarded to a merchant-hosted create-payment endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantPayment {
    pub payment_method_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_issuer_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Approved,
    Pending,
    InProcess,
    Rejected,
    Refunded,
    Cancelled,
    InMediation,
    ChargedBack,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Approved => write!(f, "approved"),
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::InProcess => write!(f, "in_process"),
            PaymentStatus::Rejected => write!(f, "rejected"),
            PaymentStatus::Refunded => write!(f, "refunded"),
            PaymentStatus::Cancelled => write!(f, "cancelled"),
            PaymentStatus::InMediation => write!(f, "in_mediation"),
            PaymentStatus::ChargedBack => write!(f, "charged_back"),
        }
    }
}

/// A created payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub status: PaymentStatus,
    #[serde(default)]
    pub status_detail: Option<String>,
    #[serde(default)]
    pub payment_method_id: Option<String>,
    #[serde(default)]
    pub payment_type_id: Option<String>,
    #[serde(default)]
    pub transaction_amount: Option<Decimal>,
}
