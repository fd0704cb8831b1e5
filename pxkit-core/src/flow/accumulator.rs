//! State carried across the steps of one checkout.

use pxkit_sdk::objects::{
    Discount, EntityType, FinancialInstitution, Issuer, PayerCost, PaymentMethod, Token,
};
use uuid::Uuid;

/// An additional step a payment method may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    EntityType,
    FinancialInstitution,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::EntityType => write!(f, "entity type"),
            Step::FinancialInstitution => write!(f, "financial institution"),
        }
    }
}

/// Selections accumulated during one checkout.
///
/// Owned by a single [`StepFlowController`](super::StepFlowController) and
/// dropped or handed off when the flow terminates.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutAccumulator {
    pub payment_method: Option<PaymentMethod>,
    pub selected_entity_type: Option<EntityType>,
    pub selected_financial_institution: Option<FinancialInstitution>,
    pub discount: Option<Discount>,
    pub customer_id: Option<String>,
    pub transaction_id: String,
    pub binary_mode: bool,
    pub token: Option<Token>,
    pub payer_cost: Option<PayerCost>,
    pub issuer: Option<Issuer>,
}

impl CheckoutAccumulator {
    /// Start a checkout for `payment_method` with a fresh transaction id.
    pub fn new(payment_method: Option<PaymentMethod>) -> Self {
        Self {
            payment_method,
            selected_entity_type: None,
            selected_financial_institution: None,
            discount: None,
            customer_id: None,
            transaction_id: Uuid::now_v7().to_string(),
            binary_mode: false,
            token: None,
            payer_cost: None,
            issuer: None,
        }
    }

    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = transaction_id.into();
        self
    }

    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn with_binary_mode(mut self, binary_mode: bool) -> Self {
        self.binary_mode = binary_mode;
        self
    }

    pub fn with_discount(mut self, discount: Discount) -> Self {
        self.discount = Some(discount);
        self
    }

    pub fn with_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_payer_cost(mut self, payer_cost: PayerCost) -> Self {
        self.payer_cost = Some(payer_cost);
        self
    }

    pub fn with_issuer(mut self, issuer: Issuer) -> Self {
        self.issuer = Some(issuer);
        self
    }

    /// First step the payment method requires that has no selection yet.
    pub fn unsatisfied_step(&self) -> Option<Step> {
        let pm = self.payment_method.as_ref()?;
        if pm.requires_entity_type() && self.selected_entity_type.is_none() {
            return Some(Step::EntityType);
        }
        if pm.requires_financial_institution() && self.selected_financial_institution.is_none() {
            return Some(Step::FinancialInstitution);
        }
        None
    }
}
