//! Terminal stand-ins for the checkout screens.
//!
//! Each view records what the presenter asked for so the command can act on
//! it after the presenter call returns.

use pxkit_core::CheckoutError;
use pxkit_core::flow::FinishReason;
use pxkit_core::presenters::{
    AdditionalStepView, DiscountsView, EntityTypesView, FinancialInstitutionsView,
};
use pxkit_sdk::objects::{Discount, EntityType, FinancialInstitution};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepPrompt {
    EntityType,
    FinancialInstitution,
    Finished(FinishReason),
    Invalid(String),
}

#[derive(Debug, Default)]
pub struct StepView {
    pub prompt: Option<StepPrompt>,
}

impl AdditionalStepView for StepView {
    fn on_valid_start(&mut self) {
        tracing::debug!("Additional step flow started");
    }

    fn on_invalid_start(&mut self, message: &str) {
        self.prompt = Some(StepPrompt::Invalid(message.to_string()));
    }

    fn start_entity_type_step(&mut self) {
        self.prompt = Some(StepPrompt::EntityType);
    }

    fn start_financial_institutions_step(&mut self) {
        self.prompt = Some(StepPrompt::FinancialInstitution);
    }

    fn finish_with_result(&mut self, reason: FinishReason) {
        self.prompt = Some(StepPrompt::Finished(reason));
    }
}

/// Options offered by a selection screen and what came of it.
#[derive(Debug)]
pub struct SelectionView<T> {
    pub options: Vec<T>,
    pub chosen: Option<T>,
    pub error: Option<String>,
    pub cancelled: bool,
}

impl<T> Default for SelectionView<T> {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            chosen: None,
            error: None,
            cancelled: false,
        }
    }
}

impl EntityTypesView for SelectionView<EntityType> {
    fn on_valid_start(&mut self) {}

    fn on_invalid_start(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn initialize_entity_types(&mut self, entity_types: &[EntityType]) {
        self.options = entity_types.to_vec();
    }

    fn show_loading_view(&mut self) {
        tracing::info!("Loading entity types...");
    }

    fn stop_loading_view(&mut self) {}

    fn show_api_exception_error(&mut self, error: &CheckoutError) {
        self.error = Some(error.message());
    }

    fn start_error_view(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn finish_with_result(&mut self, entity_type: &EntityType) {
        self.chosen = Some(entity_type.clone());
    }

    fn finish_with_cancel_result(&mut self) {
        self.cancelled = true;
    }
}

impl FinancialInstitutionsView for SelectionView<FinancialInstitution> {
    fn on_valid_start(&mut self) {}

    fn on_invalid_start(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn initialize_financial_institutions(&mut self, institutions: &[FinancialInstitution]) {
        self.options = institutions.to_vec();
    }

    fn show_loading_view(&mut self) {
        tracing::info!("Loading financial institutions...");
    }

    fn stop_loading_view(&mut self) {}

    fn show_api_exception_error(&mut self, error: &CheckoutError) {
        self.error = Some(error.message());
    }

    fn start_error_view(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn finish_with_result(&mut self, institution: &FinancialInstitution) {
        self.chosen = Some(institution.clone());
    }

    fn finish_with_cancel_result(&mut self) {
        self.cancelled = true;
    }
}

#[derive(Debug, Default)]
pub struct DiscountView {
    pub code_requested: bool,
    pub code_error: Option<String>,
    pub summary: Option<Decimal>,
    pub result: Option<Discount>,
}

impl DiscountsView for DiscountView {
    fn draw_summary(&mut self, discount: &Discount, amount_with_discount: Decimal) {
        tracing::info!(
            discount_id = discount.id,
            coupon_amount = %discount.coupon_amount,
            %amount_with_discount,
            "Discount applied"
        );
        self.summary = Some(amount_with_discount);
    }

    fn request_discount_code(&mut self) {
        self.code_requested = true;
    }

    fn show_code_input_error(&mut self, message: &str) {
        self.code_error = Some(message.to_string());
    }

    fn show_empty_discount_code_error(&mut self) {
        self.code_error = Some("discount code is empty".to_string());
    }

    fn clear_error_view(&mut self) {
        self.code_error = None;
    }

    fn show_loading_view(&mut self) {}

    fn stop_loading_view(&mut self) {}

    fn finish_with_result(&mut self, discount: Option<&Discount>) {
        self.result = discount.cloned();
    }

    fn finish_with_cancel_result(&mut self) {
        self.result = None;
    }
}
