//! Additional-step flow controller.
//!
//! The controller never follows a fixed sequence: after every selection the
//! same decision function runs again over the updated accumulator.

use pxkit_sdk::objects::{
    CheckoutPreference, Discount, EntityType, FinancialInstitution, PaymentBody, PaymentMethod,
    Site,
};
use tracing::debug;

use super::accumulator::CheckoutAccumulator;
use super::assembler;
use crate::error::CheckoutError;

pub const PAYMENT_METHOD_NULL: &str = "payment method is null";
pub const PUBLIC_KEY_NOT_SET: &str = "public key not set";
pub const SITE_NOT_SET: &str = "site not set";
pub const NO_ADDITIONAL_STEP: &str = "No additional step found";

/// Configuration the flow needs before any step can start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowConfig {
    pub public_key: Option<String>,
    pub site: Option<Site>,
}

impl FlowConfig {
    pub fn new(public_key: impl Into<String>, site: Site) -> Self {
        Self {
            public_key: Some(public_key.into()),
            site: Some(site),
        }
    }

    fn public_key(&self) -> Option<&str> {
        self.public_key.as_deref().filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Success,
    Cancelled,
}

/// What the host should show next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    StartEntityType,
    StartFinancialInstitutions,
    Finish(FinishReason),
    /// The flow cannot run; the host terminates it with a cancel result.
    Invalid(String),
}

/// Decide the next step for `descriptor` given the selections so far.
///
/// First match wins. `Invalid(NO_ADDITIONAL_STEP)` is reported when the
/// descriptor never required any step.
pub fn decide_next_step(
    config: &FlowConfig,
    descriptor: Option<&PaymentMethod>,
    accumulator: &CheckoutAccumulator,
) -> NextStep {
    let Some(pm) = descriptor else {
        return NextStep::Invalid(PAYMENT_METHOD_NULL.to_string());
    };
    if config.public_key().is_none() {
        return NextStep::Invalid(PUBLIC_KEY_NOT_SET.to_string());
    }
    if config.site.is_none() {
        return NextStep::Invalid(SITE_NOT_SET.to_string());
    }

    let needs_entity_type = pm.requires_entity_type();
    let needs_financial_institution = pm.requires_financial_institution();

    if needs_entity_type && accumulator.selected_entity_type.is_none() {
        NextStep::StartEntityType
    } else if needs_financial_institution && accumulator.selected_financial_institution.is_none()
    {
        NextStep::StartFinancialInstitutions
    } else if !needs_entity_type && !needs_financial_institution {
        NextStep::Invalid(NO_ADDITIONAL_STEP.to_string())
    } else {
        NextStep::Finish(FinishReason::Success)
    }
}

/// Owns the accumulator of one checkout and re-evaluates the flow after
/// every selection.
#[derive(Debug, Clone)]
pub struct StepFlowController {
    config: FlowConfig,
    accumulator: CheckoutAccumulator,
}

impl StepFlowController {
    pub fn new(config: FlowConfig, accumulator: CheckoutAccumulator) -> Self {
        Self {
            config,
            accumulator,
        }
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn accumulator(&self) -> &CheckoutAccumulator {
        &self.accumulator
    }

    /// Check that the flow can start at all.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.accumulator.payment_method.is_none() {
            return Err(CheckoutError::validation(PAYMENT_METHOD_NULL));
        }
        if self.config.public_key().is_none() {
            return Err(CheckoutError::validation(PUBLIC_KEY_NOT_SET));
        }
        if self.config.site.is_none() {
            return Err(CheckoutError::validation(SITE_NOT_SET));
        }
        Ok(())
    }

    pub fn next_step(&self) -> NextStep {
        decide_next_step(
            &self.config,
            self.accumulator.payment_method.as_ref(),
            &self.accumulator,
        )
    }

    pub fn on_entity_type_selected(&mut self, entity_type: EntityType) -> NextStep {
        debug!(entity_type = %entity_type.id, "Entity type selected");
        self.accumulator.selected_entity_type = Some(entity_type);
        self.next_step()
    }

    pub fn on_financial_institution_selected(
        &mut self,
        financial_institution: FinancialInstitution,
    ) -> NextStep {
        debug!(
            financial_institution = %financial_institution.id,
            "Financial institution selected"
        );
        self.accumulator.selected_financial_institution = Some(financial_institution);
        self.next_step()
    }

    /// Set or clear the discount. Does not affect the step decision.
    pub fn apply_discount(&mut self, discount: Option<Discount>) {
        self.accumulator.discount = discount;
    }

    /// The payer abandoned the flow.
    pub fn cancel(self) -> NextStep {
        debug!(transaction_id = %self.accumulator.transaction_id, "Checkout flow cancelled");
        NextStep::Finish(FinishReason::Cancelled)
    }

    pub fn into_accumulator(self) -> CheckoutAccumulator {
        self.accumulator
    }

    /// Consume the flow and build the payment request body.
    pub fn into_payment_body(
        self,
        preference: &CheckoutPreference,
    ) -> Result<PaymentBody, CheckoutError> {
        let public_key = self
            .config
            .public_key()
            .ok_or_else(|| CheckoutError::validation(PUBLIC_KEY_NOT_SET))?;
        assembler::assemble(preference, public_key, &self.accumulator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(entity_type: bool, institutions: &[&str]) -> PaymentMethod {
        PaymentMethod {
            id: "pse".to_string(),
            name: "PSE".to_string(),
            payment_type_id: "bank_transfer".to_string(),
            status: None,
            secure_thumbnail: None,
            additional_info_needed: if entity_type {
                vec!["entity_type".to_string()]
            } else {
                vec![]
            },
            financial_institutions: institutions
                .iter()
                .map(|id| FinancialInstitution {
                    id: id.to_string(),
                    description: format!("Bank {id}"),
                })
                .collect(),
            min_allowed_amount: None,
            max_allowed_amount: None,
        }
    }

    fn config() -> FlowConfig {
        FlowConfig::new("APP_USR-public", Site::Colombia)
    }

    fn entity_type() -> EntityType {
        EntityType {
            id: "individual".to_string(),
            name: "Individual".to_string(),
        }
    }

    fn institution(id: &str) -> FinancialInstitution {
        FinancialInstitution {
            id: id.to_string(),
            description: format!("Bank {id}"),
        }
    }

    #[test]
    fn test_configuration_checks_come_first() {
        let pm = descriptor(true, &["1"]);
        let acc = CheckoutAccumulator::new(Some(pm.clone()));

        assert_eq!(
            decide_next_step(&config(), None, &acc),
            NextStep::Invalid(PAYMENT_METHOD_NULL.to_string())
        );

        let no_key = FlowConfig {
            public_key: None,
            site: Some(Site::Colombia),
        };
        assert_eq!(
            decide_next_step(&no_key, Some(&pm), &acc),
            NextStep::Invalid(PUBLIC_KEY_NOT_SET.to_string())
        );

        let empty_key = FlowConfig {
            public_key: Some(String::new()),
            site: None,
        };
        assert_eq!(
            decide_next_step(&empty_key, Some(&pm), &acc),
            NextStep::Invalid(PUBLIC_KEY_NOT_SET.to_string())
        );

        let no_site = FlowConfig {
            public_key: Some("key".to_string()),
            site: None,
        };
        assert_eq!(
            decide_next_step(&no_site, Some(&pm), &acc),
            NextStep::Invalid(SITE_NOT_SET.to_string())
        );
    }

    #[test]
    fn test_no_required_step_is_invalid() {
        let pm = descriptor(false, &[]);
        let acc = CheckoutAccumulator::new(Some(pm.clone()));
        assert_eq!(
            decide_next_step(&config(), Some(&pm), &acc),
            NextStep::Invalid(NO_ADDITIONAL_STEP.to_string())
        );
    }

    #[test]
    fn test_financial_institution_only() {
        let pm = descriptor(false, &["1"]);
        let mut flow = StepFlowController::new(config(), CheckoutAccumulator::new(Some(pm)));
        assert_eq!(flow.next_step(), NextStep::StartFinancialInstitutions);
        assert_eq!(
            flow.on_financial_institution_selected(institution("1")),
            NextStep::Finish(FinishReason::Success)
        );
    }

    #[test]
    fn test_entity_type_then_financial_institution() {
        let pm = descriptor(true, &["1", "2"]);
        let mut flow = StepFlowController::new(config(), CheckoutAccumulator::new(Some(pm)));
        assert_eq!(flow.next_step(), NextStep::StartEntityType);
        // Still the same step until an entity type is actually selected.
        assert_eq!(flow.next_step(), NextStep::StartEntityType);
        assert_eq!(
            flow.on_entity_type_selected(entity_type()),
            NextStep::StartFinancialInstitutions
        );
        assert_eq!(
            flow.on_financial_institution_selected(institution("2")),
            NextStep::Finish(FinishReason::Success)
        );
    }

    #[test]
    fn test_entity_type_only_finishes_after_selection() {
        let pm = descriptor(true, &[]);
        let mut flow = StepFlowController::new(config(), CheckoutAccumulator::new(Some(pm)));
        assert_eq!(flow.next_step(), NextStep::StartEntityType);
        assert_eq!(
            flow.on_entity_type_selected(entity_type()),
            NextStep::Finish(FinishReason::Success)
        );
    }

    #[test]
    fn test_selection_order_does_not_matter() {
        let pm = descriptor(true, &["1"]);
        let mut flow = StepFlowController::new(config(), CheckoutAccumulator::new(Some(pm)));
        assert_eq!(
            flow.on_financial_institution_selected(institution("1")),
            NextStep::StartEntityType
        );
        assert_eq!(
            flow.on_entity_type_selected(entity_type()),
            NextStep::Finish(FinishReason::Success)
        );
    }

    #[test]
    fn test_validate_and_cancel() {
        let flow = StepFlowController::new(FlowConfig::default(), CheckoutAccumulator::new(None));
        assert!(matches!(flow.validate(), Err(CheckoutError::Validation(m)) if m == PAYMENT_METHOD_NULL));
        assert_eq!(flow.cancel(), NextStep::Finish(FinishReason::Cancelled));
    }
}
