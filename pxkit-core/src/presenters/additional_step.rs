//! Host screen that walks the payer through the additional steps.

use pxkit_sdk::objects::{
    CheckoutPreference, Discount, EntityType, FinancialInstitution, PaymentBody,
};
use tracing::debug;

use super::{ACTION_BACK_PRESSED, SCREEN_ADDITIONAL_STEP, ViewHandle};
use crate::error::CheckoutError;
use crate::flow::{CheckoutAccumulator, FinishReason, NextStep, StepFlowController};
use crate::tracking::Tracker;

pub trait AdditionalStepView: Send {
    fn on_valid_start(&mut self);
    fn on_invalid_start(&mut self, message: &str);
    fn start_entity_type_step(&mut self);
    fn start_financial_institutions_step(&mut self);
    fn finish_with_result(&mut self, reason: FinishReason);
}

pub struct AdditionalStepPresenter<V> {
    controller: StepFlowController,
    view: ViewHandle<V>,
    tracker: Option<Tracker>,
}

impl<V: AdditionalStepView> AdditionalStepPresenter<V> {
    pub fn new(controller: StepFlowController, view: ViewHandle<V>) -> Self {
        Self {
            controller,
            view,
            tracker: None,
        }
    }

    pub fn with_tracker(mut self, tracker: Tracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn controller(&self) -> &StepFlowController {
        &self.controller
    }

    /// Validate the flow and route to the first step.
    pub fn start(&self) {
        if let Err(e) = self.controller.validate() {
            self.view.with(|v| v.on_invalid_start(&e.message()));
            return;
        }
        if let Some(tracker) = &self.tracker {
            tracker.track_screen(SCREEN_ADDITIONAL_STEP);
        }
        self.view.with(|v| v.on_valid_start());
        self.route(self.controller.next_step());
    }

    pub fn on_entity_type_selected(&mut self, entity_type: EntityType) {
        let next = self.controller.on_entity_type_selected(entity_type);
        self.route(next);
    }

    pub fn on_financial_institution_selected(
        &mut self,
        financial_institution: FinancialInstitution,
    ) {
        let next = self
            .controller
            .on_financial_institution_selected(financial_institution);
        self.route(next);
    }

    pub fn apply_discount(&mut self, discount: Option<Discount>) {
        self.controller.apply_discount(discount);
    }

    /// The payer backed out; the flow ends with a cancel result.
    pub fn cancel(self) {
        if let Some(tracker) = &self.tracker {
            tracker.track_action(SCREEN_ADDITIONAL_STEP, ACTION_BACK_PRESSED);
        }
        let next = self.controller.cancel();
        route(&self.view, next);
    }

    pub fn into_accumulator(self) -> CheckoutAccumulator {
        self.controller.into_accumulator()
    }

    pub fn into_payment_body(
        self,
        preference: &CheckoutPreference,
    ) -> Result<PaymentBody, CheckoutError> {
        self.controller.into_payment_body(preference)
    }

    fn route(&self, next: NextStep) {
        route(&self.view, next);
    }
}

fn route<V: AdditionalStepView>(view: &ViewHandle<V>, next: NextStep) {
    debug!(next = ?next, "Routing additional step");
    view.with(|v| match next {
        NextStep::StartEntityType => v.start_entity_type_step(),
        NextStep::StartFinancialInstitutions => v.start_financial_institutions_step(),
        NextStep::Finish(reason) => v.finish_with_result(reason),
        NextStep::Invalid(message) => v.on_invalid_start(&message),
    });
}
