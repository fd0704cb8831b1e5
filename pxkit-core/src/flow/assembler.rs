//! Payment request assembly.

use pxkit_sdk::objects::{
    CheckoutPreference, MerchantPayment, PaymentBody, PaymentMethod, TransactionDetails,
};
use rust_decimal::prelude::ToPrimitive;

use super::accumulator::CheckoutAccumulator;
use super::step_flow::PAYMENT_METHOD_NULL;
use crate::error::CheckoutError;

/// Build the gateway payment body from a fully satisfied accumulator.
///
/// Fails with [`CheckoutError::Validation`] if a step the payment method
/// requires has no selection.
pub fn assemble(
    preference: &CheckoutPreference,
    public_key: &str,
    accumulator: &CheckoutAccumulator,
) -> Result<PaymentBody, CheckoutError> {
    let pm = satisfied_payment_method(accumulator)?;

    let mut payer = preference.payer.clone();
    let customer_id = accumulator
        .customer_id
        .as_deref()
        .filter(|id| !id.is_empty());
    if let Some(customer_id) = customer_id.filter(|_| pm.is_card()) {
        payer.id = Some(customer_id.to_string());
    }
    if let Some(entity_type) = &accumulator.selected_entity_type {
        payer.entity_type = Some(entity_type.id.clone());
    }

    let discount = accumulator.discount.as_ref();

    Ok(PaymentBody {
        transaction_id: accumulator.transaction_id.clone(),
        pref_id: preference.id.clone(),
        public_key: public_key.to_string(),
        payment_method_id: pm.id.clone(),
        binary_mode: accumulator.binary_mode,
        payer,
        token_id: accumulator.token.as_ref().map(|t| t.id.clone()),
        installments: accumulator.payer_cost.as_ref().map(|pc| pc.installments),
        issuer_id: accumulator.issuer.as_ref().map(|i| i.id),
        campaign_id: discount.map(|d| d.id as i32),
        coupon_amount: discount.and_then(|d| d.coupon_amount.to_f32()),
        coupon_code: discount.and_then(|d| d.coupon_code.clone()),
        transaction_details: accumulator
            .selected_financial_institution
            .as_ref()
            .map(|fi| TransactionDetails {
                financial_institution: fi.id.clone(),
            }),
    })
}

/// Payment fields forwarded to a merchant-hosted create-payment endpoint.
pub fn merchant_payment(accumulator: &CheckoutAccumulator) -> Result<MerchantPayment, CheckoutError> {
    let pm = satisfied_payment_method(accumulator)?;
    let discount = accumulator.discount.as_ref();

    Ok(MerchantPayment {
        payment_method_id: pm.id.clone(),
        card_token: accumulator.token.as_ref().map(|t| t.id.clone()),
        card_issuer_id: accumulator.issuer.as_ref().map(|i| i.id),
        installments: accumulator.payer_cost.as_ref().map(|pc| pc.installments),
        campaign_id: discount.map(|d| d.id),
        coupon_code: discount.and_then(|d| d.coupon_code.clone()),
    })
}

fn satisfied_payment_method(
    accumulator: &CheckoutAccumulator,
) -> Result<&PaymentMethod, CheckoutError> {
    let pm = accumulator
        .payment_method
        .as_ref()
        .ok_or_else(|| CheckoutError::validation(PAYMENT_METHOD_NULL))?;
    if let Some(step) = accumulator.unsatisfied_step() {
        return Err(CheckoutError::Validation(format!(
            "{step} step not completed for payment method {}",
            pm.id
        )));
    }
    Ok(pm)
}
