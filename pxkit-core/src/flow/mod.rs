//! Checkout step flow.
//!
//! - `CheckoutAccumulator`: selections carried across steps
//! - `StepFlowController`: decides the next step after every selection
//! - `assembler`: turns a satisfied accumulator into a payment request

pub mod accumulator;
pub mod assembler;
pub mod step_flow;

pub use accumulator::{CheckoutAccumulator, Step};
pub use assembler::{assemble, merchant_payment};
pub use step_flow::{
    FinishReason, FlowConfig, NO_ADDITIONAL_STEP, NextStep, PAYMENT_METHOD_NULL,
    PUBLIC_KEY_NOT_SET, SITE_NOT_SET, StepFlowController, decide_next_step,
};
