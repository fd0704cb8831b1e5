//! Checkout error taxonomy.

use pxkit_sdk::objects::ApiException;
use thiserror::Error;

/// Errors surfaced by the checkout core.
#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    /// Required configuration or selection is missing. Fatal to the flow.
    #[error("validation error: {0}")]
    Validation(String),

    /// Gateway or merchant server failure. The payer may retry.
    #[error("api error: {0}")]
    Api(#[from] ApiException),

    /// Payer input rejected before any request was made.
    #[error(transparent)]
    LocalInput(#[from] LocalInputError),
}

/// Input the payer must correct locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocalInputError {
    #[error("discount code is empty")]
    EmptyCode,
}

impl CheckoutError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the payer can retry without restarting the checkout.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CheckoutError::Validation(_) => false,
            CheckoutError::Api(e) => e.is_recoverable(),
            CheckoutError::LocalInput(_) => true,
        }
    }

    /// Message suitable for an error screen, without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            CheckoutError::Validation(message) => message.clone(),
            CheckoutError::Api(e) => e.message.clone(),
            CheckoutError::LocalInput(e) => e.to_string(),
        }
    }

    pub fn api_exception(&self) -> Option<&ApiException> {
        match self {
            CheckoutError::Api(e) => Some(e),
            _ => None,
        }
    }
}
