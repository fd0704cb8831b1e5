#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod error;
pub mod flow;
pub mod presenters;
pub mod providers;
pub mod tracking;

pub use error::{CheckoutError, LocalInputError};
