//! Wire types and HTTP clients for pxkit.
//!
//! The object and config modules are always available. The typed HTTP
//! clients live behind the `client` feature.

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod objects;
