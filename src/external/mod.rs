//! Outbound integrations.

pub mod client;
pub mod factory;

pub use factory::{DinerInfo, FactoryClient, OrderVerifier};
