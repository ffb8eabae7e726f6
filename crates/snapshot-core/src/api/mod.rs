//! API clients for external services.

pub mod hub;

pub use hub::HubClient;
