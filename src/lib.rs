//! snapshot-hub: signed off-chain governance messages for Snapshot hubs.
//!
//! The root crate re-exports the library for integration tests and benchmarks.
//! Use `snapshot-core` directly for the individual modules:
//!
//! - `signing`: EIP-712 domain, message schemas, signer capability, local wallet
//! - `types`: message envelope, signed submission, vote/proposal payloads
//! - `api`: hub client (submit, list spaces, vote, propose, delete, settings)
//! - `config`: hub address and timeout configuration

pub use snapshot_core as core;
pub use snapshot_core::*;
