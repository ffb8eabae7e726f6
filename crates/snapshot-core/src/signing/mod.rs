//! EIP-712 typed-data signing for hub messages.
//!
//! # Architecture
//!
//! ```text
//! HubClient::broadcast
//!       │
//!       ├── get_types(type) ──► TypeSchema
//!       │
//!       ▼
//! TypedDataSigner (LocalWallet, or any wallet bridge)
//!       │  signing_hash(DOMAIN, TypeSchema, MessageEnvelope)
//!       ▼
//! SignedSubmission { address, msg, sig } ──► hub /api/message
//! ```
//!
//! # Example
//!
//! ```ignore
//! use snapshot_core::signing::{get_types, LocalWallet, TypedDataSigner, DOMAIN};
//! use snapshot_core::types::MessageEnvelope;
//!
//! let wallet = LocalWallet::from_env()?;
//! let envelope = MessageEnvelope::new("my-space", MessageType::Vote, payload);
//! let sig = wallet
//!     .sign_typed_data(&DOMAIN, &get_types("vote")?, &envelope)
//!     .await?;
//! ```

pub mod domain;
pub mod schema;
pub mod signer;
pub mod typed_data;
pub mod wallet;

pub use domain::{Domain, DOMAIN, DOMAIN_TYPE_NAME};
pub use schema::{get_types, MessageType, TypeField, TypeSchema, MESSAGE_TYPE_NAME};
pub use signer::TypedDataSigner;
pub use typed_data::{encode_type, hash_struct, primary_type, signing_hash, type_hash};
pub use wallet::{LocalWallet, PRIVATE_KEY_ENV};

#[cfg(test)]
pub use signer::MockTypedDataSigner;
