//! Snapshot Core Library
//!
//! Typed-data signing and hub client for Snapshot off-chain governance
//! messages: votes, proposals, proposal deletions and space settings.

pub mod api;
pub mod config;
pub mod error;
pub mod network;
pub mod signing;
pub mod types;

pub use api::HubClient;
pub use config::HubConfig;
pub use error::{Error, Result};
pub use network::{DEFAULT_HUB_URL, HUBS, VERSION};
pub use signing::{get_types, Domain, LocalWallet, MessageType, TypeSchema, TypedDataSigner, DOMAIN};
pub use types::{
    DeleteProposal, MessageEnvelope, Proposal, SignedSubmission, Vote, DEFAULT_PROPOSAL_TYPE,
};
