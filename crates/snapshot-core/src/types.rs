//! Wire types exchanged with the hub.

pub mod message;

pub use message::*;
