//! Signing capability injected into the hub client.

use async_trait::async_trait;

use super::domain::Domain;
use super::schema::TypeSchema;
use crate::types::MessageEnvelope;
use crate::Result;

/// Produces a typed-data signature over an envelope.
///
/// Implementations may be backed by a local key, a browser wallet bridge, a
/// remote signing service or a hardware device. Calls may wait on user
/// confirmation. Failures should be reported as [`crate::Error::Signing`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TypedDataSigner: Send + Sync {
    /// Sign `message` under `domain` using the struct definitions in `types`.
    ///
    /// Returns the signature as a `0x`-prefixed hex string.
    async fn sign_typed_data(
        &self,
        domain: &Domain,
        types: &TypeSchema,
        message: &MessageEnvelope,
    ) -> Result<String>;
}
