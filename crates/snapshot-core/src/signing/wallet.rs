//! Private-key wallet for signing hub messages locally.

use std::str::FromStr;

use alloy_primitives::{Address, B256};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use tracing::debug;

use super::domain::Domain;
use super::schema::TypeSchema;
use super::signer::TypedDataSigner;
use super::typed_data;
use crate::types::MessageEnvelope;
use crate::{Error, Result};

/// Environment variable read by [`LocalWallet::from_env`].
pub const PRIVATE_KEY_ENV: &str = "SNAPSHOT_PRIVATE_KEY";

/// A wallet holding a secp256k1 private key.
#[derive(Clone)]
pub struct LocalWallet {
    signer: PrivateKeySigner,
    address: Address,
}

impl LocalWallet {
    /// Load wallet from the `SNAPSHOT_PRIVATE_KEY` environment variable.
    ///
    /// A `.env` file is loaded first if present.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let private_key = std::env::var(PRIVATE_KEY_ENV).map_err(|_| Error::Config {
            message: format!("{} environment variable not set", PRIVATE_KEY_ENV),
        })?;

        Self::from_private_key(&private_key)
    }

    /// Create a wallet from a hex-encoded private key.
    ///
    /// # Arguments
    ///
    /// * `key` - A 64-character hex string, optionally prefixed with "0x"
    #[allow(clippy::result_large_err)]
    pub fn from_private_key(key: &str) -> Result<Self> {
        let key_clean = key.trim().trim_start_matches("0x");

        let signer = PrivateKeySigner::from_str(key_clean).map_err(|_| Error::Signing {
            message: "Invalid private key format - expected 64 hex characters".to_string(),
        })?;
        let address = signer.address();

        Ok(Self { signer, address })
    }

    /// Get the wallet's Ethereum address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get the wallet address as a checksummed hex string.
    pub fn address_string(&self) -> String {
        self.address.to_checksum(None)
    }

    /// Sign a precomputed 32-byte digest.
    pub async fn sign_hash_hex(&self, digest: &B256) -> Result<String> {
        let signature = self
            .signer
            .sign_hash(digest)
            .await
            .map_err(|e| Error::Signing {
                message: format!("Failed to sign digest: {}", e),
            })?;

        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }
}

#[async_trait]
impl TypedDataSigner for LocalWallet {
    async fn sign_typed_data(
        &self,
        domain: &Domain,
        types: &TypeSchema,
        message: &MessageEnvelope,
    ) -> Result<String> {
        let value = serde_json::to_value(message)?;
        let digest = typed_data::signing_hash(domain, types, &value)?;
        debug!(address = %self.address, digest = %digest, "Signing typed data");
        self.sign_hash_hex(&digest).await
    }
}

impl std::fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWallet")
            .field("address", &self.address_string())
            .finish()
    }
}
