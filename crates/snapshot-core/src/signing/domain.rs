//! EIP-712 signing domain for Snapshot messages.
//!
//! The hub verifies signatures against a domain made of a name and the
//! protocol version only; chain id and verifying contract are left out.

use std::borrow::Cow;

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::schema::{TypeField, TypeSchema};
use super::typed_data;
use crate::network::VERSION;
use crate::Result;

/// Struct name of the domain in EIP-712 encoding.
pub const DOMAIN_TYPE_NAME: &str = "EIP712Domain";

/// Domain every hub message is signed under.
pub static DOMAIN: Domain = Domain {
    name: Cow::Borrowed("Snapshot"),
    version: Cow::Borrowed(VERSION),
    chain_id: None,
    verifying_contract: None,
};

/// EIP-712 domain descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// Domain name.
    pub name: Cow<'static, str>,
    /// Domain version.
    pub version: Cow<'static, str>,
    /// Chain ID, omitted from the domain when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// Verifying contract, omitted from the domain when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifying_contract: Option<Address>,
}

impl Domain {
    /// Create a domain with just a name and version.
    pub fn custom(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            version: Cow::Owned(version.into()),
            chain_id: None,
            verifying_contract: None,
        }
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn with_verifying_contract(mut self, contract: Address) -> Self {
        self.verifying_contract = Some(contract);
        self
    }

    /// `EIP712Domain` fields for the members that are set, in canonical order.
    pub fn fields(&self) -> Vec<TypeField> {
        let mut fields = vec![
            TypeField::new("name", "string"),
            TypeField::new("version", "string"),
        ];
        if self.chain_id.is_some() {
            fields.push(TypeField::new("chainId", "uint256"));
        }
        if self.verifying_contract.is_some() {
            fields.push(TypeField::new("verifyingContract", "address"));
        }
        fields
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("name".to_string(), json!(self.name));
        map.insert("version".to_string(), json!(self.version));
        if let Some(chain_id) = self.chain_id {
            map.insert("chainId".to_string(), json!(chain_id));
        }
        if let Some(contract) = self.verifying_contract {
            map.insert("verifyingContract".to_string(), json!(contract.to_string()));
        }
        Value::Object(map)
    }

    /// Compute the EIP-712 domain separator hash.
    #[allow(clippy::result_large_err)]
    pub fn separator(&self) -> Result<B256> {
        let mut types = TypeSchema::new();
        types.insert(DOMAIN_TYPE_NAME.to_string(), self.fields());
        typed_data::hash_struct(DOMAIN_TYPE_NAME, &types, &self.to_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{b256, keccak256, address};

    #[test]
    fn test_snapshot_domain() {
        assert_eq!(DOMAIN.name, "Snapshot");
        assert_eq!(DOMAIN.version, VERSION);
        assert_eq!(DOMAIN.fields().len(), 2);
        assert_eq!(
            serde_json::to_value(&DOMAIN).unwrap(),
            json!({"name": "Snapshot", "version": VERSION})
        );
    }

    #[test]
    fn test_name_version_separator() {
        let type_hash = keccak256(b"EIP712Domain(string name,string version)");
        let mut encoded = type_hash.to_vec();
        encoded.extend_from_slice(keccak256(b"Snapshot").as_slice());
        encoded.extend_from_slice(keccak256(VERSION.as_bytes()).as_slice());

        assert_eq!(DOMAIN.separator().unwrap(), keccak256(&encoded));
    }

    #[test]
    fn test_full_domain_separator() {
        // Reference domain from the EIP-712 "Ether Mail" example.
        let domain = Domain::custom("Ether Mail", "1")
            .with_chain_id(1)
            .with_verifying_contract(address!("CcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"));

        assert_eq!(
            domain.separator().unwrap(),
            b256!("f2cee375fa42b42143804025fc449deafd50cc031ca257e0b194a650a912090f")
        );
    }

    #[test]
    fn test_separator_deterministic() {
        assert_eq!(DOMAIN.separator().unwrap(), DOMAIN.clone().separator().unwrap());
        assert_ne!(
            DOMAIN.separator().unwrap(),
            Domain::custom("Snapshot", "0.0.0").separator().unwrap()
        );
    }
}
