//! Typed-data schemas for every message type the hub accepts.
//!
//! Every signed message uses the same outer `Message` struct. Its `payload`
//! field is typed with the message type's own name, whose fields are listed
//! under that name in the same schema map.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Name of the outer struct in every message schema.
pub const MESSAGE_TYPE_NAME: &str = "Message";

/// A single `(name, type)` entry of a struct schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl TypeField {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }
}

/// Struct name → ordered field list, in the JSON shape wallets expect.
pub type TypeSchema = BTreeMap<String, Vec<TypeField>>;

const VOTE_FIELDS: &[(&str, &str)] = &[
    ("proposal", "string"),
    ("choice", "uint32"),
    ("metadata", "string"),
];

const PROPOSAL_FIELDS: &[(&str, &str)] = &[
    ("name", "string"),
    ("body", "string"),
    ("choices", "string[]"),
    ("start", "uint64"),
    ("end", "uint64"),
    ("snapshot", "uint64"),
    ("type", "string"),
    ("metadata", "string"),
];

const SETTINGS_FIELDS: &[(&str, &str)] = &[("settings", "string")];

const DELETE_PROPOSAL_FIELDS: &[(&str, &str)] = &[("proposal", "string")];

/// The closed set of message types the hub accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    Vote,
    Proposal,
    Settings,
    DeleteProposal,
}

impl MessageType {
    pub const ALL: [MessageType; 4] = [
        MessageType::Vote,
        MessageType::Proposal,
        MessageType::Settings,
        MessageType::DeleteProposal,
    ];

    /// Wire name, also used as the payload struct name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Vote => "vote",
            MessageType::Proposal => "proposal",
            MessageType::Settings => "settings",
            MessageType::DeleteProposal => "delete-proposal",
        }
    }

    /// Ordered payload fields for this type.
    pub fn payload_fields(&self) -> Vec<TypeField> {
        let fields = match self {
            MessageType::Vote => VOTE_FIELDS,
            MessageType::Proposal => PROPOSAL_FIELDS,
            MessageType::Settings => SETTINGS_FIELDS,
            MessageType::DeleteProposal => DELETE_PROPOSAL_FIELDS,
        };
        fields
            .iter()
            .map(|(name, kind)| TypeField::new(*name, *kind))
            .collect()
    }

    /// Outer envelope fields, with `payload` typed as this message type.
    pub fn message_fields(&self) -> Vec<TypeField> {
        vec![
            TypeField::new("version", "string"),
            TypeField::new("space", "string"),
            TypeField::new("timestamp", "uint64"),
            TypeField::new("type", "string"),
            TypeField::new("payload", self.as_str()),
        ]
    }

    /// Full schema map: `Message` plus the payload struct.
    pub fn types(&self) -> TypeSchema {
        let mut types = TypeSchema::new();
        types.insert(MESSAGE_TYPE_NAME.to_string(), self.message_fields());
        types.insert(self.as_str().to_string(), self.payload_fields());
        types
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MessageType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnsupportedMessageType(s.to_string()))
    }
}

/// Look up the signing schema for a message type by its wire name.
///
/// Fails with [`Error::UnsupportedMessageType`] for anything outside the
/// supported set instead of returning a schema with no payload struct.
#[allow(clippy::result_large_err)]
pub fn get_types(type_name: &str) -> Result<TypeSchema> {
    type_name.parse::<MessageType>().map(|t| t.types())
}
