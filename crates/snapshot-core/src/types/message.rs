//! Message envelope, signed submission and the per-action payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::network::VERSION;
use crate::signing::MessageType;
use crate::Result;

/// Voting system used when a proposal does not name one.
pub const DEFAULT_PROPOSAL_TYPE: &str = "single-choice";

/// Versioned wrapper that is signed and submitted for every action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub version: String,
    pub space: String,
    /// Whole seconds since the Unix epoch, as a decimal string.
    pub timestamp: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub payload: Value,
}

impl MessageEnvelope {
    /// Build an envelope stamped with the current time.
    pub fn new(space: impl Into<String>, message_type: MessageType, payload: Value) -> Self {
        Self::at(space, message_type, payload, Utc::now())
    }

    /// Build an envelope stamped with `now`.
    pub fn at(
        space: impl Into<String>,
        message_type: MessageType,
        payload: Value,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            version: VERSION.to_string(),
            space: space.into(),
            timestamp: timestamp_at(now),
            message_type,
            payload,
        }
    }

    /// JSON form sent as the submission's `msg`.
    #[allow(clippy::result_large_err)]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Seconds since the epoch with the fractional part dropped.
pub fn timestamp_at(now: DateTime<Utc>) -> String {
    now.timestamp().to_string()
}

/// Body posted to `/api/message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedSubmission {
    /// Account that produced the signature.
    pub address: String,
    /// JSON of the exact envelope that was signed.
    pub msg: String,
    /// Typed-data signature over `msg`'s envelope.
    pub sig: String,
}

impl SignedSubmission {
    /// Parse `msg` back into the envelope it carries.
    #[allow(clippy::result_large_err)]
    pub fn envelope(&self) -> Result<MessageEnvelope> {
        Ok(serde_json::from_str(&self.msg)?)
    }
}

fn empty_metadata() -> Value {
    Value::Object(Map::new())
}

fn default_proposal_type() -> String {
    DEFAULT_PROPOSAL_TYPE.to_string()
}

#[allow(clippy::result_large_err)]
fn encode_metadata(metadata: &Value) -> Result<String> {
    Ok(serde_json::to_string(metadata)?)
}

/// A vote on a proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    /// Proposal id.
    pub proposal: String,
    /// 1-based choice index.
    pub choice: u32,
    #[serde(default = "empty_metadata")]
    pub metadata: Value,
}

impl Vote {
    pub fn new(proposal: impl Into<String>, choice: u32) -> Self {
        Self {
            proposal: proposal.into(),
            choice,
            metadata: empty_metadata(),
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Signable payload, with `metadata` encoded as a JSON string.
    #[allow(clippy::result_large_err)]
    pub fn to_payload(&self) -> Result<VotePayload> {
        Ok(VotePayload {
            proposal: self.proposal.clone(),
            choice: self.choice,
            metadata: encode_metadata(&self.metadata)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotePayload {
    pub proposal: String,
    pub choice: u32,
    pub metadata: String,
}

/// A new proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub name: String,
    pub body: String,
    pub choices: Vec<String>,
    /// Voting start, unix seconds.
    pub start: u64,
    /// Voting end, unix seconds.
    pub end: u64,
    /// Block number the voting power snapshot is taken at.
    pub snapshot: u64,
    #[serde(rename = "type", default = "default_proposal_type")]
    pub proposal_type: String,
    #[serde(default = "empty_metadata")]
    pub metadata: Value,
}

impl Proposal {
    pub fn new(
        name: impl Into<String>,
        body: impl Into<String>,
        choices: Vec<String>,
        start: u64,
        end: u64,
        snapshot: u64,
    ) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            choices,
            start,
            end,
            snapshot,
            proposal_type: default_proposal_type(),
            metadata: empty_metadata(),
        }
    }

    pub fn with_type(mut self, proposal_type: impl Into<String>) -> Self {
        self.proposal_type = proposal_type.into();
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Signable payload, with `metadata` encoded as a JSON string.
    #[allow(clippy::result_large_err)]
    pub fn to_payload(&self) -> Result<ProposalPayload> {
        Ok(ProposalPayload {
            name: self.name.clone(),
            body: self.body.clone(),
            choices: self.choices.clone(),
            start: self.start,
            end: self.end,
            snapshot: self.snapshot,
            proposal_type: self.proposal_type.clone(),
            metadata: encode_metadata(&self.metadata)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalPayload {
    pub name: String,
    pub body: String,
    pub choices: Vec<String>,
    pub start: u64,
    pub end: u64,
    pub snapshot: u64,
    #[serde(rename = "type")]
    pub proposal_type: String,
    pub metadata: String,
}

/// Removal of an existing proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteProposal {
    pub proposal: String,
}

impl DeleteProposal {
    pub fn new(proposal: impl Into<String>) -> Self {
        Self {
            proposal: proposal.into(),
        }
    }
}

/// Space settings update. `settings` is the serialized settings document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsPayload {
    pub settings: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_timestamp_truncates() {
        let now = DateTime::from_timestamp(1_700_000_000, 999_000_000).unwrap();
        assert_eq!(timestamp_at(now), "1700000000");

        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(timestamp_at(now), "1700000000");
    }

    #[test]
    fn test_envelope_fields() {
        let now = DateTime::from_timestamp(1_700_000_000, 500_000_000).unwrap();
        let envelope = MessageEnvelope::at(
            "my-space",
            MessageType::DeleteProposal,
            json!({"proposal": "0x2"}),
            now,
        );

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "version": VERSION,
                "space": "my-space",
                "timestamp": "1700000000",
                "type": "delete-proposal",
                "payload": {"proposal": "0x2"}
            })
        );
    }

    #[test]
    fn test_envelope_json_round_trip() {
        let envelope = MessageEnvelope::new(
            "my-space",
            MessageType::Vote,
            serde_json::to_value(Vote::new("0x1", 2).to_payload().unwrap()).unwrap(),
        );
        let submission = SignedSubmission {
            address: "0xAbc".to_string(),
            msg: envelope.to_json().unwrap(),
            sig: "0xsig".to_string(),
        };
        assert_eq!(submission.envelope().unwrap(), envelope);
        assert!(envelope.timestamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_vote_payload_default_metadata() {
        let payload = Vote::new("0x1", 2).to_payload().unwrap();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"proposal": "0x1", "choice": 2, "metadata": "{}"})
        );
    }

    #[test]
    fn test_vote_metadata_round_trip() {
        let metadata = json!({"reason": "looks good", "app": {"name": "cli", "build": 7}});
        let payload = Vote::new("0x1", 1)
            .with_metadata(metadata.clone())
            .to_payload()
            .unwrap();
        let parsed: Value = serde_json::from_str(&payload.metadata).unwrap();
        assert_eq!(parsed, metadata);
    }

    #[test]
    fn test_metadata_keeps_key_order() {
        let metadata = json!({"reason": "support", "app": "cli", "build": 7});
        let payload = Vote::new("0x1", 1)
            .with_metadata(metadata)
            .to_payload()
            .unwrap();
        assert_eq!(payload.metadata, r#"{"reason":"support","app":"cli","build":7}"#);
    }

    #[test]
    fn test_proposal_defaults() {
        let proposal: Proposal = serde_json::from_value(json!({
            "name": "Fund the grants round",
            "body": "Details",
            "choices": ["For", "Against"],
            "start": 1700000000u64,
            "end": 1700600000u64,
            "snapshot": 18500000u64
        }))
        .unwrap();

        assert_eq!(proposal.proposal_type, DEFAULT_PROPOSAL_TYPE);
        assert_eq!(proposal.metadata, json!({}));

        let payload = serde_json::to_value(proposal.to_payload().unwrap()).unwrap();
        assert_eq!(payload["type"], "single-choice");
        assert_eq!(payload["metadata"], "{}");
        assert_eq!(payload["choices"], json!(["For", "Against"]));
        assert_eq!(payload["snapshot"], 18500000u64);
    }

    #[test]
    fn test_proposal_custom_type_and_metadata() {
        let metadata = json!({"network": "1", "strategies": [{"name": "erc20-balance-of"}]});
        let payload = Proposal::new("n", "b", vec!["a".into(), "b".into()], 1, 2, 3)
            .with_type("approval")
            .with_metadata(metadata.clone())
            .to_payload()
            .unwrap();
        assert_eq!(payload.proposal_type, "approval");
        assert_eq!(serde_json::from_str::<Value>(&payload.metadata).unwrap(), metadata);
    }
}
