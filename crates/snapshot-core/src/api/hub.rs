//! Snapshot hub API client.
//!
//! Builds message envelopes, has them signed by an injected
//! [`TypedDataSigner`], and posts the result to the hub.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::HubConfig;
use crate::network::DEFAULT_HUB_URL;
use crate::signing::{MessageType, TypedDataSigner, DOMAIN};
use crate::types::{
    DeleteProposal, MessageEnvelope, Proposal, SettingsPayload, SignedSubmission, Vote,
};
use crate::{Error, Result};

/// Snapshot hub API client.
///
/// Holds the hub base address, fixed at construction. Cloning is cheap and
/// clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HubClient {
    address: String,
    http_client: reqwest::Client,
}

impl Default for HubClient {
    fn default() -> Self {
        Self::new(None)
    }
}

impl HubClient {
    /// Create a client for `address`, or for the primary hub when `None`.
    pub fn new(address: Option<String>) -> Self {
        let address = address.unwrap_or_else(|| DEFAULT_HUB_URL.to_string());
        Self {
            address: address.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Create a client from configuration.
    #[allow(clippy::result_large_err)]
    pub fn from_config(config: &HubConfig) -> Result<Self> {
        let config = config.clone().validated()?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            address: config.hub_url,
            http_client: builder.build()?,
        })
    }

    /// Hub base address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Call `<address>/api/<command>`.
    ///
    /// With a body this is a JSON `POST`, otherwise a `GET`. Success responses
    /// are returned as parsed JSON. Error responses with a JSON body fail with
    /// [`Error::Hub`] carrying that body unchanged.
    pub async fn request(&self, command: &str, body: Option<&Value>) -> Result<Value> {
        let url = format!("{}/api/{}", self.address, command);

        let request = match body {
            Some(body) => {
                let body = serde_json::to_string(body)?;
                debug!(url = %url, payload = %body, "POST request");
                self.http_client
                    .post(&url)
                    .header(ACCEPT, "application/json")
                    .header(CONTENT_TYPE, "application/json")
                    .body(body)
            }
            None => {
                debug!(url = %url, "GET request");
                self.http_client.get(&url)
            }
        };

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&text)?);
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(body) => {
                warn!(status = status.as_u16(), url = %url, body = %body, "Hub rejected request");
                Err(Error::Hub {
                    status: status.as_u16(),
                    body,
                })
            }
            Err(_) => Err(Error::Api {
                message: format!("{} returned {} - {}", url, status, text),
                status: Some(status.as_u16()),
            }),
        }
    }

    /// Post an already-signed submission to `/api/message`.
    pub async fn submit_raw_message(&self, submission: &SignedSubmission) -> Result<Value> {
        let body = serde_json::to_value(submission)?;
        self.request("message", Some(&body)).await
    }

    /// Fetch the spaces the hub knows about.
    pub async fn list_spaces(&self) -> Result<Value> {
        self.request("spaces", None).await
    }

    /// Sign and submit a message of `message_type` carrying `payload`.
    ///
    /// `payload` must match the schema registered for `message_type`. Every
    /// failure (unsupported type, signing, transport, hub rejection) is logged
    /// and returned unchanged.
    pub async fn broadcast<S, P>(
        &self,
        signer: &S,
        account: &str,
        space: &str,
        message_type: &str,
        payload: &P,
    ) -> Result<Value>
    where
        S: TypedDataSigner + ?Sized,
        P: Serialize + ?Sized,
    {
        let result = self
            .sign_and_submit(signer, account, space, message_type, payload)
            .await;

        if let Err(ref e) = result {
            error!(
                error = %e,
                account = account,
                space = space,
                message_type = message_type,
                "Broadcast failed"
            );
        }

        result
    }

    async fn sign_and_submit<S, P>(
        &self,
        signer: &S,
        account: &str,
        space: &str,
        message_type: &str,
        payload: &P,
    ) -> Result<Value>
    where
        S: TypedDataSigner + ?Sized,
        P: Serialize + ?Sized,
    {
        let message_type: MessageType = message_type.parse()?;
        let envelope = MessageEnvelope::new(space, message_type, serde_json::to_value(payload)?);
        let types = message_type.types();

        debug!(
            account = account,
            space = space,
            message_type = %message_type,
            timestamp = %envelope.timestamp,
            "Requesting typed-data signature"
        );
        let sig = signer.sign_typed_data(&DOMAIN, &types, &envelope).await?;

        let submission = SignedSubmission {
            address: account.to_string(),
            msg: envelope.to_json()?,
            sig,
        };
        let receipt = self.submit_raw_message(&submission).await?;

        info!(
            account = account,
            space = space,
            message_type = %message_type,
            "Message accepted by hub"
        );
        Ok(receipt)
    }

    /// Cast a vote. `metadata` is sent as a JSON string.
    pub async fn vote<S>(&self, signer: &S, account: &str, space: &str, vote: &Vote) -> Result<Value>
    where
        S: TypedDataSigner + ?Sized,
    {
        let payload = vote.to_payload()?;
        self.broadcast(signer, account, space, MessageType::Vote.as_str(), &payload)
            .await
    }

    /// Create a proposal. `metadata` is sent as a JSON string.
    pub async fn create_proposal<S>(
        &self,
        signer: &S,
        account: &str,
        space: &str,
        proposal: &Proposal,
    ) -> Result<Value>
    where
        S: TypedDataSigner + ?Sized,
    {
        let payload = proposal.to_payload()?;
        self.broadcast(signer, account, space, MessageType::Proposal.as_str(), &payload)
            .await
    }

    /// Delete a proposal.
    pub async fn delete_proposal<S>(
        &self,
        signer: &S,
        account: &str,
        space: &str,
        delete: &DeleteProposal,
    ) -> Result<Value>
    where
        S: TypedDataSigner + ?Sized,
    {
        self.broadcast(
            signer,
            account,
            space,
            MessageType::DeleteProposal.as_str(),
            delete,
        )
        .await
    }

    /// Replace a space's settings with the serialized `settings` document.
    pub async fn update_settings<S>(
        &self,
        signer: &S,
        account: &str,
        space: &str,
        settings: impl Into<String>,
    ) -> Result<Value>
    where
        S: TypedDataSigner + ?Sized,
    {
        let payload = SettingsPayload {
            settings: settings.into(),
        };
        self.broadcast(signer, account, space, MessageType::Settings.as_str(), &payload)
            .await
    }
}
