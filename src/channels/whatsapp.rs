//! WhatsApp Channel
//!
//! Outbound surface used by the agent's WhatsApp actions. The transport itself
//! (session pairing, the multi-device protocol) lives behind [`WhatsAppSender`];
//! this module only defines the payloads that cross that boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Result type for WhatsApp sends
pub type WhatsAppResult<T> = Result<T, WhatsAppError>;

/// WhatsApp errors
#[derive(Debug, thiserror::Error)]
pub enum WhatsAppError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Not linked: {0}")]
    NotLinked(String),
    #[error("Send failed: {0}")]
    SendFailed(String),
    #[error("Session error: {0}")]
    Session(String),
}

/// Per-call options forwarded with a reaction.
///
/// `from_me`, `participant` and `account_id` stay `None` unless the caller
/// supplied them; the transport decides its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionOptions {
    /// Emit verbose transport logging
    pub verbose: bool,
    /// Whether the target message was sent by this account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_me: Option<bool>,
    /// Group participant JID that authored the target message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant: Option<String>,
    /// Linked account to send from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

/// Poll payload handed to the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollInput {
    /// Poll question
    pub question: String,
    /// Selectable options, in display order
    pub options: Vec<String>,
}

/// Outcome of a successful poll send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResult {
    /// ID assigned to the sent poll message
    pub message_id: String,
    /// JID the poll was delivered to
    #[serde(alias = "toJid")]
    pub recipient_id: String,
}

/// Outbound WhatsApp operations.
#[async_trait]
pub trait WhatsAppSender: Send + Sync {
    /// React to a message. An empty `emoji` removes the existing reaction.
    async fn send_reaction(
        &self,
        chat_jid: &str,
        message_id: &str,
        emoji: &str,
        options: ReactionOptions,
    ) -> WhatsAppResult<()>;

    /// Send a poll to a chat
    async fn send_poll(&self, chat_jid: &str, poll: PollInput) -> WhatsAppResult<SendResult>;
}

/// Type-erased sender for sharing across tasks
pub type DynWhatsAppSender = Arc<dyn WhatsAppSender>;

/// Sender that logs what it would send and fabricates a message ID.
///
/// Used by the `wa-action` binary, which has no linked session.
#[derive(Debug, Clone, Default)]
pub struct DryRunSender;

#[async_trait]
impl WhatsAppSender for DryRunSender {
    async fn send_reaction(
        &self,
        chat_jid: &str,
        message_id: &str,
        emoji: &str,
        options: ReactionOptions,
    ) -> WhatsAppResult<()> {
        tracing::info!(
            chat_jid = chat_jid,
            message_id = message_id,
            emoji = emoji,
            from_me = ?options.from_me,
            participant = ?options.participant,
            account_id = ?options.account_id,
            "dry run: would send WhatsApp reaction"
        );
        Ok(())
    }

    async fn send_poll(&self, chat_jid: &str, poll: PollInput) -> WhatsAppResult<SendResult> {
        tracing::info!(
            chat_jid = chat_jid,
            question = %poll.question,
            options = poll.options.len(),
            "dry run: would send WhatsApp poll"
        );
        Ok(SendResult {
            message_id: format!("dry-run-{}", Uuid::new_v4()),
            recipient_id: chat_jid.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaction_options_skip_unset_fields() {
        let opts = ReactionOptions::default();
        let val = serde_json::to_value(&opts).unwrap();
        assert_eq!(val, serde_json::json!({"verbose": false}));
    }

    #[test]
    fn test_send_result_accepts_to_jid_alias() {
        let parsed: SendResult =
            serde_json::from_str(r#"{"messageId": "poll-1", "toJid": "jid-1"}"#).unwrap();
        assert_eq!(parsed.message_id, "poll-1");
        assert_eq!(parsed.recipient_id, "jid-1");
    }

    #[tokio::test]
    async fn test_dry_run_poll_targets_chat() {
        let sender = DryRunSender;
        let result = sender
            .send_poll(
                "123@s.whatsapp.net",
                PollInput {
                    question: "Lunch?".to_string(),
                    options: vec!["Yes".to_string(), "No".to_string()],
                },
            )
            .await
            .unwrap();
        assert_eq!(result.recipient_id, "123@s.whatsapp.net");
        assert!(result.message_id.starts_with("dry-run-"));
    }

    #[tokio::test]
    async fn test_dry_run_reaction_succeeds() {
        let sender = DryRunSender;
        sender
            .send_reaction("123@s.whatsapp.net", "msg1", "", ReactionOptions::default())
            .await
            .unwrap();
    }
}
