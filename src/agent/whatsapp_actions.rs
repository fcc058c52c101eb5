//! WhatsApp agent actions.
//!
//! The agent's `whatsapp` tool supports two actions: reacting to a message and
//! sending a poll. Each call is validated, checked against the
//! `channels.whatsapp.actions` toggles, then forwarded once to a
//! [`WhatsAppSender`]. Sender failures are returned as-is.

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::channels::whatsapp::{
    PollInput, ReactionOptions, SendResult, WhatsAppError, WhatsAppSender,
};
use crate::config::{Config, WhatsAppActionKind};

/// Tool name exposed to the agent
pub const WHATSAPP_TOOL_NAME: &str = "whatsapp";

/// Errors returned by WhatsApp action dispatch
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    FeatureDisabled(String),

    #[error("Unknown WhatsApp action: {0}")]
    UnknownAction(String),

    #[error(transparent)]
    Send(#[from] WhatsAppError),
}

impl ActionError {
    fn disabled(kind: WhatsAppActionKind) -> Self {
        Self::FeatureDisabled(kind.disabled_reason().to_string())
    }
}

/// A parsed WhatsApp action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhatsAppActionRequest {
    React(ReactRequest),
    Poll(PollRequest),
}

impl WhatsAppActionRequest {
    /// Action tag as it appears in tool parameters
    pub fn action_name(&self) -> &'static str {
        match self {
            Self::React(_) => "react",
            Self::Poll(_) => "poll",
        }
    }

    /// Parse tool parameters of the form `{"action": "react" | "poll", ...}`.
    ///
    /// The tag is checked before any other field, so an unknown action is
    /// reported as such even when the rest of the object is malformed.
    pub fn from_params(params: &Value) -> Result<Self, ActionError> {
        let action = require_str(params, "action")?;
        match action.as_str() {
            "react" => Ok(Self::React(ReactRequest {
                chat_jid: require_chat_jid(params)?,
                message_id: require_str(params, "messageId")?,
                emoji: optional_str(params, "emoji")?,
                remove: optional_bool(params, "remove")?,
                from_me: optional_bool(params, "fromMe")?,
                participant: optional_str(params, "participant")?,
                account_id: optional_str(params, "accountId")?,
            })),
            "poll" => Ok(Self::Poll(PollRequest {
                chat_jid: require_chat_jid(params)?,
                question: require_str(params, "question")?,
                options: require_str_array(params, "options")?,
            })),
            other => Err(ActionError::UnknownAction(other.to_string())),
        }
    }
}

/// React to (or un-react from) a message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactRequest {
    pub chat_jid: String,
    pub message_id: String,
    pub emoji: Option<String>,
    pub remove: Option<bool>,
    pub from_me: Option<bool>,
    pub participant: Option<String>,
    pub account_id: Option<String>,
}

impl ReactRequest {
    /// Emoji to send. Empty means "remove my reaction", which is what both an
    /// explicit `remove` and a missing or empty emoji ask for.
    pub fn effective_emoji(&self) -> &str {
        if self.remove == Some(true) {
            return "";
        }
        self.emoji.as_deref().unwrap_or("")
    }

    fn validate(&self) -> Result<(), ActionError> {
        non_blank(&self.chat_jid, "chatJid")?;
        non_blank(&self.message_id, "messageId")
    }

    fn options(&self) -> ReactionOptions {
        ReactionOptions {
            verbose: false,
            from_me: self.from_me,
            participant: self.participant.clone(),
            account_id: self.account_id.clone(),
        }
    }
}

/// Send a poll to a chat
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollRequest {
    pub chat_jid: String,
    pub question: String,
    pub options: Vec<String>,
}

impl PollRequest {
    fn validate(&self) -> Result<(), ActionError> {
        non_blank(&self.chat_jid, "chatJid")?;
        non_blank(&self.question, "question")?;
        if self.options.is_empty() {
            return Err(ActionError::Validation(
                "options required: at least one poll option".to_string(),
            ));
        }
        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err(ActionError::Validation(
                "options must be non-empty strings".to_string(),
            ));
        }
        Ok(())
    }
}

/// What a successful action produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Reaction sent; an empty emoji means the reaction was removed
    Reacted { emoji: String },
    /// Poll sent; the sender's result, untouched
    PollSent(SendResult),
}

impl ActionOutcome {
    /// Tool result payload returned to the agent
    pub fn to_json(&self) -> Value {
        match self {
            Self::Reacted { emoji } if emoji.is_empty() => json!({"ok": true, "removed": true}),
            Self::Reacted { emoji } => json!({"ok": true, "added": emoji}),
            Self::PollSent(result) => json!({
                "ok": true,
                "messageId": result.message_id,
                "recipientId": result.recipient_id
            }),
        }
    }
}

/// Validate, gate and forward a single action.
pub async fn dispatch_whatsapp_action(
    request: WhatsAppActionRequest,
    config: &Config,
    sender: &dyn WhatsAppSender,
) -> Result<ActionOutcome, ActionError> {
    let gate = config.whatsapp_action_gate();
    match request {
        WhatsAppActionRequest::React(req) => {
            req.validate()?;
            if !gate.is_enabled(WhatsAppActionKind::Reactions) {
                return Err(ActionError::disabled(WhatsAppActionKind::Reactions));
            }
            let emoji = req.effective_emoji().to_string();
            debug!(
                chat_jid = %req.chat_jid,
                message_id = %req.message_id,
                removing = emoji.is_empty(),
                "forwarding WhatsApp reaction"
            );
            sender
                .send_reaction(&req.chat_jid, &req.message_id, &emoji, req.options())
                .await?;
            Ok(ActionOutcome::Reacted { emoji })
        }
        WhatsAppActionRequest::Poll(req) => {
            req.validate()?;
            if !gate.is_enabled(WhatsAppActionKind::Polls) {
                return Err(ActionError::disabled(WhatsAppActionKind::Polls));
            }
            debug!(
                chat_jid = %req.chat_jid,
                options = req.options.len(),
                "forwarding WhatsApp poll"
            );
            let poll = PollInput {
                question: req.question,
                options: req.options,
            };
            let result = sender.send_poll(&req.chat_jid, poll).await?;
            Ok(ActionOutcome::PollSent(result))
        }
    }
}

/// Parse raw tool parameters and dispatch them.
pub async fn handle_whatsapp_action(
    params: &Value,
    config: &Config,
    sender: &dyn WhatsAppSender,
) -> Result<ActionOutcome, ActionError> {
    let request = WhatsAppActionRequest::from_params(params)?;
    dispatch_whatsapp_action(request, config, sender).await
}

/// Tool definition advertised to the model
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Definition of the `whatsapp` tool.
pub fn whatsapp_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: WHATSAPP_TOOL_NAME.to_string(),
        description: "React to WhatsApp messages or send polls. Use action 'react' with an \
                      empty emoji or remove=true to clear a reaction."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["react", "poll"],
                    "description": "Which WhatsApp action to perform."
                },
                "chatJid": {
                    "type": "string",
                    "description": "JID of the chat, e.g. 123@s.whatsapp.net."
                },
                "chatId": {
                    "type": "string",
                    "description": "Alias for chatJid; used when chatJid is absent."
                },
                "messageId": {
                    "type": "string",
                    "description": "react: ID of the message to react to."
                },
                "emoji": {
                    "type": "string",
                    "description": "react: emoji to add. Empty removes the reaction."
                },
                "remove": {
                    "type": "boolean",
                    "description": "react: remove the current reaction."
                },
                "fromMe": {
                    "type": "boolean",
                    "description": "react: whether the target message was sent by this account."
                },
                "participant": {
                    "type": "string",
                    "description": "react: group participant JID that sent the target message."
                },
                "accountId": {
                    "type": "string",
                    "description": "Linked WhatsApp account to act as."
                },
                "question": {
                    "type": "string",
                    "description": "poll: the poll question."
                },
                "options": {
                    "type": "array",
                    "items": { "type": "string" },
                    "minItems": 1,
                    "description": "poll: answer options in display order."
                }
            },
            "required": ["action"],
            "anyOf": [
                { "required": ["chatJid"] },
                { "required": ["chatId"] }
            ],
            "additionalProperties": false
        }),
    }
}

// ---------------------------------------------------------------------------
// Parameter helpers
// ---------------------------------------------------------------------------

fn require_str(args: &Value, key: &str) -> Result<String, ActionError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| ActionError::Validation(format!("{key} required")))
}

/// `chatJid`, with `chatId` accepted as an alias
fn require_chat_jid(args: &Value) -> Result<String, ActionError> {
    let value = args
        .get("chatJid")
        .filter(|v| !v.is_null())
        .or_else(|| args.get("chatId"));
    value
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| ActionError::Validation("chatJid required".to_string()))
}

fn optional_str(args: &Value, key: &str) -> Result<Option<String>, ActionError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ActionError::Validation(format!("{key} must be a string"))),
    }
}

fn optional_bool(args: &Value, key: &str) -> Result<Option<bool>, ActionError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ActionError::Validation(format!("{key} must be a boolean"))),
    }
}

fn require_str_array(args: &Value, key: &str) -> Result<Vec<String>, ActionError> {
    let items = args
        .get(key)
        .and_then(|v| v.as_array())
        .ok_or_else(|| ActionError::Validation(format!("{key} required")))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(|s| s.to_string())
                .ok_or_else(|| ActionError::Validation(format!("{key} must be strings")))
        })
        .collect()
}

fn non_blank(value: &str, key: &str) -> Result<(), ActionError> {
    if value.trim().is_empty() {
        return Err(ActionError::Validation(format!("{key} required")));
    }
    Ok(())
}
