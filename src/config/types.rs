//! Typed configuration structures
//!
//! Mirrors the subset of the gateway config file this crate reads. Unknown
//! keys are ignored so a full gateway config loads unchanged.

use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Logging configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// Channel configurations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<ChannelsConfig>,
}

impl Config {
    /// WhatsApp action flags, if configured at all
    pub fn whatsapp_actions(&self) -> Option<&WhatsAppActionConfig> {
        self.channels
            .as_ref()
            .and_then(|c| c.whatsapp.as_ref())
            .and_then(|w| w.actions.as_ref())
    }

    /// Gate over the WhatsApp action flags
    pub fn whatsapp_action_gate(&self) -> ActionGate<'_> {
        ActionGate::new(self.whatsapp_actions())
    }

    /// Configured log level, or `info`
    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }

    /// Configured log format, or text
    pub fn log_format(&self) -> LogFormat {
        self.logging
            .as_ref()
            .and_then(|l| l.format)
            .unwrap_or_default()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `carapace_whatsapp_actions=debug`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<LogFormat>,
}

/// Per-channel configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<WhatsAppChannelConfig>,
}

/// WhatsApp channel configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppChannelConfig {
    /// Agent action toggles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<WhatsAppActionConfig>,
}

/// Toggles for WhatsApp agent actions. Unset means disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppActionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polls: Option<bool>,
}

impl WhatsAppActionConfig {
    /// Both actions switched on
    pub fn all_enabled() -> Self {
        Self {
            reactions: Some(true),
            polls: Some(true),
        }
    }
}

/// A gated WhatsApp capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WhatsAppActionKind {
    Reactions,
    Polls,
}

impl WhatsAppActionKind {
    /// Reason reported when the capability is switched off
    pub fn disabled_reason(self) -> &'static str {
        match self {
            Self::Reactions => "WhatsApp reactions are disabled",
            Self::Polls => "WhatsApp polls are disabled",
        }
    }
}

/// Read-only view answering whether a WhatsApp action may run
#[derive(Debug, Clone, Copy)]
pub struct ActionGate<'a> {
    actions: Option<&'a WhatsAppActionConfig>,
}

impl<'a> ActionGate<'a> {
    pub fn new(actions: Option<&'a WhatsAppActionConfig>) -> Self {
        Self { actions }
    }

    /// Missing sections and missing flags both count as off.
    pub fn is_enabled(&self, kind: WhatsAppActionKind) -> bool {
        let Some(actions) = self.actions else {
            return false;
        };
        let flag = match kind {
            WhatsAppActionKind::Reactions => actions.reactions,
            WhatsAppActionKind::Polls => actions.polls,
        };
        flag.unwrap_or(false)
    }
}
