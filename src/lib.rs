//! WhatsApp agent actions for the carapace gateway
//!
//! Lets the agent react to WhatsApp messages and send polls. Requests are
//! validated, gated by `channels.whatsapp.actions` in the gateway config, and
//! forwarded to an injected [`channels::WhatsAppSender`].

pub mod agent;
pub mod channels;
pub mod cli;
pub mod config;
pub mod logging;

pub use agent::{
    dispatch_whatsapp_action, handle_whatsapp_action, ActionError, ActionOutcome,
    WhatsAppActionRequest,
};
pub use channels::{PollInput, ReactionOptions, SendResult, WhatsAppError, WhatsAppSender};
pub use config::Config;
