//! Agent tool surface
//!
//! Channel actions the agent can invoke through tool calls.

pub mod whatsapp_actions;

pub use whatsapp_actions::{
    dispatch_whatsapp_action, handle_whatsapp_action, whatsapp_tool_definition, ActionError,
    ActionOutcome, PollRequest, ReactRequest, ToolDefinition, WhatsAppActionRequest,
    WHATSAPP_TOOL_NAME,
};
