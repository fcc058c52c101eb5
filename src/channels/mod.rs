//! Messaging channels

pub mod whatsapp;

pub use whatsapp::{
    DryRunSender, DynWhatsAppSender, PollInput, ReactionOptions, SendResult, WhatsAppError,
    WhatsAppResult, WhatsAppSender,
};
