#![no_main]

use libfuzzer_sys::fuzz_target;

use carapace_whatsapp_actions::config::{self, WhatsAppActionKind};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(cfg) = config::parse_config(raw, "fuzz") {
        let gate = cfg.whatsapp_action_gate();
        let _ = gate.is_enabled(WhatsAppActionKind::Reactions);
        let _ = gate.is_enabled(WhatsAppActionKind::Polls);
    }
});
