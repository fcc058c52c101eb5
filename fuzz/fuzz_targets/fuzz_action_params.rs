#![no_main]

use libfuzzer_sys::fuzz_target;

use carapace_whatsapp_actions::agent::{ActionError, WhatsAppActionRequest};
use serde_json::Value;

// Tool parameters come straight from model output: parsing must never panic
// and may only fail with a validation or unknown-action error.
fuzz_target!(|data: &[u8]| {
    let value: Value = match serde_json::from_slice(data) {
        Ok(v) => v,
        Err(_) => return,
    };

    match WhatsAppActionRequest::from_params(&value) {
        Ok(request) => {
            let _ = request.action_name();
            if let WhatsAppActionRequest::React(react) = &request {
                let emoji = react.effective_emoji();
                if react.remove == Some(true) {
                    assert!(emoji.is_empty());
                }
            }
        }
        Err(ActionError::Validation(_)) | Err(ActionError::UnknownAction(_)) => {}
        Err(other) => panic!("parser produced a non-parse error: {other}"),
    }
});
