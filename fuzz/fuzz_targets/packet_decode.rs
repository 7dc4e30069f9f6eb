//! Fuzz target for packet decoding
//!
//! This fuzzer feeds arbitrary bytes to both decoders with:
//! - Malformed JSON
//! - Valid JSON with the wrong shape (objects, short arrays)
//! - Known event names carrying payloads of the wrong type
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use iochat_proto::{ClientEvent, ServerEvent};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(event) = ServerEvent::decode(data) {
        // Anything accepted must survive re-encoding
        let encoded = event.encode().unwrap_or_default();
        assert_eq!(ServerEvent::decode(&encoded).ok(), Some(event));
    }

    if let Ok(event) = ClientEvent::decode(data) {
        let encoded = event.encode().unwrap_or_default();
        assert_eq!(ClientEvent::decode(&encoded).ok(), Some(event));
    }
});
