//! Rendering of operation payloads for terminal and HTTP output.

use std::io::{self, Write};

use serde_json::Value;

/// Payload as a JSON value: parsed when it is JSON, else a (lossy) string.
pub(crate) fn payload_value(payload: &[u8]) -> Value {
    serde_json::from_slice(payload)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(payload).into_owned()))
}

/// Write the stored bytes unchanged, followed by a newline.
pub(crate) fn write_payload<W: Write>(out: &mut W, payload: &[u8]) -> io::Result<()> {
    out.write_all(payload)?;
    out.write_all(b"\n")?;
    out.flush()
}
