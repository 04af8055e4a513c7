//! `data:` URI encoding and decoding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::percent_decode_str;

/// Encode bytes as a base64 `data:` URI.
pub fn encode_data_uri(mime: &str, data: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(data))
}

/// Decode a `data:` URI into its MIME type and payload.
///
/// Handles both base64 and percent-encoded payloads. Returns `None` for
/// anything that is not a well-formed data URI.
pub fn decode_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;

    let mut params = meta.split(';');
    let mime = match params.next() {
        Some(m) if !m.is_empty() => m.trim().to_ascii_lowercase(),
        _ => "text/plain".to_string(),
    };
    let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

    let data = if is_base64 {
        // Whitespace inside attribute values is common in hand-written HTML
        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let compact = percent_decode_str(&compact).decode_utf8().ok()?.into_owned();
        STANDARD.decode(compact).ok()?
    } else {
        percent_decode_str(payload).collect()
    };

    Some((mime, data))
}
