//! Utility functions with platform-specific implementations.

use std::borrow::Cow;

/// Current wall-clock time in milliseconds since the Unix epoch.
///
/// On native platforms, uses `SystemTime::now()`.
/// On WASM, uses `js_sys::Date::now()`.
#[cfg(not(target_arch = "wasm32"))]
pub fn time_now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
pub fn time_now_millis() -> u64 {
    js_sys::Date::now() as u64
}

/// Decode bytes to a string, handling various encodings.
///
/// Tries UTF-8 first (BOM handled by encoding_rs), then the `<meta charset>`
/// declared in the first kilobyte, then falls back to Windows-1252.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = extract_meta_charset(bytes)
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract the charset from a `<meta charset="...">` tag near the top of a document.
pub fn extract_meta_charset(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(1024)];

    let pos = prefix
        .windows(8)
        .position(|w| w.eq_ignore_ascii_case(b"charset="))?;
    let after = &prefix[pos + 8..];

    let (start, quote) = match after.first()? {
        b'"' | b'\'' => (1, Some(after[0])),
        _ => (0, None),
    };
    let end = after[start..]
        .iter()
        .position(|&b| match quote {
            Some(q) => b == q,
            None => b == b'"' || b == b'\'' || b == b'>' || b == b';' || b.is_ascii_whitespace(),
        })?
        + start;

    std::str::from_utf8(&after[start..end]).ok()
}

/// Whether the bytes look like binary data rather than markup.
pub fn looks_binary(bytes: &[u8]) -> bool {
    memchr::memchr(0, &bytes[..bytes.len().min(1024)]).is_some()
}

// ============================================================================
// Image Sniffing
// ============================================================================

const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8];

/// Detect an image MIME type from magic bytes.
///
/// Returns `None` for unrecognised data.
pub fn detect_image_mime(data: &[u8]) -> Option<&'static str> {
    if data.len() < 4 {
        return None;
    }
    if data.starts_with(JPEG_MAGIC) {
        Some("image/jpeg")
    } else if data.starts_with(PNG_MAGIC) {
        Some("image/png")
    } else if data.starts_with(b"GIF") {
        Some("image/gif")
    } else if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        Some("image/webp")
    } else if memchr::memmem::find(&data[..data.len().min(256)], b"<svg").is_some() {
        Some("image/svg+xml")
    } else {
        None
    }
}

/// Natural `(width, height)` of a PNG, JPEG, GIF or WebP image.
///
/// Only header bytes are read; SVG and unknown data yield `None`.
pub fn extract_image_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    match detect_image_mime(data)? {
        "image/png" => {
            let ihdr = data.get(16..24)?;
            Some((be32(&ihdr[..4]), be32(&ihdr[4..])))
        }
        "image/gif" => {
            let screen = data.get(6..10)?;
            Some((le16(&screen[..2]), le16(&screen[2..])))
        }
        "image/jpeg" => jpeg_dimensions(data),
        "image/webp" => webp_dimensions(data),
        _ => None,
    }
}

fn be32(b: &[u8]) -> u32 {
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

fn le16(b: &[u8]) -> u32 {
    u16::from_le_bytes([b[0], b[1]]) as u32
}

fn le24(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], 0])
}

/// Walk JPEG segments up to the first start-of-frame marker.
fn jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let mut i = 2;
    while i + 4 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }
        let marker = data[i + 1];
        // SOF0..SOF15 except DHT (C4), JPG (C8) and DAC (CC)
        let is_frame = (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            let frame = data.get(i + 5..i + 9)?;
            let height = u16::from_be_bytes([frame[0], frame[1]]) as u32;
            let width = u16::from_be_bytes([frame[2], frame[3]]) as u32;
            return Some((width, height));
        }
        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + length;
    }
    None
}

/// Size from the first WebP chunk (lossy, lossless or extended).
fn webp_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    match data.get(12..16)? {
        b"VP8X" => {
            let canvas = data.get(24..30)?;
            Some((le24(&canvas[..3]) + 1, le24(&canvas[3..]) + 1))
        }
        b"VP8 " => {
            let frame = data.get(26..30)?;
            Some((le16(&frame[..2]) & 0x3FFF, le16(&frame[2..]) & 0x3FFF))
        }
        b"VP8L" => {
            let bits = data.get(21..25)?;
            let bits = u32::from_le_bytes([bits[0], bits[1], bits[2], bits[3]]);
            Some(((bits & 0x3FFF) + 1, ((bits >> 14) & 0x3FFF) + 1))
        }
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
