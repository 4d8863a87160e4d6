//! Best-effort decoding of uploaded profile pictures.

use base64::{engine::general_purpose, Engine as _};

/// Decode a base64 picture, optionally wrapped in a data URI.
///
/// Anything before the first `,` is treated as the data-URI header and
/// dropped. Blank or malformed payloads yield `None`.
pub fn decode_profile_picture(payload: Option<&str>) -> Option<Vec<u8>> {
    let payload = payload?.trim();
    if payload.is_empty() {
        return None;
    }

    let encoded = match payload.split_once(',') {
        Some((_, data)) => data,
        None => payload,
    };

    match general_purpose::STANDARD.decode(encoded.trim()) {
        Ok(bytes) if bytes.is_empty() => None,
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::debug!("Ignoring undecodable profile picture: {}", e);
            None
        }
    }
}

/// Encode stored picture bytes for JSON responses.
pub fn encode_profile_picture(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_data_uri() {
        let decoded = decode_profile_picture(Some("data:image/png;base64,aGVsbG8="));
        assert_eq!(decoded, Some(b"hello".to_vec()));
    }

    #[test]
    fn test_decodes_bare_base64() {
        assert_eq!(decode_profile_picture(Some("aGVsbG8=")), Some(b"hello".to_vec()));
    }

    #[test]
    fn test_malformed_payload_is_dropped() {
        assert_eq!(decode_profile_picture(Some("data:image/png;base64,%%%not-base64")), None);
    }

    #[test]
    fn test_blank_payloads_are_dropped() {
        assert_eq!(decode_profile_picture(None), None);
        assert_eq!(decode_profile_picture(Some("   ")), None);
        assert_eq!(decode_profile_picture(Some("data:image/png;base64,")), None);
    }

    #[test]
    fn test_encode_matches_decode() {
        let encoded = encode_profile_picture(b"hello");
        assert_eq!(encoded, "aGVsbG8=");
    }
}
