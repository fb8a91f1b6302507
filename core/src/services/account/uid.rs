//! Encoding of user ids embedded in recovery links

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use uuid::Uuid;

/// Encode a user id as unpadded base64url of its hyphenated form
pub fn encode_uid(id: Uuid) -> String {
    URL_SAFE_NO_PAD.encode(id.to_string())
}

/// Decode a uid produced by [`encode_uid`]
///
/// Returns `None` for anything that is not base64url-encoded UUID text.
pub fn decode_uid(uid: &str) -> Option<Uuid> {
    let bytes = URL_SAFE_NO_PAD.decode(uid.trim_end_matches('=')).ok()?;
    let text = std::str::from_utf8(&bytes).ok()?;
    Uuid::parse_str(text).ok()
}
