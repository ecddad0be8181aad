use crate::error::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Suffix for enveloped body responses (`<Key>ResponseDto`).
pub const RESPONSE_SUFFIX: &str = "ResponseDto";
/// Suffix for status-only envelopes (`<Key>StatusResponseDto`).
pub const STATUS_RESPONSE_SUFFIX: &str = "StatusResponseDto";
/// Suffix for multipart upload bodies (`<Key>RequestDto`).
pub const REQUEST_SUFFIX: &str = "RequestDto";

// OpenAPI restricts component keys to this alphabet.
static COMPONENT_NAME_RE: OnceLock<Regex> = OnceLock::new();

/// Derives a component type name from a logical key and a suffix.
///
/// The first character of `key` is upper-cased and `suffix` appended:
/// `derive_type_name("getUser", "ResponseDto")` yields `"GetUserResponseDto"`.
/// The result must be a legal OpenAPI component name, otherwise the key is
/// rejected with [`Error::InvalidKey`].
pub fn derive_type_name(key: &str, suffix: &str) -> Result<String> {
    let name = capitalize(key).ok_or_else(|| Error::InvalidKey {
        key: key.to_string(),
        reason: "key must not be empty",
    })?;
    let name = format!("{}{}", name, suffix);

    let re = COMPONENT_NAME_RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9._-]+$").unwrap());
    if !re.is_match(&name) {
        return Err(Error::InvalidKey {
            key: key.to_string(),
            reason: "derived name may only contain ASCII letters, digits, '.', '-' and '_'",
        });
    }

    Ok(name)
}

/// Upper-cases the first character. `None` for an empty string.
pub fn capitalize(s: &str) -> Option<String> {
    let mut chars = s.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}
