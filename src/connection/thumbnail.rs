//! Rewriting of Kodi `image://` references into fetchable URLs.
//!
//! Library artwork is reported as `image://<encoded-source>/`, which is only
//! resolvable through the device's `/image/` endpoint.

use urlencoding::encode;

/// Scheme of internal artwork references.
pub const IMAGE_SCHEME: &str = "image";

/// Returns the URI scheme of `reference`, if it has one.
///
/// Follows RFC 3986: a letter followed by letters, digits, `+`, `-` or `.`,
/// terminated by `:`.
fn scheme_of(reference: &str) -> Option<&str> {
    let (scheme, _) = reference.split_once(':')?;
    let mut chars = scheme.chars();

    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    valid.then_some(scheme)
}

/// Maps an `image://` reference to `{image_base}/{percent-encoded reference}`.
///
/// Returns `None` for a missing reference or any other scheme. The whole
/// reference is encoded, scheme and slashes included.
#[must_use]
pub fn thumbnail_url(image_base: &str, reference: Option<&str>) -> Option<String> {
    let reference = reference?;
    let scheme = scheme_of(reference)?;

    if !scheme.eq_ignore_ascii_case(IMAGE_SCHEME) {
        return None;
    }

    Some(format!("{image_base}/{}", encode(reference)))
}
