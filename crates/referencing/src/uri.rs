//! Canonical URI parsing and resolution.
//!
//! The upstream crate this is adapted from uses `fluent_uri`; this version
//! uses `url`, which an earlier release of the same project depended on for
//! the same purpose. RFC 3986 reference resolution and normalization are
//! provided by the crate, not hand-rolled here.
use once_cell::sync::Lazy;
use url::Url;

use crate::error::UriError;
use crate::Error;

/// Resolves the URI reference against the given base URI and returns the target URI.
///
/// # Errors
///
/// Returns an error if `uri` is not a valid URI reference, or cannot be
/// resolved against `base` (for example, `base` has no scheme).
pub fn resolve_against(base: &Url, uri: &str) -> Result<Url, Error> {
    base.join(uri).map_err(|error| Error::from(UriError::from(error)))
}

/// Parses a URI reference from a string into a canonical, absolute [`Url`].
///
/// Relative references (no scheme) are resolved against a fixed synthetic
/// root so that schema documents without an `$id` still get a stable,
/// comparable identity within a single load.
///
/// # Errors
///
/// Returns an error if the input string does not conform to URI-reference
/// syntax from RFC 3986.
pub fn from_str(uri: &str) -> Result<Url, Error> {
    match Url::parse(uri) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => resolve_against(&DEFAULT_ROOT_URI, uri),
        Err(error) => Err(Error::from(UriError::from(error))),
    }
}

pub(crate) static DEFAULT_ROOT_URI: Lazy<Url> =
    Lazy::new(|| Url::parse("json-schema:///").expect("Invalid URI"));
