//! Canonical `$schema` URIs for each supported draft.
//!
//! Dialect detection only needs to recognize these strings (see
//! [`crate::Draft::detect`]); the full meta-schema documents themselves are
//! not shipped, since validating a schema against its meta-schema is out of
//! scope here.
use crate::Draft;

pub const DRAFT4: &str = "http://json-schema.org/draft-04/schema#";
pub const DRAFT6: &str = "http://json-schema.org/draft-06/schema#";
pub const DRAFT7: &str = "http://json-schema.org/draft-07/schema#";
pub const DRAFT201909: &str = "https://json-schema.org/draft/2019-09/schema";
pub const DRAFT202012: &str = "https://json-schema.org/draft/2020-12/schema";

/// The canonical `$schema` URI this implementation would emit for `draft`.
#[must_use]
pub fn canonical_uri(draft: Draft) -> &'static str {
    match draft {
        Draft::Draft4 => DRAFT4,
        Draft::Draft6 => DRAFT6,
        Draft::Draft7 => DRAFT7,
        Draft::Draft201909 => DRAFT201909,
        Draft::Draft202012 => DRAFT202012,
    }
}
