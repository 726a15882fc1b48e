//! Anchor text parsing
//!
//! Listing anchors for signs render as five lines:
//!
//! ```text
//! <blank>
//!         <gloss>
//! <blank>
//!           <grammar category>
//! <blank>
//! ```
//!
//! Pagination controls are a single line. Anything else degrades to the raw text
//! with an unknown grammar category; parsing never fails.

use crate::state::{LinkKind, UNKNOWN_GRAMMAR_CATEGORY};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Number of line segments in a well-formed sign anchor
const SIGN_ANCHOR_SEGMENTS: usize = 5;

/// Result of parsing an anchor's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedText {
    pub gloss: String,
    pub kind: LinkKind,
}

/// Parses raw anchor text into a gloss and link kind
///
/// # Examples
///
/// ```
/// use sign_harvest::crawler::parse_anchor_text;
/// use sign_harvest::LinkKind;
///
/// let parsed = parse_anchor_text("\n        Hola\n        \n          Interjección\n");
/// assert_eq!(parsed.gloss, "Hola");
/// assert_eq!(parsed.kind, LinkKind::theme("Interjección"));
///
/// let next = parse_anchor_text("Siguiente »");
/// assert_eq!(next.kind, LinkKind::Continuation);
/// ```
pub fn parse_anchor_text(text: &str) -> ParsedText {
    if !text.contains('\n') {
        return ParsedText {
            gloss: text.to_string(),
            kind: LinkKind::Continuation,
        };
    }

    let segments: Vec<&str> = text.split('\n').collect();
    if segments.len() != SIGN_ANCHOR_SEGMENTS {
        return ParsedText {
            gloss: text.to_string(),
            kind: LinkKind::theme(UNKNOWN_GRAMMAR_CATEGORY),
        };
    }

    ParsedText {
        gloss: last_token(segments[1]).to_string(),
        kind: LinkKind::theme(last_token(segments[3])),
    }
}

/// Last whitespace-delimited token, or "" for a blank segment
fn last_token(segment: &str) -> &str {
    segment.split_whitespace().last().unwrap_or("")
}

/// Normalizes a display name for comparison: trimmed, diacritics stripped, lowercase
///
/// # Examples
///
/// ```
/// use sign_harvest::crawler::normalize_gloss;
///
/// assert_eq!(normalize_gloss("  Días de la Semana "), "dias de la semana");
/// ```
pub fn normalize_gloss(text: &str) -> String {
    text.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}
