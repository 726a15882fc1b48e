//! Link classification for listing pages
//!
//! Listing pages repeat their pagination controls in different shapes: none,
//! `[next]`, `[prev, next]`, or `[prev, next, prev, next]` when the navigation bar
//! is rendered twice. The last control is taken as "next"; the others are dropped.

use crate::crawler::parser::Anchor;
use crate::crawler::text::parse_anchor_text;
use crate::state::ThemeLink;

/// Links of a listing page, split by kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedLinks {
    /// Sign links in page order
    pub themes: Vec<ThemeLink>,

    /// The canonical "next page" link, if the page has pagination controls
    pub continuation: Option<ThemeLink>,

    /// How many pagination controls the page had before picking the canonical one
    pub continuation_anchors: usize,
}

impl ClassifiedLinks {
    /// A single pagination control could be either "previous" or "next"
    pub fn is_ambiguous(&self) -> bool {
        self.continuation_anchors == 1
    }

    /// Total number of links that will be enqueued
    pub fn len(&self) -> usize {
        self.themes.len() + usize::from(self.continuation.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Links in enqueue order: themes first, then the continuation
    pub fn into_links(self) -> impl Iterator<Item = ThemeLink> {
        self.themes.into_iter().chain(self.continuation)
    }
}

/// Parses and classifies a page's anchors
pub fn classify_anchors(anchors: &[Anchor]) -> ClassifiedLinks {
    classify(anchors.iter().map(|anchor| {
        let parsed = parse_anchor_text(&anchor.text);
        ThemeLink {
            href: anchor.href.clone(),
            gloss: parsed.gloss,
            kind: parsed.kind,
        }
    }))
}

/// Splits already-parsed links into themes and the canonical continuation
pub fn classify(links: impl IntoIterator<Item = ThemeLink>) -> ClassifiedLinks {
    let mut classified = ClassifiedLinks::default();

    for link in links {
        if link.is_continuation() {
            classified.continuation_anchors += 1;
            classified.continuation = Some(link);
        } else {
            classified.themes.push(link);
        }
    }

    classified
}
