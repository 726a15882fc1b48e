//! Link definitions for the category and listing pages
//!
//! Listing pages mix links to sign pages with pagination controls; the two are
//! kept apart by `LinkKind` so every consumer has to handle both.

use crate::output::BACKUP_EXTENSION;
use std::fmt;

/// Grammar category recorded when the anchor text could not be split into fields
pub const UNKNOWN_GRAMMAR_CATEGORY: &str = "unknown";

/// A top-level thematic category from the category index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLink {
    /// Link to the category listing, as written in the index page
    pub href: String,

    /// Normalized category name (trimmed, lowercase, diacritics stripped)
    pub gloss: String,
}

impl CategoryLink {
    pub fn new(href: impl Into<String>, gloss: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            gloss: gloss.into(),
        }
    }

    /// File name of this category's backup file
    ///
    /// Spaces and path separators become hyphens so the name is a single path component.
    pub fn backup_file_name(&self) -> String {
        let stem: String = self
            .gloss
            .chars()
            .map(|c| match c {
                ' ' | '/' | '\\' => '-',
                other => other,
            })
            .collect();
        format!("{}.{}", stem, BACKUP_EXTENSION)
    }
}

/// What a listing anchor points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkKind {
    /// A sign page
    Theme {
        /// Grammatical category (noun, verb, ...) as shown on the listing
        grammar_category: String,
    },

    /// A pagination control (previous/next) leading to another listing page
    Continuation,
}

impl LinkKind {
    pub fn theme(grammar_category: impl Into<String>) -> Self {
        Self::Theme {
            grammar_category: grammar_category.into(),
        }
    }

    pub fn is_continuation(&self) -> bool {
        matches!(self, Self::Continuation)
    }
}

/// A link found on a category listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeLink {
    /// Link target, as written in the page
    pub href: String,

    /// Sign gloss; raw anchor text for continuation links
    pub gloss: String,

    pub kind: LinkKind,
}

impl ThemeLink {
    pub fn theme(
        href: impl Into<String>,
        gloss: impl Into<String>,
        grammar_category: impl Into<String>,
    ) -> Self {
        Self {
            href: href.into(),
            gloss: gloss.into(),
            kind: LinkKind::theme(grammar_category),
        }
    }

    pub fn continuation(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            gloss: text.into(),
            kind: LinkKind::Continuation,
        }
    }

    pub fn is_continuation(&self) -> bool {
        self.kind.is_continuation()
    }
}

impl fmt::Display for ThemeLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LinkKind::Theme { grammar_category } => {
                write!(f, "{} ({}) -> {}", self.gloss, grammar_category, self.href)
            }
            LinkKind::Continuation => write!(f, "[continuation] -> {}", self.href),
        }
    }
}
