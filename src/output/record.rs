//! Persisted record shapes
//!
//! Backup lines carry `href`, `gloss`, `grammarCategory` and `video`; the
//! category is implied by the file a line lives in and is filled back in when
//! the backups are merged.

use crate::HarvestError;
use serde::{Deserialize, Serialize};

/// Value stored in place of a video URL when a sign page has no video
pub const NO_VIDEO: &str = "no-video";

/// Video reference of a sign page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawVideo", into = "RawVideo")]
pub enum VideoRef {
    /// The page had no video element; serialized as `"no-video"`
    Missing,

    /// Absolute video URLs, never empty
    Sources(Vec<String>),
}

/// On-disk forms: the sentinel or a single URL as a string, several as a list
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawVideo {
    Single(String),
    List(Vec<String>),
}

impl From<RawVideo> for VideoRef {
    fn from(raw: RawVideo) -> Self {
        match raw {
            RawVideo::Single(value) if value == NO_VIDEO => Self::Missing,
            RawVideo::Single(value) => Self::Sources(vec![value]),
            RawVideo::List(values) => Self::from_sources(values),
        }
    }
}

impl From<VideoRef> for RawVideo {
    fn from(video: VideoRef) -> Self {
        match video {
            VideoRef::Missing => Self::Single(NO_VIDEO.to_string()),
            VideoRef::Sources(sources) => Self::List(sources),
        }
    }
}

impl VideoRef {
    /// `Missing` for an empty list, `Sources` otherwise
    pub fn from_sources(sources: Vec<String>) -> Self {
        if sources.is_empty() {
            Self::Missing
        } else {
            Self::Sources(sources)
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Collapses to one value: the sentinel, or the single source
    ///
    /// Sign pages are expected to hold exactly one video; more than one is an error.
    pub fn to_scalar(&self, href: &str) -> Result<String, HarvestError> {
        match self {
            Self::Missing => Ok(NO_VIDEO.to_string()),
            Self::Sources(sources) if sources.len() == 1 => Ok(sources[0].clone()),
            Self::Sources(sources) => Err(HarvestError::MultipleVideos {
                href: href.to_string(),
                count: sources.len(),
            }),
        }
    }
}

/// One visited sign page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignRecord {
    pub href: String,

    pub gloss: String,

    #[serde(rename = "grammarCategory")]
    pub grammar_category: String,

    /// Thematic category; not written to backup lines
    #[serde(skip)]
    pub category: String,

    pub video: VideoRef,
}

/// A row of the merged dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedRecord {
    pub href: String,

    /// Single video URL or `"no-video"`
    pub video: String,

    pub gloss: String,

    #[serde(rename = "grammarCategory")]
    pub grammar_category: String,

    pub category: String,
}

impl TryFrom<SignRecord> for MergedRecord {
    type Error = HarvestError;

    fn try_from(record: SignRecord) -> Result<Self, Self::Error> {
        let video = record.video.to_scalar(&record.href)?;
        Ok(Self {
            href: record.href,
            video,
            gloss: record.gloss,
            grammar_category: record.grammar_category,
            category: record.category,
        })
    }
}
