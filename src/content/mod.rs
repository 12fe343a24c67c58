use std::fmt::{Display, Formatter};
use std::fmt;

use chrono::NaiveDateTime;

pub mod metadata;
pub mod parsing_utils;

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct PostId(pub String);

impl Display for PostId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata carried in the header of a post file.
///
/// Everything but `name` is optional while parsing. After
/// [`metadata::normalize`] the id, both dates and the slug are always set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostMetadata {
    pub id: Option<PostId>,
    pub name: String,
    pub published_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    /// Header entries this tool does not know about, kept so a rewrite does
    /// not lose them.
    pub extra: Vec<(String, String)>,
}

/// A parsed post file: its header and the markdown that follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct PostSource {
    pub metadata: PostMetadata,
    pub body: String,
}
