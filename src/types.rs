//! Types module: value types referenced by filters.
//!
//! This module provides TagName, EventType, MediaType and the FileKnown states.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use crate::TimelineFilterError;

/// Known-state of a file as recorded by hash lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKnown {
    Unknown,
    Known,
    Bad,
}

impl FileKnown {
    /// The value stored in the `known_state` column.
    pub fn value(&self) -> u8 {
        match self {
            FileKnown::Unknown => 0,
            FileKnown::Known => 1,
            FileKnown::Bad => 2,
        }
    }
}

/// A tag that can be applied to files and results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagName {
    pub id: i64,
    pub display_name: String,
}

impl TagName {
    pub fn new(id: i64, display_name: impl Into<String>) -> Self {
        Self { id, display_name: display_name.into() }
    }
}

/// A node of the event type taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventType {
    pub id: i64,
    pub display_name: String,
}

impl EventType {
    pub fn new(id: i64, display_name: impl Into<String>) -> Self {
        Self { id, display_name: display_name.into() }
    }
}

/// A `type/subtype` media type; `type/*` is a wildcard over all subtypes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaType {
    top_level: String,
    subtype: Option<String>,
}

impl MediaType {
    pub fn parse(input: &str) -> Result<Self, TimelineFilterError> {
        // parameters such as "; charset=utf-8" do not take part in matching
        let essence = input.split(';').next().unwrap_or_default().trim();
        let (top_level, subtype) = essence
            .split_once('/')
            .ok_or_else(|| TimelineFilterError::InvalidMediaType(input.to_string()))?;
        if !is_token(top_level) || (subtype != "*" && !is_token(subtype)) {
            return Err(TimelineFilterError::InvalidMediaType(input.to_string()));
        }
        let subtype = if subtype == "*" { None } else { Some(subtype.to_ascii_lowercase()) };
        Ok(Self { top_level: top_level.to_ascii_lowercase(), subtype })
    }

    pub fn top_level(&self) -> &str {
        &self.top_level
    }

    pub fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    pub fn has_wildcard(&self) -> bool {
        self.subtype.is_none()
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| b.is_ascii_alphanumeric() || b"!#$&-^_.+".contains(&b))
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.top_level, self.subtype.as_deref().unwrap_or("*"))
    }
}

impl FromStr for MediaType {
    type Err = TimelineFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_state_values() {
        assert_eq!(FileKnown::Unknown.value(), 0);
        assert_eq!(FileKnown::Known.value(), 1);
        assert_eq!(FileKnown::Bad.value(), 2);
    }

    #[test]
    fn test_media_type_parse() {
        let mt = MediaType::parse("Image/JPEG").unwrap();
        assert_eq!(mt.top_level(), "image");
        assert_eq!(mt.subtype(), Some("jpeg"));
        assert!(!mt.has_wildcard());
        assert_eq!(mt.to_string(), "image/jpeg");
    }

    #[test]
    fn test_media_type_wildcard() {
        let mt: MediaType = "video/*".parse().unwrap();
        assert!(mt.has_wildcard());
        assert_eq!(mt.to_string(), "video/*");
    }

    #[test]
    fn test_media_type_parameters_ignored() {
        let mt = MediaType::parse("text/plain; charset=utf-8").unwrap();
        assert_eq!(mt.to_string(), "text/plain");
    }

    #[test]
    fn test_media_type_invalid() {
        assert!(MediaType::parse("image").is_err());
        assert!(MediaType::parse("/png").is_err());
        assert!(MediaType::parse("image/").is_err());
        assert!(matches!(MediaType::parse("ima ge/png"), Err(TimelineFilterError::InvalidMediaType(_))));
    }
}
