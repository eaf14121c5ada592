//! Leaf module: filters that render a single condition.
//!
//! This module provides the individual leaf filters and the named unions
//! (tags, hash hits, data sources, file types) collecting them.

use crate::compound::{SubFilter, UnionFilter};
use crate::dialect::{quote_literal, SqlDialect};
use crate::types::{FileKnown, MediaType, TagName};
use crate::TimelineFilterError;
use serde::{Serialize, Deserialize};

/// Excludes events derived from files known to be benign.
// Braced: a unit struct serializes as `null`, which reads back as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HideKnownFilter {}

impl HideKnownFilter {
    pub fn new() -> Self {
        HideKnownFilter {}
    }
}

impl SubFilter for HideKnownFilter {
    fn display_name(&self) -> String {
        "Hide Known Files".to_string()
    }

    fn render_predicate(&self, _dialect: SqlDialect) -> String {
        format!("(known_state != {})", FileKnown::Known.value())
    }
}

/// Events from a single data source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataSourceFilter {
    id: i64,
    name: String,
}

impl DataSourceFilter {
    pub fn new(name: impl Into<String>, id: i64) -> Self {
        Self { id, name: name.into() }
    }

    pub fn data_source_id(&self) -> i64 {
        self.id
    }

    pub fn data_source_name(&self) -> &str {
        &self.name
    }
}

impl SubFilter for DataSourceFilter {
    fn display_name(&self) -> String {
        format!("{} (ID: {})", self.name, self.id)
    }

    fn render_predicate(&self, _dialect: SqlDialect) -> String {
        format!("(datasource_id = '{}')", self.id)
    }

    fn is_duplicate_of(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Events whose source item carries a given tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagNameFilter {
    tag_name: TagName,
}

impl TagNameFilter {
    pub fn new(tag_name: TagName) -> Self {
        Self { tag_name }
    }

    pub fn tag_name(&self) -> &TagName {
        &self.tag_name
    }
}

impl SubFilter for TagNameFilter {
    fn display_name(&self) -> String {
        self.tag_name.display_name.clone()
    }

    fn render_predicate(&self, _dialect: SqlDialect) -> String {
        format!("(tag_name_id = {})", self.tag_name.id)
    }

    fn is_duplicate_of(&self, other: &Self) -> bool {
        self.tag_name.id == other.tag_name.id
    }
}

/// Events whose file was a hit in a given hash set.
///
/// Hits are recorded by set name, so two filters naming the same set are
/// duplicates whatever their ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashSetFilter {
    id: i64,
    name: String,
}

impl HashSetFilter {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }

    pub fn hash_set_id(&self) -> i64 {
        self.id
    }

    pub fn hash_set_name(&self) -> &str {
        &self.name
    }
}

impl SubFilter for HashSetFilter {
    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn render_predicate(&self, _dialect: SqlDialect) -> String {
        format!("(hash_set_name = {})", quote_literal(&self.name))
    }

    fn is_duplicate_of(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Free text searched in every description level of an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextFilter {
    text: String,
}

const DESCRIPTION_COLUMNS: [&str; 3] = ["med_description", "full_description", "short_description"];

impl TextFilter {
    pub fn new(text: &str) -> Self {
        Self { text: text.trim().to_string() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl SubFilter for TextFilter {
    fn display_name(&self) -> String {
        "Text".to_string()
    }

    // Blank text restricts nothing.
    fn render_predicate(&self, dialect: SqlDialect) -> String {
        if self.text.is_empty() {
            return dialect.true_literal().to_string();
        }
        let pattern = quote_literal(&format!("%{}%", self.text));
        let op = dialect.like_operator();
        let parts: Vec<String> = DESCRIPTION_COLUMNS
            .iter()
            .map(|column| format!("({column} {op} {pattern})"))
            .collect();
        format!("({})", parts.join(" OR "))
    }
}

/// Events derived from files with one of the given media types.
///
/// An inverse filter selects everything except those types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileTypeFilter {
    display_name: String,
    media_types: Vec<MediaType>,
    inverse: bool,
}

impl FileTypeFilter {
    pub fn new<S: AsRef<str>>(
        display_name: impl Into<String>,
        media_types: impl IntoIterator<Item = S>,
    ) -> Result<Self, TimelineFilterError> {
        Ok(Self {
            display_name: display_name.into(),
            media_types: parse_media_types(media_types)?,
            inverse: false,
        })
    }

    pub fn inverse<S: AsRef<str>>(
        display_name: impl Into<String>,
        media_types: impl IntoIterator<Item = S>,
    ) -> Result<Self, TimelineFilterError> {
        Ok(Self { inverse: true, ..Self::new(display_name, media_types)? })
    }

    pub fn media_types(&self) -> &[MediaType] {
        &self.media_types
    }

    pub fn is_inverse(&self) -> bool {
        self.inverse
    }
}

fn parse_media_types<S: AsRef<str>>(
    media_types: impl IntoIterator<Item = S>,
) -> Result<Vec<MediaType>, TimelineFilterError> {
    media_types.into_iter().map(|s| MediaType::parse(s.as_ref())).collect()
}

fn media_type_to_sql(media_type: &MediaType) -> String {
    if media_type.has_wildcard() {
        format!("(mime_type LIKE {})", quote_literal(&format!("{}/_%", media_type.top_level())))
    } else {
        format!("(mime_type = {})", quote_literal(&media_type.to_string()))
    }
}

impl SubFilter for FileTypeFilter {
    fn display_name(&self) -> String {
        self.display_name.clone()
    }

    fn render_predicate(&self, dialect: SqlDialect) -> String {
        if self.media_types.is_empty() {
            // no types: matches nothing, so the inverse matches everything
            let literal = if self.inverse { dialect.true_literal() } else { dialect.false_literal() };
            return literal.to_string();
        }
        let parts: Vec<String> = self.media_types.iter().map(media_type_to_sql).collect();
        let sql = format!("({})", parts.join(" OR "));
        if self.inverse {
            format!("NOT {sql}")
        } else {
            sql
        }
    }
}

pub type TagsFilter = UnionFilter<TagNameFilter>;
pub type HashHitsFilter = UnionFilter<HashSetFilter>;
pub type DataSourcesFilter = UnionFilter<DataSourceFilter>;
pub type FileTypesFilter = UnionFilter<FileTypeFilter>;

impl Default for UnionFilter<TagNameFilter> {
    fn default() -> Self {
        Self::new()
    }
}

impl UnionFilter<TagNameFilter> {
    pub fn new() -> Self {
        UnionFilter::named("Tags")
    }

    /// Drop the filter for a tag that no longer exists.
    pub fn remove_filter_for_tag(&self, tag_name: &TagName) -> bool {
        self.sub_filters().remove_sub_filters(|f| f.tag_name().id == tag_name.id) > 0
    }
}

impl Default for UnionFilter<HashSetFilter> {
    fn default() -> Self {
        Self::new()
    }
}

impl UnionFilter<HashSetFilter> {
    pub fn new() -> Self {
        UnionFilter::named("Hash Sets")
    }
}

impl Default for UnionFilter<DataSourceFilter> {
    fn default() -> Self {
        Self::new()
    }
}

impl UnionFilter<DataSourceFilter> {
    pub fn new() -> Self {
        UnionFilter::named("Data Sources")
    }
}

impl Default for UnionFilter<FileTypeFilter> {
    fn default() -> Self {
        Self::new()
    }
}

impl UnionFilter<FileTypeFilter> {
    pub fn new() -> Self {
        UnionFilter::named("File Types")
    }
}
