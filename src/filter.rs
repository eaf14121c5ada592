//! Filter module: the closed set of filter kinds and the root of a filter tree.
//!
//! This module provides the Filter enum, the ad-hoc intersect entry point and RootFilter.

use crate::compound::{IntersectionFilter, SubFilter, UnionFilter};
use crate::dialect::SqlDialect;
use crate::event_type::EventTypeFilter;
use crate::leaf::*;
use serde::{Serialize, Deserialize};

/// Any filter, leaf or compound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Filter {
    HideKnown(HideKnownFilter),
    DataSource(DataSourceFilter),
    TagName(TagNameFilter),
    HashSet(HashSetFilter),
    Text(TextFilter),
    FileType(FileTypeFilter),
    EventType(EventTypeFilter),
    Tags(TagsFilter),
    HashHits(HashHitsFilter),
    DataSources(DataSourcesFilter),
    FileTypes(FileTypesFilter),
    Intersection(IntersectionFilter<Filter>),
    Union(UnionFilter<Filter>),
}

// Forward a SubFilter method to whichever filter the variant holds.
macro_rules! dispatch {
    ($self:ident, $f:ident => $body:expr) => {
        match $self {
            Filter::HideKnown($f) => $body,
            Filter::DataSource($f) => $body,
            Filter::TagName($f) => $body,
            Filter::HashSet($f) => $body,
            Filter::Text($f) => $body,
            Filter::FileType($f) => $body,
            Filter::EventType($f) => $body,
            Filter::Tags($f) => $body,
            Filter::HashHits($f) => $body,
            Filter::DataSources($f) => $body,
            Filter::FileTypes($f) => $body,
            Filter::Intersection($f) => $body,
            Filter::Union($f) => $body,
        }
    };
}

// Filters of the same kind compare with that kind's duplicate rule; filters
// of different kinds are never duplicates.
macro_rules! duplicate_by_kind {
    ($left:expr, $right:expr, $( $variant:ident ),* $(,)?) => {
        match ($left, $right) {
            $( (Filter::$variant(a), Filter::$variant(b)) => a.is_duplicate_of(b), )*
            _ => false,
        }
    };
}

impl SubFilter for Filter {
    fn display_name(&self) -> String {
        dispatch!(self, f => f.display_name())
    }

    fn render_predicate(&self, dialect: SqlDialect) -> String {
        dispatch!(self, f => f.render_predicate(dialect))
    }

    fn is_duplicate_of(&self, other: &Self) -> bool {
        duplicate_by_kind!(
            self,
            other,
            HideKnown,
            DataSource,
            TagName,
            HashSet,
            Text,
            FileType,
            EventType,
            Tags,
            HashHits,
            DataSources,
            FileTypes,
            Intersection,
            Union,
        )
    }
}

macro_rules! impl_from_filter {
    ($( $variant:ident($ty:ty) ),* $(,)?) => {
        $(
            impl From<$ty> for Filter {
                fn from(filter: $ty) -> Self {
                    Filter::$variant(filter)
                }
            }
        )*
    };
}

impl_from_filter! {
    HideKnown(HideKnownFilter),
    DataSource(DataSourceFilter),
    TagName(TagNameFilter),
    HashSet(HashSetFilter),
    Text(TextFilter),
    FileType(FileTypeFilter),
    EventType(EventTypeFilter),
    Tags(TagsFilter),
    HashHits(HashHitsFilter),
    DataSources(DataSourcesFilter),
    FileTypes(FileTypesFilter),
    Intersection(IntersectionFilter<Filter>),
    Union(UnionFilter<Filter>),
}

/// AND together filters of any kind, in the given order.
pub fn intersect(filters: impl IntoIterator<Item = Filter>) -> Filter {
    Filter::Intersection(IntersectionFilter::from_sub_filters(filters))
}

/// The top of a timeline filter tree: an intersection with named access to
/// the standard filters plus any number of extra ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootFilter {
    known_filter: Option<HideKnownFilter>,
    tags_filter: Option<TagsFilter>,
    hash_hits_filter: Option<HashHitsFilter>,
    text_filter: Option<TextFilter>,
    event_type_filter: Option<EventTypeFilter>,
    data_sources_filter: Option<DataSourcesFilter>,
    file_types_filter: Option<FileTypesFilter>,
    extra_filters: Vec<Filter>,
}

impl RootFilter {
    pub fn builder() -> RootFilterBuilder {
        RootFilterBuilder::default()
    }

    pub fn known_filter(&self) -> Option<&HideKnownFilter> {
        self.known_filter.as_ref()
    }

    pub fn tags_filter(&self) -> Option<&TagsFilter> {
        self.tags_filter.as_ref()
    }

    pub fn hash_hits_filter(&self) -> Option<&HashHitsFilter> {
        self.hash_hits_filter.as_ref()
    }

    pub fn text_filter(&self) -> Option<&TextFilter> {
        self.text_filter.as_ref()
    }

    pub fn event_type_filter(&self) -> Option<&EventTypeFilter> {
        self.event_type_filter.as_ref()
    }

    pub fn data_sources_filter(&self) -> Option<&DataSourcesFilter> {
        self.data_sources_filter.as_ref()
    }

    pub fn file_types_filter(&self) -> Option<&FileTypesFilter> {
        self.file_types_filter.as_ref()
    }

    pub fn extra_filters(&self) -> &[Filter] {
        &self.extra_filters
    }

    /// The filters in effect, as one intersection.
    ///
    /// A named collection with no entries means the user selected nothing in
    /// that category and is left out rather than matching no event.
    pub fn to_intersection(&self) -> IntersectionFilter<Filter> {
        let mut filters: Vec<Filter> = Vec::new();
        filters.extend(self.text_filter.clone().map(Filter::Text));
        filters.extend(self.known_filter.clone().map(Filter::HideKnown));
        filters.extend(
            self.data_sources_filter
                .iter()
                .filter(|f| f.sub_filters().has_sub_filters())
                .cloned()
                .map(Filter::DataSources),
        );
        filters.extend(
            self.tags_filter
                .iter()
                .filter(|f| f.sub_filters().has_sub_filters())
                .cloned()
                .map(Filter::Tags),
        );
        filters.extend(
            self.hash_hits_filter
                .iter()
                .filter(|f| f.sub_filters().has_sub_filters())
                .cloned()
                .map(Filter::HashHits),
        );
        filters.extend(self.event_type_filter.clone().map(Filter::EventType));
        filters.extend(
            self.file_types_filter
                .iter()
                .filter(|f| f.sub_filters().has_sub_filters())
                .cloned()
                .map(Filter::FileTypes),
        );
        filters.extend(self.extra_filters.iter().cloned());
        IntersectionFilter::from_sub_filters(filters)
    }
}

impl SubFilter for RootFilter {
    fn display_name(&self) -> String {
        "Root".to_string()
    }

    fn render_predicate(&self, dialect: SqlDialect) -> String {
        self.to_intersection().render_predicate(dialect)
    }
}

impl From<RootFilter> for Filter {
    fn from(root: RootFilter) -> Self {
        Filter::Intersection(root.to_intersection())
    }
}

#[derive(Debug, Default)]
pub struct RootFilterBuilder {
    root: RootFilter,
}

impl RootFilterBuilder {
    pub fn known_filter(mut self, filter: HideKnownFilter) -> Self {
        self.root.known_filter = Some(filter);
        self
    }

    pub fn tags_filter(mut self, filter: TagsFilter) -> Self {
        self.root.tags_filter = Some(filter);
        self
    }

    pub fn hash_hits_filter(mut self, filter: HashHitsFilter) -> Self {
        self.root.hash_hits_filter = Some(filter);
        self
    }

    pub fn text_filter(mut self, filter: TextFilter) -> Self {
        self.root.text_filter = Some(filter);
        self
    }

    pub fn event_type_filter(mut self, filter: EventTypeFilter) -> Self {
        self.root.event_type_filter = Some(filter);
        self
    }

    pub fn data_sources_filter(mut self, filter: DataSourcesFilter) -> Self {
        self.root.data_sources_filter = Some(filter);
        self
    }

    pub fn file_types_filter(mut self, filter: FileTypesFilter) -> Self {
        self.root.file_types_filter = Some(filter);
        self
    }

    /// Add a filter outside the named categories. Duplicates are dropped.
    pub fn extra_filter(mut self, filter: impl Into<Filter>) -> Self {
        let filter = filter.into();
        if !self.root.extra_filters.iter().any(|f| f.is_duplicate_of(&filter)) {
            self.root.extra_filters.push(filter);
        }
        self
    }

    pub fn build(self) -> RootFilter {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventType, TagName};

    #[test]
    fn test_intersect_heterogeneous_filters() {
        let filter = intersect(vec![
            DataSourceFilter::new("image1", 3).into(),
            HideKnownFilter::new().into(),
        ]);
        assert_eq!(
            filter.render_predicate(SqlDialect::Sqlite),
            "((datasource_id = '3') AND (known_state != 1))"
        );
    }

    #[test]
    fn test_intersect_of_nothing_is_true() {
        assert_eq!(intersect(Vec::new()).render_predicate(SqlDialect::Sqlite), "1");
        assert_eq!(intersect(Vec::new()).render_predicate(SqlDialect::Postgresql), "TRUE");
    }

    #[test]
    fn test_intersect_skips_blank_text() {
        let filter = intersect(vec![
            TextFilter::new("").into(),
            HideKnownFilter::new().into(),
        ]);
        assert_eq!(filter.render_predicate(SqlDialect::Postgresql), "((known_state != 1))");
    }

    #[test]
    fn test_filter_dispatches_display_name() {
        let filter: Filter = TagNameFilter::new(TagName::new(1, "Bookmark")).into();
        assert_eq!(filter.display_name(), "Bookmark");
        let union: Filter = UnionFilter::<Filter>::anonymous().into();
        assert_eq!(union.display_name(), "Union[]");
    }

    #[test]
    fn test_filter_union_of_mixed_kinds() {
        let union = UnionFilter::from_sub_filters(None, vec![
            Filter::from(HashSetFilter::new(1, "NSRL")),
            Filter::from(TagNameFilter::new(TagName::new(4, "Evidence"))),
        ]);
        assert_eq!(
            Filter::Union(union).render_predicate(SqlDialect::Sqlite),
            "((hash_set_name = 'NSRL') OR (tag_name_id = 4))"
        );
    }

    #[test]
    fn test_mixed_filters_use_kind_duplicate_rule() {
        let union = UnionFilter::from_sub_filters(None, vec![
            Filter::from(DataSourceFilter::new("a", 3)),
            Filter::from(DataSourceFilter::new("b", 3)),
        ]);
        assert_eq!(union.sub_filters().len(), 1);
        assert_eq!(
            Filter::Union(union).render_predicate(SqlDialect::Sqlite),
            "((datasource_id = '3'))"
        );

        let filter = intersect(vec![
            HideKnownFilter::new().into(),
            TagNameFilter::new(TagName::new(1, "Bookmark")).into(),
            TagNameFilter::new(TagName::new(1, "Renamed")).into(),
            HideKnownFilter::new().into(),
        ]);
        assert_eq!(
            filter.render_predicate(SqlDialect::Sqlite),
            "((known_state != 1) AND (tag_name_id = 1))"
        );
    }

    #[test]
    fn test_different_kinds_are_never_duplicates() {
        let tag = Filter::from(TagNameFilter::new(TagName::new(3, "x")));
        let source = Filter::from(DataSourceFilter::new("x", 3));
        assert!(!tag.is_duplicate_of(&source));
        assert!(tag.is_duplicate_of(&Filter::from(TagNameFilter::new(TagName::new(3, "y")))));
    }

    #[test]
    fn test_root_filter_renders_named_then_extra() {
        let sources = DataSourcesFilter::new();
        sources.add_sub_filter(DataSourceFilter::new("disk", 3));
        let root = RootFilter::builder()
            .known_filter(HideKnownFilter::new())
            .data_sources_filter(sources)
            .tags_filter(TagsFilter::new())
            .extra_filter(EventTypeFilter::build_bare(EventType::new(5, "Web")))
            .build();
        assert_eq!(
            root.render_predicate(SqlDialect::Sqlite),
            "((known_state != 1) AND ((datasource_id = '3')) AND (sub_type IN (5)))"
        );
    }

    #[test]
    fn test_empty_root_is_true() {
        let root = RootFilter::builder()
            .text_filter(TextFilter::new(""))
            .hash_hits_filter(HashHitsFilter::new())
            .build();
        assert_eq!(root.render_predicate(SqlDialect::Postgresql), "TRUE");
    }

    #[test]
    fn test_root_named_filters_are_live() {
        let root = RootFilter::builder().tags_filter(TagsFilter::new()).build();
        root.tags_filter()
            .unwrap()
            .add_sub_filter(TagNameFilter::new(TagName::new(9, "Suspicious")));
        assert_eq!(root.render_predicate(SqlDialect::Sqlite), "(((tag_name_id = 9)))");
    }

    #[test]
    fn test_root_copy_is_deep() {
        let root = RootFilter::builder().tags_filter(TagsFilter::new()).build();
        let copy = root.copy_of();
        assert_eq!(root, copy);
        copy.tags_filter()
            .unwrap()
            .add_sub_filter(TagNameFilter::new(TagName::new(1, "Bookmark")));
        assert!(root.tags_filter().unwrap().sub_filters().is_empty());
        assert_ne!(root, copy);
    }

    #[test]
    fn test_extra_filter_duplicates_dropped() {
        let root = RootFilter::builder()
            .extra_filter(HideKnownFilter::new())
            .extra_filter(HideKnownFilter::new())
            .extra_filter(DataSourceFilter::new("disk", 4))
            .extra_filter(DataSourceFilter::new("disk renamed", 4))
            .build();
        assert_eq!(root.extra_filters().len(), 2);
    }

    #[test]
    fn test_root_snapshot_keeps_known_filter() {
        let root = RootFilter::builder().known_filter(HideKnownFilter::new()).build();
        let json = serde_json::to_string(&root).unwrap();
        let back: RootFilter = serde_json::from_str(&json).unwrap();
        assert!(back.known_filter().is_some());
        assert_eq!(back.render_predicate(SqlDialect::Sqlite), "((known_state != 1))");
    }

    #[test]
    fn test_filter_serialization_round_trip() {
        let filter = intersect(vec![
            DataSourceFilter::new("image1", 3).into(),
            TextFilter::new("malware").into(),
        ]);
        let json = serde_json::to_string(&filter).unwrap();
        let back: Filter = serde_json::from_str(&json).unwrap();
        assert_eq!(filter, back);
    }
}
