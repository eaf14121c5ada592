//! Event type module: the filter mirroring the event type taxonomy.
//!
//! An EventTypeFilter node has one child per immediate sub-type. It always
//! matches by the terminal type ids beneath it, so a sub-type added to the
//! taxonomy is picked up by every ancestor without further changes.

use crate::compound::{CompoundFilter, SubFilter};
use crate::dialect::SqlDialect;
use crate::taxonomy::EventTypeCatalog;
use crate::types::EventType;
use serde::{Serialize, Deserialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct EventTypeFilter {
    event_type: EventType,
    sub_filters: CompoundFilter<EventTypeFilter>,
}

impl EventTypeFilter {
    /// Build the node for `event_type` and, recursively, one child per sub-type
    /// found in `catalog`.
    pub fn build_full(catalog: &impl EventTypeCatalog, event_type: EventType) -> Self {
        let filter = Self::build_bare(event_type);
        for sub_type in catalog.sub_types(filter.event_type.id) {
            filter.add_sub_filter(Self::build_full(catalog, sub_type));
        }
        filter
    }

    /// Build the whole tree, starting at the catalog's root.
    pub fn from_catalog(catalog: &impl EventTypeCatalog) -> Self {
        Self::build_full(catalog, catalog.root().clone())
    }

    /// A node with no children.
    pub fn build_bare(event_type: EventType) -> Self {
        Self { event_type, sub_filters: CompoundFilter::new() }
    }

    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    pub fn sub_filters(&self) -> &CompoundFilter<EventTypeFilter> {
        &self.sub_filters
    }

    pub fn add_sub_filter(&self, sub_filter: EventTypeFilter) -> bool {
        self.sub_filters.add_sub_filter(sub_filter)
    }

    /// Ids of the childless nodes of this subtree, in sub-filter order.
    pub fn leaf_type_ids(&self) -> Vec<i64> {
        let mut ids = Vec::new();
        self.collect_leaf_ids(&mut ids);
        ids
    }

    fn collect_leaf_ids(&self, ids: &mut Vec<i64>) {
        self.sub_filters.with_sub_filters(|children| {
            if children.is_empty() {
                ids.push(self.event_type.id);
            } else {
                for child in children {
                    child.collect_leaf_ids(ids);
                }
            }
        });
    }
}

impl Clone for EventTypeFilter {
    // bare node plus copies of the children it already has; the taxonomy is
    // not consulted again
    fn clone(&self) -> Self {
        let mut copy = Self::build_bare(self.event_type.clone());
        copy.sub_filters = self.sub_filters.clone();
        copy
    }
}

impl SubFilter for EventTypeFilter {
    fn display_name(&self) -> String {
        self.event_type.display_name.clone()
    }

    fn render_predicate(&self, _dialect: SqlDialect) -> String {
        let ids: Vec<String> = self.leaf_type_ids().iter().map(i64::to_string).collect();
        format!("(sub_type IN ({}))", ids.join(","))
    }

    fn is_duplicate_of(&self, other: &Self) -> bool {
        self.event_type.id == other.event_type.id
    }
}
