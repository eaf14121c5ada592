//! Taxonomy module: the read-only event type hierarchy filters are built from.
//!
//! This module provides the EventTypeCatalog trait and an in-memory Taxonomy with its builder.

use crate::types::EventType;
use crate::TimelineFilterError;
use std::collections::{HashMap, VecDeque};
use serde::{Serialize, Deserialize};

/// Read access to an event type hierarchy owned elsewhere.
pub trait EventTypeCatalog {
    fn root(&self) -> &EventType;
    /// Immediate sub-types of `type_id`, in catalog order. Unknown ids have none.
    fn sub_types(&self, type_id: i64) -> Vec<EventType>;
}

/// Snapshots go through [`TaxonomyBuilder`], so a restored taxonomy passes
/// the same checks as a freshly built one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TaxonomyBuilder", into = "TaxonomyBuilder")]
pub struct Taxonomy {
    root: EventType,
    types: HashMap<i64, EventType>,
    children: HashMap<i64, Vec<i64>>,
}

impl Taxonomy {
    pub fn get(&self, type_id: i64) -> Option<&EventType> {
        self.types.get(&type_id)
    }

    /// Total number of event types, root included.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl EventTypeCatalog for Taxonomy {
    fn root(&self) -> &EventType {
        &self.root
    }

    fn sub_types(&self, type_id: i64) -> Vec<EventType> {
        self.children
            .get(&type_id)
            .map(|ids| ids.iter().filter_map(|id| self.types.get(id)).cloned().collect())
            .unwrap_or_default()
    }
}

/// Builds a [`Taxonomy`]. A parent must be registered before its sub-types,
/// which keeps the result a tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyBuilder {
    root: EventType,
    entries: Vec<(i64, EventType)>,
}

impl TaxonomyBuilder {
    pub fn new(root_id: i64, root_name: impl Into<String>) -> Self {
        Self { root: EventType::new(root_id, root_name), entries: Vec::new() }
    }

    pub fn sub_type(mut self, parent_id: i64, id: i64, display_name: impl Into<String>) -> Self {
        self.entries.push((parent_id, EventType::new(id, display_name)));
        self
    }

    pub fn build(self) -> Result<Taxonomy, TimelineFilterError> {
        let mut types = HashMap::new();
        let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
        types.insert(self.root.id, self.root.clone());
        for (parent_id, event_type) in self.entries {
            if !types.contains_key(&parent_id) {
                return Err(TimelineFilterError::InvalidTaxonomy(format!(
                    "parent {} of event type {} is not registered",
                    parent_id, event_type.id
                )));
            }
            if types.contains_key(&event_type.id) {
                return Err(TimelineFilterError::InvalidTaxonomy(format!(
                    "event type {} registered twice",
                    event_type.id
                )));
            }
            children.entry(parent_id).or_default().push(event_type.id);
            types.insert(event_type.id, event_type);
        }
        Ok(Taxonomy { root: self.root, types, children })
    }
}

impl TryFrom<TaxonomyBuilder> for Taxonomy {
    type Error = TimelineFilterError;

    fn try_from(builder: TaxonomyBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl From<Taxonomy> for TaxonomyBuilder {
    // Breadth-first from the root, so every parent precedes its sub-types.
    fn from(taxonomy: Taxonomy) -> Self {
        let mut builder = TaxonomyBuilder::new(taxonomy.root.id, taxonomy.root.display_name.clone());
        let mut queue = VecDeque::from([taxonomy.root.id]);
        while let Some(parent_id) = queue.pop_front() {
            for sub_type in taxonomy.sub_types(parent_id) {
                queue.push_back(sub_type.id);
                builder.entries.push((parent_id, sub_type));
            }
        }
        builder
    }
}
