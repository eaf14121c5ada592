//! Compound module: filters built from a collection of sub-filters.
//!
//! This module provides the SubFilter trait, the lock-guarded CompoundFilter
//! collection and the two combinators built on it, IntersectionFilter (AND)
//! and UnionFilter (OR).

use crate::dialect::SqlDialect;
use parking_lot::{RwLock, RwLockReadGuard};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tracing::trace;

/// A filter that can render itself and live inside a [`CompoundFilter`].
pub trait SubFilter: Clone + PartialEq + fmt::Debug + Send + Sync {
    /// Name shown to the user; compound filters sort by it.
    fn display_name(&self) -> String;

    /// SQL boolean expression for this filter, without a leading `WHERE`.
    fn render_predicate(&self, dialect: SqlDialect) -> String;

    /// Whether `other` selects the same thing, in which case only one of
    /// them is kept in a collection.
    fn is_duplicate_of(&self, other: &Self) -> bool {
        self == other
    }

    /// Deep, independent copy.
    fn copy_of(&self) -> Self {
        self.clone()
    }
}

/// An ordered, duplicate-free list of sub-filters of one kind.
///
/// The list sits behind a single lock: additions and removals hold the write
/// lock for the whole update, rendering and copying hold the read lock for the
/// whole walk, so a concurrent reader never sees a half-applied mutation.
pub struct CompoundFilter<T> {
    sub_filters: RwLock<Vec<T>>,
}

impl<T> CompoundFilter<T> {
    fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.sub_filters.read()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn has_sub_filters(&self) -> bool {
        !self.is_empty()
    }

    /// Run `f` against the current sub-filters without copying them.
    pub fn with_sub_filters<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.read())
    }
}

impl<T: SubFilter> CompoundFilter<T> {
    pub fn new() -> Self {
        Self { sub_filters: RwLock::new(Vec::new()) }
    }

    /// Build from a list, keeping the given order. Later duplicates are dropped.
    pub fn from_sub_filters(sub_filters: impl IntoIterator<Item = T>) -> Self {
        let mut unique: Vec<T> = Vec::new();
        for sub_filter in sub_filters {
            if !unique.iter().any(|f| f.is_duplicate_of(&sub_filter)) {
                unique.push(sub_filter);
            }
        }
        Self { sub_filters: RwLock::new(unique) }
    }

    /// Add a sub-filter and re-sort by display name.
    ///
    /// Returns `false` and keeps the existing entry when `sub_filter` is a
    /// duplicate of one already present.
    pub fn add_sub_filter(&self, sub_filter: T) -> bool {
        let mut guard = self.sub_filters.write();
        let added = if guard.iter().any(|f| f.is_duplicate_of(&sub_filter)) {
            trace!(name = %sub_filter.display_name(), "ignoring duplicate sub-filter");
            false
        } else {
            trace!(name = %sub_filter.display_name(), "adding sub-filter");
            guard.push(sub_filter);
            true
        };
        guard.sort_by_cached_key(|f| f.display_name());
        added
    }

    /// Remove every sub-filter matching `predicate`, returning how many went.
    pub fn remove_sub_filters(&self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let mut guard = self.sub_filters.write();
        let before = guard.len();
        guard.retain(|f| !predicate(f));
        guard.sort_by_cached_key(|f| f.display_name());
        let removed = before - guard.len();
        if removed > 0 {
            trace!(removed, "removed sub-filters");
        }
        removed
    }

    /// Snapshot of the current sub-filters.
    pub fn sub_filters(&self) -> Vec<T> {
        self.read().iter().map(SubFilter::copy_of).collect()
    }

    pub(crate) fn render_each(&self, dialect: SqlDialect) -> Vec<String> {
        self.read().iter().map(|f| f.render_predicate(dialect)).collect()
    }

    pub(crate) fn display_names(&self) -> Vec<String> {
        self.read().iter().map(SubFilter::display_name).collect()
    }
}

impl<T: SubFilter> Default for CompoundFilter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SubFilter> Clone for CompoundFilter<T> {
    fn clone(&self) -> Self {
        let copies = self.sub_filters();
        Self { sub_filters: RwLock::new(copies) }
    }
}

impl<T: SubFilter> PartialEq for CompoundFilter<T> {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        *self.read() == *other.read()
    }
}

impl<T: fmt::Debug> fmt::Debug for CompoundFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.read().iter()).finish()
    }
}

impl<T: Serialize> Serialize for CompoundFilter<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.read().serialize(serializer)
    }
}

impl<'de, T: SubFilter + Deserialize<'de>> Deserialize<'de> for CompoundFilter<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::from_sub_filters)
    }
}

/// AND of all sub-filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionFilter<T: SubFilter> {
    sub_filters: CompoundFilter<T>,
}

impl<T: SubFilter> IntersectionFilter<T> {
    pub fn new() -> Self {
        Self { sub_filters: CompoundFilter::new() }
    }

    pub fn from_sub_filters(sub_filters: impl IntoIterator<Item = T>) -> Self {
        Self { sub_filters: CompoundFilter::from_sub_filters(sub_filters) }
    }

    pub fn sub_filters(&self) -> &CompoundFilter<T> {
        &self.sub_filters
    }

    pub fn add_sub_filter(&self, sub_filter: T) -> bool {
        self.sub_filters.add_sub_filter(sub_filter)
    }
}

impl<T: SubFilter> Default for IntersectionFilter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SubFilter> SubFilter for IntersectionFilter<T> {
    fn display_name(&self) -> String {
        format!("Intersection[{}]", self.sub_filters.display_names().join(","))
    }

    fn render_predicate(&self, dialect: SqlDialect) -> String {
        let true_literal = dialect.true_literal();
        let parts: Vec<String> = self
            .sub_filters
            .render_each(dialect)
            .into_iter()
            .filter(|sql| sql != true_literal)
            .collect();
        if parts.is_empty() {
            true_literal.to_string()
        } else {
            format!("({})", parts.join(" AND "))
        }
    }
}

/// OR of all sub-filters.
///
/// An empty union matches nothing and renders the dialect's false literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionFilter<T: SubFilter> {
    label: Option<String>,
    sub_filters: CompoundFilter<T>,
}

impl<T: SubFilter> UnionFilter<T> {
    /// A union shown to the user under `label`.
    pub fn named(label: impl Into<String>) -> Self {
        Self { label: Some(label.into()), sub_filters: CompoundFilter::new() }
    }

    /// A union without a label of its own.
    pub fn anonymous() -> Self {
        Self { label: None, sub_filters: CompoundFilter::new() }
    }

    pub fn from_sub_filters(label: Option<String>, sub_filters: impl IntoIterator<Item = T>) -> Self {
        Self { label, sub_filters: CompoundFilter::from_sub_filters(sub_filters) }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn sub_filters(&self) -> &CompoundFilter<T> {
        &self.sub_filters
    }

    pub fn add_sub_filter(&self, sub_filter: T) -> bool {
        self.sub_filters.add_sub_filter(sub_filter)
    }
}

impl<T: SubFilter> SubFilter for UnionFilter<T> {
    fn display_name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("Union[{}]", self.sub_filters.display_names().join(",")),
        }
    }

    fn render_predicate(&self, dialect: SqlDialect) -> String {
        let true_literal = dialect.true_literal();
        let false_literal = dialect.false_literal();
        let mut parts = Vec::new();
        for sql in self.sub_filters.render_each(dialect) {
            if sql == true_literal {
                return sql;
            }
            if sql != false_literal {
                parts.push(sql);
            }
        }
        if parts.is_empty() {
            false_literal.to_string()
        } else {
            format!("({})", parts.join(" OR "))
        }
    }
}
