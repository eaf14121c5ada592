//! Timeline filters: composable event filters compiled to SQL predicate fragments.
//!
//! A caller describes the criteria for a timeline query (tags, hash set hits,
//! data sources, known-file status, event types, free text, media types) as a
//! tree of filters and asks the root to render itself for a SQL dialect. The
//! result is a boolean expression without a leading `WHERE`, with every literal
//! inlined, ready to be embedded into a larger statement.
//!
//! # Architecture
//! - Dialect literals and quoting ([`SqlDialect`])
//! - Leaf filters, each rendering a single condition
//! - Compound filters: AND ([`IntersectionFilter`]) and OR ([`UnionFilter`])
//!   over a sorted, duplicate-free sub-filter list
//! - Event type filters mirroring an external [`EventTypeCatalog`]
//! - The closed [`Filter`] enum, [`RootFilter`] and the [`QueryCompiler`] facade

mod dialect;
mod types;
mod taxonomy;
mod leaf;
mod compound;
mod event_type;
mod filter;
mod config;
mod compiler;

pub use dialect::*;
pub use types::*;
pub use taxonomy::*;
pub use leaf::*;
pub use compound::*;
pub use event_type::*;
pub use filter::*;
pub use config::*;
pub use compiler::*;

use thiserror::Error;

/// Unified error type for timeline filter operations
#[derive(Debug, Error)]
pub enum TimelineFilterError {
    #[error("Unsupported SQL dialect: {0}")]
    UnsupportedDialect(String),
    #[error("Invalid media type: {0}")]
    InvalidMediaType(String),
    #[error("Invalid event type taxonomy: {0}")]
    InvalidTaxonomy(String),
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}
