//! Dialect module: boolean literals, pattern operators and literal escaping per SQL backend.
//!
//! This module provides the SqlDialect enum and the tag-based literal lookups.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use tracing::warn;
use crate::TimelineFilterError;

/// The SQL backend a predicate fragment is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    Sqlite,
    Postgresql,
}

impl SqlDialect {
    /// Parse a dialect tag such as `"sqlite"` or `"postgresql"`.
    ///
    /// Any other tag is rejected: defaulting would silently produce predicates
    /// with the wrong boolean spelling.
    pub fn from_tag(tag: &str) -> Result<Self, TimelineFilterError> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(SqlDialect::Sqlite),
            "postgresql" | "postgres" => Ok(SqlDialect::Postgresql),
            _ => {
                warn!(tag, "rejecting unsupported SQL dialect");
                Err(TimelineFilterError::UnsupportedDialect(tag.to_string()))
            }
        }
    }

    /// The literal that is always satisfied.
    pub fn true_literal(&self) -> &'static str {
        match self {
            SqlDialect::Sqlite => "1",
            SqlDialect::Postgresql => "TRUE",
        }
    }

    /// The literal that is never satisfied.
    pub fn false_literal(&self) -> &'static str {
        match self {
            SqlDialect::Sqlite => "0",
            SqlDialect::Postgresql => "FALSE",
        }
    }

    /// Case-insensitive pattern match operator.
    pub fn like_operator(&self) -> &'static str {
        match self {
            // LIKE is already case-insensitive for ASCII in SQLite
            SqlDialect::Sqlite => "LIKE",
            SqlDialect::Postgresql => "ILIKE",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SqlDialect::Sqlite => "sqlite",
            SqlDialect::Postgresql => "postgresql",
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SqlDialect {
    type Err = TimelineFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SqlDialect::from_tag(s)
    }
}

/// True literal for a dialect tag.
pub fn true_literal(tag: &str) -> Result<&'static str, TimelineFilterError> {
    Ok(SqlDialect::from_tag(tag)?.true_literal())
}

/// False literal for a dialect tag.
pub fn false_literal(tag: &str) -> Result<&'static str, TimelineFilterError> {
    Ok(SqlDialect::from_tag(tag)?.false_literal())
}

/// Quote a string as a SQL literal, doubling embedded single quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", escape_single_quotes(value))
}

pub fn escape_single_quotes(value: &str) -> String {
    value.replace('\'', "''")
}
