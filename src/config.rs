//! Config module: settings for building a QueryCompiler.
//!
//! This module provides the CompilerConfig type, loadable from JSON.

use crate::dialect::SqlDialect;
use crate::TimelineFilterError;
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Dialect tag, validated by [`CompilerConfig::dialect`].
    pub dialect: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self { dialect: SqlDialect::Sqlite.name().to_string() }
    }
}

impl CompilerConfig {
    pub fn new(dialect: SqlDialect) -> Self {
        Self { dialect: dialect.name().to_string() }
    }

    pub fn from_json_str(json: &str) -> Result<Self, TimelineFilterError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The configured dialect; an unknown tag is an error, never a default.
    pub fn dialect(&self) -> Result<SqlDialect, TimelineFilterError> {
        SqlDialect::from_tag(&self.dialect)
    }
}
