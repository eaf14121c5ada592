//! Compiler module: renders filter trees for one configured dialect.
//!
//! This module provides the QueryCompiler facade used by query construction.

use crate::compound::SubFilter;
use crate::config::CompilerConfig;
use crate::dialect::SqlDialect;
use crate::filter::{Filter, RootFilter};
use crate::TimelineFilterError;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryCompiler {
    dialect: SqlDialect,
}

impl QueryCompiler {
    pub fn new(dialect: SqlDialect) -> Self {
        debug!(%dialect, "created query compiler");
        Self { dialect }
    }

    pub fn from_config(config: &CompilerConfig) -> Result<Self, TimelineFilterError> {
        Ok(Self::new(config.dialect()?))
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    /// Predicate fragment for `filter`, without a leading `WHERE`.
    pub fn compile(&self, filter: &Filter) -> String {
        let sql = filter.render_predicate(self.dialect);
        debug!(dialect = %self.dialect, filter = %filter.display_name(), len = sql.len(), "compiled filter");
        sql
    }

    pub fn compile_root(&self, root: &RootFilter) -> String {
        let sql = root.render_predicate(self.dialect);
        debug!(dialect = %self.dialect, len = sql.len(), "compiled root filter");
        sql
    }

    /// `WHERE` clause for `filter`, for callers assembling a full statement.
    pub fn where_clause(&self, filter: &Filter) -> String {
        format!("WHERE {}", self.compile(filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::intersect;
    use crate::leaf::{DataSourceFilter, HideKnownFilter, TagsFilter};

    fn filter() -> Filter {
        intersect(vec![
            DataSourceFilter::new("image1", 3).into(),
            HideKnownFilter::new().into(),
        ])
    }

    #[test]
    fn test_compile() {
        let compiler = QueryCompiler::new(SqlDialect::Sqlite);
        assert_eq!(compiler.compile(&filter()), "((datasource_id = '3') AND (known_state != 1))");
    }

    #[test]
    fn test_where_clause() {
        let compiler = QueryCompiler::new(SqlDialect::Postgresql);
        let empty = intersect(Vec::new());
        assert_eq!(compiler.where_clause(&empty), "WHERE TRUE");
    }

    #[test]
    fn test_from_config() {
        let config = CompilerConfig::from_json_str(r#"{"dialect":"postgres"}"#).unwrap();
        let compiler = QueryCompiler::from_config(&config).unwrap();
        assert_eq!(compiler.dialect(), SqlDialect::Postgresql);
        let bad = CompilerConfig { dialect: "mssql".to_string() };
        assert!(matches!(
            QueryCompiler::from_config(&bad),
            Err(TimelineFilterError::UnsupportedDialect(_))
        ));
    }

    #[test]
    fn test_compile_root_matches_filter_conversion() {
        let root = RootFilter::builder()
            .known_filter(HideKnownFilter::new())
            .tags_filter(TagsFilter::new())
            .build();
        let compiler = QueryCompiler::new(SqlDialect::Sqlite);
        assert_eq!(compiler.compile_root(&root), "((known_state != 1))");
        assert_eq!(compiler.compile(&Filter::from(root)), "((known_state != 1))");
    }
}
