//! DELETE statement builder.

use crate::config::StmtConfig;
use crate::error::{StmtError, StmtResult};
use crate::param::ParamList;
use crate::stmt::join::{JoinCond, JoinList};
use crate::stmt::traits::{Built, SqlStmt, StmtKind};
use crate::stmt::where_clause::{WhereClause, where_methods};
use crate::stmt::{check_error, config_methods};

/// DELETE statement builder.
///
/// A DELETE without WHERE conditions is refused unless
/// [`allow_unqualified_delete`](Delete::allow_unqualified_delete) is set.
#[derive(Clone, Debug)]
pub struct Delete {
    config: StmtConfig,
    options: Vec<String>,
    ignore_error: bool,
    allow_unqualified_delete: bool,
    tables: Vec<String>,
    joins: JoinList,
    where_clause: WhereClause,
    order_by: Vec<String>,
    limit: Option<u64>,
    build_error: Option<StmtError>,
}

impl Default for Delete {
    fn default() -> Self {
        Self::new()
    }
}

impl Delete {
    pub fn new() -> Self {
        Self {
            config: StmtConfig::default(),
            options: Vec::new(),
            ignore_error: false,
            allow_unqualified_delete: false,
            tables: Vec::new(),
            joins: JoinList::new(),
            where_clause: WhereClause::default(),
            order_by: Vec::new(),
            limit: None,
            build_error: None,
        }
    }

    config_methods!();

    /// Add a table to delete from.
    pub fn from_table(mut self, table: &str) -> Self {
        self.tables.push(table.to_string());
        self
    }

    pub fn from_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables.extend(tables.into_iter().map(Into::into));
        self
    }

    /// Emit IGNORE.
    pub fn ignore_error(mut self, enabled: bool) -> Self {
        self.ignore_error = enabled;
        self
    }

    /// Permit deleting every row.
    pub fn allow_unqualified_delete(mut self, enabled: bool) -> Self {
        self.allow_unqualified_delete = enabled;
        self
    }

    pub fn join(self, table: &str, cond: impl Into<JoinCond>) -> Self {
        self.join_with_type(table, cond, "INNER")
    }

    pub fn left_join(self, table: &str, cond: impl Into<JoinCond>) -> Self {
        self.join_with_type(table, cond, "LEFT")
    }

    pub fn join_with_type(mut self, table: &str, cond: impl Into<JoinCond>, join_type: &str) -> Self {
        self.joins.push(table, cond.into(), join_type);
        self
    }

    where_methods!();

    pub fn order_by(mut self, expr: &str) -> Self {
        self.order_by.push(expr.to_string());
        self
    }

    pub fn limit(mut self, row_count: u64) -> Self {
        self.limit = Some(row_count);
        self
    }

    fn is_multi_table(&self) -> bool {
        self.tables.len() > 1 || !self.joins.is_empty()
    }
}

impl SqlStmt for Delete {
    fn kind(&self) -> StmtKind {
        StmtKind::Delete
    }

    fn stmt_config(&self) -> &StmtConfig {
        &self.config
    }

    fn validate(&self) -> StmtResult<()> {
        check_error(&self.build_error)?;
        if self.tables.is_empty() {
            return Err(StmtError::invalid_argument("DELETE requires at least one table"));
        }
        if !self.where_clause.has_conds() && !self.allow_unqualified_delete {
            return Err(StmtError::invalid_argument(
                "DANGER! Unqualified deletes can ruin your day!",
            ));
        }
        if self.is_multi_table() {
            if !self.order_by.is_empty() {
                return Err(StmtError::invalid_argument(
                    "ORDER BY not supported when DELETE FROM multiple tables",
                ));
            }
            if self.limit.is_some() {
                return Err(StmtError::invalid_argument(
                    "LIMIT not supported when DELETE FROM multiple tables",
                ));
            }
        }
        Ok(())
    }

    fn assemble(&self) -> StmtResult<Built> {
        let root = self
            .tables
            .first()
            .ok_or_else(|| StmtError::invalid_argument("DELETE requires at least one table"))?;
        let mut params = ParamList::new();

        let mut sql = vec!["DELETE".to_string()];
        sql.extend(self.options.iter().cloned());
        if self.ignore_error {
            sql.push("IGNORE".to_string());
        }
        sql.push("FROM".to_string());
        sql.push(self.tables.join(", "));

        if !self.joins.is_empty() {
            let mut table_refs = vec![root.clone()];
            table_refs.extend(self.joins.render(root, &self.config));
            sql.push("USING".to_string());
            sql.push(table_refs.join(" "));
        }

        if let Some(cond) = self.where_clause.render(&self.config, &mut params)? {
            sql.push("WHERE".to_string());
            sql.push(cond);
        }

        if !self.is_multi_table() {
            if !self.order_by.is_empty() {
                sql.push("ORDER BY".to_string());
                sql.push(self.order_by.join(", "));
            }
            if let Some(limit) = self.limit {
                sql.push(format!("LIMIT {limit}"));
            }
        }

        Ok(Built::new(sql.join(" "), params))
    }
}
