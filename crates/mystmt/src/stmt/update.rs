//! UPDATE statement builder.

use crate::config::StmtConfig;
use crate::error::{StmtError, StmtResult};
use crate::ident::quote_col_ref;
use crate::param::ParamList;
use crate::stmt::join::{JoinCond, JoinList};
use crate::stmt::set_values::SetValues;
use crate::stmt::traits::{Built, SqlStmt, StmtKind};
use crate::stmt::where_clause::{WhereClause, collect_values, where_methods};
use crate::stmt::{check_error, config_methods, record_error};
use crate::value::Value;

/// UPDATE statement builder.
///
/// ORDER BY and LIMIT are only accepted for a single table without joins.
#[derive(Clone, Debug)]
pub struct Update {
    config: StmtConfig,
    options: Vec<String>,
    ignore_error: bool,
    tables: Vec<String>,
    joins: JoinList,
    values: SetValues,
    where_clause: WhereClause,
    order_by: Vec<String>,
    limit: Option<u64>,
    build_error: Option<StmtError>,
}

impl Default for Update {
    fn default() -> Self {
        Self::new()
    }
}

impl Update {
    pub fn new() -> Self {
        Self {
            config: StmtConfig::default(),
            options: Vec::new(),
            ignore_error: false,
            tables: Vec::new(),
            joins: JoinList::new(),
            values: SetValues::default(),
            where_clause: WhereClause::default(),
            order_by: Vec::new(),
            limit: None,
            build_error: None,
        }
    }

    config_methods!();

    /// Add a table to update.
    pub fn table(mut self, table: &str) -> Self {
        self.tables.push(table.to_string());
        self
    }

    /// Add several tables.
    pub fn tables<I, S>(mut self, tables: I) -> Self
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

    /// Assign a value to a column.
    pub fn set_value(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.values.set_value(column, value.into());
        self
    }

    /// Assign verbatim SQL (`NOW()`, `` `t1c1` + 1 ``) to a column.
    pub fn set_raw_value(mut self, column: &str, raw: impl Into<String>) -> Self {
        let result = self.values.set_raw_value(column, raw.into(), None);
        record_error(&mut self.build_error, result);
        self
    }

    /// Assign verbatim SQL whose placeholders are bound to `params`.
    pub fn set_raw_value_params<I>(mut self, column: &str, raw: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let result = self
            .values
            .set_raw_value(column, raw.into(), Some(collect_values(params)));
        record_error(&mut self.build_error, result);
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
        self.tables.len() + self.joins.len() > 1
    }
}

impl SqlStmt for Update {
    fn kind(&self) -> StmtKind {
        StmtKind::Update
    }

    fn stmt_config(&self) -> &StmtConfig {
        &self.config
    }

    fn validate(&self) -> StmtResult<()> {
        check_error(&self.build_error)?;
        if self.tables.is_empty() {
            return Err(StmtError::invalid_argument("UPDATE requires at least one table"));
        }
        if self.values.is_empty() {
            return Err(StmtError::invalid_argument("UPDATE requires at least one value"));
        }
        if self.is_multi_table() {
            if !self.order_by.is_empty() {
                return Err(StmtError::invalid_argument(
                    "Multiple-table UPDATE does not support ORDER BY",
                ));
            }
            if self.limit.is_some() {
                return Err(StmtError::invalid_argument(
                    "Multiple-table UPDATE does not support LIMIT",
                ));
            }
        }
        Ok(())
    }

    fn assemble(&self) -> StmtResult<Built> {
        let root = self
            .tables
            .first()
            .ok_or_else(|| StmtError::invalid_argument("UPDATE requires at least one table"))?;
        let mut params = ParamList::new();

        let mut table_refs = vec![self.tables.join(", ")];
        table_refs.extend(self.joins.render(root, &self.config));

        let assignments: Vec<String> = self
            .values
            .render(&self.config, &mut params)?
            .into_iter()
            .map(|(col, val)| format!("{}={val}", quote_col_ref(col, self.config.quote_all_col_refs)))
            .collect();

        let mut sql = vec!["UPDATE".to_string()];
        sql.extend(self.options.iter().cloned());
        if self.ignore_error {
            sql.push("IGNORE".to_string());
        }
        sql.push(table_refs.join(" "));
        sql.push("SET".to_string());
        sql.push(assignments.join(", "));

        if let Some(cond) = self.where_clause.render(&self.config, &mut params)? {
            sql.push("WHERE".to_string());
            sql.push(cond);
        }

        if !self.order_by.is_empty() {
            sql.push("ORDER BY".to_string());
            sql.push(self.order_by.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push(format!("LIMIT {limit}"));
        }

        Ok(Built::new(sql.join(" "), params))
    }
}
