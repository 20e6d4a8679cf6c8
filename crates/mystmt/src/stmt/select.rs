//! SELECT statement builder.

use crate::condition::Conjunction;
use crate::config::StmtConfig;
use crate::error::{StmtError, StmtResult};
use crate::ident::{quote_col_ref, split_alias, table_alias};
use crate::param::{ParamList, quote};
use crate::stmt::join::{JoinCond, JoinList};
use crate::stmt::traits::{Built, SqlStmt, StmtKind};
use crate::stmt::where_clause::{WhereClause, collect_values, where_methods};
use crate::stmt::{check_error, config_methods, limit_clause, record_error};
use crate::value::{Operand, Value};

/// One entry of the SELECT list.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectColumn {
    expr: String,
    alias: Option<String>,
    params: Option<Vec<Value>>,
    quote: bool,
    raw: bool,
}

impl SelectColumn {
    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Whether the expression is emitted verbatim instead of as a column reference.
    pub fn is_raw(&self) -> bool {
        self.raw
    }

    fn matches(&self, name: &str) -> bool {
        self.expr == name || self.alias.as_deref() == Some(name)
    }
}

#[derive(Clone, Debug)]
enum TableFactor {
    Table { name: String, alias: Option<String> },
    Subselect { select: Box<Select>, alias: String },
}

/// SELECT statement builder.
#[derive(Clone, Debug)]
pub struct Select {
    config: StmtConfig,
    /// Query options (DISTINCT, HIGH_PRIORITY, ...)
    options: Vec<String>,
    /// SQL_CACHE / SQL_NO_CACHE override
    cacheable: Option<bool>,
    calc_found_rows: bool,
    /// FROM table factors
    table_factors: Vec<TableFactor>,
    /// SELECT list (default `*`)
    columns: Vec<SelectColumn>,
    joins: JoinList,
    where_clause: WhereClause,
    group_by: Vec<String>,
    having_clause: WhereClause,
    order_by: Vec<String>,
    /// (row_count, offset)
    limit: Option<(u64, u64)>,
    build_error: Option<StmtError>,
}

impl Default for Select {
    fn default() -> Self {
        Self::new()
    }
}

impl Select {
    /// Create an empty SELECT builder with default settings.
    pub fn new() -> Self {
        Self {
            config: StmtConfig::default(),
            options: Vec::new(),
            cacheable: None,
            calc_found_rows: false,
            table_factors: Vec::new(),
            columns: Vec::new(),
            joins: JoinList::new(),
            where_clause: WhereClause::default(),
            group_by: Vec::new(),
            having_clause: WhereClause::default(),
            order_by: Vec::new(),
            limit: None,
            build_error: None,
        }
    }

    config_methods!();

    // ==================== FROM ====================

    /// Add a table to the FROM list.
    pub fn from_table(mut self, table: &str) -> Self {
        self.table_factors.push(TableFactor::Table {
            name: table.to_string(),
            alias: None,
        });
        self
    }

    /// Add a table with an alias: ``t1 AS `a` ``.
    pub fn from_table_as(mut self, table: &str, alias: &str) -> Self {
        self.table_factors.push(TableFactor::Table {
            name: table.to_string(),
            alias: Some(alias.to_string()),
        });
        self
    }

    /// Add several tables.
    pub fn from_tables<I, S>(self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tables
            .into_iter()
            .fold(self, |select, table| select.from_table(table.as_ref()))
    }

    /// Add a derived table: ``(SELECT ..) AS `alias` ``. Its parameters are bound in place.
    pub fn from_select(mut self, select: Select, alias: &str) -> Self {
        self.table_factors.push(TableFactor::Subselect {
            select: Box::new(select),
            alias: alias.to_string(),
        });
        self
    }

    // ==================== SELECT list ====================

    /// Add a column reference; `"col AS alias"` is split into column and alias.
    pub fn column(mut self, name: &str) -> Self {
        let (expr, alias) = split_alias(name);
        self.push_column(expr, alias, None, false, false);
        self
    }

    /// Add several column references.
    pub fn columns<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .fold(self, |select, name| select.column(name.as_ref()))
    }

    /// Add a column reference with an alias.
    pub fn column_as(mut self, name: &str, alias: &str) -> Self {
        self.push_column(name, Some(alias), None, false, false);
        self
    }

    /// Add a verbatim expression (`COUNT(*)`, `NOW() AS now`).
    pub fn column_expr(mut self, expr: &str) -> Self {
        let (expr, alias) = split_alias(expr);
        self.push_column(expr, alias, None, false, true);
        self
    }

    /// Add a verbatim expression with an alias.
    pub fn column_expr_as(mut self, expr: &str, alias: &str) -> Self {
        self.push_column(expr, Some(alias), None, false, true);
        self
    }

    /// Add a verbatim expression whose placeholders are bound to `params`.
    pub fn column_expr_params<I>(mut self, expr: &str, params: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let (expr, alias) = split_alias(expr);
        self.push_column(expr, alias, Some(collect_values(params)), false, true);
        self
    }

    /// Select a quoted string literal: ``'value' AS `alias` ``.
    pub fn column_literal(mut self, value: &str, alias: &str) -> Self {
        self.push_column(value, Some(alias), None, true, true);
        self
    }

    fn push_column(
        &mut self,
        expr: &str,
        alias: Option<&str>,
        params: Option<Vec<Value>>,
        quote: bool,
        raw: bool,
    ) {
        let name = alias.unwrap_or(expr);
        if self.is_selected(name) {
            let err = StmtError::invalid_argument(format!("Column '{name}' already exists"));
            record_error(&mut self.build_error, Err(err));
            return;
        }
        self.columns.push(SelectColumn {
            expr: expr.to_string(),
            alias: alias.map(str::to_string),
            params,
            quote,
            raw,
        });
    }

    /// Whether a column is selected under `name`, as expression or alias.
    pub fn is_selected(&self, name: &str) -> bool {
        self.get_column(name).is_some()
    }

    /// Find a column by expression or alias, with or without backticks.
    pub fn get_column(&self, name: &str) -> Option<&SelectColumn> {
        let quoted = quote_col_ref(name, self.config.quote_all_col_refs);
        [name, quoted.as_str()]
            .into_iter()
            .find_map(|candidate| self.columns.iter().find(|c| c.matches(candidate)))
    }

    /// The selected columns, in order.
    pub fn selected_columns(&self) -> &[SelectColumn] {
        &self.columns
    }

    /// Remove every column whose expression or alias is `name`.
    pub fn remove_column(mut self, name: &str) -> Self {
        self.columns.retain(|c| !c.matches(name));
        self
    }

    /// Remove several columns.
    pub fn remove_columns<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .fold(self, |select, name| select.remove_column(name.as_ref()))
    }

    /// Prefix unqualified columns with `table.`; only those listed in `only`, if given.
    pub fn qualify_columns(mut self, table: &str, only: Option<&[&str]>) -> Self {
        for col in &mut self.columns {
            let wanted = only.is_none_or(|names| names.contains(&col.expr.as_str()));
            if wanted && !col.expr.contains('.') {
                col.expr = format!("{table}.{}", col.expr);
            }
        }
        self
    }

    // ==================== Options ====================

    /// Add the DISTINCT option.
    pub fn distinct(self) -> Self {
        self.set_option("DISTINCT")
    }

    /// Emit SQL_CACHE (`true`) or SQL_NO_CACHE (`false`), overriding the config default.
    pub fn cacheable(mut self, cacheable: bool) -> Self {
        self.cacheable = Some(cacheable);
        self
    }

    /// Emit SQL_CALC_FOUND_ROWS.
    pub fn calc_found_rows(mut self, enabled: bool) -> Self {
        self.calc_found_rows = enabled;
        self
    }

    // ==================== JOIN ====================

    /// Add an INNER JOIN.
    pub fn join(self, table: &str, cond: impl Into<JoinCond>) -> Self {
        self.join_with_type(table, cond, "INNER")
    }

    /// Add a LEFT JOIN.
    pub fn left_join(self, table: &str, cond: impl Into<JoinCond>) -> Self {
        self.join_with_type(table, cond, "LEFT")
    }

    /// Add a join of any type (`RIGHT`, `CROSS`, `STRAIGHT_JOIN`, ...).
    pub fn join_with_type(mut self, table: &str, cond: impl Into<JoinCond>, join_type: &str) -> Self {
        self.joins.push(table, cond.into(), join_type);
        self
    }

    where_methods!();

    // ==================== Ordering & Grouping ====================

    /// Add GROUP BY expressions.
    pub fn group_by(mut self, expr: &str) -> Self {
        self.group_by.push(expr.to_string());
        self
    }

    /// Add ORDER BY expressions (`col DESC`).
    pub fn order_by(mut self, expr: &str) -> Self {
        self.order_by.push(expr.to_string());
        self
    }

    // ==================== HAVING conditions ====================

    /// Compare `field` with `value` (`=`) in the active HAVING group.
    pub fn having_value(self, field: &str, value: impl Into<Operand>) -> Self {
        self.having_value_op(field, value, "=")
    }

    pub fn having_value_op(mut self, field: &str, value: impl Into<Operand>, op: &str) -> Self {
        self.having_clause.value(field, value, op);
        self
    }

    pub fn having_values<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Operand>,
    {
        for (field, value) in pairs {
            self.having_clause.value(field.as_ref(), value, "=");
        }
        self
    }

    pub fn having_raw_value(self, field: &str, raw: impl Into<String>) -> Self {
        self.having_raw_value_op(field, raw, "=")
    }

    pub fn having_raw_value_op(mut self, field: &str, raw: impl Into<String>, op: &str) -> Self {
        let result = self.having_clause.raw_value(field, raw, op, None);
        record_error(&mut self.build_error, result);
        self
    }

    pub fn having_raw_value_params<I>(
        mut self,
        field: &str,
        raw: impl Into<String>,
        op: &str,
        params: I,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let result = self
            .having_clause
            .raw_value(field, raw, op, Some(collect_values(params)));
        record_error(&mut self.build_error, result);
        self
    }

    pub fn having_expr(mut self, expr: impl Into<String>) -> Self {
        self.having_clause.expr(expr, None);
        self
    }

    pub fn having_expr_params<I>(mut self, expr: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.having_clause.expr(expr, Some(collect_values(params)));
        self
    }

    /// Open a new AND group in HAVING.
    pub fn having_and(mut self) -> Self {
        self.having_clause.open_group(Conjunction::And, false);
        self
    }

    /// Open a new OR group in HAVING.
    pub fn having_or(mut self) -> Self {
        self.having_clause.open_group(Conjunction::Or, false);
        self
    }

    pub fn having_group(mut self, conjunction: Conjunction, negated: bool) -> Self {
        self.having_clause.open_group(conjunction, negated);
        self
    }

    /// Set how top-level HAVING groups are combined (default OR).
    pub fn having_conjunction(mut self, outer: Conjunction) -> Self {
        self.having_clause.set_conjunction(outer);
        self
    }

    pub fn having_clause(&self) -> &WhereClause {
        &self.having_clause
    }

    pub fn having_clause_mut(&mut self) -> &mut WhereClause {
        &mut self.having_clause
    }

    // ==================== Pagination ====================

    /// Set LIMIT row_count.
    pub fn limit(mut self, row_count: u64) -> Self {
        self.limit = Some((row_count, 0));
        self
    }

    /// Set LIMIT offset,row_count.
    pub fn limit_offset(mut self, row_count: u64, offset: u64) -> Self {
        self.limit = Some((row_count, offset));
        self
    }

    // ==================== Build helpers ====================

    fn render_table_factors(&self, params: &mut ParamList) -> StmtResult<Option<String>> {
        if self.table_factors.is_empty() {
            return Ok(None);
        }

        let named = |sql: String, alias: Option<&str>| match alias {
            Some(alias) => format!("{sql} AS {}", quote_col_ref(alias, self.config.quote_all_col_refs)),
            None => sql,
        };

        let mut factors = Vec::with_capacity(self.table_factors.len());
        for factor in &self.table_factors {
            match factor {
                TableFactor::Table { name, alias } => factors.push(named(name.clone(), alias.as_deref())),
                TableFactor::Subselect { select, alias } => {
                    let built = select.build()?;
                    if let Some(bound) = built.params {
                        params.extend(bound.into_flat()?);
                    }
                    factors.push(named(format!("({})", built.sql), Some(alias.as_str())));
                }
            }
        }

        let mut refs = vec![factors.join(", ")];

        if !self.joins.is_empty() {
            let root = match &self.table_factors[0] {
                TableFactor::Table { name, alias } => alias.as_deref().unwrap_or(name),
                TableFactor::Subselect { .. } => {
                    return Err(StmtError::invalid_state(
                        "Root table must be a table name when using joins",
                    ));
                }
            };
            refs.extend(self.joins.render(root, &self.config));
        }

        Ok(Some(refs.join(" ")))
    }

    fn render_columns(&self, params: &mut ParamList) -> String {
        if self.columns.is_empty() {
            return "*".to_string();
        }

        let cols: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                let mut expr = if !c.raw {
                    quote_col_ref(&c.expr, self.config.quote_all_col_refs)
                } else if c.quote {
                    quote(&c.expr)
                } else {
                    c.expr.clone()
                };
                if let Some(alias) = &c.alias {
                    expr.push_str(" AS ");
                    expr.push_str(&quote_col_ref(alias, self.config.quote_all_col_refs));
                }
                if let Some(extra) = &c.params {
                    params.extend_values(extra.iter().cloned());
                }
                expr
            })
            .collect();
        cols.join(", ")
    }

    /// Build the SELECT SQL.
    fn build_select_sql(&self) -> StmtResult<Built> {
        let mut params = ParamList::new();
        let mut sql = vec!["SELECT".to_string()];

        sql.extend(self.options.iter().cloned());

        match self.cacheable.or(self.config.select_cacheable) {
            Some(true) => sql.push("SQL_CACHE".to_string()),
            Some(false) => sql.push("SQL_NO_CACHE".to_string()),
            None => {}
        }

        if self.calc_found_rows {
            sql.push("SQL_CALC_FOUND_ROWS".to_string());
        }

        sql.push(self.render_columns(&mut params));

        if let Some(from) = self.render_table_factors(&mut params)? {
            sql.push("FROM".to_string());
            sql.push(from);
        }

        if let Some(cond) = self.where_clause.render(&self.config, &mut params)? {
            sql.push("WHERE".to_string());
            sql.push(cond);
        }

        if !self.group_by.is_empty() {
            sql.push("GROUP BY".to_string());
            sql.push(self.group_by.join(", "));
        }

        if let Some(cond) = self.having_clause.render(&self.config, &mut params)? {
            sql.push("HAVING".to_string());
            sql.push(cond);
        }

        if !self.order_by.is_empty() {
            sql.push("ORDER BY".to_string());
            sql.push(self.order_by.join(", "));
        }

        if let Some((row_count, offset)) = self.limit {
            sql.push(limit_clause(row_count, offset));
        }

        Ok(Built::new(sql.join(" "), params))
    }

    /// Root table alias used by joins, if any.
    pub fn root_table_alias(&self) -> Option<&str> {
        match self.table_factors.first()? {
            TableFactor::Table { name, alias } => Some(alias.as_deref().unwrap_or(table_alias(name))),
            TableFactor::Subselect { alias, .. } => Some(alias),
        }
    }
}

impl SqlStmt for Select {
    fn kind(&self) -> StmtKind {
        StmtKind::Select
    }

    fn stmt_config(&self) -> &StmtConfig {
        &self.config
    }

    fn validate(&self) -> StmtResult<()> {
        check_error(&self.build_error)?;
        if !self.joins.is_empty() && self.table_factors.is_empty() {
            return Err(StmtError::invalid_state(
                "A root table must be specified when using joins",
            ));
        }
        Ok(())
    }

    fn assemble(&self) -> StmtResult<Built> {
        self.build_select_sql()
    }
}
