//! INSERT / REPLACE statement builder.

use crate::config::StmtConfig;
use crate::error::{StmtError, StmtResult};
use crate::ident::quote_col_ref;
use crate::param::{ParamList, parameterize};
use crate::stmt::select::Select;
use crate::stmt::set_values::SetValues;
use crate::stmt::traits::{Built, SqlStmt, StmtKind};
use crate::stmt::where_clause::collect_values;
use crate::stmt::{check_error, config_methods, record_error};
use crate::value::{Operand, Value};

/// Row source of an INSERT...SELECT.
#[derive(Clone, Debug)]
enum InsertSource {
    Select(Box<Select>),
    Raw(String),
}

/// INSERT (or REPLACE) statement builder.
///
/// Rows come from exactly one source: column assignments (`set_value` / `set_raw_value`),
/// batch rows (`set_batch_value`) or a SELECT.
#[derive(Clone, Debug)]
pub struct Insert {
    config: StmtConfig,
    options: Vec<String>,
    replace: bool,
    ignore_error: bool,
    select_allow_placeholders: bool,
    table: Option<String>,
    /// Explicit column list (batch rows and INSERT...SELECT)
    columns: Vec<String>,
    values: SetValues,
    batch_values: Vec<Vec<Value>>,
    source: Option<InsertSource>,
    build_error: Option<StmtError>,
}

impl Default for Insert {
    fn default() -> Self {
        Self::new()
    }
}

impl Insert {
    /// Create an INSERT builder.
    pub fn new() -> Self {
        Self {
            config: StmtConfig::default(),
            options: Vec::new(),
            replace: false,
            ignore_error: false,
            select_allow_placeholders: false,
            table: None,
            columns: Vec::new(),
            values: SetValues::default(),
            batch_values: Vec::new(),
            source: None,
            build_error: None,
        }
    }

    /// Create a REPLACE builder; it shares every INSERT rule.
    pub fn replace() -> Self {
        Self {
            replace: true,
            ..Self::new()
        }
    }

    config_methods!();

    /// Set the target table.
    pub fn into_table(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    /// Emit IGNORE.
    pub fn ignore_error(mut self, enabled: bool) -> Self {
        self.ignore_error = enabled;
        self
    }

    /// Allow a SELECT source that binds its own parameters.
    pub fn select_allow_placeholders(mut self, enabled: bool) -> Self {
        self.select_allow_placeholders = enabled;
        self
    }

    /// Add an explicit column.
    pub fn column(mut self, name: &str) -> Self {
        self.columns.push(name.to_string());
        self
    }

    /// Add explicit columns.
    pub fn columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(names.into_iter().map(Into::into));
        self
    }

    /// Assign a value to a column.
    pub fn set_value(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.values.set_value(column, value.into());
        self
    }

    /// Assign verbatim SQL (`NOW()`) to a column.
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

    /// Append rows for a multi-row insert; each row has one value per explicit column.
    pub fn set_batch_value<I, R>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator,
        R::Item: Into<Value>,
    {
        self.batch_values
            .extend(rows.into_iter().map(collect_values));
        self
    }

    /// Insert the rows of a SELECT.
    pub fn select(mut self, select: Select) -> Self {
        self.source = Some(InsertSource::Select(Box::new(select)));
        self
    }

    /// Insert the rows of a verbatim SELECT.
    pub fn select_raw(mut self, sql: impl Into<String>) -> Self {
        self.source = Some(InsertSource::Raw(sql.into()));
        self
    }

    fn quoted_columns<'a>(&self, columns: impl IntoIterator<Item = &'a str>) -> String {
        let cols: Vec<String> = columns
            .into_iter()
            .map(|c| quote_col_ref(c, self.config.quote_all_col_refs))
            .collect();
        format!("({})", cols.join(", "))
    }

    fn render_set_values(&self, sql: &mut Vec<String>) -> StmtResult<Built> {
        if !self.columns.is_empty() {
            return Err(StmtError::invalid_argument(
                "columns cannot be explicitly set when set_value or set_raw_value is used",
            ));
        }
        if !self.batch_values.is_empty() {
            return Err(StmtError::invalid_argument(
                "set_batch_value is incompatible with set_value and set_raw_value",
            ));
        }
        if self.source.is_some() {
            return Err(StmtError::invalid_argument(
                "set_value and set_raw_value are incompatible with INSERT...SELECT",
            ));
        }

        let mut params = ParamList::new();
        let assignments = self.values.render(&self.config, &mut params)?;
        sql.push(self.quoted_columns(assignments.iter().map(|(col, _)| *col)));

        let inline: Vec<&str> = assignments.iter().map(|(_, v)| v.as_str()).collect();
        sql.push(format!("VALUES ({})", inline.join(", ")));

        Ok(Built::new(sql.join(" "), params))
    }

    fn render_batch(&self, sql: &mut Vec<String>) -> StmtResult<Built> {
        if self.columns.is_empty() {
            return Err(StmtError::invalid_argument(
                "columns must be explicitly set when set_batch_value is used",
            ));
        }
        if self.source.is_some() {
            return Err(StmtError::invalid_argument(
                "set_batch_value is incompatible with INSERT...SELECT",
            ));
        }
        for (i, row) in self.batch_values.iter().enumerate() {
            if row.len() != self.columns.len() {
                return Err(StmtError::invalid_argument(format!(
                    "Batch row {i} has {} values, expected {}",
                    row.len(),
                    self.columns.len()
                )));
            }
        }

        sql.push(self.quoted_columns(self.columns.iter().map(String::as_str)));

        match self.config.placeholder() {
            Some(token) => {
                let group = vec![token; self.columns.len()].join(", ");
                sql.push(format!("VALUES ({group})"));

                let mut rows = Vec::with_capacity(self.batch_values.len());
                for row in &self.batch_values {
                    let mut row_params = ParamList::new();
                    parameterize(&self.config, &Operand::List(row.clone()), None, Some(&mut row_params))?;
                    rows.push(row_params);
                }
                Ok(Built::batch(sql.join(" "), rows))
            }
            None => {
                let mut groups = Vec::with_capacity(self.batch_values.len());
                for row in &self.batch_values {
                    let mut inline = Vec::with_capacity(row.len());
                    parameterize(&self.config, &Operand::List(row.clone()), Some(&mut inline), None)?;
                    groups.push(format!("({})", inline.join(", ")));
                }
                sql.push(format!("VALUES {}", groups.join(", ")));
                Ok(Built::new(sql.join(" "), ParamList::new()))
            }
        }
    }

    fn render_select(&self, source: &InsertSource, sql: &mut Vec<String>) -> StmtResult<Built> {
        if self.columns.is_empty() {
            return Err(StmtError::invalid_argument("No columns are specified"));
        }
        sql.push(self.quoted_columns(self.columns.iter().map(String::as_str)));

        let mut params = ParamList::new();
        match source {
            InsertSource::Select(select) => {
                let built = select.build()?;
                if let Some(bound) = built.params {
                    if !self.select_allow_placeholders {
                        return Err(StmtError::invalid_argument(
                            "INSERT...SELECT cannot use parameterized SELECT",
                        ));
                    }
                    params.extend(bound.into_flat()?);
                }
                sql.push(built.sql);
            }
            InsertSource::Raw(raw) => sql.push(raw.clone()),
        }

        Ok(Built::new(sql.join(" "), params))
    }
}

impl SqlStmt for Insert {
    fn kind(&self) -> StmtKind {
        if self.replace {
            StmtKind::Replace
        } else {
            StmtKind::Insert
        }
    }

    fn stmt_config(&self) -> &StmtConfig {
        &self.config
    }

    fn validate(&self) -> StmtResult<()> {
        check_error(&self.build_error)?;
        if self.table.as_deref().is_none_or(str::is_empty) {
            return Err(StmtError::invalid_argument("No table is specified"));
        }
        Ok(())
    }

    fn assemble(&self) -> StmtResult<Built> {
        let table = self
            .table
            .as_deref()
            .ok_or_else(|| StmtError::invalid_argument("No table is specified"))?;

        let mut sql = vec![self.kind().as_str().to_string()];
        sql.extend(self.options.iter().cloned());
        if self.ignore_error {
            sql.push("IGNORE".to_string());
        }
        sql.push("INTO".to_string());
        sql.push(table.to_string());

        if !self.values.is_empty() {
            self.render_set_values(&mut sql)
        } else if !self.batch_values.is_empty() {
            self.render_batch(&mut sql)
        } else if let Some(source) = &self.source {
            self.render_select(source, &mut sql)
        } else {
            Err(StmtError::invalid_argument("No values are specified"))
        }
    }
}
