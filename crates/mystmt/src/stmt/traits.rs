//! Trait definitions and output types shared by all statement builders.

use crate::config::StmtConfig;
use crate::error::{StmtError, StmtResult};
use crate::param::ParamList;
use crate::trace;
use crate::value::Value;
use serde::Serialize;
use std::fmt;

/// Statement category, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtKind {
    Select,
    Insert,
    Replace,
    Update,
    Delete,
    Union,
    Lock,
}

impl StmtKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StmtKind::Select => "SELECT",
            StmtKind::Insert => "INSERT",
            StmtKind::Replace => "REPLACE",
            StmtKind::Update => "UPDATE",
            StmtKind::Delete => "DELETE",
            StmtKind::Union => "UNION",
            StmtKind::Lock => "LOCK",
        }
    }
}

impl fmt::Display for StmtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base trait for all statement builders.
///
/// Implementors provide [`assemble`](SqlStmt::assemble); callers use [`build`](SqlStmt::build)
/// or [`sql`](SqlStmt::sql), which validate first.
pub trait SqlStmt: fmt::Debug {
    /// Statement category.
    fn kind(&self) -> StmtKind;

    /// Settings this statement renders with.
    fn stmt_config(&self) -> &StmtConfig;

    /// Validate builder state before rendering.
    fn validate(&self) -> StmtResult<()> {
        Ok(())
    }

    /// Render SQL and bound parameters without validating.
    fn assemble(&self) -> StmtResult<Built>;

    /// Validate and render: the SQL text plus bound parameters (`None` when nothing is bound).
    fn build(&self) -> StmtResult<Built> {
        let result = self.validate().and_then(|()| self.assemble());
        trace::built(self.kind(), &result);
        result
    }

    /// Validate and render in the placeholder-dependent shape, see [`StmtOutput`].
    fn sql(&self) -> StmtResult<StmtOutput> {
        let built = self.build()?;
        Ok(built.into_output(self.stmt_config()))
    }

    /// Debug helper to get the SQL string.
    fn to_sql(&self) -> StmtResult<String> {
        self.build().map(|built| built.sql)
    }
}

/// Parameters bound to a statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BoundParams {
    /// One value per placeholder.
    Flat(ParamList),
    /// One row per execution of a batch INSERT.
    Batch(Vec<ParamList>),
}

impl BoundParams {
    /// Number of values, or of rows for a batch.
    pub fn len(&self) -> usize {
        match self {
            BoundParams::Flat(list) => list.len(),
            BoundParams::Batch(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_flat(&self) -> Option<&ParamList> {
        match self {
            BoundParams::Flat(list) => Some(list),
            BoundParams::Batch(_) => None,
        }
    }

    /// The flat list; a batch cannot be embedded in another statement.
    pub fn into_flat(self) -> StmtResult<ParamList> {
        match self {
            BoundParams::Flat(list) => Ok(list),
            BoundParams::Batch(_) => Err(StmtError::invalid_state(
                "Batch parameters cannot be embedded in another statement",
            )),
        }
    }
}

/// The result of building a statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Built {
    pub sql: String,
    pub params: Option<BoundParams>,
}

impl Built {
    /// Create a built statement; an empty list becomes `None`.
    pub fn new(sql: String, params: ParamList) -> Self {
        let params = (!params.is_empty()).then_some(BoundParams::Flat(params));
        Self { sql, params }
    }

    /// Create a built batch statement; no rows becomes `None`.
    pub fn batch(sql: String, rows: Vec<ParamList>) -> Self {
        let params = (!rows.is_empty()).then_some(BoundParams::Batch(rows));
        Self { sql, params }
    }

    pub fn param_count(&self) -> usize {
        self.params.as_ref().map_or(0, BoundParams::len)
    }

    /// Flat parameter values; empty for batches and unbound statements.
    pub fn values(&self) -> &[Value] {
        match &self.params {
            Some(BoundParams::Flat(list)) => list.as_slice(),
            _ => &[],
        }
    }

    /// Shape the output by whether `config` has a placeholder.
    ///
    /// Explicit raw-value params are bound even without a placeholder, so any bound
    /// parameter keeps the `Bound` shape.
    pub fn into_output(self, config: &StmtConfig) -> StmtOutput {
        if config.placeholder().is_some() || self.params.is_some() {
            StmtOutput::Bound {
                sql: self.sql,
                params: self.params,
            }
        } else {
            StmtOutput::Sql(self.sql)
        }
    }
}

/// Output of [`SqlStmt::sql`]: SQL with parameters when parameterization is enabled, the
/// SQL text alone when it is disabled and nothing was bound.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtOutput {
    Sql(String),
    Bound {
        sql: String,
        params: Option<BoundParams>,
    },
}

impl StmtOutput {
    pub fn sql(&self) -> &str {
        match self {
            StmtOutput::Sql(sql) | StmtOutput::Bound { sql, .. } => sql,
        }
    }

    pub fn params(&self) -> Option<&BoundParams> {
        match self {
            StmtOutput::Sql(_) => None,
            StmtOutput::Bound { params, .. } => params.as_ref(),
        }
    }
}
