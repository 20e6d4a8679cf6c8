//! SELECT ... UNION statement builder.

use crate::config::StmtConfig;
use crate::error::{StmtError, StmtResult};
use crate::param::ParamList;
use crate::stmt::select::Select;
use crate::stmt::traits::{Built, SqlStmt, StmtKind};
use crate::stmt::{config_methods, limit_clause};

#[derive(Clone, Debug)]
enum UnionPart {
    Select(Box<Select>),
    Raw(String),
}

/// `(SELECT ..) UNION (SELECT ..)` builder.
#[derive(Clone, Debug)]
pub struct Union {
    config: StmtConfig,
    options: Vec<String>,
    /// `Some(false)` joins the parts with `UNION ALL`.
    distinct: Option<bool>,
    parts: Vec<UnionPart>,
    order_by: Vec<String>,
    limit: Option<(u64, u64)>,
}

impl Default for Union {
    fn default() -> Self {
        Self::new()
    }
}

impl Union {
    pub fn new() -> Self {
        Self {
            config: StmtConfig::default(),
            options: Vec::new(),
            distinct: None,
            parts: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    config_methods!();

    /// Add a SELECT; its parameters are bound in position.
    pub fn select(mut self, select: Select) -> Self {
        self.parts.push(UnionPart::Select(Box::new(select)));
        self
    }

    /// Add a verbatim `SELECT ..`.
    pub fn select_raw(mut self, sql: impl Into<String>) -> Self {
        self.parts.push(UnionPart::Raw(sql.into()));
        self
    }

    /// `false` keeps duplicates (`UNION ALL`).
    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = Some(distinct);
        self
    }

    pub fn order_by(mut self, expr: &str) -> Self {
        self.order_by.push(expr.to_string());
        self
    }

    pub fn limit(mut self, row_count: u64) -> Self {
        self.limit = Some((row_count, 0));
        self
    }

    pub fn limit_offset(mut self, row_count: u64, offset: u64) -> Self {
        self.limit = Some((row_count, offset));
        self
    }
}

impl SqlStmt for Union {
    fn kind(&self) -> StmtKind {
        StmtKind::Union
    }

    fn stmt_config(&self) -> &StmtConfig {
        &self.config
    }

    fn validate(&self) -> StmtResult<()> {
        if self.parts.is_empty() {
            return Err(StmtError::invalid_argument("No SELECT statements are specified"));
        }
        Ok(())
    }

    fn assemble(&self) -> StmtResult<Built> {
        let mut params = ParamList::new();
        let mut sql: Vec<String> = self.options.clone();

        let keyword = if self.distinct == Some(false) {
            "UNION ALL"
        } else {
            "UNION"
        };

        for (i, part) in self.parts.iter().enumerate() {
            let part_sql = match part {
                UnionPart::Select(select) => {
                    let built = select.build()?;
                    if let Some(bound) = built.params {
                        params.extend(bound.into_flat()?);
                    }
                    built.sql
                }
                UnionPart::Raw(raw) => raw.clone(),
            };
            if i > 0 {
                sql.push(keyword.to_string());
            }
            sql.push(format!("({part_sql})"));
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
}
