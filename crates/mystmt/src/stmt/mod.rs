//! Statement builders for MySQL.
//!
//! Every builder is consuming and chainable, owns its [`StmtConfig`](crate::StmtConfig), and
//! implements [`SqlStmt`]. Argument errors found while chaining are kept and reported by
//! `build()`, so a chain never has to be interrupted.
//!
//! # Usage
//!
//! ```ignore
//! use mystmt::{SqlStmt, select_from, insert_into, update, delete_from};
//!
//! // SELECT * FROM t1 WHERE (`t1c1` = 3 AND `t1c2` = ?)   params: ["string"]
//! let built = select_from("t1")
//!     .where_value("t1c1", 3)
//!     .where_value("t1c2", "string")
//!     .build()?;
//!
//! // INSERT INTO t1 (`t1c1`, `t1c2`) VALUES (?, NULL)    params: ["a"]
//! let built = insert_into("t1")
//!     .set_value("t1c1", "a")
//!     .set_value("t1c2", None::<i32>)
//!     .build()?;
//!
//! // UPDATE t1 SET `t1c1`=? WHERE `t1c2` = 5            params: ["a"]
//! let built = update("t1").set_value("t1c1", "a").where_value("t1c2", 5).build()?;
//!
//! // DELETE FROM t1 WHERE `t1c1` IN (1, 2)
//! let built = delete_from("t1").where_value("t1c1", [1, 2]).build()?;
//! ```

mod delete;
mod insert;
mod join;
mod lock;
mod select;
mod set_values;
mod traits;
mod union;
mod update;
pub mod where_clause;

pub use delete::Delete;
pub use insert::Insert;
pub use join::{JoinCond, JoinList};
pub use lock::{Lock, LockAction};
pub use select::{Select, SelectColumn};
pub use traits::{BoundParams, Built, SqlStmt, StmtKind, StmtOutput};
pub use union::Union;
pub use update::Update;
pub use where_clause::WhereClause;

use crate::error::{StmtError, StmtResult};

/// Keep the first error reported while chaining builder calls.
pub(crate) fn record_error(slot: &mut Option<StmtError>, result: StmtResult<()>) {
    if let Err(err) = result {
        slot.get_or_insert(err);
    }
}

/// Surface a recorded builder error.
pub(crate) fn check_error(slot: &Option<StmtError>) -> StmtResult<()> {
    match slot {
        Some(err) => Err(err.clone()),
        None => Ok(()),
    }
}

/// `LIMIT offset,count` when an offset is set, else `LIMIT count`.
pub(crate) fn limit_clause(row_count: u64, offset: u64) -> String {
    if offset > 0 {
        format!("LIMIT {offset},{row_count}")
    } else {
        format!("LIMIT {row_count}")
    }
}

/// Config and query-option methods for statements with `config` and `options` fields.
macro_rules! config_methods {
    () => {
        // ==================== Settings ====================

        /// Replace this statement's settings.
        pub fn with_config(mut self, config: $crate::StmtConfig) -> Self {
            self.config = config;
            self
        }

        /// Bind values to `token` placeholders.
        pub fn placeholder(mut self, token: &str) -> Self {
            self.config = self.config.with_placeholder(token);
            self
        }

        /// Render every value inline.
        pub fn no_placeholder(mut self) -> Self {
            self.config = self.config.without_placeholder();
            self
        }

        /// Single-quote inline values that would otherwise be bound.
        pub fn quote_all_values(mut self, enabled: bool) -> Self {
            self.config.quote_all_values = enabled;
            self
        }

        /// Wrap column references in backticks.
        pub fn quote_all_col_refs(mut self, enabled: bool) -> Self {
            self.config.quote_all_col_refs = enabled;
            self
        }

        /// Add a query option, emitted right after the leading keyword (`DISTINCT`,
        /// `LOW_PRIORITY`, `HIGH_PRIORITY`, ...).
        pub fn set_option(mut self, option: &str) -> Self {
            self.options.push(option.to_string());
            self
        }

        /// Add several query options in order.
        pub fn set_options<I, S>(mut self, options: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.options.extend(options.into_iter().map(Into::into));
            self
        }
    };
}

pub(crate) use config_methods;
