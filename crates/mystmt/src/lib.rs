//! # mystmt
//!
//! A MySQL statement builder: SQL text plus bound parameters, no connection required.
//!
//! ## Features
//!
//! - **Condition trees**: AND/OR groups, negation, `IN` lists, `IS NULL`, raw SQL and subqueries
//! - **Placeholders by default**: values are bound as `?` parameters in placeholder order
//! - **Inline mode**: render every value into the SQL text (`no_placeholder`)
//! - **Safe defaults**: DELETE requires WHERE unless explicitly allowed
//! - **Deferred errors**: argument errors surface from `build()`, never mid-chain
//!
//! ## Statements
//!
//! ```ignore
//! use mystmt::{SqlStmt, select_from, insert_into, update, delete_from};
//!
//! // SELECT * FROM t1 WHERE `t1c1` = 1
//! let built = select_from("t1").where_value("t1c1", 1).build()?;
//!
//! // INSERT INTO t1 (`t1c1`, `t1c2`) VALUES (?, NULL)
//! let built = insert_into("t1")
//!     .set_value("t1c1", "a")
//!     .set_value("t1c2", None::<i64>)
//!     .build()?;
//!
//! // UPDATE t1 SET `t1c1`=PASSWORD(?) WHERE `t1c2` = 5
//! let built = update("t1")
//!     .set_raw_value_params("t1c1", "PASSWORD(?)", ["mypw"])
//!     .where_value("t1c2", 5)
//!     .build()?;
//!
//! // DELETE FROM t1 WHERE `t1c1` NOT IN (1, 2, 3)
//! let built = delete_from("t1").where_value_op("t1c1", [1, 2, 3], "NOT IN").build()?;
//! ```

pub mod condition;
pub mod config;
pub mod error;
pub mod ident;
pub mod param;
pub mod stmt;
mod trace;
pub mod value;

pub use condition::{ConditionNode, ConditionTree, Conjunction, NodeId};
pub use config::StmtConfig;
pub use error::{StmtError, StmtResult};
pub use ident::{quote_col_ref, table_alias};
pub use param::{ParamList, parameterize, quote};
pub use value::{Operand, Pickled, Value};

pub use stmt::{
    BoundParams, Built, Delete, Insert, JoinCond, Lock, LockAction, Select, SelectColumn, SqlStmt,
    StmtKind, StmtOutput, Union, Update, WhereClause,
};

/// Create an empty SELECT builder.
pub fn select() -> Select {
    Select::new()
}

/// Create a SELECT builder for `table`.
pub fn select_from(table: &str) -> Select {
    Select::new().from_table(table)
}

/// Create an INSERT builder for `table`.
pub fn insert_into(table: &str) -> Insert {
    Insert::new().into_table(table)
}

/// Create a REPLACE builder for `table`.
pub fn replace_into(table: &str) -> Insert {
    Insert::replace().into_table(table)
}

/// Create an UPDATE builder for `table`.
pub fn update(table: &str) -> Update {
    Update::new().table(table)
}

/// Create a DELETE builder for `table`.
pub fn delete_from(table: &str) -> Delete {
    Delete::new().from_table(table)
}

/// Create an empty UNION builder.
pub fn union() -> Union {
    Union::new()
}

/// Create a named lock builder.
pub fn lock(name: &str) -> Lock {
    Lock::new(name)
}
