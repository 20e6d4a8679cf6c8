//! Optional `tracing` output for built statements.

use crate::error::StmtResult;
use crate::stmt::{Built, StmtKind};

/// Emit the outcome of a build at DEBUG level, target `mystmt.sql`.
#[cfg(feature = "tracing")]
pub(crate) fn built(kind: StmtKind, result: &StmtResult<Built>) {
    match result {
        Ok(built) => tracing::debug!(
            target: "mystmt.sql",
            kind = kind.as_str(),
            param_count = built.param_count(),
            sql = %built.sql,
            "statement built"
        ),
        Err(err) => tracing::debug!(
            target: "mystmt.sql",
            kind = kind.as_str(),
            error = %err,
            "statement build failed"
        ),
    }
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn built(_kind: StmtKind, _result: &StmtResult<Built>) {}
