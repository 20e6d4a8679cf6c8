//! WHERE / HAVING scope management on top of a [`ConditionTree`].

use crate::condition::{ConditionTree, Conjunction, NodeId};
use crate::config::StmtConfig;
use crate::error::StmtResult;
use crate::param::ParamList;
use crate::stmt::SqlStmt;
use crate::value::{Operand, Value};
use std::sync::Arc;

/// A condition tree plus the "active" group that predicate calls target.
///
/// The root combines its groups with the outer conjunction (OR by default) and starts with an
/// implicit AND group, so flat usage is plain AND-combination. Opening a group makes it active.
#[derive(Debug, Clone)]
pub struct WhereClause {
    tree: ConditionTree,
    active: NodeId,
}

impl Default for WhereClause {
    fn default() -> Self {
        Self::new(Conjunction::Or)
    }
}

impl WhereClause {
    pub fn new(outer: Conjunction) -> Self {
        let mut tree = ConditionTree::new(outer);
        let root = tree.root();
        let active = tree.open_child(root, Conjunction::And, false);
        Self { tree, active }
    }

    /// Open a new group under the root and make it active.
    pub fn open_group(&mut self, conjunction: Conjunction, negated: bool) -> NodeId {
        let root = self.tree.root();
        self.active = self.tree.open_child(root, conjunction, negated);
        self.active
    }

    /// Attach a separately built tree as a new group under the active one.
    pub fn graft(&mut self, subtree: ConditionTree) -> NodeId {
        self.tree.graft(self.active, subtree)
    }

    /// The group predicate calls are added to.
    pub fn active(&self) -> NodeId {
        self.active
    }

    /// Top-level group by position, in opening order.
    pub fn group(&self, index: usize) -> Option<NodeId> {
        self.tree.node(self.tree.root()).children().get(index).copied()
    }

    /// Change how top-level groups are combined.
    pub fn set_conjunction(&mut self, outer: Conjunction) {
        let root = self.tree.root();
        self.tree.set_conjunction(root, outer);
    }

    pub fn tree(&self) -> &ConditionTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ConditionTree {
        &mut self.tree
    }

    pub fn value(&mut self, field: &str, operand: impl Into<Operand>, op: &str) {
        self.tree.add_value(self.active, field, operand, op);
    }

    pub fn raw_value(
        &mut self,
        field: &str,
        raw: impl Into<String>,
        op: &str,
        params: Option<Vec<Value>>,
    ) -> StmtResult<()> {
        self.tree.add_raw_value(self.active, field, raw, op, params)
    }

    pub fn expr(&mut self, sql: impl Into<String>, params: Option<Vec<Value>>) {
        self.tree.add_expr(self.active, sql, params);
    }

    pub fn subquery(
        &mut self,
        field: &str,
        subquery: Arc<dyn SqlStmt + Send + Sync>,
        op: &str,
        params: Option<Vec<Value>>,
    ) {
        self.tree.add_subquery(self.active, field, subquery, op, params);
    }

    pub fn has_conds(&self) -> bool {
        self.tree.has_conds(self.tree.root())
    }

    /// Render the whole clause body (without the `WHERE` keyword).
    pub fn render(&self, config: &StmtConfig, params: &mut ParamList) -> StmtResult<Option<String>> {
        self.tree.render(self.tree.root(), config, params)
    }
}

pub(crate) fn collect_values<I>(values: I) -> Vec<Value>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    values.into_iter().map(Into::into).collect()
}

/// WHERE builder methods for statements with `where_clause` and `build_error` fields.
macro_rules! where_methods {
    () => {
        // ==================== WHERE conditions ====================

        /// Compare `field` with `value` (`=`) in the active group.
        ///
        /// A list value becomes `IN (..)`; a one-element list collapses to `=`.
        /// `NULL` turns `=` into `IS`.
        pub fn where_value(self, field: &str, value: impl Into<$crate::Operand>) -> Self {
            self.where_value_op(field, value, "=")
        }

        /// Compare `field` with `value` using `op`.
        pub fn where_value_op(
            mut self,
            field: &str,
            value: impl Into<$crate::Operand>,
            op: &str,
        ) -> Self {
            self.where_clause.value(field, value, op);
            self
        }

        /// Add one `=` comparison per `(field, value)` pair, in order.
        pub fn where_values<I, K, V>(mut self, pairs: I) -> Self
        where
            I: IntoIterator<Item = (K, V)>,
            K: AsRef<str>,
            V: Into<$crate::Operand>,
        {
            for (field, value) in pairs {
                self.where_clause.value(field.as_ref(), value, "=");
            }
            self
        }

        /// Compare `field` with verbatim SQL (`=`).
        pub fn where_raw_value(self, field: &str, raw: impl Into<String>) -> Self {
            self.where_raw_value_op(field, raw, "=")
        }

        /// Compare `field` with verbatim SQL using `op`.
        pub fn where_raw_value_op(mut self, field: &str, raw: impl Into<String>, op: &str) -> Self {
            let result = self.where_clause.raw_value(field, raw, op, None);
            $crate::stmt::record_error(&mut self.build_error, result);
            self
        }

        /// Compare `field` with verbatim SQL whose placeholders are bound to `params`.
        pub fn where_raw_value_params<I>(
            mut self,
            field: &str,
            raw: impl Into<String>,
            op: &str,
            params: I,
        ) -> Self
        where
            I: IntoIterator,
            I::Item: Into<$crate::Value>,
        {
            let params = $crate::stmt::where_clause::collect_values(params);
            let result = self.where_clause.raw_value(field, raw, op, Some(params));
            $crate::stmt::record_error(&mut self.build_error, result);
            self
        }

        /// Add one raw `=` comparison per `(field, raw)` pair, in order.
        pub fn where_raw_values<I, K, R>(mut self, pairs: I) -> Self
        where
            I: IntoIterator<Item = (K, R)>,
            K: AsRef<str>,
            R: Into<String>,
        {
            for (field, raw) in pairs {
                let result = self.where_clause.raw_value(field.as_ref(), raw, "=", None);
                $crate::stmt::record_error(&mut self.build_error, result);
            }
            self
        }

        /// Add a verbatim expression.
        pub fn where_expr(mut self, expr: impl Into<String>) -> Self {
            self.where_clause.expr(expr, None);
            self
        }

        /// Add a verbatim expression whose placeholders are bound to `params`.
        pub fn where_expr_params<I>(mut self, expr: impl Into<String>, params: I) -> Self
        where
            I: IntoIterator,
            I::Item: Into<$crate::Value>,
        {
            let params = $crate::stmt::where_clause::collect_values(params);
            self.where_clause.expr(expr, Some(params));
            self
        }

        /// Add several verbatim expressions.
        pub fn where_exprs<I, S>(mut self, exprs: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            for expr in exprs {
                self.where_clause.expr(expr, None);
            }
            self
        }

        /// Test `field` against a subquery: `` `field` OP (SELECT ..) ``.
        ///
        /// Subqueries are keyed by field like plain values: under an AND group a second
        /// subquery on the same field replaces the first. Open an OR group, or combine both
        /// tests with [`where_expr`](Self::where_expr), to keep them all.
        pub fn where_select<S>(mut self, field: &str, subquery: S, op: &str) -> Self
        where
            S: $crate::SqlStmt + Send + Sync + 'static,
        {
            self.where_clause
                .subquery(field, std::sync::Arc::new(subquery), op, None);
            self
        }

        /// Like [`where_select`](Self::where_select), binding extra `params` after the
        /// subquery's own.
        pub fn where_select_params<S, I>(mut self, field: &str, subquery: S, op: &str, params: I) -> Self
        where
            S: $crate::SqlStmt + Send + Sync + 'static,
            I: IntoIterator,
            I::Item: Into<$crate::Value>,
        {
            let params = $crate::stmt::where_clause::collect_values(params);
            self.where_clause
                .subquery(field, std::sync::Arc::new(subquery), op, Some(params));
            self
        }

        /// Open a new AND group and make it active.
        pub fn where_and(self) -> Self {
            self.where_group($crate::Conjunction::And, false)
        }

        /// Open a new OR group and make it active.
        pub fn where_or(self) -> Self {
            self.where_group($crate::Conjunction::Or, false)
        }

        /// Open a new group, optionally negated (`NOT (...)`), and make it active.
        pub fn where_group(mut self, conjunction: $crate::Conjunction, negated: bool) -> Self {
            self.where_clause.open_group(conjunction, negated);
            self
        }

        /// Set how top-level groups are combined (default OR).
        pub fn where_conjunction(mut self, outer: $crate::Conjunction) -> Self {
            self.where_clause.set_conjunction(outer);
            self
        }

        /// Attach a separately built condition tree under the active group.
        pub fn where_tree(mut self, subtree: $crate::ConditionTree) -> Self {
            self.where_clause.graft(subtree);
            self
        }

        pub fn where_clause(&self) -> &$crate::stmt::WhereClause {
            &self.where_clause
        }

        /// Direct access for nesting groups below the active one.
        pub fn where_clause_mut(&mut self) -> &mut $crate::stmt::WhereClause {
            &mut self.where_clause
        }
    };
}

pub(crate) use where_methods;
