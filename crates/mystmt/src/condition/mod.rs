//! Nested AND/OR condition trees for WHERE and HAVING clauses.
//!
//! A [`ConditionTree`] is an arena of [`ConditionNode`]s addressed by [`NodeId`]. Each node
//! holds child groups plus four kinds of leaf predicates:
//!
//! - value comparisons (`` `f` = ? ``, `` `f` IN (1, 2) ``, `` `f` IS NULL ``)
//! - raw value comparisons (`` `f` BETWEEN ? AND ? ``)
//! - free-form expressions
//! - subquery membership (`` `f` NOT IN (SELECT ..) ``)
//!
//! Under an AND node predicates are keyed by field and the last write wins; under an OR node
//! the same field may appear any number of times.
//!
//! Rendering emits children first, then values, raw values, expressions and subqueries. A node
//! is wrapped in parentheses when it has more than one renderable expression, and in
//! `NOT (...)` when negated. An empty node renders to nothing.
//!
//! # Example
//! ```ignore
//! use mystmt::{ConditionTree, Conjunction, ParamList, StmtConfig};
//!
//! let mut tree = ConditionTree::new(Conjunction::Or);
//! let root = tree.root();
//! let group = tree.open_child(root, Conjunction::And, false);
//! tree.add_value(group, "t1c1", 3, "=");
//! tree.add_value(group, "t1c2", "string", "=");
//!
//! let mut params = ParamList::new();
//! let sql = tree.render(root, &StmtConfig::default(), &mut params)?;
//! assert_eq!(sql.as_deref(), Some("(`t1c1` = 3 AND `t1c2` = ?)"));
//! ```

use crate::config::StmtConfig;
use crate::error::{StmtError, StmtResult};
use crate::ident::quote_col_ref;
use crate::param::{ParamList, parameterize};
use crate::stmt::SqlStmt;
use crate::value::{Operand, Value};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// How the expressions of a node are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl Conjunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }

    fn separator(&self) -> &'static str {
        match self {
            Conjunction::And => " AND ",
            Conjunction::Or => " OR ",
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle of a node inside the [`ConditionTree`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Per-field predicate storage: keyed (last write wins) under AND, repeated under OR.
#[derive(Debug, Clone)]
enum NodeStorage<T> {
    Keyed(IndexMap<String, T>),
    Repeated(Vec<(String, T)>),
}

impl<T> NodeStorage<T> {
    fn new(conjunction: Conjunction) -> Self {
        match conjunction {
            Conjunction::And => NodeStorage::Keyed(IndexMap::new()),
            Conjunction::Or => NodeStorage::Repeated(Vec::new()),
        }
    }

    fn insert(&mut self, field: String, item: T) {
        match self {
            NodeStorage::Keyed(map) => {
                map.insert(field, item);
            }
            NodeStorage::Repeated(list) => list.push((field, item)),
        }
    }

    fn len(&self) -> usize {
        match self {
            NodeStorage::Keyed(map) => map.len(),
            NodeStorage::Repeated(list) => list.len(),
        }
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&str, &T)> + '_> {
        match self {
            NodeStorage::Keyed(map) => Box::new(map.iter().map(|(k, v)| (k.as_str(), v))),
            NodeStorage::Repeated(list) => Box::new(list.iter().map(|(k, v)| (k.as_str(), v))),
        }
    }

    /// Re-shape for `conjunction`, replaying entries in order.
    fn convert(self, conjunction: Conjunction) -> Self {
        let entries: Vec<(String, T)> = match self {
            NodeStorage::Keyed(map) => map.into_iter().collect(),
            NodeStorage::Repeated(list) => list,
        };
        let mut storage = NodeStorage::new(conjunction);
        for (field, item) in entries {
            storage.insert(field, item);
        }
        storage
    }
}

#[derive(Debug, Clone)]
struct ValuePredicate {
    operand: Operand,
    op: String,
}

#[derive(Debug, Clone)]
struct RawValuePredicate {
    raw: String,
    op: String,
    params: Option<Vec<Value>>,
}

#[derive(Debug, Clone)]
struct RawExpression {
    sql: String,
    params: Option<Vec<Value>>,
}

#[derive(Debug, Clone)]
struct SubqueryPredicate {
    subquery: Arc<dyn SqlStmt + Send + Sync>,
    op: String,
    params: Option<Vec<Value>>,
}

/// One AND/OR group of a [`ConditionTree`].
#[derive(Debug, Clone)]
pub struct ConditionNode {
    conjunction: Conjunction,
    negated: bool,
    nesting_level: usize,
    children: Vec<NodeId>,
    values: NodeStorage<ValuePredicate>,
    raw_values: NodeStorage<RawValuePredicate>,
    exprs: Vec<RawExpression>,
    subqueries: NodeStorage<SubqueryPredicate>,
}

impl ConditionNode {
    fn new(conjunction: Conjunction, negated: bool, nesting_level: usize) -> Self {
        Self {
            conjunction,
            negated,
            nesting_level,
            children: Vec::new(),
            values: NodeStorage::new(conjunction),
            raw_values: NodeStorage::new(conjunction),
            exprs: Vec::new(),
            subqueries: NodeStorage::new(conjunction),
        }
    }

    pub fn conjunction(&self) -> Conjunction {
        self.conjunction
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Depth below the root; informational only.
    pub fn nesting_level(&self) -> usize {
        self.nesting_level
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Number of leaf predicates held directly by this node.
    pub fn predicate_count(&self) -> usize {
        self.values.len() + self.raw_values.len() + self.exprs.len() + self.subqueries.len()
    }
}

/// Arena owning a root condition and all of its nested groups.
#[derive(Debug, Clone)]
pub struct ConditionTree {
    nodes: Vec<ConditionNode>,
}

impl ConditionTree {
    /// Create a tree whose root combines its expressions with `conjunction`.
    pub fn new(conjunction: Conjunction) -> Self {
        Self {
            nodes: vec![ConditionNode::new(conjunction, false, 0)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Access a node.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this tree.
    pub fn node(&self, id: NodeId) -> &ConditionNode {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut ConditionNode {
        &mut self.nodes[id.0]
    }

    /// Total number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no predicate anywhere.
    pub fn is_empty(&self) -> bool {
        !self.has_conds(self.root())
    }

    /// Open a new group under `parent` and return its handle.
    pub fn open_child(&mut self, parent: NodeId, conjunction: Conjunction, negated: bool) -> NodeId {
        let level = self.node(parent).nesting_level + 1;
        let id = NodeId(self.nodes.len());
        self.nodes.push(ConditionNode::new(conjunction, negated, level));
        self.node_mut(parent).children.push(id);
        id
    }

    /// Attach a separately built tree as a new group under `parent`.
    ///
    /// The grafted root and its descendants are renumbered from `parent`'s level.
    pub fn graft(&mut self, parent: NodeId, subtree: ConditionTree) -> NodeId {
        let offset = self.nodes.len();
        for mut node in subtree.nodes {
            for child in &mut node.children {
                child.0 += offset;
            }
            self.nodes.push(node);
        }
        let id = NodeId(offset);
        self.node_mut(parent).children.push(id);
        let level = self.node(parent).nesting_level + 1;
        self.set_nesting_level(id, level);
        id
    }

    /// Set the nesting level of `id` and renumber all of its descendants.
    pub fn set_nesting_level(&mut self, id: NodeId, level: usize) {
        let mut stack = vec![(id, level)];
        while let Some((id, level)) = stack.pop() {
            let node = self.node_mut(id);
            node.nesting_level = level;
            stack.extend(node.children.iter().map(|&child| (child, level + 1)));
        }
    }

    /// Change how `id` combines its expressions. Keyed storage keeps the last entry per field.
    pub fn set_conjunction(&mut self, id: NodeId, conjunction: Conjunction) {
        let node = self.node_mut(id);
        if node.conjunction == conjunction {
            return;
        }
        node.conjunction = conjunction;
        node.values = std::mem::replace(&mut node.values, NodeStorage::new(conjunction)).convert(conjunction);
        node.raw_values =
            std::mem::replace(&mut node.raw_values, NodeStorage::new(conjunction)).convert(conjunction);
        node.subqueries =
            std::mem::replace(&mut node.subqueries, NodeStorage::new(conjunction)).convert(conjunction);
    }

    pub fn set_negated(&mut self, id: NodeId, negated: bool) {
        self.node_mut(id).negated = negated;
    }

    // ==================== Predicates ====================

    /// Compare `field` with a value or, for a list operand, a set of values.
    pub fn add_value(
        &mut self,
        id: NodeId,
        field: impl Into<String>,
        operand: impl Into<Operand>,
        op: &str,
    ) {
        let pred = ValuePredicate {
            operand: operand.into(),
            op: op.to_string(),
        };
        self.node_mut(id).values.insert(field.into(), pred);
    }

    /// Add one value comparison per `(field, value)` pair, in order.
    pub fn add_values<I, K, V>(&mut self, id: NodeId, pairs: I, op: &str)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Operand>,
    {
        for (field, value) in pairs {
            self.add_value(id, field, value, op);
        }
    }

    /// Compare `field` with verbatim SQL. `params` are bound in order when rendered.
    ///
    /// An empty `raw` is an [`StmtError::InvalidArgument`].
    pub fn add_raw_value(
        &mut self,
        id: NodeId,
        field: impl Into<String>,
        raw: impl Into<String>,
        op: &str,
        params: Option<Vec<Value>>,
    ) -> StmtResult<()> {
        let field = field.into();
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(StmtError::invalid_argument(format!(
                "Raw value for '{field}' cannot be empty"
            )));
        }
        let pred = RawValuePredicate {
            raw,
            op: op.to_string(),
            params,
        };
        self.node_mut(id).raw_values.insert(field, pred);
        Ok(())
    }

    /// Add one raw comparison per `(field, raw)` pair, in order.
    pub fn add_raw_values<I, K, R>(&mut self, id: NodeId, pairs: I, op: &str) -> StmtResult<()>
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
        R: Into<String>,
    {
        for (field, raw) in pairs {
            self.add_raw_value(id, field, raw, op, None)?;
        }
        Ok(())
    }

    /// Add a free-form expression. `params` are appended to the bound list as given.
    pub fn add_expr(&mut self, id: NodeId, sql: impl Into<String>, params: Option<Vec<Value>>) {
        self.node_mut(id).exprs.push(RawExpression {
            sql: sql.into(),
            params,
        });
    }

    /// Add several parameterless expressions.
    pub fn add_exprs<I, S>(&mut self, id: NodeId, exprs: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for sql in exprs {
            self.add_expr(id, sql, None);
        }
    }

    /// Test `field` against the result of `subquery`, e.g. with `IN` or `NOT IN`.
    pub fn add_subquery(
        &mut self,
        id: NodeId,
        field: impl Into<String>,
        subquery: Arc<dyn SqlStmt + Send + Sync>,
        op: &str,
        params: Option<Vec<Value>>,
    ) {
        let pred = SubqueryPredicate {
            subquery,
            op: op.to_string(),
            params,
        };
        self.node_mut(id).subqueries.insert(field.into(), pred);
    }

    // ==================== Inspection ====================

    /// Whether `id` or any of its descendants will produce an expression.
    pub fn has_conds(&self, id: NodeId) -> bool {
        let node = self.node(id);
        node.predicate_count() > 0 || node.children.iter().any(|&c| self.has_conds(c))
    }

    /// Number of expressions `id` joins: its predicates plus each non-empty child.
    pub fn expr_count(&self, id: NodeId) -> usize {
        let node = self.node(id);
        node.predicate_count()
            + node
                .children
                .iter()
                .filter(|&&c| self.has_conds(c))
                .count()
    }

    // ==================== Rendering ====================

    /// Render `id` to a SQL fragment, appending bound values to `params` in placeholder order.
    ///
    /// Returns `Ok(None)` when the node has nothing to render.
    pub fn render(
        &self,
        id: NodeId,
        config: &StmtConfig,
        params: &mut ParamList,
    ) -> StmtResult<Option<String>> {
        let node = self.node(id);
        let mut parts: Vec<String> = Vec::new();

        for &child in &node.children {
            if let Some(sql) = self.render(child, config, params)? {
                parts.push(sql);
            }
        }

        for (field, pred) in node.values.iter() {
            parts.push(render_value(field, pred, config, params)?);
        }

        for (field, pred) in node.raw_values.iter() {
            if let Some(extra) = &pred.params {
                params.extend_values(extra.iter().map(Value::to_param));
            }
            parts.push(format!(
                "{} {} {}",
                quote_col_ref(field, config.quote_all_col_refs),
                pred.op,
                pred.raw
            ));
        }

        for expr in &node.exprs {
            parts.push(expr.sql.clone());
            if let Some(extra) = &expr.params {
                params.extend_values(extra.iter().cloned());
            }
        }

        for (field, pred) in node.subqueries.iter() {
            let built = pred.subquery.build()?;
            if let Some(bound) = built.params {
                params.extend(bound.into_flat()?);
            }
            if let Some(extra) = &pred.params {
                params.extend_values(extra.iter().map(Value::to_param));
            }
            parts.push(format!(
                "{} {} ({})",
                quote_col_ref(field, config.quote_all_col_refs),
                pred.op,
                built.sql
            ));
        }

        if parts.is_empty() {
            return Ok(None);
        }

        let multiple = parts.len() > 1;
        let joined = parts.join(node.conjunction.separator());
        let sql = if node.negated {
            format!("NOT ({joined})")
        } else if multiple {
            format!("({joined})")
        } else {
            joined
        };
        Ok(Some(sql))
    }
}

fn render_value(
    field: &str,
    pred: &ValuePredicate,
    config: &StmtConfig,
    params: &mut ParamList,
) -> StmtResult<String> {
    let column = quote_col_ref(field, config.quote_all_col_refs);
    let mut inline = Vec::new();
    parameterize(config, &pred.operand, Some(&mut inline), Some(params))?;

    let mut op = pred.op.as_str();
    let rhs = match &pred.operand {
        Operand::List(values) if values.is_empty() => {
            return empty_list(field, op).map(str::to_string);
        }
        Operand::List(values) if values.len() > 1 => {
            op = match op {
                "=" => "IN",
                "<>" => "NOT IN",
                other => other,
            };
            format!("({})", inline.join(", "))
        }
        Operand::List(_) => {
            op = match op {
                "IN" => "=",
                "NOT IN" => "<>",
                other => other,
            };
            inline.pop().unwrap_or_default()
        }
        Operand::Scalar(_) => inline.pop().unwrap_or_default(),
    };

    if rhs == "NULL" || rhs == "NOT NULL" {
        op = match op {
            "=" => "IS",
            "<>" => "IS NOT",
            other => other,
        };
    }

    Ok(format!("{column} {op} {rhs}"))
}

/// An empty set never matches `IN` and always matches `NOT IN`.
fn empty_list(field: &str, op: &str) -> StmtResult<&'static str> {
    match op {
        "=" | "IN" => Ok("1=0"),
        "<>" | "NOT IN" => Ok("1=1"),
        _ => Err(StmtError::invalid_argument(format!(
            "Empty value list for '{field}' cannot be compared with '{op}'"
        ))),
    }
}
