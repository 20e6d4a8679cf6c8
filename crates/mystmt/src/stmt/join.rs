//! JOIN references for SELECT, UPDATE and multi-table DELETE.

use crate::config::StmtConfig;
use crate::ident::{quote_col_ref, table_alias};

/// How a joined table is matched against the tables before it.
///
/// Conversions from strings follow a shorthand:
///
/// | input             | renders                                   |
/// |-------------------|-------------------------------------------|
/// | `"f"`             | ``USING (`f`)``                           |
/// | `".f"`            | ``ON (root.`f` = joined.`f`)``            |
/// | `"..f"`           | ``ON (previous.`f` = joined.`f`)``        |
/// | `(".a", ".b")`    | ``ON (root.`a` = joined.`b`)``            |
/// | `("a", "b")`      | ``USING (`a`, `b`)``                      |
/// | `vec!["x", "y"]`  | `ON (x AND y)`                            |
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinCond {
    /// `USING (cols)`
    Using(Vec<String>),
    /// Same column on the root table and the joined table.
    Root(String),
    /// Same column on the previously joined table and the joined table.
    Previous(String),
    /// Root table column = joined table column.
    Fields(String, String),
    /// Verbatim conditions joined with AND.
    On(Vec<String>),
}

impl JoinCond {
    pub fn using<I, S>(cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        JoinCond::Using(cols.into_iter().map(Into::into).collect())
    }

    pub fn on<I, S>(conds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        JoinCond::On(conds.into_iter().map(Into::into).collect())
    }

    pub fn fields(root_col: impl Into<String>, joined_col: impl Into<String>) -> Self {
        JoinCond::Fields(root_col.into(), joined_col.into())
    }
}

impl From<&str> for JoinCond {
    fn from(cond: &str) -> Self {
        if let Some(field) = cond.strip_prefix("..") {
            JoinCond::Previous(field.to_string())
        } else if let Some(field) = cond.strip_prefix('.') {
            JoinCond::Root(field.to_string())
        } else {
            JoinCond::Using(vec![cond.to_string()])
        }
    }
}

impl From<String> for JoinCond {
    fn from(cond: String) -> Self {
        JoinCond::from(cond.as_str())
    }
}

impl From<(&str, &str)> for JoinCond {
    fn from((first, second): (&str, &str)) -> Self {
        match first.strip_prefix('.') {
            Some(root_col) => {
                JoinCond::Fields(root_col.to_string(), second.trim_start_matches('.').to_string())
            }
            None => JoinCond::using([first, second]),
        }
    }
}

impl From<Vec<&str>> for JoinCond {
    fn from(conds: Vec<&str>) -> Self {
        JoinCond::on(conds)
    }
}

impl From<Vec<String>> for JoinCond {
    fn from(conds: Vec<String>) -> Self {
        JoinCond::On(conds)
    }
}

#[derive(Debug, Clone)]
struct JoinRef {
    join_type: String,
    table_factor: String,
    cond: JoinCond,
}

/// Ordered JOIN references of one statement.
#[derive(Debug, Clone, Default)]
pub struct JoinList {
    refs: Vec<JoinRef>,
}

impl JoinList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a join. `JOIN` is appended to `join_type` unless already present.
    pub fn push(&mut self, table_factor: &str, cond: JoinCond, join_type: &str) {
        let join_type = if join_type.contains("JOIN") {
            join_type.to_string()
        } else {
            format!("{join_type} JOIN")
        };
        self.refs.push(JoinRef {
            join_type,
            table_factor: table_factor.to_string(),
            cond,
        });
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Render every join clause, resolving root and previous aliases from `root_table_factor`.
    pub fn render(&self, root_table_factor: &str, config: &StmtConfig) -> Vec<String> {
        let quote = |col: &str| quote_col_ref(col, config.quote_all_col_refs);
        let root = table_alias(root_table_factor);
        let mut prev = root;
        let mut clauses = Vec::with_capacity(self.refs.len());

        for join in &self.refs {
            let joined = table_alias(&join.table_factor);
            let head = format!("{} {}", join.join_type, join.table_factor);
            let clause = match &join.cond {
                JoinCond::Using(cols) => {
                    let cols: Vec<String> = cols.iter().map(|c| quote(c)).collect();
                    format!("{head} USING ({})", cols.join(", "))
                }
                JoinCond::Root(field) => {
                    let field = quote(field);
                    format!("{head} ON ({root}.{field} = {joined}.{field})")
                }
                JoinCond::Previous(field) => {
                    let field = quote(field);
                    format!("{head} ON ({prev}.{field} = {joined}.{field})")
                }
                JoinCond::Fields(root_col, joined_col) => format!(
                    "{head} ON ({root}.{} = {joined}.{})",
                    quote(root_col),
                    quote(joined_col)
                ),
                JoinCond::On(conds) => format!("{head} ON ({})", conds.join(" AND ")),
            };
            clauses.push(clause);
            prev = joined;
        }

        clauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(root: &str, joins: &[(&str, JoinCond, &str)]) -> Vec<String> {
        let mut list = JoinList::new();
        for (table, cond, join_type) in joins {
            list.push(table, cond.clone(), join_type);
        }
        list.render(root, &StmtConfig::default())
    }

    #[test]
    fn join_using_field() {
        assert_eq!(
            render("t1", &[("t2", "t1c1".into(), "INNER")]),
            vec!["INNER JOIN t2 USING (`t1c1`)"]
        );
    }

    #[test]
    fn join_root_field() {
        assert_eq!(
            render("t1", &[("t2", ".t1c1".into(), "LEFT")]),
            vec!["LEFT JOIN t2 ON (t1.`t1c1` = t2.`t1c1`)"]
        );
    }

    #[test]
    fn join_previous_field() {
        assert_eq!(
            render(
                "t1",
                &[("t2", ".t1c1".into(), "INNER"), ("t3", "..t2c1".into(), "INNER")]
            ),
            vec![
                "INNER JOIN t2 ON (t1.`t1c1` = t2.`t1c1`)",
                "INNER JOIN t3 ON (t2.`t2c1` = t3.`t2c1`)",
            ]
        );
    }

    #[test]
    fn join_field_pair_with_aliases() {
        assert_eq!(
            render("t1 AS a", &[("t2 AS b", (".t1c1", ".t2c1").into(), "INNER")]),
            vec!["INNER JOIN t2 AS b ON (a.`t1c1` = b.`t2c1`)"]
        );
    }

    #[test]
    fn join_using_columns() {
        assert_eq!(
            render("t1", &[("t2", ("t1c1", "t1c2").into(), "INNER")]),
            vec!["INNER JOIN t2 USING (`t1c1`, `t1c2`)"]
        );
    }

    #[test]
    fn join_on_conditions() {
        let cond: JoinCond = vec!["t1.a = t2.a", "t2.b > 3"].into();
        assert_eq!(
            render("t1", &[("t2", cond, "INNER")]),
            vec!["INNER JOIN t2 ON (t1.a = t2.a AND t2.b > 3)"]
        );
    }

    #[test]
    fn join_type_keeps_existing_join_keyword() {
        assert_eq!(
            render("t1", &[("t2", "t1c1".into(), "STRAIGHT_JOIN")]),
            vec!["STRAIGHT_JOIN t2 USING (`t1c1`)"]
        );
    }
}
