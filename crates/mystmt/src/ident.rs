//! Column reference quoting and table factor helpers.
//!
//! Column references are wrapped in MySQL backticks unless they already look like an
//! expression:
//!
//! - `*` (`t1.*`), a space (`col AS alias`), `(` (`DATE(col)`) or a backtick (already quoted)
//!   leave the reference untouched
//! - `table.col` quotes only the column part: ``table.`col` ``
//! - anything else becomes `` `col` ``

/// Quote `col_ref` with backticks when `enabled`.
pub fn quote_col_ref(col_ref: &str, enabled: bool) -> String {
    if !enabled || col_ref.contains(['*', ' ', '(', '`']) {
        return col_ref.to_string();
    }

    match col_ref.split_once('.') {
        Some((table, col)) => format!("{table}.`{col}`"),
        None => format!("`{col_ref}`"),
    }
}

/// The alias of a table factor: `t AS a` gives `a`, a bare `t` gives `t`.
pub fn table_alias(table_factor: &str) -> &str {
    match table_factor.split_once(" AS ") {
        Some((_, alias)) => alias.trim(),
        None => table_factor,
    }
}

/// Split `expr AS alias` into its parts.
pub(crate) fn split_alias(expr: &str) -> (&str, Option<&str>) {
    match expr.split_once(" AS ") {
        Some((expr, alias)) => (expr, Some(alias)),
        None => (expr, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_simple() {
        assert_eq!(quote_col_ref("t1c1", true), "`t1c1`");
    }

    #[test]
    fn quote_qualified() {
        assert_eq!(quote_col_ref("t1.t1c1", true), "t1.`t1c1`");
    }

    #[test]
    fn quote_passthrough() {
        for col in ["t1.*", "*", "t1c1 AS c", "DATE(`t1c1`)", "`t1c1`"] {
            assert_eq!(quote_col_ref(col, true), col);
        }
    }

    #[test]
    fn quote_disabled() {
        assert_eq!(quote_col_ref("t1.t1c1", false), "t1.t1c1");
    }

    #[test]
    fn alias_of_table_factor() {
        assert_eq!(table_alias("t1"), "t1");
        assert_eq!(table_alias("t1 AS a"), "a");
        assert_eq!(table_alias("MEASURES"), "MEASURES");
    }

    #[test]
    fn split_alias_parts() {
        assert_eq!(split_alias("t1c1 AS c"), ("t1c1", Some("c")));
        assert_eq!(split_alias("t1c1"), ("t1c1", None));
    }
}
