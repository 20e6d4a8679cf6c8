//! Column assignments shared by INSERT and UPDATE.

use crate::config::StmtConfig;
use crate::error::{StmtError, StmtResult};
use crate::param::{ParamList, parameterize_value};
use crate::value::Value;
use indexmap::IndexMap;

#[derive(Debug, Clone)]
struct RawAssignment {
    sql: String,
    params: Option<Vec<Value>>,
}

/// Column → value assignments. Pickled values render before raw ones; setting a column again
/// replaces its previous assignment.
#[derive(Debug, Clone, Default)]
pub(crate) struct SetValues {
    values: IndexMap<String, Value>,
    raw: IndexMap<String, RawAssignment>,
}

impl SetValues {
    pub(crate) fn set_value(&mut self, column: &str, value: Value) {
        self.raw.shift_remove(column);
        self.values.insert(column.to_string(), value);
    }

    pub(crate) fn set_raw_value(
        &mut self,
        column: &str,
        raw: String,
        params: Option<Vec<Value>>,
    ) -> StmtResult<()> {
        if raw.trim().is_empty() {
            return Err(StmtError::invalid_argument(format!(
                "Raw value for '{column}' cannot be empty"
            )));
        }
        self.values.shift_remove(column);
        self.raw
            .insert(column.to_string(), RawAssignment { sql: raw, params });
        Ok(())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.values.is_empty() && self.raw.is_empty()
    }

    /// `(column, inline SQL)` pairs in render order, binding values into `params`.
    pub(crate) fn render(
        &self,
        config: &StmtConfig,
        params: &mut ParamList,
    ) -> StmtResult<Vec<(&str, String)>> {
        let mut out = Vec::with_capacity(self.values.len() + self.raw.len());

        for (column, value) in &self.values {
            let mut inline = Vec::with_capacity(1);
            parameterize_value(config, value, Some(&mut inline), Some(params))?;
            out.push((column.as_str(), inline.pop().unwrap_or_default()));
        }

        for (column, raw) in &self.raw {
            if let Some(extra) = &raw.params {
                params.extend_values(extra.iter().map(Value::to_param));
            }
            out.push((column.as_str(), raw.sql.clone()));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_then_raw_values() {
        let mut set = SetValues::default();
        set.set_raw_value("t1c3", "NOW()".to_string(), None).unwrap();
        set.set_value("t1c1", Value::from("a"));
        set.set_value("t1c2", Value::Null);

        let mut params = ParamList::new();
        let rendered = set.render(&StmtConfig::default(), &mut params).unwrap();
        assert_eq!(
            rendered,
            vec![
                ("t1c1", "?".to_string()),
                ("t1c2", "NULL".to_string()),
                ("t1c3", "NOW()".to_string()),
            ]
        );
        assert_eq!(params.as_slice(), &[Value::Text("a".to_string())]);
    }

    #[test]
    fn later_assignment_replaces_earlier() {
        let mut set = SetValues::default();
        set.set_value("t1c1", Value::Int(1));
        set.set_raw_value("t1c1", "PASSWORD(?)".to_string(), Some(vec![Value::from("pw")]))
            .unwrap();

        let mut params = ParamList::new();
        let rendered = set.render(&StmtConfig::default(), &mut params).unwrap();
        assert_eq!(rendered, vec![("t1c1", "PASSWORD(?)".to_string())]);
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn empty_raw_value_is_rejected() {
        let mut set = SetValues::default();
        let err = set.set_raw_value("t1c1", "  ".to_string(), None).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(set.is_empty());
    }
}
