//! Bound parameter storage and the inline-or-bind decision for values.

use crate::config::StmtConfig;
use crate::error::{StmtError, StmtResult};
use crate::value::{Operand, Value};
use serde::Serialize;

/// Ordered list of values bound to placeholders, in placeholder order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParamList {
    params: Vec<Value>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a value and return its 1-based position.
    pub fn push(&mut self, value: impl Into<Value>) -> usize {
        self.params.push(value.into());
        self.params.len()
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.params
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.params.iter()
    }

    /// Extend this list with another list's parameters.
    pub fn extend(&mut self, other: ParamList) {
        self.params.extend(other.params);
    }

    /// Extend this list with values from an iterator.
    pub fn extend_values(&mut self, values: impl IntoIterator<Item = Value>) {
        self.params.extend(values);
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.params
    }
}

impl From<Vec<Value>> for ParamList {
    fn from(params: Vec<Value>) -> Self {
        Self { params }
    }
}

impl IntoIterator for ParamList {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParamList {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// Wrap `value` in single quotes, backslash-escaping embedded single quotes.
///
/// This is a last resort for configurations without placeholders; prefer bound parameters.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "\\'"))
}

/// Route every value of `operand`, in order, to `inline` and/or `params`.
///
/// - With a parameter sink and a configured placeholder, a parameterizable value puts the
///   placeholder inline and its pickled text on `params`.
/// - Otherwise it is inlined, single-quoted when `quote_all_values` is set and it would have
///   been parameterizable.
/// - Without an inline sink every value goes to `params` (batch rows).
///
/// Passing neither sink is an [`StmtError::InvalidArgument`].
pub fn parameterize(
    config: &StmtConfig,
    operand: &Operand,
    mut inline: Option<&mut Vec<String>>,
    mut params: Option<&mut ParamList>,
) -> StmtResult<()> {
    for value in operand.values() {
        parameterize_value(config, value, inline.as_deref_mut(), params.as_deref_mut())?;
    }
    Ok(())
}

/// Route a single value, see [`parameterize`].
pub fn parameterize_value(
    config: &StmtConfig,
    value: &Value,
    inline: Option<&mut Vec<String>>,
    params: Option<&mut ParamList>,
) -> StmtResult<()> {
    let pickled = value.pickle();

    match (inline, params) {
        (Some(inline), params) => {
            let placeholder = config.placeholder();
            match (params, placeholder) {
                (Some(params), Some(token)) if pickled.parameterizable => {
                    inline.push(token.to_string());
                    params.push(Value::Text(pickled.text));
                }
                (params, _) => {
                    let using_placeholder = params.is_some() && placeholder.is_some();
                    if pickled.parameterizable && config.quote_all_values && !using_placeholder {
                        inline.push(quote(&pickled.text));
                    } else {
                        inline.push(pickled.text);
                    }
                }
            }
        }
        (None, Some(params)) => {
            params.push(value.to_param());
        }
        (None, None) => {
            return Err(StmtError::invalid_argument(
                "either an inline sink or a parameter sink must be given",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn route(config: &StmtConfig, operand: impl Into<Operand>) -> (Vec<String>, ParamList) {
        let mut inline = Vec::new();
        let mut params = ParamList::new();
        parameterize(config, &operand.into(), Some(&mut inline), Some(&mut params)).unwrap();
        (inline, params)
    }

    #[test]
    fn quote_escapes_single_quotes() {
        assert_eq!(quote("abc"), "'abc'");
        assert_eq!(quote("it's"), "'it\\'s'");
    }

    #[test]
    fn text_is_bound_with_placeholder() {
        let (inline, params) = route(&StmtConfig::default(), "string");
        assert_eq!(inline, vec!["?"]);
        assert_eq!(params.as_slice(), &[Value::Text("string".to_string())]);
    }

    #[test]
    fn numbers_stay_inline() {
        let (inline, params) = route(&StmtConfig::default(), vec![1, 2, 3]);
        assert_eq!(inline, vec!["1", "2", "3"]);
        assert!(params.is_empty());
    }

    #[test]
    fn custom_placeholder_token() {
        let config = StmtConfig::default().with_placeholder("%s");
        let (inline, params) = route(&config, vec!["a", "b"]);
        assert_eq!(inline, vec!["%s", "%s"]);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn without_placeholder_inlines_verbatim() {
        let config = StmtConfig::default().without_placeholder();
        let (inline, params) = route(&config, "'string'");
        assert_eq!(inline, vec!["'string'"]);
        assert!(params.is_empty());
    }

    #[test]
    fn quote_all_values_without_placeholder() {
        let config = StmtConfig::default()
            .without_placeholder()
            .with_quote_all_values(true);
        let date = NaiveDate::from_ymd_opt(2014, 3, 2).unwrap();
        let (inline, _) = route(&config, Operand::list([Value::from("O'Neil"), date.into(), 5.into()]));
        assert_eq!(inline, vec!["'O\\'Neil'", "'2014-03-02'", "5"]);
    }

    #[test]
    fn quote_all_values_ignored_when_binding() {
        let config = StmtConfig::default().with_quote_all_values(true);
        let (inline, params) = route(&config, "x");
        assert_eq!(inline, vec!["?"]);
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn inline_only_sink() {
        let config = StmtConfig::default().with_quote_all_values(true);
        let mut inline = Vec::new();
        parameterize(&config, &Operand::list(["a", "b"]), Some(&mut inline), None).unwrap();
        assert_eq!(inline, vec!["'a'", "'b'"]);
    }

    #[test]
    fn params_only_sink() {
        let mut params = ParamList::new();
        let row = Operand::list([Value::from("a"), Value::Null, Value::Int(3)]);
        parameterize(&StmtConfig::default(), &row, None, Some(&mut params)).unwrap();
        assert_eq!(
            params.into_vec(),
            vec![Value::Text("a".to_string()), Value::Null, Value::Int(3)]
        );
    }

    #[test]
    fn no_sink_is_invalid_argument() {
        let err = parameterize(&StmtConfig::default(), &Operand::from(1), None, None).unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
