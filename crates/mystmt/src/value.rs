//! Scalar values and their literal SQL form.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::Serialize;
use std::fmt;

/// Literal format for `DATETIME` values.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Literal format for `DATE` values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Literal format for `TIME` values.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// A scalar that can be compared against, inserted or bound as a parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
    /// Any other value, kept as its string form.
    Opaque(String),
}

/// Literal text of a [`Value`] and whether it should be bound instead of inlined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pickled {
    pub text: String,
    pub parameterizable: bool,
}

impl Pickled {
    fn literal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parameterizable: false,
        }
    }

    fn bindable(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parameterizable: true,
        }
    }
}

impl Value {
    /// Wrap any displayable value; it renders through its `Display` output.
    pub fn opaque(value: impl fmt::Display) -> Self {
        Value::Opaque(value.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert to literal text.
    ///
    /// `NULL`, booleans and numbers are safe SQL literals and never bound. Text, temporal and
    /// opaque values are flagged as parameterizable. NaN and infinities have no SQL literal and
    /// render as `NULL`.
    pub fn pickle(&self) -> Pickled {
        match self {
            Value::Null => Pickled::literal("NULL"),
            Value::Bool(true) => Pickled::literal("1"),
            Value::Bool(false) => Pickled::literal("0"),
            Value::Int(v) => Pickled::literal(v.to_string()),
            Value::Float(v) if !v.is_finite() => Pickled::literal("NULL"),
            Value::Float(v) => Pickled::literal(v.to_string()),
            Value::Text(v) => Pickled::bindable(v.as_str()),
            Value::DateTime(v) => Pickled::bindable(v.format(DATETIME_FORMAT).to_string()),
            Value::Date(v) => Pickled::bindable(v.format(DATE_FORMAT).to_string()),
            Value::Time(v) => Pickled::bindable(v.format(TIME_FORMAT).to_string()),
            Value::Opaque(v) => Pickled::bindable(v.as_str()),
        }
    }

    /// The form pushed onto a parameter list: parameterizable values travel as their pickled
    /// text, literals keep their type so drivers bind a real `NULL` or number.
    pub fn to_param(&self) -> Value {
        let pickled = self.pickle();
        match self {
            _ if pickled.parameterizable => Value::Text(pickled.text),
            Value::Float(v) if !v.is_finite() => Value::Null,
            _ => self.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pickle().text)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Value::Time(v)
    }
}

/// Zoned timestamps are rendered in their own local time.
impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(v: DateTime<Tz>) -> Self {
        Value::DateTime(v.naive_local())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Right-hand side of a comparison: one scalar, or a sequence used for `IN` lists.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Scalar(Value),
    List(Vec<Value>),
}

impl Operand {
    /// Build a list operand from any iterator of values.
    pub fn list<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Operand::List(values.into_iter().map(Into::into).collect())
    }

    /// Values in order; a scalar is a one-element slice.
    pub fn values(&self) -> &[Value] {
        match self {
            Operand::Scalar(v) => std::slice::from_ref(v),
            Operand::List(vs) => vs,
        }
    }
}

macro_rules! impl_scalar_operand {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(v: $t) -> Self {
                    Operand::Scalar(v.into())
                }
            }
        )*
    };
}

impl_scalar_operand!(
    Value,
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    String,
    &str,
    &String,
    NaiveDateTime,
    NaiveDate,
    NaiveTime
);

impl<Tz: TimeZone> From<DateTime<Tz>> for Operand {
    fn from(v: DateTime<Tz>) -> Self {
        Operand::Scalar(v.into())
    }
}

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(v: Option<T>) -> Self {
        Operand::Scalar(v.into())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Operand {
    fn from(v: Vec<T>) -> Self {
        Operand::list(v)
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Operand {
    fn from(v: &[T]) -> Self {
        Operand::list(v.iter().cloned())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Operand {
    fn from(v: [T; N]) -> Self {
        Operand::list(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pickle(v: impl Into<Value>) -> (String, bool) {
        let p = v.into().pickle();
        (p.text, p.parameterizable)
    }

    #[test]
    fn pickle_literals() {
        assert_eq!(pickle(Value::Null), ("NULL".to_string(), false));
        assert_eq!(pickle(true), ("1".to_string(), false));
        assert_eq!(pickle(false), ("0".to_string(), false));
        assert_eq!(pickle(42i32), ("42".to_string(), false));
        assert_eq!(pickle(-7i64), ("-7".to_string(), false));
        assert_eq!(pickle(1.5f64), ("1.5".to_string(), false));
    }

    #[test]
    fn non_finite_floats_become_null() {
        for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(pickle(v), ("NULL".to_string(), false));
            assert_eq!(Value::Float(v).to_param(), Value::Null);
        }
        assert_eq!(Value::Float(2.5).to_param(), Value::Float(2.5));
    }

    #[test]
    fn pickle_bindable() {
        assert_eq!(pickle("abc%"), ("abc%".to_string(), true));
        assert_eq!(pickle(Value::opaque(12u64)), ("12".to_string(), true));
    }

    #[test]
    fn pickle_temporal() {
        let date = NaiveDate::from_ymd_opt(2014, 3, 2).unwrap();
        let time = NaiveTime::from_hms_opt(12, 1, 2).unwrap();
        assert_eq!(pickle(date), ("2014-03-02".to_string(), true));
        assert_eq!(pickle(time), ("12:01:02".to_string(), true));
        assert_eq!(
            pickle(date.and_time(time)),
            ("2014-03-02 12:01:02".to_string(), true)
        );
    }

    #[test]
    fn option_maps_to_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    }

    #[test]
    fn to_param_keeps_literal_types() {
        let date = NaiveDate::from_ymd_opt(2014, 3, 12).unwrap();
        assert_eq!(Value::from(date).to_param(), Value::Text("2014-03-12".to_string()));
        assert_eq!(Value::Int(5).to_param(), Value::Int(5));
        assert_eq!(Value::Null.to_param(), Value::Null);
    }

    #[test]
    fn operand_shapes() {
        assert_eq!(Operand::from(3), Operand::Scalar(Value::Int(3)));
        assert_eq!(
            Operand::from([1, 2]),
            Operand::List(vec![Value::Int(1), Value::Int(2)])
        );
        assert_eq!(
            Operand::from(vec!["a"]),
            Operand::List(vec![Value::Text("a".to_string())])
        );
        assert_eq!(Operand::from(None::<&str>).values(), &[Value::Null]);
    }
}
