//! Property-based tests for condition rendering and value binding.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use mystmt::value::{DATETIME_FORMAT, TIME_FORMAT};
use mystmt::{Conjunction, SqlStmt, Value, delete_from, select_from};
use proptest::prelude::*;

// ============================================================================
// Property-Based Tests: parameter order
// ============================================================================

proptest! {
    /// Every bound value lands in the parameter list in placeholder order.
    #[test]
    fn prop_params_follow_placeholders(values in prop::collection::vec("[a-z]{1,8}", 1..12)) {
        let mut stmt = select_from("t1").where_or();
        for value in &values {
            stmt = stmt.where_value("t1c1", value.as_str());
        }
        let built = stmt.build().unwrap();

        prop_assert_eq!(built.sql.matches('?').count(), values.len());
        let expected: Vec<Value> = values.iter().map(|v| Value::from(v.as_str())).collect();
        prop_assert_eq!(built.values(), expected.as_slice());
    }

    /// Integer lists are inlined; one element collapses to `=`, more become `IN`.
    #[test]
    fn prop_int_lists_are_inlined(values in prop::collection::vec(any::<i32>(), 1..20)) {
        let built = select_from("t1").where_value("t1c1", values.clone()).build().unwrap();
        prop_assert_eq!(built.params, None);

        let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
        let expected = if values.len() == 1 {
            format!("SELECT * FROM t1 WHERE `t1c1` = {}", rendered[0])
        } else {
            format!("SELECT * FROM t1 WHERE `t1c1` IN ({})", rendered.join(", "))
        };
        prop_assert_eq!(built.sql, expected);
    }

    /// Dates are bound as `YYYY-MM-DD` text that parses back to the same date.
    #[test]
    fn prop_dates_bind_as_iso_text(days in 0i64..200_000) {
        let date = NaiveDate::from_ymd_opt(1000, 1, 1).unwrap() + chrono::Days::new(days as u64);
        let built = select_from("t1").where_value("t1c1", date).build().unwrap();

        match built.values() {
            [Value::Text(text)] => {
                let parsed = NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap();
                prop_assert_eq!(parsed, date);
            }
            other => prop_assert!(false, "unexpected params {:?}", other),
        }
    }

    /// Datetimes bind as `YYYY-MM-DD HH:MM:SS` text at whole-second precision.
    #[test]
    fn prop_datetimes_bind_as_iso_text(days in 0u64..200_000, secs in 0u32..86_400) {
        let date = NaiveDate::from_ymd_opt(1000, 1, 1).unwrap() + chrono::Days::new(days);
        let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap();
        let datetime = NaiveDateTime::new(date, time);
        let built = select_from("t1").where_value("t1c1", datetime).build().unwrap();

        match built.values() {
            [Value::Text(text)] => {
                let parsed = NaiveDateTime::parse_from_str(text, DATETIME_FORMAT).unwrap();
                prop_assert_eq!(parsed, datetime);
            }
            other => prop_assert!(false, "unexpected params {:?}", other),
        }
    }

    /// Times bind as `HH:MM:SS` text that parses back to the same time.
    #[test]
    fn prop_times_bind_as_iso_text(secs in 0u32..86_400) {
        let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap();
        let built = select_from("t1").where_value("t1c1", time).build().unwrap();

        match built.values() {
            [Value::Text(text)] => {
                let parsed = NaiveTime::parse_from_str(text, TIME_FORMAT).unwrap();
                prop_assert_eq!(parsed, time);
            }
            other => prop_assert!(false, "unexpected params {:?}", other),
        }
    }

    /// Groups without predicates never produce a WHERE clause.
    #[test]
    fn prop_empty_groups_render_nothing(groups in prop::collection::vec(any::<(bool, bool)>(), 0..8)) {
        let mut stmt = select_from("t1");
        for (or, negated) in groups {
            let conjunction = if or { Conjunction::Or } else { Conjunction::And };
            stmt = stmt.where_group(conjunction, negated);
        }
        prop_assert_eq!(stmt.to_sql().unwrap(), "SELECT * FROM t1");
    }

    /// Under AND the last value per field wins; under OR every value is kept.
    #[test]
    fn prop_and_dedups_or_keeps(values in prop::collection::vec(0i64..1000, 2..6)) {
        let last = *values.last().unwrap();

        let mut and_stmt = delete_from("t1");
        let mut or_stmt = delete_from("t1").where_or();
        for value in &values {
            and_stmt = and_stmt.where_value("t1c1", *value);
            or_stmt = or_stmt.where_value("t1c1", *value);
        }

        prop_assert_eq!(
            and_stmt.to_sql().unwrap(),
            format!("DELETE FROM t1 WHERE `t1c1` = {last}")
        );
        let ors: Vec<String> = values.iter().map(|v| format!("`t1c1` = {v}")).collect();
        prop_assert_eq!(
            or_stmt.to_sql().unwrap(),
            format!("DELETE FROM t1 WHERE ({})", ors.join(" OR "))
        );
    }
}
