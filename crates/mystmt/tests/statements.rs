//! Public API tests: free constructors, shared configs and serialized parameters.

use mystmt::{
    BoundParams, Conjunction, SqlStmt, StmtConfig, StmtError, StmtOutput, Value, delete_from,
    insert_into, lock, select_from, union, update,
};

#[test]
fn shared_config_applies_to_every_statement() {
    let config = StmtConfig::from_toml_str(
        r#"
        placeholder = false
        quote_all_values = true
        "#,
    )
    .unwrap();

    let select = select_from("t1")
        .with_config(config.clone())
        .where_value("t1c1", "abc")
        .where_value("t1c2", 5);
    assert_eq!(
        select.sql().unwrap(),
        StmtOutput::Sql("SELECT * FROM t1 WHERE (`t1c1` = 'abc' AND `t1c2` = 5)".to_string())
    );

    let insert = insert_into("t1")
        .with_config(config.clone())
        .set_value("t1c1", "it's");
    assert_eq!(
        insert.to_sql().unwrap(),
        "INSERT INTO t1 (`t1c1`) VALUES ('it\\'s')"
    );

    let update = update("t1")
        .with_config(config)
        .set_value("t1c1", "x")
        .where_value("t1c2", [1, 2]);
    assert_eq!(
        update.to_sql().unwrap(),
        "UPDATE t1 SET `t1c1`='x' WHERE `t1c2` IN (1, 2)"
    );
}

#[test]
fn config_file_is_loaded() {
    let path = std::env::temp_dir().join(format!("mystmt-config-{}.toml", std::process::id()));
    std::fs::write(&path, "placeholder = \"%s\"\nquote_all_col_refs = false\n").unwrap();

    let config = StmtConfig::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let built = select_from("t1")
        .with_config(config)
        .where_value("t1c1", "a")
        .build()
        .unwrap();
    assert_eq!(built.sql, "SELECT * FROM t1 WHERE t1c1 = %s");
}

#[test]
fn config_errors_are_reported() {
    let err = StmtConfig::from_toml_str("placeholders = true").unwrap_err();
    assert!(matches!(err, StmtError::Config(_)));

    let err = StmtConfig::load("/nonexistent/mystmt.toml").unwrap_err();
    assert!(matches!(err, StmtError::Config(_)));
}

#[test]
fn params_serialize_as_plain_json() {
    let built = select_from("t1")
        .where_value("t1c1", "a")
        .where_raw_value_params("t1c2", "? + ?", "=", [Value::Int(1), Value::Null])
        .build()
        .unwrap();

    let json = serde_json::to_value(&built).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "sql": "SELECT * FROM t1 WHERE (`t1c1` = ? AND `t1c2` = ? + ?)",
            "params": ["a", 1, null],
        })
    );
}

#[test]
fn batch_params_serialize_as_rows() {
    let built = insert_into("t1")
        .columns(["t1c1", "t1c2"])
        .set_batch_value([["a", "b"], ["c", "d"]])
        .build()
        .unwrap();

    assert!(matches!(built.params, Some(BoundParams::Batch(ref rows)) if rows.len() == 2));
    let json = serde_json::to_value(built.params.as_ref().unwrap()).unwrap();
    assert_eq!(json, serde_json::json!([["a", "b"], ["c", "d"]]));
}

#[test]
fn statements_compose() {
    let recent = select_from("orders")
        .column("customer_id")
        .where_raw_value_op("created_at", "NOW() - INTERVAL 1 DAY", ">");

    let customers = select_from("customers")
        .columns(["id", "name"])
        .where_select("id", recent, "IN")
        .where_group(Conjunction::Or, true)
        .where_value("status", "banned")
        .where_value("status", "closed");

    let built = union()
        .select(customers)
        .select(select_from("vip").columns(["id", "name"]))
        .order_by("name")
        .build()
        .unwrap();

    assert_eq!(
        built.sql,
        "(SELECT `id`, `name` FROM customers WHERE (`id` IN (SELECT `customer_id` FROM orders \
         WHERE `created_at` > NOW() - INTERVAL 1 DAY) OR NOT (`status` = ? OR `status` = ?))) \
         UNION (SELECT `id`, `name` FROM vip) ORDER BY name"
    );
    assert_eq!(
        built.values(),
        &[Value::from("banned"), Value::from("closed")]
    );
}

#[test]
fn delete_and_lock_round_out_the_api() {
    let built = delete_from("sessions")
        .where_raw_value_op("expires_at", "NOW()", "<")
        .limit(1000)
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "DELETE FROM sessions WHERE `expires_at` < NOW() LIMIT 1000"
    );

    let guard = lock("cleanup").timeout(10);
    assert_eq!(guard.get_lock().unwrap().sql(), "SELECT GET_LOCK('cleanup', 10)");
    assert_eq!(guard.release_lock().unwrap().sql(), "SELECT RELEASE_LOCK('cleanup')");
}
