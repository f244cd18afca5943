use std::sync::Arc;

use immuorm_core::{BoxError, Value, Valuer, explain_sql};
use uuid::Uuid;

#[derive(Debug)]
struct AccountId(&'static str);

impl Valuer for AccountId {
    fn driver_value(&self) -> Result<Value, BoxError> {
        Ok(Value::String(self.0.to_string()))
    }
}

#[derive(Debug)]
struct Broken;

impl Valuer for Broken {
    fn driver_value(&self) -> Result<Value, BoxError> {
        Err(Box::new(std::io::Error::other("cannot serialize")))
    }
}

#[test]
fn inlines_values_in_placeholder_order() {
    let sql = "SELECT * FROM employees WHERE name = ? AND salary > ? AND active = ? AND boss IS ?";
    let rendered = explain_sql(
        sql,
        '\'',
        &[
            Value::from("O'Brien"),
            Value::from(1200),
            Value::Bool(true),
            Value::Null,
        ],
    );

    assert_eq!(
        rendered,
        "SELECT * FROM employees WHERE name = 'O''Brien' AND salary > 1200 AND active = true AND boss IS NULL",
    );
}

#[test]
fn renders_uuid_bytes_and_valuers() {
    let id = Uuid::parse_str("6f2c1d8e-43c5-4d8f-9b0a-0a2b3c4d5e6f").expect("valid uuid");
    let rendered = explain_sql(
        "? ? ? ? ? ?",
        '\'',
        &[
            Value::Uuid(id),
            Value::Bytes(b"plain".to_vec()),
            Value::Bytes(vec![0, 159, 146, 150]),
            Value::valuer(AccountId("acc-1")),
            Value::Valuer(Arc::new(Broken)),
            Value::Float(1.5),
        ],
    );

    assert_eq!(
        rendered,
        "'6f2c1d8e-43c5-4d8f-9b0a-0a2b3c4d5e6f' 'plain' <binary> 'acc-1' <invalid value> 1.5",
    );
}

#[test]
fn extra_placeholders_are_left_untouched() {
    assert_eq!(
        explain_sql("SELECT ?::UUID, ?", '\'', &[Value::from(7)]),
        "SELECT 7::UUID, ?",
    );
}
