use std::fmt;

use immuorm_core::Value;
use uuid::Uuid;

const PLACEHOLDER: char = '?';
const UUID_CAST: &str = "::UUID";

/// Whether `value` is a UUID, directly or through one level of `Valuer`.
///
/// The immudb driver only ships UUIDs as strings, so without an explicit
/// cast the engine compares them as `VARCHAR`. Plain strings are never cast,
/// and fields nested inside a valuer's own value are not inspected.
#[must_use]
pub fn needs_uuid_cast(value: &Value) -> bool {
    match value {
        Value::Uuid(_) => true,
        Value::Valuer(valuer) => match valuer.driver_value() {
            Ok(Value::String(text)) => Uuid::parse_str(&text).is_ok(),
            _ => false,
        },
        _ => false,
    }
}

pub(crate) fn write_bind_var(writer: &mut dyn fmt::Write, value: &Value) -> fmt::Result {
    writer.write_char(PLACEHOLDER)?;
    if needs_uuid_cast(value) {
        writer.write_str(UUID_CAST)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use immuorm_core::{BoxError, Valuer};

    use super::*;

    const SAMPLE_UUID: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

    #[derive(Debug)]
    struct StringKey(&'static str);

    impl Valuer for StringKey {
        fn driver_value(&self) -> Result<Value, BoxError> {
            Ok(Value::from(self.0))
        }
    }

    #[derive(Debug)]
    struct BrokenKey;

    impl Valuer for BrokenKey {
        fn driver_value(&self) -> Result<Value, BoxError> {
            Err("key is not serializable".into())
        }
    }

    fn render(value: &Value) -> String {
        let mut sql = String::new();
        write_bind_var(&mut sql, value).expect("writing to String should not fail");
        sql
    }

    #[test]
    fn casts_native_uuids() {
        let id = Uuid::parse_str(SAMPLE_UUID).expect("valid uuid");
        assert_eq!(render(&Value::Uuid(id)), "?::UUID");
    }

    #[test]
    fn casts_valuers_serializing_to_uuid_strings() {
        assert_eq!(render(&Value::valuer(StringKey(SAMPLE_UUID))), "?::UUID");
        assert_eq!(render(&Value::valuer(StringKey("employee-7"))), "?");
        assert_eq!(render(&Value::valuer(BrokenKey)), "?");
    }

    #[test]
    fn leaves_plain_values_alone() {
        assert_eq!(render(&Value::from(SAMPLE_UUID)), "?");
        assert_eq!(render(&Value::from(42_i64)), "?");
        assert_eq!(render(&Value::Null), "?");
    }
}
