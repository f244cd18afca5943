use std::fmt::Write as _;

use immuorm_core::{DataType, Field};

const INTEGER_TYPE: &str = "INTEGER";
const FLOAT_BLOB_WIDTH: u32 = 8;

/// How `float` fields are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatStorage {
    /// `FLOAT`
    #[default]
    Native,
    /// `BLOB[8]` holding the raw IEEE-754 bytes, for engine builds without
    /// a float type.
    Blob,
}

impl FloatStorage {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "native" | "float" => Some(Self::Native),
            "blob" => Some(Self::Blob),
            _ => None,
        }
    }
}

pub(crate) fn data_type_of(field: &Field, float_storage: FloatStorage) -> String {
    let mut sql = match &field.data_type {
        DataType::Bool => "BOOLEAN".to_string(),
        DataType::Int | DataType::Uint => INTEGER_TYPE.to_string(),
        DataType::Float => match float_storage {
            FloatStorage::Native => "FLOAT".to_string(),
            FloatStorage::Blob => return format!("BLOB[{FLOAT_BLOB_WIDTH}]"),
        },
        DataType::String => "VARCHAR".to_string(),
        DataType::Time => "TIMESTAMP".to_string(),
        DataType::Bytes => "BLOB".to_string(),
        DataType::Custom(tag) => tag.clone(),
    };

    if (sql == "BLOB" || sql == "VARCHAR") && field.size > 0 {
        write!(sql, "[{}]", field.size).expect("writing to String should not fail");
    }

    // Checked against the resolved type so custom `INTEGER` tags qualify too.
    if sql == INTEGER_TYPE && field.primary_key && field.auto_increment {
        sql.push_str(" AUTO_INCREMENT");
    }

    sql
}
