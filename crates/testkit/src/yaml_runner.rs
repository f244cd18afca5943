use std::collections::BTreeMap;

use immuorm_core::{DataType, Dialect, Field};
use serde::Deserialize;

const TYPE_CASE_FIELD_NAME: &str = "Value";
const TYPE_CASE_COLUMN_NAME: &str = "value";

/// One column-type expectation: the field's attributes and the clause the
/// dialect must render for it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypeCase {
    /// Logical type tag, `bool`, `int`, `uint`, `float`, `string`, `time`,
    /// `bytes` or anything else for a custom type.
    pub data_type: String,
    pub size: u32,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub not_null: bool,
    /// `native` or `blob`; `None` keeps the dialect default.
    pub float_storage: Option<String>,
    pub expected: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    Passed,
    Failed(String),
}

impl TypeCase {
    #[must_use]
    pub fn field(&self) -> Field {
        let mut field = Field::new(
            TYPE_CASE_FIELD_NAME,
            TYPE_CASE_COLUMN_NAME,
            DataType::from_tag(&self.data_type),
        )
        .with_size(self.size);
        if self.primary_key {
            field = field.with_primary_key();
        }
        if self.auto_increment {
            field = field.with_auto_increment();
        }
        if self.not_null {
            field = field.with_not_null();
        }
        field
    }
}

pub fn load_type_cases_from_str(
    yaml: &str,
) -> std::result::Result<BTreeMap<String, TypeCase>, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Compares the full column clause `dialect` renders for the case's field.
pub fn run_type_case(dialect: &dyn Dialect, case: &TypeCase) -> TestResult {
    let actual = dialect.full_data_type_of(&case.field());
    if actual == case.expected {
        return TestResult::Passed;
    }

    TestResult::Failed(format!(
        "{} dialect rendered `{actual}` for `{}`, expected `{}`",
        dialect.name(),
        case.data_type,
        case.expected
    ))
}
