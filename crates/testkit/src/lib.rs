use immuorm_core::{DataType, Field, TableSchema};

mod fake_engine;
mod yaml_runner;

pub use fake_engine::{FakeEngine, IndexRow};
pub use yaml_runner::{TestResult, TypeCase, load_type_cases_from_str, run_type_case};

/// `employees` on top of the base model, with a name and a salary column.
pub fn employee_schema() -> TableSchema {
    TableSchema::with_base_model("employees")
        .with_field(Field::new("Name", "name", DataType::String))
        .with_field(Field::new("Salary", "salary", DataType::Int))
}
