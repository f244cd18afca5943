use std::io;

use immuorm_core::{
    CapabilityError, CatalogError, ConfigError, Error, ExecutionError, LookupError,
};

fn non_execution_errors() -> Vec<Error> {
    vec![
        CapabilityError::Unsupported {
            operation: "DropView".to_string(),
            dialect: "immudb".to_string(),
        }
        .into(),
        LookupError::FieldNotFound {
            table: "employees".to_string(),
            name: "promote".to_string(),
        }
        .into(),
        LookupError::IndexNotFound {
            table: "employees".to_string(),
            name: "idx_missing".to_string(),
        }
        .into(),
        CatalogError::MalformedIndexName {
            table: "employees".to_string(),
            name: "employees(id)".to_string(),
        }
        .into(),
        CatalogError::UnexpectedRow {
            query: "SELECT name FROM TABLES()".to_string(),
            column: "name".to_string(),
        }
        .into(),
        ConfigError::UnknownDriver {
            driver: "immudb".to_string(),
        }
        .into(),
    ]
}

#[test]
fn errors_outside_execution_are_never_transient() {
    for error in non_execution_errors() {
        assert!(!error.is_transient(), "{error:?} must not be retried");
    }
}

#[test]
fn statement_and_connection_failures_are_transient() {
    let statement: Error =
        ExecutionError::statement_failed("SELECT 1", io::Error::other("timeout")).into();
    let connection: Error =
        ExecutionError::connection("acquiring a connection", io::Error::other("refused")).into();

    assert!(statement.is_transient());
    assert!(connection.is_transient());
}
