use immuorm_core::{CatalogError, ColumnType, Database, Error, Result, Row, Value};
use tracing::debug;

use crate::{
    NativeIndex,
    catalog_queries::{
        self, AUTO_INCREMENT_COLUMN, MAX_LENGTH_COLUMN, NAME_COLUMN, NULLABLE_COLUMN,
        PRIMARY_COLUMN, TABLE_EXISTS_QUERY, TABLE_NAMES_QUERY, TYPE_COLUMN, UNIQUE_COLUMN,
    },
};

pub(crate) fn table_exists(db: &Database, table: &str) -> Result<bool> {
    let mut connection = db.connection()?;
    if let Some(exists) = connection.table_exists(table) {
        return exists;
    }

    debug!(sql = TABLE_EXISTS_QUERY, table, "running catalog query");
    let rows = connection.query(TABLE_EXISTS_QUERY, &[Value::from(table)])?;
    Ok(!rows.is_empty())
}

pub(crate) fn table_names(db: &Database) -> Result<Vec<String>> {
    let rows = run_catalog_query(db, TABLE_NAMES_QUERY)?;
    rows.iter()
        .map(|row| string_value(row, TABLE_NAMES_QUERY, NAME_COLUMN))
        .collect()
}

/// Reads only `name`, the one column every `COLUMNS()` row is guaranteed to
/// carry.
pub(crate) fn column_names(db: &Database, table: &str) -> Result<Vec<String>> {
    let query = catalog_queries::columns_query(table);
    let rows = run_catalog_query(db, &query)?;
    rows.iter()
        .map(|row| string_value(row, &query, NAME_COLUMN))
        .collect()
}

pub(crate) fn column_types(db: &Database, table: &str) -> Result<Vec<ColumnType>> {
    let query = catalog_queries::columns_query(table);
    let rows = run_catalog_query(db, &query)?;

    rows.iter()
        .map(|row| -> Result<ColumnType> {
            Ok(ColumnType {
                name: string_value(row, &query, NAME_COLUMN)?,
                data_type: string_value(row, &query, TYPE_COLUMN)?,
                max_length: row
                    .get(MAX_LENGTH_COLUMN)
                    .and_then(Value::as_i64)
                    .and_then(|length| u32::try_from(length).ok())
                    .filter(|length| *length > 0),
                nullable: flag(row, NULLABLE_COLUMN),
                auto_increment: flag(row, AUTO_INCREMENT_COLUMN),
                primary_key: flag(row, PRIMARY_COLUMN),
                unique: flag(row, UNIQUE_COLUMN),
            })
        })
        .collect()
}

pub(crate) fn native_indexes(db: &Database, table: &str) -> Result<Vec<NativeIndex>> {
    let query = catalog_queries::indexes_query(table);
    let rows = run_catalog_query(db, &query)?;

    rows.iter()
        .map(|row| -> Result<NativeIndex> {
            let name = string_value(row, &query, NAME_COLUMN)?;
            NativeIndex::parse(
                table,
                name,
                flag(row, PRIMARY_COLUMN),
                flag(row, UNIQUE_COLUMN),
            )
            .map_err(Error::from)
        })
        .collect()
}

fn run_catalog_query(db: &Database, sql: &str) -> Result<Vec<Row>> {
    debug!(sql, "running catalog query");
    db.query(sql, &[])
}

fn string_value(row: &Row, query: &str, column: &str) -> Result<String> {
    row.get(column)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            CatalogError::UnexpectedRow {
                query: query.to_string(),
                column: column.to_string(),
            }
            .into()
        })
}

/// Missing and NULL flags read as false.
fn flag(row: &Row, column: &str) -> bool {
    row.get(column).and_then(Value::as_bool).unwrap_or(false)
}
