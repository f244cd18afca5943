// immudb names every index `<table>[<col1>,<col2>,...]` and does not accept a
// name in CREATE INDEX. This module is the only place that knows the format.

use immuorm_core::{CatalogError, IndexInfo, NamingStrategy};

const COLUMNS_OPEN: char = '[';
const COLUMNS_CLOSE: char = ']';
const COLUMN_SEPARATOR: char = ',';

/// An index as `INDEXES(<table>)` reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeIndex {
    pub table: String,
    pub name: String,
    pub columns: Vec<String>,
    pub primary: bool,
    pub unique: bool,
}

impl NativeIndex {
    /// Decodes the column list out of the engine-assigned `name`.
    pub fn parse(
        table: impl Into<String>,
        name: impl Into<String>,
        primary: bool,
        unique: bool,
    ) -> Result<Self, CatalogError> {
        let table = table.into();
        let name = name.into();
        let columns = split_index_columns(decode_index_columns(&table, &name)?);

        Ok(Self {
            table,
            name,
            columns,
            primary,
            unique,
        })
    }

    /// The name the ORM would give an index over the same columns.
    #[must_use]
    pub fn orm_name(&self, naming: &dyn NamingStrategy) -> String {
        naming.index_name(&self.table, &self.columns)
    }

    /// True when `name` is either the engine name or the ORM name.
    #[must_use]
    pub fn matches(&self, name: &str, naming: &dyn NamingStrategy) -> bool {
        self.name == name || self.orm_name(naming) == name
    }

    #[must_use]
    pub fn to_index_info(&self, naming: &dyn NamingStrategy) -> IndexInfo {
        IndexInfo {
            table: self.table.clone(),
            name: self.orm_name(naming),
            engine_name: self.name.clone(),
            columns: self.columns.clone(),
            primary_key: self.primary,
            unique: self.unique,
            option: String::new(),
        }
    }
}

#[must_use]
pub fn encode_index_name<S: AsRef<str>>(table: &str, columns: &[S]) -> String {
    let mut name = String::with_capacity(table.len() + 2);
    name.push_str(table);
    name.push(COLUMNS_OPEN);
    for (position, column) in columns.iter().enumerate() {
        if position > 0 {
            name.push(COLUMN_SEPARATOR);
        }
        name.push_str(column.as_ref());
    }
    name.push(COLUMNS_CLOSE);
    name
}

/// Strips `table` and the brackets from an engine index name, leaving the
/// comma-joined column list.
pub fn decode_index_columns<'n>(table: &str, name: &'n str) -> Result<&'n str, CatalogError> {
    name.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(COLUMNS_OPEN))
        .and_then(|rest| rest.strip_suffix(COLUMNS_CLOSE))
        .filter(|columns| !columns.is_empty())
        .ok_or_else(|| CatalogError::MalformedIndexName {
            table: table.to_string(),
            name: name.to_string(),
        })
}

/// Splits a decoded column list. Order is the index's column order.
#[must_use]
pub fn split_index_columns(columns: &str) -> Vec<String> {
    columns
        .split(COLUMN_SEPARATOR)
        .map(|column| column.trim().to_string())
        .collect()
}
