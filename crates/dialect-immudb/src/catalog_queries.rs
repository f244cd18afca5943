// immudb has no information schema; metadata comes from the TABLES(),
// COLUMNS(<table>) and INDEXES(<table>) table functions. The table functions
// take a literal, not a bind variable.

pub(crate) const TABLE_EXISTS_QUERY: &str = "SELECT name FROM TABLES() WHERE name = ?";
pub(crate) const TABLE_NAMES_QUERY: &str = "SELECT name FROM TABLES()";

pub(crate) const NAME_COLUMN: &str = "name";
pub(crate) const TYPE_COLUMN: &str = "type";
pub(crate) const MAX_LENGTH_COLUMN: &str = "max_length";
pub(crate) const NULLABLE_COLUMN: &str = "nullable";
pub(crate) const AUTO_INCREMENT_COLUMN: &str = "auto_increment";
pub(crate) const PRIMARY_COLUMN: &str = "primary";
pub(crate) const UNIQUE_COLUMN: &str = "unique";

pub(crate) fn columns_query(table: &str) -> String {
    format!("SELECT * FROM COLUMNS({})", quote_literal(table))
}

pub(crate) fn indexes_query(table: &str) -> String {
    format!("SELECT * FROM INDEXES({})", quote_literal(table))
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
