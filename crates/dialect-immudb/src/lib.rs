use std::fmt;

use immuorm_core::{
    CallbackConfig, Database, Dialect, DriverRegistry, Field, Migrator, Result, SqlExpr, Value,
    explain_sql,
};
use tracing::debug;

mod bind_var;
mod catalog_queries;
mod ddl;
mod index_name;
mod introspect;
mod migrator;
mod type_map;

pub use bind_var::needs_uuid_cast;
pub use ddl::Operation;
pub use index_name::{NativeIndex, decode_index_columns, encode_index_name, split_index_columns};
pub use migrator::ImmudbMigrator;
pub use type_map::FloatStorage;

pub const DIALECT_NAME: &str = "immudb";
pub const DEFAULT_DRIVER_NAME: &str = "immudb";

const EXPLAIN_ESCAPER: char = '\'';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Registry name of the driver that opens `dsn`. Empty means `immudb`.
    pub driver_name: String,
    /// Passed to the driver untouched.
    pub dsn: String,
    pub float_storage: FloatStorage,
    pub callbacks: CallbackConfig,
    /// immudb rejects inline index definitions in CREATE TABLE.
    pub create_index_after_create_table: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            driver_name: DEFAULT_DRIVER_NAME.to_string(),
            dsn: String::new(),
            float_storage: FloatStorage::default(),
            callbacks: default_callbacks(),
            create_index_after_create_table: true,
        }
    }
}

/// Clause order for each statement kind. UPDATE keeps the generic clauses;
/// immudb upserts are issued by the ORM, not through this list.
#[must_use]
pub fn default_callbacks() -> CallbackConfig {
    fn clauses(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    CallbackConfig {
        last_insert_id_reversed: true,
        create_clauses: clauses(&["INSERT", "VALUES"]),
        update_clauses: clauses(&["UPDATE", "SET", "WHERE", "ORDER BY", "LIMIT"]),
        delete_clauses: clauses(&["DELETE", "FROM", "WHERE", "ORDER BY", "LIMIT"]),
        query_clauses: clauses(&["SELECT", "FROM", "WHERE", "GROUP BY", "ORDER BY", "LIMIT"]),
    }
}

/// Dialect for `dsn` with every other setting at its default.
pub fn open(dsn: impl Into<String>) -> ImmudbDialect {
    ImmudbDialect::new(Config {
        dsn: dsn.into(),
        ..Config::default()
    })
}

#[derive(Debug, Clone, Default)]
pub struct ImmudbDialect {
    config: Config,
}

impl ImmudbDialect {
    #[must_use]
    pub fn new(mut config: Config) -> Self {
        if config.driver_name.is_empty() {
            config.driver_name = DEFAULT_DRIVER_NAME.to_string();
        }
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn immudb_migrator<'a>(&'a self, db: &'a Database) -> ImmudbMigrator<'a> {
        ImmudbMigrator::new(self, db)
    }
}

impl Dialect for ImmudbDialect {
    fn name(&self) -> &'static str {
        DIALECT_NAME
    }

    fn initialize(&self, drivers: &DriverRegistry) -> Result<Database> {
        let pool = drivers.open(&self.config.driver_name, &self.config.dsn)?;
        debug!(
            dialect = DIALECT_NAME,
            driver = %self.config.driver_name,
            "opened connection pool"
        );
        Ok(Database::new(pool, self.config.callbacks.clone()))
    }

    fn migrator<'a>(&'a self, db: &'a Database) -> Box<dyn Migrator + 'a> {
        Box::new(self.immudb_migrator(db))
    }

    fn data_type_of(&self, field: &Field) -> String {
        type_map::data_type_of(field, self.config.float_storage)
    }

    /// immudb has no DEFAULT clause.
    fn default_value_of(&self, _field: &Field) -> SqlExpr {
        SqlExpr::empty()
    }

    fn bind_var_to(&self, writer: &mut dyn fmt::Write, value: &Value) -> fmt::Result {
        bind_var::write_bind_var(writer, value)
    }

    /// Identifiers are written as-is; immudb has no quoting syntax.
    fn quote_to(&self, writer: &mut dyn fmt::Write, ident: &str) -> fmt::Result {
        writer.write_str(ident)
    }

    fn explain(&self, sql: &str, vars: &[Value]) -> String {
        explain_sql(sql, EXPLAIN_ESCAPER, vars)
    }
}
