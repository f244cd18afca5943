mod config;
mod connection;
mod database;
mod dialect;
mod error;
mod explain;
mod migrator;
mod naming;
mod schema;
mod value;

pub use config::{CallbackConfig, StatementKind};
pub use connection::{Connection, ConnectionPool, Driver, DriverRegistry};
pub use database::Database;
pub use dialect::{Dialect, SqlBuilder, SqlExpr};
pub use error::{
    BoxError, CapabilityError, CatalogError, ConfigError, Error, ExecutionError, LookupError,
    Result,
};
pub use explain::explain_sql;
pub use migrator::{ColumnType, IndexInfo, Migrator, ViewOption, lookup_field};
pub use naming::{DefaultNamingStrategy, NamingStrategy};
pub use schema::{DataType, Field, IndexColumn, IndexDef, TableSchema};
pub use value::{Row, Value, Valuer};
