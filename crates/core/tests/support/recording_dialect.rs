use std::{
    fmt,
    sync::{Arc, Mutex},
};

use immuorm_core::{
    CallbackConfig, ColumnType, Connection, ConnectionPool, DataType, Database, Dialect,
    DriverRegistry, Field, IndexInfo, Migrator, Result, Row, SqlExpr, TableSchema, Value,
    ViewOption, explain_sql,
};

#[derive(Debug, Default)]
pub struct RecordingPool {
    executed: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingPool {
    pub fn executed_sql(&self) -> Vec<String> {
        self.executed.lock().expect("recording pool poisoned").clone()
    }
}

struct RecordingConnection {
    pool: Arc<RecordingPool>,
}

impl Connection for RecordingConnection {
    fn query(&mut self, sql: &str, _params: &[Value]) -> Result<Vec<Row>> {
        self.pool
            .executed
            .lock()
            .expect("recording pool poisoned")
            .push(sql.to_string());
        Ok(Vec::new())
    }

    fn execute(&mut self, sql: &str, _params: &[Value]) -> Result<u64> {
        self.pool
            .executed
            .lock()
            .expect("recording pool poisoned")
            .push(sql.to_string());
        Ok(0)
    }
}

pub struct SharedPool(pub Arc<RecordingPool>);

impl ConnectionPool for SharedPool {
    fn acquire(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(RecordingConnection {
            pool: Arc::clone(&self.0),
        }))
    }
}

/// Quotes with double quotes and maps types to ANSI names.
#[derive(Debug, Default)]
pub struct AnsiDialect;

impl Dialect for AnsiDialect {
    fn name(&self) -> &'static str {
        "ansi"
    }

    fn initialize(&self, _drivers: &DriverRegistry) -> Result<Database> {
        Ok(Database::new(
            Arc::new(SharedPool(Arc::default())),
            CallbackConfig::default(),
        ))
    }

    fn migrator<'a>(&'a self, db: &'a Database) -> Box<dyn Migrator + 'a> {
        Box::new(StubMigrator {
            dialect: self,
            db,
            tables: Vec::new(),
            columns: Vec::new(),
        })
    }

    fn data_type_of(&self, field: &Field) -> String {
        match &field.data_type {
            DataType::Int | DataType::Uint => "integer".to_string(),
            DataType::String if field.size > 0 => format!("varchar({})", field.size),
            DataType::String => "text".to_string(),
            other => other.tag().to_string(),
        }
    }

    fn default_value_of(&self, _field: &Field) -> SqlExpr {
        SqlExpr::empty()
    }

    fn bind_var_to(&self, writer: &mut dyn fmt::Write, _value: &Value) -> fmt::Result {
        writer.write_char('?')
    }

    fn quote_to(&self, writer: &mut dyn fmt::Write, ident: &str) -> fmt::Result {
        write!(writer, "\"{ident}\"")
    }

    fn explain(&self, sql: &str, vars: &[Value]) -> String {
        explain_sql(sql, '\'', vars)
    }
}

/// Answers introspection from fixed lists and keeps every generic default.
pub struct StubMigrator<'a> {
    pub dialect: &'a AnsiDialect,
    pub db: &'a Database,
    pub tables: Vec<String>,
    pub columns: Vec<ColumnType>,
}

impl Migrator for StubMigrator<'_> {
    fn dialect(&self) -> &dyn Dialect {
        self.dialect
    }

    fn database(&self) -> &Database {
        self.db
    }

    fn drop_table(&self, _schema: &TableSchema) -> Result<()> {
        Ok(())
    }

    fn has_table(&self, schema: &TableSchema) -> bool {
        self.tables.contains(&schema.table)
    }

    fn rename_table(&self, _from: &TableSchema, _to: &TableSchema) -> Result<()> {
        Ok(())
    }

    fn get_tables(&self) -> Result<Vec<String>> {
        Ok(self.tables.clone())
    }

    fn add_column(&self, schema: &TableSchema, name: &str) -> Result<()> {
        self.exec(SqlExpr::new(format!("ADD {} {name}", schema.table)))
    }

    fn has_column(&self, _schema: &TableSchema, name: &str) -> bool {
        self.columns.iter().any(|column| column.name == name)
    }

    fn column_types(&self, _schema: &TableSchema) -> Result<Vec<ColumnType>> {
        Ok(self.columns.clone())
    }

    fn create_view(&self, _name: &str, _option: &ViewOption) -> Result<()> {
        Ok(())
    }

    fn drop_view(&self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn create_constraint(&self, _schema: &TableSchema, _name: &str) -> Result<()> {
        Ok(())
    }

    fn drop_constraint(&self, _schema: &TableSchema, _name: &str) -> Result<()> {
        Ok(())
    }

    fn has_constraint(&self, _schema: &TableSchema, _name: &str) -> bool {
        false
    }

    fn create_index(&self, schema: &TableSchema, name: &str) -> Result<()> {
        self.exec(SqlExpr::new(format!("INDEX {} {name}", schema.table)))
    }

    fn drop_index(&self, _schema: &TableSchema, _name: &str) -> Result<()> {
        Ok(())
    }

    fn has_index(&self, _schema: &TableSchema, _name: &str) -> bool {
        false
    }

    fn rename_index(&self, _schema: &TableSchema, _old: &str, _new: &str) -> Result<()> {
        Ok(())
    }

    fn get_indexes(&self, _schema: &TableSchema) -> Result<Vec<IndexInfo>> {
        Ok(Vec::new())
    }

    fn current_database(&self) -> String {
        String::new()
    }
}
