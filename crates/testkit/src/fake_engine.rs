// In-memory stand-in for an immudb SQL endpoint. It understands the DDL the
// immudb dialect emits and the TABLES()/COLUMNS()/INDEXES() catalog functions,
// nothing more.

use std::{
    collections::BTreeMap,
    io,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use immuorm_core::{
    Connection, ConnectionPool, Driver, Error, ExecutionError, Result, Row, Value,
};

const TABLE_EXISTS_QUERY: &str = "SELECT name FROM TABLES() WHERE name = ?";
const TABLE_NAMES_QUERY: &str = "SELECT name FROM TABLES()";
const COLUMNS_QUERY_PREFIX: &str = "SELECT * FROM COLUMNS(";
const INDEXES_QUERY_PREFIX: &str = "SELECT * FROM INDEXES(";
const POISONED_STATE_MESSAGE: &str = "fake engine state was poisoned";

const TABLE_ROW_COLUMNS: &[&str] = &["name"];
const COLUMN_ROW_COLUMNS: &[&str] = &[
    "table",
    "name",
    "type",
    "max_length",
    "nullable",
    "auto_increment",
    "indexed",
    "primary",
    "unique",
];
const INDEX_ROW_COLUMNS: &[&str] = &["table", "name", "unique", "primary"];
const KNOWN_TYPES: &[&str] = &[
    "BOOLEAN",
    "INTEGER",
    "FLOAT",
    "VARCHAR",
    "TIMESTAMP",
    "BLOB",
    "UUID",
    "JSON",
];

/// A row the fake reports from `INDEXES()` instead of its own bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub name: String,
    pub unique: bool,
    pub primary: bool,
}

impl IndexRow {
    pub fn new(name: impl Into<String>, unique: bool, primary: bool) -> Self {
        Self {
            name: name.into(),
            unique,
            primary,
        }
    }
}

#[derive(Debug, Clone)]
struct FailureRule {
    sql_prefix: String,
    message: String,
}

#[derive(Debug, Clone)]
struct FakeColumn {
    name: String,
    data_type: String,
    max_length: Option<u32>,
    not_null: bool,
    auto_increment: bool,
}

#[derive(Debug, Clone)]
struct FakeIndex {
    columns: Vec<String>,
    unique: bool,
    primary: bool,
}

#[derive(Debug, Clone)]
struct FakeTable {
    name: String,
    columns: Vec<FakeColumn>,
    indexes: Vec<FakeIndex>,
}

impl FakeTable {
    fn column(&self, name: &str) -> Option<&FakeColumn> {
        self.columns.iter().find(|column| column.name == name)
    }

    fn is_indexed(&self, column: &str) -> bool {
        self.indexes
            .iter()
            .any(|index| index.columns.iter().any(|c| c == column))
    }
}

#[derive(Debug, Default)]
struct EngineState {
    tables: Vec<FakeTable>,
    statements: Vec<String>,
    opened_dsns: Vec<String>,
    open_connections: usize,
    acquired_connections: usize,
    failures: Vec<FailureRule>,
    acquire_failure: Option<String>,
    native_table_probe: bool,
    column_types_hidden: bool,
    index_row_overrides: BTreeMap<String, Vec<IndexRow>>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeEngine {
    state: Arc<Mutex<EngineState>>,
}

impl FakeEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pool(&self) -> Arc<dyn ConnectionPool> {
        Arc::new(FakePool {
            engine: self.clone(),
        })
    }

    #[must_use]
    pub fn driver(&self) -> Arc<dyn Driver> {
        Arc::new(FakeDriver {
            engine: self.clone(),
        })
    }

    /// Every statement a connection received, queries included.
    pub fn statements(&self) -> Vec<String> {
        self.snapshot().statements.clone()
    }

    pub fn statement_count(&self) -> usize {
        self.snapshot().statements.len()
    }

    pub fn clear_statements(&self) {
        self.snapshot().statements.clear();
    }

    pub fn opened_dsns(&self) -> Vec<String> {
        self.snapshot().opened_dsns.clone()
    }

    pub fn open_connections(&self) -> usize {
        self.snapshot().open_connections
    }

    pub fn acquired_connections(&self) -> usize {
        self.snapshot().acquired_connections
    }

    pub fn table_names(&self) -> Vec<String> {
        self.snapshot()
            .tables
            .iter()
            .map(|table| table.name.clone())
            .collect()
    }

    /// Fails every statement starting with `sql_prefix`. The statement is
    /// still recorded.
    pub fn fail_on(&self, sql_prefix: impl Into<String>, message: impl Into<String>) {
        self.snapshot().failures.push(FailureRule {
            sql_prefix: sql_prefix.into(),
            message: message.into(),
        });
    }

    pub fn clear_failures(&self) {
        let mut state = self.snapshot();
        state.failures.clear();
        state.acquire_failure = None;
    }

    pub fn fail_acquire(&self, message: impl Into<String>) {
        self.snapshot().acquire_failure = Some(message.into());
    }

    pub fn enable_native_table_probe(&self) {
        self.snapshot().native_table_probe = true;
    }

    /// Reports `type` as NULL in every `COLUMNS()` row.
    pub fn hide_column_types(&self) {
        self.snapshot().column_types_hidden = true;
    }

    pub fn override_index_rows(&self, table: impl Into<String>, rows: Vec<IndexRow>) {
        self.snapshot().index_row_overrides.insert(table.into(), rows);
    }

    fn snapshot(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self, context: &str) -> Result<MutexGuard<'_, EngineState>> {
        self.state.lock().map_err(|_| {
            ExecutionError::connection(context, io::Error::other(POISONED_STATE_MESSAGE)).into()
        })
    }

    fn run(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let mut state = self.lock(sql)?;
        state.statements.push(sql.to_string());

        if let Some(rule) = state
            .failures
            .iter()
            .find(|rule| sql.starts_with(&rule.sql_prefix))
        {
            return Err(statement_error(sql, rule.message.clone()));
        }

        state
            .interpret(sql, params)
            .map_err(|message| statement_error(sql, message))
    }
}

struct FakeDriver {
    engine: FakeEngine,
}

impl Driver for FakeDriver {
    fn open(&self, dsn: &str) -> Result<Arc<dyn ConnectionPool>> {
        self.engine.lock("opening the fake engine")?.opened_dsns.push(dsn.to_string());
        Ok(self.engine.pool())
    }
}

struct FakePool {
    engine: FakeEngine,
}

impl ConnectionPool for FakePool {
    fn acquire(&self) -> Result<Box<dyn Connection>> {
        let mut state = self.engine.lock("acquiring a connection")?;
        if let Some(message) = &state.acquire_failure {
            return Err(
                ExecutionError::connection("acquiring a connection", io::Error::other(message.clone()))
                    .into(),
            );
        }
        state.open_connections += 1;
        state.acquired_connections += 1;

        Ok(Box::new(FakeConnection {
            engine: self.engine.clone(),
        }))
    }
}

struct FakeConnection {
    engine: FakeEngine,
}

impl Connection for FakeConnection {
    fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        self.engine.run(sql, params)
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        self.engine.run(sql, params).map(|_| 0)
    }

    fn table_exists(&mut self, table: &str) -> Option<Result<bool>> {
        let state = match self.engine.lock("probing table existence") {
            Ok(state) => state,
            Err(error) => return Some(Err(error)),
        };
        if !state.native_table_probe {
            return None;
        }
        Some(Ok(state.tables.iter().any(|candidate| candidate.name == table)))
    }
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        let mut state = self.engine.snapshot();
        state.open_connections = state.open_connections.saturating_sub(1);
    }
}

impl EngineState {
    fn interpret(&mut self, sql: &str, params: &[Value]) -> std::result::Result<Vec<Row>, String> {
        let sql = sql.trim().trim_end_matches(';').trim_end();

        if sql == TABLE_EXISTS_QUERY {
            let name = params
                .first()
                .and_then(Value::as_str)
                .ok_or("TABLES() filter expects one string parameter")?;
            return Ok(self
                .tables
                .iter()
                .filter(|table| table.name == name)
                .map(|table| table_row(&table.name))
                .collect());
        }
        if sql == TABLE_NAMES_QUERY {
            return Ok(self
                .tables
                .iter()
                .map(|table| table_row(&table.name))
                .collect());
        }
        if let Some(rest) = sql.strip_prefix(COLUMNS_QUERY_PREFIX) {
            let table = parse_table_argument(rest)?;
            return self.column_rows(&table);
        }
        if let Some(rest) = sql.strip_prefix(INDEXES_QUERY_PREFIX) {
            let table = parse_table_argument(rest)?;
            return self.index_rows(&table);
        }
        if let Some(rest) = sql.strip_prefix("CREATE TABLE ") {
            self.create_table(rest)?;
        } else if let Some(rest) = sql.strip_prefix("CREATE UNIQUE INDEX ON ") {
            self.create_index(rest, true)?;
        } else if let Some(rest) = sql.strip_prefix("CREATE INDEX ON ") {
            self.create_index(rest, false)?;
        } else if let Some(rest) = sql.strip_prefix("ALTER TABLE ") {
            self.alter_table(rest)?;
        } else {
            return Err(format!("syntax error: unsupported statement `{sql}`"));
        }

        Ok(Vec::new())
    }

    fn table(&self, name: &str) -> std::result::Result<&FakeTable, String> {
        self.tables
            .iter()
            .find(|table| table.name == name)
            .ok_or_else(|| format!("table does not exist ({name})"))
    }

    fn table_mut(&mut self, name: &str) -> std::result::Result<&mut FakeTable, String> {
        self.tables
            .iter_mut()
            .find(|table| table.name == name)
            .ok_or_else(|| format!("table does not exist ({name})"))
    }

    fn create_table(&mut self, rest: &str) -> std::result::Result<(), String> {
        let (name, body) = split_target_and_list(rest)?;
        if self.tables.iter().any(|table| table.name == name) {
            return Err(format!("table already exists ({name})"));
        }

        let mut table = FakeTable {
            name: name.to_string(),
            columns: Vec::new(),
            indexes: Vec::new(),
        };
        let mut primary_key = Vec::new();
        for definition in split_top_level(body) {
            if let Some(columns) = definition.strip_prefix("PRIMARY KEY") {
                primary_key = parse_column_list(columns.trim());
            } else if definition.contains("INDEX ") {
                return Err(format!("inline index definitions are not supported ({definition})"));
            } else {
                let column = parse_column(definition)?;
                if table.column(&column.name).is_some() {
                    return Err(format!("duplicated column ({})", column.name));
                }
                table.columns.push(column);
            }
        }

        if primary_key.is_empty() {
            return Err(format!("primary key is required ({name})"));
        }
        if let Some(missing) = primary_key.iter().find(|c| table.column(c).is_none()) {
            return Err(format!("column does not exist ({missing})"));
        }
        table.indexes.push(FakeIndex {
            columns: primary_key,
            unique: true,
            primary: true,
        });

        self.tables.push(table);
        Ok(())
    }

    fn create_index(&mut self, rest: &str, unique: bool) -> std::result::Result<(), String> {
        let (name, body) = split_target_and_list(rest)?;
        let table = self.table_mut(name)?;
        let columns = parse_column_list(body);
        if columns.is_empty() {
            return Err("index requires at least one column".to_string());
        }
        if let Some(missing) = columns.iter().find(|c| table.column(c).is_none()) {
            return Err(format!("column does not exist ({missing})"));
        }
        if table.indexes.iter().any(|index| index.columns == columns) {
            return Err(format!("index already exists ({})", columns.join(",")));
        }

        table.indexes.push(FakeIndex {
            columns,
            unique,
            primary: false,
        });
        Ok(())
    }

    fn alter_table(&mut self, rest: &str) -> std::result::Result<(), String> {
        let (name, action) = rest
            .split_once(' ')
            .ok_or_else(|| format!("syntax error: incomplete ALTER TABLE ({rest})"))?;
        let table = self.table_mut(name)?;

        if let Some(definition) = action.strip_prefix("ADD COLUMN ") {
            let column = parse_column(definition)?;
            if table.column(&column.name).is_some() {
                return Err(format!("column already exists ({})", column.name));
            }
            table.columns.push(column);
            return Ok(());
        }

        if let Some(column) = action.strip_prefix("DROP COLUMN ") {
            let column = column.trim();
            if table.column(column).is_none() {
                return Err(format!("column does not exist ({column})"));
            }
            if table.is_indexed(column) {
                return Err(format!("cannot drop indexed column ({column})"));
            }
            table.columns.retain(|candidate| candidate.name != column);
            return Ok(());
        }

        if let Some(names) = action.strip_prefix("RENAME COLUMN ") {
            let (from, to) = names
                .split_once(" TO ")
                .ok_or_else(|| format!("syntax error: incomplete RENAME COLUMN ({names})"))?;
            let (from, to) = (from.trim(), to.trim());
            if table.column(to).is_some() {
                return Err(format!("column already exists ({to})"));
            }
            let column = table
                .columns
                .iter_mut()
                .find(|candidate| candidate.name == from)
                .ok_or_else(|| format!("column does not exist ({from})"))?;
            column.name = to.to_string();
            for index in &mut table.indexes {
                for indexed in &mut index.columns {
                    if *indexed == from {
                        *indexed = to.to_string();
                    }
                }
            }
            return Ok(());
        }

        Err(format!("syntax error: unsupported ALTER TABLE action ({action})"))
    }

    fn column_rows(&self, table_name: &str) -> std::result::Result<Vec<Row>, String> {
        let table = self.table(table_name)?;
        let columns = row_columns(COLUMN_ROW_COLUMNS);

        Ok(table
            .columns
            .iter()
            .map(|column| {
                let primary = table
                    .indexes
                    .iter()
                    .any(|index| index.primary && index.columns.contains(&column.name));
                let unique = table.indexes.iter().any(|index| {
                    index.unique && index.columns.len() == 1 && index.columns[0] == column.name
                });
                Row::new(
                    Arc::clone(&columns),
                    vec![
                        Value::String(table.name.clone()),
                        Value::String(column.name.clone()),
                        if self.column_types_hidden {
                            Value::Null
                        } else {
                            Value::String(column.data_type.clone())
                        },
                        column
                            .max_length
                            .map_or(Value::Null, |length| Value::Integer(i64::from(length))),
                        Value::Bool(!column.not_null),
                        Value::Bool(column.auto_increment),
                        Value::Bool(table.is_indexed(&column.name)),
                        Value::Bool(primary),
                        Value::Bool(unique),
                    ],
                )
            })
            .collect())
    }

    fn index_rows(&self, table_name: &str) -> std::result::Result<Vec<Row>, String> {
        let table = self.table(table_name)?;
        let columns = row_columns(INDEX_ROW_COLUMNS);

        let rows = match self.index_row_overrides.get(table_name) {
            Some(overrides) => overrides.clone(),
            None => table
                .indexes
                .iter()
                .map(|index| {
                    IndexRow::new(
                        format!("{}[{}]", table.name, index.columns.join(",")),
                        index.unique,
                        index.primary,
                    )
                })
                .collect(),
        };

        Ok(rows
            .into_iter()
            .map(|row| {
                Row::new(
                    Arc::clone(&columns),
                    vec![
                        Value::String(table.name.clone()),
                        Value::String(row.name),
                        Value::Bool(row.unique),
                        Value::Bool(row.primary),
                    ],
                )
            })
            .collect())
    }
}

fn statement_error(sql: &str, message: String) -> Error {
    ExecutionError::statement_failed(sql, io::Error::other(message)).into()
}

fn row_columns(names: &[&str]) -> Arc<[String]> {
    names.iter().map(|name| name.to_string()).collect()
}

fn table_row(name: &str) -> Row {
    Row::new(
        row_columns(TABLE_ROW_COLUMNS),
        vec![Value::String(name.to_string())],
    )
}

/// `'employees')` -> `employees`
fn parse_table_argument(rest: &str) -> std::result::Result<String, String> {
    let literal = rest
        .trim()
        .strip_suffix(')')
        .map(str::trim)
        .and_then(|literal| literal.strip_prefix('\''))
        .and_then(|literal| literal.strip_suffix('\''))
        .ok_or_else(|| format!("syntax error: expected a quoted table name ({rest})"))?;
    Ok(literal.replace("''", "'"))
}

/// `employees (id, name)` -> (`employees`, `id, name`)
fn split_target_and_list(rest: &str) -> std::result::Result<(&str, &str), String> {
    let open = rest
        .find('(')
        .ok_or_else(|| format!("syntax error: expected `(` ({rest})"))?;
    let body = rest[open + 1..]
        .trim_end()
        .strip_suffix(')')
        .ok_or_else(|| format!("syntax error: expected `)` ({rest})"))?;
    Ok((rest[..open].trim(), body))
}

fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (position, ch) in body.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(body[start..position].trim());
                start = position + 1;
            }
            _ => {}
        }
    }
    parts.push(body[start..].trim());
    parts.retain(|part| !part.is_empty());
    parts
}

fn parse_column_list(list: &str) -> Vec<String> {
    list.trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .split(',')
        .map(str::trim)
        .filter(|column| !column.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_column(definition: &str) -> std::result::Result<FakeColumn, String> {
    let mut tokens = definition.split_whitespace();
    let name = tokens
        .next()
        .ok_or_else(|| "syntax error: empty column definition".to_string())?;
    let type_token = tokens
        .next()
        .ok_or_else(|| format!("syntax error: missing column type ({definition})"))?;
    let modifiers = tokens.collect::<Vec<_>>().join(" ");

    let (data_type, max_length) = match type_token.split_once('[') {
        Some((data_type, length)) => {
            let length = length
                .strip_suffix(']')
                .and_then(|length| length.parse::<u32>().ok())
                .ok_or_else(|| format!("syntax error: invalid type size ({type_token})"))?;
            (data_type, Some(length))
        }
        None => (type_token, None),
    };
    if !KNOWN_TYPES.contains(&data_type) {
        return Err(format!("unsupported column type ({data_type})"));
    }

    let auto_increment = modifiers.contains("AUTO_INCREMENT");
    if auto_increment && data_type != "INTEGER" {
        return Err(format!("auto increment requires INTEGER ({name})"));
    }

    Ok(FakeColumn {
        name: name.to_string(),
        data_type: data_type.to_string(),
        max_length,
        not_null: modifiers.contains("NOT NULL"),
        auto_increment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_definitions_outside_brackets() {
        assert_eq!(
            split_top_level("id INTEGER, name VARCHAR[8], PRIMARY KEY (id, name)"),
            vec!["id INTEGER", "name VARCHAR[8]", "PRIMARY KEY (id, name)"],
        );
    }

    #[test]
    fn parses_sized_columns_with_modifiers() {
        let column = parse_column("id INTEGER AUTO_INCREMENT NOT NULL").expect("valid column");
        assert!(column.auto_increment);
        assert!(column.not_null);

        let column = parse_column("name VARCHAR[64]").expect("valid column");
        assert_eq!(column.max_length, Some(64));
        assert!(parse_column("name VARCHAR AUTO_INCREMENT").is_err());
        assert!(parse_column("name TEXT").is_err());
    }

    #[test]
    fn unescapes_table_arguments() {
        assert_eq!(
            parse_table_argument("'o''neil')").expect("valid argument"),
            "o'neil"
        );
        assert!(parse_table_argument("employees)").is_err());
    }
}
