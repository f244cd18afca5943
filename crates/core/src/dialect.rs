use std::fmt::{self, Write as _};

use crate::{Database, DriverRegistry, Field, Migrator, Result, Value};

/// Everything the ORM needs from one SQL dialect.
pub trait Dialect: Send + Sync {
    fn name(&self) -> &'static str;

    /// Opens the configured DSN through `drivers` and returns the handle the
    /// ORM runs statements on.
    fn initialize(&self, drivers: &DriverRegistry) -> Result<Database>;

    fn migrator<'a>(&'a self, db: &'a Database) -> Box<dyn Migrator + 'a>;

    fn data_type_of(&self, field: &Field) -> String;

    fn default_value_of(&self, field: &Field) -> SqlExpr;

    /// Column type clause including nullability and default.
    fn full_data_type_of(&self, field: &Field) -> String {
        let mut sql = self.data_type_of(field);
        if field.not_null {
            sql.push_str(" NOT NULL");
        }
        let default = self.default_value_of(field);
        if !default.is_empty() {
            write!(sql, " DEFAULT {}", default.sql).expect("writing to String should not fail");
        }
        sql
    }

    fn bind_var_to(&self, writer: &mut dyn fmt::Write, value: &Value) -> fmt::Result;

    fn quote_to(&self, writer: &mut dyn fmt::Write, ident: &str) -> fmt::Result;

    /// Human-readable SQL with the bind values inlined, for logs only.
    fn explain(&self, sql: &str, vars: &[Value]) -> String;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlExpr {
    pub sql: String,
    pub vars: Vec<Value>,
}

impl SqlExpr {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            vars: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Writes SQL text through a dialect's quoting and bind-variable rules.
pub struct SqlBuilder<'d> {
    dialect: &'d dyn Dialect,
    sql: String,
    vars: Vec<Value>,
}

impl<'d> SqlBuilder<'d> {
    #[must_use]
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            sql: String::new(),
            vars: Vec::new(),
        }
    }

    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    pub fn push_ident(&mut self, ident: &str) -> &mut Self {
        self.dialect
            .quote_to(&mut self.sql, ident)
            .expect("writing to String should not fail");
        self
    }

    pub fn push_idents<'i, I>(&mut self, idents: I, separator: &str) -> &mut Self
    where
        I: IntoIterator<Item = &'i str>,
    {
        for (position, ident) in idents.into_iter().enumerate() {
            if position > 0 {
                self.sql.push_str(separator);
            }
            self.push_ident(ident);
        }
        self
    }

    pub fn push_var(&mut self, value: Value) -> &mut Self {
        self.dialect
            .bind_var_to(&mut self.sql, &value)
            .expect("writing to String should not fail");
        self.vars.push(value);
        self
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn finish(self) -> SqlExpr {
        SqlExpr {
            sql: self.sql,
            vars: self.vars,
        }
    }
}
