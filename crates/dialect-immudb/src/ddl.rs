use std::fmt;

use immuorm_core::{
    CapabilityError, Dialect, Error, IndexDef, LookupError, Result, SqlBuilder, SqlExpr,
    TableSchema, lookup_field,
};
use tracing::warn;

use crate::DIALECT_NAME;

const UNIQUE_CLASS: &str = "UNIQUE";

/// Schema operations immudb cannot perform. Tables, indexes and their names
/// are permanent once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateConstraint,
    DropConstraint,
    CreateView,
    DropView,
    DropIndex,
    DropTable,
    RenameIndex,
    RenameTable,
}

impl Operation {
    pub const ALL: [Self; 8] = [
        Self::CreateConstraint,
        Self::DropConstraint,
        Self::CreateView,
        Self::DropView,
        Self::DropIndex,
        Self::DropTable,
        Self::RenameIndex,
        Self::RenameTable,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateConstraint => "CreateConstraint",
            Self::DropConstraint => "DropConstraint",
            Self::CreateView => "CreateView",
            Self::DropView => "DropView",
            Self::DropIndex => "DropIndex",
            Self::DropTable => "DropTable",
            Self::RenameIndex => "RenameIndex",
            Self::RenameTable => "RenameTable",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn unsupported(operation: impl Into<String>) -> Error {
    CapabilityError::Unsupported {
        operation: operation.into(),
        dialect: DIALECT_NAME.to_string(),
    }
    .into()
}

/// `ALTER TABLE t ADD COLUMN c <type>`, or `None` for a migration-ignored field.
pub(crate) fn add_column_sql(
    dialect: &dyn Dialect,
    schema: &TableSchema,
    name: &str,
) -> Result<Option<SqlExpr>> {
    let field = lookup_field(schema, name)?;
    if field.ignore_migration {
        return Ok(None);
    }

    let mut builder = SqlBuilder::new(dialect);
    builder
        .push("ALTER TABLE ")
        .push_ident(&schema.table)
        .push(" ADD COLUMN ")
        .push_ident(&field.db_name)
        .push(" ")
        .push(&dialect.full_data_type_of(field));
    Ok(Some(builder.finish()))
}

/// `CREATE [UNIQUE] INDEX ON t (c1, c2) [option]`. The engine names the
/// index itself, so the declared name only selects the definition. Classes
/// other than `UNIQUE`, index methods and comments are not emitted.
pub(crate) fn create_index_sql(
    dialect: &dyn Dialect,
    schema: &TableSchema,
    name: &str,
) -> Result<SqlExpr> {
    let index = schema
        .lookup_index(name)
        .ok_or_else(|| LookupError::IndexNotFound {
            table: schema.table.clone(),
            name: name.to_string(),
        })?;
    let unique = index_is_unique(&schema.table, index);
    if !index.method.is_empty() {
        warn!(
            table = %schema.table,
            index = %index.name,
            method = %index.method,
            "immudb has no index methods, creating a plain index"
        );
    }

    let mut builder = SqlBuilder::new(dialect);
    builder.push(if unique {
        "CREATE UNIQUE INDEX ON "
    } else {
        "CREATE INDEX ON "
    });
    builder.push_ident(&schema.table).push(" (");
    for (position, column) in index.columns.iter().enumerate() {
        if position > 0 {
            builder.push(", ");
        }
        match column.expression.as_deref() {
            Some(expression) => builder.push(expression),
            None => builder.push_ident(schema.column_name(&column.column)),
        };
        if let Some(length) = column.length.filter(|length| *length > 0) {
            builder.push(&format!("({length})"));
        }
        if let Some(sort) = column.sort.as_deref() {
            builder.push(" ").push(sort);
        }
    }
    builder.push(")");

    if !index.option.is_empty() {
        builder.push(" ").push(&index.option);
    }

    Ok(builder.finish())
}

fn index_is_unique(table: &str, index: &IndexDef) -> bool {
    if index.class.eq_ignore_ascii_case(UNIQUE_CLASS) {
        return true;
    }
    if !index.class.is_empty() {
        warn!(
            table,
            index = %index.name,
            class = %index.class,
            "immudb has no such index class, creating a plain index"
        );
    }
    false
}
