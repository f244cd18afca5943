use tracing::debug;

use crate::{
    Database, Dialect, Field, LookupError, Result, SqlBuilder, SqlExpr, TableSchema,
};

/// An index as the database reports it, named the way the ORM would name it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexInfo {
    pub table: String,
    /// Name under the ORM's naming strategy.
    pub name: String,
    /// Name the engine itself reports.
    pub engine_name: String,
    pub columns: Vec<String>,
    pub primary_key: bool,
    pub unique: bool,
    pub option: String,
}

/// A column as the database reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    pub name: String,
    pub data_type: String,
    pub max_length: Option<u32>,
    pub nullable: bool,
    pub auto_increment: bool,
    pub primary_key: bool,
    pub unique: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewOption {
    pub replace: bool,
    pub check_option: String,
    pub query: String,
}

/// Schema introspection and DDL, as the ORM drives them.
///
/// The provided methods are the ORM's generic behavior; a dialect overrides
/// whatever its engine does differently and must still answer every member,
/// returning a capability error for what it cannot do.
pub trait Migrator {
    fn dialect(&self) -> &dyn Dialect;

    fn database(&self) -> &Database;

    /// Whether `create_table` creates declared indexes with separate
    /// statements instead of inlining them.
    fn create_index_after_create_table(&self) -> bool {
        false
    }

    fn exec(&self, statement: SqlExpr) -> Result<()> {
        debug!(
            dialect = self.dialect().name(),
            sql = %self.dialect().explain(&statement.sql, &statement.vars),
            "executing schema statement"
        );
        self.database()
            .execute(&statement.sql, &statement.vars)
            .map(|_| ())
    }

    fn auto_migrate(&self, schemas: &[TableSchema]) -> Result<()> {
        for schema in schemas {
            if !self.has_table(schema) {
                self.create_table(schema)?;
                continue;
            }

            let columns = self.column_types(schema)?;
            for field in schema.fields.iter().filter(|field| !field.ignore_migration) {
                match columns
                    .iter()
                    .find(|column| column.name.eq_ignore_ascii_case(&field.db_name))
                {
                    Some(column) => self.migrate_column(schema, field, column)?,
                    None => self.add_column(schema, &field.db_name)?,
                }
            }

            for index in &schema.indexes {
                if !self.has_index(schema, &index.name) {
                    self.create_index(schema, &index.name)?;
                }
            }
        }

        Ok(())
    }

    fn create_table(&self, schema: &TableSchema) -> Result<()> {
        let dialect = self.dialect();
        let inline_indexes = !self.create_index_after_create_table();
        let mut builder = SqlBuilder::new(dialect);
        builder.push("CREATE TABLE ").push_ident(&schema.table).push(" (");

        let mut definitions = 0usize;
        for field in schema.fields.iter().filter(|field| !field.ignore_migration) {
            if definitions > 0 {
                builder.push(", ");
            }
            builder
                .push_ident(&field.db_name)
                .push(" ")
                .push(&dialect.full_data_type_of(field));
            definitions += 1;
        }

        let primary_columns = schema
            .primary_fields()
            .filter(|field| !field.ignore_migration)
            .map(|field| field.db_name.as_str())
            .collect::<Vec<_>>();
        if !primary_columns.is_empty() {
            if definitions > 0 {
                builder.push(", ");
            }
            builder.push("PRIMARY KEY (");
            builder.push_idents(primary_columns, ", ").push(")");
            definitions += 1;
        }

        if inline_indexes {
            for index in &schema.indexes {
                if definitions > 0 {
                    builder.push(", ");
                }
                if !index.class.is_empty() {
                    builder.push(&index.class).push(" ");
                }
                builder.push("INDEX ").push_ident(&index.name).push(" (");
                builder
                    .push_idents(
                        index.columns.iter().map(|c| schema.column_name(&c.column)),
                        ", ",
                    )
                    .push(")");
                definitions += 1;
            }
        }
        builder.push(")");

        self.exec(builder.finish())?;

        if !inline_indexes {
            for index in &schema.indexes {
                self.create_index(schema, &index.name)?;
            }
        }

        Ok(())
    }

    fn drop_table(&self, schema: &TableSchema) -> Result<()>;

    fn has_table(&self, schema: &TableSchema) -> bool;

    fn rename_table(&self, from: &TableSchema, to: &TableSchema) -> Result<()>;

    fn get_tables(&self) -> Result<Vec<String>>;

    fn add_column(&self, schema: &TableSchema, name: &str) -> Result<()>;

    fn drop_column(&self, schema: &TableSchema, name: &str) -> Result<()> {
        let mut builder = SqlBuilder::new(self.dialect());
        builder
            .push("ALTER TABLE ")
            .push_ident(&schema.table)
            .push(" DROP COLUMN ")
            .push_ident(schema.column_name(name));
        self.exec(builder.finish())
    }

    fn alter_column(&self, schema: &TableSchema, name: &str) -> Result<()> {
        let field = lookup_field(schema, name)?;
        let mut builder = SqlBuilder::new(self.dialect());
        builder
            .push("ALTER TABLE ")
            .push_ident(&schema.table)
            .push(" ALTER COLUMN ")
            .push_ident(&field.db_name)
            .push(" TYPE ")
            .push(&self.dialect().full_data_type_of(field));
        self.exec(builder.finish())
    }

    /// Alters the column when its reported type or size no longer matches
    /// the field.
    fn migrate_column(&self, schema: &TableSchema, field: &Field, column: &ColumnType) -> Result<()> {
        let expected = self.dialect().data_type_of(field);
        let type_changed = !base_type(&expected).eq_ignore_ascii_case(base_type(&column.data_type));
        let size_changed = field.size > 0
            && column
                .max_length
                .is_some_and(|max_length| max_length != field.size);

        if type_changed || size_changed {
            return self.alter_column(schema, &field.db_name);
        }

        Ok(())
    }

    fn has_column(&self, schema: &TableSchema, name: &str) -> bool;

    fn rename_column(&self, schema: &TableSchema, old_name: &str, new_name: &str) -> Result<()> {
        let mut builder = SqlBuilder::new(self.dialect());
        builder
            .push("ALTER TABLE ")
            .push_ident(&schema.table)
            .push(" RENAME COLUMN ")
            .push_ident(schema.column_name(old_name))
            .push(" TO ")
            .push_ident(schema.column_name(new_name));
        self.exec(builder.finish())
    }

    fn column_types(&self, schema: &TableSchema) -> Result<Vec<ColumnType>>;

    fn create_view(&self, name: &str, option: &ViewOption) -> Result<()>;

    fn drop_view(&self, name: &str) -> Result<()>;

    fn create_constraint(&self, schema: &TableSchema, name: &str) -> Result<()>;

    fn drop_constraint(&self, schema: &TableSchema, name: &str) -> Result<()>;

    fn has_constraint(&self, schema: &TableSchema, name: &str) -> bool;

    fn create_index(&self, schema: &TableSchema, name: &str) -> Result<()>;

    fn drop_index(&self, schema: &TableSchema, name: &str) -> Result<()>;

    fn has_index(&self, schema: &TableSchema, name: &str) -> bool;

    fn rename_index(&self, schema: &TableSchema, old_name: &str, new_name: &str) -> Result<()>;

    fn get_indexes(&self, schema: &TableSchema) -> Result<Vec<IndexInfo>>;

    fn current_database(&self) -> String;
}

pub fn lookup_field<'s>(schema: &'s TableSchema, name: &str) -> Result<&'s Field> {
    schema.lookup_field(name).ok_or_else(|| {
        LookupError::FieldNotFound {
            table: schema.table.clone(),
            name: name.to_string(),
        }
        .into()
    })
}

/// `VARCHAR[64]`, `INTEGER AUTO_INCREMENT` and `varchar(64)` all reduce to
/// their leading type name.
fn base_type(data_type: &str) -> &str {
    data_type
        .split(|ch: char| ch == '[' || ch == '(' || ch.is_whitespace())
        .next()
        .unwrap_or_default()
}
