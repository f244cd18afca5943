use immuorm_core::{
    ColumnType, Database, Dialect, IndexInfo, Migrator, Result, TableSchema, ViewOption,
};
use tracing::warn;

use crate::{
    ImmudbDialect,
    ddl::{self, Operation, unsupported},
    introspect,
};

/// Migrator for immudb. Column-level DDL falls back to the ORM defaults; the
/// operations in [`Operation`] fail before any SQL is issued.
pub struct ImmudbMigrator<'a> {
    dialect: &'a ImmudbDialect,
    db: &'a Database,
}

impl<'a> ImmudbMigrator<'a> {
    #[must_use]
    pub fn new(dialect: &'a ImmudbDialect, db: &'a Database) -> Self {
        Self { dialect, db }
    }

    /// Like [`Migrator::has_table`], but reports why the probe failed.
    pub fn try_has_table(&self, schema: &TableSchema) -> Result<bool> {
        introspect::table_exists(self.db, &schema.table)
    }

    pub fn try_has_column(&self, schema: &TableSchema, name: &str) -> Result<bool> {
        let column = schema.column_name(name);
        let columns = introspect::column_names(self.db, &schema.table)?;
        Ok(columns.iter().any(|candidate| candidate == column))
    }

    /// Matches `name` against each reported index's engine name and ORM
    /// name. A declared index (looked up by name or covered field) also
    /// matches a reported index over the same columns.
    pub fn try_has_index(&self, schema: &TableSchema, name: &str) -> Result<bool> {
        let naming = self.db.naming();
        let declared_columns = schema.lookup_index(name).map(|index| {
            index
                .columns
                .iter()
                .map(|column| schema.column_name(&column.column).to_string())
                .collect::<Vec<_>>()
        });

        let indexes = introspect::native_indexes(self.db, &schema.table)?;
        Ok(indexes.iter().any(|index| {
            index.matches(name, naming)
                || declared_columns
                    .as_ref()
                    .is_some_and(|columns| *columns == index.columns)
        }))
    }

    fn reject(&self, operation: Operation) -> Result<()> {
        Err(unsupported(operation.as_str()))
    }
}

fn probe_or_false(probe: &str, table: &str, result: Result<bool>) -> bool {
    result.unwrap_or_else(|error| {
        warn!(probe, table, %error, "schema probe failed; reporting absent");
        false
    })
}

impl Migrator for ImmudbMigrator<'_> {
    fn dialect(&self) -> &dyn Dialect {
        self.dialect
    }

    fn database(&self) -> &Database {
        self.db
    }

    fn create_index_after_create_table(&self) -> bool {
        self.dialect.config().create_index_after_create_table
    }

    fn drop_table(&self, _schema: &TableSchema) -> Result<()> {
        self.reject(Operation::DropTable)
    }

    fn has_table(&self, schema: &TableSchema) -> bool {
        probe_or_false("has_table", &schema.table, self.try_has_table(schema))
    }

    fn rename_table(&self, _from: &TableSchema, _to: &TableSchema) -> Result<()> {
        self.reject(Operation::RenameTable)
    }

    fn get_tables(&self) -> Result<Vec<String>> {
        introspect::table_names(self.db)
    }

    fn add_column(&self, schema: &TableSchema, name: &str) -> Result<()> {
        match ddl::add_column_sql(self.dialect, schema, name)? {
            Some(statement) => self.exec(statement),
            None => Ok(()),
        }
    }

    fn has_column(&self, schema: &TableSchema, name: &str) -> bool {
        probe_or_false(
            "has_column",
            &schema.table,
            self.try_has_column(schema, name),
        )
    }

    fn column_types(&self, schema: &TableSchema) -> Result<Vec<ColumnType>> {
        introspect::column_types(self.db, &schema.table)
    }

    fn create_view(&self, _name: &str, _option: &ViewOption) -> Result<()> {
        self.reject(Operation::CreateView)
    }

    fn drop_view(&self, _name: &str) -> Result<()> {
        self.reject(Operation::DropView)
    }

    fn create_constraint(&self, _schema: &TableSchema, _name: &str) -> Result<()> {
        self.reject(Operation::CreateConstraint)
    }

    fn drop_constraint(&self, _schema: &TableSchema, _name: &str) -> Result<()> {
        self.reject(Operation::DropConstraint)
    }

    fn has_constraint(&self, _schema: &TableSchema, _name: &str) -> bool {
        false
    }

    fn create_index(&self, schema: &TableSchema, name: &str) -> Result<()> {
        self.exec(ddl::create_index_sql(self.dialect, schema, name)?)
    }

    fn drop_index(&self, _schema: &TableSchema, _name: &str) -> Result<()> {
        self.reject(Operation::DropIndex)
    }

    fn has_index(&self, schema: &TableSchema, name: &str) -> bool {
        probe_or_false("has_index", &schema.table, self.try_has_index(schema, name))
    }

    fn rename_index(&self, _schema: &TableSchema, _old_name: &str, _new_name: &str) -> Result<()> {
        self.reject(Operation::RenameIndex)
    }

    fn get_indexes(&self, schema: &TableSchema) -> Result<Vec<IndexInfo>> {
        let naming = self.db.naming();
        Ok(introspect::native_indexes(self.db, &schema.table)?
            .iter()
            .map(|index| index.to_index_info(naming))
            .collect())
    }

    /// immudb has no catalog of databases to report from.
    fn current_database(&self) -> String {
        String::new()
    }
}
