use crate::{DefaultNamingStrategy, NamingStrategy};

/// Logical column type as reflected by the ORM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Bool,
    Int,
    Uint,
    Float,
    String,
    Time,
    Bytes,
    /// Any type the ORM does not know; dialects pass the tag through verbatim.
    Custom(String),
}

impl DataType {
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::String => "string",
            Self::Time => "time",
            Self::Bytes => "bytes",
            Self::Custom(tag) => tag,
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "bool" => Self::Bool,
            "int" => Self::Int,
            "uint" => Self::Uint,
            "float" => Self::Float,
            "string" => Self::String,
            "time" => Self::Time,
            "bytes" => Self::Bytes,
            other => Self::Custom(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Name of the model attribute, e.g. `DeletedAt`.
    pub name: String,
    /// Column name, e.g. `deleted_at`.
    pub db_name: String,
    pub data_type: DataType,
    /// Zero means "no size given".
    pub size: u32,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub not_null: bool,
    pub ignore_migration: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, db_name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            db_name: db_name.into(),
            data_type,
            size: 0,
            primary_key: false,
            auto_increment: false,
            not_null: false,
            ignore_migration: false,
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    #[must_use]
    pub fn with_auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    #[must_use]
    pub fn with_not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    #[must_use]
    pub fn with_ignore_migration(mut self) -> Self {
        self.ignore_migration = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumn {
    /// Column name the index covers.
    pub column: String,
    pub expression: Option<String>,
    pub sort: Option<String>,
    pub length: Option<u32>,
}

impl IndexColumn {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            expression: None,
            sort: None,
            length: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    pub name: String,
    /// `UNIQUE`, `FULLTEXT`, ... or empty.
    pub class: String,
    /// Index method (`USING ...`) or empty.
    pub method: String,
    pub option: String,
    pub comment: String,
    pub columns: Vec<IndexColumn>,
}

impl IndexDef {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            class: String::new(),
            method: String::new(),
            option: String::new(),
            comment: String::new(),
            columns: columns.into_iter().map(IndexColumn::new).collect(),
        }
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    #[must_use]
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.option = option.into();
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| column.column.clone())
            .collect()
    }
}

/// The statement the ORM resolved for one model: its table and what it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table: String,
    pub fields: Vec<Field>,
    pub indexes: Vec<IndexDef>,
}

impl TableSchema {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            fields: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// A table carrying the ORM's base model columns: an auto-increment
    /// `id`, the two bookkeeping timestamps and an indexed soft-delete column.
    pub fn with_base_model(table: impl Into<String>) -> Self {
        let table = table.into();
        let deleted_at_index =
            DefaultNamingStrategy.index_name(&table, &["deleted_at".to_string()]);

        Self::new(table)
            .with_field(
                Field::new("ID", "id", DataType::Uint)
                    .with_primary_key()
                    .with_auto_increment(),
            )
            .with_field(Field::new("CreatedAt", "created_at", DataType::Time))
            .with_field(Field::new("UpdatedAt", "updated_at", DataType::Time))
            .with_field(Field::new("DeletedAt", "deleted_at", DataType::Time))
            .with_index(IndexDef::new(deleted_at_index, ["deleted_at"]))
    }

    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_index(mut self, index: IndexDef) -> Self {
        self.indexes.push(index);
        self
    }

    /// Finds a field by column name first, then by attribute name.
    #[must_use]
    pub fn lookup_field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.db_name == name)
            .or_else(|| self.fields.iter().find(|field| field.name == name))
    }

    /// Finds an index by its declared name, or by a field it covers.
    #[must_use]
    pub fn lookup_index(&self, name: &str) -> Option<&IndexDef> {
        if let Some(index) = self.indexes.iter().find(|index| index.name == name) {
            return Some(index);
        }

        let column = self.column_name(name);
        self.indexes
            .iter()
            .find(|index| index.columns.iter().any(|c| c.column == column))
    }

    /// Resolves an attribute or column name to the column name.
    #[must_use]
    pub fn column_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.lookup_field(name)
            .map_or(name, |field| field.db_name.as_str())
    }

    pub fn primary_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| field.primary_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_model_declares_soft_delete_index() {
        let schema = TableSchema::with_base_model("employees");

        let index = schema
            .lookup_index("idx_employees_deleted_at")
            .expect("base model must declare the soft-delete index");
        assert_eq!(index.column_names(), vec!["deleted_at".to_string()]);
        assert_eq!(
            schema.primary_fields().map(|f| f.db_name.as_str()).collect::<Vec<_>>(),
            vec!["id"],
        );
    }

    #[test]
    fn lookups_accept_attribute_names() {
        let schema = TableSchema::with_base_model("employees");

        assert_eq!(schema.column_name("DeletedAt"), "deleted_at");
        assert_eq!(schema.column_name("unknown"), "unknown");
        assert!(schema.lookup_index("DeletedAt").is_some());
        assert!(schema.lookup_index("created_at").is_none());
    }

    #[test]
    fn unknown_tags_become_custom_types() {
        assert_eq!(DataType::from_tag("int"), DataType::Int);
        assert_eq!(
            DataType::from_tag("UUID"),
            DataType::Custom("UUID".to_string())
        );
        assert_eq!(DataType::Custom("JSON".to_string()).tag(), "JSON");
    }
}
