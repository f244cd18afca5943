use std::error::Error as StdError;

use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync>;

/// A schema operation the dialect cannot express at all.
///
/// Returned before any SQL is issued and never worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("{operation} is not supported by the {dialect} dialect")]
    Unsupported { operation: String, dialect: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("field `{name}` is not declared on table `{table}`")]
    FieldNotFound { table: String, name: String },
    #[error("index `{name}` is not declared on table `{table}`")]
    IndexNotFound { table: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("index name `{name}` does not have the form `{table}[<columns>]`")]
    MalformedIndexName { table: String, name: String },
    #[error("catalog query `{query}` returned a row without a usable `{column}` value")]
    UnexpectedRow { query: String, column: String },
}

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("statement failed: sql=`{sql}`: {source}")]
    StatementFailed {
        sql: String,
        #[source]
        source: BoxError,
    },
    #[error("connection failed while {context}: {source}")]
    Connection {
        context: String,
        #[source]
        source: BoxError,
    },
}

impl ExecutionError {
    pub fn statement_failed<E>(sql: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::StatementFailed {
            sql: sql.into(),
            source: Box::new(source),
        }
    }

    pub fn connection<E>(context: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Connection {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no driver is registered under the name `{driver}`")]
    UnknownDriver { driver: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Capability(#[from] CapabilityError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Execute(#[from] ExecutionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Only connection and statement failures may succeed on a later attempt.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Execute(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
