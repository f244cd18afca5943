use std::{fmt, sync::Arc};

use crate::{
    CallbackConfig, Connection, ConnectionPool, DefaultNamingStrategy, NamingStrategy, Result, Row,
    Value,
};

/// An initialized database handle: the pool plus the per-handle settings the
/// dialect chose at initialization.
#[derive(Clone)]
pub struct Database {
    pool: Arc<dyn ConnectionPool>,
    callbacks: CallbackConfig,
    naming: Arc<dyn NamingStrategy>,
}

impl Database {
    pub fn new(pool: Arc<dyn ConnectionPool>, callbacks: CallbackConfig) -> Self {
        Self {
            pool,
            callbacks,
            naming: Arc::new(DefaultNamingStrategy),
        }
    }

    #[must_use]
    pub fn with_naming_strategy(mut self, naming: Arc<dyn NamingStrategy>) -> Self {
        self.naming = naming;
        self
    }

    #[must_use]
    pub fn pool(&self) -> &Arc<dyn ConnectionPool> {
        &self.pool
    }

    #[must_use]
    pub fn callbacks(&self) -> &CallbackConfig {
        &self.callbacks
    }

    #[must_use]
    pub fn naming(&self) -> &dyn NamingStrategy {
        self.naming.as_ref()
    }

    pub fn connection(&self) -> Result<Box<dyn Connection>> {
        self.pool.acquire()
    }

    /// Runs one statement on a connection held only for the call.
    pub fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        let mut connection = self.connection()?;
        connection.execute(sql, params)
    }

    pub fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let mut connection = self.connection()?;
        connection.query(sql, params)
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}
