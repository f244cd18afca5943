use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{ConfigError, Result, Row, Value};

/// A single live connection. Dropping it hands it back to its pool.
pub trait Connection: Send {
    fn query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64>;

    /// Native existence probe, for drivers that have one. `None` means the
    /// caller has to fall back to querying the catalog.
    fn table_exists(&mut self, table: &str) -> Option<Result<bool>> {
        let _ = table;
        None
    }
}

pub trait ConnectionPool: Send + Sync {
    fn acquire(&self) -> Result<Box<dyn Connection>>;
}

pub trait Driver: Send + Sync {
    /// Opens a pool for `dsn`. The DSN format belongs to the driver.
    fn open(&self, dsn: &str) -> Result<Arc<dyn ConnectionPool>>;
}

#[derive(Clone, Default)]
pub struct DriverRegistry {
    drivers: BTreeMap<String, Arc<dyn Driver>>,
}

impl DriverRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, driver: Arc<dyn Driver>) -> &mut Self {
        self.drivers.insert(name.into(), driver);
        self
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }

    pub fn open(&self, name: &str, dsn: &str) -> Result<Arc<dyn ConnectionPool>> {
        let driver = self
            .drivers
            .get(name)
            .ok_or_else(|| ConfigError::UnknownDriver {
                driver: name.to_string(),
            })?;
        driver.open(dsn)
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.drivers.keys().collect::<Vec<_>>())
            .finish()
    }
}
