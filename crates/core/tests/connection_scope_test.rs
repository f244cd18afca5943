use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use immuorm_core::{
    CallbackConfig, Connection, ConnectionPool, Database, ExecutionError, Result, Row, Value,
};

#[derive(Debug, Default)]
struct CountingPool {
    open: Arc<AtomicUsize>,
    acquired: AtomicUsize,
}

struct CountingConnection {
    open: Arc<AtomicUsize>,
}

impl Connection for CountingConnection {
    fn query(&mut self, sql: &str, _params: &[Value]) -> Result<Vec<Row>> {
        if sql.starts_with("BROKEN") {
            return Err(ExecutionError::statement_failed(sql, io::Error::other("syntax error")).into());
        }
        Ok(Vec::new())
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        self.query(sql, params).map(|_| 1)
    }
}

impl Drop for CountingConnection {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

struct SharedCountingPool(Arc<CountingPool>);

impl ConnectionPool for SharedCountingPool {
    fn acquire(&self) -> Result<Box<dyn Connection>> {
        self.0.open.fetch_add(1, Ordering::SeqCst);
        self.0.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingConnection {
            open: Arc::clone(&self.0.open),
        }))
    }
}

fn database(pool: &Arc<CountingPool>) -> Database {
    Database::new(
        Arc::new(SharedCountingPool(Arc::clone(pool))),
        CallbackConfig::default(),
    )
}

#[test]
fn each_call_holds_one_connection_for_its_duration() {
    let pool = Arc::new(CountingPool::default());
    let db = database(&pool);

    assert_eq!(db.execute("CREATE TABLE t (id INTEGER)", &[]).expect("execute"), 1);
    db.query("SELECT 1", &[]).expect("query");

    assert_eq!(pool.acquired.load(Ordering::SeqCst), 2);
    assert_eq!(pool.open.load(Ordering::SeqCst), 0);
}

#[test]
fn failed_statements_still_release_their_connection() {
    let pool = Arc::new(CountingPool::default());
    let db = database(&pool);

    let error = db.execute("BROKEN", &[]).expect_err("statement fails");

    assert!(error.is_transient());
    assert_eq!(pool.open.load(Ordering::SeqCst), 0);
}

#[test]
fn explicit_connections_release_on_drop() {
    let pool = Arc::new(CountingPool::default());
    let db = database(&pool);

    {
        let mut connection = db.connection().expect("acquire");
        assert!(connection.table_exists("t").is_none());
        assert_eq!(pool.open.load(Ordering::SeqCst), 1);
    }

    assert_eq!(pool.open.load(Ordering::SeqCst), 0);
}
