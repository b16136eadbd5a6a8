/*!
 * SQLite connection handling.
 *
 * A single connection sits behind a mutex. Async callers go through
 * [`DatabaseConnection::execute_async`] or
 * [`DatabaseConnection::transaction_async`], which hop onto tokio's blocking
 * pool so SQLite I/O never stalls the runtime.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::{Connection, Transaction};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::schema;

/// Path reported for in-memory databases
const IN_MEMORY_PATH: &str = ":memory:";

/// How long a statement waits on a locked database file
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared handle to the clipboard database
#[derive(Clone)]
pub struct DatabaseConnection {
    db_path: PathBuf,
    connection: Arc<Mutex<Connection>>,
}

impl DatabaseConnection {
    /// Open (or create) the database file, creating its directory if needed
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(dir) = db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create database directory: {:?}", dir))?;
        }

        info!("Opening clipboard database at {:?}", db_path);
        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        // WAL lets history reads proceed while a capture is being written
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .context("Failed to enable WAL journal")?;
        debug!("Journal mode: {}", mode);

        Self::prepare(conn, db_path)
    }

    /// Open a private in-memory database
    pub fn new_in_memory() -> Result<Self> {
        debug!("Opening in-memory clipboard database");
        let conn = Connection::open_in_memory().context("Failed to create in-memory database")?;
        Self::prepare(conn, PathBuf::from(IN_MEMORY_PATH))
    }

    fn prepare(mut conn: Connection, db_path: PathBuf) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        schema::initialize_schema(&mut conn)?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Database file path, or `:memory:`
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Whether the database lives only in this process
    pub fn is_in_memory(&self) -> bool {
        self.db_path.as_os_str() == IN_MEMORY_PATH
    }

    /// Run `f` against the connection on the current thread
    pub fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        f(&self.connection.lock())
    }

    /// Run `f` against the connection on the blocking pool
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let connection = self.connection.clone();

        tokio::task::spawn_blocking(move || f(&connection.lock()))
            .await
            .context("Database task panicked")?
    }

    /// Run `f` inside a transaction on the blocking pool; an error rolls back
    pub async fn transaction_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let connection = self.connection.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = connection.lock();
            let tx = conn.transaction()?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        })
        .await
        .context("Database transaction task panicked")?
    }
}

/// Version string of the linked SQLite library
pub fn sqlite_version() -> &'static str {
    rusqlite::version()
}
