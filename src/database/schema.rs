/*!
 * SQLite schema and migrations.
 *
 * The schema is built by replaying an ordered list of migrations. A fresh
 * database runs all of them; an older database runs the ones past its
 * recorded version. Each step runs in its own transaction together with the
 * version bump, so a failed step leaves the previous version intact.
 */

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension};

/// A single schema step
struct Migration {
    version: i32,
    description: &'static str,
    sql: &'static str,
}

/// Every schema step, in order
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "clipboard history",
        // AUTOINCREMENT so ids are never reused after a delete or clear
        sql: r#"
            CREATE TABLE IF NOT EXISTS clipboard_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('text', 'image', 'file')),
                timestamp INTEGER NOT NULL,
                is_favorite INTEGER NOT NULL DEFAULT 0,
                category TEXT,
                source TEXT,
                metadata TEXT,
                search_index TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_clipboard_timestamp ON clipboard_items(timestamp DESC);
            CREATE INDEX IF NOT EXISTS idx_clipboard_favorite ON clipboard_items(is_favorite);
            CREATE INDEX IF NOT EXISTS idx_clipboard_type ON clipboard_items(type);
        "#,
    },
    Migration {
        version: 2,
        description: "key/value settings",
        sql: r#"
            CREATE TABLE IF NOT EXISTS app_settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
        "#,
    },
];

/// Version the schema ends up at after all migrations
pub const SCHEMA_VERSION: i32 = 2;

/// Bring the database up to [`SCHEMA_VERSION`]
pub fn initialize_schema(conn: &mut Connection) -> Result<()> {
    ensure_version_table(conn)?;

    let current = schema_version(conn)?;
    if current > SCHEMA_VERSION {
        return Err(anyhow!(
            "Database schema v{} is newer than supported v{}",
            current,
            SCHEMA_VERSION
        ));
    }
    if current == SCHEMA_VERSION {
        debug!("Database schema is up to date (v{})", current);
        return Ok(());
    }

    info!("Upgrading database schema from v{} to v{}", current, SCHEMA_VERSION);

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        let tx = conn.transaction()?;
        tx.execute_batch(migration.sql).with_context(|| {
            format!(
                "Schema migration v{} ({}) failed",
                migration.version, migration.description
            )
        })?;
        tx.execute(
            "INSERT OR REPLACE INTO schema_version (id, version, updated_at) \
             VALUES (1, ?1, datetime('now'))",
            [migration.version],
        )?;
        tx.commit()?;

        debug!("Applied schema v{}: {}", migration.version, migration.description);
    }

    Ok(())
}

fn ensure_version_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .context("Failed to create schema_version table")
}

/// Recorded schema version; 0 for a fresh database
pub fn schema_version(conn: &Connection) -> Result<i32> {
    let version = conn
        .query_row("SELECT version FROM schema_version WHERE id = 1", [], |row| {
            row.get(0)
        })
        .optional()
        .context("Failed to read schema version")?;

    Ok(version.unwrap_or(0))
}
