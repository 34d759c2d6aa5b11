//! Status store gateway.
//!
//! Thin query surface over the `ServerStatus` table. Every operation is a
//! parameterized statement over a pooled connection; by-name lookups enforce
//! the exactly-one contract and report zero and many matches as distinct
//! errors instead of silently using the first row.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection};

use crate::core::error::{AppError, AppResult};
use crate::storage::migrations;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Lock state of one tracked server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockStatus {
    /// Whether the server is currently claimed
    pub is_open: bool,
    /// Identity holding the lock; present iff `is_open`
    pub lock_holder: Option<String>,
}

/// Create the database connection pool and run schema migrations.
///
/// # Errors
///
/// Fails when the pool cannot be built or migrations do not apply; both are
/// startup-fatal conditions.
pub fn create_pool(database_path: &str) -> AppResult<DbPool> {
    let manager = SqliteConnectionManager::file(database_path);
    let pool = Pool::builder().max_size(10).build(manager)?;

    let mut conn = pool.get()?;
    migrations::run_migrations(&mut conn)?;

    Ok(pool)
}

/// Get a connection from the pool. Returned to the pool on drop.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, r2d2::Error> {
    pool.get()
}

fn exactly_one<T>(mut matches: Vec<T>, name: &str) -> AppResult<T> {
    match matches.len() {
        0 => Err(AppError::ServerNotFound(name.to_string())),
        1 => Ok(matches.swap_remove(0)),
        count => Err(AppError::AmbiguousServer {
            name: name.to_string(),
            count,
        }),
    }
}

/// Look up a server's lock state by name.
///
/// # Errors
///
/// `ServerNotFound` when no row matches, `AmbiguousServer` when more than
/// one does.
pub fn get_status(conn: &Connection, name: &str) -> AppResult<LockStatus> {
    let mut stmt = conn.prepare("SELECT IsOpen, LockHolder FROM ServerStatus WHERE Name = ?1")?;
    let rows = stmt.query_map(params![name], |row| {
        Ok(LockStatus {
            is_open: row.get::<_, i64>(0)? != 0,
            lock_holder: row.get(1)?,
        })
    })?;

    let mut matches = Vec::new();
    for row in rows {
        matches.push(row?);
    }
    exactly_one(matches, name)
}

/// One full row: lock state plus the subscribed channel, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    pub status: LockStatus,
    /// Subscriber channel identifier; absent means nobody is notified
    pub channel_id: Option<String>,
}

/// Look up a server's full row by name.
///
/// Same exactly-one contract as [`get_status`].
pub fn get_status_and_channel(conn: &Connection, name: &str) -> AppResult<StatusRow> {
    let mut stmt =
        conn.prepare("SELECT IsOpen, LockHolder, ChannelID FROM ServerStatus WHERE Name = ?1")?;
    let rows = stmt.query_map(params![name], |row| {
        Ok(StatusRow {
            status: LockStatus {
                is_open: row.get::<_, i64>(0)? != 0,
                lock_holder: row.get(1)?,
            },
            channel_id: row.get(2)?,
        })
    })?;

    let mut matches = Vec::new();
    for row in rows {
        matches.push(row?);
    }
    exactly_one(matches, name)
}

/// Names of every server whose notifications go to `channel_id`.
pub fn subscribed_servers(conn: &Connection, channel_id: &str) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT Name FROM ServerStatus WHERE ChannelID = ?1")?;
    let rows = stmt.query_map(params![channel_id], |row| row.get(0))?;

    let mut names = Vec::new();
    for row in rows {
        names.push(row?);
    }
    Ok(names)
}

/// Mark a server open and record the lock holder.
///
/// Returns the number of rows updated; zero means the server is untracked.
pub fn set_open(conn: &Connection, name: &str, holder: &str) -> AppResult<usize> {
    let affected = conn.execute(
        "UPDATE ServerStatus SET IsOpen = 1, LockHolder = ?1 WHERE Name = ?2",
        params![holder, name],
    )?;
    Ok(affected)
}

/// Mark a server closed and clear the lock holder.
pub fn set_closed(conn: &Connection, name: &str) -> AppResult<usize> {
    let affected = conn.execute(
        "UPDATE ServerStatus SET IsOpen = 0, LockHolder = NULL WHERE Name = ?1",
        params![name],
    )?;
    Ok(affected)
}

/// Point a server's notifications at a channel.
pub fn set_subscription(conn: &Connection, name: &str, channel_id: &str) -> AppResult<usize> {
    let affected = conn.execute(
        "UPDATE ServerStatus SET ChannelID = ?1 WHERE Name = ?2",
        params![channel_id, name],
    )?;
    Ok(affected)
}
