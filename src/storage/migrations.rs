use rusqlite::Connection;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use crate::core::error::AppResult;

mod embedded {
    use refinery::embed_migrations;

    embed_migrations!("./migrations");
}

static MIGRATION_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Bring the schema up to date.
///
/// Serialized per process so concurrent pool constructions (tests, multi
/// instance startups) do not interleave migration statements.
pub fn run_migrations(conn: &mut Connection) -> AppResult<()> {
    let mutex = MIGRATION_LOCK.get_or_init(|| Mutex::new(()));
    let _guard = match mutex.lock() {
        Ok(guard) => guard,
        // Migrations are idempotent; a panicked holder leaves nothing torn.
        Err(poisoned) => poisoned.into_inner(),
    };

    conn.busy_timeout(Duration::from_secs(30))?;
    embedded::migrations::runner().run(conn)?;

    Ok(())
}
