//! `kv_entries` table schema, upgraded in place on open.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - Upgrades run in one transaction; a failed step leaves the file as it was.
//! - A file written by a newer build is refused, never downgraded.

use super::{StorageError, StorageResult};
use log::info;
use rusqlite::Connection;

/// Schema version written by this build.
pub const KV_SCHEMA_VERSION: u32 = 1;

/// Upgrade steps; step `n` takes the file from version `n - 1` to `n`.
const UPGRADE_STEPS: [&str; KV_SCHEMA_VERSION as usize] =
    [include_str!("sql/0001_kv_entries.sql")];

/// Reads the schema version stamped on `conn`.
pub(crate) fn stored_version(conn: &Connection) -> StorageResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

/// Brings `conn` up to `KV_SCHEMA_VERSION`. Returns the version found.
pub(crate) fn upgrade(conn: &mut Connection) -> StorageResult<u32> {
    let found = stored_version(conn)?;
    if found > KV_SCHEMA_VERSION {
        return Err(StorageError::SchemaTooNew {
            found,
            supported: KV_SCHEMA_VERSION,
        });
    }

    let pending = &UPGRADE_STEPS[found as usize..];
    if pending.is_empty() {
        return Ok(found);
    }

    let tx = conn.transaction()?;
    for sql in pending {
        tx.execute_batch(sql)?;
    }
    tx.pragma_update(None, "user_version", KV_SCHEMA_VERSION)?;
    tx.commit()?;

    info!(
        "event=kv_schema_upgrade module=storage status=ok from={found} to={KV_SCHEMA_VERSION}"
    );
    Ok(found)
}
