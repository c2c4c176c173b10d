//! Ordered schema scripts for the shop tables.
//!
//! | version | name | tables |
//! |---|---|---|
//! | 1 | `products_reviews` | `tbl_product`, `tbl_product_image`, `tbl_review` |
//! | 2 | `cart` | `tbl_cart` |
//! | 3 | `todo` | `tbl_todo` |
//!
//! The applied version lives in `PRAGMA user_version`. Pending scripts run
//! in one transaction; each step logs `event=db_migrate_step` at debug level
//! and a finished run logs `event=db_migrate` with the version range.

use crate::db::{DbError, DbResult};
use log::{debug, error, info};
use rusqlite::Connection;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "products_reviews",
        sql: include_str!("0001_products_reviews.sql"),
    },
    Migration {
        version: 2,
        name: "cart",
        sql: include_str!("0002_cart.sql"),
    },
    Migration {
        version: 3,
        name: "todo",
        sql: include_str!("0003_todo.sql"),
    },
];

/// Schema version this build migrates to.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to [`latest_version`].
///
/// A database already at the latest version is left untouched. A newer one
/// is rejected with [`DbError::UnsupportedSchemaVersion`].
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = current_user_version(conn)?;
    let latest = latest_version();

    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }
    if from_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    let pending = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > from_version);
    for migration in pending {
        run_step(&tx, migration).map_err(|source| {
            error!(
                "event=db_migrate module=db status=error version={} name={} error={source}",
                migration.version, migration.name
            );
            DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            }
        })?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from_version} to_version={latest}");
    Ok(())
}

/// `PRAGMA user_version` of `conn`; `0` for a fresh database.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

fn run_step(conn: &Connection, migration: &Migration) -> rusqlite::Result<()> {
    conn.execute_batch(migration.sql)?;
    conn.pragma_update(None, "user_version", migration.version)
}
