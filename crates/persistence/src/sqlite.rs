// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` connection setup.
//!
//! Diesel has no DSL for PRAGMA statements or `last_insert_rowid()`, so
//! the raw-SQL escape hatches are confined to this module. Domain reads
//! and writes stay in `queries/` and `mutations/`.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::error::PersistenceError;

/// Embedded schema migrations, applied whenever a connection is opened.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Journal mode for an opened database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Journal {
    /// The `SQLite` default journal. Used for in-memory databases,
    /// where WAL is unsupported anyway.
    Default,
    /// Write-ahead logging, for better read concurrency on file-backed
    /// databases.
    WriteAhead,
}

#[derive(QueryableByName)]
struct ForeignKeyPragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Opens a connection, configures it, and applies pending migrations.
///
/// Foreign keys are switched on and then read back: a connection that
/// silently ignored the PRAGMA would undermine the referential
/// integrity the appointment, comment, and audit tables assume.
///
/// # Errors
///
/// Returns an error if the connection cannot be established, a PRAGMA
/// or migration fails, or foreign key enforcement did not take effect.
pub fn open(database_url: &str, journal: Journal) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, "Opening SQLite database");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)?;

    run_pragma(&mut conn, "PRAGMA foreign_keys = ON")?;
    if journal == Journal::WriteAhead {
        run_pragma(&mut conn, "PRAGMA journal_mode = WAL")?;
    }

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::Migration(e.to_string()))?;

    let enforced: i32 = diesel::sql_query("PRAGMA foreign_keys")
        .get_result::<ForeignKeyPragma>(&mut conn)?
        .foreign_keys;
    if enforced == 0 {
        return Err(PersistenceError::ForeignKeysDisabled);
    }

    Ok(conn)
}

fn run_pragma(conn: &mut SqliteConnection, statement: &str) -> Result<(), PersistenceError> {
    diesel::sql_query(statement)
        .execute(conn)
        .map_err(|e| PersistenceError::Pragma(format!("{statement}: {e}")))?;
    Ok(())
}

/// Returns the row ID assigned by the most recent insert on this
/// connection.
///
/// `SQLite` does not support `RETURNING` in every insert position, so
/// the mutation helpers read `last_insert_rowid()` instead.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}
