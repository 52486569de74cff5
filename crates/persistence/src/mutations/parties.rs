// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Party and service mutations.
//!
//! These records are created by account management and catalog tooling
//! upstream of the appointment lifecycle; the lifecycle only reads them.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::diesel_schema::{beneficiaries, clients, practitioners, services};
use crate::error::PersistenceError;
use crate::sqlite::last_insert_rowid;

/// Inserts a new client and returns its assigned ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_client(
    conn: &mut SqliteConnection,
    full_name: &str,
    email: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(clients::table)
        .values((
            clients::full_name.eq(full_name),
            clients::email.eq(email),
        ))
        .execute(conn)?;

    let client_id: i64 = last_insert_rowid(conn)?;
    debug!(client_id, "Inserted new client");
    Ok(client_id)
}

/// Inserts a new practitioner and returns its assigned ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_practitioner(
    conn: &mut SqliteConnection,
    full_name: &str,
    email: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(practitioners::table)
        .values((
            practitioners::full_name.eq(full_name),
            practitioners::email.eq(email),
        ))
        .execute(conn)?;

    let practitioner_id: i64 = last_insert_rowid(conn)?;
    debug!(practitioner_id, "Inserted new practitioner");
    Ok(practitioner_id)
}

/// Inserts a new service and returns its assigned ID.
///
/// A `None` list price marks a quote-on-request service.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_service(
    conn: &mut SqliteConnection,
    name: &str,
    list_price_cents: Option<i64>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(services::table)
        .values((
            services::name.eq(name),
            services::list_price_cents.eq(list_price_cents),
        ))
        .execute(conn)?;

    let service_id: i64 = last_insert_rowid(conn)?;
    debug!(service_id, "Inserted new service");
    Ok(service_id)
}

/// Inserts a new beneficiary for a client and returns its assigned ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_beneficiary(
    conn: &mut SqliteConnection,
    client_id: i64,
    full_name: &str,
    birth_date: Option<&str>,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(beneficiaries::table)
        .values((
            beneficiaries::client_id.eq(client_id),
            beneficiaries::full_name.eq(full_name),
            beneficiaries::birth_date.eq(birth_date),
            beneficiaries::email.eq(email),
            beneficiaries::phone.eq(phone),
        ))
        .execute(conn)?;

    let beneficiary_id: i64 = last_insert_rowid(conn)?;
    debug!(beneficiary_id, client_id, "Inserted new beneficiary");
    Ok(beneficiary_id)
}
