// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Kairos booking platform.
//!
//! This crate provides database persistence for appointments, comments,
//! and audit events. It is built on Diesel over `SQLite`.
//!
//! The store is the one place appointment status is written, and only
//! through [`SqliteStore::commit_transition`]: a single transaction
//! holding the conditional status update (the optimistic-concurrency
//! guard), the audit insert, any transition comments, and the
//! in-transaction payment release for validating transitions.
//!
//! ## Testing
//!
//! - Standard tests run against in-memory `SQLite` databases
//! - Each in-memory database gets a unique shared name from an atomic
//!   counter, so tests are isolated without time-based collisions

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use kairos::{CommentDraft, PaymentRelease, TransitionResult};
use kairos_domain::{
    Appointment, AppointmentStatus, Beneficiary, Client, Comment, Practitioner, ServiceOffering,
};

mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use queries::audit::StoredAuditEvent;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique
/// sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for appointments, comments, and audit events.
pub struct SqliteStore {
    conn: SqliteConnection,
}

impl SqliteStore {
    /// Creates a new store with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_test_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let conn: SqliteConnection = sqlite::open(&shared_memory_url, sqlite::Journal::Default)?;
        Ok(Self { conn })
    }

    /// Creates a new store with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path
            .as_ref()
            .to_str()
            .ok_or_else(|| PersistenceError::Connection("Invalid database path".to_string()))?;

        let conn: SqliteConnection = sqlite::open(path_str, sqlite::Journal::WriteAhead)?;
        Ok(Self { conn })
    }

    // ========================================================================
    // Parties & services
    // ========================================================================

    /// Inserts a new client and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_client(&mut self, full_name: &str, email: &str) -> Result<i64, PersistenceError> {
        mutations::parties::create_client(&mut self.conn, full_name, email)
    }

    /// Inserts a new practitioner and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_practitioner(
        &mut self,
        full_name: &str,
        email: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::parties::create_practitioner(&mut self.conn, full_name, email)
    }

    /// Inserts a new service and returns its assigned ID.
    ///
    /// A `None` list price marks a quote-on-request service.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_service(
        &mut self,
        name: &str,
        list_price_cents: Option<i64>,
    ) -> Result<i64, PersistenceError> {
        mutations::parties::create_service(&mut self.conn, name, list_price_cents)
    }

    /// Inserts a new beneficiary and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_beneficiary(
        &mut self,
        client_id: i64,
        full_name: &str,
        birth_date: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<i64, PersistenceError> {
        mutations::parties::create_beneficiary(
            &mut self.conn,
            client_id,
            full_name,
            birth_date,
            email,
            phone,
        )
    }

    /// Retrieves a client by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no such client exists.
    pub fn get_client(&mut self, client_id: i64) -> Result<Client, PersistenceError> {
        queries::parties::get_client(&mut self.conn, client_id)
    }

    /// Retrieves a practitioner by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no such practitioner exists.
    pub fn get_practitioner(
        &mut self,
        practitioner_id: i64,
    ) -> Result<Practitioner, PersistenceError> {
        queries::parties::get_practitioner(&mut self.conn, practitioner_id)
    }

    /// Retrieves a service offering by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no such service exists.
    pub fn get_service(&mut self, service_id: i64) -> Result<ServiceOffering, PersistenceError> {
        queries::parties::get_service(&mut self.conn, service_id)
    }

    /// Retrieves a beneficiary by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no such beneficiary exists.
    pub fn get_beneficiary(
        &mut self,
        beneficiary_id: i64,
    ) -> Result<Beneficiary, PersistenceError> {
        queries::parties::get_beneficiary(&mut self.conn, beneficiary_id)
    }

    // ========================================================================
    // Appointments
    // ========================================================================

    /// Inserts a new appointment row and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the appointment already carries an ID or the
    /// insert fails.
    pub fn create_appointment(
        &mut self,
        appointment: &Appointment,
        created_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::appointments::insert_appointment(&mut self.conn, appointment, created_at)
    }

    /// Retrieves an appointment by its canonical identifier.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no such appointment exists.
    pub fn get_appointment(&mut self, appointment_id: i64) -> Result<Appointment, PersistenceError> {
        queries::appointments::get_appointment(&mut self.conn, appointment_id)
    }

    /// Retrieves an appointment by its human-readable reference code.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no such appointment exists.
    pub fn get_appointment_by_reference(
        &mut self,
        reference_code: &str,
    ) -> Result<Appointment, PersistenceError> {
        queries::appointments::get_appointment_by_reference(&mut self.conn, reference_code)
    }

    /// Commits a transition result atomically.
    ///
    /// See [`mutations::transitions::commit_transition`] for the full
    /// contract; this is the only write path for appointment status.
    ///
    /// # Errors
    ///
    /// Returns `StaleStatus` if the caller lost the status race,
    /// `PaymentReleaseAborted` if the in-transaction release failed, or
    /// a database error. In every error case nothing was written.
    pub fn commit_transition(
        &mut self,
        expected_status: AppointmentStatus,
        result: &TransitionResult,
        occurred_at: &str,
        payments: Option<&mut dyn PaymentRelease>,
    ) -> Result<i64, PersistenceError> {
        mutations::transitions::commit_transition(
            &mut self.conn,
            expected_status,
            result,
            occurred_at,
            payments,
        )
    }

    // ========================================================================
    // Comments & audit
    // ========================================================================

    /// Appends a standalone comment to an appointment's thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn append_comment(
        &mut self,
        appointment_id: i64,
        draft: &CommentDraft,
        created_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::comments::insert_comment_draft(&mut self.conn, appointment_id, draft, created_at)
    }

    /// Lists the comments on an appointment in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_comments(
        &mut self,
        appointment_id: i64,
        include_staff_only: bool,
    ) -> Result<Vec<Comment>, PersistenceError> {
        queries::comments::list_comments(&mut self.conn, appointment_id, include_staff_only)
    }

    /// Deletes a comment. Admin-only; the API boundary enforces the role.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no such comment exists.
    pub fn delete_comment(&mut self, comment_id: i64) -> Result<(), PersistenceError> {
        mutations::comments::delete_comment(&mut self.conn, comment_id)
    }

    /// Lists the audit timeline of an appointment in event order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_audit_events(
        &mut self,
        appointment_id: i64,
    ) -> Result<Vec<StoredAuditEvent>, PersistenceError> {
        queries::audit::list_events(&mut self.conn, appointment_id)
    }
}
