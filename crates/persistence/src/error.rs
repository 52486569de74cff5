// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The database rejected a statement.
    Database(String),
    /// The connection could not be established.
    Connection(String),
    /// Applying schema migrations failed.
    Migration(String),
    /// A PRAGMA statement failed during connection setup.
    Pragma(String),
    /// The requested record does not exist.
    NotFound(String),
    /// The conditional status write matched no row: the appointment's
    /// status changed under the caller (optimistic concurrency loss).
    StaleStatus {
        /// The appointment whose status moved.
        appointment_id: i64,
        /// The status the caller expected to find.
        expected: String,
    },
    /// The in-transaction payment release failed; the whole transition
    /// was rolled back.
    PaymentReleaseAborted(String),
    /// A stored value could not be rebuilt into a domain type.
    Reconstruction(String),
    /// Foreign key enforcement did not take effect on this connection.
    ForeignKeysDisabled,
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Database(msg) => write!(f, "Database error: {msg}"),
            Self::Connection(msg) => write!(f, "Could not connect to the database: {msg}"),
            Self::Migration(msg) => write!(f, "Schema migration failed: {msg}"),
            Self::Pragma(msg) => write!(f, "Connection setup failed: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::StaleStatus {
                appointment_id,
                expected,
            } => {
                write!(
                    f,
                    "Appointment {appointment_id} is no longer in status '{expected}'"
                )
            }
            Self::PaymentReleaseAborted(msg) => {
                write!(f, "Transition aborted, payment release failed: {msg}")
            }
            Self::Reconstruction(msg) => {
                write!(f, "Stored value could not be rebuilt: {msg}")
            }
            Self::ForeignKeysDisabled => {
                write!(f, "Foreign key enforcement is not active on this connection")
            }
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::Connection(err.to_string())
    }
}
