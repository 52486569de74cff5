// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use kairos::CoreError;
use kairos_domain::DomainError;
use kairos_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API
/// contract: authorization and precondition failures surface verbatim,
/// transient store failures are marked retryable, and a failed payment
/// release is its own class because the caller must know money was NOT
/// released even though validation was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A requested resource was not found.
    NotFound {
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The actor is not permitted to perform this operation.
    /// Never retried automatically.
    Forbidden {
        /// The operation that was attempted.
        action: String,
        /// Why the actor is not permitted.
        reason: String,
    },
    /// The appointment's status does not permit the requested
    /// transition (including losing a concurrent status race). The
    /// caller should refresh and re-decide, not retry blindly.
    PreconditionFailed {
        /// A human-readable description of the violated precondition.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The payment release side effect failed during validation; the
    /// status write was rolled back and no money moved.
    PaymentReleaseFailed {
        /// A description of the release failure.
        message: String,
    },
    /// The store was unavailable. Safe to retry with backoff; no
    /// partial state was written.
    TransientStore {
        /// A description of the infrastructure failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { message } => write!(f, "{message}"),
            Self::Forbidden { action, reason } => {
                write!(f, "Forbidden: '{action}': {reason}")
            }
            Self::PreconditionFailed { message } => {
                write!(f, "Precondition failed: {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::PaymentReleaseFailed { message } => {
                write!(f, "Payment release failed, validation aborted: {message}")
            }
            Self::TransientStore { message } => {
                write!(f, "Temporary storage failure, retry later: {message}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not
/// leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidStatusTransition { .. }
        | DomainError::AlreadyContested { .. }
        | DomainError::AppointmentNotStarted { .. } => ApiError::PreconditionFailed {
            message: err.to_string(),
        },
        DomainError::EmptyProblemDescription => ApiError::InvalidInput {
            field: String::from("description"),
            message: err.to_string(),
        },
        DomainError::CustomPriceBelowListPrice { .. } => ApiError::InvalidInput {
            field: String::from("custom_price_cents"),
            message: err.to_string(),
        },
        DomainError::InvalidStatus(msg) => ApiError::InvalidInput {
            field: String::from("status"),
            message: msg,
        },
        DomainError::InvalidPaymentStatus(msg) => ApiError::InvalidInput {
            field: String::from("payment_status"),
            message: msg,
        },
        DomainError::InvalidPaymentDisposition(msg) => ApiError::InvalidInput {
            field: String::from("disposition"),
            message: msg,
        },
        DomainError::InvalidRole(msg) => ApiError::InvalidInput {
            field: String::from("role"),
            message: msg,
        },
        DomainError::InvalidVisibility(msg) => ApiError::InvalidInput {
            field: String::from("visibility"),
            message: msg,
        },
        DomainError::InvalidCommentKind(msg) => ApiError::InvalidInput {
            field: String::from("kind"),
            message: msg,
        },
        DomainError::InvalidSchedule { .. } => ApiError::InvalidInput {
            field: String::from("end_time"),
            message: err.to_string(),
        },
        DomainError::TimestampParseError { .. } => ApiError::InvalidInput {
            field: String::from("timestamp"),
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked
/// directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Forbidden { action, reason } => ApiError::Forbidden { action, reason },
        CoreError::Internal(msg) => ApiError::Internal { message: msg },
    }
}

/// Maps a persistence error onto the API taxonomy.
///
/// Infrastructure failures become `TransientStore` (the caller may
/// retry); a stale conditional write becomes `PreconditionFailed` (the
/// caller lost a race and must refresh); a payment release abort keeps
/// its own class.
#[must_use]
pub fn map_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::NotFound { message },
        PersistenceError::StaleStatus { .. } => ApiError::PreconditionFailed {
            message: err.to_string(),
        },
        PersistenceError::PaymentReleaseAborted(message) => {
            ApiError::PaymentReleaseFailed { message }
        }
        PersistenceError::Database(_) | PersistenceError::Connection(_) => {
            ApiError::TransientStore {
                message: err.to_string(),
            }
        }
        PersistenceError::Migration(_)
        | PersistenceError::Pragma(_)
        | PersistenceError::Reconstruction(_)
        | PersistenceError::ForeignKeysDisabled
        | PersistenceError::Other(_) => ApiError::Internal {
            message: err.to_string(),
        },
    }
}
