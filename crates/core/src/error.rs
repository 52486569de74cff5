// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use kairos_domain::DomainError;

/// Errors that can occur during appointment transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated (bad precondition, bad input).
    DomainViolation(DomainError),
    /// The actor is not permitted to perform this operation.
    ///
    /// Authorization is evaluated before any precondition check; a
    /// forbidden request never mutates anything.
    Forbidden {
        /// The operation that was attempted.
        action: String,
        /// Why the actor is not permitted.
        reason: String,
    },
    /// An internal invariant was violated.
    Internal(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Forbidden { action, reason } => {
                write!(f, "Forbidden: '{action}': {reason}")
            }
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
