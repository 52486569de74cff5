// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Appointment status tracking and transition logic.
//!
//! This module defines the appointment lifecycle states and the valid
//! transitions between them. Transitions are actor-initiated only; the
//! system never advances status based on time alone.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Appointment lifecycle states.
///
/// Status is tracked per appointment and moves strictly along the
/// transition table; terminal states admit no further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Booked, payment not yet captured.
    Pending,
    /// Payment captured; the session is scheduled.
    Confirmed,
    /// The practitioner has reported the session as delivered.
    Completed,
    /// The client has contested the reported completion.
    IssueReported,
    /// The client or staff confirmed delivery; payment released.
    Validated,
    /// The appointment was cancelled before delivery.
    Cancelled,
}

impl AppointmentStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::IssueReported => "issue_reported",
            Self::Validated => "validated",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatus` if the string is not a valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "issue_reported" => Ok(Self::IssueReported),
            "validated" => Ok(Self::Validated),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }

    /// Returns true if this status is terminal (no further transitions are legal).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Validated | Self::Cancelled)
    }

    /// Checks if a transition from this status to another follows the lifecycle table.
    ///
    /// Valid transitions are:
    /// - `pending` → `confirmed` (payment captured)
    /// - `confirmed` → `completed` (practitioner marks complete)
    /// - `completed` → `validated` (client validates)
    /// - `completed` → `issue_reported` (client contests)
    /// - `issue_reported` → `validated` (client validates or staff resolves)
    /// - `issue_reported` → `cancelled` (staff resolves against completion)
    /// - `pending`/`confirmed` → `cancelled`
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::Completed)
                | (Self::Completed, Self::Validated | Self::IssueReported)
                | (Self::IssueReported, Self::Validated | Self::Cancelled)
                | (Self::Pending | Self::Confirmed, Self::Cancelled)
        )
    }

    /// Validates that a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        // Terminal states are checked first so the error names the real cause
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from a terminal state".to_string(),
            });
        }

        if self.can_transition_to(new_status) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by the appointment lifecycle".to_string(),
            })
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_round_trip() {
        let statuses = vec![
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Completed,
            AppointmentStatus::IssueReported,
            AppointmentStatus::Validated,
            AppointmentStatus::Cancelled,
        ];

        for status in statuses {
            let s = status.as_str();
            match AppointmentStatus::parse_str(s) {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("Failed to parse status string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_invalid_status_string() {
        let result = AppointmentStatus::parse_str("in_review");
        assert!(result.is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!AppointmentStatus::Pending.is_terminal());
        assert!(!AppointmentStatus::Confirmed.is_terminal());
        assert!(!AppointmentStatus::Completed.is_terminal());
        assert!(!AppointmentStatus::IssueReported.is_terminal());
        assert!(AppointmentStatus::Validated.is_terminal());
        assert!(AppointmentStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_happy_path_transitions() {
        assert!(
            AppointmentStatus::Pending
                .validate_transition(AppointmentStatus::Confirmed)
                .is_ok()
        );
        assert!(
            AppointmentStatus::Confirmed
                .validate_transition(AppointmentStatus::Completed)
                .is_ok()
        );
        assert!(
            AppointmentStatus::Completed
                .validate_transition(AppointmentStatus::Validated)
                .is_ok()
        );
    }

    #[test]
    fn test_dispute_transitions() {
        assert!(
            AppointmentStatus::Completed
                .validate_transition(AppointmentStatus::IssueReported)
                .is_ok()
        );
        assert!(
            AppointmentStatus::IssueReported
                .validate_transition(AppointmentStatus::Validated)
                .is_ok()
        );
        assert!(
            AppointmentStatus::IssueReported
                .validate_transition(AppointmentStatus::Cancelled)
                .is_ok()
        );
    }

    #[test]
    fn test_cancellation_only_before_completion() {
        assert!(
            AppointmentStatus::Pending
                .validate_transition(AppointmentStatus::Cancelled)
                .is_ok()
        );
        assert!(
            AppointmentStatus::Confirmed
                .validate_transition(AppointmentStatus::Cancelled)
                .is_ok()
        );
        assert!(
            AppointmentStatus::Completed
                .validate_transition(AppointmentStatus::Cancelled)
                .is_err()
        );
    }

    #[test]
    fn test_no_skipping_completion() {
        assert!(
            AppointmentStatus::Confirmed
                .validate_transition(AppointmentStatus::Validated)
                .is_err()
        );
        assert!(
            AppointmentStatus::Pending
                .validate_transition(AppointmentStatus::Completed)
                .is_err()
        );
        assert!(
            AppointmentStatus::Confirmed
                .validate_transition(AppointmentStatus::IssueReported)
                .is_err()
        );
    }

    #[test]
    fn test_no_transitions_from_terminal_states() {
        let terminal_states = vec![AppointmentStatus::Validated, AppointmentStatus::Cancelled];

        for terminal in terminal_states {
            assert!(
                terminal
                    .validate_transition(AppointmentStatus::Confirmed)
                    .is_err()
            );
            assert!(
                terminal
                    .validate_transition(AppointmentStatus::Completed)
                    .is_err()
            );
            assert!(
                terminal
                    .validate_transition(AppointmentStatus::Cancelled)
                    .is_err()
            );
        }
    }

    #[test]
    fn test_no_regression_from_validated() {
        let result = AppointmentStatus::Validated.validate_transition(AppointmentStatus::Completed);
        match result {
            Err(DomainError::InvalidStatusTransition { reason, .. }) => {
                assert!(reason.contains("terminal"));
            }
            other => panic!("Expected InvalidStatusTransition, got: {other:?}"),
        }
    }
}
