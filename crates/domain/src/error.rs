// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Appointment status string is not a recognized status.
    InvalidStatus(String),
    /// A status transition is not permitted by the lifecycle rules.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition is not allowed.
        reason: String,
    },
    /// Payment status string is not a recognized payment status.
    InvalidPaymentStatus(String),
    /// Payment disposition string is not a recognized disposition.
    InvalidPaymentDisposition(String),
    /// Role string is not a recognized role.
    InvalidRole(String),
    /// Comment visibility string is not recognized.
    InvalidVisibility(String),
    /// Comment kind string is not recognized.
    InvalidCommentKind(String),
    /// A practitioner override price is below the service list price.
    CustomPriceBelowListPrice {
        /// The override price in cents.
        custom_cents: i64,
        /// The service list price in cents.
        list_cents: i64,
    },
    /// A problem report was submitted without a description.
    EmptyProblemDescription,
    /// The appointment has already been contested once.
    AlreadyContested {
        /// The appointment identifier.
        appointment_id: i64,
    },
    /// An appointment cannot be marked complete before its scheduled start.
    AppointmentNotStarted {
        /// The scheduled start time (ISO 8601).
        start_time: String,
    },
    /// The scheduled end does not come after the scheduled start.
    InvalidSchedule {
        /// The scheduled start time (ISO 8601).
        start_time: String,
        /// The scheduled end time (ISO 8601).
        end_time: String,
    },
    /// Failed to parse a timestamp from a string.
    TimestampParseError {
        /// The invalid timestamp string.
        value: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStatus(msg) => write!(f, "Invalid appointment status: {msg}"),
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot transition from '{from}' to '{to}': {reason}")
            }
            Self::InvalidPaymentStatus(msg) => write!(f, "Invalid payment status: {msg}"),
            Self::InvalidPaymentDisposition(msg) => {
                write!(f, "Invalid payment disposition: {msg}")
            }
            Self::InvalidRole(msg) => write!(f, "Invalid role: {msg}"),
            Self::InvalidVisibility(msg) => write!(f, "Invalid comment visibility: {msg}"),
            Self::InvalidCommentKind(msg) => write!(f, "Invalid comment kind: {msg}"),
            Self::CustomPriceBelowListPrice {
                custom_cents,
                list_cents,
            } => {
                write!(
                    f,
                    "Custom price {custom_cents} is below the service list price {list_cents}"
                )
            }
            Self::EmptyProblemDescription => {
                write!(f, "A problem report requires a non-empty description")
            }
            Self::AlreadyContested { appointment_id } => {
                write!(
                    f,
                    "Appointment {appointment_id} has already been contested once"
                )
            }
            Self::AppointmentNotStarted { start_time } => {
                write!(
                    f,
                    "Appointment cannot be marked complete before its scheduled start at {start_time}"
                )
            }
            Self::InvalidSchedule {
                start_time,
                end_time,
            } => {
                write!(
                    f,
                    "Scheduled end {end_time} must come after scheduled start {start_time}"
                )
            }
            Self::TimestampParseError { value, error } => {
                write!(f, "Failed to parse timestamp '{value}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
