// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment status tracking for appointments.
//!
//! Payment status moves only as a side effect of appointment lifecycle
//! transitions; it is never set directly by callers. In particular,
//! `released` is reachable only through a validation transition.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Payment states of an appointment's captured funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No payment has been captured yet.
    Pending,
    /// Funds captured from the client; held by the practice.
    Captured,
    /// Funds frozen while a dispute is open.
    Frozen,
    /// Funds released to the practitioner after validation.
    Released,
    /// Funds returned to the client after cancellation.
    Refunded,
}

impl PaymentStatus {
    /// Returns the string representation of the payment status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Captured => "captured",
            Self::Frozen => "frozen",
            Self::Released => "released",
            Self::Refunded => "refunded",
        }
    }

    /// Parses a payment status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPaymentStatus` if the string is not valid.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "captured" => Ok(Self::Captured),
            "frozen" => Ok(Self::Frozen),
            "released" => Ok(Self::Released),
            "refunded" => Ok(Self::Refunded),
            _ => Err(DomainError::InvalidPaymentStatus(s.to_string())),
        }
    }

    /// Returns true if funds are currently held by the practice.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        matches!(self, Self::Captured | Self::Frozen)
    }

    /// Returns true if the money has reached its final destination.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Released | Self::Refunded)
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Admin-controlled disposition of a captured payment on cancellation
/// or dispute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentDisposition {
    /// Return the captured funds to the client.
    Refund,
    /// The practice retains the captured funds.
    Retain,
}

impl PaymentDisposition {
    /// Returns the string representation of the disposition.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Refund => "refund",
            Self::Retain => "retain",
        }
    }

    /// Parses a disposition from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPaymentDisposition` if the string is not valid.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "refund" => Ok(Self::Refund),
            "retain" => Ok(Self::Retain),
            _ => Err(DomainError::InvalidPaymentDisposition(s.to_string())),
        }
    }
}

impl FromStr for PaymentDisposition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}
