// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::price::Price;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Actor roles for authorization.
///
/// Roles determine which transitions an actor may request; relationship
/// rules (assigned practitioner, owning client) are checked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The paying account holder who books appointments.
    Client,
    /// The service provider assigned to appointments.
    Practitioner,
    /// Practice staff with structural and corrective authority.
    Admin,
}

impl Role {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Practitioner => "practitioner",
            Self::Admin => "admin",
        }
    }

    /// Parses a role from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRole` if the string is not a valid role.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "client" => Ok(Self::Client),
            "practitioner" => Ok(Self::Practitioner),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }

    /// Returns true for practice staff.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An explicit reference to the actor requesting an operation.
///
/// Every core operation receives the acting identity as a parameter;
/// the core never reads an ambient "current user".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorRef {
    /// The actor's canonical identifier.
    pub id: i64,
    /// The actor's role.
    pub role: Role,
}

impl ActorRef {
    /// Creates a new actor reference.
    #[must_use]
    pub const fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }
}

/// A human-readable short code identifying an appointment for support reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceCode {
    /// The code value, normalized to uppercase.
    value: String,
}

impl ReferenceCode {
    /// Creates a new reference code, normalized to uppercase.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_uppercase(),
        }
    }

    /// Returns the code value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for ReferenceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A paying account holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    /// The canonical identifier assigned by the store.
    pub client_id: i64,
    /// The client's display name.
    pub full_name: String,
    /// The client's contact email.
    pub email: String,
}

/// A service provider who delivers sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Practitioner {
    /// The canonical identifier assigned by the store.
    pub practitioner_id: i64,
    /// The practitioner's display name.
    pub full_name: String,
    /// The practitioner's contact email.
    pub email: String,
}

/// A bookable service with its published list price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOffering {
    /// The canonical identifier assigned by the store.
    pub service_id: i64,
    /// The service name.
    pub name: String,
    /// The published list price, or the quote-on-request sentinel.
    pub list_price: Price,
}

/// The person actually receiving a session, when distinct from the
/// paying client.
///
/// Birth and contact fields are sensitive: read-side projections include
/// them only for actors who pass the appointment view check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beneficiary {
    /// The canonical identifier assigned by the store.
    pub beneficiary_id: i64,
    /// The client account this beneficiary belongs to.
    pub client_id: i64,
    /// The beneficiary's full name.
    pub full_name: String,
    /// Birth date (ISO 8601 date), used for numerology chart preparation.
    pub birth_date: Option<String>,
    /// Contact email, if distinct from the client's.
    pub email: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
}
