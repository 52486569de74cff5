// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Appointment comments and problem reports.
//!
//! Comments are append-only annotations on an appointment. A problem
//! report is distinguished by an explicit kind flag, never by sniffing
//! the comment text.

use crate::error::DomainError;
use crate::types::Role;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Who may read a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentVisibility {
    /// Visible to the client, the practitioner, and staff.
    Public,
    /// Visible to staff only.
    StaffOnly,
}

impl CommentVisibility {
    /// Returns the string representation of the visibility.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::StaffOnly => "staff_only",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "public" => Ok(Self::Public),
            "staff_only" => Ok(Self::StaffOnly),
            _ => Err(DomainError::InvalidVisibility(s.to_string())),
        }
    }
}

impl FromStr for CommentVisibility {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// What a comment records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentKind {
    /// An ordinary annotation.
    Normal,
    /// A client problem report raised against a completed session.
    /// Always public: the client and staff must both be able to read it.
    ProblemReport,
}

impl CommentKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::ProblemReport => "problem_report",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "normal" => Ok(Self::Normal),
            "problem_report" => Ok(Self::ProblemReport),
            _ => Err(DomainError::InvalidCommentKind(s.to_string())),
        }
    }
}

impl FromStr for CommentKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// An append-only annotation attached to an appointment.
///
/// Comments are owned by their author and never mutated; only an admin
/// may delete one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// The canonical identifier assigned by the store.
    /// `None` indicates the comment has not been persisted yet.
    pub comment_id: Option<i64>,
    /// The appointment this comment belongs to.
    pub appointment_id: i64,
    /// The author's canonical identifier.
    pub author_id: i64,
    /// The author's role at the time of writing.
    pub author_role: Role,
    /// The comment text.
    pub body: String,
    /// Who may read this comment.
    pub visibility: CommentVisibility,
    /// What this comment records.
    pub kind: CommentKind,
    /// When the comment was created (ISO 8601).
    pub created_at: String,
}
