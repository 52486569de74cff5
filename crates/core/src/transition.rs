// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::notification::NotificationKind;
use kairos_audit::AuditEvent;
use kairos_domain::{Appointment, CommentKind, CommentVisibility, Role};

/// A comment to be written as part of a transition commit.
///
/// The draft carries no timestamp: a comment created during a transition
/// is attributed to that transition's timestamp at commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
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
}

/// A side effect a transition requires beyond the status write itself.
///
/// `ReleasePayment` and `RecordComment` are committed atomically with the
/// status write; `Notify` is dispatched best-effort after the commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Release the captured payment to the practitioner. Must succeed
    /// within the same atomic commit as the status write.
    ReleasePayment,
    /// Append a comment attributed to this transition.
    RecordComment(CommentDraft),
    /// Enqueue an outbound notification. Fire-and-forget: delivery
    /// failure never blocks or reverses the transition.
    Notify {
        /// Who should be notified.
        recipient: Role,
        /// What happened.
        kind: NotificationKind,
    },
}

/// The result of a successful transition computation.
///
/// Transitions are atomic: the persistence layer either commits the new
/// appointment, the audit event, and the transactional effects together,
/// or nothing at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The appointment value after the transition.
    pub new_appointment: Appointment,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
    /// Side effects this transition requires.
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    /// Returns true if committing this transition must release payment.
    #[must_use]
    pub fn requires_payment_release(&self) -> bool {
        self.effects
            .iter()
            .any(|effect| matches!(effect, Effect::ReleasePayment))
    }

    /// Returns the comment drafts to be written with this transition.
    #[must_use]
    pub fn comment_drafts(&self) -> Vec<&CommentDraft> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::RecordComment(draft) => Some(draft),
                _ => None,
            })
            .collect()
    }
}
