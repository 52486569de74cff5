// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod apply;
mod authz;
mod command;
mod error;
mod notification;
mod payment;
mod transition;

#[cfg(test)]
mod tests;

pub use apply::apply;
pub use authz::{can_view, ensure_can_transition, ensure_can_view};
pub use command::{Command, DisputeOutcome};
pub use error::CoreError;
pub use notification::{NotificationKind, Notifier};
pub use payment::{PaymentRelease, PaymentReleaseError};
pub use transition::{CommentDraft, Effect, TransitionResult};
