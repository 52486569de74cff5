// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authorization predicate evaluation.
//!
//! Every transition is gated here, inside the core, before its
//! precondition is even looked at. The true boundary is the data store's
//! authorization layer; this evaluator is the defense in front of it, so
//! a forbidden request never reaches a status write.
//!
//! Rules are role × relationship: admins may act on any appointment;
//! practitioners only on appointments they are assigned to; clients only
//! on appointments they pay for.

use crate::command::Command;
use crate::error::CoreError;
use kairos_domain::{ActorRef, Appointment, Role};

/// Returns true if the actor may read this appointment.
#[must_use]
pub const fn can_view(actor: &ActorRef, appointment: &Appointment) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Practitioner => appointment.practitioner_id == actor.id,
        Role::Client => appointment.client_id == actor.id,
    }
}

/// Validates that the actor may read this appointment.
///
/// # Errors
///
/// Returns `CoreError::Forbidden` if the actor is not a party to the
/// appointment and not staff.
pub fn ensure_can_view(actor: &ActorRef, appointment: &Appointment) -> Result<(), CoreError> {
    if can_view(actor, appointment) {
        Ok(())
    } else {
        Err(CoreError::Forbidden {
            action: String::from("view"),
            reason: String::from("not a party to this appointment"),
        })
    }
}

/// Validates that the actor may request the given transition on this
/// appointment.
///
/// This checks only who is asking, never the appointment's status;
/// status preconditions are the state machine's concern.
///
/// # Errors
///
/// Returns `CoreError::Forbidden` if the role or relationship rules
/// reject the actor.
pub fn ensure_can_transition(
    actor: &ActorRef,
    appointment: &Appointment,
    command: &Command,
) -> Result<(), CoreError> {
    let forbidden = |reason: &str| {
        Err(CoreError::Forbidden {
            action: command.action_name().to_lowercase(),
            reason: reason.to_string(),
        })
    };

    match command {
        Command::ConfirmPayment => match actor.role {
            Role::Admin => Ok(()),
            Role::Client | Role::Practitioner => {
                forbidden("payment capture is confirmed by staff only")
            }
        },
        Command::MarkCompleted => match actor.role {
            Role::Admin => Ok(()),
            Role::Practitioner if appointment.practitioner_id == actor.id => Ok(()),
            Role::Practitioner => forbidden("not the practitioner assigned to this appointment"),
            Role::Client => forbidden("only the assigned practitioner may mark a session complete"),
        },
        Command::Validate { .. } => match actor.role {
            Role::Admin => Ok(()),
            Role::Client if appointment.client_id == actor.id => Ok(()),
            Role::Client => forbidden("not the client of this appointment"),
            Role::Practitioner => {
                forbidden("a practitioner may not validate their own completion report")
            }
        },
        // Contestation records the client's voice; staff closes disputes
        // through ResolveDispute instead.
        Command::ReportProblem { .. } => match actor.role {
            Role::Client if appointment.client_id == actor.id => Ok(()),
            Role::Client => forbidden("not the client of this appointment"),
            Role::Practitioner | Role::Admin => {
                forbidden("only the appointment's client may report a problem")
            }
        },
        Command::Cancel { disposition, .. } => {
            if disposition.is_some() && actor.role != Role::Admin {
                return forbidden("payment disposition on cancellation is admin-controlled");
            }
            match actor.role {
                Role::Admin => Ok(()),
                Role::Practitioner if appointment.practitioner_id == actor.id => Ok(()),
                Role::Client if appointment.client_id == actor.id => Ok(()),
                Role::Practitioner | Role::Client => forbidden("not a party to this appointment"),
            }
        }
        Command::ResolveDispute { .. } => match actor.role {
            Role::Admin => Ok(()),
            Role::Client | Role::Practitioner => forbidden("disputes are resolved by staff"),
        },
    }
}
