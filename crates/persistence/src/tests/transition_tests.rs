// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the atomic transition commit: optimistic concurrency, audit
//! emission, and the payment coupling.

use super::helpers::{
    FakePayments, NOW, advance, advance_to_completed, book_appointment, occurred_at, seeded_store,
};
use crate::PersistenceError;
use kairos::{Command, TransitionResult, apply};
use kairos_audit::Cause;
use kairos_domain::{ActorRef, AppointmentStatus, PaymentStatus, Role};

fn test_cause() -> Cause {
    Cause::new(String::from("req-test"), String::from("Test request"))
}

#[test]
fn test_full_lifecycle_walk_accumulates_audit_trail() {
    let (mut store, seeded) = seeded_store();
    let appointment_id = book_appointment(&mut store, &seeded);
    advance_to_completed(&mut store, appointment_id, &seeded);

    let mut payments = FakePayments::new();
    advance(
        &mut store,
        appointment_id,
        Command::Validate {
            comment: Some(String::from("Lovely session")),
        },
        &ActorRef::new(seeded.client_id, Role::Client),
        Some(&mut payments),
    );

    let appointment = store
        .get_appointment(appointment_id)
        .expect("Appointment should exist");
    assert_eq!(appointment.status, AppointmentStatus::Validated);
    assert_eq!(appointment.payment_status, PaymentStatus::Released);
    assert_eq!(payments.released, vec![appointment_id]);

    // One audit event per transition, in order
    let timeline = store
        .list_audit_events(appointment_id)
        .expect("Failed to list audit events");
    let actions: Vec<&str> = timeline
        .iter()
        .map(|stored| stored.event.action.name.as_str())
        .collect();
    assert_eq!(actions, vec!["ConfirmPayment", "MarkCompleted", "Validate"]);

    // Every stored event carries its ID and the transition timestamp
    for stored in &timeline {
        assert!(stored.event.event_id.is_some());
        assert_eq!(stored.created_at, occurred_at());
    }

    // The validation comment was committed with the transition
    let comments = store
        .list_comments(appointment_id, false)
        .expect("Failed to list comments");
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].body, "Lovely session");
}

#[test]
fn test_stale_status_write_is_rejected_and_rolled_back() {
    let (mut store, seeded) = seeded_store();
    let appointment_id = book_appointment(&mut store, &seeded);
    advance_to_completed(&mut store, appointment_id, &seeded);

    let client = ActorRef::new(seeded.client_id, Role::Client);
    let appointment = store
        .get_appointment(appointment_id)
        .expect("Appointment should exist");

    // Two callers compute the same transition from `completed`
    let first: TransitionResult = apply(
        &appointment,
        Command::Validate { comment: None },
        &client,
        test_cause(),
        NOW,
    )
    .expect("First transition should apply");
    let second: TransitionResult = apply(
        &appointment,
        Command::Validate { comment: None },
        &client,
        test_cause(),
        NOW,
    )
    .expect("Second transition should apply");

    let mut payments = FakePayments::new();
    store
        .commit_transition(
            appointment.status,
            &first,
            &occurred_at(),
            Some(&mut payments),
        )
        .expect("First commit should win");

    // The loser observes the already-advanced state and fails
    let result = store.commit_transition(
        appointment.status,
        &second,
        &occurred_at(),
        Some(&mut payments),
    );
    assert!(matches!(
        result,
        Err(PersistenceError::StaleStatus { .. })
    ));

    // Exactly one validation happened: one release, one audit event
    assert_eq!(payments.released, vec![appointment_id]);
    let timeline = store
        .list_audit_events(appointment_id)
        .expect("Failed to list audit events");
    assert_eq!(
        timeline
            .iter()
            .filter(|stored| stored.event.action.name == "Validate")
            .count(),
        1
    );
}

#[test]
fn test_payment_release_failure_rolls_back_everything() {
    let (mut store, seeded) = seeded_store();
    let appointment_id = book_appointment(&mut store, &seeded);
    advance_to_completed(&mut store, appointment_id, &seeded);

    let appointment = store
        .get_appointment(appointment_id)
        .expect("Appointment should exist");
    let result: TransitionResult = apply(
        &appointment,
        Command::Validate {
            comment: Some(String::from("thanks")),
        },
        &ActorRef::new(seeded.client_id, Role::Client),
        test_cause(),
        NOW,
    )
    .expect("Transition should apply");

    let mut payments = FakePayments::failing();
    let commit = store.commit_transition(
        appointment.status,
        &result,
        &occurred_at(),
        Some(&mut payments),
    );
    assert!(matches!(
        commit,
        Err(PersistenceError::PaymentReleaseAborted(_))
    ));

    // Status not advanced: never validated-but-unpaid
    let reloaded = store
        .get_appointment(appointment_id)
        .expect("Appointment should exist");
    assert_eq!(reloaded.status, AppointmentStatus::Completed);
    assert_eq!(reloaded.payment_status, PaymentStatus::Captured);

    // Neither the audit event nor the comment survived the rollback
    let timeline = store
        .list_audit_events(appointment_id)
        .expect("Failed to list audit events");
    assert!(
        timeline
            .iter()
            .all(|stored| stored.event.action.name != "Validate")
    );
    let comments = store
        .list_comments(appointment_id, true)
        .expect("Failed to list comments");
    assert!(comments.is_empty());
}

#[test]
fn test_validating_transition_requires_payment_port() {
    let (mut store, seeded) = seeded_store();
    let appointment_id = book_appointment(&mut store, &seeded);
    advance_to_completed(&mut store, appointment_id, &seeded);

    let appointment = store
        .get_appointment(appointment_id)
        .expect("Appointment should exist");
    let result: TransitionResult = apply(
        &appointment,
        Command::Validate { comment: None },
        &ActorRef::new(seeded.client_id, Role::Client),
        test_cause(),
        NOW,
    )
    .expect("Transition should apply");

    let commit = store.commit_transition(appointment.status, &result, &occurred_at(), None);
    assert!(commit.is_err());

    let reloaded = store
        .get_appointment(appointment_id)
        .expect("Appointment should exist");
    assert_eq!(reloaded.status, AppointmentStatus::Completed);
}

#[test]
fn test_contestation_commit_freezes_payment_and_records_report() {
    let (mut store, seeded) = seeded_store();
    let appointment_id = book_appointment(&mut store, &seeded);
    advance_to_completed(&mut store, appointment_id, &seeded);

    advance(
        &mut store,
        appointment_id,
        Command::ReportProblem {
            description: String::from("no-show"),
        },
        &ActorRef::new(seeded.client_id, Role::Client),
        None,
    );

    let appointment = store
        .get_appointment(appointment_id)
        .expect("Appointment should exist");
    assert_eq!(appointment.status, AppointmentStatus::IssueReported);
    assert_eq!(appointment.payment_status, PaymentStatus::Frozen);
    assert!(appointment.contested);
    assert_eq!(appointment.problem_description.as_deref(), Some("no-show"));

    // The problem report is stored as a public comment with its flag
    let comments = store
        .list_comments(appointment_id, false)
        .expect("Failed to list comments");
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].body, "no-show");
    assert_eq!(
        comments[0].kind,
        kairos_domain::CommentKind::ProblemReport
    );

    // The client can still close the dispute by validating
    let mut payments = FakePayments::new();
    advance(
        &mut store,
        appointment_id,
        Command::Validate { comment: None },
        &ActorRef::new(seeded.client_id, Role::Client),
        Some(&mut payments),
    );

    let resolved = store
        .get_appointment(appointment_id)
        .expect("Appointment should exist");
    assert_eq!(resolved.status, AppointmentStatus::Validated);
    assert_eq!(resolved.payment_status, PaymentStatus::Released);
}

#[test]
fn test_cancellation_commit_preserves_row() {
    let (mut store, seeded) = seeded_store();
    let appointment_id = book_appointment(&mut store, &seeded);

    advance(
        &mut store,
        appointment_id,
        Command::Cancel {
            reason: Some(String::from("travel conflict")),
            disposition: None,
        },
        &ActorRef::new(seeded.client_id, Role::Client),
        None,
    );

    // Cancellation is a terminal status, not a row deletion
    let appointment = store
        .get_appointment(appointment_id)
        .expect("Cancelled appointment must remain readable");
    assert_eq!(appointment.status, AppointmentStatus::Cancelled);

    let timeline = store
        .list_audit_events(appointment_id)
        .expect("Failed to list audit events");
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].event.action.name, "Cancel");
    assert_eq!(
        timeline[0].event.action.details.as_deref(),
        Some("Appointment APT-SEED01 cancelled: travel conflict")
    );
}
