// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::diesel_schema::{
    appointments, audit_events, beneficiaries, clients, comments, practitioners, services,
};
use diesel::prelude::*;

/// Diesel Queryable struct for appointment rows.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = appointments)]
pub struct AppointmentRow {
    pub appointment_id: i64,
    pub reference_code: String,
    pub client_id: i64,
    pub practitioner_id: i64,
    pub beneficiary_id: Option<i64>,
    pub service_id: i64,
    pub list_price_cents: Option<i64>,
    pub custom_price_cents: Option<i64>,
    pub status: String,
    pub payment_status: String,
    pub start_time: String,
    pub end_time: String,
    pub notes: Option<String>,
    pub meeting_link: Option<String>,
    pub problem_description: Option<String>,
    pub contested: i32,
    pub created_at: String,
    pub updated_at: String,
}

/// Diesel Insertable struct for new appointment rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = appointments)]
pub struct NewAppointment {
    pub reference_code: String,
    pub client_id: i64,
    pub practitioner_id: i64,
    pub beneficiary_id: Option<i64>,
    pub service_id: i64,
    pub list_price_cents: Option<i64>,
    pub custom_price_cents: Option<i64>,
    pub status: String,
    pub payment_status: String,
    pub start_time: String,
    pub end_time: String,
    pub notes: Option<String>,
    pub meeting_link: Option<String>,
    pub contested: i32,
    pub created_at: String,
    pub updated_at: String,
}

/// Diesel Queryable struct for client rows.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = clients)]
pub struct ClientRow {
    pub client_id: i64,
    pub full_name: String,
    pub email: String,
}

/// Diesel Queryable struct for practitioner rows.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = practitioners)]
pub struct PractitionerRow {
    pub practitioner_id: i64,
    pub full_name: String,
    pub email: String,
}

/// Diesel Queryable struct for service rows.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = services)]
pub struct ServiceRow {
    pub service_id: i64,
    pub name: String,
    pub list_price_cents: Option<i64>,
}

/// Diesel Queryable struct for beneficiary rows.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = beneficiaries)]
pub struct BeneficiaryRow {
    pub beneficiary_id: i64,
    pub client_id: i64,
    pub full_name: String,
    pub birth_date: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Diesel Queryable struct for comment rows.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
pub struct CommentRow {
    pub comment_id: i64,
    pub appointment_id: i64,
    pub author_id: i64,
    pub author_role: String,
    pub body: String,
    pub visibility: String,
    pub kind: String,
    pub created_at: String,
}

/// Diesel Insertable struct for new comment rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub struct NewComment {
    pub appointment_id: i64,
    pub author_id: i64,
    pub author_role: String,
    pub body: String,
    pub visibility: String,
    pub kind: String,
    pub created_at: String,
}

/// Diesel Queryable struct for audit event rows.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = audit_events)]
pub struct AuditEventRow {
    pub event_id: i64,
    pub appointment_id: i64,
    pub actor_id: String,
    pub actor_role: String,
    pub cause_id: String,
    pub cause_description: String,
    pub action_name: String,
    pub action_details: Option<String>,
    pub before_status: String,
    pub before_payment_status: String,
    pub after_status: String,
    pub after_payment_status: String,
    pub created_at: String,
}

/// Diesel Insertable struct for new audit event rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_events)]
pub struct NewAuditEvent {
    pub appointment_id: i64,
    pub actor_id: String,
    pub actor_role: String,
    pub cause_id: String,
    pub cause_description: String,
    pub action_name: String,
    pub action_details: Option<String>,
    pub before_status: String,
    pub before_payment_status: String,
    pub after_status: String,
    pub after_payment_status: String,
    pub created_at: String,
}
