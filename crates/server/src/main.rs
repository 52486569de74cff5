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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::info;

use kairos_api::{
    ApiError, AppointmentRecord, AppointmentResponse, AuditTimelineResponse, AuthenticatedActor,
    BookAppointmentRequest, BookAppointmentResponse, CancelRequest, CommentListResponse,
    ReportProblemRequest, ResolveDisputeRequest, TransitionPorts, ValidateRequest,
    book_appointment, cancel, confirm_payment, delete_comment, get_appointment_record,
    get_audit_timeline, list_comments, mark_completed, report_problem, resolve_dispute, validate,
};
use kairos_audit::Cause;
use kairos_domain::Role;
use kairos_persistence::SqliteStore;

mod live;
mod notify;

use live::{LiveEvent, LiveEventBroadcaster, live_events_handler};
use notify::{BroadcastNotifier, LoggingPaymentGateway};

/// Kairos Server - HTTP server for the Kairos booking platform
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// The store is wrapped in a Mutex so transition requests on the shared
/// connection are serialized; the broadcaster feeds staff dashboards.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for appointments, comments, and audit events.
    store: Arc<Mutex<SqliteStore>>,
    /// The live event broadcaster for staff dashboards.
    broadcaster: Arc<LiveEventBroadcaster>,
}

impl axum::extract::FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.broadcaster)
    }
}

/// API request for a transition that carries no extra fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct TransitionApiRequest {
    /// The actor ID performing this action.
    actor_id: i64,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
}

/// API request for validating a completed session.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ValidateApiRequest {
    /// The actor ID performing this action.
    actor_id: i64,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// Optional free-text comment, stored as a public comment.
    comment: Option<String>,
}

/// API request for contesting a completed session.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ReportProblemApiRequest {
    /// The actor ID performing this action.
    actor_id: i64,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// What went wrong. Must be non-empty.
    description: String,
}

/// API request for cancelling an undelivered appointment.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CancelApiRequest {
    /// The actor ID performing this action.
    actor_id: i64,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// Optional free-text cancellation reason.
    reason: Option<String>,
    /// Disposition of a captured payment (`refund` | `retain`). Staff only.
    disposition: Option<String>,
}

/// API request for resolving an open dispute.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ResolveDisputeApiRequest {
    /// The actor ID performing this action.
    actor_id: i64,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The chosen outcome (`validated` | `cancelled`).
    outcome: String,
    /// Disposition of the frozen payment when cancelling.
    disposition: Option<String>,
}

/// API request for booking a new appointment.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct BookAppointmentApiRequest {
    /// The actor ID performing this action.
    actor_id: i64,
    /// The role of the actor.
    actor_role: String,
    /// The paying client.
    client_id: i64,
    /// The practitioner to book.
    practitioner_id: i64,
    /// The person actually served, when distinct from the client.
    beneficiary_id: Option<i64>,
    /// The service to book.
    service_id: i64,
    /// Practitioner-specific override price in cents, if any.
    custom_price_cents: Option<i64>,
    /// Scheduled session start (ISO 8601).
    start_time: String,
    /// Scheduled session end (ISO 8601).
    end_time: String,
    /// Free-text notes.
    notes: Option<String>,
    /// Video meeting link for remote sessions.
    meeting_link: Option<String>,
}

/// API request for deleting a comment.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct DeleteCommentApiRequest {
    /// The actor ID performing this action.
    actor_id: i64,
    /// The role of the actor.
    actor_role: String,
}

/// Query parameters identifying the requesting actor on read endpoints.
#[derive(Debug, Deserialize)]
struct ActorQuery {
    /// The actor ID performing this read.
    actor_id: i64,
    /// The role of the actor.
    actor_role: String,
}

/// API response for delete operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DeletedResponse {
    /// Success indicator.
    success: bool,
    /// A success message.
    message: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::PreconditionFailed { .. } => StatusCode::CONFLICT,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::PaymentReleaseFailed { .. } => StatusCode::BAD_GATEWAY,
            ApiError::TransientStore { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Builds the authenticated actor from request fields.
///
/// Authentication mechanics are out of scope; requests carry an
/// already-authenticated identity, which is validated for shape only.
fn parse_actor(actor_id: i64, actor_role: &str) -> Result<AuthenticatedActor, HttpError> {
    let role: Role = Role::from_str(actor_role).map_err(|e| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: e.to_string(),
    })?;
    Ok(AuthenticatedActor::new(actor_id, role))
}

/// Handler for POST `/appointments` endpoint.
///
/// Books a new appointment in `pending` status.
async fn handle_book_appointment(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BookAppointmentApiRequest>,
) -> Result<Json<BookAppointmentResponse>, HttpError> {
    info!(
        actor_id = req.actor_id,
        role = %req.actor_role,
        client_id = req.client_id,
        practitioner_id = req.practitioner_id,
        "Handling book_appointment request"
    );

    let actor: AuthenticatedActor = parse_actor(req.actor_id, &req.actor_role)?;
    let request: BookAppointmentRequest = BookAppointmentRequest {
        client_id: req.client_id,
        practitioner_id: req.practitioner_id,
        beneficiary_id: req.beneficiary_id,
        service_id: req.service_id,
        custom_price_cents: req.custom_price_cents,
        start_time: req.start_time,
        end_time: req.end_time,
        notes: req.notes,
        meeting_link: req.meeting_link,
    };

    let mut store = app_state.store.lock().await;
    let response: BookAppointmentResponse =
        book_appointment(&mut store, request, &actor, OffsetDateTime::now_utc())?;
    drop(store);

    app_state.broadcaster.broadcast(&LiveEvent::AppointmentBooked {
        appointment_id: response.appointment_id,
        reference_code: response.reference_code.clone(),
    });

    info!(
        appointment_id = response.appointment_id,
        reference_code = %response.reference_code,
        "Successfully booked appointment"
    );
    Ok(Json(response))
}

/// Handler for POST `/appointments/{id}/confirm_payment` endpoint.
///
/// Records an upstream payment capture, confirming the booking.
async fn handle_confirm_payment(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
    Json(req): Json<TransitionApiRequest>,
) -> Result<Json<AppointmentResponse>, HttpError> {
    info!(
        actor_id = req.actor_id,
        role = %req.actor_role,
        appointment_id,
        "Handling confirm_payment request"
    );

    let actor: AuthenticatedActor = parse_actor(req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let notifier: BroadcastNotifier = BroadcastNotifier::new(Arc::clone(&app_state.broadcaster));
    let mut payments: LoggingPaymentGateway = LoggingPaymentGateway;

    let mut store = app_state.store.lock().await;
    let response: AppointmentResponse = confirm_payment(
        &mut store,
        appointment_id,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
        TransitionPorts {
            payments: &mut payments,
            notifier: &notifier,
        },
    )?;
    drop(store);

    info!(
        appointment_id,
        event_id = response.event_id,
        "Payment confirmed"
    );
    Ok(Json(response))
}

/// Handler for POST `/appointments/{id}/complete` endpoint.
///
/// The practitioner reports the session as delivered.
async fn handle_mark_completed(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
    Json(req): Json<TransitionApiRequest>,
) -> Result<Json<AppointmentResponse>, HttpError> {
    info!(
        actor_id = req.actor_id,
        role = %req.actor_role,
        appointment_id,
        "Handling mark_completed request"
    );

    let actor: AuthenticatedActor = parse_actor(req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let notifier: BroadcastNotifier = BroadcastNotifier::new(Arc::clone(&app_state.broadcaster));
    let mut payments: LoggingPaymentGateway = LoggingPaymentGateway;

    let mut store = app_state.store.lock().await;
    let response: AppointmentResponse = mark_completed(
        &mut store,
        appointment_id,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
        TransitionPorts {
            payments: &mut payments,
            notifier: &notifier,
        },
    )?;
    drop(store);

    info!(
        appointment_id,
        event_id = response.event_id,
        "Appointment marked as completed"
    );
    Ok(Json(response))
}

/// Handler for POST `/appointments/{id}/validate` endpoint.
///
/// The client (or staff) confirms delivery, releasing payment.
async fn handle_validate(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
    Json(req): Json<ValidateApiRequest>,
) -> Result<Json<AppointmentResponse>, HttpError> {
    info!(
        actor_id = req.actor_id,
        role = %req.actor_role,
        appointment_id,
        "Handling validate request"
    );

    let actor: AuthenticatedActor = parse_actor(req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let notifier: BroadcastNotifier = BroadcastNotifier::new(Arc::clone(&app_state.broadcaster));
    let mut payments: LoggingPaymentGateway = LoggingPaymentGateway;

    let mut store = app_state.store.lock().await;
    let response: AppointmentResponse = validate(
        &mut store,
        appointment_id,
        ValidateRequest {
            comment: req.comment,
        },
        &actor,
        cause,
        OffsetDateTime::now_utc(),
        TransitionPorts {
            payments: &mut payments,
            notifier: &notifier,
        },
    )?;
    drop(store);

    info!(
        appointment_id,
        event_id = response.event_id,
        "Appointment validated, payment released"
    );
    Ok(Json(response))
}

/// Handler for POST `/appointments/{id}/report_problem` endpoint.
///
/// The client contests a session reported as delivered.
async fn handle_report_problem(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
    Json(req): Json<ReportProblemApiRequest>,
) -> Result<Json<AppointmentResponse>, HttpError> {
    info!(
        actor_id = req.actor_id,
        role = %req.actor_role,
        appointment_id,
        "Handling report_problem request"
    );

    let actor: AuthenticatedActor = parse_actor(req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let notifier: BroadcastNotifier = BroadcastNotifier::new(Arc::clone(&app_state.broadcaster));
    let mut payments: LoggingPaymentGateway = LoggingPaymentGateway;

    let mut store = app_state.store.lock().await;
    let response: AppointmentResponse = report_problem(
        &mut store,
        appointment_id,
        ReportProblemRequest {
            description: req.description,
        },
        &actor,
        cause,
        OffsetDateTime::now_utc(),
        TransitionPorts {
            payments: &mut payments,
            notifier: &notifier,
        },
    )?;
    drop(store);

    info!(
        appointment_id,
        event_id = response.event_id,
        "Problem reported, payment frozen"
    );
    Ok(Json(response))
}

/// Handler for POST `/appointments/{id}/cancel` endpoint.
///
/// Cancels an undelivered appointment.
async fn handle_cancel(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
    Json(req): Json<CancelApiRequest>,
) -> Result<Json<AppointmentResponse>, HttpError> {
    info!(
        actor_id = req.actor_id,
        role = %req.actor_role,
        appointment_id,
        "Handling cancel request"
    );

    let actor: AuthenticatedActor = parse_actor(req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let notifier: BroadcastNotifier = BroadcastNotifier::new(Arc::clone(&app_state.broadcaster));
    let mut payments: LoggingPaymentGateway = LoggingPaymentGateway;

    let mut store = app_state.store.lock().await;
    let response: AppointmentResponse = cancel(
        &mut store,
        appointment_id,
        CancelRequest {
            reason: req.reason,
            disposition: req.disposition,
        },
        &actor,
        cause,
        OffsetDateTime::now_utc(),
        TransitionPorts {
            payments: &mut payments,
            notifier: &notifier,
        },
    )?;
    drop(store);

    info!(
        appointment_id,
        event_id = response.event_id,
        "Appointment cancelled"
    );
    Ok(Json(response))
}

/// Handler for POST `/appointments/{id}/resolve_dispute` endpoint.
///
/// Staff closes an open dispute with an admin-determined outcome.
async fn handle_resolve_dispute(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
    Json(req): Json<ResolveDisputeApiRequest>,
) -> Result<Json<AppointmentResponse>, HttpError> {
    info!(
        actor_id = req.actor_id,
        role = %req.actor_role,
        appointment_id,
        outcome = %req.outcome,
        "Handling resolve_dispute request"
    );

    let actor: AuthenticatedActor = parse_actor(req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let notifier: BroadcastNotifier = BroadcastNotifier::new(Arc::clone(&app_state.broadcaster));
    let mut payments: LoggingPaymentGateway = LoggingPaymentGateway;

    let mut store = app_state.store.lock().await;
    let response: AppointmentResponse = resolve_dispute(
        &mut store,
        appointment_id,
        ResolveDisputeRequest {
            outcome: req.outcome,
            disposition: req.disposition,
        },
        &actor,
        cause,
        OffsetDateTime::now_utc(),
        TransitionPorts {
            payments: &mut payments,
            notifier: &notifier,
        },
    )?;
    drop(store);

    info!(
        appointment_id,
        event_id = response.event_id,
        "Dispute resolved"
    );
    Ok(Json(response))
}

/// Handler for GET `/appointments/{id}` endpoint.
///
/// Returns the joined appointment record for a requesting actor.
async fn handle_get_appointment(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<AppointmentRecord>, HttpError> {
    let actor: AuthenticatedActor = parse_actor(query.actor_id, &query.actor_role)?;

    let mut store = app_state.store.lock().await;
    let record: AppointmentRecord = get_appointment_record(&mut store, appointment_id, &actor)?;
    drop(store);

    Ok(Json(record))
}

/// Handler for GET `/appointments/{id}/comments` endpoint.
///
/// Lists the appointment's comments, redacting staff-only entries for
/// non-staff actors.
async fn handle_list_comments(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<CommentListResponse>, HttpError> {
    let actor: AuthenticatedActor = parse_actor(query.actor_id, &query.actor_role)?;

    let mut store = app_state.store.lock().await;
    let response: CommentListResponse = list_comments(&mut store, appointment_id, &actor)?;
    drop(store);

    Ok(Json(response))
}

/// Handler for GET `/appointments/{id}/audit` endpoint.
///
/// Lists the appointment's audit timeline in commit order.
async fn handle_get_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
    Path(appointment_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<AuditTimelineResponse>, HttpError> {
    let actor: AuthenticatedActor = parse_actor(query.actor_id, &query.actor_role)?;

    let mut store = app_state.store.lock().await;
    let response: AuditTimelineResponse = get_audit_timeline(&mut store, appointment_id, &actor)?;
    drop(store);

    Ok(Json(response))
}

/// Handler for DELETE `/comments/{id}` endpoint.
///
/// Removes a comment. Staff only.
async fn handle_delete_comment(
    AxumState(app_state): AxumState<AppState>,
    Path(comment_id): Path<i64>,
    Json(req): Json<DeleteCommentApiRequest>,
) -> Result<Json<DeletedResponse>, HttpError> {
    info!(
        actor_id = req.actor_id,
        role = %req.actor_role,
        comment_id,
        "Handling delete_comment request"
    );

    let actor: AuthenticatedActor = parse_actor(req.actor_id, &req.actor_role)?;

    let mut store = app_state.store.lock().await;
    delete_comment(&mut store, comment_id, &actor)?;
    drop(store);

    Ok(Json(DeletedResponse {
        success: true,
        message: format!("Deleted comment {comment_id}"),
    }))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/appointments", post(handle_book_appointment))
        .route(
            "/appointments/{id}/confirm_payment",
            post(handle_confirm_payment),
        )
        .route("/appointments/{id}/complete", post(handle_mark_completed))
        .route("/appointments/{id}/validate", post(handle_validate))
        .route(
            "/appointments/{id}/report_problem",
            post(handle_report_problem),
        )
        .route("/appointments/{id}/cancel", post(handle_cancel))
        .route(
            "/appointments/{id}/resolve_dispute",
            post(handle_resolve_dispute),
        )
        .route("/appointments/{id}", get(handle_get_appointment))
        .route("/appointments/{id}/comments", get(handle_list_comments))
        .route("/appointments/{id}/audit", get(handle_get_audit_timeline))
        .route("/comments/{id}", delete(handle_delete_comment))
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Kairos Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let store: SqliteStore = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqliteStore::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqliteStore::new_in_memory()?
    };

    let app_state: AppState = AppState {
        store: Arc::new(Mutex::new(store)),
        broadcaster: Arc::new(LiveEventBroadcaster::new()),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use time::Duration;
    use time::format_description::well_known::Iso8601;
    use tower::ServiceExt;

    /// Seeded party and service identifiers.
    struct SeededIds {
        client_id: i64,
        practitioner_id: i64,
        service_id: i64,
    }

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let store: SqliteStore =
            SqliteStore::new_in_memory().expect("Failed to create in-memory store");
        AppState {
            store: Arc::new(Mutex::new(store)),
            broadcaster: Arc::new(LiveEventBroadcaster::new()),
        }
    }

    /// Seeds one client, practitioner, and priced service.
    async fn seed(app_state: &AppState) -> SeededIds {
        let mut store = app_state.store.lock().await;
        let client_id = store
            .create_client("Maya Laurent", "maya@example.com")
            .expect("Failed to create client");
        let practitioner_id = store
            .create_practitioner("Iris Beaumont", "iris@example.com")
            .expect("Failed to create practitioner");
        let service_id = store
            .create_service("Birth chart reading", Some(15000))
            .expect("Failed to create service");
        SeededIds {
            client_id,
            practitioner_id,
            service_id,
        }
    }

    fn iso(value: OffsetDateTime) -> String {
        value.format(&Iso8601::DEFAULT).expect("formattable timestamp")
    }

    /// A booking request scheduled safely in the past, so completion is
    /// immediately legal.
    fn booking_body(ids: &SeededIds) -> BookAppointmentApiRequest {
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        BookAppointmentApiRequest {
            actor_id: ids.client_id,
            actor_role: String::from("client"),
            client_id: ids.client_id,
            practitioner_id: ids.practitioner_id,
            beneficiary_id: None,
            service_id: ids.service_id,
            custom_price_cents: None,
            start_time: iso(now - Duration::hours(2)),
            end_time: iso(now - Duration::hours(1)),
            notes: None,
            meeting_link: None,
        }
    }

    fn transition_body(actor_id: i64, actor_role: &str) -> TransitionApiRequest {
        TransitionApiRequest {
            actor_id,
            actor_role: actor_role.to_string(),
            cause_id: String::from("test-cause"),
            cause_description: String::from("Test request"),
        }
    }

    async fn post_json<T: Serialize>(app: &Router, uri: &str, body: &T) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn get_json(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_of<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Books an appointment over HTTP and returns its ID.
    async fn book_over_http(app: &Router, ids: &SeededIds) -> i64 {
        let response = post_json(app, "/appointments", &booking_body(ids)).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let booked: BookAppointmentResponse = body_of(response).await;
        assert!(booked.reference_code.starts_with("APT-"));
        booked.appointment_id
    }

    /// Walks a booked appointment to `completed` over HTTP.
    async fn advance_to_completed_http(app: &Router, ids: &SeededIds, appointment_id: i64) {
        let response = post_json(
            app,
            &format!("/appointments/{appointment_id}/confirm_payment"),
            &transition_body(1, "admin"),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = post_json(
            app,
            &format!("/appointments/{appointment_id}/complete"),
            &transition_body(ids.practitioner_id, "practitioner"),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
    }

    #[tokio::test]
    async fn test_full_lifecycle_over_http() {
        let app_state: AppState = create_test_app_state();
        let ids: SeededIds = seed(&app_state).await;
        let app: Router = build_router(app_state);

        let appointment_id: i64 = book_over_http(&app, &ids).await;
        advance_to_completed_http(&app, &ids, appointment_id).await;

        let response = post_json(
            &app,
            &format!("/appointments/{appointment_id}/validate"),
            &ValidateApiRequest {
                actor_id: ids.client_id,
                actor_role: String::from("client"),
                cause_id: String::from("test-cause"),
                cause_description: String::from("Test request"),
                comment: Some(String::from("Wonderful session")),
            },
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let validated: AppointmentResponse = body_of(response).await;
        assert_eq!(validated.status, "validated");
        assert_eq!(validated.payment_status, "released");
        assert!(validated.event_id > 0);

        // The canonical record agrees
        let response = get_json(
            &app,
            &format!(
                "/appointments/{appointment_id}?actor_id={}&actor_role=client",
                ids.client_id
            ),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let record: AppointmentRecord = body_of(response).await;
        assert_eq!(record.status, "validated");
        assert_eq!(record.payment_status, "released");
        assert_eq!(record.price_display, "150.00");

        // And the audit timeline holds one event per transition
        let response = get_json(
            &app,
            &format!(
                "/appointments/{appointment_id}/audit?actor_id={}&actor_role=client",
                ids.client_id
            ),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let timeline: AuditTimelineResponse = body_of(response).await;
        assert_eq!(timeline.events.len(), 3);
    }

    #[tokio::test]
    async fn test_mark_completed_on_pending_returns_conflict() {
        let app_state: AppState = create_test_app_state();
        let ids: SeededIds = seed(&app_state).await;
        let app: Router = build_router(app_state);

        let appointment_id: i64 = book_over_http(&app, &ids).await;

        let response = post_json(
            &app,
            &format!("/appointments/{appointment_id}/complete"),
            &transition_body(ids.practitioner_id, "practitioner"),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_foreign_client_validate_returns_forbidden() {
        let app_state: AppState = create_test_app_state();
        let ids: SeededIds = seed(&app_state).await;
        let app: Router = build_router(app_state);

        let appointment_id: i64 = book_over_http(&app, &ids).await;
        advance_to_completed_http(&app, &ids, appointment_id).await;

        let response = post_json(
            &app,
            &format!("/appointments/{appointment_id}/validate"),
            &ValidateApiRequest {
                actor_id: 999,
                actor_role: String::from("client"),
                cause_id: String::from("test-cause"),
                cause_description: String::from("Test request"),
                comment: None,
            },
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_contestation_flow_over_http() {
        let app_state: AppState = create_test_app_state();
        let ids: SeededIds = seed(&app_state).await;
        let app: Router = build_router(app_state);

        let appointment_id: i64 = book_over_http(&app, &ids).await;
        advance_to_completed_http(&app, &ids, appointment_id).await;

        let response = post_json(
            &app,
            &format!("/appointments/{appointment_id}/report_problem"),
            &ReportProblemApiRequest {
                actor_id: ids.client_id,
                actor_role: String::from("client"),
                cause_id: String::from("test-cause"),
                cause_description: String::from("Test request"),
                description: String::from("no-show"),
            },
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let contested: AppointmentResponse = body_of(response).await;
        assert_eq!(contested.status, "issue_reported");
        assert_eq!(contested.payment_status, "frozen");

        // Staff resolves in the client's favor
        let response = post_json(
            &app,
            &format!("/appointments/{appointment_id}/resolve_dispute"),
            &ResolveDisputeApiRequest {
                actor_id: 1,
                actor_role: String::from("admin"),
                cause_id: String::from("test-cause"),
                cause_description: String::from("Test request"),
                outcome: String::from("cancelled"),
                disposition: Some(String::from("refund")),
            },
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let resolved: AppointmentResponse = body_of(response).await;
        assert_eq!(resolved.status, "cancelled");
        assert_eq!(resolved.payment_status, "refunded");
    }

    #[tokio::test]
    async fn test_empty_problem_description_returns_bad_request() {
        let app_state: AppState = create_test_app_state();
        let ids: SeededIds = seed(&app_state).await;
        let app: Router = build_router(app_state);

        let appointment_id: i64 = book_over_http(&app, &ids).await;
        advance_to_completed_http(&app, &ids, appointment_id).await;

        let response = post_json(
            &app,
            &format!("/appointments/{appointment_id}/report_problem"),
            &ReportProblemApiRequest {
                actor_id: ids.client_id,
                actor_role: String::from("client"),
                cause_id: String::from("test-cause"),
                cause_description: String::from("Test request"),
                description: String::from("   "),
            },
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_role_returns_bad_request() {
        let app_state: AppState = create_test_app_state();
        let ids: SeededIds = seed(&app_state).await;
        let app: Router = build_router(app_state);

        let appointment_id: i64 = book_over_http(&app, &ids).await;

        let response = post_json(
            &app,
            &format!("/appointments/{appointment_id}/confirm_payment"),
            &transition_body(1, "operator"),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_appointment_returns_not_found() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = post_json(
            &app,
            "/appointments/999/confirm_payment",
            &transition_body(1, "admin"),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_record_read_requires_a_party() {
        let app_state: AppState = create_test_app_state();
        let ids: SeededIds = seed(&app_state).await;
        let app: Router = build_router(app_state);

        let appointment_id: i64 = book_over_http(&app, &ids).await;

        let response = get_json(
            &app,
            &format!("/appointments/{appointment_id}?actor_id=999&actor_role=client"),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_cancel_is_terminal() {
        let app_state: AppState = create_test_app_state();
        let ids: SeededIds = seed(&app_state).await;
        let app: Router = build_router(app_state);

        let appointment_id: i64 = book_over_http(&app, &ids).await;

        let response = post_json(
            &app,
            &format!("/appointments/{appointment_id}/cancel"),
            &CancelApiRequest {
                actor_id: ids.client_id,
                actor_role: String::from("client"),
                cause_id: String::from("test-cause"),
                cause_description: String::from("Test request"),
                reason: Some(String::from("travel conflict")),
                disposition: None,
            },
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let cancelled: AppointmentResponse = body_of(response).await;
        assert_eq!(cancelled.status, "cancelled");

        // A second cancellation finds a terminal status
        let response = post_json(
            &app,
            &format!("/appointments/{appointment_id}/cancel"),
            &CancelApiRequest {
                actor_id: ids.client_id,
                actor_role: String::from("client"),
                cause_id: String::from("test-cause"),
                cause_description: String::from("Test request"),
                reason: None,
                disposition: None,
            },
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::CONFLICT);
    }
}
