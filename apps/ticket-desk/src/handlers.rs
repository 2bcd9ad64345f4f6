//! HTTP handlers for the ticket desk API.
//!
//! Creates go through the store with `send_and_wait_for()`; the list takes a
//! snapshot of state.

use crate::types::{Ticket, TicketAction};
use crate::TicketStore;
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use desk_runtime::StoreError;
use desk_web::{AppError, CorrelationId, JsonBody};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Shared state for ticket handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ticket store
    pub store: Arc<TicketStore>,
    /// How long a submission waits for its outcome
    pub reply_timeout: Duration,
}

impl AppState {
    /// Creates handler state around an existing store.
    #[must_use]
    pub const fn new(store: Arc<TicketStore>, reply_timeout: Duration) -> Self {
        Self {
            store,
            reply_timeout,
        }
    }
}

/// Request to submit a ticket.
///
/// Both fields are optional at the wire level so that a missing field is
/// reported by validation as a 400 rather than by the JSON layer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateTicketRequest {
    /// Short summary.
    pub subject: Option<String>,

    /// Full description.
    pub description: Option<String>,
}

/// Response listing every ticket.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListTicketsResponse {
    /// Tickets in creation order.
    pub tickets: Vec<Ticket>,
}

/// List all tickets.
///
/// # Endpoint
///
/// ```text
/// GET /tickets
/// ```
///
/// # Response
///
/// ```json
/// {
///   "tickets": [
///     { "id": 1, "subject": "Broken pump", "description": "Pump #4 stopped", "status": "Open" }
///   ]
/// }
/// ```
pub async fn list_tickets(State(state): State<AppState>) -> Json<ListTicketsResponse> {
    let tickets = state.store.state(|s| s.tickets.clone()).await;
    tracing::debug!(count = tickets.len(), "Listing tickets");
    Json(ListTicketsResponse { tickets })
}

/// Submit a new ticket.
///
/// # Endpoint
///
/// ```text
/// POST /tickets
/// Content-Type: application/json
///
/// { "subject": "Broken pump", "description": "Pump #4 stopped" }
/// ```
///
/// # Response
///
/// `201 Created`:
///
/// ```json
/// { "id": 1, "subject": "Broken pump", "description": "Pump #4 stopped", "status": "Open" }
/// ```
///
/// `400 Bad Request` when the body is not a JSON object or a field is missing
/// or not a string.
pub async fn create_ticket(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    JsonBody(request): JsonBody<CreateTicketRequest>,
) -> Result<(StatusCode, Json<Ticket>), AppError> {
    // Fresh per submission: clients may reuse a correlation ID across requests
    let request_id = Uuid::new_v4();

    tracing::info!(
        correlation_id = %correlation_id.0,
        %request_id,
        "Submitting ticket"
    );

    let action = TicketAction::CreateTicket {
        request_id,
        subject: request.subject,
        description: request.description,
    };

    let result = state
        .store
        .send_and_wait_for(
            action,
            move |a| a.is_outcome_of(request_id),
            state.reply_timeout,
        )
        .await
        .map_err(store_error)?;

    match result {
        TicketAction::TicketCreated { ticket, .. } => {
            metrics::counter!("tickets.created.total").increment(1);
            Ok((StatusCode::CREATED, Json(ticket)))
        },
        TicketAction::TicketRejected { reason, .. } => {
            metrics::counter!("tickets.rejected.total").increment(1);
            Err(AppError::bad_request(reason))
        },
        TicketAction::CreateTicket { .. } => Err(AppError::internal("Unexpected action received")),
    }
}

fn store_error(err: StoreError) -> AppError {
    match err {
        StoreError::Timeout => AppError::timeout("Ticket submission timed out"),
        StoreError::ChannelClosed => AppError::unavailable("Ticket store dropped the reply"),
    }
}
