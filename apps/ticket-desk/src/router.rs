//! Ticket desk HTTP router.
//!
//! Composes the ticket handlers and the shared middleware stack.

use crate::handlers::{self, AppState};
use axum::{routing::get, Router};
use desk_web::{correlation_id_layer, handlers::health_check, permissive_cors};
use tower_http::trace::TraceLayer;

/// Create the ticket desk router.
///
/// # Routes
///
/// - `GET /tickets` - List all tickets
/// - `POST /tickets` - Submit a ticket
/// - `GET /health` - Liveness check
///
/// Unsupported methods on these paths get `405 Method Not Allowed`.
pub fn ticket_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/tickets",
            get(handlers::list_tickets).post(handlers::create_ticket),
        )
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .layer(permissive_cors())
        .with_state(state)
}
