//! Axum web framework integration for Ticket Desk.
//!
//! The "imperative shell" around reducers: request parsing, response
//! serialization, error mapping, request tracing, and CORS.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Extract data** from request (JSON body, correlation ID)
//! 3. **Build Action** from extracted data
//! 4. **Dispatch** action through the `Store` and wait for its outcome
//! 5. **Map result** to HTTP response (or [`AppError`])
//!
//! # Example
//!
//! ```ignore
//! use desk_web::{AppError, CorrelationId, JsonBody};
//!
//! async fn create_ticket(
//!     State(store): State<TicketStore>,
//!     correlation_id: CorrelationId,
//!     JsonBody(request): JsonBody<CreateTicketRequest>,
//! ) -> Result<(StatusCode, Json<Ticket>), AppError> {
//!     let outcome = store
//!         .send_and_wait_for(request.into_action(correlation_id.0), is_outcome, timeout)
//!         .await
//!         .map_err(|_| AppError::timeout("Ticket creation timed out"))?;
//!     ...
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{CorrelationId, JsonBody};
pub use middleware::{correlation_id_layer, permissive_cors, CORRELATION_ID_HEADER};
