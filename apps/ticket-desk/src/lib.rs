//! Ticket desk: a support-ticket intake service.
//!
//! Tickets are submitted and listed over HTTP. State lives in memory for
//! the life of the process; nothing is persisted.
//!
//! # Architecture
//!
//! - [`types`]: tickets, desk state, and the actions that change it
//! - [`reducer`]: validation and id assignment (pure)
//! - [`handlers`] and [`router`]: the HTTP surface
//! - [`config`]: environment-driven settings
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ticket_desk::{handlers::AppState, new_store, router::ticket_router};
//!
//! let state = AppState::new(Arc::new(new_store()), config.reply_timeout());
//! axum::serve(listener, ticket_router(state)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod handlers;
pub mod reducer;
pub mod router;
pub mod types;

pub use config::Config;
pub use reducer::TicketReducer;
pub use types::{Ticket, TicketAction, TicketId, TicketState, TicketStatus};

use desk_runtime::Store;

/// Store type for the ticket desk
pub type TicketStore = Store<TicketState, TicketAction, (), TicketReducer>;

/// Creates an empty ticket store
#[must_use]
pub fn new_store() -> TicketStore {
    Store::new(TicketState::new(), TicketReducer::new(), ())
}
