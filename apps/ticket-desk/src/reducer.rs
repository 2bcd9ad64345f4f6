//! Ticket desk reducer.
//!
//! Validates submissions and appends tickets. Id assignment happens here,
//! under the store's write lock, so concurrent submissions can never share
//! an id or leave a gap.

use crate::types::{Ticket, TicketAction, TicketState};
use desk_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use uuid::Uuid;

/// Reducer for the ticket desk
#[derive(Clone, Debug, Default)]
pub struct TicketReducer;

impl TicketReducer {
    /// Creates a new `TicketReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Checks that both fields are present
    ///
    /// Present values are returned untouched, empty strings included.
    fn validate(
        subject: Option<String>,
        description: Option<String>,
    ) -> Result<(String, String), String> {
        let subject = required("subject", subject)?;
        let description = required("description", description)?;
        Ok((subject, description))
    }

    fn reject(request_id: Uuid, reason: String) -> SmallVec<[Effect<TicketAction>; 4]> {
        tracing::debug!(%request_id, %reason, "Ticket rejected");
        smallvec![Effect::emit(TicketAction::TicketRejected { request_id, reason })]
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, String> {
    value.ok_or_else(|| format!("'{field}' is required"))
}

impl Reducer for TicketReducer {
    type State = TicketState;
    type Action = TicketAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TicketAction::CreateTicket {
                request_id,
                subject,
                description,
            } => match Self::validate(subject, description) {
                Ok((subject, description)) => {
                    let ticket = Ticket::open(state.next_id(), subject, description);
                    state.tickets.push(ticket.clone());

                    tracing::info!(%request_id, ticket_id = %ticket.id, "Ticket created");

                    smallvec![Effect::emit(TicketAction::TicketCreated { request_id, ticket })]
                },
                Err(reason) => Self::reject(request_id, reason),
            },

            // Events are already reflected in state; they only notify waiters
            TicketAction::TicketCreated { .. } | TicketAction::TicketRejected { .. } => {
                SmallVec::new()
            },
        }
    }
}
