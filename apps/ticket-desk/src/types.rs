//! Domain types for the ticket desk.
//!
//! A ticket desk is an append-only, ordered list of support tickets. Tickets
//! are numbered from 1 in creation order and always start out `Open`.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Sequential ticket identifier (first ticket is 1)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(u64);

impl TicketId {
    /// Creates a `TicketId` from its number
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the ticket number
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ticket lifecycle status
///
/// Only `Open` exists: tickets are never updated once created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    /// Newly submitted, awaiting attention
    #[default]
    Open,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
        }
    }
}

/// A support ticket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Sequential identifier
    pub id: TicketId,
    /// Short summary, as submitted
    pub subject: String,
    /// Full description, as submitted
    pub description: String,
    /// Current status
    pub status: TicketStatus,
}

impl Ticket {
    /// Creates a new open ticket
    #[must_use]
    pub const fn open(id: TicketId, subject: String, description: String) -> Self {
        Self {
            id,
            subject,
            description,
            status: TicketStatus::Open,
        }
    }
}

/// State of the ticket desk
///
/// Tickets are kept in creation order; ids are exactly `1..=count()`.
#[derive(Clone, Debug, Default)]
pub struct TicketState {
    /// All tickets, oldest first
    pub tickets: Vec<Ticket>,
}

impl TicketState {
    /// Creates an empty desk
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tickets: Vec::new(),
        }
    }

    /// Returns the number of tickets
    #[must_use]
    pub fn count(&self) -> usize {
        self.tickets.len()
    }

    /// Identifier the next created ticket will receive
    #[must_use]
    pub fn next_id(&self) -> TicketId {
        TicketId::new(self.tickets.len() as u64 + 1)
    }
}

/// Actions representing commands and events for the ticket desk
///
/// Every action carries the `request_id` of the command that started it,
/// so a caller waiting on the store can pick out its own outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TicketAction {
    // ========== Commands ==========
    /// Command: Submit a new ticket
    ///
    /// Fields are optional because the request body may omit them; the
    /// reducer rejects the command when either is missing.
    CreateTicket {
        /// Identifies this submission
        request_id: Uuid,
        /// Requested subject
        subject: Option<String>,
        /// Requested description
        description: Option<String>,
    },

    // ========== Events ==========
    /// Event: Ticket was created and appended
    TicketCreated {
        /// Submission this ticket came from
        request_id: Uuid,
        /// The stored ticket
        ticket: Ticket,
    },

    /// Event: Submission was rejected; nothing was stored
    TicketRejected {
        /// Submission that was rejected
        request_id: Uuid,
        /// Why it was rejected
        reason: String,
    },
}

impl TicketAction {
    /// The submission this action belongs to
    #[must_use]
    pub const fn request_id(&self) -> Uuid {
        match self {
            Self::CreateTicket { request_id, .. }
            | Self::TicketCreated { request_id, .. }
            | Self::TicketRejected { request_id, .. } => *request_id,
        }
    }

    /// Whether this is the terminal outcome (created or rejected) of `request_id`
    #[must_use]
    pub fn is_outcome_of(&self, request_id: Uuid) -> bool {
        matches!(
            self,
            Self::TicketCreated { .. } | Self::TicketRejected { .. }
        ) && self.request_id() == request_id
    }
}
