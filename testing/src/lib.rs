//! # Desk Testing
//!
//! Testing utilities and helpers for Ticket Desk reducers.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`assertions`]: Effect assertion helpers
//! - [`emitted_actions`]: Resolve effect descriptions into the actions they produce
//!
//! ## Example
//!
//! ```ignore
//! use desk_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(TicketReducer::new())
//!     .with_env(())
//!     .given_state(TicketState::new())
//!     .when_action(create_ticket("Broken pump", "Pump #4 stopped"))
//!     .then_state(|state| assert_eq!(state.count(), 1))
//!     .then_effects(|effects| assertions::assert_effects_count(effects, 1))
//!     .run();
//! ```


pub use reducer_test::{assertions, emitted_actions, ReducerTest};
