//! # Desk Runtime
//!
//! Runtime implementation for Ticket Desk.
//!
//! This crate provides the [`Store`] that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, runs the reducer under a write lock, executes effects
//! - **Reply waiters**: Callers of [`Store::send_and_wait_for`] register a
//!   predicate before their command is sent; every action produced by an
//!   effect is handed to each matching waiter over its own `oneshot`, then
//!   fed back into the reducer
//!
//! ## Example
//!
//! ```ignore
//! use desk_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use desk_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex, RwLock};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Reply channel closed
        ///
        /// The waiter was dropped without a reply, so no matching action
        /// can ever arrive.
        #[error("Reply channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// A caller blocked in `send_and_wait_for`
struct Waiter<A> {
    matches: Box<dyn Fn(&A) -> bool + Send + Sync>,
    reply: oneshot::Sender<A>,
}

/// The Store - runtime coordinator for a reducer
///
/// The Store manages:
/// 1. State (behind `RwLock` for concurrent access)
/// 2. Reducer (business logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with feedback loop)
///
/// Cloning a `Store` yields another handle to the same state. Two stores
/// built with [`Store::new`] never share anything.
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    /// Pending `send_and_wait_for` callers, each with a private reply slot.
    waiters: Arc<Mutex<Vec<Waiter<A>>>>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + Sync + Clone + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            waiters: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Send an action to the store
    ///
    /// 1. Acquires write lock on state
    /// 2. Calls reducer with (state, action, environment)
    /// 3. Releases the lock and executes returned effects
    ///
    /// Multiple concurrent `send()` calls serialize at the reducer. Effects
    /// run in spawned tasks, so `send()` returns before they complete.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A)
    where
        R: Clone,
        E: Clone,
    {
        tracing::debug!("Processing action");
        metrics::counter!("store.commands.total").increment(1);

        let effects = {
            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            let effects = self.reducer.reduce(&mut *state, action, &self.environment);
            tracing::trace!("Reducer completed, returned {} effects", effects.len());
            effects
        };

        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Send an action and wait for a matching result action
    ///
    /// Designed for request-response patterns (HTTP): registers `predicate`
    /// BEFORE sending, then returns the first action produced by an effect
    /// that the predicate accepts. Each waiter has its own reply slot, so
    /// a burst of concurrent callers never loses a reply.
    ///
    /// Only actions produced by effects are observed, never the initial
    /// action itself. Concurrent callers should tag their commands (for
    /// example with a request ID) and match on the tag.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: no matching action arrived within `timeout`
    /// - [`StoreError::ChannelClosed`]: the waiter was dropped without a reply
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        R: Clone,
        E: Clone,
        F: Fn(&A) -> bool + Send + Sync + 'static,
    {
        let (reply, rx) = oneshot::channel();

        // Register BEFORE sending to avoid race condition
        self.waiters.lock().await.push(Waiter {
            matches: Box::new(predicate),
            reply,
        });

        self.send(action).await;

        // A timed-out waiter is pruned at the next delivery (its receiver is gone)
        tokio::time::timeout(timeout, rx)
            .await
            .map_err(|_| StoreError::Timeout)?
            .map_err(|_| StoreError::ChannelClosed)
    }

    /// Read current state via a closure
    ///
    /// Access state through a closure to ensure the lock is released promptly:
    ///
    /// ```ignore
    /// let ticket_count = store.state(|s| s.tickets.len()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&*state)
    }

    /// Hand `action` to every waiter that accepts it
    async fn notify_waiters(&self, action: &A) {
        let mut waiters = self.waiters.lock().await;
        let mut i = 0;
        while i < waiters.len() {
            if waiters[i].reply.is_closed() {
                waiters.swap_remove(i);
            } else if (waiters[i].matches)(action) {
                let waiter = waiters.swap_remove(i);
                // Receiver may have timed out since the check above
                let _ = waiter.reply.send(action.clone());
            } else {
                i += 1;
            }
        }
    }

    fn execute_effect(&self, effect: Effect<A>)
    where
        R: Clone,
        E: Clone,
    {
        match effect {
            Effect::None => {
                tracing::trace!("Executing Effect::None (no-op)");
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
            },
            Effect::Parallel(effects) => {
                tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                for effect in effects {
                    self.execute_effect(effect);
                }
            },
            Effect::Future(fut) => {
                tracing::trace!("Executing Effect::Future");
                metrics::counter!("store.effects.executed", "type" => "future").increment(1);

                let store = self.clone();
                tokio::spawn(async move {
                    if let Some(action) = fut.await {
                        store.notify_waiters(&action).await;
                        store.send(action).await;
                    }
                });
            },
        }
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            waiters: Arc::clone(&self.waiters),
        }
    }
}
