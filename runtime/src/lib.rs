//! # Boxoffice Runtime
//!
//! The [`Store`] owns the booking session state and is its only writer.
//!
//! Every action goes through [`Store::send`]: the reducer runs under a single
//! write lock, then the returned effects are executed on the tokio runtime.
//! Actions produced by effects are fed back into the store, so a fetch
//! started by one screen lands in state the same way a click does.
//!
//! ## Example
//!
//! ```ignore
//! use boxoffice_runtime::Store;
//!
//! let store = Store::new(FlowState::default(), FlowReducer::new(), environment);
//!
//! let mut handle = store.send(FlowAction::Login { email, password }).await?;
//! handle.wait().await;
//!
//! let screen = store.state(|s| s.screen).await;
//! ```

use boxoffice_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, watch};

pub use error::StoreError;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send`]. Waiting on it resolves once every effect
/// started by the action has finished, including effects started by the
/// actions those effects fed back.
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };
        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Number of effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all tracked effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                // Every tracker is gone, so nothing can still be running.
                break;
            }
        }
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.pending())
            .finish_non_exhaustive()
    }
}

/// Effect tracking context carried through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

/// Decrements the effect counter on drop, even if the effect panicked
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Decrements the store-wide pending counter on drop
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The Store - runtime coordinator for a reducer
///
/// Holds:
/// 1. State behind one `RwLock` (the single serialized writer)
/// 2. Reducer
/// 3. Environment
/// 4. Effect execution with the action feedback loop
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: Arc<R>,
    environment: Arc<E>,
    shutdown: Arc<AtomicBool>,
    pending_effects: Arc<AtomicUsize>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: Arc::clone(&self.reducer),
            environment: Arc::clone(&self.environment),
            shutdown: Arc::clone(&self.shutdown),
            pending_effects: Arc::clone(&self.pending_effects),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer: Arc::new(reducer),
            environment: Arc::new(environment),
            shutdown: Arc::new(AtomicBool::new(false)),
            pending_effects: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Send an action to the store
    ///
    /// Runs the reducer under the write lock, then starts the returned
    /// effects. `send` returns as soon as the reducer has run; await the
    /// returned [`EffectHandle`] to wait for the effects.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        let (handle, tracking) = EffectHandle::new();
        self.send_internal(action, tracking).await?;
        Ok(handle)
    }

    async fn send_internal(&self, action: A, tracking: EffectTracking) -> Result<(), StoreError> {
        if self.shutdown.load(Ordering::SeqCst) {
            tracing::debug!("Rejecting action, store is shutting down");
            return Err(StoreError::ShutdownInProgress);
        }

        metrics::counter!("store.actions.sent").increment(1);

        let effects = {
            let mut state = self.state.write().await;
            self.reducer.reduce(&mut state, action, &self.environment)
        };

        tracing::trace!(count = effects.len(), "Reducer produced effects");

        for effect in effects {
            self.execute_effect(effect, tracking.clone());
        }

        Ok(())
    }

    /// Read current state via a closure
    ///
    /// ```ignore
    /// let seats = store.state(|s| s.booking.selected_seats().len()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Number of effects currently running across all handles
    #[must_use]
    pub fn pending_effects(&self) -> usize {
        self.pending_effects.load(Ordering::SeqCst)
    }

    /// Stop accepting actions and wait for running effects
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// when the timeout elapses.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.shutdown.store(true, Ordering::SeqCst);
        tracing::info!("Store shutdown initiated");

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let pending = self.pending_effects();
            if pending == 0 {
                tracing::info!("Store shutdown complete");
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                tracing::warn!(pending, "Store shutdown timed out");
                return Err(StoreError::ShutdownTimeout(pending));
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    fn begin_effect(&self, tracking: &EffectTracking) -> (DecrementGuard, AtomicCounterGuard) {
        tracking.increment();
        self.pending_effects.fetch_add(1, Ordering::SeqCst);
        (
            DecrementGuard(tracking.clone()),
            AtomicCounterGuard(Arc::clone(&self.pending_effects)),
        )
    }

    /// Feed an effect-produced action back into the store
    async fn feed_back(&self, action: A, tracking: EffectTracking) {
        if let Err(error) = self.send_internal(action, tracking).await {
            tracing::debug!(error = %error, "Dropped feedback action");
        }
    }

    /// Execute an effect
    ///
    /// Effects are fire-and-forget: a panicking effect task is isolated to
    /// its task, and the guards keep the counters consistent.
    fn execute_effect(&self, effect: Effect<A>, tracking: EffectTracking) {
        match effect {
            Effect::None => {
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
            },
            Effect::Future(fut) => {
                metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                let guards = self.begin_effect(&tracking);
                let store = self.clone();

                tokio::spawn(async move {
                    let _guards = guards;
                    if let Some(action) = fut.await {
                        tracing::trace!("Effect::Future produced an action");
                        store.feed_back(action, tracking).await;
                    }
                });
            },
            Effect::Delay { duration, action } => {
                metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                let guards = self.begin_effect(&tracking);
                let store = self.clone();

                tokio::spawn(async move {
                    let _guards = guards;
                    tokio::time::sleep(duration).await;
                    tracing::trace!(?duration, "Effect::Delay elapsed");
                    store.feed_back(*action, tracking).await;
                });
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use boxoffice_core::{SmallVec, smallvec};

    #[derive(Debug, Clone, Default)]
    struct TallyState {
        total: u32,
        echoes: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TallyAction {
        Add(u32),
        AddLater(u32),
        Echoed,
    }

    #[derive(Clone)]
    struct TallyReducer;

    impl Reducer for TallyReducer {
        type State = TallyState;
        type Action = TallyAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut TallyState,
            action: TallyAction,
            _env: &(),
        ) -> SmallVec<[Effect<TallyAction>; 4]> {
            match action {
                TallyAction::Add(n) => {
                    state.total += n;
                    smallvec![Effect::None]
                },
                TallyAction::AddLater(n) => smallvec![
                    Effect::task(async move { TallyAction::Add(n) }),
                    Effect::Delay {
                        duration: Duration::from_millis(5),
                        action: Box::new(TallyAction::Echoed),
                    },
                ],
                // Echoes add again, so waiting must cover a second hop
                TallyAction::Echoed => {
                    state.echoes += 1;
                    smallvec![Effect::task(async { TallyAction::Add(10) })]
                },
            }
        }
    }

    #[tokio::test]
    async fn send_applies_reducer() {
        let store = Store::new(TallyState::default(), TallyReducer, ());
        store.send(TallyAction::Add(3)).await.unwrap();
        assert_eq!(store.state(|s| s.total).await, 3);
    }

    #[tokio::test]
    async fn handle_waits_for_cascaded_actions() {
        let store = Store::new(TallyState::default(), TallyReducer, ());
        let mut handle = store.send(TallyAction::AddLater(4)).await.unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle.wait())
            .await
            .unwrap();

        assert_eq!(store.state(|s| (s.total, s.echoes)).await, (14, 1));
        assert_eq!(handle.pending(), 0);
        assert_eq!(store.pending_effects(), 0);
    }

    #[tokio::test]
    async fn shutdown_drains_effects_and_drops_their_actions() {
        let store = Store::new(TallyState::default(), TallyReducer, ());
        store.send(TallyAction::AddLater(1)).await.unwrap();
        store.shutdown(Duration::from_secs(1)).await.unwrap();

        assert_eq!(store.pending_effects(), 0);
        assert_eq!(store.state(|s| s.echoes).await, 0);
    }

    #[tokio::test]
    async fn shutdown_rejects_new_actions() {
        let store = Store::new(TallyState::default(), TallyReducer, ());
        store.shutdown(Duration::from_secs(1)).await.unwrap();

        let result = store.send(TallyAction::Add(1)).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
    }
}
