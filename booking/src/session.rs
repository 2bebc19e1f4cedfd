//! Session scope around the flow store.
//!
//! Screens reach the booking state only through a [`BookingScope`]. A scope
//! that was never started, or was closed, fails every access with
//! [`BookingError::NotInitialized`]; callers treat that as a programmer
//! error and abort.

use crate::error::{BookingError, Result};
use crate::flow::{FlowAction, FlowEnvironment, FlowReducer, FlowState, Screen};
use crate::state::BookingState;
use boxoffice_runtime::{EffectHandle, Store, StoreError};
use std::time::Duration;

/// Store running the booking flow
pub type FlowStore = Store<FlowState, FlowAction, FlowEnvironment, FlowReducer>;

/// Handle to one booking session
#[derive(Clone, Default)]
pub struct BookingScope {
    store: Option<FlowStore>,
}

impl BookingScope {
    /// A scope with no session behind it
    #[must_use]
    pub const fn uninitialized() -> Self {
        Self { store: None }
    }

    /// Starts a session with `state` and `environment`
    #[must_use]
    pub fn start(state: FlowState, environment: FlowEnvironment) -> Self {
        tracing::info!(screen = %state.screen, "Booking session started");
        Self {
            store: Some(Store::new(state, FlowReducer::new(), environment)),
        }
    }

    /// Whether a session is running
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.store.is_some()
    }

    fn store(&self) -> Result<&FlowStore> {
        self.store.as_ref().ok_or(BookingError::NotInitialized)
    }

    /// Sends an action without waiting for its effects
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotInitialized`] outside a running session.
    pub async fn send(&self, action: FlowAction) -> Result<EffectHandle> {
        self.store()?.send(action).await.map_err(closed)
    }

    /// Sends an action and waits until its effects, and the effects of the
    /// actions they produce, have finished
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotInitialized`] outside a running session.
    pub async fn dispatch(&self, action: FlowAction) -> Result<()> {
        let mut handle = self.send(action).await?;
        handle.wait().await;
        Ok(())
    }

    /// Reads the flow state through `f`
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotInitialized`] outside a running session.
    pub async fn read<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&FlowState) -> T,
    {
        Ok(self.store()?.state(f).await)
    }

    /// Copy of the whole flow state
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotInitialized`] outside a running session.
    pub async fn snapshot(&self) -> Result<FlowState> {
        self.read(FlowState::clone).await
    }

    /// Active screen
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotInitialized`] outside a running session.
    pub async fn screen(&self) -> Result<Screen> {
        self.read(|state| state.screen).await
    }

    /// Copy of the booking aggregate
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotInitialized`] outside a running session.
    pub async fn booking(&self) -> Result<BookingState> {
        self.read(|state| state.booking.clone()).await
    }

    /// Stops the session, waiting up to `timeout` for running effects
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotInitialized`] outside a running session.
    pub async fn close(&mut self, timeout: Duration) -> Result<()> {
        let store = self.store.take().ok_or(BookingError::NotInitialized)?;
        if let Err(error) = store.shutdown(timeout).await {
            tracing::warn!(error = %error, "Booking session closed with effects still running");
        }
        tracing::info!("Booking session closed");
        Ok(())
    }
}

/// A store that no longer accepts actions is a session that has ended
fn closed(error: StoreError) -> BookingError {
    tracing::debug!(error = %error, "Store rejected action");
    BookingError::NotInitialized
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::config::Config;
    use crate::payment_gateway::SimulatedPaymentGateway;
    use boxoffice_testing::test_clock;
    use std::sync::Arc;

    fn environment() -> FlowEnvironment {
        FlowEnvironment::new(
            Arc::new(StaticCatalog::demo()),
            SimulatedPaymentGateway::new().shared(),
            Arc::new(test_clock()),
        )
    }

    #[tokio::test]
    async fn uninitialized_scope_fails_every_access() {
        let scope = BookingScope::uninitialized();

        assert!(!scope.is_initialized());
        assert_eq!(scope.screen().await, Err(BookingError::NotInitialized));
        assert!(matches!(
            scope.send(FlowAction::Back).await,
            Err(BookingError::NotInitialized)
        ));
        assert_eq!(
            scope.dispatch(FlowAction::Back).await,
            Err(BookingError::NotInitialized)
        );
    }

    #[tokio::test]
    async fn started_scope_runs_actions() {
        let scope = BookingScope::start(FlowState::new(Config::default().default_query()), environment());

        scope
            .dispatch(FlowAction::Login {
                email: "a@b.com".to_string(),
                password: "x".to_string(),
            })
            .await
            .unwrap();

        let state = scope.snapshot().await.unwrap();
        assert_eq!(state.screen, Screen::Browsing);
        assert_eq!(state.shows.len(), 3);
        assert!(!state.shows_loading);
    }

    #[tokio::test]
    async fn closed_scope_is_uninitialized() {
        let mut scope = BookingScope::start(FlowState::new(Config::default().default_query()), environment());
        scope.close(Duration::from_secs(1)).await.unwrap();

        assert_eq!(scope.booking().await, Err(BookingError::NotInitialized));
        assert_eq!(
            scope.close(Duration::from_secs(1)).await,
            Err(BookingError::NotInitialized)
        );
    }
}
