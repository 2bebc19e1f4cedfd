//! Injected dependencies of the booking flow.

use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::payment_gateway::PaymentGateway;
use crate::seat_map::{BookedSeats, SeatGrid};
use boxoffice_core::environment::Clock;
use std::sync::Arc;
use std::time::Duration;

/// Bearer token sent while no one is logged in
pub const DEFAULT_FALLBACK_TOKEN: &str = "demo-user";

/// How long the confirmation stays up before returning to the listing
pub const DEFAULT_CONFIRMATION_HOLD: Duration = Duration::from_secs(3);

/// Environment dependencies for the booking flow
#[derive(Clone)]
pub struct FlowEnvironment {
    /// Show catalog
    pub catalog: Arc<dyn CatalogClient>,
    /// Payment gateway
    pub payments: Arc<dyn PaymentGateway>,
    /// Clock for confirmation timestamps
    pub clock: Arc<dyn Clock>,
    /// Auditorium layout
    pub seat_grid: SeatGrid,
    /// Seats unavailable for selection
    pub booked_seats: BookedSeats,
    /// Bearer token used before login
    pub fallback_token: String,
    /// Delay before the confirmation returns to browsing, `None` to stay
    pub confirmation_hold: Option<Duration>,
}

impl FlowEnvironment {
    /// Creates an environment with the default grid, the demo booked seats
    /// and the default fallback token and confirmation hold
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        payments: Arc<dyn PaymentGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            payments,
            clock,
            seat_grid: SeatGrid::default(),
            booked_seats: BookedSeats::demo(),
            fallback_token: DEFAULT_FALLBACK_TOKEN.to_string(),
            confirmation_hold: Some(DEFAULT_CONFIRMATION_HOLD),
        }
    }

    /// Creates an environment from configuration
    #[must_use]
    pub fn from_config(
        config: &Config,
        catalog: Arc<dyn CatalogClient>,
        payments: Arc<dyn PaymentGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(catalog, payments, clock)
            .with_seat_grid(config.seat_grid())
            .with_fallback_token(config.catalog.fallback_token.clone())
            .with_confirmation_hold(config.confirmation_hold())
    }

    /// Replaces the seat grid
    #[must_use]
    pub fn with_seat_grid(mut self, seat_grid: SeatGrid) -> Self {
        self.seat_grid = seat_grid;
        self
    }

    /// Replaces the booked seats
    #[must_use]
    pub fn with_booked_seats(mut self, booked_seats: BookedSeats) -> Self {
        self.booked_seats = booked_seats;
        self
    }

    /// Replaces the fallback token
    #[must_use]
    pub fn with_fallback_token(mut self, token: impl Into<String>) -> Self {
        self.fallback_token = token.into();
        self
    }

    /// Replaces the confirmation hold
    #[must_use]
    pub fn with_confirmation_hold(mut self, hold: Option<Duration>) -> Self {
        self.confirmation_hold = hold;
        self
    }
}
