//! # Boxoffice
//!
//! Client-side ticket booking flow: sign in, browse shows, view a show,
//! pick seats, pay, confirm.
//!
//! ## Architecture
//!
//! - **Catalog** ([`catalog`]): read-only queries against the show catalog,
//!   resolved into [`Show`] / [`ShowDetail`] at the boundary
//! - **Seat map** ([`seat_map`]): pure functions deriving the seat grid,
//!   seat status and the total price
//! - **Booking state** ([`state`]): selected show, seats, customer info and
//!   identity of one session
//! - **Flow controller** ([`flow`]): a reducer sequencing the screens and
//!   guarding their preconditions
//! - **Session** ([`session`]): the store that serializes every write to the
//!   flow state
//!
//! ```text
//! CatalogClient → BookingState → seat map → FlowReducer → Confirmation
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod flow;
pub mod payment_gateway;
pub mod seat_map;
pub mod session;
pub mod state;
pub mod types;

pub use catalog::{CatalogClient, HttpCatalogClient, StaticCatalog, filter_shows};
pub use config::Config;
pub use error::{BookingError, Field, Result, ValidationError};
pub use flow::{DetailView, FlowAction, FlowEnvironment, FlowReducer, FlowState, Redirect, Screen};
pub use payment_gateway::{PaymentGateway, PaymentGatewayError, SimulatedPaymentGateway};
pub use seat_map::{BookedSeats, SeatGrid, SeatId, SeatStatus};
pub use session::{BookingScope, FlowStore};
pub use state::BookingState;
pub use types::{
    CardDetails, Category, Confirmation, CustomerInfo, Credentials, Price, Show, ShowDetail,
    ShowId, ShowQuery,
};
