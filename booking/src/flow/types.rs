//! Flow state: the active screen, the booking aggregate and per-screen view data.

use super::environment::FlowEnvironment;
use crate::catalog::filter_shows;
use crate::error::ValidationError;
use crate::seat_map::SeatRow;
use crate::state::BookingState;
use crate::types::{Confirmation, Price, Show, ShowDetail, ShowQuery};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message rendered when the detail record cannot be fetched
pub const DETAIL_UNAVAILABLE: &str = "Unable to load event details right now.";

/// Message rendered when payment is attempted with no seats
pub const NO_SEATS_SELECTED: &str = "Please select at least one seat";

/// Screens of the booking funnel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    /// Login form
    #[default]
    LoggedOut,
    /// Catalog listing
    Browsing,
    /// Show detail and customer form
    ViewingDetails,
    /// Seat map
    SelectingSeats,
    /// Payment form
    Paying,
    /// Booking summary
    Confirmed,
}

impl Screen {
    /// Stable name used in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoggedOut => "logged_out",
            Self::Browsing => "browsing",
            Self::ViewingDetails => "viewing_details",
            Self::SelectingSeats => "selecting_seats",
            Self::Paying => "paying",
            Self::Confirmed => "confirmed",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detail record as seen by the detail screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetailView {
    /// Request in flight
    Loading,
    /// Record received
    Loaded(Box<ShowDetail>),
    /// Request failed; the customer form stays usable
    Failed {
        /// Inline message
        message: String,
    },
}

/// A guard violation that sent the user back to a safe screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    /// Screen the user was on
    pub from: Screen,
    /// Screen that was requested
    pub requested: Screen,
    /// Screen the user was sent to
    pub to: Screen,
    /// Missing precondition
    pub reason: String,
}

/// State of one booking session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowState {
    /// Active screen
    pub screen: Screen,
    /// Selected show, seats, customer info and identity
    pub booking: BookingState,
    /// Query of the current listing
    pub query: ShowQuery,
    /// Last listing received for `query`
    pub shows: Vec<Show>,
    /// Listing request in flight
    pub shows_loading: bool,
    /// Inline error of the listing screen
    pub catalog_error: Option<String>,
    /// Client-side search text
    pub search: String,
    /// Detail record of the selected show
    pub detail: Option<DetailView>,
    /// Rejected form submission of the active screen
    pub validation: Option<ValidationError>,
    /// Most recent guard redirect
    pub last_redirect: Option<Redirect>,
    /// Charge in flight
    pub payment_pending: bool,
    /// Inline error of the payment screen
    pub payment_error: Option<String>,
    /// Summary of the last successful payment
    pub confirmation: Option<Confirmation>,
}

impl FlowState {
    /// Fresh session on the login screen
    #[must_use]
    pub fn new(query: ShowQuery) -> Self {
        Self {
            screen: Screen::LoggedOut,
            booking: BookingState::new(),
            query,
            shows: Vec::new(),
            shows_loading: false,
            catalog_error: None,
            search: String::new(),
            detail: None,
            validation: None,
            last_redirect: None,
            payment_pending: false,
            payment_error: None,
            confirmation: None,
        }
    }

    /// Listing filtered by the search text
    #[must_use]
    pub fn visible_shows(&self) -> Vec<&Show> {
        filter_shows(&self.shows, &self.search)
    }

    /// Seat map of the selected show
    #[must_use]
    pub fn seat_layout(&self, env: &FlowEnvironment) -> Vec<SeatRow> {
        env.seat_grid
            .layout(&env.booked_seats, self.booking.selected_seats())
    }

    /// Total of the current selection
    #[must_use]
    pub fn total(&self) -> Option<Price> {
        self.booking.total()
    }

    /// Detail record, once loaded
    #[must_use]
    pub fn loaded_detail(&self) -> Option<&ShowDetail> {
        match &self.detail {
            Some(DetailView::Loaded(detail)) => Some(detail),
            _ => None,
        }
    }
}
