//! Flow controller.
//!
//! Sequences the screens of the booking funnel:
//!
//! ```text
//! LoggedOut → Browsing → ViewingDetails → SelectingSeats → Paying → Confirmed
//! ```
//!
//! Each screen depends on fields of the booking aggregate. Entering a screen
//! whose fields are missing is a guard violation: the user is redirected to
//! `Browsing`, the redirect is logged and recorded in
//! [`FlowState::last_redirect`].
//!
//! Catalog fetches and payment are effects; their results come back as
//! events and are dropped when they no longer match the state (a listing
//! for an old query, a detail record for a show that is no longer selected,
//! a charge that finished after the user left the payment screen).

use super::actions::FlowAction;
use super::environment::FlowEnvironment;
use super::types::{DETAIL_UNAVAILABLE, DetailView, FlowState, NO_SEATS_SELECTED, Redirect, Screen};
use crate::error::{Field, ValidationError};
use crate::seat_map::{self, SeatId};
use crate::state::BookingState;
use crate::types::{CardDetails, Confirmation, Credentials, CustomerInfo, ShowId, ShowQuery};
use boxoffice_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use std::sync::Arc;

type Effects = SmallVec<[Effect<FlowAction>; 4]>;

/// Reducer for the booking flow
#[derive(Clone, Debug, Default)]
pub struct FlowReducer;

impl FlowReducer {
    /// Creates a new `FlowReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Checks the aggregate fields screen `to` depends on
    fn precondition(state: &FlowState, to: Screen) -> Result<(), &'static str> {
        let booking = &state.booking;
        let needs_show = matches!(
            to,
            Screen::ViewingDetails | Screen::SelectingSeats | Screen::Paying
        );
        let needs_customer = matches!(to, Screen::SelectingSeats | Screen::Paying);

        if needs_show && booking.selected_show().is_none() {
            return Err("no show selected");
        }
        if needs_customer && booking.customer().is_none() {
            return Err("customer info missing");
        }
        if to == Screen::Paying && booking.selected_seats().is_empty() {
            return Err("no seats selected");
        }
        if to == Screen::Confirmed && state.confirmation.is_none() {
            return Err("no confirmed booking");
        }
        Ok(())
    }

    fn transition(state: &mut FlowState, to: Screen) {
        if state.screen != to {
            tracing::info!(from = %state.screen, to = %to, "Screen transition");
        }
        state.screen = to;
        state.validation = None;
    }

    fn ignored(state: &FlowState, action: &'static str) -> Effects {
        tracing::debug!(screen = %state.screen, action, "Action ignored on this screen");
        SmallVec::new()
    }

    fn reject(state: &mut FlowState, error: ValidationError) -> Effects {
        tracing::debug!(field = ?error.field, message = %error.message, "Form rejected");
        state.validation = Some(error);
        SmallVec::new()
    }

    /// Sends the user to `Browsing` after a guard violation
    fn redirect(
        state: &mut FlowState,
        requested: Screen,
        reason: impl Into<String>,
        env: &FlowEnvironment,
    ) -> Effects {
        let redirect = Redirect {
            from: state.screen,
            requested,
            to: Screen::Browsing,
            reason: reason.into(),
        };
        tracing::warn!(
            from = %redirect.from,
            requested = %redirect.requested,
            to = %redirect.to,
            reason = %redirect.reason,
            "Guard redirect"
        );
        let effects = Self::enter_browsing(state, env);
        state.last_redirect = Some(redirect);
        effects
    }

    /// Shows the listing and refreshes it for the current query
    fn enter_browsing(state: &mut FlowState, env: &FlowEnvironment) -> Effects {
        Self::transition(state, Screen::Browsing);
        state.detail = None;
        state.payment_pending = false;
        state.payment_error = None;
        smallvec![Self::fetch_shows(state, env)]
    }

    fn fetch_shows(state: &mut FlowState, env: &FlowEnvironment) -> Effect<FlowAction> {
        state.shows_loading = true;
        state.catalog_error = None;

        let query = state.query.clone();
        let token = state.booking.auth_token(&env.fallback_token);
        tracing::debug!(category = %query.category, city = %query.city, "Fetching listing");
        let request = env.catalog.list_shows(&query, token);

        Effect::task(async move {
            match request.await {
                Ok(shows) => FlowAction::ShowsLoaded { query, shows },
                Err(error) => FlowAction::ShowsFailed { query, error },
            }
        })
    }

    fn fetch_detail(
        state: &mut FlowState,
        show_id: ShowId,
        env: &FlowEnvironment,
    ) -> Effect<FlowAction> {
        state.detail = Some(DetailView::Loading);

        let token = state.booking.auth_token(&env.fallback_token);
        tracing::debug!(show_id = %show_id, "Fetching show detail");
        let request = env.catalog.show_detail(show_id, token);

        Effect::task(async move {
            match request.await {
                Ok(detail) => FlowAction::DetailLoaded {
                    detail: Box::new(detail),
                },
                Err(error) => FlowAction::DetailFailed { show_id, error },
            }
        })
    }

    fn selected_show_id(state: &FlowState) -> Option<ShowId> {
        state.booking.selected_show().map(|show| show.id)
    }

    /// Starts the charge for the current selection
    fn charge(state: &mut FlowState, card: &CardDetails, env: &FlowEnvironment) -> Effects {
        let booking = &state.booking;
        let (Some(show), Some(customer), Some(total)) =
            (booking.selected_show(), booking.customer(), booking.total())
        else {
            return SmallVec::new();
        };
        let draft = Confirmation {
            reference: String::new(),
            show_id: show.id,
            title: show.title.clone(),
            seats: booking.selected_seats().to_vec(),
            total: total.clone(),
            customer: customer.clone(),
            confirmed_at: env.clock.now(),
        };

        tracing::info!(
            show_id = %draft.show_id,
            seats = draft.seats.len(),
            total = %draft.total,
            card = %card.last_four(),
            "Submitting payment"
        );
        let request = env.payments.charge(total, card);
        state.payment_pending = true;
        state.payment_error = None;
        state.validation = None;

        let clock = Arc::clone(&env.clock);
        smallvec![Effect::task(async move {
            match request.await {
                Ok(receipt) => FlowAction::PaymentSucceeded {
                    confirmation: Confirmation {
                        reference: receipt.reference,
                        confirmed_at: clock.now(),
                        ..draft
                    },
                },
                Err(error) => FlowAction::PaymentFailed {
                    message: error.to_string(),
                },
            }
        })]
    }
}

impl Reducer for FlowReducer {
    type State = FlowState;
    type Action = FlowAction;
    type Environment = FlowEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per screen event
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Login ==========
            FlowAction::Login { email, password } => {
                if state.screen != Screen::LoggedOut && state.booking.identity().is_some() {
                    return Self::ignored(state, "Login");
                }
                match Credentials::validate(&email, &password) {
                    Ok(credentials) => {
                        tracing::info!(identity = %credentials.email, "Logged in");
                        state.booking.set_identity(Some(credentials.email));
                        Self::enter_browsing(state, env)
                    },
                    Err(error) => Self::reject(state, error),
                }
            },

            // ========== Listing ==========
            FlowAction::LoadShows { category, city } => {
                match ShowQuery::parse(&category, &city) {
                    Ok(query) => {
                        state.query = query;
                        state.validation = None;
                        if state.screen == Screen::Browsing {
                            smallvec![Self::fetch_shows(state, env)]
                        } else {
                            SmallVec::new()
                        }
                    },
                    Err(error) => Self::reject(state, error),
                }
            },

            FlowAction::ShowsLoaded { query, shows } => {
                if query != state.query {
                    tracing::debug!("Dropped listing for a previous query");
                    return SmallVec::new();
                }
                tracing::info!(count = shows.len(), city = %query.city, "Listing loaded");
                state.shows_loading = false;
                state.catalog_error = None;
                state.shows = shows;
                SmallVec::new()
            },

            FlowAction::ShowsFailed { query, error } => {
                if query != state.query {
                    tracing::debug!("Dropped listing failure for a previous query");
                    return SmallVec::new();
                }
                tracing::warn!(error = %error, "Listing failed");
                state.shows_loading = false;
                state.shows.clear();
                state.catalog_error = Some(error.to_string());
                SmallVec::new()
            },

            FlowAction::SearchChanged { query } => {
                state.search = query;
                SmallVec::new()
            },

            // ========== Show detail ==========
            FlowAction::SelectShow { show_id } => {
                let Some(show) = state.shows.iter().find(|s| s.id == show_id).cloned() else {
                    return Self::redirect(
                        state,
                        Screen::ViewingDetails,
                        format!("show {show_id} is not in the current listing"),
                        env,
                    );
                };

                tracing::info!(show_id = %show_id, title = %show.title, "Show selected");
                if state.booking.set_selected_show(Some(show)) {
                    tracing::info!(show_id = %show_id, "Selected seats cleared after show change");
                }
                Self::transition(state, Screen::ViewingDetails);
                smallvec![Self::fetch_detail(state, show_id, env)]
            },

            FlowAction::RetryDetail => {
                if state.screen != Screen::ViewingDetails
                    || !matches!(state.detail, Some(DetailView::Failed { .. }))
                {
                    return Self::ignored(state, "RetryDetail");
                }
                match Self::selected_show_id(state) {
                    Some(show_id) => smallvec![Self::fetch_detail(state, show_id, env)],
                    None => Self::redirect(state, Screen::ViewingDetails, "no show selected", env),
                }
            },

            FlowAction::DetailLoaded { detail } => {
                if Self::selected_show_id(state) == Some(detail.id) {
                    state.detail = Some(DetailView::Loaded(detail));
                } else {
                    tracing::debug!(show_id = %detail.id, "Dropped detail of a show no longer selected");
                }
                SmallVec::new()
            },

            FlowAction::DetailFailed { show_id, error } => {
                if Self::selected_show_id(state) == Some(show_id) {
                    tracing::warn!(show_id = %show_id, error = %error, "Show detail failed");
                    state.detail = Some(DetailView::Failed {
                        message: DETAIL_UNAVAILABLE.to_string(),
                    });
                }
                SmallVec::new()
            },

            FlowAction::SubmitCustomerInfo { name, email, phone } => {
                if state.screen != Screen::ViewingDetails {
                    return Self::ignored(state, "SubmitCustomerInfo");
                }
                if let Err(reason) = Self::precondition(state, Screen::ViewingDetails) {
                    return Self::redirect(state, Screen::SelectingSeats, reason, env);
                }
                match CustomerInfo::validate(&name, &email, &phone) {
                    Ok(customer) => {
                        state.booking.set_customer(Some(customer));
                        Self::transition(state, Screen::SelectingSeats);
                        SmallVec::new()
                    },
                    Err(error) => Self::reject(state, error),
                }
            },

            // ========== Seats ==========
            FlowAction::ToggleSeat { seat } => {
                if state.screen != Screen::SelectingSeats {
                    return Self::ignored(state, "ToggleSeat");
                }
                if let Err(reason) = Self::precondition(state, Screen::SelectingSeats) {
                    return Self::redirect(state, Screen::SelectingSeats, reason, env);
                }
                let seat = match seat.parse::<SeatId>() {
                    Ok(parsed) if env.seat_grid.contains(&parsed) => parsed,
                    _ => {
                        tracing::warn!(seat = %seat, "Ignored toggle of a seat outside the grid");
                        return SmallVec::new();
                    },
                };
                if env.booked_seats.contains(&seat) {
                    tracing::debug!(seat = %seat, "Ignored toggle of a booked seat");
                    return SmallVec::new();
                }

                let next = seat_map::toggle(&seat, state.booking.selected_seats(), &env.booked_seats);
                state.booking.set_selected_seats(next);
                if state
                    .validation
                    .as_ref()
                    .is_some_and(|error| error.field == Field::Seats)
                {
                    state.validation = None;
                }
                SmallVec::new()
            },

            FlowAction::ProceedToPayment => {
                if state.screen != Screen::SelectingSeats {
                    return Self::ignored(state, "ProceedToPayment");
                }
                if let Err(reason) = Self::precondition(state, Screen::SelectingSeats) {
                    return Self::redirect(state, Screen::Paying, reason, env);
                }
                if state.booking.selected_seats().is_empty() {
                    return Self::reject(state, ValidationError::new(Field::Seats, NO_SEATS_SELECTED));
                }
                Self::transition(state, Screen::Paying);
                state.payment_error = None;
                SmallVec::new()
            },

            // ========== Payment ==========
            FlowAction::SubmitPayment {
                number,
                holder,
                expiry,
                cvv,
            } => {
                if state.screen != Screen::Paying {
                    return Self::ignored(state, "SubmitPayment");
                }
                if state.payment_pending {
                    tracing::debug!("Payment already in flight");
                    return SmallVec::new();
                }
                if let Err(reason) = Self::precondition(state, Screen::Paying) {
                    return Self::redirect(state, Screen::Paying, reason, env);
                }
                match CardDetails::validate(&number, &holder, &expiry, &cvv) {
                    Ok(card) => Self::charge(state, &card, env),
                    Err(error) => Self::reject(state, error),
                }
            },

            FlowAction::PaymentSucceeded { confirmation } => {
                if state.screen != Screen::Paying || !state.payment_pending {
                    tracing::warn!(
                        reference = %confirmation.reference,
                        "Payment result arrived after leaving the payment screen"
                    );
                    return SmallVec::new();
                }
                tracing::info!(
                    reference = %confirmation.reference,
                    show_id = %confirmation.show_id,
                    seats = confirmation.seats.len(),
                    total = %confirmation.total,
                    "Booking confirmed"
                );
                state.payment_pending = false;
                state.confirmation = Some(confirmation);
                Self::transition(state, Screen::Confirmed);

                match env.confirmation_hold {
                    Some(duration) => smallvec![Effect::Delay {
                        duration,
                        action: Box::new(FlowAction::ReturnToBrowsing),
                    }],
                    None => SmallVec::new(),
                }
            },

            FlowAction::PaymentFailed { message } => {
                if state.screen != Screen::Paying || !state.payment_pending {
                    return Self::ignored(state, "PaymentFailed");
                }
                tracing::warn!(message = %message, "Payment failed");
                state.payment_pending = false;
                state.payment_error = Some(message);
                SmallVec::new()
            },

            FlowAction::ReturnToBrowsing => {
                if state.screen != Screen::Confirmed {
                    return Self::ignored(state, "ReturnToBrowsing");
                }
                Self::enter_browsing(state, env)
            },

            // ========== Navigation ==========
            FlowAction::Back => Self::enter_browsing(state, env),

            FlowAction::Logout => {
                tracing::info!("Logged out");
                state.booking = BookingState::new();
                state.confirmation = None;
                state.search.clear();
                Self::enter_browsing(state, env)
            },

            FlowAction::Navigate { to } => {
                // Advancing from the seat screen validates the selection in place
                if to == Screen::Paying && state.screen == Screen::SelectingSeats {
                    return self.reduce(state, FlowAction::ProceedToPayment, env);
                }
                if let Err(reason) = Self::precondition(state, to) {
                    return Self::redirect(state, to, reason, env);
                }
                match to {
                    Screen::Browsing => Self::enter_browsing(state, env),
                    Screen::ViewingDetails => {
                        Self::transition(state, to);
                        let show_id = Self::selected_show_id(state);
                        let cached = state.loaded_detail().map(|detail| detail.id);
                        match show_id {
                            Some(id) if cached != Some(id) => {
                                smallvec![Self::fetch_detail(state, id, env)]
                            },
                            _ => SmallVec::new(),
                        }
                    },
                    other => {
                        Self::transition(state, other);
                        SmallVec::new()
                    },
                }
            },
        }
    }
}
