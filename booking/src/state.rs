//! Booking state aggregate.
//!
//! One instance per session, owned by the flow store. Every field is read
//! and replaced as a whole; there is no partial merge.
//!
//! The selected seats always belong to the selected show: selecting a
//! different show, or clearing the selection, also clears the seats.

use crate::seat_map::SeatId;
use crate::types::{CustomerInfo, Price, Show};

/// Selected show, seats, customer info and identity of one session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookingState {
    selected_show: Option<Show>,
    selected_seats: Vec<SeatId>,
    customer: Option<CustomerInfo>,
    identity: Option<String>,
}

impl BookingState {
    /// Empty state at session start
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected show
    #[must_use]
    pub const fn selected_show(&self) -> Option<&Show> {
        self.selected_show.as_ref()
    }

    /// Selected seats in selection order
    #[must_use]
    pub fn selected_seats(&self) -> &[SeatId] {
        &self.selected_seats
    }

    /// Customer info from the last detail-form submission
    #[must_use]
    pub const fn customer(&self) -> Option<&CustomerInfo> {
        self.customer.as_ref()
    }

    /// Logged-in identity
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Replaces the selected show
    ///
    /// Returns `true` when previously selected seats were discarded because
    /// the show changed (or was cleared).
    pub fn set_selected_show(&mut self, show: Option<Show>) -> bool {
        let same_show = matches!(
            (&self.selected_show, &show),
            (Some(current), Some(next)) if current.id == next.id
        );
        self.selected_show = show;
        if same_show || self.selected_seats.is_empty() {
            return false;
        }
        self.selected_seats.clear();
        true
    }

    /// Replaces the seat selection
    pub fn set_selected_seats(&mut self, seats: Vec<SeatId>) {
        self.selected_seats = seats;
    }

    /// Replaces the customer info
    pub fn set_customer(&mut self, customer: Option<CustomerInfo>) {
        self.customer = customer;
    }

    /// Replaces the logged-in identity
    pub fn set_identity(&mut self, identity: Option<String>) {
        self.identity = identity;
    }

    /// Bearer token for catalog requests: the identity, or `fallback`
    #[must_use]
    pub fn auth_token<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.identity.as_deref().unwrap_or(fallback)
    }

    /// Flat total of the current selection, if a show is selected
    #[must_use]
    pub fn total(&self) -> Option<Price> {
        self.selected_show
            .as_ref()
            .map(|show| show.price.times(self.selected_seats.len()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{EventId, ShowId};
    use chrono::{TimeZone, Utc};

    fn show(id: u64, price: u64) -> Show {
        let starts_at = Utc.with_ymd_and_hms(2026, 2, 15, 19, 0, 0).unwrap();
        Show {
            id: ShowId::new(id),
            event_id: EventId::new(1),
            title: "Rock Concert".to_string(),
            category: "concert".to_string(),
            venue_name: "Arena".to_string(),
            city: "Mumbai".to_string(),
            starts_at,
            ends_at: starts_at,
            price: Price::new(price, "INR"),
            image: "/1.jpg".to_string(),
        }
    }

    fn seats(ids: &[&str]) -> Vec<SeatId> {
        ids.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn starts_empty() {
        let state = BookingState::new();
        assert!(state.selected_show().is_none());
        assert!(state.selected_seats().is_empty());
        assert!(state.customer().is_none());
        assert_eq!(state.auth_token("demo-user"), "demo-user");
    }

    #[test]
    fn identity_is_the_token() {
        let mut state = BookingState::new();
        state.set_identity(Some("a@b.com".to_string()));
        assert_eq!(state.auth_token("demo-user"), "a@b.com");
    }

    #[test]
    fn reselecting_same_show_keeps_seats() {
        let mut state = BookingState::new();
        state.set_selected_show(Some(show(7, 50)));
        state.set_selected_seats(seats(&["A1"]));

        assert!(!state.set_selected_show(Some(show(7, 50))));
        assert_eq!(state.selected_seats(), seats(&["A1"]).as_slice());
    }

    #[test]
    fn changing_show_clears_seats() {
        let mut state = BookingState::new();
        state.set_selected_show(Some(show(7, 50)));
        state.set_selected_seats(seats(&["A1", "A2"]));

        assert!(state.set_selected_show(Some(show(8, 70))));
        assert!(state.selected_seats().is_empty());
    }

    #[test]
    fn clearing_show_clears_seats() {
        let mut state = BookingState::new();
        state.set_selected_show(Some(show(7, 50)));
        state.set_selected_seats(seats(&["B2"]));

        assert!(state.set_selected_show(None));
        assert!(state.selected_seats().is_empty());
    }

    #[test]
    fn total_uses_show_price() {
        let mut state = BookingState::new();
        assert_eq!(state.total(), None);

        state.set_selected_show(Some(show(7, 50)));
        state.set_selected_seats(seats(&["A1", "A2", "A5"]));
        assert_eq!(state.total(), Some(Price::new(150, "INR")));
    }
}
