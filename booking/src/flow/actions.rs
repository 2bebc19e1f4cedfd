//! Actions of the booking flow.

use super::types::Screen;
use crate::error::BookingError;
use crate::types::{Confirmation, Show, ShowDetail, ShowId, ShowQuery};

/// Actions for the booking flow
///
/// Commands carry raw form input; validation happens in the reducer so a
/// rejected submission can be attached to its control. Events carry the
/// results of catalog and payment effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowAction {
    // Commands
    /// Submit the login form
    Login {
        /// Email, becomes the session identity
        email: String,
        /// Password (not verified)
        password: String,
    },

    /// Re-query the listing
    LoadShows {
        /// `movie`, `concert` or `all`
        category: String,
        /// City name
        city: String,
    },

    /// Update the client-side search text
    SearchChanged {
        /// Search text
        query: String,
    },

    /// Open a show from the listing
    SelectShow {
        /// Show to open
        show_id: ShowId,
    },

    /// Re-issue a failed detail request
    RetryDetail,

    /// Submit the customer form on the detail screen
    SubmitCustomerInfo {
        /// Full name
        name: String,
        /// Contact email
        email: String,
        /// Phone number
        phone: String,
    },

    /// Click a seat on the seat map
    ToggleSeat {
        /// Seat id as displayed (`"A1"`)
        seat: String,
    },

    /// Continue from the seat map to payment
    ProceedToPayment,

    /// Submit the payment form
    SubmitPayment {
        /// Card number
        number: String,
        /// Name on card
        holder: String,
        /// Expiry date
        expiry: String,
        /// CVV
        cvv: String,
    },

    /// Go back to the listing
    Back,

    /// End the session and return to the listing as a guest
    Logout,

    /// Enter a screen directly (deep link, reload)
    Navigate {
        /// Requested screen
        to: Screen,
    },

    /// Leave the confirmation screen
    ReturnToBrowsing,

    // Events
    /// Listing received
    ShowsLoaded {
        /// Query the listing answers
        query: ShowQuery,
        /// Matching shows
        shows: Vec<Show>,
    },

    /// Listing request failed
    ShowsFailed {
        /// Query of the failed request
        query: ShowQuery,
        /// Failure
        error: BookingError,
    },

    /// Detail record received
    DetailLoaded {
        /// The record
        detail: Box<ShowDetail>,
    },

    /// Detail request failed
    DetailFailed {
        /// Requested show
        show_id: ShowId,
        /// Failure
        error: BookingError,
    },

    /// Charge accepted
    PaymentSucceeded {
        /// Booking summary
        confirmation: Confirmation,
    },

    /// Charge rejected
    PaymentFailed {
        /// Gateway message
        message: String,
    },
}
