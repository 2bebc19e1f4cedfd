//! Error taxonomy for the booking flow.
//!
//! - [`BookingError::Network`]: transport failure or non-2xx response,
//!   rendered inline by the screen that issued the request
//! - [`BookingError::NotFound`]: the catalog does not know a show id
//! - [`ValidationError`]: a missing or malformed form field, or an empty
//!   seat selection; blocks the transition that triggered it
//! - [`BookingError::NotInitialized`]: the session scope was used before it
//!   was started (a programmer error, fatal at start-up)

use crate::types::ShowId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result alias for booking operations
pub type Result<T> = std::result::Result<T, BookingError>;

/// Form control a validation error belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    /// Login email
    Email,
    /// Login password
    Password,
    /// Customer full name
    Name,
    /// Customer contact email
    ContactEmail,
    /// Customer phone number
    Phone,
    /// Catalog category filter
    Category,
    /// Catalog city filter
    City,
    /// Seat selection
    Seats,
    /// Card number
    CardNumber,
    /// Name on card
    CardHolder,
    /// Card expiry date
    Expiry,
    /// Card verification value
    Cvv,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Email | Self::ContactEmail => "Email address",
            Self::Password => "Password",
            Self::Name => "Full name",
            Self::Phone => "Phone number",
            Self::Category => "Category",
            Self::City => "City",
            Self::Seats => "Seats",
            Self::CardNumber => "Card number",
            Self::CardHolder => "Name on card",
            Self::Expiry => "Expiry date",
            Self::Cvv => "CVV",
        };
        f.write_str(label)
    }
}

/// A rejected form submission, attached to the offending control
#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ValidationError {
    /// The control to show the message next to
    pub field: Field,
    /// User-facing message
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error with a custom message
    #[must_use]
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// "<field> is required"
    #[must_use]
    pub fn required(field: Field) -> Self {
        Self::new(field, format!("{field} is required"))
    }
}

/// Returns the trimmed value, or a `required` error if it is blank
pub(crate) fn require(field: Field, value: &str) -> std::result::Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::required(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Errors surfaced by the booking flow
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum BookingError {
    /// Transport failure or non-success HTTP status
    ///
    /// `message` is the response body when the service sent one.
    #[error("{message}")]
    Network {
        /// HTTP status, absent for transport failures
        status: Option<u16>,
        /// Response body or a generated description
        message: String,
    },

    /// The catalog reported the show id as unknown
    #[error("Show {0} not found")]
    NotFound(ShowId),

    /// A form field or the seat selection was rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Booking state was accessed outside an initialized session scope
    #[error("Booking state accessed outside an initialized session scope")]
    NotInitialized,
}

impl BookingError {
    /// Builds the error for a non-success response
    ///
    /// An empty body yields `"Request failed with status <code>"`.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            format!("Request failed with status {status}")
        } else {
            body.to_string()
        };
        Self::Network {
            status: Some(status),
            message,
        }
    }

    /// Builds the error for a failed request that never got a response
    #[must_use]
    pub fn transport(error: impl fmt::Display) -> Self {
        Self::Network {
            status: None,
            message: error.to_string(),
        }
    }
}
