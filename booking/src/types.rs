//! Domain types for the booking flow.
//!
//! Catalog records ([`Show`], [`ShowDetail`]) are immutable view models
//! resolved once at the catalog client boundary. Form payloads
//! ([`Credentials`], [`CustomerInfo`], [`CardDetails`]) are only constructed
//! through their `validate` functions.

use crate::error::{Field, ValidationError, require};
use crate::seat_map::SeatId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of a show (a scheduled instance of an event)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShowId(u64);

impl ShowId {
    /// Creates a `ShowId`
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id as sent on the wire
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the event a show instantiates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u64);

impl EventId {
    /// Creates an `EventId`
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Pricing
// ============================================================================

/// Currency used when the catalog omits one
pub const DEFAULT_CURRENCY: &str = "INR";

/// A flat per-seat price in whole currency units
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in whole units
    pub amount: u64,
    /// ISO currency code
    pub currency: String,
}

impl Price {
    /// Creates a price
    #[must_use]
    pub fn new(amount: u64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    /// Price of `count` seats at this rate
    #[must_use]
    pub fn times(&self, count: usize) -> Self {
        let count = u64::try_from(count).unwrap_or(u64::MAX);
        Self {
            amount: self.amount.saturating_mul(count),
            currency: self.currency.clone(),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency, self.amount)
    }
}

// ============================================================================
// Catalog queries
// ============================================================================

/// Catalog category filter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Movies only
    Movie,
    /// Concerts only
    Concert,
    /// Every category
    #[default]
    All,
}

impl Category {
    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Concert => "concert",
            Self::All => "all",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" => Ok(Self::Movie),
            "concert" => Ok(Self::Concert),
            "all" => Ok(Self::All),
            other => Err(ValidationError::new(
                Field::Category,
                format!("Unknown category '{other}' (expected movie, concert or all)"),
            )),
        }
    }
}

/// Parameters of a catalog listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowQuery {
    /// Category filter
    pub category: Category,
    /// City name, matched case-insensitively by the service
    pub city: String,
}

impl ShowQuery {
    /// Builds a query from raw form input
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an unknown category or a blank city.
    pub fn parse(category: &str, city: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            category: category.parse()?,
            city: require(Field::City, city)?,
        })
    }
}

// ============================================================================
// Catalog records
// ============================================================================

/// Catalog summary of a show
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    /// Show id
    pub id: ShowId,
    /// Event this show instantiates
    pub event_id: EventId,
    /// Event title
    pub title: String,
    /// Event category as reported by the catalog
    pub category: String,
    /// Venue name
    pub venue_name: String,
    /// Venue city
    pub city: String,
    /// Start time
    pub starts_at: DateTime<Utc>,
    /// End time
    pub ends_at: DateTime<Utc>,
    /// Flat per-seat price (the show's minimum price)
    pub price: Price,
    /// Image reference
    pub image: String,
}

/// Venue of a show
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    /// Venue id
    pub id: u64,
    /// Venue name
    pub name: String,
    /// Area or neighbourhood
    pub location: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// Country
    pub country: String,
    /// Postal code
    pub pincode: String,
}

/// Full record of a single show
///
/// Pricing is not part of the detail record; the price shown next to it is
/// always the selected [`Show`]'s price.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowDetail {
    /// Show id
    pub id: ShowId,
    /// Event id
    pub event_id: EventId,
    /// Event title
    pub title: String,
    /// Event category
    pub category: String,
    /// Start time
    pub starts_at: DateTime<Utc>,
    /// End time
    pub ends_at: DateTime<Utc>,
    /// Scheduling status reported by the catalog
    pub status: String,
    /// Running time in minutes
    pub duration_minutes: u32,
    /// Language
    pub language: String,
    /// Genre
    pub genre: String,
    /// Venue
    pub venue: Venue,
}

// ============================================================================
// Forms
// ============================================================================

/// Login form
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Email, used as the session identity
    pub email: String,
    /// Password (never verified)
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    /// Accepts any non-empty pair
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] on the first blank field.
    pub fn validate(email: &str, password: &str) -> Result<Self, ValidationError> {
        let email = require(Field::Email, email)?;
        if password.is_empty() {
            return Err(ValidationError::required(Field::Password));
        }
        Ok(Self {
            email,
            password: password.to_string(),
        })
    }
}

/// Customer details collected on the show detail screen
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    /// Full name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Phone number
    pub phone: String,
}

impl CustomerInfo {
    /// Requires every field to be non-blank
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] on the first blank field.
    pub fn validate(name: &str, email: &str, phone: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require(Field::Name, name)?,
            email: require(Field::ContactEmail, email)?,
            phone: require(Field::Phone, phone)?,
        })
    }
}

/// Required CVV length
pub const CVV_LENGTH: usize = 3;

/// Payment form
#[derive(Clone, PartialEq, Eq)]
pub struct CardDetails {
    /// Card number
    pub number: String,
    /// Name on card
    pub holder: String,
    /// Expiry (`MM/YY`)
    pub expiry: String,
    /// Card verification value
    pub cvv: String,
}

impl CardDetails {
    /// Checks presence of every field and the CVV length
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] on the first rejected field.
    pub fn validate(
        number: &str,
        holder: &str,
        expiry: &str,
        cvv: &str,
    ) -> Result<Self, ValidationError> {
        let number = require(Field::CardNumber, number)?;
        let holder = require(Field::CardHolder, holder)?;
        let expiry = require(Field::Expiry, expiry)?;
        let cvv = require(Field::Cvv, cvv)?;
        if cvv.chars().count() != CVV_LENGTH {
            return Err(ValidationError::new(
                Field::Cvv,
                format!("CVV must be {CVV_LENGTH} characters"),
            ));
        }
        Ok(Self {
            number,
            holder,
            expiry,
            cvv,
        })
    }

    /// Last four characters of the card number
    #[must_use]
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self.number.chars().filter(|c| !c.is_whitespace()).collect();
        digits[digits.len().saturating_sub(4)..].iter().collect()
    }
}

// Card data stays out of logs.
impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("last_four", &self.last_four())
            .field("holder", &self.holder)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Confirmation
// ============================================================================

/// Summary shown after a successful payment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Payment reference returned by the gateway
    pub reference: String,
    /// Booked show
    pub show_id: ShowId,
    /// Show title
    pub title: String,
    /// Seats in selection order
    pub seats: Vec<SeatId>,
    /// Amount charged
    pub total: Price,
    /// Customer the booking is for
    pub customer: CustomerInfo,
    /// When the payment was confirmed
    pub confirmed_at: DateTime<Utc>,
}
