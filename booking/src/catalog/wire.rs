//! Wire records of the catalog service and their conversion into view models.
//!
//! This is the only place that knows about `min_price`, optional currency
//! and optional image fields; everything past this module sees a resolved
//! [`Show`] with a required [`Price`].

use crate::error::BookingError;
use crate::types::{DEFAULT_CURRENCY, EventId, Price, Show, ShowDetail, ShowId, Venue};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// `GET /show` list item
#[allow(missing_docs)] // mirrors the service JSON
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowSummaryWire {
    pub show_id: u64,
    pub event_id: u64,
    #[serde(default)]
    pub image: Option<String>,
    pub category: String,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub venue_name: String,
    pub city: String,
    #[serde(deserialize_with = "whole_units")]
    pub min_price: u64,
    #[serde(default)]
    pub currency: Option<String>,
}

/// `GET /show/{id}` body
#[allow(missing_docs)] // mirrors the service JSON
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowDetailWire {
    pub show_id: u64,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub event_id: u64,
    pub category: String,
    pub title: String,
    pub duration_min: u32,
    pub language: String,
    pub genre: String,
    pub venue_id: u64,
    pub venue_name: String,
    pub location: String,
    pub city: String,
    pub country: String,
    pub pincode: String,
    pub address: String,
}

/// Reads a price in whole currency units
///
/// The service sends a JSON number; a fractional amount is rounded to the
/// nearest unit rather than failing the whole listing.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)] // finite, non-negative, rounded
fn whole_units<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(units) = number.as_u64() {
        return Ok(units);
    }
    match number.as_f64() {
        Some(amount) if amount.is_finite() && amount >= 0.0 && amount <= u64::MAX as f64 => {
            Ok(amount.round() as u64)
        },
        _ => Err(D::Error::custom(format!("invalid price {number}"))),
    }
}

/// Default image path of an event
#[must_use]
pub fn event_image_path(event_id: EventId) -> String {
    format!("/{event_id}.jpg")
}

/// Parses RFC 3339, or a naive ISO-8601 timestamp taken as UTC
///
/// # Errors
///
/// Returns a `Network` error naming the rejected value.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, BookingError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| BookingError::Network {
            status: None,
            message: format!("Invalid timestamp '{raw}': {e}"),
        })
}

impl TryFrom<ShowSummaryWire> for Show {
    type Error = BookingError;

    fn try_from(wire: ShowSummaryWire) -> Result<Self, Self::Error> {
        let event_id = EventId::new(wire.event_id);
        let currency = wire
            .currency
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        let image = wire
            .image
            .filter(|i| !i.trim().is_empty())
            .unwrap_or_else(|| event_image_path(event_id));

        Ok(Self {
            id: ShowId::new(wire.show_id),
            event_id,
            title: wire.title,
            category: wire.category,
            venue_name: wire.venue_name,
            city: wire.city,
            starts_at: parse_timestamp(&wire.start_time)?,
            ends_at: parse_timestamp(&wire.end_time)?,
            price: Price::new(wire.min_price, currency),
            image,
        })
    }
}

impl TryFrom<ShowDetailWire> for ShowDetail {
    type Error = BookingError;

    fn try_from(wire: ShowDetailWire) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ShowId::new(wire.show_id),
            event_id: EventId::new(wire.event_id),
            title: wire.title,
            category: wire.category,
            starts_at: parse_timestamp(&wire.start_time)?,
            ends_at: parse_timestamp(&wire.end_time)?,
            status: wire.status,
            duration_minutes: wire.duration_min,
            language: wire.language,
            genre: wire.genre,
            venue: Venue {
                id: wire.venue_id,
                name: wire.venue_name,
                location: wire.location,
                address: wire.address,
                city: wire.city,
                country: wire.country,
                pincode: wire.pincode,
            },
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn summary() -> ShowSummaryWire {
        serde_json::from_value(serde_json::json!({
            "show_id": 7,
            "event_id": 3,
            "category": "concert",
            "title": "Jazz Night",
            "start_time": "2026-03-15T19:30:00",
            "end_time": "2026-03-15T22:00:00",
            "venue_name": "Blue Note",
            "city": "Mumbai",
            "min_price": 65
        }))
        .unwrap()
    }

    #[test]
    fn missing_currency_and_image_are_resolved() {
        let show = Show::try_from(summary()).unwrap();
        assert_eq!(show.price, Price::new(65, "INR"));
        assert_eq!(show.image, "/3.jpg");
        assert_eq!(show.starts_at.to_rfc3339(), "2026-03-15T19:30:00+00:00");
    }

    #[test]
    fn explicit_currency_is_kept() {
        let mut wire = summary();
        wire.currency = Some("USD".to_string());
        wire.image = Some("https://img/jazz.jpg".to_string());

        let show = Show::try_from(wire).unwrap();
        assert_eq!(show.price.currency, "USD");
        assert_eq!(show.image, "https://img/jazz.jpg");
    }

    #[test]
    fn fractional_price_rounds_to_whole_units() {
        let mut json = serde_json::to_value(summary()).unwrap();
        json["min_price"] = serde_json::json!(64.6);
        let wire: ShowSummaryWire = serde_json::from_value(json).unwrap();
        assert_eq!(wire.min_price, 65);

        let show = Show::try_from(wire).unwrap();
        assert_eq!(show.price, Price::new(65, "INR"));
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut json = serde_json::to_value(summary()).unwrap();
        json["min_price"] = serde_json::json!(-5);
        assert!(serde_json::from_value::<ShowSummaryWire>(json).is_err());
    }

    #[test]
    fn timestamps_accept_offsets_and_fractions() {
        let with_offset = parse_timestamp("2026-03-15T19:30:00+05:30").unwrap();
        assert_eq!(with_offset.to_rfc3339(), "2026-03-15T14:00:00+00:00");

        assert!(parse_timestamp("2026-03-15T19:30:00.250").is_ok());
        assert!(parse_timestamp("2026-03-15 19:30:00").is_ok());
    }

    #[test]
    fn bad_timestamp_is_a_network_error() {
        let mut wire = summary();
        wire.start_time = "tomorrow".to_string();
        let error = Show::try_from(wire).unwrap_err();
        assert!(matches!(error, BookingError::Network { status: None, .. }));
    }

    #[test]
    fn detail_maps_venue() {
        let wire: ShowDetailWire = serde_json::from_value(serde_json::json!({
            "show_id": 7,
            "start_time": "2026-03-15T19:30:00",
            "end_time": "2026-03-15T22:00:00",
            "status": "scheduled",
            "event_id": 3,
            "category": "concert",
            "title": "Jazz Night",
            "duration_min": 150,
            "language": "English",
            "genre": "Jazz",
            "venue_id": 11,
            "venue_name": "Blue Note",
            "location": "Colaba",
            "city": "Mumbai",
            "country": "India",
            "pincode": "400001",
            "address": "1 Harbour Road"
        }))
        .unwrap();

        let detail = ShowDetail::try_from(wire).unwrap();
        assert_eq!(detail.id, ShowId::new(7));
        assert_eq!(detail.duration_minutes, 150);
        assert_eq!(detail.venue.name, "Blue Note");
        assert_eq!(detail.venue.pincode, "400001");
    }
}
