//! Configuration management for the booking client.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Unparseable values fall back to the default.

use crate::flow::{DEFAULT_CONFIRMATION_HOLD, DEFAULT_FALLBACK_TOKEN};
use crate::seat_map::{DEFAULT_ROWS, DEFAULT_SEATS_PER_ROW, SeatGrid};
use crate::types::{Category, ShowQuery};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Catalog service configuration
    pub catalog: CatalogConfig,
    /// Auditorium layout
    pub seating: SeatingConfig,
    /// Booking flow timings
    pub flow: FlowConfig,
}

/// Catalog service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Service root, e.g. `http://localhost:8000/api/v1`
    pub base_url: String,
    /// Bearer token sent before login
    pub fallback_token: String,
    /// Category of the first listing
    pub default_category: Category,
    /// City of the first listing
    pub default_city: String,
    /// Serve the built-in demo catalog instead of calling the service
    pub offline: bool,
}

/// Auditorium layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatingConfig {
    /// Row labels in order (default: `ABCDEFGH`)
    pub rows: String,
    /// Seats per row (default: 10)
    pub seats_per_row: u8,
}

/// Booking flow timings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Seconds the confirmation stays up before returning to browsing (0 disables)
    pub confirmation_hold_secs: u64,
    /// Simulated payment latency in milliseconds
    pub payment_latency_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            catalog: CatalogConfig {
                base_url: lookup("BOXOFFICE_API_BASE_URL")
                    .unwrap_or_else(|| "http://localhost:8000/api/v1".to_string()),
                fallback_token: lookup("BOXOFFICE_FALLBACK_TOKEN")
                    .unwrap_or_else(|| DEFAULT_FALLBACK_TOKEN.to_string()),
                default_category: parsed(&lookup, "BOXOFFICE_DEFAULT_CATEGORY").unwrap_or_default(),
                default_city: lookup("BOXOFFICE_DEFAULT_CITY")
                    .filter(|city| !city.trim().is_empty())
                    .unwrap_or_else(|| "Bangalore".to_string()),
                offline: lookup("BOXOFFICE_OFFLINE").is_some_and(|v| is_truthy(&v)),
            },
            seating: SeatingConfig {
                rows: lookup("BOXOFFICE_SEAT_ROWS")
                    .filter(|rows| rows.chars().any(|c| c.is_ascii_alphabetic()))
                    .unwrap_or_else(|| DEFAULT_ROWS.iter().collect()),
                seats_per_row: parsed(&lookup, "BOXOFFICE_SEATS_PER_ROW")
                    .filter(|&n: &u8| n > 0)
                    .unwrap_or(DEFAULT_SEATS_PER_ROW),
            },
            flow: FlowConfig {
                confirmation_hold_secs: parsed(&lookup, "BOXOFFICE_CONFIRMATION_HOLD_SECS")
                    .unwrap_or(DEFAULT_CONFIRMATION_HOLD.as_secs()),
                payment_latency_ms: parsed(&lookup, "BOXOFFICE_PAYMENT_LATENCY_MS").unwrap_or(0),
            },
        }
    }

    /// Query of the first listing after login
    #[must_use]
    pub fn default_query(&self) -> ShowQuery {
        ShowQuery {
            category: self.catalog.default_category,
            city: self.catalog.default_city.clone(),
        }
    }

    /// Seat grid described by the seating configuration
    #[must_use]
    pub fn seat_grid(&self) -> SeatGrid {
        SeatGrid::new(self.seating.rows.chars(), self.seating.seats_per_row)
    }

    /// Confirmation hold, `None` when disabled
    #[must_use]
    pub const fn confirmation_hold(&self) -> Option<Duration> {
        match self.flow.confirmation_hold_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Simulated payment latency
    #[must_use]
    pub const fn payment_latency(&self) -> Duration {
        Duration::from_millis(self.flow.payment_latency_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|s| s.trim().parse().ok())
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.catalog.base_url, "http://localhost:8000/api/v1");
        assert_eq!(config.catalog.fallback_token, "demo-user");
        assert_eq!(config.default_query().category, Category::All);
        assert_eq!(config.default_query().city, "Bangalore");
        assert!(!config.catalog.offline);
        assert_eq!(config.seat_grid(), SeatGrid::default());
        assert_eq!(config.confirmation_hold(), Some(Duration::from_secs(3)));
        assert_eq!(config.payment_latency(), Duration::ZERO);
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("BOXOFFICE_DEFAULT_CATEGORY", "Movie"),
            ("BOXOFFICE_DEFAULT_CITY", "Mumbai"),
            ("BOXOFFICE_SEAT_ROWS", "abc"),
            ("BOXOFFICE_SEATS_PER_ROW", "4"),
            ("BOXOFFICE_CONFIRMATION_HOLD_SECS", "0"),
            ("BOXOFFICE_OFFLINE", "true"),
        ]);
        assert_eq!(config.default_query().category, Category::Movie);
        assert_eq!(config.default_query().city, "Mumbai");
        assert_eq!(config.seat_grid().capacity(), 12);
        assert_eq!(config.confirmation_hold(), None);
        assert!(config.catalog.offline);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config(&[
            ("BOXOFFICE_DEFAULT_CATEGORY", "opera"),
            ("BOXOFFICE_SEATS_PER_ROW", "0"),
            ("BOXOFFICE_CONFIRMATION_HOLD_SECS", "soon"),
            ("BOXOFFICE_SEAT_ROWS", "123"),
        ]);
        assert_eq!(config.catalog.default_category, Category::All);
        assert_eq!(config.seating.seats_per_row, DEFAULT_SEATS_PER_ROW);
        assert_eq!(config.seating.rows, "ABCDEFGH");
        assert_eq!(config.confirmation_hold(), Some(Duration::from_secs(3)));
    }
}
