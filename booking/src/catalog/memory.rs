//! In-memory catalog.
//!
//! Serves a fixed list of shows through the [`CatalogClient`] contract. Used
//! by tests and by the demo binary when no catalog service is available.

use super::client::CatalogClient;
use crate::error::{BookingError, Result};
use crate::types::{Category, EventId, Price, Show, ShowDetail, ShowId, ShowQuery, Venue};
use chrono::{DateTime, Duration, TimeZone, Utc};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Catalog backed by a fixed list of shows
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    shows: Vec<Show>,
    details: HashMap<ShowId, ShowDetail>,
    failure: Option<BookingError>,
    tokens: Arc<Mutex<Vec<String>>>,
}

impl StaticCatalog {
    /// Creates a catalog listing `shows`, with no detail records
    #[must_use]
    pub fn new(shows: Vec<Show>) -> Self {
        Self {
            shows,
            ..Self::default()
        }
    }

    /// Adds the detail record served for `detail.id`
    #[must_use]
    pub fn with_detail(mut self, detail: ShowDetail) -> Self {
        self.details.insert(detail.id, detail);
        self
    }

    /// Makes every call fail with `error`
    #[must_use]
    pub fn fail_with(mut self, error: BookingError) -> Self {
        self.failure = Some(error);
        self
    }

    /// The demo listing: six shows across Bangalore and Mumbai
    #[must_use]
    pub fn demo() -> Self {
        let entries = [
            (1, Category::Concert, "Rock Concert", "Palace Grounds Arena", "Bangalore", 85, (2, 15, 19, 0)),
            (2, Category::Movie, "The Long Night", "PVR Orion Mall", "Bangalore", 45, (2, 20, 20, 0)),
            (3, Category::Concert, "Symphony Under the Stars", "NCPA Theatre", "Mumbai", 120, (3, 1, 18, 30)),
            (4, Category::Movie, "Championship Replay", "INOX Nariman Point", "Mumbai", 95, (3, 10, 17, 0)),
            (5, Category::Concert, "Jazz Night", "Blue Note", "Mumbai", 65, (3, 15, 19, 30)),
            (6, Category::Concert, "Indie Folk Evening", "Windmills Craftworks", "Bangalore", 30, (3, 20, 10, 0)),
        ];

        let mut catalog = Self::default();
        for (id, category, title, venue, city, price, (month, day, hour, minute)) in entries {
            let starts_at = Utc
                .with_ymd_and_hms(2026, month, day, hour, minute, 0)
                .single()
                .unwrap_or_default();
            let show = demo_show(id, category, title, venue, city, price, starts_at);
            catalog.details.insert(show.id, demo_detail(&show));
            catalog.shows.push(show);
        }
        catalog
    }

    /// Every show, regardless of query
    #[must_use]
    pub fn shows(&self) -> &[Show] {
        &self.shows
    }

    /// Bearer tokens received so far, in call order
    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().map(|t| t.clone()).unwrap_or_default()
    }

    fn record(&self, token: &str) {
        if let Ok(mut tokens) = self.tokens.lock() {
            tokens.push(token.to_string());
        }
    }
}

fn demo_show(
    id: u64,
    category: Category,
    title: &str,
    venue: &str,
    city: &str,
    price: u64,
    starts_at: DateTime<Utc>,
) -> Show {
    let event_id = EventId::new(100 + id);
    Show {
        id: ShowId::new(id),
        event_id,
        title: title.to_string(),
        category: category.as_str().to_string(),
        venue_name: venue.to_string(),
        city: city.to_string(),
        starts_at,
        ends_at: starts_at + Duration::hours(3),
        price: Price::new(price, "INR"),
        image: super::event_image_path(event_id),
    }
}

fn demo_detail(show: &Show) -> ShowDetail {
    let (language, genre) = if show.category == Category::Movie.as_str() {
        ("Hindi", "Drama")
    } else {
        ("English", "Live music")
    };
    ShowDetail {
        id: show.id,
        event_id: show.event_id,
        title: show.title.clone(),
        category: show.category.clone(),
        starts_at: show.starts_at,
        ends_at: show.ends_at,
        status: "scheduled".to_string(),
        duration_minutes: 180,
        language: language.to_string(),
        genre: genre.to_string(),
        venue: Venue {
            id: show.id.get(),
            name: show.venue_name.clone(),
            location: "City centre".to_string(),
            address: format!("1 Main Road, {}", show.city),
            city: show.city.clone(),
            country: "India".to_string(),
            pincode: if show.city == "Mumbai" { "400001" } else { "560001" }.to_string(),
        },
    }
}

impl CatalogClient for StaticCatalog {
    fn list_shows(&self, query: &ShowQuery, token: &str) -> BoxFuture<'static, Result<Vec<Show>>> {
        self.record(token);
        let result = match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(self
                .shows
                .iter()
                .filter(|show| {
                    query.category == Category::All
                        || show.category.eq_ignore_ascii_case(query.category.as_str())
                })
                .filter(|show| show.city.eq_ignore_ascii_case(&query.city))
                .cloned()
                .collect()),
        };
        futures::future::ready(result).boxed()
    }

    fn show_detail(&self, show_id: ShowId, token: &str) -> BoxFuture<'static, Result<ShowDetail>> {
        self.record(token);
        let result = match &self.failure {
            Some(error) => Err(error.clone()),
            None => self
                .details
                .get(&show_id)
                .cloned()
                .ok_or(BookingError::NotFound(show_id)),
        };
        futures::future::ready(result).boxed()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn query(category: Category, city: &str) -> ShowQuery {
        ShowQuery {
            category,
            city: city.to_string(),
        }
    }

    #[tokio::test]
    async fn filters_by_category_and_city() {
        let catalog = StaticCatalog::demo();

        let all = catalog.list_shows(&query(Category::All, "mumbai"), "t").await.unwrap();
        assert_eq!(all.len(), 3);

        let movies = catalog
            .list_shows(&query(Category::Movie, "Bangalore"), "t")
            .await
            .unwrap();
        let titles: Vec<&str> = movies.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["The Long Night"]);
    }

    #[tokio::test]
    async fn unknown_show_is_not_found() {
        let catalog = StaticCatalog::demo();
        let error = catalog.show_detail(ShowId::new(99), "t").await.unwrap_err();
        assert_eq!(error, BookingError::NotFound(ShowId::new(99)));
    }

    #[tokio::test]
    async fn records_tokens_and_fails_on_demand() {
        let catalog = StaticCatalog::demo().fail_with(BookingError::from_status(500, "down"));

        let error = catalog.show_detail(ShowId::new(1), "demo-user").await.unwrap_err();
        assert_eq!(error.to_string(), "down");
        assert_eq!(catalog.tokens(), ["demo-user"]);
    }

    #[test]
    fn demo_details_match_shows() {
        let catalog = StaticCatalog::demo();
        for show in catalog.shows() {
            let detail = catalog.details.get(&show.id).unwrap();
            assert_eq!(detail.title, show.title);
            assert_eq!(detail.venue.city, show.city);
        }
    }
}
