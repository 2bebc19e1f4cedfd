//! Catalog client contract and its HTTP implementation.

use super::wire::{ShowDetailWire, ShowSummaryWire};
use crate::error::{BookingError, Result};
use crate::types::{Show, ShowDetail, ShowId, ShowQuery};
use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::{Client, StatusCode, header};
use serde::de::DeserializeOwned;
use tracing::Instrument;

/// Read-only queries against the show catalog
///
/// Exactly one attempt per call; callers decide whether to re-issue a failed
/// request.
///
/// Returns `BoxFuture` so the trait stays object-safe and the futures can be
/// moved into effects.
pub trait CatalogClient: Send + Sync {
    /// Lists the shows matching `query`
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Network`] on transport failure, a non-2xx
    /// status or an unreadable body.
    fn list_shows(&self, query: &ShowQuery, token: &str) -> BoxFuture<'static, Result<Vec<Show>>>;

    /// Fetches the full record of one show
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NotFound`] when the catalog does not know the
    /// id, otherwise the same failures as [`CatalogClient::list_shows`].
    fn show_detail(&self, show_id: ShowId, token: &str) -> BoxFuture<'static, Result<ShowDetail>>;
}

/// Catalog client backed by the REST service
#[derive(Clone, Debug)]
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
}

impl HttpCatalogClient {
    /// Creates a client for `base_url` (e.g. `http://localhost:8000/api/v1`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a client reusing an existing connection pool
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Service root the client was built with
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Outcome of a single request before decoding
enum Fetched<T> {
    Body(T),
    /// 404 with whatever body the service sent
    NotFound(String),
}

async fn fetch_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<Fetched<T>> {
    let response = request
        .header(header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(BookingError::transport)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            return Ok(Fetched::NotFound(body));
        }
        return Err(BookingError::from_status(status.as_u16(), &body));
    }

    response
        .json::<T>()
        .await
        .map(Fetched::Body)
        .map_err(|e| BookingError::Network {
            status: Some(status.as_u16()),
            message: format!("Invalid response body: {e}"),
        })
}

impl CatalogClient for HttpCatalogClient {
    fn list_shows(&self, query: &ShowQuery, token: &str) -> BoxFuture<'static, Result<Vec<Show>>> {
        let request = self
            .client
            .get(format!("{}/show", self.base_url))
            .query(&[
                ("category", query.category.as_str()),
                ("city", query.city.as_str()),
            ])
            .bearer_auth(token);
        let span = tracing::info_span!(
            "catalog_list_shows",
            category = %query.category,
            city = %query.city
        );

        async move {
            let wire: Vec<ShowSummaryWire> = match fetch_json(request).await? {
                Fetched::Body(wire) => wire,
                // A missing listing endpoint is a service fault, not an unknown show
                Fetched::NotFound(body) => {
                    return Err(BookingError::from_status(StatusCode::NOT_FOUND.as_u16(), &body));
                }
            };
            let shows = wire
                .into_iter()
                .map(Show::try_from)
                .collect::<Result<Vec<_>>>()?;
            tracing::debug!(count = shows.len(), "Catalog listing received");
            Ok(shows)
        }
        .instrument(span)
        .boxed()
    }

    fn show_detail(&self, show_id: ShowId, token: &str) -> BoxFuture<'static, Result<ShowDetail>> {
        let request = self
            .client
            .get(format!("{}/show/{show_id}", self.base_url))
            .bearer_auth(token);
        let span = tracing::info_span!("catalog_show_detail", show_id = %show_id);

        async move {
            match fetch_json::<ShowDetailWire>(request).await? {
                Fetched::Body(wire) => ShowDetail::try_from(wire),
                Fetched::NotFound(_) => {
                    tracing::warn!("Catalog reported show as unknown");
                    Err(BookingError::NotFound(show_id))
                }
            }
        }
        .instrument(span)
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = HttpCatalogClient::new("http://localhost:8000/api/v1/");
        assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
    }
}
