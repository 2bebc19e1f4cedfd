//! Client-side search over a fetched listing.

use crate::types::Show;

/// Shows whose title, category or venue contains `query`, ignoring case
///
/// A blank query matches everything. Listing order is preserved.
#[must_use]
pub fn filter_shows<'a>(shows: &'a [Show], query: &str) -> Vec<&'a Show> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return shows.iter().collect();
    }
    shows
        .iter()
        .filter(|show| {
            [&show.title, &show.category, &show.venue_name]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;

    fn titles<'a>(shows: &[&'a Show]) -> Vec<&'a str> {
        shows.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn blank_query_keeps_everything() {
        let shows = StaticCatalog::demo().shows().to_vec();
        assert_eq!(filter_shows(&shows, "   ").len(), shows.len());
    }

    #[test]
    fn matches_title_category_and_venue() {
        let shows = StaticCatalog::demo().shows().to_vec();

        assert_eq!(titles(&filter_shows(&shows, "JAZZ")), ["Jazz Night"]);
        assert_eq!(filter_shows(&shows, "movie").len(), 2);
        assert_eq!(titles(&filter_shows(&shows, "arena")), ["Rock Concert"]);
        assert!(filter_shows(&shows, "opera").is_empty());
    }
}
