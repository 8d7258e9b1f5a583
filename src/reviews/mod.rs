use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::core::{
    Candidate,
    Coordinate,
    Enrichment,
    ReviewPair,
    TaberuError,
};

pub mod api;

pub use api::{
    HttpReviewsClient,
    SearchOptions,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Review {
    pub rating: f32,
    #[serde(default)]
    pub text: String,
}

impl Review {
    pub fn new(rating: f32, text: impl Into<String>) -> Self {
        Self { rating, text: text.into() }
    }
}

#[async_trait]
pub trait ReviewsClient: Send + Sync {
    /// Turns a place name near `at` into the provider's business id.
    async fn resolve_business(
        &self,
        name: &str,
        at: Coordinate,
    ) -> Result<Option<String>, TaberuError>;

    async fn fetch_reviews(&self, business_id: &str) -> Result<Vec<Review>, TaberuError>;
}

/// Picks the highest rated review as positive and the lowest as negative in a
/// single pass. Ties go to the later review for the maximum and to the earlier
/// one for the minimum.
pub fn select_reviews(reviews: &[Review]) -> ReviewPair {
    let mut best: Option<&Review> = None;
    let mut worst: Option<&Review> = None;

    for review in reviews {
        if worst.map_or(true, |current| review.rating < current.rating) {
            worst = Some(review);
        }
        if best.map_or(true, |current| review.rating >= current.rating) {
            best = Some(review);
        }
    }

    ReviewPair {
        positive: best.map(|review| review.text.clone()),
        negative: worst.map(|review| review.text.clone()),
    }
}

/// Resolves the candidate's business id, then fetches and condenses its reviews.
pub async fn enrich(
    client: &dyn ReviewsClient,
    candidate: &Candidate,
    at: Coordinate,
) -> Result<Enrichment, TaberuError> {
    let name = candidate.display_name();
    if name.is_empty() {
        return Err(TaberuError::EmptyResultSet("unnamed candidate".to_string()));
    }

    let failed = |e: TaberuError| TaberuError::EnrichmentFailed {
        name: name.to_string(),
        reason: e.to_string(),
    };

    let external_id = client
        .resolve_business(name, at)
        .await
        .map_err(failed)?
        .ok_or_else(|| TaberuError::EmptyResultSet(name.to_string()))?;

    let reviews = client.fetch_reviews(&external_id).await.map_err(failed)?;
    debug!(name, %external_id, count = reviews.len(), "Fetched reviews");

    Ok(Enrichment { external_id, reviews: select_reviews(&reviews) })
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::Mutex,
    };

    use super::*;

    fn reviews(ratings: &[f32]) -> Vec<Review> {
        ratings.iter().enumerate().map(|(i, r)| Review::new(*r, format!("review {i}"))).collect()
    }

    #[test]
    fn test_select_reviews_tie_break() {
        let pair = select_reviews(&reviews(&[3.0, 5.0, 1.0, 5.0]));
        assert_eq!(pair.positive.as_deref(), Some("review 3"));
        assert_eq!(pair.negative.as_deref(), Some("review 2"));

        let pair = select_reviews(&reviews(&[2.0, 4.0, 2.0, 4.0]));
        assert_eq!(pair.positive.as_deref(), Some("review 3"));
        assert_eq!(pair.negative.as_deref(), Some("review 0"));
    }

    #[test]
    fn test_select_reviews_single_and_empty() {
        let pair = select_reviews(&reviews(&[4.0]));
        assert_eq!(pair.positive.as_deref(), Some("review 0"));
        assert_eq!(pair.negative.as_deref(), Some("review 0"));

        assert_eq!(select_reviews(&[]), ReviewPair::default());
    }

    #[test]
    fn test_select_reviews_fractional_ratings() {
        let pair = select_reviews(&reviews(&[4.5, 4.0, 4.5, 3.5]));
        assert_eq!(pair.positive.as_deref(), Some("review 2"));
        assert_eq!(pair.negative.as_deref(), Some("review 3"));
    }

    struct StubReviews {
        ids: HashMap<String, String>,
        reviews: Vec<Review>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ReviewsClient for StubReviews {
        async fn resolve_business(
            &self,
            name: &str,
            _at: Coordinate,
        ) -> Result<Option<String>, TaberuError> {
            self.calls.lock().unwrap().push(format!("search:{name}"));
            Ok(self.ids.get(name).cloned())
        }

        async fn fetch_reviews(&self, business_id: &str) -> Result<Vec<Review>, TaberuError> {
            self.calls.lock().unwrap().push(format!("reviews:{business_id}"));
            if business_id == "broken" {
                return Err(TaberuError::Http { status: 429, url: "reviews".to_string() });
            }
            Ok(self.reviews.clone())
        }
    }

    fn stub() -> StubReviews {
        StubReviews {
            ids: HashMap::from([
                ("Lazo".to_string(), "lazo-1".to_string()),
                ("Broken".to_string(), "broken".to_string()),
            ]),
            reviews: reviews(&[2.0, 5.0]),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn named(name: &str) -> Candidate {
        Candidate { name: Some(name.to_string()), ..Default::default() }
    }

    #[tokio::test]
    async fn test_enrich_chains_both_calls() {
        let client = stub();
        let enrichment = enrich(&client, &named("Lazo"), Coordinate::new(0.0, 0.0)).await.unwrap();

        assert_eq!(enrichment.external_id, "lazo-1");
        assert_eq!(enrichment.reviews.positive.as_deref(), Some("review 1"));
        assert_eq!(enrichment.reviews.negative.as_deref(), Some("review 0"));
        assert_eq!(*client.calls.lock().unwrap(), vec!["search:Lazo", "reviews:lazo-1"]);
    }

    #[tokio::test]
    async fn test_enrich_without_match_is_empty_result() {
        let client = stub();
        let err = enrich(&client, &named("Nowhere"), Coordinate::new(0.0, 0.0)).await.unwrap_err();

        assert!(matches!(err, TaberuError::EmptyResultSet(_)));
        assert!(err.is_quiet_drop());
        assert_eq!(client.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_enrich_transport_failure() {
        let client = stub();
        let err = enrich(&client, &named("Broken"), Coordinate::new(0.0, 0.0)).await.unwrap_err();
        assert!(matches!(err, TaberuError::EnrichmentFailed { ref name, .. } if name == "Broken"));
    }
}
