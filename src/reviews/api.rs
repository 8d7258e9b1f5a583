use async_trait::async_trait;
use reqwest::Client;
use serde::{
    de::DeserializeOwned,
    Deserialize,
};

use super::{
    Review,
    ReviewsClient,
};
use crate::core::{
    http::ensure_success,
    Coordinate,
    TaberuError,
};

pub const DEFAULT_REVIEWS_URL: &str = "https://api.yelp.com/v3";

#[derive(Debug, Deserialize)]
pub struct Business {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub businesses: Vec<Business>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewsResponse {
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// Parameters of the name-resolution search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub radius_m: u32,
    pub limit: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { radius_m: 5000, limit: 1 }
    }
}

/// Yelp Fusion style reviews API: business search plus per-business reviews.
pub struct HttpReviewsClient {
    client: Client,
    base_url: String,
    api_key: String,
    options: SearchOptions,
}

impl HttpReviewsClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        options: SearchOptions,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            options,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TaberuError> {
        let url = format!("{}{}", self.base_url, path);
        let resp =
            self.client.get(&url).bearer_auth(&self.api_key).query(query).send().await?;
        Ok(ensure_success(resp)?.json().await?)
    }
}

#[async_trait]
impl ReviewsClient for HttpReviewsClient {
    async fn resolve_business(
        &self,
        name: &str,
        at: Coordinate,
    ) -> Result<Option<String>, TaberuError> {
        let query = [
            ("term", name.to_string()),
            ("radius", self.options.radius_m.to_string()),
            ("latitude", at.latitude.to_string()),
            ("longitude", at.longitude.to_string()),
            ("sort_by", "distance".to_string()),
            ("limit", self.options.limit.to_string()),
        ];
        let response: SearchResponse = self.get_json("/businesses/search", &query).await?;
        Ok(first_business_id(response))
    }

    async fn fetch_reviews(&self, business_id: &str) -> Result<Vec<Review>, TaberuError> {
        let response: ReviewsResponse =
            self.get_json(&format!("/businesses/{business_id}/reviews"), &[]).await?;
        Ok(response.reviews)
    }
}

/// Results are sorted by distance, so the first hit is the closest match.
fn first_business_id(response: SearchResponse) -> Option<String> {
    if response.total == 0 {
        return None;
    }
    response.businesses.into_iter().next().map(|business| business.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_picks_closest() {
        let json = r#"{
            "total": 12,
            "businesses": [
                {"id": "qdoba-denver-3", "name": "Qdoba", "distance": 120.5},
                {"id": "qdoba-denver-7", "name": "Qdoba", "distance": 900.1}
            ],
            "region": {"center": {"latitude": 39.7, "longitude": -104.9}}
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(first_business_id(response), Some("qdoba-denver-3".to_string()));
    }

    #[test]
    fn test_search_response_empty() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"total": 0, "businesses": []}"#).unwrap();
        assert_eq!(first_business_id(response), None);

        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(first_business_id(response), None);
    }

    #[test]
    fn test_reviews_response_parsing() {
        let json = r#"{
            "reviews": [
                {"id": "r1", "rating": 5, "text": "Best burrito downtown", "user": {"name": "A"}},
                {"id": "r2", "rating": 1, "text": "Waited an hour"},
                {"id": "r3", "rating": 3.5, "text": "Fine for lunch"}
            ],
            "total": 230
        }"#;
        let response: ReviewsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.reviews.len(), 3);
        assert_eq!(response.reviews[0].rating, 5.0);
        assert_eq!(response.reviews[2].rating, 3.5);
        assert_eq!(response.reviews[1].text, "Waited an hour");
    }
}
