use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

pub const SENTINEL_ID: u32 = 0;
pub const SENTINEL_MESSAGE: &str = "Please check your internet connection";
pub const NO_POSITIVE_REVIEW: &str = "No positive reviews found";
pub const NO_NEGATIVE_REVIEW: &str = "No negative reviews found";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Parses the `"lat,long"` form used by the directory API and `TABERU_LOCATION`.
    pub fn parse(value: &str) -> Option<Self> {
        let (lat, long) = value.split_once(',')?;
        let latitude = lat.trim().parse::<f64>().ok()?;
        let longitude = long.trim().parse::<f64>().ok()?;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        Some(Self { latitude, longitude })
    }

    pub fn as_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// A directory record not yet enriched with reviews.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    pub directory_id: Option<String>,
    pub name: Option<String>,
    pub image_ref: Option<String>,
    pub address: Option<String>,
    pub hours_display: Option<String>,
    pub website: Option<String>,
}

impl Candidate {
    /// Key used to spot the same place twice before any reviews call is spent.
    pub fn dedup_key(&self) -> Option<&str> {
        self.directory_id.as_deref().or(self.name.as_deref())
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Best/worst review picked out of one reviews response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewPair {
    pub positive: Option<String>,
    pub negative: Option<String>,
}

/// Output of a completed enrichment: the reviews-provider id and its review pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub external_id: String,
    pub reviews: ReviewPair,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: u32,
    pub external_id: Option<String>,
    pub directory_id: Option<String>,
    pub name: Option<String>,
    pub image_ref: Option<String>,
    pub website: Option<String>,
    pub hours_display: Option<String>,
    pub address: Option<String>,
    pub positive_review: String,
    pub negative_review: String,
    pub renderable: bool,
}

impl Card {
    pub fn sentinel(image_ref: Option<String>) -> Self {
        Self {
            id: SENTINEL_ID,
            external_id: None,
            directory_id: None,
            name: None,
            image_ref,
            website: None,
            hours_display: None,
            address: None,
            positive_review: SENTINEL_MESSAGE.to_string(),
            negative_review: String::new(),
            renderable: true,
        }
    }

    pub fn from_enrichment(id: u32, candidate: Candidate, enrichment: Enrichment) -> Self {
        Self {
            id,
            external_id: Some(enrichment.external_id),
            directory_id: candidate.directory_id,
            name: candidate.name,
            image_ref: candidate.image_ref,
            website: candidate.website,
            hours_display: candidate.hours_display,
            address: candidate.address,
            positive_review: enrichment
                .reviews
                .positive
                .unwrap_or_else(|| NO_POSITIVE_REVIEW.to_string()),
            negative_review: enrichment
                .reviews
                .negative
                .unwrap_or_else(|| NO_NEGATIVE_REVIEW.to_string()),
            renderable: true,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.id == SENTINEL_ID
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// An accepted card as kept by the suggestions listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: Option<String>,
    pub image_ref: Option<String>,
    pub website: Option<String>,
    pub hours_display: Option<String>,
    pub address: Option<String>,
    pub accepted_at: DateTime<Utc>,
}

impl Suggestion {
    pub fn from_card(card: &Card) -> Self {
        Self {
            name: card.name.clone(),
            image_ref: card.image_ref.clone(),
            website: card.website.clone(),
            hours_display: card.hours_display.clone(),
            address: card.address.clone(),
            accepted_at: Utc::now(),
        }
    }
}
