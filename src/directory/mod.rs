use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::core::{
    http::ensure_success,
    Candidate,
    Coordinate,
    TaberuError,
};

pub const DEFAULT_DIRECTORY_URL: &str = "http://localhost:8080";

#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Places near `at`, in the order the directory ranks them.
    async fn nearby(&self, at: Coordinate) -> Result<Vec<Candidate>, TaberuError>;
}

#[derive(Debug, Default, Deserialize)]
pub struct Hours {
    pub display: Option<String>,
}

/// One entry of the `/local` response.
#[derive(Debug, Default, Deserialize)]
pub struct PlaceRecord {
    pub name: Option<String>,
    pub fsid: Option<String>,
    pub img: Option<String>,
    pub address: Option<String>,
    pub hours: Option<Hours>,
    pub website: Option<String>,
}

impl From<PlaceRecord> for Candidate {
    fn from(record: PlaceRecord) -> Self {
        Candidate {
            directory_id: record.fsid,
            name: record.name,
            image_ref: record.img,
            address: record.address,
            hours_display: record.hours.and_then(|hours| hours.display),
            website: record.website,
        }
    }
}

pub struct HttpDirectoryClient {
    client: Client,
    base_url: String,
}

impl HttpDirectoryClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into().trim_end_matches('/').to_string() }
    }
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn nearby(&self, at: Coordinate) -> Result<Vec<Candidate>, TaberuError> {
        let url = format!("{}/local", self.base_url);
        let resp = self.client.get(&url).query(&[("ll", at.as_query())]).send().await?;
        let records: Vec<PlaceRecord> = ensure_success(resp)?.json().await?;
        Ok(records.into_iter().map(Candidate::from).collect())
    }
}
