use serde::{
    Deserialize,
    Serialize,
};
use tracing::warn;

use crate::{
    core::{
        swipe::DEFAULT_THRESHOLD,
        Coordinate,
        EnrichmentCaps,
    },
    directory::DEFAULT_DIRECTORY_URL,
    persistence::{
        data_file_exists,
        load_json_or_default,
        save_json,
    },
    reviews::{
        api::DEFAULT_REVIEWS_URL,
        SearchOptions,
    },
};

pub const SETTINGS_FILE: &str = "settings.json";

const ENV_API_KEY: &str = "TABERU_REVIEWS_API_KEY";
const ENV_LOCATION: &str = "TABERU_LOCATION";
const ENV_DIRECTORY_URL: &str = "TABERU_DIRECTORY_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub directory_url: String,
    pub reviews_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews_api_key: Option<String>,
    pub location: Option<Coordinate>,
    pub search_radius_m: u32,
    pub search_limit: u32,
    pub render_cap: usize,
    pub session_cap: usize,
    pub swipe_threshold: f32,
    pub viewport_width: f32,
    pub sentinel_image: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let caps = EnrichmentCaps::default();
        let search = SearchOptions::default();
        Self {
            directory_url: DEFAULT_DIRECTORY_URL.to_string(),
            reviews_url: DEFAULT_REVIEWS_URL.to_string(),
            reviews_api_key: None,
            location: None,
            search_radius_m: search.radius_m,
            search_limit: search.limit,
            render_cap: caps.render_cap,
            session_cap: caps.session_cap,
            swipe_threshold: DEFAULT_THRESHOLD,
            viewport_width: 360.0,
            sentinel_image: None,
        }
    }
}

impl Settings {
    /// Settings file from the data directory (written with defaults on first
    /// run), then environment overrides.
    pub fn load() -> Self {
        if !data_file_exists(SETTINGS_FILE) {
            if let Err(e) = save_json(&Settings::default(), SETTINGS_FILE) {
                warn!(error = %e, "Could not write default settings");
            }
        }
        let mut settings = load_json_or_default::<Settings>(SETTINGS_FILE);
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(ENV_API_KEY).filter(|key| !key.trim().is_empty()) {
            self.reviews_api_key = Some(key.trim().to_string());
        }

        if let Some(raw) = lookup(ENV_LOCATION) {
            match Coordinate::parse(&raw) {
                Some(location) => self.location = Some(location),
                None => warn!(value = %raw, "Ignoring malformed TABERU_LOCATION"),
            }
        }

        if let Some(url) = lookup(ENV_DIRECTORY_URL) {
            self.directory_url = url;
        }
    }

    pub fn caps(&self) -> EnrichmentCaps {
        EnrichmentCaps { render_cap: self.render_cap, session_cap: self.session_cap }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions { radius_m: self.search_radius_m, limit: self.search_limit }
    }
}
