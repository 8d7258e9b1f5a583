use reqwest::{
    Client,
    Response,
};

use crate::core::TaberuError;

const CLIENT_USER_AGENT: &str = "taberu/0.1 (+reqwest)";

/// Shared async client for the directory and reviews APIs.
///
/// No request timeout is configured: a hung call keeps its enrichment slot.
pub fn http_client() -> Result<Client, TaberuError> {
    Client::builder()
        .user_agent(CLIENT_USER_AGENT)
        .build()
        .map_err(|e| TaberuError::Custom(format!("HTTP client build failed: {e}")))
}

pub fn ensure_success(resp: Response) -> Result<Response, TaberuError> {
    if !resp.status().is_success() {
        return Err(TaberuError::Http {
            status: resp.status().as_u16(),
            url: resp.url().to_string(),
        });
    }
    Ok(resp)
}
