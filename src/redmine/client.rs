// Redmine API HTTP client.
// Handles api-key authentication and request/response processing.

use std::time::Duration;

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderName, HeaderValue, USER_AGENT},
};
use tracing::debug;
use url::Url;

use crate::error::{Result, WorkflowError};

const API_KEY_HEADER: &str = "x-redmine-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Redmine REST client bound to one server.
pub struct RedmineClient {
    client: Client,
    base_url: String,
}

impl RedmineClient {
    /// Create a client for the server at `url`, authenticated with `api_key`.
    pub fn new(url: &str, api_key: &str) -> Result<Self> {
        Url::parse(url)?;

        let mut headers = HeaderMap::new();

        let mut key =
            HeaderValue::from_str(api_key).map_err(|e| WorkflowError::Other(e.to_string()))?;
        key.set_sensitive(true);
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("redmine-workflow"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(WorkflowError::Api)?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request to the Redmine API.
    pub async fn get(&self, endpoint: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), endpoint);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await.map_err(WorkflowError::Api)?;

        self.check_response(response).await
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), endpoint);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(WorkflowError::Api)?;

        self.check_response(response).await
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(WorkflowError::Unauthorized),
            StatusCode::NOT_FOUND => {
                let url = response.url().to_string();
                Err(WorkflowError::NotFound(url))
            }
            status => Err(WorkflowError::Other(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            ))),
        }
    }
}
