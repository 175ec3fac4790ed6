use reqwest::Client;
use serde_json::Value;

use crate::{config::Config, error::FetchError, types::PostsResponse};

pub const POSTS_URL: &str = "https://webapp-blond-beta.vercel.app/api/posts/";

#[derive(Clone)]
pub struct PostsClient {
    client: Client,
    endpoint: String,
}

impl PostsClient {
    pub fn new() -> PostsClient {
        PostsClient::with_endpoint(POSTS_URL)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> PostsClient {
        PostsClient {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// The configured base URL is not part of the request target; it is only reported.
    pub fn from_config(config: &Config) -> PostsClient {
        if let Some(api_url) = &config.api_url {
            tracing::debug!(api_url = %api_url, target = POSTS_URL, "API_URL is set but not used");
        }

        PostsClient::new()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetches the posts collection and returns the body as decoded JSON.
    ///
    /// The response status is not inspected. Whatever the server sends back is decoded
    /// and handed to the caller as is.
    pub async fn fetch_posts(&self) -> Result<PostsResponse, FetchError> {
        tracing::debug!(endpoint = %self.endpoint, "fetching posts");

        let resp = self.client.get(&self.endpoint).send().await?;
        tracing::debug!(status = %resp.status(), "posts response received");

        // JSON is UTF-8 whatever charset the Content-Type claims
        let body = resp.bytes().await?;
        let posts: Value = serde_json::from_slice(&body)?;

        Ok(posts)
    }
}

impl Default for PostsClient {
    fn default() -> Self {
        Self::new()
    }
}
