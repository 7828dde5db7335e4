pub mod client;
pub mod normalizer;
pub mod prompt;
pub mod schema;
pub mod validator;

use common::configuration::UpstreamConfig;
use common::errors::ReviewError;
use serde_json::Value;
use tracing::info;

use self::client::UpstreamClient;

/// Runs one article through validation, prompt construction, the upstream
/// call and reply normalization. Holds no per-request state.
pub struct ReviewService {
    client: UpstreamClient,
}

impl ReviewService {
    pub fn new(client: UpstreamClient) -> Self {
        ReviewService { client }
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(UpstreamClient::new(config)?))
    }

    pub async fn review(&self, body: &[u8]) -> Result<Value, ReviewError> {
        let article = validator::validate_article(body)?;
        info!(
            article_chars = article.chars().count(),
            "review requested"
        );

        let request = prompt::build_review_request(&article);
        let envelope = self.client.complete(&request).await?;
        normalizer::normalize(envelope)
    }
}
