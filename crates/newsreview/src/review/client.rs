use common::api::open_ai::ChatCompletionsRequest;
use common::configuration::{ApiKey, UpstreamConfig};
use common::errors::ReviewError;
use serde_json::Value;
use tracing::debug;

/// Client for the upstream chat completion endpoint.
///
/// The underlying `reqwest::Client` is built once with the configured proxy
/// and timeout and reused for every request.
pub struct UpstreamClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<ApiKey>,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        // reqwest's own system proxy detection is turned off so that only the
        // proxy resolved by the configuration layer applies.
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .no_proxy();
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        Ok(UpstreamClient {
            client: builder.build()?,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Sends the request and returns the decoded upstream envelope as is.
    pub async fn complete(&self, request: &ChatCompletionsRequest) -> Result<Value, ReviewError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(ReviewError::ServerMisconfigured)?;

        debug!(
            endpoint = %self.endpoint,
            model = %request.model,
            "sending review request upstream"
        );

        let start_time = std::time::Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key.expose())
            .json(request)
            .send()
            .await
            .map_err(|err| ReviewError::UpstreamUnreachable(describe_transport_error(&err)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ReviewError::UpstreamUnreachable(describe_transport_error(&err)))?;

        debug!(
            status = status.as_u16(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "upstream responded"
        );

        if !status.is_success() {
            return Err(ReviewError::UpstreamError {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|err| {
            ReviewError::UpstreamMalformed(format!("upstream envelope is not JSON: {}", err))
        })
    }
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("timed out: {}", err)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    }
}
