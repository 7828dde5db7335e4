pub const ANALYZE_PATH: &str = "/api/analyze";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub const API_KEY_ENV: &str = "SILICONFLOW_API_KEY";
pub const BIND_ADDRESS_ENV: &str = "BIND_ADDRESS";
pub const CONFIG_PATH_ENV: &str = "NEWSREVIEW_CONFIG_PATH";

/// Proxy variables in lookup precedence order. The first non-empty one wins.
pub const PROXY_ENV_VARS: [&str; 4] = ["https_proxy", "HTTPS_PROXY", "http_proxy", "HTTP_PROXY"];

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_DOCUMENT_ROOT: &str = "./public";
pub const DEFAULT_UPSTREAM_ENDPOINT: &str = "https://api.siliconflow.cn/v1/chat/completions";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

pub const REVIEW_MODEL_NAME: &str = "deepseek-ai/DeepSeek-V3";
pub const MIN_ARTICLE_CHARS: usize = 20;
/// Upper bound on an inbound `/api/analyze` body.
pub const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "POST, GET, OPTIONS";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type";
