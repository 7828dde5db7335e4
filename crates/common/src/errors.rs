use hyper::{Response, StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::http::{json_response, ResponseBody};

// -----------------------------------------------------------------------------
// Review pipeline errors
// -----------------------------------------------------------------------------
// The Display text of each variant is the caller-visible message. Anything
// diagnostic (decode errors, upstream bodies, network reasons) lives in the
// variant payload and is only reachable through `detail()` for logging.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("服务器未配置 SILICONFLOW_API_KEY 环境变量")]
    ServerMisconfigured,

    #[error("请求格式错误")]
    MalformedRequest(String),

    #[error("请提供新闻稿内容")]
    EmptyArticle,

    #[error("新闻稿内容过短，请至少提供20个字符")]
    ArticleTooShort,

    #[error("无法连接AI服务，请检查网络")]
    UpstreamUnreachable(String),

    #[error("AI服务返回错误 ({status})，请稍后重试")]
    UpstreamError { status: u16, body: String },

    #[error("AI返回的数据格式异常，请重试")]
    UpstreamMalformed(String),
}

impl ReviewError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReviewError::ServerMisconfigured | ReviewError::UpstreamMalformed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ReviewError::MalformedRequest(_)
            | ReviewError::EmptyArticle
            | ReviewError::ArticleTooShort => StatusCode::BAD_REQUEST,
            ReviewError::UpstreamUnreachable(_) | ReviewError::UpstreamError { .. } => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    /// Server-side detail for the log line. Never sent to the caller.
    pub fn detail(&self) -> Option<String> {
        match self {
            ReviewError::MalformedRequest(reason)
            | ReviewError::UpstreamUnreachable(reason)
            | ReviewError::UpstreamMalformed(reason) => Some(reason.clone()),
            ReviewError::UpstreamError { status, body } => Some(format!("{}: {}", status, body)),
            ReviewError::ServerMisconfigured
            | ReviewError::EmptyArticle
            | ReviewError::ArticleTooShort => None,
        }
    }

    pub fn into_response(self) -> Response<ResponseBody> {
        json_response(self.status_code(), &json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;

    async fn body_json(response: Response<ResponseBody>) -> serde_json::Value {
        let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ReviewError::ServerMisconfigured, 500),
            (ReviewError::MalformedRequest("eof".to_string()), 400),
            (ReviewError::EmptyArticle, 400),
            (ReviewError::ArticleTooShort, 400),
            (ReviewError::UpstreamUnreachable("refused".to_string()), 502),
            (
                ReviewError::UpstreamError {
                    status: 429,
                    body: "slow down".to_string(),
                },
                502,
            ),
            (ReviewError::UpstreamMalformed("eof".to_string()), 500),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status_code().as_u16(), expected, "{:?}", err);
        }
    }

    #[tokio::test]
    async fn test_upstream_error_hides_upstream_body() {
        let err = ReviewError::UpstreamError {
            status: 429,
            body: "{\"message\":\"rate limited for key sk-abc\"}".to_string(),
        };
        assert_eq!(err.detail().unwrap(), "429: {\"message\":\"rate limited for key sk-abc\"}");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_json(response).await;
        assert_eq!(body, json!({"error": "AI服务返回错误 (429)，请稍后重试"}));
    }

    #[tokio::test]
    async fn test_malformed_request_hides_decode_error() {
        let err = ReviewError::MalformedRequest("expected value at line 1 column 1".to_string());
        let body = body_json(err.into_response()).await;
        assert_eq!(body, json!({"error": "请求格式错误"}));
    }

    #[tokio::test]
    async fn test_misconfiguration_response() {
        let err = ReviewError::ServerMisconfigured;
        assert!(err.detail().is_none());

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "*"
        );
    }
}
