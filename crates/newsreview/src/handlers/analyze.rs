use std::error::Error as StdError;

use bytes::Bytes;
use common::consts::MAX_REQUEST_BODY_BYTES;
use common::errors::ReviewError;
use common::http::ResponseBody;
use http_body_util::{BodyExt, Limited};
use hyper::body::Body;
use hyper::{Request, Response};
use tracing::{info, warn};

use crate::handlers::response_handler::ResponseHandler;
use crate::review::ReviewService;

/// `POST /api/analyze`. Always produces a response; every pipeline failure is
/// turned into its status and message here and its detail logged.
pub async fn analyze<B>(request: Request<B>, service: &ReviewService) -> Response<ResponseBody>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let body = Limited::new(request.into_body(), MAX_REQUEST_BODY_BYTES);
    let outcome = match body.collect().await {
        Ok(collected) => service.review(&collected.to_bytes()).await,
        Err(err) => Err(ReviewError::MalformedRequest(format!(
            "failed to read request body: {}",
            err
        ))),
    };

    match &outcome {
        Ok(_) => info!("review completed"),
        Err(err) => log_failure(err),
    }

    ResponseHandler::review_outcome(outcome)
}

fn log_failure(err: &ReviewError) {
    let status = err.status_code().as_u16();
    let detail = err.detail().unwrap_or_default();
    match err {
        ReviewError::ServerMisconfigured => {
            warn!(status, "SILICONFLOW_API_KEY is not configured, rejecting review")
        }
        ReviewError::UpstreamUnreachable(_) => {
            warn!(status, reason = %detail, "network error reaching upstream")
        }
        ReviewError::UpstreamError {
            status: upstream_status,
            body,
        } => warn!(
            status,
            upstream_status = *upstream_status,
            upstream_body = %body,
            "upstream returned an error"
        ),
        ReviewError::UpstreamMalformed(_) => {
            warn!(status, reason = %detail, "failed to parse upstream reply")
        }
        ReviewError::MalformedRequest(_)
        | ReviewError::EmptyArticle
        | ReviewError::ArticleTooShort => {
            info!(status, error = %err, reason = %detail, "rejected review request")
        }
    }
}
