pub mod analyze;
pub mod response_handler;
pub mod static_files;


use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use common::consts::{ANALYZE_PATH, REQUEST_ID_HEADER};
use common::http::ResponseBody;
use hyper::body::Body;
use hyper::{Method, Request, Response};
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::handlers::analyze::analyze;
use crate::handlers::response_handler::ResponseHandler;
use crate::handlers::static_files::serve_static;
use crate::AppState;

/// Dispatches one request. Never fails: every outcome, including pipeline
/// errors, is already an HTTP response when it leaves here.
pub async fn route<B>(
    request: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<ResponseBody>, hyper::Error>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let span = info_span!("request", request_id = %request_id);

    async move {
        let start_time = Instant::now();
        let response = match (&method, path.as_str()) {
            (&Method::OPTIONS, _) => ResponseHandler::preflight(),
            (&Method::POST, ANALYZE_PATH) => analyze(request, &state.review).await,
            (&Method::POST, _) => {
                debug!(path = %path, "no route found");
                ResponseHandler::not_found()
            }
            (&Method::GET | &Method::HEAD, _) => {
                serve_static(&method, &path, &state.document_root).await
            }
            _ => ResponseHandler::method_not_allowed(),
        };

        info!(
            method = %method,
            path = %path,
            status = response.status().as_u16(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "handled request"
        );
        Ok(response)
    }
    .instrument(span)
    .await
}
