use std::sync::Arc;

use common::configuration::Configuration;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use newsreview::handlers::route;
use newsreview::utils::tracing::init_tracer;
use newsreview::AppState;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracer();

    let config = Configuration::from_env()?;
    let state = Arc::new(AppState::from_config(&config)?);

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!(
        address = %config.bind_address,
        document_root = %config.document_root.display(),
        upstream = %config.upstream.endpoint,
        timeout_secs = config.upstream.timeout.as_secs(),
        "news review server listening"
    );
    if let Some(proxy) = &config.upstream.proxy {
        // host only, the url may carry proxy credentials
        let proxy_host = reqwest::Url::parse(proxy)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_default();
        info!(proxy_host = %proxy_host, "routing upstream calls through proxy");
    }
    match &config.upstream.api_key {
        Some(api_key) => info!(api_key = %api_key.masked(), "SILICONFLOW_API_KEY loaded"),
        None => warn!("SILICONFLOW_API_KEY is not set, review requests will fail until it is exported"),
    }

    loop {
        let (stream, peer_addr) = tokio::select! {
            accepted = listener.accept() => accepted?,
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received, server stopped");
                return Ok(());
            }
        };
        let io = TokioIo::new(stream);
        let state = Arc::clone(&state);

        let service = service_fn(move |req| {
            let state = Arc::clone(&state);
            async move { route(req, state).await }
        });

        tokio::task::spawn(async move {
            debug!(peer = ?peer_addr, "accepted connection");
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                warn!(error = ?err, "error serving connection");
            }
        });
    }
}
