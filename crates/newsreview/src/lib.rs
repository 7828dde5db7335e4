pub mod handlers;
pub mod review;
pub mod utils;

use std::path::PathBuf;

use common::configuration::Configuration;

use crate::review::ReviewService;

/// Shared, read-only state handed to every connection.
pub struct AppState {
    pub review: ReviewService,
    pub document_root: PathBuf,
}

impl AppState {
    pub fn from_config(config: &Configuration) -> Result<Self, reqwest::Error> {
        Ok(AppState {
            review: ReviewService::from_config(&config.upstream)?,
            document_root: config.document_root.clone(),
        })
    }
}
