//! HTTP surface over the report pipeline.

pub mod handlers;
pub mod models;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::report::ReportGenerator;

/// Shared, read-only state handed to every worker.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ReportGenerator>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            generator: Arc::new(ReportGenerator::new(config)),
        }
    }
}
