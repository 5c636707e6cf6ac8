use std::sync::Arc;

use crate::config::Config;
use crate::services::{DocumentExtractor, ReportGenerator};

/// Shared application state accessible from all handlers.
///
/// Constructed once at startup; everything a request needs travels through
/// here instead of module-level globals.
pub struct AppState {
    pub config: Config,
    pub extractor: Arc<dyn DocumentExtractor>,
    pub reporter: Arc<dyn ReportGenerator>,
}
