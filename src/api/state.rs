use std::sync::Arc;

use crate::services::ComparisonService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub comparison: Arc<ComparisonService>,
}

impl AppState {
    pub fn new(comparison: ComparisonService) -> Self {
        Self {
            comparison: Arc::new(comparison),
        }
    }
}
