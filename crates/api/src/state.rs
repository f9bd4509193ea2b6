//! Application state

use processor::PointsCatalog;

/// Shared application state
pub struct AppState {
    pub catalog: PointsCatalog,
}

impl AppState {
    pub fn new(catalog: PointsCatalog) -> Self {
        Self { catalog }
    }
}
