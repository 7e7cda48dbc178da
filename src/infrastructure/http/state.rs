//! Application State

use std::sync::Arc;

use crate::application::JobHandler;

/// 应用状态
pub struct AppState {
    pub handler: Arc<dyn JobHandler>,
}

impl AppState {
    pub fn new(handler: Arc<dyn JobHandler>) -> Self {
        Self { handler }
    }
}
