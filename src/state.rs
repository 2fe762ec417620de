use std::sync::Arc;

use crate::config::Settings;
use crate::rag::QueryService;

/// Shared application state handed to every request handler. Immutable
/// after construction; cloning is two Arc bumps.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QueryService>,
    pub settings: Arc<Settings>,
}
