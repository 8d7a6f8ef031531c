use std::sync::Arc;

use service::{store::RecordStore, TranslationService};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub translations: TranslationService,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { translations: TranslationService::new(store) }
    }
}
