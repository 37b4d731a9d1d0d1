use std::sync::Arc;

use crate::config::Config;
use crate::db::MangaStore;
use crate::observability::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: MangaStore,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config, store: MangaStore) -> Self {
        Self {
            config: Arc::new(config),
            store,
            metrics: Arc::new(Metrics::new()),
        }
    }
}
