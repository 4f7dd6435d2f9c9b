use std::sync::Arc;

use dmc_core::NewsStorage;
use dmc_scrapers::ScraperManager;

pub struct AppState {
    pub storage: Arc<dyn NewsStorage>,
    pub manager: Arc<ScraperManager>,
}
