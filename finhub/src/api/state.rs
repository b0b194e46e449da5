use std::sync::Arc;

use crate::config::Config;
use crate::db::DatabaseBackend;
use crate::ingest::{FactOracle, IngestPipeline};
use crate::services::FinancialItemService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn DatabaseBackend>,
    pub oracle: Arc<dyn FactOracle>,
    pub pipeline: Arc<IngestPipeline>,
    pub items: FinancialItemService,
}

impl AppState {
    pub fn new(config: Config, db: Arc<dyn DatabaseBackend>, oracle: Arc<dyn FactOracle>) -> Self {
        let config = Arc::new(config);
        let pipeline = IngestPipeline::new(
            db.clone(),
            oracle.clone(),
            &config.currency,
            &config.ingest,
        );
        let items = FinancialItemService::new(db.clone());

        Self {
            config,
            db,
            oracle,
            pipeline: Arc::new(pipeline),
            items,
        }
    }
}
