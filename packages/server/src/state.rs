use std::sync::Arc;

use crate::config::AppConfig;
use crate::report::ReportLayout;
use crate::service::DatasetService;
use crate::store::DatasetStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub service: Arc<DatasetService>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DatasetStore>) -> Self {
        let layout = ReportLayout::default().with_detail_limit(config.report.detail_limit);
        let service = DatasetService::new(store, config.retention.limit, layout);
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }
}
