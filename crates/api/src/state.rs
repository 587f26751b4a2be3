use std::sync::Arc;

use hygiene_core::catalog::InspectionCatalog;
use hygiene_core::scheduling::InspectionScheduler;
use hygiene_core::store::{DataStore, RecordStore};
use hygiene_core::visit_sheet::VisitSheetGenerator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Read side, shared with the scheduler and generator.
    pub store: Arc<dyn DataStore>,
    /// Write side of the same store.
    pub records: Arc<dyn RecordStore>,
    pub catalog: Arc<InspectionCatalog>,
    pub config: Arc<ServerConfig>,
    pub scheduler: InspectionScheduler,
    pub visit_sheets: VisitSheetGenerator,
}

impl AppState {
    /// Wire services around one store implementation.
    pub fn new<S: RecordStore + 'static>(
        store: Arc<S>,
        catalog: InspectionCatalog,
        config: ServerConfig,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let read: Arc<dyn DataStore> = store.clone();

        Self {
            scheduler: InspectionScheduler::new(Arc::clone(&read), Arc::clone(&catalog)),
            visit_sheets: VisitSheetGenerator::new(Arc::clone(&read), Arc::clone(&catalog)),
            store: read,
            records: store,
            catalog,
            config: Arc::new(config),
        }
    }
}
