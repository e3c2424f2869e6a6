// Dashboard service - Opens and caches one grid controller per page and device
use crate::application::grid_controller::{GridLayoutController, GridSettings};
use crate::application::layout_repository::LayoutRepository;
use crate::domain::dashboard::DeviceClass;
use crate::domain::migration::{migrate_to_grid_layout_with_cols, needs_migration};
use anyhow::Context;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

type DashboardKey = (String, DeviceClass);
type SharedController = Arc<Mutex<GridLayoutController>>;
type DashboardCell = Arc<OnceCell<SharedController>>;

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn LayoutRepository>,
    settings: GridSettings,
    dashboards: Arc<Mutex<HashMap<DashboardKey, DashboardCell>>>,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn LayoutRepository>, settings: GridSettings) -> Self {
        Self {
            repository,
            settings,
            dashboards: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn list_pages(&self) -> anyhow::Result<Vec<String>> {
        self.repository.list_pages().await
    }

    /// Controller for a page on a device class, loading it on first use.
    ///
    /// Only the cell for this page and device is held while loading, so other
    /// dashboards open concurrently. A failed load leaves the cell empty and
    /// the next call retries.
    pub async fn open(&self, page: &str, device: DeviceClass) -> anyhow::Result<SharedController> {
        let cell = {
            let mut dashboards = self.dashboards.lock().await;
            dashboards.entry((page.to_string(), device)).or_default().clone()
        };

        let controller = cell.get_or_try_init(|| self.load(page, device)).await?;
        Ok(controller.clone())
    }

    /// Stored items that predate grid positions are migrated here and the
    /// migrated list is written back before the controller is handed out.
    async fn load(&self, page: &str, device: DeviceClass) -> anyhow::Result<SharedController> {
        let mut items = self
            .repository
            .load_layout(page, device)
            .await
            .with_context(|| format!("Failed to load layout for {}/{}", page, device))?;

        if needs_migration(&items) {
            let unpositioned = items.iter().filter(|i| i.grid_position.is_none()).count();
            items = migrate_to_grid_layout_with_cols(items, self.settings.breakpoints.widest().cols);
            tracing::info!("{}/{}: migrated {} legacy items onto the grid", page, device, unpositioned);
            self.repository
                .save_layout(page, device, &items)
                .await
                .with_context(|| format!("Failed to save migrated layout for {}/{}", page, device))?;
        }

        Ok(Arc::new(Mutex::new(GridLayoutController::new(
            page.to_string(),
            device,
            items,
            self.settings.clone(),
            self.repository.clone(),
        ))))
    }
}
