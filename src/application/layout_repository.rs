// Repository trait for dashboard layout persistence
use crate::domain::dashboard::{DashboardItem, DeviceClass};
use async_trait::async_trait;

#[async_trait]
pub trait LayoutRepository: Send + Sync {
    /// List all pages that have a stored layout
    async fn list_pages(&self) -> anyhow::Result<Vec<String>>;

    /// Load the items of one page for one device class (empty if never saved)
    async fn load_layout(&self, page: &str, device: DeviceClass) -> anyhow::Result<Vec<DashboardItem>>;

    /// Replace the stored items of one page for one device class.
    /// Always called with the full list, never a diff.
    async fn save_layout(
        &self,
        page: &str,
        device: DeviceClass,
        items: &[DashboardItem],
    ) -> anyhow::Result<()>;
}
