// JSON file repository for dashboard layouts
use crate::application::layout_repository::LayoutRepository;
use crate::domain::dashboard::{DashboardItem, DeviceClass};
use crate::infrastructure::error::StoreError;
use async_trait::async_trait;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    pages: BTreeMap<String, PageLayouts>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct PageLayouts {
    #[serde(default)]
    desktop: Vec<DashboardItem>,
    #[serde(default)]
    mobile: Vec<DashboardItem>,
}

impl PageLayouts {
    fn get(&self, device: DeviceClass) -> &Vec<DashboardItem> {
        match device {
            DeviceClass::Desktop => &self.desktop,
            DeviceClass::Mobile => &self.mobile,
        }
    }

    fn get_mut(&mut self, device: DeviceClass) -> &mut Vec<DashboardItem> {
        match device {
            DeviceClass::Desktop => &mut self.desktop,
            DeviceClass::Mobile => &mut self.mobile,
        }
    }
}

/// Keeps every page's layouts in one JSON file, cached in memory.
///
/// Each save rewrites the whole file through a temp file and a rename, with
/// the write lock held so the file always matches the latest save.
#[derive(Debug)]
pub struct JsonLayoutStore {
    path: PathBuf,
    document: RwLock<StoreDocument>,
}

impl JsonLayoutStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let document = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No layout store at {}, starting empty", path.display());
                StoreDocument::default()
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        Ok(Self {
            path,
            document: RwLock::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_atomic(&self, document: &StoreDocument) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(document)?;
        let write_error = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
        }

        let timestamp = Local::now().format("%Y%m%d-%H%M%S%3f").to_string();
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "layout.json".to_string());
        let temp_path = self.path.with_file_name(format!("{}.tmp.{}", file_name, timestamp));

        let mut file = tokio::fs::File::create(&temp_path).await.map_err(write_error)?;
        file.write_all(json.as_bytes()).await.map_err(write_error)?;
        file.sync_all().await.map_err(write_error)?;
        drop(file);

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|source| StoreError::Rename {
                path: self.path.clone(),
                temp_path,
                source,
            })
    }
}

#[async_trait]
impl LayoutRepository for JsonLayoutStore {
    async fn list_pages(&self) -> anyhow::Result<Vec<String>> {
        let document = self.document.read().await;
        Ok(document.pages.keys().cloned().collect())
    }

    async fn load_layout(&self, page: &str, device: DeviceClass) -> anyhow::Result<Vec<DashboardItem>> {
        let document = self.document.read().await;
        Ok(document
            .pages
            .get(page)
            .map(|layouts| layouts.get(device).clone())
            .unwrap_or_default())
    }

    async fn save_layout(
        &self,
        page: &str,
        device: DeviceClass,
        items: &[DashboardItem],
    ) -> anyhow::Result<()> {
        let mut document = self.document.write().await;
        *document.pages.entry(page.to_string()).or_default().get_mut(device) = items.to_vec();
        self.write_atomic(&document).await?;
        tracing::debug!("Wrote {} items for {}/{} to {}", items.len(), page, device, self.path.display());
        Ok(())
    }
}
