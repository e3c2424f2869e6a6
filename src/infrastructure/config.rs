use crate::application::grid_controller::GridSettings;
use crate::domain::grid::{Breakpoint, Breakpoints};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub grid: GridConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GridConfig {
    pub margin: u32,
    pub container_padding: u32,
    pub placeholder_row_height: u32,
    #[serde(default)]
    pub breakpoints: Vec<Breakpoint>,
}

impl From<&GridConfig> for GridSettings {
    fn from(grid: &GridConfig) -> Self {
        Self {
            margin: grid.margin,
            container_padding: grid.container_padding,
            placeholder_row_height: grid.placeholder_row_height,
            breakpoints: Breakpoints::new(grid.breakpoints.clone()),
        }
    }
}

/// Load `config/dashboard.toml` (optional) with `DASHBOARD_` environment overrides,
/// e.g. `DASHBOARD_SERVER__BIND=127.0.0.1:3000`.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    load_from(config::File::with_name("config/dashboard").required(false))
}

fn load_from<S>(source: S) -> anyhow::Result<AppConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("storage.path", "data/layout.json")?
        .set_default("grid.margin", 16)?
        .set_default("grid.container_padding", 16)?
        .set_default("grid.placeholder_row_height", 100)?
        .add_source(source)
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
