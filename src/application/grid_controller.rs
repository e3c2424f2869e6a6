// Grid layout controller - Applies drag engine events to one dashboard
use crate::application::layout_repository::LayoutRepository;
use crate::domain::dashboard::{DashboardItem, DeviceClass, GridPosition, LayoutItem, apply_layout};
use crate::domain::grid::{
    Breakpoint, Breakpoints, PLACEHOLDER_ROW_HEIGHT, calculate_square_row_height, check_collision,
    convert_to_grid_layout_with_cols, validate_boundaries,
};
use crate::domain::migration::migrate_to_grid_layout_with_cols;
use crate::domain::placement::{duplicate_position, next_available_position_with_cols};
use crate::domain::widget::{WidgetKind, widget_size};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Pixel geometry and breakpoint table shared by every dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSettings {
    pub margin: u32,
    pub container_padding: u32,
    pub placeholder_row_height: u32,
    pub breakpoints: Breakpoints,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            margin: 16,
            container_padding: 16,
            placeholder_row_height: PLACEHOLDER_ROW_HEIGHT,
            breakpoints: Breakpoints::default(),
        }
    }
}

/// Events emitted by the interactive grid.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum GridEvent {
    BreakpointChange { name: String },
    ContainerResize { width: f64 },
    MarginChange { margin: u32 },
    SetEditMode { enabled: bool },
    LayoutChange { layout: Vec<LayoutItem> },
    DragStop { layout: Vec<LayoutItem> },
    ResizeStop { layout: Vec<LayoutItem> },
}

/// Fields for a widget about to be added.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub label: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

/// Snapshot of a dashboard as the renderer needs it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub page: String,
    pub device: DeviceClass,
    pub breakpoint: String,
    pub cols: i32,
    pub row_height: u32,
    pub edit_mode: bool,
    pub items: Vec<DashboardItem>,
    pub layout: Vec<LayoutItem>,
}

/// Handle of a fire-and-forget save. Dropping it does not cancel the save.
pub type SaveHandle = JoinHandle<()>;

/// Owns the items and grid state of one page on one device class.
///
/// Every mutation goes through a method here; saves are spawned with the
/// full item list and never retried, so the last save to land wins.
pub struct GridLayoutController {
    page: String,
    device: DeviceClass,
    items: Vec<DashboardItem>,
    settings: GridSettings,
    breakpoint: Breakpoint,
    container_width: Option<f64>,
    row_height: u32,
    edit_mode: bool,
    repository: Arc<dyn LayoutRepository>,
}

impl GridLayoutController {
    pub fn new(
        page: String,
        device: DeviceClass,
        items: Vec<DashboardItem>,
        settings: GridSettings,
        repository: Arc<dyn LayoutRepository>,
    ) -> Self {
        let breakpoint = settings.breakpoints.widest().clone();
        let row_height = settings.placeholder_row_height;
        Self {
            page,
            device,
            items,
            settings,
            breakpoint,
            container_width: None,
            row_height,
            edit_mode: false,
            repository,
        }
    }

    pub fn items(&self) -> &[DashboardItem] {
        &self.items
    }

    pub fn breakpoint(&self) -> &Breakpoint {
        &self.breakpoint
    }

    pub fn row_height(&self) -> u32 {
        self.row_height
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn container_width(&self) -> Option<f64> {
        self.container_width
    }

    /// Column count every stored position is computed against.
    fn layout_cols(&self) -> i32 {
        self.settings.breakpoints.widest().cols
    }

    /// Positioned list for the renderer.
    pub fn layout(&self) -> Vec<LayoutItem> {
        convert_to_grid_layout_with_cols(&self.items, self.layout_cols())
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            page: self.page.clone(),
            device: self.device,
            breakpoint: self.breakpoint.name.clone(),
            cols: self.breakpoint.cols,
            row_height: self.row_height,
            edit_mode: self.edit_mode,
            items: self.items.clone(),
            layout: self.layout(),
        }
    }

    /// Dispatch one grid event. Returns the save handle when the event
    /// commits a layout.
    pub fn handle(&mut self, event: GridEvent) -> Option<SaveHandle> {
        match event {
            GridEvent::BreakpointChange { name } => {
                self.on_breakpoint_change(&name);
                None
            }
            GridEvent::ContainerResize { width } => {
                self.on_container_resize(width);
                None
            }
            GridEvent::MarginChange { margin } => {
                self.on_margin_change(margin);
                None
            }
            GridEvent::SetEditMode { enabled } => {
                self.set_edit_mode(enabled);
                None
            }
            GridEvent::LayoutChange { layout } => {
                self.on_layout_change(&layout);
                None
            }
            GridEvent::DragStop { layout } => Some(self.on_drag_stop(&layout)),
            GridEvent::ResizeStop { layout } => Some(self.on_resize_stop(&layout)),
        }
    }

    pub fn on_breakpoint_change(&mut self, name: &str) {
        match self.settings.breakpoints.get(name) {
            Some(breakpoint) => {
                self.breakpoint = breakpoint.clone();
                self.recompute_row_height();
                tracing::debug!(
                    "{}/{}: breakpoint {} ({} cols)",
                    self.page,
                    self.device,
                    self.breakpoint.name,
                    self.breakpoint.cols
                );
            }
            None => {
                tracing::warn!("{}/{}: ignoring unknown breakpoint {}", self.page, self.device, name);
            }
        }
    }

    pub fn on_container_resize(&mut self, width: f64) {
        self.container_width = Some(width);
        self.breakpoint = self.settings.breakpoints.for_width(width).clone();
        self.recompute_row_height();
    }

    pub fn on_margin_change(&mut self, margin: u32) {
        self.settings.margin = margin;
        self.recompute_row_height();
    }

    pub fn set_edit_mode(&mut self, enabled: bool) {
        self.edit_mode = enabled;
    }

    /// Live layout updates while a gesture is in progress. Ignored outside
    /// edit mode so view-mode compaction never rewrites the layout.
    pub fn on_layout_change(&mut self, layout: &[LayoutItem]) {
        if !self.edit_mode {
            tracing::debug!("{}/{}: layout change outside edit mode ignored", self.page, self.device);
            return;
        }
        self.merge(layout);
    }

    pub fn on_drag_stop(&mut self, layout: &[LayoutItem]) -> SaveHandle {
        self.merge(layout);
        self.persist()
    }

    pub fn on_resize_stop(&mut self, layout: &[LayoutItem]) -> SaveHandle {
        self.merge(layout);
        self.persist()
    }

    /// Place a new widget at the first free cell with its default size.
    pub fn add_item(&mut self, new_item: NewItem) -> (DashboardItem, SaveHandle) {
        let size = widget_size(&new_item.kind);
        let cell = next_available_position_with_cols(&self.items, self.layout_cols());
        let position = self.fit_to_grid(GridPosition::new(cell.x, cell.y, size.w, size.h));

        let item = DashboardItem {
            id: uuid::Uuid::new_v4().to_string(),
            kind: new_item.kind,
            label: new_item.label,
            url: new_item.url,
            icon: new_item.icon,
            config: new_item.config,
            grid_position: Some(position.clone()),
        };

        tracing::info!(
            "{}/{}: added {} {} at ({}, {})",
            self.page,
            self.device,
            item.kind.as_str(),
            item.id,
            position.x,
            position.y
        );
        self.warn_on_collision(&item);
        self.items.push(item.clone());
        (item, self.persist())
    }

    /// Copy an existing widget next to the original. `None` if no item has `id`.
    pub fn duplicate_item(&mut self, id: &str) -> Option<(DashboardItem, SaveHandle)> {
        let original = self.items.iter().find(|item| item.id == id)?;

        let cols = self.layout_cols();
        let position = match &original.grid_position {
            Some(position) => duplicate_position(position, cols),
            None => {
                let size = widget_size(&original.kind);
                let cell = next_available_position_with_cols(&self.items, cols);
                GridPosition::new(cell.x, cell.y, size.w, size.h)
            }
        };

        let copy = DashboardItem {
            id: uuid::Uuid::new_v4().to_string(),
            grid_position: Some(self.fit_to_grid(position)),
            ..original.clone()
        };

        tracing::info!("{}/{}: duplicated {} as {}", self.page, self.device, id, copy.id);
        self.warn_on_collision(&copy);
        self.items.push(copy.clone());
        Some((copy, self.persist()))
    }

    /// Delete a widget together with its position. `None` if no item has `id`.
    pub fn remove_item(&mut self, id: &str) -> Option<SaveHandle> {
        let index = self.items.iter().position(|item| item.id == id)?;
        self.items.remove(index);
        tracing::info!("{}/{}: removed {}", self.page, self.device, id);
        Some(self.persist())
    }

    /// Replace the whole item list, positioning anything that arrives without
    /// a position.
    pub fn import_items(&mut self, items: Vec<DashboardItem>) -> SaveHandle {
        let count = items.len();
        self.items = migrate_to_grid_layout_with_cols(items, self.layout_cols());
        tracing::info!("{}/{}: imported {} items", self.page, self.device, count);
        self.persist()
    }

    fn merge(&mut self, layout: &[LayoutItem]) {
        let cols = self.breakpoint.cols;
        let validated: Vec<LayoutItem> = layout.iter().map(|entry| validate_boundaries(entry, cols)).collect();
        self.items = apply_layout(&self.items, &validated);
    }

    /// Clamp a freshly placed footprint into the stored grid width.
    fn fit_to_grid(&self, position: GridPosition) -> GridPosition {
        let fitted = validate_boundaries(&LayoutItem::from_position("", &position), self.layout_cols());
        GridPosition {
            x: fitted.x,
            y: fitted.y,
            w: fitted.w,
            h: fitted.h,
            ..position
        }
    }

    fn recompute_row_height(&mut self) {
        let Some(width) = self.container_width else {
            return;
        };
        self.row_height = calculate_square_row_height(
            width,
            self.breakpoint.cols,
            self.settings.margin,
            self.settings.container_padding,
        );
    }

    fn warn_on_collision(&self, item: &DashboardItem) {
        let Some(position) = &item.grid_position else {
            return;
        };
        let candidate = LayoutItem::from_position(&item.id, position);
        if check_collision(&candidate, &self.layout()) {
            tracing::warn!(
                "{}/{}: {} at ({}, {}) overlaps an existing widget",
                self.page,
                self.device,
                item.id,
                position.x,
                position.y
            );
        }
    }

    fn persist(&self) -> SaveHandle {
        let repository = Arc::clone(&self.repository);
        let page = self.page.clone();
        let device = self.device;
        let items = self.items.clone();

        tokio::spawn(async move {
            match repository.save_layout(&page, device, &items).await {
                Ok(()) => tracing::debug!("{}/{}: saved {} items", page, device, items.len()),
                Err(e) => tracing::error!("{}/{}: failed to save layout: {:#}", page, device, e),
            }
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Repository that keeps every save in memory.
    #[derive(Default)]
    pub(crate) struct RecordingRepository {
        pub saves: Mutex<Vec<(String, DeviceClass, Vec<DashboardItem>)>>,
        pub stored: Mutex<Vec<DashboardItem>>,
    }

    impl RecordingRepository {
        pub fn with_items(items: Vec<DashboardItem>) -> Self {
            Self {
                saves: Mutex::new(Vec::new()),
                stored: Mutex::new(items),
            }
        }

        pub fn save_count(&self) -> usize {
            self.saves.lock().unwrap().len()
        }

        pub fn last_save(&self) -> Vec<DashboardItem> {
            self.saves.lock().unwrap().last().unwrap().2.clone()
        }
    }

    #[async_trait]
    impl LayoutRepository for RecordingRepository {
        async fn list_pages(&self) -> anyhow::Result<Vec<String>> {
            Ok(vec!["home".to_string()])
        }

        async fn load_layout(&self, _page: &str, _device: DeviceClass) -> anyhow::Result<Vec<DashboardItem>> {
            Ok(self.stored.lock().unwrap().clone())
        }

        async fn save_layout(
            &self,
            page: &str,
            device: DeviceClass,
            items: &[DashboardItem],
        ) -> anyhow::Result<()> {
            self.saves
                .lock()
                .unwrap()
                .push((page.to_string(), device, items.to_vec()));
            Ok(())
        }
    }

    fn placed(id: &str, kind: WidgetKind, x: i32, y: i32, w: i32, h: i32) -> DashboardItem {
        DashboardItem::new(id, kind, id).with_position(GridPosition::new(x, y, w, h))
    }

    fn controller(items: Vec<DashboardItem>) -> (GridLayoutController, Arc<RecordingRepository>) {
        let repository = Arc::new(RecordingRepository::default());
        let controller = GridLayoutController::new(
            "home".to_string(),
            DeviceClass::Desktop,
            items,
            GridSettings::default(),
            repository.clone(),
        );
        (controller, repository)
    }

    fn position_of(controller: &GridLayoutController, id: &str) -> (i32, i32, i32, i32) {
        let item = controller.items().iter().find(|i| i.id == id).unwrap();
        let p = item.grid_position.as_ref().unwrap();
        (p.x, p.y, p.w, p.h)
    }

    #[test]
    fn test_starts_on_widest_breakpoint_with_placeholder_height() {
        let (controller, _) = controller(vec![]);
        assert_eq!(controller.breakpoint().name, "lg");
        assert_eq!(controller.row_height(), PLACEHOLDER_ROW_HEIGHT);
        assert!(controller.container_width().is_none());
    }

    #[test]
    fn test_container_resize_selects_breakpoint_and_squares_rows() {
        let (mut controller, _) = controller(vec![]);

        controller.on_container_resize(1200.0);
        assert_eq!(controller.breakpoint().name, "lg");
        assert_eq!(controller.row_height(), 82);

        controller.on_container_resize(800.0);
        assert_eq!(controller.breakpoint().name, "sm");
        // (800 - 32 - 16 * 5) / 6
        assert_eq!(controller.row_height(), 114);
    }

    #[test]
    fn test_breakpoint_and_margin_changes_recompute_height() {
        let (mut controller, _) = controller(vec![]);
        controller.on_container_resize(1200.0);

        controller.on_breakpoint_change("md");
        assert_eq!(controller.breakpoint().cols, 10);
        // (1168 - 16 * 9) / 10
        assert_eq!(controller.row_height(), 102);

        controller.on_margin_change(0);
        assert_eq!(controller.row_height(), 116);

        controller.on_breakpoint_change("huge");
        assert_eq!(controller.breakpoint().name, "md");
    }

    #[test]
    fn test_layout_change_ignored_outside_edit_mode() {
        let items = vec![placed("a", WidgetKind::Notes, 0, 0, 4, 3)];
        let (mut controller, repository) = controller(items.clone());

        controller.handle(GridEvent::LayoutChange {
            layout: vec![LayoutItem::new("a", 4, 4, 4, 3)],
        });

        assert_eq!(controller.items(), items.as_slice());
        assert_eq!(repository.save_count(), 0);
    }

    #[test]
    fn test_layout_change_in_edit_mode_merges_without_saving() {
        let items = vec![
            placed("a", WidgetKind::Notes, 0, 0, 4, 3),
            placed("b", WidgetKind::Notes, 4, 0, 4, 3),
        ];
        let (mut controller, repository) = controller(items);
        controller.set_edit_mode(true);

        let saved = controller.handle(GridEvent::LayoutChange {
            layout: vec![LayoutItem::new("a", 8, 2, 4, 3)],
        });

        assert!(saved.is_none());
        assert_eq!(position_of(&controller, "a"), (8, 2, 4, 3));
        assert_eq!(position_of(&controller, "b"), (4, 0, 4, 3));
        assert_eq!(repository.save_count(), 0);
    }

    #[tokio::test]
    async fn test_drag_stop_saves_full_list_even_in_view_mode() {
        let items = vec![
            placed("a", WidgetKind::Notes, 0, 0, 4, 3),
            placed("b", WidgetKind::Weather, 4, 0, 4, 2),
        ];
        let (mut controller, repository) = controller(items);

        controller
            .on_drag_stop(&[LayoutItem::new("b", 0, 3, 4, 2)])
            .await
            .unwrap();

        assert_eq!(repository.save_count(), 1);
        let saved = repository.last_save();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[1].grid_position.as_ref().map(|p| (p.x, p.y)), Some((0, 3)));
    }

    #[tokio::test]
    async fn test_resize_stop_clamps_to_active_breakpoint() {
        let items = vec![placed("a", WidgetKind::Notes, 0, 0, 4, 3)];
        let (mut controller, repository) = controller(items);
        controller.on_breakpoint_change("sm");

        let handle = controller
            .handle(GridEvent::ResizeStop {
                layout: vec![LayoutItem::new("a", 4, 0, 5, 0)],
            })
            .unwrap();
        handle.await.unwrap();

        assert_eq!(position_of(&controller, "a"), (1, 0, 5, 1));
        assert_eq!(repository.save_count(), 1);
    }

    #[tokio::test]
    async fn test_add_item_uses_first_free_cell_and_default_size() {
        let items = vec![placed("a", WidgetKind::Group, 0, 0, 12, 2)];
        let (mut controller, repository) = controller(items);

        let (item, handle) = controller.add_item(NewItem {
            kind: WidgetKind::Weather,
            label: "Weather".to_string(),
            url: None,
            icon: None,
            config: serde_json::Map::new(),
        });
        handle.await.unwrap();

        let position = item.grid_position.unwrap();
        assert_eq!((position.x, position.y, position.w, position.h), (0, 2, 4, 2));
        assert_eq!(controller.items().len(), 2);
        assert_eq!(repository.last_save().len(), 2);
    }

    #[tokio::test]
    async fn test_add_item_stays_inside_grid_when_row_nearly_full() {
        let items = vec![placed("a", WidgetKind::Notes, 0, 0, 11, 3)];
        let (mut controller, repository) = controller(items);

        let (item, handle) = controller.add_item(NewItem {
            kind: WidgetKind::Weather,
            label: "Weather".to_string(),
            url: None,
            icon: None,
            config: serde_json::Map::new(),
        });
        handle.await.unwrap();

        let position = item.grid_position.unwrap();
        assert_eq!((position.x, position.y, position.w, position.h), (8, 0, 4, 2));
        assert!(position.x + position.w <= 12);

        let saved = repository.last_save();
        let stored = saved[1].grid_position.as_ref().unwrap();
        assert_eq!((stored.x, stored.w), (8, 4));
        // stored and rendered footprints agree
        let rendered = controller.layout();
        assert_eq!((rendered[1].x, rendered[1].w), (stored.x, stored.w));
    }

    #[tokio::test]
    async fn test_duplicate_of_overwide_item_is_clamped() {
        let items = vec![placed("wide", WidgetKind::Notes, 0, 0, 14, 2)];
        let (mut controller, _) = controller(items);

        let (copy, handle) = controller.duplicate_item("wide").unwrap();
        handle.await.unwrap();

        let p = copy.grid_position.as_ref().unwrap();
        assert_eq!((p.x, p.y, p.w, p.h), (0, 2, 12, 2));
    }

    #[test]
    fn test_far_row_from_drag_engine_still_renders() {
        let items = vec![placed("a", WidgetKind::Notes, 0, 0, 4, 3)];
        let (mut controller, _) = controller(items);
        controller.set_edit_mode(true);

        controller.on_layout_change(&[LayoutItem::new("a", 0, i32::MAX, 4, 3)]);
        let view = controller.view();

        assert_eq!(view.layout[0].y, i32::MAX);
        assert_eq!(view.layout[0].h, 3);
    }

    #[tokio::test]
    async fn test_duplicate_right_then_wrap() {
        let items = vec![
            placed("left", WidgetKind::Notes, 0, 0, 6, 3),
            placed("edge", WidgetKind::Notes, 8, 5, 6, 3),
        ];
        let (mut controller, _) = controller(items);

        let (copy, handle) = controller.duplicate_item("left").unwrap();
        handle.await.unwrap();
        let p = copy.grid_position.as_ref().unwrap();
        assert_eq!((p.x, p.y, p.w, p.h), (6, 0, 6, 3));
        assert_ne!(copy.id, "left");
        assert_eq!(copy.label, "left");

        let (copy, handle) = controller.duplicate_item("edge").unwrap();
        handle.await.unwrap();
        let p = copy.grid_position.as_ref().unwrap();
        assert_eq!((p.x, p.y), (0, 8));

        assert!(controller.duplicate_item("missing").is_none());
    }

    #[tokio::test]
    async fn test_remove_item_persists_remaining_items() {
        let items = vec![
            placed("a", WidgetKind::Notes, 0, 0, 4, 3),
            placed("b", WidgetKind::Notes, 4, 0, 4, 3),
        ];
        let (mut controller, repository) = controller(items);

        controller.remove_item("a").unwrap().await.unwrap();

        assert_eq!(repository.last_save().len(), 1);
        assert_eq!(repository.last_save()[0].id, "b");
        assert!(controller.remove_item("a").is_none());
    }

    #[tokio::test]
    async fn test_import_migrates_unpositioned_items() {
        let (mut controller, repository) = controller(vec![]);

        controller
            .import_items(vec![
                DashboardItem::new("x", WidgetKind::Weather, "X"),
                DashboardItem::new("y", WidgetKind::Weather, "Y"),
            ])
            .await
            .unwrap();

        assert_eq!(position_of(&controller, "x"), (0, 0, 4, 2));
        assert_eq!(position_of(&controller, "y"), (4, 0, 4, 2));
        assert_eq!(repository.save_count(), 1);
    }

    #[test]
    fn test_view_reflects_state() {
        let (mut controller, _) = controller(vec![placed("a", WidgetKind::Notes, 0, 0, 4, 3)]);
        controller.on_container_resize(500.0);
        controller.set_edit_mode(true);

        let view = controller.view();

        assert_eq!(view.breakpoint, "xs");
        assert_eq!(view.cols, 4);
        assert!(view.edit_mode);
        assert_eq!(view.layout.len(), 1);
        assert_eq!(view.layout[0].min_w, Some(2));
    }

    #[test]
    fn test_events_deserialize_from_tagged_json() {
        let event: GridEvent = serde_json::from_str(
            r#"{"event": "dragStop", "layout": [{"id": "a", "x": 1, "y": 2, "w": 3, "h": 4, "static": false}]}"#,
        )
        .unwrap();
        assert!(matches!(event, GridEvent::DragStop { ref layout } if layout[0].w == 3));

        let event: GridEvent = serde_json::from_str(r#"{"event": "breakpointChange", "name": "md"}"#).unwrap();
        assert!(matches!(event, GridEvent::BreakpointChange { ref name } if name == "md"));
    }
}
