// Dashboard domain model
use super::widget::WidgetKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Cell footprint of an item plus its optional resize bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_w: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_h: Option<i32>,
    #[serde(default, rename = "static")]
    pub is_static: bool,
}

impl GridPosition {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            min_w: None,
            max_w: None,
            min_h: None,
            max_h: None,
            is_static: false,
        }
    }

    /// True when cell `(x, y)` lies inside this footprint (half-open).
    pub fn covers(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && x < self.x.saturating_add(self.w)
            && y >= self.y
            && y < self.y.saturating_add(self.h)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }
}

/// A single widget on a dashboard page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_position: Option<GridPosition>,
}

impl DashboardItem {
    pub fn new(id: impl Into<String>, kind: WidgetKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            url: None,
            icon: None,
            config: serde_json::Map::new(),
            grid_position: None,
        }
    }

    pub fn with_position(mut self, position: GridPosition) -> Self {
        self.grid_position = Some(position);
        self
    }
}

/// Positioned entry exchanged with the drag/resize engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_w: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_h: Option<i32>,
    #[serde(default, rename = "static")]
    pub is_static: bool,
}

impl LayoutItem {
    pub fn new(id: impl Into<String>, x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            w,
            h,
            min_w: None,
            max_w: None,
            min_h: None,
            max_h: None,
            is_static: false,
        }
    }

    pub fn from_position(id: &str, position: &GridPosition) -> Self {
        Self {
            id: id.to_string(),
            x: position.x,
            y: position.y,
            w: position.w,
            h: position.h,
            min_w: position.min_w,
            max_w: position.max_w,
            min_h: position.min_h,
            max_h: position.max_h,
            is_static: position.is_static,
        }
    }
}

/// Device class a page layout is stored for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Desktop,
    Mobile,
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceClass::Desktop => write!(f, "desktop"),
            DeviceClass::Mobile => write!(f, "mobile"),
        }
    }
}

/// Write positions reported by the drag engine back onto the items, matched by id.
///
/// Items missing from `layout` keep their current position. Resize bounds an
/// item already carries survive unless the layout entry supplies its own.
pub fn apply_layout(items: &[DashboardItem], layout: &[LayoutItem]) -> Vec<DashboardItem> {
    let by_id: HashMap<&str, &LayoutItem> = layout.iter().map(|l| (l.id.as_str(), l)).collect();

    items
        .iter()
        .map(|item| {
            let Some(entry) = by_id.get(item.id.as_str()) else {
                return item.clone();
            };
            let previous = item.grid_position.as_ref();
            let position = GridPosition {
                x: entry.x,
                y: entry.y,
                w: entry.w,
                h: entry.h,
                min_w: entry.min_w.or(previous.and_then(|p| p.min_w)),
                max_w: entry.max_w.or(previous.and_then(|p| p.max_w)),
                min_h: entry.min_h.or(previous.and_then(|p| p.min_h)),
                max_h: entry.max_h.or(previous.and_then(|p| p.max_h)),
                is_static: entry.is_static,
            };
            DashboardItem {
                grid_position: Some(position),
                ..item.clone()
            }
        })
        .collect()
}
