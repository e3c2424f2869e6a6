// Grid geometry - Breakpoints, boundary and overlap rules, square row height

use super::dashboard::{DashboardItem, GridPosition, LayoutItem};
use super::widget::widget_size;
use serde::{Deserialize, Serialize};

/// Column count of the widest breakpoint in the default table.
pub const LG_COLS: i32 = 12;

/// Row height used until the container has been measured.
pub const PLACEHOLDER_ROW_HEIGHT: u32 = 100;

/// A named viewport-width tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub name: String,
    /// Smallest container width (px) at which this tier is active.
    pub min_width: u32,
    pub cols: i32,
}

impl Breakpoint {
    pub fn new(name: &str, min_width: u32, cols: i32) -> Self {
        Self {
            name: name.to_string(),
            min_width,
            cols,
        }
    }
}

/// Breakpoint table, held in ascending `min_width` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakpoints {
    tiers: Vec<Breakpoint>,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::new(vec![
            Breakpoint::new("lg", 1200, 12),
            Breakpoint::new("md", 996, 10),
            Breakpoint::new("sm", 768, 6),
            Breakpoint::new("xs", 480, 4),
            Breakpoint::new("xxs", 0, 2),
        ])
    }
}

impl Breakpoints {
    /// Build a table from tiers in any order. An empty list yields the default table.
    pub fn new(mut tiers: Vec<Breakpoint>) -> Self {
        if tiers.is_empty() {
            return Self::default();
        }
        for tier in &mut tiers {
            tier.cols = tier.cols.max(1);
        }
        tiers.sort_by_key(|t| t.min_width);
        Self { tiers }
    }

    /// Tier active for a container of `width` px.
    ///
    /// Widths below every threshold fall back to the narrowest tier.
    pub fn for_width(&self, width: f64) -> &Breakpoint {
        self.tiers
            .iter()
            .rev()
            .find(|t| width >= t.min_width as f64)
            .unwrap_or(&self.tiers[0])
    }

    pub fn get(&self, name: &str) -> Option<&Breakpoint> {
        self.tiers.iter().find(|t| t.name == name)
    }

    pub fn widest(&self) -> &Breakpoint {
        &self.tiers[self.tiers.len() - 1]
    }

    pub fn tiers(&self) -> &[Breakpoint] {
        &self.tiers
    }
}

/// Clamp a layout entry so it fits inside a `cols`-wide grid.
///
/// `w` and `h` become at least 1 (and `w` at most `cols`), negative offsets
/// become 0, and `x` is pulled left until the item ends inside the grid.
/// Applying this twice gives the same result as applying it once.
pub fn validate_boundaries(item: &LayoutItem, cols: i32) -> LayoutItem {
    let cols = cols.max(1);
    let w = item.w.clamp(1, cols);
    let h = item.h.max(1);
    let x = item.x.clamp(0, cols - w);
    let y = item.y.max(0);

    LayoutItem {
        x,
        y,
        w,
        h,
        ..item.clone()
    }
}

/// True iff `item` overlaps any other entry in `layout`. Entries sharing
/// `item`'s id are skipped.
pub fn check_collision(item: &LayoutItem, layout: &[LayoutItem]) -> bool {
    layout.iter().filter(|other| other.id != item.id).any(|other| {
        item.x < other.x.saturating_add(other.w)
            && other.x < item.x.saturating_add(item.w)
            && item.y < other.y.saturating_add(other.h)
            && other.y < item.y.saturating_add(item.h)
    })
}

/// Row height (px) that renders a 1×1 cell square.
///
/// Never negative: a container too narrow to hold its margins yields 0.
pub fn calculate_square_row_height(
    container_width: f64,
    cols: i32,
    margin: u32,
    container_padding: u32,
) -> u32 {
    let cols = f64::from(cols.max(1));
    let inner_width = container_width - 2.0 * f64::from(container_padding);
    let column_width = (inner_width - f64::from(margin) * (cols - 1.0)) / cols;

    if !column_width.is_finite() || column_width <= 0.0 {
        return 0;
    }
    column_width.floor() as u32
}

/// Layout list for the renderer against the default widest breakpoint.
pub fn convert_to_grid_layout(items: &[DashboardItem]) -> Vec<LayoutItem> {
    convert_to_grid_layout_with_cols(items, LG_COLS)
}

/// Layout list for the renderer, with positions validated against `cols`.
///
/// Missing resize bounds are filled from the size registry. Items that were
/// never positioned get their registry size and are stacked below everything
/// else so they cannot cover an existing widget.
pub fn convert_to_grid_layout_with_cols(items: &[DashboardItem], cols: i32) -> Vec<LayoutItem> {
    let mut bottom = items
        .iter()
        .filter_map(|item| item.grid_position.as_ref())
        .map(GridPosition::bottom)
        .max()
        .unwrap_or(0)
        .max(0);

    items
        .iter()
        .map(|item| {
            let size = widget_size(&item.kind);
            let position = match &item.grid_position {
                Some(position) => position.clone(),
                None => {
                    let position = GridPosition::new(0, bottom, size.w, size.h);
                    bottom = bottom.saturating_add(size.h);
                    position
                }
            };

            let mut entry = LayoutItem::from_position(&item.id, &position);
            entry.min_w = entry.min_w.or(Some(size.min_w));
            entry.max_w = entry.max_w.or(Some(size.max_w));
            entry.min_h = entry.min_h.or(Some(size.min_h));
            entry.max_h = entry.max_h.or(Some(size.max_h));
            validate_boundaries(&entry, cols)
        })
        .collect()
}
