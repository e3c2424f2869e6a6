// Migration of items stored before the grid layout existed
use super::dashboard::{DashboardItem, GridPosition};
use super::grid::LG_COLS;
use super::widget::widget_size;

/// True iff at least one item has never been positioned.
pub fn needs_migration(items: &[DashboardItem]) -> bool {
    items.iter().any(|item| item.grid_position.is_none())
}

/// Assign positions to every unpositioned item on the default widest breakpoint.
pub fn migrate_to_grid_layout(items: Vec<DashboardItem>) -> Vec<DashboardItem> {
    migrate_to_grid_layout_with_cols(items, LG_COLS)
}

/// Lay unpositioned items out left to right in list order, wrapping when the
/// next one would pass `cols`. Items that already have a position are left
/// alone.
///
/// A wrap advances by the height of the item being wrapped, not the tallest
/// item of the row it leaves, so rows of mixed height can overlap.
pub fn migrate_to_grid_layout_with_cols(items: Vec<DashboardItem>, cols: i32) -> Vec<DashboardItem> {
    let mut current_x = 0;
    let mut current_y = 0;

    items
        .into_iter()
        .map(|mut item| {
            if item.grid_position.is_some() {
                return item;
            }

            let size = widget_size(&item.kind);
            if current_x + size.w > cols {
                current_x = 0;
                current_y += size.h;
            }

            item.grid_position = Some(GridPosition::new(current_x, current_y, size.w, size.h));
            current_x += size.w;
            item
        })
        .collect()
}
