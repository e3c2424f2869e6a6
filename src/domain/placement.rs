// Placement of newly created and duplicated widgets
use super::dashboard::{DashboardItem, GridPosition};
use super::grid::LG_COLS;

/// Top-left cell of a free slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

/// First free cell on the default widest breakpoint.
pub fn calculate_next_available_position(items: &[DashboardItem]) -> Cell {
    next_available_position_with_cols(items, LG_COLS)
}

/// First cell, scanning rows top to bottom and columns left to right, that no
/// positioned item covers.
///
/// Only a single free cell is looked for, not a region large enough for the
/// widget about to be placed, so a wide or tall widget anchored here may still
/// overlap a neighbour.
pub fn next_available_position_with_cols(items: &[DashboardItem], cols: i32) -> Cell {
    let positions: Vec<&GridPosition> = items.iter().filter_map(|i| i.grid_position.as_ref()).collect();
    if positions.is_empty() {
        return Cell { x: 0, y: 0 };
    }

    let max_y = positions.iter().map(|p| p.bottom()).max().unwrap_or(0).max(0);

    for y in 0..=max_y.saturating_add(1) {
        for x in 0..cols.max(1) {
            if !positions.iter().any(|p| p.covers(x, y)) {
                return Cell { x, y };
            }
        }
    }

    Cell {
        x: 0,
        y: max_y.saturating_add(1),
    }
}

/// Position for a copy of `original`: directly to its right, or wrapped below
/// it when the copy would run past the right edge.
pub fn duplicate_position(original: &GridPosition, cols: i32) -> GridPosition {
    let right = original.x.saturating_add(original.w);
    let (x, y) = if right.saturating_add(original.w) > cols {
        (0, original.bottom())
    } else {
        (right, original.y)
    };

    GridPosition {
        x,
        y,
        is_static: false,
        ..original.clone()
    }
}
