use std::collections::{BTreeMap, HashSet};

use crate::geometry::{Point, Rect};

use super::graph::PointKey;

/// Sparse row-major table of grid cells with incremental row/column
/// counts. Built once per routing call from the sorted ruler coordinates.
#[derive(Debug, Default)]
pub(crate) struct Grid {
    rows: usize,
    columns: usize,
    data: BTreeMap<usize, BTreeMap<usize, Rect>>,
}

impl Grid {
    fn set(&mut self, row: usize, column: usize, cell: Rect) {
        self.rows = self.rows.max(row + 1);
        self.columns = self.columns.max(column + 1);
        self.data.entry(row).or_default().insert(column, cell);
    }

    pub(crate) fn rectangles(&self) -> Vec<Rect> {
        self.data
            .values()
            .flat_map(|row| row.values().copied())
            .collect()
    }
}

/// Splits `bounds` at every ruler coordinate, row-major. Rulers must be
/// sorted ascending and lie strictly inside the bounds; duplicate rulers
/// produce degenerate cells whose points collapse during deduplication.
pub(crate) fn build_grid(verticals: &[f32], horizontals: &[f32], bounds: Rect) -> Grid {
    let mut grid = Grid::default();
    let mut left = bounds.left;
    let mut top = bounds.top;
    let mut column = 0;
    let mut row = 0;

    for &y in horizontals {
        for &x in verticals {
            grid.set(row, column, Rect::from_ltrb(left, top, x, y));
            column += 1;
            left = x;
        }
        grid.set(row, column, Rect::from_ltrb(left, top, bounds.right(), y));
        left = bounds.left;
        top = y;
        column = 0;
        row += 1;
    }

    // Bottom band below the last horizontal ruler.
    for &x in verticals {
        grid.set(row, column, Rect::from_ltrb(left, top, x, bounds.bottom()));
        column += 1;
        left = x;
    }
    grid.set(
        row,
        column,
        Rect::from_ltrb(left, top, bounds.right(), bounds.bottom()),
    );
    grid
}

/// Candidate waypoints for a grid. Cells on the grid border contribute
/// only their outer points, interior cells all nine canonical points;
/// emitting all nine everywhere would also be correct, this just trims the
/// candidate count. Points falling inside either obstacle are discarded
/// and duplicates collapse to one, preserving first-seen order.
pub(crate) fn grid_points(grid: &Grid, obstacles: &[Rect]) -> Vec<Point> {
    let mut raw = Vec::new();
    for (&row, columns) in &grid.data {
        let first_row = row == 0;
        let last_row = row + 1 == grid.rows;
        for (&column, cell) in columns {
            let first_col = column == 0;
            let last_col = column + 1 == grid.columns;
            let corner = (first_row && first_col)
                || (first_row && last_col)
                || (last_row && last_col)
                || (last_row && first_col);
            if corner {
                raw.extend([
                    cell.north_west(),
                    cell.north_east(),
                    cell.south_west(),
                    cell.south_east(),
                ]);
            } else if first_row {
                raw.extend([cell.north_west(), cell.north(), cell.north_east()]);
            } else if last_row {
                raw.extend([cell.south_east(), cell.south(), cell.south_west()]);
            } else if first_col {
                raw.extend([cell.north_west(), cell.west(), cell.south_west()]);
            } else if last_col {
                raw.extend([cell.north_east(), cell.east(), cell.south_east()]);
            } else {
                raw.extend([
                    cell.north_west(),
                    cell.north(),
                    cell.north_east(),
                    cell.east(),
                    cell.south_east(),
                    cell.south(),
                    cell.south_west(),
                    cell.west(),
                    cell.center(),
                ]);
            }
        }
    }

    let mut seen = HashSet::new();
    raw.into_iter()
        .filter(|p| seen.insert(PointKey::of(*p)))
        .filter(|p| !obstacles.iter().any(|o| o.contains(*p)))
        .collect()
}
