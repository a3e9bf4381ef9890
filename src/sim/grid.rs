//! Grid geometry: cells, canvas-to-grid mapping, toroidal wrapping
//!
//! Pure functions only; everything here is safe to call from tests and
//! from the renderer side without touching simulation state.

use serde::{Deserialize, Serialize};

/// A single grid cell, identified by value only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Discrete playfield dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub cols: i32,
    pub rows: i32,
}

impl Grid {
    pub const fn new(cols: i32, rows: i32) -> Self {
        Self { cols, rows }
    }

    /// Map continuous canvas dimensions to a cell grid (floor division)
    pub fn from_canvas(width_px: f32, height_px: f32, cell_px: f32) -> Self {
        Self {
            cols: (width_px / cell_px).floor() as i32,
            rows: (height_px / cell_px).floor() as i32,
        }
    }

    pub fn cell_count(&self) -> usize {
        (self.cols as usize) * (self.rows as usize)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.cols && cell.y >= 0 && cell.y < self.rows
    }

    /// Toroidal wrap for a cell one unit step outside the grid.
    ///
    /// Moves are single cell steps, so one branch per axis suffices.
    pub fn wrap(&self, cell: Cell) -> Cell {
        let x = if cell.x < 0 {
            self.cols - 1
        } else if cell.x >= self.cols {
            0
        } else {
            cell.x
        };
        let y = if cell.y < 0 {
            self.rows - 1
        } else if cell.y >= self.rows {
            0
        } else {
            cell.y
        };
        Cell::new(x, y)
    }
}

/// A 2x2 block of cells anchored at its top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub origin: Cell,
}

impl Region {
    pub const SIDE: i32 = 2;

    pub const fn new(origin: Cell) -> Self {
        Self { origin }
    }

    /// Inclusive membership test over the 2x2 block
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.origin.x
            && cell.x < self.origin.x + Self::SIDE
            && cell.y >= self.origin.y
            && cell.y < self.origin.y + Self::SIDE
    }

    /// All four cells of the block
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..Self::SIDE).flat_map(move |dy| {
            (0..Self::SIDE).map(move |dx| Cell::new(self.origin.x + dx, self.origin.y + dy))
        })
    }
}
