//! Game and solver configuration.
//!
//! Both structs serialize with `camelCase` field names so they can be passed
//! straight from JavaScript.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size, mine count and optional seed of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub columns: i32,
    pub rows: i32,
    pub mines: i32,
    /// Seed for mine placement and guessing; entropy if absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board must be at least 1x1 (got {columns}x{rows})")]
    EmptyBoard { columns: i32, rows: i32 },
    #[error("board of {columns}x{rows} cells is too large")]
    BoardTooLarge { columns: i32, rows: i32 },
    #[error("mine count must not be negative (got {0})")]
    NegativeMines(i32),
    #[error("{mines} mines leave no safe cell on a board of {cells} cells")]
    TooManyMines { mines: i32, cells: i32 },
    #[error("mine at ({x}, {y}) is outside the board")]
    MineOutOfBounds { x: i32, y: i32 },
    #[error("mine at ({x}, {y}) is listed twice")]
    DuplicateMine { x: i32, y: i32 },
}

impl GameConfig {
    pub const fn new(columns: i32, rows: i32, mines: i32) -> Self {
        Self {
            columns,
            rows,
            mines,
            seed: None,
        }
    }

    /// 8 x 8 with 10 mines.
    pub const fn beginner() -> Self {
        Self::new(8, 8, 10)
    }

    /// 15 columns, 13 rows, 40 mines.
    pub const fn intermediate() -> Self {
        Self::new(15, 13, 40)
    }

    /// 30 columns, 16 rows, 99 mines.
    pub const fn expert() -> Self {
        Self::new(30, 16, 99)
    }

    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// `None` if the cell count does not fit in an `i32`.
    pub fn cell_count(&self) -> Option<i32> {
        self.columns.checked_mul(self.rows)
    }

    /// Checks that the board exists and keeps at least one safe cell.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns <= 0 || self.rows <= 0 {
            return Err(ConfigError::EmptyBoard {
                columns: self.columns,
                rows: self.rows,
            });
        }
        let Some(cells) = self.cell_count() else {
            return Err(ConfigError::BoardTooLarge {
                columns: self.columns,
                rows: self.rows,
            });
        };
        if self.mines < 0 {
            return Err(ConfigError::NegativeMines(self.mines));
        }
        if self.mines >= cells {
            return Err(ConfigError::TooManyMines {
                mines: self.mines,
                cells,
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::beginner()
    }
}

/// Tunables of the equation solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolverConfig {
    /// Once this few unknown cells remain, the equation tying the remaining
    /// mines to all unknown cells is added.
    pub global_equation_limit: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            global_equation_limit: 8,
        }
    }
}
