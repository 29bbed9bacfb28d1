//! In-memory board: mine placement, number calculation and the [`Board`]
//! rules.
//!
//! Cells are stored flat in row-major layout: `cells[y * columns + x]`.
//! Probing reveals exactly one cell; there is no flood fill on zeros.

use std::fmt;

use crate::board::Board;
use crate::config::{ConfigError, GameConfig};
use crate::rng::GameRng;
use crate::types::{Coordinate, Look};

/// Value stored for a mine in the count grid.
const MINE: i8 = -1;

/// A board with known mine positions.
pub struct MineMap {
    columns: i32,
    rows: i32,
    /// `MINE` for a mine, otherwise the number of adjacent mines.
    counts: Vec<i8>,
    marked: Vec<bool>,
    unprobed: Vec<bool>,
    mines: i32,
    marks: i32,
    safe_unprobed: usize,
    exploded: bool,
    probed: bool,
    rng: GameRng,
}

impl MineMap {
    /// Random mine placement for the given configuration.
    ///
    /// Seeded from `config.seed` when present. The same generator later
    /// serves [`Board::pick`].
    pub fn generate(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = GameRng::from_optional_seed(config.seed);
        let mines = place_mines_random(config, &mut rng);
        Self::from_mines(config.columns, config.rows, &mines, rng)
    }

    /// A board with mines exactly at `mines`.
    pub fn with_mines(
        columns: i32,
        rows: i32,
        mines: &[Coordinate],
        rng: GameRng,
    ) -> Result<Self, ConfigError> {
        GameConfig::new(columns, rows, mines.len() as i32).validate()?;
        Self::from_mines(columns, rows, mines, rng)
    }

    fn from_mines(
        columns: i32,
        rows: i32,
        mines: &[Coordinate],
        rng: GameRng,
    ) -> Result<Self, ConfigError> {
        let cells = (columns * rows) as usize;
        let mut counts = vec![0; cells];
        for &p in mines {
            if p.x < 0 || p.x >= columns || p.y < 0 || p.y >= rows {
                return Err(ConfigError::MineOutOfBounds { x: p.x, y: p.y });
            }
            let slot = (p.y * columns + p.x) as usize;
            if counts[slot] == MINE {
                return Err(ConfigError::DuplicateMine { x: p.x, y: p.y });
            }
            counts[slot] = MINE;
        }

        let mut map = Self {
            columns,
            rows,
            counts,
            marked: vec![false; cells],
            unprobed: vec![true; cells],
            mines: mines.len() as i32,
            marks: 0,
            safe_unprobed: cells - mines.len(),
            exploded: false,
            probed: false,
            rng,
        };
        map.calculate_numbers();
        Ok(map)
    }

    /// Fills in the adjacent mine count of every non-mine cell.
    fn calculate_numbers(&mut self) {
        for y in 0..self.rows {
            for x in 0..self.columns {
                let slot = (y * self.columns + x) as usize;
                if self.counts[slot] == MINE {
                    continue;
                }
                let adjacent = Coordinate::new(x, y)
                    .neighbors()
                    .filter(|&n| self.is_mine(n))
                    .count();
                self.counts[slot] = adjacent as i8;
            }
        }
    }

    #[inline(always)]
    fn slot(&self, p: Coordinate) -> Option<usize> {
        (p.x >= 0 && p.x < self.columns && p.y >= 0 && p.y < self.rows)
            .then(|| (p.y * self.columns + p.x) as usize)
    }

    /// Whether `p` holds a mine. Out-of-bounds cells never do.
    pub fn is_mine(&self, p: Coordinate) -> bool {
        self.slot(p).is_some_and(|slot| self.counts[slot] == MINE)
    }

    pub fn mine_count(&self) -> i32 {
        self.mines
    }

    /// Whether at least one safe cell has been probed.
    ///
    /// A game lost on its very first probe never got a fair start.
    pub fn probed(&self) -> bool {
        self.probed
    }

    /// The answer of [`Board::look`] for every cell, row-major, as flat codes.
    pub fn look_codes(&self) -> Vec<i8> {
        self.cells().map(|p| self.look(p).code()).collect()
    }
}

impl Board for MineMap {
    fn look(&self, p: Coordinate) -> Look {
        match self.slot(p) {
            None => Look::OutOfBounds,
            Some(slot) if self.marked[slot] => Look::Marked,
            Some(slot) if self.unprobed[slot] => Look::Unprobed,
            Some(slot) if self.counts[slot] == MINE => Look::Boom,
            Some(slot) => Look::Count(self.counts[slot] as u8),
        }
    }

    fn probe(&mut self, p: Coordinate) -> Look {
        if self.done() {
            return self.look(p);
        }
        let Some(slot) = self.slot(p) else {
            return Look::OutOfBounds;
        };
        if self.marked[slot] {
            return Look::Marked;
        }
        if self.unprobed[slot] {
            self.unprobed[slot] = false;
            if self.counts[slot] == MINE {
                self.exploded = true;
            } else {
                self.safe_unprobed -= 1;
                self.probed = true;
            }
        }
        self.look(p)
    }

    fn mark(&mut self, p: Coordinate) -> Look {
        if self.done() {
            return self.look(p);
        }
        match self.slot(p) {
            None => Look::OutOfBounds,
            Some(slot) if self.marked[slot] => Look::Marked,
            Some(slot) if self.unprobed[slot] => {
                self.marked[slot] = true;
                self.marks += 1;
                Look::Marked
            }
            Some(_) => self.look(p),
        }
    }

    fn unmark(&mut self, p: Coordinate) -> Look {
        if self.done() {
            return self.look(p);
        }
        match self.slot(p) {
            None => Look::OutOfBounds,
            Some(slot) if self.marked[slot] => {
                self.marked[slot] = false;
                self.marks -= 1;
                Look::Unprobed
            }
            Some(_) => self.look(p),
        }
    }

    fn mines_minus_marks(&self) -> i32 {
        self.mines - self.marks
    }

    fn rows(&self) -> i32 {
        self.rows
    }

    fn columns(&self) -> i32 {
        self.columns
    }

    fn done(&self) -> bool {
        self.exploded || self.safe_unprobed == 0
    }

    fn won(&self) -> bool {
        !self.exploded && self.safe_unprobed == 0
    }

    fn pick(&mut self, n: usize) -> usize {
        self.rng.gen_range(n)
    }
}

/// Rows top-down with a row-number gutter, then a column-number footer.
///
/// `X` mine, `-` correctly marked mine, `?` wrongly marked cell, blank for
/// unprobed, digits for probed counts.
impl fmt::Display for MineMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.rows).rev() {
            write!(f, "{}:", y % 10)?;
            for x in 0..self.columns {
                let slot = (y * self.columns + x) as usize;
                let mine = self.counts[slot] == MINE;
                let glyph = match (self.marked[slot], mine, self.unprobed[slot]) {
                    (true, true, _) => '-',
                    (true, false, _) => '?',
                    (false, true, _) => 'X',
                    (false, false, true) => ' ',
                    (false, false, false) => char::from(b'0' + self.counts[slot] as u8),
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for x in 0..self.columns {
            write!(f, "{}", x % 10)?;
        }
        Ok(())
    }
}

/// Place `config.mines` mines at uniformly random distinct cells.
fn place_mines_random(config: &GameConfig, rng: &mut GameRng) -> Vec<Coordinate> {
    let columns = config.columns as usize;
    let rows = config.rows as usize;
    let mut taken = vec![false; columns * rows];
    let mut mines = Vec::with_capacity(config.mines as usize);

    while mines.len() < config.mines as usize {
        let x = rng.gen_range(columns);
        let y = rng.gen_range(rows);
        if !taken[y * columns + x] {
            taken[y * columns + x] = true;
            mines.push(Coordinate::new(x as i32, y as i32));
        }
    }

    mines
}
