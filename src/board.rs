//! The board contract a player operates on.
//!
//! A player drives the board towards a state in which every cell without a
//! mine has been probed, without ever probing a mine. Everything it learns
//! comes through [`Board::look`] and the answers to its own moves.

use crate::set::OrderedSet;
use crate::types::{Coordinate, Look};

/// A Minesweeper board as seen by a player.
///
/// All operations are total: out-of-range cells and finished games are
/// answered with [`Look`] outcomes, never with errors.
pub trait Board {
    /// The current state of a cell. No side effects.
    fn look(&self, p: Coordinate) -> Look;

    /// Reveals a cell.
    ///
    /// - Once the game is finished this behaves like [`Board::look`].
    /// - A marked cell answers [`Look::Marked`] and stays marked.
    /// - A mine answers [`Look::Boom`] and ends the game.
    /// - Otherwise the adjacent mine count is returned.
    fn probe(&mut self, p: Coordinate) -> Look;

    /// Flags an unprobed cell as a mine, answering [`Look::Marked`].
    ///
    /// Marking a marked cell changes nothing; a probed cell answers its
    /// count. Once the game is finished this behaves like [`Board::look`].
    fn mark(&mut self, p: Coordinate) -> Look;

    /// Removes a mark, answering [`Look::Unprobed`].
    ///
    /// An unprobed cell answers [`Look::Unprobed`]; a probed cell answers its
    /// count. Once the game is finished this behaves like [`Board::look`].
    fn unmark(&mut self, p: Coordinate) -> Look;

    /// Total mines minus placed marks.
    fn mines_minus_marks(&self) -> i32;

    fn rows(&self) -> i32;

    fn columns(&self) -> i32;

    /// Whether the game has been won or a mine has been probed.
    fn done(&self) -> bool;

    /// Whether every safe cell has been probed without probing a mine.
    fn won(&self) -> bool;

    /// A uniformly random number in `[0, n)`.
    ///
    /// # Panics
    ///
    /// May panic if `n` is zero.
    fn pick(&mut self, n: usize) -> usize;

    /// Every cell on the board, row-major.
    fn cells(&self) -> impl Iterator<Item = Coordinate> {
        let columns = self.columns();
        (0..self.rows()).flat_map(move |y| (0..columns).map(move |x| Coordinate::new(x, y)))
    }

    /// Number of cells still unprobed and unmarked.
    fn unknown_count(&self) -> usize {
        self.cells()
            .filter(|&p| self.look(p) == Look::Unprobed)
            .count()
    }

    /// The cells still unprobed and unmarked.
    fn unknowns(&self) -> OrderedSet<Coordinate> {
        self.cells()
            .filter(|&p| self.look(p) == Look::Unprobed)
            .collect()
    }
}

/// A player: plays one game on the given board until it is done.
pub trait Strategy {
    fn play<B: Board>(&mut self, board: &mut B);
}
