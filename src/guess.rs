//! Guess selection for when no certain move is left.
//!
//! Every equation `c = p[0] + ... + p[n]` gives each of its cells a naive
//! mine probability of `c / (n + 1)`. A cell's risk is the worst of these over
//! all equations mentioning it; cells no equation mentions get the board-wide
//! density. The least risky cell is probed.

use crate::board::Board;
use crate::equation::Equation;
use crate::index::EquationIndex;
use crate::types::{Coordinate, Look};

/// Estimated mine probability of `p`.
///
/// `baseline` is used when no equation mentions `p`.
pub fn mine_probability(index: &EquationIndex, p: Coordinate, baseline: f32) -> f32 {
    let equations = index.at(p);
    if equations.is_empty() {
        return baseline;
    }
    equations
        .iter()
        .map(Equation::mine_probability)
        .fold(0.0, f32::max)
}

/// Picks the unknown cell with the lowest estimated mine probability.
///
/// Ties go to the first minimum found when scanning row-major, wrapping
/// around, from a uniformly random unknown cell. Returns `None` if no cell is
/// unknown.
pub fn choose<B: Board>(board: &mut B, index: &EquationIndex) -> Option<Coordinate> {
    let unknowns = board.unknowns();
    let count = unknowns.cardinality();
    if count == 0 {
        return None;
    }
    let baseline = board.mines_minus_marks() as f32 / count as f32;

    let start = *unknowns.iter().nth(board.pick(count))?;
    let mut best = start;
    let mut best_probability = mine_probability(index, start, baseline);

    let rows = board.rows();
    let columns = board.columns();
    for j in 0..rows {
        let y = (start.y + j) % rows;
        for i in 0..columns {
            let p = Coordinate::new((start.x + i) % columns, y);
            if board.look(p) != Look::Unprobed {
                continue;
            }
            let probability = mine_probability(index, p, baseline);
            if probability < best_probability {
                best = p;
                best_probability = probability;
            }
        }
    }

    tracing::debug!(%best, probability = best_probability, unknowns = count, "guessing");
    Some(best)
}
