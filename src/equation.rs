//! Linear equations over unknown cells.
//!
//! Each unknown cell is a 0/1 variable: one if it holds a mine. An
//! [`Equation`] states that `constant` of its variables are mines:
//!
//! ```txt
//! c = p[0] + p[1] + ... + p[n]
//! ```
//!
//! Every coefficient is one, so an equation is just the constant and the set
//! of cells it mentions.

use std::fmt;

use thiserror::Error;

use crate::set::OrderedSet;
use crate::types::Coordinate;

/// An immutable equation `constant = sum(variables)`.
///
/// Ordered by constant first, then by the variable set, so equations can be
/// stored in an [`OrderedSet`] themselves.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Equation {
    constant: usize,
    variables: OrderedSet<Coordinate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EquationError {
    #[error("{constant} mines cannot fit into {variables} cells")]
    ConstantTooLarge { constant: usize, variables: usize },
}

impl Equation {
    /// Builds an equation, checking that the constant is achievable with
    /// one-valued coefficients.
    pub fn new(constant: usize, variables: OrderedSet<Coordinate>) -> Result<Self, EquationError> {
        if constant > variables.cardinality() {
            return Err(EquationError::ConstantTooLarge {
                constant,
                variables: variables.cardinality(),
            });
        }
        Ok(Self {
            constant,
            variables,
        })
    }

    /// `0 = p`: the cell is mine-free.
    pub fn safe(p: Coordinate) -> Self {
        Self {
            constant: 0,
            variables: OrderedSet::new().adjoin(p),
        }
    }

    /// `1 = p`: the cell is a mine.
    pub fn mine(p: Coordinate) -> Self {
        Self {
            constant: 1,
            variables: OrderedSet::new().adjoin(p),
        }
    }

    pub fn constant(&self) -> usize {
        self.constant
    }

    pub fn variables(&self) -> &OrderedSet<Coordinate> {
        &self.variables
    }

    /// Every variable is zero.
    pub fn all_safe(&self) -> bool {
        self.constant == 0
    }

    /// Every variable is one.
    pub fn all_mines(&self) -> bool {
        self.constant == self.variables.cardinality()
    }

    /// Single-equation mine probability for any one of the variables.
    pub fn mine_probability(&self) -> f32 {
        self.constant as f32 / self.variables.cardinality() as f32
    }

    /// Subtracts `subset` from `self` when `subset`'s variables are a proper
    /// subset of `self`'s.
    ///
    /// `Ok(None)` if the variables are not a proper subset or the constants
    /// would go negative. An error means the two equations contradict each
    /// other.
    pub fn subtract_subset(&self, subset: &Equation) -> Result<Option<Equation>, EquationError> {
        let Some(constant) = self.constant.checked_sub(subset.constant) else {
            return Ok(None);
        };
        if !subset.variables.proper_subset(&self.variables) {
            return Ok(None);
        }
        Equation::new(constant, self.variables.difference(&subset.variables)).map(Some)
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = ", self.constant)?;
        let mut variables = self.variables.iter();
        match variables.next() {
            None => write!(f, "0"),
            Some(first) => {
                write!(f, "{first}")?;
                for p in variables {
                    write!(f, " + {p}")?;
                }
                Ok(())
            }
        }
    }
}
