//! Per-cell index of equations.
//!
//! Every cell of the board has a bucket holding the equations that mention
//! it. An equation is always present in the bucket of each of its variables,
//! or in none of them.

use std::fmt;

use crate::equation::Equation;
use crate::set::OrderedSet;
use crate::types::Coordinate;

/// Maps each board cell to the set of equations referencing it.
///
/// Buckets are stored row-major: `buckets[y * columns + x]`.
pub struct EquationIndex {
    columns: i32,
    rows: i32,
    buckets: Vec<OrderedSet<Equation>>,
}

impl EquationIndex {
    pub fn new(columns: i32, rows: i32) -> Self {
        let cells = (columns.max(0) as usize) * (rows.max(0) as usize);
        Self {
            columns,
            rows,
            buckets: vec![OrderedSet::new(); cells],
        }
    }

    #[inline(always)]
    fn slot(&self, p: Coordinate) -> Option<usize> {
        (p.x >= 0 && p.x < self.columns && p.y >= 0 && p.y < self.rows)
            .then(|| (p.y * self.columns + p.x) as usize)
    }

    /// The equations referencing `p`, empty if none or out of bounds.
    ///
    /// The returned set is a snapshot sharing structure with the bucket, so
    /// the index can be changed while it is being walked.
    pub fn at(&self, p: Coordinate) -> OrderedSet<Equation> {
        self.slot(p)
            .map(|slot| self.buckets[slot].clone())
            .unwrap_or_default()
    }

    /// Whether `e` is indexed.
    ///
    /// Only the bucket of the first variable is consulted; equations without
    /// variables are never indexed.
    pub fn contains(&self, e: &Equation) -> bool {
        e.variables()
            .first()
            .and_then(|&p| self.slot(p))
            .is_some_and(|slot| self.buckets[slot].member(e))
    }

    /// Indexes `e` under every one of its variables.
    ///
    /// Returns `false` if it was already present or has no variables.
    /// Equations reaching outside the board are refused.
    pub fn add(&mut self, e: Equation) -> bool {
        if e.variables().is_empty() || self.contains(&e) {
            return false;
        }
        let slots: Option<Vec<usize>> = e.variables().iter().map(|&p| self.slot(p)).collect();
        let Some(slots) = slots else {
            debug_assert!(false, "equation {e} reaches outside the board");
            tracing::warn!(%e, "equation reaches outside the board");
            return false;
        };
        for slot in slots {
            self.buckets[slot] = self.buckets[slot].adjoin(e.clone());
        }
        true
    }

    /// Removes `e` from the bucket of every one of its variables.
    pub fn remove(&mut self, e: &Equation) -> bool {
        if !self.contains(e) {
            return false;
        }
        for &p in e.variables() {
            if let Some(slot) = self.slot(p) {
                self.buckets[slot] = self.buckets[slot].remove(e);
            }
        }
        true
    }

    /// Retires every equation mentioning `p`, from all of its buckets.
    pub fn remove_all_at(&mut self, p: Coordinate) {
        for e in &self.at(p) {
            self.remove(e);
        }
    }

    /// All indexed equations.
    pub fn equations(&self) -> OrderedSet<Equation> {
        self.buckets
            .iter()
            .fold(OrderedSet::new(), |all, bucket| all.union(bucket))
    }

    /// Whether every equation sits in the bucket of each of its variables
    /// and nowhere else.
    pub fn is_consistent(&self) -> bool {
        self.buckets.iter().enumerate().all(|(slot, bucket)| {
            let here = Coordinate::new(slot as i32 % self.columns, slot as i32 / self.columns);
            bucket.iter().all(|e| {
                e.variables().member(&here)
                    && e.variables()
                        .iter()
                        .all(|&p| self.slot(p).is_some_and(|s| self.buckets[s].member(e)))
            })
        })
    }
}

impl fmt::Display for EquationIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.equations() {
            writeln!(f, "{e}")?;
        }
        Ok(())
    }
}
