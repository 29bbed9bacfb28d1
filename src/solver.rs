//! Equation solver: plays a whole game by deduction, guessing only when
//! stuck.
//!
//! Every unknown cell is a 0/1 variable. A probed cell showing `n` with `m`
//! marked neighbors gives the equation
//!
//! ```txt
//! n - m = (sum of its unknown neighbors)
//! ```
//!
//! Equations live in an [`EquationIndex`]. Cells whose equations changed are
//! queued on a worklist, and each popped cell runs three rules over the
//! equations that mention it:
//!
//! 1. Single equation: `0 = ...` makes every cell safe, `n = ...` over `n`
//!    cells makes every cell a mine.
//! 2. Subset: if `A ⊂ B`, then `B - A` is a new equation.
//! 3. Equation difference: subtract one equation (or two) from another; when
//!    the constant left equals the number of cells with a positive
//!    coefficient, those are mines and every cell with a negative
//!    coefficient is safe.
//!
//! When few unknown cells remain, the remaining mine count over all unknown
//! cells is added as one more equation. When the worklist runs dry, the
//! [`guess`](crate::guess) module picks the least risky cell.

use crate::board::{Board, Strategy};
use crate::config::SolverConfig;
use crate::equation::Equation;
use crate::guess;
use crate::index::EquationIndex;
use crate::set::OrderedSet;
use crate::types::{Coordinate, Look};

/// The equation strategy as a swappable [`Strategy`].
#[derive(Clone, Copy, Debug, Default)]
pub struct EquationStrategy {
    config: SolverConfig,
}

impl EquationStrategy {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Strategy for EquationStrategy {
    fn play<B: Board>(&mut self, board: &mut B) {
        EquationSolver::new(board, self.config).run();
    }
}

/// Plays `board` with the default configuration until it is done.
pub fn play<B: Board>(board: &mut B) {
    EquationStrategy::default().play(board);
}

/// State of one game: the equations, the worklist and per-game flags.
///
/// Created fresh for every game and dropped when the game ends.
pub struct EquationSolver<'a, B: Board> {
    board: &'a mut B,
    config: SolverConfig,
    index: EquationIndex,
    /// Cells whose equations must be re-examined.
    worklist: OrderedSet<Coordinate>,
    global_equation_added: bool,
}

impl<'a, B: Board> EquationSolver<'a, B> {
    /// Seeds the equations from every cell already revealed on `board`.
    ///
    /// The cells those equations mention are queued, so certain moves are
    /// made before the first guess.
    pub fn new(board: &'a mut B, config: SolverConfig) -> Self {
        let index = EquationIndex::new(board.columns(), board.rows());
        let mut solver = Self {
            board,
            config,
            index,
            worklist: OrderedSet::new(),
            global_equation_added: false,
        };

        let revealed: Vec<(Coordinate, u8)> = solver
            .board
            .cells()
            .filter_map(|p| solver.board.look(p).count().map(|n| (p, n)))
            .collect();
        for (p, n) in revealed {
            solver.add_revealed(p, n);
        }
        solver
    }

    /// Plays until the board is done.
    pub fn run(mut self) {
        while !self.board.done() {
            self.propagate();
            if self.board.done() {
                break;
            }
            match self.guess() {
                Some(Look::Boom) => break,
                Some(_) => {}
                None => {
                    tracing::warn!("board is unfinished but has no unknown cell left");
                    break;
                }
            }
        }
        tracing::info!(won = self.board.won(), "game over");
    }

    /// Applies the rules to queued cells until the worklist is empty or the
    /// game ends.
    fn propagate(&mut self) {
        while !self.board.done() {
            let Some(&p) = self.worklist.first() else {
                break;
            };
            self.worklist = self.worklist.rest();
            self.apply_rules(p);
        }
    }

    fn apply_rules(&mut self, p: Coordinate) {
        self.single_equation_rule(p);
        self.subset_rule(p);
        self.equation_difference_rule(p);
        self.add_global_equation_if_due();
    }

    /// Probes the least risky cell. Returns what the board answered, or
    /// `None` if there was nothing left to probe.
    fn guess(&mut self) -> Option<Look> {
        let p = guess::choose(&mut *self.board, &self.index)?;
        let outcome = self.board.probe(p);
        if outcome.count().is_some() {
            self.probe_all(&OrderedSet::new().adjoin(p));
        }
        Some(outcome)
    }

    /// `0 = ...`: probe everything. `n = ...` over `n` cells: mark everything.
    ///
    /// One resolving equation per cell is enough; the rest are revisited
    /// through the worklist.
    fn single_equation_rule(&mut self, p: Coordinate) {
        for e in &self.index.at(p) {
            if e.all_safe() {
                tracing::trace!(%e, "all safe");
                self.probe_all(e.variables());
                return;
            }
            if e.all_mines() {
                tracing::trace!(%e, "all mines");
                self.mark_all(e.variables());
                return;
            }
        }
    }

    /// For every pair at `p` where one equation's cells are a proper subset
    /// of the other's, adds the difference of the two.
    fn subset_rule(&mut self, p: Coordinate) {
        let equations = self.index.at(p);
        for e0 in &equations {
            for e1 in &equations {
                let derived = e1.subtract_subset(e0).unwrap_or_else(|err| {
                    tracing::warn!(%e0, %e1, %err, "inconsistent equations");
                    None
                });
                let Some(derived) = derived else {
                    continue;
                };
                let variables = derived.variables().clone();
                if self.index.add(derived) {
                    self.worklist = self.worklist.union(&variables);
                }
            }
        }
    }

    /// Subtracts pairs of equations at `p`, falling back to subtracting a
    /// third equation when one subtraction is not enough.
    fn equation_difference_rule(&mut self, p: Coordinate) {
        let equations = self.index.at(p);
        for e0 in &equations {
            for e1 in &equations {
                let Some(diff) = e1.constant().checked_sub(e0.constant()).filter(|&d| d > 0) else {
                    continue;
                };
                // e1 - e0: +1 on `extra`, -1 on e0's cells outside e1.
                let extra = e1.variables().difference(e0.variables());
                if extra.cardinality() == diff {
                    tracing::trace!(%e0, %e1, "equation difference");
                    self.mark_all(&extra);
                    self.probe_all(&e0.variables().difference(e1.variables()));
                } else if diff > 1 {
                    self.double_elimination(e0, e1, diff, &extra);
                }
            }
        }
    }

    /// e1 - e0 - e2 for every e2 touching `extra`.
    ///
    /// Cells in e1 only get +1. Cells in e0 or e2 but not e1 get -1 or -2,
    /// and cells in all three get -1. When the constant left equals the
    /// number of +1 cells, all of those are mines and every negative cell is
    /// safe.
    fn double_elimination(
        &mut self,
        e0: &Equation,
        e1: &Equation,
        diff: usize,
        extra: &OrderedSet<Coordinate>,
    ) {
        let candidates = extra
            .iter()
            .fold(OrderedSet::new(), |all, &q| all.union(&self.index.at(q)));
        for e2 in &candidates {
            let Some(diff2) = diff.checked_sub(e2.constant()).filter(|&d| d > 0) else {
                continue;
            };
            let mines = extra.difference(e2.variables());
            if mines.cardinality() != diff2 {
                continue;
            }
            let safe = e0
                .variables()
                .union(e2.variables())
                .difference(e1.variables())
                .union(&e0.variables().intersect(e2.variables()));
            tracing::trace!(%e0, %e1, %e2, "double elimination");
            self.mark_all(&mines);
            self.probe_all(&safe);
        }
    }

    /// Adds the equation over all unknown cells once few enough remain.
    fn add_global_equation_if_due(&mut self) {
        if self.global_equation_added
            || self.board.unknown_count() > self.config.global_equation_limit
        {
            return;
        }
        self.global_equation_added = true;

        let unknowns = self.board.unknowns();
        let remaining = self.board.mines_minus_marks();
        let Ok(constant) = usize::try_from(remaining) else {
            tracing::warn!(remaining, "more marks than mines");
            return;
        };
        match Equation::new(constant, unknowns.clone()) {
            Ok(e) => {
                tracing::debug!(%e, "adding global equation");
                self.index.add(e);
                self.worklist = self.worklist.union(&unknowns);
            }
            Err(err) => tracing::warn!(%err, "inconsistent global equation"),
        }
    }

    /// Probes cells known to be safe and feeds what they reveal back in.
    fn probe_all(&mut self, points: &OrderedSet<Coordinate>) {
        for &q in points {
            let outcome = self.board.probe(q);
            if outcome == Look::Boom {
                tracing::warn!(%q, "deduced safe cell held a mine");
            }
            debug_assert_ne!(outcome, Look::Boom, "deduced safe cell {q} held a mine");

            // Propagate `0 = q` before dropping every equation that uses q.
            self.index.add(Equation::safe(q));
            self.subset_rule(q);
            self.index.remove_all_at(q);

            if let Some(n) = outcome.count() {
                self.add_revealed(q, n);
            }
        }
    }

    /// Marks cells known to be mines.
    fn mark_all(&mut self, points: &OrderedSet<Coordinate>) {
        for &q in points {
            let outcome = self.board.mark(q);
            let refused = outcome != Look::Marked && !self.board.done();
            if refused {
                tracing::warn!(%q, ?outcome, "deduced mine could not be marked");
            }
            debug_assert!(!refused, "deduced mine {q} answered {outcome:?}");

            // Propagate `1 = q` before dropping every equation that uses q.
            self.index.add(Equation::mine(q));
            self.subset_rule(q);
            self.index.remove_all_at(q);
        }
    }

    /// Adds the equation a revealed count `n` at `p` gives over its unknown
    /// neighbors and queues those neighbors.
    fn add_revealed(&mut self, p: Coordinate, n: u8) {
        let mut unknowns = OrderedSet::new();
        let mut marks = 0;
        for q in p.neighbors() {
            match self.board.look(q) {
                Look::Unprobed => unknowns = unknowns.adjoin(q),
                Look::Marked => marks += 1,
                _ => {}
            }
        }
        if unknowns.is_empty() {
            return;
        }

        let Some(constant) = usize::from(n).checked_sub(marks) else {
            tracing::warn!(%p, n, marks, "more marks than the count allows");
            return;
        };
        match Equation::new(constant, unknowns.clone()) {
            Ok(e) => {
                self.index.add(e);
                self.worklist = self.worklist.union(&unknowns);
            }
            Err(err) => tracing::warn!(%p, %err, "inconsistent count"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::mine_map::MineMap;
    use crate::rng::GameRng;

    fn c(x: i32, y: i32) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn cells(points: &[(i32, i32)]) -> OrderedSet<Coordinate> {
        points.iter().map(|&(x, y)| c(x, y)).collect()
    }

    fn eqn(constant: usize, points: &[(i32, i32)]) -> Equation {
        Equation::new(constant, cells(points)).unwrap()
    }

    fn board(columns: i32, rows: i32, mines: &[(i32, i32)]) -> MineMap {
        let mines: Vec<_> = mines.iter().map(|&(x, y)| c(x, y)).collect();
        MineMap::with_mines(columns, rows, &mines, GameRng::from_seed(17)).unwrap()
    }

    #[test]
    fn test_seeds_equations_from_revealed_cells() {
        let mut map = board(3, 2, &[(0, 1)]);
        map.probe(c(0, 0));
        map.probe(c(1, 0));
        let solver = EquationSolver::new(&mut map, SolverConfig::default());

        assert!(solver.index.contains(&eqn(1, &[(0, 1), (1, 1)])));
        assert!(solver.index.contains(&eqn(1, &[(2, 0), (0, 1), (1, 1), (2, 1)])));
        assert_eq!(solver.worklist, cells(&[(2, 0), (0, 1), (1, 1), (2, 1)]));
        assert!(solver.index.is_consistent());
    }

    #[test]
    fn test_seed_accounts_for_marks() {
        let mut map = board(3, 1, &[(0, 0)]);
        map.probe(c(1, 0));
        map.mark(c(0, 0));
        let solver = EquationSolver::new(&mut map, SolverConfig::default());
        assert!(solver.index.contains(&eqn(0, &[(2, 0)])));
    }

    #[test]
    fn test_revealed_row_resolves_safe_cell() {
        // (0, 0) and (1, 0) both show 1; the mine is at (0, 1).
        let mut map = board(3, 2, &[(0, 1)]);
        map.probe(c(0, 0));
        map.probe(c(1, 0));
        play(&mut map);

        assert_eq!(map.look(c(2, 0)), Look::Count(0));
        assert!(map.look(c(0, 1)).count().is_none());
        assert!(map.won());
    }

    #[test]
    fn test_single_equation_rule_marks_full_equation() {
        let mut map = board(3, 3, &[(0, 0), (1, 0)]);
        {
            let mut solver = EquationSolver::new(&mut map, SolverConfig::default());
            solver.index.add(eqn(2, &[(0, 0), (1, 0)]));
            solver.single_equation_rule(c(0, 0));
            assert!(solver.index.at(c(0, 0)).is_empty());
            assert!(solver.index.at(c(1, 0)).is_empty());
        }
        assert_eq!(map.look(c(0, 0)), Look::Marked);
        assert_eq!(map.look(c(1, 0)), Look::Marked);
        assert_eq!(map.mines_minus_marks(), 0);
    }

    #[test]
    fn test_single_equation_rule_probes_zero_equation() {
        let mut map = board(3, 3, &[(2, 2)]);
        {
            let mut solver = EquationSolver::new(&mut map, SolverConfig::default());
            solver.index.add(eqn(0, &[(0, 0), (1, 0)]));
            solver.single_equation_rule(c(1, 0));
            // (1, 0) reveals 0 over its unknown neighbors.
            assert!(solver.index.contains(&eqn(0, &[(2, 0), (0, 1), (1, 1), (2, 1)])));
            assert!(solver.worklist.member(&c(2, 1)));
            assert!(solver.index.is_consistent());
        }
        assert_eq!(map.look(c(0, 0)), Look::Count(0));
        assert_eq!(map.look(c(1, 0)), Look::Count(0));
    }

    #[test]
    fn test_single_equation_rule_ignores_undetermined() {
        let mut map = board(3, 3, &[(0, 0)]);
        {
            let mut solver = EquationSolver::new(&mut map, SolverConfig::default());
            solver.index.add(eqn(1, &[(0, 0), (1, 0)]));
            solver.single_equation_rule(c(0, 0));
        }
        assert_eq!(map.unknown_count(), 9);
    }

    #[test]
    fn test_subset_rule_derives_difference_only() {
        let mut map = board(4, 3, &[(0, 0), (2, 0)]);
        {
            let mut solver = EquationSolver::new(&mut map, SolverConfig::default());
            solver.index.add(eqn(1, &[(0, 0), (1, 0)]));
            solver.index.add(eqn(2, &[(0, 0), (1, 0), (2, 0)]));
            solver.subset_rule(c(0, 0));

            assert!(solver.index.contains(&eqn(1, &[(2, 0)])));
            assert_eq!(solver.worklist, cells(&[(2, 0)]));
            assert_eq!(solver.index.equations().cardinality(), 3);

            // Deriving again adds nothing and queues nothing.
            solver.worklist = OrderedSet::new();
            solver.subset_rule(c(1, 0));
            assert!(solver.worklist.is_empty());
            assert_eq!(solver.index.equations().cardinality(), 3);
        }
        // The rule only derives; the board is untouched.
        assert_eq!(map.unknown_count(), 12);
        assert_eq!(map.mines_minus_marks(), 2);
    }

    #[test]
    fn test_subset_rule_skips_negative_difference() {
        let mut map = board(4, 3, &[(0, 0), (1, 0)]);
        let mut solver = EquationSolver::new(&mut map, SolverConfig::default());
        solver.index.add(eqn(2, &[(0, 0), (1, 0)]));
        solver.index.add(eqn(1, &[(0, 0), (1, 0), (2, 0)]));
        solver.subset_rule(c(0, 0));
        assert_eq!(solver.index.equations().cardinality(), 2);
    }

    #[test]
    fn test_difference_rule_marks_extra_cells() {
        let mut map = board(4, 3, &[(0, 0), (2, 0), (3, 0)]);
        {
            let mut solver = EquationSolver::new(&mut map, SolverConfig::default());
            solver.index.add(eqn(1, &[(0, 0), (1, 0)]));
            solver.index.add(eqn(3, &[(0, 0), (1, 0), (2, 0), (3, 0)]));
            solver.equation_difference_rule(c(0, 0));

            assert!(solver.index.contains(&eqn(1, &[(0, 0), (1, 0)])));
            assert!(solver.index.at(c(2, 0)).is_empty());
            assert!(solver.index.at(c(3, 0)).is_empty());
            assert!(solver.index.is_consistent());
        }
        assert_eq!(map.look(c(2, 0)), Look::Marked);
        assert_eq!(map.look(c(3, 0)), Look::Marked);
        // e0 has no cells outside e1, so nothing is probed.
        assert!(map.cells().all(|p| map.look(p).count().is_none()));
        assert_eq!(map.unknown_count(), 10);
    }

    #[test]
    fn test_difference_rule_probes_negative_cells() {
        // 1 = a + x and 4 = a + c + d + e: c, d and e are mines, x is safe.
        let mut map = board(5, 3, &[(0, 0), (2, 0), (3, 0), (4, 0)]);
        {
            let mut solver = EquationSolver::new(&mut map, SolverConfig::default());
            solver.index.add(eqn(1, &[(0, 0), (1, 1)]));
            solver.index.add(eqn(4, &[(0, 0), (2, 0), (3, 0), (4, 0)]));
            solver.equation_difference_rule(c(0, 0));
        }
        assert_eq!(map.look(c(2, 0)), Look::Marked);
        assert_eq!(map.look(c(3, 0)), Look::Marked);
        assert_eq!(map.look(c(4, 0)), Look::Marked);
        assert!(map.look(c(1, 1)).count().is_some());
        assert_eq!(map.look(c(0, 0)), Look::Unprobed);
    }

    #[test]
    fn test_double_elimination() {
        // e0: 0 = a            (a = (0, 0))
        // e1: 3 = a + b + c + d + f
        // e2: 1 = d + f + g    (g = (4, 1))
        // e1 - e0 leaves 3 over four cells; subtracting e2 as well leaves
        // 2 = b + c - g, so b and c are mines and g is safe. a cancels out.
        let mut map = board(5, 3, &[(1, 0), (2, 0), (3, 0)]);
        let (a, b, cc, d, f, g) = ((0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (4, 1));
        {
            let mut solver = EquationSolver::new(&mut map, SolverConfig::default());
            let e0 = eqn(0, &[a]);
            let e1 = eqn(3, &[a, b, cc, d, f]);
            let e2 = eqn(1, &[d, f, g]);
            solver.index.add(e2);
            let extra = e1.variables().difference(e0.variables());
            solver.double_elimination(&e0, &e1, 3, &extra);
            assert!(solver.index.is_consistent());
        }
        assert_eq!(map.look(c(1, 0)), Look::Marked);
        assert_eq!(map.look(c(2, 0)), Look::Marked);
        assert!(map.look(c(4, 1)).count().is_some());
        assert_eq!(map.look(c(0, 0)), Look::Unprobed);
        assert_eq!(map.look(c(3, 0)), Look::Unprobed);
        assert_eq!(map.look(c(4, 0)), Look::Unprobed);
    }

    #[test]
    fn test_global_equation_added_once() {
        // Top row probed; 8 unknown cells and 3 mines remain.
        let mut map = board(4, 3, &[(0, 2), (1, 2), (2, 2)]);
        for x in 0..4 {
            map.probe(c(x, 0));
        }
        assert_eq!(map.unknown_count(), 8);

        let mut solver = EquationSolver::new(&mut map, SolverConfig::default());
        let unknowns = solver.board.unknowns();
        let global = Equation::new(3, unknowns.clone()).unwrap();
        assert!(!solver.index.contains(&global));

        solver.add_global_equation_if_due();
        assert!(solver.global_equation_added);
        assert!(solver.index.contains(&global));
        assert!(unknowns.iter().all(|p| solver.worklist.member(p)));

        solver.index.remove(&global);
        solver.add_global_equation_if_due();
        assert!(!solver.index.contains(&global));
    }

    #[test]
    fn test_global_equation_waits_for_limit() {
        let mut map = board(4, 3, &[(0, 2)]);
        map.probe(c(0, 0));
        let unknowns = map.unknowns();
        assert_eq!(unknowns.cardinality(), 11);

        {
            let mut solver = EquationSolver::new(&mut map, SolverConfig::default());
            solver.add_global_equation_if_due();
            assert!(!solver.global_equation_added);
        }

        let config = SolverConfig {
            global_equation_limit: 11,
        };
        let mut solver = EquationSolver::new(&mut map, config);
        solver.add_global_equation_if_due();
        assert!(solver.global_equation_added);
        assert!(solver.index.contains(&Equation::new(1, unknowns).unwrap()));
    }

    #[test]
    fn test_play_finishes_random_games() {
        for seed in 0..50 {
            let mut map = MineMap::generate(&GameConfig::beginner().with_seed(seed)).unwrap();
            play(&mut map);
            assert!(map.done(), "seed {seed}");
        }
    }

    /// Drives propagation and guessing separately so that an explosion
    /// during propagation is caught even with debug assertions off.
    fn check_deductions_sound(config: GameConfig, seeds: std::ops::Range<u64>) {
        for seed in seeds {
            let mut map = MineMap::generate(&config.with_seed(seed)).unwrap();
            {
                let mut solver = EquationSolver::new(&mut map, SolverConfig::default());
                while !solver.board.done() {
                    solver.propagate();
                    assert!(
                        !solver.board.done() || solver.board.won(),
                        "seed {seed}: deduced move hit a mine\n{}",
                        solver.board
                    );
                    if solver.board.done() {
                        break;
                    }
                    if matches!(solver.guess(), Some(Look::Boom) | None) {
                        break;
                    }
                }
            }
            for p in map.cells().filter(|&p| map.look(p) == Look::Marked) {
                assert!(map.is_mine(p), "seed {seed}: marked safe cell {p}\n{map}");
            }
        }
    }

    #[test]
    fn test_deductions_sound_on_beginner() {
        check_deductions_sound(GameConfig::beginner(), 0..200);
    }

    #[test]
    fn test_deductions_sound_on_expert() {
        check_deductions_sound(GameConfig::expert(), 0..10);
    }

    #[test]
    fn test_strategy_trait() {
        let mut map = MineMap::generate(&GameConfig::intermediate().with_seed(3)).unwrap();
        let mut strategy = EquationStrategy::new(SolverConfig::default());
        strategy.play(&mut map);
        assert!(map.done());
    }
}
