//! # Crystal Puzzle Board
//!
//! A 3x3 grid of optional crystal placements checked against a fixed target
//! pattern. Filling every cell with the matching crystal wins the game.
//!
//! Placing a crystal withdraws one unit from the ledger; removing it returns
//! the unit. The board never holds a crystal the ledger did not pay for.

use crate::error::{EconomyError, EconomyResult};
use crate::kind::ResourceKind;
use crate::ledger::Ledger;

/// Width and height of the board.
pub const GRID_SIZE: usize = 3;

/// A full 3x3 arrangement, rows indexed by `y`: `pattern[y][x]`.
pub type Pattern = [[ResourceKind; GRID_SIZE]; GRID_SIZE];

/// The winning arrangement shipped with the game.
pub const DEFAULT_TARGET: Pattern = {
    use ResourceKind::{
        QuantumDotBlue as B, QuantumDotGreen as G, QuantumDotRed as R, QuantumDotYellow as Y,
    };
    [[R, B, R], [G, Y, G], [R, B, R]]
};

/// The puzzle grid.
#[derive(Clone, Debug)]
pub struct PuzzleBoard {
    /// Placed crystals, `cells[y][x]`.
    cells: [[Option<ResourceKind>; GRID_SIZE]; GRID_SIZE],
    /// Arrangement that solves the board.
    target: Pattern,
    /// Set once the solved notification has been handed out.
    solved_announced: bool,
}

impl PuzzleBoard {
    /// Creates an empty board with the default target.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: [[None; GRID_SIZE]; GRID_SIZE],
            target: DEFAULT_TARGET,
            solved_announced: false,
        }
    }

    /// Creates an empty board with a custom target.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the target contains a non-crystal kind.
    pub fn with_target(target: Pattern) -> EconomyResult<Self> {
        if let Some(kind) = target.iter().flatten().find(|k| !k.is_crystal()) {
            return Err(EconomyError::InvalidConfig(format!(
                "puzzle target contains non-crystal {kind}"
            )));
        }
        Ok(Self {
            target,
            ..Self::new()
        })
    }

    /// The target arrangement.
    #[must_use]
    pub const fn target(&self) -> &Pattern {
        &self.target
    }

    /// Places one `kind` crystal at `(x, y)`, withdrawing it from `ledger`.
    ///
    /// Returns `Ok(false)` with no side effects if the cell is occupied,
    /// `kind` is not a crystal, or the ledger holds none.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if the coordinate is off the grid.
    pub fn place(
        &mut self,
        x: usize,
        y: usize,
        kind: ResourceKind,
        ledger: &mut Ledger,
    ) -> EconomyResult<bool> {
        Self::check_bounds(x, y)?;
        if self.cells[y][x].is_some() || !kind.is_crystal() {
            return Ok(false);
        }
        if !ledger.remove(kind, 1)? {
            return Ok(false);
        }
        self.cells[y][x] = Some(kind);
        tracing::trace!(x, y, %kind, "crystal placed");
        Ok(true)
    }

    /// Removes the crystal at `(x, y)`, crediting it back to `ledger`.
    ///
    /// Returns `Ok(false)` if the cell is empty.
    ///
    /// # Errors
    ///
    /// - `OutOfBounds` if the coordinate is off the grid
    /// - `ArithmeticOverflow` if the refund overflows; the crystal stays
    pub fn remove(&mut self, x: usize, y: usize, ledger: &mut Ledger) -> EconomyResult<bool> {
        Self::check_bounds(x, y)?;
        let Some(kind) = self.cells[y][x] else {
            return Ok(false);
        };
        ledger.add(kind, 1)?;
        self.cells[y][x] = None;
        tracing::trace!(x, y, %kind, "crystal removed");
        Ok(true)
    }

    /// The crystal at `(x, y)`, if any.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if the coordinate is off the grid.
    pub fn at(&self, x: usize, y: usize) -> EconomyResult<Option<ResourceKind>> {
        Self::check_bounds(x, y)?;
        Ok(self.cells[y][x])
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// True iff every cell holds exactly the target crystal.
    ///
    /// Pure: calling it repeatedly never changes anything.
    #[must_use]
    pub fn check_solved(&self) -> bool {
        self.cells
            .iter()
            .flatten()
            .zip(self.target.iter().flatten())
            .all(|(cell, want)| *cell == Some(*want))
    }

    /// Returns true exactly once: on the first call that sees the board
    /// solved. Later calls return false even if the board stays solved.
    pub fn poll_solved(&mut self) -> bool {
        if self.solved_announced || !self.check_solved() {
            return false;
        }
        self.solved_announced = true;
        tracing::info!("puzzle solved");
        true
    }

    fn check_bounds(x: usize, y: usize) -> EconomyResult<()> {
        if x >= GRID_SIZE || y >= GRID_SIZE {
            return Err(EconomyError::OutOfBounds { x, y });
        }
        Ok(())
    }
}

impl Default for PuzzleBoard {
    fn default() -> Self {
        Self::new()
    }
}
