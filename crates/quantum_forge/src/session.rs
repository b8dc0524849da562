//! # Game Session
//!
//! Routes player input into the economy and tracks whether the game is won.
//!
//! ## Phases
//!
//! - **Playing**: every command is routed.
//! - **Won**: the puzzle board matched its target. Puzzle commands are
//!   dropped from here on; building and crafting keep working.
//!
//! The session owns the player's crystal selection. The economy core never
//! sees it; it only receives the kind to place.

use quantum_forge_economy::{
    BuildingArchetype, CraftResult, EconomyEvent, EconomyResult, EconomySystem, ResourceKind,
    StartOutcome, StationId,
};

use crate::node::ResourceNode;

/// Where the session is in the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Puzzle not yet solved.
    Playing,
    /// Puzzle solved; the game is over.
    Won,
}

/// A player action coming from the input layer.
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerCommand {
    /// Chooses which crystal the next empty-cell click places.
    SelectCrystal(ResourceKind),
    /// Clicks a puzzle cell: removes an occupant, or places the selection.
    ClickCell {
        /// Column.
        x: usize,
        /// Row.
        y: usize,
    },
    /// Places a building.
    Build(BuildingArchetype),
    /// Starts a recipe on a station.
    StartRecipe {
        /// Target station.
        station: StationId,
        /// Recipe identifier.
        recipe_id: String,
    },
    /// Removes a building.
    Demolish(StationId),
}

/// One player's game.
pub struct GameSession {
    economy: EconomySystem,
    phase: SessionPhase,
    selected: Option<ResourceKind>,
}

impl GameSession {
    /// Wraps an economy in a fresh session.
    #[must_use]
    pub fn new(economy: EconomySystem) -> Self {
        Self {
            economy,
            phase: SessionPhase::Playing,
            selected: None,
        }
    }

    /// Starts a session on the catalog shipped with the game.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded catalog is invalid.
    pub fn with_builtin_catalog() -> EconomyResult<Self> {
        Ok(Self::new(EconomySystem::with_builtin_catalog()?))
    }

    /// The economy.
    #[must_use]
    pub const fn economy(&self) -> &EconomySystem {
        &self.economy
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The crystal a click would place.
    #[must_use]
    pub const fn selected(&self) -> Option<ResourceKind> {
        self.selected
    }

    /// Routes one command.
    ///
    /// Returns true if the command changed anything.
    ///
    /// # Errors
    ///
    /// Propagates invalid references from the economy: unknown station or
    /// recipe, or a cell off the grid.
    pub fn apply(&mut self, command: PlayerCommand) -> EconomyResult<bool> {
        match command {
            PlayerCommand::SelectCrystal(kind) => Ok(self.select_crystal(kind)),
            PlayerCommand::ClickCell { x, y } => self.click_cell(x, y),
            PlayerCommand::Build(archetype) => Ok(self.build(archetype)?.is_some()),
            PlayerCommand::StartRecipe { station, recipe_id } => Ok(self
                .start_recipe(station, &recipe_id)?
                .is_started()),
            PlayerCommand::Demolish(station) => Ok(self.economy.demolish(station)),
        }
    }

    /// Selects a crystal kind. Non-crystal kinds are refused.
    pub fn select_crystal(&mut self, kind: ResourceKind) -> bool {
        if !kind.is_crystal() {
            return false;
        }
        self.selected = Some(kind);
        true
    }

    /// Handles a click on a puzzle cell.
    ///
    /// An occupied cell gives its crystal back. An empty cell receives the
    /// selected crystal if the ledger holds one. Ignored once won.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` for a cell off the grid.
    pub fn click_cell(&mut self, x: usize, y: usize) -> EconomyResult<bool> {
        if self.phase == SessionPhase::Won {
            return Ok(false);
        }
        if self.economy.crystal_at(x, y)?.is_some() {
            return self.economy.remove_crystal(x, y);
        }
        let Some(kind) = self.selected else {
            return Ok(false);
        };

        let placed = self.economy.place_crystal(x, y, kind)?;
        if placed && self.economy.is_solved() {
            self.transition_to(SessionPhase::Won);
        }
        Ok(placed)
    }

    /// Places a building.
    ///
    /// # Errors
    ///
    /// Propagates ledger argument errors.
    pub fn build(&mut self, archetype: BuildingArchetype) -> EconomyResult<Option<StationId>> {
        self.economy.place_building(archetype)
    }

    /// Starts a recipe on a station.
    ///
    /// # Errors
    ///
    /// Returns `StationNotFound` or `RecipeNotFound` for unknown references.
    pub fn start_recipe(
        &mut self,
        station: StationId,
        recipe_id: &str,
    ) -> EconomyResult<StartOutcome> {
        self.economy.start_recipe(station, recipe_id)
    }

    /// Strikes a world node, crediting its payload when it depletes.
    ///
    /// Returns the new balance of the node's kind on depletion.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if the payload does not fit.
    pub fn hit_node(&mut self, node: &mut ResourceNode) -> EconomyResult<Option<u32>> {
        match node.hit() {
            Some(payload) => self
                .economy
                .harvest(payload.kind, payload.quantity)
                .map(Some),
            None => Ok(None),
        }
    }

    /// Advances crafting by one frame.
    ///
    /// # Errors
    ///
    /// Returns `InvalidElapsed` for negative or non-finite time.
    pub fn update(&mut self, dt: f32) -> EconomyResult<Vec<CraftResult>> {
        self.economy.tick(dt)
    }

    /// Takes the economy's buffered notifications.
    pub fn drain_events(&mut self) -> Vec<EconomyEvent> {
        self.economy.drain_events()
    }

    fn transition_to(&mut self, next: SessionPhase) {
        if self.phase != next {
            tracing::info!(from = ?self.phase, to = ?next, "session phase changed");
            self.phase = next;
        }
    }
}
