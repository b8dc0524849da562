//! # Economy System
//!
//! The composition point for every collaborator that touches the economy.
//!
//! ```text
//! Harvesting ──> harvest() ──────────┐
//! Build menu ──> place_building() ───┤            ┌──> Ledger
//! Building UI ─> start_recipe() ─────┼─> Economy ─┼──> Stations (creation order)
//! Frame loop ──> tick() ─────────────┤   System   └──> PuzzleBoard
//! Puzzle view ─> place_crystal() ────┘      │
//!                                           └──> drain_events() / EventSender
//! ```
//!
//! All calls happen on one thread, in frame order. Stations are advanced in
//! creation order, so when two stations compete for the same inputs the
//! older one wins.

use std::collections::BTreeMap;

use crate::building::BuildingArchetype;
use crate::catalog::RecipeCatalog;
use crate::config::EconomyConfig;
use crate::error::{EconomyError, EconomyResult};
use crate::events::{EconomyEvent, EventSender};
use crate::kind::{ResourceAmount, ResourceKind};
use crate::ledger::Ledger;
use crate::puzzle::PuzzleBoard;
use crate::station::{CraftResult, CraftingStation, StartOutcome, StationId};

/// Owns the ledger, catalog, stations and puzzle board.
pub struct EconomySystem {
    /// Player resources.
    ledger: Ledger,
    /// Read-only recipe and building data.
    catalog: RecipeCatalog,
    /// The win-condition grid.
    puzzle: PuzzleBoard,
    /// Live stations, keyed (and therefore ordered) by creation.
    stations: BTreeMap<StationId, CraftingStation>,
    /// Next station identity to hand out.
    next_station: u32,
    /// Notifications not yet drained.
    events: Vec<EconomyEvent>,
    /// Optional channel receiving every notification.
    sink: Option<EventSender>,
}

impl EconomySystem {
    /// Builds an economy from a configuration: validated catalog, ledger
    /// holding the starting grant, empty puzzle board.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog, grant or puzzle target is invalid.
    pub fn new(config: &EconomyConfig) -> EconomyResult<Self> {
        let catalog = RecipeCatalog::from_config(config)?;
        let ledger = Ledger::with_grant(&config.starting_grant_amounts())?;
        let puzzle = PuzzleBoard::with_target(config.puzzle.target)?;
        Ok(Self::from_parts(ledger, catalog, puzzle))
    }

    /// Builds an economy from the catalog shipped with the game.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded catalog is invalid.
    pub fn with_builtin_catalog() -> EconomyResult<Self> {
        Self::new(&EconomyConfig::builtin()?)
    }

    /// Assembles an economy from existing parts.
    ///
    /// Notifications already pending in `ledger` are kept.
    #[must_use]
    pub fn from_parts(ledger: Ledger, catalog: RecipeCatalog, puzzle: PuzzleBoard) -> Self {
        let mut system = Self {
            ledger,
            catalog,
            puzzle,
            stations: BTreeMap::new(),
            next_station: 1,
            events: Vec::with_capacity(64),
            sink: None,
        };
        system.collect_ledger_events();
        system
    }

    /// Forwards every notification to `sender` from now on, starting with
    /// any still buffered. Forwarded notifications are not kept for
    /// [`EconomySystem::drain_events`].
    pub fn attach_event_sender(&mut self, sender: EventSender) {
        self.sink = Some(sender);
        self.dispatch();
    }

    // ========================================================================
    // Read access
    // ========================================================================

    /// The ledger.
    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The recipe catalog.
    #[must_use]
    pub const fn catalog(&self) -> &RecipeCatalog {
        &self.catalog
    }

    /// The puzzle board.
    #[must_use]
    pub const fn puzzle(&self) -> &PuzzleBoard {
        &self.puzzle
    }

    /// Balance of one kind.
    #[must_use]
    pub fn balance(&self, kind: ResourceKind) -> u32 {
        self.ledger.balance(kind)
    }

    /// A live station.
    #[must_use]
    pub fn station(&self, id: StationId) -> Option<&CraftingStation> {
        self.stations.get(&id)
    }

    /// All live stations in creation order.
    pub fn stations(&self) -> impl Iterator<Item = &CraftingStation> {
        self.stations.values()
    }

    /// Returns true if the ledger covers the inputs of recipe `id`.
    #[must_use]
    pub fn is_craftable(&self, recipe_id: &str) -> bool {
        self.catalog.is_craftable(recipe_id, &self.ledger)
    }

    // ========================================================================
    // Harvesting and building placement
    // ========================================================================

    /// Credits resources collected from a depleted world node.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount` or `ArithmeticOverflow` from the ledger.
    pub fn harvest(&mut self, kind: ResourceKind, amount: u32) -> EconomyResult<u32> {
        let total = self.ledger.add(kind, amount)?;
        self.collect_ledger_events();
        self.dispatch();
        Ok(total)
    }

    /// All-or-nothing spend for collaborators with their own costs.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount` if a requirement is zero.
    pub fn spend(&mut self, cost: &[ResourceAmount]) -> EconomyResult<bool> {
        let paid = self.ledger.try_consume(cost)?;
        self.collect_ledger_events();
        self.dispatch();
        Ok(paid)
    }

    /// Pays the build cost of `archetype` and creates its idle station.
    ///
    /// Returns `Ok(None)` if the ledger cannot cover the cost.
    ///
    /// # Errors
    ///
    /// Propagates ledger argument errors; a validated catalog never
    /// triggers one.
    pub fn place_building(
        &mut self,
        archetype: BuildingArchetype,
    ) -> EconomyResult<Option<StationId>> {
        let cost = self.catalog.build_cost(archetype);
        if !cost.is_empty() && !self.ledger.try_consume(cost)? {
            return Ok(None);
        }

        let id = StationId(self.next_station);
        self.next_station += 1;
        self.stations.insert(id, CraftingStation::new(id, archetype));
        tracing::info!(station = %id, %archetype, "building placed");

        self.collect_ledger_events();
        self.events.push(EconomyEvent::BuildingPlaced {
            station: id,
            archetype,
        });
        self.dispatch();
        Ok(Some(id))
    }

    /// Removes a building's station. Inputs of an in-flight recipe are lost.
    ///
    /// Returns false if no such station exists.
    pub fn demolish(&mut self, id: StationId) -> bool {
        let Some(station) = self.stations.remove(&id) else {
            return false;
        };
        if let Some(recipe) = station.active_recipe() {
            tracing::info!(
                station = %id,
                recipe = %recipe.id(),
                progress = station.progress(),
                "building demolished mid-craft, inputs lost"
            );
        }
        true
    }

    // ========================================================================
    // Crafting
    // ========================================================================

    /// Asks a station to start a recipe.
    ///
    /// # Errors
    ///
    /// - `StationNotFound` if `station` is not live
    /// - `RecipeNotFound` if `recipe_id` is not in the catalog
    pub fn start_recipe(
        &mut self,
        station: StationId,
        recipe_id: &str,
    ) -> EconomyResult<StartOutcome> {
        let recipe = self
            .catalog
            .get(recipe_id)
            .ok_or_else(|| EconomyError::RecipeNotFound(recipe_id.to_string()))?;
        let target = self
            .stations
            .get_mut(&station)
            .ok_or(EconomyError::StationNotFound(station.0))?;

        let outcome = target.start(recipe, &mut self.ledger)?;
        self.collect_ledger_events();
        if outcome.is_started() {
            self.events.push(EconomyEvent::RecipeStarted {
                recipe_id: recipe_id.to_string(),
                station,
            });
        }
        self.dispatch();
        Ok(outcome)
    }

    /// Advances every crafting station by `elapsed_secs`, in creation order.
    ///
    /// Returns the crafts that completed during this tick.
    ///
    /// # Errors
    ///
    /// Returns `InvalidElapsed` for negative or non-finite time, or the first
    /// output overflow raised by a station. A failing station never holds up
    /// the others: every station is still advanced, and crafts completed in
    /// the same tick are deposited and announced as `RecipeCompleted`.
    pub fn tick(&mut self, elapsed_secs: f32) -> EconomyResult<Vec<CraftResult>> {
        if !elapsed_secs.is_finite() || elapsed_secs < 0.0 {
            return Err(EconomyError::InvalidElapsed(elapsed_secs));
        }

        let mut completed = Vec::new();
        let mut first_failure = None;
        for station in self.stations.values_mut() {
            match station.advance(elapsed_secs, &mut self.ledger) {
                Ok(Some(result)) => {
                    self.events.extend(self.ledger.drain_events());
                    self.events.push(EconomyEvent::RecipeCompleted {
                        recipe_id: result.recipe_id.clone(),
                        station: result.station,
                    });
                    completed.push(result);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(station = %station.id(), error = %e, "craft not delivered");
                    if first_failure.is_none() {
                        first_failure = Some(e);
                    }
                }
            }
        }
        self.collect_ledger_events();
        self.dispatch();

        match first_failure {
            Some(e) => Err(e),
            None => Ok(completed),
        }
    }

    // ========================================================================
    // Puzzle
    // ========================================================================

    /// Places a crystal on the puzzle board.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` for coordinates off the grid.
    pub fn place_crystal(&mut self, x: usize, y: usize, kind: ResourceKind) -> EconomyResult<bool> {
        let placed = self.puzzle.place(x, y, kind, &mut self.ledger)?;
        self.collect_ledger_events();
        if placed && self.puzzle.poll_solved() {
            self.events.push(EconomyEvent::PuzzleSolved);
        }
        self.dispatch();
        Ok(placed)
    }

    /// Removes a crystal from the puzzle board, refunding it.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` for coordinates off the grid.
    pub fn remove_crystal(&mut self, x: usize, y: usize) -> EconomyResult<bool> {
        let removed = self.puzzle.remove(x, y, &mut self.ledger)?;
        self.collect_ledger_events();
        self.dispatch();
        Ok(removed)
    }

    /// The crystal at a cell.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` for coordinates off the grid.
    pub fn crystal_at(&self, x: usize, y: usize) -> EconomyResult<Option<ResourceKind>> {
        self.puzzle.at(x, y)
    }

    /// True iff the puzzle board matches its target.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.puzzle.check_solved()
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Takes every buffered notification, oldest first.
    pub fn drain_events(&mut self) -> Vec<EconomyEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of buffered notifications.
    #[must_use]
    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }

    fn collect_ledger_events(&mut self) {
        self.events.extend(self.ledger.drain_events());
    }

    fn dispatch(&mut self) {
        if let Some(sink) = &self.sink {
            for event in self.events.drain(..) {
                sink.send(event);
            }
        }
    }
}
