//! # Crafting Station State Machine
//!
//! Every crafting building owns one station running at most one recipe.
//!
//! ## States
//!
//! - **Idle**: no recipe, progress 0.
//! - **Crafting**: inputs already debited, progress accumulating.
//! - **Complete**: instantaneous. Outputs are deposited and the station is
//!   back to Idle within the same [`CraftingStation::advance`] call.
//!
//! ```text
//!          start() ok               advance() crosses 1.0
//!   Idle ─────────────> Crafting ────────────────────────> Idle
//!    ^                     │                       (outputs deposited)
//!    └── start() rejected  └── advance() below 1.0 ──> Crafting
//! ```
//!
//! Inputs are never refunded. A station dropped mid-craft loses them.

use std::fmt;

use crate::building::BuildingArchetype;
use crate::catalog::{secs_to_micros, Recipe};
use crate::error::{EconomyError, EconomyResult};
use crate::kind::ResourceAmount;
use crate::ledger::Ledger;

/// Identity of a station, unique per economy and increasing in creation
/// order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StationId(pub u32);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "station#{}", self.0)
    }
}

/// Result of asking a station to start a recipe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    /// Inputs debited, crafting underway.
    Started,
    /// The station is already crafting.
    Busy,
    /// The building cannot run this recipe category.
    NotPermitted,
    /// The ledger does not cover the inputs.
    InsufficientResources,
}

impl StartOutcome {
    /// Returns true if crafting began.
    #[inline]
    #[must_use]
    pub const fn is_started(self) -> bool {
        matches!(self, Self::Started)
    }
}

/// Result of a completed craft.
#[derive(Clone, Debug, PartialEq)]
pub struct CraftResult {
    /// The recipe that was crafted.
    pub recipe_id: String,
    /// The station that crafted it.
    pub station: StationId,
    /// Items deposited into the ledger.
    pub outputs: Vec<ResourceAmount>,
}

#[derive(Clone, Debug)]
enum StationState {
    Idle,
    Crafting {
        recipe: Recipe,
        /// Microseconds accumulated since start, capped at the duration.
        elapsed_micros: u64,
        /// Non-empty advances so far.
        steps: u64,
    },
}

/// A per-building crafting state machine.
#[derive(Clone, Debug)]
pub struct CraftingStation {
    id: StationId,
    archetype: BuildingArchetype,
    state: StationState,
}

impl CraftingStation {
    /// Creates an idle station.
    #[must_use]
    pub const fn new(id: StationId, archetype: BuildingArchetype) -> Self {
        Self {
            id,
            archetype,
            state: StationState::Idle,
        }
    }

    /// Returns the station identity.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> StationId {
        self.id
    }

    /// Returns the owning building's archetype.
    #[inline]
    #[must_use]
    pub const fn archetype(&self) -> BuildingArchetype {
        self.archetype
    }

    /// Returns true while a recipe is running.
    #[inline]
    #[must_use]
    pub const fn is_crafting(&self) -> bool {
        matches!(self.state, StationState::Crafting { .. })
    }

    /// The recipe being crafted, if any.
    #[must_use]
    pub fn active_recipe(&self) -> Option<&Recipe> {
        match &self.state {
            StationState::Idle => None,
            StationState::Crafting { recipe, .. } => Some(recipe),
        }
    }

    /// Progress fraction in `[0, 1]`. Always 0 while idle.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn progress(&self) -> f32 {
        match &self.state {
            StationState::Idle => 0.0,
            StationState::Crafting {
                recipe,
                elapsed_micros,
                ..
            } => (*elapsed_micros as f64 / recipe.duration_micros() as f64).min(1.0) as f32,
        }
    }

    /// Returns true if this building may run `recipe`'s category.
    #[must_use]
    pub fn can_run(&self, recipe: &Recipe) -> bool {
        self.archetype.can_run(recipe.category())
    }

    /// Starts crafting `recipe`, debiting its inputs from `ledger`.
    ///
    /// Rejections leave both the station and the ledger untouched.
    ///
    /// # Errors
    ///
    /// Propagates ledger argument errors. A recipe built through
    /// [`Recipe::new`] never triggers one.
    pub fn start(&mut self, recipe: &Recipe, ledger: &mut Ledger) -> EconomyResult<StartOutcome> {
        if self.is_crafting() {
            return Ok(StartOutcome::Busy);
        }
        if !self.can_run(recipe) {
            tracing::debug!(
                station = %self.id,
                archetype = %self.archetype,
                recipe = %recipe.id(),
                "recipe category not permitted"
            );
            return Ok(StartOutcome::NotPermitted);
        }
        if !ledger.try_consume(recipe.inputs())? {
            return Ok(StartOutcome::InsufficientResources);
        }

        self.transition_to(StationState::Crafting {
            recipe: recipe.clone(),
            elapsed_micros: 0,
            steps: 0,
        });
        Ok(StartOutcome::Started)
    }

    /// Advances crafting by `elapsed_secs`.
    ///
    /// If this call carries progress to 1.0, outputs are deposited and the
    /// station returns to Idle before returning. Time past the completion
    /// point is discarded. Advancing an idle station does nothing.
    ///
    /// Time is counted in whole microseconds, so frame steps that add up to
    /// the recipe duration complete on the last step.
    ///
    /// # Errors
    ///
    /// - `InvalidElapsed` if `elapsed_secs` is negative or not finite
    /// - `ArithmeticOverflow` if an output would overflow its balance; the
    ///   station then stays complete-but-undelivered and retries next call
    pub fn advance(
        &mut self,
        elapsed_secs: f32,
        ledger: &mut Ledger,
    ) -> EconomyResult<Option<CraftResult>> {
        if !elapsed_secs.is_finite() || elapsed_secs < 0.0 {
            return Err(EconomyError::InvalidElapsed(elapsed_secs));
        }

        let StationState::Crafting {
            recipe,
            elapsed_micros,
            steps,
        } = &mut self.state
        else {
            return Ok(None);
        };
        let duration = recipe.duration_micros();
        let step = secs_to_micros(elapsed_secs);
        if step > 0 {
            *elapsed_micros = elapsed_micros.saturating_add(step).min(duration);
            *steps += 1;
        }
        // Each step rounds by at most half a microsecond.
        if elapsed_micros.saturating_add(*steps) < duration {
            return Ok(None);
        }
        *elapsed_micros = duration;

        if let Some(full) = recipe
            .outputs()
            .iter()
            .find(|o| ledger.balance(o.kind).checked_add(o.quantity).is_none())
        {
            return Err(EconomyError::ArithmeticOverflow(full.kind));
        }
        for output in recipe.outputs() {
            ledger.add(output.kind, output.quantity)?;
        }

        let result = CraftResult {
            recipe_id: recipe.id().to_string(),
            station: self.id,
            outputs: recipe.outputs().to_vec(),
        };
        self.transition_to(StationState::Idle);
        Ok(Some(result))
    }

    /// Switches state and logs the transition.
    fn transition_to(&mut self, next: StationState) {
        match (&self.state, &next) {
            (StationState::Idle, StationState::Crafting { recipe, .. }) => {
                tracing::debug!(station = %self.id, recipe = %recipe.id(), "crafting started");
            }
            (StationState::Crafting { recipe, .. }, StationState::Idle) => {
                tracing::debug!(station = %self.id, recipe = %recipe.id(), "crafting complete");
            }
            _ => {}
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{Category, ResourceKind};
    use ResourceKind::{Carbon, Iron, Steel};

    fn steel() -> Recipe {
        Recipe::new(
            "steel",
            "Steel",
            Category::Compound,
            3.0,
            vec![ResourceAmount::new(Iron, 2), ResourceAmount::new(Carbon, 1)],
            vec![ResourceAmount::new(Steel, 1)],
        )
        .unwrap()
    }

    fn stocked_ledger(iron: u32, carbon: u32) -> Ledger {
        let mut ledger = Ledger::new();
        if iron > 0 {
            ledger.add(Iron, iron).unwrap();
        }
        if carbon > 0 {
            ledger.add(Carbon, carbon).unwrap();
        }
        ledger
    }

    #[test]
    fn test_crafting_round_trip() {
        let mut ledger = stocked_ledger(2, 1);
        let mut station = CraftingStation::new(StationId(1), BuildingArchetype::Smelter);

        assert_eq!(station.start(&steel(), &mut ledger).unwrap(), StartOutcome::Started);
        assert!(station.is_crafting());
        assert_eq!(ledger.balance(Iron), 0);
        assert_eq!(ledger.balance(Carbon), 0);
        assert_eq!(station.progress(), 0.0);

        let done = station.advance(3.0, &mut ledger).unwrap();
        let done = done.expect("crossing 1.0 completes in the same call");
        assert_eq!(done.recipe_id, "steel");
        assert_eq!(done.station, StationId(1));
        assert!(!station.is_crafting());
        assert!(station.active_recipe().is_none());
        assert_eq!(station.progress(), 0.0);
        assert_eq!(ledger.balance(Steel), 1);
    }

    #[test]
    fn test_progress_accumulates() {
        let mut ledger = stocked_ledger(2, 1);
        let mut station = CraftingStation::new(StationId(1), BuildingArchetype::Smelter);
        station.start(&steel(), &mut ledger).unwrap();

        assert!(station.advance(1.0, &mut ledger).unwrap().is_none());
        assert!((station.progress() - 1.0 / 3.0).abs() < 1e-6);
        assert!(station.advance(1.0, &mut ledger).unwrap().is_none());
        assert!(station.advance(0.0, &mut ledger).unwrap().is_none());
        assert!(station.advance(1.0, &mut ledger).unwrap().is_some());
        assert_eq!(ledger.balance(Steel), 1);
    }

    /// Steps `dt` until completion; returns the 1-based call that completed.
    fn completing_call(dt: f32, limit: usize) -> Option<usize> {
        let mut ledger = stocked_ledger(2, 1);
        let mut station = CraftingStation::new(StationId(1), BuildingArchetype::Smelter);
        station.start(&steel(), &mut ledger).unwrap();
        (1..=limit).find(|_| station.advance(dt, &mut ledger).unwrap().is_some())
    }

    #[test]
    fn test_frame_steps_complete_on_last_step() {
        assert_eq!(completing_call(0.1, 40), Some(30));
        assert_eq!(completing_call(1.0 / 60.0, 200), Some(180));
        assert_eq!(completing_call(1.0 / 30.0, 100), Some(90));
        assert_eq!(completing_call(0.25, 20), Some(12));
    }

    #[test]
    fn test_overshoot_completes_once() {
        let mut ledger = stocked_ledger(2, 1);
        let mut station = CraftingStation::new(StationId(1), BuildingArchetype::Smelter);
        station.start(&steel(), &mut ledger).unwrap();

        assert!(station.advance(100.0, &mut ledger).unwrap().is_some());
        assert!(station.advance(100.0, &mut ledger).unwrap().is_none());
        assert_eq!(ledger.balance(Steel), 1);
    }

    #[test]
    fn test_exclusivity() {
        let mut ledger = stocked_ledger(4, 2);
        let mut station = CraftingStation::new(StationId(1), BuildingArchetype::Smelter);

        assert!(station.start(&steel(), &mut ledger).unwrap().is_started());
        assert_eq!(station.start(&steel(), &mut ledger).unwrap(), StartOutcome::Busy);
        assert_eq!(ledger.balance(Iron), 2);
        assert_eq!(ledger.balance(Carbon), 1);
    }

    #[test]
    fn test_insufficient_inputs() {
        let mut ledger = stocked_ledger(2, 0);
        let mut station = CraftingStation::new(StationId(1), BuildingArchetype::Smelter);

        assert_eq!(
            station.start(&steel(), &mut ledger).unwrap(),
            StartOutcome::InsufficientResources
        );
        assert!(!station.is_crafting());
        assert_eq!(ledger.balance(Iron), 2);
    }

    #[test]
    fn test_capability_mismatch() {
        let mut ledger = stocked_ledger(2, 1);
        for archetype in [BuildingArchetype::Wall, BuildingArchetype::QuantumFab] {
            let mut station = CraftingStation::new(StationId(7), archetype);
            assert_eq!(
                station.start(&steel(), &mut ledger).unwrap(),
                StartOutcome::NotPermitted
            );
        }
        assert_eq!(ledger.balance(Iron), 2);
        assert_eq!(ledger.balance(Carbon), 1);
    }

    #[test]
    fn test_invalid_elapsed() {
        let mut ledger = Ledger::new();
        let mut station = CraftingStation::new(StationId(1), BuildingArchetype::Smelter);
        assert_eq!(
            station.advance(-1.0, &mut ledger),
            Err(EconomyError::InvalidElapsed(-1.0))
        );
        assert!(station.advance(f32::NAN, &mut ledger).is_err());
        assert!(station.advance(1.0, &mut ledger).unwrap().is_none());
    }

    #[test]
    fn test_output_overflow_keeps_station_complete() {
        let mut ledger = stocked_ledger(2, 1);
        ledger.add(Steel, u32::MAX).unwrap();
        let mut station = CraftingStation::new(StationId(1), BuildingArchetype::Smelter);
        station.start(&steel(), &mut ledger).unwrap();

        assert_eq!(
            station.advance(3.0, &mut ledger),
            Err(EconomyError::ArithmeticOverflow(Steel))
        );
        assert!(station.is_crafting());
        assert_eq!(station.progress(), 1.0);

        ledger.remove(Steel, 1).unwrap();
        assert!(station.advance(0.0, &mut ledger).unwrap().is_some());
        assert_eq!(ledger.balance(Steel), u32::MAX);
    }
}
