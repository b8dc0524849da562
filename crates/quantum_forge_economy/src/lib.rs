//! # Quantum Forge Economy
//!
//! The production core of Quantum Forge: everything the player owns, makes
//! and spends.
//!
//! ## Design Principles
//!
//! 1. **Integer quantities** - balances are `u32` and never go negative
//! 2. **Atomic spending** - multi-kind costs are debited all-or-nothing
//! 3. **Closed catalogs** - kinds are an enum, recipes are validated once
//! 4. **Explicit wiring** - components receive the ledger they act on; there
//!    are no globals
//!
//! ## Threading
//!
//! Everything runs on the caller's frame loop. Nothing blocks or spawns.
//!
//! ## Example
//!
//! ```rust,ignore
//! use quantum_forge_economy::{BuildingArchetype, EconomySystem};
//!
//! let mut economy = EconomySystem::with_builtin_catalog()?;
//! let smelter = economy.place_building(BuildingArchetype::Smelter)?.unwrap();
//! economy.start_recipe(smelter, "steel")?;
//!
//! // Every frame
//! for craft in economy.tick(dt)? {
//!     println!("{} finished {}", craft.station, craft.recipe_id);
//! }
//! for event in economy.drain_events() {
//!     ui.refresh(event);
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod building;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod kind;
pub mod ledger;
pub mod puzzle;
pub mod station;
pub mod systems;

pub use building::BuildingArchetype;
pub use catalog::{Recipe, RecipeCatalog};
pub use config::{EconomyConfig, PuzzleConfig, RecipeDef};
pub use error::{EconomyError, EconomyResult};
pub use events::{EconomyEvent, EventBus, EventReceiver, EventSender};
pub use kind::{Category, ResourceAmount, ResourceKind, Rgb};
pub use ledger::Ledger;
pub use puzzle::{Pattern, PuzzleBoard, DEFAULT_TARGET, GRID_SIZE};
pub use station::{CraftResult, CraftingStation, StartOutcome, StationId};
pub use systems::EconomySystem;
