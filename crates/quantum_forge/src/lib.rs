//! # Quantum Forge
//!
//! The game session around the economy core. Input handlers turn clicks and
//! menu choices into [`PlayerCommand`]s; the frame loop calls
//! [`GameSession::update`]; the session decides when the game is won.
//!
//! ```rust,ignore
//! use quantum_forge::{GameSession, PlayerCommand};
//!
//! let mut session = GameSession::with_builtin_catalog()?;
//! session.apply(PlayerCommand::SelectCrystal(ResourceKind::QuantumDotRed))?;
//! session.apply(PlayerCommand::ClickCell { x: 0, y: 0 })?;
//! session.update(dt)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod node;
pub mod session;

pub use node::ResourceNode;
pub use session::{GameSession, PlayerCommand, SessionPhase};
