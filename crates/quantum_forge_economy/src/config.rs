//! # Catalog Configuration
//!
//! Recipes, build costs, the starting grant and the puzzle target are
//! described in TOML and loaded once at startup.
//!
//! ```toml
//! [starting_grant]
//! Iron = 10
//!
//! [[recipes]]
//! id = "steel"
//! name = "Steel"
//! category = "compound"
//! duration = 3.0
//! inputs = { Iron = 2, Carbon = 1 }
//! outputs = { Steel = 1 }
//!
//! [build_costs]
//! smelter = { Iron = 4 }
//! ```
//!
//! Kind, category and archetype names are checked while parsing. Anything
//! unknown is rejected, never skipped.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::building::BuildingArchetype;
use crate::error::{EconomyError, EconomyResult};
use crate::kind::{Category, ResourceAmount, ResourceKind};
use crate::puzzle::{Pattern, DEFAULT_TARGET};

/// The catalog shipped with the game.
const BUILTIN_CATALOG: &str = include_str!("../data/economy.toml");

/// Root of a catalog file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EconomyConfig {
    /// Units credited to the ledger at game start.
    #[serde(default)]
    pub starting_grant: BTreeMap<ResourceKind, u32>,
    /// Recipe definitions, in catalog order.
    #[serde(default)]
    pub recipes: Vec<RecipeDef>,
    /// Cost of placing each building archetype.
    #[serde(default)]
    pub build_costs: BTreeMap<BuildingArchetype, BTreeMap<ResourceKind, u32>>,
    /// Puzzle board settings.
    #[serde(default)]
    pub puzzle: PuzzleConfig,
}

/// One recipe as written in a catalog file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeDef {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category tag, checked against building capabilities.
    pub category: Category,
    /// Crafting time in seconds.
    pub duration: f32,
    /// Tooltip text.
    #[serde(default)]
    pub description: String,
    /// Consumed kinds and quantities.
    #[serde(default)]
    pub inputs: BTreeMap<ResourceKind, u32>,
    /// Produced kinds and quantities.
    #[serde(default)]
    pub outputs: BTreeMap<ResourceKind, u32>,
}

/// Puzzle board settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PuzzleConfig {
    /// Target pattern, rows indexed by `y`.
    pub target: Pattern,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET,
        }
    }
}

impl EconomyConfig {
    /// Parses a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` on malformed TOML or unknown names.
    pub fn from_toml_str(source: &str) -> EconomyResult<Self> {
        toml::from_str(source).map_err(|e| EconomyError::InvalidConfig(e.to_string()))
    }

    /// Reads and parses a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> EconomyResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            EconomyError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }

    /// The catalog shipped with the game.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the embedded data is malformed.
    pub fn builtin() -> EconomyResult<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Starting grant as a list of amounts, in kind order.
    #[must_use]
    pub fn starting_grant_amounts(&self) -> Vec<ResourceAmount> {
        to_amounts(&self.starting_grant)
    }
}

/// Flattens a kind-keyed map into amounts, in kind order.
pub(crate) fn to_amounts(map: &BTreeMap<ResourceKind, u32>) -> Vec<ResourceAmount> {
    map.iter()
        .map(|(kind, quantity)| ResourceAmount::new(*kind, *quantity))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        let config = EconomyConfig::builtin().unwrap();
        assert!(!config.recipes.is_empty());
        assert!(config.starting_grant.contains_key(&ResourceKind::Iron));
        assert!(config.build_costs.contains_key(&BuildingArchetype::Smelter));
        assert_eq!(config.puzzle.target, DEFAULT_TARGET);
    }

    #[test]
    fn test_minimal_document() {
        let config = EconomyConfig::from_toml_str(
            r#"
            [starting_grant]
            Iron = 2

            [[recipes]]
            id = "steel"
            name = "Steel"
            category = "compound"
            duration = 3.0
            inputs = { Iron = 2, Carbon = 1 }
            outputs = { Steel = 1 }
            "#,
        )
        .unwrap();

        assert_eq!(
            config.starting_grant_amounts(),
            vec![ResourceAmount::new(ResourceKind::Iron, 2)]
        );
        let steel = &config.recipes[0];
        assert_eq!(steel.category, Category::Compound);
        assert_eq!(steel.inputs.get(&ResourceKind::Carbon), Some(&1));
        assert!(steel.description.is_empty());
        assert!(config.build_costs.is_empty());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result = EconomyConfig::from_toml_str(
            r#"
            [starting_grant]
            Mithril = 1
            "#,
        );
        assert!(matches!(result, Err(EconomyError::InvalidConfig(_))));
    }

    #[test]
    fn test_unknown_archetype_rejected() {
        let result = EconomyConfig::from_toml_str(
            r#"
            [build_costs]
            castle = { Iron = 1 }
            "#,
        );
        assert!(matches!(result, Err(EconomyError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_file_reported() {
        let result = EconomyConfig::load("/nonexistent/quantum_forge/economy.toml");
        assert!(matches!(result, Err(EconomyError::InvalidConfig(_))));
    }
}
