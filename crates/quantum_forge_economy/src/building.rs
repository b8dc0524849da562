//! Building archetypes and their crafting capabilities.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kind::Category;

/// The kind of building that owns a crafting station.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingArchetype {
    /// Harvests raw materials. Never crafts.
    Extractor,
    /// Refines raw materials into compounds.
    Smelter,
    /// Synthesizes precursors.
    ChemLab,
    /// Grows quantum dot crystals.
    QuantumFab,
    /// Assembles weapons.
    Armory,
    /// Defensive wall. Never crafts.
    Wall,
}

impl BuildingArchetype {
    /// All archetypes in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Extractor,
        Self::Smelter,
        Self::ChemLab,
        Self::QuantumFab,
        Self::Armory,
        Self::Wall,
    ];

    /// Recipe categories this archetype may run.
    #[must_use]
    pub const fn allowed_categories(self) -> &'static [Category] {
        match self {
            Self::Extractor | Self::Wall => &[],
            Self::Smelter => &[Category::Compound],
            Self::ChemLab => &[Category::Precursor],
            Self::QuantumFab => &[Category::Crystal],
            Self::Armory => &[Category::Weapon],
        }
    }

    /// Returns true if a recipe of `category` may run in this building.
    #[must_use]
    pub fn can_run(self, category: Category) -> bool {
        self.allowed_categories().contains(&category)
    }

    /// Identifier used in catalog files.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Extractor => "extractor",
            Self::Smelter => "smelter",
            Self::ChemLab => "chem_lab",
            Self::QuantumFab => "quantum_fab",
            Self::Armory => "armory",
            Self::Wall => "wall",
        }
    }
}

impl fmt::Display for BuildingArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
