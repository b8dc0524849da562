//! # Resource Kinds
//!
//! The closed set of materials tracked by the ledger.
//!
//! Kinds are fixed at compile time. Every kind maps to a dense index so the
//! ledger and recipe lookups can use plain arrays instead of string-keyed maps.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EconomyError;

/// Coarse classification used for recipe grouping and building capabilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Harvested directly from world nodes.
    Raw,
    /// Refined from raw materials.
    Compound,
    /// Chemical precursors for crystal synthesis.
    Precursor,
    /// Quantum dot crystals, placed on the puzzle board.
    Crystal,
    /// Finished weapons.
    Weapon,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Raw,
        Self::Compound,
        Self::Precursor,
        Self::Crystal,
        Self::Weapon,
    ];

    /// Lowercase tag, as written in catalog files.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Compound => "compound",
            Self::Precursor => "precursor",
            Self::Crystal => "crystal",
            Self::Weapon => "weapon",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// An RGB display color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// A material or item type tracked by quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ResourceKind {
    /// Raw iron ore.
    Iron = 0,
    /// Raw carbon.
    Carbon = 1,
    /// Raw copper ore.
    Copper = 2,
    /// Raw silicon.
    Silicon = 3,
    /// Raw cadmium.
    Cadmium = 4,
    /// Raw selenium.
    Selenium = 5,
    /// Raw zinc.
    Zinc = 6,
    /// Raw sulfur.
    Sulfur = 7,
    /// Steel ingot.
    Steel = 8,
    /// Drawn copper wire.
    CopperWire = 9,
    /// Silicon wafer.
    SiliconWafer = 10,
    /// Cadmium selenide precursor.
    CadmiumSelenide = 11,
    /// Zinc sulfide precursor.
    ZincSulfide = 12,
    /// Red quantum dot crystal.
    #[serde(rename = "QuantumDot_Red")]
    QuantumDotRed = 13,
    /// Green quantum dot crystal.
    #[serde(rename = "QuantumDot_Green")]
    QuantumDotGreen = 14,
    /// Blue quantum dot crystal.
    #[serde(rename = "QuantumDot_Blue")]
    QuantumDotBlue = 15,
    /// Yellow quantum dot crystal.
    #[serde(rename = "QuantumDot_Yellow")]
    QuantumDotYellow = 16,
    /// Handheld blaster.
    Blaster = 17,
    /// Photon lance.
    PhotonLance = 18,
}

impl ResourceKind {
    /// Number of kinds.
    pub const COUNT: usize = 19;

    /// All kinds, ordered by index.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Iron,
        Self::Carbon,
        Self::Copper,
        Self::Silicon,
        Self::Cadmium,
        Self::Selenium,
        Self::Zinc,
        Self::Sulfur,
        Self::Steel,
        Self::CopperWire,
        Self::SiliconWafer,
        Self::CadmiumSelenide,
        Self::ZincSulfide,
        Self::QuantumDotRed,
        Self::QuantumDotGreen,
        Self::QuantumDotBlue,
        Self::QuantumDotYellow,
        Self::Blaster,
        Self::PhotonLance,
    ];

    /// Dense index used by array-backed storage.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Catalog identifier (e.g. `"Iron"`, `"QuantumDot_Red"`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Iron => "Iron",
            Self::Carbon => "Carbon",
            Self::Copper => "Copper",
            Self::Silicon => "Silicon",
            Self::Cadmium => "Cadmium",
            Self::Selenium => "Selenium",
            Self::Zinc => "Zinc",
            Self::Sulfur => "Sulfur",
            Self::Steel => "Steel",
            Self::CopperWire => "CopperWire",
            Self::SiliconWafer => "SiliconWafer",
            Self::CadmiumSelenide => "CadmiumSelenide",
            Self::ZincSulfide => "ZincSulfide",
            Self::QuantumDotRed => "QuantumDot_Red",
            Self::QuantumDotGreen => "QuantumDot_Green",
            Self::QuantumDotBlue => "QuantumDot_Blue",
            Self::QuantumDotYellow => "QuantumDot_Yellow",
            Self::Blaster => "Blaster",
            Self::PhotonLance => "PhotonLance",
        }
    }

    /// The category this kind belongs to.
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::Iron
            | Self::Carbon
            | Self::Copper
            | Self::Silicon
            | Self::Cadmium
            | Self::Selenium
            | Self::Zinc
            | Self::Sulfur => Category::Raw,
            Self::Steel | Self::CopperWire | Self::SiliconWafer => Category::Compound,
            Self::CadmiumSelenide | Self::ZincSulfide => Category::Precursor,
            Self::QuantumDotRed
            | Self::QuantumDotGreen
            | Self::QuantumDotBlue
            | Self::QuantumDotYellow => Category::Crystal,
            Self::Blaster | Self::PhotonLance => Category::Weapon,
        }
    }

    /// Display color for UI collaborators.
    #[must_use]
    pub const fn color(self) -> Rgb {
        match self {
            Self::Iron => Rgb(140, 140, 150),
            Self::Carbon => Rgb(40, 40, 40),
            Self::Copper => Rgb(184, 115, 51),
            Self::Silicon => Rgb(110, 120, 140),
            Self::Cadmium => Rgb(200, 190, 120),
            Self::Selenium => Rgb(160, 60, 60),
            Self::Zinc => Rgb(180, 190, 200),
            Self::Sulfur => Rgb(230, 220, 60),
            Self::Steel => Rgb(170, 180, 190),
            Self::CopperWire => Rgb(210, 130, 60),
            Self::SiliconWafer => Rgb(80, 90, 120),
            Self::CadmiumSelenide => Rgb(150, 40, 30),
            Self::ZincSulfide => Rgb(240, 240, 220),
            Self::QuantumDotRed => Rgb(255, 40, 40),
            Self::QuantumDotGreen => Rgb(40, 255, 80),
            Self::QuantumDotBlue => Rgb(40, 90, 255),
            Self::QuantumDotYellow => Rgb(255, 230, 40),
            Self::Blaster => Rgb(90, 200, 255),
            Self::PhotonLance => Rgb(255, 255, 255),
        }
    }

    /// Returns true if this kind can be placed on the puzzle board.
    #[inline]
    #[must_use]
    pub const fn is_crystal(self) -> bool {
        matches!(self.category(), Category::Crystal)
    }

    /// Looks up a kind by its catalog identifier.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = EconomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| EconomyError::UnknownResource(s.to_string()))
    }
}

/// A quantity of one resource kind, used for recipe inputs, outputs and costs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceAmount {
    /// The kind.
    pub kind: ResourceKind,
    /// Number of units.
    pub quantity: u32,
}

impl ResourceAmount {
    /// Creates a new amount.
    #[inline]
    #[must_use]
    pub const fn new(kind: ResourceKind, quantity: u32) -> Self {
        Self { kind, quantity }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_dense() {
        for (i, kind) in ResourceKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_names_round_trip_and_match_serde() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.name().parse::<ResourceKind>(), Ok(kind));
        }
        #[derive(Deserialize)]
        struct Probe {
            kind: ResourceKind,
        }
        let probe: Probe = toml::from_str("kind = \"QuantumDot_Yellow\"").unwrap();
        assert_eq!(probe.kind, ResourceKind::QuantumDotYellow);
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let result = "Unobtainium".parse::<ResourceKind>();
        assert_eq!(
            result,
            Err(EconomyError::UnknownResource("Unobtainium".to_string()))
        );
    }

    #[test]
    fn test_crystal_classification() {
        let crystals: Vec<_> = ResourceKind::ALL
            .iter()
            .filter(|k| k.is_crystal())
            .collect();
        assert_eq!(crystals.len(), 4);
        assert!(!ResourceKind::Iron.is_crystal());
        assert_eq!(ResourceKind::Steel.category(), Category::Compound);
        assert_eq!(ResourceKind::Blaster.category(), Category::Weapon);
    }
}
