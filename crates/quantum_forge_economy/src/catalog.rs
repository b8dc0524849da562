//! # Recipe Catalog
//!
//! Read-only registry of recipes and building costs.
//!
//! The catalog is populated once at startup and validated as a whole:
//!
//! 1. **Well-formed recipes**: positive duration, at least one input and
//!    output, no zero quantities, each kind listed at most once per side
//! 2. **Unique identifiers**
//! 3. **No production cycles**: a chain of recipes never feeds its own
//!    outputs back into its inputs
//!
//! Lookups by an unknown identifier return `None`/`false`; callers that
//! treat that as a data mismatch turn it into [`EconomyError::RecipeNotFound`].

use std::collections::{BTreeMap, HashMap};

use crate::building::BuildingArchetype;
use crate::config::{to_amounts, EconomyConfig, RecipeDef};
use crate::error::{EconomyError, EconomyResult};
use crate::kind::{Category, ResourceAmount, ResourceKind};
use crate::ledger::Ledger;

/// Crafting time resolution: one microsecond.
pub const MICROS_PER_SEC: u64 = 1_000_000;

/// Converts a duration in seconds to whole microseconds, rounding to nearest.
///
/// Negative and NaN inputs map to 0; huge inputs saturate.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn secs_to_micros(secs: f32) -> u64 {
    (f64::from(secs) * MICROS_PER_SEC as f64).round() as u64
}

/// An immutable transformation rule.
///
/// Only [`Recipe::new`] builds one, so every recipe in circulation is valid.
#[derive(Clone, Debug, PartialEq)]
pub struct Recipe {
    id: String,
    name: String,
    inputs: Vec<ResourceAmount>,
    outputs: Vec<ResourceAmount>,
    /// Time to craft as given, in seconds.
    duration_secs: f32,
    /// Time to craft in microseconds; what stations count against.
    duration_micros: u64,
    category: Category,
    description: String,
}

impl Recipe {
    /// Creates a new recipe with validation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the duration is not positive, a side is
    /// empty, a quantity is zero, or a kind repeats on one side.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        duration_secs: f32,
        inputs: Vec<ResourceAmount>,
        outputs: Vec<ResourceAmount>,
    ) -> EconomyResult<Self> {
        let id = id.into();
        let duration_micros = secs_to_micros(duration_secs);
        if !duration_secs.is_finite() || duration_micros == 0 {
            return Err(EconomyError::InvalidConfig(format!(
                "recipe {id}: duration must be positive, got {duration_secs}"
            )));
        }
        if inputs.is_empty() {
            return Err(EconomyError::InvalidConfig(format!(
                "recipe {id}: must have at least one input"
            )));
        }
        if outputs.is_empty() {
            return Err(EconomyError::InvalidConfig(format!(
                "recipe {id}: must have at least one output"
            )));
        }
        for (side, list) in [("input", &inputs), ("output", &outputs)] {
            let mut seen = [false; ResourceKind::COUNT];
            for amount in list {
                if amount.quantity == 0 {
                    return Err(EconomyError::InvalidConfig(format!(
                        "recipe {id}: {side} {} has zero quantity",
                        amount.kind
                    )));
                }
                if std::mem::replace(&mut seen[amount.kind.index()], true) {
                    return Err(EconomyError::InvalidConfig(format!(
                        "recipe {id}: {side} {} listed twice",
                        amount.kind
                    )));
                }
            }
        }

        Ok(Self {
            id,
            name: name.into(),
            inputs,
            outputs,
            duration_secs,
            duration_micros,
            category,
            description: String::new(),
        })
    }

    /// Unique identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kinds consumed when crafting starts.
    #[must_use]
    pub fn inputs(&self) -> &[ResourceAmount] {
        &self.inputs
    }

    /// Kinds deposited when crafting completes.
    #[must_use]
    pub fn outputs(&self) -> &[ResourceAmount] {
        &self.outputs
    }

    /// Time to craft in seconds.
    #[must_use]
    pub const fn duration_secs(&self) -> f32 {
        self.duration_secs
    }

    /// Time to craft in whole microseconds.
    #[must_use]
    pub const fn duration_micros(&self) -> u64 {
        self.duration_micros
    }

    /// Category tag, checked against building capabilities.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Tooltip text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builds a recipe from its catalog-file form.
    ///
    /// # Errors
    ///
    /// Same as [`Recipe::new`].
    pub fn from_def(def: &RecipeDef) -> EconomyResult<Self> {
        Ok(Self::new(
            def.id.clone(),
            def.name.clone(),
            def.category,
            def.duration,
            to_amounts(&def.inputs),
            to_amounts(&def.outputs),
        )?
        .with_description(def.description.clone()))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    OnStack,
    Done,
}

/// The recipe registry.
#[derive(Clone, Debug, Default)]
pub struct RecipeCatalog {
    /// Recipes in catalog order.
    recipes: Vec<Recipe>,
    /// Identifier to position in `recipes`.
    index: HashMap<String, usize>,
    /// Cost of each building archetype.
    build_costs: BTreeMap<BuildingArchetype, Vec<ResourceAmount>>,
}

impl RecipeCatalog {
    /// Creates a validated catalog.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` on duplicate identifiers or zero build costs
    /// - `CycleDetected` if the recipes form a production cycle
    pub fn new(
        recipes: Vec<Recipe>,
        build_costs: BTreeMap<BuildingArchetype, Vec<ResourceAmount>>,
    ) -> EconomyResult<Self> {
        let mut index = HashMap::with_capacity(recipes.len());
        for (i, recipe) in recipes.iter().enumerate() {
            if index.insert(recipe.id.clone(), i).is_some() {
                return Err(EconomyError::InvalidConfig(format!(
                    "recipe id {} already exists",
                    recipe.id
                )));
            }
        }
        for (archetype, cost) in &build_costs {
            if cost.iter().any(|c| c.quantity == 0) {
                return Err(EconomyError::InvalidConfig(format!(
                    "build cost for {archetype} has a zero quantity"
                )));
            }
        }

        let catalog = Self {
            recipes,
            index,
            build_costs,
        };
        if let Some(cycle) = catalog.find_cycle() {
            return Err(EconomyError::CycleDetected(cycle));
        }

        tracing::debug!(recipes = catalog.len(), "recipe catalog validated");
        Ok(catalog)
    }

    /// Builds the catalog described by a configuration.
    ///
    /// # Errors
    ///
    /// Same as [`RecipeCatalog::new`] and [`Recipe::new`].
    pub fn from_config(config: &EconomyConfig) -> EconomyResult<Self> {
        let recipes = config
            .recipes
            .iter()
            .map(Recipe::from_def)
            .collect::<EconomyResult<Vec<_>>>()?;
        let build_costs = config
            .build_costs
            .iter()
            .map(|(archetype, cost)| (*archetype, to_amounts(cost)))
            .collect();
        Self::new(recipes, build_costs)
    }

    /// Gets a recipe by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.index.get(id).map(|&i| &self.recipes[i])
    }

    /// All recipes in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Identifiers of recipes in `category`, in catalog order.
    #[must_use]
    pub fn by_category(&self, category: Category) -> Vec<&str> {
        self.recipes
            .iter()
            .filter(|r| r.category == category)
            .map(|r| r.id.as_str())
            .collect()
    }

    /// Returns true if the ledger covers every input of recipe `id`.
    ///
    /// Unknown identifiers are not craftable.
    #[must_use]
    pub fn is_craftable(&self, id: &str, ledger: &Ledger) -> bool {
        self.get(id).is_some_and(|recipe| {
            recipe
                .inputs
                .iter()
                .all(|input| ledger.has_at_least(input.kind, input.quantity))
        })
    }

    /// Cost of placing a building. Empty if the archetype is free.
    #[must_use]
    pub fn build_cost(&self, archetype: BuildingArchetype) -> &[ResourceAmount] {
        self.build_costs
            .get(&archetype)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the number of recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Returns true if the catalog has no recipes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Finds a production cycle, as a path of recipe identifiers whose last
    /// entry repeats an earlier one.
    ///
    /// A recipe consuming its own output (a catalyst) is not a cycle.
    #[must_use]
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut consumers: Vec<Vec<usize>> = vec![Vec::new(); ResourceKind::COUNT];
        for (i, recipe) in self.recipes.iter().enumerate() {
            for input in &recipe.inputs {
                consumers[input.kind.index()].push(i);
            }
        }

        let mut visits = vec![Visit::Unvisited; self.recipes.len()];
        let mut path = Vec::new();

        for start in 0..self.recipes.len() {
            if visits[start] == Visit::Unvisited {
                let found = self.dfs_find_cycle(start, &consumers, &mut visits, &mut path);
                if let Some(cycle) = found {
                    return Some(
                        cycle
                            .into_iter()
                            .map(|i| self.recipes[i].id.clone())
                            .collect(),
                    );
                }
            }
        }

        None
    }

    /// DFS helper for cycle detection.
    fn dfs_find_cycle(
        &self,
        current: usize,
        consumers: &[Vec<usize>],
        visits: &mut [Visit],
        path: &mut Vec<usize>,
    ) -> Option<Vec<usize>> {
        visits[current] = Visit::OnStack;
        path.push(current);

        for output in &self.recipes[current].outputs {
            for &next in &consumers[output.kind.index()] {
                if next == current {
                    continue;
                }
                match visits[next] {
                    Visit::Unvisited => {
                        if let Some(cycle) = self.dfs_find_cycle(next, consumers, visits, path) {
                            return Some(cycle);
                        }
                    }
                    Visit::OnStack => {
                        let cycle_start = path.iter().position(|&i| i == next).unwrap_or(0);
                        let mut cycle = path[cycle_start..].to_vec();
                        cycle.push(next);
                        return Some(cycle);
                    }
                    Visit::Done => {}
                }
            }
        }

        path.pop();
        visits[current] = Visit::Done;
        None
    }
}
