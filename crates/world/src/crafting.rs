//! Crafting system with JSON-loadable recipes.
//!
//! A recipe consumes all of its inputs at once or nothing at all. Recipes
//! may require standing near a tagged station and may produce a world
//! structure (one variant picked at random) in addition to items.

use crate::error::ActionError;
use crate::interaction::Tag;
use crate::inventory::{Delta, Ledger};
use anyhow::{Context, Result};
use lettuce_park_core::{ItemKind, RandomSource};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Shelter structures the `shelter` recipe can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShelterVariant {
    /// Slanted roof against a frame
    LeanTo,
    /// Small walled hut
    Hut,
    /// Raised platform with a ladder
    Lookout,
}

impl ShelterVariant {
    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            ShelterVariant::LeanTo => "Lean-to",
            ShelterVariant::Hut => "Forest Hut",
            ShelterVariant::Lookout => "Lookout Tower",
        }
    }

    /// Height of the climbable platform, if the structure has one.
    pub fn platform_height(self) -> Option<f32> {
        match self {
            ShelterVariant::Lookout => Some(4.5),
            ShelterVariant::LeanTo | ShelterVariant::Hut => None,
        }
    }
}

/// Crafting recipe input or output entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeItem {
    /// Item kind.
    pub item: ItemKind,
    /// Quantity.
    pub count: u32,
}

/// Crafting recipe definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique recipe name (e.g., "salad").
    pub name: String,
    /// Items consumed, all required simultaneously.
    pub inputs: Vec<RecipeItem>,
    /// Items granted on success.
    #[serde(default)]
    pub outputs: Vec<RecipeItem>,
    /// Station the player must stand near.
    #[serde(default)]
    pub station: Option<Tag>,
    /// Structure variants; one is picked at random on success.
    #[serde(default)]
    pub structures: Vec<ShelterVariant>,
}

impl Recipe {
    /// `(kind, count)` requirements.
    pub fn requirements(&self) -> Vec<(ItemKind, u32)> {
        self.inputs.iter().map(|i| (i.item, i.count)).collect()
    }

    /// Display name of what this recipe makes.
    pub fn output_name(&self) -> String {
        match (self.outputs.first(), self.structures.is_empty()) {
            (Some(first), _) => first.item.to_string(),
            (None, false) => String::from("a shelter"),
            (None, true) => self.name.clone(),
        }
    }

    /// Check if the given inventory holds all inputs.
    pub fn can_craft(&self, inventory: &Ledger) -> bool {
        inventory.can_afford(&self.requirements())
    }

    /// Combined delta: minus inputs, plus outputs.
    pub fn delta(&self) -> Delta {
        let mut delta = Delta::new();
        for input in &self.inputs {
            delta.push(input.item, -i64::from(input.count));
        }
        for output in &self.outputs {
            delta.push(output.item, i64::from(output.count));
        }
        delta
    }
}

/// What a successful craft produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CraftOutcome {
    /// Recipe name.
    pub recipe: String,
    /// Items added to the inventory.
    pub granted: Vec<(ItemKind, u32)>,
    /// Structure to raise in the world, if any.
    pub structure: Option<ShelterVariant>,
}

/// Recipe book. Preserves insertion order for UI listings.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    /// Create a new empty recipe book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load recipes from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read recipe file")?;
        Self::load_from_str(&content)
    }

    /// Load recipes from a JSON string.
    pub fn load_from_str(content: &str) -> Result<Self> {
        let recipes: Vec<Recipe> =
            serde_json::from_str(content).context("Failed to parse recipe JSON")?;

        let mut book = Self::new();
        for recipe in recipes {
            if recipe.inputs.is_empty() {
                anyhow::bail!("recipe `{}` has no inputs", recipe.name);
            }
            book.add_recipe(recipe);
        }
        Ok(book)
    }

    /// Add a recipe, replacing any recipe with the same name.
    pub fn add_recipe(&mut self, recipe: Recipe) {
        match self.recipes.iter_mut().find(|r| r.name == recipe.name) {
            Some(existing) => *existing = recipe,
            None => self.recipes.push(recipe),
        }
    }

    /// Get a recipe by name.
    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.name == name)
    }

    /// All recipes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    /// Number of recipes.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// True when the book is empty.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Craft-button predicate: affordable and station requirement met.
    pub fn availability<'a>(
        &'a self,
        inventory: &'a Ledger,
        near_station: impl Fn(Tag) -> bool + 'a,
    ) -> impl Iterator<Item = (&'a str, bool)> + 'a {
        self.recipes.iter().map(move |recipe| {
            let station_ok = recipe.station.map_or(true, &near_station);
            (recipe.name.as_str(), station_ok && recipe.can_craft(inventory))
        })
    }

    /// Craft `name` against `inventory`.
    ///
    /// Checks run in order: recipe exists, station proximity, affordability.
    /// Only when all pass is the combined delta applied, in one step.
    pub fn craft(
        &self,
        name: &str,
        inventory: &mut Ledger,
        near_station: impl Fn(Tag) -> bool,
        rng: &mut dyn RandomSource,
    ) -> Result<CraftOutcome, ActionError> {
        let recipe = self.get(name).ok_or_else(|| ActionError::UnknownRecipe {
            name: name.to_string(),
        })?;
        if let Some(tag) = recipe.station {
            if !near_station(tag) {
                return Err(ActionError::NotNearStation { tag });
            }
        }
        let missing = inventory.shortfall(&recipe.requirements());
        if !missing.is_empty() {
            return Err(ActionError::MissingIngredients {
                output: recipe.output_name(),
                missing,
            });
        }
        inventory.apply(&recipe.delta())?;

        let structure = if recipe.structures.is_empty() {
            None
        } else {
            Some(recipe.structures[rng.pick_index(recipe.structures.len())])
        };
        tracing::info!(recipe = %recipe.name, ?structure, "crafted");
        Ok(CraftOutcome {
            recipe: recipe.name.clone(),
            granted: recipe.outputs.iter().map(|o| (o.item, o.count)).collect(),
            structure,
        })
    }

    /// Create a recipe book with the default recipes:
    /// - salad (lettuce + stick + stone)
    /// - lure (stick + lettuce, at the crafting bench)
    /// - shelter (4 wood + 2 stone, at the crafting bench)
    pub fn with_defaults() -> Self {
        let item = |item, count| RecipeItem { item, count };
        let mut book = Self::new();

        book.add_recipe(Recipe {
            name: "salad".into(),
            inputs: vec![
                item(ItemKind::Lettuce, 1),
                item(ItemKind::Stick, 1),
                item(ItemKind::Stone, 1),
            ],
            outputs: vec![item(ItemKind::Salad, 1)],
            station: None,
            structures: Vec::new(),
        });

        book.add_recipe(Recipe {
            name: "lure".into(),
            inputs: vec![item(ItemKind::Stick, 1), item(ItemKind::Lettuce, 1)],
            outputs: vec![item(ItemKind::Lure, 2)],
            station: Some(Tag::Crafting),
            structures: Vec::new(),
        });

        book.add_recipe(Recipe {
            name: "shelter".into(),
            inputs: vec![item(ItemKind::Wood, 4), item(ItemKind::Stone, 2)],
            outputs: Vec::new(),
            station: Some(Tag::Crafting),
            structures: vec![
                ShelterVariant::LeanTo,
                ShelterVariant::Hut,
                ShelterVariant::Lookout,
            ],
        });

        book
    }
}
