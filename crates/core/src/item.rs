//! Item kinds - everything that can sit in a player inventory or storage

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Item kind identifier.
///
/// Declaration order is the canonical order used for ledger iteration and
/// tie-breaking, so new kinds are appended at the end.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Wild lettuce leaves
    Lettuce,
    /// Forest stick
    Stick,
    /// River stone
    Stone,
    /// Chopped wood, dropped by trees
    Wood,
    /// Crafted salad
    Salad,
    /// Axe - required for chopping trees
    Axe,
    /// Caught fish
    Fish,
    /// Fishing lure, consumed by lure-gated spots
    Lure,
}

impl ItemKind {
    /// Every item kind in canonical order.
    pub const ALL: [ItemKind; 8] = [
        ItemKind::Lettuce,
        ItemKind::Stick,
        ItemKind::Stone,
        ItemKind::Wood,
        ItemKind::Salad,
        ItemKind::Axe,
        ItemKind::Fish,
        ItemKind::Lure,
    ];

    /// Stable identifier used in scripts, config and serialized output.
    pub fn key(self) -> &'static str {
        match self {
            ItemKind::Lettuce => "lettuce",
            ItemKind::Stick => "stick",
            ItemKind::Stone => "stone",
            ItemKind::Wood => "wood",
            ItemKind::Salad => "salad",
            ItemKind::Axe => "axe",
            ItemKind::Fish => "fish",
            ItemKind::Lure => "lure",
        }
    }

    /// Display label for inventory panels.
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Lettuce => "Lettuce Leaves",
            ItemKind::Stick => "Sturdy Sticks",
            ItemKind::Stone => "River Stones",
            ItemKind::Wood => "Chopped Wood",
            ItemKind::Salad => "SaaSquatch Salad",
            ItemKind::Axe => "Trusty Axe",
            ItemKind::Fish => "Lake Fish",
            ItemKind::Lure => "Shiny Lure",
        }
    }

    /// Icon shown next to the label.
    pub fn icon(self) -> &'static str {
        match self {
            ItemKind::Lettuce => "🥬",
            ItemKind::Stick => "🪵",
            ItemKind::Stone => "🪨",
            ItemKind::Wood => "🌲",
            ItemKind::Salad => "🥗",
            ItemKind::Axe => "🪓",
            ItemKind::Fish => "🐟",
            ItemKind::Lure => "🪝",
        }
    }

    /// Capacity used to scale inventory bars. Presentation only; ledgers do
    /// not enforce it.
    pub fn ui_capacity(self) -> Option<u32> {
        match self {
            ItemKind::Lettuce | ItemKind::Stick | ItemKind::Stone => Some(10),
            ItemKind::Wood => Some(20),
            ItemKind::Fish | ItemKind::Lure => Some(5),
            ItemKind::Salad | ItemKind::Axe => None,
        }
    }

    /// Tools count towards capabilities (chopping) rather than materials.
    pub fn is_tool(self) -> bool {
        matches!(self, ItemKind::Axe)
    }

    /// Whether storage deposits move this kind. Tools stay with the player.
    pub fn is_transferable(self) -> bool {
        !self.is_tool()
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.label())
    }
}

/// Error returned when a string does not name an item kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown item kind `{0}`")]
pub struct ParseItemKindError(pub String);

impl FromStr for ItemKind {
    type Err = ParseItemKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        ItemKind::ALL
            .into_iter()
            .find(|kind| kind.key() == needle)
            .ok_or(ParseItemKindError(s.to_string()))
    }
}
