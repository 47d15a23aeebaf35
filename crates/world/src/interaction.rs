//! Interactable registry and proximity resolution.
//!
//! Interactables are registered once and never removed; collecting or
//! chopping one disables it instead. Every tick the resolver picks the single
//! nearest enabled interactable inside the interaction radius.

use crate::inventory::Ledger;
use glam::Vec3;
use lettuce_park_core::ItemKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tags used for proximity-gated permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    /// Storage chest
    Storage,
    /// Crafting bench
    Crafting,
    /// Fishable water
    Water,
}

impl Tag {
    /// Name used in "you need to be near ..." messages.
    pub fn station_name(self) -> &'static str {
        match self {
            Tag::Storage => "the storage chest",
            Tag::Crafting => "the crafting bench",
            Tag::Water => "water",
        }
    }
}

/// Stable handle to a registered interactable (its registration index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InteractableId(pub usize);

impl fmt::Display for InteractableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happens when an interactable is activated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Capability {
    /// Pick up one unit of an item; disables the source.
    Collect(ItemKind),
    /// Tree that can be chopped once with an axe.
    Chop {
        /// Wood drop count range, inclusive.
        yields: (u32, u32),
        /// Set once chopped.
        chopped: bool,
    },
    /// Grants one unit of a tool if the player holds none.
    ToolPickup(ItemKind),
    /// Deposit everything, or withdraw the most abundant stored kind.
    StorageManage,
    /// Opens/closes the crafting panel.
    CraftingBenchToggle,
    /// Start a fishing attempt.
    Fish {
        /// 0.0 (easy) to 1.0 (hard).
        difficulty: f32,
        /// Consumes one lure per attempt when set.
        requires_lure: bool,
    },
    /// Teleport the player to a fixed position.
    ClimbTo(Vec3),
}

/// Context the prompt generator reads.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    /// Player inventory
    pub inventory: &'a Ledger,
    /// Whether a fishing attempt is live
    pub fishing: bool,
    /// Whether the crafting panel is open
    pub crafting_panel_open: bool,
}

/// A world-placed object the player can focus and activate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interactable {
    /// Display label, e.g. "Wild Lettuce".
    pub label: String,
    /// World position (owned by the external entity, mirrored here).
    pub position: Vec3,
    /// Disabled interactables are never focused.
    pub enabled: bool,
    /// Proximity tags.
    pub tags: Vec<Tag>,
    /// Activation behavior.
    pub capability: Capability,
}

impl Interactable {
    /// Enabled, untagged interactable.
    pub fn new(label: impl Into<String>, position: Vec3, capability: Capability) -> Self {
        Self {
            label: label.into(),
            position,
            enabled: true,
            tags: Vec::new(),
            capability,
        }
    }

    /// Builder: add a tag.
    pub fn with_tag(mut self, tag: Tag) -> Self {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Whether this interactable carries `tag`.
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    /// Prompt text shown while focused. Depends on the player's state.
    pub fn prompt(&self, ctx: PromptContext<'_>) -> String {
        match &self.capability {
            Capability::Collect(kind) => {
                format!("Press E to gather {} {}", kind.icon(), self.label)
            }
            Capability::Chop { .. } => {
                if ctx.inventory.has(ItemKind::Axe, 1) {
                    format!("Press E to chop the {}", self.label)
                } else {
                    format!("You need an {} to chop the {}", ItemKind::Axe, self.label)
                }
            }
            Capability::ToolPickup(tool) => {
                if ctx.inventory.has(*tool, 1) {
                    format!("You already carry a {}", tool.label())
                } else {
                    format!("Press E to pick up the {tool}")
                }
            }
            Capability::StorageManage => {
                if ctx.inventory.iter().any(|(kind, _)| kind.is_transferable()) {
                    format!("Press E to store your items in the {}", self.label)
                } else {
                    format!("Press E to take an item from the {}", self.label)
                }
            }
            Capability::CraftingBenchToggle => {
                if ctx.crafting_panel_open {
                    format!("Press E to close the {}", self.label)
                } else {
                    format!("Press E to use the {}", self.label)
                }
            }
            Capability::Fish { requires_lure, .. } => {
                if ctx.fishing {
                    String::from("Fishing... (press Q to reel in)")
                } else if *requires_lure && !ctx.inventory.has(ItemKind::Lure, 1) {
                    format!("You need a {} to fish at the {}", ItemKind::Lure, self.label)
                } else {
                    format!("Press E to fish at the {}", self.label)
                }
            }
            Capability::ClimbTo(_) => format!("Press E to climb the {}", self.label),
        }
    }
}

/// Registry of every interactable in the world.
#[derive(Debug, Clone, Default)]
pub struct InteractableRegistry {
    entries: Vec<Interactable>,
}

impl InteractableRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an interactable. There is no removal; disable it instead.
    pub fn register(&mut self, interactable: Interactable) -> InteractableId {
        let id = InteractableId(self.entries.len());
        tracing::trace!(%id, label = %interactable.label, "registered interactable");
        self.entries.push(interactable);
        id
    }

    /// Look up an interactable.
    pub fn get(&self, id: InteractableId) -> Option<&Interactable> {
        self.entries.get(id.0)
    }

    /// Mutable lookup.
    pub fn get_mut(&mut self, id: InteractableId) -> Option<&mut Interactable> {
        self.entries.get_mut(id.0)
    }

    /// Enable or disable an interactable. Returns false for unknown ids.
    pub fn set_enabled(&mut self, id: InteractableId, enabled: bool) -> bool {
        match self.entries.get_mut(id.0) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Disable an interactable. Returns false for unknown ids.
    pub fn disable(&mut self, id: InteractableId) -> bool {
        self.set_enabled(id, false)
    }

    /// Mirror the owning entity's position. Returns false for unknown ids.
    pub fn set_position(&mut self, id: InteractableId, position: Vec3) -> bool {
        match self.entries.get_mut(id.0) {
            Some(entry) => {
                entry.position = position;
                true
            }
            None => false,
        }
    }

    /// Number of registered interactables (enabled or not).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every interactable in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (InteractableId, &Interactable)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (InteractableId(idx), entry))
    }

    /// Nearest enabled interactable with `distance < radius`.
    ///
    /// Scans in registration order and only replaces the running best on a
    /// strictly smaller distance, so ties go to the earliest registered.
    pub fn resolve_focus(&self, player: Vec3, radius: f32) -> Option<InteractableId> {
        let mut nearest: Option<InteractableId> = None;
        let mut nearest_distance = f32::INFINITY;
        for (id, entry) in self.iter() {
            if !entry.enabled {
                continue;
            }
            let dist = player.distance(entry.position);
            if dist < radius && dist < nearest_distance {
                nearest = Some(id);
                nearest_distance = dist;
            }
        }
        nearest
    }

    /// Whether an enabled interactable tagged `tag` lies within `radius`.
    pub fn is_near_tag(&self, player: Vec3, tag: Tag, radius: f32) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.enabled && entry.has_tag(tag) && player.distance(entry.position) < radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(kind: ItemKind, x: f32) -> Interactable {
        Interactable::new("thing", Vec3::new(x, 0.0, 0.0), Capability::Collect(kind))
    }

    #[test]
    fn resolve_picks_nearest_in_range() {
        let mut registry = InteractableRegistry::new();
        let far = registry.register(collect(ItemKind::Stone, 3.0));
        let near = registry.register(collect(ItemKind::Stick, 1.0));
        registry.register(collect(ItemKind::Lettuce, 10.0));

        assert_eq!(registry.resolve_focus(Vec3::ZERO, 3.5), Some(near));
        registry.disable(near);
        assert_eq!(registry.resolve_focus(Vec3::ZERO, 3.5), Some(far));
    }

    #[test]
    fn radius_is_exclusive() {
        let mut registry = InteractableRegistry::new();
        registry.register(collect(ItemKind::Stone, 3.5));
        assert_eq!(registry.resolve_focus(Vec3::ZERO, 3.5), None);
    }

    #[test]
    fn ties_go_to_first_registered() {
        let mut registry = InteractableRegistry::new();
        let first = registry.register(collect(ItemKind::Stone, 2.0));
        registry.register(collect(ItemKind::Stick, -2.0));
        assert_eq!(registry.resolve_focus(Vec3::ZERO, 3.5), Some(first));
    }

    #[test]
    fn nothing_in_range_resolves_to_none() {
        let mut registry = InteractableRegistry::new();
        registry.register(collect(ItemKind::Stone, 8.0));
        assert_eq!(registry.resolve_focus(Vec3::ZERO, 3.5), None);
        assert_eq!(InteractableRegistry::new().resolve_focus(Vec3::ZERO, 3.5), None);
    }

    #[test]
    fn tag_proximity_ignores_disabled() {
        let mut registry = InteractableRegistry::new();
        let chest = registry.register(
            Interactable::new("Chest", Vec3::new(1.0, 0.0, 0.0), Capability::StorageManage)
                .with_tag(Tag::Storage),
        );
        assert!(registry.is_near_tag(Vec3::ZERO, Tag::Storage, 3.5));
        assert!(!registry.is_near_tag(Vec3::ZERO, Tag::Crafting, 3.5));
        registry.disable(chest);
        assert!(!registry.is_near_tag(Vec3::ZERO, Tag::Storage, 3.5));
        registry.set_enabled(chest, true);
        assert!(registry.is_near_tag(Vec3::ZERO, Tag::Storage, 3.5));
    }

    #[test]
    fn prompts_depend_on_inventory() {
        let tree = Interactable::new(
            "Old Oak",
            Vec3::ZERO,
            Capability::Chop {
                yields: (2, 4),
                chopped: false,
            },
        );
        let empty = Ledger::new();
        let with_axe = Ledger::with_items(&[(ItemKind::Axe, 1)]);
        let ctx = |inventory| PromptContext {
            inventory,
            fishing: false,
            crafting_panel_open: false,
        };
        assert_eq!(
            tree.prompt(ctx(&empty)),
            "You need an 🪓 Trusty Axe to chop the Old Oak"
        );
        assert_eq!(tree.prompt(ctx(&with_axe)), "Press E to chop the Old Oak");

        let lettuce = Interactable::new(
            "Wild Lettuce",
            Vec3::ZERO,
            Capability::Collect(ItemKind::Lettuce),
        );
        assert_eq!(lettuce.prompt(ctx(&empty)), "Press E to gather 🥬 Wild Lettuce");
    }
}
