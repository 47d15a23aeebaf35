//! Default park layout.

use crate::interaction::{Capability, Interactable, InteractableId, InteractableRegistry, Tag};
use glam::Vec3;
use lettuce_park_core::{ItemKind, RandomSource};
use std::f32::consts::TAU;

/// Height collectibles float at.
pub const COLLECTIBLE_HEIGHT: f32 = 0.4;

/// Collectible spawn points on the ground plane, `(x, z)`.
pub const COLLECTIBLE_SPOTS: [(f32, f32); 9] = [
    (2.0, -3.0),
    (-4.0, 5.0),
    (6.0, 8.0),
    (-8.0, -6.0),
    (12.0, 3.0),
    (10.0, -10.0),
    (-11.0, 9.0),
    (5.0, 14.0),
    (-14.0, -12.0),
];

/// Collectibles cycle through these, in spawn-point order.
const COLLECTIBLE_CYCLE: [(ItemKind, &str); 3] = [
    (ItemKind::Lettuce, "Wild Lettuce"),
    (ItemKind::Stick, "Forest Stick"),
    (ItemKind::Stone, "River Stone"),
];

const TREE_COUNT: usize = 12;
const TREE_RING: (f32, f32) = (18.0, 28.0);

const POND_CENTER: Vec3 = Vec3::new(0.0, 0.0, -22.0);

/// Ids of everything the default layout registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulationSummary {
    /// Collectible pickups.
    pub collectibles: Vec<InteractableId>,
    /// Choppable trees.
    pub trees: Vec<InteractableId>,
    /// Axe pickup.
    pub axe: Option<InteractableId>,
    /// Storage chest.
    pub storage: Option<InteractableId>,
    /// Crafting bench.
    pub bench: Option<InteractableId>,
    /// Fishing spots, easy first.
    pub fishing_spots: Vec<InteractableId>,
}

/// Register the default park: nine collectibles, a ring of trees at random
/// bearings, an axe, the storage chest, the crafting bench and two fishing
/// spots at the pond.
pub fn populate_default(
    registry: &mut InteractableRegistry,
    wood_drops: (u32, u32),
    rng: &mut dyn RandomSource,
) -> PopulationSummary {
    let mut summary = PopulationSummary::default();

    for (index, (x, z)) in COLLECTIBLE_SPOTS.iter().enumerate() {
        let (kind, label) = COLLECTIBLE_CYCLE[index % COLLECTIBLE_CYCLE.len()];
        summary.collectibles.push(registry.register(Interactable::new(
            label,
            Vec3::new(*x, COLLECTIBLE_HEIGHT, *z),
            Capability::Collect(kind),
        )));
    }

    for _ in 0..TREE_COUNT {
        let angle = rng.range_f32(0.0, TAU);
        let distance = rng.range_f32(TREE_RING.0, TREE_RING.1);
        let position = Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);
        summary.trees.push(registry.register(Interactable::new(
            "Old Oak",
            position,
            Capability::Chop {
                yields: wood_drops,
                chopped: false,
            },
        )));
    }

    summary.axe = Some(registry.register(Interactable::new(
        "Trusty Axe",
        Vec3::new(3.0, 0.5, 3.0),
        Capability::ToolPickup(ItemKind::Axe),
    )));
    summary.storage = Some(
        registry.register(
            Interactable::new("Storage Chest", Vec3::new(-5.0, 0.5, 2.0), Capability::StorageManage)
                .with_tag(Tag::Storage),
        ),
    );
    summary.bench = Some(
        registry.register(
            Interactable::new(
                "Crafting Bench",
                Vec3::new(5.0, 0.5, 0.0),
                Capability::CraftingBenchToggle,
            )
            .with_tag(Tag::Crafting),
        ),
    );

    let shallows = Interactable::new(
        "Pond Shallows",
        POND_CENTER + Vec3::new(-3.0, 0.0, 4.0),
        Capability::Fish {
            difficulty: 0.3,
            requires_lure: false,
        },
    )
    .with_tag(Tag::Water);
    let deep = Interactable::new(
        "Deep Water",
        POND_CENTER + Vec3::new(3.0, 0.0, 0.0),
        Capability::Fish {
            difficulty: 0.7,
            requires_lure: true,
        },
    )
    .with_tag(Tag::Water);
    summary.fishing_spots.push(registry.register(shallows));
    summary.fishing_spots.push(registry.register(deep));

    tracing::info!(
        interactables = registry.len(),
        trees = summary.trees.len(),
        "populated default park"
    );
    summary
}
