//! Game session: owns all interaction state and drives it tick by tick.
//!
//! The session is the only owner of the registry, ledgers, fishing state and
//! log. User actions (`activate`, `craft`, storage operations, ...) resolve
//! synchronously between ticks. Every state change is queued as a
//! [`SessionEvent`] for the presentation layer to drain.

use crate::config::SessionConfig;
use crate::crafting::{CraftOutcome, RecipeBook, ShelterVariant};
use crate::error::ActionError;
use crate::events::{GameLog, LogLine, SessionEvent, SpawnKind};
use crate::fishing::{FishingRules, FishingSpot, FishingState, FishingTransition};
use crate::interaction::{
    Capability, Interactable, InteractableId, InteractableRegistry, PromptContext, Tag,
};
use crate::inventory::Ledger;
use crate::player::{MovementIntent, Player};
use crate::populate::{self, PopulationSummary};
use crate::storage::{StorageLedger, StorageOutcome};
use glam::Vec3;
use lettuce_park_core::{ItemKind, RandomSource, SimTick};
use serde::Serialize;
use std::collections::BTreeMap;
use std::f32::consts::TAU;
use tracing::{debug, info};

/// How far in front of the player crafted structures are placed.
const STRUCTURE_DISTANCE: f32 = 2.0;

/// Closest a wood drop lands to its tree.
const WOOD_MIN_SCATTER: f32 = 0.4;

const WELCOME: &str = "Welcome to Lettuce Park! Gather ingredients to craft a 🥗 SaaSquatch Salad.";
const TIP: &str = "Tip: Explore the clearings for glowing resources ✨";

/// Craft-button state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CraftButton {
    /// Recipe name.
    pub recipe: String,
    /// Whether pressing it would succeed.
    pub enabled: bool,
}

/// Pull-style view of everything the presentation layer shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Current tick.
    pub tick: u64,
    /// Session clock, seconds.
    pub clock: f32,
    /// Player position.
    pub position: Vec3,
    /// Focused interactable.
    pub focused: Option<InteractableId>,
    /// Prompt text.
    pub prompt: String,
    /// Player inventory, every kind.
    pub inventory: BTreeMap<ItemKind, u32>,
    /// HUD inventory line.
    pub inventory_summary: String,
    /// Storage rows in display order.
    pub storage: Vec<(ItemKind, u32)>,
    /// Fishing status text.
    pub fishing_status: String,
    /// Whether a fishing attempt is live.
    pub fishing: bool,
    /// Crafting panel state.
    pub crafting_panel_open: bool,
    /// Craft buttons in recipe-book order.
    pub craft_buttons: Vec<CraftButton>,
    /// Rendered log lines, newest first.
    pub log: Vec<String>,
}

/// Top-level game session.
pub struct Session {
    config: SessionConfig,
    fishing_rules: FishingRules,
    registry: InteractableRegistry,
    recipes: RecipeBook,
    player: Player,
    inventory: Ledger,
    storage: StorageLedger,
    fishing: FishingState,
    crafting_panel_open: bool,
    focused: Option<InteractableId>,
    prompt: String,
    fishing_status: String,
    log: GameLog,
    tick: SimTick,
    clock: f32,
    rng: Box<dyn RandomSource>,
    events: Vec<SessionEvent>,
}

impl Session {
    /// Fresh session with the default recipe book and an empty world.
    pub fn new(config: SessionConfig, rng: impl RandomSource + 'static) -> Self {
        let config = config.sanitized();
        let storage = match config.storage_capacity {
            Some(capacity) => StorageLedger::bounded(capacity),
            None => StorageLedger::new(),
        };
        let mut session = Self {
            fishing_rules: FishingRules {
                duration: config.fishing_duration,
                base_success: config.fishing_base_success,
                difficulty_penalty: config.fishing_difficulty_penalty,
            },
            registry: InteractableRegistry::new(),
            recipes: RecipeBook::with_defaults(),
            player: Player::new(config.spawn_position),
            inventory: Ledger::new(),
            storage,
            fishing: FishingState::Idle,
            crafting_panel_open: false,
            focused: None,
            prompt: String::new(),
            fishing_status: String::new(),
            log: GameLog::new(config.log_capacity),
            tick: SimTick::ZERO,
            clock: 0.0,
            rng: Box::new(rng),
            events: Vec::new(),
            config,
        };
        session.push_inventory();
        session.log_line(WELCOME);
        session.log_line(TIP);
        session
    }

    /// Replace the recipe book.
    pub fn with_recipes(mut self, recipes: RecipeBook) -> Self {
        self.recipes = recipes;
        self
    }

    /// Replace the random source.
    pub fn set_random_source(&mut self, rng: impl RandomSource + 'static) {
        self.rng = Box::new(rng);
    }

    /// Register the default world layout.
    pub fn populate_default(&mut self) -> PopulationSummary {
        populate::populate_default(
            &mut self.registry,
            self.config.wood_drops,
            self.rng.as_mut(),
        )
    }

    /// Register an interactable.
    pub fn register(&mut self, interactable: Interactable) -> InteractableId {
        self.registry.register(interactable)
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// Session configuration (sanitized).
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Interactable registry.
    pub fn registry(&self) -> &InteractableRegistry {
        &self.registry
    }

    /// Mutable registry, for the world layer mirroring entity positions.
    pub fn registry_mut(&mut self) -> &mut InteractableRegistry {
        &mut self.registry
    }

    /// Recipe book.
    pub fn recipes(&self) -> &RecipeBook {
        &self.recipes
    }

    /// Player pose.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Player inventory.
    pub fn inventory(&self) -> &Ledger {
        &self.inventory
    }

    /// Shared storage.
    pub fn storage(&self) -> &StorageLedger {
        &self.storage
    }

    /// Fishing state.
    pub fn fishing(&self) -> &FishingState {
        &self.fishing
    }

    /// Interactable focused as of the last tick.
    pub fn focused(&self) -> Option<InteractableId> {
        self.focused
    }

    /// Current prompt text (empty when nothing is focused).
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Current fishing status text.
    pub fn fishing_status(&self) -> &str {
        &self.fishing_status
    }

    /// Whether the crafting panel is open.
    pub fn crafting_panel_open(&self) -> bool {
        self.crafting_panel_open
    }

    /// In-game log.
    pub fn log(&self) -> &GameLog {
        &self.log
    }

    /// Current tick.
    pub fn tick_count(&self) -> SimTick {
        self.tick
    }

    /// Session clock, seconds.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Whether the player stands near an enabled interactable tagged `tag`.
    pub fn is_near(&self, tag: Tag) -> bool {
        self.registry
            .is_near_tag(self.player.position, tag, self.config.interaction_radius)
    }

    /// Craft-button predicates, in recipe-book order.
    pub fn craft_availability(&self) -> Vec<CraftButton> {
        self.recipes
            .availability(&self.inventory, move |tag| self.is_near(tag))
            .map(|(recipe, enabled)| CraftButton {
                recipe: recipe.to_string(),
                enabled,
            })
            .collect()
    }

    /// Everything the presentation layer shows.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            tick: self.tick.0,
            clock: self.clock,
            position: self.player.position,
            focused: self.focused,
            prompt: self.prompt.clone(),
            inventory: self.inventory.snapshot(),
            inventory_summary: self.inventory.summary(),
            storage: self.storage.rows(),
            fishing_status: self.fishing_status.clone(),
            fishing: self.fishing.is_waiting(),
            crafting_panel_open: self.crafting_panel_open,
            craft_buttons: self.craft_availability(),
            log: self.log.lines().map(LogLine::render).collect(),
        }
    }

    /// Take all queued events.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // ---------------------------------------------------------------------
    // Frame update
    // ---------------------------------------------------------------------

    /// Advance one frame: walk, progress fishing, resolve focus.
    pub fn tick(&mut self, dt: f32, intent: MovementIntent) -> SimTick {
        let dt = dt.max(0.0);
        self.tick = self.tick.advance(1);
        self.clock += dt;

        self.player.walk(intent, self.config.move_speed, dt);
        self.advance_fishing(dt);
        self.resolve_focus();
        self.tick
    }

    fn advance_fishing(&mut self, dt: f32) {
        let transition = self.fishing.advance(
            dt,
            &self.fishing_rules,
            &mut self.inventory,
            self.rng.as_mut(),
        );
        match transition {
            FishingTransition::Idle => {}
            FishingTransition::Progress(fraction) => {
                let pct = (fraction * 100.0).floor() as u32;
                self.set_fishing_status(format!("Waiting for a bite... {pct}%"));
            }
            FishingTransition::Caught(kind) => {
                self.set_fishing_status(String::new());
                self.push_inventory();
                self.log_line(format!("You caught a {kind}!"));
            }
            FishingTransition::Escaped => {
                self.set_fishing_status(String::new());
                self.log_line("The fish got away...");
            }
        }
    }

    fn resolve_focus(&mut self) {
        let nearest = self
            .registry
            .resolve_focus(self.player.position, self.config.interaction_radius);
        if nearest != self.focused {
            debug!(from = ?self.focused, to = ?nearest, "focus changed");
            self.focused = nearest;
            self.events.push(SessionEvent::FocusChanged { focused: nearest });
        }
        self.refresh_prompt();
    }

    /// Rebuild the prompt for the current focus. The text depends on fishing,
    /// the inventory and the crafting panel, so it is refreshed on every tick
    /// and after signals that touch those.
    fn refresh_prompt(&mut self) {
        let text = self
            .focused
            .and_then(|id| self.registry.get(id))
            .map(|entry| entry.prompt(self.prompt_context()))
            .unwrap_or_default();
        self.set_prompt(text);
    }

    fn prompt_context(&self) -> PromptContext<'_> {
        PromptContext {
            inventory: &self.inventory,
            fishing: self.fishing.is_waiting(),
            crafting_panel_open: self.crafting_panel_open,
        }
    }

    // ---------------------------------------------------------------------
    // Input signals
    // ---------------------------------------------------------------------

    /// Apply a look delta.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.player
            .look(dx, dy, self.config.look_speed, self.config.pitch_limit);
    }

    /// Apply an external translation (e.g. a moving platform).
    pub fn translate(&mut self, offset: Vec3) {
        self.player.translate(offset);
        self.events.push(SessionEvent::PlayerMoved {
            position: self.player.position,
        });
    }

    /// Move the player directly (teleport).
    pub fn teleport(&mut self, position: Vec3) {
        self.player.teleport(position);
        self.events.push(SessionEvent::PlayerMoved { position });
    }

    /// Grant items outside normal play (scripts, debugging).
    pub fn give(&mut self, kind: ItemKind, count: u32) -> Result<(), ActionError> {
        let result = self
            .inventory
            .add(kind, count)
            .map(|()| format!("Received {count} {kind}."))
            .map_err(ActionError::from);
        if result.is_ok() {
            self.push_inventory();
            self.refresh_prompt();
        }
        self.report(result)
    }

    /// Activate the focused interactable. No-op when nothing is focused.
    pub fn activate(&mut self) -> Result<(), ActionError> {
        let Some(id) = self.focused else {
            return Err(ActionError::NothingFocused);
        };
        let result = self.dispatch(id);
        self.focused = None;
        self.set_prompt(String::new());
        self.report(result)
    }

    /// Open or close the crafting panel.
    pub fn toggle_crafting_panel(&mut self) {
        self.crafting_panel_open = !self.crafting_panel_open;
        self.events.push(SessionEvent::CraftingPanel {
            open: self.crafting_panel_open,
        });
        self.refresh_prompt();
    }

    /// Craft a recipe by name.
    pub fn craft(&mut self, name: &str) -> Result<(), ActionError> {
        let registry = &self.registry;
        let position = self.player.position;
        let radius = self.config.interaction_radius;
        let outcome = self.recipes.craft(
            name,
            &mut self.inventory,
            |tag| registry.is_near_tag(position, tag, radius),
            self.rng.as_mut(),
        );
        let result = match outcome {
            Ok(outcome) => Ok(self.apply_craft(outcome)),
            Err(err) => Err(err),
        };
        self.report(result)
    }

    /// Abandon the live fishing attempt.
    pub fn cancel_fishing(&mut self) -> Result<(), ActionError> {
        let result = self.fishing.cancel().map(|_| {
            self.set_fishing_status(String::new());
            String::from("You reeled in your line.")
        });
        self.refresh_prompt();
        self.report(result)
    }

    /// Move every transferable item into storage.
    pub fn deposit_all(&mut self) -> Result<(), ActionError> {
        let result = self.require_near(Tag::Storage).and_then(|()| {
            let moved = self.storage.deposit_all(&mut self.inventory)?;
            if moved.is_empty() {
                return Ok(String::from("You have nothing to store."));
            }
            self.push_ledgers();
            Ok(describe_deposit(&moved))
        });
        self.report(result)
    }

    /// Take `amount` of `kind` out of storage.
    pub fn withdraw(&mut self, kind: ItemKind, amount: u32) -> Result<(), ActionError> {
        let result = self.require_near(Tag::Storage).and_then(|()| {
            self.storage.withdraw(&mut self.inventory, kind, amount)?;
            self.push_ledgers();
            Ok(format!("Took {amount} {kind} from storage."))
        });
        self.report(result)
    }

    /// Reorder storage rows by count.
    pub fn sort_storage(&mut self) -> Result<(), ActionError> {
        let result = self.require_near(Tag::Storage).map(|()| {
            self.storage.sort();
            self.events.push(SessionEvent::StorageChanged {
                rows: self.storage.rows(),
            });
            String::from("Storage sorted.")
        });
        self.report(result)
    }

    // ---------------------------------------------------------------------
    // Dispatch
    // ---------------------------------------------------------------------

    fn dispatch(&mut self, id: InteractableId) -> Result<String, ActionError> {
        let entry = self
            .registry
            .get(id)
            .cloned()
            .ok_or(ActionError::NothingFocused)?;
        if !entry.enabled {
            return Err(ActionError::Unavailable { label: entry.label });
        }
        debug!(%id, label = %entry.label, capability = ?entry.capability, "dispatch");

        match entry.capability {
            Capability::Collect(kind) => {
                self.inventory.add(kind, 1)?;
                self.registry.disable(id);
                self.push_inventory();
                info!(item = ?kind, "collected");
                Ok(format!("Collected {} {}!", kind.icon(), entry.label))
            }
            Capability::Chop { yields, chopped } => {
                if chopped {
                    return Err(ActionError::AlreadyChopped);
                }
                if !self.inventory.has(ItemKind::Axe, 1) {
                    return Err(ActionError::MissingTool { tool: ItemKind::Axe });
                }
                let drops = self.chop(id, entry.position, yields);
                Ok(format!(
                    "You chopped the {}! {drops} pieces of {} fell.",
                    entry.label,
                    ItemKind::Wood
                ))
            }
            Capability::ToolPickup(tool) => {
                if self.inventory.has(tool, 1) {
                    return Ok(format!("You already carry a {}.", tool.label()));
                }
                self.inventory.add(tool, 1)?;
                self.push_inventory();
                Ok(format!("Picked up the {tool}!"))
            }
            Capability::StorageManage => {
                self.require_near(Tag::Storage)?;
                let outcome = self.storage.manage(&mut self.inventory)?;
                self.push_ledgers();
                Ok(match outcome {
                    StorageOutcome::Deposited(moved) => describe_deposit(&moved),
                    StorageOutcome::Withdrew(kind, count) => {
                        format!("Took {count} {kind} from the {}.", entry.label)
                    }
                })
            }
            Capability::CraftingBenchToggle => {
                self.toggle_crafting_panel();
                Ok(if self.crafting_panel_open {
                    String::from("Crafting panel opened.")
                } else {
                    String::from("Crafting panel closed.")
                })
            }
            Capability::Fish {
                difficulty,
                requires_lure,
            } => {
                let spot = FishingSpot {
                    difficulty,
                    requires_lure,
                };
                self.fishing.start(
                    spot,
                    &self.fishing_rules,
                    &mut self.inventory,
                    self.rng.as_mut(),
                )?;
                if requires_lure {
                    self.push_inventory();
                }
                self.set_fishing_status(String::from("Waiting for a bite... 0%"));
                Ok(format!("You cast your line into the {}.", entry.label))
            }
            Capability::ClimbTo(target) => {
                self.teleport(target);
                Ok(format!("You climbed the {}.", entry.label))
            }
        }
    }

    /// Fell a tree and scatter wood drops around it. Returns the drop count.
    fn chop(&mut self, id: InteractableId, origin: Vec3, yields: (u32, u32)) -> u32 {
        if let Some(tree) = self.registry.get_mut(id) {
            tree.capability = Capability::Chop {
                yields,
                chopped: true,
            };
            tree.enabled = false;
        }
        let drops = self.rng.range_inclusive(yields.0, yields.1);
        let scatter = self.config.wood_scatter_radius.max(WOOD_MIN_SCATTER);
        for _ in 0..drops {
            let angle = self.rng.range_f32(0.0, TAU);
            let distance = self.rng.range_f32(WOOD_MIN_SCATTER, scatter);
            let position = origin + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);
            let drop = self.registry.register(Interactable::new(
                "Chopped Wood",
                position,
                Capability::Collect(ItemKind::Wood),
            ));
            self.events.push(SessionEvent::Spawned {
                kind: SpawnKind::Item(ItemKind::Wood),
                position,
                interactable: Some(drop),
            });
        }
        info!(tree = %id, drops, "tree chopped");
        drops
    }

    fn apply_craft(&mut self, outcome: CraftOutcome) -> String {
        self.push_inventory();
        match outcome.structure {
            Some(variant) => {
                self.raise_structure(variant);
                format!("Built a {}!", variant.label())
            }
            None => {
                let made: Vec<String> = outcome
                    .granted
                    .iter()
                    .map(|(kind, count)| {
                        if *count == 1 {
                            format!("a {kind}")
                        } else {
                            format!("{count} {kind}")
                        }
                    })
                    .collect();
                format!("Crafted {}!", made.join(" and "))
            }
        }
    }

    fn raise_structure(&mut self, variant: ShelterVariant) {
        let ahead = self.player.position + self.player.forward() * STRUCTURE_DISTANCE;
        let base = Vec3::new(ahead.x, 0.0, ahead.z);
        self.events.push(SessionEvent::Spawned {
            kind: SpawnKind::Shelter(variant),
            position: base,
            interactable: None,
        });
        if let Some(height) = variant.platform_height() {
            let ladder = self.registry.register(Interactable::new(
                format!("{} Ladder", variant.label()),
                base,
                Capability::ClimbTo(base + Vec3::Y * height),
            ));
            self.events.push(SessionEvent::Spawned {
                kind: SpawnKind::Ladder,
                position: base,
                interactable: Some(ladder),
            });
        }
    }

    // ---------------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------------

    fn require_near(&self, tag: Tag) -> Result<(), ActionError> {
        if self.is_near(tag) {
            Ok(())
        } else {
            Err(ActionError::NotNearStation { tag })
        }
    }

    fn report(&mut self, result: Result<String, ActionError>) -> Result<(), ActionError> {
        match result {
            Ok(message) => {
                self.log_line(message);
                Ok(())
            }
            Err(err) => {
                if err.is_reported() {
                    debug!(%err, "action rejected");
                    self.log_line(err.to_string());
                }
                Err(err)
            }
        }
    }

    fn log_line(&mut self, message: impl Into<String>) {
        let line = LogLine {
            time: self.clock,
            message: message.into(),
        };
        info!(message = %line.message, "log");
        self.log.push(line.clone());
        self.events.push(SessionEvent::Log { line });
    }

    fn set_prompt(&mut self, text: String) {
        if text != self.prompt {
            self.prompt = text.clone();
            self.events.push(SessionEvent::PromptChanged { text });
        }
    }

    fn set_fishing_status(&mut self, text: String) {
        if text != self.fishing_status {
            self.fishing_status = text.clone();
            self.events.push(SessionEvent::FishingStatus { text });
        }
    }

    fn push_inventory(&mut self) {
        self.events.push(SessionEvent::InventoryChanged {
            items: self.inventory.snapshot(),
        });
    }

    fn push_ledgers(&mut self) {
        self.push_inventory();
        self.events.push(SessionEvent::StorageChanged {
            rows: self.storage.rows(),
        });
    }
}

fn describe_deposit(moved: &[(ItemKind, u32)]) -> String {
    let total: u32 = moved.iter().map(|(_, count)| *count).sum();
    format!("Stored {total} items in storage.")
}
