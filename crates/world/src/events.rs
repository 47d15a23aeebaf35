//! Presentation-facing events and the in-game log.

use crate::crafting::ShelterVariant;
use crate::interaction::InteractableId;
use glam::Vec3;
use lettuce_park_core::ItemKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// A line in the in-game log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogLine {
    /// Session clock in seconds when the line was written.
    pub time: f32,
    /// Message text.
    pub message: String,
}

impl LogLine {
    /// `[HH:MM:SS]` stamp from the session clock.
    pub fn timestamp(&self) -> String {
        let total = self.time.max(0.0) as u64;
        format!(
            "[{:02}:{:02}:{:02}]",
            total / 3600,
            (total / 60) % 60,
            total % 60
        )
    }

    /// Line as shown in the log panel.
    pub fn render(&self) -> String {
        format!("{} {}", self.timestamp(), self.message)
    }
}

/// Bounded log, newest first.
#[derive(Debug, Clone)]
pub struct GameLog {
    lines: VecDeque<LogLine>,
    capacity: usize,
}

impl GameLog {
    /// Log keeping at most `capacity` lines (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend a line, dropping the oldest beyond capacity.
    pub fn push(&mut self, line: LogLine) {
        self.lines.push_front(line);
        self.lines.truncate(self.capacity);
    }

    /// Lines, newest first.
    pub fn lines(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    /// Most recent line.
    pub fn latest(&self) -> Option<&LogLine> {
        self.lines.front()
    }

    /// Number of retained lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// What the world layer should materialize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnKind {
    /// Collectible item drop
    Item(ItemKind),
    /// Crafted shelter
    Shelter(ShelterVariant),
    /// Ladder up to a platform
    Ladder,
}

/// State change notification for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Prompt text changed (empty when nothing is focused).
    PromptChanged {
        /// New prompt
        text: String,
    },
    /// Focus moved to another interactable (or none).
    FocusChanged {
        /// Newly focused interactable
        focused: Option<InteractableId>,
    },
    /// A line was added to the in-game log.
    Log {
        /// The line
        line: LogLine,
    },
    /// Player inventory changed.
    InventoryChanged {
        /// Full snapshot
        items: BTreeMap<ItemKind, u32>,
    },
    /// Shared storage changed (rows in display order).
    StorageChanged {
        /// Rows in display order
        rows: Vec<(ItemKind, u32)>,
    },
    /// Fishing status text changed.
    FishingStatus {
        /// Status text (empty when idle)
        text: String,
    },
    /// Crafting panel opened or closed.
    CraftingPanel {
        /// New state
        open: bool,
    },
    /// A new world object should appear.
    Spawned {
        /// What to spawn
        kind: SpawnKind,
        /// Where
        position: Vec3,
        /// Interactable backing it, if any
        interactable: Option<InteractableId>,
    },
    /// Player was moved by something other than walking.
    PlayerMoved {
        /// New position
        position: Vec3,
    },
}

impl SessionEvent {
    /// Short label used for event logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::PromptChanged { .. } => "prompt_changed",
            SessionEvent::FocusChanged { .. } => "focus_changed",
            SessionEvent::Log { .. } => "log",
            SessionEvent::InventoryChanged { .. } => "inventory_changed",
            SessionEvent::StorageChanged { .. } => "storage_changed",
            SessionEvent::FishingStatus { .. } => "fishing_status",
            SessionEvent::CraftingPanel { .. } => "crafting_panel",
            SessionEvent::Spawned { .. } => "spawned",
            SessionEvent::PlayerMoved { .. } => "player_moved",
        }
    }
}
