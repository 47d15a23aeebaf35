//! Error types for ledger mutations and player actions.
//!
//! Every variant is a recoverable, player-reported condition. The `Display`
//! text is what ends up in the in-game log.

use crate::interaction::Tag;
use lettuce_park_core::ItemKind;
use thiserror::Error;

/// Rejected ledger mutation. The ledger is untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A delta would drive a count below zero.
    #[error("not enough {kind}: need {required}, have {available}")]
    Insufficient {
        /// Item being removed
        kind: ItemKind,
        /// Amount the delta asked for
        required: u32,
        /// Amount currently held
        available: u32,
    },

    /// A delta would exceed the ledger's per-kind bound.
    #[error("no room for {kind}: capacity is {capacity}")]
    CapacityExceeded {
        /// Item being added
        kind: ItemKind,
        /// Per-kind bound of the ledger
        capacity: u32,
    },

    /// A delta would overflow the counter.
    #[error("{kind} count overflow")]
    Overflow {
        /// Item being added
        kind: ItemKind,
    },
}

/// A player action that could not be carried out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    /// Activate was signalled with nothing in focus. Not logged.
    #[error("nothing to interact with")]
    NothingFocused,

    /// The interactable was disabled (collected or chopped) before activation.
    #[error("{label} is no longer available")]
    Unavailable {
        /// Interactable label
        label: String,
    },

    /// A required tool is missing.
    #[error("You need a {} to do that.", .tool.label())]
    MissingTool {
        /// Tool kind
        tool: ItemKind,
    },

    /// The tree was already chopped.
    #[error("This tree has already been chopped.")]
    AlreadyChopped,

    /// Action requires standing near a tagged station.
    #[error("You need to be near {} to do that.", .tag.station_name())]
    NotNearStation {
        /// Tag of the required station
        tag: Tag,
    },

    /// Nothing to deposit and nothing to withdraw.
    #[error("Storage is empty and you have nothing to store.")]
    StorageEmpty,

    /// Withdraw asked for more than storage holds.
    #[error("Storage only holds {available} {}.", .kind.label())]
    StorageShort {
        /// Requested kind
        kind: ItemKind,
        /// Amount held in storage
        available: u32,
    },

    /// Withdraw asked for zero items.
    #[error("Choose at least one item to take.")]
    NothingRequested,

    /// A fishing attempt is already live.
    #[error("You're already fishing!")]
    AlreadyFishing,

    /// The spot requires a lure and the player has none.
    #[error("This spot needs a {} to fish.", ItemKind::Lure)]
    MissingLure,

    /// Cancel was signalled with no live attempt.
    #[error("You're not fishing.")]
    NotFishing,

    /// Recipe name not in the recipe book.
    #[error("Unknown recipe `{name}`.")]
    UnknownRecipe {
        /// Requested recipe name
        name: String,
    },

    /// Not all recipe requirements are held.
    #[error("You need {} to craft {output}.", describe_shortfall(.missing))]
    MissingIngredients {
        /// Display name of the recipe output
        output: String,
        /// `(kind, short_by)` for every unmet requirement
        missing: Vec<(ItemKind, u32)>,
    },

    /// Ledger rejected the mutation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ActionError {
    /// Whether the failure should be written to the in-game log.
    pub fn is_reported(&self) -> bool {
        !matches!(self, ActionError::NothingFocused)
    }
}

fn describe_shortfall(missing: &[(ItemKind, u32)]) -> String {
    let parts: Vec<String> = missing
        .iter()
        .map(|(kind, count)| format!("{count} more {kind}"))
        .collect();
    match parts.as_slice() {
        [] => String::from("nothing"),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
