#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod item;
pub mod random;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use item::{ItemKind, ParseItemKindError};
pub use random::{RandomSource, SeededRandom};

/// Frame tick counter. One tick is advanced per rendered (or simulated) frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any session timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}
