//! Fishing attempts.
//!
//! A player is either idle or waiting on exactly one attempt. Progress is
//! accumulated elapsed time advanced once per tick; the attempt resolves the
//! first tick its elapsed time reaches the sampled duration.

use crate::error::ActionError;
use crate::inventory::Ledger;
use lettuce_park_core::{ItemKind, RandomSource};
use serde::{Deserialize, Serialize};

/// Tunables for fishing, copied out of the session config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FishingRules {
    /// Duration range in seconds, `[min, max)`.
    pub duration: (f32, f32),
    /// Success chance at difficulty 0.
    pub base_success: f32,
    /// Chance lost per unit of difficulty.
    pub difficulty_penalty: f32,
}

impl Default for FishingRules {
    fn default() -> Self {
        Self {
            duration: (2.5, 5.0),
            base_success: 0.85,
            difficulty_penalty: 0.6,
        }
    }
}

impl FishingRules {
    /// Probability that an attempt at `difficulty` lands a catch.
    pub fn success_chance(&self, difficulty: f32) -> f32 {
        (self.base_success - self.difficulty_penalty * difficulty).clamp(0.05, 0.95)
    }
}

/// The spot being fished.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FishingSpot {
    /// 0.0 (easy) to 1.0 (hard).
    pub difficulty: f32,
    /// Consumes a lure per attempt.
    pub requires_lure: bool,
}

/// A live attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FishingAttempt {
    /// Seconds waited so far.
    pub elapsed: f32,
    /// Seconds until resolution.
    pub duration: f32,
    /// Spot difficulty.
    pub difficulty: f32,
    /// Item credited on success.
    pub reward: ItemKind,
}

impl FishingAttempt {
    /// Fraction of the wait completed, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }
}

/// Per-player fishing state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum FishingState {
    /// No attempt live.
    #[default]
    Idle,
    /// Waiting for a bite.
    Waiting(FishingAttempt),
}

/// Result of advancing the state by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FishingTransition {
    /// Nothing live.
    Idle,
    /// Still waiting; carries the progress fraction.
    Progress(f32),
    /// Resolved with a catch; the reward was credited.
    Caught(ItemKind),
    /// Resolved without a catch.
    Escaped,
}

impl FishingState {
    /// Whether an attempt is live.
    pub fn is_waiting(&self) -> bool {
        matches!(self, FishingState::Waiting(_))
    }

    /// The live attempt, if any.
    pub fn attempt(&self) -> Option<&FishingAttempt> {
        match self {
            FishingState::Waiting(attempt) => Some(attempt),
            FishingState::Idle => None,
        }
    }

    /// Begin an attempt at `spot`.
    ///
    /// Rejected while another attempt is live, or when the spot needs a lure
    /// and the player has none. A lure is consumed only once the attempt is
    /// certain to start.
    pub fn start(
        &mut self,
        spot: FishingSpot,
        rules: &FishingRules,
        inventory: &mut Ledger,
        rng: &mut dyn RandomSource,
    ) -> Result<&FishingAttempt, ActionError> {
        if self.is_waiting() {
            return Err(ActionError::AlreadyFishing);
        }
        if spot.requires_lure {
            if !inventory.has(ItemKind::Lure, 1) {
                return Err(ActionError::MissingLure);
            }
            inventory.remove(ItemKind::Lure, 1)?;
        }
        let duration = rng.range_f32(rules.duration.0, rules.duration.1);
        *self = FishingState::Waiting(FishingAttempt {
            elapsed: 0.0,
            duration,
            difficulty: spot.difficulty,
            reward: ItemKind::Fish,
        });
        tracing::debug!(duration, difficulty = spot.difficulty, "fishing attempt started");
        match self {
            FishingState::Waiting(attempt) => Ok(attempt),
            FishingState::Idle => Err(ActionError::NotFishing),
        }
    }

    /// Advance the live attempt by `dt` seconds, resolving it at most once.
    pub fn advance(
        &mut self,
        dt: f32,
        rules: &FishingRules,
        inventory: &mut Ledger,
        rng: &mut dyn RandomSource,
    ) -> FishingTransition {
        let FishingState::Waiting(attempt) = self else {
            return FishingTransition::Idle;
        };
        attempt.elapsed += dt.max(0.0);
        if attempt.elapsed < attempt.duration {
            return FishingTransition::Progress(attempt.progress());
        }

        let attempt = *attempt;
        *self = FishingState::Idle;
        let roll = rng.next_unit();
        if roll < rules.success_chance(attempt.difficulty) {
            match inventory.add(attempt.reward, 1) {
                Ok(()) => FishingTransition::Caught(attempt.reward),
                Err(err) => {
                    tracing::warn!(%err, "catch could not be stored");
                    FishingTransition::Escaped
                }
            }
        } else {
            FishingTransition::Escaped
        }
    }

    /// Abandon the live attempt without reward.
    pub fn cancel(&mut self) -> Result<FishingAttempt, ActionError> {
        match std::mem::take(self) {
            FishingState::Waiting(attempt) => Ok(attempt),
            FishingState::Idle => Err(ActionError::NotFishing),
        }
    }
}
