//! Item ledgers for the player inventory and shared storage.
//!
//! A [`Ledger`] maps item kinds to non-negative counts. All mutation goes
//! through [`Ledger::apply`], which validates a whole [`Delta`] before touching
//! any count, so callers never observe partial states.

use crate::error::LedgerError;
use lettuce_park_core::ItemKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Signed per-kind changes applied as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    changes: BTreeMap<ItemKind, i64>,
}

impl Delta {
    /// Empty delta.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` of `kind` (accumulates with earlier entries).
    pub fn add(mut self, kind: ItemKind, amount: u32) -> Self {
        self.push(kind, i64::from(amount));
        self
    }

    /// Remove `amount` of `kind` (accumulates with earlier entries).
    pub fn remove(mut self, kind: ItemKind, amount: u32) -> Self {
        self.push(kind, -i64::from(amount));
        self
    }

    /// Accumulate a signed change.
    pub fn push(&mut self, kind: ItemKind, change: i64) {
        *self.changes.entry(kind).or_insert(0) += change;
    }

    /// The inverse delta.
    pub fn negated(&self) -> Self {
        Self {
            changes: self.changes.iter().map(|(k, v)| (*k, -v)).collect(),
        }
    }

    /// Non-zero changes in canonical kind order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemKind, i64)> + '_ {
        self.changes
            .iter()
            .filter(|(_, v)| **v != 0)
            .map(|(k, v)| (*k, *v))
    }

    /// True when no change is non-zero.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl FromIterator<(ItemKind, i64)> for Delta {
    fn from_iter<T: IntoIterator<Item = (ItemKind, i64)>>(iter: T) -> Self {
        let mut delta = Delta::new();
        for (kind, change) in iter {
            delta.push(kind, change);
        }
        delta
    }
}

/// Mapping of item kind to count, optionally bounded per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    counts: BTreeMap<ItemKind, u32>,
    capacity: Option<u32>,
}

impl Ledger {
    /// Unbounded, empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty ledger that refuses to hold more than `capacity` of any kind.
    pub fn bounded(capacity: u32) -> Self {
        Self {
            counts: BTreeMap::new(),
            capacity: Some(capacity),
        }
    }

    /// Ledger seeded with initial counts (unbounded).
    pub fn with_items(items: &[(ItemKind, u32)]) -> Self {
        let mut ledger = Self::new();
        for (kind, count) in items {
            let slot = ledger.counts.entry(*kind).or_insert(0);
            *slot = slot.saturating_add(*count);
        }
        ledger
    }

    /// Per-kind bound, if any.
    pub fn capacity(&self) -> Option<u32> {
        self.capacity
    }

    /// Current count of `kind`.
    pub fn count(&self, kind: ItemKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Check if the ledger holds at least `amount` of `kind`.
    pub fn has(&self, kind: ItemKind, amount: u32) -> bool {
        self.count(kind) >= amount
    }

    /// Conjunction over all requirements.
    pub fn can_afford(&self, requirements: &[(ItemKind, u32)]) -> bool {
        self.shortfall(requirements).is_empty()
    }

    /// `(kind, missing)` for every requirement not met, in requirement order.
    ///
    /// Repeated kinds in `requirements` are summed before comparison.
    pub fn shortfall(&self, requirements: &[(ItemKind, u32)]) -> Vec<(ItemKind, u32)> {
        let mut totals: Vec<(ItemKind, u32)> = Vec::with_capacity(requirements.len());
        for (kind, amount) in requirements {
            match totals.iter_mut().find(|(k, _)| k == kind) {
                Some((_, total)) => *total = total.saturating_add(*amount),
                None => totals.push((*kind, *amount)),
            }
        }
        totals
            .into_iter()
            .filter_map(|(kind, required)| {
                let held = self.count(kind);
                (held < required).then_some((kind, required - held))
            })
            .collect()
    }

    /// Validate `delta` without applying it.
    pub fn check(&self, delta: &Delta) -> Result<(), LedgerError> {
        for (kind, change) in delta.iter() {
            self.resulting_count(kind, change)?;
        }
        Ok(())
    }

    /// Apply all changes in `delta`, or none of them.
    pub fn apply(&mut self, delta: &Delta) -> Result<(), LedgerError> {
        let mut staged: Vec<(ItemKind, u32)> = Vec::new();
        for (kind, change) in delta.iter() {
            staged.push((kind, self.resulting_count(kind, change)?));
        }
        for (kind, count) in staged {
            if count == 0 {
                self.counts.remove(&kind);
            } else {
                self.counts.insert(kind, count);
            }
        }
        Ok(())
    }

    /// Add `amount` of a single kind.
    pub fn add(&mut self, kind: ItemKind, amount: u32) -> Result<(), LedgerError> {
        self.apply(&Delta::new().add(kind, amount))
    }

    /// Remove `amount` of a single kind.
    pub fn remove(&mut self, kind: ItemKind, amount: u32) -> Result<(), LedgerError> {
        self.apply(&Delta::new().remove(kind, amount))
    }

    /// Non-zero entries in canonical kind order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemKind, u32)> + '_ {
        self.counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(kind, count)| (*kind, *count))
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|c| u64::from(*c)).sum()
    }

    /// True when every count is zero.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Full snapshot with every kind present (zero counts included), suitable
    /// for UI panels that show fixed rows.
    pub fn snapshot(&self) -> BTreeMap<ItemKind, u32> {
        ItemKind::ALL
            .into_iter()
            .map(|kind| (kind, self.count(kind)))
            .collect()
    }

    /// Inventory line in the style of the HUD, e.g.
    /// `Inventory: 🥬 Lettuce Leaves: 2 • 🪨 River Stones: 1`.
    pub fn summary(&self) -> String {
        let entries: Vec<String> = self
            .iter()
            .map(|(kind, count)| format!("{kind}: {count}"))
            .collect();
        if entries.is_empty() {
            String::from("Inventory: (empty)")
        } else {
            format!("Inventory: {}", entries.join(" • "))
        }
    }

    fn resulting_count(&self, kind: ItemKind, change: i64) -> Result<u32, LedgerError> {
        let held = self.count(kind);
        let next = i64::from(held) + change;
        if next < 0 {
            return Err(LedgerError::Insufficient {
                kind,
                required: u32::try_from(-change).unwrap_or(u32::MAX),
                available: held,
            });
        }
        let next = u32::try_from(next).map_err(|_| LedgerError::Overflow { kind })?;
        if let Some(capacity) = self.capacity {
            if change > 0 && next > capacity {
                return Err(LedgerError::CapacityExceeded { kind, capacity });
            }
        }
        Ok(next)
    }
}
