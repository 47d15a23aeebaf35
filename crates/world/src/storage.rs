//! Shared storage chest and cross-ledger transfers.

use crate::error::{ActionError, LedgerError};
use crate::inventory::{Delta, Ledger};
use lettuce_park_core::ItemKind;
use serde::{Deserialize, Serialize};

/// Move `delta` out of `from` and into `to` as a single transaction.
///
/// Positive entries in `delta` are amounts leaving `from`. Both ledgers are
/// validated before either is mutated, so a rejection on either side leaves
/// both untouched.
pub fn transfer(from: &mut Ledger, to: &mut Ledger, delta: &Delta) -> Result<(), LedgerError> {
    let outgoing = delta.negated();
    from.check(&outgoing)?;
    to.check(delta)?;
    from.apply(&outgoing)?;
    if let Err(err) = to.apply(delta) {
        // Unreachable after `check`, but keep `from` consistent regardless.
        from.apply(delta)?;
        return Err(err);
    }
    Ok(())
}

/// World-owned storage: a ledger plus the display order of its rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLedger {
    ledger: Ledger,
    order: Vec<ItemKind>,
}

/// What a storage interaction moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOutcome {
    /// Items moved from the player into storage.
    Deposited(Vec<(ItemKind, u32)>),
    /// Items moved from storage to the player.
    Withdrew(ItemKind, u32),
}

impl StorageLedger {
    /// Unbounded, empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty storage bounded per kind.
    pub fn bounded(capacity: u32) -> Self {
        Self {
            ledger: Ledger::bounded(capacity),
            order: Vec::new(),
        }
    }

    /// Underlying ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Count of `kind` in storage.
    pub fn count(&self, kind: ItemKind) -> u32 {
        self.ledger.count(kind)
    }

    /// True when storage holds nothing.
    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    /// Move every transferable kind the player holds into storage.
    ///
    /// Returns the moved `(kind, count)` pairs; empty when there was nothing
    /// to move.
    pub fn deposit_all(&mut self, player: &mut Ledger) -> Result<Vec<(ItemKind, u32)>, LedgerError> {
        let moved: Vec<(ItemKind, u32)> = player
            .iter()
            .filter(|(kind, _)| kind.is_transferable())
            .collect();
        if moved.is_empty() {
            return Ok(moved);
        }
        let delta: Delta = moved
            .iter()
            .map(|(kind, count)| (*kind, i64::from(*count)))
            .collect();
        transfer(player, &mut self.ledger, &delta)?;
        for (kind, _) in &moved {
            self.note_kind(*kind);
        }
        Ok(moved)
    }

    /// Move `amount` of `kind` from storage to the player.
    pub fn withdraw(
        &mut self,
        player: &mut Ledger,
        kind: ItemKind,
        amount: u32,
    ) -> Result<(), ActionError> {
        if amount == 0 {
            return Err(ActionError::NothingRequested);
        }
        let available = self.ledger.count(kind);
        if available < amount {
            return Err(ActionError::StorageShort { kind, available });
        }
        transfer(&mut self.ledger, player, &Delta::new().add(kind, amount))?;
        Ok(())
    }

    /// Most abundant kind in storage; ties go to the earliest kind.
    pub fn most_abundant(&self) -> Option<ItemKind> {
        let mut best: Option<(ItemKind, u32)> = None;
        for (kind, count) in self.ledger.iter() {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((kind, count));
            }
        }
        best.map(|(kind, _)| kind)
    }

    /// Deposit everything; if the player had nothing to move, withdraw a
    /// single unit of the most abundant stored kind instead.
    pub fn manage(&mut self, player: &mut Ledger) -> Result<StorageOutcome, ActionError> {
        let deposited = self.deposit_all(player)?;
        if !deposited.is_empty() {
            return Ok(StorageOutcome::Deposited(deposited));
        }
        let kind = self.most_abundant().ok_or(ActionError::StorageEmpty)?;
        self.withdraw(player, kind, 1)?;
        Ok(StorageOutcome::Withdrew(kind, 1))
    }

    /// Reorder rows by count (descending), ties by canonical kind order.
    /// Counts are not affected.
    pub fn sort(&mut self) {
        let ledger = &self.ledger;
        self.order.retain(|kind| ledger.count(*kind) > 0);
        self.order.sort_by(|a, b| {
            ledger
                .count(*b)
                .cmp(&ledger.count(*a))
                .then_with(|| a.cmp(b))
        });
    }

    /// Non-empty rows in display order.
    pub fn rows(&self) -> Vec<(ItemKind, u32)> {
        self.order
            .iter()
            .map(|kind| (*kind, self.ledger.count(*kind)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    fn note_kind(&mut self, kind: ItemKind) {
        if !self.order.contains(&kind) {
            self.order.push(kind);
        }
    }
}
