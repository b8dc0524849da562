//! # Resource Ledger
//!
//! The single source of truth for what the player owns.
//!
//! Balances live in a fixed array indexed by [`ResourceKind`]. All slots are
//! allocated at creation time and every balance stays non-negative.
//!
//! ## Atomic consumption
//!
//! [`Ledger::try_consume`] checks every requirement before debiting any of
//! them. A recipe with three inputs never debits the first and then fails on
//! the second.

use crate::error::{EconomyError, EconomyResult};
use crate::events::EconomyEvent;
use crate::kind::{ResourceAmount, ResourceKind};

/// Per-kind balances with change notifications.
#[derive(Clone, Debug)]
pub struct Ledger {
    /// Current balances.
    balances: [u32; ResourceKind::COUNT],
    /// Units ever credited.
    added: [u64; ResourceKind::COUNT],
    /// Units ever debited.
    removed: [u64; ResourceKind::COUNT],
    /// Notifications not yet drained.
    pending: Vec<EconomyEvent>,
}

impl Ledger {
    /// Creates an empty ledger with every kind at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: [0; ResourceKind::COUNT],
            added: [0; ResourceKind::COUNT],
            removed: [0; ResourceKind::COUNT],
            pending: Vec::with_capacity(32),
        }
    }

    /// Creates a ledger holding a starting grant.
    ///
    /// # Errors
    ///
    /// Returns an error if a grant entry has a zero quantity, or if repeated
    /// entries for one kind overflow its balance.
    pub fn with_grant(grant: &[ResourceAmount]) -> EconomyResult<Self> {
        let mut ledger = Self::new();
        for entry in grant {
            ledger.add(entry.kind, entry.quantity)?;
        }
        Ok(ledger)
    }

    /// Credits `amount` units of `kind` and returns the new total.
    ///
    /// # Errors
    ///
    /// - `ZeroAmount` if `amount` is zero
    /// - `ArithmeticOverflow` if the balance would exceed `u32::MAX`
    pub fn add(&mut self, kind: ResourceKind, amount: u32) -> EconomyResult<u32> {
        if amount == 0 {
            return Err(EconomyError::ZeroAmount(kind));
        }
        let slot = &mut self.balances[kind.index()];
        let total = slot
            .checked_add(amount)
            .ok_or(EconomyError::ArithmeticOverflow(kind))?;
        *slot = total;
        self.added[kind.index()] += u64::from(amount);

        tracing::trace!(%kind, amount, total, "ledger credit");
        self.pending.push(EconomyEvent::ResourceChanged { kind, total });
        Ok(total)
    }

    /// Debits `amount` units of `kind`.
    ///
    /// Returns `Ok(false)` and leaves the ledger untouched if the balance is
    /// lower than `amount`.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount` if `amount` is zero.
    pub fn remove(&mut self, kind: ResourceKind, amount: u32) -> EconomyResult<bool> {
        if amount == 0 {
            return Err(EconomyError::ZeroAmount(kind));
        }
        if !self.has_at_least(kind, amount) {
            return Ok(false);
        }
        self.debit(kind, amount);
        Ok(true)
    }

    /// Current balance of `kind`.
    #[inline]
    #[must_use]
    pub fn balance(&self, kind: ResourceKind) -> u32 {
        self.balances[kind.index()]
    }

    /// Returns true if the balance of `kind` covers `amount`.
    #[inline]
    #[must_use]
    pub fn has_at_least(&self, kind: ResourceKind, amount: u32) -> bool {
        self.balances[kind.index()] >= amount
    }

    /// Returns true if every requirement is covered, counting repeated kinds
    /// together.
    #[must_use]
    pub fn can_afford(&self, requirements: &[ResourceAmount]) -> bool {
        let totals = Self::totals(requirements);
        ResourceKind::ALL
            .iter()
            .all(|kind| u64::from(self.balance(*kind)) >= totals[kind.index()])
    }

    /// All-or-nothing debit of several kinds.
    ///
    /// Returns `Ok(false)` without touching any balance if one requirement
    /// is not covered. On success emits one notification per debited kind.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount` if any requirement has a zero quantity.
    pub fn try_consume(&mut self, requirements: &[ResourceAmount]) -> EconomyResult<bool> {
        if let Some(zero) = requirements.iter().find(|r| r.quantity == 0) {
            return Err(EconomyError::ZeroAmount(zero.kind));
        }
        if !self.can_afford(requirements) {
            return Ok(false);
        }

        let totals = Self::totals(requirements);
        for kind in ResourceKind::ALL {
            // Bounded by the balance checked above, so it fits in u32.
            let amount = u32::try_from(totals[kind.index()]).unwrap_or(u32::MAX);
            if amount > 0 {
                self.debit(kind, amount);
            }
        }
        Ok(true)
    }

    /// Units of `kind` ever credited.
    #[must_use]
    pub fn lifetime_added(&self, kind: ResourceKind) -> u64 {
        self.added[kind.index()]
    }

    /// Units of `kind` ever debited.
    #[must_use]
    pub fn lifetime_removed(&self, kind: ResourceKind) -> u64 {
        self.removed[kind.index()]
    }

    /// Copy of all balances, indexed by [`ResourceKind::index`].
    #[must_use]
    pub fn snapshot(&self) -> [u32; ResourceKind::COUNT] {
        self.balances
    }

    /// Takes all notifications raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<EconomyEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Number of notifications waiting to be drained.
    #[must_use]
    pub fn pending_event_count(&self) -> usize {
        self.pending.len()
    }

    /// Debits a balance already known to cover `amount`.
    fn debit(&mut self, kind: ResourceKind, amount: u32) {
        let slot = &mut self.balances[kind.index()];
        *slot -= amount;
        let total = *slot;
        self.removed[kind.index()] += u64::from(amount);

        tracing::trace!(%kind, amount, total, "ledger debit");
        self.pending.push(EconomyEvent::ResourceChanged { kind, total });
    }

    /// Sums requirements per kind.
    fn totals(requirements: &[ResourceAmount]) -> [u64; ResourceKind::COUNT] {
        let mut totals = [0u64; ResourceKind::COUNT];
        for r in requirements {
            totals[r.kind.index()] += u64::from(r.quantity);
        }
        totals
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
