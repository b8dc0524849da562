//! World resource nodes.
//!
//! A node takes a fixed number of hits. The hit that depletes it yields its
//! whole payload at once; earlier hits yield nothing.

use quantum_forge_economy::{EconomyError, EconomyResult, ResourceAmount, ResourceKind};

/// A harvestable node placed in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceNode {
    /// What the node yields.
    kind: ResourceKind,
    /// Units credited on depletion.
    yield_amount: u32,
    /// Hits left before depletion.
    hits_remaining: u32,
}

impl ResourceNode {
    /// Creates a node.
    ///
    /// # Errors
    ///
    /// - `ZeroAmount` if `yield_amount` is zero
    /// - `InvalidConfig` if `hits` is zero
    pub fn new(kind: ResourceKind, yield_amount: u32, hits: u32) -> EconomyResult<Self> {
        if yield_amount == 0 {
            return Err(EconomyError::ZeroAmount(kind));
        }
        if hits == 0 {
            return Err(EconomyError::InvalidConfig(format!(
                "{kind} node needs at least one hit"
            )));
        }
        Ok(Self {
            kind,
            yield_amount,
            hits_remaining: hits,
        })
    }

    /// The kind this node yields.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Hits left before depletion.
    #[must_use]
    pub const fn hits_remaining(&self) -> u32 {
        self.hits_remaining
    }

    /// Returns true once the payload has been handed out.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.hits_remaining == 0
    }

    /// Strikes the node once.
    ///
    /// Returns the payload on the depleting hit, `None` otherwise. A depleted
    /// node yields nothing more.
    pub fn hit(&mut self) -> Option<ResourceAmount> {
        if self.is_depleted() {
            return None;
        }
        self.hits_remaining -= 1;
        if self.hits_remaining > 0 {
            return None;
        }
        tracing::debug!(kind = %self.kind, amount = self.yield_amount, "node depleted");
        Some(ResourceAmount::new(self.kind, self.yield_amount))
    }
}
