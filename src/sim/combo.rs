//! Per-gesture combo accounting
//!
//! Merges inside one drag build an uncommitted combo score. It is credited
//! only when the chain reaches a matching goal bar; releasing anywhere else
//! throws it away.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboTracker {
    merges: u32,
    pending: u64,
}

impl ComboTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new gesture
    pub fn begin(&mut self) {
        self.merges = 0;
        self.pending = 0;
    }

    pub fn merges(&self) -> u32 {
        self.merges
    }

    /// Uncommitted combo score
    pub fn pending(&self) -> u64 {
        self.pending
    }

    pub fn is_active(&self) -> bool {
        self.merges > 0
    }

    /// Count a merge that produced `radius`; returns the new pending score
    ///
    /// Pending score is `round(radius * (merges + 1))`, replacing the
    /// previous value rather than adding to it.
    pub fn record_merge(&mut self, radius: f32) -> u64 {
        self.merges += 1;
        self.pending = (radius * (self.merges + 1) as f32).round().max(0.0) as u64;
        self.pending
    }

    /// Credit the gesture at a goal: pending score plus the ball's own radius
    pub fn cash_in(&mut self, display_radius: f32) -> u64 {
        let points = self.pending + display_radius.floor().max(0.0) as u64;
        self.begin();
        points
    }

    /// Drop an uncashed chain; returns (merges, discarded score) if one existed
    pub fn discard(&mut self) -> Option<(u32, u64)> {
        let lost = self.is_active().then_some((self.merges, self.pending));
        self.begin();
        lost
    }
}
