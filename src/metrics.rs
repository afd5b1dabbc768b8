//! Settlement counters

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Running counters for everything the keeper settles.
///
/// Amounts are summed across denominations; they are meant for dashboards,
/// not for accounting.
#[derive(Debug, Default)]
pub struct SettlementMetrics {
    games_created: AtomicU64,
    moves_played: AtomicU64,
    games_rejected: AtomicU64,
    games_forfeited: AtomicU64,
    games_erased: AtomicU64,
    sweeps: AtomicU64,
    payouts: AtomicU64,
    paid_amount: AtomicU64,
    refunds: AtomicU64,
    refunded_amount: AtomicU64,
}

/// Point-in-time copy of [`SettlementMetrics`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub games_created: u64,
    pub moves_played: u64,
    pub games_rejected: u64,
    pub games_forfeited: u64,
    pub games_erased: u64,
    pub sweeps: u64,
    pub payouts: u64,
    pub paid_amount: u64,
    pub refunds: u64,
    pub refunded_amount: u64,
}

impl SettlementMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_game_created(&self) {
        self.games_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_move(&self) {
        self.moves_played.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.games_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_forfeit(&self) {
        self.games_forfeited.fetch_add(1, Ordering::Relaxed);
    }

    /// A game removed without a winner because it was never really played
    pub fn record_erased(&self) {
        self.games_erased.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sweep(&self) {
        self.sweeps.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_payout(&self, amount: u64) {
        self.payouts.fetch_add(1, Ordering::Relaxed);
        self.paid_amount.fetch_add(amount, Ordering::Relaxed);
    }

    pub fn record_refund(&self, amount: u64) {
        self.refunds.fetch_add(1, Ordering::Relaxed);
        self.refunded_amount.fetch_add(amount, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            games_created: self.games_created.load(Ordering::Relaxed),
            moves_played: self.moves_played.load(Ordering::Relaxed),
            games_rejected: self.games_rejected.load(Ordering::Relaxed),
            games_forfeited: self.games_forfeited.load(Ordering::Relaxed),
            games_erased: self.games_erased.load(Ordering::Relaxed),
            sweeps: self.sweeps.load(Ordering::Relaxed),
            payouts: self.payouts.load(Ordering::Relaxed),
            paid_amount: self.paid_amount.load(Ordering::Relaxed),
            refunds: self.refunds.load(Ordering::Relaxed),
            refunded_amount: self.refunded_amount.load(Ordering::Relaxed),
        }
    }
}
