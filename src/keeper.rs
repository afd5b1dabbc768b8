//! The checkers keeper: owns the store and the external collaborators and
//! exposes the state transitions. Message handlers live in `msg_server.rs`,
//! the block-boundary sweep in `end_block.rs`, read-only queries in `query.rs`.

use crate::{
    config::{CheckersConfig, GameConfig, GasConfig},
    context::BlockContext,
    errors::{CheckersResult, ConfigurationError, FatalError},
    game_store::GameStore,
    games::{
        escrow::BankKeeper,
        leaderboard::LeaderboardKeeper,
        rules::RulesEngine,
        types::{format_deadline, SystemInfo},
    },
    metrics::SettlementMetrics,
    storage::KvStore,
};

pub struct Keeper<S, B, R, L> {
    pub(crate) store: S,
    pub(crate) bank: B,
    pub(crate) rules: R,
    pub(crate) leaderboard: L,
    pub(crate) game_config: GameConfig,
    pub(crate) gas_config: GasConfig,
    pub(crate) metrics: SettlementMetrics,
}

impl<S, B, R, L> Keeper<S, B, R, L>
where
    S: KvStore,
    B: BankKeeper,
    R: RulesEngine,
    L: LeaderboardKeeper,
{
    /// Build a keeper; fails when `config` does not validate
    pub fn new(
        store: S,
        bank: B,
        rules: R,
        leaderboard: L,
        config: &CheckersConfig,
    ) -> CheckersResult<Self> {
        config
            .validate()
            .map_err(|e| ConfigurationError::ValidationFailed(e.to_string()))?;

        Ok(Self {
            store,
            bank,
            rules,
            leaderboard,
            game_config: config.game.clone(),
            gas_config: config.gas.clone(),
            metrics: SettlementMetrics::new(),
        })
    }

    /// Write the initial system counter unless one already exists
    pub fn init_genesis(&mut self) -> CheckersResult<SystemInfo> {
        if let Some(info) = self.store.get_system_info()? {
            tracing::debug!(next_id = info.next_id, "SystemInfo already initialized");
            return Ok(info);
        }

        let info = SystemInfo::default();
        self.store.set_system_info(&info)?;
        tracing::info!("Initialized SystemInfo");
        Ok(info)
    }

    pub(crate) fn must_get_system_info(&self) -> CheckersResult<SystemInfo> {
        self.store.get_system_info()?.ok_or_else(|| {
            tracing::error!("SystemInfo not found");
            FatalError::SystemInfoNotFound.into()
        })
    }

    /// Deadline for a game whose clock starts at the current block
    pub(crate) fn next_deadline(&self, ctx: &BlockContext) -> CheckersResult<String> {
        let deadline = self
            .game_config
            .turn_duration()
            .and_then(|turn| ctx.block_time().checked_add_signed(turn))
            .ok_or_else(|| {
                tracing::error!(
                    block_time = %ctx.block_time(),
                    turn_secs = self.game_config.max_turn_duration_secs,
                    "Deadline out of range"
                );
                FatalError::DeadlineOverflow {
                    block_time: ctx.block_time().to_string(),
                    turn_secs: self.game_config.max_turn_duration_secs,
                }
            })?;
        Ok(format_deadline(deadline))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct store access for hosts doing their own migrations and for tests
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    pub fn leaderboard(&self) -> &L {
        &self.leaderboard
    }

    pub fn metrics(&self) -> &SettlementMetrics {
        &self.metrics
    }
}
