//! Shared setup for the keeper integration tests

#![allow(dead_code)]

use checkers_ledger::{
    games::messages::{MsgCreateGame, MsgPlayMove},
    testing::{MemoryBank, RecordingLeaderboard, SimpleRules},
    BlockContext, CheckersConfig, Keeper, KvStore, MemoryStore,
};
use chrono::{DateTime, Duration, TimeZone, Utc};

pub type TestKeeper = Keeper<MemoryStore, MemoryBank, SimpleRules, RecordingLeaderboard>;

pub const ALICE: &str = "alice";
pub const BOB: &str = "bob";
pub const CAROL: &str = "carol";

pub fn genesis_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap()
}

/// Keeper with genesis applied and 1000 "stake" and "coin" for alice and bob
pub fn setup() -> (TestKeeper, BlockContext) {
    let mut bank = MemoryBank::new();
    for account in [ALICE, BOB] {
        bank.mint(account, 1_000, "stake");
        bank.mint(account, 1_000, "coin");
    }
    let mut keeper = Keeper::new(
        MemoryStore::new(),
        bank,
        SimpleRules,
        RecordingLeaderboard::new(),
        &CheckersConfig::default(),
    )
    .unwrap();
    keeper.init_genesis().unwrap();
    (keeper, BlockContext::new(1, genesis_time()))
}

pub fn create_game<S: KvStore>(
    keeper: &mut Keeper<S, MemoryBank, SimpleRules, RecordingLeaderboard>,
    ctx: &mut BlockContext,
    wager: u64,
    denom: &str,
) -> String {
    keeper
        .create_game(
            ctx,
            MsgCreateGame {
                creator: CAROL.to_string(),
                black: ALICE.to_string(),
                red: BOB.to_string(),
                wager,
                denom: denom.to_string(),
            },
        )
        .unwrap()
        .game_index
}

pub fn play(creator: &str, index: &str, from: (i32, i32), to: (i32, i32)) -> MsgPlayMove {
    MsgPlayMove {
        creator: creator.to_string(),
        game_index: index.to_string(),
        from_x: from.0,
        from_y: from.1,
        to_x: to.0,
        to_y: to.1,
    }
}

/// Black's opening step, legal on a fresh board
pub fn black_opening(index: &str) -> MsgPlayMove {
    play(ALICE, index, (1, 2), (2, 3))
}

/// Red's opening step, legal on a fresh board
pub fn red_opening(index: &str) -> MsgPlayMove {
    play(BOB, index, (0, 5), (1, 4))
}

/// Move the context to a new block `offset` after genesis
pub fn advance(ctx: &mut BlockContext, offset: Duration) {
    let height = ctx.height() + 1;
    ctx.advance(height, genesis_time() + offset);
}

/// One nanosecond past the default 24h turn of a game last touched at `touched`
pub fn just_expired(touched: Duration) -> Duration {
    touched + Duration::hours(24) + Duration::nanoseconds(1)
}
