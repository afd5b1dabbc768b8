//! In-memory collaborators for exercising the keeper without a host ledger.
//!
//! `SimpleRules` only knows diagonal steps and single jumps; it exists so that
//! settlement can be driven with realistic boards, not to referee real games.

use crate::games::{
    escrow::{BankError, BankKeeper},
    leaderboard::LeaderboardKeeper,
    rules::{RulesEngine, RulesError},
    types::{Coin, Player, Pos},
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankTransfer {
    ToModule { account: String, coin: Coin },
    FromModule { account: String, coin: Coin },
}

/// Bank with per-account balances and a single module pool
#[derive(Debug, Clone, Default)]
pub struct MemoryBank {
    balances: BTreeMap<(String, String), u64>,
    module: BTreeMap<String, u64>,
    transfers: Vec<BankTransfer>,
}

impl MemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&mut self, account: &str, amount: u64, denom: &str) {
        *self
            .balances
            .entry((account.to_string(), denom.to_string()))
            .or_default() += amount;
    }

    pub fn balance(&self, account: &str, denom: &str) -> u64 {
        self.balances
            .get(&(account.to_string(), denom.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn module_balance(&self, denom: &str) -> u64 {
        self.module.get(denom).copied().unwrap_or(0)
    }

    /// Every successful transfer, oldest first
    pub fn transfers(&self) -> &[BankTransfer] {
        &self.transfers
    }
}

impl BankKeeper for MemoryBank {
    fn send_coins_from_account_to_module(
        &mut self,
        account: &str,
        coin: &Coin,
    ) -> Result<(), BankError> {
        if account.is_empty() {
            return Err(BankError::InvalidAddress(account.to_string()));
        }
        let available = self.balance(account, &coin.denom);
        if available < coin.amount {
            return Err(BankError::InsufficientFunds {
                account: account.to_string(),
                available,
                needed: coin.amount,
            });
        }

        self.balances
            .insert((account.to_string(), coin.denom.clone()), available - coin.amount);
        *self.module.entry(coin.denom.clone()).or_default() += coin.amount;
        self.transfers.push(BankTransfer::ToModule {
            account: account.to_string(),
            coin: coin.clone(),
        });
        Ok(())
    }

    fn send_coins_from_module_to_account(
        &mut self,
        account: &str,
        coin: &Coin,
    ) -> Result<(), BankError> {
        if account.is_empty() {
            return Err(BankError::InvalidAddress(account.to_string()));
        }
        let pool = self.module_balance(&coin.denom);
        if pool < coin.amount {
            return Err(BankError::ModuleUnderfunded(coin.to_string()));
        }

        self.module.insert(coin.denom.clone(), pool - coin.amount);
        self.mint(account, coin.amount, &coin.denom);
        self.transfers.push(BankTransfer::FromModule {
            account: account.to_string(),
            coin: coin.clone(),
        });
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Won,
    Lost,
    Forfeited,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub player: String,
    pub outcome: GameOutcome,
}

/// Keeps every reported outcome in arrival order
#[derive(Debug, Clone, Default)]
pub struct RecordingLeaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl RecordingLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    fn push(&mut self, player: &str, outcome: GameOutcome) {
        self.entries.push(LeaderboardEntry {
            player: player.to_string(),
            outcome,
        });
    }
}

impl LeaderboardKeeper for RecordingLeaderboard {
    fn add_won_game(&mut self, player: &str) {
        self.push(player, GameOutcome::Won);
    }

    fn add_lost_game(&mut self, player: &str) {
        self.push(player, GameOutcome::Lost);
    }

    fn add_forfeited_game(&mut self, player: &str) {
        self.push(player, GameOutcome::Forfeited);
    }
}

const BOARD_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleBoard {
    /// Indexed `[y][x]`
    cells: [[Option<Player>; BOARD_SIZE]; BOARD_SIZE],
    turn: Player,
}

impl SimpleBoard {
    fn at(&self, pos: Pos) -> Option<Option<Player>> {
        if !(0..BOARD_SIZE as i32).contains(&pos.x) || !(0..BOARD_SIZE as i32).contains(&pos.y) {
            return None;
        }
        Some(self.cells[pos.y as usize][pos.x as usize])
    }

    fn put(&mut self, pos: Pos, piece: Option<Player>) {
        self.cells[pos.y as usize][pos.x as usize] = piece;
    }

    fn count(&self, player: Player) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell == Some(player))
            .count()
    }
}

/// Black starts on rows 0-2 and moves towards higher rows; red the opposite
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleRules;

impl SimpleRules {
    fn forward(player: Player) -> i32 {
        match player {
            Player::Black => 1,
            _ => -1,
        }
    }
}

impl RulesEngine for SimpleRules {
    type Board = SimpleBoard;

    fn new_board(&self) -> SimpleBoard {
        let mut cells = [[None; BOARD_SIZE]; BOARD_SIZE];
        for (y, row) in cells.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                if (x + y) % 2 == 1 {
                    *cell = match y {
                        0..=2 => Some(Player::Black),
                        5..=7 => Some(Player::Red),
                        _ => None,
                    };
                }
            }
        }
        SimpleBoard {
            cells,
            turn: Player::Black,
        }
    }

    fn serialize(&self, board: &SimpleBoard) -> String {
        board
            .cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map_or("*", |p| p.tag()))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("|")
    }

    fn deserialize(&self, board: &str, turn: Player) -> Result<SimpleBoard, RulesError> {
        if turn == Player::NoPlayer {
            return Err(RulesError::InvalidBoard("no player to move".to_string()));
        }
        let rows: Vec<&str> = board.split('|').collect();
        if rows.len() != BOARD_SIZE {
            return Err(RulesError::InvalidBoard(format!("{} rows", rows.len())));
        }

        let mut cells = [[None; BOARD_SIZE]; BOARD_SIZE];
        for (y, row) in rows.iter().enumerate() {
            if row.len() != BOARD_SIZE {
                return Err(RulesError::InvalidBoard(format!(
                    "row {} has {} squares",
                    y,
                    row.len()
                )));
            }
            for (x, square) in row.chars().enumerate() {
                cells[y][x] = match square {
                    'b' => Some(Player::Black),
                    'r' => Some(Player::Red),
                    '*' => None,
                    other => {
                        return Err(RulesError::InvalidBoard(format!("unknown piece {}", other)))
                    }
                };
            }
        }
        Ok(SimpleBoard { cells, turn })
    }

    fn turn_of(&self, board: &SimpleBoard) -> Player {
        board.turn
    }

    fn apply_move(
        &self,
        board: &mut SimpleBoard,
        from: Pos,
        to: Pos,
    ) -> Result<Option<Pos>, RulesError> {
        let player = board.turn;
        match board.at(from) {
            None => return Err(RulesError::IllegalMove("move from outside the board".to_string())),
            Some(piece) if piece != Some(player) => {
                return Err(RulesError::IllegalMove(format!(
                    "no {} piece at {},{}",
                    player.color(),
                    from.x,
                    from.y
                )))
            }
            Some(_) => {}
        }
        match board.at(to) {
            None => return Err(RulesError::IllegalMove("move to outside the board".to_string())),
            Some(Some(_)) => {
                return Err(RulesError::IllegalMove(format!("{},{} is occupied", to.x, to.y)))
            }
            Some(None) => {}
        }

        let forward = Self::forward(player);
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let captured = if dx.abs() == 1 && dy == forward {
            None
        } else if dx.abs() == 2 && dy == 2 * forward {
            let middle = Pos::new(from.x + dx / 2, from.y + dy / 2);
            if board.at(middle).flatten() != player.opponent() {
                return Err(RulesError::IllegalMove("nothing to capture".to_string()));
            }
            board.put(middle, None);
            Some(middle)
        } else {
            return Err(RulesError::IllegalMove(format!(
                "{},{} to {},{} is not a diagonal step or jump",
                from.x, from.y, to.x, to.y
            )));
        };

        board.put(from, None);
        board.put(to, Some(player));
        board.turn = player.opponent().unwrap_or(Player::NoPlayer);
        Ok(captured)
    }

    fn winner(&self, board: &SimpleBoard) -> Player {
        if board.count(Player::Red) == 0 {
            Player::Black
        } else if board.count(Player::Black) == 0 {
            Player::Red
        } else {
            Player::NoPlayer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INITIAL: &str =
        "*b*b*b*b|b*b*b*b*|*b*b*b*b|********|********|r*r*r*r*|*r*r*r*r|r*r*r*r*";

    #[test]
    fn test_new_board_layout() {
        let rules = SimpleRules;
        let board = rules.new_board();
        assert_eq!(rules.serialize(&board), INITIAL);
        assert_eq!(rules.turn_of(&board), Player::Black);
        assert_eq!(rules.winner(&board), Player::NoPlayer);
    }

    #[test]
    fn test_opening_moves() {
        let rules = SimpleRules;
        let mut board = rules.new_board();

        assert_eq!(rules.apply_move(&mut board, Pos::new(1, 2), Pos::new(2, 3)), Ok(None));
        assert_eq!(rules.apply_move(&mut board, Pos::new(0, 5), Pos::new(1, 4)), Ok(None));
        assert_eq!(
            rules.serialize(&board),
            "*b*b*b*b|b*b*b*b*|***b*b*b|**b*****|*r******|**r*r*r*|*r*r*r*r|r*r*r*r*"
        );
        assert_eq!(rules.turn_of(&board), Player::Black);
    }

    #[test]
    fn test_jump_captures() {
        let rules = SimpleRules;
        let mut board = rules
            .deserialize(
                "********|********|********|**b*****|***r****|********|********|********",
                Player::Black,
            )
            .unwrap();

        let captured = rules.apply_move(&mut board, Pos::new(2, 3), Pos::new(4, 5)).unwrap();
        assert_eq!(captured, Some(Pos::new(3, 4)));
        assert_eq!(rules.winner(&board), Player::Black);
    }

    #[test]
    fn test_illegal_moves() {
        let rules = SimpleRules;
        let mut board = rules.new_board();

        assert!(rules.apply_move(&mut board, Pos::new(0, 5), Pos::new(1, 4)).is_err());
        assert!(rules.apply_move(&mut board, Pos::new(1, 2), Pos::new(1, 3)).is_err());
        assert!(rules.apply_move(&mut board, Pos::new(0, 1), Pos::new(1, 2)).is_err());
        assert!(rules.apply_move(&mut board, Pos::new(7, 2), Pos::new(8, 3)).is_err());
        assert_eq!(rules.serialize(&board), INITIAL);
    }

    #[test]
    fn test_deserialize_roundtrip() {
        let rules = SimpleRules;
        let board = rules.deserialize(INITIAL, Player::Red).unwrap();
        assert_eq!(rules.serialize(&board), INITIAL);
        assert_eq!(rules.turn_of(&board), Player::Red);
        assert!(rules.deserialize("bad", Player::Red).is_err());
    }
}
