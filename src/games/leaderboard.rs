/// Receives game outcomes per player. Implementations must not fail: by the
/// time an outcome is reported the settlement has already been paid.
pub trait LeaderboardKeeper {
    fn add_won_game(&mut self, player: &str);

    fn add_lost_game(&mut self, player: &str);

    fn add_forfeited_game(&mut self, player: &str);
}
