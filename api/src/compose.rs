//! Display ordering for a week of games.

use crate::{GameStatus, GameView};

/// Live (and unrecognized) games first, then scheduled, then final.
/// Stable: feed order is kept inside each bucket.
pub fn compose(mut games: Vec<GameView>) -> Vec<GameView> {
    games.sort_by_key(|g| display_rank(&g.status));
    games
}

fn display_rank(status: &GameStatus) -> u8 {
    match status {
        GameStatus::Final => 2,
        GameStatus::Scheduled => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: &str, status: GameStatus) -> GameView {
        GameView { game_id: id.into(), status, ..Default::default() }
    }

    fn ids(games: &[GameView]) -> Vec<&str> {
        games.iter().map(|g| g.game_id.as_str()).collect()
    }

    #[test]
    fn live_then_scheduled_then_final() {
        let games = vec![
            game("a", GameStatus::Final),
            game("b", GameStatus::InProgress),
            game("c", GameStatus::Scheduled),
            game("d", GameStatus::InProgress),
        ];
        assert_eq!(ids(&compose(games)), vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn unknown_status_sorts_with_live_games() {
        let games = vec![
            game("a", GameStatus::Scheduled),
            game("b", GameStatus::from_description("Halftime")),
            game("c", GameStatus::Final),
            game("d", GameStatus::Scheduled),
        ];
        assert_eq!(ids(&compose(games)), vec!["b", "a", "d", "c"]);
    }

    #[test]
    fn empty_week_composes_to_empty() {
        assert!(compose(Vec::new()).is_empty());
    }
}
