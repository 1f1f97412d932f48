pub mod client;
pub mod compose;
pub mod detect;
pub mod espn;
pub mod normalize;
pub mod week;

use chrono::{DateTime, Utc};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Domain types, independent of the ESPN wire format
// ---------------------------------------------------------------------------

/// Last known odds text per game id. Entries are replaced, never removed.
pub type OddsSnapshot = HashMap<String, String>;

/// Ordered per-game score records for one polling cycle.
pub type ScoresSnapshot = Vec<ScoreLine>;

/// Game status as reported by `status.type.description`.
///
/// Only the three descriptions the dashboard reasons about get their own
/// variant; everything else ("Halftime", "End of Period", "Postponed", ...)
/// is kept verbatim in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum GameStatus {
    #[default]
    Scheduled,
    InProgress,
    Final,
    Other(String),
}

impl GameStatus {
    pub fn from_description(description: &str) -> Self {
        match description {
            "Scheduled" => GameStatus::Scheduled,
            "In Progress" => GameStatus::InProgress,
            "Final" => GameStatus::Final,
            other => GameStatus::Other(other.to_owned()),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            GameStatus::Scheduled => "Scheduled",
            GameStatus::InProgress => "In Progress",
            GameStatus::Final => "Final",
            GameStatus::Other(s) => s,
        }
    }

    /// Anything that is not exactly `Scheduled` or `Final` counts as live,
    /// unknown descriptions included.
    pub fn is_live(&self) -> bool {
        !matches!(self, GameStatus::Scheduled | GameStatus::Final)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamLine {
    pub id: String,
    pub name: String,
    /// `#RRGGBB`, when ESPN supplies a color.
    pub color: Option<String>,
    pub logo: Option<String>,
    pub record: String,
    pub score: String,
}

/// Display-ready projection of one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameView {
    pub game_id: String,
    pub home: TeamLine, // competitor 0
    pub away: TeamLine, // competitor 1
    pub status: GameStatus,
    pub quarter: Option<u8>,
    pub clock: Option<String>,
    pub possession: Option<String>,
    pub down_distance: String,
    pub start_time: Option<DateTime<Utc>>,
    pub location: String,
    pub network: String,
    pub odds: Option<String>,
}

impl GameView {
    /// Fold a live score record into this view. Identity fields (teams,
    /// logos, kickoff, odds) are left alone.
    pub fn apply_score(&mut self, line: &ScoreLine) {
        self.home.score = line.home_score.clone();
        self.away.score = line.away_score.clone();
        self.status = line.status.clone();
        self.quarter = line.quarter;
        self.clock = line.clock.clone();
        self.possession = line.possession.clone();
        self.down_distance = line.down_distance.clone();
    }

    pub fn has_possession(&self, team: &TeamLine) -> bool {
        self.possession.as_deref() == Some(team.name.as_str())
    }
}

/// Per-game record compared between polling cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreLine {
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: String,
    pub away_score: String,
    pub status: GameStatus,
    pub quarter: Option<u8>,
    pub clock: Option<String>,
    pub possession: Option<String>,
    pub down_distance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoringPlay {
    pub team: String,
    pub period: u8,
    pub clock: String,
    pub text: String,
    pub home_score: u16,
    pub away_score: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_known_descriptions_exactly() {
        assert_eq!(GameStatus::from_description("Scheduled"), GameStatus::Scheduled);
        assert_eq!(GameStatus::from_description("In Progress"), GameStatus::InProgress);
        assert_eq!(GameStatus::from_description("Final"), GameStatus::Final);
        assert_eq!(
            GameStatus::from_description("final"),
            GameStatus::Other("final".into())
        );
    }

    #[test]
    fn unknown_status_is_live_and_keeps_its_text() {
        let status = GameStatus::from_description("Postponed");
        assert!(status.is_live());
        assert_eq!(status.description(), "Postponed");
        assert!(!GameStatus::Final.is_live());
        assert!(!GameStatus::Scheduled.is_live());
    }

    #[test]
    fn apply_score_keeps_identity_fields() {
        let mut view = GameView {
            game_id: "1".into(),
            odds: Some("KC -3.5".into()),
            ..Default::default()
        };
        view.home.name = "Kansas City Chiefs".into();
        let line = ScoreLine {
            game_id: "1".into(),
            home_score: "14".into(),
            away_score: "7".into(),
            status: GameStatus::InProgress,
            quarter: Some(2),
            possession: Some("Kansas City Chiefs".into()),
            down_distance: "2nd & 5 at KC 40".into(),
            ..Default::default()
        };
        view.apply_score(&line);
        assert_eq!(view.home.score, "14");
        assert_eq!(view.odds.as_deref(), Some("KC -3.5"));
        assert!(view.has_possession(&view.home.clone()));
    }
}
