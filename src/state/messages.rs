use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use nfl_api::espn::EventsResponse;
use nfl_api::{OddsSnapshot, ScoresSnapshot, ScoringPlay};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadSeason,
    LoadScoringPlays { game_id: String },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    /// Calendar and events; fetched once per session.
    SeasonLoaded { season: EventsResponse },
    /// Whole replacement snapshot; only sent when it differs from the last one.
    ScoresUpdated { snapshot: ScoresSnapshot, any_in_progress: bool },
    InProgressChanged { any_in_progress: bool },
    OddsUpdated { odds: OddsSnapshot },
    ScoringPlaysLoaded { game_id: String, plays: Vec<ScoringPlay> },
    ScoringPlaysFailed { game_id: String, message: String },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
