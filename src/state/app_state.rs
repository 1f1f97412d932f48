use crate::app::MenuItem;
use chrono::{DateTime, Utc};
use log::error;
use nfl_api::espn::EspnCalendarPeriod;
use nfl_api::week::{Calendar, WeekRange, WeekSelection, resolve};
use nfl_api::{GameView, OddsSnapshot, ScoreLine, ScoringPlay};
use std::collections::{HashMap, HashSet};

// ---------------------------------------------------------------------------
// Week selector state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct WeekState {
    pub calendar: Calendar,
    pub selection: WeekSelection,
    /// Set when the calendar could not be built; the UI shows no weeks.
    pub error: Option<String>,
}

impl WeekState {
    pub fn load(&mut self, periods: &[EspnCalendarPeriod], now: DateTime<Utc>) {
        match Calendar::from_periods(periods) {
            Ok(calendar) => {
                self.selection = resolve(&calendar, now);
                self.calendar = calendar;
                self.error = None;
            }
            Err(e) => {
                error!("calendar rejected: {e}");
                self.calendar = Calendar::default();
                self.selection = WeekSelection::default();
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn current(&self) -> Option<&WeekRange> {
        self.calendar.get(self.selection.selected?)
    }

    pub fn current_label(&self) -> Option<&str> {
        let index = self.selection.selected?;
        self.selection
            .options
            .get(index)
            .map(|o| o.label.as_str())
    }

    /// Returns true when the selection moved.
    pub fn next(&mut self) -> bool {
        match self.selection.selected {
            Some(i) if i + 1 < self.selection.options.len() => {
                self.selection.selected = Some(i + 1);
                true
            }
            _ => false,
        }
    }

    pub fn prev(&mut self) -> bool {
        match self.selection.selected {
            Some(i) if i > 0 => {
                self.selection.selected = Some(i - 1);
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Game list state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct GameListState {
    /// Composed (display-ordered) games of the selected week.
    pub games: Vec<GameView>,
    pub selected: usize,
}

impl GameListState {
    pub fn selected_game(&self) -> Option<&GameView> {
        self.games.get(self.selected)
    }

    pub fn selected_game_id(&self) -> Option<String> {
        self.selected_game().map(|g| g.game_id.clone())
    }

    /// Replace the list, keeping the cursor on the same game when it is
    /// still present.
    pub fn replace(&mut self, games: Vec<GameView>) {
        let keep = self.selected_game_id();
        self.games = games;
        self.selected = keep
            .and_then(|id| self.games.iter().position(|g| g.game_id == id))
            .unwrap_or(0);
    }

    pub fn reset(&mut self, games: Vec<GameView>) {
        self.games = games;
        self.selected = 0;
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.games.len() {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Scoring plays (expand/collapse per game)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaysToggle {
    /// Now visible; `fetch` is set when nothing is cached yet.
    Expanded { fetch: bool },
    Collapsed,
}

#[derive(Debug, Default)]
pub struct ScoringPlaysState {
    expanded: HashSet<String>,
    plays: HashMap<String, Vec<ScoringPlay>>,
    failed: HashMap<String, String>,
}

impl ScoringPlaysState {
    pub fn toggle(&mut self, game_id: &str) -> PlaysToggle {
        if self.expanded.remove(game_id) {
            return PlaysToggle::Collapsed;
        }
        self.expanded.insert(game_id.to_owned());
        let fetch = !self.plays.contains_key(game_id);
        if fetch {
            self.failed.remove(game_id);
        }
        PlaysToggle::Expanded { fetch }
    }

    pub fn is_expanded(&self, game_id: &str) -> bool {
        self.expanded.contains(game_id)
    }

    pub fn plays(&self, game_id: &str) -> Option<&[ScoringPlay]> {
        self.plays.get(game_id).map(Vec::as_slice)
    }

    pub fn store(&mut self, game_id: String, plays: Vec<ScoringPlay>) {
        self.failed.remove(&game_id);
        self.plays.insert(game_id, plays);
    }

    /// Plays already cached stay visible; only the error is recorded.
    pub fn fail(&mut self, game_id: String, message: String) {
        self.failed.insert(game_id, message);
    }

    pub fn failure(&self, game_id: &str) -> Option<&str> {
        self.failed.get(game_id).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub season_loaded: bool,
    pub week: WeekState,
    pub games: GameListState,
    pub scoring_plays: ScoringPlaysState,
    /// Last live line seen per game. Lines are replaced, never dropped, so a
    /// game that leaves today's scoreboard keeps its final state.
    pub scores: HashMap<String, ScoreLine>,
    pub any_in_progress: bool,
    pub odds: OddsSnapshot,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
