use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, PlaysToggle};
use crate::state::odds_store::{OddsStore, merge_odds};
use chrono::{DateTime, Utc};
use log::{error, warn};
use nfl_api::compose::compose;
use nfl_api::detect::any_in_progress;
use nfl_api::espn::{EspnEvent, EventsResponse};
use nfl_api::normalize::{fresh_odds, normalize};
use nfl_api::week::games_in_week;
use nfl_api::{OddsSnapshot, ScoresSnapshot, ScoringPlay};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Games,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    /// Season events, kept so week changes can be re-filtered locally.
    events: Vec<EspnEvent>,
    odds_store: Box<dyn OddsStore>,
}

impl App {
    pub fn new(settings: AppSettings, odds_store: Box<dyn OddsStore>) -> Self {
        if let Some(level) = settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        let mut state = AppState::new();
        state.odds = odds_store.load().unwrap_or_else(|e| {
            error!("odds cache unreadable, starting empty: {e:#}");
            OddsSnapshot::new()
        });

        Self { settings, state, events: Vec::new(), odds_store }
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_season_loaded(&mut self, season: EventsResponse, now: DateTime<Utc>) {
        self.state.last_error = None;
        self.state.season_loaded = true;
        self.state.week.load(season.calendar(), now);

        let mut events = season.events.unwrap_or_default();
        if merge_odds(&mut self.state.odds, fresh_odds(&events)) {
            self.persist_odds();
        }
        // From here on the odds snapshot is the only source of lines; the
        // season copy goes stale once the odds poller runs.
        for competition in events.iter_mut().filter_map(|e| e.competitions.as_mut()).flatten() {
            competition.odds = None;
        }
        self.events = events;
        self.rebuild_week(true);
    }

    /// Fold a new live snapshot into the week view. Returns the ids of
    /// expanded games whose score moved, so their scoring plays can be
    /// reloaded.
    pub fn on_scores_updated(
        &mut self,
        snapshot: ScoresSnapshot,
        any_in_progress: bool,
    ) -> Vec<String> {
        let mut moved = Vec::new();
        for line in snapshot {
            if self.state.scores.get(&line.game_id) == Some(&line) {
                continue;
            }
            if self.state.scoring_plays.is_expanded(&line.game_id) {
                moved.push(line.game_id.clone());
            }
            self.state.scores.insert(line.game_id.clone(), line);
        }

        self.state.any_in_progress = any_in_progress;
        self.rebuild_week(false);
        moved
    }

    pub fn on_in_progress_changed(&mut self, any_in_progress: bool) {
        self.state.any_in_progress = any_in_progress;
    }

    pub fn on_odds_updated(&mut self, fresh: OddsSnapshot) {
        if merge_odds(&mut self.state.odds, fresh) {
            self.persist_odds();
            self.rebuild_week(false);
        }
    }

    pub fn on_scoring_plays_loaded(&mut self, game_id: String, plays: Vec<ScoringPlay>) {
        self.state.last_error = None;
        self.state.scoring_plays.store(game_id, plays);
    }

    /// The failure stays with that game's plays; the next expand retries.
    pub fn on_scoring_plays_failed(&mut self, game_id: String, message: String) {
        warn!("scoring plays for {game_id} unavailable: {message}");
        self.state.scoring_plays.fail(game_id, message);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    /// Re-derive the selected week's games from the season events, the last
    /// known odds and the latest live scores.
    fn rebuild_week(&mut self, reset_cursor: bool) {
        let Some(range) = self.state.week.current().cloned() else {
            self.state.games.reset(Vec::new());
            return;
        };

        let mut games: Vec<_> = games_in_week(&self.events, &range)
            .into_iter()
            .map(|event| normalize(event, &mut self.state.odds))
            .collect();

        for game in &mut games {
            if let Some(line) = self.state.scores.get(&game.game_id) {
                game.apply_score(line);
            }
        }

        let games = compose(games);
        if reset_cursor {
            self.state.games.reset(games);
        } else {
            self.state.games.replace(games);
        }
    }

    fn persist_odds(&self) {
        if let Err(e) = self.odds_store.save(&self.state.odds) {
            warn!("could not persist odds: {e:#}");
        }
    }

    /// Live games in the selected week, by the same rule the poller uses.
    pub fn week_in_progress(&self) -> bool {
        any_in_progress(self.state.games.games.iter().map(|g| &g.status))
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn next_week(&mut self) {
        if self.state.week.next() {
            self.rebuild_week(true);
        }
    }

    pub fn prev_week(&mut self) {
        if self.state.week.prev() {
            self.rebuild_week(true);
        }
    }

    pub fn game_down(&mut self) {
        self.state.games.move_down();
    }

    pub fn game_up(&mut self) {
        self.state.games.move_up();
    }

    /// Selection event on the highlighted game. Returns its id when the
    /// scoring plays still have to be fetched.
    pub fn toggle_scoring_plays(&mut self) -> Option<String> {
        let game_id = self.state.games.selected_game_id()?;
        match self.state.scoring_plays.toggle(&game_id) {
            PlaysToggle::Expanded { fetch: true } => Some(game_id),
            PlaysToggle::Expanded { fetch: false } | PlaysToggle::Collapsed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use nfl_api::espn::{
        EspnCalendarEntry, EspnCalendarPeriod, EspnCompetition, EspnCompetitor, EspnLeague,
        EspnOdds, EspnStatus, EspnStatusType, EspnTeam,
    };
    use nfl_api::{GameStatus, ScoreLine};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MemoryOddsStore {
        saved: Arc<Mutex<Vec<OddsSnapshot>>>,
        initial: OddsSnapshot,
    }

    impl OddsStore for MemoryOddsStore {
        fn load(&self) -> Result<OddsSnapshot> {
            Ok(self.initial.clone())
        }

        fn save(&self, odds: &OddsSnapshot) -> Result<()> {
            self.saved.lock().unwrap().push(odds.clone());
            Ok(())
        }
    }

    fn event(id: &str, date: &str, status: &str, odds: Option<&str>) -> EspnEvent {
        let competitor = |team_id: &str, name: &str| EspnCompetitor {
            team: Some(EspnTeam {
                id: Some(team_id.into()),
                display_name: Some(name.into()),
                ..Default::default()
            }),
            score: Some("0".into()),
            ..Default::default()
        };
        EspnEvent {
            id: Some(id.into()),
            date: Some(date.into()),
            status: Some(EspnStatus {
                status_type: Some(EspnStatusType {
                    description: Some(status.into()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            competitions: Some(vec![EspnCompetition {
                competitors: Some(vec![
                    competitor(&format!("{id}-h"), "Home"),
                    competitor(&format!("{id}-a"), "Away"),
                ]),
                odds: odds.map(|d| vec![EspnOdds { details: Some(d.into()), over_under: None }]),
                ..Default::default()
            }]),
            ..Default::default()
        }
    }

    fn season(events: Vec<EspnEvent>) -> EventsResponse {
        EventsResponse {
            leagues: Some(vec![EspnLeague {
                calendar: Some(vec![EspnCalendarPeriod {
                    label: Some("Regular Season".into()),
                    entries: Some(vec![
                        EspnCalendarEntry {
                            label: Some("Week 1".into()),
                            start_date: Some("2024-09-04T07:00Z".into()),
                            end_date: Some("2024-09-11T06:59Z".into()),
                        },
                        EspnCalendarEntry {
                            label: Some("Week 2".into()),
                            start_date: Some("2024-09-11T07:00Z".into()),
                            end_date: Some("2024-09-18T06:59Z".into()),
                        },
                    ]),
                }]),
                ..Default::default()
            }]),
            events: Some(events),
        }
    }

    fn app_with(store: MemoryOddsStore) -> App {
        App::new(AppSettings::default(), Box::new(store))
    }

    fn now() -> DateTime<Utc> {
        "2024-09-08T12:00:00Z".parse().unwrap()
    }

    fn ids(app: &App) -> Vec<&str> {
        app.state.games.games.iter().map(|g| g.game_id.as_str()).collect()
    }

    #[test]
    fn season_load_selects_current_week_and_sorts_games() {
        let mut app = app_with(MemoryOddsStore::default());
        app.on_season_loaded(
            season(vec![
                event("1", "2024-09-06T00:20Z", "Final", None),
                event("2", "2024-09-08T17:00Z", "In Progress", None),
                event("3", "2024-09-09T00:20Z", "Scheduled", None),
                event("4", "2024-09-15T17:00Z", "Scheduled", None),
            ]),
            now(),
        );
        assert_eq!(app.state.week.selection.selected, Some(0));
        assert_eq!(ids(&app), vec!["2", "3", "1"]);
        assert!(app.week_in_progress());

        app.next_week();
        assert_eq!(ids(&app), vec!["4"]);
        assert!(!app.week_in_progress());
    }

    #[test]
    fn cached_odds_fill_in_and_fresh_odds_are_persisted() {
        let store = MemoryOddsStore {
            initial: OddsSnapshot::from([("1".to_string(), "-3.5".to_string())]),
            ..Default::default()
        };
        let saved = store.saved.clone();
        let mut app = app_with(store);
        app.on_season_loaded(
            season(vec![
                event("1", "2024-09-06T00:20Z", "Scheduled", None),
                event("2", "2024-09-07T00:20Z", "Scheduled", Some("BUF -6")),
            ]),
            now(),
        );

        let odds: Vec<Option<&str>> = app
            .state
            .games
            .games
            .iter()
            .map(|g| g.odds.as_deref())
            .collect();
        assert_eq!(odds, vec![Some("-3.5"), Some("BUF -6")]);

        let saved = saved.lock().unwrap();
        let last = saved.last().expect("fresh odds should be persisted");
        assert_eq!(last.get("1").map(String::as_str), Some("-3.5"));
        assert_eq!(last.get("2").map(String::as_str), Some("BUF -6"));
    }

    #[test]
    fn odds_update_only_persists_on_change() {
        let store = MemoryOddsStore::default();
        let saved = store.saved.clone();
        let mut app = app_with(store);
        app.on_season_loaded(season(vec![event("1", "2024-09-06T00:20Z", "Scheduled", None)]), now());

        app.on_odds_updated(OddsSnapshot::from([("1".to_string(), "KC -2".to_string())]));
        app.on_odds_updated(OddsSnapshot::from([("1".to_string(), "KC -2".to_string())]));
        assert_eq!(saved.lock().unwrap().len(), 1);
        assert_eq!(app.state.games.games[0].odds.as_deref(), Some("KC -2"));
    }

    #[test]
    fn live_scores_reorder_week_and_report_expanded_games() {
        let mut app = app_with(MemoryOddsStore::default());
        app.on_season_loaded(
            season(vec![
                event("1", "2024-09-06T00:20Z", "Scheduled", None),
                event("2", "2024-09-08T17:00Z", "Scheduled", None),
            ]),
            now(),
        );
        app.game_down();
        assert_eq!(app.toggle_scoring_plays().as_deref(), Some("2"));

        let moved = app.on_scores_updated(
            vec![ScoreLine {
                game_id: "2".into(),
                home_score: "7".into(),
                away_score: "3".into(),
                status: GameStatus::InProgress,
                possession: Some("Home".into()),
                down_distance: "1st & 10 at HOME 25".into(),
                ..Default::default()
            }],
            true,
        );

        assert_eq!(moved, vec!["2".to_string()]);
        assert_eq!(ids(&app), vec!["2", "1"]);
        assert_eq!(app.state.games.selected_game_id().as_deref(), Some("2"));
        let live = &app.state.games.games[0];
        assert_eq!(live.home.score, "7");
        assert_eq!(live.possession.as_deref(), Some("Home"));
        assert!(app.state.any_in_progress);
    }

    #[test]
    fn scoring_plays_fetch_only_on_first_expand() {
        let mut app = app_with(MemoryOddsStore::default());
        app.on_season_loaded(season(vec![event("1", "2024-09-06T00:20Z", "Final", None)]), now());

        assert_eq!(app.toggle_scoring_plays().as_deref(), Some("1"));
        app.on_scoring_plays_loaded("1".into(), vec![ScoringPlay::default()]);
        assert_eq!(app.toggle_scoring_plays(), None);
        assert!(!app.state.scoring_plays.is_expanded("1"));
        assert_eq!(app.toggle_scoring_plays(), None);
        assert!(app.state.scoring_plays.is_expanded("1"));
    }

    #[test]
    fn odds_refresh_replaces_lines_from_season_load() {
        let store = MemoryOddsStore::default();
        let saved = store.saved.clone();
        let mut app = app_with(store);
        app.on_season_loaded(
            season(vec![event("1", "2024-09-06T00:20Z", "Scheduled", Some("KC -3"))]),
            now(),
        );
        assert_eq!(app.state.games.games[0].odds.as_deref(), Some("KC -3"));

        app.on_odds_updated(OddsSnapshot::from([("1".to_string(), "KC -4.5".to_string())]));
        assert_eq!(app.state.games.games[0].odds.as_deref(), Some("KC -4.5"));
        assert_eq!(app.state.odds.get("1").map(String::as_str), Some("KC -4.5"));

        // Week changes and score polls rebuild the view from the same events.
        app.next_week();
        app.prev_week();
        app.on_scores_updated(vec![ScoreLine { game_id: "1".into(), ..Default::default() }], false);
        assert_eq!(app.state.games.games[0].odds.as_deref(), Some("KC -4.5"));
        assert_eq!(app.state.odds.get("1").map(String::as_str), Some("KC -4.5"));

        let saved = saved.lock().unwrap();
        let last = saved.last().expect("odds should be persisted");
        assert_eq!(last.get("1").map(String::as_str), Some("KC -4.5"));
    }

    #[test]
    fn finished_game_keeps_final_line_after_leaving_scoreboard() {
        let mut app = app_with(MemoryOddsStore::default());
        app.on_season_loaded(
            season(vec![
                event("1", "2024-09-06T00:20Z", "Scheduled", None),
                event("2", "2024-09-08T17:00Z", "Scheduled", None),
            ]),
            now(),
        );
        let final_line = ScoreLine {
            game_id: "1".into(),
            home_score: "27".into(),
            away_score: "20".into(),
            status: GameStatus::Final,
            ..Default::default()
        };
        app.on_scores_updated(vec![final_line], false);

        // Next local day: only game 2 is on today's scoreboard.
        let live = ScoreLine {
            game_id: "2".into(),
            home_score: "3".into(),
            status: GameStatus::InProgress,
            ..Default::default()
        };
        app.on_scores_updated(vec![live], true);

        let game1 = app.state.games.games.iter().find(|g| g.game_id == "1").unwrap();
        assert_eq!(game1.status, GameStatus::Final);
        assert_eq!(game1.home.score, "27");
        assert_eq!(game1.away.score, "20");
        assert_eq!(ids(&app), vec!["2", "1"]);
    }

    #[test]
    fn scoring_plays_failure_stays_with_its_game() {
        let mut app = app_with(MemoryOddsStore::default());
        app.on_season_loaded(season(vec![event("1", "2024-09-06T00:20Z", "Final", None)]), now());

        app.on_error("season reload failed".into());
        assert_eq!(app.toggle_scoring_plays().as_deref(), Some("1"));
        app.on_scoring_plays_failed("1".into(), "HTTP 503".into());
        assert_eq!(app.state.scoring_plays.failure("1"), Some("HTTP 503"));
        assert_eq!(app.state.last_error.as_deref(), Some("season reload failed"));

        // Collapse and expand again retries, and success clears both errors.
        assert_eq!(app.toggle_scoring_plays(), None);
        assert_eq!(app.toggle_scoring_plays().as_deref(), Some("1"));
        app.on_scoring_plays_loaded("1".into(), vec![ScoringPlay::default()]);
        assert_eq!(app.state.scoring_plays.failure("1"), None);
        assert!(app.state.last_error.is_none());
    }

    #[test]
    fn malformed_calendar_shows_no_weeks() {
        let mut broken = season(vec![event("1", "2024-09-06T00:20Z", "Final", None)]);
        if let Some(entry) = broken
            .leagues
            .as_mut()
            .and_then(|l| l.first_mut())
            .and_then(|l| l.calendar.as_mut())
            .and_then(|c| c.first_mut())
            .and_then(|p| p.entries.as_mut())
            .and_then(|e| e.get_mut(1))
        {
            entry.start_date = Some("week two".into());
        }

        let mut app = app_with(MemoryOddsStore::default());
        app.on_season_loaded(broken, now());
        assert!(app.state.week.error.is_some());
        assert!(app.state.games.games.is_empty());
    }
}
