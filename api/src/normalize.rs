//! Mapping: ESPN wire types → clean domain types.
//!
//! Competitor 0 is always treated as home and competitor 1 as away. That is
//! the order ESPN lists them in; the `homeAway` flag is not consulted.

use crate::espn::{EspnCompetition, EspnCompetitor, EspnEvent, EspnScoringPlay, SummaryResponse};
use crate::week::parse_instant;
use crate::{GameStatus, GameView, OddsSnapshot, ScoreLine, ScoringPlay, TeamLine};

/// Project one event into a display record.
///
/// Fresh odds on the event replace `odds[game_id]`; without them the last
/// known value is used.
pub fn normalize(event: &EspnEvent, odds: &mut OddsSnapshot) -> GameView {
    let game_id = event.id.clone().unwrap_or_default();
    let competition = event.competition();
    let (home, away) = competitors(competition);
    let (possession, down_distance) = possession(competition);

    let status = status(event);
    let quarter = event.status().and_then(|s| s.period);
    let clock = event.status().and_then(|s| s.display_clock.clone());

    let line = match fresh_odds_for(competition) {
        Some(fresh) => {
            odds.insert(game_id.clone(), fresh.clone());
            Some(fresh)
        }
        None => odds.get(&game_id).cloned(),
    };

    GameView {
        home: team_line(home),
        away: team_line(away),
        status,
        quarter,
        clock,
        possession,
        down_distance,
        start_time: event.date.as_deref().and_then(parse_instant),
        location: competition.map(location).unwrap_or_default(),
        network: competition.map(network).unwrap_or_default(),
        odds: line,
        game_id,
    }
}

/// The per-game record the scores poller compares between cycles.
pub fn score_line(event: &EspnEvent) -> ScoreLine {
    let competition = event.competition();
    let (home, away) = competitors(competition);
    let (possession, down_distance) = possession(competition);

    ScoreLine {
        game_id: event.id.clone().unwrap_or_default(),
        home_team: home.map(|c| c.display_name().to_owned()).unwrap_or_default(),
        away_team: away.map(|c| c.display_name().to_owned()).unwrap_or_default(),
        home_score: home.and_then(|c| c.score.clone()).unwrap_or_default(),
        away_score: away.and_then(|c| c.score.clone()).unwrap_or_default(),
        status: status(event),
        quarter: event.status().and_then(|s| s.period),
        clock: event.status().and_then(|s| s.display_clock.clone()),
        possession,
        down_distance,
    }
}

/// Odds carried by a feed, keyed by game id. Events without odds are skipped.
pub fn fresh_odds<'a>(events: impl IntoIterator<Item = &'a EspnEvent>) -> OddsSnapshot {
    events
        .into_iter()
        .filter_map(|e| Some((e.id.clone()?, fresh_odds_for(e.competition())?)))
        .collect()
}

pub fn scoring_plays(raw: SummaryResponse) -> Vec<ScoringPlay> {
    raw.scoring_plays
        .unwrap_or_default()
        .into_iter()
        .map(map_scoring_play)
        .collect()
}

fn map_scoring_play(p: EspnScoringPlay) -> ScoringPlay {
    ScoringPlay {
        team: p
            .team
            .and_then(|t| t.display_name.or(t.abbreviation))
            .unwrap_or_default(),
        period: p.period.and_then(|x| x.number).unwrap_or_default(),
        clock: p.clock.and_then(|c| c.display_value).unwrap_or_default(),
        text: p.text.unwrap_or_default(),
        home_score: p.home_score.unwrap_or_default(),
        away_score: p.away_score.unwrap_or_default(),
    }
}

fn competitors(
    competition: Option<&EspnCompetition>,
) -> (Option<&EspnCompetitor>, Option<&EspnCompetitor>) {
    let list = competition
        .and_then(|c| c.competitors.as_deref())
        .unwrap_or_default();
    (list.first(), list.get(1))
}

fn status(event: &EspnEvent) -> GameStatus {
    event
        .status()
        .and_then(|s| s.status_type.as_ref())
        .and_then(|t| t.description.as_deref())
        .map(GameStatus::from_description)
        .unwrap_or_else(|| GameStatus::Other(String::new()))
}

/// Possession by team-id match against the two competitors. The
/// down-and-distance text only means something when someone has the ball.
fn possession(competition: Option<&EspnCompetition>) -> (Option<String>, String) {
    let Some(situation) = competition.and_then(|c| c.situation.as_ref()) else {
        return (None, String::new());
    };
    let Some(holder) = situation.possession.as_deref() else {
        return (None, String::new());
    };

    let (home, away) = competitors(competition);
    let team = [home, away]
        .into_iter()
        .flatten()
        .find(|c| c.team_id() == Some(holder))
        .map(|c| c.display_name().to_owned());

    match team {
        Some(name) => (
            Some(name),
            situation.down_distance_text.clone().unwrap_or_default(),
        ),
        None => (None, String::new()),
    }
}

fn fresh_odds_for(competition: Option<&EspnCompetition>) -> Option<String> {
    competition?
        .odds
        .as_deref()?
        .first()?
        .details
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_owned)
}

fn team_line(c: Option<&EspnCompetitor>) -> TeamLine {
    let Some(c) = c else {
        return TeamLine::default();
    };
    let team = c.team.as_ref();
    TeamLine {
        id: c.team_id().unwrap_or_default().to_owned(),
        name: c.display_name().to_owned(),
        color: team
            .and_then(|t| t.color.as_deref())
            .filter(|hex| hex.len() == 6)
            .map(|hex| format!("#{hex}")),
        logo: team.and_then(|t| t.logo.clone()),
        record: c
            .records
            .as_deref()
            .and_then(|r| r.first())
            .and_then(|r| r.summary.clone())
            .unwrap_or_default(),
        score: c.score.clone().unwrap_or_default(),
    }
}

fn location(c: &EspnCompetition) -> String {
    let Some(venue) = c.venue.as_ref() else {
        return String::new();
    };
    let address = venue.address.as_ref();
    match (
        venue.full_name.as_deref(),
        address.and_then(|a| a.city.as_deref()),
        address.and_then(|a| a.state.as_deref()),
    ) {
        (Some(name), Some(city), Some(state)) => format!("{name}, {city}, {state}"),
        (Some(name), Some(city), None) => format!("{name}, {city}"),
        (Some(name), _, _) => name.to_owned(),
        (None, Some(city), Some(state)) => format!("{city}, {state}"),
        _ => String::new(),
    }
}

fn network(c: &EspnCompetition) -> String {
    c.broadcasts
        .iter()
        .flatten()
        .flat_map(|b| b.names.iter().flatten())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("/")
}
