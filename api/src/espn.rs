/// Raw ESPN wire types, deserialized as-is from the site API responses.
/// These map to our clean domain types via the functions in normalize.rs.
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Season scoreboard  (site v2 API, `dates={season}`)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EventsResponse {
    pub leagues: Option<Vec<EspnLeague>>,
    pub events: Option<Vec<EspnEvent>>,
}

impl EventsResponse {
    /// Calendar periods of the first league; ESPN only returns one for a
    /// single-league scoreboard.
    pub fn calendar(&self) -> &[EspnCalendarPeriod] {
        self.leagues
            .as_deref()
            .and_then(|l| l.first())
            .and_then(|l| l.calendar.as_deref())
            .unwrap_or_default()
    }

    pub fn events(&self) -> &[EspnEvent] {
        self.events.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnLeague {
    pub id: Option<String>,
    pub name: Option<String>,
    pub calendar: Option<Vec<EspnCalendarPeriod>>,
}

/// "Preseason", "Regular Season", "Postseason", ...
#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnCalendarPeriod {
    pub label: Option<String>,
    /// Off-season periods carry no entries.
    pub entries: Option<Vec<EspnCalendarEntry>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnCalendarEntry {
    pub label: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

// ---------------------------------------------------------------------------
// Daily scoreboard  (site v2 API, `dates=YYYYMMDD`)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScoreboardResponse {
    pub events: Option<Vec<EspnEvent>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnEvent {
    pub id: Option<String>,
    pub name: Option<String>,
    pub date: Option<String>, // ISO 8601, often minute precision ("2024-09-06T00:20Z")
    pub status: Option<EspnStatus>,
    pub competitions: Option<Vec<EspnCompetition>>,
}

impl EspnEvent {
    pub fn competition(&self) -> Option<&EspnCompetition> {
        self.competitions.as_deref().and_then(|c| c.first())
    }

    /// Event-level status, falling back to the competition's.
    pub fn status(&self) -> Option<&EspnStatus> {
        self.status
            .as_ref()
            .or_else(|| self.competition().and_then(|c| c.status.as_ref()))
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnStatus {
    #[serde(rename = "type")]
    pub status_type: Option<EspnStatusType>,
    pub period: Option<u8>,
    #[serde(rename = "displayClock")]
    pub display_clock: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnStatusType {
    pub name: Option<String>,        // "STATUS_SCHEDULED", "STATUS_IN_PROGRESS", ...
    pub description: Option<String>, // "Scheduled", "In Progress", "Final", ...
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnCompetition {
    pub competitors: Option<Vec<EspnCompetitor>>,
    pub situation: Option<EspnSituation>,
    pub status: Option<EspnStatus>,
    pub venue: Option<EspnVenue>,
    pub broadcasts: Option<Vec<EspnBroadcast>>,
    pub odds: Option<Vec<EspnOdds>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EspnCompetitor {
    pub id: Option<String>,
    #[serde(rename = "homeAway")]
    pub home_away: Option<String>,
    pub team: Option<EspnTeam>,
    pub score: Option<String>, // ESPN sends scores as strings
    pub records: Option<Vec<EspnRecord>>,
}

impl EspnCompetitor {
    pub fn team_id(&self) -> Option<&str> {
        self.team.as_ref().and_then(|t| t.id.as_deref())
    }

    pub fn display_name(&self) -> &str {
        self.team
            .as_ref()
            .and_then(|t| t.display_name.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnTeam {
    pub id: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub abbreviation: Option<String>,
    pub color: Option<String>, // hex without '#'
    pub logo: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnRecord {
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnSituation {
    /// Team id of the side with the ball.
    pub possession: Option<String>,
    #[serde(rename = "downDistanceText")]
    pub down_distance_text: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnVenue {
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub address: Option<EspnAddress>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnAddress {
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnBroadcast {
    pub market: Option<String>,
    pub names: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnOdds {
    pub details: Option<String>, // "KC -3.5"
    #[serde(rename = "overUnder")]
    pub over_under: Option<f64>,
}

// ---------------------------------------------------------------------------
// Game summary  (site v2 API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SummaryResponse {
    #[serde(rename = "scoringPlays")]
    pub scoring_plays: Option<Vec<EspnScoringPlay>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnScoringPlay {
    pub text: Option<String>,
    pub team: Option<EspnTeam>,
    pub period: Option<EspnPeriod>,
    pub clock: Option<EspnClock>,
    #[serde(rename = "homeScore")]
    pub home_score: Option<u16>,
    #[serde(rename = "awayScore")]
    pub away_score: Option<u16>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnPeriod {
    pub number: Option<u8>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnClock {
    #[serde(rename = "displayValue")]
    pub display_value: Option<String>,
}
