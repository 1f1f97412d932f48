use crate::ScoringPlay;
use crate::espn::{EspnEvent, EventsResponse, ScoreboardResponse, SummaryResponse};
use crate::normalize::scoring_plays;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use log::debug;
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const ESPN_NFL_SITE_V2: &str =
    "https://site.api.espn.com/apis/site/v2/sports/football/nfl";

/// NFL feed client backed by ESPN's public endpoints.
#[derive(Debug, Clone)]
pub struct NflApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for NflApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("gridtui/0.1 (terminal scoreboard)")
                .build()
                .unwrap_or_default(),
            base_url: ESPN_NFL_SITE_V2.to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Status(StatusCode, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Status(status, url) => write!(f, "API error for {url}: HTTP {status}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl NflApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at another host serving the same paths.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            ..Self::default()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Season calendar plus every event of the season containing `now`.
    pub async fn fetch_season(&self, now: DateTime<Utc>) -> ApiResult<EventsResponse> {
        let season = season_year(now);
        let url = format!("{}/scoreboard?limit=1000&dates={season}", self.base_url);
        let raw: EventsResponse = self.get(&url).await?;
        if raw.leagues.as_deref().is_none_or(|l| l.is_empty()) {
            return Err(ApiError::NotFound(format!("no league data for season {season}")));
        }
        Ok(raw)
    }

    /// Events scheduled on `day`, with live scores and situation.
    pub async fn fetch_scoreboard(&self, day: NaiveDate) -> ApiResult<Vec<EspnEvent>> {
        let url = format!("{}/scoreboard?dates={}", self.base_url, day.format("%Y%m%d"));
        let raw: ScoreboardResponse = self.get(&url).await?;
        Ok(raw.events.unwrap_or_default())
    }

    /// Ordered scoring plays for one game.
    pub async fn fetch_scoring_plays(&self, game_id: &str) -> ApiResult<Vec<ScoringPlay>> {
        let url = format!("{}/summary?event={game_id}", self.base_url);
        let raw: SummaryResponse = self.get(&url).await?;
        Ok(scoring_plays(raw))
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status, url.to_owned()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))
    }
}

/// The NFL season is named for the year it kicks off; January and February
/// games (playoffs, Super Bowl) belong to the previous year's season.
pub fn season_year(now: DateTime<Utc>) -> i32 {
    if now.month() <= 2 { now.year() - 1 } else { now.year() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn season_year_uses_current_year_from_march() {
        let dt = Utc.with_ymd_and_hms(2026, 9, 10, 12, 0, 0).unwrap();
        assert_eq!(season_year(dt), 2026);
        let march = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(season_year(march), 2026);
    }

    #[test]
    fn season_year_rolls_back_for_playoffs() {
        let jan = Utc.with_ymd_and_hms(2027, 1, 12, 0, 0, 0).unwrap();
        let feb = Utc.with_ymd_and_hms(2027, 2, 28, 23, 59, 59).unwrap();
        assert_eq!(season_year(jan), 2026);
        assert_eq!(season_year(feb), 2026);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = NflApi::with_base_url("http://127.0.0.1:1234/");
        assert_eq!(api.base_url(), "http://127.0.0.1:1234");
    }

    #[test]
    fn status_error_mentions_url_and_code() {
        let err = ApiError::Status(StatusCode::SERVICE_UNAVAILABLE, "http://x/scoreboard".into());
        let msg = err.to_string();
        assert!(msg.contains("503"), "got: {msg}");
        assert!(msg.contains("http://x/scoreboard"), "got: {msg}");
    }
}
