use crate::state::messages::NetworkResponse;
use chrono::{Local, Utc};
use log::{debug, warn};
use nfl_api::ScoresSnapshot;
use nfl_api::client::NflApi;
use nfl_api::detect::{Change, Detection, detect};
use nfl_api::normalize::{fresh_odds, score_line};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};

/// Timer-driven polling of today's scores and, far less often, odds.
///
/// Both polls run inside this one task, so a cycle always finishes its fetch
/// and comparison before the next one starts.
pub struct PeriodicRefresher {
    client: NflApi,
    responses: mpsc::Sender<NetworkResponse>,
    scores_every: Duration,
    odds_every: Duration,
    tracker: ScoresTracker,
}

impl PeriodicRefresher {
    pub fn new(
        client: NflApi,
        responses: mpsc::Sender<NetworkResponse>,
        scores_every: Duration,
        odds_every: Duration,
    ) -> Self {
        Self {
            client,
            responses,
            scores_every,
            odds_every,
            tracker: ScoresTracker::default(),
        }
    }

    pub async fn run(mut self) {
        let mut scores_interval = interval(self.scores_every);
        scores_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut odds_interval = interval(self.odds_every);
        odds_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The startup season load already carries odds.
        odds_interval.tick().await;

        loop {
            let response = tokio::select! {
                _ = scores_interval.tick() => self.poll_scores().await,
                _ = odds_interval.tick() => self.poll_odds().await,
            };

            if let Some(response) = response
                && self.responses.send(response).await.is_err()
            {
                break;
            }
        }
    }

    async fn poll_scores(&mut self) -> Option<NetworkResponse> {
        let today = Local::now().date_naive();
        match self.client.fetch_scoreboard(today).await {
            Ok(events) => self.tracker.observe(events.iter().map(score_line).collect()),
            Err(e) => {
                warn!("score refresh skipped: {e}");
                None
            }
        }
    }

    async fn poll_odds(&self) -> Option<NetworkResponse> {
        match self.client.fetch_season(Utc::now()).await {
            Ok(season) => {
                let odds = fresh_odds(season.events());
                debug!("odds refresh returned {} lines", odds.len());
                (!odds.is_empty()).then_some(NetworkResponse::OddsUpdated { odds })
            }
            Err(e) => {
                warn!("odds refresh skipped: {e}");
                None
            }
        }
    }
}

/// Remembers the last published snapshot and decides what, if anything, the
/// UI needs to hear about a new one.
#[derive(Debug, Default)]
pub struct ScoresTracker {
    previous: ScoresSnapshot,
    any_in_progress: bool,
}

impl ScoresTracker {
    pub fn observe(&mut self, current: ScoresSnapshot) -> Option<NetworkResponse> {
        let Detection { change, any_in_progress } = detect(&self.previous, current);
        let flag_flipped = any_in_progress != self.any_in_progress;
        self.any_in_progress = any_in_progress;

        match change {
            Change::Changed(snapshot) => {
                debug!("scores changed ({} games)", snapshot.len());
                self.previous = snapshot.clone();
                Some(NetworkResponse::ScoresUpdated { snapshot, any_in_progress })
            }
            Change::Unchanged if flag_flipped => {
                Some(NetworkResponse::InProgressChanged { any_in_progress })
            }
            Change::Unchanged => {
                debug!("no score changes");
                None
            }
        }
    }
}
