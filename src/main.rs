mod app;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::odds_store::FileOddsStore;
use crate::state::refresher::PeriodicRefresher;
use chrono::Utc;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{error, info};
use nfl_api::client::NflApi;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal();

    tui_logger::init_logger(log::LevelFilter::Debug)?;
    tui_logger::set_default_level(log::LevelFilter::Error);

    let settings = AppSettings::load();
    let api = match settings.feed_url.as_deref() {
        Some(url) => NflApi::with_base_url(url),
        None => NflApi::new(),
    };
    let odds_store = FileOddsStore::new(settings.odds_cache.clone());
    info!("odds cache at {}", odds_store.path().display());
    let (scores_every, odds_every) = (settings.scores_interval, settings.odds_interval);
    let app = Arc::new(Mutex::new(App::new(settings, Box::new(odds_store))));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // On-demand requests: season load, scoring plays
    let network_worker = NetworkWorker::new(api.clone(), network_req_rx, network_resp_tx.clone());
    let network_task = tokio::spawn(network_worker.run());

    // Scores and odds polling
    let periodic_updater = PeriodicRefresher::new(api, network_resp_tx, scores_every, odds_every);
    let periodic_task = tokio::spawn(periodic_updater.run());

    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();
    periodic_task.abort();

    Ok(())
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("gridtui {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "gridtui - NFL scores, odds and scoring plays in the terminal

Usage:
  gridtui
  gridtui --help
  gridtui --version

Environment:
  GRIDTUI_LOG               Log level shown in the log pane (error, warn, info, debug, trace)
  GRIDTUI_SCORES_INTERVAL   Seconds between live score polls (default 30)
  GRIDTUI_ODDS_INTERVAL     Seconds between odds refreshes (default 3600)
  GRIDTUI_ODDS_CACHE        Odds cache file (default $XDG_CONFIG_HOME/gridtui/odds.json)
  GRIDTUI_FEED_URL          Base URL of the scoreboard feed"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw =
                    handle_network_response(response, &app, &network_requests, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            else => break,
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let _ = network_requests.send(NetworkRequest::LoadSeason).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
        }
        NetworkResponse::SeasonLoaded { season } => {
            let mut guard = app.lock().await;
            guard.on_season_loaded(season, Utc::now());
        }
        NetworkResponse::ScoresUpdated { snapshot, any_in_progress } => {
            let mut guard = app.lock().await;
            let stale = guard.on_scores_updated(snapshot, any_in_progress);
            drop(guard);
            for game_id in stale {
                let _ = network_requests
                    .send(NetworkRequest::LoadScoringPlays { game_id })
                    .await;
            }
        }
        NetworkResponse::InProgressChanged { any_in_progress } => {
            let mut guard = app.lock().await;
            guard.on_in_progress_changed(any_in_progress);
        }
        NetworkResponse::OddsUpdated { odds } => {
            let mut guard = app.lock().await;
            guard.on_odds_updated(odds);
        }
        NetworkResponse::ScoringPlaysLoaded { game_id, plays } => {
            let mut guard = app.lock().await;
            guard.on_scoring_plays_loaded(game_id, plays);
        }
        NetworkResponse::ScoringPlaysFailed { game_id, message } => {
            let mut guard = app.lock().await;
            guard.on_scoring_plays_failed(game_id, message);
        }
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
            let mut guard = app.lock().await;
            guard.on_error(message);
        }
    }
    true
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        cursor::Hide,
        terminal::EnterAlternateScreen,
        terminal::Clear(terminal::ClearType::All)
    );
    if let Err(e) = terminal::enable_raw_mode() {
        eprintln!("failed to enable raw mode: {e}");
    }
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::All),
        terminal::LeaveAlternateScreen,
        cursor::Show
    );
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
