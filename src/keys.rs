use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        (_, Char('1'), _) => guard.update_tab(MenuItem::Games),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Week selector
        (MenuItem::Games, Char('l') | KeyCode::Right, _) => guard.next_week(),
        (MenuItem::Games, Char('h') | KeyCode::Left, _) => guard.prev_week(),

        // Game list
        (MenuItem::Games, Char('j') | KeyCode::Down, _) => guard.game_down(),
        (MenuItem::Games, Char('k') | KeyCode::Up, _) => guard.game_up(),
        (MenuItem::Games, KeyCode::Enter | Char(' '), _) => {
            if let Some(game_id) = guard.toggle_scoring_plays() {
                drop(guard);
                let _ = network_requests
                    .send(NetworkRequest::LoadScoringPlays { game_id })
                    .await;
            }
        }

        // Global
        (_, Char('r'), _) => {
            drop(guard);
            let _ = network_requests.send(NetworkRequest::LoadSeason).await;
        }
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
