use chrono::Local;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use nfl_api::{GameStatus, GameView, ScoringPlay, TeamLine};

static TABS: &[&str; 2] = &["Games", "Help"];

const HELP_TEXT: &str = "q=quit  h/l=week  j/k=game  Enter=scoring plays  r=reload season  \"=logs  f=full screen  Esc=back";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Games => draw_games(f, layout.main, app),
            MenuItem::Help => draw_placeholder(f, layout.main, HELP_TEXT),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Games => 0,
        MenuItem::Help => 1,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let live = if app.state.any_in_progress {
        Span::styled("● LIVE ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
    } else {
        Span::raw("")
    };
    let help = Paragraph::new(Line::from(vec![live, Span::raw("Help: ? ")]))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_games(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" NFL Games ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if !app.state.season_loaded {
        let msg = match app.state.last_error.as_deref() {
            Some(err) => format!("Season load failed:\n{err}\n\nPress r to retry"),
            None => "Loading season...".to_string(),
        };
        draw_message(f, inner, msg);
        return;
    }

    let Some(week_label) = app.state.week.current_label() else {
        let msg = match app.state.week.error.as_deref() {
            Some(err) => format!("No weeks available\n{err}"),
            None => "No weeks available".to_string(),
        };
        draw_message(f, inner, msg);
        return;
    };

    let [header, key_legend, content] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Fill(1)])
            .areas(inner);

    let mut header_spans = vec![Span::styled(
        format!("◀ {week_label} ▶"),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if app.week_in_progress() {
        header_spans.push(Span::styled("  games in progress", Style::default().fg(Color::Red)));
    }
    if let Some(err) = app.state.last_error.as_deref() {
        header_spans.push(Span::styled(format!("  {err}"), Style::default().fg(Color::Red)));
    }
    f.render_widget(Paragraph::new(Line::from(header_spans)), header);
    f.render_widget(
        Paragraph::new("Keys: h/l=week  j/k=move  Enter=scoring plays  ?=help  q=quit")
            .style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    let games = &app.state.games.games;
    if games.is_empty() {
        draw_message(f, content, "No games this week".to_string());
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_span = (0, 0);
    for (idx, game) in games.iter().enumerate() {
        let selected = idx == app.state.games.selected;
        let start = lines.len();
        lines.extend(game_lines(game, selected));
        if app.state.scoring_plays.is_expanded(&game.game_id) {
            lines.extend(scoring_play_lines(
                app.state.scoring_plays.plays(&game.game_id),
                app.state.scoring_plays.failure(&game.game_id),
                content.width,
            ));
        }
        if selected {
            selected_span = (start, lines.len());
        }
        lines.push(Line::from(""));
    }

    let offset = scroll_offset(selected_span, content.height as usize);
    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), content);
}

/// Smallest offset that keeps the selected game fully visible, or its top
/// line when it is taller than the view.
fn scroll_offset((start, end): (usize, usize), height: usize) -> u16 {
    if height == 0 || end <= height {
        return 0;
    }
    let offset = if end - start > height { start } else { end - height };
    offset.min(u16::MAX as usize) as u16
}

fn game_lines(game: &GameView, selected: bool) -> Vec<Line<'static>> {
    let marker = if selected { "> " } else { "  " };
    let mut lines = vec![
        team_row(marker, &game.home, game),
        team_row("  ", &game.away, game),
    ];

    let mut detail = vec![Span::styled(
        format!("  {}", status_label(game)),
        status_style(&game.status),
    )];
    // Scheduled games already show it as their status.
    if game.status != GameStatus::Scheduled
        && let Some(start) = kickoff(game)
    {
        detail.push(Span::styled(format!("  {start}"), Style::default().fg(Color::Gray)));
    }
    if let Some(odds) = game.odds.as_deref() {
        detail.push(Span::raw(format!("  {odds}")));
    }
    let venue: Vec<&str> = [game.location.as_str(), game.network.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if !venue.is_empty() {
        detail.push(Span::styled(
            format!("  {}", venue.join(" - ")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines.push(Line::from(detail));
    lines
}

fn team_row(marker: &str, team: &TeamLine, game: &GameView) -> Line<'static> {
    let name_style = team
        .color
        .as_deref()
        .and_then(|hex| hex.parse::<Color>().ok())
        .map(|c| Style::default().fg(c))
        .unwrap_or_default()
        .add_modifier(Modifier::BOLD);

    let mut spans = vec![
        Span::raw(marker.to_string()),
        Span::styled(format!("{:<28}", team.name), name_style),
        Span::styled(format!("{:<8}", team.record), Style::default().fg(Color::Gray)),
        Span::styled(format!("{:>3}", team.score), Style::default().add_modifier(Modifier::BOLD)),
    ];
    if game.has_possession(team) {
        spans.push(Span::styled(
            format!("  🏈 {}", game.down_distance),
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}

fn status_label(game: &GameView) -> String {
    match &game.status {
        GameStatus::InProgress => format!(
            "Q{} {} remaining",
            game.quarter.unwrap_or_default(),
            game.clock.as_deref().unwrap_or("--:--")
        ),
        GameStatus::Scheduled => kickoff(game).unwrap_or_else(|| "Scheduled".to_string()),
        GameStatus::Other(desc) if desc.is_empty() => "Status unknown".to_string(),
        status => status.description().to_string(),
    }
}

fn kickoff(game: &GameView) -> Option<String> {
    game.start_time
        .map(|t| t.with_timezone(&Local).format("%a %m/%d %I:%M %p").to_string())
}

fn status_style(status: &GameStatus) -> Style {
    match status {
        GameStatus::Final => Style::default().fg(Color::DarkGray),
        GameStatus::Scheduled => Style::default().fg(Color::White),
        _ => Style::default().fg(Color::Red),
    }
}

fn scoring_play_lines(
    plays: Option<&[ScoringPlay]>,
    failure: Option<&str>,
    width: u16,
) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    let Some(plays) = plays else {
        return match failure {
            Some(err) => vec![Line::styled(
                format!("    Scoring plays unavailable: {err}"),
                Style::default().fg(Color::Red),
            )],
            None => vec![Line::styled("    Loading scoring plays...", dim)],
        };
    };
    if plays.is_empty() {
        return vec![Line::styled("    No scoring plays yet", dim)];
    }
    plays
        .iter()
        .map(|p| {
            let text = format!(
                "    Q{} {:>5}  {}-{}  {}: {}",
                p.period, p.clock, p.home_score, p.away_score, p.team, p.text
            );
            let clipped: String = text.chars().take(width.saturating_sub(1) as usize).collect();
            Line::from(clipped)
        })
        .collect()
}

fn draw_message(f: &mut Frame, area: Rect, msg: String) {
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let widget = TuiLoggerWidget::default().block(default_border(Color::DarkGray).title(" Logs "));
    f.render_widget(widget, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
