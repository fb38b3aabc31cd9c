// services/admin-dash/src/main.rs
//
// Terminal admin dashboard for the sports content backend: articles, clubs,
// competitions and matches with search, editor modal, delete confirmation
// and per-kind charts.
//
// Run with: cargo run --bin admin-dash -- --demo

use std::fs::OpenOptions;
use std::io::stdout;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{prelude::*, widgets::*};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use svckit::aggregate::{Chart, ChartStyle};
use svckit::config::ObservabilityConfig;
use svckit::{load_config, AdminConfig, ContentClient, MemoryTransport, NoticeBoard, NoticeLevel};

mod mock;
mod state;

use mock::DemoSeeder;
use state::{DashboardState, EditorSnapshot};

#[derive(Parser, Debug)]
#[command(name = "admin-dash")]
#[command(about = "Terminal admin dashboard for the sports content backend")]
#[command(version = "0.1.0")]
struct Args {
    /// Optional YAML configuration file
    #[arg(short, long, default_value = "config/admin-dash.yaml")]
    config: String,

    /// Content backend origin, overrides backend.base_url
    #[arg(long)]
    api_url: Option<String>,

    /// Run against an in-memory backend with sample content
    #[arg(long, short)]
    demo: bool,

    /// Input poll interval in milliseconds
    #[arg(long, default_value = "100")]
    refresh_ms: u64,
}

// Color palette: Red, White, Silver, Gold
mod colors {
    use ratatui::style::Color;

    pub const RED: Color = Color::Rgb(220, 50, 47);
    pub const DARK_RED: Color = Color::Rgb(139, 0, 0);
    pub const WHITE: Color = Color::Rgb(253, 246, 227);
    pub const SILVER: Color = Color::Rgb(147, 161, 161);
    pub const GOLD: Color = Color::Rgb(255, 193, 37);
    pub const DARK_GOLD: Color = Color::Rgb(184, 134, 11);
    pub const BG_DARK: Color = Color::Rgb(0, 20, 30);
    pub const BG_PANEL: Color = Color::Rgb(7, 30, 41);
    pub const SUCCESS: Color = Color::Rgb(133, 153, 0);
    pub const INFO: Color = Color::Rgb(38, 139, 210);

    /// `#RRGGBB` to a terminal color; anything else falls back to silver.
    pub fn hex(code: &str) -> Color {
        let digits = code.trim_start_matches('#');
        if digits.len() != 6 {
            return SILVER;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        match (channel(0), channel(2), channel(4)) {
            (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
            _ => SILVER,
        }
    }
}

/// Seeded in-memory client in demo mode, HTTP client otherwise.
fn connect(config: &AdminConfig, demo: bool) -> Result<ContentClient> {
    let notices = NoticeBoard::new(config.dashboard.notice_capacity);
    if demo {
        let backend = Arc::new(MemoryTransport::new());
        DemoSeeder::new(Utc::now()).seed(&backend);
        info!("Admin dashboard started in DEMO mode");
        return Ok(ContentClient::new(backend, notices, config.backend.origin())
            .with_fetch_all_pages(config.dashboard.fetch_all_pages));
    }
    info!("Admin dashboard started - connecting to {}", config.backend.api_root());
    Ok(ContentClient::from_config(config, notices)?)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(&args.config).context("loading configuration")?;
    if let Some(url) = &args.api_url {
        config.backend.base_url = url.clone();
    }
    init_tracing(&config.observability)?;

    let client = connect(&config, args.demo)?;
    info!("Content client ready ({} transport)", client.transport_name());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let mut state = DashboardState::new(client, runtime, args.demo);
    state.mount();

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_app(&mut terminal, &mut state, Duration::from_millis(args.refresh_ms));

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    state.shutdown();
    info!("Admin dashboard stopped");
    result
}

/// Log to a file: the terminal belongs to the UI.
fn init_tracing(observability: &ObservabilityConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&observability.log_file)
        .with_context(|| format!("opening log file {}", observability.log_file))?;

    let level = &observability.log_level;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("admin_dash={},svckit={}", level, level).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, state: &mut DashboardState, tick_rate: Duration) -> Result<()> {
    loop {
        terminal.draw(|frame| draw_ui(frame, state))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                state.handle_key(key);
            }
        }
        if state.should_quit {
            return Ok(());
        }
    }
}

fn draw_ui(frame: &mut Frame, state: &DashboardState) {
    let area = frame.area();

    // Background
    frame.render_widget(
        Block::default().style(Style::default().bg(colors::BG_DARK)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header + tabs
            Constraint::Length(3), // Search
            Constraint::Min(10),   // Table + chart
            Constraint::Length(7), // Notifications
            Constraint::Length(3), // Footer
        ])
        .split(area);

    draw_header(frame, chunks[0], state);
    draw_search(frame, chunks[1], state);
    draw_main_content(frame, chunks[2], state);
    draw_notices(frame, chunks[3], state);
    draw_footer(frame, chunks[4], state);

    let panel = state.panel();
    if let Some(editor) = panel.editor() {
        draw_editor(frame, area, &editor);
    } else if let Some(prompt) = panel.delete_prompt() {
        draw_confirm(frame, area, prompt);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let (mode_text, mode_color) = if state.demo {
        ("DEMO", colors::GOLD)
    } else {
        ("LIVE", colors::SUCCESS)
    };

    let mut spans = vec![
        Span::styled(
            " ADMIN SPORTS ",
            Style::default().fg(colors::WHITE).bg(colors::DARK_RED).bold(),
        ),
        Span::raw("  "),
        Span::styled(format!("[{}]", mode_text), Style::default().fg(mode_color).bold()),
        Span::raw("  "),
    ];
    for (i, panel) in state.panels.iter().enumerate() {
        let style = if i == state.active {
            Style::default().fg(colors::BG_DARK).bg(colors::GOLD).bold()
        } else {
            Style::default().fg(colors::SILVER)
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, panel.title()), style));
        spans.push(Span::raw(" "));
    }

    let header = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(colors::DARK_RED))
                .style(Style::default().bg(colors::BG_DARK)),
        );

    frame.render_widget(header, area);
}

fn draw_search(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let panel = state.panel();
    let border = if state.searching { colors::GOLD } else { colors::SILVER };

    let text = if panel.search().is_empty() && !state.searching {
        Span::styled(
            panel.search_placeholder(),
            Style::default().fg(colors::SILVER).add_modifier(Modifier::DIM),
        )
    } else {
        let cursor = if state.searching { "_" } else { "" };
        Span::styled(
            format!("{}{}", panel.search(), cursor),
            Style::default().fg(colors::WHITE),
        )
    };

    let search = Paragraph::new(Line::from(vec![
        Span::styled(" / ", Style::default().fg(colors::GOLD).bold()),
        text,
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .border_type(BorderType::Rounded)
            .style(Style::default().bg(colors::BG_PANEL)),
    );

    frame.render_widget(search, area);
}

fn draw_main_content(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    draw_table(frame, chunks[0], state);
    draw_chart(frame, chunks[1], state);
}

fn draw_table(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let panel = state.panel();
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", panel.title().to_uppercase()),
            Style::default().fg(colors::WHITE).bold(),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::SILVER))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(colors::BG_PANEL));

    if let Some(message) = panel.status_line() {
        let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(colors::SILVER)))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let columns = panel.columns();
    let status_column = columns.iter().position(|c| *c == "Statut");
    let rows: Vec<Row> = panel
        .rows(state.client().origin())
        .into_iter()
        .map(|cells| {
            Row::new(cells.into_iter().enumerate().map(|(i, cell)| {
                let style = if Some(i) == status_column {
                    Style::default().fg(colors::hex(status_color(&cell))).bold()
                } else {
                    Style::default().fg(colors::WHITE)
                };
                Cell::from(Span::styled(cell, style))
            }))
        })
        .collect();

    let widths: Vec<Constraint> = columns.iter().map(|_| Constraint::Fill(1)).collect();
    let table = Table::new(rows, widths)
        .header(
            Row::new(
                columns
                    .iter()
                    .map(|c| Cell::from(Span::styled(*c, Style::default().fg(colors::GOLD).bold()))),
            )
            .bottom_margin(1),
        )
        .block(block)
        .row_highlight_style(Style::default().bg(colors::BG_DARK).fg(colors::GOLD))
        .highlight_symbol("> ");

    let mut table_state = TableState::default().with_selected(panel.selected());
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn status_color(label: &str) -> &'static str {
    svckit::MatchStatus::KNOWN
        .iter()
        .find(|s| s.label() == label)
        .map(|s| s.color())
        .unwrap_or("#999999")
}

fn draw_chart(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let panel = state.panel();
    let chart = panel.chart(state.today());

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", chart.title),
            Style::default().fg(colors::GOLD).bold(),
        ))
        .title_bottom(Span::styled(
            format!(" {} ", chart.caption),
            Style::default().fg(colors::SILVER).add_modifier(Modifier::DIM),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::DARK_GOLD))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(colors::BG_PANEL));

    if let Some(message) = panel.chart_placeholder(&chart) {
        let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(colors::SILVER)))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2);
    frame.render_widget(chart_widget(&chart, inner_width).block(block), area);
}

fn chart_widget(chart: &Chart, width: u16) -> BarChart<'_> {
    let bars: Vec<Bar> = chart
        .points
        .iter()
        .map(|point| {
            let label = match chart.style {
                ChartStyle::Pie => format!("{} ({}%)", point.label, chart.share(point)),
                _ => point.label.clone(),
            };
            let text = match chart.style {
                ChartStyle::HorizontalBar => svckit::display::format_capacity(point.value as u32),
                _ => point.value.to_string(),
            };
            Bar::default()
                .value(point.value)
                .label(Line::from(label))
                .text_value(text)
                .style(Style::default().fg(colors::hex(point.color)))
                .value_style(Style::default().fg(colors::BG_DARK).bg(colors::hex(point.color)))
        })
        .collect();

    // All-zero charts still draw their bars.
    let ceiling = chart.points.iter().map(|p| p.value).max().unwrap_or(0).max(1);
    let widget = BarChart::default().data(BarGroup::default().bars(&bars)).max(ceiling);
    match chart.style {
        ChartStyle::Bar => {
            let count = chart.points.len().max(1) as u16;
            let bar_width = (width / count).saturating_sub(1).max(1);
            widget.bar_width(bar_width).bar_gap(1)
        }
        ChartStyle::HorizontalBar | ChartStyle::Pie => widget
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(1),
    }
}

fn draw_notices(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(Span::styled(" NOTIFICATIONS ", Style::default().fg(colors::WHITE).bold()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::SILVER))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(colors::BG_PANEL));

    let lines: Vec<Line> = state
        .client()
        .notices()
        .snapshot()
        .into_iter()
        .rev()
        .take(5)
        .map(|notice| {
            let (prefix, color) = match notice.level {
                NoticeLevel::Success => ("[OK ]", colors::SUCCESS),
                NoticeLevel::Error => ("[ERR]", colors::RED),
                NoticeLevel::Info => ("[INF]", colors::INFO),
            };
            Line::from(vec![
                Span::styled(
                    format!("{} ", notice.timestamp.format("%H:%M:%S")),
                    Style::default().fg(colors::SILVER).add_modifier(Modifier::DIM),
                ),
                Span::styled(format!("{} ", prefix), Style::default().fg(color)),
                Span::styled(notice.message, Style::default().fg(colors::WHITE)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

fn draw_footer(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let panel = state.panel();
    let keys: Vec<(&str, &str, Color)> = if panel.editor().is_some() {
        vec![
            (" [TAB] ", " Champ suivant ", colors::SILVER),
            (" [←/→] ", " Choix ", colors::SILVER),
            (" [CTRL-S] ", " Enregistrer ", colors::GOLD),
            (" [ESC] ", " Annuler ", colors::RED),
        ]
    } else if panel.delete_prompt().is_some() {
        vec![
            (" [Y] ", " Confirmer ", colors::RED),
            (" [autre] ", " Annuler ", colors::SILVER),
        ]
    } else if state.searching {
        vec![(" [ESC] ", " Terminer la recherche ", colors::GOLD)]
    } else {
        vec![
            (" [Q] ", " Quitter ", colors::RED),
            (" [←/→] ", " Onglet ", colors::SILVER),
            (" [/] ", " Rechercher ", colors::GOLD),
            (" [N] ", " Nouveau ", colors::WHITE),
            (" [E] ", " Modifier ", colors::WHITE),
            (" [D] ", " Supprimer ", colors::RED),
            (" [R] ", " Actualiser ", colors::SILVER),
        ]
    };

    let mut spans = Vec::new();
    for (key, label, color) in keys {
        spans.push(Span::styled(key, Style::default().fg(colors::BG_DARK).bg(color)));
        spans.push(Span::styled(label, Style::default().fg(colors::SILVER)));
        spans.push(Span::raw("  "));
    }

    let footer = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(colors::DARK_RED))
                .style(Style::default().bg(colors::BG_DARK)),
        );

    frame.render_widget(footer, area);
}

fn centered(area: Rect, width_percent: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(height), Constraint::Fill(1)])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_percent) / 2),
            Constraint::Percentage(width_percent),
            Constraint::Percentage((100 - width_percent) / 2),
        ])
        .split(vertical[1])[1]
}

fn draw_editor(frame: &mut Frame, area: Rect, editor: &EditorSnapshot) {
    let height = (editor.fields.len() as u16 + 6).min(area.height);
    let modal = centered(area, 60, height);
    frame.render_widget(Clear, modal);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", editor.title),
            Style::default().fg(colors::GOLD).bold(),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::GOLD))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(colors::BG_PANEL));

    let mut lines: Vec<Line> = editor
        .fields
        .iter()
        .map(|field| {
            let marker = if field.required { "*" } else { " " };
            let (label_style, value_style) = if field.focused {
                (
                    Style::default().fg(colors::GOLD).bold(),
                    Style::default().fg(colors::BG_DARK).bg(colors::WHITE),
                )
            } else {
                (Style::default().fg(colors::SILVER), Style::default().fg(colors::WHITE))
            };
            let value = match field.kind {
                svckit::FieldKind::Choice(_) => format!("< {} >", field.value),
                _ if field.focused => format!("{}_", field.value),
                _ => field.value.clone(),
            };
            Line::from(vec![
                Span::styled(format!("{}{:<20}", marker, field.label), label_style),
                Span::styled(value, value_style),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    if let Some(hint) = &editor.hint {
        lines.push(Line::from(Span::styled(hint.clone(), Style::default().fg(colors::RED))));
    }
    lines.push(Line::from(vec![
        Span::styled(" [CTRL-S] ", Style::default().fg(colors::BG_DARK).bg(colors::GOLD)),
        Span::styled(format!(" {} ", editor.submit_label), Style::default().fg(colors::WHITE)),
        Span::raw("  "),
        Span::styled(" [ESC] ", Style::default().fg(colors::BG_DARK).bg(colors::RED)),
        Span::styled(" Annuler ", Style::default().fg(colors::WHITE)),
    ]));

    frame.render_widget(Paragraph::new(lines).block(block), modal);
}

fn draw_confirm(frame: &mut Frame, area: Rect, prompt: &str) {
    let modal = centered(area, 50, 5);
    frame.render_widget(Clear, modal);

    let block = Block::default()
        .title(Span::styled(" Confirmation ", Style::default().fg(colors::RED).bold()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::RED))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(colors::BG_PANEL));

    let text = vec![
        Line::from(Span::styled(prompt, Style::default().fg(colors::WHITE).bold())),
        Line::from(vec![
            Span::styled(" [Y] ", Style::default().fg(colors::BG_DARK).bg(colors::RED)),
            Span::styled(" Confirmer ", Style::default().fg(colors::SILVER)),
            Span::raw("  "),
            Span::styled(" [autre] ", Style::default().fg(colors::BG_DARK).bg(colors::SILVER)),
            Span::styled(" Annuler ", Style::default().fg(colors::SILVER)),
        ]),
    ];

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center).block(block), modal);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(colors::hex("#1A78E2"), Color::Rgb(0x1A, 0x78, 0xE2));
        assert_eq!(colors::hex("#12"), colors::SILVER);
        assert_eq!(colors::hex("#GG0000"), colors::SILVER);
    }

    #[test]
    fn test_status_color_by_label() {
        assert_eq!(status_color("Terminé"), "#6C757D");
        assert_eq!(status_color("interrompu"), "#999999");
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["admin-dash"]);
        assert_eq!(args.config, "config/admin-dash.yaml");
        assert!(args.api_url.is_none());
        assert!(!args.demo);
        assert_eq!(args.refresh_ms, 100);

        let args = Args::parse_from(["admin-dash", "--demo", "--api-url", "http://cms:1337"]);
        assert!(args.demo);
        assert_eq!(args.api_url.as_deref(), Some("http://cms:1337"));
    }

    #[test]
    fn test_demo_client_honours_dashboard_settings() {
        let mut config = AdminConfig::default();
        config.dashboard.fetch_all_pages = true;

        let client = connect(&config, true).unwrap();
        assert_eq!(client.transport_name(), "memory");
        assert!(client.fetches_all_pages());

        config.dashboard.fetch_all_pages = false;
        assert!(!connect(&config, true).unwrap().fetches_all_pages());
    }
}
