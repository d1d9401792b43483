use std::io;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph,
    Row, Table, Tabs, Wrap,
};

use fpl_terminal::charts::{self as chart_spec, ChartOutcome};
use fpl_terminal::config::{Config, SourceKind};
use fpl_terminal::export::{self, WORKBOOK_FILE};
use fpl_terminal::fake_source::FakeSource;
use fpl_terminal::fpl_fetch::{FplApi, FplSource, TeamId};
use fpl_terminal::logging;
use fpl_terminal::session::{self, SessionState, TabView};
use fpl_terminal::state::{AppState, DashboardTab};
use fpl_terminal::table::Cell;

struct App {
    state: AppState,
    config: Config,
    source: Box<dyn FplSource>,
    pending: Option<TeamId>,
    should_quit: bool,
}

impl App {
    fn new(config: Config) -> Self {
        let source: Box<dyn FplSource> = match config.source {
            SourceKind::Live => Box::new(FplApi::new(config.api_base.clone())),
            SourceKind::Fake => Box::new(FakeSource::demo()),
        };
        let mut state = AppState::new();
        if config.source == SourceKind::Fake {
            state.push_log("[INFO] Using built-in demo data (FPL_SOURCE=fake)");
        }
        Self {
            state,
            config,
            source,
            pending: None,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::F(1) => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::F(2) => self.export_current_csv(),
            KeyCode::F(3) => self.export_workbook(),
            KeyCode::Enter => self.pending = self.state.begin_submit(),
            KeyCode::Tab | KeyCode::BackTab => self.state.toggle_tab(),
            KeyCode::Down => self.state.scroll_down(),
            KeyCode::Up => self.state.scroll_up(),
            KeyCode::Backspace => self.state.pop_char(),
            KeyCode::Char(c) => self.state.push_char(c),
            _ => {}
        }
    }

    fn export_current_csv(&mut self) {
        let tab = self.state.tab;
        let result = match self.state.current_table() {
            Some(table) => export::write_csv(&self.config.export_dir, tab.csv_file_name(), table),
            None => {
                self.state
                    .push_log(format!("[INFO] {}: nothing to export", tab.title()));
                return;
            }
        };
        match result {
            Ok(path) => self
                .state
                .push_log(format!("[INFO] Saved {}", path.display())),
            Err(err) => self
                .state
                .push_log(format!("[ERROR] CSV export failed: {err:#}")),
        }
    }

    fn export_workbook(&mut self) {
        let sheets: Vec<(&str, &fpl_terminal::table::Table)> = [
            ("Transfers", DashboardTab::Transfers),
            ("History", DashboardTab::History),
        ]
        .into_iter()
        .filter_map(|(name, tab)| {
            self.state
                .tab_view(tab)
                .and_then(TabView::table)
                .map(|table| (name, table))
        })
        .collect();
        if sheets.is_empty() {
            self.state.push_log("[INFO] Workbook: nothing to export");
            return;
        }
        let path = self.config.export_dir.join(WORKBOOK_FILE);
        let result = export::write_workbook(&path, &sheets);
        match result {
            Ok(()) => self
                .state
                .push_log(format!("[INFO] Saved {}", path.display())),
            Err(err) => self
                .state
                .push_log(format!("[ERROR] Workbook export failed: {err:#}")),
        }
    }
}

fn main() -> io::Result<()> {
    let config = Config::from_env();
    if let Some(path) = &config.log_file
        && let Err(err) = logging::init_file_logging(path, &config.log_filter)
    {
        eprintln!("warning: {err:#}");
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(config);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let poll_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|f| ui(f, app))?;

        // Loading has been drawn; the fetches block until they return.
        if let Some(team) = app.pending.take() {
            let outcome = session::load_dashboard(app.source.as_ref(), team);
            app.state.finish_load(outcome);
            continue;
        }

        if event::poll(poll_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let input = Paragraph::new(format!("{}_", app.state.input)).block(
        Block::default()
            .title("Enter your Team ID (e.g., 7108828)")
            .borders(Borders::ALL),
    );
    frame.render_widget(input, chunks[1]);

    render_body(frame, chunks[2], &app.state);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[3]);

    let footer = Paragraph::new(
        "Enter Load | Tab Switch tab | ↑/↓ Scroll | F2 CSV | F3 XLSX | F1 Help | Esc Quit",
    );
    frame.render_widget(footer, chunks[4]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let source = match app.config.source {
        SourceKind::Live => "LIVE",
        SourceKind::Fake => "DEMO",
    };
    match &app.state.session {
        SessionState::Displaying(dashboard) => {
            format!("FPL TEAM ANALYZER | {source} | Team {}", dashboard.team)
        }
        _ => format!("FPL TEAM ANALYZER | {source}"),
    }
}

fn render_body(frame: &mut Frame, area: Rect, state: &AppState) {
    let muted = Style::default().fg(Color::DarkGray);
    match &state.session {
        SessionState::AwaitingInput => {
            let text = "Enter your Team ID to view your transfer history and performance across gameweeks.";
            frame.render_widget(Paragraph::new(text).style(muted), area);
        }
        SessionState::InvalidInput { .. } => {
            let text = state.session.message().unwrap_or(session::PROMPT);
            frame.render_widget(
                Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
                area,
            );
        }
        SessionState::Loading { team } => {
            let text = format!("Fetching player data for team {team}...");
            frame.render_widget(Paragraph::new(text).style(muted), area);
        }
        SessionState::Error(msg) => {
            let paragraph = Paragraph::new(msg.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
        }
        SessionState::Displaying(_) => render_dashboard(frame, area, state),
    }
}

fn render_dashboard(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let titles: Vec<&str> = DashboardTab::ALL.iter().map(|t| t.title()).collect();
    let tabs = Tabs::new(titles)
        .select(state.tab.index())
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, sections[0]);

    let Some(view) = state.tab_view(state.tab) else {
        return;
    };
    match view {
        TabView::Empty(msg) => frame.render_widget(
            Paragraph::new(msg.as_str()).style(Style::default().fg(Color::DarkGray)),
            sections[1],
        ),
        TabView::Failed(msg) => frame.render_widget(
            Paragraph::new(msg.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true }),
            sections[1],
        ),
        TabView::Ready { shaped, charts } => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(sections[1]);
            render_data_table(frame, rows[0], &shaped.table, state.current_scroll());

            let constraints: Vec<Constraint> = charts
                .iter()
                .map(|_| Constraint::Ratio(1, charts.len().max(1) as u32))
                .collect();
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(constraints)
                .split(rows[1]);
            for (outcome, col) in charts.iter().zip(cols.iter()) {
                render_chart(frame, *col, outcome);
            }
        }
    }
}

fn render_data_table(
    frame: &mut Frame,
    area: Rect,
    table: &fpl_terminal::table::Table,
    scroll: usize,
) {
    let block = Block::default()
        .title(format!("{} rows", table.len()))
        .borders(Borders::ALL);
    if table.columns().is_empty() {
        frame.render_widget(Paragraph::new("No columns to show").block(block), area);
        return;
    }

    let header = Row::new(table.columns().iter().cloned())
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = table
        .rows()
        .iter()
        .skip(scroll)
        .map(|row| Row::new(row.iter().map(format_cell)))
        .collect();
    let widths: Vec<Constraint> = table
        .columns()
        .iter()
        .map(|_| Constraint::Ratio(1, table.columns().len() as u32))
        .collect();

    let widget = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(widget, area);
}

fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Null => "-".to_string(),
        Cell::Time(t) => t.format("%Y-%m-%d %H:%M").to_string(),
        other => other.display(),
    }
}

fn render_chart(frame: &mut Frame, area: Rect, outcome: &ChartOutcome) {
    match outcome {
        ChartOutcome::Skipped { warning } => {
            let paragraph = Paragraph::new(warning.as_str())
                .style(Style::default().fg(Color::Yellow))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(paragraph, area);
        }
        ChartOutcome::Drawn(chart_spec::Chart::Line(line)) => render_line_chart(frame, area, line),
        ChartOutcome::Drawn(chart_spec::Chart::Bar(bars)) => render_bar_chart(frame, area, bars),
    }
}

fn render_line_chart(frame: &mut Frame, area: Rect, chart: &chart_spec::LineChart) {
    // Reversed axes are drawn by negating y so the smallest value sits on top.
    let points: Vec<(f64, f64)> = if chart.y_reversed {
        chart.points.iter().map(|(x, y)| (*x, -*y)).collect()
    } else {
        chart.points.clone()
    };
    let [x_lo, x_hi] = chart.x_bounds();
    let [y_lo, y_hi] = chart.y_bounds();
    let y_mid = (y_lo + y_hi) / 2.0;
    let (y_bounds, y_labels) = if chart.y_reversed {
        ([-y_hi, -y_lo], [y_hi, y_mid, y_lo])
    } else {
        ([y_lo, y_hi], [y_lo, y_mid, y_hi])
    };

    let dataset = Dataset::default()
        .name(chart.y_label.clone())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points);

    let widget = Chart::new(vec![dataset])
        .block(
            Block::default()
                .title(chart.title.clone())
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title(chart.x_label.clone())
                .bounds([x_lo, x_hi])
                .labels(vec![
                    Span::raw(axis_label(x_lo)),
                    Span::raw(axis_label(x_hi)),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(chart.y_label.clone())
                .bounds(y_bounds)
                .labels(
                    y_labels
                        .iter()
                        .map(|v| Span::raw(axis_label(*v)))
                        .collect::<Vec<_>>(),
                ),
        );
    frame.render_widget(widget, area);
}

fn render_bar_chart(frame: &mut Frame, area: Rect, chart: &chart_spec::BarChart) {
    const SERIES_COLORS: [Color; 2] = [Color::Green, Color::Red];

    let legend = chart
        .series
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(" / ");
    let mut widget = BarChart::default()
        .block(
            Block::default()
                .title(format!("{} ({legend})", chart.title))
                .borders(Borders::ALL),
        )
        .bar_width(3)
        .bar_gap(0)
        .group_gap(2)
        .max(chart.max_value().max(1));

    for (idx, category) in chart.categories.iter().enumerate() {
        let bars: Vec<Bar> = chart
            .series
            .iter()
            .enumerate()
            .map(|(s_idx, series)| {
                let color = SERIES_COLORS[s_idx % SERIES_COLORS.len()];
                Bar::default()
                    .value(series.values.get(idx).copied().unwrap_or(0))
                    .style(Style::default().fg(color))
                    .value_style(Style::default().fg(Color::Black).bg(color))
            })
            .collect();
        widget = widget.data(
            BarGroup::default()
                .label(Line::from(category.clone()))
                .bars(&bars),
        );
    }
    frame.render_widget(widget, area);
}

fn axis_label(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "FPL Team Analyzer - Help",
        "",
        "  digits       Type a Team ID",
        "  Enter        Load transfers and history",
        "  Tab          Switch Transfer/Performance tab",
        "  ↑/↓          Scroll the table",
        "  F2           Export current tab as CSV",
        "  F3           Export both tabs as XLSX",
        "  F1           Toggle help",
        "  Esc          Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
