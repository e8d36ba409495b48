use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use eredivisie_terminal::comparison::{MarkerKind, RenderedComparison};
use eredivisie_terminal::config::{AppConfig, CellStyle, Rgb};
use eredivisie_terminal::datasets::DatasetStore;
use eredivisie_terminal::fdr::{self, PositionGroup, StyledTable};
use eredivisie_terminal::results::RESULT_HEADERS;
use eredivisie_terminal::standings::{Methodology, StandingsTable};
use eredivisie_terminal::state::{AppState, Screen, StandingsView, screen_label};
use eredivisie_terminal::views::{
    self, FantasyScreen, ResultsSection, ScreenView, StandingsScreen,
};

struct App {
    state: AppState,
    store: DatasetStore,
    cfg: AppConfig,
    view: ScreenView,
    should_quit: bool,
}

impl App {
    fn new(cfg: AppConfig) -> Self {
        let mut state = AppState::new();
        state.push_log(format!("[INFO] Data directory: {}", cfg.data_dir.display()));
        Self {
            store: DatasetStore::new(cfg.data_dir.clone()),
            state,
            cfg,
            view: ScreenView::Home,
            should_quit: false,
        }
    }

    fn refresh(&mut self) {
        self.view = views::build_view(&mut self.state, &mut self.store, &self.cfg);
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('1') => self.state.set_screen(Screen::Home),
            KeyCode::Char('2') => self.state.set_screen(Screen::Standings),
            KeyCode::Char('3') => self.state.set_screen(Screen::Fantasy),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('m') if self.state.screen == Screen::Standings => {
                self.state.cycle_methodology()
            }
            KeyCode::Char('v') if self.state.screen == Screen::Standings => {
                self.state.toggle_standings_view()
            }
            KeyCode::Char(']') | KeyCode::Right => self.step_gameweek(true),
            KeyCode::Char('[') | KeyCode::Left => self.step_gameweek(false),
            KeyCode::Char('p') if self.state.screen == Screen::Fantasy => {
                self.state.cycle_position_group()
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let total = self.table_len();
                self.state.scroll_down(total);
            }
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(),
            _ => return,
        }
        self.refresh();
    }

    fn step_gameweek(&mut self, forward: bool) {
        if let ScreenView::Standings(StandingsScreen {
            results: Ok(section),
            ..
        }) = &self.view
        {
            let gameweeks = section.gameweeks.clone();
            self.state.step_gameweek(&gameweeks, forward);
        }
    }

    fn table_len(&self) -> usize {
        match &self.view {
            ScreenView::Standings(s) => s.table.as_ref().map(|t| t.rows.len()).unwrap_or(0),
            ScreenView::Fantasy(f) => f.table.as_ref().map(|t| t.rows.len()).unwrap_or(0),
            ScreenView::Home => 0,
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let cfg = AppConfig::from_env();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(cfg);
    app.refresh();
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(tick_rate)? {
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
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_lines(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match &app.view {
        ScreenView::Home => render_home(frame, chunks[1]),
        ScreenView::Standings(screen) => render_standings(frame, chunks[1], &app.state, screen),
        ScreenView::Fantasy(screen) => render_fantasy(frame, chunks[1], app, screen),
    }

    let footer = Paragraph::new(footer_text(&app.state)).block(
        Block::default()
            .title("Console")
            .borders(Borders::TOP),
    );
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_lines(state: &AppState) -> Vec<Line<'static>> {
    let title = format!("  ERE ANALYST | {}", screen_label(state.screen));
    let options = match state.screen {
        Screen::Home => Line::from("  1 Home | 2 Expected Standings | 3 Fantasy Hub"),
        Screen::Standings => radio_line(
            Methodology::ALL
                .iter()
                .map(|m| (m.label(), *m == state.methodology)),
        ),
        Screen::Fantasy => radio_line(
            PositionGroup::ALL
                .iter()
                .map(|g| (g.label(), *g == state.position_group)),
        ),
    };
    vec![
        Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
        options,
    ]
}

fn radio_line<'a>(options: impl Iterator<Item = (&'a str, bool)>) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for (label, selected) in options {
        if selected {
            spans.push(Span::styled(
                format!("(•) {label}   "),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(format!("( ) {label}   ")));
        }
    }
    Line::from(spans)
}

fn footer_text(state: &AppState) -> String {
    let keys = match state.screen {
        Screen::Home => "1 Home | 2 Standings | 3 Fantasy | ? Help | q Quit",
        Screen::Standings => {
            "m Methodology | v Table/Chart | [/] Gameweek | j/k Scroll | ? Help | q Quit"
        }
        Screen::Fantasy => "p Position group | j/k Scroll | ? Help | q Quit",
    };
    let mut lines: Vec<String> = state.logs.iter().rev().take(3).cloned().collect();
    lines.reverse();
    lines.push(keys.to_string());
    lines.join("\n")
}

fn render_home(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            "Eredivisie Analyst",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Welcome to the app with everything you need to analyse Eredivisie football."),
        Line::from(""),
        Line::from("Do you need help with your Fantasy Eredivisie squad?"),
        Line::from("  Press 3 to go to the Fantasy Hub."),
        Line::from(""),
        Line::from("Want to know which teams are over- or under-performing?"),
        Line::from("  Press 2 to go to the Expected Standings."),
    ];
    let home = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Home"));
    frame.render_widget(home, area);
}

fn render_standings(frame: &mut Frame, area: Rect, state: &AppState, screen: &StandingsScreen) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(12)])
        .split(area);

    let title = format!("{} ({})", state.methodology.label(), view_label(state.standings_view));
    match (&screen.table, &screen.chart) {
        (Err(notice), _) => render_notice(frame, rows[0], &title, notice),
        (Ok(_), Some(Ok(chart))) => render_comparison(frame, rows[0], &title, chart),
        (Ok(_), Some(Err(notice))) => render_notice(frame, rows[0], &title, notice),
        (Ok(table), None) => render_standings_table(frame, rows[0], &title, table, state.scroll),
    }

    match &screen.results {
        Ok(section) => render_results(frame, rows[1], section),
        Err(notice) => render_notice(frame, rows[1], "Expected Results", notice),
    }
}

fn view_label(view: StandingsView) -> &'static str {
    match view {
        StandingsView::Table => "table",
        StandingsView::Chart => "chart",
    }
}

fn render_notice(frame: &mut Frame, area: Rect, title: &str, notice: &str) {
    let p = Paragraph::new(notice.to_string())
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(p, area);
}

fn render_standings_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    table: &StandingsTable,
    scroll: usize,
) {
    let widths = column_widths(&table.headers, table.rows.iter().map(|r| r.as_slice()));
    let header = Row::new(table.headers.iter().map(|h| Cell::from(h.clone())))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let body = table
        .rows
        .iter()
        .skip(scroll)
        .map(|r| Row::new(r.iter().map(|c| Cell::from(c.clone()))));
    let widget = Table::new(body, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(widget, area);
}

fn render_results(frame: &mut Frame, area: Rect, section: &ResultsSection) {
    let title = match section.selected {
        Some(gw) => format!(
            "Expected Results | GW {gw} of {} | [/] to change",
            section.gameweeks.len()
        ),
        None => "Expected Results".to_string(),
    };
    let cells: Vec<Vec<String>> = section.rows.iter().map(|r| r.cells()).collect();
    let headers: Vec<String> = RESULT_HEADERS.iter().map(|h| h.to_string()).collect();
    let widths = column_widths(&headers, cells.iter().map(|r| r.as_slice()));
    let header = Row::new(headers.into_iter().map(Cell::from))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let body = cells
        .into_iter()
        .map(|r| Row::new(r.into_iter().map(Cell::from)));
    let widget = Table::new(body, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(widget, area);
}

fn render_comparison(frame: &mut Frame, area: Rect, title: &str, chart: &RenderedComparison) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width < 20 || inner.height < 3 {
        return;
    }

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);
    let plot = sections[0];

    // Widen the x range to the left so the row labels fit inside the canvas.
    let label_cols = chart.rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0) + 2;
    let [x0, x1] = chart.x_bounds;
    let span = x1 - x0;
    let plot_cols = (plot.width as usize).saturating_sub(label_cols).max(1);
    let label_span = span * label_cols as f64 / plot_cols as f64;
    let label_x = x0 - label_span;
    let [y0, y1] = chart.y_bounds;
    let flip = |y: f64| y0 + y1 - y;

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([label_x, x1])
        .y_bounds([y0, y1])
        .paint(|ctx| {
            for c in chart.connectors() {
                ctx.draw(&CanvasLine {
                    x1: c.from_x,
                    y1: flip(c.y),
                    x2: c.to_x,
                    y2: flip(c.y),
                    color: tui_color(c.color),
                });
            }
            ctx.layer();
            for row in &chart.rows {
                let y = flip(row.actual.y);
                ctx.print(label_x, y, row.label.clone());
                if let Some(c) = &row.connector {
                    let head = if c.points_right() { "▶" } else { "◀" };
                    ctx.print(c.to_x, y, Span::styled(head, Style::default().fg(tui_color(c.color))));
                }
                ctx.print(
                    row.expected.x,
                    y,
                    Span::styled("◆", Style::default().fg(tui_color(row.expected.color))),
                );
                ctx.print(
                    row.actual.x,
                    y,
                    Span::styled("●", Style::default().fg(tui_color(row.actual.color))),
                );
            }
        });
    frame.render_widget(canvas, plot);

    let mut legend = Vec::new();
    for entry in &chart.legend {
        let glyph = match entry.kind {
            MarkerKind::Actual => "●",
            MarkerKind::Expected => "◆",
        };
        legend.push(Span::styled(
            format!("{glyph} {}  ", entry.label),
            Style::default().fg(tui_color(entry.color)),
        ));
    }
    legend.push(Span::raw(format!(
        "arrows when |PTS - xPTS| >= {:.1} | x: points {:.0}..{:.0}",
        chart.threshold, x0, x1
    )));
    frame.render_widget(Paragraph::new(Line::from(legend)), sections[1]);
}

fn render_fantasy(frame: &mut Frame, area: Rect, app: &App, screen: &FantasyScreen) {
    let state = &app.state;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    let title = format!("FDR Schedule | {}", state.position_group);
    match &screen.table {
        Ok(table) => render_fdr_table(frame, rows[0], &title, table, state.scroll),
        Err(notice) => render_notice(frame, rows[0], &title, notice),
    }

    let legend = fdr::legend(&app.cfg.bands);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, legend.len() as u32); 5])
        .split(rows[1]);
    for (band, col) in legend.iter().zip(cols.iter()) {
        let swatch = Paragraph::new(band.label)
            .alignment(Alignment::Center)
            .style(cell_style(band.style))
            .block(Block::default().borders(Borders::NONE));
        frame.render_widget(swatch, *col);
    }
}

fn render_fdr_table(frame: &mut Frame, area: Rect, title: &str, table: &StyledTable, scroll: usize) {
    let texts: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|r| r.iter().map(|c| c.text.clone()).collect())
        .collect();
    let widths = column_widths(&table.headers, texts.iter().map(|r| r.as_slice()));
    let header = Row::new(table.headers.iter().map(|h| Cell::from(h.clone())))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let body = table.rows.iter().skip(scroll).map(|r| {
        Row::new(
            r.iter()
                .map(|c| Cell::from(c.text.clone()).style(cell_style(c.style))),
        )
    });
    let widget = Table::new(body, widths)
        .header(header)
        .column_spacing(0)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(widget, area);
}

fn column_widths<'a>(
    headers: &[String],
    rows: impl Iterator<Item = &'a [String]>,
) -> Vec<Constraint> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(idx) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }
    widths
        .into_iter()
        .map(|w| Constraint::Length(w as u16 + 1))
        .collect()
}

fn tui_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn cell_style(style: CellStyle) -> Style {
    let base = Style::default().bg(tui_color(style.bg));
    match style.fg {
        Some(fg) => base.fg(tui_color(fg)),
        None => base.fg(Color::Black),
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Eredivisie Analyst - Help",
        "",
        "Global:",
        "  1            Home",
        "  2            Expected standings",
        "  3            Fantasy hub (FDR)",
        "  j/k or ↑/↓   Scroll table",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Expected standings:",
        "  m            Cycle methodology",
        "  v            Table / comparison chart",
        "  [ ] or ←/→   Previous / next gameweek",
        "",
        "Fantasy hub:",
        "  p            Cycle position group (KEE, DEF, MID/ATT)",
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
