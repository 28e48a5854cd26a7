//! Ratatui-based terminal dashboard.
//!
//! Layout: a header bar, the product panel on the left, and on the right the
//! smoothed sales chart above the sortable sales table.

use std::io;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

use crate::app::pipeline::{DashboardView, build_view};
use crate::data::{LoadStatus, SalesRepository, SalesSnapshot, SalesStore};
use crate::domain::{DashboardConfig, SortKey, SortState, request_sort};
use crate::error::AppError;
use crate::report::{column_header, format_month_tick, format_row};

mod plotters_chart;

use plotters_chart::SalesPlottersChart;

/// Start the TUI.
pub fn run(config: DashboardConfig) -> Result<(), AppError> {
    let mut app = App::new(config);
    app.load();

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::terminal(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::terminal(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Key of the last computed view: (store revision, sort, window).
type ViewKey = (u64, SortState, i64);

struct App {
    config: DashboardConfig,
    repo: SalesRepository,
    store: SalesStore,
    store_events: Receiver<SalesSnapshot>,
    sort: SortState,
    selected_column: SortKey,
    scroll: usize,
    status: String,
    view: Option<DashboardView>,
    view_key: Option<ViewKey>,
}

impl App {
    fn new(config: DashboardConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut store = SalesStore::new();
        store.subscribe(move |snap| {
            let _ = tx.send(snap.clone());
        });

        Self {
            repo: SalesRepository::new(config.source.clone()),
            sort: config.sort,
            selected_column: SortKey::WeekEnding,
            scroll: 0,
            status: "Loading...".to_string(),
            view: None,
            view_key: None,
            store,
            store_events: rx,
            config,
        }
    }

    /// Fetch (or re-fetch) the dataset. Failures stay in the store and the
    /// status line; the dashboard keeps running.
    fn load(&mut self) {
        if let Err(err) = self.store.load_from(&self.repo) {
            tracing::warn!(error = %err, "sales dataset load failed");
        }
        self.drain_store_events();
        self.scroll = 0;
        self.refresh_view();
    }

    fn drain_store_events(&mut self) {
        while let Ok(snap) = self.store_events.try_recv() {
            self.status = match snap.status {
                LoadStatus::Idle => "Idle.".to_string(),
                LoadStatus::Loading => format!("Loading {}...", self.repo.source().describe()),
                LoadStatus::Succeeded => format!("Loaded {} weeks.", snap.sales.len()),
                LoadStatus::Failed => format!(
                    "Load failed: {}",
                    snap.error.as_deref().unwrap_or("unknown error")
                ),
            };
        }
    }

    /// Recompute sorted rows and chart series when their inputs changed.
    fn refresh_view(&mut self) {
        let key = (self.store.revision(), self.sort, self.config.window);
        if self.view_key == Some(key) {
            return;
        }
        match build_view(&self.store.snapshot(), self.sort, self.config.window) {
            Ok(view) => {
                self.view = Some(view);
                self.view_key = Some(key);
            }
            Err(err) => {
                self.status = err.to_string();
            }
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::terminal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::terminal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply one key press. Returns `true` to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Left => self.selected_column = self.selected_column.prev(),
            KeyCode::Right => self.selected_column = self.selected_column.next(),
            KeyCode::Enter | KeyCode::Char('s') => self.sort_on(self.selected_column),
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                let key = SortKey::from_column(index);
                self.selected_column = key;
                self.sort_on(key);
            }
            KeyCode::Char('c') => {
                self.sort = None;
                self.status = "Sort cleared (dataset order).".to_string();
            }
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = (self.scroll + 1).min(self.max_scroll()),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll = (self.scroll + 10).min(self.max_scroll()),
            KeyCode::Home => self.scroll = 0,
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.config.window = self.config.window.saturating_add(1);
                self.status = format!("Smoothing window: {} weeks", self.config.window);
            }
            KeyCode::Char('-') => {
                if self.config.window > 1 {
                    self.config.window -= 1;
                    self.status = format!("Smoothing window: {} weeks", self.config.window);
                } else {
                    self.status = "Smoothing window must be at least 1.".to_string();
                }
            }
            KeyCode::Char('r') => self.load(),
            _ => {}
        }

        self.refresh_view();
        false
    }

    fn sort_on(&mut self, key: SortKey) {
        let directive = request_sort(self.sort, key);
        self.sort = Some(directive);
        self.scroll = 0;
        self.status = format!(
            "Sorted by {} ({:?}).",
            key.label(),
            directive.direction
        );
    }

    fn max_scroll(&self) -> usize {
        self.view
            .as_ref()
            .map(|v| v.rows.len().saturating_sub(1))
            .unwrap_or(0)
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled("sales", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" | product sales dashboard | "),
            Span::styled(
                format!(
                    "source: {} | window: {} weeks",
                    self.repo.source().describe(),
                    self.config.window
                ),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
            .split(area);

        self.draw_product(frame, columns[0]);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(columns[1]);

        self.draw_chart(frame, rows[0]);
        self.draw_table(frame, rows[1]);
    }

    /// Placeholder text while data is not available.
    fn placeholder(&self) -> Option<Paragraph<'static>> {
        let view = self.view.as_ref();
        match view.map(|v| v.status) {
            Some(LoadStatus::Succeeded) => None,
            Some(LoadStatus::Failed) => {
                let msg = view
                    .and_then(|v| v.error.clone())
                    .unwrap_or_else(|| "unknown error".to_string());
                Some(
                    Paragraph::new(format!("Failed to load sales data: {msg}"))
                        .style(Style::default().fg(Color::Red))
                        .wrap(Wrap { trim: true }),
                )
            }
            _ => Some(Paragraph::new("Loading...").style(Style::default().fg(Color::Yellow))),
        }
    }

    fn draw_product(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Product").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let product = self.view.as_ref().and_then(|v| v.product.clone());
        let Some(product) = product else {
            if let Some(p) = self.placeholder() {
                frame.render_widget(p, inner);
            }
            return;
        };

        let gray = Style::default().fg(Color::Gray);
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(Span::styled(
            product.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        if !product.subtitle.is_empty() {
            lines.push(Line::from(Span::styled(product.subtitle.clone(), gray)));
        }
        lines.push(Line::raw(""));
        if !product.brand.is_empty() {
            lines.push(Line::from(format!("Brand: {}", product.brand)));
        }
        if !product.retailer.is_empty() {
            lines.push(Line::from(format!("Retailer: {}", product.retailer)));
        }
        if !product.tags.is_empty() {
            lines.push(Line::raw(""));
            let mut spans = Vec::new();
            for tag in &product.tags {
                spans.push(Span::styled(format!("[{tag}]"), gray));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        let p = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true });
        frame.render_widget(p, inner);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Retail Sales").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(view) = self.view.as_ref().filter(|v| !v.chart.is_empty()) else {
            if let Some(p) = self.placeholder() {
                frame.render_widget(p, inner);
            }
            return;
        };

        let (retail, wholesale, x_bounds, y_bounds) = chart_series(view);

        let chart_rect = Rect {
            height: inner.height.saturating_sub(1),
            ..inner
        };
        let widget = SalesPlottersChart {
            retail: &retail,
            wholesale: &wholesale,
            x_bounds,
            y_bounds,
        };
        frame.render_widget(widget, chart_rect);

        if inner.height > 1 {
            let tick_row = Rect {
                y: inner.y + inner.height - 1,
                height: 1,
                ..inner
            };
            draw_month_ticks(frame, tick_row, &view.chart.labels);
        }
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Sales").borders(Borders::ALL);

        let Some(view) = self.view.as_ref().filter(|v| v.status == LoadStatus::Succeeded) else {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            if let Some(p) = self.placeholder() {
                frame.render_widget(p, inner);
            }
            return;
        };

        let header = Row::new(SortKey::ALL.iter().map(|&key| {
            let mut style = Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD);
            if key == self.selected_column {
                style = style.fg(Color::Black).bg(Color::White);
            }
            let line = Line::from(column_header(view.sort, key).to_uppercase());
            let line = if key == SortKey::WeekEnding {
                line
            } else {
                line.alignment(Alignment::Right)
            };
            Cell::from(line).style(style)
        }));

        let visible = area.height.saturating_sub(3) as usize;
        let body = view.rows.iter().skip(self.scroll).take(visible).map(|row| {
            let cells = format_row(row);
            Row::new(cells.into_iter().enumerate().map(|(i, text)| {
                let line = Line::from(text);
                if i == 0 {
                    Cell::from(line)
                } else {
                    Cell::from(line.alignment(Alignment::Right))
                }
            }))
        });

        let widths = [
            Constraint::Length(14),
            Constraint::Min(16),
            Constraint::Min(18),
            Constraint::Length(14),
            Constraint::Min(19),
        ];
        let table = Table::new(body, widths)
            .header(header)
            .block(block)
            .column_spacing(2);
        frame.render_widget(table, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ column  Enter/s sort  1-5 sort col  c clear  ↑/↓ scroll  +/- window  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Build chart series for Plotters.
///
/// X is the record index; y starts at zero like the web dashboard's chart.
fn chart_series(view: &DashboardView) -> (Vec<(f64, f64)>, Vec<(f64, f64)>, [f64; 2], [f64; 2]) {
    let indexed = |values: &[f64]| -> Vec<(f64, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (i as f64, v))
            .collect()
    };
    let retail = indexed(&view.chart.retail);
    let wholesale = indexed(&view.chart.wholesale);

    let n = view.chart.len();
    let x_bounds = if n > 1 { [0.0, (n - 1) as f64] } else { [0.0, 1.0] };

    let y_max = view
        .chart
        .value_range()
        .map(|(_, hi)| hi)
        .filter(|hi| *hi > 0.0)
        .unwrap_or(1.0);
    let y_bounds = [0.0, y_max * 1.05];

    (retail, wholesale, x_bounds, y_bounds)
}

/// Index and label of the first record of each month.
fn month_ticks(labels: &[String]) -> Vec<(usize, String)> {
    let mut out: Vec<(usize, String)> = Vec::new();
    for (i, label) in labels.iter().enumerate() {
        let tick = format_month_tick(label);
        if out.last().map(|(_, prev)| prev != &tick).unwrap_or(true) {
            out.push((i, tick));
        }
    }
    out
}

fn draw_month_ticks(frame: &mut ratatui::Frame<'_>, row: Rect, labels: &[String]) {
    let n = labels.len();
    if n == 0 || row.width < 4 {
        return;
    }
    let style = Style::default().fg(Color::Gray);
    let span = (row.width - 1) as f64;

    let mut next_free = row.x;
    for (i, tick) in month_ticks(labels) {
        let u = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
        let x = row.x + (span * u).round() as u16;
        let width = tick.chars().count() as u16;
        let start = x.saturating_sub(width / 2).max(next_free);
        if start + width > row.x + row.width {
            break;
        }
        frame.render_widget(
            Paragraph::new(tick).style(style),
            Rect {
                x: start,
                y: row.y,
                width,
                height: 1,
            },
        );
        next_free = start + width + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DataSource, SortDirection, SortDirective};

    fn loaded_app() -> App {
        let mut app = App::new(DashboardConfig {
            source: DataSource::Bundled,
            ..DashboardConfig::default()
        });
        app.load();
        app
    }

    #[test]
    fn loads_and_reports_status() {
        let app = loaded_app();
        assert_eq!(app.status, "Loaded 52 weeks.");
        let view = app.view.as_ref().unwrap();
        assert_eq!(view.rows.len(), 52);
        assert_eq!(view.chart.window, 4);
    }

    #[test]
    fn column_keys_follow_toggle_protocol() {
        let mut app = loaded_app();

        app.handle_key(KeyCode::Char('2'));
        assert_eq!(app.sort, Some(SortDirective::ascending(SortKey::RetailSales)));
        app.handle_key(KeyCode::Char('2'));
        assert_eq!(app.sort, Some(SortDirective::descending(SortKey::RetailSales)));
        let rows = &app.view.as_ref().unwrap().rows;
        assert!(rows.windows(2).all(|w| w[0].retail_sales >= w[1].retail_sales));

        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.selected_column, SortKey::UnitsSold);
        app.handle_key(KeyCode::Enter);
        assert_eq!(
            app.sort.map(|d| (d.key, d.direction)),
            Some((SortKey::UnitsSold, SortDirection::Ascending))
        );

        app.handle_key(KeyCode::Char('c'));
        assert_eq!(app.sort, None);
    }

    #[test]
    fn window_never_drops_below_one() {
        let mut app = loaded_app();
        for _ in 0..10 {
            app.handle_key(KeyCode::Char('-'));
        }
        assert_eq!(app.config.window, 1);
        assert_eq!(app.view.as_ref().unwrap().chart.window, 1);
        app.handle_key(KeyCode::Char('+'));
        assert_eq!(app.config.window, 2);
    }

    #[test]
    fn failed_load_keeps_running() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(DashboardConfig {
            source: DataSource::File(dir.path().join("absent.json")),
            ..DashboardConfig::default()
        });
        app.load();
        assert!(app.status.starts_with("Load failed:"));
        assert_eq!(app.view.as_ref().map(|v| v.status), Some(LoadStatus::Failed));
        assert!(!app.handle_key(KeyCode::Down));
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn month_ticks_mark_first_week_of_each_month() {
        let labels: Vec<String> = ["2017-01-01", "2017-01-08", "2017-02-05", "2017-02-12", "2017-03-05"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            month_ticks(&labels),
            vec![
                (0, "JAN".to_string()),
                (2, "FEB".to_string()),
                (4, "MAR".to_string())
            ]
        );
    }
}
