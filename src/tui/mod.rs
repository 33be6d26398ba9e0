//! Ratatui-based terminal UI.
//!
//! Three tabs over the same analysis run used by `ptrend analyze`:
//! - Data: table preview and descriptive statistics
//! - Trend: one line per entity across the year columns
//! - Regression: coefficients, metrics and predicted vs actual

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
};

use crate::app::pipeline::{AnalysisRun, run_analysis};
use crate::domain::{AnalysisConfig, TrendSeries};
use crate::error::AppError;
use crate::fit::RegressionOutput;

mod plotters_chart;

use plotters_chart::{ChartSeries, ProductionChart};

/// High-contrast palette for trend lines, cycled per entity.
const PALETTE: [(u8, u8, u8); 10] = [
    (0, 255, 255),
    (255, 215, 0),
    (0, 255, 0),
    (255, 105, 180),
    (135, 206, 250),
    (255, 165, 0),
    (186, 85, 211),
    (240, 240, 240),
    (144, 238, 144),
    (255, 99, 71),
];

const PREDICTED_COLOR: RGBColor = RGBColor(30, 144, 255);
const ACTUAL_COLOR: RGBColor = RGBColor(255, 0, 0);
const IDENTITY_COLOR: RGBColor = RGBColor(128, 128, 128);

/// Start the TUI on `path`.
pub fn run(path: PathBuf, config: AnalysisConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(path, config);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Data,
    Trend,
    Regression,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Data, Tab::Trend, Tab::Regression];

    fn index(self) -> usize {
        match self {
            Tab::Data => 0,
            Tab::Trend => 1,
            Tab::Regression => 2,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Tab::Data => "Data",
            Tab::Trend => "Trend",
            Tab::Regression => "Regression",
        }
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

struct App {
    path: PathBuf,
    config: AnalysisConfig,
    run: Option<AnalysisRun>,
    tab: Tab,
    scroll: u16,
    status: String,
}

impl App {
    fn new(path: PathBuf, config: AnalysisConfig) -> Self {
        let mut app = Self {
            path,
            config,
            run: None,
            tab: Tab::Data,
            scroll: 0,
            status: String::new(),
        };
        app.reload();
        app
    }

    /// Re-read the file. Every load starts from a fresh run; nothing carries over.
    fn reload(&mut self) {
        self.scroll = 0;
        match run_analysis(&self.path, &self.config) {
            Ok(run) => {
                self.status = load_status(&run);
                info!("tui loaded {}", self.path.display());
                self.run = Some(run);
            }
            Err(err) => {
                self.status = err.to_string();
                self.run = None;
            }
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
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

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::Right => {
                self.tab = self.tab.next();
                self.scroll = 0;
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.tab = self.tab.prev();
                self.scroll = 0;
            }
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
        false
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_tabs(frame, chunks[1]);
        match self.tab {
            Tab::Data => self.draw_data(frame, chunks[2]),
            Tab::Trend => self.draw_trend(frame, chunks[2]),
            Tab::Regression => self.draw_regression(frame, chunks[2]),
        }
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let source = self
            .run
            .as_ref()
            .map(|r| r.source.clone())
            .unwrap_or_else(|| self.path.display().to_string());

        let mut lines = vec![Line::from(vec![
            Span::styled("ptrend", Style::default().fg(Color::Cyan)),
            Span::raw(" - linear regression for production data | "),
            Span::styled(source, Style::default().add_modifier(Modifier::BOLD)),
        ])];

        let summary = match self.run.as_ref().map(|r| (r, &r.regression)) {
            Some((run, Ok(output))) => format!(
                "rows={} | target={} | MSE={:.4} | R2={:.4}",
                run.table.n_rows(),
                output.target,
                output.metrics.mse,
                output.metrics.r2
            ),
            Some((run, Err(_))) => format!("rows={} | regression unavailable", run.table.n_rows()),
            None => "no data loaded".to_string(),
        };
        lines.push(Line::from(Span::styled(summary, Style::default().fg(Color::Gray))));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White));
        frame.render_widget(tabs, area);
    }

    fn draw_data(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let text = match &self.run {
            Some(run) => crate::report::format_descriptive(run),
            None => crate::cli::picker::IDLE_PROMPT.to_string(),
        };
        let p = Paragraph::new(text)
            .scroll((self.scroll, 0))
            .block(Block::default().title("Preview & statistics").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_trend(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = match &self.run {
            Some(run) => format!("Production trend {}", run.source),
            None => "Production trend".to_string(),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            frame.render_widget(waiting(), inner);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(inner);

        let years: Vec<String> = run.table.columns().iter().map(|c| c.name.clone()).collect();
        let (lines, x_bounds, y_bounds) = trend_chart_series(&run.trend, &years);
        let widget = ProductionChart {
            lines: &lines,
            dots: &[],
            x_bounds,
            y_bounds,
            x_label: "year",
            y_label: "production",
            x_categories: Some(&years),
            fmt_y: fmt_axis_value,
        };
        frame.render_widget(widget, chunks[0]);

        let legend: Vec<Span> = run
            .trend
            .iter()
            .enumerate()
            .flat_map(|(idx, s)| {
                let (r, g, b) = palette(idx);
                [
                    Span::styled("■ ", Style::default().fg(Color::Rgb(r, g, b))),
                    Span::raw(format!("{}  ", s.entity)),
                ]
            })
            .collect();
        let legend = Paragraph::new(Line::from(legend)).wrap(Wrap { trim: true });
        frame.render_widget(legend, chunks[1]);
    }

    fn draw_regression(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        let (text, output) = match self.run.as_ref().map(|r| &r.regression) {
            Some(Ok(output)) => (crate::report::format_regression(output), Some(output)),
            Some(Err(err)) => (format!("Regression skipped: {err}"), None),
            None => (crate::cli::picker::IDLE_PROMPT.to_string(), None),
        };
        let p = Paragraph::new(text)
            .scroll((self.scroll, 0))
            .block(Block::default().title("Model").borders(Borders::ALL));
        frame.render_widget(p, chunks[0]);

        let block = Block::default()
            .title(Line::from(vec![
                Span::raw("Predicted vs Actual  "),
                Span::styled("● predicted ", Style::default().fg(Color::Rgb(30, 144, 255))),
                Span::styled("● actual", Style::default().fg(Color::Red)),
            ]))
            .borders(Borders::ALL);
        let inner = block.inner(chunks[1]);
        frame.render_widget(block, chunks[1]);
        frame.render_widget(Clear, inner);

        let Some(output) = output else {
            frame.render_widget(waiting(), inner);
            return;
        };

        let (lines, dots, x_bounds, y_bounds) = scatter_chart_series(output);
        let widget = ProductionChart {
            lines: &lines,
            dots: &dots,
            x_bounds,
            y_bounds,
            x_label: "actual",
            y_label: "predicted",
            x_categories: None,
            fmt_y: fmt_axis_value,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab/←/→ switch  ↑/↓ scroll  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Status line after a successful load.
fn load_status(run: &AnalysisRun) -> String {
    match run.regression_error() {
        None => format!("Loaded {} rows from {}", run.table.n_rows(), run.source),
        Some(err) if err.is_regression_only() => format!("Regression skipped: {err}"),
        Some(err) => format!("Check --id-column/--target: {err}"),
    }
}

fn waiting() -> Paragraph<'static> {
    Paragraph::new("No data to chart.").style(Style::default().fg(Color::Yellow))
}

fn palette(idx: usize) -> (u8, u8, u8) {
    PALETTE[idx % PALETTE.len()]
}

/// Build one line series per entity; x is the year's column position, missing values open a gap.
///
/// An entity listed on several rows gets one line per row: the k-th point of a
/// given year belongs to the entity's k-th row.
fn trend_chart_series(trend: &[TrendSeries], years: &[String]) -> (Vec<ChartSeries>, [f64; 2], [f64; 2]) {
    let mut out = Vec::with_capacity(trend.len());
    let mut values = Vec::new();

    for (idx, series) in trend.iter().enumerate() {
        let (r, g, b) = palette(idx);

        let mut seen = vec![0usize; years.len()];
        let mut rows: Vec<Vec<Option<f64>>> = Vec::new();
        for (year, value) in &series.points {
            let Some(x) = years.iter().position(|y| y == year) else {
                continue;
            };
            let k = seen[x];
            seen[x] += 1;
            if rows.len() <= k {
                rows.resize(k + 1, vec![None; years.len()]);
            }
            rows[k][x] = (*value).filter(|v| v.is_finite());
        }

        let mut segments: Vec<Vec<(f64, f64)>> = Vec::new();
        for row in rows {
            let mut current: Vec<(f64, f64)> = Vec::new();
            for (x, value) in row.into_iter().enumerate() {
                match value {
                    Some(v) => {
                        current.push((x as f64, v));
                        values.push(v);
                    }
                    None => {
                        if !current.is_empty() {
                            segments.push(std::mem::take(&mut current));
                        }
                    }
                }
            }
            if !current.is_empty() {
                segments.push(current);
            }
        }
        out.push(ChartSeries {
            segments,
            color: RGBColor(r, g, b),
        });
    }

    // A single year still gets a non-empty x range.
    let x_max = years.len().saturating_sub(1).max(1) as f64;
    let x_bounds = [-0.05 * x_max, x_max * 1.05];
    (out, x_bounds, padded_bounds(&values))
}

/// Identity line, predicted dots and actual dots, all plotted against the actual value.
fn scatter_chart_series(output: &RegressionOutput) -> (Vec<ChartSeries>, Vec<ChartSeries>, [f64; 2], [f64; 2]) {
    let predicted: Vec<(f64, f64)> = output
        .actual
        .iter()
        .zip(&output.predicted)
        .map(|(&a, &p)| (a, p))
        .collect();
    let actual: Vec<(f64, f64)> = output.actual.iter().map(|&a| (a, a)).collect();

    let x_bounds = padded_bounds(&output.actual);
    let all: Vec<f64> = output.actual.iter().chain(&output.predicted).copied().collect();
    let y_bounds = padded_bounds(&all);

    let lo = x_bounds[0].max(y_bounds[0]);
    let hi = x_bounds[1].min(y_bounds[1]);
    let identity = ChartSeries::solid(vec![(lo, lo), (hi, hi)], IDENTITY_COLOR);

    (
        vec![identity],
        vec![
            ChartSeries::solid(predicted, PREDICTED_COLOR),
            ChartSeries::solid(actual, ACTUAL_COLOR),
        ],
        x_bounds,
        y_bounds,
    )
}

/// Finite min/max with 5% padding; falls back to `[0, 1]`.
fn padded_bounds(values: &[f64]) -> [f64; 2] {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for &v in values.iter().filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    if hi <= lo {
        lo -= 0.5;
        hi += 0.5;
    }
    let pad = ((hi - lo) * 0.05).max(1e-12);
    [lo - pad, hi + pad]
}

fn fmt_axis_value(v: f64) -> String {
    if v.abs() >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if v.abs() >= 1e3 {
        format!("{:.0}k", v / 1e3)
    } else {
        format!("{v:.1}")
    }
}
