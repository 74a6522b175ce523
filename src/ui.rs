use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use park_biodiversity::{AnalysisReport, ChartSpec, CorrelationReport};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;

const SERIES_COLORS: [Color; 3] = [Color::Cyan, Color::LightRed, Color::Yellow];

pub struct App {
    pub charts: Vec<ChartSpec>,
    pub correlation: CorrelationReport,
    pub current: usize,
}

impl App {
    pub fn new(report: &AnalysisReport) -> Self {
        Self {
            charts: report.charts(),
            correlation: report.correlation.clone(),
            current: 0,
        }
    }

    pub fn next_chart(&mut self) {
        if !self.charts.is_empty() {
            self.current = (self.current + 1) % self.charts.len();
        }
    }

    pub fn previous_chart(&mut self) {
        if !self.charts.is_empty() {
            self.current = (self.current + self.charts.len() - 1) % self.charts.len();
        }
    }

    pub fn current_chart(&self) -> Option<&ChartSpec> {
        self.charts.get(self.current)
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_chart();
                    } else {
                        app.next_chart();
                    }
                }
                KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.previous_chart(),
                KeyCode::Right | KeyCode::Char('l') => app.next_chart(),
                KeyCode::Char(c) => {
                    if let Some(index) = c.to_digit(10).and_then(|d| d.checked_sub(1)) {
                        if (index as usize) < app.charts.len() {
                            app.current = index as usize;
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Chart tabs
            Constraint::Min(0),    // Chart
            Constraint::Length(3), // Correlation + keys
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    if let Some(chart) = app.current_chart() {
        render_chart(f, chunks[1], chart);
    }
    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();
    for (i, chart) in app.charts.iter().enumerate() {
        let style = if i == app.current {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, chart.x_label), style));
        spans.push(Span::raw(" "));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Park Biodiversity "));
    f.render_widget(header, area);
}

fn render_chart(f: &mut Frame, area: Rect, chart: &ChartSpec) {
    let mut barchart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} · {} by {} ", chart.title, chart.y_label, chart.x_label)),
        )
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .group_gap(if chart.series.len() > 1 { 1 } else { 0 });

    for (i, category) in chart.categories.iter().enumerate() {
        let bars: Vec<Bar> = chart
            .series
            .iter()
            .enumerate()
            .map(|(s, series)| {
                let value = series.values.get(i).copied().unwrap_or(0);
                let mut bar = Bar::default()
                    .value(value)
                    .text_value(value.to_string())
                    .style(Style::default().fg(SERIES_COLORS[s % SERIES_COLORS.len()]));
                if s == 0 {
                    bar = bar.label(Line::from(truncate(category, 28)));
                }
                bar
            })
            .collect();
        barchart = barchart.data(BarGroup::default().bars(&bars));
    }

    f.render_widget(barchart, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled("ρ ", Style::default().fg(Color::Yellow)),
        Span::raw(format!("{:.4}", app.correlation.coefficient)),
        Span::styled("  p ", Style::default().fg(Color::Yellow)),
        Span::raw(format!("{:.4e}", app.correlation.p_value)),
    ];

    if app.correlation.excluded_rows() > 0 {
        spans.push(Span::styled(
            format!("  ({} rows unranked)", app.correlation.excluded_rows()),
            Style::default().fg(Color::Red),
        ));
    }

    if let Some(chart) = app.current_chart() {
        if chart.series.len() > 1 {
            for (s, series) in chart.series.iter().enumerate() {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(
                    format!("■ {}", series.name),
                    Style::default().fg(SERIES_COLORS[s % SERIES_COLORS.len()]),
                ));
            }
        }
    }

    spans.push(Span::styled(
        "   Tab/←/→ switch chart · 1-5 jump · q quit",
        Style::default().fg(Color::DarkGray),
    ));

    let status = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
