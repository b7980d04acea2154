use anyhow::Result;
use bike_dashboard::{
    ChartId, ChartKind, ChartSeries, DailyRecord, DashboardService, Dataset, HourlyRecord,
    PageWindow, RentalRecord, DASHBOARD_TITLE, KEY_INSIGHTS, WELCOME,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset as ChartDataset,
        GraphType, Paragraph, Row, Table, Wrap,
    },
    Frame, Terminal,
};
use std::io;

/// Number of pages skipped by PageUp/PageDown
const PAGE_JUMP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    DataOverview,
    Visualizations,
    KeyInsights,
}

impl View {
    pub const ALL: [View; 4] = [
        View::Home,
        View::DataOverview,
        View::Visualizations,
        View::KeyInsights,
    ];

    pub fn next(&self) -> Self {
        match self {
            View::Home => View::DataOverview,
            View::DataOverview => View::Visualizations,
            View::Visualizations => View::KeyInsights,
            View::KeyInsights => View::Home,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            View::Home => View::KeyInsights,
            View::DataOverview => View::Home,
            View::Visualizations => View::DataOverview,
            View::KeyInsights => View::Visualizations,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            View::Home => "Home",
            View::DataOverview => "Data Overview",
            View::Visualizations => "Visualizations",
            View::KeyInsights => "Key Insights",
        }
    }
}

pub struct App<'a> {
    pub service: &'a DashboardService,
    pub view: View,
    /// Table that paging keys act on in the Data Overview
    pub focus: Dataset,
    pub daily_page: usize,
    pub hourly_page: usize,
}

impl<'a> App<'a> {
    pub fn new(service: &'a DashboardService) -> Self {
        Self {
            service,
            view: View::Home,
            focus: Dataset::Daily,
            daily_page: 1,
            hourly_page: 1,
        }
    }

    pub fn next_view(&mut self) {
        self.view = self.view.next();
    }

    pub fn previous_view(&mut self) {
        self.view = self.view.previous();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Dataset::Daily => Dataset::Hourly,
            Dataset::Hourly => Dataset::Daily,
        };
    }

    pub fn current_page(&self) -> usize {
        match self.focus {
            Dataset::Daily => self.daily_page,
            Dataset::Hourly => self.hourly_page,
        }
    }

    /// Set the focused table's page, clamped to its valid range
    pub fn set_page(&mut self, page: usize) {
        let page = self.service.clamp_page(self.focus, page);
        match self.focus {
            Dataset::Daily => self.daily_page = page,
            Dataset::Hourly => self.hourly_page = page,
        }
    }

    pub fn next_page(&mut self) {
        self.set_page(self.current_page().saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.current_page().saturating_sub(1));
    }

    pub fn jump_forward(&mut self) {
        self.set_page(self.current_page().saturating_add(PAGE_JUMP));
    }

    pub fn jump_back(&mut self) {
        self.set_page(self.current_page().saturating_sub(PAGE_JUMP));
    }

    pub fn first_page(&mut self) {
        self.set_page(1);
    }

    pub fn last_page(&mut self) {
        self.set_page(self.service.page_count(self.focus));
    }

    /// Apply one key press. Returns false when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => self.previous_view(),
            KeyCode::Tab => self.next_view(),
            KeyCode::BackTab => self.previous_view(),
            KeyCode::Char('1') => self.view = View::Home,
            KeyCode::Char('2') => self.view = View::DataOverview,
            KeyCode::Char('3') => self.view = View::Visualizations,
            KeyCode::Char('4') => self.view = View::KeyInsights,
            _ if self.view != View::DataOverview => {}
            KeyCode::Up | KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('k') => {
                self.toggle_focus()
            }
            KeyCode::Right | KeyCode::Char('l') => self.next_page(),
            KeyCode::Left | KeyCode::Char('h') => self.previous_page(),
            KeyCode::PageDown => self.jump_forward(),
            KeyCode::PageUp => self.jump_back(),
            KeyCode::Home => self.first_page(),
            KeyCode::End => self.last_page(),
            _ => {}
        }
        true
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "Dashboard loop failed");
        return Err(err.into());
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            // Windows reports both press and release
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.view {
        View::Home => render_home(f, chunks[1]),
        View::DataOverview => render_overview(f, chunks[1], app),
        View::Visualizations => render_visualizations(f, chunks[1], app),
        View::KeyInsights => render_insights(f, chunks[1]),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, view) in View::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }
        let style = if *view == app.view {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(format!("{} {}", i + 1, view.title()), style));
    }

    let header = Paragraph::new(Line::from(tab_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" 🚴 {} ", DASHBOARD_TITLE)),
    );

    f.render_widget(header, area);
}

fn render_home(f: &mut Frame, area: Rect) {
    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Welcome to the Bike Sharing Data Analysis Dashboard",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    content.extend(WELCOME.iter().map(|line| Line::from(format!("  {}", line))));

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Home "));

    f.render_widget(paragraph, area);
}

// ============================================================================
// Data Overview
// ============================================================================

fn render_overview(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(42),
            Constraint::Percentage(42),
            Constraint::Min(4),
        ])
        .split(area);

    let daily = app.service.daily_page(app.daily_page);
    render_daily_table(f, chunks[0], &daily, app.focus == Dataset::Daily);

    let hourly = app.service.hourly_page(app.hourly_page);
    render_hourly_table(f, chunks[1], &hourly, app.focus == Dataset::Hourly);

    let overview = app.service.overview();
    let info = vec![
        Line::from(vec![
            Span::styled("Total Daily Records: ", Style::default().fg(Color::Cyan)),
            Span::raw(overview.daily_records.to_string()),
            Span::raw("   "),
            Span::styled("Total Hourly Records: ", Style::default().fg(Color::Cyan)),
            Span::raw(overview.hourly_records.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Daily columns: ", Style::default().fg(Color::Cyan)),
            Span::styled(overview.daily_columns.join(", "), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            Span::styled("Hourly columns: ", Style::default().fg(Color::Cyan)),
            Span::styled(overview.hourly_columns.join(", "), Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let paragraph = Paragraph::new(info)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Dataset "));
    f.render_widget(paragraph, chunks[2]);
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
    let cells = titles.iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    Row::new(cells).style(Style::default().bg(Color::DarkGray)).height(1)
}

fn table_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused { Color::Yellow } else { Color::White };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
}

fn window_title<R>(name: &str, window: &PageWindow<'_, R>) -> String {
    format!(
        " {} Data - Page {}/{} ({} rows) ",
        name,
        window.page,
        window.total_pages.max(1),
        window.total_rows
    )
}

/// Leading cells shared by both tables: row number, date, season, weather
fn common_cells<R: RentalRecord>(row_number: String, record: &R) -> Vec<Cell<'static>> {
    vec![
        Cell::from(row_number),
        Cell::from(record.date().unwrap_or("-").to_string()),
        Cell::from(record.season().name()),
        Cell::from(record.weather().name()),
    ]
}

fn count_cells<R: RentalRecord>(record: &R) -> Vec<Cell<'static>> {
    vec![
        Cell::from(record.casual().to_string()),
        Cell::from(record.registered().to_string()),
        Cell::from(record.total().to_string()).style(Style::default().fg(Color::Green)),
    ]
}

fn render_daily_table(f: &mut Frame, area: Rect, window: &PageWindow<'_, DailyRecord>, focused: bool) {
    let rows = window.rows.iter().enumerate().map(|(i, record)| {
        let number = record
            .instant
            .clone()
            .unwrap_or_else(|| (window.offset() + i + 1).to_string());
        let mut cells = common_cells(number, record);
        cells.extend(count_cells(record));
        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(21),
            Constraint::Length(8),
            Constraint::Length(11),
            Constraint::Length(8),
        ],
    )
    .header(header_row(&["#", "Date", "Season", "Weather", "Casual", "Registered", "Total"]))
    .block(table_block(window_title("Daily", window), focused));

    f.render_widget(table, area);
}

fn render_hourly_table(
    f: &mut Frame,
    area: Rect,
    window: &PageWindow<'_, HourlyRecord>,
    focused: bool,
) {
    let rows = window.rows.iter().enumerate().map(|(i, record)| {
        let number = record
            .instant
            .clone()
            .unwrap_or_else(|| (window.offset() + i + 1).to_string());
        let mut cells = common_cells(number, record);
        cells.insert(2, Cell::from(format!("{:02}:00", record.hr)));
        cells.extend(count_cells(record));
        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Length(12),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(21),
            Constraint::Length(8),
            Constraint::Length(11),
            Constraint::Length(8),
        ],
    )
    .header(header_row(&[
        "#", "Date", "Hour", "Season", "Weather", "Casual", "Registered", "Total",
    ]))
    .block(table_block(window_title("Hourly", window), focused));

    f.render_widget(table, area);
}

// ============================================================================
// Visualizations
// ============================================================================

fn render_visualizations(f: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[1]);

    let panels = [
        (top[0], Color::Green),
        (top[1], Color::Blue),
        (bottom[0], Color::Cyan),
        (bottom[1], Color::Rgb(255, 165, 0)),
    ];

    for (series, (area, color)) in app.service.charts().iter().zip(panels) {
        match series.kind {
            ChartKind::Bar => render_bar_chart(f, area, series, color),
            ChartKind::Line => render_line_chart(f, area, series, color),
        }
    }
}

fn chart_block(series: &ChartSeries) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" {} ", series.title))
}

fn render_bar_chart(f: &mut Frame, area: Rect, series: &ChartSeries, color: Color) {
    let bars: Vec<Bar> = series
        .points
        .iter()
        .map(|p| {
            Bar::default()
                .value(p.value.round() as u64)
                .label(Line::from(p.label.clone()))
                .text_value(format!("{:.0}", p.value))
        })
        .collect();

    // Fill the panel width, leaving a one-column gap between bars
    let count = bars.len().max(1) as u16;
    let bar_width = (area.width.saturating_sub(2) / count).saturating_sub(1).max(1);

    let chart = BarChart::default()
        .block(chart_block(series))
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(color))
        .value_style(Style::default().fg(Color::Black).bg(color));

    f.render_widget(chart, area);
}

fn render_line_chart(f: &mut Frame, area: Rect, series: &ChartSeries, color: Color) {
    let data: Vec<(f64, f64)> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (p.label.parse().unwrap_or(i as f64), p.value))
        .collect();

    let y_max = (series.max_value() * 1.1).max(1.0);

    let datasets = vec![ChartDataset::default()
        .name(series.y_label)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&data)];

    let chart = Chart::new(datasets)
        .block(chart_block(series))
        .x_axis(
            Axis::default()
                .title(series.x_label)
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, 23.0])
                .labels(["0", "6", "12", "18", "23"].iter().map(|l| Span::raw(*l)).collect()),
        )
        .y_axis(
            Axis::default()
                .title(series.y_label)
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{:.0}", y_max / 2.0)),
                    Span::raw(format!("{:.0}", y_max)),
                ]),
        );

    f.render_widget(chart, area);
}

// ============================================================================
// Key Insights
// ============================================================================

fn render_insights(f: &mut Frame, area: Rect) {
    let mut content = vec![Line::from("")];
    for insight in KEY_INSIGHTS {
        content.push(Line::from(vec![
            Span::raw("  • "),
            Span::styled(
                insight.headline,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw(": "),
            Span::raw(insight.detail),
        ]));
        content.push(Line::from(""));
    }

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" 🔑 Key Insights "));

    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![Span::styled(
        format!(" {} ", app.view.title()),
        Style::default().fg(Color::Cyan),
    )];

    if app.view == View::DataOverview {
        let name = match app.focus {
            Dataset::Daily => "Daily",
            Dataset::Hourly => "Hourly",
        };
        status_spans.push(Span::raw("| "));
        status_spans.push(Span::styled(
            format!("{} page {}/{} ", name, app.current_page(), app.service.page_count(app.focus).max(1)),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw("| "));
        status_spans.push(Span::styled("←/→", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Page | "));
        status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Table | "));
        status_spans.push(Span::styled("PgUp/PgDn", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" ±10 | "));
    } else if app.view == View::Visualizations {
        status_spans.push(Span::raw("| "));
        if let Some(peak) = app.service.chart(ChartId::Hourly).peak() {
            status_spans.push(Span::styled(
                format!("Peak hour {} ({:.0} rentals) ", peak.label, peak.value),
                Style::default().fg(Color::Green),
            ));
            status_spans.push(Span::raw("| "));
        }
    } else {
        status_spans.push(Span::raw("| "));
    }

    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" View | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
