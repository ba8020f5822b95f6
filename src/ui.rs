use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState,
    },
    Frame, Terminal,
};
use std::io;

use monthly_budget::forms::{ExpenseForm, FormField, StatusKind};
use monthly_budget::{
    format_money, month_label, share, CategorySlice, Dashboard, Expense, KeyValueStore, Mode,
    Outcome, Session, Tracker,
};

pub struct App<S: KeyValueStore> {
    pub tracker: Tracker<S>,
    pub session: Session,
    pub dashboard: Dashboard,
    /// Current-month expenses, largest first, as shown in the table
    pub list: Vec<Expense>,
    pub state: TableState,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(tracker: Tracker<S>) -> Self {
        Self::with_today(tracker, Local::now().date_naive())
    }

    pub fn with_today(tracker: Tracker<S>, today: NaiveDate) -> Self {
        let dashboard = tracker.dashboard(today);
        let list = dashboard.list_view();
        let mut state = TableState::default();
        if !list.is_empty() {
            state.select(Some(0));
        }

        Self {
            tracker,
            session: Session::new(),
            dashboard,
            list,
            state,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.dashboard.today
    }

    /// Re-derive every view from the tracker
    pub fn refresh_at(&mut self, today: NaiveDate) {
        self.dashboard = self.tracker.dashboard(today);
        self.list = self.dashboard.list_view();

        let len = self.list.len();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            None => self.state.select(Some(0)),
            _ => {}
        }
    }

    pub fn refresh(&mut self) {
        self.refresh_at(Local::now().date_naive());
    }

    pub fn selected_expense(&self) -> Option<&Expense> {
        self.state.selected().and_then(|i| self.list.get(i))
    }

    pub fn next(&mut self) {
        let len = self.list.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.list.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Returns `true` when the user asked to quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.session.mode {
            Mode::Idle => return self.handle_idle_key(key),
            Mode::AddingExpense(_) | Mode::Editing(_) => self.handle_expense_form_key(key),
            Mode::SettingIncome(_) => self.handle_income_key(key),
            Mode::ConfirmDelete(_) => self.handle_confirm_key(key),
        }
        false
    }

    fn handle_idle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('a') => self.session.begin_add(self.today()),
            KeyCode::Char('i') => self.session.begin_income(self.tracker.income()),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(expense) = self.selected_expense().cloned() {
                    self.session.begin_edit(&expense);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_expense().map(|e| e.id) {
                    self.session.begin_delete(&self.tracker, id);
                }
            }
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Home => {
                if !self.list.is_empty() {
                    self.state.select(Some(0));
                }
            }
            KeyCode::End => {
                if !self.list.is_empty() {
                    self.state.select(Some(self.list.len() - 1));
                }
            }
            _ => {}
        }
        false
    }

    fn handle_expense_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.session.cancel(),
            KeyCode::Enter => self.submit(),
            code => {
                if let Some(form) = self.session.expense_form_mut() {
                    match code {
                        KeyCode::Tab | KeyCode::Down => form.focus_next(),
                        KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
                        KeyCode::Left if form.focus == FormField::Category => {
                            form.cycle_category(false)
                        }
                        KeyCode::Right if form.focus == FormField::Category => {
                            form.cycle_category(true)
                        }
                        KeyCode::Backspace => form.backspace(),
                        KeyCode::Char(c) => form.input(c),
                        _ => {}
                    }
                }
            }
        }
    }

    fn handle_income_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.session.cancel(),
            KeyCode::Enter => self.submit(),
            code => {
                if let Some(form) = self.session.income_form_mut() {
                    match code {
                        KeyCode::Backspace => form.backspace(),
                        KeyCode::Char(c) => form.input(c),
                        _ => {}
                    }
                }
            }
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => self.submit(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.session.cancel(),
            _ => {}
        }
    }

    fn submit(&mut self) {
        let edited = match &self.session.mode {
            Mode::Editing(edit) => Some(edit.id),
            _ => None,
        };

        let outcome = self.session.submit(&mut self.tracker);
        self.refresh_at(self.today());

        // Keep the cursor on the edited row after the list re-sorts
        if let (Outcome::Changed, Some(id)) = (outcome, edited) {
            if let Some(i) = self.list.iter().position(|e| e.id == id) {
                self.state.select(Some(i));
            }
        }
    }
}

pub fn run_ui<S: KeyValueStore>(app: &mut App<S>) -> Result<()> {
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

    loop_result(res)
}

/// Surface a loop failure to the caller once the terminal is restored
fn loop_result(res: io::Result<()>) -> Result<()> {
    if let Err(err) = res {
        tracing::error!(error = %err, "dashboard loop failed");
        return Err(anyhow::Error::new(err).context("dashboard loop failed"));
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> io::Result<()> {
    loop {
        app.refresh();
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Length(5),  // Summary cards
            Constraint::Length(14), // Charts
            Constraint::Min(5),     // Expense list
            Constraint::Length(3),  // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_summary_cards(f, chunks[1], app);

    let chart_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);
    render_daily_chart(f, chart_chunks[0], app);
    render_categories(f, chart_chunks[1], app);

    render_table(f, chunks[3], app);
    render_status_bar(f, chunks[4], app);

    match &app.session.mode {
        Mode::Idle => {}
        Mode::AddingExpense(form) => render_expense_form(f, " Add New Expense ", form),
        Mode::Editing(edit) => render_expense_form(f, " Edit Expense ", &edit.form),
        Mode::SettingIncome(form) => render_income_form(f, &form.input),
        Mode::ConfirmDelete(request) => {
            let description = app
                .tracker
                .get(request.id())
                .map(|e| e.description.clone())
                .unwrap_or_default();
            render_confirm_delete(f, &description);
        }
    }
}

fn render_header<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let spans = vec![
        Span::styled(
            "💰 Monthly Budget",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(month_label(app.today()), Style::default().fg(Color::White)),
        Span::raw("  |  "),
        Span::styled(
            format!("{} expenses this month", app.dashboard.month_expenses.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_summary_cards<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let summary = app.dashboard.summary;
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let left_color = if summary.is_overspent() {
        Color::Red
    } else {
        Color::Blue
    };

    let entries = [
        ("My Income", summary.income, Color::Green),
        ("Money Spent This Month", summary.total_spent, Color::Red),
        ("Money Left", summary.money_left, left_color),
    ];

    for (i, (title, value, color)) in entries.iter().enumerate() {
        let card = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", format_money(*value)),
                Style::default().fg(*color).add_modifier(Modifier::BOLD),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(*color))
                .title(format!(" {} ", title)),
        );
        f.render_widget(card, cards[i]);
    }
}

fn render_daily_chart<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" Daily Spending ");

    if app.dashboard.daily.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "  No spending data to display.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let bars: Vec<Bar> = app
        .dashboard
        .daily
        .iter()
        .map(|point| {
            Bar::default()
                .value(point.amount.round().max(1.0) as u64)
                .label(Line::from(point.label()))
                .text_value(format!("{:.0}", point.amount))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(3)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .label_style(Style::default().fg(Color::DarkGray));

    f.render_widget(chart, area);
}

fn render_categories<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" Top Spending Categories ");

    if app.dashboard.categories.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "  No spending data to display.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let total = app.dashboard.summary.total_spent;
    let mut lines = vec![Line::from("")];

    for point in &app.dashboard.categories {
        let color = match point.slice {
            CategorySlice::Category(category) => {
                let (r, g, b) = category.rgb();
                Color::Rgb(r, g, b)
            }
            CategorySlice::Folded => Color::DarkGray,
        };
        let pct = share(point, total);

        lines.push(Line::from(vec![
            Span::styled("  ■ ", Style::default().fg(color)),
            Span::styled(
                format!("{:<18}", point.slice.label()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{:>11}", format_money(point.amount))),
            Span::styled(format!(" {:>3.0}%", pct), Style::default().fg(Color::Yellow)),
        ]));
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(ascii_bar(pct, 30), Style::default().fg(color)),
        ]));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_table<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &mut App<S>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" Expenses This Month ");

    if app.list.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "  You have no expenses recorded this month.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header_cells = ["", "Description", "Category", "Date", "Amount"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.list.iter().map(|expense| {
        let (r, g, b) = expense.category.rgb();
        let color = Color::Rgb(r, g, b);

        let cells = vec![
            Cell::from(expense.category.icon()),
            Cell::from(truncate(&expense.description, 34)),
            Cell::from(expense.category.name()).style(Style::default().fg(color)),
            Cell::from(expense.date.to_string()),
            Cell::from(format_money(expense.amount)).style(Style::default().fg(Color::Red)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(36),
            Constraint::Length(20),
            Constraint::Length(12),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.list.len();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(status) = &app.session.status {
        let color = match status.kind {
            StatusKind::Info => Color::Green,
            StatusKind::Error => Color::Red,
        };
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(status.text.clone(), Style::default().fg(color)));
    }

    for (key, action) in [
        ("a", " Add"),
        ("i", " Income"),
        ("e", " Edit"),
        ("d", " Delete"),
        ("↑/↓", " Nav"),
    ] {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(action));
    }
    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_expense_form(f: &mut Frame, title: &str, form: &ExpenseForm) {
    let area = centered_rect(60, 14, f.size());
    let mut lines = vec![Line::from("")];

    for field in FormField::ORDER {
        let focused = field == form.focus;
        let label_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let mut value = form.value(field);
        if focused {
            value.push_str(if field == FormField::Category { "  ◀ ▶" } else { "▏" });
        }

        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", field.label()), label_style),
            Span::raw(value),
        ]));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "  Tab next field · ←/→ category · Enter save · Esc cancel",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )));

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(title.to_string()),
    );

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn render_income_form(f: &mut Frame, input: &str) {
    let area = centered_rect(50, 7, f.size());
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "  Your Monthly Salary  $ ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{}▏", input)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  Enter set income · Esc cancel",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" Manage Income "),
    );

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn render_confirm_delete(f: &mut Frame, description: &str) {
    let area = centered_rect(56, 7, f.size());
    let lines = vec![
        Line::from(""),
        Line::from("  Are you sure you want to delete this expense?"),
        Line::from(Span::styled(
            format!("  {}", truncate(description, 48)),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" delete · "),
            Span::styled("n", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" keep"),
        ]),
    ];

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Delete Expense "),
    );

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

/// Fixed-size rectangle centered in `area`, clamped to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn ascii_bar(pct: f64, width: usize) -> String {
    let filled = ((pct.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
