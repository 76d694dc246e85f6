use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use parts_pricing::currency::format_display;
use parts_pricing::{CatalogStore, PriceQuote, PricingEngine, RevealController, RevealSettings};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

const MAX_SUGGESTIONS: usize = 50;
const TICK: Duration = Duration::from_millis(250);

pub struct App {
    pub catalog: CatalogStore,
    pub engine: PricingEngine,
    pub input: String,
    pub suggestions: Vec<String>,
    pub list_state: ListState,
    pub selected: Option<String>,
    pub copied: Option<String>,
    pub reveal: RevealController,
    pub detail: Option<PriceQuote>,
}

impl App {
    pub fn new(catalog: CatalogStore, engine: PricingEngine, reveal: RevealSettings) -> Self {
        Self {
            catalog,
            engine,
            input: String::new(),
            suggestions: Vec::new(),
            list_state: ListState::default(),
            selected: None,
            copied: None,
            reveal: RevealController::new(reveal),
            detail: None,
        }
    }

    /// Any edit drops the selection and starts counting again
    fn on_input_changed(&mut self) {
        self.selected = None;
        self.copied = None;
        self.detail = None;
        self.reveal.reset();

        self.suggestions = self
            .catalog
            .search_limited(&self.input, MAX_SUGGESTIONS)
            .into_iter()
            .map(str::to_string)
            .collect();

        if self.suggestions.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
        self.on_input_changed();
    }

    pub fn backspace(&mut self) {
        if self.input.pop().is_some() {
            self.on_input_changed();
        }
    }

    /// Pick the highlighted suggestion
    pub fn select_current(&mut self) {
        let code = match self.list_state.selected().and_then(|i| self.suggestions.get(i)) {
            Some(code) => code.clone(),
            None => return,
        };

        self.input = code.clone();
        self.selected = Some(code);
        self.suggestions.clear();
        self.list_state.select(None);
        self.detail = None;
        self.reveal.reset();
    }

    /// Copy action on the selected part; may reveal the breakdown
    pub fn copy(&mut self, now: Instant) {
        let code = match &self.selected {
            Some(code) => code.clone(),
            None => return,
        };

        self.copied = Some(code.clone());

        if self.reveal.register_copy(now) {
            let quote = self.engine.quote(&code, self.catalog.get(&code));
            self.detail = Some(quote);
        }
    }

    /// Drop the breakdown once its window has passed
    pub fn tick(&mut self, now: Instant) {
        if self.detail.is_some() && !self.reveal.is_visible(now) {
            self.detail = None;
        }
    }

    pub fn selected_quote(&self) -> Option<PriceQuote> {
        let code = self.selected.as_ref()?;
        let record = self.catalog.get(code);
        Some(self.engine.quote(code, record))
    }

    pub fn next(&mut self) {
        let len = self.suggestions.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.suggestions.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
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

    loop_outcome(res)
}

/// Called after the terminal is restored so the error prints on a sane screen
fn loop_outcome(res: io::Result<()>) -> Result<()> {
    res.context("UI loop failed")
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|f| ui(f, app))?;

        // Poll so the breakdown can hide itself without a key press
        if !event::poll(TICK)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Char('q') if ctrl => return Ok(()),
                KeyCode::Char('c') if ctrl => app.copy(Instant::now()),
                KeyCode::F(2) => app.copy(Instant::now()),
                KeyCode::Enter => app.select_current(),
                KeyCode::Down => app.next(),
                KeyCode::Up => app.previous(),
                KeyCode::Backspace => app.backspace(),
                KeyCode::Char(c) if !ctrl => app.push_char(c),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input
            Constraint::Min(0),    // Suggestions or part details
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_input(f, chunks[0], app);

    if app.detail.is_some() {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(50), // Part panel
                Constraint::Percentage(50), // Breakdown
            ])
            .split(chunks[1]);

        render_part(f, content_chunks[0], app);
        render_detail(f, content_chunks[1], app);
    } else if app.selected.is_some() {
        render_part(f, chunks[1], app);
    } else {
        render_suggestions(f, chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::raw(app.input.as_str()),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" Digite o código "));

    f.render_widget(input, area);
}

fn render_suggestions(f: &mut Frame, area: Rect, app: &mut App) {
    let items: Vec<ListItem> = app
        .suggestions
        .iter()
        .map(|code| ListItem::new(code.as_str()))
        .collect();

    let title = format!(" Sugestões ({}) ", app.suggestions.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_part(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();

    if let (Some(code), Some(quote)) = (&app.selected, app.selected_quote()) {
        let category = app
            .catalog
            .get(code)
            .map(|r| r.category.as_str())
            .unwrap_or("-");

        lines.push(Line::from(vec![
            Span::raw("Peça: "),
            Span::styled(code.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        ]));
        lines.push(Line::from(format!("Tipo: {}", category)));
        lines.push(Line::from(vec![
            Span::raw("Valor final: "),
            Span::styled(
                format_display(quote.breakdown.final_value),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Ctrl+C / F2: copiar código",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let panel = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Detalhes da Peça "));
    f.render_widget(panel, area);
}

fn render_detail(f: &mut Frame, area: Rect, app: &App) {
    let quote = match &app.detail {
        Some(q) => q,
        None => return,
    };
    let b = &quote.breakdown;
    let tax_percent = (app.engine.table().tax_factor * 100.0).round();

    let mut lines = vec![
        Line::from(format!("Valor Original: {}", format_display(b.base_price))),
        Line::from(format!(
            "Valor do Imposto ({}%): {}",
            tax_percent,
            format_display(b.tax_amount)
        )),
        Line::from(format!("Valor dos Multiplicadores: {}", format_display(b.markup_amount))),
        Line::from(Span::styled(
            format!("VALOR: {}", format_display(b.final_value)),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    if let Some(discounted) = b.discounted_value {
        lines.push(Line::from(format!("VALOR COM DESCONTO: {}", format_display(discounted))));
    }

    let remaining = app.reveal.remaining(Instant::now()).as_secs();
    let title = format!(" Detalhes de Preço para {} ({}s) ", quote.model, remaining);
    let panel = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let status = match &app.copied {
        Some(code) => format!("Copiado: {}", code),
        None => format!("{} peças no catálogo", app.catalog.len()),
    };

    let bar = Paragraph::new(Line::from(vec![
        Span::raw(status),
        Span::styled(
            "  │  ↑↓ navegar  Enter selecionar  Esc sair",
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(bar, area);
}
