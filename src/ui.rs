use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use price_reveal::{
    Animator, AnimatorError, CellKind, Currency, Price, RevealConfig, RevealEvent, RevealRequest,
    SlotPhase,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const MAX_INPUT_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Input,
    Result,
}

impl Screen {
    pub fn title(&self) -> &str {
        match self {
            Screen::Input => "Enter Price",
            Screen::Result => "Appraisal",
        }
    }
}

pub struct App {
    pub screen: Screen,
    pub input: String,
    pub currency: Currency,
    /// Price and currency confirmed on the input screen
    pub request: Option<RevealRequest>,
    /// Blocking message, dismissed by any key
    pub notification: Option<String>,
    pub animator: Animator,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &RevealConfig) -> Result<Self> {
        Ok(Self::with_animator(config, Animator::new(config.timing)?))
    }

    pub fn with_animator(config: &RevealConfig, animator: Animator) -> Self {
        Self {
            screen: Screen::Input,
            input: String::new(),
            currency: config.default_currency,
            request: None,
            notification: None,
            animator,
            should_quit: false,
        }
    }

    pub fn push_char(&mut self, c: char) {
        if c.is_ascii_digit() && self.input.len() < MAX_INPUT_LEN {
            self.input.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    pub fn toggle_currency(&mut self) {
        self.currency = self.currency.toggle();
    }

    /// "Done" on the input screen: validate once, store the request.
    pub fn confirm(&mut self) {
        match Price::parse(&self.input) {
            Ok(price) => {
                info!(%price, currency = %self.currency, "price confirmed");
                self.request = Some(RevealRequest::new(price, self.currency));
                self.screen = Screen::Result;
            }
            Err(err) => {
                warn!(input = %self.input, error = %err, "invalid price");
                self.notification = Some(format!("Please enter a valid price: {}", err));
            }
        }
    }

    /// "Start" on the result screen
    pub fn start_reveal(&mut self) {
        let Some(request) = self.request.clone() else {
            self.notification = Some("No price has been entered.".to_string());
            return;
        };

        match self.animator.start(request) {
            Ok(()) => {}
            // Already logged by the animator, the key press is ignored
            Err(AnimatorError::Busy) => {}
            Err(err) => {
                warn!(error = %err, "reveal could not start");
                self.notification = Some(format!("Cannot reveal this price: {}", err));
            }
        }
    }

    pub fn can_reset(&self) -> bool {
        !self.animator.is_running()
    }

    /// "Again": back to the input screen with everything cleared
    pub fn reset(&mut self) {
        if self.animator.reset().is_err() {
            return;
        }
        self.request = None;
        self.input.clear();
        self.screen = Screen::Input;
    }

    pub fn tick(&mut self, dt: Duration) -> Vec<RevealEvent> {
        self.animator.advance(dt)
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        if self.notification.is_some() {
            self.notification = None;
            return;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => match self.screen {
                Screen::Input => match code {
                    KeyCode::Enter => self.confirm(),
                    KeyCode::Backspace => self.pop_char(),
                    KeyCode::Tab | KeyCode::Left | KeyCode::Right => self.toggle_currency(),
                    KeyCode::Char(c) => self.push_char(c),
                    _ => {}
                },
                Screen::Result => match code {
                    KeyCode::Enter | KeyCode::Char('s') => self.start_reveal(),
                    KeyCode::Char('r') => self.reset(),
                    _ => {}
                },
            },
        }
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

    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let tick_rate = app.animator.timing().roll_interval();
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }

        let now = Instant::now();
        app.tick(now - last_tick);
        last_tick = now;

        if app.should_quit {
            return Ok(());
        }
    }
}

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Screen content
            Constraint::Length(3), // Key hints
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.screen {
        Screen::Input => render_input(f, chunks[1], app),
        Screen::Result => render_result(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);

    if let Some(message) = &app.notification {
        render_notification(f, f.size(), message);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let screens = [Screen::Input, Screen::Result];

    let mut spans = vec![];
    for (i, screen) in screens.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }

        let style = if *screen == app.screen {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        spans.push(Span::styled(screen.title(), style));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Price Reveal "),
    );

    f.render_widget(header, area);
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let mut currency_spans = vec![Span::raw("Currency: ")];
    for currency in Currency::ALL {
        let marker = if currency == app.currency { "(•) " } else { "( ) " };
        let style = if currency == app.currency {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        currency_spans.push(Span::styled(
            format!("{}{} {}  ", marker, currency.symbol(), currency.code()),
            style,
        ));
    }

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("Price: "),
            Span::styled(
                format!("{}▏", app.input),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(currency_spans),
    ];

    let input = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Input "),
    );

    f.render_widget(input, area);
}

fn render_result(f: &mut Frame, area: Rect, app: &App) {
    let spans: Vec<Span> = app
        .animator
        .cells()
        .iter()
        .map(|cell| {
            let style = match (cell.kind, cell.phase) {
                (CellKind::Symbol, _) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                (CellKind::Separator, _) => Style::default().fg(Color::White),
                (CellKind::Digit, SlotPhase::Locked) => {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                }
                (CellKind::Digit, SlotPhase::FastRoll) => Style::default().fg(Color::Cyan),
                (CellKind::Digit, _) => Style::default().fg(Color::DarkGray),
            };
            Span::styled(cell.ch.to_string(), style)
        })
        .collect();

    let (locked, total) = app.animator.progress();
    let caption = match &app.request {
        Some(request) if total > 0 => format!("{} / {} digits ({})", locked, total, request.currency),
        Some(request) => format!("Ready: {} {}", request.price, request.currency),
        None => String::new(),
    };

    let lines = vec![
        Line::from(""),
        Line::from(spans).alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled(caption, Style::default().fg(Color::DarkGray)))
            .alignment(Alignment::Center),
    ];

    let display = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Price "),
    );

    f.render_widget(display, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let key = Style::default().fg(Color::Yellow);
    let disabled = Style::default().fg(Color::DarkGray);

    let mut spans = vec![];
    match app.screen {
        Screen::Input => {
            spans.push(Span::styled(" 0-9", key));
            spans.push(Span::raw(" Price | "));
            spans.push(Span::styled("Tab/←/→", key));
            spans.push(Span::raw(" Currency | "));
            spans.push(Span::styled("Enter", key));
            spans.push(Span::raw(" Done | "));
        }
        Screen::Result => {
            let reset_style = if app.can_reset() { key } else { disabled };
            spans.push(Span::styled(" Enter/s", key));
            spans.push(Span::raw(" Start | "));
            spans.push(Span::styled("r", reset_style));
            spans.push(Span::styled(
                " Again | ",
                if app.can_reset() { Style::default() } else { disabled },
            ));
        }
    }
    spans.push(Span::styled("q/Esc", key));
    spans.push(Span::raw(" Quit"));

    let status = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    f.render_widget(status, area);
}

fn render_notification(f: &mut Frame, area: Rect, message: &str) {
    let popup = centered_rect(50, 20, area);

    let body = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled("Press any key", Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Notice "),
    );

    f.render_widget(Clear, popup);
    f.render_widget(body, popup);
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

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
