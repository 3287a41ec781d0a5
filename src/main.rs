use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::{
    io::{stdout, Stdout},
    time::Instant,
};

use blockfall::{Cell, Command, Config, Game, TetrominoType, Ticker};

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const WALL_CHAR: &str = "▒▒";
const EMPTY_CHAR: &str = "  ";

// ============================================================================
// Color Mapping
// ============================================================================

fn tetromino_color(t: TetrominoType) -> Color {
    match t {
        TetrominoType::I => Color::LightBlue,
        TetrominoType::O => Color::Yellow,
        TetrominoType::T => Color::Magenta,
        TetrominoType::S => Color::Green,
        TetrominoType::Z => Color::Red,
        TetrominoType::J => Color::Blue,
        TetrominoType::L => Color::Rgb(255, 165, 0),
    }
}

// ============================================================================
// Session
// ============================================================================

/// One running game plus the frontend state that drives it.
struct Session {
    config: Config,
    game: Game,
    ticker: Ticker,
    paused: bool,
}

impl Session {
    fn new(config: Config) -> Result<Self> {
        let game = Game::new(&config)?;
        let ticker = Ticker::new(config.tick_interval());
        Ok(Self {
            config,
            game,
            ticker,
            paused: false,
        })
    }

    fn restart(&mut self) -> Result<()> {
        self.game = Game::new(&self.config)?;
        self.ticker.reset();
        self.paused = false;
        Ok(())
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, session: &Session) {
    let area = frame.size();
    render_game(frame, &session.game, area);

    if session.game.is_over() {
        render_game_over(frame, &session.game, area);
    } else if session.paused {
        render_paused(frame, area);
    }
}

fn render_game(frame: &mut Frame, game: &Game, area: Rect) {
    let board = game.board();
    let grid_display_width = ((board.width() as u16 + 2) * CELL_WIDTH) + 2;
    let grid_display_height = board.height() as u16 + 4;
    let info_width = 14;
    let total_width = grid_display_width + info_width + 2;
    let total_height = grid_display_height + 3;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let game_row = vertical[0];

    // Layout: [Grid][Info]
    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(info_width),
    ])
    .split(game_row);

    render_grid(frame, game, horizontal[0]);
    render_info(frame, game, horizontal[1]);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 2,
    };

    if controls_area.y + 1 < area.height {
        let controls = Paragraph::new(vec![Line::from(
            "←→/AD: Move | ↓/S: Drop | ↑/W/Z: Rotate | Space: Hard drop | P: Pause | R: Restart | Q: Quit",
        )])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, controls_area);
    }
}

fn render_grid(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Blockfall ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = game
        .render_grid()
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => Span::raw(EMPTY_CHAR),
                    Cell::Wall => Span::styled(WALL_CHAR, Style::default().fg(Color::DarkGray)),
                    Cell::Locked(kind) => {
                        Span::styled(BLOCK_CHAR, Style::default().fg(tetromino_color(*kind)))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(format!("{}", game.score())),
        Line::from(""),
        Line::from(Span::styled("Lines", Style::default().fg(Color::Cyan))),
        Line::from(format!("{}", game.lines_cleared())),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_game_over(frame: &mut Frame, game: &Game, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format!("Score: {}", game.score())),
        Line::from(format!("Lines: {}", game.lines_cleared())),
        Line::from(""),
        Line::from(Span::styled(
            "R: new game | ESC: quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Game Over ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    frame.render_widget(paragraph, centered_rect(26, 10, area));
}

fn render_paused(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("PAUSED", Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from(Span::styled(
            "Press P to continue",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Paused ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    frame.render_widget(paragraph, centered_rect(24, 8, area));
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Input
// ============================================================================

fn command_for_key(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Command::MoveRight),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::SoftDrop),
        KeyCode::Up
        | KeyCode::Char('w')
        | KeyCode::Char('W')
        | KeyCode::Char('z')
        | KeyCode::Char('Z') => Some(Command::Rotate),
        KeyCode::Char(' ') => Some(Command::HardDrop),
        _ => None,
    }
}

// ============================================================================
// Main Loop
// ============================================================================

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;
    let mut session = Session::new(config)?;

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut session);

    // Always try to restore terminal state.
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, session: &mut Session) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|frame| render(frame, &*session))?;

        if event::poll(session.ticker.time_until_next())? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => break,
                        KeyCode::Char('p') | KeyCode::Char('P') if !session.game.is_over() => {
                            session.paused = !session.paused;
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => session.restart()?,
                        code if !session.paused => {
                            if let Some(command) = command_for_key(code) {
                                session.game.command(command);
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        let elapsed = last_frame.elapsed();
        last_frame = Instant::now();
        if session.paused {
            continue;
        }

        // Due ticks run back to back on this thread.
        for _ in 0..session.ticker.advance(elapsed) {
            session.game.tick();
        }
        session.game.take_events();

        if session.game.is_over() && !session.ticker.is_stopped() {
            session.ticker.stop();
        }
    }

    Ok(())
}
