use crossterm::{
    QueueableCommand,
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use std::{
    io::{self, Stdout, Write},
    time::{Duration, Instant},
};

use crate::{
    board::Coord,
    config::GameConfig,
    engine::{Delegate, Direction, Engine, Turn},
};

/// Keeps the counters shown above the board in sync with the engine.
#[derive(Debug, Default)]
pub struct StatusLine {
    pub goal: u32,
    pub remaining_moves: u32,
}

impl Delegate for StatusLine {
    fn on_goal_changed(&mut self, goal: u32) {
        log::debug!("Goal is now {goal}");
        self.goal = goal;
    }

    fn on_resource_decreased(&mut self, remaining_moves: u32) {
        self.remaining_moves = remaining_moves;
    }

    fn on_tile_inserted(&mut self, at: Coord, value: u32) {
        log::trace!("Inserted {value} at {at:?}");
    }

    fn on_single_tile_moved(&mut self, from: Coord, to: Coord, value: u32) {
        log::trace!("{from:?} -> {to:?} = {value}");
    }

    fn on_double_tile_moved(&mut self, from: (Coord, Coord), to: Coord, value: u32) {
        log::trace!("{:?} + {:?} -> {to:?} = {value}", from.0, from.1);
    }
}

/// Plays in the terminal until the user quits. Returns how the last game ended, if it did.
pub fn play(config: GameConfig, seed: u64) -> io::Result<Option<Turn>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let mut engine = Engine::seeded(config, StatusLine::default(), seed);
    engine.start();
    let result = run(&mut stdout, &mut engine);

    execute!(stdout, LeaveAlternateScreen, Show)?;
    disable_raw_mode()?;

    result
}

fn run(stdout: &mut Stdout, engine: &mut Engine<StatusLine>) -> io::Result<Option<Turn>> {
    let mut ended = None;

    loop {
        draw(stdout, engine, ended)?;

        // Sleep until the next key press or until queued moves may run
        let timeout = engine
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(Duration::from_secs(60));

        if event::poll(timeout)? {
            if let Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) = event::read()?
            {
                match code {
                    KeyCode::Esc | KeyCode::Char('q') => break,
                    KeyCode::Char('r') => {
                        // Moves of the abandoned game are not settled
                        engine.take_outcomes();
                        engine.start();
                        ended = None;
                    }
                    code => {
                        if let Some(direction) = key_direction(code).filter(|_| ended.is_none()) {
                            if let Err(err) = engine.queue_move(direction) {
                                log::warn!("{err}");
                            }
                        }
                    }
                }
            }
        }

        engine.tick();

        for outcome in engine.take_outcomes() {
            if !outcome.changed || ended.is_some() {
                continue;
            }

            match engine.settle_turn() {
                Turn::Continue => {}
                turn => ended = Some(turn),
            }
        }
    }

    Ok(ended)
}

fn key_direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') => Some(Direction::Right),
        _ => None,
    }
}

fn draw(stdout: &mut Stdout, engine: &Engine<StatusLine>, ended: Option<Turn>) -> io::Result<()> {
    let status = engine.delegate();

    stdout.queue(Clear(ClearType::All))?;
    stdout.queue(MoveTo(0, 0))?;
    stdout.queue(Print(format!(
        "Goal {:<6} Moves left {}\r\n\r\n",
        status.goal, status.remaining_moves
    )))?;

    for row in engine.board().to_rows() {
        for value in row {
            stdout.queue(SetForegroundColor(get_color(value)))?;
            if value == 0 {
                stdout.queue(Print(format!("{:>5}", '.')))?;
            } else {
                stdout.queue(Print(format!("{value:>5}")))?;
            }
            stdout.queue(ResetColor)?;
        }

        stdout.queue(Print("\r\n"))?;
    }

    let message = match ended {
        Some(Turn::Won(_)) => "You won! r: new game, q: quit",
        Some(Turn::Lost) => "You lost... r: new game, q: quit",
        _ => "arrows/wasd: move, r: new game, q: quit",
    };
    stdout.queue(Print(format!("\r\n{message}\r\n")))?;

    stdout.flush()
}

fn get_color(v: u32) -> Color {
    match v {
        0 => Color::DarkGrey,
        1..=8 => Color::White,
        9..=55 => Color::Yellow,
        56..=377 => Color::Magenta,
        _ => Color::Red,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_key_direction() {
        assert_eq!(key_direction(KeyCode::Char('w')), Some(Direction::Up));
        assert_eq!(key_direction(KeyCode::Left), Some(Direction::Left));
        assert_eq!(key_direction(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_status_line_follows_engine() {
        let mut engine = Engine::seeded(GameConfig::default(), StatusLine::default(), 3);
        engine.start();
        assert_eq!(engine.delegate().goal, 89);
        assert_eq!(engine.delegate().remaining_moves, 130);

        engine.decrement_remaining_moves();
        assert_eq!(engine.delegate().remaining_moves, 129);
    }
}
