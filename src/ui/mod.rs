use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event as CrosstermEvent, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::{
    config::{FRAME_HZ, GameConfig},
    core::World,
    render,
    types::{BallSnapshot, ColorId, Command, Direction},
};

pub fn run() -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut world = World::new(GameConfig::default());
    let mut snapshot: Vec<BallSnapshot> = Vec::with_capacity(4);
    let mut framebuf = render::FrameBuffer::new(0, 0);
    let frame_time = Duration::from_secs_f32(1.0 / FRAME_HZ);

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::from_millis(0))? {
            if let CrosstermEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                match map_key(key.code, key.modifiers) {
                    Command::Quit => {
                        shutdown_terminal(&mut terminal)?;
                        return Ok(());
                    }
                    command => world.apply_command(command),
                }
            }
        }

        world.step();
        world.snapshot(&mut snapshot);

        terminal.draw(|frame| {
            let size = frame.size();
            let chunks = Layout::vertical([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(size);

            let header = Paragraph::new(Line::from(Span::styled(
                "Control Keys: Arrows A S W D Q E Z C",
                Style::default().fg(color_for(world.config.palette.hud)),
            )))
            .block(Block::default().borders(Borders::ALL).title("Brownian Balls"));
            frame.render_widget(header, chunks[0]);

            let viewport = render::Viewport {
                width: chunks[1].width.saturating_sub(2),
                height: chunks[1].height.saturating_sub(2),
            };
            render::draw(&snapshot, &world.config, world.over, viewport, &mut framebuf);

            let lines: Vec<Line> = (0..framebuf.height())
                .map(|y| {
                    let mut spans: Vec<Span> = Vec::with_capacity(framebuf.width() as usize);
                    for x in 0..framebuf.width() {
                        let cell = framebuf.get(x, y);
                        spans.push(Span::styled(
                            cell.ch.to_string(),
                            Style::default().fg(color_for(cell.color)),
                        ));
                    }
                    Line::from(spans)
                })
                .collect();
            let arena = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Arena"));
            frame.render_widget(arena, chunks[1]);

            let footer = Paragraph::new(format!(
                "SCORE: {}     LEVEL: {}   |   Esc: quit",
                world.score, world.level
            ))
            .block(Block::default().borders(Borders::ALL).title("Score"));
            frame.render_widget(footer, chunks[2]);
        })?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }
}

fn shutdown_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

// Every key maps somewhere: direction keys steer, Esc and Ctrl-C quit, and
// anything else is a restart request, which the world ignores mid-game.
fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Command {
    if code == KeyCode::Esc {
        return Command::Quit;
    }
    if let KeyCode::Char(ch) = code {
        if modifiers.contains(KeyModifiers::CONTROL) && ch.eq_ignore_ascii_case(&'c') {
            return Command::Quit;
        }
    }
    let direction = match code {
        KeyCode::Left => Some(Direction::West),
        KeyCode::Right => Some(Direction::East),
        KeyCode::Up => Some(Direction::North),
        KeyCode::Down => Some(Direction::South),
        KeyCode::Char(ch) => match ch.to_ascii_lowercase() {
            'a' => Some(Direction::West),
            'd' => Some(Direction::East),
            'w' => Some(Direction::North),
            's' => Some(Direction::South),
            'e' => Some(Direction::NorthEast),
            'q' => Some(Direction::NorthWest),
            'z' => Some(Direction::SouthWest),
            'c' => Some(Direction::SouthEast),
            _ => None,
        },
        _ => None,
    };
    match direction {
        Some(direction) => Command::Steer(direction),
        None => Command::Restart,
    }
}

fn color_for(color: ColorId) -> Color {
    match color {
        ColorId::Red => Color::Red,
        ColorId::Green => Color::Green,
        ColorId::Black => Color::DarkGray,
        ColorId::White => Color::White,
        ColorId::Sky => Color::LightBlue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod map_key {
        use super::*;

        #[test]
        fn arrows_and_letters_alias_to_the_cardinals() {
            let pairs = [
                (KeyCode::Left, Direction::West),
                (KeyCode::Char('a'), Direction::West),
                (KeyCode::Right, Direction::East),
                (KeyCode::Char('d'), Direction::East),
                (KeyCode::Up, Direction::North),
                (KeyCode::Char('w'), Direction::North),
                (KeyCode::Down, Direction::South),
                (KeyCode::Char('s'), Direction::South),
            ];
            for (code, direction) in pairs {
                assert_eq!(
                    map_key(code, KeyModifiers::NONE),
                    Command::Steer(direction)
                );
            }
        }

        #[test]
        fn four_extra_keys_cover_the_diagonals() {
            let pairs = [
                (KeyCode::Char('e'), Direction::NorthEast),
                (KeyCode::Char('q'), Direction::NorthWest),
                (KeyCode::Char('z'), Direction::SouthWest),
                (KeyCode::Char('c'), Direction::SouthEast),
            ];
            for (code, direction) in pairs {
                assert_eq!(
                    map_key(code, KeyModifiers::NONE),
                    Command::Steer(direction)
                );
            }
        }

        #[test]
        fn shifted_letters_still_steer() {
            assert_eq!(
                map_key(KeyCode::Char('W'), KeyModifiers::SHIFT),
                Command::Steer(Direction::North)
            );
            assert_eq!(
                map_key(KeyCode::Char('Q'), KeyModifiers::SHIFT),
                Command::Steer(Direction::NorthWest)
            );
        }

        #[test]
        fn escape_and_ctrl_c_quit() {
            assert_eq!(map_key(KeyCode::Esc, KeyModifiers::NONE), Command::Quit);
            assert_eq!(
                map_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
                Command::Quit
            );
        }

        #[test]
        fn plain_c_steers_instead_of_quitting() {
            assert_eq!(
                map_key(KeyCode::Char('c'), KeyModifiers::NONE),
                Command::Steer(Direction::SouthEast)
            );
        }

        #[test]
        fn every_other_key_asks_for_a_restart() {
            for code in [
                KeyCode::Char('x'),
                KeyCode::Char(' '),
                KeyCode::Enter,
                KeyCode::Tab,
                KeyCode::F(1),
            ] {
                assert_eq!(map_key(code, KeyModifiers::NONE), Command::Restart);
            }
        }
    }
}
