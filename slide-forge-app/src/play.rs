//! Scripted and interactive play loops on top of a [`LiveSession`].

use crate::visualization::Visualizer;
use anyhow::{Context, Result};
use log::{debug, info, trace};
use slide_core::{format_clock, BestRecords, LiveSession, SessionEvent};
use std::io::BufRead;
use std::time::Duration;

const HELP: &str = "Commands: <slot index> | w/a/s/d slide the tile above/left/below/right of \
                    the gap | r restart | p peek | h help | q quit";

/// Neighbour of the gap, as chosen with the w/a/s/d keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Above,
    Left,
    Below,
    Right,
}

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Slide(usize),
    Nudge(Direction),
    Restart,
    Peek,
    Help,
    Quit,
}

/// Parses a trimmed, case-insensitive input line. Blank or unknown input is `None`.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim().to_ascii_lowercase();
    if let Ok(index) = line.parse::<usize>() {
        return Some(Command::Slide(index));
    }
    let command = match line.as_str() {
        "w" => Command::Nudge(Direction::Above),
        "a" => Command::Nudge(Direction::Left),
        "s" => Command::Nudge(Direction::Below),
        "d" => Command::Nudge(Direction::Right),
        "r" | "restart" => Command::Restart,
        "p" | "peek" => Command::Peek,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Slot next to `empty` in `direction`, if it is on the board.
pub const fn tile_beside_gap(empty: usize, grid_size: usize, direction: Direction) -> Option<usize> {
    let (row, col) = (empty / grid_size, empty % grid_size);
    match direction {
        Direction::Above if row > 0 => Some(empty - grid_size),
        Direction::Below if row + 1 < grid_size => Some(empty + grid_size),
        Direction::Left if col > 0 => Some(empty - 1),
        Direction::Right if col + 1 < grid_size => Some(empty + 1),
        _ => None,
    }
}

/// Where a play loop ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaySummary {
    pub moves: u32,
    pub elapsed: Duration,
    pub solved: bool,
    pub rejected: usize,
}

impl PlaySummary {
    fn capture<B>(live: &LiveSession<B>, rejected: usize) -> Self
    where
        B: Send + Sync + 'static,
    {
        live.with_session(|session| Self {
            moves: session.move_count(),
            elapsed: session.elapsed(),
            solved: session.is_solved(),
            rejected,
        })
    }

    /// Three summary lines: moves, clock, solved flag.
    pub fn report(&self) -> String {
        format!(
            "Moves: {}\nTime: {}\nSolved: {}",
            self.moves,
            format_clock(self.elapsed),
            if self.solved { "yes" } else { "no" }
        )
    }
}

/// Logs session events; installed as the session listener by the binary.
pub fn log_event(event: &SessionEvent) {
    match event {
        SessionEvent::NewGame { grid_size } => info!("New {grid_size}x{grid_size} game"),
        SessionEvent::Shuffled { steps } => debug!("Board shuffled with {steps} steps"),
        SessionEvent::Moved { from, to, moves } => {
            debug!("Tile moved {from} -> {to} (move {moves})");
        }
        SessionEvent::Solved(result) => info!("Solved: {result:?}"),
        SessionEvent::Ticked { elapsed } => trace!("Clock at {}", format_clock(*elapsed)),
    }
}

fn show<B, V>(live: &LiveSession<B>, visualizer: &mut V) -> Result<()>
where
    B: Send + Sync + 'static,
    V: Visualizer,
{
    live.with_session(|session| visualizer.display_state(session.puzzle(), session.elapsed()))
}

fn announce_solved<B, V>(live: &LiveSession<B>, visualizer: &mut V, records: &mut BestRecords) -> Result<()>
where
    B: Send + Sync + 'static,
    V: Visualizer,
{
    let Some(result) = live.with_session(slide_core::GameSession::result) else {
        return Ok(());
    };
    visualizer.display_message(&format!(
        "Solved in {} moves ({})!",
        result.moves,
        format_clock(result.elapsed)
    ))?;
    let update = records.record(&result);
    if update.best_time {
        visualizer.display_message("New best time!")?;
    }
    if update.best_moves {
        visualizer.display_message("New fewest moves!")?;
    }
    Ok(())
}

/// Applies one slide request, reporting rejections and a solve. Returns whether it was
/// accepted.
fn play_move<B, V>(
    live: &mut LiveSession<B>,
    index: usize,
    visualizer: &mut V,
    records: &mut BestRecords,
) -> Result<bool>
where
    B: Send + Sync + 'static,
    V: Visualizer,
{
    let outcome = live.move_tile(index);
    if !outcome.accepted {
        trace!("Rejected move at slot {index}");
        visualizer.display_message(&format!("Move {index} rejected"))?;
        return Ok(false);
    }
    if outcome.solved_now {
        announce_solved(live, visualizer, records)?;
    }
    Ok(true)
}

/// Plays `moves` in order without prompting, stopping early once the puzzle is solved.
pub fn run_scripted<B, V>(
    live: &mut LiveSession<B>,
    moves: &[usize],
    visualizer: &mut V,
    records: &mut BestRecords,
) -> Result<PlaySummary>
where
    B: Send + Sync + 'static,
    V: Visualizer,
{
    info!("Playing {} scripted moves", moves.len());
    if live.is_solved() {
        visualizer.display_message("Puzzle is already solved")?;
    }
    let mut rejected = 0;
    for &index in moves {
        if live.is_solved() {
            debug!("Ignoring remaining scripted moves, puzzle solved");
            break;
        }
        if !play_move(live, index, visualizer, records)? {
            rejected += 1;
        }
    }
    show(live, visualizer)?;
    Ok(PlaySummary::capture(live, rejected))
}

/// Reads commands from `input` until `q` or end of input.
pub fn run_interactive<B, R, V>(
    live: &mut LiveSession<B>,
    input: R,
    visualizer: &mut V,
    records: &mut BestRecords,
) -> Result<PlaySummary>
where
    B: Clone + Send + Sync + 'static,
    R: BufRead,
    V: Visualizer,
{
    visualizer.display_message(HELP)?;
    if live.is_solved() {
        visualizer.display_message("Puzzle is already solved")?;
    }
    show(live, visualizer)?;

    let mut rejected = 0;
    for line in input.lines() {
        let line = line.context("Failed to read player input")?;
        let Some(command) = parse_command(&line) else {
            if !line.trim().is_empty() {
                visualizer.display_message(&format!("Unknown command: {}", line.trim()))?;
            }
            continue;
        };
        trace!("Player command {command:?}");

        match command {
            Command::Quit => break,
            Command::Help => {
                visualizer.display_message(HELP)?;
                continue;
            }
            Command::Peek => {
                let preview = live.with_session(slide_core::GameSession::solved_preview);
                visualizer.display_message("Solved picture:")?;
                visualizer.display_state(&preview, live.elapsed())?;
                continue;
            }
            Command::Restart => {
                live.restart();
                visualizer.display_message("Board reshuffled")?;
            }
            Command::Slide(index) => {
                if !play_move(live, index, visualizer, records)? {
                    rejected += 1;
                }
            }
            Command::Nudge(direction) => {
                let (empty, size) =
                    live.with_session(|s| (s.puzzle().empty_index(), s.grid_size()));
                match tile_beside_gap(empty, size, direction) {
                    Some(index) => {
                        if !play_move(live, index, visualizer, records)? {
                            rejected += 1;
                        }
                    }
                    None => {
                        trace!("No tile {direction:?} the gap at slot {empty}");
                        visualizer.display_message("Nothing to slide there")?;
                        continue;
                    }
                }
            }
        }
        show(live, visualizer)?;
    }
    Ok(PlaySummary::capture(live, rejected))
}
