use colored::Colorize;
use slide_core::{format_clock, PuzzleState};
use std::io::Write;
use std::time::Duration;

/// Marker drawn in the empty slot.
pub const GAP_MARKER: &str = ".";

/// Something that can present the board to the player.
pub trait Visualizer {
    /// Shows the board and the current clock reading.
    fn display_state<B>(&mut self, puzzle: &PuzzleState<B>, elapsed: Duration)
        -> anyhow::Result<()>;

    /// Shows a one-line message.
    fn display_message(&mut self, message: &str) -> anyhow::Result<()>;
}

/// Renders the board as text, one row per line.
///
/// Tiles are labelled `correct_index + 1`, so the solved board reads 1, 2, 3, ... with the
/// gap last. With `color` on, tiles sitting in their home slot are green and the rest
/// yellow.
pub fn render_board<B>(puzzle: &PuzzleState<B>, color: bool) -> String {
    let size = puzzle.grid_size();
    let width = (size * size - 1).to_string().len();
    let mut board = String::new();
    for slot in puzzle.slots() {
        let cell = match slot.occupant {
            Some(tile) => {
                let label = format!("{:>width$}", tile.correct_index() + 1);
                if !color {
                    label
                } else if tile.correct_index() == slot.index {
                    label.green().to_string()
                } else {
                    label.yellow().to_string()
                }
            }
            None => format!("{GAP_MARKER:>width$}"),
        };
        board.push_str(&cell);
        board.push(if (slot.index + 1) % size == 0 { '\n' } else { ' ' });
    }
    board
}

/// Prints the board to a terminal (or any writer).
pub struct TerminalVisualizer<W> {
    out: W,
    color: bool,
}

impl<W: Write> TerminalVisualizer<W> {
    pub const fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Visualizer for TerminalVisualizer<W> {
    fn display_state<B>(
        &mut self,
        puzzle: &PuzzleState<B>,
        elapsed: Duration,
    ) -> anyhow::Result<()> {
        write!(self.out, "{}", render_board(puzzle, self.color))?;
        writeln!(
            self.out,
            "Moves: {}  Time: {}",
            puzzle.move_count(),
            format_clock(elapsed)
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn display_message(&mut self, message: &str) -> anyhow::Result<()> {
        writeln!(self.out, "{message}")?;
        self.out.flush()?;
        Ok(())
    }
}
