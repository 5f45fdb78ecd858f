use anyhow::Result;
use slide_core::{GameSession, PuzzleState, SessionConfig};
use slide_forge_app::visualization::{render_board, TerminalVisualizer, Visualizer};
use std::time::Duration;

fn solved(grid_size: usize) -> PuzzleState<()> {
    PuzzleState::initialize(vec![(); grid_size * grid_size], grid_size).unwrap()
}

#[test]
fn test_render_solved_board_plain() {
    assert_eq!(render_board(&solved(3), false), "1 2 3\n4 5 6\n7 8 .\n");
}

#[test]
fn test_render_pads_wide_labels() {
    let board = render_board(&solved(4), false);
    let rows: Vec<&str> = board.lines().collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0], " 1  2  3  4");
    assert_eq!(rows[3], "13 14 15  .");
}

#[test]
fn test_render_scrambled_board_keeps_every_label() {
    let config = SessionConfig::builder().seed(5).build();
    let session = GameSession::with_config(vec![(); 9], 3, config).unwrap();
    let board = render_board(session.puzzle(), false);
    let mut labels: Vec<&str> = board.split_whitespace().collect();
    labels.sort_unstable();
    assert_eq!(labels, [".", "1", "2", "3", "4", "5", "6", "7", "8"]);
}

#[test]
fn test_colored_render_contains_labels() {
    colored::control::set_override(true);
    let board = render_board(&solved(2), true);
    assert!(board.contains('1'));
    assert!(board.contains("\u{1b}["), "expected ANSI colour codes");
}

#[test]
fn test_terminal_visualizer_writes_status_line() -> Result<()> {
    let mut visualizer = TerminalVisualizer::new(Vec::new(), false);
    visualizer.display_state(&solved(2), Duration::from_secs(61))?;
    visualizer.display_message("hello")?;
    let text = String::from_utf8(visualizer.into_inner())?;
    assert_eq!(text, "1 2\n3 .\nMoves: 0  Time: 1:01\nhello\n");
    Ok(())
}
