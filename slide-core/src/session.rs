use crate::clock::SessionClock;
use crate::puzzle::{MoveOutcome, PuzzleState};
use crate::scramble::{default_scramble_steps, scramble};
use crate::score::GameResult;
use crate::ticker::ClockTicker;
use crate::{Difficulty, PuzzleError};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A session shared between its owner and the clock ticker.
pub type SharedSession<B> = Arc<Mutex<GameSession<B>>>;

/// Change-notification callback registered with a session.
pub type SessionListener = Box<dyn FnMut(&SessionEvent) + Send>;

/// State changes a front end may want to redraw for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new game was set up and scrambled.
    NewGame { grid_size: usize },
    /// The current tiles were reshuffled.
    Shuffled { steps: usize },
    /// A tile slid from `from` into the gap at `to`.
    Moved { from: usize, to: usize, moves: u32 },
    /// The last move solved the puzzle.
    Solved(GameResult),
    /// One clock tick was applied.
    Ticked { elapsed: Duration },
}

/// Tunables for a game session.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionConfig {
    /// Seed for the scramble RNG. Drawn from OS entropy when `None`.
    pub seed: Option<u64>,
    /// Scramble walk length. Defaults to `12 × grid_size²`.
    pub scramble_steps: Option<usize>,
}

impl SessionConfig {
    /// Creates a new builder for `SessionConfig`.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    fn steps_for(&self, grid_size: usize) -> usize {
        self.scramble_steps
            .unwrap_or_else(|| default_scramble_steps(grid_size))
    }
}

/// Builder for `SessionConfig`.
#[derive(Default)]
pub struct SessionConfigBuilder {
    seed: Option<u64>,
    scramble_steps: Option<usize>,
}

impl SessionConfigBuilder {
    /// Sets the seed for the scramble RNG.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Overrides the scramble walk length.
    pub fn scramble_steps(mut self, steps: usize) -> Self {
        self.scramble_steps = Some(steps);
        self
    }

    pub fn build(self) -> SessionConfig {
        SessionConfig {
            seed: self.seed,
            scramble_steps: self.scramble_steps,
        }
    }
}

/// Owner of one active game: the puzzle, its clock and the optional listener.
///
/// All mutation goes through `&mut self`; when the clock ticker runs on another thread
/// the whole session sits behind one `Mutex` (see [`LiveSession`]).
pub struct GameSession<B> {
    puzzle: PuzzleState<B>,
    clock: SessionClock,
    config: SessionConfig,
    rng: StdRng,
    listener: Option<SessionListener>,
    result: Option<GameResult>,
}

impl<B> GameSession<B> {
    /// Starts a game from bitmaps in decomposition order, with default settings.
    ///
    /// # Errors
    ///
    /// `PuzzleError::DecompositionFailure` when the bitmaps cannot fill a
    /// `grid_size × grid_size` grid.
    pub fn new(bitmaps: Vec<B>, grid_size: usize) -> Result<Self, PuzzleError> {
        Self::with_config(bitmaps, grid_size, SessionConfig::default())
    }

    /// Starts a game with a fixed scramble seed.
    ///
    /// # Errors
    ///
    /// See [`GameSession::new`].
    pub fn with_seed(bitmaps: Vec<B>, grid_size: usize, seed: u64) -> Result<Self, PuzzleError> {
        Self::with_config(bitmaps, grid_size, SessionConfig::builder().seed(seed).build())
    }

    /// Starts a game with explicit settings.
    ///
    /// # Errors
    ///
    /// See [`GameSession::new`].
    pub fn with_config(
        bitmaps: Vec<B>,
        grid_size: usize,
        config: SessionConfig,
    ) -> Result<Self, PuzzleError> {
        let puzzle = PuzzleState::initialize(bitmaps, grid_size)?;
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let mut session = Self {
            puzzle,
            clock: SessionClock::new(),
            config,
            rng,
            listener: None,
            result: None,
        };
        session.begin(session.config.steps_for(grid_size));
        session.emit(&SessionEvent::NewGame { grid_size });
        Ok(session)
    }

    /// Replaces the current game with a new one built from `bitmaps`.
    ///
    /// On failure the current game is left untouched.
    ///
    /// # Errors
    ///
    /// See [`GameSession::new`].
    pub fn new_game(&mut self, bitmaps: Vec<B>, grid_size: usize) -> Result<(), PuzzleError> {
        let puzzle = PuzzleState::initialize(bitmaps, grid_size).map_err(|e| {
            warn!("New game rejected: {}", e);
            e
        })?;
        self.clock.stop();
        self.puzzle = puzzle;
        self.begin(self.config.steps_for(grid_size));
        self.emit(&SessionEvent::NewGame { grid_size });
        Ok(())
    }

    /// Restarts the current game: tiles go back to solved and are scrambled again with
    /// `steps` slides. Counters are reset and the clock restarts.
    pub fn shuffle(&mut self, steps: usize) {
        self.clock.stop();
        self.puzzle.restore_solved();
        self.begin(steps);
        self.emit(&SessionEvent::Shuffled { steps });
    }

    /// Restarts the current game with the configured scramble length.
    pub fn restart(&mut self) {
        self.shuffle(self.config.steps_for(self.grid_size()));
    }

    fn begin(&mut self, steps: usize) {
        scramble(&mut self.puzzle, steps, &mut self.rng);
        self.clock.reset();
        self.result = None;
        if self.puzzle.is_solved() {
            info!("Game starts solved; clock not started");
        } else {
            self.clock.start();
        }
    }

    /// Plays the tile at `index` into the gap.
    ///
    /// Illegal moves are reported with `accepted == false` and change nothing. The move
    /// that solves the puzzle stops the clock and records the [`GameResult`].
    pub fn move_tile(&mut self, index: usize) -> MoveOutcome {
        let to = self.puzzle.empty_index();
        let outcome = self.puzzle.apply_move(index);
        if !outcome.accepted {
            return outcome;
        }
        self.emit(&SessionEvent::Moved {
            from: index,
            to,
            moves: self.puzzle.move_count(),
        });
        if outcome.solved_now {
            self.clock.stop();
            let result = GameResult {
                grid_size: self.grid_size(),
                difficulty: Difficulty::from_grid_size(self.grid_size()),
                moves: self.puzzle.move_count(),
                elapsed: self.clock.elapsed(),
            };
            info!(
                "Puzzle solved in {} moves, {}",
                result.moves,
                crate::format_clock(result.elapsed)
            );
            self.result = Some(result);
            self.emit(&SessionEvent::Solved(result));
        }
        outcome
    }

    /// Applies one clock tick for run `generation`.
    ///
    /// Ignored while shuffling, once solved, or when `generation` is stale.
    pub fn tick(&mut self, generation: u64) -> bool {
        if self.puzzle.is_shuffling() || self.puzzle.is_solved() {
            return false;
        }
        if !self.clock.tick(generation) {
            return false;
        }
        let elapsed = self.clock.elapsed();
        self.emit(&SessionEvent::Ticked { elapsed });
        true
    }

    /// Registers the change listener, replacing any previous one.
    pub fn set_listener(&mut self, listener: SessionListener) {
        self.listener = Some(listener);
    }

    fn emit(&mut self, event: &SessionEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(event);
        }
    }

    pub fn puzzle(&self) -> &PuzzleState<B> {
        &self.puzzle
    }

    pub fn is_solved(&self) -> bool {
        self.puzzle.is_solved()
    }

    pub fn move_count(&self) -> u32 {
        self.puzzle.move_count()
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn grid_size(&self) -> usize {
        self.puzzle.grid_size()
    }

    pub fn can_move(&self, index: usize) -> bool {
        self.puzzle.can_move(index)
    }

    pub fn is_clock_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Generation of the current clock run, for scheduling ticks.
    pub fn clock_generation(&self) -> u64 {
        self.clock.generation()
    }

    /// Result of the finished game, if the current game has been solved by the player.
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }
}

impl<B: Clone> GameSession<B> {
    /// The solved arrangement of the current tiles, for "reveal the original" views.
    pub fn solved_preview(&self) -> PuzzleState<B> {
        let mut preview = self.puzzle.clone();
        preview.restore_solved();
        preview
    }
}

impl<B> fmt::Debug for GameSession<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("grid_size", &self.grid_size())
            .field("empty_index", &self.puzzle.empty_index())
            .field("moves", &self.move_count())
            .field("elapsed", &self.elapsed())
            .field("solved", &self.is_solved())
            .finish_non_exhaustive()
    }
}

/// A [`GameSession`] with its clock driven by a background [`ClockTicker`].
///
/// Any pending ticker is cancelled before the session is reset, and the ticker is
/// cancelled as soon as a move solves the puzzle.
pub struct LiveSession<B> {
    shared: SharedSession<B>,
    ticker: Option<ClockTicker>,
    interval: Duration,
}

impl<B> LiveSession<B>
where
    B: Send + Sync + 'static,
{
    /// Wraps `session` and starts ticking every `interval` if its clock is running.
    pub fn new(session: GameSession<B>, interval: Duration) -> Self {
        let mut live = Self {
            shared: Arc::new(Mutex::new(session)),
            ticker: None,
            interval,
        };
        live.respawn_ticker();
        live
    }

    fn lock(&self) -> MutexGuard<'_, GameSession<B>> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    fn respawn_ticker(&mut self) {
        self.cancel_ticker();
        let (running, generation) = {
            let session = self.lock();
            (session.is_clock_running(), session.clock_generation())
        };
        if running {
            self.ticker = Some(ClockTicker::spawn(
                Arc::clone(&self.shared),
                self.interval,
                generation,
            ));
        }
    }

    /// See [`GameSession::new_game`].
    ///
    /// # Errors
    ///
    /// `PuzzleError::DecompositionFailure`; the running game keeps ticking.
    pub fn new_game(&mut self, bitmaps: Vec<B>, grid_size: usize) -> Result<(), PuzzleError> {
        self.cancel_ticker();
        let result = self.lock().new_game(bitmaps, grid_size);
        self.respawn_ticker();
        result
    }

    /// See [`GameSession::move_tile`].
    pub fn move_tile(&mut self, index: usize) -> MoveOutcome {
        let outcome = self.lock().move_tile(index);
        if outcome.solved_now {
            self.cancel_ticker();
        }
        outcome
    }

    /// See [`GameSession::shuffle`].
    pub fn shuffle(&mut self, steps: usize) {
        self.cancel_ticker();
        self.lock().shuffle(steps);
        self.respawn_ticker();
    }

    /// See [`GameSession::restart`].
    pub fn restart(&mut self) {
        self.cancel_ticker();
        self.lock().restart();
        self.respawn_ticker();
    }

    /// Runs `f` with shared access to the session.
    pub fn with_session<R>(&self, f: impl FnOnce(&GameSession<B>) -> R) -> R {
        f(&self.lock())
    }

    /// Runs `f` with exclusive access to the session, e.g. to register a listener.
    pub fn with_session_mut<R>(&mut self, f: impl FnOnce(&mut GameSession<B>) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn is_solved(&self) -> bool {
        self.lock().is_solved()
    }

    pub fn move_count(&self) -> u32 {
        self.lock().move_count()
    }

    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed()
    }

    pub fn grid_size(&self) -> usize {
        self.lock().grid_size()
    }

    pub fn can_move(&self, index: usize) -> bool {
        self.lock().can_move(index)
    }
}

impl<B> Drop for LiveSession<B> {
    fn drop(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn bitmaps(grid_size: usize) -> Vec<usize> {
        (0..grid_size * grid_size).collect()
    }

    #[test]
    fn test_new_session_is_scrambled_and_running() {
        let session = GameSession::with_seed(bitmaps(3), 3, 1).unwrap();
        assert!(!session.is_solved());
        assert_eq!(session.move_count(), 0);
        assert_eq!(session.elapsed(), Duration::ZERO);
        assert!(session.is_clock_running());
        assert!(session.result().is_none());
    }

    #[test]
    fn test_decomposition_failure_creates_nothing() {
        let result = GameSession::new(Vec::<usize>::new(), 3);
        assert!(matches!(
            result,
            Err(PuzzleError::DecompositionFailure {
                grid_size: 3,
                expected: 9,
                tiles: 0
            })
        ));
    }

    #[test]
    fn test_failed_new_game_keeps_current_game() {
        let mut session = GameSession::with_seed(bitmaps(3), 3, 2).unwrap();
        let before = session.puzzle().arrangement();
        assert!(session.new_game(vec![0usize; 3], 3).is_err());
        assert_eq!(session.puzzle().arrangement(), before);
        assert!(session.is_clock_running());
    }

    #[test]
    fn test_shuffle_zero_is_solved_with_clock_stopped() {
        let mut session = GameSession::with_seed(bitmaps(3), 3, 3).unwrap();
        let generation = session.clock_generation();
        session.tick(generation);
        session.shuffle(0);
        assert!(session.is_solved());
        assert_eq!(session.move_count(), 0);
        assert_eq!(session.elapsed(), Duration::ZERO);
        assert!(!session.is_clock_running());
        assert_eq!(session.move_tile(7), MoveOutcome::REJECTED);
    }

    #[test]
    fn test_ticks_and_stale_generation() {
        let mut session = GameSession::with_seed(bitmaps(4), 4, 4).unwrap();
        let first = session.clock_generation();
        assert!(session.tick(first));
        session.restart();
        assert_eq!(session.elapsed(), Duration::ZERO);
        assert!(!session.tick(first), "tick from the previous run");
        assert!(session.tick(session.clock_generation()));
        assert_eq!(session.elapsed(), Duration::from_secs(1));
    }

    #[test]
    fn test_solving_stops_clock_and_records_result() {
        let config = SessionConfig::builder().seed(5).scramble_steps(1).build();
        let mut session = GameSession::with_config(bitmaps(3), 3, config).unwrap();
        assert!(!session.is_solved());
        let generation = session.clock_generation();
        assert!(session.tick(generation));

        // One slide away from solved: the tile that left slot 8 goes back.
        let gap = session.puzzle().empty_index();
        assert!(gap == 5 || gap == 7);
        assert!(!session.move_tile(0).accepted);
        let outcome = session.move_tile(8);
        assert_eq!(
            outcome,
            MoveOutcome {
                accepted: true,
                solved_now: true
            }
        );
        assert!(!session.is_clock_running());
        assert!(!session.tick(generation), "ticks after solve are dropped");

        let result = session.result().expect("result recorded");
        assert_eq!(result.moves, 1);
        assert_eq!(result.elapsed, Duration::from_secs(1));
        assert_eq!(result.difficulty, Some(Difficulty::Easy));
    }

    #[test]
    fn test_listener_sees_moves_and_solve() {
        let config = SessionConfig::builder().seed(6).scramble_steps(1).build();
        let mut session = GameSession::with_config(bitmaps(3), 3, config).unwrap();
        let (tx, rx) = mpsc::channel();
        session.set_listener(Box::new(move |event: &SessionEvent| {
            tx.send(event.clone()).ok();
        }));
        let gap = session.puzzle().empty_index();
        session.move_tile(8);

        let events: Vec<SessionEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            SessionEvent::Moved {
                from: 8,
                to: gap,
                moves: 1
            }
        );
        assert!(matches!(events[1], SessionEvent::Solved(_)));
    }

    #[test]
    fn test_solved_preview_does_not_touch_game() {
        let session = GameSession::with_seed(bitmaps(3), 3, 8).unwrap();
        let preview = session.solved_preview();
        assert!(preview.is_solved());
        assert!(!session.is_solved());
        assert_eq!(preview.tile_ids(), session.puzzle().tile_ids());
    }

    #[test]
    fn test_live_session_cancels_on_solve() {
        let config = SessionConfig::builder().seed(9).scramble_steps(1).build();
        let session = GameSession::with_config(bitmaps(3), 3, config).unwrap();
        let mut live = LiveSession::new(session, Duration::from_secs(3600));
        assert!(live.ticker.is_some());
        let outcome = live.move_tile(8);
        assert!(outcome.solved_now);
        assert!(live.ticker.is_none());
        assert!(live.is_solved());
    }

    #[test]
    fn test_live_session_restart_replaces_ticker() {
        let session = GameSession::with_seed(bitmaps(3), 3, 10).unwrap();
        let mut live = LiveSession::new(session, Duration::from_secs(3600));
        let first = live.ticker.as_ref().map(ClockTicker::generation);
        live.restart();
        let second = live.ticker.as_ref().map(ClockTicker::generation);
        assert!(second > first);
        assert_eq!(live.move_count(), 0);
    }

    #[test]
    fn test_live_new_game_replaces_ticker_and_tiles() {
        let session = GameSession::with_seed(bitmaps(3), 3, 12).unwrap();
        let mut live = LiveSession::new(session, Duration::from_secs(3600));
        let first = live.ticker.as_ref().map(ClockTicker::generation);
        let old_ids = live.with_session(|s| s.puzzle().tile_ids());
        assert!(live.with_session_mut(|s| s.tick(s.clock_generation())));

        live.new_game(bitmaps(4), 4).unwrap();
        let second = live.ticker.as_ref().map(ClockTicker::generation);
        assert!(second > first);
        assert_eq!(second, Some(live.with_session(GameSession::clock_generation)));
        assert_eq!(live.grid_size(), 4);
        assert_eq!(live.move_count(), 0);
        assert_eq!(live.elapsed(), Duration::ZERO);
        assert!(!live.is_solved());

        let new_ids = live.with_session(|s| s.puzzle().tile_ids());
        assert_eq!(new_ids.len(), 15);
        assert!(new_ids.iter().all(|id| !old_ids.contains(id)));

        let stale = first.unwrap();
        assert!(!live.with_session_mut(|s| s.tick(stale)), "tick from the old game");
        assert_eq!(live.elapsed(), Duration::ZERO);

        let arrangement = live.with_session(|s| s.puzzle().arrangement());
        assert!(live.new_game(vec![0usize; 5], 3).is_err());
        assert_eq!(live.ticker.as_ref().map(ClockTicker::generation), second);
        assert_eq!(live.grid_size(), 4);
        assert_eq!(live.with_session(|s| s.puzzle().arrangement()), arrangement);
    }
}
