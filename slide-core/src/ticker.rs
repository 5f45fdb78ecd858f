use crate::session::SharedSession;
use log::{trace, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Background task that ticks a session clock once per interval.
///
/// The task sleeps on a channel so `cancel` wakes it immediately. Before touching the
/// session it checks the run flag, takes the session lock, and checks the flag again;
/// the session additionally rejects ticks whose generation is stale.
#[derive(Debug)]
pub struct ClockTicker {
    running: Arc<AtomicBool>,
    wake: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl ClockTicker {
    /// Spawns a ticker for clock run `generation` of `session`.
    pub fn spawn<B>(session: SharedSession<B>, interval: Duration, generation: u64) -> Self
    where
        B: Send + Sync + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let (wake, sleeper) = mpsc::channel::<()>();
        let flag = Arc::clone(&running);

        let spawned = thread::Builder::new()
            .name(format!("session-clock-{generation}"))
            .spawn(move || {
                loop {
                    match sleeper.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                    if !flag.load(Ordering::Acquire) {
                        break;
                    }
                    let mut guard = session.lock().unwrap_or_else(PoisonError::into_inner);
                    if !flag.load(Ordering::Acquire) {
                        break;
                    }
                    guard.tick(generation);
                }
                trace!("Clock ticker for generation {} exited", generation);
            });

        let handle = match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Failed to spawn clock ticker: {}. Elapsed time will not advance.", e);
                running.store(false, Ordering::Release);
                None
            }
        };

        Self {
            running,
            wake: Some(wake),
            handle,
            generation,
        }
    }

    /// Clock run this ticker serves.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_active(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stops the ticker. Safe to call more than once.
    pub fn cancel(&mut self) {
        self.running.store(false, Ordering::Release);
        // Dropping the sender wakes the sleeping thread.
        self.wake.take();
    }

    /// Cancels and waits for the thread to exit. Must not be called while holding the
    /// session lock.
    pub fn join(mut self) {
        self.cancel();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Clock ticker thread panicked");
            }
        }
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}
