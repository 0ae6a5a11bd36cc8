//! Unattended play: drive a number of moves end to end and report progress.
//!
//! [`SimulationDriver`] is the synchronous state machine. [`spawn`] runs it on
//! a dedicated worker thread and streams [`SimulationEvent`]s back over a
//! channel; [`run_simulation`] wraps that in progress / score / completion
//! callbacks invoked on the caller's thread, in move order.
use crate::config::SimulationConfig;
use crate::error::EngineError;
use crate::game::Game;
use crossbeam_channel::{unbounded, Receiver};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{info, trace, warn};

/// How a simulation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationStatus {
    /// Every requested move was played.
    Success,
    /// The sampler found no move before the budget was spent.
    Exhausted,
    /// The stop flag was raised between moves.
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationState {
    Running,
    Complete(SimulationStatus),
}

/// Final result of a simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationOutcome {
    pub status: SimulationStatus,
    pub moves_done: usize,
    pub total_moves: usize,
    /// Tiles destroyed during this run.
    pub score: u64,
}

impl SimulationOutcome {
    /// Converts an exhausted run into `EngineError::SimulationExhausted`.
    pub fn into_result(self) -> Result<Self, EngineError> {
        match self.status {
            SimulationStatus::Exhausted => Err(EngineError::SimulationExhausted {
                done: self.moves_done,
                total: self.total_moves,
            }),
            _ => Ok(self),
        }
    }
}

/// Notifications emitted by the driver, in the order things happen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationEvent {
    /// A turn was consumed; `done` never decreases and never exceeds `total`.
    Progress { done: usize, total: usize },
    /// A settle pass destroyed this many tiles.
    Score(usize),
    /// The run ended; always the last event.
    Complete(SimulationOutcome),
}

/// Plays moves on a [`Game`] until the budget is spent, the board runs out of
/// moves, or the stop flag is raised.
#[derive(Debug)]
pub struct SimulationDriver {
    config: SimulationConfig,
    moves_done: usize,
    score: u64,
    state: SimulationState,
    stop: Arc<AtomicBool>,
}

impl SimulationDriver {
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_stop_flag(config, Arc::new(AtomicBool::new(false)))
    }

    /// Creates a driver that stops before its next move once `stop` is set.
    pub fn with_stop_flag(config: SimulationConfig, stop: Arc<AtomicBool>) -> Self {
        SimulationDriver {
            config,
            moves_done: 0,
            score: 0,
            state: SimulationState::Running,
            stop,
        }
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn moves_done(&self) -> usize {
        self.moves_done
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    fn outcome(&self, status: SimulationStatus) -> SimulationOutcome {
        SimulationOutcome {
            status,
            moves_done: self.moves_done,
            total_moves: self.config.move_count,
            score: self.score,
        }
    }

    fn complete(
        &mut self,
        status: SimulationStatus,
        emit: &mut impl FnMut(SimulationEvent),
    ) -> SimulationState {
        let outcome = self.outcome(status);
        match status {
            SimulationStatus::Success => info!(score = outcome.score, "simulation success"),
            SimulationStatus::Exhausted => {
                warn!(moves_done = outcome.moves_done, "no moves after {} steps", outcome.moves_done)
            }
            SimulationStatus::Cancelled => {
                info!(moves_done = outcome.moves_done, "simulation cancelled")
            }
        }
        self.state = SimulationState::Complete(status);
        emit(SimulationEvent::Complete(outcome));
        self.state
    }

    /// Plays a single turn and returns the resulting state.
    ///
    /// A move rejected with `NoMatchProduced` (unconstrained strategy) still
    /// consumes the turn, with nothing scored. Calling `step` after completion
    /// does nothing.
    pub fn step(&mut self, game: &mut Game, emit: &mut impl FnMut(SimulationEvent)) -> SimulationState {
        if self.state != SimulationState::Running {
            return self.state;
        }
        let total = self.config.move_count;
        if self.moves_done >= total {
            return self.complete(SimulationStatus::Success, emit);
        }
        if self.stop.load(Ordering::Relaxed) {
            return self.complete(SimulationStatus::Cancelled, emit);
        }

        let mv = match game.next_move(self.config.strategy) {
            Ok(Some(mv)) => mv,
            Ok(None) => return self.complete(SimulationStatus::Exhausted, emit),
            Err(error) => {
                warn!(%error, "move sampler failed");
                return self.complete(SimulationStatus::Exhausted, emit);
            }
        };

        match game.request_swap(mv.cell, mv.direction) {
            Ok(report) => {
                for &destroyed in report.pass_destroyed.iter().filter(|&&n| n > 0) {
                    emit(SimulationEvent::Score(destroyed));
                }
                self.score += report.destroyed as u64;
            }
            Err(EngineError::NoMatchProduced { .. }) => {
                trace!(%mv, "move produced no match, turn consumed");
            }
            Err(error) => {
                warn!(%error, %mv, "sampled move was rejected");
                return self.complete(SimulationStatus::Exhausted, emit);
            }
        }

        self.moves_done += 1;
        emit(SimulationEvent::Progress {
            done: self.moves_done,
            total,
        });
        if self.moves_done == total {
            return self.complete(SimulationStatus::Success, emit);
        }
        SimulationState::Running
    }

    /// Steps until the run completes.
    pub fn run(&mut self, game: &mut Game, mut emit: impl FnMut(SimulationEvent)) -> SimulationOutcome {
        info!(
            moves = self.config.move_count,
            strategy = ?self.config.strategy,
            "simulation started"
        );
        loop {
            if let SimulationState::Complete(status) = self.step(game, &mut emit) {
                return self.outcome(status);
            }
        }
    }
}

/// A simulation running on its own worker thread.
pub struct SimulationHandle {
    events: Receiver<SimulationEvent>,
    stop: Arc<AtomicBool>,
    worker: JoinHandle<(Game, SimulationOutcome)>,
}

impl SimulationHandle {
    /// Events in move order. The channel disconnects once the worker is done.
    pub fn events(&self) -> &Receiver<SimulationEvent> {
        &self.events
    }

    /// Asks the worker to stop before its next move.
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Waits for the worker and hands the game back.
    pub fn join(self) -> Result<(Game, SimulationOutcome), EngineError> {
        self.worker
            .join()
            .map_err(|_| EngineError::WorkerFailed("simulation thread panicked".to_string()))
    }
}

/// Moves `game` onto a worker thread and starts simulating.
pub fn spawn(game: Game, config: SimulationConfig) -> Result<SimulationHandle, EngineError> {
    let (tx, rx) = unbounded();
    let stop = Arc::new(AtomicBool::new(false));
    let mut driver = SimulationDriver::with_stop_flag(config, Arc::clone(&stop));

    let worker = thread::Builder::new()
        .name("match3-simulation".to_string())
        .spawn(move || {
            let mut game = game;
            let outcome = driver.run(&mut game, |event| {
                // The receiver may already be gone; the outcome is still returned by join.
                let _ = tx.send(event);
            });
            (game, outcome)
        })
        .map_err(|e| EngineError::WorkerFailed(e.to_string()))?;

    Ok(SimulationHandle {
        events: rx,
        stop,
        worker,
    })
}

/// Runs a simulation on a worker thread, forwarding its events to callbacks.
///
/// The callbacks run on the calling thread, one at a time and in move order;
/// `on_complete` runs exactly once, last. Returns the game and the outcome
/// once the worker has finished.
pub fn run_simulation(
    game: Game,
    config: SimulationConfig,
    mut on_progress: impl FnMut(usize, usize),
    mut on_score: impl FnMut(usize),
    on_complete: impl FnOnce(SimulationStatus),
) -> Result<(Game, SimulationOutcome), EngineError> {
    let handle = spawn(game, config)?;
    let mut on_complete = Some(on_complete);

    for event in handle.events().iter() {
        match event {
            SimulationEvent::Progress { done, total } => on_progress(done, total),
            SimulationEvent::Score(destroyed) => on_score(destroyed),
            SimulationEvent::Complete(outcome) => {
                if let Some(callback) = on_complete.take() {
                    callback(outcome.status);
                }
            }
        }
    }

    handle.join()
}
