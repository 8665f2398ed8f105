//! Scripted round used to exercise the session store end to end.
//!
//! Moves the store through start, playing and finished the way the game
//! screens do: pick a difficulty, count `timeCount` down once per tick and
//! award a point for every tick survived.

use std::time::Duration;

use game_store::{FieldChange, GameMode, GameStore};
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tokio::sync::oneshot;
use tokio::time::{self, MissedTickBehavior};

/// Values left in the store when a round ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundSummary {
    pub difficulty: String,
    pub points: i64,
    pub ticks: u64,
    /// Store changes the observer logged; zero when no observer ran.
    pub changes_observed: u64,
}

/// Plays one round to completion.
///
/// A countdown that is already zero or negative ends the round at once.
pub async fn play_round(
    store: &GameStore,
    difficulty: &str,
    tick_interval: Duration,
) -> RoundSummary {
    store.set_difficulty(difficulty);
    store.set_mode(GameMode::Playing);
    tracing::info!(
        "Round started: difficulty={:?}, time={}",
        difficulty,
        store.time_count()
    );

    let mut interval = time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    interval.tick().await;

    let mut ticks = 0;
    while store.time_count() > 0 {
        interval.tick().await;
        let remaining = store.tick();
        store.add_points(1);
        ticks += 1;
        tracing::debug!("Tick {}: {} left", ticks, remaining);
    }

    store.set_mode(GameMode::Finished);
    let session = store.get();
    tracing::info!("Round finished: points={}", session.points);

    RoundSummary {
        difficulty: session.difficulty,
        points: session.points,
        ticks,
        changes_observed: 0,
    }
}

/// What the observer saw before it stopped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObserverReport {
    pub observed: u64,
    pub last: Option<FieldChange>,
}

impl ObserverReport {
    fn record(&mut self, change: FieldChange) {
        self.observed += 1;
        tracing::info!(
            "{} = {} (revision {})",
            change.field,
            change.value,
            change.revision
        );
        self.last = Some(change);
    }
}

/// Logs every store change until `shutdown` fires or the channel closes.
///
/// On shutdown, changes already queued in the channel are drained first,
/// so every write made before the signal is counted.
pub async fn observe_changes(
    mut changes: broadcast::Receiver<FieldChange>,
    mut shutdown: oneshot::Receiver<()>,
) -> ObserverReport {
    tracing::debug!("Store observer started");

    let mut report = ObserverReport::default();
    loop {
        tokio::select! {
            biased;

            received = changes.recv() => match received {
                Ok(change) => report.record(change),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Store observer lagged, skipped {} changes", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            _ = &mut shutdown => {
                loop {
                    match changes.try_recv() {
                        Ok(change) => report.record(change),
                        Err(TryRecvError::Lagged(skipped)) => {
                            tracing::warn!("Store observer lagged, skipped {} changes", skipped);
                        }
                        Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                    }
                }
                break;
            }
        }
    }

    tracing::debug!("Store observer stopped after {} changes", report.observed);
    report
}
