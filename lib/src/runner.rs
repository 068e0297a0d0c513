//! The run loop: name, key, persist, count, repeat.

use crate::error::{NomenError, Result};
use crate::export::PairLog;
use crate::key::{KeyGenerator, KeySource};
use crate::names::NameSource;
use crate::store::PairStore;
use crate::types::{Pair, RunState};
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

#[derive(Clone, Copy, Debug, Default)]
pub struct RunConfig {
    /// Pairings to produce before the run ends.
    pub requested: usize,
    /// Upper bound on each name request, key generation and store write.
    pub timeout: Option<Duration>,
}

impl RunConfig {
    pub fn new(requested: usize) -> Self {
        RunConfig {
            requested,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    Stopping,
    Stopped,
}

#[derive(Debug)]
pub enum Outcome {
    /// Every requested pairing was made.
    Completed,
    /// A stop was requested before the run finished.
    Interrupted,
    /// No further progress was possible.
    Aborted(NomenError),
}

#[derive(Debug)]
pub struct RunReport {
    pub state: RunState,
    pub outcome: Outcome,
}

impl RunReport {
    pub fn is_aborted(&self) -> bool {
        matches!(self.outcome, Outcome::Aborted(_))
    }
}

/// Create a connected stop handle and signal.
pub fn stop_signal() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle(Arc::new(tx)), StopSignal(rx))
}

#[derive(Clone, Debug)]
pub struct StopHandle(Arc<watch::Sender<bool>>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.send_replace(true);
    }
}

#[derive(Clone, Debug)]
pub struct StopSignal(watch::Receiver<bool>);

impl StopSignal {
    pub fn is_stopped(&self) -> bool {
        *self.0.borrow()
    }
}

/// Drives pairings until the requested count is reached, a stop is
/// requested, or the name source runs dry.
///
/// Pairings happen strictly one after another. A failed key generation,
/// store write, name request or timeout only costs that attempt; the next
/// pass starts over with a fresh name.
pub struct Runner<N, K = KeyGenerator> {
    names: N,
    keys: K,
    store: PairStore,
    config: RunConfig,
    state: RunState,
    phase: Phase,
    log: Option<PairLog>,
}

impl<N: NameSource> Runner<N, KeyGenerator> {
    pub fn new(names: N, store: PairStore, config: RunConfig) -> Self {
        Runner {
            names,
            keys: KeyGenerator::new(),
            store,
            config,
            state: RunState::new(config.requested),
            phase: Phase::Running,
            log: None,
        }
    }
}

impl<N: NameSource, K: KeySource> Runner<N, K> {
    pub fn with_keys<K2: KeySource>(self, keys: K2) -> Runner<N, K2> {
        Runner {
            names: self.names,
            keys,
            store: self.store,
            config: self.config,
            state: self.state,
            phase: self.phase,
            log: self.log,
        }
    }

    /// Also record every persisted pair in `log`.
    pub fn with_pair_log(mut self, log: PairLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn names(&self) -> &N {
        &self.names
    }

    pub async fn run(&mut self, stop: &StopSignal) -> RunReport {
        info!("Generating names and keys...");
        self.phase = Phase::Running;

        if let Some(capacity) = self.names.capacity() {
            if self.state.requested > capacity {
                println!(
                    "Warning: Requested {} keys but only {} unique name combinations are possible.",
                    self.state.requested, capacity
                );
                warn!(
                    "requested {} keys but the name space only holds {}",
                    self.state.requested, capacity
                );
            }
        }

        let outcome = loop {
            if self.state.is_done() {
                break Outcome::Completed;
            }
            if stop.is_stopped() {
                info!("Shutting down");
                break Outcome::Interrupted;
            }

            self.state.in_flight = 1;
            let result = self.pair_once().await;
            self.state.in_flight = 0;

            match result {
                Ok(pair) => {
                    if let Some(log) = &self.log {
                        log.push(pair).await;
                    }
                    self.state.completed += 1;
                    print!(
                        "Processed: {} / {}\r",
                        self.state.completed, self.state.requested
                    );
                    if let Err(e) = std::io::stdout().flush() {
                        warn!("failed to flush progress line: {}", e);
                    }
                }
                Err(e) if e.is_fatal() => {
                    error!("Generation stopped: {}", e);
                    break Outcome::Aborted(e);
                }
                Err(e) => warn!("Error processing pair: {}", e),
            }
        };

        self.phase = Phase::Stopping;
        println!();
        info!(
            "run finished with {} of {} pairings",
            self.state.completed, self.state.requested
        );
        self.phase = Phase::Stopped;

        RunReport {
            state: self.state,
            outcome,
        }
    }

    async fn pair_once(&mut self) -> Result<Pair> {
        let timeout = self.config.timeout;

        let name = bounded("name request", timeout, self.names.next_name()).await?;
        info!("Generated name: {}", name);

        let mut keys = self.keys.clone();
        let key = bounded("key generation", timeout, blocking(move || keys.generate())).await?;

        let store = self.store.clone();
        let stored_name = name.clone();
        settled_write(timeout, move || store.persist(&stored_name, &key)).await?;

        Ok(Pair::new(name, key))
    }
}

async fn bounded<T>(
    stage: &'static str,
    limit: Option<Duration>,
    work: impl Future<Output = Result<T>>,
) -> Result<T> {
    match limit {
        Some(after) => tokio::time::timeout(after, work)
            .await
            .map_err(|_| NomenError::Timeout { stage, after })?,
        None => work.await,
    }
}

/// Run a store write on a blocking thread.
///
/// A redb commit cannot be abandoned once started, so hitting the timeout
/// only gets logged; the write's own result still decides the pairing.
async fn settled_write<F>(limit: Option<Duration>, work: F) -> Result<()>
where
    F: FnOnce() -> Result<()> + Send + 'static,
{
    let mut write = tokio::task::spawn_blocking(work);
    if let Some(after) = limit {
        match tokio::time::timeout(after, &mut write).await {
            Ok(joined) => return joined?,
            Err(_) => {
                let stage = "store write";
                warn!(
                    "{}; waiting for the commit to settle",
                    NomenError::Timeout { stage, after }
                );
            }
        }
    }
    write.await?
}

async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}
