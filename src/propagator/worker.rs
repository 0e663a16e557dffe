use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::feed::OrbitalElementRecord;
use crate::propagator::buffer::{is_positionable, PositionBuffer};
use crate::propagator::ephemeris::Ephemeris;
use crate::propagator::error::PropagatorError;
use crate::propagator::tracked::{simulated_instant, TrackedSet};
use crate::propagator::types::{Command, Configure};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagatorSettings {
    pub tick_interval: Duration,
    pub time_scale: f64,
}

impl Default for PropagatorSettings {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            time_scale: 1.0,
        }
    }
}

/// Latest published buffer; `None` until the first tick.
pub type PositionReceiver = watch::Receiver<Option<PositionBuffer>>;

pub struct PropagatorHandle {
    commands: mpsc::UnboundedSender<Command>,
    positions: PositionReceiver,
    join: JoinHandle<()>,
}

impl PropagatorHandle {
    pub fn spawn<E: Ephemeris>(ephemeris: E, settings: PropagatorSettings) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (positions_tx, positions) = watch::channel(None);

        let worker = Worker::new(Arc::new(ephemeris), settings, positions_tx);
        let join = tokio::spawn(worker.run(command_rx));

        Self {
            commands,
            positions,
            join,
        }
    }

    pub fn send(&self, command: Command) -> Result<(), PropagatorError> {
        self.commands
            .send(command)
            .map_err(|_| PropagatorError::Stopped)
    }

    pub fn initialize(&self, records: Vec<OrbitalElementRecord>) -> Result<(), PropagatorError> {
        self.send(Command::Init { records })
    }

    pub fn update_records(
        &self,
        records: Vec<OrbitalElementRecord>,
    ) -> Result<(), PropagatorError> {
        self.send(Command::UpdateTles { records })
    }

    pub fn configure(&self, configure: Configure) -> Result<(), PropagatorError> {
        self.send(Command::Config(configure))
    }

    pub fn stop(&self) -> Result<(), PropagatorError> {
        self.send(Command::Stop)
    }

    pub fn subscribe(&self) -> PositionReceiver {
        self.positions.clone()
    }

    pub async fn shutdown(self) {
        drop(self.commands);
        if let Err(e) = self.join.await {
            log::error!("Propagator worker panicked: {}", e);
        }
    }
}

struct Worker<E: Ephemeris> {
    ephemeris: Arc<E>,
    tracked: Arc<TrackedSet<E::State>>,
    tick_interval: Duration,
    time_scale: f64,
    /// `Some` while running.
    ticker: Option<Interval>,
    in_flight: Option<JoinHandle<PositionBuffer>>,
    tick_requested: bool,
    positions: watch::Sender<Option<PositionBuffer>>,
}

impl<E: Ephemeris> Worker<E> {
    fn new(
        ephemeris: Arc<E>,
        settings: PropagatorSettings,
        positions: watch::Sender<Option<PositionBuffer>>,
    ) -> Self {
        let tick_interval = if settings.tick_interval.is_zero() {
            log::warn!(
                "Zero tick interval, using {:?} instead",
                DEFAULT_TICK_INTERVAL
            );
            DEFAULT_TICK_INTERVAL
        } else {
            settings.tick_interval
        };

        Self {
            ephemeris,
            tracked: Arc::new(TrackedSet::empty()),
            tick_interval,
            time_scale: settings.time_scale,
            ticker: None,
            in_flight: None,
            tick_requested: false,
            positions,
        }
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        log::info!(
            "Propagator worker started (tick {:?}, time scale {})",
            self.tick_interval,
            self.time_scale
        );

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                _ = next_tick(&mut self.ticker), if self.in_flight.is_none() => {
                    self.start_tick();
                }
                result = join_tick(&mut self.in_flight), if self.in_flight.is_some() => {
                    self.in_flight = None;
                    self.finish_tick(result);
                }
            }
        }

        log::info!("Propagator worker exiting");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Init { records } => {
                self.replace_tracked(&records);
                self.restart_ticker();
                self.request_tick();
            }
            Command::Config(configure) => self.configure(configure),
            Command::UpdateTles { records } => self.replace_tracked(&records),
            Command::Stop => self.stop(),
        }
    }

    fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    fn replace_tracked(&mut self, records: &[OrbitalElementRecord]) {
        let generation = self.tracked.generation() + 1;
        let tracked = TrackedSet::parse(self.ephemeris.as_ref(), records, generation);
        log::info!(
            "Tracking {} of {} objects (generation {})",
            tracked.len(),
            records.len(),
            generation
        );
        log::debug!("Tracked objects: {:?}", tracked.names());
        if tracked.is_empty() && !records.is_empty() {
            log::warn!("None of the {} records could be parsed", records.len());
        }
        self.tracked = Arc::new(tracked);
    }

    fn restart_ticker(&mut self) {
        let mut ticker = time::interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
    }

    fn configure(&mut self, configure: Configure) {
        if let Err(e) = configure.validate() {
            log::warn!("Ignoring configuration: {}", e);
            return;
        }

        if let Some(scale) = configure.time_scale {
            self.time_scale = scale;
        }

        if let Some(ms) = configure.tick_interval_ms {
            let interval = Duration::from_millis(ms);
            if interval != self.tick_interval {
                self.tick_interval = interval;
                if self.is_running() {
                    self.restart_ticker();
                }
            }
        }

        log::info!(
            "Propagator configured (tick {:?}, time scale {})",
            self.tick_interval,
            self.time_scale
        );
    }

    fn stop(&mut self) {
        if self.ticker.take().is_some() {
            log::info!("Propagator stopped");
        }
        self.tick_requested = false;
    }

    fn request_tick(&mut self) {
        if self.in_flight.is_none() {
            self.start_tick();
        } else {
            self.tick_requested = true;
        }
    }

    fn start_tick(&mut self) {
        let tracked = self.tracked.clone();
        let ephemeris = self.ephemeris.clone();
        let tick_interval = self.tick_interval;
        let instant = simulated_instant(Utc::now(), self.time_scale);

        self.in_flight = Some(tokio::task::spawn_blocking(move || match instant {
            Some(instant) => tracked.propagate(ephemeris.as_ref(), instant, tick_interval),
            None => {
                log::warn!("Simulated instant out of range, no object is positionable");
                tracked.unpositionable(tick_interval)
            }
        }));
    }

    fn finish_tick(&mut self, result: Result<PositionBuffer, JoinError>) {
        match result {
            Ok(_) if !self.is_running() => {
                log::debug!("Discarding tick completed after stop");
            }
            Ok(buffer) if buffer.generation() != self.tracked.generation() => {
                log::debug!(
                    "Discarding stale tick for generation {} (current {})",
                    buffer.generation(),
                    self.tracked.generation()
                );
            }
            Ok(buffer) => {
                log::debug!(
                    "Publishing {} positions, {} positionable (generation {})",
                    buffer.count(),
                    buffer.positions().iter().filter(|p| is_positionable(p)).count(),
                    buffer.generation()
                );
                self.positions.send_replace(Some(buffer));
            }
            Err(e) => log::error!("Propagation tick failed: {}", e),
        }

        if std::mem::take(&mut self.tick_requested) && self.is_running() {
            self.start_tick();
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn join_tick(
    in_flight: &mut Option<JoinHandle<PositionBuffer>>,
) -> Result<PositionBuffer, JoinError> {
    match in_flight {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}
