//! Timer-driven animation of a [`SimulationRun`].
//!
//! A [`Driver`] owns one run inside a tokio task, steps it on a fixed
//! interval and publishes each generation on a `watch` channel. The
//! [`Scheduler`] keeps at most one driver alive: starting a new run stops the
//! previous one first.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, error, info, instrument, warn};

use crate::error::Result;
use crate::grid::Grid;
use crate::run::SimulationRun;

/// Shortest interval a driver will tick at. `tokio::time::interval` rejects zero.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// One published generation.
#[derive(Debug, Clone)]
pub struct Frame {
    pub generation: u64,
    pub grid: Arc<Grid>,
    pub cycle_detected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Time between generations.
    pub interval: Duration,
    /// Length of one animation cycle in frames. Zero means no cycle boundary.
    pub frames_per_cycle: u64,
    /// Start another cycle when one ends. The grid keeps evolving across
    /// cycles; it is never reset to the seed.
    pub repeat: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(150),
            frames_per_cycle: 1000,
            repeat: true,
        }
    }
}

pub struct Driver {
    title: String,
    frames: watch::Receiver<Frame>,
    stop: oneshot::Sender<()>,
    task: JoinHandle<SimulationRun>,
}

impl Driver {
    /// Spawn the animation task on `handle`. The seed generation is published
    /// immediately; the first step happens one interval later. Intervals below
    /// [`MIN_INTERVAL`] are raised to it.
    #[instrument(skip_all, fields(title = %run.title()))]
    pub fn spawn(run: SimulationRun, mut config: DriverConfig, handle: &Handle) -> Self {
        if config.interval < MIN_INTERVAL {
            warn!("Interval {:?} is too short, using {:?}", config.interval, MIN_INTERVAL);
            config.interval = MIN_INTERVAL;
        }
        info!("Starting driver every {:?}", config.interval);
        let title = run.title().to_string();
        let (frame_tx, frames) = watch::channel(run.frame());
        let (stop, stop_rx) = oneshot::channel();
        let task = handle.spawn(animate(run, config, frame_tx, stop_rx));
        Self {
            title,
            frames,
            stop,
            task,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// A receiver that is notified on every new generation.
    pub fn frames(&self) -> watch::Receiver<Frame> {
        self.frames.clone()
    }

    pub fn latest(&self) -> Frame {
        self.frames.borrow().clone()
    }

    /// True once a non-repeating animation has played all its frames.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the timer and take the run back, at whatever generation it reached.
    pub async fn stop(self) -> Result<SimulationRun> {
        // The task may already have finished on its own.
        let _ = self.stop.send(());
        let run = self.task.await?;
        info!("Stopped driver for '{}' at generation {}", run.title(), run.generation());
        Ok(run)
    }
}

async fn animate(
    mut run: SimulationRun,
    config: DriverConfig,
    frames: watch::Sender<Frame>,
    mut stop: oneshot::Receiver<()>,
) -> SimulationRun {
    let mut ticker = time::interval(config.interval);
    // The first tick completes immediately; the seed frame is already out.
    ticker.tick().await;

    let mut frame = 0u64;
    loop {
        tokio::select! {
            // Also fires when the Driver is dropped without `stop`.
            _ = &mut stop => break,
            _ = ticker.tick() => {}
        }

        run.step();
        frames.send_replace(run.frame());

        frame += 1;
        if config.frames_per_cycle > 0 && frame == config.frames_per_cycle {
            if !config.repeat {
                info!("'{}' finished after {} frames", run.title(), frame);
                break;
            }
            debug!("'{}' animation cycle restarted at generation {}", run.title(), run.generation());
            frame = 0;
        }
    }
    run
}

/// Keeps at most one [`Driver`] running.
pub struct Scheduler {
    handle: Handle,
    config: DriverConfig,
    active: Option<Driver>,
}

impl Scheduler {
    pub fn new(handle: Handle, config: DriverConfig) -> Self {
        Self {
            handle,
            config,
            active: None,
        }
    }

    pub fn config(&self) -> DriverConfig {
        self.config
    }

    pub fn active(&self) -> Option<&Driver> {
        self.active.as_ref()
    }

    /// Stop whatever is running, then start animating `run`. Returns the run
    /// that was stopped, if any. A previous driver that failed is logged and
    /// discarded; `run` is started regardless.
    pub async fn start(&mut self, run: SimulationRun) -> Option<SimulationRun> {
        let previous = match self.stop().await {
            Ok(previous) => previous,
            Err(e) => {
                error!("Previous driver failed, its run is lost: {}", e);
                None
            }
        };
        self.active = Some(Driver::spawn(run, self.config, &self.handle));
        previous
    }

    /// Stop the active driver and hand back its run.
    pub async fn stop(&mut self) -> Result<Option<SimulationRun>> {
        match self.active.take() {
            Some(driver) => Ok(Some(driver.stop().await?)),
            None => Ok(None),
        }
    }
}
