// tabs.rs - Simulation tabs and which one the scheduler is animating

use conway::{Frame, Scheduler, SimulationRun};
use tokio::sync::watch;
use tracing::{error, warn};

/// One simulation tab. While its driver runs, `frames` is set; once stopped
/// the run is parked here and its last frame stays on screen.
pub struct SimulationTab {
    pub id: u64,
    pub title: String,
    pub frame: Frame,
    frames: Option<watch::Receiver<Frame>>,
    parked: Option<SimulationRun>,
}

impl SimulationTab {
    pub fn is_running(&self) -> bool {
        self.frames.is_some()
    }

    /// False only when the run was lost with a failed driver.
    pub fn can_resume(&self) -> bool {
        self.parked.is_some()
    }
}

/// All open simulation tabs. At most one, `active`, is being animated.
pub struct Tabs {
    scheduler: Scheduler,
    tabs: Vec<SimulationTab>,
    active: Option<u64>,
    next_id: u64,
}

impl Tabs {
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            scheduler,
            tabs: Vec::new(),
            active: None,
            next_id: 0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimulationTab> + '_ {
        self.tabs.iter()
    }

    pub fn get(&self, id: u64) -> Option<&SimulationTab> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    pub fn active(&self) -> Option<u64> {
        self.active
    }

    pub fn interval(&self) -> std::time::Duration {
        self.scheduler.config().interval
    }

    /// Add a tab for `run` and make it the only animated one. Returns its id.
    pub async fn open(&mut self, run: SimulationRun) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.tabs.push(SimulationTab {
            id,
            title: run.title().to_string(),
            frame: run.frame(),
            frames: None,
            parked: Some(run),
        });
        self.resume(id).await;
        id
    }

    /// Start animating tab `id`, stopping whichever tab was animated before.
    pub async fn resume(&mut self, id: u64) {
        if self.active == Some(id) {
            return;
        }
        let Some(run) = self.tab_mut(id).and_then(|tab| tab.parked.take()) else {
            return;
        };
        self.stop_active().await;
        if let Some(stray) = self.scheduler.start(run).await {
            warn!("Scheduler returned untracked run '{}'", stray.title());
        }
        let frames = self.scheduler.active().map(|driver| driver.frames());
        if let Some(tab) = self.tab_mut(id) {
            tab.frames = frames;
        }
        self.active = Some(id);
    }

    pub async fn pause(&mut self, id: u64) {
        if self.active == Some(id) {
            self.stop_active().await;
        }
    }

    pub async fn close(&mut self, id: u64) {
        self.pause(id).await;
        self.tabs.retain(|tab| tab.id != id);
    }

    /// Pull the newest frame from the active driver; park its run once the
    /// driver has finished on its own.
    pub async fn refresh(&mut self) {
        let Some(id) = self.active else {
            return;
        };
        let Some(tab) = self.tab_mut(id) else {
            return;
        };
        let Some(frames) = tab.frames.as_mut() else {
            return;
        };
        let finished = match frames.has_changed() {
            Ok(true) => {
                tab.frame = frames.borrow_and_update().clone();
                false
            }
            Ok(false) => false,
            Err(_) => {
                tab.frame = frames.borrow().clone();
                true
            }
        };
        if finished {
            self.stop_active().await;
        }
    }

    /// Stop the scheduler and hand the run back to the tab it belongs to. The
    /// tab stops counting as running even if the run could not be recovered.
    async fn stop_active(&mut self) {
        let Some(id) = self.active.take() else {
            return;
        };
        let stopped = self.scheduler.stop().await;
        let Some(tab) = self.tab_mut(id) else {
            return;
        };
        tab.frames = None;
        match stopped {
            Ok(Some(run)) => {
                tab.frame = run.frame();
                tab.parked = Some(run);
            }
            Ok(None) => warn!("Tab '{}' had no driver to stop", tab.title),
            Err(e) => error!("Simulation '{}' failed: {}", tab.title, e),
        }
    }

    fn tab_mut(&mut self, id: u64) -> Option<&mut SimulationTab> {
        self.tabs.iter_mut().find(|tab| tab.id == id)
    }
}
