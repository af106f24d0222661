// main.rs - Conway's Game of Life with a pattern picker and one tab per run
// Drawing lives in ui.rs; this file owns the simulations and their driver.

use anyhow::Result;
use conway::{AppConfig, Pattern, PatternCatalog, Scheduler, SimulationRun};
use eframe::egui;
use egui::Color32;
use tracing::{error, info};

use tabs::Tabs;

mod tabs;
mod telemetry;
mod ui;

fn main() -> Result<()> {
    telemetry::init_tracing();

    let config = AppConfig::load().unwrap_or_else(|e| {
        error!("Failed to load configuration, using defaults: {}", e);
        AppConfig::default()
    });
    let catalog = config.catalog().unwrap_or_else(|e| {
        error!("Failed to load pattern catalog, using built-in patterns: {}", e);
        PatternCatalog::builtin()
    });
    let runtime = tokio::runtime::Runtime::new()?;

    info!("Starting with a {}x{} grid", config.rows, config.cols);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Conway's Game of Life",
        options,
        Box::new(|_cc| Box::new(ConwayApp::new(config, catalog, runtime))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {e}"))
}

pub struct ConwayApp {
    config: AppConfig,
    catalog: PatternCatalog,
    runtime: tokio::runtime::Runtime,

    pub tabs: Tabs,
    /// Tab on screen; `None` is the pattern picker.
    pub selected: Option<u64>,

    pub live_color: Color32,
    pub dead_color: Color32,
}

impl ConwayApp {
    pub fn new(config: AppConfig, catalog: PatternCatalog, runtime: tokio::runtime::Runtime) -> Self {
        let scheduler = Scheduler::new(runtime.handle().clone(), config.driver_config());
        Self {
            config,
            catalog,
            runtime,
            tabs: Tabs::new(scheduler),
            selected: None,
            live_color: Color32::BLACK,
            dead_color: Color32::WHITE,
        }
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Open a new tab for `pattern` and make it the only running simulation.
    pub fn run_simulation(&mut self, pattern: &Pattern) {
        match SimulationRun::from_pattern(pattern, self.config.rows, self.config.cols) {
            Ok(run) => {
                let id = self.runtime.block_on(self.tabs.open(run));
                self.selected = Some(id);
            }
            Err(e) => error!("Error in simulation '{}': {}", pattern.name, e),
        }
    }

    pub fn resume(&mut self, id: u64) {
        self.runtime.block_on(self.tabs.resume(id));
    }

    pub fn pause(&mut self, id: u64) {
        self.runtime.block_on(self.tabs.pause(id));
    }

    pub fn close(&mut self, id: u64) {
        self.runtime.block_on(self.tabs.close(id));
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    /// Pull the newest frame from the running driver.
    pub fn refresh(&mut self) {
        self.runtime.block_on(self.tabs.refresh());
    }

    pub fn is_animating(&self) -> bool {
        self.tabs.active().is_some()
    }

    pub fn interval(&self) -> std::time::Duration {
        self.tabs.interval()
    }
}
