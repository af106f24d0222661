// ui.rs - Tabs, pattern picker and grid painting

use eframe::egui;
use egui::{Color32, Rect, RichText, Stroke, Vec2};

use crate::ConwayApp;
use crate::tabs::SimulationTab;
use conway::{Grid, Pattern};

/// Grid lines are drawn every this many cells.
const GRID_LINE_STEP: usize = 5;

/// User input collected while drawing, applied once the frame is laid out.
enum Action {
    Open(Pattern),
    Select(Option<u64>),
    Close(u64),
    Pause(u64),
    Resume(u64),
}

impl eframe::App for ConwayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.refresh();

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                if ui.selectable_label(self.selected.is_none(), "Select Pattern").clicked() {
                    actions.push(Action::Select(None));
                }
                for tab in self.tabs.iter() {
                    ui.separator();
                    let selected = self.selected == Some(tab.id);
                    if ui.selectable_label(selected, &tab.title).clicked() {
                        actions.push(Action::Select(Some(tab.id)));
                    }
                    if ui.small_button("✖").clicked() {
                        actions.push(Action::Close(tab.id));
                    }
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            match self.selected.and_then(|id| self.tabs.get(id)) {
                Some(tab) => self.simulation_tab(ui, tab, &mut actions),
                None => self.pattern_picker(ui, &mut actions),
            }
        });

        for action in actions {
            match action {
                Action::Open(pattern) => self.run_simulation(&pattern),
                Action::Select(id) => self.selected = id,
                Action::Close(id) => self.close(id),
                Action::Pause(id) => self.pause(id),
                Action::Resume(id) => self.resume(id),
            }
        }

        // Keep repainting at the generation cadence while something animates
        if self.is_animating() {
            ctx.request_repaint_after(self.interval());
        }
    }
}

impl ConwayApp {
    fn pattern_picker(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("Select a Pattern").size(16.0).strong());
        });
        ui.add_space(10.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    for category in self.catalog().categories() {
                        ui.add_space(5.0);
                        ui.label(RichText::new(&category.name).size(14.0).strong());
                        for pattern in &category.patterns {
                            let button = egui::Button::new(&pattern.name);
                            if ui.add_sized([240.0, 36.0], button).clicked() {
                                actions.push(Action::Open(pattern.clone()));
                            }
                        }
                    }
                });
            });
    }

    fn simulation_tab(&self, ui: &mut egui::Ui, tab: &SimulationTab, actions: &mut Vec<Action>) {
        ui.horizontal(|ui| {
            ui.heading(&tab.title);
            ui.separator();

            if tab.is_running() {
                if ui.button("⏸ Pause").clicked() {
                    actions.push(Action::Pause(tab.id));
                }
            } else if ui.add_enabled(tab.can_resume(), egui::Button::new("▶ Resume")).clicked() {
                actions.push(Action::Resume(tab.id));
            }

            ui.separator();
            ui.label(format!("Generation: {}", tab.frame.generation));
            ui.label(format!("Live cells: {}", tab.frame.grid.population()));
            if tab.frame.cycle_detected {
                ui.label("(repeating)");
            }
        });

        ui.separator();
        self.paint_grid(ui, &tab.frame.grid);
    }

    fn paint_grid(&self, ui: &mut egui::Ui, grid: &Grid) {
        let (rows, cols) = (grid.rows(), grid.cols());
        let available = ui.available_size();
        let cell = (available.x / cols as f32).min(available.y / rows as f32).max(1.0);
        let size = Vec2::new(cell * cols as f32, cell * rows as f32);

        let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
        let origin = response.rect.min;

        painter.rect_filled(response.rect, 0.0, self.dead_color);

        for (row, col) in grid.live_cells() {
            let min = origin + Vec2::new(col as f32 * cell, row as f32 * cell);
            painter.rect_filled(Rect::from_min_size(min, Vec2::splat(cell)), 0.0, self.live_color);
        }

        let stroke = Stroke::new(0.5, Color32::GRAY);
        for col in (0..=cols).step_by(GRID_LINE_STEP) {
            let x = origin.x + col as f32 * cell;
            painter.line_segment([egui::pos2(x, origin.y), egui::pos2(x, origin.y + size.y)], stroke);
        }
        for row in (0..=rows).step_by(GRID_LINE_STEP) {
            let y = origin.y + row as f32 * cell;
            painter.line_segment([egui::pos2(origin.x, y), egui::pos2(origin.x + size.x, y)], stroke);
        }
    }
}
