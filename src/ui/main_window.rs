//! # Main Window Module
//!
//! The dungeon viewer window. It owns the [`ProceduralGenerator`], draws the
//! published dungeon through a [`DungeonDebugger`] and rebuilds it when the
//! user presses `R` or clicks "Regenerate".

use eframe::egui;
use eframe::egui::{CentralPanel, TopBottomPanel};
use log::info;
use std::error::Error;

use crate::bsp::debug_viz::DungeonDebugger;
use crate::bsp::ProceduralGenerator;

/// MainWindow holds the state of the UI.
pub struct MainWindow {
    generator: ProceduralGenerator,
    debugger: DungeonDebugger,
    /// Seed typed into the top bar; empty means a fresh random seed.
    seed_input: String,
    /// A status message to display in the status bar.
    status_message: String,
}

impl MainWindow {
    pub fn new(generator: ProceduralGenerator) -> Self {
        MainWindow {
            generator,
            debugger: DungeonDebugger::new(),
            seed_input: String::new(),
            status_message: "Press R to regenerate".to_owned(),
        }
    }

    /// Updates the status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn regenerate(&mut self) {
        let text = self.seed_input.trim().to_owned();
        let seed = if text.is_empty() {
            None
        } else {
            match text.parse::<u64>() {
                Ok(seed) => Some(seed),
                Err(_) => {
                    self.set_status(format!("'{}' is not a valid seed", text));
                    return;
                }
            }
        };
        let stats = self.generator.regenerate(seed);
        let msg = format!(
            "{} rooms, {} corridors in {:.3} ms",
            stats.room_count,
            stats.corridor_count,
            stats.generation_time * 1000.0
        );
        self.set_status(msg);
    }

    /// Draws the complete UI layout.
    pub fn update(&mut self, ctx: &egui::Context) {
        if ctx.input().key_pressed(egui::Key::R) {
            self.regenerate();
        }

        TopBottomPanel::top("top_menu").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Regenerate").clicked() {
                    self.regenerate();
                }
                ui.label("Seed:");
                ui.text_edit_singleline(&mut self.seed_input);
            });
        });

        TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Status: {}", self.status_message));
            });
        });

        CentralPanel::default().show(ctx, |ui| {
            let current = self.generator.current();
            let dungeon = current.read();
            self.debugger.show(ui, &dungeon, self.generator.stats());
        });
    }
}

struct MainWindowApp {
    window: MainWindow,
}

impl eframe::App for MainWindowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.window.update(ctx);
    }
}

/// Runs the viewer as a standalone egui application.
pub fn run_main_window(generator: ProceduralGenerator) -> Result<(), Box<dyn Error>> {
    let native_options = eframe::NativeOptions::default();
    let window = MainWindow::new(generator);
    eframe::run_native(
        "BSP Dungeon",
        native_options,
        Box::new(move |_cc| Box::new(MainWindowApp { window })),
    );
    // Since run_native returns (), we simply return Ok.
    info!("Viewer closed.");
    Ok(())
}
