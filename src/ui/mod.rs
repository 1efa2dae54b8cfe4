pub mod canvas;
pub mod controls;
pub mod options;
pub mod output_log;
pub mod ui_types;
pub mod utils;

use ui_types::*;

use anyhow::{anyhow, bail, ensure, Context, Result};
use tracing::{debug, error, info, trace, warn};

use crate::appconfig::{AppSettings, CONFIG_PATH};

/// New
impl App {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut out: Self = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Default::default()
        };

        // config.toml wins over the settings eframe stored last session
        if std::path::Path::new(CONFIG_PATH).exists() {
            out.settings = AppSettings::load_or_default(CONFIG_PATH);
        }

        debug!("Settings: {:?}", out.settings);

        out
    }
}

impl eframe::App for App {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        self.poll_pipeline(ctx);

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.current_tab, Tab::Board, "Board");
                ui.selectable_value(&mut self.current_tab, Tab::Options, "Options");
            });
        });

        match self.current_tab {
            Tab::Board => {
                egui::SidePanel::right("right")
                    .resizable(true)
                    .default_width(320.)
                    .show(ctx, |ui| {
                        self.controls(ui);
                    });

                egui::TopBottomPanel::bottom("status")
                    .resizable(false)
                    .show(ctx, |ui| {
                        self.canvas_status(ui);
                    });

                egui::CentralPanel::default().show(ctx, |ui| {
                    self.canvas(ui);
                });
            }
            Tab::Options => {
                self.options(ctx);
            }
        }
    }
}
