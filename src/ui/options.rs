use anyhow::{anyhow, bail, ensure, Context, Result};
use tracing::{debug, error, info, trace, warn};

use crate::appconfig::{AppSettings, CONFIG_PATH};

use super::ui_types::App;

impl App {
    pub fn options(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self._options(ui);
        });
    }

    fn _options(&mut self, ui: &mut egui::Ui) {
        egui::widgets::global_theme_preference_buttons(ui);
        ui.separator();

        egui::Grid::new("options_grid")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                ui.label("Segmentation tool:");
                ui.text_edit_singleline(&mut self.settings.segmentation_bin);
                ui.end_row();

                ui.label("Overlay tool:");
                ui.text_edit_singleline(&mut self.settings.overlay_bin);
                ui.end_row();

                ui.label("Label output:");
                ui.text_edit_singleline(&mut self.settings.labels_out);
                ui.end_row();

                ui.label("Overlay labels:");
                ui.text_edit_singleline(&mut self.settings.overlay_labels);
                ui.end_row();

                ui.label("Overlay output:");
                ui.text_edit_singleline(&mut self.settings.overlay_out);
                ui.end_row();

                ui.label("Border color (r,g,b):");
                ui.text_edit_singleline(&mut self.settings.overlay_rgb);
                ui.end_row();

                ui.label("Multiscale:");
                ui.checkbox(&mut self.settings.multiscale, "");
                ui.end_row();

                ui.label("Seed radius:");
                let resp = ui.add(
                    egui::DragValue::new(&mut self.settings.seed_radius)
                        .speed(0.1)
                        .range(0.5..=20.0),
                );
                super::utils::make_scrollable(ui, resp, &mut self.settings.seed_radius, 0.5);
                ui.end_row();

                ui.label("Superpixel marker size:");
                let resp = ui.add(
                    egui::DragValue::new(&mut self.settings.cross_half_size)
                        .speed(0.1)
                        .range(1.0..=50.0),
                );
                super::utils::make_scrollable(ui, resp, &mut self.settings.cross_half_size, 1.0);
                ui.end_row();
            });

        ui.separator();

        ui.horizontal(|ui| {
            if ui.button(format!("Save to {}", CONFIG_PATH)).clicked() {
                match self.settings.save_to_file(CONFIG_PATH) {
                    Ok(()) => {
                        info!("Saved settings to {}", CONFIG_PATH);
                        self.output
                            .append_message(&format!("Settings saved to {}", CONFIG_PATH));
                    }
                    Err(e) => {
                        error!("Failed to save settings: {:#}", e);
                        self.output
                            .append_message(&format!("Failed to save settings: {:#}", e));
                    }
                }
            }

            if ui.button(format!("Reload {}", CONFIG_PATH)).clicked() {
                self.settings = AppSettings::load_or_default(CONFIG_PATH);
            }

            if ui.button("Reset to defaults").clicked() {
                self.settings = AppSettings::default();
            }
        });
    }
}
