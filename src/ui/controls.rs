use std::path::PathBuf;

use anyhow::{anyhow, bail, ensure, Context, Result};
use tracing::{debug, error, info, trace, warn};

use crossbeam_channel::TryRecvError;
use egui::{Button, Color32, RichText};
use egui_extras::{Column, TableBuilder};

use crate::{
    export,
    marks::MarkingMode,
    pipeline::{PipelineMessage, PipelineRequest},
};

use super::ui_types::App;

const ACTIVE_COLOR: Color32 = Color32::from_rgb(50, 158, 244);

/// pipeline
impl App {
    pub fn is_running(&self) -> bool {
        self.channel_to_ui.is_some()
    }

    pub fn select_image(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new().set_title("Select Image").pick_file() else {
            debug!("Image selection cancelled");
            return;
        };
        self.start_pipeline(ctx, path);
    }

    pub fn start_pipeline(&mut self, ctx: &egui::Context, image: PathBuf) {
        if self.is_running() {
            warn!("Pipeline already running, ignoring {}", image.display());
            return;
        }

        info!("Processing {}", image.display());

        let request = PipelineRequest::from_fields(image.clone(), &self.n0, &self.nf);
        self.image_path = Some(image);

        let (tx, rx) = crossbeam_channel::unbounded();
        self.channel_to_ui = Some(rx);

        crate::pipeline::spawn_pipeline_thread(
            ctx.clone(),
            self.settings.pipeline_config(),
            request,
            tx,
        );
    }

    pub fn poll_pipeline(&mut self, ctx: &egui::Context) {
        loop {
            let Some(rx) = self.channel_to_ui.as_ref() else {
                return;
            };
            match rx.try_recv() {
                Ok(msg) => self.handle_pipeline_message(ctx, msg),
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => {
                    error!("Pipeline worker exited without a result");
                    self.handle_pipeline_message(
                        ctx,
                        PipelineMessage::Error("pipeline worker stopped".to_string()),
                    );
                    return;
                }
            }
        }
    }

    pub fn handle_pipeline_message(&mut self, ctx: &egui::Context, msg: PipelineMessage) {
        match msg {
            PipelineMessage::StageStarted(stage) => {
                debug!("Running {}", stage);
                self.running_stage = Some(stage);
            }
            PipelineMessage::Failed { stage, stderr } => {
                self.output.replace(format!("{} Errors:\n{}", stage, stderr));
                self.finish_pipeline();
            }
            PipelineMessage::Error(e) => {
                self.output.clear();
                self.output.append_message(&format!("Error: {}", e));
                self.finish_pipeline();
            }
            PipelineMessage::Finished {
                image,
                overlay,
                pixels,
            } => {
                debug!(
                    "Overlay {} ({} x {}) ready for {}",
                    overlay.display(),
                    pixels.size[0],
                    pixels.size[1],
                    image.display()
                );
                let texture = ctx.load_texture("overlay", pixels, egui::TextureOptions::NEAREST);
                self.overlay_texture = Some(texture);
                self.overlay_path = Some(overlay);
                self.output.clear();
                self.finish_pipeline();
            }
        }
    }

    fn finish_pipeline(&mut self) {
        self.running_stage = None;
        self.channel_to_ui = None;
    }
}

/// coordinates
impl App {
    pub fn set_mode(&mut self, mode: MarkingMode) {
        debug!("Marking mode: {}", mode.to_str());
        self.mode = Some(mode);
    }

    pub fn save_coordinates(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Save Coordinates")
            .add_filter("CSV files", &["csv"])
            .set_file_name("coordinates.csv")
            .save_file()
        else {
            return;
        };
        let path = export::with_csv_extension(path);

        match export::save_csv(&path, &self.marks) {
            Ok(()) => self.output.append_message("Coordinates saved successfully."),
            Err(e) => {
                error!("Failed to save coordinates: {:#}", e);
                self.output
                    .append_message(&format!("Failed to save coordinates: {:#}", e));
            }
        }
    }

    pub fn load_coordinates(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Load Coordinates")
            .add_filter("CSV files", &["csv"])
            .pick_file()
        else {
            return;
        };

        match export::load_csv(&path) {
            Ok(marks) => {
                self.marks = marks;
                self.output
                    .append_message(&format!("Coordinates loaded from {}", path.display()));
            }
            Err(e) => {
                error!("Failed to load coordinates: {:#}", e);
                self.output
                    .append_message(&format!("Failed to load coordinates: {:#}", e));
            }
        }
    }
}

/// widgets
impl App {
    pub fn controls(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("bounds").num_columns(2).show(ui, |ui| {
            ui.label("n0:");
            ui.text_edit_singleline(&mut self.n0);
            ui.end_row();

            ui.label("nf:");
            ui.text_edit_singleline(&mut self.nf);
            ui.end_row();
        });

        ui.horizontal(|ui| {
            if ui
                .add_enabled(
                    !self.is_running(),
                    Button::new(RichText::new("Select Image").size(16.)),
                )
                .clicked()
            {
                self.select_image(ui.ctx());
            }

            if let Some(stage) = self.running_stage {
                ui.spinner();
                ui.label(format!("Running {}...", stage));
            }
        });
        ui.separator();

        /// marking
        ui.horizontal(|ui| {
            for mode in [MarkingMode::NewSeed, MarkingMode::LocateSuperpixel] {
                let but = Button::new(RichText::new(mode.to_str()).size(16.));
                let but = if self.mode == Some(mode) {
                    but.fill(ACTIVE_COLOR)
                } else {
                    but
                };
                if ui.add(but).clicked() {
                    self.set_mode(mode);
                }
            }

            if ui.button(RichText::new("Erase").size(16.)).clicked() {
                self.marks.erase();
            }
        });

        ui.horizontal(|ui| {
            if ui
                .button(RichText::new("Save Coordinates").size(16.))
                .clicked()
            {
                self.save_coordinates();
            }
            if ui
                .button(RichText::new("Load Coordinates").size(16.))
                .clicked()
            {
                self.load_coordinates();
            }
        });
        ui.separator();

        self.marks_table(ui);
        ui.separator();

        self.output_log(ui);
    }

    fn marks_table(&mut self, ui: &mut egui::Ui) {
        let mut rows = self
            .marks
            .seeds
            .iter()
            .map(|&p| ("Seed", p))
            .collect::<Vec<_>>();
        if let Some(p) = self.marks.superpixel {
            rows.push(("Superpixel", p));
        }

        if rows.is_empty() {
            ui.label("No marks");
            return;
        }

        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(200.)
            .column(Column::auto().at_least(90.))
            .column(Column::auto().at_least(50.))
            .column(Column::remainder())
            .header(20., |mut header| {
                header.col(|ui| {
                    ui.strong("Type");
                });
                header.col(|ui| {
                    ui.strong("X");
                });
                header.col(|ui| {
                    ui.strong("Y");
                });
            })
            .body(|body| {
                body.rows(18., rows.len(), |mut row| {
                    let (kind, (x, y)) = rows[row.index()];
                    row.col(|ui| {
                        ui.label(kind);
                    });
                    row.col(|ui| {
                        ui.label(x.to_string());
                    });
                    row.col(|ui| {
                        ui.label(y.to_string());
                    });
                });
            });
    }

    fn output_log(&mut self, ui: &mut egui::Ui) {
        if self.output.is_empty() {
            return;
        }

        ui.horizontal(|ui| {
            ui.heading("Output");
            if ui.button("Clear").clicked() {
                self.output.clear();
            }
        });

        let mut text = self.output.text();
        egui::ScrollArea::vertical()
            .id_salt("output")
            .max_height(200.0)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut text)
                        .font(egui::TextStyle::Monospace)
                        .desired_width(f32::INFINITY),
                );
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Stage;

    fn running_app() -> (App, crossbeam_channel::Sender<PipelineMessage>) {
        let mut app = App::default();
        let (tx, rx) = crossbeam_channel::unbounded();
        app.channel_to_ui = Some(rx);
        (app, tx)
    }

    #[test]
    fn test_stage_failure_replaces_output() {
        let ctx = egui::Context::default();
        let (mut app, tx) = running_app();
        app.output.append_line("previous run");

        tx.send(PipelineMessage::StageStarted(Stage::Segmentation))
            .unwrap();
        tx.send(PipelineMessage::Failed {
            stage: Stage::Segmentation,
            stderr: "n0 must be positive\n".to_string(),
        })
        .unwrap();
        app.poll_pipeline(&ctx);

        assert_eq!(app.output.text(), "RunSICLE Errors:\nn0 must be positive\n");
        assert!(!app.is_running());
        assert_eq!(app.running_stage, None);
        assert!(app.overlay_texture.is_none());
    }

    #[test]
    fn test_overlay_failure_keeps_previous_image_hidden() {
        let ctx = egui::Context::default();
        let (mut app, tx) = running_app();

        tx.send(PipelineMessage::StageStarted(Stage::Overlay)).unwrap();
        app.poll_pipeline(&ctx);
        assert_eq!(app.running_stage, Some(Stage::Overlay));
        assert!(app.is_running());

        tx.send(PipelineMessage::Failed {
            stage: Stage::Overlay,
            stderr: "bad labels".to_string(),
        })
        .unwrap();
        app.poll_pipeline(&ctx);

        assert_eq!(app.output.text(), "RunOvlayBorders Errors:\nbad labels");
        assert!(app.overlay_texture.is_none());
    }

    #[test]
    fn test_spawn_error_is_reported() {
        let ctx = egui::Context::default();
        let (mut app, tx) = running_app();

        tx.send(PipelineMessage::Error(
            "Failed to run ./bin/RunSICLE: No such file or directory".to_string(),
        ))
        .unwrap();
        app.poll_pipeline(&ctx);

        assert!(app.output.text().contains("Error: Failed to run ./bin/RunSICLE"));
        assert!(!app.is_running());
    }

    #[test]
    fn test_worker_gone_ends_run() {
        let ctx = egui::Context::default();
        let (mut app, tx) = running_app();

        tx.send(PipelineMessage::StageStarted(Stage::Segmentation))
            .unwrap();
        drop(tx);
        app.poll_pipeline(&ctx);

        assert!(!app.is_running());
        assert_eq!(app.running_stage, None);
        assert!(app.output.text().ends_with("Error: pipeline worker stopped"));

        app.poll_pipeline(&ctx);
        assert!(!app.is_running());
    }

    #[test]
    fn test_final_message_then_disconnect_is_not_an_error() {
        let ctx = egui::Context::default();
        let (mut app, tx) = running_app();

        tx.send(PipelineMessage::Failed {
            stage: Stage::Segmentation,
            stderr: "bad n0\n".to_string(),
        })
        .unwrap();
        drop(tx);
        app.poll_pipeline(&ctx);

        assert_eq!(app.output.text(), "RunSICLE Errors:\nbad n0\n");
        assert!(!app.is_running());
    }

    #[test]
    fn test_second_run_is_refused_while_running() {
        let ctx = egui::Context::default();
        let (mut app, _tx) = running_app();

        app.start_pipeline(&ctx, PathBuf::from("other.png"));
        assert_eq!(app.image_path, None);
    }

    #[test]
    fn test_set_mode() {
        let mut app = App::default();
        assert_eq!(app.mode, None);
        app.set_mode(MarkingMode::LocateSuperpixel);
        assert_eq!(app.mode, Some(MarkingMode::LocateSuperpixel));
        app.set_mode(MarkingMode::NewSeed);
        assert_eq!(app.mode, Some(MarkingMode::NewSeed));
    }
}
