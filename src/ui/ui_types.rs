use std::path::PathBuf;

use crate::{
    appconfig::AppSettings,
    marks::{MarkingMode, Marks, Point},
    pipeline::{PipelineMessage, Stage},
};

use super::output_log::OutputLog;

#[derive(serde::Serialize, serde::Deserialize, Default)]
#[serde(default)]
pub struct App {
    pub settings: AppSettings,

    /// raw entry text, handed to the segmentation tool unvalidated
    #[serde(skip)]
    pub n0: String,
    #[serde(skip)]
    pub nf: String,

    #[serde(skip)]
    pub current_tab: Tab,

    #[serde(skip)]
    pub mode: Option<MarkingMode>,

    #[serde(skip)]
    pub image_path: Option<PathBuf>,

    #[serde(skip)]
    pub overlay_path: Option<PathBuf>,

    #[serde(skip)]
    pub marks: Marks,

    #[serde(skip)]
    pub overlay_texture: Option<egui::TextureHandle>,

    #[serde(skip)]
    pub hovered_pixel: Option<Point>,

    #[serde(skip)]
    pub output: OutputLog,

    #[serde(skip)]
    pub running_stage: Option<Stage>,

    /// Some while a pipeline run is in flight
    #[serde(skip)]
    pub channel_to_ui: Option<crossbeam_channel::Receiver<PipelineMessage>>,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, PartialOrd)]
pub enum Tab {
    Board,
    Options,
}

impl Default for Tab {
    fn default() -> Self {
        Tab::Board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_settings_survive_restart() {
        let mut app = App::default();
        app.n0 = "3000".to_string();
        app.nf = "50".to_string();
        app.settings.overlay_rgb = "1,0,0".to_string();
        app.mode = Some(MarkingMode::NewSeed);
        app.marks.seeds.push((1, 2));

        let stored = toml::to_string(&app).unwrap();
        let restored: App = toml::from_str(&stored).unwrap();

        assert_eq!(restored.n0, "");
        assert_eq!(restored.nf, "");
        assert_eq!(restored.settings.overlay_rgb, "1,0,0");
        assert_eq!(restored.mode, None);
        assert!(restored.marks.is_empty());
    }
}
