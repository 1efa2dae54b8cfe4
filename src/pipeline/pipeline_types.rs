use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Segmentation,
    Overlay,
}

impl Stage {
    /// Name of the external tool, used as the heading for its error output.
    pub fn to_str(&self) -> &str {
        match self {
            Stage::Segmentation => "RunSICLE",
            Stage::Overlay => "RunOvlayBorders",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    pub segmentation_bin: PathBuf,
    pub overlay_bin: PathBuf,
    pub labels_out: PathBuf,
    pub overlay_labels: PathBuf,
    pub overlay_out: PathBuf,
    pub overlay_rgb: String,
    pub multiscale: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PipelineRequest {
    pub image: PathBuf,
    pub n0: Option<String>,
    pub nf: Option<String>,
}

impl PipelineRequest {
    /// Empty entry text means the bound is left out of the command line.
    pub fn from_fields(image: impl Into<PathBuf>, n0: &str, nf: &str) -> Self {
        let field = |s: &str| {
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        };
        PipelineRequest {
            image: image.into(),
            n0: field(n0),
            nf: field(nf),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    /// None when the process was killed by a signal
    pub status: Option<i32>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PipelineOutcome {
    Overlay(PathBuf),
    StageFailed { stage: Stage, stderr: String },
}

#[derive(Debug)]
pub enum PipelineMessage {
    StageStarted(Stage),
    Failed { stage: Stage, stderr: String },
    /// tool could not be started, or the overlay could not be decoded
    Error(String),
    Finished {
        image: PathBuf,
        overlay: PathBuf,
        pixels: egui::ColorImage,
    },
}
