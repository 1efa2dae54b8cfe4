use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, ensure, Context, Result};
use tracing::{debug, error, info, trace, warn};

use serde::{Deserialize, Serialize};

use crate::pipeline::PipelineConfig;

pub const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub segmentation_bin: String,
    pub overlay_bin: String,
    /// passed to the segmentation tool as `--out`
    pub labels_out: String,
    /// label file the overlay tool reads, the segmentation tool writes it
    /// next to `labels_out` when running multiscale
    pub overlay_labels: String,
    pub overlay_out: String,
    pub overlay_rgb: String,
    pub multiscale: bool,
    pub seed_radius: f32,
    pub cross_half_size: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            segmentation_bin: "./bin/RunSICLE".to_string(),
            overlay_bin: "./bin/RunOvlayBorders".to_string(),
            labels_out: "toyExOut.pgm".to_string(),
            overlay_labels: "toyExOut1.pgm".to_string(),
            overlay_out: "interface.out".to_string(),
            overlay_rgb: "0,1,0".to_string(),
            multiscale: true,
            seed_radius: 2.0,
            cross_half_size: 5.0,
        }
    }
}

impl AppSettings {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings: AppSettings =
            toml::from_str(&s).context("Failed to parse AppSettings from TOML")?;
        Ok(settings)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let s = toml::to_string_pretty(self).context("Failed to serialize AppSettings to TOML")?;
        std::fs::write(path, s)?;
        Ok(())
    }

    /// Falls back to defaults when the file is missing or invalid.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(settings) => {
                info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                error!("Failed to read options from file: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            segmentation_bin: PathBuf::from(&self.segmentation_bin),
            overlay_bin: PathBuf::from(&self.overlay_bin),
            labels_out: PathBuf::from(&self.labels_out),
            overlay_labels: PathBuf::from(&self.overlay_labels),
            overlay_out: PathBuf::from(&self.overlay_out),
            overlay_rgb: self.overlay_rgb.clone(),
            multiscale: self.multiscale,
        }
    }
}
