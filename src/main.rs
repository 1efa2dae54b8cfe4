#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(unused_mut)]
#![allow(unused_doc_comments)]
// #![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

pub mod appconfig;
pub mod export;
pub mod logging;
pub mod marks;
pub mod pipeline;
pub mod ui;

use anyhow::{anyhow, bail, ensure, Context, Result};
use tracing::{debug, error, info, trace, warn};

/// Main App
fn main() -> eframe::Result<()> {
    use ui::ui_types::App;

    let _log_guard = logging::init_logs();
    debug!("Init");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Image Board")
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };
    eframe::run_native(
        "superpixel_board",
        native_options,
        Box::new(|cc| Ok(Box::new(App::new(cc)))),
    )
}
