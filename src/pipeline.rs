pub mod pipeline_types;

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::{anyhow, bail, ensure, Context, Result};
use tracing::{debug, error, info, trace, warn};

pub use self::pipeline_types::*;

pub trait ToolRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ToolOutput>;
}

/// Runs the tools as child processes and waits for them to exit.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ToolOutput> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to run {}", program.display()))?;

        Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status.code(),
        })
    }
}

pub fn segmentation_args(config: &PipelineConfig, request: &PipelineRequest) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--img".into(),
        request.image.clone().into(),
        "--out".into(),
        config.labels_out.clone().into(),
    ];

    if config.multiscale {
        args.push("--multiscale".into());
    }

    if let Some(n0) = &request.n0 {
        args.push("--n0".into());
        args.push(n0.into());
    }
    if let Some(nf) = &request.nf {
        args.push("--nf".into());
        args.push(nf.into());
    }

    args
}

pub fn overlay_args(config: &PipelineConfig, image: &Path) -> Vec<OsString> {
    vec![
        "--img".into(),
        image.into(),
        "--labels".into(),
        config.overlay_labels.clone().into(),
        "--out".into(),
        config.overlay_out.clone().into(),
        "--rgb".into(),
        config.overlay_rgb.clone().into(),
    ]
}

fn display_command(program: &Path, args: &[OsString]) -> String {
    let mut s = program.display().to_string();
    for arg in args {
        s.push(' ');
        s.push_str(&arg.to_string_lossy());
    }
    s
}

/// Returns the error text for a failed stage, if any.
fn stage_error(output: &ToolOutput) -> Option<String> {
    if !output.stderr.is_empty() {
        return Some(output.stderr.clone());
    }
    match output.status {
        Some(0) => None,
        Some(code) => Some(format!("exited with status {}\n", code)),
        None => Some("terminated by signal\n".to_string()),
    }
}

fn run_stage<R: ToolRunner + ?Sized>(
    runner: &R,
    stage: Stage,
    program: &Path,
    args: &[OsString],
) -> Result<Option<String>> {
    debug!("[{}] {}", stage, display_command(program, args));

    let output = runner.run(program, args)?;

    if !output.stdout.is_empty() {
        trace!("[{}] stdout:\n{}", stage, output.stdout);
    }

    let err = stage_error(&output);
    if let Some(err) = &err {
        warn!("[{}] failed: {}", stage, err.trim_end());
    }
    Ok(err)
}

/// Segmentation, then overlay rendering. The overlay tool only runs when
/// segmentation reported nothing on stderr.
pub fn run_pipeline<R: ToolRunner + ?Sized>(
    runner: &R,
    config: &PipelineConfig,
    request: &PipelineRequest,
) -> Result<PipelineOutcome> {
    run_pipeline_with(runner, config, request, |_| {})
}

fn run_pipeline_with<R, F>(
    runner: &R,
    config: &PipelineConfig,
    request: &PipelineRequest,
    mut on_stage: F,
) -> Result<PipelineOutcome>
where
    R: ToolRunner + ?Sized,
    F: FnMut(Stage),
{
    on_stage(Stage::Segmentation);
    let args = segmentation_args(config, request);
    if let Some(stderr) = run_stage(runner, Stage::Segmentation, &config.segmentation_bin, &args)? {
        return Ok(PipelineOutcome::StageFailed {
            stage: Stage::Segmentation,
            stderr,
        });
    }

    on_stage(Stage::Overlay);
    let args = overlay_args(config, &request.image);
    if let Some(stderr) = run_stage(runner, Stage::Overlay, &config.overlay_bin, &args)? {
        return Ok(PipelineOutcome::StageFailed {
            stage: Stage::Overlay,
            stderr,
        });
    }

    Ok(PipelineOutcome::Overlay(config.overlay_out.clone()))
}

/// Decodes by content, the overlay file name has no meaningful extension.
pub fn load_overlay_image<P: AsRef<Path>>(path: P) -> Result<egui::ColorImage> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let img = image::load_from_memory(&bytes)
        .with_context(|| format!("Failed to decode {}", path.display()))?
        .to_rgba8();

    let size = [img.width() as usize, img.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        img.as_flat_samples().as_slice(),
    ))
}

pub fn spawn_pipeline_thread(
    ctx: egui::Context,
    config: PipelineConfig,
    request: PipelineRequest,
    channel_to_ui: crossbeam_channel::Sender<PipelineMessage>,
) {
    std::thread::spawn(move || {
        let send = |msg: PipelineMessage| {
            if channel_to_ui.send(msg).is_err() {
                error!("Failed to send message to UI");
            }
            ctx.request_repaint();
        };

        let t0 = std::time::Instant::now();

        let outcome = run_pipeline_with(&ProcessRunner, &config, &request, |stage| {
            send(PipelineMessage::StageStarted(stage))
        });

        match outcome {
            Ok(PipelineOutcome::Overlay(overlay)) => match load_overlay_image(&overlay) {
                Ok(pixels) => {
                    info!(
                        "Pipeline finished in {:.1} s",
                        t0.elapsed().as_secs_f64()
                    );
                    send(PipelineMessage::Finished {
                        image: request.image,
                        overlay,
                        pixels,
                    });
                }
                Err(e) => {
                    error!("Failed to load overlay: {:#}", e);
                    send(PipelineMessage::Error(format!("{:#}", e)));
                }
            },
            Ok(PipelineOutcome::StageFailed { stage, stderr }) => {
                send(PipelineMessage::Failed { stage, stderr });
            }
            Err(e) => {
                error!("Pipeline error: {:#}", e);
                send(PipelineMessage::Error(format!("{:#}", e)));
            }
        }
    });
}
