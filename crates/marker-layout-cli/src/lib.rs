//! CLI logic for the marker layout replay tool.
//!
//! The tool replays a recorded [`Scene`] through a layout engine and writes
//! a report of the markers shown, moved and removed at every frame.

pub mod config;
pub mod error;
pub mod report;
pub mod scene;

mod args;

pub use args::{Args, Kind};
pub use error::CliError;

use std::{
    fs,
    io::{self, Write},
};

use log::{debug, info};

use marker_layout::{LayoutEngine, Marker, Popup, UnitKind, config::LayoutOptions};

use config::AppConfig;
use report::Report;
use scene::Scene;

/// Run the replay tool
///
/// Loads the configuration and the scene, replays the scene with the engine
/// selected by `args.kind` and writes the report to the output file, or to
/// standard output.
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Scene parsing and validation errors
/// - Invalid layout options
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        kind:? = args.kind;
        "Replaying scene"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let scene = Scene::parse(&source, &args.input)?;
    debug!(
        features = scene.features().len(),
        frames = scene.frames().len();
        "Scene loaded"
    );

    let text = match args.kind {
        Kind::Marker => replay::<Marker>(&scene, &app_config)?,
        Kind::Popup => replay::<Popup>(&scene, &app_config)?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, text)?;
            info!(output_file = path; "Report written");
        }
        None => io::stdout().lock().write_all(text.as_bytes())?,
    }

    Ok(())
}

/// Replays every frame of `scene` and returns the report text.
///
/// The `[layout]` table of the scene, when present, replaces the one of the
/// configuration.
///
/// # Errors
///
/// Returns `CliError::Layout` if the layout options are invalid.
pub fn replay<K: UnitKind>(scene: &Scene, config: &AppConfig) -> Result<String, CliError> {
    let layout = scene.layout().unwrap_or(config.layout()).clone();
    let mut options = LayoutOptions::new(layout);
    if let Some(filter) = scene.filter() {
        let filter = filter.clone();
        options = options.with_filter(move |feature| filter.accepts(feature));
    }

    let mut engine = LayoutEngine::<K>::new(options)?;
    let mut report = Report::new();

    for (index, frame) in scene.frames().iter().enumerate() {
        report.frame(index, frame);
        let view = scene.view(frame);

        if frame.is_soft() {
            if frame.is_ready() {
                engine.soft_update_present(&view);
                report.soft(engine.status().present());
            } else {
                report.not_ready();
            }
            continue;
        }

        match engine.update(&view) {
            Some(status) => report.status(status),
            None => report.not_ready(),
        }
    }

    Ok(report.finish())
}
