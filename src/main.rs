#![deny(missing_docs)]

//! Entry point for the egui exam performance dashboard.
use std::sync::Arc;

use eframe::egui;
use gradecast::config;
use gradecast::dataset::load_dataset;
use gradecast::egui_app::{DashboardApp, LaunchError, MIN_VIEWPORT_SIZE, WINDOW_TITLE};
use gradecast::logging::{self, ConsoleStream};
use gradecast::ml::artifacts::Artifacts;
use gradecast::pipeline::Predictor;
use tracing::error;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init("gradecast", ConsoleStream::Stdout) {
        eprintln!("Logging disabled: {err}");
    }

    let predictor = build_predictor();
    if let Err(err) = &predictor {
        error!("Startup failed: {err}");
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_min_inner_size(MIN_VIEWPORT_SIZE)
            .with_inner_size([900.0, 760.0]),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        native_options,
        Box::new(move |cc| match predictor {
            Ok(predictor) => Ok(Box::new(DashboardApp::new(&cc.egui_ctx, predictor))),
            Err(message) => {
                gradecast::egui_app::app::install_visuals(&cc.egui_ctx);
                Ok(Box::new(LaunchError::new(message)))
            }
        }),
    )?;
    Ok(())
}

/// Load config, dataset and artifacts into a shared predictor.
fn build_predictor() -> Result<Predictor, String> {
    let config = config::load_or_default().map_err(|err| err.to_string())?;
    let dataset = load_dataset(&config.paths.dataset).map_err(|err| err.to_string())?;
    let artifacts = Artifacts::load(&config.paths.model, &config.paths.encoder)
        .map_err(|err| format!("{err}. Run gradecast-train first."))?;
    Ok(Predictor::new(Arc::new(artifacts), Arc::new(dataset)))
}
