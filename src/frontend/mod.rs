//! Frontend module for the diagnostic plot window
//!
//! Before a replay starts, the selected fields are drawn over time in a
//! native eframe window. The call blocks until the window is closed.
//!
//! # Main Types
//!
//! - [`DiagnosticPlotApp`] - Window state implementing [`eframe::App`]
//! - [`PlotView`] - Plot configuration and rendering

mod plot;

pub use plot::{build_series, format_time_mark, PlotSeries, PlotView};

use crate::config::ReportConfig;
use crate::dataset::Dataset;
use crate::error::{ReplayError, Result};

/// Title of the plot window and heading
pub const PLOT_TITLE: &str = "Sensor Data Over Time";

/// Initial window size in logical pixels
const WINDOW_SIZE: [f32; 2] = [1000.0, 500.0];

/// Window showing the diagnostic plot
pub struct DiagnosticPlotApp {
    view: PlotView,
    series: Vec<PlotSeries>,
}

impl DiagnosticPlotApp {
    pub fn new(series: Vec<PlotSeries>) -> Self {
        Self {
            view: PlotView::default(),
            series,
        }
    }

    pub fn series(&self) -> &[PlotSeries] {
        &self.series
    }
}

impl eframe::App for DiagnosticPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(PLOT_TITLE);
            });
            self.view.render(ui, &self.series);
        });
    }
}

/// Show the plot window for `dataset` and block until it is closed.
///
/// Nothing is shown when no configured series can be plotted.
pub fn show_diagnostic_plot(dataset: &Dataset, report: &ReportConfig) -> Result<()> {
    let series = build_series(dataset, &report.series);
    if series.is_empty() {
        tracing::warn!("No plottable series configured, skipping plot");
        return Ok(());
    }

    tracing::info!("Showing diagnostic plot with {} series; close it to start the replay", series.len());

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_title(PLOT_TITLE),
        ..Default::default()
    };

    let app = DiagnosticPlotApp::new(series);
    eframe::run_native(
        PLOT_TITLE,
        native_options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| ReplayError::Plot(e.to_string()))
}
