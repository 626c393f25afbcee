//! Plot rendering module using egui_plot
//!
//! This module draws the diagnostic time-series plot shown before a replay.
//!
//! # Main Types
//!
//! - [`PlotView`] - Plot configuration and rendering
//! - [`PlotSeries`] - One labelled line, x in seconds since epoch
//!
//! The x axis carries wall-clock time; grid marks are placed on whole
//! seconds/minutes/hours and labelled as date-times.

use crate::config::SeriesConfig;
use crate::dataset::Dataset;
use chrono::DateTime;
use egui::Ui;
use egui_plot::{Corner, GridMark, Legend, Line, Plot, PlotPoints};
use std::ops::RangeInclusive;

/// Grid steps for the time axis, in seconds
const TIME_STEPS: &[f64] = &[
    1.0, 5.0, 15.0, 30.0, 60.0, 300.0, 900.0, 1800.0, 3600.0, 6.0 * 3600.0, 12.0 * 3600.0,
    86_400.0, 7.0 * 86_400.0,
];

/// Rough number of labelled marks across the axis
const TARGET_MARKS: f64 = 8.0;

/// One labelled line on the plot
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

/// Build the lines to draw, skipping series that cannot be plotted
pub fn build_series(dataset: &Dataset, series: &[SeriesConfig]) -> Vec<PlotSeries> {
    series
        .iter()
        .filter_map(|cfg| {
            let Some(column) = dataset.column(&cfg.field) else {
                tracing::warn!("Plot field '{}' not found in dataset", cfg.field);
                return None;
            };
            if !column.kind.is_numeric() {
                tracing::warn!("Plot field '{}' is {}, not numeric", cfg.field, column.kind);
                return None;
            }
            Some(PlotSeries {
                label: cfg.display_label().to_string(),
                points: dataset.series(&cfg.field),
            })
        })
        .collect()
}

/// Plot view configuration
#[derive(Debug, Clone)]
pub struct PlotView {
    /// Whether to show the legend
    pub show_legend: bool,
    /// Whether to show grid lines
    pub show_grid: bool,
    /// Line width for all plots
    pub line_width: f32,
}

impl Default for PlotView {
    fn default() -> Self {
        Self {
            show_legend: true,
            show_grid: true,
            line_width: 1.5,
        }
    }
}

impl PlotView {
    /// Render all series into `ui`
    pub fn render(&self, ui: &mut Ui, series: &[PlotSeries]) {
        let mut plot = Plot::new("diagnostic_plot")
            .show_axes(true)
            .show_grid(self.show_grid)
            .x_axis_label("Time")
            .y_axis_label("Value")
            .x_grid_spacer(|grid_input| create_time_grid_marks(grid_input.bounds))
            .x_axis_formatter(|mark: GridMark, range: &RangeInclusive<f64>| {
                format_time_mark(mark.value, range.end() - range.start())
            });

        if self.show_legend {
            plot = plot.legend(
                Legend::default()
                    .position(Corner::RightTop)
                    .background_alpha(0.8),
            );
        }

        plot.show(ui, |plot_ui| {
            for s in series {
                if s.points.is_empty() {
                    continue;
                }
                let line = Line::new(s.label.clone(), PlotPoints::from(s.points.clone()))
                    .width(self.line_width);
                plot_ui.line(line);
            }
        });
    }
}

/// Upper bound on marks generated per frame
const MAX_MARKS: usize = 100;

/// Pick a grid step giving roughly [`TARGET_MARKS`] marks over `span` seconds.
///
/// Past the largest entry of [`TIME_STEPS`] the step grows in whole weeks.
fn time_step(span: f64) -> f64 {
    let ideal = span / TARGET_MARKS;
    let largest = TIME_STEPS[TIME_STEPS.len() - 1];
    TIME_STEPS
        .iter()
        .copied()
        .find(|step| *step >= ideal)
        .unwrap_or_else(|| largest * (ideal / largest).ceil())
}

/// Grid marks aligned on whole time steps
fn create_time_grid_marks(bounds: (f64, f64)) -> Vec<GridMark> {
    let (min, max) = bounds;
    if !(min.is_finite() && max.is_finite()) || max <= min {
        return Vec::new();
    }

    let step = time_step(max - min);
    let mut marks = Vec::new();
    let mut current = (min / step).floor() * step;

    while current <= max && marks.len() < MAX_MARKS {
        marks.push(GridMark {
            value: current,
            step_size: step,
        });
        current += step;
    }

    marks
}

/// Label for an x value (seconds since epoch); finer when the span is short
pub fn format_time_mark(secs: f64, span: f64) -> String {
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    let Some(dt) = DateTime::from_timestamp(whole as i64, nanos) else {
        return String::new();
    };
    let dt = dt.naive_utc();
    if span < 120.0 {
        dt.format("%H:%M:%S").to_string()
    } else if span < 2.0 * 86_400.0 {
        dt.format("%m-%d %H:%M").to_string()
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
timestamp,dht_temp,ds18_1,status
2024-05-01 10:00:00,21.5,19.2,ok
2024-05-01 10:00:01,21.6,19.3,ok
";

    #[test]
    fn test_build_series_skips_missing_and_text() {
        let ds = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        let cfg = vec![
            SeriesConfig::new("dht_temp", "Air Temp (DHT11)"),
            SeriesConfig::new("dht_hum", "Air Humidity (%)"),
            SeriesConfig::new("status", "Status"),
            SeriesConfig {
                field: "ds18_1".to_string(),
                label: None,
            },
        ];

        let series = build_series(&ds, &cfg);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "Air Temp (DHT11)");
        assert_eq!(series[0].points.len(), 2);
        assert_eq!(series[0].points[1][1], 21.6);
        assert_eq!(series[1].label, "ds18_1");
    }

    #[test]
    fn test_time_step_selection() {
        assert_eq!(time_step(4.0), 1.0);
        assert_eq!(time_step(600.0), 300.0);
        assert_eq!(time_step(7.0 * 86_400.0), 86_400.0);
    }

    #[test]
    fn test_huge_span_keeps_mark_count_small() {
        let marks = create_time_grid_marks((0.0, 1e12));
        assert!(!marks.is_empty());
        assert!(marks.len() <= MAX_MARKS);
        assert!(time_step(1e12) > 7.0 * 86_400.0);
    }

    #[test]
    fn test_grid_marks_cover_bounds() {
        let marks = create_time_grid_marks((1000.5, 1010.0));
        assert!(!marks.is_empty());
        assert!(marks[0].value <= 1000.5);
        assert!(marks.last().unwrap().value <= 1010.0);
        assert!(create_time_grid_marks((5.0, 5.0)).is_empty());
    }

    #[test]
    fn test_format_time_mark() {
        // 2024-05-01 10:00:00 UTC
        let t = 1_714_557_600.0;
        assert_eq!(format_time_mark(t, 60.0), "10:00:00");
        assert_eq!(format_time_mark(t, 3600.0), "05-01 10:00");
        assert_eq!(format_time_mark(t, 30.0 * 86_400.0), "2024-05-01");
    }
}
