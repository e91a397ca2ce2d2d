//! Elbow chart rendering: a text chart for the terminal and an SVG via Plotters

use crate::model::DistortionCurve;
use log::info;
use plotters::prelude::*;
use std::io::Write;
use std::path::Path;

pub const CHART_TITLE: &str = "Elbow Method for Optimal k";
pub const X_LABEL: &str = "Number of Clusters (k)";
pub const Y_LABEL: &str = "Distortion";

/// Width of the longest bar in the text chart
const BAR_WIDTH: usize = 50;

/// Draw the distortion curve as horizontal bars, one line per k
pub fn render_elbow_chart<W: Write>(curve: &DistortionCurve, out: &mut W) -> crate::Result<()> {
    let max_score = curve.max_score();

    writeln!(out, "{}", CHART_TITLE)?;
    writeln!(out, "{} / {}", X_LABEL, Y_LABEL)?;
    writeln!(out, "{:>3} |", "k")?;
    writeln!(out, "----+{}", "-".repeat(BAR_WIDTH + 12))?;

    for &(k, score) in &curve.points {
        let len = if max_score > 0.0 {
            ((score / max_score) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        writeln!(out, "{:>3} | {:<width$} {:.4}", k, "#".repeat(len), score, width = BAR_WIDTH)?;
    }

    writeln!(out)?;
    Ok(())
}

/// Save the distortion curve as an SVG line chart with point markers
///
/// # Arguments
/// * `curve` - Distortion per k
/// * `output_path` - Path of the SVG file to write
pub fn save_elbow_chart<P: AsRef<Path>>(curve: &DistortionCurve, output_path: P) -> crate::Result<()> {
    let max_k = curve.points.last().map(|&(k, _)| k).unwrap_or(1) as f64;
    let max_score = curve.max_score();
    let y_max = if max_score > 0.0 { max_score * 1.1 } else { 1.0 };

    let root = SVGBackend::new(output_path.as_ref(), (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(CHART_TITLE, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.5f64..(max_k + 0.5), 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    let points: Vec<(f64, f64)> = curve.points.iter().map(|&(k, s)| (k as f64, s)).collect();

    chart.draw_series(LineSeries::new(points.iter().copied(), &BLUE))?;
    chart.draw_series(
        points
            .iter()
            .map(|&point| Circle::new(point, 4, BLUE.filled())),
    )?;

    root.present()?;
    info!("Elbow chart saved to: {}", output_path.as_ref().display());

    Ok(())
}
