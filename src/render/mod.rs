//! Rendering boundary: a curve plus display metadata becomes a
//! self-contained artifact.

pub mod html;

pub use html::render_chart_html;

/// Display metadata for one chart.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub x_label: String,
    pub y_label: String,
    /// Whether to draw the series legend.
    pub legend: bool,
    /// Artifacts are named `<file_stem>.html` (and `<file_stem>.json` when
    /// requested).
    pub file_stem: String,
}
