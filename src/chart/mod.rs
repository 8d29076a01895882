// Monthly trend chart
//
// series   -> validated input
// geometry -> pure layout math
// render   -> draw commands onto a surface
// provider -> where series come from

pub mod geometry;
pub mod provider;
pub mod render;
pub mod series;

pub use geometry::{
    compute_geometry, format_axis_value, ChartGeometry, ChartRect, Gridline, PeakMarker,
    PlotPoint, Point, Viewport, DEFAULT_MARGIN, GRIDLINE_COUNT,
};
pub use provider::{ChartDataProvider, LedgerTrendProvider, MockTrendProvider};
pub use render::{
    ChartOptions, ChartPalette, ChartSurface, DrawCommand, LineChartRenderer, TextAnchor,
};
pub use series::{MonthlySeries, SeriesPoint, MAX_POINTS, MONTH_LABELS};
