// Chart geometry - series + viewport -> screen-space layout
//
// Screen coordinates: origin top-left, y grows downward.
// Recomputed on every render, never cached.

use super::series::MonthlySeries;
use crate::error::ChartError;
use serde::Serialize;

pub const DEFAULT_MARGIN: f64 = 60.0;
pub const GRIDLINE_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Result<Self, ChartError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ChartError::InvalidViewport { width, height });
        }
        Ok(Viewport { width, height })
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.width / 2.0,
            y: self.height / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ChartRect {
    /// Viewport inset by `margin` on every side. Collapses to zero size
    /// rather than going negative when the viewport is smaller than the margins.
    pub fn inset(viewport: Viewport, margin: f64) -> Self {
        ChartRect {
            left: margin,
            top: margin,
            width: (viewport.width - 2.0 * margin).max(0.0),
            height: (viewport.height - 2.0 * margin).max(0.0),
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gridline {
    pub y: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint {
    pub label: String,
    pub value: u32,
    pub position: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeakMarker {
    pub index: usize,
    pub value: u32,
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartGeometry {
    pub chart_rect: ChartRect,
    /// Smallest and largest value in the series
    pub min_value: f64,
    pub max_value: f64,
    /// Value bounds of the plotted axis. Equal to the data bounds unless the
    /// series is flat, in which case they are padded by 0.5 either side.
    pub axis_min: f64,
    pub axis_max: f64,
    /// `axis_max - axis_min`, never zero
    pub value_range: f64,
    pub gridlines: Vec<Gridline>,
    pub points: Vec<PlotPoint>,
    pub peak: PeakMarker,
}

/// Lay out a series inside `viewport`. `None` for the empty series.
///
/// When every value is equal the axis range is forced to 1 and centered on
/// that value, so the flat line sits on the vertical middle of the chart rect.
/// Gridlines are labelled from the axis bounds so they match the plotted line.
pub fn compute_geometry(
    series: &MonthlySeries,
    viewport: Viewport,
    margin: f64,
) -> Option<ChartGeometry> {
    let peak_index = series.arg_max()?;
    let data_max = f64::from(series.max_value()?);
    let data_min = f64::from(series.min_value()?);

    let (axis_min, axis_max, value_range) = if data_max > data_min {
        (data_min, data_max, data_max - data_min)
    } else {
        (data_min - 0.5, data_max + 0.5, 1.0)
    };

    let chart_rect = ChartRect::inset(viewport, margin);
    let steps = (GRIDLINE_COUNT - 1) as f64;

    let gridlines = (0..GRIDLINE_COUNT)
        .map(|i| {
            let fraction = i as f64 / steps;
            Gridline {
                y: chart_rect.top + chart_rect.height * fraction,
                value: axis_max - value_range * fraction,
            }
        })
        .collect();

    let n = series.len();
    let points: Vec<PlotPoint> = series
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let x = if n > 1 {
                chart_rect.left + chart_rect.width * i as f64 / (n - 1) as f64
            } else {
                chart_rect.left
            };
            let normalized = (f64::from(point.value) - axis_min) / value_range;
            PlotPoint {
                label: point.label.clone(),
                value: point.value,
                position: Point {
                    x,
                    y: chart_rect.bottom() - normalized * chart_rect.height,
                },
            }
        })
        .collect();

    let peak = PeakMarker {
        index: peak_index,
        value: points[peak_index].value,
        position: points[peak_index].position,
    };

    Some(ChartGeometry {
        chart_rect,
        min_value: data_min,
        max_value: data_max,
        axis_min,
        axis_max,
        value_range,
        gridlines,
        points,
        peak,
    })
}

/// Gridline label text: integers print bare, fractions with one decimal
pub fn format_axis_value(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 400.0).unwrap()
    }

    #[test]
    fn test_viewport_rejects_bad_sizes() {
        assert!(Viewport::new(0.0, 10.0).is_err());
        assert!(Viewport::new(10.0, -1.0).is_err());
        assert!(Viewport::new(f64::NAN, 10.0).is_err());
        assert!(Viewport::new(f64::INFINITY, 10.0).is_err());
    }

    #[test]
    fn test_chart_rect_inset() {
        let rect = ChartRect::inset(viewport(), DEFAULT_MARGIN);
        assert_eq!(rect.left, 60.0);
        assert_eq!(rect.top, 60.0);
        assert_eq!(rect.width, 680.0);
        assert_eq!(rect.height, 280.0);
        assert_eq!(rect.right(), 740.0);
        assert_eq!(rect.bottom(), 340.0);

        let tiny = ChartRect::inset(Viewport::new(50.0, 50.0).unwrap(), DEFAULT_MARGIN);
        assert_eq!(tiny.width, 0.0);
        assert_eq!(tiny.height, 0.0);
    }

    #[test]
    fn test_empty_series_has_no_geometry() {
        assert!(compute_geometry(&MonthlySeries::empty(), viewport(), DEFAULT_MARGIN).is_none());
    }

    #[test]
    fn test_point_mapping() {
        let series = MonthlySeries::from_pairs(vec![("a", 0), ("b", 50), ("c", 100)]).unwrap();
        let geometry = compute_geometry(&series, viewport(), DEFAULT_MARGIN).unwrap();

        let a = geometry.points[0].position;
        let b = geometry.points[1].position;
        let c = geometry.points[2].position;
        assert_eq!((a.x, a.y), (60.0, 340.0));
        assert_eq!((b.x, b.y), (400.0, 200.0));
        assert_eq!((c.x, c.y), (740.0, 60.0));
        assert_eq!(geometry.peak.index, 2);
    }

    #[test]
    fn test_gridlines_span_rect() {
        let series = MonthlySeries::from_pairs(vec![("a", 10), ("b", 60)]).unwrap();
        let geometry = compute_geometry(&series, viewport(), DEFAULT_MARGIN).unwrap();

        assert_eq!(geometry.gridlines.len(), GRIDLINE_COUNT);
        assert_eq!(geometry.gridlines[0].y, 60.0);
        assert_eq!(geometry.gridlines[5].y, 340.0);
        assert_eq!(geometry.gridlines[0].value, 60.0);
        assert_eq!(geometry.gridlines[1].value, 50.0);
        assert_eq!(geometry.gridlines[5].value, 10.0);
        assert_eq!(geometry.axis_max, geometry.max_value);
        assert_eq!(geometry.axis_min, geometry.min_value);
    }

    #[test]
    fn test_single_point_sits_on_left_edge() {
        let series = MonthlySeries::from_pairs(vec![("Jan", 42)]).unwrap();
        let geometry = compute_geometry(&series, viewport(), DEFAULT_MARGIN).unwrap();
        assert_eq!(geometry.points[0].position.x, 60.0);
        assert_eq!(geometry.points[0].position.y, 200.0);
        assert_eq!(geometry.peak.value, 42);
    }

    #[test]
    fn test_flat_series_centered() {
        let series = MonthlySeries::calendar([50; 12]);
        let geometry = compute_geometry(&series, viewport(), DEFAULT_MARGIN).unwrap();
        assert_eq!(geometry.value_range, 1.0);
        for point in &geometry.points {
            assert!(point.position.y.is_finite());
            assert_eq!(point.position.y, 200.0);
        }
        assert_eq!(geometry.peak.index, 0);
    }

    #[test]
    fn test_flat_series_keeps_data_bounds() {
        let series = MonthlySeries::calendar([50; 12]);
        let geometry = compute_geometry(&series, viewport(), DEFAULT_MARGIN).unwrap();

        assert_eq!(geometry.max_value, 50.0);
        assert_eq!(geometry.min_value, 50.0);
        assert_eq!(geometry.axis_max, 50.5);
        assert_eq!(geometry.axis_min, 49.5);
        assert_eq!(geometry.gridlines[0].value, geometry.axis_max);
        assert_eq!(geometry.gridlines[5].value, geometry.axis_min);
    }

    #[test]
    fn test_format_axis_value() {
        assert_eq!(format_axis_value(180.0), "180");
        assert_eq!(format_axis_value(163.0), "163");
        assert_eq!(format_axis_value(49.7), "49.7");
        assert_eq!(format_axis_value(-0.0), "0");
    }
}
