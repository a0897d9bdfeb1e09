//! Renderer-independent chart descriptions.
//!
//! A [`Figure`] carries everything the browser needs to draw one chart: the
//! kind, axis field mappings and titles, one or more series of points, and
//! any fixed shapes. It serializes to the JSON consumed by
//! `assets/js/dashboard.js`.

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Scatter,
    /// Two line series sharing the x axis, the second on a right-hand y axis.
    DualAxisLine,
}

/// Field mapping and display title for one axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub field: String,
    pub title: String,
}

impl Axis {
    /// Axis titled with its own column name.
    pub fn field(field: &str) -> Self {
        Self::titled(field, field)
    }

    pub fn titled(field: &str, title: &str) -> Self {
        Self {
            field: field.to_string(),
            title: title.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScale {
    /// Numeric field mapped onto a gradient; values ride on each point.
    Continuous,
    /// One series per distinct label.
    Categorical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorEncoding {
    pub field: String,
    pub scale: ColorScale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Lines,
    Markers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum YAxis {
    Y,
    Y2,
}

/// An x value: a year, a calendar month, or a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum XValue {
    Year(i32),
    Date(NaiveDate),
    Number(f64),
}

/// One plotted point. A missing `y` is drawn as a gap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: XValue,
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<String>,
}

impl Point {
    pub fn new(x: XValue, y: Option<f64>) -> Self {
        Self {
            x,
            y,
            color: None,
            hover: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub mode: Mode,
    pub axis: YAxis,
    pub points: Vec<Point>,
}

impl Series {
    pub fn new(name: impl Into<String>, mode: Mode, points: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            mode,
            axis: YAxis::Y,
            points,
        }
    }

    pub fn on_axis(mut self, axis: YAxis) -> Self {
        self.axis = axis;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dash {
    Solid,
    Dash,
}

/// Fixed decorations drawn in data coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Line {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        dash: Dash,
    },
}

/// A complete chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub kind: ChartKind,
    pub title: String,
    pub x: Axis,
    pub y: Axis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y2: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorEncoding>,
    /// Field shown as the hover heading, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<String>,
    pub series: Vec<Series>,
    pub shapes: Vec<Shape>,
}

impl Figure {
    pub fn new(kind: ChartKind, title: impl Into<String>, x: Axis, y: Axis) -> Self {
        Self {
            kind,
            title: title.into(),
            x,
            y,
            y2: None,
            color: None,
            hover: None,
            series: Vec::new(),
            shapes: Vec::new(),
        }
    }

    /// Total number of points across all series.
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    pub fn series_named(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }
}
