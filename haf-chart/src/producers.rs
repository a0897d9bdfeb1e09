//! The ten chart producers.
//!
//! Each producer is a pure function of the loaded tables and the selected
//! MSA. Selection-dependent producers filter one table by `msa`; the two
//! model views (regression and cluster) always read the whole annual table.
//!
//! An MSA with no rows in a table yields a valid figure with zero points.
//! Line charts are ordered by x ascending so a gap in store order never
//! draws a line backwards.

use crate::figure::{Axis, ChartKind, ColorEncoding, ColorScale, Dash, Figure, Mode, Point, Series, Shape, XValue, YAxis};
use haf_db::{AnnualRecord, DashboardData, MonthlyRecord};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Feature flags for individual charts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartOptions {
    /// Overlay an ordinary-least-squares fit on the income/hvi scatter.
    pub scatter_trendline: bool,
}

/// Everything a producer may read.
#[derive(Debug, Clone, Copy)]
pub struct ChartContext<'a> {
    pub data: &'a DashboardData,
    pub msa: &'a str,
    pub options: &'a ChartOptions,
}

pub type Producer = fn(&ChartContext<'_>) -> Figure;

pub const TRENDLINE_SERIES: &str = "OLS trendline";
pub const UNASSIGNED_CLUSTER: &str = "unassigned";

// ───────────────────── Annual trends ─────────────────────

fn annual_line(ctx: &ChartContext<'_>, field: &str, title: &str, value: fn(&AnnualRecord) -> Option<f64>) -> Figure {
    let mut rows: Vec<&AnnualRecord> = ctx.data.annual_for(ctx.msa).collect();
    rows.sort_by_key(|r| r.year);
    let points = rows
        .into_iter()
        .map(|r| Point::new(XValue::Year(r.year), value(r)))
        .collect();

    let mut fig = Figure::new(ChartKind::Line, format!("{title} — {}", ctx.msa), Axis::field("year"), Axis::field(field));
    fig.series.push(Series::new(field, Mode::Lines, points));
    fig
}

pub fn income_plot(ctx: &ChartContext<'_>) -> Figure {
    annual_line(ctx, "income", "Income Over Time", |r| r.income)
}

pub fn hvi_plot(ctx: &ChartContext<'_>) -> Figure {
    annual_line(ctx, "hvi", "Housing Value Over Time", |r| r.hvi)
}

pub fn mortgage_plot(ctx: &ChartContext<'_>) -> Figure {
    annual_line(ctx, "mortgage_rate", "Mortgage Rate Over Time", |r| r.mortgage_rate)
}

pub fn affordability_plot(ctx: &ChartContext<'_>) -> Figure {
    annual_line(ctx, "affordability", "Affordability Index", |r| r.affordability)
}

/// Income vs home value for the selected MSA, colored by year.
pub fn scatter_plot(ctx: &ChartContext<'_>) -> Figure {
    let points: Vec<Point> = ctx
        .data
        .annual_for(ctx.msa)
        .filter_map(|r| {
            let income = r.income?;
            Some(Point {
                color: Some(f64::from(r.year)),
                ..Point::new(XValue::Number(income), r.hvi)
            })
        })
        .collect();

    let mut fig = Figure::new(ChartKind::Scatter, "Income vs Home Value", Axis::field("income"), Axis::field("hvi"));
    fig.color = Some(ColorEncoding {
        field: "year".to_string(),
        scale: ColorScale::Continuous,
    });

    let trendline = if ctx.options.scatter_trendline {
        trendline_series(&points)
    } else {
        None
    };
    fig.series.push(Series::new("hvi", Mode::Markers, points));
    fig.series.extend(trendline);
    fig
}

/// Least-squares slope and intercept of y on x.
///
/// `None` with fewer than two points or when every x is the same.
pub fn ols(pairs: &[(f64, f64)]) -> Option<(f64, f64)> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let sxx: f64 = pairs.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = pairs.iter().map(|(x, y)| (x - mean_x) * (y - mean_y)).sum();
    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

fn trendline_series(points: &[Point]) -> Option<Series> {
    let pairs: Vec<(f64, f64)> = points
        .iter()
        .filter_map(|p| match (p.x, p.y) {
            (XValue::Number(x), Some(y)) => Some((x, y)),
            _ => None,
        })
        .collect();
    let (slope, intercept) = ols(&pairs)?;
    let lo = pairs.iter().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
    let hi = pairs.iter().map(|(x, _)| *x).fold(f64::NEG_INFINITY, f64::max);
    let line = [lo, hi]
        .into_iter()
        .map(|x| Point::new(XValue::Number(x), Some(slope * x + intercept)))
        .collect();
    Some(Series::new(TRENDLINE_SERIES, Mode::Lines, line))
}

// ───────────────────── Monthly trends ─────────────────────

fn monthly_rows<'a>(ctx: &ChartContext<'a>) -> Vec<&'a MonthlyRecord> {
    let mut rows: Vec<&MonthlyRecord> = ctx.data.monthly_for(ctx.msa).collect();
    rows.sort_by_key(|r| r.month_year);
    rows
}

fn monthly_points(rows: &[&MonthlyRecord], value: fn(&MonthlyRecord) -> Option<f64>) -> Vec<Point> {
    rows.iter()
        .map(|r| Point::new(XValue::Date(r.month_year), value(r)))
        .collect()
}

fn monthly_line(ctx: &ChartContext<'_>, field: &str, title: &str, value: fn(&MonthlyRecord) -> Option<f64>) -> Figure {
    let rows = monthly_rows(ctx);
    let mut fig = Figure::new(
        ChartKind::Line,
        format!("{title} — {}", ctx.msa),
        Axis::field("month_year"),
        Axis::field(field),
    );
    fig.series.push(Series::new(field, Mode::Lines, monthly_points(&rows, value)));
    fig
}

pub fn monthly_hvi_plot(ctx: &ChartContext<'_>) -> Figure {
    monthly_line(ctx, "hvi", "Monthly Housing Value", |r| r.hvi)
}

pub fn monthly_mortgage_plot(ctx: &ChartContext<'_>) -> Figure {
    monthly_line(ctx, "mortgage_rate", "Monthly Mortgage Rate", |r| r.mortgage_rate)
}

/// HVI and mortgage rate overlaid, the rate on a right-hand axis.
pub fn dual_plot(ctx: &ChartContext<'_>) -> Figure {
    let rows = monthly_rows(ctx);
    let mut fig = Figure::new(
        ChartKind::DualAxisLine,
        "Monthly HVI vs Mortgage Rate",
        Axis::field("month_year"),
        Axis::titled("hvi", "HVI"),
    );
    fig.y2 = Some(Axis::titled("mortgage_rate", "Mortgage Rate"));
    fig.series.push(Series::new("HVI", Mode::Lines, monthly_points(&rows, |r| r.hvi)));
    fig.series.push(
        Series::new("Mortgage Rate", Mode::Lines, monthly_points(&rows, |r| r.mortgage_rate)).on_axis(YAxis::Y2),
    );
    fig
}

// ───────────────────── Model views ─────────────────────

/// Actual vs predicted affordability over every MSA and year, with the
/// identity line spanning the observed affordability range.
pub fn regression_plot(ctx: &ChartContext<'_>) -> Figure {
    let points = ctx
        .data
        .annual()
        .iter()
        .filter_map(|r| Some(Point::new(XValue::Number(r.affordability?), r.predicted_affordability)))
        .collect();

    let mut fig = Figure::new(
        ChartKind::Scatter,
        "Actual vs Predicted Housing Affordability",
        Axis::titled("affordability", "Actual Affordability (HVI / Income)"),
        Axis::titled("predicted_affordability", "Predicted Affordability"),
    );
    fig.series.push(Series::new("predicted_affordability", Mode::Markers, points));
    if let Some((lo, hi)) = ctx.data.affordability_range() {
        fig.shapes.push(Shape::Line {
            x0: lo,
            y0: lo,
            x1: hi,
            y1: hi,
            dash: Dash::Dash,
        });
    }
    fig
}

/// Numeric labels sort numerically ("2" before "10"), anything else as text.
fn cmp_labels(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Income vs home value for every MSA and year, one series per cluster.
pub fn cluster_plot(ctx: &ChartContext<'_>) -> Figure {
    let mut groups: BTreeMap<&str, Vec<Point>> = BTreeMap::new();
    for r in ctx.data.annual() {
        let Some(income) = r.income else { continue };
        let label = r.cluster.as_deref().unwrap_or(UNASSIGNED_CLUSTER);
        groups.entry(label).or_default().push(Point {
            hover: Some(r.msa.clone()),
            ..Point::new(XValue::Number(income), r.hvi)
        });
    }
    let mut groups: Vec<(&str, Vec<Point>)> = groups.into_iter().collect();
    groups.sort_by(|(a, _), (b, _)| cmp_labels(a, b));

    let mut fig = Figure::new(
        ChartKind::Scatter,
        "Metro Area Clusters Based on Housing Market Characteristics",
        Axis::titled("income", "Median Income"),
        Axis::titled("hvi", "Home Value Index"),
    );
    fig.color = Some(ColorEncoding {
        field: "cluster".to_string(),
        scale: ColorScale::Categorical,
    });
    fig.hover = Some("msa".to_string());
    fig.series = groups
        .into_iter()
        .map(|(label, points)| Series::new(label, Mode::Markers, points))
        .collect();
    fig
}
