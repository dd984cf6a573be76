//! Visualization utilities: render ingredient-count charts to **SVG** or **PNG**.
//!
//! - Line or bar charts of average ingredient count per year
//! - One colored series per administration route when the aggregates are
//!   route-split, a single series otherwise
//! - Fixed output-file naming by chart kind and grouping

use crate::stats::IngredientSummary;
use anyhow::{Result, anyhow};
use num_format::{Locale, ToFormattedString};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Once;

/// Chart style for [`plot_summaries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
}

impl ChartKind {
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
        }
    }
}

/// One-time registration for a fallback "sans-serif" font when using the
/// `ab_glyph` text path. Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    // Safe to call many times; only runs once.
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../assets/DejaVuSans.ttf"),
        );
    });
}

/// Default chart location inside `dir`, named by chart kind and grouping
/// (e.g. `number_of_ingredients_per_year_per_route_bar.png`).
pub fn default_chart_path<P: AsRef<Path>>(dir: P, kind: ChartKind, by_route: bool) -> PathBuf {
    let grouping = if by_route {
        "number_of_ingredients_per_year_per_route"
    } else {
        "number_of_ingredients_per_year"
    };
    dir.as_ref()
        .join(format!("{}_{}.png", grouping, kind.label()))
}

/// Render aggregates as a chart with year on the X axis and average
/// ingredient count on the Y axis. Output format follows the file extension:
/// `.svg` for vector output, anything else is written as bitmap PNG.
pub fn plot_summaries<P: AsRef<Path>>(
    summaries: &[IngredientSummary],
    out_path: P,
    width: u32,
    height: u32,
    kind: ChartKind,
) -> Result<()> {
    if summaries.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    ensure_fonts_registered();

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    let min_year = summaries.iter().map(|s| s.key.year).min().unwrap_or(0);
    let max_year = summaries.iter().map(|s| s.key.year).max().unwrap_or(0);

    let max_val = summaries
        .iter()
        .map(|s| s.avg_number_of_ingredients)
        .fold(f64::NEG_INFINITY, f64::max);
    if !max_val.is_finite() {
        return Err(anyhow!("no numeric values to plot"));
    }
    let y_max = if max_val > 0.0 { max_val * 1.1 } else { 1.0 };

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, summaries, kind, min_year, max_year, y_max)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, summaries, kind, min_year, max_year, y_max)?;
    }

    Ok(())
}

/// Helper that draws to any Plotters backend.
fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    summaries: &[IngredientSummary],
    kind: ChartKind,
    min_year: i32,
    max_year: i32,
    y_max: f64,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let by_route = summaries.iter().any(|s| s.key.route.is_some());
    let caption = if by_route {
        "Number of ingredients per year per administration route"
    } else {
        "Number of ingredients per year"
    };

    // Half a year-slot of padding on each side keeps bars inside the plot
    // area and makes single-year data drawable.
    let x_min = min_year as f64 - 0.5;
    let x_max = max_year as f64 + 0.5;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(caption, ("sans-serif", 24))
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 44)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)
        .map_err(|e| anyhow!("{:?}", e))?;

    // Axis label formatters: whole numbers only on both axes
    let y_label_fmt = |v: &f64| {
        let n = (*v).round() as i64;
        n.to_formatted_string(&Locale::en)
    };
    let x_label_fmt = |x: &f64| format!("{}", x.round() as i64);

    // Limit label counts to avoid overlap
    let x_label_count = ((max_year - min_year + 1) as usize).min(12);
    let y_label_count = 10usize;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Avg. number of ingredients")
        .x_labels(x_label_count)
        .y_labels(y_label_count)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    // One series per route; a single unnamed series for the yearly grouping.
    let mut groups: BTreeMap<Option<String>, Vec<(f64, f64)>> = BTreeMap::new();
    for s in summaries {
        groups
            .entry(s.key.route.clone())
            .or_default()
            .push((s.key.year as f64, s.avg_number_of_ingredients));
    }
    for series in groups.values_mut() {
        series.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    }

    let num_series = groups.len();
    for (idx, (route, series)) in groups.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();

        match kind {
            ChartKind::Line => {
                let style = ShapeStyle {
                    color: color.clone(),
                    filled: false,
                    stroke_width: 2,
                };
                let anno = chart
                    .draw_series(LineSeries::new(series.clone(), style))
                    .map_err(|e| anyhow!("{:?}", e))?;
                if let Some(route) = route {
                    let legend_color = color.clone();
                    anno.label(route.clone()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 24, y)], legend_color.clone())
                    });
                }
            }
            ChartKind::Bar => {
                // Bars of all series share a 0.8-wide slot centered on the year.
                let bar_width = 0.8 / num_series as f64;
                let offset = -0.4 + idx as f64 * bar_width;
                let fill = color.clone().filled();
                let bars = series.iter().map(|(year, v)| {
                    let x0 = year + offset;
                    Rectangle::new([(x0, 0.0), (x0 + bar_width, *v)], fill.clone())
                });
                let anno = chart.draw_series(bars).map_err(|e| anyhow!("{:?}", e))?;
                if let Some(route) = route {
                    let legend_color = color.clone();
                    anno.label(route.clone()).legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 12, y + 5)], legend_color.clone().filled())
                    });
                }
            }
        }
    }

    if by_route {
        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.85))
            .label_font(("sans-serif", 14))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
