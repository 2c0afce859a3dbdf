use std::collections::BTreeMap;

use chrono::NaiveDate;
use liftlog_domain as domain;
use plotters::{
    chart::ChartBuilder,
    prelude::{Circle, IntoDrawingArea, PathElement, Polygon, SVGBackend},
    series::{AreaSeries, LineSeries},
    style::{Color, IntoFont, Palette, Palette99, RGBColor, TextStyle, WHITE},
};

use crate::settings::{Settings, Theme};

pub const COLOR_VOLUME: usize = 6;
pub const COLOR_REPS: usize = 4;
pub const COLOR_WEIGHT: usize = 8;
pub const COLOR_WEIGHT_MIN: usize = 1;
pub const COLOR_WEIGHT_MAX: usize = 0;

pub const OPACITY_LINE: f64 = 0.9;
pub const OPACITY_AREA: f64 = 0.2;

pub const WIDTH_LINE: u32 = 2;

pub const FONT: (&str, u32) = ("sans-serif", 11);
pub const FONT_CAPTION: (&str, u32) = ("sans-serif", 16);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChartKind {
    Volume,
    Reps,
    WeightStats,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Volume, ChartKind::Reps, ChartKind::WeightStats];

    #[must_use]
    pub fn dir_name(self) -> &'static str {
        match self {
            ChartKind::Volume => "volume",
            ChartKind::Reps => "reps",
            ChartKind::WeightStats => "weight_stats",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Volume => "Lifting Volume Over Time",
            ChartKind::Reps => "Total Reps Over Time",
            ChartKind::WeightStats => "Weight Stats Over Time",
        }
    }
}

#[derive(Clone)]
pub enum PlotType {
    Circle(usize, f64, u32),
    Line(usize, f64, u32),
    Area(usize, f64),
}

#[must_use]
pub fn plot_line(color: usize) -> Vec<PlotType> {
    vec![PlotType::Line(color, OPACITY_LINE, WIDTH_LINE)]
}

#[must_use]
pub fn plot_line_with_markers(color: usize, marker_size: u32) -> Vec<PlotType> {
    vec![
        PlotType::Line(color, OPACITY_LINE, WIDTH_LINE),
        PlotType::Circle(color, OPACITY_LINE, marker_size),
    ]
}

#[must_use]
pub fn plot_area(color: usize) -> Vec<PlotType> {
    vec![PlotType::Area(color, OPACITY_AREA)]
}

#[derive(Clone)]
pub struct PlotData {
    pub values_high: Vec<(NaiveDate, f32)>,
    pub values_low: Option<Vec<(NaiveDate, f32)>>,
    pub plots: Vec<PlotType>,
    pub label: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Bounds {
    min: f32,
    max: f32,
}

impl Bounds {
    fn min_with_margin(self) -> f32 {
        let min = self.min - self.margin();
        if self.min >= 0.0 { min.max(0.0) } else { min }
    }

    fn max_with_margin(self) -> f32 {
        self.max + self.margin()
    }

    fn margin(self) -> f32 {
        if (self.max - self.min).abs() > f32::EPSILON {
            return (self.max - self.min) * 0.1;
        }
        0.1
    }
}

/// Render data as an SVG chart.
///
/// The x domain of the chart is configured by the interval parameter. Every
/// `PlotData` element contains one or two series to be plotted with the same
/// plot types:
///
///   - Circle: a marker with the given color and size for each element
///   - Line: the series as a line with the given color and thickness
///   - Area: the area below `values_high`, or the band between `values_high`
///     and `values_low` if the latter is present
///
/// Series with a label are listed in a legend.
///
/// `None` is returned if there is nothing to plot or all values are zero.
#[allow(clippy::missing_errors_doc)]
pub fn plot(
    caption: &str,
    data: &[PlotData],
    interval: &domain::Interval,
    settings: &Settings,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    if all_zeros(data) {
        return Ok(None);
    }

    let Some(bounds) = determine_y_bounds(data) else {
        return Ok(None);
    };

    let mut result = String::new();

    {
        let root = SVGBackend::with_string(
            &mut result,
            (settings.chart_width, settings.chart_height),
        )
        .into_drawing_area();
        let (color, background_color) = colors(settings.theme);

        root.fill(&background_color)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                caption,
                TextStyle::from(FONT_CAPTION.into_font()).color(&color),
            )
            .margin(10f32)
            .x_label_area_size(30f32)
            .y_label_area_size(50f32)
            .build_cartesian_2d(
                interval.first..interval.last,
                bounds.min_with_margin()..bounds.max_with_margin(),
            )?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .set_all_tick_mark_size(3u32)
            .axis_style(color.mix(0.3))
            .bold_line_style(color.mix(0.05))
            .light_line_style(color.mix(0.0))
            .label_style(TextStyle::from(FONT.into_font()).color(&color))
            .x_labels(4)
            .y_labels(6)
            .draw()?;

        for plot_data in data {
            let mut values_high = plot_data.values_high.clone();
            values_high.sort_by_key(|e| e.0);
            let mut values_low = plot_data.values_low.clone();
            if let Some(values) = values_low.as_mut() {
                values.sort_by_key(|e| e.0);
                values.reverse();
            }

            for plot in &plot_data.plots {
                match *plot {
                    PlotType::Circle(color, opacity, size) => {
                        for values in [values_low.as_ref(), Some(&values_high)]
                            .into_iter()
                            .flatten()
                        {
                            chart.draw_series(values.iter().map(|(x, y)| {
                                Circle::new(
                                    (*x, *y),
                                    size,
                                    Palette99::pick(color).mix(opacity).filled(),
                                )
                            }))?;
                        }
                    }
                    PlotType::Line(color, opacity, size) => {
                        let style = Palette99::pick(color).mix(opacity).stroke_width(size);
                        if let Some(values) = values_low.as_ref() {
                            chart.draw_series(LineSeries::new(values.iter().copied(), style))?;
                        }
                        let series =
                            chart.draw_series(LineSeries::new(values_high.iter().copied(), style))?;
                        if let Some(label) = &plot_data.label {
                            series.label(label.as_str()).legend(move |(x, y)| {
                                PathElement::new(vec![(x, y), (x + 20, y)], style)
                            });
                        }
                    }
                    PlotType::Area(color, opacity) => {
                        if let Some(values) = values_low.as_ref() {
                            chart.draw_series(std::iter::once(Polygon::new(
                                values_high
                                    .iter()
                                    .chain(values.iter())
                                    .copied()
                                    .collect::<Vec<_>>(),
                                Palette99::pick(color).mix(opacity),
                            )))?;
                        } else {
                            chart.draw_series(AreaSeries::new(
                                values_high.iter().copied(),
                                0.0,
                                Palette99::pick(color).mix(opacity),
                            ))?;
                        }
                    }
                }
            }
        }

        if data.iter().any(|d| d.label.is_some()) {
            chart
                .configure_series_labels()
                .background_style(background_color.mix(0.8))
                .border_style(color.mix(0.3))
                .label_font(TextStyle::from(FONT.into_font()).color(&color))
                .draw()?;
        }

        root.present()?;
    }

    Ok(Some(result))
}

#[allow(clippy::missing_errors_doc)]
pub fn plot_volume(
    exercise_name: &str,
    volume: &BTreeMap<NaiveDate, f32>,
    settings: &Settings,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let Some(interval) = domain::Interval::from_dates(volume.keys().copied()) else {
        return Ok(None);
    };

    plot(
        &format!("{}: {exercise_name}", ChartKind::Volume.title()),
        &[PlotData {
            values_high: volume.iter().map(|(d, v)| (*d, *v)).collect(),
            values_low: None,
            plots: plot_line_with_markers(COLOR_VOLUME, settings.marker_size),
            label: Some(format!("{exercise_name} ({})", settings.weight_unit)),
        }],
        &interval,
        settings,
    )
}

#[allow(clippy::missing_errors_doc)]
pub fn plot_reps(
    exercise_name: &str,
    reps: &BTreeMap<NaiveDate, u32>,
    settings: &Settings,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let Some(interval) = domain::Interval::from_dates(reps.keys().copied()) else {
        return Ok(None);
    };

    #[allow(clippy::cast_precision_loss)]
    let values = reps.iter().map(|(d, r)| (*d, *r as f32)).collect();

    plot(
        &format!("{}: {exercise_name}", ChartKind::Reps.title()),
        &[PlotData {
            values_high: values,
            values_low: None,
            plots: plot_line_with_markers(COLOR_REPS, settings.marker_size),
            label: Some(exercise_name.to_string()),
        }],
        &interval,
        settings,
    )
}

/// Plot the daily weight range as a band with lines for minimum, maximum and
/// average.
#[allow(clippy::missing_errors_doc)]
pub fn plot_weight_stats(
    exercise_name: &str,
    stats: &BTreeMap<NaiveDate, domain::WeightStats>,
    settings: &Settings,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let Some(interval) = domain::Interval::from_dates(stats.keys().copied()) else {
        return Ok(None);
    };

    let values_min = stats.iter().map(|(d, s)| (*d, s.min)).collect::<Vec<_>>();
    let values_max = stats.iter().map(|(d, s)| (*d, s.max)).collect::<Vec<_>>();
    let values_avg = stats.iter().map(|(d, s)| (*d, s.avg)).collect::<Vec<_>>();
    let unit = &settings.weight_unit;

    plot(
        &format!("{}: {exercise_name}", ChartKind::WeightStats.title()),
        &[
            PlotData {
                values_high: values_max.clone(),
                values_low: Some(values_min.clone()),
                plots: plot_area(COLOR_WEIGHT),
                label: None,
            },
            PlotData {
                values_high: values_min,
                values_low: None,
                plots: plot_line(COLOR_WEIGHT_MIN),
                label: Some(format!("Min Weight ({unit})")),
            },
            PlotData {
                values_high: values_max,
                values_low: None,
                plots: plot_line(COLOR_WEIGHT_MAX),
                label: Some(format!("Max Weight ({unit})")),
            },
            PlotData {
                values_high: values_avg,
                values_low: None,
                plots: plot_line_with_markers(COLOR_WEIGHT, settings.marker_size),
                label: Some(format!("Avg Weight ({unit})")),
            },
        ],
        &interval,
        settings,
    )
}

fn all_zeros(data: &[PlotData]) -> bool {
    data.iter()
        .map(|v| {
            v.values_high.iter().all(|(_, v)| *v == 0.0)
                && v.values_low
                    .as_ref()
                    .is_none_or(|v| v.iter().all(|(_, v)| *v == 0.0))
        })
        .reduce(|l, r| l && r)
        .unwrap_or(true)
}

fn colors(theme: Theme) -> (RGBColor, RGBColor) {
    let dark = RGBColor(20, 22, 26);
    match theme {
        Theme::Light => (dark, WHITE),
        Theme::Dark => (WHITE, dark),
    }
}

fn determine_y_bounds(data: &[PlotData]) -> Option<Bounds> {
    let mut bounds: Option<Bounds> = None;

    for plot in data.iter().filter(|plot| !plot.values_high.is_empty()) {
        let min = plot
            .values_high
            .iter()
            .chain(plot.values_low.iter().flatten())
            .map(|(_, v)| *v)
            .fold(f32::MAX, f32::min);
        let max = plot
            .values_high
            .iter()
            .chain(plot.values_low.iter().flatten())
            .map(|(_, v)| *v)
            .fold(f32::MIN, f32::max);

        let b = bounds.get_or_insert(Bounds { min, max });

        b.min = f32::min(b.min, min);
        b.max = f32::max(b.max, max);
    }

    bounds
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn line(values: &[(u32, f32)]) -> PlotData {
        PlotData {
            values_high: values.iter().map(|(d, v)| (date(*d), *v)).collect(),
            values_low: None,
            plots: plot_line(0),
            label: None,
        }
    }

    #[rstest]
    #[case(Bounds { min: 0.0, max: 100.0 }, 0.0, 110.0)]
    #[case(Bounds { min: 50.0, max: 100.0 }, 45.0, 105.0)]
    #[case(Bounds { min: 2.0, max: 100.0 }, 0.0, 109.8)]
    #[case(Bounds { min: 60.0, max: 60.0 }, 59.9, 60.1)]
    #[case(Bounds { min: -10.0, max: 10.0 }, -12.0, 12.0)]
    fn test_bounds_with_margin(#[case] bounds: Bounds, #[case] min: f32, #[case] max: f32) {
        assert!((bounds.min_with_margin() - min).abs() < 1e-4);
        assert!((bounds.max_with_margin() - max).abs() < 1e-4);
    }

    #[test]
    fn test_determine_y_bounds() {
        assert_eq!(determine_y_bounds(&[]), None);
        assert_eq!(
            determine_y_bounds(&[line(&[(1, 50.0), (2, 80.0)]), line(&[(1, 40.0)])]),
            Some(Bounds {
                min: 40.0,
                max: 80.0
            })
        );
        assert_eq!(
            determine_y_bounds(&[line(&[(1, -30.0), (2, -20.0)])]),
            Some(Bounds {
                min: -30.0,
                max: -20.0
            })
        );
    }

    #[test]
    fn test_all_zeros() {
        assert!(all_zeros(&[]));
        assert!(all_zeros(&[line(&[(1, 0.0), (2, 0.0)])]));
        assert!(!all_zeros(&[line(&[(1, 0.0), (2, 1.0)])]));
    }

    #[test]
    fn test_chart_kind() {
        assert_eq!(
            ChartKind::ALL.map(ChartKind::dir_name),
            ["volume", "reps", "weight_stats"]
        );
    }

    #[test]
    fn test_plot_volume() {
        let volume = BTreeMap::from([(date(1), 500.0), (date(3), 1150.0)]);

        let svg = plot_volume("Squat", &volume, &Settings::default())
            .unwrap()
            .unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Lifting Volume Over Time: Squat"));
    }

    #[test]
    fn test_plot_volume_single_date() {
        let volume = BTreeMap::from([(date(1), 500.0)]);

        assert!(
            plot_volume("Squat", &volume, &Settings::default())
                .unwrap()
                .is_some()
        );
    }

    #[rstest]
    #[case::empty(BTreeMap::new())]
    #[case::zeros(BTreeMap::from([(date(1), 0.0), (date(2), 0.0)]))]
    fn test_plot_volume_without_data(#[case] volume: BTreeMap<NaiveDate, f32>) {
        assert_eq!(
            plot_volume("Squat", &volume, &Settings::default()).unwrap(),
            None
        );
    }

    #[test]
    fn test_plot_reps() {
        let reps = BTreeMap::from([(date(1), 20), (date(2), 24), (date(5), 30)]);

        let svg = plot_reps("Pull Up", &reps, &Settings::default())
            .unwrap()
            .unwrap();

        assert!(svg.contains("Total Reps Over Time: Pull Up"));
    }

    #[test]
    fn test_plot_weight_stats() {
        let stats = BTreeMap::from([
            (
                date(1),
                domain::WeightStats {
                    min: 100.0,
                    max: 110.0,
                    avg: 105.0,
                },
            ),
            (
                date(4),
                domain::WeightStats {
                    min: 105.0,
                    max: 115.0,
                    avg: 110.0,
                },
            ),
        ]);
        let settings = Settings {
            theme: Theme::Dark,
            ..Settings::default()
        };

        let svg = plot_weight_stats("Squat", &stats, &settings)
            .unwrap()
            .unwrap();

        assert!(svg.contains("Weight Stats Over Time: Squat"));
        assert!(svg.contains("Avg Weight (lbs)"));
    }
}
