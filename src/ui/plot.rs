use std::ops::RangeInclusive;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Plot, PlotPoints, Points};

use crate::color::ColorScale;
use crate::data::chart::{BarOrientation, BoxChart, CategoryChart, HistogramChart};

const PLOT_HEIGHT: f32 = 320.0;
const ACCENT: Color32 = Color32::from_rgb(99, 110, 250);

/// Label of the category at integer position `value`, blank elsewhere.
fn category_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if rounded < 0.0 || (value - rounded).abs() > 1e-6 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

pub fn histogram(ui: &mut Ui, chart: &HistogramChart) {
    ui.label(RichText::new(&chart.title).strong());

    let bars: Vec<Bar> = chart
        .bins
        .iter()
        .map(|b| {
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width(b.end - b.start)
                .name(format!("{:.3} – {:.3}", b.start, b.end))
        })
        .collect();

    Plot::new(("histogram", &chart.column))
        .height(PLOT_HEIGHT)
        .allow_scroll(false)
        .x_axis_label(chart.column.clone())
        .y_axis_label("count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(ACCENT).name(&chart.column));
        });
}

// ---------------------------------------------------------------------------
// Category bars (value counts, grouped sums)
// ---------------------------------------------------------------------------

pub fn category_bar(ui: &mut Ui, id: &str, chart: &CategoryChart) {
    ui.label(RichText::new(&chart.title).strong());

    let (min, max) = chart.value_range();
    let bars: Vec<Bar> = chart
        .entries
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let fill = if chart.color_by_value {
                ColorScale::Blues.sample_range(*value, min, max)
            } else {
                ACCENT
            };
            Bar::new(i as f64, *value)
                .width(0.8)
                .name(label)
                .fill(fill)
                .stroke(Stroke::new(1.0, ACCENT))
        })
        .collect();

    let labels: Vec<String> = chart.entries.iter().map(|(l, _)| l.clone()).collect();
    let formatter =
        move |mark: GridMark, _range: &RangeInclusive<f64>| category_label(&labels, mark.value);

    let plot = Plot::new(("category_bar", id))
        .height(PLOT_HEIGHT)
        .allow_scroll(false);
    let plot = match chart.orientation {
        BarOrientation::Vertical => plot
            .x_axis_formatter(formatter)
            .x_axis_label(chart.category_axis.clone())
            .y_axis_label(chart.value_axis.clone()),
        BarOrientation::Horizontal => plot
            .y_axis_formatter(formatter)
            .y_axis_label(chart.category_axis.clone())
            .x_axis_label(chart.value_axis.clone()),
    };

    plot.show(ui, |plot_ui| {
        let mut bar_chart = BarChart::new(bars).name(&chart.value_axis);
        if chart.orientation == BarOrientation::Horizontal {
            bar_chart = bar_chart.horizontal();
        }
        plot_ui.bar_chart(bar_chart);
    });
}

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

pub fn boxplot(ui: &mut Ui, chart: &BoxChart) {
    ui.label(RichText::new(&chart.title).strong());

    let s = &chart.stats;
    let elem = BoxElem::new(
        0.0,
        BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
    )
    .name(&chart.column)
    .box_width(0.5)
    .whisker_width(0.3)
    .fill(ACCENT.linear_multiply(0.3))
    .stroke(Stroke::new(1.5, ACCENT));

    let has_outliers = !s.outliers.is_empty();
    let outliers: PlotPoints = s.outliers.iter().map(|&v| [0.0, v]).collect();

    Plot::new(("boxplot", &chart.column))
        .height(PLOT_HEIGHT)
        .allow_scroll(false)
        .y_axis_label(chart.column.clone())
        .x_axis_formatter(|_mark: GridMark, _range: &RangeInclusive<f64>| String::new())
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&chart.column));
            if has_outliers {
                plot_ui.points(
                    Points::new(outliers)
                        .radius(3.0)
                        .color(Color32::from_rgb(239, 85, 59))
                        .name("outliers"),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_integer_marks() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(category_label(&labels, 0.0), "a");
        assert_eq!(category_label(&labels, 1.0000000001), "b");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_label(&labels, 2.0), "");
    }
}
