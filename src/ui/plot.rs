use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{
    uniform_grid_spacer, Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Text,
};

use crate::color::{status_color, HuePalette};
use crate::data::charts::{status_label, CountPlot, DensityCurve, FareHistogram};

const PLOT_HEIGHT: f32 = 320.0;

/// Share of a category slot covered by its group of bars.
const GROUP_WIDTH: f64 = 0.8;

const NO_MATCHES: &str = "No passengers match the current filters.";

fn empty_notice(ui: &mut Ui) {
    ui.label(RichText::new(NO_MATCHES).weak());
}

/// Why a count plot has no bars: nothing matched, or every match lacks a value.
fn count_plot_notice(plot: &CountPlot) -> String {
    if plot.view_rows == 0 {
        NO_MATCHES.to_string()
    } else {
        format!(
            "None of the {} matching passengers has a value for {}.",
            plot.view_rows,
            plot.column.name()
        )
    }
}

// ---------------------------------------------------------------------------
// Count plot with count / percentage labels
// ---------------------------------------------------------------------------

/// Grouped bar chart of a [`CountPlot`]; each bar carries its label centred
/// inside it in white.
pub fn count_chart(ui: &mut Ui, id: &str, plot: &CountPlot, palette: HuePalette) {
    if plot.is_empty() {
        ui.label(RichText::new(count_plot_notice(plot)).weak());
        return;
    }

    let names: Vec<String> = plot.categories.iter().map(|c| c.to_string()).collect();
    let n_hues = plot.containers.len();
    let bar_width = GROUP_WIDTH / n_hues as f64;
    let x_of = |category: usize, hue: usize| {
        category as f64 - GROUP_WIDTH / 2.0 + bar_width * (hue as f64 + 0.5)
    };

    Plot::new(id)
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label(plot.column.name())
        .y_axis_label("count")
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            names.get(idx as usize).cloned().unwrap_or_default()
        })
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (hue, container) in plot.containers.iter().enumerate() {
                let bars: Vec<Bar> = container
                    .bars
                    .iter()
                    .enumerate()
                    .map(|(i, (category, count))| {
                        Bar::new(x_of(i, hue), *count as f64)
                            .width(bar_width)
                            .name(category.to_string())
                    })
                    .collect();
                let color = palette.color(usize::from(container.survived), 2);
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(status_label(container.survived))
                        .color(color),
                );
            }

            for (hue, (container, labels)) in plot.containers.iter().zip(&plot.labels).enumerate() {
                for (i, ((_, count), label)) in container.bars.iter().zip(labels).enumerate() {
                    if label.is_empty() {
                        continue;
                    }
                    let at = PlotPoint::new(x_of(i, hue), *count as f64 / 2.0);
                    plot_ui.text(Text::new(
                        at,
                        RichText::new(label).color(Color32::WHITE).strong().size(10.0),
                    ));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Fare histogram (step outline + density overlay)
// ---------------------------------------------------------------------------

/// Outline of a histogram as a step line, clipped to `[lo, hi]`.
fn step_outline(edges: &[f64], counts: &[u64], (lo, hi): (f64, f64)) -> Vec<[f64; 2]> {
    let mut points = Vec::with_capacity(counts.len() * 2 + 2);
    for (w, &count) in edges.windows(2).zip(counts) {
        let (left, right) = (w[0].max(lo), w[1].min(hi));
        if left >= right {
            continue;
        }
        if points.is_empty() {
            points.push([left, 0.0]);
        }
        points.push([left, count as f64]);
        points.push([right, count as f64]);
    }
    if let Some(&[x, _]) = points.last() {
        points.push([x, 0.0]);
    }
    points
}

pub fn fare_chart(ui: &mut Ui, hist: &FareHistogram) {
    if hist.groups.is_empty() {
        empty_notice(ui);
        return;
    }
    let (lo, hi) = hist.window;

    Plot::new("fare_histogram")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("fare")
        .y_axis_label("Count")
        .include_x(lo)
        .include_x(hi)
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for group in &hist.groups {
                let color = status_color(group.survived);
                let name = status_label(group.survived);

                let outline: PlotPoints = step_outline(&hist.edges, &group.counts, hist.window)
                    .into_iter()
                    .collect();
                plot_ui.line(Line::new(outline).name(name).color(color).fill(0.0).width(1.5));

                let kde: PlotPoints = group
                    .kde
                    .iter()
                    .filter(|p| p[0] >= lo && p[0] <= hi)
                    .copied()
                    .collect();
                plot_ui.line(Line::new(kde).name(name).color(color).width(2.0));
            }
        });
}

// ---------------------------------------------------------------------------
// Family size densities
// ---------------------------------------------------------------------------

pub fn family_chart(ui: &mut Ui, curves: &[DensityCurve]) {
    if curves.is_empty() {
        empty_notice(ui);
        return;
    }

    Plot::new("family_density")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("family_size")
        .y_axis_label("Density")
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for curve in curves {
                let points: PlotPoints = curve.points.iter().copied().collect();
                plot_ui.line(
                    Line::new(points)
                        .name(status_label(curve.survived))
                        .color(status_color(curve.survived))
                        .fill(0.0)
                        .width(1.5),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_outline_closes_on_the_axis() {
        let points = step_outline(&[0.0, 1.0, 2.0], &[3, 1], (0.0, 300.0));
        assert_eq!(
            points,
            vec![[0.0, 0.0], [0.0, 3.0], [1.0, 3.0], [1.0, 1.0], [2.0, 1.0], [2.0, 0.0]]
        );
    }

    #[test]
    fn step_outline_is_clipped_to_window() {
        let points = step_outline(&[250.0, 290.0, 330.0, 370.0], &[4, 2, 1], (0.0, 300.0));
        assert_eq!(points.last(), Some(&[300.0, 0.0]));
        assert!(points.iter().all(|p| p[0] <= 300.0));
    }

    #[test]
    fn count_notice_tells_missing_values_from_no_matches() {
        use crate::data::charts::count_plot;
        use crate::data::model::tests::passenger;
        use crate::data::model::{Column, Dataset, PassengerRecord};

        let no_town = |sex, pclass, survived| PassengerRecord {
            embark_town: None,
            ..passenger(sex, pclass, "", survived)
        };
        let ds = Dataset::from_records(vec![no_town("male", 3, false), no_town("female", 1, true)]);

        let all_missing = count_plot(&ds, &[0, 1], Column::EmbarkTown);
        assert!(all_missing.is_empty());
        assert_eq!(
            count_plot_notice(&all_missing),
            "None of the 2 matching passengers has a value for embark_town."
        );

        let nothing = count_plot(&ds, &[], Column::EmbarkTown);
        assert_eq!(count_plot_notice(&nothing), NO_MATCHES);
    }
}
