use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::aggregate::DerivedView;
use crate::data::model::{Sex, Smoker, TipsDataset};

const CHART_HEIGHT: f32 = 300.0;

// ---------------------------------------------------------------------------
// Scatter: total bill vs tip, coloured by sex
// ---------------------------------------------------------------------------

pub fn bill_tip_scatter(ui: &mut Ui, dataset: &TipsDataset, view: &DerivedView, colors: &ColorMap) {
    Plot::new("bill_tip_scatter")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Total bill (USD)")
        .y_axis_label("Tip (USD)")
        .show(ui, |plot_ui| {
            for sex in Sex::ALL {
                let points: Vec<[f64; 2]> = view
                    .indices
                    .iter()
                    .map(|&i| &dataset.records()[i])
                    .filter(|r| r.sex == sex)
                    .map(|r| [r.total_bill, r.tip])
                    .collect();

                if points.is_empty() {
                    continue;
                }
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(sex.to_string())
                        .color(colors.color_for(&sex.to_string()))
                        .radius(3.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Histogram: distribution of the total bill
// ---------------------------------------------------------------------------

pub fn bill_histogram(ui: &mut Ui, dataset: &TipsDataset, view: &DerivedView) {
    let bills: Vec<f64> = view
        .indices
        .iter()
        .map(|&i| dataset.records()[i].total_bill)
        .collect();
    let bars = histogram_bars(&bills, 10);

    Plot::new("bill_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Total bill (USD)")
        .y_axis_label("Frequency")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name("Bills")
                    .color(Color32::from_rgb(70, 130, 220)),
            );
        });
}

/// Bin values into `bins` equal-width bars over their min..max span.
fn histogram_bars(values: &[f64], bins: usize) -> Vec<Bar> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    // Degenerate case: all values identical → a single bar.
    if span <= f64::EPSILON {
        return vec![Bar::new(min, values.len() as f64).width(1.0)];
    }

    let width = span / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let bin = (((v - min) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .filter(|(_, count)| *count > 0)
        .map(|(i, count)| {
            let center = min + (i as f64 + 0.5) * width;
            Bar::new(center, count as f64).width(width * 0.95)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Scatter: total bill vs tip percent, coloured by smoker status
// ---------------------------------------------------------------------------

pub fn tip_percent_scatter(
    ui: &mut Ui,
    dataset: &TipsDataset,
    view: &DerivedView,
    colors: &ColorMap,
) {
    Plot::new("tip_percent_scatter")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Total bill (USD)")
        .y_axis_label("Tip (%)")
        .show(ui, |plot_ui| {
            for smoker in Smoker::ALL {
                // Rows with an undefined percentage (zero bill) are skipped.
                let points: Vec<[f64; 2]> = view
                    .indices
                    .iter()
                    .zip(view.tip_percent.iter())
                    .filter_map(|(&i, pct)| pct.map(|p| (&dataset.records()[i], p)))
                    .filter(|(r, _)| r.smoker == smoker)
                    .map(|(r, p)| [r.total_bill, p])
                    .collect();

                if points.is_empty() {
                    continue;
                }
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(format!("Smoker: {smoker}"))
                        .color(colors.color_for(&smoker.to_string()))
                        .radius(2.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Bar chart: mean tip by smoker status
// ---------------------------------------------------------------------------

pub fn mean_tip_by_smoker(ui: &mut Ui, view: &DerivedView, colors: &ColorMap) {
    Plot::new("mean_tip_by_smoker")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Mean tip (USD)")
        .show_x(false)
        .show(ui, |plot_ui| {
            // One chart per category present, so the legend doubles as the
            // x-axis labelling. Absent categories are simply not drawn.
            for (slot, smoker) in Smoker::ALL.into_iter().enumerate() {
                let Some(&mean) = view.mean_tip_by_smoker.get(&smoker) else {
                    continue;
                };
                plot_ui.bar_chart(
                    BarChart::new(vec![Bar::new(slot as f64, mean).width(0.6)])
                        .name(format!("Smoker: {smoker}"))
                        .color(colors.color_for(&smoker.to_string())),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_every_value_once() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 5.0, 9.9];
        let bars = histogram_bars(&values, 5);
        let total: f64 = bars.iter().map(|b| b.value).sum();
        assert_eq!(total, values.len() as f64);
    }

    #[test]
    fn histogram_of_identical_values_is_one_bar() {
        let bars = histogram_bars(&[7.5, 7.5, 7.5], 10);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].value, 3.0);
    }

    #[test]
    fn histogram_of_empty_input_is_empty() {
        assert!(histogram_bars(&[], 10).is_empty());
    }
}
