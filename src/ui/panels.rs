use std::fmt;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::ColorMap;
use crate::data::aggregate::{DayTimeRow, DerivedView, Summary};
use crate::data::loader;
use crate::data::model::{Day, MealTime, Sex, Smoker, TipsDataset};
use crate::state::AppState;
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Left side panel – filter selectors
// ---------------------------------------------------------------------------

/// Render the left filter panel. Each selector offers "All" plus the closed
/// set of category values; any change triggers a full recompute.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            changed |= category_combo(ui, "filter_sex", "Sex", &mut state.criteria.sex, &Sex::ALL);
            changed |= category_combo(
                ui,
                "filter_smoker",
                "Smoker",
                &mut state.criteria.smoker,
                &Smoker::ALL,
            );
            changed |= category_combo(ui, "filter_day", "Day", &mut state.criteria.day, &Day::ALL);
            changed |= category_combo(
                ui,
                "filter_time",
                "Time",
                &mut state.criteria.time,
                &MealTime::ALL,
            );

            ui.separator();
            ui.label(format!(
                "{} active filter(s)",
                state.criteria.active_count()
            ));
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
                changed = false; // reset already recomputed
            }
        });

    if changed {
        state.refilter();
    }
}

/// One "All"-defaulting combo box for a categorical field. Returns whether
/// the selection changed.
fn category_combo<T>(
    ui: &mut Ui,
    id: &str,
    label: &str,
    current: &mut Option<T>,
    variants: &[T],
) -> bool
where
    T: Copy + PartialEq + fmt::Display,
{
    let mut changed = false;

    ui.label(RichText::new(label).strong());
    egui::ComboBox::from_id_salt(id)
        .width(ui.available_width())
        .selected_text(current.map_or_else(|| "All".to_owned(), |v| v.to_string()))
        .show_ui(ui, |ui: &mut Ui| {
            changed |= ui.selectable_value(current, None, "All").changed();
            for &v in variants {
                changed |= ui.selectable_value(current, Some(v), v.to_string()).changed();
            }
        });
    ui.add_space(8.0);

    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Load bundled sample").clicked() {
                load_sample(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(view)) = (&state.dataset, &state.derived) {
            ui.label(format!(
                "{} records loaded, {} match filters",
                ds.len(),
                view.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central dashboard
// ---------------------------------------------------------------------------

/// Render the central panel: KPI row, chart grid and tables.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let (Some(dataset), Some(view)) = (&state.dataset, &state.derived) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a tips dataset to begin  (File → Open…)");
        });
        return;
    };

    let sex_colors = ColorMap::new(Sex::ALL.map(|v| v.to_string()));
    let smoker_colors = ColorMap::new(Smoker::ALL.map(|v| v.to_string()));

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Tips summary");
            kpi_row(ui, view.summary.as_ref());
            ui.separator();

            ui.columns(2, |columns: &mut [Ui]| {
                columns[0].label(RichText::new("Total bill vs tip").strong());
                plot::bill_tip_scatter(&mut columns[0], dataset, view, &sex_colors);

                columns[1].label(RichText::new("Total bill distribution").strong());
                plot::bill_histogram(&mut columns[1], dataset, view);
            });

            ui.add_space(8.0);

            ui.columns(2, |columns: &mut [Ui]| {
                columns[0].label(RichText::new("Bill vs tip percent").strong());
                plot::tip_percent_scatter(&mut columns[0], dataset, view, &smoker_colors);

                columns[1].label(RichText::new("Mean tip by smoker status").strong());
                plot::mean_tip_by_smoker(&mut columns[1], view, &smoker_colors);
            });

            ui.separator();
            ui.heading("Average tips by day and time");
            day_time_table(ui, &view.by_day_time);

            ui.separator();
            egui::CollapsingHeader::new(RichText::new("Filtered records").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    records_table(ui, dataset, view);
                });
        });
}

/// Three KPI metrics. An empty filtered set renders as an em-dash rather
/// than a number.
fn kpi_row(ui: &mut Ui, summary: Option<&Summary>) {
    let (bill, tip, size) = match summary {
        Some(s) => (
            format!("$ {:.2}", s.mean_total_bill),
            format!("$ {:.2}", s.mean_tip),
            format!("{:.2} guests", s.mean_size),
        ),
        None => ("—".to_owned(), "—".to_owned(), "—".to_owned()),
    };

    ui.columns(3, |columns: &mut [Ui]| {
        metric(&mut columns[0], "Average bill", &bill);
        metric(&mut columns[1], "Average tip", &tip);
        metric(&mut columns[2], "Average table size", &size);
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.heading(value);
    });
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Grouped aggregation table: one row per non-empty (day, time) partition,
/// already sorted in categorical order by the pipeline.
fn day_time_table(ui: &mut Ui, rows: &[DayTimeRow]) {
    TableBuilder::new(ui)
        .id_salt("day_time_table")
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["Day", "Time", "Mean tip", "Mean bill", "Orders"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for row_data in rows {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(row_data.day.to_string());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(row_data.time.to_string());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("${:.2}", row_data.mean_tip));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("${:.2}", row_data.mean_total_bill));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(row_data.count.to_string());
                    });
                });
            }
        });
}

/// The filtered record set with the derived tip-percent column.
fn records_table(ui: &mut Ui, dataset: &TipsDataset, view: &DerivedView) {
    TableBuilder::new(ui)
        .id_salt("records_table")
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().at_least(60.0), 7)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in [
                "Bill", "Tip", "Tip %", "Sex", "Smoker", "Day", "Time", "Size",
            ] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, view.len(), |mut row| {
                let i = row.index();
                let record = &dataset.records()[view.indices[i]];
                let pct = view.tip_percent[i];

                row.col(|ui: &mut Ui| {
                    ui.label(format!("${:.2}", record.total_bill));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("${:.2}", record.tip));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(match pct {
                        Some(p) => format!("{p:.1}%"),
                        None => "—".to_owned(),
                    });
                });
                row.col(|ui: &mut Ui| {
                    ui.label(record.sex.to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(record.smoker.to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(record.day.to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(record.time.to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(record.size.to_string());
                });
            });
        });
}

// ---------------------------------------------------------------------------
// File dialog and sample loading
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open tips dataset")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_file(&path) {
            Ok(dataset) => {
                log::info!("Loaded {} records from {}", dataset.len(), path.display());
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn load_sample(state: &mut AppState) {
    match loader::load_builtin_sample() {
        Ok(dataset) => {
            log::info!("Loaded bundled sample ({} records)", dataset.len());
            state.set_dataset(dataset);
        }
        Err(e) => {
            log::error!("Failed to parse bundled sample: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
