use eframe::egui::{self, Align, Layout, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::Dataset;
use crate::data::profile::{ColumnClasses, DatasetProfile, NumericSummary};

// ---------------------------------------------------------------------------
// Generic grid
// ---------------------------------------------------------------------------

/// A striped, resizable table with one header row. `cell(row, col)` supplies
/// the text of every body cell.
fn grid(
    ui: &mut Ui,
    id: &str,
    headers: &[String],
    n_rows: usize,
    cell: impl Fn(usize, usize) -> String,
) {
    ui.push_id(id, |ui: &mut Ui| {
        egui::ScrollArea::horizontal()
            .id_salt(id)
            .show(ui, |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .resizable(true)
                    .cell_layout(Layout::left_to_right(Align::Center))
                    .columns(TableColumn::auto().at_least(70.0), headers.len())
                    .max_scroll_height(260.0)
                    .header(22.0, |mut header| {
                        for h in headers {
                            header.col(|ui| {
                                ui.strong(h);
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(20.0, n_rows, |mut row| {
                            let r = row.index();
                            for c in 0..headers.len() {
                                row.col(|ui| {
                                    ui.label(cell(r, c));
                                });
                            }
                        });
                    });
            });
    });
}

fn fmt_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.4}")
    }
}

// ---------------------------------------------------------------------------
// Report tables
// ---------------------------------------------------------------------------

/// First `n` rows of the dataset.
pub fn preview_table(ui: &mut Ui, dataset: &Dataset, n: usize) {
    let headers = dataset.column_names();
    let n_rows = n.min(dataset.n_rows());
    grid(ui, "preview", &headers, n_rows, |r, c| {
        dataset.columns[c].values[r].to_string()
    });
}

/// Column, dtype and distinct-value count.
pub fn dtype_table(ui: &mut Ui, profile: &DatasetProfile) {
    let headers = ["Column", "Data Type", "Unique Values"].map(String::from);
    grid(ui, "dtypes", &headers, profile.columns.len(), |r, c| {
        let s = &profile.columns[r];
        match c {
            0 => s.name.clone(),
            1 => s.dtype.to_string(),
            _ => s.unique.to_string(),
        }
    });
}

pub fn missing_table(ui: &mut Ui, profile: &DatasetProfile) {
    let headers = ["Column", "Missing Count", "Missing %"].map(String::from);
    grid(ui, "missing", &headers, profile.columns.len(), |r, c| {
        let s = &profile.columns[r];
        match c {
            0 => s.name.clone(),
            1 => s.missing.to_string(),
            _ => format!("{:.2}", s.missing_pct),
        }
    });
}

/// Statistics down the rows, one numeric column per table column.
pub fn describe_table(ui: &mut Ui, profile: &DatasetProfile) {
    let headers: Vec<String> = std::iter::once(String::new())
        .chain(profile.numeric.iter().map(|s| s.column.clone()))
        .collect();
    grid(ui, "describe", &headers, NumericSummary::STATS.len(), |r, c| {
        if c == 0 {
            NumericSummary::STATS[r].to_string()
        } else {
            fmt_stat(profile.numeric[c - 1].stat(r))
        }
    });
}

/// Categorical and numerical column lists side by side.
pub fn classification(ui: &mut Ui, classes: &ColumnClasses) {
    ui.columns(2, |cols| {
        cols[0].strong("Categorical Columns");
        list(&mut cols[0], &classes.categorical);
        cols[1].strong("Numerical Columns");
        list(&mut cols[1], &classes.numeric);
    });
}

fn list(ui: &mut Ui, names: &[String]) {
    if names.is_empty() {
        ui.weak("(none)");
    }
    for name in names {
        ui.label(format!("• {name}"));
    }
}
