use std::fmt::Display;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::config::AppConfig;
use crate::data::chart::{self, BarOrientation, ChartError, ChartKind, Notice, NoticeLevel, PieKind};
use crate::data::model::Dataset;
use crate::data::profile::{ColumnClasses, DatasetProfile};
use crate::state::{AppState, Selections};
use crate::ui::{paint, panels, plot, tables};

// ---------------------------------------------------------------------------
// Small widgets
// ---------------------------------------------------------------------------

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(14.0);
    ui.heading(title);
    ui.separator();
}

fn notice(ui: &mut Ui, notice: &Notice) {
    match notice.level {
        NoticeLevel::Info => {
            ui.label(
                RichText::new(format!("ℹ {}", notice.message))
                    .color(Color32::from_rgb(70, 130, 210)),
            );
        }
        NoticeLevel::Warning => {
            let color = ui.visuals().warn_fg_color;
            ui.label(RichText::new(format!("⚠ {}", notice.message)).color(color));
        }
    }
}

fn metric(ui: &mut Ui, label: &str, value: usize) {
    ui.vertical(|ui: &mut Ui| {
        ui.weak(label);
        ui.label(RichText::new(value.to_string()).size(28.0).strong());
    });
}

fn column_combo(ui: &mut Ui, id: &str, label: &str, options: &[String], selected: &mut String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(selected.as_str())
            .width(200.0)
            .show_ui(ui, |ui: &mut Ui| {
                for opt in options {
                    ui.selectable_value(selected, opt.clone(), opt.as_str());
                }
            });
    });
}

fn choice_combo<T: Copy + PartialEq + Display>(
    ui: &mut Ui,
    id: &str,
    label: &str,
    options: &[T],
    selected: &mut T,
) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(selected.to_string())
            .width(160.0)
            .show_ui(ui, |ui: &mut Ui| {
                for &opt in options {
                    ui.selectable_value(selected, opt, opt.to_string());
                }
            });
    });
}

/// Skip the chart with a notice when its column classes are missing,
/// otherwise draw the controls, build the chart and render it. A failed build
/// is shown in place of the chart and nothing else is affected.
fn chart_block<T>(
    ui: &mut Ui,
    kind: ChartKind,
    classes: &ColumnClasses,
    build: impl FnOnce(&mut Ui) -> Result<T, ChartError>,
    render: impl FnOnce(&mut Ui, &T),
) {
    if let Some(n) = kind.prerequisite(classes) {
        notice(ui, &n);
        return;
    }
    match build(ui) {
        Ok(chart) => render(ui, &chart),
        Err(e) => {
            log::debug!("Error creating {}: {e}", kind.label());
            let color = ui.visuals().error_fg_color;
            ui.label(RichText::new(format!("Error creating {}: {e}", kind.label())).color(color));
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// The whole analysis page, top to bottom.
pub fn dataset_report(ui: &mut Ui, state: &mut AppState) {
    ui.heading(RichText::new("📊 Universal Data Analyzer using EDA").size(26.0));
    ui.label("Upload any CSV dataset to perform complete Exploratory Data Analysis");

    let wants_download = match (&state.dataset, &state.profile) {
        (Some(dataset), Some(profile)) => {
            report_body(ui, dataset, profile, &state.config, &mut state.selections)
        }
        _ => {
            ui.add_space(12.0);
            notice(
                ui,
                &Notice {
                    level: NoticeLevel::Info,
                    message: "Upload a CSV file to start EDA (File → Open CSV…, or drop a file here)",
                },
            );
            false
        }
    };

    if wants_download {
        panels::save_file_dialog(state);
    }
}

/// Returns whether the download button was clicked.
fn report_body(
    ui: &mut Ui,
    dataset: &Dataset,
    profile: &DatasetProfile,
    config: &AppConfig,
    sel: &mut Selections,
) -> bool {
    let classes = &profile.classes;

    section(ui, "🔍 Dataset Preview");
    tables::preview_table(ui, dataset, config.preview_rows);

    section(ui, "📌 Dataset Information");
    ui.columns(3, |cols| {
        metric(&mut cols[0], "Rows", profile.rows);
        metric(&mut cols[1], "Columns", profile.cols);
        metric(&mut cols[2], "Duplicate Rows", profile.duplicate_rows);
    });

    section(ui, "🧠 Column Data Types");
    tables::dtype_table(ui, profile);

    section(ui, "🔎 Column Classification");
    tables::classification(ui, classes);

    section(ui, "❌ Missing Value Analysis");
    tables::missing_table(ui, profile);

    section(ui, "📈 Descriptive Statistics");
    if profile.numeric.is_empty() {
        notice(
            ui,
            &Notice {
                level: NoticeLevel::Info,
                message: "No numeric columns found",
            },
        );
    } else {
        tables::describe_table(ui, profile);
    }

    section(ui, "📊 Univariate Analysis");
    chart_block(
        ui,
        ChartKind::Histogram,
        classes,
        |ui| {
            column_combo(
                ui,
                "hist_col",
                "Select Numeric Column",
                &classes.numeric,
                &mut sel.histogram_column,
            );
            chart::histogram(dataset, &sel.histogram_column, config.max_histogram_bins)
        },
        plot::histogram,
    );
    ui.add_space(8.0);
    chart_block(
        ui,
        ChartKind::ValueCounts,
        classes,
        |ui| {
            column_combo(
                ui,
                "value_count_col",
                "Select Categorical Column",
                &classes.categorical,
                &mut sel.value_count_column,
            );
            chart::value_counts_bar(dataset, &sel.value_count_column)
        },
        |ui, c| plot::category_bar(ui, "value_counts", c),
    );

    section(ui, "📊 Dynamic Bar Chart");
    chart_block(
        ui,
        ChartKind::GroupedBar,
        classes,
        |ui| {
            ui.horizontal(|ui: &mut Ui| {
                column_combo(
                    ui,
                    "bar_x",
                    "X-axis (Categorical)",
                    &classes.categorical,
                    &mut sel.bar_category,
                );
                column_combo(ui, "bar_y", "Y-axis (Numeric)", &classes.numeric, &mut sel.bar_value);
                choice_combo(
                    ui,
                    "bar_type",
                    "Chart Type",
                    &BarOrientation::ALL,
                    &mut sel.bar_orientation,
                );
            });
            chart::grouped_bar(dataset, &sel.bar_category, &sel.bar_value, sel.bar_orientation)
        },
        |ui, c| plot::category_bar(ui, "grouped_bar", c),
    );

    section(ui, "🥧 Dynamic Pie Chart");
    chart_block(
        ui,
        ChartKind::GroupedPie,
        classes,
        |ui| {
            ui.horizontal(|ui: &mut Ui| {
                column_combo(
                    ui,
                    "pie_cat",
                    "Category",
                    &classes.categorical,
                    &mut sel.pie_category,
                );
                column_combo(ui, "pie_num", "Value", &classes.numeric, &mut sel.pie_value);
                choice_combo(ui, "pie_type", "Chart Type", &PieKind::ALL, &mut sel.pie_kind);
            });
            chart::grouped_pie(dataset, &sel.pie_category, &sel.pie_value, sel.pie_kind)
        },
        paint::pie_chart,
    );

    section(ui, "🥧 Category Distribution Pie Chart");
    chart_block(
        ui,
        ChartKind::CountPie,
        classes,
        |ui| {
            column_combo(
                ui,
                "count_pie_cat",
                "Select Category to Visualize",
                &classes.categorical,
                &mut sel.count_pie_category,
            );
            chart::count_pie(dataset, &sel.count_pie_category)
        },
        paint::pie_chart,
    );

    section(ui, "🔥 Correlation Heatmap");
    chart_block(
        ui,
        ChartKind::Correlation,
        classes,
        |_ui| chart::correlation_heatmap(dataset, &classes.numeric),
        paint::heatmap,
    );

    section(ui, "🚨 Outlier Detection");
    chart_block(
        ui,
        ChartKind::Outliers,
        classes,
        |ui| {
            column_combo(
                ui,
                "outlier_col",
                "Select Column for Outlier Analysis",
                &classes.numeric,
                &mut sel.outlier_column,
            );
            chart::boxplot(dataset, &sel.outlier_column)
        },
        plot::boxplot,
    );

    section(ui, "⬇ Download Dataset");
    let clicked = ui.button("Download CSV").clicked();
    ui.add_space(24.0);
    clicked
}
