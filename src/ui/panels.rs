use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::export::{self, DOWNLOAD_MIME};
use crate::data::loader::{self, LoadError};
use crate::data::model::Dataset;
use crate::state::{AppState, Status};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_save = state.dataset.is_some();
            if ui
                .add_enabled(can_save, egui::Button::new("Download CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(name), Some(ds)) = (&state.source_name, &state.dataset) {
            ui.label(format!("{name}: {} rows × {} columns", ds.n_rows(), ds.n_cols()));
            ui.separator();
        }

        match &state.status {
            Some(Status::Success(msg)) => {
                ui.label(RichText::new(format!("✅ {msg}")).color(Color32::from_rgb(60, 160, 80)));
            }
            Some(Status::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload CSV File")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        load_path(state, &path);
    }
}

/// Load a file dropped onto the window.
pub fn load_dropped(state: &mut AppState, file: &egui::DroppedFile) {
    if let Some(bytes) = &file.bytes {
        apply_load(state, file.name.clone(), loader::load_csv_bytes(bytes));
    } else if let Some(path) = &file.path {
        load_path(state, path);
    }
}

fn load_path(state: &mut AppState, path: &Path) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    apply_load(state, name, loader::load_file(path));
}

fn apply_load(state: &mut AppState, name: String, result: Result<Dataset, LoadError>) {
    match result {
        Ok(dataset) => {
            log::info!(
                "Loaded {name}: {} rows, columns {:?}",
                dataset.n_rows(),
                dataset.column_names()
            );
            state.set_dataset(dataset, name);
        }
        Err(e) => {
            log::error!("Failed to load {name}: {e}");
            state.set_error(format!("Error loading {name}: {e}"));
        }
    }
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

pub fn save_file_dialog(state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let Some(path) = rfd::FileDialog::new()
        .set_title("Download CSV")
        .set_file_name(state.config.download_file_name.as_str())
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return;
    };

    match write_export(dataset, &path) {
        Ok(n_bytes) => {
            log::info!("Wrote {n_bytes} bytes of {DOWNLOAD_MIME} to {}", path.display());
            state.status = Some(Status::Success(format!("Saved {}", path.display())));
        }
        Err(e) => {
            log::error!("Failed to save dataset: {e:#}");
            state.set_error(format!("Error: {e:#}"));
        }
    }
}

fn write_export(dataset: &Dataset, path: &Path) -> Result<usize> {
    let bytes = export::to_csv_bytes(dataset)?;
    std::fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(bytes.len())
}
