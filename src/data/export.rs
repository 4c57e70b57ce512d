use anyhow::{Context, Result};

use super::model::{format_float, CellValue, Dataset};

/// File name offered by the download action.
pub const DOWNLOAD_FILE_NAME: &str = "cleaned_dataset.csv";

/// Media type of the exported bytes.
pub const DOWNLOAD_MIME: &str = "text/csv";

/// Serialize the dataset back to UTF-8 CSV: header row, no index column.
///
/// Integral floats keep their `.0` so that re-reading the bytes infers the
/// same column types; missing cells are written as empty fields.
pub fn to_csv_bytes(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(dataset.columns.iter().map(|c| c.name.as_str()))
        .context("writing CSV header")?;

    for row in 0..dataset.n_rows() {
        let record: Vec<String> = dataset.row(row).into_iter().map(cell_text).collect();
        writer
            .write_record(&record)
            .with_context(|| format!("writing CSV row {row}"))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV buffer: {}", e.error()))
}

fn cell_text(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        CellValue::Float(v) => format_float(*v),
        other => other.to_string(),
    }
}
