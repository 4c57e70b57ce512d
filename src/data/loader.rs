use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use super::model::{CellValue, Column, ColumnType, Dataset};

/// Cell texts that are read as missing values.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_VALUES: &[&str] = &["True", "TRUE", "true"];
const FALSE_VALUES: &[&str] = &["False", "FALSE", "false"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("No columns to parse from file")]
    NoColumns,
    #[error("Expected {expected} fields in line {line}, saw {found}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a CSV dataset from a file on disk.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_csv_bytes(&bytes)
}

/// Parse raw CSV bytes into a [`Dataset`].
///
/// The first record is the header. Column types are inferred from every cell
/// (see [`infer_column`]); short rows are padded with missing values, long
/// rows are rejected. A leading UTF-8 byte order mark is ignored.
pub fn load_csv_bytes(bytes: &[u8]) -> Result<Dataset, LoadError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record?,
        None => return Err(LoadError::NoColumns),
    };
    let names = dedupe_headers(header.iter());
    let n_cols = names.len();

    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); n_cols];
    for result in records {
        let record = result?;
        if record.len() > n_cols {
            return Err(LoadError::TooManyFields {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: n_cols,
                found: record.len(),
            });
        }
        for (col_idx, cells) in raw.iter_mut().enumerate() {
            let cell = record.get(col_idx).unwrap_or("");
            if NA_VALUES.contains(&cell) {
                cells.push(None);
            } else {
                cells.push(Some(cell.to_string()));
            }
        }
    }

    let columns: Vec<Column> = names
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| infer_column(name, cells))
        .collect();

    // Every column received exactly one cell per record above.
    Dataset::from_columns(columns).ok_or(LoadError::NoColumns)
}

// ---------------------------------------------------------------------------
// Header handling
// ---------------------------------------------------------------------------

/// Blank names become `Unnamed: {i}`; repeats become `name.1`, `name.2`, ...
fn dedupe_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::new();
    for (i, h) in raw.enumerate() {
        let base = if h.is_empty() {
            format!("Unnamed: {i}")
        } else {
            h.to_string()
        };
        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }
    names
}

// ---------------------------------------------------------------------------
// Type inference
// ---------------------------------------------------------------------------

/// Pick the narrowest type that fits every non-missing cell of a column.
///
/// Integers with gaps are widened to floats; booleans with gaps fall back to
/// text. Cells the float parser reads as NaN in any casing (`NAN`, `Nan`)
/// are missing values. A column without a single value is an all-missing
/// float column, unless there are no rows at all.
fn infer_column(name: String, cells: Vec<Option<String>>) -> Column {
    let has_missing = cells.iter().any(Option::is_none);
    let present: Vec<&str> = cells.iter().flatten().map(String::as_str).collect();

    if cells.is_empty() {
        return Column {
            name,
            dtype: ColumnType::Object,
            values: Vec::new(),
        };
    }

    let ints: Option<Vec<i64>> = present.iter().map(|s| s.trim().parse().ok()).collect();
    if let Some(ints) = ints {
        let mut ints = ints.into_iter();
        let (dtype, values) = if has_missing {
            let values = cells
                .iter()
                .map(|c| match c {
                    Some(_) => ints
                        .next()
                        .map(|i| CellValue::Float(i as f64))
                        .unwrap_or(CellValue::Null),
                    None => CellValue::Null,
                })
                .collect();
            (ColumnType::Float64, values)
        } else {
            (ColumnType::Int64, ints.map(CellValue::Integer).collect())
        };
        return Column {
            name,
            dtype,
            values,
        };
    }

    if present.iter().all(|s| s.trim().parse::<f64>().is_ok()) {
        let values = cells
            .iter()
            .map(|c| {
                c.as_deref()
                    .and_then(|s| s.trim().parse::<f64>().ok())
                    .filter(|v| !v.is_nan())
                    .map(CellValue::Float)
                    .unwrap_or(CellValue::Null)
            })
            .collect();
        return Column {
            name,
            dtype: ColumnType::Float64,
            values,
        };
    }

    let is_bool = |s: &&str| TRUE_VALUES.contains(s) || FALSE_VALUES.contains(s);
    if !has_missing && present.iter().all(is_bool) {
        let values = present
            .iter()
            .map(|s| CellValue::Bool(TRUE_VALUES.contains(s)))
            .collect();
        return Column {
            name,
            dtype: ColumnType::Bool,
            values,
        };
    }

    let values = cells
        .into_iter()
        .map(|c| c.map(CellValue::String).unwrap_or(CellValue::Null))
        .collect();
    Column {
        name,
        dtype: ColumnType::Object,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> Dataset {
        load_csv_bytes(text.as_bytes()).unwrap()
    }

    #[test]
    fn infers_column_types() {
        let ds = load("id,price,name,flag\n1,2.5,apple,True\n2,3,pear,false\n");
        let types: Vec<ColumnType> = ds.columns.iter().map(|c| c.dtype).collect();
        assert_eq!(
            types,
            vec![
                ColumnType::Int64,
                ColumnType::Float64,
                ColumnType::Object,
                ColumnType::Bool
            ]
        );
        assert_eq!(ds.n_rows(), 2);
        assert_eq!(ds.n_cols(), 4);
        assert_eq!(ds.column("flag").unwrap().values[1], CellValue::Bool(false));
    }

    #[test]
    fn integers_with_gaps_become_floats() {
        let ds = load("a\n1\nNA\n3\n");
        let col = ds.column("a").unwrap();
        assert_eq!(col.dtype, ColumnType::Float64);
        assert_eq!(
            col.values,
            vec![CellValue::Float(1.0), CellValue::Null, CellValue::Float(3.0)]
        );
    }

    #[test]
    fn booleans_with_gaps_become_text() {
        let ds = load("a\nTrue\n\nFalse\n");
        // The blank line is skipped, so only two rows remain.
        assert_eq!(ds.n_rows(), 2);
        let ds = load("a,b\nTrue,1\n,2\n");
        assert_eq!(ds.column("a").unwrap().dtype, ColumnType::Object);
    }

    #[test]
    fn all_missing_column_is_float() {
        let ds = load("a,b\n,1\nnull,2\n");
        assert_eq!(ds.column("a").unwrap().dtype, ColumnType::Float64);
        assert_eq!(ds.column("a").unwrap().null_count(), 2);
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let ds = load("a,b\n");
        assert_eq!(ds.n_rows(), 0);
        assert_eq!(ds.n_cols(), 2);
        assert_eq!(ds.columns[0].dtype, ColumnType::Object);
    }

    #[test]
    fn duplicate_and_blank_headers_are_renamed() {
        let ds = load("a,,a,a\n1,2,3,4\n");
        assert_eq!(ds.column_names(), vec!["a", "Unnamed: 1", "a.1", "a.2"]);
    }

    #[test]
    fn short_rows_are_padded() {
        let ds = load("a,b,c\n1,x\n2,y,3\n");
        assert_eq!(ds.column("c").unwrap().values[0], CellValue::Null);
        assert_eq!(ds.column("c").unwrap().dtype, ColumnType::Float64);
    }

    #[test]
    fn long_rows_are_rejected() {
        let err = load_csv_bytes(b"a,b\n1,2\n1,2,3\n").unwrap_err();
        match err {
            LoadError::TooManyFields {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 3);
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_has_no_columns() {
        assert!(matches!(load_csv_bytes(b""), Err(LoadError::NoColumns)));
    }

    #[test]
    fn text_is_kept_verbatim() {
        let ds = load("name\n\" padded \"\nplain\n");
        assert_eq!(
            ds.column("name").unwrap().values[0],
            CellValue::String(" padded ".into())
        );
    }

    #[test]
    fn nan_in_any_casing_is_missing() {
        let ds = load("x,y\nNAN,1\n2.5,2\nNan,3\n");
        let col = ds.column("x").unwrap();
        assert_eq!(col.dtype, ColumnType::Float64);
        assert_eq!(
            col.values,
            vec![CellValue::Null, CellValue::Float(2.5), CellValue::Null]
        );
        assert_eq!(col.null_count(), 2);
    }

    #[test]
    fn byte_order_mark_is_not_part_of_the_header() {
        let ds = load_csv_bytes(b"\xEF\xBB\xBFid,name\n1,a\n").unwrap();
        assert_eq!(ds.column_names(), vec!["id", "name"]);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}
