use std::collections::HashSet;

use super::aggregate::{mean, quantile, sample_std};
use super::model::{CellValue, ColumnClass, ColumnType, Dataset};

// ---------------------------------------------------------------------------
// Per-column summary
// ---------------------------------------------------------------------------

/// One row of the dtype / missing-value tables.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: ColumnType,
    /// Distinct non-missing values.
    pub unique: usize,
    pub missing: usize,
    /// `missing / rows * 100`, rounded to two decimals.
    pub missing_pct: f64,
}

/// Column names split by which chart controls they can feed.
///
/// Every column lands in exactly one of the two lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnClasses {
    pub categorical: Vec<String>,
    pub numeric: Vec<String>,
}

impl ColumnClasses {
    pub fn classify(dataset: &Dataset) -> Self {
        let mut classes = ColumnClasses::default();
        for col in &dataset.columns {
            match col.class() {
                ColumnClass::Categorical => classes.categorical.push(col.name.clone()),
                ColumnClass::Numeric => classes.numeric.push(col.name.clone()),
            }
        }
        classes
    }
}

/// `count / mean / std / min / quartiles / max` of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl NumericSummary {
    /// Row labels of the descriptive statistics table, in display order.
    pub const STATS: [&'static str; 8] =
        ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    pub fn from_values(column: &str, values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        NumericSummary {
            column: column.to_string(),
            count: values.len(),
            mean: mean(values),
            std: sample_std(values),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }

    /// Value for one of [`Self::STATS`], by position.
    pub fn stat(&self, idx: usize) -> f64 {
        match idx {
            0 => self.count as f64,
            1 => self.mean,
            2 => self.std,
            3 => self.min,
            4 => self.q25,
            5 => self.median,
            6 => self.q75,
            _ => self.max,
        }
    }
}

// ---------------------------------------------------------------------------
// DatasetProfile
// ---------------------------------------------------------------------------

/// Everything the report shows about the table before any chart is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetProfile {
    pub rows: usize,
    pub cols: usize,
    pub duplicate_rows: usize,
    pub columns: Vec<ColumnSummary>,
    pub classes: ColumnClasses,
    pub numeric: Vec<NumericSummary>,
}

impl DatasetProfile {
    pub fn compute(dataset: &Dataset) -> Self {
        let rows = dataset.n_rows();
        let columns = dataset
            .columns
            .iter()
            .map(|col| {
                let missing = col.null_count();
                ColumnSummary {
                    name: col.name.clone(),
                    dtype: col.dtype,
                    unique: col.unique_values().len(),
                    missing,
                    missing_pct: missing_percentage(missing, rows),
                }
            })
            .collect();

        let numeric = dataset
            .columns
            .iter()
            .filter(|c| c.class() == ColumnClass::Numeric)
            .map(|c| NumericSummary::from_values(&c.name, &c.numeric_values()))
            .collect();

        DatasetProfile {
            rows,
            cols: dataset.n_cols(),
            duplicate_rows: duplicate_rows(dataset),
            columns,
            classes: ColumnClasses::classify(dataset),
            numeric,
        }
    }
}

/// Share of missing cells as a percentage rounded to two decimals.
/// A table without rows has nothing missing.
pub fn missing_percentage(missing: usize, rows: usize) -> f64 {
    if rows == 0 {
        return 0.0;
    }
    let pct = missing as f64 / rows as f64 * 100.0;
    (pct * 100.0).round_ties_even() / 100.0
}

/// Rows identical to an earlier row. Missing cells compare equal.
pub fn duplicate_rows(dataset: &Dataset) -> usize {
    let mut seen: HashSet<Vec<&CellValue>> = HashSet::with_capacity(dataset.n_rows());
    (0..dataset.n_rows())
        .filter(|&i| !seen.insert(dataset.row(i)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_bytes;

    fn profile(text: &str) -> DatasetProfile {
        DatasetProfile::compute(&load_csv_bytes(text.as_bytes()).unwrap())
    }

    #[test]
    fn counts_match_table_dimensions() {
        let p = profile("a,b,c\n1,x,2.0\n2,y,\n3,,4.5\n");
        assert_eq!(p.rows, 3);
        assert_eq!(p.cols, 3);
        assert_eq!(p.columns.len(), 3);
    }

    #[test]
    fn missing_percentage_is_rounded() {
        let p = profile("a,b\n1,\n2,x\n3,y\n");
        let b = &p.columns[1];
        assert_eq!(b.missing, 1);
        assert_eq!(b.missing_pct, 33.33);
        assert_eq!(missing_percentage(2, 3), 66.67);
        assert_eq!(missing_percentage(0, 0), 0.0);
    }

    #[test]
    fn duplicates_treat_missing_as_equal() {
        let p = profile("a,b\n1,\n1,\n2,x\n1,\n2,x\n");
        assert_eq!(p.duplicate_rows, 3);
    }

    #[test]
    fn signed_zeros_are_duplicates() {
        let p = profile("x\n0.0\n-0.0\n");
        assert_eq!(p.duplicate_rows, 1);
        assert_eq!(p.columns[0].unique, 1);
    }

    #[test]
    fn nan_cells_count_as_missing() {
        let p = profile("x\nNAN\nNAN\n1.5\n");
        assert_eq!(p.columns[0].missing, 2);
        assert_eq!(p.columns[0].unique, 1);
        assert_eq!(p.duplicate_rows, 1);
    }

    #[test]
    fn unique_counts_ignore_missing() {
        let p = profile("a\nx\ny\n\nx\n");
        assert_eq!(p.columns[0].unique, 2);
    }

    #[test]
    fn classification_is_a_disjoint_cover() {
        let p = profile("i,f,s,b,empty\n1,1.5,a,True,\n2,2.5,b,False,\n");
        let mut all: Vec<String> = p
            .classes
            .categorical
            .iter()
            .chain(&p.classes.numeric)
            .cloned()
            .collect();
        all.sort();
        assert_eq!(all, vec!["b", "empty", "f", "i", "s"]);
        assert_eq!(p.classes.categorical, vec!["s", "b"]);
        assert_eq!(p.classes.numeric, vec!["i", "f", "empty"]);
    }

    #[test]
    fn describe_uses_sample_std_and_linear_quartiles() {
        let p = profile("v\n1\n2\n3\n4\n");
        let s = &p.numeric[0];
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, 2.5);
        assert!((s.std - 1.2909944487358056).abs() < 1e-12);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.q25, 1.75);
        assert_eq!(s.median, 2.5);
        assert_eq!(s.q75, 3.25);
        assert_eq!(s.max, 4.0);
    }

    #[test]
    fn describe_of_single_value_has_undefined_std() {
        let p = profile("v\n7\n");
        assert!(p.numeric[0].std.is_nan());
        assert_eq!(p.numeric[0].median, 7.0);
    }
}
