use std::fmt;

use thiserror::Error;

use super::aggregate::{self, BoxStats, HistogramBin};
use super::model::{Column, ColumnClass, Dataset};
use super::profile::ColumnClasses;

// ---------------------------------------------------------------------------
// Errors and notices
// ---------------------------------------------------------------------------

/// A chart could not be built from the current selection.
#[derive(Debug, Error, PartialEq)]
pub enum ChartError {
    #[error("column '{0}' does not exist")]
    UnknownColumn(String),
    #[error("column '{0}' is not numeric")]
    NotNumeric(String),
    #[error("column '{0}' is not categorical")]
    NotCategorical(String),
    #[error("column '{0}' has no non-missing values")]
    NoData(String),
    #[error("need at least {needed} numeric columns, found {found}")]
    NotEnoughColumns { needed: usize, found: usize },
    #[error("values of '{0}' have no positive total to divide into slices")]
    NothingToDraw(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// Why a chart is not offered for this dataset. Not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: &'static str,
}

impl Notice {
    const fn info(message: &'static str) -> Self {
        Notice {
            level: NoticeLevel::Info,
            message,
        }
    }

    const fn warning(message: &'static str) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            message,
        }
    }
}

/// The fixed set of charts in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Histogram,
    ValueCounts,
    GroupedBar,
    GroupedPie,
    CountPie,
    Correlation,
    Outliers,
}

impl ChartKind {
    /// Used in "Error creating ..." messages.
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Histogram => "histogram",
            ChartKind::ValueCounts => "value count chart",
            ChartKind::GroupedBar => "bar chart",
            ChartKind::GroupedPie => "pie chart",
            ChartKind::CountPie => "distribution chart",
            ChartKind::Correlation => "correlation heatmap",
            ChartKind::Outliers => "box plot",
        }
    }

    /// Checks the column classes a chart needs. `Some` means skip the chart
    /// and show the notice instead.
    pub fn prerequisite(&self, classes: &ColumnClasses) -> Option<Notice> {
        let has_cat = !classes.categorical.is_empty();
        let has_num = !classes.numeric.is_empty();
        match self {
            ChartKind::Histogram if !has_num => {
                Some(Notice::info("No numeric columns available for a histogram"))
            }
            ChartKind::ValueCounts if !has_cat => {
                Some(Notice::info("No categorical columns available for value counts"))
            }
            ChartKind::GroupedBar if !(has_cat && has_num) => Some(Notice::warning(
                "Need both categorical and numeric columns for bar chart",
            )),
            ChartKind::GroupedPie if !(has_cat && has_num) => Some(Notice::warning(
                "Need both categorical and numeric columns for pie chart",
            )),
            ChartKind::CountPie if !has_cat => Some(Notice::warning(
                "No categorical columns available for distribution chart",
            )),
            ChartKind::Correlation if classes.numeric.len() < 2 => {
                Some(Notice::info("Not enough numeric columns for correlation"))
            }
            ChartKind::Outliers if !has_num => Some(Notice::info(
                "No numeric columns available for outlier analysis",
            )),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Chart sub-type selectors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarOrientation {
    #[default]
    Vertical,
    Horizontal,
}

impl BarOrientation {
    pub const ALL: [BarOrientation; 2] = [BarOrientation::Vertical, BarOrientation::Horizontal];
}

impl fmt::Display for BarOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BarOrientation::Vertical => "Vertical Bar",
            BarOrientation::Horizontal => "Horizontal Bar",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PieKind {
    #[default]
    Pie,
    Donut,
}

impl PieKind {
    pub const ALL: [PieKind; 2] = [PieKind::Pie, PieKind::Donut];

    /// Inner radius as a fraction of the outer radius.
    pub fn hole(&self) -> f32 {
        match self {
            PieKind::Pie => 0.0,
            PieKind::Donut => 0.4,
        }
    }
}

impl fmt::Display for PieKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PieKind::Pie => "Pie Chart",
            PieKind::Donut => "Donut Chart",
        })
    }
}

// ---------------------------------------------------------------------------
// Renderable chart descriptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramChart {
    pub title: String,
    pub column: String,
    pub bins: Vec<HistogramBin>,
}

/// Labelled bars, one per category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryChart {
    pub title: String,
    pub category_axis: String,
    pub value_axis: String,
    pub entries: Vec<(String, f64)>,
    pub orientation: BarOrientation,
    /// Colour each bar on a continuous scale by its value.
    pub color_by_value: bool,
}

impl CategoryChart {
    /// `(min, max)` of the bar values, for colour scaling.
    pub fn value_range(&self) -> (f64, f64) {
        self.entries.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, v)| {
            (lo.min(*v), hi.max(*v))
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    /// Positive slice values only.
    pub slices: Vec<(String, f64)>,
    pub hole: f32,
}

impl PieChart {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|(_, v)| v).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub labels: Vec<String>,
    /// Square, symmetric, row-major.
    pub matrix: Vec<Vec<f64>>,
    /// Finite range of the matrix, used to scale the colours.
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxChart {
    pub title: String,
    pub column: String,
    pub stats: BoxStats,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

fn column<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Column, ChartError> {
    dataset
        .column(name)
        .ok_or_else(|| ChartError::UnknownColumn(name.to_string()))
}

fn numeric_column<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Column, ChartError> {
    let col = column(dataset, name)?;
    if col.class() != ColumnClass::Numeric {
        return Err(ChartError::NotNumeric(name.to_string()));
    }
    Ok(col)
}

fn categorical_column<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Column, ChartError> {
    let col = column(dataset, name)?;
    if col.class() != ColumnClass::Categorical {
        return Err(ChartError::NotCategorical(name.to_string()));
    }
    Ok(col)
}

fn counts_of(col: &Column) -> Result<Vec<(String, f64)>, ChartError> {
    let counts: Vec<(String, f64)> = aggregate::value_counts(col)
        .into_iter()
        .map(|(v, n)| (v.to_string(), n as f64))
        .collect();
    if counts.is_empty() {
        return Err(ChartError::NoData(col.name.clone()));
    }
    Ok(counts)
}

fn sums_of(keys: &Column, values: &Column) -> Result<Vec<(String, f64)>, ChartError> {
    let sums: Vec<(String, f64)> = aggregate::group_sum(keys, values)
        .into_iter()
        .map(|(k, s)| (k.to_string(), s))
        .collect();
    if sums.is_empty() {
        return Err(ChartError::NoData(keys.name.clone()));
    }
    Ok(sums)
}

/// Keep positive slices; fail when nothing is left to draw.
fn pie_slices(
    entries: Vec<(String, f64)>,
    value_name: &str,
) -> Result<Vec<(String, f64)>, ChartError> {
    let slices: Vec<(String, f64)> = entries
        .into_iter()
        .filter(|(_, v)| v.is_finite() && *v > 0.0)
        .collect();
    if slices.is_empty() {
        return Err(ChartError::NothingToDraw(value_name.to_string()));
    }
    Ok(slices)
}

/// Distribution of one numeric column.
pub fn histogram(
    dataset: &Dataset,
    name: &str,
    max_bins: usize,
) -> Result<HistogramChart, ChartError> {
    let col = numeric_column(dataset, name)?;
    let bins = aggregate::histogram_bins(&col.numeric_values(), max_bins);
    if bins.is_empty() {
        return Err(ChartError::NoData(name.to_string()));
    }
    Ok(HistogramChart {
        title: format!("Distribution of {name}"),
        column: name.to_string(),
        bins,
    })
}

/// Value counts of one categorical column.
pub fn value_counts_bar(dataset: &Dataset, name: &str) -> Result<CategoryChart, ChartError> {
    let col = categorical_column(dataset, name)?;
    Ok(CategoryChart {
        title: format!("Value Counts of {name}"),
        category_axis: name.to_string(),
        value_axis: "Count".to_string(),
        entries: counts_of(col)?,
        orientation: BarOrientation::Vertical,
        color_by_value: false,
    })
}

/// Sum of a numeric column per category.
pub fn grouped_bar(
    dataset: &Dataset,
    category: &str,
    value: &str,
    orientation: BarOrientation,
) -> Result<CategoryChart, ChartError> {
    let keys = categorical_column(dataset, category)?;
    let values = numeric_column(dataset, value)?;
    Ok(CategoryChart {
        title: format!("{value} by {category}"),
        category_axis: category.to_string(),
        value_axis: value.to_string(),
        entries: sums_of(keys, values)?,
        orientation,
        color_by_value: true,
    })
}

/// Share of a numeric column's total per category.
pub fn grouped_pie(
    dataset: &Dataset,
    category: &str,
    value: &str,
    kind: PieKind,
) -> Result<PieChart, ChartError> {
    let keys = categorical_column(dataset, category)?;
    let values = numeric_column(dataset, value)?;
    let mut title = format!("{value} Distribution by {category}");
    if kind == PieKind::Donut {
        title.push_str(" (Donut)");
    }
    Ok(PieChart {
        title,
        slices: pie_slices(sums_of(keys, values)?, value)?,
        hole: kind.hole(),
    })
}

/// Share of rows per category.
pub fn count_pie(dataset: &Dataset, name: &str) -> Result<PieChart, ChartError> {
    let col = categorical_column(dataset, name)?;
    Ok(PieChart {
        title: format!("Count Distribution of {name}"),
        slices: pie_slices(counts_of(col)?, name)?,
        hole: 0.0,
    })
}

/// Correlation between every pair of the given numeric columns.
pub fn correlation_heatmap(dataset: &Dataset, names: &[String]) -> Result<Heatmap, ChartError> {
    if names.len() < 2 {
        return Err(ChartError::NotEnoughColumns {
            needed: 2,
            found: names.len(),
        });
    }
    let columns = names
        .iter()
        .map(|n| numeric_column(dataset, n))
        .collect::<Result<Vec<_>, _>>()?;
    let matrix = aggregate::correlation_matrix(&columns);
    let (min, max) = matrix
        .iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    // No defined correlation anywhere: fall back to the full coefficient range.
    let (min, max) = if min <= max { (min, max) } else { (-1.0, 1.0) };
    Ok(Heatmap {
        labels: names.to_vec(),
        matrix,
        min,
        max,
    })
}

/// Spread and outliers of one numeric column.
pub fn boxplot(dataset: &Dataset, name: &str) -> Result<BoxChart, ChartError> {
    let col = numeric_column(dataset, name)?;
    let stats = aggregate::box_stats(&col.numeric_values())
        .ok_or_else(|| ChartError::NoData(name.to_string()))?;
    Ok(BoxChart {
        title: format!("Outliers in {name}"),
        column: name.to_string(),
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_bytes;
    use crate::data::profile::ColumnClasses;

    const SALES: &[u8] = b"region,units,price\nnorth,3,1.5\nsouth,2,2.0\nnorth,5,\n,1,4.0\n";

    fn sales() -> Dataset {
        load_csv_bytes(SALES).unwrap()
    }

    #[test]
    fn missing_category_skips_bar_and_pie_with_warning() {
        let ds = load_csv_bytes(b"a,b\n1,2\n3,4\n").unwrap();
        let classes = ColumnClasses::classify(&ds);
        for kind in [ChartKind::GroupedBar, ChartKind::GroupedPie, ChartKind::CountPie] {
            let notice = kind.prerequisite(&classes).unwrap();
            assert_eq!(notice.level, NoticeLevel::Warning);
        }
        assert!(ChartKind::Correlation.prerequisite(&classes).is_none());
        assert!(ChartKind::Histogram.prerequisite(&classes).is_none());
    }

    #[test]
    fn single_numeric_column_has_no_heatmap() {
        let ds = load_csv_bytes(b"a,s\n1,x\n2,y\n").unwrap();
        let classes = ColumnClasses::classify(&ds);
        let notice = ChartKind::Correlation.prerequisite(&classes).unwrap();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(notice.message, "Not enough numeric columns for correlation");
        assert_eq!(
            correlation_heatmap(&ds, &classes.numeric),
            Err(ChartError::NotEnoughColumns { needed: 2, found: 1 })
        );
    }

    #[test]
    fn grouped_bar_sums_per_category() {
        let chart = grouped_bar(&sales(), "region", "units", BarOrientation::Horizontal).unwrap();
        assert_eq!(chart.title, "units by region");
        assert_eq!(
            chart.entries,
            vec![("north".to_string(), 8.0), ("south".to_string(), 2.0)]
        );
        assert_eq!(chart.value_range(), (2.0, 8.0));
        assert!(chart.color_by_value);
    }

    #[test]
    fn grouped_bar_rejects_swapped_columns() {
        assert_eq!(
            grouped_bar(&sales(), "units", "region", BarOrientation::Vertical),
            Err(ChartError::NotCategorical("units".to_string()))
        );
        assert_eq!(
            grouped_bar(&sales(), "nope", "units", BarOrientation::Vertical),
            Err(ChartError::UnknownColumn("nope".to_string()))
        );
    }

    #[test]
    fn donut_has_hole_and_suffix() {
        let pie = grouped_pie(&sales(), "region", "price", PieKind::Donut).unwrap();
        assert_eq!(pie.title, "price Distribution by region (Donut)");
        assert_eq!(pie.hole, 0.4);
        assert_eq!(pie.total(), 3.5);
    }

    #[test]
    fn pie_of_non_positive_values_fails() {
        let ds = load_csv_bytes(b"k,v\na,-1\nb,0\n").unwrap();
        assert_eq!(
            grouped_pie(&ds, "k", "v", PieKind::Pie),
            Err(ChartError::NothingToDraw("v".to_string()))
        );
    }

    #[test]
    fn count_pie_and_value_counts_agree() {
        let ds = sales();
        let pie = count_pie(&ds, "region").unwrap();
        let bar = value_counts_bar(&ds, "region").unwrap();
        assert_eq!(pie.slices, bar.entries);
        assert_eq!(pie.title, "Count Distribution of region");
        assert_eq!(bar.title, "Value Counts of region");
    }

    #[test]
    fn histogram_and_boxplot_need_values() {
        let ds = load_csv_bytes(b"a,b\n,1\n,2\n").unwrap();
        assert_eq!(
            histogram(&ds, "a", 50),
            Err(ChartError::NoData("a".to_string()))
        );
        assert_eq!(boxplot(&ds, "a"), Err(ChartError::NoData("a".to_string())));
        let h = histogram(&ds, "b", 50).unwrap();
        assert_eq!(h.title, "Distribution of b");
        assert_eq!(boxplot(&ds, "b").unwrap().title, "Outliers in b");
    }

    #[test]
    fn heatmap_range_spans_finite_cells() {
        let ds = load_csv_bytes(b"x,y,z\n1,3,1\n2,2,5\n3,1,2\n").unwrap();
        let names = ds.column_names();
        let heat = correlation_heatmap(&ds, &names).unwrap();
        assert_eq!(heat.labels, names);
        assert_eq!(heat.max, 1.0);
        assert!((heat.min + 1.0).abs() < 1e-12);
    }
}
