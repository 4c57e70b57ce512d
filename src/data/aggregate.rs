use std::collections::{BTreeMap, HashMap};

use super::model::{CellValue, Column};

// ---------------------------------------------------------------------------
// Scalar statistics
// ---------------------------------------------------------------------------

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator); NaN below two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Quantile `q` of an ascending slice, interpolating linearly between the
/// two closest ranks. NaN for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// Pearson correlation over the rows where both inputs are present.
///
/// NaN with fewer than two paired observations or when either side is
/// constant.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let (dx, dy) = (a - mx, b - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

// ---------------------------------------------------------------------------
// Column aggregates
// ---------------------------------------------------------------------------

/// Non-missing value counts, most frequent first. Equal counts keep the order
/// in which the values first appear.
pub fn value_counts(column: &Column) -> Vec<(CellValue, usize)> {
    let mut index: HashMap<&CellValue, usize> = HashMap::new();
    let mut counts: Vec<(CellValue, usize)> = Vec::new();
    for v in column.values.iter().filter(|v| !v.is_null()) {
        match index.get(v) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(v, counts.len());
                counts.push((v.clone(), 1));
            }
        }
    }
    // `sort_by` is stable, so ties stay in first-appearance order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Sum of `values` per distinct key, keys ascending.
///
/// Rows with a missing key are dropped; missing values add nothing, so a
/// group made only of missing values sums to zero.
pub fn group_sum(keys: &Column, values: &Column) -> Vec<(CellValue, f64)> {
    let mut groups: BTreeMap<&CellValue, f64> = BTreeMap::new();
    for (k, v) in keys.values.iter().zip(&values.values) {
        if k.is_null() {
            continue;
        }
        *groups.entry(k).or_insert(0.0) += v.as_f64().unwrap_or(0.0);
    }
    groups.into_iter().map(|(k, s)| (k.clone(), s)).collect()
}

/// Pairwise correlation matrix of the given numeric columns.
pub fn correlation_matrix(columns: &[&Column]) -> Vec<Vec<f64>> {
    let series: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|c| c.values.iter().map(CellValue::as_f64).collect())
        .collect();
    let n = series.len();
    let mut matrix = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let mut r = pearson(&series[i], &series[j]);
            if i == j && r.is_finite() {
                r = 1.0;
            }
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}

// ---------------------------------------------------------------------------
// Distribution helpers
// ---------------------------------------------------------------------------

/// One histogram bin covering `[start, end)` (the last bin is closed).
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width bins over the data range, Sturges' rule for the bin count,
/// capped at `max_bins`. A constant series gets one unit-wide bin centred on
/// its value.
pub fn histogram_bins(values: &[f64], max_bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Vec::new();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max == min {
        return vec![HistogramBin {
            start: min - 0.5,
            end: min + 0.5,
            count: finite.len(),
        }];
    }

    let sturges = (finite.len() as f64).log2().ceil() as usize + 1;
    let n_bins = sturges.clamp(1, max_bins.max(1));
    let width = (max - min) / n_bins as f64;

    let mut bins: Vec<HistogramBin> = (0..n_bins)
        .map(|i| HistogramBin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();
    for v in finite {
        let idx = (((v - min) / width) as usize).min(n_bins - 1);
        bins[idx].count += 1;
    }
    bins
}

/// Five-number summary plus the points outside the whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Quartiles by linear interpolation; whiskers reach the most extreme data
/// within 1.5 IQR of the box. `None` for an empty series.
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let lo_fence = q1 - 1.5 * iqr;
    let hi_fence = q3 + 1.5 * iqr;

    let inside = |v: &f64| *v >= lo_fence && *v <= hi_fence;
    let lower_whisker = sorted.iter().copied().find(inside).unwrap_or(q1);
    let upper_whisker = sorted.iter().copied().rev().find(inside).unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < lo_fence || *v > hi_fence)
        .collect();

    Some(BoxStats {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_bytes;

    #[test]
    fn quantile_interpolates() {
        let s = [1.0, 2.0, 3.0, 4.0, 10.0];
        assert_eq!(quantile(&s, 0.0), 1.0);
        assert_eq!(quantile(&s, 0.5), 3.0);
        assert!((quantile(&s, 0.9) - 7.6).abs() < 1e-12);
        assert!(quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn value_counts_most_frequent_first_ties_by_appearance() {
        let ds = load_csv_bytes(b"c\nb\na\nb\nc\n\na\nz\n").unwrap();
        let counts = value_counts(ds.column("c").unwrap());
        let labels: Vec<(String, usize)> =
            counts.iter().map(|(v, n)| (v.to_string(), *n)).collect();
        assert_eq!(
            labels,
            vec![
                ("b".to_string(), 2),
                ("a".to_string(), 2),
                ("c".to_string(), 1),
                ("z".to_string(), 1),
            ]
        );
    }

    #[test]
    fn group_sum_sorts_keys_and_skips_missing() {
        let ds = load_csv_bytes(b"k,v\nb,1\na,2\nb,3\n,100\na,\nc,\n").unwrap();
        let sums = group_sum(ds.column("k").unwrap(), ds.column("v").unwrap());
        let got: Vec<(String, f64)> = sums.iter().map(|(k, s)| (k.to_string(), *s)).collect();
        assert_eq!(
            got,
            vec![
                ("a".to_string(), 2.0),
                ("b".to_string(), 4.0),
                ("c".to_string(), 0.0),
            ]
        );
    }

    #[test]
    fn correlation_uses_pairwise_complete_rows() {
        let ds = load_csv_bytes(b"x,y,z,k\n1,2,5,1\n2,4,,1\n3,6,1,1\n4,,3,1\n").unwrap();
        let cols: Vec<&Column> = ds.columns.iter().collect();
        let m = correlation_matrix(&cols);
        assert_eq!(m[0][0], 1.0);
        assert!((m[0][1] - 1.0).abs() < 1e-12);
        assert_eq!(m[0][1], m[1][0]);
        // Constant column has no defined correlation, not even with itself.
        assert!(m[3][3].is_nan());
        assert!(m[0][3].is_nan());
        // x/z pairs: (1,5) (3,1) (4,3)
        assert!(m[0][2] < 0.0);
    }

    #[test]
    fn histogram_covers_every_value() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let bins = histogram_bins(&values, 50);
        assert_eq!(bins.len(), 8);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 100);
        assert_eq!(bins[0].start, 0.0);
        assert!((bins.last().unwrap().end - 99.0).abs() < 1e-9);

        let capped = histogram_bins(&values, 3);
        assert_eq!(capped.len(), 3);
    }

    #[test]
    fn histogram_of_constant_series_is_one_bin() {
        let bins = histogram_bins(&[4.0, 4.0, 4.0], 50);
        assert_eq!(
            bins,
            vec![HistogramBin {
                start: 3.5,
                end: 4.5,
                count: 3
            }]
        );
    }

    #[test]
    fn tiny_distinct_values_are_not_collapsed() {
        let bins = histogram_bins(&[1e-17, 3e-17], 50);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].start, 1e-17);
        assert_eq!(bins.iter().map(|b| b.count).collect::<Vec<_>>(), vec![1, 1]);
    }

    #[test]
    fn box_stats_flag_points_past_the_fences() {
        let stats = box_stats(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_eq!(stats.q1, 2.25);
        assert_eq!(stats.median, 3.5);
        assert_eq!(stats.q3, 4.75);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.upper_whisker, 5.0);
        assert_eq!(stats.outliers, vec![100.0]);
        assert!(box_stats(&[]).is_none());
    }
}
