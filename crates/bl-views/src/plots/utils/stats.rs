//! Statistical aggregation for the distribution plot
//!
//! Everything here is a pure function of (point set, target attribute,
//! grouping attribute). Results are recomputed on every render request and
//! never cached, so they cannot drift from the selection.

use bl_core::data::{Dataset, RecordId};
use indexmap::IndexMap;

/// With this many points or fewer in the whole filtered selection, box
/// statistics are unreliable and the view plots raw points instead.
pub const POINT_FALLBACK_THRESHOLD: usize = 5;

/// Fixed Epanechnikov bandwidth for the violin density estimate.
pub const KDE_BANDWIDTH: f64 = 7.0;

/// Number of grid points in each density curve.
pub const KDE_GRID_POINTS: usize = 40;

/// Per-category box plot summary.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub key: String,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    /// Values outside the whisker bounds, kept individually.
    pub outliers: Vec<f64>,
}

/// Per-category kernel density estimate, sampled on the shared grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityCurve {
    pub key: String,
    /// (value, estimated density) pairs.
    pub points: Vec<(f64, f64)>,
}

/// Target values of a point set, grouped by the grouping attribute.
///
/// Group order is first-seen order in the input rows. Rows whose target
/// value is empty or non-numeric are silently excluded.
#[derive(Debug, Clone, Default)]
pub struct GroupedValues {
    groups: IndexMap<String, Vec<f64>>,
}

impl GroupedValues {
    pub fn collect(dataset: &Dataset, rows: &[RecordId], target: &str, group: &str) -> Self {
        let mut groups: IndexMap<String, Vec<f64>> = IndexMap::new();
        let (Some(target_col), Some(group_col)) =
            (dataset.column_index(target), dataset.column_index(group))
        else {
            return Self::default();
        };

        for &id in rows {
            let Some(value) = dataset.numeric_value(id, target_col) else {
                continue;
            };
            let key = dataset.value(id, group_col).unwrap_or_default().to_string();
            groups.entry(key).or_default().push(value);
        }

        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of retained values across all groups.
    pub fn total_len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// (category, values) in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Box plot statistics per group, first-seen order.
    pub fn box_stats(&self) -> Vec<GroupStats> {
        self.groups
            .iter()
            .filter_map(|(key, values)| box_stats_for(key, values))
            .collect()
    }

    /// Kernel density estimate per group on a grid shared across groups,
    /// spanning the observed range of the entire filtered selection.
    pub fn density_curves(&self) -> Vec<DensityCurve> {
        let Some((min, max)) = bl_core::scale::extent(self.groups.values().flatten().copied())
        else {
            return Vec::new();
        };

        let grid = value_grid(min, max, KDE_GRID_POINTS);
        let kernel = epanechnikov(KDE_BANDWIDTH);

        self.groups
            .iter()
            .map(|(key, values)| DensityCurve {
                key: key.clone(),
                points: grid
                    .iter()
                    .map(|&x| {
                        let density = values.iter().map(|&v| kernel(x - v)).sum::<f64>()
                            / values.len() as f64;
                        (x, density)
                    })
                    .collect(),
            })
            .collect()
    }
}

fn box_stats_for(key: &str, values: &[f64]) -> Option<GroupStats> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let (q1, median, q3) = quartiles_of_sorted(&sorted);
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    let iqr = q3 - q1;
    // Whisker bounds clamp to the observed extremes.
    let lower_whisker = min.max(q1 - 1.5 * iqr);
    let upper_whisker = max.min(q3 + 1.5 * iqr);

    let outliers = sorted
        .iter()
        .filter(|&&v| v < lower_whisker || v > upper_whisker)
        .copied()
        .collect();

    Some(GroupStats {
        key: key.to_string(),
        min,
        q1,
        median,
        q3,
        max,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Calculate quartiles using linear interpolation
pub fn calculate_quartiles(values: &[f64]) -> (f64, f64, f64) {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quartiles_of_sorted(&sorted)
}

fn quartiles_of_sorted(sorted: &[f64]) -> (f64, f64, f64) {
    let n = sorted.len();
    if n == 0 {
        return (0.0, 0.0, 0.0);
    }

    let q1_idx = (n - 1) as f64 * 0.25;
    let q2_idx = (n - 1) as f64 * 0.5;
    let q3_idx = (n - 1) as f64 * 0.75;

    (
        interpolate(sorted, q1_idx),
        interpolate(sorted, q2_idx),
        interpolate(sorted, q3_idx),
    )
}

fn interpolate(sorted: &[f64], idx: f64) -> f64 {
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;

    if lower == upper || upper >= sorted.len() {
        sorted[lower]
    } else {
        let fraction = idx - lower as f64;
        sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction
    }
}

/// Epanechnikov kernel with bandwidth `k`.
pub fn epanechnikov(k: f64) -> impl Fn(f64) -> f64 {
    move |v: f64| {
        let u = v / k;
        if u.abs() <= 1.0 {
            0.75 * (1.0 - u * u) / k
        } else {
            0.0
        }
    }
}

/// `n` evenly spaced grid values covering `[min, max]`.
fn value_grid(min: f64, max: f64, n: usize) -> Vec<f64> {
    if n < 2 || min == max {
        return vec![min];
    }
    (0..n)
        .map(|i| min + (max - min) * i as f64 / (n - 1) as f64)
        .collect()
}
