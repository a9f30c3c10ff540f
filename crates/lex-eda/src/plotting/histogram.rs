//! Histogram binning and per-class density estimation.

use crate::config::BinStrategy;
use tracing::debug;

/// Upper bound on the number of bins any strategy may produce.
pub const MAX_BINS: usize = 1_000;

/// Compute shared bin edges for a set of values.
///
/// Returns `bins + 1` ascending edges, or an empty vector when there are no
/// finite values. Infinite and NaN values are ignored. A constant column gets
/// one unit-wide bin centered on the value.
pub fn bin_edges(values: &[f64], strategy: BinStrategy) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return Vec::new();
    }

    sorted.sort_by(f64::total_cmp);

    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let (first, last) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };

    let bins = match strategy {
        BinStrategy::Fixed(n) => n.max(1),
        _ => {
            let width = bin_width(&sorted, strategy);
            if width > 0.0 {
                ((last - first) / width).ceil() as usize
            } else {
                1
            }
        }
    };
    let bins = bins.clamp(1, MAX_BINS);

    debug!(
        "Binning {} values over [{}, {}] into {} bins ({:?})",
        sorted.len(),
        first,
        last,
        bins,
        strategy
    );

    let step = (last - first) / bins as f64;
    (0..=bins)
        .map(|i| if i == bins { last } else { first + step * i as f64 })
        .collect()
}

/// Bin width chosen by a data-driven strategy over sorted values.
fn bin_width(sorted: &[f64], strategy: BinStrategy) -> f64 {
    let n = sorted.len() as f64;
    let range = sorted[sorted.len() - 1] - sorted[0];

    let sturges = range / (n.log2() + 1.0);
    let freedman_diaconis = {
        let iqr = percentile(sorted, 75.0) - percentile(sorted, 25.0);
        2.0 * iqr / n.cbrt()
    };

    match strategy {
        BinStrategy::Sturges => sturges,
        BinStrategy::FreedmanDiaconis => freedman_diaconis,
        // A zero IQR makes Freedman-Diaconis degenerate
        BinStrategy::Auto if freedman_diaconis > 0.0 => freedman_diaconis.min(sturges),
        BinStrategy::Auto => sturges,
        BinStrategy::Fixed(_) => 0.0,
    }
}

/// Percentile with linear interpolation between closest ranks.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

/// Count values per bin. The last bin is closed on the right; values outside
/// the edges, including infinities, are not counted.
pub fn bin_counts(values: &[f64], edges: &[f64]) -> Vec<usize> {
    if edges.len() < 2 {
        return Vec::new();
    }

    let bins = edges.len() - 1;
    let first = edges[0];
    let last = edges[bins];
    let mut counts = vec![0usize; bins];

    for &v in values {
        if !v.is_finite() || v < first || v > last {
            continue;
        }
        // partition_point finds the first edge greater than v
        let idx = edges.partition_point(|&e| e <= v).saturating_sub(1);
        counts[idx.min(bins - 1)] += 1;
    }

    counts
}

/// Density of each bin so that the histogram integrates to 1.
///
/// Every bin is zero when `values` is empty.
pub fn densities(values: &[f64], edges: &[f64]) -> Vec<f64> {
    let counts = bin_counts(values, edges);
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0.0; counts.len()];
    }

    counts
        .iter()
        .zip(edges.windows(2))
        .map(|(&count, edge)| count as f64 / (total as f64 * (edge[1] - edge[0])))
        .collect()
}
