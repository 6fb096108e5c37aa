//! Equal-width binning for the distribution plots.

/// Counts of values falling into `bins` equal-width intervals.
///
/// Every bin is half-open `[lo, hi)` except the last, which also includes
/// the upper edge so the maximum value is counted.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bin the finite entries of `values` over their observed range.
    ///
    /// A constant series is binned over `[v - 0.5, v + 0.5]`; a series with
    /// no finite values over `[0, 1]` with all counts zero. `bins` is at
    /// least one.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let finite = values.iter().copied().filter(|v| v.is_finite());

        let (lo, hi) = finite
            .clone()
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .map_or((0.0, 1.0), |(lo, hi)| {
                if lo < hi { (lo, hi) } else { (lo - 0.5, hi + 0.5) }
            });

        let mut counts = vec![0_u64; bins];
        let width = (hi - lo) / bins as f64;
        for v in finite {
            let slot = (((v - lo) / width) as usize).min(bins - 1);
            counts[slot] += 1;
        }

        Self {
            min: lo,
            max: hi,
            counts,
        }
    }

    /// Number of bins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Width of a single bin.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.counts.len() as f64
    }

    /// `[lo, hi]` edges of bin `i`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bin_range(&self, i: usize) -> (f64, f64) {
        let w = self.bin_width();
        (w.mul_add(i as f64, self.min), w.mul_add((i + 1) as f64, self.min))
    }

    /// Largest bin count (0 for an all-empty histogram).
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Total number of binned values.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}
