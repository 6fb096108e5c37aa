//! Pearson correlation between centrality measures.

use serde::{Serialize, Serializer, ser::SerializeMap};
use tracing::instrument;

use crate::metrics::{CentralityTable, Measure};

/// Pairwise statistic over two equally long series.
pub trait StatisticsEngine {
    /// Linear correlation of `x` and `y`.
    ///
    /// Returns NaN when the coefficient is undefined (fewer than two usable
    /// pairs, or zero variance in either series).
    fn pearson(&self, x: &[f64], y: &[f64]) -> f64;
}

/// Two-pass Pearson correlation.
///
/// Pairs where either value is non-finite are skipped before the means are
/// taken.
#[derive(Debug, Clone, Copy, Default)]
pub struct PearsonEngine;

impl StatisticsEngine for PearsonEngine {
    #[allow(clippy::cast_precision_loss)]
    fn pearson(&self, x: &[f64], y: &[f64]) -> f64 {
        let pairs: Vec<(f64, f64)> = x
            .iter()
            .zip(y)
            .filter(|(a, b)| a.is_finite() && b.is_finite())
            .map(|(&a, &b)| (a, b))
            .collect();

        if pairs.len() < 2 {
            return f64::NAN;
        }

        let n = pairs.len() as f64;
        let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
        let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

        let (mut cov, mut var_x, mut var_y) = (0.0_f64, 0.0_f64, 0.0_f64);
        for (a, b) in &pairs {
            let dx = a - mean_x;
            let dy = b - mean_y;
            cov = dx.mul_add(dy, cov);
            var_x = dx.mul_add(dx, var_x);
            var_y = dy.mul_add(dy, var_y);
        }

        if var_x <= 0.0 || var_y <= 0.0 {
            return f64::NAN;
        }

        (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
    }
}

/// Symmetric 3×3 correlation matrix indexed by [`Measure`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationMatrix {
    values: [[f64; 3]; 3],
}

impl CorrelationMatrix {
    /// Coefficient between two measures. Always 1.0 on the diagonal.
    #[must_use]
    pub const fn get(&self, a: Measure, b: Measure) -> f64 {
        self.values[a.index()][b.index()]
    }

    /// Rows in [`Measure::ALL`] order.
    #[must_use]
    pub const fn rows(&self) -> &[[f64; 3]; 3] {
        &self.values
    }
}

impl Serialize for CorrelationMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Measure::ALL.len()))?;
        for a in Measure::ALL {
            let row: Vec<Option<f64>> = Measure::ALL
                .iter()
                .map(|&b| Some(self.get(a, b)).filter(|v| v.is_finite()))
                .collect();
            map.serialize_entry(a.name(), &row)?;
        }
        map.end()
    }
}

/// Correlate every pair of columns in `table`.
#[must_use]
#[instrument(skip_all, fields(rows = table.len()))]
pub fn correlation_matrix(
    table: &CentralityTable,
    engine: &dyn StatisticsEngine,
) -> CorrelationMatrix {
    let mut values = [[1.0_f64; 3]; 3];
    for (i, a) in Measure::ALL.iter().enumerate() {
        for (j, b) in Measure::ALL.iter().enumerate().skip(i + 1) {
            let r = engine.pearson(table.column(*a), table.column(*b));
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    CorrelationMatrix { values }
}
