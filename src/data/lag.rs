//! Time-lag feature augmentation.

use ndarray::{concatenate, s, Array2, ArrayView2, Axis};

use crate::error::{Result, TepError};

/// Stack each sample with the `lagged_samples` samples preceding it.
///
/// For a variables × samples matrix `X = [x(1), …, x(n)]` with `m` variables
/// the result has `m * (d + 1)` rows and `n - d` columns, where column `j` is
///
/// ```text
/// [x(j + d); x(j + d - 1); …; x(j)]
/// ```
///
/// i.e. row block `k` holds the sample `k` steps before the most recent one.
/// This is the same as stacking `d` circularly shifted copies below `X` and
/// dropping the first `d` columns, which are the ones polluted by wrap-around.
///
/// `lagged_samples == 0` returns a copy of the input. When there are no more
/// samples than lags every column is dropped and the result has zero columns.
/// A lag whose row count `m * (d + 1)` cannot be allocated is a
/// [`TepError::Shape`].
pub fn add_lagged_samples(data: &Array2<f64>, lagged_samples: usize) -> Result<Array2<f64>> {
    let (n_vars, n_samples) = data.dim();
    let d = lagged_samples;

    let n_rows = d
        .checked_add(1)
        .and_then(|blocks| n_vars.checked_mul(blocks))
        .filter(|&rows| rows <= isize::MAX as usize)
        .ok_or_else(|| {
            TepError::Shape(format!(
                "{d} lagged samples of {n_vars} variables exceed the addressable row count"
            ))
        })?;

    if d >= n_samples {
        return Ok(Array2::zeros((n_rows, 0)));
    }

    let blocks: Vec<ArrayView2<f64>> = (0..=d)
        .map(|k| data.slice(s![.., d - k..n_samples - k]))
        .collect();

    concatenate(Axis(0), &blocks).map_err(|e| TepError::Shape(e.to_string()))
}
