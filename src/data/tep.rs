//! The canonical TEP benchmark subset.
//!
//! Normal operation training and test data plus the IDV(4), IDV(5) and
//! IDV(10) test sets, restricted to the first 22 measured variables
//! (XMEAS 1–22) and the 11 manipulated variables (XMV 1–11), with lagged
//! samples appended.

use std::ops::Range;

use log::info;
use ndarray::{concatenate, s, Array2, Axis};

use super::lag::add_lagged_samples;
use super::model::{DataSetId, SetEntry};
use super::select::{ImportOptions, TepDirectory};
use crate::error::{Result, TepError};

/// Rows dropped before augmentation: XMEAS(23)–XMEAS(41), the sampled
/// composition analyser outputs.
pub const IGNORED_VARIABLES: Range<usize> = 22..41;

/// Variables left after trimming a full 52-variable TEP matrix.
pub const RETAINED_VARIABLE_COUNT: usize = 33;

/// Fault scenarios in the canonical test subset.
pub const CANONICAL_FAULTS: [u8; 3] = [4, 5, 10];

/// Default number of lagged samples.
pub const DEFAULT_LAGGED_SAMPLES: usize = 2;

/// The five matrices of the canonical benchmark, each variables × samples.
#[derive(Debug, Clone, PartialEq)]
pub struct TepSets {
    /// IDV(0) training set
    pub x: Array2<f64>,
    /// IDV(0) test set
    pub t0: Array2<f64>,
    pub t4: Array2<f64>,
    pub t5: Array2<f64>,
    pub t10: Array2<f64>,
}

impl TepSets {
    pub fn into_tuple(
        self,
    ) -> (
        Array2<f64>,
        Array2<f64>,
        Array2<f64>,
        Array2<f64>,
        Array2<f64>,
    ) {
        (self.x, self.t0, self.t4, self.t5, self.t10)
    }

    /// `(name, matrix)` pairs in canonical order.
    pub fn named(&self) -> [(&'static str, &Array2<f64>); 5] {
        [
            ("X", &self.x),
            ("T0", &self.t0),
            ("T4", &self.t4),
            ("T5", &self.t5),
            ("T10", &self.t10),
        ]
    }
}

/// Remove a contiguous block of variables (rows).
pub fn remove_variables(data: &Array2<f64>, rows: Range<usize>) -> Result<Array2<f64>> {
    let n_vars = data.nrows();
    if rows.end > n_vars {
        return Err(TepError::Shape(format!(
            "cannot drop variables {}..{} from a matrix with {n_vars} variables",
            rows.start, rows.end
        )));
    }
    let head = data.slice(s![..rows.start, ..]);
    let tail = data.slice(s![rows.end.., ..]);
    concatenate(Axis(0), &[head, tail]).map_err(|e| TepError::Shape(e.to_string()))
}

fn prepare(data: &Array2<f64>, lagged_samples: usize) -> Result<Array2<f64>> {
    let trimmed = remove_variables(data, IGNORED_VARIABLES)?;
    add_lagged_samples(&trimmed, lagged_samples)
}

fn take(matrix: Option<Array2<f64>>, what: &str) -> Result<Array2<f64>> {
    matrix.ok_or_else(|| TepError::InvalidArgument(format!("{what} was not imported")))
}

/// Import the canonical benchmark subset with `lagged_samples` lags.
///
/// Fails as a whole if any of the five files is missing, malformed or has
/// fewer than 41 variables.
pub fn import_tep_sets(dir: &TepDirectory, lagged_samples: usize) -> Result<TepSets> {
    import_tep_sets_with(dir, lagged_samples, true)
}

/// As [`import_tep_sets`], optionally skipping the availability scan.
pub fn import_tep_sets_with(
    dir: &TepDirectory,
    lagged_samples: usize,
    check_data_exists: bool,
) -> Result<TepSets> {
    let normal = ImportOptions {
        check_data_exists,
        ..ImportOptions::default()
    };
    let faults = ImportOptions {
        check_data_exists,
        ..ImportOptions::test_only()
    };

    let normal_operation = dir.import_sets(DataSetId::NORMAL.index(), normal)?;
    let testing_sets = dir.import_sets(CANONICAL_FAULTS, faults)?;

    let [SetEntry { training, test, .. }]: [SetEntry; 1] = normal_operation
        .try_into()
        .map_err(|_| TepError::InvalidArgument("expected one normal operation set".into()))?;
    let [t4, t5, t10]: [SetEntry; 3] = testing_sets
        .try_into()
        .map_err(|_| TepError::InvalidArgument("expected three fault test sets".into()))?;

    let sets = TepSets {
        x: prepare(&take(training, "IDV(0) training set")?, lagged_samples)?,
        t0: prepare(&take(test, "IDV(0) test set")?, lagged_samples)?,
        t4: prepare(&take(t4.test, "IDV(4) test set")?, lagged_samples)?,
        t5: prepare(&take(t5.test, "IDV(5) test set")?, lagged_samples)?,
        t10: prepare(&take(t10.test, "IDV(10) test set")?, lagged_samples)?,
    };

    info!(
        "assembled TEP sets with {lagged_samples} lagged samples: X {:?}, T0 {:?}, T4 {:?}, T5 {:?}, T10 {:?}",
        sets.x.dim(),
        sets.t0.dim(),
        sets.t4.dim(),
        sets.t5.dim(),
        sets.t10.dim()
    );
    Ok(sets)
}
