use std::fmt;
use std::ops::{Range, RangeInclusive};

use ndarray::Array2;
use serde_json::Value as JsonValue;

use crate::error::{IndexError, Result, TepError};

/// Number of data sets shipped with the TEP benchmark (`d00` … `d21`).
pub const SET_COUNT: u8 = 22;

// ---------------------------------------------------------------------------
// DataSetId – a validated index in 0..=21
// ---------------------------------------------------------------------------

/// Index of one TEP data set. `0` is normal operation, `1..=20` are the IDV
/// fault scenarios and `21` is the extra set shipped with the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DataSetId(u8);

impl DataSetId {
    pub const NORMAL: DataSetId = DataSetId(0);

    pub fn new(index: i64) -> Result<Self> {
        if (0..SET_COUNT as i64).contains(&index) {
            Ok(DataSetId(index as u8))
        } else {
            Err(IndexError::OutOfRange(index).into())
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Every data set id in ascending order.
    pub fn all() -> impl Iterator<Item = DataSetId> {
        (0..SET_COUNT).map(DataSetId)
    }

    /// Training file stem, e.g. `d04`.
    pub fn training_stem(self) -> String {
        format!("d{:02}", self.0)
    }

    /// Test file stem, e.g. `d04_te`.
    pub fn test_stem(self) -> String {
        format!("d{:02}_te", self.0)
    }

    pub fn training_file_name(self) -> String {
        format!("{}.dat", self.training_stem())
    }

    pub fn test_file_name(self) -> String {
        format!("{}.dat", self.test_stem())
    }

    /// Human readable label, `IDV(n)`.
    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DataSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IDV({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// RawIndex / Selection – index arguments before validation
// ---------------------------------------------------------------------------

/// A caller supplied index that has not been validated yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawIndex {
    Integer(i64),
    Float(f64),
}

impl RawIndex {
    /// The integer check runs before the range check.
    pub fn validate(self) -> Result<DataSetId> {
        match self {
            RawIndex::Float(v) => Err(IndexError::NotInteger(v).into()),
            RawIndex::Integer(i) => DataSetId::new(i),
        }
    }

    fn from_json(val: &JsonValue) -> Result<Self> {
        match val {
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(RawIndex::Integer(i))
                } else if let Some(u) = n.as_u64() {
                    // Above i64::MAX, certainly out of range.
                    Ok(RawIndex::Integer(i64::try_from(u).unwrap_or(i64::MAX)))
                } else {
                    Ok(RawIndex::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            other => Err(TepError::InvalidArgument(format!(
                "expected a numeric index, got {other}"
            ))),
        }
    }
}

macro_rules! raw_index_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for RawIndex {
            fn from(v: $t) -> Self {
                RawIndex::Integer(i64::try_from(v).unwrap_or(i64::MAX))
            }
        })*
    };
}

raw_index_from_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl From<f64> for RawIndex {
    fn from(v: f64) -> Self {
        RawIndex::Float(v)
    }
}

impl From<f32> for RawIndex {
    fn from(v: f32) -> Self {
        RawIndex::Float(v as f64)
    }
}

/// The set of data sets to import: either one index or an ordered sequence.
///
/// Order is preserved and duplicates are kept.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    One(RawIndex),
    Many(Vec<RawIndex>),
}

impl Selection {
    /// All 22 data sets, `IDV(0)` to `IDV(21)`.
    pub fn all() -> Self {
        Selection::from(0..SET_COUNT as usize)
    }

    /// Resolve an untyped argument (e.g. from a JSON config file).
    pub fn from_json(val: &JsonValue) -> Result<Self> {
        match val {
            JsonValue::Number(_) => Ok(Selection::One(RawIndex::from_json(val)?)),
            JsonValue::Array(items) => items
                .iter()
                .map(RawIndex::from_json)
                .collect::<Result<Vec<_>>>()
                .map(Selection::Many),
            other => Err(TepError::InvalidArgument(format!(
                "expected an index or a sequence of indices, got {other}"
            ))),
        }
    }

    pub fn raw_indices(&self) -> &[RawIndex] {
        match self {
            Selection::One(i) => std::slice::from_ref(i),
            Selection::Many(v) => v,
        }
    }

    /// Validate every element in order, stopping at the first bad one.
    pub fn validate(&self) -> Result<Vec<DataSetId>> {
        self.raw_indices().iter().map(|i| i.validate()).collect()
    }
}

impl Default for Selection {
    fn default() -> Self {
        Selection::all()
    }
}

macro_rules! selection_from_scalar {
    ($($t:ty),*) => {
        $(impl From<$t> for Selection {
            fn from(v: $t) -> Self {
                Selection::One(v.into())
            }
        })*
    };
}

selection_from_scalar!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64, RawIndex);

impl<T: Into<RawIndex>> From<Vec<T>> for Selection {
    fn from(v: Vec<T>) -> Self {
        Selection::Many(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RawIndex> + Copy> From<&[T]> for Selection {
    fn from(v: &[T]) -> Self {
        Selection::Many(v.iter().map(|&x| x.into()).collect())
    }
}

impl<T: Into<RawIndex>, const N: usize> From<[T; N]> for Selection {
    fn from(v: [T; N]) -> Self {
        Selection::Many(v.into_iter().map(Into::into).collect())
    }
}

impl From<Range<usize>> for Selection {
    fn from(r: Range<usize>) -> Self {
        Selection::Many(r.map(RawIndex::from).collect())
    }
}

impl From<RangeInclusive<usize>> for Selection {
    fn from(r: RangeInclusive<usize>) -> Self {
        Selection::Many(r.map(RawIndex::from).collect())
    }
}

impl FromIterator<DataSetId> for Selection {
    fn from_iter<I: IntoIterator<Item = DataSetId>>(iter: I) -> Self {
        Selection::Many(
            iter.into_iter()
                .map(|id| RawIndex::Integer(id.index() as i64))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// SetEntry – one imported data set
// ---------------------------------------------------------------------------

/// One entry of an import: the label plus whichever matrices were requested.
/// Matrices are variables × samples.
#[derive(Debug, Clone)]
pub struct SetEntry {
    pub id: DataSetId,
    /// `IDV(n)`.
    pub label: String,
    pub training: Option<Array2<f64>>,
    pub test: Option<Array2<f64>>,
}

impl SetEntry {
    pub fn new(id: DataSetId) -> Self {
        SetEntry {
            id,
            label: id.label(),
            training: None,
            test: None,
        }
    }
}
