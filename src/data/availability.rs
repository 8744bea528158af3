use std::fmt;
use std::path::{Path, PathBuf};

use log::warn;

use super::model::DataSetId;
use crate::error::{Result, TepError};

/// Outcome of scanning a data directory for the 44 canonical files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Complete,
    MissingDirectory(PathBuf),
    /// File names in canonical order: all training files, then all test files.
    MissingFiles(Vec<String>),
}

impl Availability {
    pub fn is_complete(&self) -> bool {
        matches!(self, Availability::Complete)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Complete => write!(f, "all data sets present"),
            Availability::MissingDirectory(p) => {
                write!(f, "no data set folder at '{}'", p.display())
            }
            Availability::MissingFiles(names) => {
                write!(f, "missing data sets: {}", names.join(", "))
            }
        }
    }
}

/// Every training and test file name, `d00.dat` … `d21.dat` then
/// `d00_te.dat` … `d21_te.dat`.
pub fn canonical_file_names() -> Vec<String> {
    DataSetId::all()
        .map(DataSetId::training_file_name)
        .chain(DataSetId::all().map(DataSetId::test_file_name))
        .collect()
}

pub fn scan_availability(dir: &Path) -> Availability {
    if !dir.is_dir() {
        return Availability::MissingDirectory(dir.to_path_buf());
    }
    let missing: Vec<String> = canonical_file_names()
        .into_iter()
        .filter(|name| !dir.join(name).is_file())
        .collect();
    if missing.is_empty() {
        Availability::Complete
    } else {
        Availability::MissingFiles(missing)
    }
}

// ---------------------------------------------------------------------------
// Checker hook
// ---------------------------------------------------------------------------

/// Decides what happens when data is found missing before an import.
///
/// Implementations may trigger acquisition (download, extraction, format
/// conversion) and return `Ok` to let the import proceed, or refuse with an
/// error. The import itself never prompts or touches the network.
pub trait DataAvailabilityChecker {
    fn on_unavailable(&self, availability: &Availability) -> Result<()>;
}

/// Log a warning and carry on; loading then fails on the first absent file.
#[derive(Debug, Default, Clone, Copy)]
pub struct WarnOnUnavailable;

impl DataAvailabilityChecker for WarnOnUnavailable {
    fn on_unavailable(&self, availability: &Availability) -> Result<()> {
        warn!("{availability}");
        Ok(())
    }
}

/// Refuse to import anything unless every canonical file is present.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailOnUnavailable;

impl DataAvailabilityChecker for FailOnUnavailable {
    fn on_unavailable(&self, availability: &Availability) -> Result<()> {
        Err(TepError::DataUnavailable(availability.to_string()))
    }
}

impl<F> DataAvailabilityChecker for F
where
    F: Fn(&Availability) -> Result<()>,
{
    fn on_unavailable(&self, availability: &Availability) -> Result<()> {
        self(availability)
    }
}
