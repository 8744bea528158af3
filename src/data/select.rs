use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info};
use ndarray::Array2;

use super::availability::{scan_availability, DataAvailabilityChecker, WarnOnUnavailable};
use super::loader::load_matrix;
use super::model::{DataSetId, Selection, SetEntry};
use crate::error::{Result, TepError};

// ---------------------------------------------------------------------------
// Import options
// ---------------------------------------------------------------------------

/// Flags for [`TepDirectory::import_sets`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Scan for the canonical files first and consult the availability checker.
    pub check_data_exists: bool,
    pub skip_training: bool,
    pub skip_test: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            check_data_exists: true,
            skip_training: false,
            skip_test: false,
        }
    }
}

impl ImportOptions {
    pub fn test_only() -> Self {
        Self {
            skip_training: true,
            ..Self::default()
        }
    }

    pub fn training_only() -> Self {
        Self {
            skip_test: true,
            ..Self::default()
        }
    }

    pub fn unchecked(mut self) -> Self {
        self.check_data_exists = false;
        self
    }
}

// ---------------------------------------------------------------------------
// TepDirectory – a validated data set folder
// ---------------------------------------------------------------------------

/// A folder holding `dNN.dat` / `dNN_te.dat` files, plus the hook invoked
/// when files are found missing.
pub struct TepDirectory {
    path: PathBuf,
    checker: Box<dyn DataAvailabilityChecker>,
}

impl fmt::Debug for TepDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TepDirectory").field("path", &self.path).finish()
    }
}

impl TepDirectory {
    /// Resolve `path` to an absolute path and require it to be a directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let abs = std::path::absolute(path.as_ref())?;
        if !abs.is_dir() {
            return Err(TepError::InvalidDirectory { path: abs });
        }
        Ok(Self::unchecked(abs))
    }

    /// Wrap a path without checking it exists. Useful when the folder is
    /// going to be populated by the availability checker.
    pub fn unchecked(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            checker: Box::new(WarnOnUnavailable),
        }
    }

    pub fn with_checker(mut self, checker: impl DataAvailabilityChecker + 'static) -> Self {
        self.checker = Box::new(checker);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load a single file from this folder by name.
    pub fn import_data_set(&self, file_name: &str) -> Result<Array2<f64>> {
        load_matrix(&self.path.join(file_name))
    }

    pub fn training_set(&self, id: DataSetId) -> Result<Array2<f64>> {
        self.import_data_set(&id.training_file_name())
    }

    pub fn test_set(&self, id: DataSetId) -> Result<Array2<f64>> {
        self.import_data_set(&id.test_file_name())
    }

    /// Run the availability scan and hand any shortfall to the checker.
    pub fn ensure_available(&self) -> Result<()> {
        let availability = scan_availability(&self.path);
        if availability.is_complete() {
            Ok(())
        } else {
            self.checker.on_unavailable(&availability)
        }
    }

    /// Import the selected data sets, one entry per index in the given order.
    ///
    /// Every index is validated before anything is read. With both
    /// `skip_training` and `skip_test` set only labels are returned.
    pub fn import_sets(
        &self,
        sets: impl Into<Selection>,
        options: ImportOptions,
    ) -> Result<Vec<SetEntry>> {
        let ids = sets.into().validate()?;

        if options.check_data_exists {
            self.ensure_available()?;
        }

        info!(
            "importing {} data set(s) from {}",
            ids.len(),
            self.path.display()
        );

        ids.into_iter()
            .map(|id| {
                let mut entry = SetEntry::new(id);
                if !options.skip_training {
                    entry.training = Some(self.training_set(id)?);
                }
                if !options.skip_test {
                    entry.test = Some(self.test_set(id)?);
                }
                debug!("imported {}", entry.label);
                Ok(entry)
            })
            .collect()
    }
}
