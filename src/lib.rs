//! Import of the Tennessee Eastman Process (TEP) benchmark data sets.
//!
//! The core consumes a folder of whitespace-delimited `dNN.dat` /
//! `dNN_te.dat` files and produces `ndarray` matrices oriented
//! variables × samples, optionally augmented with lagged samples.
//!
//! ```no_run
//! use tep_import::{import_tep_sets, TepDirectory};
//!
//! let dir = TepDirectory::open("./TE_process")?;
//! let (x, t0, t4, t5, t10) = import_tep_sets(&dir, 2)?.into_tuple();
//! assert_eq!(x.nrows(), 99);
//! # Ok::<(), tep_import::TepError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;

pub use config::TepConfig;
pub use data::availability::{
    scan_availability, Availability, DataAvailabilityChecker, FailOnUnavailable,
    WarnOnUnavailable,
};
pub use data::export::{convert_directory, write_matrix};
pub use data::lag::add_lagged_samples;
pub use data::loader::load_matrix;
pub use data::model::{DataSetId, RawIndex, Selection, SetEntry};
pub use data::select::{ImportOptions, TepDirectory};
pub use data::tep::{import_tep_sets, import_tep_sets_with, TepSets};
pub use error::{IndexError, Result, TepError};
