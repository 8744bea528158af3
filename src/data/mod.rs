//! Data layer: TEP data set loading, selection and lag augmentation.
//!
//! Architecture:
//! ```text
//!  TE_process/dNN.dat, dNN_te.dat
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ availability │  scan for the 44 files → checker hook
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Array2 (variables × samples)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  select   │  indices → Vec<SetEntry> labelled IDV(n)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │   tep    │  trim variables, add lagged samples → TepSets
//!   └──────────┘
//! ```
//!
//! `export` writes matrices back out and converts alternate formats into
//! the `.dat` layout.

pub mod availability;
pub mod export;
pub mod lag;
pub mod loader;
pub mod model;
pub mod select;
pub mod tep;
