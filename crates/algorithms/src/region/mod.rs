//! Region of interest extraction
//!
//! - **table**: The extracted cell table
//! - **extract**: Selector-driven extraction with missingness diagnostics

mod extract;
mod table;

pub use extract::{extract_region, ExtractParams, Extraction, MissingnessDiagnostic, RegionSummary};
pub use table::{TabularRow, Table};
