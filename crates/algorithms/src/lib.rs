//! # gridscore algorithms
//!
//! The table stages of a gridscore run.
//!
//! ## Available Algorithm Categories
//!
//! - **region**: Selector-driven extraction of aligned layers into a table
//! - **transform**: Log/sqrt reshaping and z-score standardization
//! - **scatter**: Writing transformed columns back into rasters

pub mod region;
pub mod scatter;
pub mod transform;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::region::{
        extract_region, ExtractParams, Extraction, MissingnessDiagnostic, RegionSummary,
        TabularRow, Table,
    };
    pub use crate::scatter::{scatter, scatter_column};
    pub use crate::transform::{
        standardize, transform_columns, ColumnSpec, ColumnStats, ColumnTransform, Reshape,
        ReshapeShift, TransformOutput,
    };
    pub use gridscore_core::prelude::*;
}
