//! Column transforms
//!
//! - **reshape**: Monotonic log/sqrt reshaping with validated shifts
//! - **standardize**: Population z-scores over a collected column
//! - **pipeline**: Raw and normalized z-score variants of a whole table

mod pipeline;
mod reshape;
mod standardize;

pub use pipeline::{transform_columns, ColumnReport, ColumnSpec, ColumnTransform, TransformOutput};
pub use reshape::{Reshape, ReshapeShift};
pub use standardize::{standardize, ColumnStats};
