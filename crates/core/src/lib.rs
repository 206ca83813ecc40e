//! # gridscore core
//!
//! Core types, traits and I/O for gridscore.
//!
//! This crate provides:
//! - `Raster<T>`: Generic raster grid type with an explicit missing-cell view
//! - `GeoTransform`: Lower-left anchored placement of a grid
//! - `io`: ESRI ASCII grid reading and writing
//! - `GridSet`: Named layers that must share one shape
//! - Algorithm trait for consistent API

pub mod error;
pub mod gridset;
pub mod io;
pub mod raster;

pub use error::{Error, Result};
pub use gridset::{GridSet, Layer, LayerData, LayerKind};
pub use raster::{GeoTransform, Raster, RasterElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::gridset::{GridSet, Layer, LayerData, LayerKind};
    pub use crate::raster::{GeoTransform, Raster, RasterElement};
    pub use crate::Algorithm;
}

/// Core trait for table and grid algorithms.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
