//! Named, co-registered layers
//!
//! A [`GridSet`] owns every layer of a run. Layers keep the cell type they
//! were read with; the rest of the pipeline sees them through the
//! `f64`-valued accessors on [`Layer`].

use crate::error::{Error, Result};
use crate::io::read_ascii_grid;
use crate::raster::Raster;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Cell type a layer is read as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Integer,
    #[default]
    Real,
}

/// Cell storage of one layer
#[derive(Debug, Clone, PartialEq)]
pub enum LayerData {
    Integer(Raster<i64>),
    Real(Raster<f64>),
}

/// One named raster layer
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    name: String,
    data: LayerData,
}

impl Layer {
    pub fn new(name: impl Into<String>, data: LayerData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn integer(name: impl Into<String>, raster: Raster<i64>) -> Self {
        Self::new(name, LayerData::Integer(raster))
    }

    pub fn real(name: impl Into<String>, raster: Raster<f64>) -> Self {
        Self::new(name, LayerData::Real(raster))
    }

    /// Read a layer from an ASCII grid file
    pub fn read(name: impl Into<String>, path: impl AsRef<Path>, kind: LayerKind) -> Result<Self> {
        let data = match kind {
            LayerKind::Integer => LayerData::Integer(read_ascii_grid(path)?),
            LayerKind::Real => LayerData::Real(read_ascii_grid(path)?),
        };
        Ok(Self::new(name, data))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &LayerData {
        &self.data
    }

    pub fn kind(&self) -> LayerKind {
        match self.data {
            LayerData::Integer(_) => LayerKind::Integer,
            LayerData::Real(_) => LayerKind::Real,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        match &self.data {
            LayerData::Integer(r) => r.shape(),
            LayerData::Real(r) => r.shape(),
        }
    }

    /// Cell value, `None` when the cell is no-data
    pub fn value(&self, row: usize, col: usize) -> Result<Option<f64>> {
        Ok(match &self.data {
            LayerData::Integer(r) => r.cell(row, col)?.map(|v| v as f64),
            LayerData::Real(r) => r.cell(row, col)?,
        })
    }

    /// Cell value as stored, sentinel included
    pub fn raw(&self, row: usize, col: usize) -> Result<f64> {
        Ok(match &self.data {
            LayerData::Integer(r) => r.get(row, col)? as f64,
            LayerData::Real(r) => r.get(row, col)?,
        })
    }

    /// Real-valued copy with the same header
    pub fn to_real(&self) -> Result<Raster<f64>> {
        match &self.data {
            LayerData::Integer(r) => r.cast(),
            LayerData::Real(r) => Ok(r.clone()),
        }
    }
}

/// An ordered collection of uniquely named layers
#[derive(Debug, Clone, Default)]
pub struct GridSet {
    layers: Vec<Layer>,
}

impl GridSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer. Names must be unique within the set.
    pub fn push(&mut self, layer: Layer) -> Result<()> {
        if self.layers.iter().any(|l| l.name == layer.name) {
            return Err(Error::DuplicateLayer(layer.name));
        }
        self.layers.push(layer);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Position of a layer in set order
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.layers
            .iter()
            .position(|l| l.name == name)
            .ok_or_else(|| Error::UnknownLayer(name.to_string()))
    }

    /// Shape shared by the set, taken from the first layer
    pub fn shape(&self) -> Option<(usize, usize)> {
        self.layers.first().map(Layer::shape)
    }

    /// Check that every layer has the same number of rows and columns.
    ///
    /// Must succeed before any cell-by-cell pass over the set. Failure
    /// names the first layer whose shape differs from the first layer's.
    pub fn validate(&self) -> Result<()> {
        let Some(reference) = self.layers.first() else {
            return Ok(());
        };
        let expected = reference.shape();

        for layer in &self.layers[1..] {
            let actual = layer.shape();
            if actual != expected {
                return Err(Error::Alignment {
                    reference: reference.name.clone(),
                    layer: layer.name.clone(),
                    expected,
                    actual,
                });
            }
        }

        debug!(
            layers = self.layers.len(),
            rows = expected.0,
            cols = expected.1,
            "layers aligned"
        );
        Ok(())
    }
}

impl<'a> IntoIterator for &'a GridSet {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}
