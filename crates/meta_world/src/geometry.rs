//! Grid geometry for block elevations.
//!
//! Block names follow the 3-character column + 2-character layer
//! convention: block `"ab 12"` is column `"ab "` in layer `"12"`.

use anyhow::{Context, Result};
use meta_core::tree::Geometry;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const COLUMN_NAME_LEN: usize = 3;
const LAYER_NAME_LEN: usize = 2;

#[derive(Debug, Clone, Deserialize)]
pub struct LayerDef {
    pub name: String,
    /// Elevation of the layer centre.
    pub centre: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    /// Horizontal (x, y) centre.
    pub centre: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct GeometryFile {
    layers: Vec<LayerDef>,
    columns: Vec<ColumnDef>,
}

#[derive(Debug, Clone, Default)]
pub struct GridGeometry {
    layers: HashMap<String, f64>,
    columns: HashMap<String, [f64; 2]>,
}

impl GridGeometry {
    pub fn new(layers: Vec<LayerDef>, columns: Vec<ColumnDef>) -> Self {
        Self {
            layers: layers.into_iter().map(|l| (l.name, l.centre)).collect(),
            columns: columns.into_iter().map(|c| (c.name, c.centre)).collect(),
        }
    }

    pub fn column_name(block: &str) -> &str {
        block.get(..COLUMN_NAME_LEN).unwrap_or(block)
    }

    pub fn layer_name(block: &str) -> &str {
        block
            .get(COLUMN_NAME_LEN..COLUMN_NAME_LEN + LAYER_NAME_LEN)
            .unwrap_or("")
    }

    /// (x, y, z) centre of a block, if both its layer and column are known.
    pub fn block_centre(&self, layer: &str, column: &str) -> Option<[f64; 3]> {
        let z = self.layers.get(layer)?;
        let [x, y] = self.columns.get(column)?;
        Some([*x, *y, *z])
    }
}

impl Geometry for GridGeometry {
    fn elevation(&self, block: &str) -> Option<f64> {
        self.block_centre(Self::layer_name(block), Self::column_name(block))
            .map(|[_, _, z]| z)
    }
}

pub fn load_geometry(path: &Path) -> Result<GridGeometry> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading geometry file: {}", path.display()))?;
    let file: GeometryFile = serde_json::from_str(&json)
        .with_context(|| format!("parsing geometry file: {}", path.display()))?;
    Ok(GridGeometry::new(file.layers, file.columns))
}
