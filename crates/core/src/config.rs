//! Session configuration

use crate::core_types::GridDims;
use crate::editor::SNAP_TOLERANCE;
use crate::error::GridError;
use crate::grid::RegionLayout;
use serde::{Deserialize, Serialize};

/// Configuration for a boundary editing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Grid columns
    pub width: usize,
    /// Grid rows
    pub height: usize,

    /// Scratch bytes the engine module needs after the field
    pub aux_bytes: usize,

    /// Snap distance for closing/ending polylines, in normalized units per
    /// axis
    pub snap_tolerance: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 160,
            height: 160,
            aux_bytes: 0,
            snap_tolerance: SNAP_TOLERANCE,
        }
    }
}

impl GridConfig {
    /// Validated grid dimensions.
    ///
    /// # Errors
    /// Returns `GridError::InvalidDimensions` if width or height is zero.
    pub fn dims(&self) -> Result<GridDims, GridError> {
        GridDims::new(self.width, self.height)
    }

    /// Memory layout the engine module must provide.
    ///
    /// # Errors
    /// Returns `GridError::InvalidDimensions` if width or height is zero.
    pub fn layout(&self) -> Result<RegionLayout, GridError> {
        Ok(RegionLayout::new(self.dims()?, self.aux_bytes))
    }
}
