//! Errors raised while building or attaching a grid.
//!
//! Editing operations are total and never fail; only grid construction and
//! the switch to external memory can be rejected.

/// Errors for grid construction and attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Width or height is zero, or `width * height` overflows
    InvalidDimensions { width: usize, height: usize },
    /// External region cannot hold `element_offset + cell_count` elements
    RegionTooSmall { required: usize, available: usize },
    /// External byte region is not aligned for `f32` access
    MisalignedRegion,
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::InvalidDimensions { width, height } => {
                write!(f, "Invalid grid dimensions {width}x{height}: both must be positive")
            }
            GridError::RegionTooSmall {
                required,
                available,
            } => write!(
                f,
                "External region too small: need {required} elements, have {available}"
            ),
            GridError::MisalignedRegion => {
                write!(f, "External region is not aligned for f32 access")
            }
        }
    }
}

impl std::error::Error for GridError {}
