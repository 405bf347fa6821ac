//! Shared scalar grid and the memory region it can be attached to

pub mod region;
pub mod shared_grid;

// Re-export main types
pub use region::{LinearMemory, RegionLayout, HEADER_ELEMENTS, PAGE_BYTES};
pub use shared_grid::SharedGrid;
