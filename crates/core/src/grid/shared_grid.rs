//! Fixed-size scalar field that can move onto externally owned memory.
//!
//! A grid starts *detached*: it owns a zeroed `Vec<f32>`. Once the engine's
//! memory is available the grid is *attached*: its current contents are
//! copied into a caller-supplied region and every later read and write goes
//! through a non-owning view of that region. The engine writes the same
//! region directly, so the next read sees its boundary cells without any
//! copy back.

use crate::core_types::{CellRect, GridDims};
use crate::error::GridError;
use std::ptr::{self, NonNull};
use std::slice;
use tracing::{debug, info};

/// Backing storage of the field
#[derive(Debug)]
enum FieldStorage {
    /// Owned, zero-initialized storage
    Detached(Vec<f32>),
    /// View over memory owned by the caller
    Attached(ExternalView),
}

/// Non-owning pointer to `len` contiguous `f32` values.
#[derive(Debug, Clone, Copy)]
struct ExternalView {
    base: NonNull<f32>,
    len: usize,
}

impl ExternalView {
    fn as_slice(&self) -> &[f32] {
        // SAFETY: `attach` requires the region to stay valid for the grid's
        // lifetime and checked that it covers `len` elements from `base`.
        unsafe { slice::from_raw_parts(self.base.as_ptr(), self.len) }
    }

    fn as_mut_slice(&mut self) -> &mut [f32] {
        // SAFETY: as above; `&mut self` keeps the grid from handing out a
        // second slice while this one lives.
        unsafe { slice::from_raw_parts_mut(self.base.as_ptr(), self.len) }
    }
}

/// 2D `f32` field shared with an external engine.
///
/// Attached grids hold a raw pointer and are therefore neither `Send` nor
/// `Sync`: the region is also written by the engine, and only strict
/// alternation on one thread keeps those writes from racing with ours.
#[derive(Debug)]
pub struct SharedGrid {
    dims: GridDims,
    storage: FieldStorage,
}

impl SharedGrid {
    /// Create a detached grid with every cell set to `0.0`
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            storage: FieldStorage::Detached(vec![0.0; dims.cell_count()]),
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn width(&self) -> usize {
        self.dims.width()
    }

    pub fn height(&self) -> usize {
        self.dims.height()
    }

    /// True once the field lives in external memory
    pub fn is_attached(&self) -> bool {
        matches!(self.storage, FieldStorage::Attached(_))
    }

    /// Row-major view of the whole field
    pub fn as_slice(&self) -> &[f32] {
        match &self.storage {
            FieldStorage::Detached(buffer) => buffer,
            FieldStorage::Attached(view) => view.as_slice(),
        }
    }

    /// Mutable row-major view of the whole field
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        match &mut self.storage {
            FieldStorage::Detached(buffer) => buffer,
            FieldStorage::Attached(view) => view.as_mut_slice(),
        }
    }

    /// Pointer to the first cell, for hosts that read the field in place
    pub fn field_ptr(&self) -> *const f32 {
        self.as_slice().as_ptr()
    }

    /// Value of cell `(row, col)`.
    ///
    /// Panics if `row >= height` or `col >= width`.
    pub fn value_at(&self, row: usize, col: usize) -> f32 {
        self.as_slice()[self.dims.index(row, col)]
    }

    /// Overwrite cell `(row, col)`.
    ///
    /// Panics if `row >= height` or `col >= width`.
    pub fn set_value_at(&mut self, row: usize, col: usize, value: f32) {
        let index = self.dims.index(row, col);
        self.as_mut_slice()[index] = value;
    }

    /// Value of cell `(row, col)`, or `None` when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.dims
            .checked_index(row, col)
            .map(|index| self.as_slice()[index])
    }

    /// Normalized-space rectangle covered by cell `(row, col)`
    pub fn cell_rect(&self, row: usize, col: usize) -> CellRect {
        self.dims.cell_rect(row, col)
    }

    /// Cell `(row, col)` under a normalized point
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        self.dims.cell_at(x, y)
    }

    /// Move the field onto external memory.
    ///
    /// The view starts `element_offset` elements into `region` and spans
    /// `width * height` elements. The current contents are copied into the
    /// view, the owned buffer (if any) is dropped, and all later access goes
    /// through the view. Attaching an already attached grid re-seeds the new
    /// view from the old one; overlapping views are handled.
    ///
    /// # Errors
    /// Returns `GridError::RegionTooSmall` if `region_len` cannot hold
    /// `element_offset + width * height` elements. Nothing is written in
    /// that case and the grid keeps its current storage.
    ///
    /// # Safety
    /// - `region` must be valid for reads and writes of `region_len` `f32`
    ///   values.
    /// - The region must stay allocated, and must not move, for the rest of
    ///   this grid's lifetime. The grid never frees it.
    /// - No Rust reference to the viewed elements may be alive while the
    ///   grid reads or writes them.
    pub unsafe fn attach(
        &mut self,
        region: NonNull<f32>,
        region_len: usize,
        element_offset: usize,
    ) -> Result<(), GridError> {
        let count = self.dims.cell_count();
        let required = element_offset
            .checked_add(count)
            .ok_or(GridError::RegionTooSmall {
                required: usize::MAX,
                available: region_len,
            })?;
        if region_len < required {
            return Err(GridError::RegionTooSmall {
                required,
                available: region_len,
            });
        }

        // SAFETY: `element_offset + count <= region_len`, so the offset
        // pointer and the `count` elements after it are inside the region.
        let view = unsafe {
            let base = NonNull::new_unchecked(region.as_ptr().add(element_offset));
            ptr::copy(self.as_slice().as_ptr(), base.as_ptr(), count);
            ExternalView { base, len: count }
        };

        debug!(
            was_attached = self.is_attached(),
            "Seeded external view with current field"
        );
        self.storage = FieldStorage::Attached(view);

        info!(
            width = self.dims.width(),
            height = self.dims.height(),
            element_offset,
            region_len,
            "Grid attached to external memory"
        );
        Ok(())
    }

    /// Byte-region variant of [`SharedGrid::attach`].
    ///
    /// Hosts usually hand out linear memory as bytes. Trailing bytes that do
    /// not make up a whole `f32` are ignored; `element_offset` is still
    /// measured in `f32` elements.
    ///
    /// # Errors
    /// Returns `GridError::MisalignedRegion` if `region` is not aligned for
    /// `f32`, and `GridError::RegionTooSmall` as for `attach`.
    ///
    /// # Safety
    /// Same contract as [`SharedGrid::attach`], with `byte_len` bytes valid
    /// at `region`.
    pub unsafe fn attach_bytes(
        &mut self,
        region: NonNull<u8>,
        byte_len: usize,
        element_offset: usize,
    ) -> Result<(), GridError> {
        let usable = byte_len - byte_len % std::mem::size_of::<f32>();
        // SAFETY: caller guarantees `byte_len` readable/writable bytes.
        let bytes = unsafe { slice::from_raw_parts_mut(region.as_ptr(), usable) };
        let elements: &mut [f32] =
            bytemuck::try_cast_slice_mut(bytes).map_err(|_| GridError::MisalignedRegion)?;

        let len = elements.len();
        let base = NonNull::from(elements).cast::<f32>();
        // SAFETY: `base` covers `len` elements of the caller's region.
        unsafe { self.attach(base, len, element_offset) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: usize, height: usize) -> SharedGrid {
        SharedGrid::new(GridDims::new(width, height).unwrap())
    }

    #[test]
    fn test_new_grid_is_zeroed_and_detached() {
        let grid = grid(4, 2);
        assert!(!grid.is_attached());
        assert_eq!(grid.as_slice().len(), 8);
        assert!(grid.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_round_trip_detached() {
        let mut grid = grid(4, 2);
        grid.set_value_at(1, 3, 0.75);
        assert_eq!(grid.value_at(1, 3), 0.75);
        assert_eq!(grid.as_slice()[7], 0.75);
    }

    #[test]
    fn test_attach_seeds_region() {
        let mut grid = grid(4, 2);
        grid.set_value_at(0, 0, 1.0);

        let mut region = vec![0.0_f32; 9];
        let base = NonNull::new(region.as_mut_ptr()).unwrap();
        unsafe { grid.attach(base, region.len(), 1).unwrap() };

        assert!(grid.is_attached());
        assert_eq!(grid.value_at(0, 0), 1.0);
        for row in 0..2 {
            for col in 0..4 {
                if (row, col) != (0, 0) {
                    assert_eq!(grid.value_at(row, col), 0.0);
                }
            }
        }
        drop(grid);
        assert_eq!(region[0], 0.0, "header element untouched");
        assert_eq!(region[1], 1.0);
    }

    #[test]
    fn test_writes_after_attach_reach_region() {
        let mut region = vec![0.0_f32; 16];
        let base = NonNull::new(region.as_mut_ptr()).unwrap();
        let mut grid = grid(4, 2);
        unsafe { grid.attach(base, region.len(), 2).unwrap() };

        grid.set_value_at(1, 1, 3.5);
        assert_eq!(grid.value_at(1, 1), 3.5);
        assert_eq!(grid.get(1, 1), Some(3.5));
        drop(grid);
        assert_eq!(region[2 + 5], 3.5);
    }

    #[test]
    fn test_region_too_small_keeps_storage() {
        let mut grid = grid(4, 2);
        grid.set_value_at(0, 1, 2.0);

        let mut region = vec![9.0_f32; 8];
        let base = NonNull::new(region.as_mut_ptr()).unwrap();
        let result = unsafe { grid.attach(base, region.len(), 1) };

        assert_eq!(
            result,
            Err(GridError::RegionTooSmall {
                required: 9,
                available: 8
            })
        );
        assert!(!grid.is_attached());
        assert_eq!(grid.value_at(0, 1), 2.0);
        assert!(region.iter().all(|&v| v == 9.0));
    }

    #[test]
    fn test_reattach_reseeds_from_current_view() {
        let mut region = vec![0.0_f32; 32];
        let base = NonNull::new(region.as_mut_ptr()).unwrap();
        let mut grid = grid(4, 2);
        unsafe { grid.attach(base, region.len(), 1).unwrap() };
        grid.set_value_at(1, 2, 4.0);

        // Overlapping move: new view starts 3 elements later
        unsafe { grid.attach(base, region.len(), 4).unwrap() };
        assert_eq!(grid.value_at(1, 2), 4.0);
        assert_eq!(grid.as_slice().iter().filter(|&&v| v != 0.0).count(), 1);
    }

    #[test]
    fn test_attach_bytes_rejects_misaligned() {
        let mut words = vec![0.0_f32; 16];
        let bytes = NonNull::new(words.as_mut_ptr().cast::<u8>()).unwrap();
        let mut grid = grid(2, 2);

        // One byte in is never 4-aligned
        let shifted = unsafe { NonNull::new_unchecked(bytes.as_ptr().add(1)) };
        let result = unsafe { grid.attach_bytes(shifted, 60, 0) };
        assert_eq!(result, Err(GridError::MisalignedRegion));
        assert!(!grid.is_attached());
    }

    #[test]
    fn test_attach_bytes_ignores_trailing_partial_word() {
        let mut words = vec![0.0_f32; 5];
        let bytes = NonNull::new(words.as_mut_ptr().cast::<u8>()).unwrap();
        let mut grid = grid(2, 2);
        grid.set_value_at(1, 1, 6.0);

        // 18 bytes = 4 whole elements + 2 stray bytes
        let result = unsafe { grid.attach_bytes(bytes, 18, 0) };
        assert!(result.is_ok());
        assert_eq!(grid.value_at(1, 1), 6.0);

        let result = unsafe { grid.attach_bytes(bytes, 18, 1) };
        assert_eq!(
            result,
            Err(GridError::RegionTooSmall {
                required: 5,
                available: 4
            })
        );
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_bounds_read_panics() {
        let grid = grid(4, 2);
        let _ = grid.value_at(2, 0);
    }

    #[test]
    fn test_get_out_of_bounds_is_none() {
        let grid = grid(4, 2);
        assert_eq!(grid.get(0, 4), None);
        assert_eq!(grid.get(2, 0), None);
    }
}
