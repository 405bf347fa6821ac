//! Layout of the engine's linear memory and a host-side stand-in for it.
//!
//! The engine module is instantiated with one linear memory holding a small
//! header, the grid field, and whatever scratch space the module asks for.
//! Memory is sized in whole 64 KiB pages.

use crate::core_types::GridDims;
use std::ptr::NonNull;

/// Size of one linear-memory page in bytes
pub const PAGE_BYTES: usize = 65_536;

/// Elements reserved in front of the field
pub const HEADER_ELEMENTS: usize = 1;

const ELEMENT_BYTES: usize = std::mem::size_of::<f32>();

/// Where the grid field sits inside the engine's memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionLayout {
    dims: GridDims,
    aux_bytes: usize,
}

impl RegionLayout {
    /// Layout for a grid plus `aux_bytes` of engine scratch space
    pub fn new(dims: GridDims, aux_bytes: usize) -> Self {
        Self { dims, aux_bytes }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Offset of the first field element, in elements
    pub fn element_offset(&self) -> usize {
        HEADER_ELEMENTS
    }

    /// Number of field elements (`width * height`)
    pub fn element_count(&self) -> usize {
        self.dims.cell_count()
    }

    pub fn aux_bytes(&self) -> usize {
        self.aux_bytes
    }

    /// Bytes needed for header, field and scratch space
    pub fn required_bytes(&self) -> usize {
        (self.element_offset() + self.element_count()) * ELEMENT_BYTES + self.aux_bytes
    }

    /// Whole pages needed to hold [`RegionLayout::required_bytes`]
    pub fn required_pages(&self) -> usize {
        self.required_bytes().div_ceil(PAGE_BYTES)
    }

    /// Bytes actually provisioned once rounded up to pages
    pub fn page_bytes(&self) -> usize {
        self.required_pages() * PAGE_BYTES
    }
}

/// Zeroed, `f32`-aligned memory block standing in for engine memory.
///
/// Owns its allocation and frees it on drop. Grids and engines given its
/// [`LinearMemory::base`] pointer must not outlive it.
#[derive(Debug)]
pub struct LinearMemory {
    words: NonNull<[f32]>,
}

impl LinearMemory {
    /// Allocate `len` zeroed elements
    pub fn with_len(len: usize) -> Self {
        let boxed: Box<[f32]> = vec![0.0; len].into_boxed_slice();
        Self {
            words: NonNull::from(Box::leak(boxed)),
        }
    }

    /// Allocate enough whole pages for `layout`
    pub fn for_layout(layout: &RegionLayout) -> Self {
        Self::with_len(layout.page_bytes() / ELEMENT_BYTES)
    }

    /// Pointer to element 0
    pub fn base(&self) -> NonNull<f32> {
        self.words.cast::<f32>()
    }

    /// Pointer to byte 0
    pub fn base_bytes(&self) -> NonNull<u8> {
        self.words.cast::<u8>()
    }

    /// Length in elements
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn byte_len(&self) -> usize {
        self.len() * ELEMENT_BYTES
    }

    /// Read element `index`; `None` past the end
    pub fn read(&self, index: usize) -> Option<f32> {
        // SAFETY: bounds checked; the allocation lives as long as `self`.
        (index < self.len()).then(|| unsafe { self.base().as_ptr().add(index).read() })
    }
}

impl Drop for LinearMemory {
    fn drop(&mut self) {
        // SAFETY: `words` came from `Box::leak` in `with_len` and is freed once.
        unsafe { drop(Box::from_raw(self.words.as_ptr())) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_module_sizing() {
        // 160x160 field, one header element, no scratch
        let layout = RegionLayout::new(GridDims::new(160, 160).unwrap(), 0);
        assert_eq!(layout.element_offset(), 1);
        assert_eq!(layout.element_count(), 25_600);
        assert_eq!(layout.required_bytes(), 102_404);
        assert_eq!(layout.required_pages(), 2);
        assert_eq!(layout.page_bytes(), 131_072);
    }

    #[test]
    fn test_exact_page_fit() {
        // 16383 elements + header = 65536 bytes exactly
        let layout = RegionLayout::new(GridDims::new(16_383, 1).unwrap(), 0);
        assert_eq!(layout.required_bytes(), PAGE_BYTES);
        assert_eq!(layout.required_pages(), 1);

        let layout = RegionLayout::new(GridDims::new(16_383, 1).unwrap(), 1);
        assert_eq!(layout.required_pages(), 2);
    }

    #[test]
    fn test_linear_memory_is_zeroed_and_page_sized() {
        let layout = RegionLayout::new(GridDims::new(8, 8).unwrap(), 128);
        let memory = LinearMemory::for_layout(&layout);
        assert_eq!(memory.byte_len(), PAGE_BYTES);
        assert_eq!(memory.len(), PAGE_BYTES / 4);
        assert_eq!(memory.read(0), Some(0.0));
        assert_eq!(memory.read(memory.len() - 1), Some(0.0));
        assert_eq!(memory.read(memory.len()), None);
    }
}
