//! Validated strided block views.
//!
//! The free functions in [`crate::strided`] panic on a short slice. A
//! [`Block`] or [`BlockMut`] checks the whole extent once, so row access and
//! vector fan-outs through it cannot go out of bounds.

use crate::error::BlockError;
use crate::strided::{ld_rows, st_rows};
use crate::vector::{Lane, Vector};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Geometry {
    stride: usize,
    rows: usize,
    width: usize,
}

impl Geometry {
    fn validate(stride: usize, rows: usize, width: usize, len: usize) -> Result<Self, BlockError> {
        if stride == 0 {
            return Err(BlockError::ZeroStride);
        }
        if width > stride {
            return Err(BlockError::RowWiderThanStride { width, stride });
        }
        if rows > 0 {
            let needed = (rows - 1)
                .checked_mul(stride)
                .and_then(|start| start.checked_add(width))
                .unwrap_or(usize::MAX);
            if needed > len {
                return Err(BlockError::OutOfBounds { needed, len });
            }
        }
        Ok(Self { stride, rows, width })
    }

    fn check_fanout<T: Lane, V: Vector>(&self, requested: usize) -> Result<(), BlockError> {
        if requested > self.rows {
            return Err(BlockError::TooFewRows {
                requested,
                rows: self.rows,
            });
        }
        let needed = V::LANES * <V::Lane as Lane>::BYTES / T::BYTES;
        if needed > self.width {
            return Err(BlockError::RowTooNarrow {
                width: self.width,
                needed,
            });
        }
        Ok(())
    }

    fn row_range(&self, row: usize) -> core::ops::Range<usize> {
        assert!(row < self.rows, "row {row} out of {} rows", self.rows);
        let start = row * self.stride;
        start..start + self.width
    }
}

/// Read-only block of `rows` rows, `width` elements each, `stride` elements
/// apart.
#[derive(Clone, Copy, Debug)]
pub struct Block<'a, T: Lane> {
    data: &'a [T],
    geom: Geometry,
}

impl<'a, T: Lane> Block<'a, T> {
    /// Validates the geometry against `data`.
    pub fn new(data: &'a [T], stride: usize, rows: usize, width: usize) -> Result<Self, BlockError> {
        let geom = Geometry::validate(stride, rows, width, data.len())?;
        Ok(Self { data, geom })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.geom.rows
    }

    /// Elements per row.
    pub fn width(&self) -> usize {
        self.geom.width
    }

    /// Elements between row starts.
    pub fn stride(&self) -> usize {
        self.geom.stride
    }

    /// Row `i`, exactly `width` elements long.
    ///
    /// # Panics
    /// If `i >= self.rows()`.
    pub fn row(&self, i: usize) -> &'a [T] {
        &self.data[self.geom.row_range(i)]
    }

    /// Loads one vector from the start of each of the first `N` rows.
    pub fn load_rows<V: Vector, const N: usize>(&self) -> Result<[V; N], BlockError> {
        self.geom.check_fanout::<T, V>(N)?;
        Ok(ld_rows(self.data, self.geom.stride))
    }
}

/// Mutable counterpart of [`Block`].
#[derive(Debug)]
pub struct BlockMut<'a, T: Lane> {
    data: &'a mut [T],
    geom: Geometry,
}

impl<'a, T: Lane> BlockMut<'a, T> {
    /// Validates the geometry against `data`.
    pub fn new(data: &'a mut [T], stride: usize, rows: usize, width: usize) -> Result<Self, BlockError> {
        let geom = Geometry::validate(stride, rows, width, data.len())?;
        Ok(Self { data, geom })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.geom.rows
    }

    /// Elements per row.
    pub fn width(&self) -> usize {
        self.geom.width
    }

    /// Elements between row starts.
    pub fn stride(&self) -> usize {
        self.geom.stride
    }

    /// Read-only view of the same block.
    pub fn as_block(&self) -> Block<'_, T> {
        Block {
            data: &*self.data,
            geom: self.geom,
        }
    }

    /// Row `i`.
    ///
    /// # Panics
    /// If `i >= self.rows()`.
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[self.geom.row_range(i)]
    }

    /// Mutable row `i`.
    ///
    /// # Panics
    /// If `i >= self.rows()`.
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        let range = self.geom.row_range(i);
        &mut self.data[range]
    }

    /// Loads one vector from the start of each of the first `N` rows.
    pub fn load_rows<V: Vector, const N: usize>(&self) -> Result<[V; N], BlockError> {
        self.as_block().load_rows()
    }

    /// Stores `vectors[i]` at the start of row `i`.
    ///
    /// Nothing is written when the block cannot take all `N` rows.
    pub fn store_rows<V: Vector, const N: usize>(&mut self, vectors: [V; N]) -> Result<(), BlockError> {
        self.geom.check_fanout::<T, V>(N)?;
        st_rows(vectors, self.data, self.geom.stride);
        Ok(())
    }
}
