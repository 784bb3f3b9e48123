//! Error types.

use thiserror::Error;

/// Invalid geometry for a strided block view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BlockError {
    /// Rows must be at least one element apart.
    #[error("block stride is zero")]
    ZeroStride,

    /// Consecutive rows would overlap.
    #[error("row width {width} exceeds stride {stride}")]
    RowWiderThanStride {
        /// Elements per row.
        width: usize,
        /// Elements between row starts.
        stride: usize,
    },

    /// The last row ends past the end of the slice.
    #[error("block needs {needed} elements but the slice holds {len}")]
    OutOfBounds {
        /// `(rows - 1) * stride + width`, saturated on overflow.
        needed: usize,
        /// Slice length.
        len: usize,
    },

    /// A fan-out asked for more rows than the block has.
    #[error("requested {requested} rows from a block of {rows}")]
    TooFewRows {
        /// Rows the operation touches.
        requested: usize,
        /// Rows in the block.
        rows: usize,
    },

    /// A row is narrower than one vector.
    #[error("row of {width} elements cannot hold a {needed}-element vector")]
    RowTooNarrow {
        /// Elements per row.
        width: usize,
        /// Elements one vector spans.
        needed: usize,
    },
}
