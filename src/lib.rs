//! Bit-exact 128-bit block primitives for video codec inner loops.
//!
//! Motion-compensation filters, inverse transforms and loop filters in a
//! VP9-style codec all run on the same small vocabulary of register
//! operations: strided row loads, interleaves and packs, saturating
//! arithmetic, byte dot products, transposes and butterflies. This crate
//! provides that vocabulary with one numeric contract (rounding direction,
//! saturation bounds, lane order) that every backend meets bit for bit.
//!
//! # Layers
//!
//! - [`mem`]: unaligned scalar and single-vector access.
//! - [`strided`]: multi-row loads/stores at a stride, partial-row stores.
//! - [`reorg`] and [`transpose`]: interleave, pack, shuffle, slide, splat,
//!   unpack and halfword transposes.
//! - [`arith`] and [`filter`]: averages, saturation, rounding shifts,
//!   clipping, dot products, the XOR-128 bias and the sub-pixel kernels.
//! - [`butterfly`]: sum/difference stages of the inverse transforms.
//! - [`Block`] / [`BlockMut`]: strided views validated once up front.
//!
//! Every layer is generic over a [`Backend`]. Use [`Auto`] to pick the best
//! one for the running CPU, or [`Scalar`] for the portable reference.
//!
//! ```rust
//! use zenblock::{arith, strided, Auto, V16u8};
//!
//! let be = Auto::detect();
//! let src: Vec<u8> = (0..64).collect();
//! let rows: [V16u8; 4] = strided::ld_b4(&src, 16);
//! let [avg0, avg1]: [V16u8; 2] = arith::aver_ub2(be, rows);
//! assert_eq!(avg0.0[0], 8);
//! assert_eq!(avg1.0[0], 40);
//! ```
//!
//! # Features
//!
//! - `std` (default): runtime backend override through the
//!   `ZENBLOCK_FORCE_SCALAR` environment variable and cached detection.
//! - `simd` (default): the x86-64 backend, built on token-gated intrinsics.
//!
//! # Safety
//!
//! This crate uses `#![forbid(unsafe_code)]`. With the `simd` feature the
//! x86-64 backend relies on the [`archmage`] crate: its `#[arcane]` macro
//! generates the `target_feature` wrappers, and a function only runs once a
//! CPU token proves the features are present.
//!
//! [`archmage`]: https://docs.rs/archmage

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod arith;
pub mod backend;
mod block;
pub mod butterfly;
mod error;
pub mod filter;
pub mod mem;
pub mod reorg;
pub mod strided;
pub mod transpose;
mod vector;

pub use backend::{Auto, Backend, Scalar};
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
pub use backend::X64;
#[cfg(feature = "std")]
pub use backend::FORCE_SCALAR_ENV;
pub use block::{Block, BlockMut};
pub use error::BlockError;
pub use vector::{Lane, Vector, V16i8, V16u8, V2i64, V4i32, V8i16, V8u16};
