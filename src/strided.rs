//! Strided block load/store.
//!
//! A block is a run of rows in one slice: row `i` starts at `i * stride`
//! elements. Wider fan-outs are built from the two-row form (4 = 2+2,
//! 5 = 4+1, 7 = 5+2, 8 = 4+4, 16 = 8+8), so a 7-row load touches rows in the
//! same order a hand-unrolled loop would.
//!
//! # Panics
//! Every function indexes the slice directly; a row that does not fit panics.
//! Use [`crate::Block`] to validate geometry once up front.

use crate::backend::Backend;
use crate::mem::{ld_b, ld_h, ld_v, sd, sd4, st_b, st_h, st_v, sw4};
use crate::vector::{join, Lane, V16i8, V2i64, V4i32, Vector};

/// Loads `N` vectors, one per row, from rows `0..N` of `src`.
#[inline]
pub fn ld_rows<T: Lane, V: Vector, const N: usize>(src: &[T], stride: usize) -> [V; N] {
    core::array::from_fn(|row| ld_v(&src[row * stride..]))
}

/// Stores `N` vectors, one per row, to rows `0..N` of `dst`.
#[inline]
pub fn st_rows<T: Lane, V: Vector, const N: usize>(rows: [V; N], dst: &mut [T], stride: usize) {
    for (i, v) in rows.into_iter().enumerate() {
        st_v(v, &mut dst[i * stride..]);
    }
}

// =============================================================================
// Byte rows
// =============================================================================

/// Loads 2 rows of 16 bytes.
#[inline]
pub fn ld_b2<V: Vector>(src: &[u8], stride: usize) -> [V; 2] {
    [ld_b(src), ld_b(&src[stride..])]
}

/// Loads 4 rows of 16 bytes.
#[inline]
pub fn ld_b4<V: Vector>(src: &[u8], stride: usize) -> [V; 4] {
    join(ld_b2(src, stride), ld_b2(&src[2 * stride..], stride))
}

/// Loads 5 rows of 16 bytes.
#[inline]
pub fn ld_b5<V: Vector>(src: &[u8], stride: usize) -> [V; 5] {
    join(ld_b4(src, stride), [ld_b(&src[4 * stride..])])
}

/// Loads 7 rows of 16 bytes.
#[inline]
pub fn ld_b7<V: Vector>(src: &[u8], stride: usize) -> [V; 7] {
    join(ld_b5(src, stride), ld_b2(&src[5 * stride..], stride))
}

/// Loads 8 rows of 16 bytes.
#[inline]
pub fn ld_b8<V: Vector>(src: &[u8], stride: usize) -> [V; 8] {
    join(ld_b4(src, stride), ld_b4(&src[4 * stride..], stride))
}

/// Stores 2 rows of 16 bytes.
#[inline]
pub fn st_b2<V: Vector>([in0, in1]: [V; 2], dst: &mut [u8], stride: usize) {
    st_b(in0, dst);
    st_b(in1, &mut dst[stride..]);
}

/// Stores 4 rows of 16 bytes.
#[inline]
pub fn st_b4<V: Vector>([in0, in1, in2, in3]: [V; 4], dst: &mut [u8], stride: usize) {
    st_b2([in0, in1], dst, stride);
    st_b2([in2, in3], &mut dst[2 * stride..], stride);
}

/// Stores 8 rows of 16 bytes.
#[inline]
pub fn st_b8<V: Vector>(rows: [V; 8], dst: &mut [u8], stride: usize) {
    let [in0, in1, in2, in3, in4, in5, in6, in7] = rows;
    st_b4([in0, in1, in2, in3], dst, stride);
    st_b4([in4, in5, in6, in7], &mut dst[4 * stride..], stride);
}

// =============================================================================
// Halfword rows
// =============================================================================

/// Loads 2 rows of 8 halfwords. `stride` counts halfwords.
#[inline]
pub fn ld_h2<V: Vector>(src: &[i16], stride: usize) -> [V; 2] {
    [ld_h(src), ld_h(&src[stride..])]
}

/// Loads 4 rows of 8 halfwords.
#[inline]
pub fn ld_h4<V: Vector>(src: &[i16], stride: usize) -> [V; 4] {
    join(ld_h2(src, stride), ld_h2(&src[2 * stride..], stride))
}

/// Loads 8 rows of 8 halfwords.
#[inline]
pub fn ld_h8<V: Vector>(src: &[i16], stride: usize) -> [V; 8] {
    join(ld_h4(src, stride), ld_h4(&src[4 * stride..], stride))
}

/// Loads 16 rows of 8 halfwords.
#[inline]
pub fn ld_h16<V: Vector>(src: &[i16], stride: usize) -> [V; 16] {
    join(ld_h8(src, stride), ld_h8(&src[8 * stride..], stride))
}

/// Stores 2 rows of 8 halfwords.
#[inline]
pub fn st_h2<V: Vector>([in0, in1]: [V; 2], dst: &mut [i16], stride: usize) {
    st_h(in0, dst);
    st_h(in1, &mut dst[stride..]);
}

/// Stores 4 rows of 8 halfwords.
#[inline]
pub fn st_h4<V: Vector>([in0, in1, in2, in3]: [V; 4], dst: &mut [i16], stride: usize) {
    st_h2([in0, in1], dst, stride);
    st_h2([in2, in3], &mut dst[2 * stride..], stride);
}

/// Stores 8 rows of 8 halfwords.
#[inline]
pub fn st_h8<V: Vector>(rows: [V; 8], dst: &mut [i16], stride: usize) {
    let [in0, in1, in2, in3, in4, in5, in6, in7] = rows;
    st_h4([in0, in1, in2, in3], dst, stride);
    st_h4([in4, in5, in6, in7], &mut dst[4 * stride..], stride);
}

// =============================================================================
// Partial-row stores
// =============================================================================

/// Stores a 4x4 byte block: word lanes `idx[0]`, `idx[1]` of `in0` and
/// `idx[2]`, `idx[3]` of `in1`, one per row.
#[inline]
pub fn st4x4_ub<V: Vector>(in0: V, in1: V, idx: [usize; 4], dst: &mut [u8], stride: usize) {
    let in0: V4i32 = in0.cast();
    let in1: V4i32 = in1.cast();
    sw4(
        [
            in0.copy_u_w(idx[0]),
            in0.copy_u_w(idx[1]),
            in1.copy_u_w(idx[2]),
            in1.copy_u_w(idx[3]),
        ],
        dst,
        stride,
    );
}

/// Stores a 4x8 byte block: the four words of `in0`, then the four words of
/// `in1`.
#[inline]
pub fn st4x8_ub<V: Vector>(in0: V, in1: V, dst: &mut [u8], stride: usize) {
    st4x4_ub(in0, in0, [0, 1, 2, 3], dst, stride);
    st4x4_ub(in1, in1, [0, 1, 2, 3], &mut dst[4 * stride..], stride);
}

/// Stores the low 8 bytes of `v`.
#[inline]
pub fn st8x1_ub<V: Vector>(v: V, dst: &mut [u8]) {
    sd(v.cast::<V2i64>().copy_u_d(0), dst);
}

/// Stores an 8x4 byte block: both doublewords of `in0`, then of `in1`.
#[inline]
pub fn st8x4_ub<V: Vector>(in0: V, in1: V, dst: &mut [u8], stride: usize) {
    let in0: V2i64 = in0.cast();
    let in1: V2i64 = in1.cast();
    sd4(
        [in0.copy_u_d(0), in0.copy_u_d(1), in1.copy_u_d(0), in1.copy_u_d(1)],
        dst,
        stride,
    );
}

/// Packs the even bytes of `in0` (low half) and `in1` (high half) and
/// stores the 16 result bytes.
#[inline]
pub fn pckev_st_sb<B: Backend, V: Vector>(be: B, in0: V, in1: V, dst: &mut [u8]) {
    let packed: V16i8 = be.pckev_b(in1.cast(), in0.cast());
    st_b(packed, dst);
}
