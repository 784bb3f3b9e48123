//! Arithmetic fan-outs: averages, saturation, rounding shifts, clipping,
//! dot products and the XOR-128 range bias.
//!
//! Unlike the reorganization families these have fixed lane types; feed
//! other views through [`Vector::cast`].

use core::ops::{Add, Sub};

use crate::backend::Backend;
use crate::vector::{join, split, V16i8, V16u8, V4i32, V8i16, V8u16, Vector};

/// Immediate for the signed/unsigned pixel range bias.
pub const XOR_128: u8 = 0x80;

// =============================================================================
// Average / saturating add
// =============================================================================

/// `[aver_u_b(in0, in1), aver_u_b(in2, in3)]`, rounding up.
#[inline]
pub fn aver_ub2<B: Backend, V: Vector, R: Vector>(be: B, ins: [V; 4]) -> [R; 2] {
    let [in0, in1, in2, in3] = ins;
    [
        be.aver_u_b(in0.cast(), in1.cast()).cast(),
        be.aver_u_b(in2.cast(), in3.cast()).cast(),
    ]
}

/// Four rounding averages over consecutive pairs.
#[inline]
pub fn aver_ub4<B: Backend, V: Vector, R: Vector>(be: B, ins: [V; 8]) -> [R; 4] {
    let (lo, hi): ([V; 4], [V; 4]) = split(ins);
    join(aver_ub2::<B, V, R>(be, lo), aver_ub2::<B, V, R>(be, hi))
}

/// Saturating halfword sums of consecutive pairs.
#[inline]
pub fn adds_sh2<B: Backend>(be: B, ins: [V8i16; 4]) -> [V8i16; 2] {
    let [in0, in1, in2, in3] = ins;
    [be.adds_s_h(in0, in1), be.adds_s_h(in2, in3)]
}

/// Four saturating halfword sums.
#[inline]
pub fn adds_sh4<B: Backend>(be: B, ins: [V8i16; 8]) -> [V8i16; 4] {
    let (lo, hi) = split(ins);
    join(adds_sh2(be, lo), adds_sh2(be, hi))
}

// =============================================================================
// Saturation / rounding shifts
// =============================================================================

/// Clamps two unsigned halfword vectors to `n + 1` bits.
#[inline]
pub fn sat_uh2<B: Backend>(be: B, ins: [V8u16; 2], n: u32) -> [V8u16; 2] {
    ins.map(|v| be.sat_u_h(v, n))
}

/// Clamps four unsigned halfword vectors to `n + 1` bits.
#[inline]
pub fn sat_uh4<B: Backend>(be: B, ins: [V8u16; 4], n: u32) -> [V8u16; 4] {
    let (lo, hi) = split(ins);
    join(sat_uh2(be, lo, n), sat_uh2(be, hi, n))
}

/// Clamps two signed halfword vectors to `[-2^n, 2^n - 1]`.
#[inline]
pub fn sat_sh2<B: Backend>(be: B, ins: [V8i16; 2], n: u32) -> [V8i16; 2] {
    ins.map(|v| be.sat_s_h(v, n))
}

/// Clamps four signed halfword vectors to `[-2^n, 2^n - 1]`.
#[inline]
pub fn sat_sh4<B: Backend>(be: B, ins: [V8i16; 4], n: u32) -> [V8i16; 4] {
    let (lo, hi) = split(ins);
    join(sat_sh2(be, lo, n), sat_sh2(be, hi, n))
}

/// Rounding right shift of two halfword vectors.
#[inline]
pub fn srari_h2<B: Backend>(be: B, ins: [V8i16; 2], shift: u32) -> [V8i16; 2] {
    ins.map(|v| be.srari_h(v, shift))
}

/// Rounding right shift of four halfword vectors.
#[inline]
pub fn srari_h4<B: Backend>(be: B, ins: [V8i16; 4], shift: u32) -> [V8i16; 4] {
    let (lo, hi) = split(ins);
    join(srari_h2(be, lo, shift), srari_h2(be, hi, shift))
}

/// Rounding right shift of two word vectors.
#[inline]
pub fn srari_w2<B: Backend>(be: B, ins: [V4i32; 2], shift: u32) -> [V4i32; 2] {
    ins.map(|v| be.srari_w(v, shift))
}

/// Rounding right shift of four word vectors.
#[inline]
pub fn srari_w4<B: Backend>(be: B, ins: [V4i32; 4], shift: u32) -> [V4i32; 4] {
    let (lo, hi) = split(ins);
    join(srari_w2(be, lo, shift), srari_w2(be, hi, shift))
}

// =============================================================================
// Clip / min
// =============================================================================

/// Clamps halfwords to the pixel range `[0, 255]`.
///
/// The lower bound is applied first, then the upper one.
#[inline]
pub fn clip_sh_0_255<B: Backend>(be: B, v: V8i16) -> V8i16 {
    let floor = be.maxi_s_h(v, 0);
    be.min_s_h(V8i16::splat(255), floor)
}

/// [`clip_sh_0_255`] on two vectors.
#[inline]
pub fn clip_sh2_0_255<B: Backend>(be: B, ins: [V8i16; 2]) -> [V8i16; 2] {
    ins.map(|v| clip_sh_0_255(be, v))
}

/// [`clip_sh_0_255`] on four vectors.
#[inline]
pub fn clip_sh4_0_255<B: Backend>(be: B, ins: [V8i16; 4]) -> [V8i16; 4] {
    let (lo, hi) = split(ins);
    join(clip_sh2_0_255(be, lo), clip_sh2_0_255(be, hi))
}

/// Lanewise unsigned minimum of two vectors against `bound`.
#[inline]
pub fn min_uh2<B: Backend>(be: B, ins: [V8u16; 2], bound: V8u16) -> [V8u16; 2] {
    ins.map(|v| be.min_u_h(v, bound))
}

/// Lanewise unsigned minimum of four vectors against `bound`.
#[inline]
pub fn min_uh4<B: Backend>(be: B, ins: [V8u16; 4], bound: V8u16) -> [V8u16; 4] {
    let (lo, hi) = split(ins);
    join(min_uh2(be, lo, bound), min_uh2(be, hi, bound))
}

// =============================================================================
// Dot products
// =============================================================================

/// Unsigned byte dot products: `out[k] = dotp_u_h(mult[k], cnst[k])`.
#[inline]
pub fn dotp_ub2<B: Backend>(be: B, mult: [V16u8; 2], cnst: [V16u8; 2]) -> [V8u16; 2] {
    [be.dotp_u_h(mult[0], cnst[0]), be.dotp_u_h(mult[1], cnst[1])]
}

/// Four unsigned byte dot products.
#[inline]
pub fn dotp_ub4<B: Backend>(be: B, mult: [V16u8; 4], cnst: [V16u8; 4]) -> [V8u16; 4] {
    let (m_lo, m_hi) = split(mult);
    let (c_lo, c_hi) = split(cnst);
    join(dotp_ub2(be, m_lo, c_lo), dotp_ub2(be, m_hi, c_hi))
}

/// Signed byte dot products into halfwords.
#[inline]
pub fn dotp_sb2<B: Backend>(be: B, mult: [V16i8; 2], cnst: [V16i8; 2]) -> [V8i16; 2] {
    [be.dotp_s_h(mult[0], cnst[0]), be.dotp_s_h(mult[1], cnst[1])]
}

/// Four signed byte dot products.
#[inline]
pub fn dotp_sb4<B: Backend>(be: B, mult: [V16i8; 4], cnst: [V16i8; 4]) -> [V8i16; 4] {
    let (m_lo, m_hi) = split(mult);
    let (c_lo, c_hi) = split(cnst);
    join(dotp_sb2(be, m_lo, c_lo), dotp_sb2(be, m_hi, c_hi))
}

/// Signed halfword dot products into words.
#[inline]
pub fn dotp_sh2<B: Backend>(be: B, mult: [V8i16; 2], cnst: [V8i16; 2]) -> [V4i32; 2] {
    [be.dotp_s_w(mult[0], cnst[0]), be.dotp_s_w(mult[1], cnst[1])]
}

/// Four signed halfword dot products.
#[inline]
pub fn dotp_sh4<B: Backend>(be: B, mult: [V8i16; 4], cnst: [V8i16; 4]) -> [V4i32; 4] {
    let (m_lo, m_hi) = split(mult);
    let (c_lo, c_hi) = split(cnst);
    join(dotp_sh2(be, m_lo, c_lo), dotp_sh2(be, m_hi, c_hi))
}

/// Accumulates signed byte dot products into `acc`.
#[inline]
pub fn dpadd_sb2<B: Backend>(
    be: B,
    acc: [V8i16; 2],
    mult: [V16i8; 2],
    cnst: [V16i8; 2],
) -> [V8i16; 2] {
    [
        be.dpadd_s_h(acc[0], mult[0], cnst[0]),
        be.dpadd_s_h(acc[1], mult[1], cnst[1]),
    ]
}

/// Four dot-product accumulations.
#[inline]
pub fn dpadd_sb4<B: Backend>(
    be: B,
    acc: [V8i16; 4],
    mult: [V16i8; 4],
    cnst: [V16i8; 4],
) -> [V8i16; 4] {
    let (a_lo, a_hi) = split(acc);
    let (m_lo, m_hi) = split(mult);
    let (c_lo, c_hi) = split(cnst);
    join(dpadd_sb2(be, a_lo, m_lo, c_lo), dpadd_sb2(be, a_hi, m_hi, c_hi))
}

// =============================================================================
// Range bias
// =============================================================================

#[inline(always)]
fn xori_128<B: Backend, V: Vector>(be: B, v: V) -> V {
    be.xori_b(v.cast(), XOR_128).cast()
}

/// Flips the sign bit of every byte, mapping `[0, 255]` to `[-128, 127]` and back.
#[inline]
pub fn xori_b2_128<B: Backend, V: Vector>(be: B, ins: [V; 2]) -> [V; 2] {
    ins.map(|v| xori_128(be, v))
}

/// Sign-bit flip of three vectors.
#[inline]
pub fn xori_b3_128<B: Backend, V: Vector>(be: B, ins: [V; 3]) -> [V; 3] {
    let ([in0, in1], [in2]) = split(ins);
    join(xori_b2_128(be, [in0, in1]), [xori_128(be, in2)])
}

/// Sign-bit flip of four vectors.
#[inline]
pub fn xori_b4_128<B: Backend, V: Vector>(be: B, ins: [V; 4]) -> [V; 4] {
    let (lo, hi) = split(ins);
    join(xori_b2_128(be, lo), xori_b2_128(be, hi))
}

/// Sign-bit flip of seven vectors, the row count of an 8-tap vertical window.
#[inline]
pub fn xori_b7_128<B: Backend, V: Vector>(be: B, ins: [V; 7]) -> [V; 7] {
    let (lo, hi): ([V; 4], [V; 3]) = split(ins);
    join(xori_b4_128(be, lo), xori_b3_128(be, hi))
}

/// Packs the even bytes of `in0` (low half) and `in1` (high half), then
/// removes the range bias.
#[inline]
pub fn pckev_xori128_ub<B: Backend, V: Vector>(be: B, in0: V, in1: V) -> V16u8 {
    let packed: V16i8 = be.pckev_b(in1.cast(), in0.cast());
    be.xori_b(packed.cast(), XOR_128)
}

// =============================================================================
// Plain add / sub
// =============================================================================

/// `[in0 + in1, in2 + in3]` with the type's own (wrapping for vectors) addition.
#[inline]
pub fn add2<T: Add<Output = T> + Copy>(ins: [T; 4]) -> [T; 2] {
    let [in0, in1, in2, in3] = ins;
    [in0 + in1, in2 + in3]
}

/// Four pairwise sums.
#[inline]
pub fn add4<T: Add<Output = T> + Copy>(ins: [T; 8]) -> [T; 4] {
    let (lo, hi) = split(ins);
    join(add2(lo), add2(hi))
}

/// `[in0 - in1, in2 - in3]`.
#[inline]
pub fn sub2<T: Sub<Output = T> + Copy>(ins: [T; 4]) -> [T; 2] {
    let [in0, in1, in2, in3] = ins;
    [in0 - in1, in2 - in3]
}

/// Four pairwise differences.
#[inline]
pub fn sub4<T: Sub<Output = T> + Copy>(ins: [T; 8]) -> [T; 4] {
    let (lo, hi) = split(ins);
    join(sub2(lo), sub2(hi))
}
