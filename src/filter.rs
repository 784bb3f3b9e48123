//! Sub-pixel interpolation kernels.
//!
//! Taps are stored as byte pairs: a 2-tap filter is one `[c0, c1]` pair
//! repeated across the register, an 8-tap filter is four such pairs, each
//! broadcast into its own register with [`crate::reorg::splati_h4`].

use crate::backend::Backend;
use crate::reorg::vshf_b4;
use crate::vector::{V16i8, V16u8, V8i16, V8u16, Vector};

/// Fixed-point precision of the codec's interpolation taps.
pub const FILTER_BITS: u32 = 7;

/// Two-tap horizontal filter.
///
/// Gathers sample pairs from `in0 ++ in1` with `mask`, multiplies them with
/// `coeff` into unsigned halfwords, rounds by `shift` bits and saturates the
/// result to `shift + 1` bits. The steps run in exactly that order.
#[inline]
pub fn horiz_2tap_filt_uh<B: Backend, V: Vector, M: Vector>(
    be: B,
    in0: V,
    in1: V,
    mask: M,
    coeff: V16u8,
    shift: u32,
) -> V8u16 {
    let pairs: V16i8 = be.vshf_b(mask.cast(), in1.cast(), in0.cast());
    let sum = be.dotp_u_h(pairs.cast(), coeff);
    let rounded: V8u16 = be.srari_h(sum.cast(), shift).cast();
    be.sat_u_h(rounded, shift)
}

/// Eight-tap dot product over four gathered pair vectors.
///
/// Taps 0-1 and 2-3 accumulate separately from taps 4-5 and 6-7; the two
/// partial sums are then added with signed saturation.
#[inline]
pub fn filt_8tap_dpadd_s_h<B: Backend>(be: B, vec: [V16i8; 4], filt: [V16i8; 4]) -> V8i16 {
    let lo = be.dotp_s_h(vec[0], filt[0]);
    let lo = be.dpadd_s_h(lo, vec[1], filt[1]);
    let hi = be.dotp_s_h(vec[2], filt[2]);
    let hi = be.dpadd_s_h(hi, vec[3], filt[3]);
    be.adds_s_h(lo, hi)
}

/// Eight-tap horizontal filter on range-biased pixels.
///
/// `mask[k]` gathers the sample pairs for taps `2k` and `2k + 1` from
/// `src0 ++ src1`. The sum is rounded by [`FILTER_BITS`] and saturated to
/// signed 8 bits, ready to be packed and unbiased.
#[inline]
pub fn horiz_8tap_filt<B: Backend, V: Vector, M: Vector>(
    be: B,
    src0: V,
    src1: V,
    mask: [M; 4],
    filt: [V16i8; 4],
) -> V8i16 {
    let vec: [V16i8; 4] = vshf_b4(be, src0, src1, mask);
    let sum = filt_8tap_dpadd_s_h(be, vec, filt);
    let rounded = be.srari_h(sum, FILTER_BITS);
    be.sat_s_h(rounded, FILTER_BITS)
}
