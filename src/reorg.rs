//! Lane reorganization fan-outs.
//!
//! Each family applies one [`Backend`] primitive to consecutive operand pairs.
//! Inputs may be any vector type; they are reinterpreted at the lane width
//! of the primitive, and the result is reinterpreted as the caller's `R`.
//!
//! Operand order matches the primitive: for `ilvr_b2(be, [in0, in1, ..])`
//! the first result is `ilvr_b(in0, in1)`, so `in1` lands in the even lanes.
//! The even-interleave and shuffle families take their pair the other way
//! round (`in0` even, `in1` odd), as their two-wide forms always have.

use crate::backend::Backend;
use crate::vector::{join, split, V16i8, V2i64, V4i32, V8i16, Vector};

macro_rules! pairwise {
    ($($(#[$meta:meta])* $name:ident => $op:ident($lanes:ty);)*) => {$(
        $(#[$meta])*
        #[inline]
        pub fn $name<B: Backend, V: Vector, R: Vector>(be: B, ins: [V; 4]) -> [R; 2] {
            let [in0, in1, in2, in3] = ins;
            [
                be.$op(in0.cast::<$lanes>(), in1.cast::<$lanes>()).cast(),
                be.$op(in2.cast::<$lanes>(), in3.cast::<$lanes>()).cast(),
            ]
        }
    )*};
}

macro_rules! pairwise4 {
    ($($(#[$meta:meta])* $name:ident => $two:ident;)*) => {$(
        $(#[$meta])*
        #[inline]
        pub fn $name<B: Backend, V: Vector, R: Vector>(be: B, ins: [V; 8]) -> [R; 4] {
            let (lo, hi): ([V; 4], [V; 4]) = split(ins);
            join($two::<B, V, R>(be, lo), $two::<B, V, R>(be, hi))
        }
    )*};
}

pairwise! {
    /// `[ilvl_b(in0, in1), ilvl_b(in2, in3)]`.
    ilvl_b2 => ilvl_b(V16i8);
    /// `[ilvl_h(in0, in1), ilvl_h(in2, in3)]`.
    ilvl_h2 => ilvl_h(V8i16);
    /// `[ilvl_w(in0, in1), ilvl_w(in2, in3)]`.
    ilvl_w2 => ilvl_w(V4i32);
    /// `[ilvr_b(in0, in1), ilvr_b(in2, in3)]`.
    ilvr_b2 => ilvr_b(V16i8);
    /// `[ilvr_h(in0, in1), ilvr_h(in2, in3)]`.
    ilvr_h2 => ilvr_h(V8i16);
    /// `[ilvr_w(in0, in1), ilvr_w(in2, in3)]`.
    ilvr_w2 => ilvr_w(V4i32);
    /// `[ilvr_d(in0, in1), ilvr_d(in2, in3)]`.
    ilvr_d2 => ilvr_d(V2i64);
    /// `[pckev_b(in0, in1), pckev_b(in2, in3)]`.
    pckev_b2 => pckev_b(V16i8);
    /// `[pckev_h(in0, in1), pckev_h(in2, in3)]`.
    pckev_h2 => pckev_h(V8i16);
    /// `[pckev_d(in0, in1), pckev_d(in2, in3)]`.
    pckev_d2 => pckev_d(V2i64);
}

pairwise4! {
    /// Four left byte interleaves.
    ilvl_b4 => ilvl_b2;
    /// Four right byte interleaves.
    ilvr_b4 => ilvr_b2;
    /// Four right halfword interleaves.
    ilvr_h4 => ilvr_h2;
    /// Four right doubleword interleaves.
    ilvr_d4 => ilvr_d2;
    /// Four even-byte packs.
    pckev_b4 => pckev_b2;
    /// Four even-halfword packs.
    pckev_h4 => pckev_h2;
    /// Four even-doubleword packs.
    pckev_d4 => pckev_d2;
}

/// Three right doubleword interleaves.
#[inline]
pub fn ilvr_d3<B: Backend, V: Vector, R: Vector>(be: B, ins: [V; 6]) -> [R; 3] {
    let (lo, [in4, in5]): ([V; 4], [V; 2]) = split(ins);
    join(
        ilvr_d2::<B, V, R>(be, lo),
        [be.ilvr_d(in4.cast(), in5.cast()).cast()],
    )
}

/// Even-byte interleave of each pair: `in0` even lanes go to even output
/// positions, `in1` even lanes to odd positions.
#[inline]
pub fn ilvev_b2<B: Backend, V: Vector, R: Vector>(be: B, ins: [V; 4]) -> [R; 2] {
    let [in0, in1, in2, in3] = ins;
    [
        be.ilvev_b(in1.cast(), in0.cast()).cast(),
        be.ilvev_b(in3.cast(), in2.cast()).cast(),
    ]
}

/// Even-halfword interleave of each pair, `in0` at even positions.
#[inline]
pub fn ilvev_h2<B: Backend, V: Vector, R: Vector>(be: B, ins: [V; 4]) -> [R; 2] {
    let [in0, in1, in2, in3] = ins;
    [
        be.ilvev_h(in1.cast(), in0.cast()).cast(),
        be.ilvev_h(in3.cast(), in2.cast()).cast(),
    ]
}

/// Right and left byte interleave of one pair: `[ilvr_b(in0, in1), ilvl_b(in0, in1)]`.
#[inline]
pub fn ilvrl_b2<B: Backend, V: Vector, R: Vector>(be: B, in0: V, in1: V) -> [R; 2] {
    let (ws, wt) = (in0.cast(), in1.cast());
    [be.ilvr_b(ws, wt).cast(), be.ilvl_b(ws, wt).cast()]
}

/// Right and left halfword interleave of one pair.
#[inline]
pub fn ilvrl_h2<B: Backend, V: Vector, R: Vector>(be: B, in0: V, in1: V) -> [R; 2] {
    let (ws, wt) = (in0.cast(), in1.cast());
    [be.ilvr_h(ws, wt).cast(), be.ilvl_h(ws, wt).cast()]
}

/// Right and left word interleave of one pair.
#[inline]
pub fn ilvrl_w2<B: Backend, V: Vector, R: Vector>(be: B, in0: V, in1: V) -> [R; 2] {
    let (ws, wt) = (in0.cast(), in1.cast());
    [be.ilvr_w(ws, wt).cast(), be.ilvl_w(ws, wt).cast()]
}

/// Undoes [`ilvrl_b2`]: given `[right, left]` returns `[in0, in1]`.
///
/// The interleaved stream `right ++ left` holds `in1` in its even bytes and
/// `in0` in its odd bytes.
#[inline]
pub fn deinterleave_b2<B: Backend, V: Vector, R: Vector>(be: B, right: V, left: V) -> [R; 2] {
    let (ws, wt) = (left.cast(), right.cast());
    [be.pckod_b(ws, wt).cast(), be.pckev_b(ws, wt).cast()]
}

/// Undoes [`ilvrl_h2`].
#[inline]
pub fn deinterleave_h2<B: Backend, V: Vector, R: Vector>(be: B, right: V, left: V) -> [R; 2] {
    let (ws, wt) = (left.cast(), right.cast());
    [be.pckod_h(ws, wt).cast(), be.pckev_h(ws, wt).cast()]
}

/// Zero-extends the low and high eight bytes of `v` to halfwords.
#[inline]
pub fn unpck_ub_sh<B: Backend, V: Vector>(be: B, v: V) -> [V8i16; 2] {
    ilvrl_b2(be, V16i8::default(), v.cast::<V16i8>())
}

/// Byte shuffles of two register pairs: `mask[k]` indexes the 32-byte
/// concatenation of pair `k`, first register in the low half.
#[inline]
pub fn vshf_b2<B: Backend, V: Vector, M: Vector, R: Vector>(
    be: B,
    ins: [V; 4],
    mask: [M; 2],
) -> [R; 2] {
    let [in0, in1, in2, in3] = ins;
    [
        be.vshf_b(mask[0].cast(), in1.cast(), in0.cast()).cast(),
        be.vshf_b(mask[1].cast(), in3.cast(), in2.cast()).cast(),
    ]
}

/// Four byte shuffles of the same register pair.
#[inline]
pub fn vshf_b4<B: Backend, V: Vector, M: Vector, R: Vector>(
    be: B,
    in0: V,
    in1: V,
    mask: [M; 4],
) -> [R; 4] {
    let [m0, m1, m2, m3] = mask;
    join(
        vshf_b2::<B, V, M, R>(be, [in0, in1, in0, in1], [m0, m1]),
        vshf_b2::<B, V, M, R>(be, [in0, in1, in0, in1], [m2, m3]),
    )
}

/// Slides each register down by `n` bytes, shifting zeros in at the top.
#[inline]
pub fn sldi_b2_0<B: Backend, V: Vector, R: Vector>(be: B, ins: [V; 2], n: u32) -> [R; 2] {
    let zero = V16i8::default();
    ins.map(|v| be.sldi_b(zero, v.cast(), n).cast())
}

/// Slides `lo[k]` down by `n` bytes, filling the top from `hi[k]`.
#[inline]
pub fn sldi_b2<B: Backend, V: Vector, R: Vector>(be: B, hi: [V; 2], lo: [V; 2], n: u32) -> [R; 2] {
    core::array::from_fn(|k| be.sldi_b(hi[k].cast(), lo[k].cast(), n).cast())
}

/// Three slides, the first two exactly as [`sldi_b2`].
#[inline]
pub fn sldi_b3<B: Backend, V: Vector, R: Vector>(be: B, hi: [V; 3], lo: [V; 3], n: u32) -> [R; 3] {
    join(
        sldi_b2::<B, V, R>(be, [hi[0], hi[1]], [lo[0], lo[1]], n),
        [be.sldi_b(hi[2].cast(), lo[2].cast(), n).cast()],
    )
}

/// Broadcasts halfword lanes `idx[0]` and `idx[1]` of `v`.
#[inline]
pub fn splati_h2<B: Backend, V: Vector, R: Vector>(be: B, v: V, idx: [u32; 2]) -> [R; 2] {
    let v = v.cast();
    idx.map(|i| be.splati_h(v, i).cast())
}

/// Broadcasts four halfword lanes of `v`, typically the taps of an 8-tap
/// filter packed as byte pairs.
#[inline]
pub fn splati_h4<B: Backend, V: Vector, R: Vector>(be: B, v: V, idx: [u32; 4]) -> [R; 4] {
    join(
        splati_h2::<B, V, R>(be, v, [idx[0], idx[1]]),
        splati_h2::<B, V, R>(be, v, [idx[2], idx[3]]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Scalar;
    use crate::vector::V16u8;

    fn bytes(base: u8) -> V16u8 {
        V16u8(core::array::from_fn(|i| base + i as u8))
    }

    #[test]
    fn fanout_pairs_operands_in_order() {
        let a = bytes(0);
        let b = bytes(16);
        let c = bytes(32);
        let d = bytes(48);
        let [x, y]: [V16u8; 2] = ilvr_b2(Scalar, [a, b, c, d]);
        assert_eq!(&x.0[..4], &[16, 0, 17, 1]);
        assert_eq!(&y.0[..4], &[48, 32, 49, 33]);

        let four: [V16u8; 4] = ilvr_b4(Scalar, [a, b, c, d, d, c, b, a]);
        assert_eq!(four[0], x);
        assert_eq!(&four[3].0[..2], &[0, 16]);
    }

    #[test]
    fn even_interleave_puts_first_operand_even() {
        let [x, _]: [V16u8; 2] = ilvev_b2(Scalar, [bytes(0), bytes(100), bytes(0), bytes(0)]);
        assert_eq!(&x.0[..6], &[0, 100, 2, 102, 4, 104]);

        let h0 = V8i16([0, 1, 2, 3, 4, 5, 6, 7]);
        let h1 = V8i16([10, 11, 12, 13, 14, 15, 16, 17]);
        let [y, _]: [V8i16; 2] = ilvev_h2(Scalar, [h0, h1, h0, h1]);
        assert_eq!(y, V8i16([0, 10, 2, 12, 4, 14, 6, 16]));
    }

    #[test]
    fn doubleword_interleaves() {
        let v = |lo: i64, hi: i64| V2i64([lo, hi]);
        let out: [V2i64; 3] = ilvr_d3(Scalar, [v(1, 2), v(3, 4), v(5, 6), v(7, 8), v(9, 10), v(11, 12)]);
        assert_eq!(out, [v(3, 1), v(7, 5), v(11, 9)]);
        let four: [V2i64; 4] = ilvr_d4(Scalar, [v(1, 2), v(3, 4), v(5, 6), v(7, 8), v(1, 2), v(3, 4), v(5, 6), v(7, 8)]);
        assert_eq!(&four[..2], &[v(3, 1), v(7, 5)]);
    }

    #[test]
    fn deinterleave_inverts_interleave() {
        let a = bytes(3);
        let b = bytes(200);
        let [r, l]: [V16i8; 2] = ilvrl_b2(Scalar, a, b);
        let [a2, b2]: [V16u8; 2] = deinterleave_b2(Scalar, r, l);
        assert_eq!((a2, b2), (a, b));

        let h0 = V8i16([-1, 2, -3, 4, -5, 6, -7, 8]);
        let h1 = V8i16([100, 200, 300, 400, 500, 600, 700, 800]);
        let [r, l]: [V8i16; 2] = ilvrl_h2(Scalar, h0, h1);
        let back: [V8i16; 2] = deinterleave_h2(Scalar, r, l);
        assert_eq!(back, [h0, h1]);
    }

    #[test]
    fn word_interleave_right_left() {
        let a = V4i32([1, 2, 3, 4]);
        let b = V4i32([5, 6, 7, 8]);
        let [r, l]: [V4i32; 2] = ilvrl_w2(Scalar, a, b);
        assert_eq!(r, V4i32([5, 1, 6, 2]));
        assert_eq!(l, V4i32([7, 3, 8, 4]));
        let [l2, _]: [V4i32; 2] = ilvl_w2(Scalar, [a, b, a, b]);
        assert_eq!(l2, l);
    }

    #[test]
    fn unpack_zero_extends() {
        let v = V16u8(core::array::from_fn(|i| 250 + i as u8 % 6));
        let [lo, hi] = unpck_ub_sh(Scalar, v);
        for i in 0..8 {
            assert_eq!(lo.0[i], i16::from(v.0[i]));
            assert_eq!(hi.0[i], i16::from(v.0[8 + i]));
        }
    }

    #[test]
    fn shuffle_pairs_first_register_low() {
        let mask = V16i8(core::array::from_fn(|i| (i as i8) * 2));
        let [x, y]: [V16u8; 2] = vshf_b2(Scalar, [bytes(0), bytes(16), bytes(100), bytes(116)], [mask, mask]);
        assert_eq!(&x.0[..], &core::array::from_fn::<u8, 16, _>(|i| 2 * i as u8)[..]);
        assert_eq!(y.0[8], 116);

        let four: [V16u8; 4] = vshf_b4(Scalar, bytes(0), bytes(16), [mask; 4]);
        assert!(four.iter().all(|v| *v == x));
    }

    #[test]
    fn slides() {
        let [x, y]: [V16u8; 2] = sldi_b2_0(Scalar, [bytes(0), bytes(50)], 4);
        assert_eq!(&x.0[..2], &[4, 5]);
        assert_eq!(&x.0[11..], &[15, 0, 0, 0, 0]);
        assert_eq!(y.0[0], 54);

        let out: [V16u8; 3] = sldi_b3(Scalar, [bytes(100); 3], [bytes(0), bytes(20), bytes(40)], 15);
        assert_eq!(&out[0].0[..2], &[15, 100]);
        assert_eq!(&out[2].0[..2], &[55, 100]);
    }

    #[test]
    fn splat_lanes() {
        let taps = V8i16([10, 11, 12, 13, 14, 15, 16, 17]);
        let out: [V8i16; 4] = splati_h4(Scalar, taps, [0, 1, 2, 3]);
        assert_eq!(out[0], V8i16::splat(10));
        assert_eq!(out[3], V8i16::splat(13));
        let [a, b]: [V8i16; 2] = splati_h2(Scalar, taps, [7, 4]);
        assert_eq!((a, b), (V8i16::splat(17), V8i16::splat(14)));
    }

    #[test]
    fn even_packs() {
        let a = V8i16([0, 1, 2, 3, 4, 5, 6, 7]);
        let b = V8i16([8, 9, 10, 11, 12, 13, 14, 15]);
        let [p, _]: [V8i16; 2] = pckev_h2(Scalar, [a, b, a, b]);
        assert_eq!(p, V8i16([8, 10, 12, 14, 0, 2, 4, 6]));
        let four: [V8i16; 4] = pckev_h4(Scalar, [a, b, a, b, a, b, a, b]);
        assert!(four.iter().all(|v| *v == p));

        let [q, _]: [V16u8; 2] = pckev_b2(Scalar, [bytes(0), bytes(16), bytes(0), bytes(0)]);
        assert_eq!(&q.0[..3], &[16, 18, 20]);
        assert_eq!(&q.0[8..11], &[0, 2, 4]);
        let b4: [V16u8; 4] = pckev_b4(Scalar, [bytes(0), bytes(16), bytes(0), bytes(0), bytes(0), bytes(0), bytes(0), bytes(0)]);
        assert_eq!(b4[0], q);

        let d = |lo: i64, hi: i64| V2i64([lo, hi]);
        let [r, _]: [V2i64; 2] = pckev_d2(Scalar, [d(1, 2), d(3, 4), d(1, 2), d(3, 4)]);
        assert_eq!(r, d(3, 1));
        let r4: [V2i64; 4] = pckev_d4(Scalar, [d(1, 2), d(3, 4), d(1, 2), d(3, 4), d(1, 2), d(3, 4), d(1, 2), d(3, 4)]);
        assert_eq!(r4[3], r);
    }

    #[test]
    fn left_interleaves_take_high_half() {
        let [x, _]: [V16u8; 2] = ilvl_b2(Scalar, [bytes(0), bytes(16), bytes(0), bytes(0)]);
        assert_eq!(&x.0[..4], &[24, 8, 25, 9]);
        let four: [V16u8; 4] = ilvl_b4(Scalar, [bytes(0), bytes(16), bytes(0), bytes(0), bytes(0), bytes(16), bytes(0), bytes(0)]);
        assert_eq!(four[2], x);

        let a = V8i16([0, 1, 2, 3, 4, 5, 6, 7]);
        let b = V8i16([8, 9, 10, 11, 12, 13, 14, 15]);
        let [h, _]: [V8i16; 2] = ilvl_h2(Scalar, [a, b, a, b]);
        assert_eq!(h, V8i16([12, 4, 13, 5, 14, 6, 15, 7]));
        let [hr, _]: [V8i16; 2] = ilvr_h2(Scalar, [a, b, a, b]);
        let hr4: [V8i16; 4] = ilvr_h4(Scalar, [a, b, a, b, a, b, a, b]);
        assert_eq!(hr4[1], hr);
        let [w, _]: [V4i32; 2] = ilvr_w2(Scalar, [V4i32([1, 2, 3, 4]), V4i32([5, 6, 7, 8]), V4i32::default(), V4i32::default()]);
        assert_eq!(w, V4i32([5, 1, 6, 2]));
    }
}
