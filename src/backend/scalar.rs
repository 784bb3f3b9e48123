//! Portable reference backend.
//!
//! Each method is a direct lane-by-lane transcription of the primitive's
//! definition. SIMD backends are tested against these results.

#![allow(clippy::needless_range_loop)]

use super::Backend;
use crate::vector::{V16i8, V16u8, V2i64, V4i32, V8i16, V8u16};
use core::array;

/// Scalar reference implementation of [`Backend`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scalar;

#[inline(always)]
fn ilvr<T: Copy, const N: usize>(ws: [T; N], wt: [T; N]) -> [T; N] {
    array::from_fn(|i| if i % 2 == 0 { wt[i / 2] } else { ws[i / 2] })
}

#[inline(always)]
fn ilvl<T: Copy, const N: usize>(ws: [T; N], wt: [T; N]) -> [T; N] {
    array::from_fn(|i| {
        if i % 2 == 0 {
            wt[N / 2 + i / 2]
        } else {
            ws[N / 2 + i / 2]
        }
    })
}

#[inline(always)]
fn ilvev<T: Copy, const N: usize>(ws: [T; N], wt: [T; N]) -> [T; N] {
    array::from_fn(|i| if i % 2 == 0 { wt[i] } else { ws[i - 1] })
}

#[inline(always)]
fn pck<T: Copy, const N: usize>(ws: [T; N], wt: [T; N], odd: usize) -> [T; N] {
    array::from_fn(|i| {
        if i < N / 2 {
            wt[2 * i + odd]
        } else {
            ws[2 * (i - N / 2) + odd]
        }
    })
}

impl Backend for Scalar {
    fn ilvr_b(self, ws: V16i8, wt: V16i8) -> V16i8 {
        V16i8(ilvr(ws.0, wt.0))
    }

    fn ilvr_h(self, ws: V8i16, wt: V8i16) -> V8i16 {
        V8i16(ilvr(ws.0, wt.0))
    }

    fn ilvr_w(self, ws: V4i32, wt: V4i32) -> V4i32 {
        V4i32(ilvr(ws.0, wt.0))
    }

    fn ilvr_d(self, ws: V2i64, wt: V2i64) -> V2i64 {
        V2i64(ilvr(ws.0, wt.0))
    }

    fn ilvl_b(self, ws: V16i8, wt: V16i8) -> V16i8 {
        V16i8(ilvl(ws.0, wt.0))
    }

    fn ilvl_h(self, ws: V8i16, wt: V8i16) -> V8i16 {
        V8i16(ilvl(ws.0, wt.0))
    }

    fn ilvl_w(self, ws: V4i32, wt: V4i32) -> V4i32 {
        V4i32(ilvl(ws.0, wt.0))
    }

    fn ilvl_d(self, ws: V2i64, wt: V2i64) -> V2i64 {
        V2i64(ilvl(ws.0, wt.0))
    }

    fn ilvev_b(self, ws: V16i8, wt: V16i8) -> V16i8 {
        V16i8(ilvev(ws.0, wt.0))
    }

    fn ilvev_h(self, ws: V8i16, wt: V8i16) -> V8i16 {
        V8i16(ilvev(ws.0, wt.0))
    }

    fn pckev_b(self, ws: V16i8, wt: V16i8) -> V16i8 {
        V16i8(pck(ws.0, wt.0, 0))
    }

    fn pckev_h(self, ws: V8i16, wt: V8i16) -> V8i16 {
        V8i16(pck(ws.0, wt.0, 0))
    }

    fn pckev_d(self, ws: V2i64, wt: V2i64) -> V2i64 {
        V2i64(pck(ws.0, wt.0, 0))
    }

    fn pckod_b(self, ws: V16i8, wt: V16i8) -> V16i8 {
        V16i8(pck(ws.0, wt.0, 1))
    }

    fn pckod_h(self, ws: V8i16, wt: V8i16) -> V8i16 {
        V8i16(pck(ws.0, wt.0, 1))
    }

    fn pckod_d(self, ws: V2i64, wt: V2i64) -> V2i64 {
        V2i64(pck(ws.0, wt.0, 1))
    }

    fn vshf_b(self, mask: V16i8, ws: V16i8, wt: V16i8) -> V16i8 {
        V16i8(array::from_fn(|i| {
            let m = mask.0[i] as u8;
            if m & 0xc0 != 0 {
                return 0;
            }
            let k = usize::from(m & 31);
            if k < 16 {
                wt.0[k]
            } else {
                ws.0[k - 16]
            }
        }))
    }

    fn sldi_b(self, wd: V16i8, ws: V16i8, n: u32) -> V16i8 {
        debug_assert!(n < 16, "slide of {n} bytes");
        let n = (n & 15) as usize;
        V16i8(array::from_fn(|i| {
            if i + n < 16 {
                ws.0[i + n]
            } else {
                wd.0[i + n - 16]
            }
        }))
    }

    fn splati_h(self, v: V8i16, idx: u32) -> V8i16 {
        debug_assert!(idx < 8, "halfword lane {idx}");
        V8i16::splat(v.0[(idx & 7) as usize])
    }

    fn aver_u_b(self, a: V16u8, b: V16u8) -> V16u8 {
        V16u8(array::from_fn(|i| {
            ((u16::from(a.0[i]) + u16::from(b.0[i]) + 1) >> 1) as u8
        }))
    }

    fn adds_s_h(self, a: V8i16, b: V8i16) -> V8i16 {
        V8i16(array::from_fn(|i| a.0[i].saturating_add(b.0[i])))
    }

    fn sat_u_h(self, v: V8u16, n: u32) -> V8u16 {
        debug_assert!(n < 16, "saturation to {} bits", n + 1);
        let max = ((1u32 << ((n & 15) + 1)) - 1) as u16;
        V8u16(array::from_fn(|i| v.0[i].min(max)))
    }

    fn sat_s_h(self, v: V8i16, n: u32) -> V8i16 {
        debug_assert!(n < 16, "saturation to {} bits", n + 1);
        let n = n & 15;
        let max = ((1i32 << n) - 1) as i16;
        let min = (-(1i32 << n)) as i16;
        V8i16(array::from_fn(|i| v.0[i].clamp(min, max)))
    }

    fn srari_h(self, v: V8i16, shift: u32) -> V8i16 {
        debug_assert!(shift < 16, "shift by {shift}");
        let shift = shift & 15;
        if shift == 0 {
            return v;
        }
        V8i16(array::from_fn(|i| {
            ((i32::from(v.0[i]) + (1 << (shift - 1))) >> shift) as i16
        }))
    }

    fn srari_w(self, v: V4i32, shift: u32) -> V4i32 {
        debug_assert!(shift < 32, "shift by {shift}");
        let shift = shift & 31;
        if shift == 0 {
            return v;
        }
        V4i32(array::from_fn(|i| {
            ((i64::from(v.0[i]) + (1 << (shift - 1))) >> shift) as i32
        }))
    }

    fn dotp_u_h(self, a: V16u8, b: V16u8) -> V8u16 {
        V8u16(array::from_fn(|i| {
            let even = u16::from(a.0[2 * i]) * u16::from(b.0[2 * i]);
            let odd = u16::from(a.0[2 * i + 1]) * u16::from(b.0[2 * i + 1]);
            even.wrapping_add(odd)
        }))
    }

    fn dotp_s_h(self, a: V16i8, b: V16i8) -> V8i16 {
        V8i16(array::from_fn(|i| {
            let even = i16::from(a.0[2 * i]) * i16::from(b.0[2 * i]);
            let odd = i16::from(a.0[2 * i + 1]) * i16::from(b.0[2 * i + 1]);
            even.wrapping_add(odd)
        }))
    }

    fn dotp_s_w(self, a: V8i16, b: V8i16) -> V4i32 {
        V4i32(array::from_fn(|i| {
            let even = i32::from(a.0[2 * i]) * i32::from(b.0[2 * i]);
            let odd = i32::from(a.0[2 * i + 1]) * i32::from(b.0[2 * i + 1]);
            even.wrapping_add(odd)
        }))
    }

    fn dpadd_s_h(self, acc: V8i16, a: V16i8, b: V16i8) -> V8i16 {
        acc + self.dotp_s_h(a, b)
    }

    fn min_u_h(self, a: V8u16, b: V8u16) -> V8u16 {
        V8u16(array::from_fn(|i| a.0[i].min(b.0[i])))
    }

    fn min_s_h(self, a: V8i16, b: V8i16) -> V8i16 {
        V8i16(array::from_fn(|i| a.0[i].min(b.0[i])))
    }

    fn maxi_s_h(self, v: V8i16, imm: i16) -> V8i16 {
        V8i16(array::from_fn(|i| v.0[i].max(imm)))
    }

    fn xori_b(self, v: V16u8, imm: u8) -> V16u8 {
        V16u8(array::from_fn(|i| v.0[i] ^ imm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(start: i8) -> V16i8 {
        V16i8(array::from_fn(|i| start + i as i8))
    }

    #[test]
    fn interleave_right_and_left() {
        let ws = seq(0);
        let wt = seq(16);
        let r = Scalar.ilvr_b(ws, wt);
        assert_eq!(&r.0[..4], &[16, 0, 17, 1]);
        let l = Scalar.ilvl_b(ws, wt);
        assert_eq!(&l.0[..4], &[24, 8, 25, 9]);
        assert_eq!(l.0[15], 15);
    }

    #[test]
    fn interleave_even() {
        let r = Scalar.ilvev_h(V8i16([10, 11, 12, 13, 14, 15, 16, 17]), V8i16([0, 1, 2, 3, 4, 5, 6, 7]));
        assert_eq!(r.0, [0, 10, 2, 12, 4, 14, 6, 16]);
    }

    #[test]
    fn pack_even_and_odd() {
        let ws = V8i16([10, 11, 12, 13, 14, 15, 16, 17]);
        let wt = V8i16([0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(Scalar.pckev_h(ws, wt).0, [0, 2, 4, 6, 10, 12, 14, 16]);
        assert_eq!(Scalar.pckod_h(ws, wt).0, [1, 3, 5, 7, 11, 13, 15, 17]);
        let d = Scalar.pckod_d(V2i64([1, 2]), V2i64([3, 4]));
        assert_eq!(d.0, [4, 2]);
    }

    #[test]
    fn shuffle_selects_and_zeroes() {
        let wt = seq(0);
        let ws = seq(16);
        let mut mask = [0i8; 16];
        mask[0] = 3;
        mask[1] = 17;
        mask[2] = 0x40;
        mask[3] = -128;
        mask[4] = 35; // wraps to 3
        let r = Scalar.vshf_b(V16i8(mask), ws, wt);
        assert_eq!(&r.0[..5], &[3, 17, 0, 0, 3]);
    }

    #[test]
    fn slide_pulls_from_upper_register() {
        let r = Scalar.sldi_b(seq(16), seq(0), 3);
        assert_eq!(r.0[0], 3);
        assert_eq!(r.0[12], 15);
        assert_eq!(r.0[13], 16);
        assert_eq!(Scalar.sldi_b(seq(16), seq(0), 0), seq(0));
    }

    #[test]
    fn average_rounds_up_without_overflow() {
        let r = Scalar.aver_u_b(V16u8::splat(255), V16u8::splat(254));
        assert_eq!(r, V16u8::splat(255));
        let r = Scalar.aver_u_b(V16u8::splat(0), V16u8::splat(1));
        assert_eq!(r, V16u8::splat(1));
    }

    #[test]
    fn signed_saturation_bounds() {
        let v = V8i16([-300, -129, -128, 0, 127, 128, 300, i16::MIN]);
        assert_eq!(Scalar.sat_s_h(v, 7).0, [-128, -128, -128, 0, 127, 127, 127, -128]);
        assert_eq!(Scalar.sat_s_h(v, 15), v);
    }

    #[test]
    fn unsigned_saturation_bounds() {
        let v = V8u16([0, 1, 2, 3, 4, 255, 256, u16::MAX]);
        assert_eq!(Scalar.sat_u_h(v, 1).0, [0, 1, 2, 3, 3, 3, 3, 3]);
        assert_eq!(Scalar.sat_u_h(v, 7).0, [0, 1, 2, 3, 4, 255, 255, 255]);
        assert_eq!(Scalar.sat_u_h(v, 15), v);
    }

    #[test]
    fn rounding_shift() {
        let v = V8i16([7, 8, -7, -8, -9, i16::MAX, i16::MIN, 1]);
        assert_eq!(Scalar.srari_h(v, 4).0, [0, 1, 0, 0, -1, 2048, -2048, 0]);
        assert_eq!(Scalar.srari_h(v, 0), v);
        let w = V4i32([i32::MAX, i32::MIN, 3, -3]);
        assert_eq!(Scalar.srari_w(w, 1).0, [1 << 30, -(1 << 30), 2, -1]);
    }

    #[test]
    fn dot_products_wrap() {
        let a = V16i8::splat(-128);
        let r = Scalar.dotp_s_h(a, a);
        // 2 * 16384 wraps to -32768.
        assert_eq!(r, V8i16::splat(i16::MIN));
        let u = Scalar.dotp_u_h(V16u8::splat(255), V16u8::splat(255));
        assert_eq!(u, V8u16::splat((2 * 65025u32 % 65536) as u16));
        let w = Scalar.dotp_s_w(V8i16::splat(i16::MIN), V8i16::splat(i16::MIN));
        assert_eq!(w, V4i32::splat(i32::MIN));
    }
}
