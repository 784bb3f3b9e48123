//! x86-64 backend on 128-bit registers.
//!
//! Every primitive maps to a short SSE2/SSSE3/SSE4.1 sequence. MSA operations
//! without a direct x86 counterpart are emulated: `vshf.b` through two
//! `pshufb` plus a blend, even/odd packs through `pshufb` gathers, dot products
//! through widened `pmullw`.
//!
//! Uses archmage for safe SIMD intrinsics with token-based CPU feature verification.

use super::Backend;
use crate::vector::{V16i8, V16u8, V2i64, V4i32, V8i16, V8u16, Vector};
use archmage::{arcane, rite, SimdToken, X64V3Token};
use core::arch::x86_64::*;
use core::fmt;
use safe_unaligned_simd::x86_64 as simd_mem;

/// SIMD implementation of [`Backend`], available once the CPU token is summoned.
#[derive(Clone, Copy)]
pub struct X64(X64V3Token);

impl X64 {
    /// Returns the backend if the running CPU supports it.
    pub fn summon() -> Option<Self> {
        X64V3Token::summon().map(Self)
    }

    pub(crate) fn new(token: X64V3Token) -> Self {
        Self(token)
    }
}

impl fmt::Debug for X64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("X64")
    }
}

#[rite]
fn load(_token: X64V3Token, bytes: [u8; 16]) -> __m128i {
    simd_mem::_mm_loadu_si128(&bytes)
}

#[rite]
fn store(_token: X64V3Token, v: __m128i) -> [u8; 16] {
    let mut out = [0u8; 16];
    simd_mem::_mm_storeu_si128(&mut out, v);
    out
}

// =============================================================================
// Interleave / pack
// =============================================================================

#[arcane]
fn ilvr_b_sse(_token: X64V3Token, ws: V16i8, wt: V16i8) -> V16i8 {
    let ws = load(_token, ws.to_bytes());
    let wt = load(_token, wt.to_bytes());
    V16i8::from_bytes(store(_token, _mm_unpacklo_epi8(wt, ws)))
}

#[arcane]
fn ilvr_h_sse(_token: X64V3Token, ws: V8i16, wt: V8i16) -> V8i16 {
    let ws = load(_token, ws.to_bytes());
    let wt = load(_token, wt.to_bytes());
    V8i16::from_bytes(store(_token, _mm_unpacklo_epi16(wt, ws)))
}

#[arcane]
fn ilvr_w_sse(_token: X64V3Token, ws: V4i32, wt: V4i32) -> V4i32 {
    let ws = load(_token, ws.to_bytes());
    let wt = load(_token, wt.to_bytes());
    V4i32::from_bytes(store(_token, _mm_unpacklo_epi32(wt, ws)))
}

#[arcane]
fn ilvr_d_sse(_token: X64V3Token, ws: V2i64, wt: V2i64) -> V2i64 {
    let ws = load(_token, ws.to_bytes());
    let wt = load(_token, wt.to_bytes());
    V2i64::from_bytes(store(_token, _mm_unpacklo_epi64(wt, ws)))
}

#[arcane]
fn ilvl_b_sse(_token: X64V3Token, ws: V16i8, wt: V16i8) -> V16i8 {
    let ws = load(_token, ws.to_bytes());
    let wt = load(_token, wt.to_bytes());
    V16i8::from_bytes(store(_token, _mm_unpackhi_epi8(wt, ws)))
}

#[arcane]
fn ilvl_h_sse(_token: X64V3Token, ws: V8i16, wt: V8i16) -> V8i16 {
    let ws = load(_token, ws.to_bytes());
    let wt = load(_token, wt.to_bytes());
    V8i16::from_bytes(store(_token, _mm_unpackhi_epi16(wt, ws)))
}

#[arcane]
fn ilvl_w_sse(_token: X64V3Token, ws: V4i32, wt: V4i32) -> V4i32 {
    let ws = load(_token, ws.to_bytes());
    let wt = load(_token, wt.to_bytes());
    V4i32::from_bytes(store(_token, _mm_unpackhi_epi32(wt, ws)))
}

#[arcane]
fn ilvl_d_sse(_token: X64V3Token, ws: V2i64, wt: V2i64) -> V2i64 {
    let ws = load(_token, ws.to_bytes());
    let wt = load(_token, wt.to_bytes());
    V2i64::from_bytes(store(_token, _mm_unpackhi_epi64(wt, ws)))
}

#[arcane]
fn ilvev_b_sse(_token: X64V3Token, ws: V16i8, wt: V16i8) -> V16i8 {
    let ws = load(_token, ws.to_bytes());
    let wt = load(_token, wt.to_bytes());
    // Even byte of wt stays in place, even byte of ws moves up into the odd slot.
    let even = _mm_and_si128(wt, _mm_set1_epi16(0x00ff));
    let odd = _mm_slli_epi16(ws, 8);
    V16i8::from_bytes(store(_token, _mm_or_si128(even, odd)))
}

#[arcane]
fn ilvev_h_sse(_token: X64V3Token, ws: V8i16, wt: V8i16) -> V8i16 {
    let ws = load(_token, ws.to_bytes());
    let wt = load(_token, wt.to_bytes());
    let even = _mm_and_si128(wt, _mm_set1_epi32(0x0000_ffff));
    let odd = _mm_slli_epi32(ws, 16);
    V8i16::from_bytes(store(_token, _mm_or_si128(even, odd)))
}

/// Gathers the bytes named by `ctl` from both sources into the low halves,
/// then joins them: `wt` selection low, `ws` selection high.
#[rite]
fn gather_pack(_token: X64V3Token, ws: __m128i, wt: __m128i, ctl: __m128i) -> __m128i {
    let lo = _mm_shuffle_epi8(wt, ctl);
    let hi = _mm_shuffle_epi8(ws, ctl);
    _mm_unpacklo_epi64(lo, hi)
}

#[arcane]
fn pckev_b_sse(_token: X64V3Token, ws: V16i8, wt: V16i8) -> V16i8 {
    let ws = load(_token, ws.to_bytes());
    let wt = load(_token, wt.to_bytes());
    let ctl = _mm_setr_epi8(0, 2, 4, 6, 8, 10, 12, 14, -1, -1, -1, -1, -1, -1, -1, -1);
    V16i8::from_bytes(store(_token, gather_pack(_token, ws, wt, ctl)))
}

#[arcane]
fn pckod_b_sse(_token: X64V3Token, ws: V16i8, wt: V16i8) -> V16i8 {
    let ws = load(_token, ws.to_bytes());
    let wt = load(_token, wt.to_bytes());
    let ctl = _mm_setr_epi8(1, 3, 5, 7, 9, 11, 13, 15, -1, -1, -1, -1, -1, -1, -1, -1);
    V16i8::from_bytes(store(_token, gather_pack(_token, ws, wt, ctl)))
}

#[arcane]
fn pckev_h_sse(_token: X64V3Token, ws: V8i16, wt: V8i16) -> V8i16 {
    let ws = load(_token, ws.to_bytes());
    let wt = load(_token, wt.to_bytes());
    let ctl = _mm_setr_epi8(0, 1, 4, 5, 8, 9, 12, 13, -1, -1, -1, -1, -1, -1, -1, -1);
    V8i16::from_bytes(store(_token, gather_pack(_token, ws, wt, ctl)))
}

#[arcane]
fn pckod_h_sse(_token: X64V3Token, ws: V8i16, wt: V8i16) -> V8i16 {
    let ws = load(_token, ws.to_bytes());
    let wt = load(_token, wt.to_bytes());
    let ctl = _mm_setr_epi8(2, 3, 6, 7, 10, 11, 14, 15, -1, -1, -1, -1, -1, -1, -1, -1);
    V8i16::from_bytes(store(_token, gather_pack(_token, ws, wt, ctl)))
}

// pckev.d / pckod.d coincide with the doubleword interleaves.

#[arcane]
fn pckev_d_sse(_token: X64V3Token, ws: V2i64, wt: V2i64) -> V2i64 {
    let ws = load(_token, ws.to_bytes());
    let wt = load(_token, wt.to_bytes());
    V2i64::from_bytes(store(_token, _mm_unpacklo_epi64(wt, ws)))
}

#[arcane]
fn pckod_d_sse(_token: X64V3Token, ws: V2i64, wt: V2i64) -> V2i64 {
    let ws = load(_token, ws.to_bytes());
    let wt = load(_token, wt.to_bytes());
    V2i64::from_bytes(store(_token, _mm_unpackhi_epi64(wt, ws)))
}

// =============================================================================
// Shuffle / slide / splat
// =============================================================================

#[rite]
fn vshf(_token: X64V3Token, mask: __m128i, ws: __m128i, wt: __m128i) -> __m128i {
    let idx = _mm_and_si128(mask, _mm_set1_epi8(0x0f));
    let from_wt = _mm_shuffle_epi8(wt, idx);
    let from_ws = _mm_shuffle_epi8(ws, idx);

    // Bit 4 picks the second register, bits 6/7 zero the lane.
    let bit4 = _mm_set1_epi8(0x10);
    let take_ws = _mm_cmpeq_epi8(_mm_and_si128(mask, bit4), bit4);
    let picked = _mm_blendv_epi8(from_wt, from_ws, take_ws);
    let keep = _mm_cmpeq_epi8(
        _mm_and_si128(mask, _mm_set1_epi8(0xc0u8 as i8)),
        _mm_setzero_si128(),
    );
    _mm_and_si128(picked, keep)
}

#[arcane]
fn vshf_b_sse(_token: X64V3Token, mask: V16i8, ws: V16i8, wt: V16i8) -> V16i8 {
    let mask = load(_token, mask.to_bytes());
    let ws = load(_token, ws.to_bytes());
    let wt = load(_token, wt.to_bytes());
    V16i8::from_bytes(store(_token, vshf(_token, mask, ws, wt)))
}

#[arcane]
fn sldi_b_sse(_token: X64V3Token, wd: V16i8, ws: V16i8, n: u32) -> V16i8 {
    // Slide as a shuffle of `ws ++ wd` with indices n..n+16.
    let base = _mm_setr_epi8(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15);
    let mask = _mm_add_epi8(base, _mm_set1_epi8(n as i8));
    let wd = load(_token, wd.to_bytes());
    let ws = load(_token, ws.to_bytes());
    V16i8::from_bytes(store(_token, vshf(_token, mask, wd, ws)))
}

#[arcane]
fn splati_h_sse(_token: X64V3Token, v: V8i16, idx: u32) -> V8i16 {
    let lo = (2 * idx) as i16;
    let ctl = _mm_set1_epi16(((lo + 1) << 8) | lo);
    let v = load(_token, v.to_bytes());
    V8i16::from_bytes(store(_token, _mm_shuffle_epi8(v, ctl)))
}

// =============================================================================
// Arithmetic
// =============================================================================

#[arcane]
fn aver_u_b_sse(_token: X64V3Token, a: V16u8, b: V16u8) -> V16u8 {
    let a = load(_token, a.to_bytes());
    let b = load(_token, b.to_bytes());
    V16u8::from_bytes(store(_token, _mm_avg_epu8(a, b)))
}

#[arcane]
fn adds_s_h_sse(_token: X64V3Token, a: V8i16, b: V8i16) -> V8i16 {
    let a = load(_token, a.to_bytes());
    let b = load(_token, b.to_bytes());
    V8i16::from_bytes(store(_token, _mm_adds_epi16(a, b)))
}

#[arcane]
fn sat_u_h_sse(_token: X64V3Token, v: V8u16, max: u16) -> V8u16 {
    let v = load(_token, v.to_bytes());
    V8u16::from_bytes(store(_token, _mm_min_epu16(v, _mm_set1_epi16(max as i16))))
}

#[arcane]
fn sat_s_h_sse(_token: X64V3Token, v: V8i16, min: i16, max: i16) -> V8i16 {
    let v = load(_token, v.to_bytes());
    let clamped = _mm_max_epi16(_mm_min_epi16(v, _mm_set1_epi16(max)), _mm_set1_epi16(min));
    V8i16::from_bytes(store(_token, clamped))
}

#[arcane]
fn srari_h_sse(_token: X64V3Token, v: V8i16, shift: u32) -> V8i16 {
    let v = load(_token, v.to_bytes());
    // (x >> s) + ((x >> (s - 1)) & 1) never overflows, unlike x + (1 << (s - 1)).
    let shifted = _mm_sra_epi16(v, _mm_cvtsi32_si128(shift as i32));
    let last = _mm_sra_epi16(v, _mm_cvtsi32_si128(shift as i32 - 1));
    let round = _mm_and_si128(last, _mm_set1_epi16(1));
    V8i16::from_bytes(store(_token, _mm_add_epi16(shifted, round)))
}

#[arcane]
fn srari_w_sse(_token: X64V3Token, v: V4i32, shift: u32) -> V4i32 {
    let v = load(_token, v.to_bytes());
    let shifted = _mm_sra_epi32(v, _mm_cvtsi32_si128(shift as i32));
    let last = _mm_sra_epi32(v, _mm_cvtsi32_si128(shift as i32 - 1));
    let round = _mm_and_si128(last, _mm_set1_epi32(1));
    V4i32::from_bytes(store(_token, _mm_add_epi32(shifted, round)))
}

#[arcane]
fn dotp_u_h_sse(_token: X64V3Token, a: V16u8, b: V16u8) -> V8u16 {
    let a = load(_token, a.to_bytes());
    let b = load(_token, b.to_bytes());
    let lo = _mm_set1_epi16(0x00ff);
    let (a_even, a_odd) = (_mm_and_si128(a, lo), _mm_srli_epi16(a, 8));
    let (b_even, b_odd) = (_mm_and_si128(b, lo), _mm_srli_epi16(b, 8));
    let sum = _mm_add_epi16(_mm_mullo_epi16(a_even, b_even), _mm_mullo_epi16(a_odd, b_odd));
    V8u16::from_bytes(store(_token, sum))
}

#[rite]
fn dotp_s_h_reg(_token: X64V3Token, a: __m128i, b: __m128i) -> __m128i {
    // Sign-extend even bytes by shifting them to the top first.
    let a_even = _mm_srai_epi16(_mm_slli_epi16(a, 8), 8);
    let a_odd = _mm_srai_epi16(a, 8);
    let b_even = _mm_srai_epi16(_mm_slli_epi16(b, 8), 8);
    let b_odd = _mm_srai_epi16(b, 8);
    _mm_add_epi16(_mm_mullo_epi16(a_even, b_even), _mm_mullo_epi16(a_odd, b_odd))
}

#[arcane]
fn dotp_s_h_sse(_token: X64V3Token, a: V16i8, b: V16i8) -> V8i16 {
    let a = load(_token, a.to_bytes());
    let b = load(_token, b.to_bytes());
    V8i16::from_bytes(store(_token, dotp_s_h_reg(_token, a, b)))
}

#[arcane]
fn dotp_s_w_sse(_token: X64V3Token, a: V8i16, b: V8i16) -> V4i32 {
    let a = load(_token, a.to_bytes());
    let b = load(_token, b.to_bytes());
    V4i32::from_bytes(store(_token, _mm_madd_epi16(a, b)))
}

#[arcane]
fn dpadd_s_h_sse(_token: X64V3Token, acc: V8i16, a: V16i8, b: V16i8) -> V8i16 {
    let acc = load(_token, acc.to_bytes());
    let a = load(_token, a.to_bytes());
    let b = load(_token, b.to_bytes());
    V8i16::from_bytes(store(_token, _mm_add_epi16(acc, dotp_s_h_reg(_token, a, b))))
}

#[arcane]
fn min_u_h_sse(_token: X64V3Token, a: V8u16, b: V8u16) -> V8u16 {
    let a = load(_token, a.to_bytes());
    let b = load(_token, b.to_bytes());
    V8u16::from_bytes(store(_token, _mm_min_epu16(a, b)))
}

#[arcane]
fn min_s_h_sse(_token: X64V3Token, a: V8i16, b: V8i16) -> V8i16 {
    let a = load(_token, a.to_bytes());
    let b = load(_token, b.to_bytes());
    V8i16::from_bytes(store(_token, _mm_min_epi16(a, b)))
}

#[arcane]
fn maxi_s_h_sse(_token: X64V3Token, v: V8i16, imm: i16) -> V8i16 {
    let v = load(_token, v.to_bytes());
    V8i16::from_bytes(store(_token, _mm_max_epi16(v, _mm_set1_epi16(imm))))
}

#[arcane]
fn xori_b_sse(_token: X64V3Token, v: V16u8, imm: u8) -> V16u8 {
    let v = load(_token, v.to_bytes());
    V16u8::from_bytes(store(_token, _mm_xor_si128(v, _mm_set1_epi8(imm as i8))))
}

impl Backend for X64 {
    #[inline]
    fn ilvr_b(self, ws: V16i8, wt: V16i8) -> V16i8 {
        ilvr_b_sse(self.0, ws, wt)
    }

    #[inline]
    fn ilvr_h(self, ws: V8i16, wt: V8i16) -> V8i16 {
        ilvr_h_sse(self.0, ws, wt)
    }

    #[inline]
    fn ilvr_w(self, ws: V4i32, wt: V4i32) -> V4i32 {
        ilvr_w_sse(self.0, ws, wt)
    }

    #[inline]
    fn ilvr_d(self, ws: V2i64, wt: V2i64) -> V2i64 {
        ilvr_d_sse(self.0, ws, wt)
    }

    #[inline]
    fn ilvl_b(self, ws: V16i8, wt: V16i8) -> V16i8 {
        ilvl_b_sse(self.0, ws, wt)
    }

    #[inline]
    fn ilvl_h(self, ws: V8i16, wt: V8i16) -> V8i16 {
        ilvl_h_sse(self.0, ws, wt)
    }

    #[inline]
    fn ilvl_w(self, ws: V4i32, wt: V4i32) -> V4i32 {
        ilvl_w_sse(self.0, ws, wt)
    }

    #[inline]
    fn ilvl_d(self, ws: V2i64, wt: V2i64) -> V2i64 {
        ilvl_d_sse(self.0, ws, wt)
    }

    #[inline]
    fn ilvev_b(self, ws: V16i8, wt: V16i8) -> V16i8 {
        ilvev_b_sse(self.0, ws, wt)
    }

    #[inline]
    fn ilvev_h(self, ws: V8i16, wt: V8i16) -> V8i16 {
        ilvev_h_sse(self.0, ws, wt)
    }

    #[inline]
    fn pckev_b(self, ws: V16i8, wt: V16i8) -> V16i8 {
        pckev_b_sse(self.0, ws, wt)
    }

    #[inline]
    fn pckev_h(self, ws: V8i16, wt: V8i16) -> V8i16 {
        pckev_h_sse(self.0, ws, wt)
    }

    #[inline]
    fn pckev_d(self, ws: V2i64, wt: V2i64) -> V2i64 {
        pckev_d_sse(self.0, ws, wt)
    }

    #[inline]
    fn pckod_b(self, ws: V16i8, wt: V16i8) -> V16i8 {
        pckod_b_sse(self.0, ws, wt)
    }

    #[inline]
    fn pckod_h(self, ws: V8i16, wt: V8i16) -> V8i16 {
        pckod_h_sse(self.0, ws, wt)
    }

    #[inline]
    fn pckod_d(self, ws: V2i64, wt: V2i64) -> V2i64 {
        pckod_d_sse(self.0, ws, wt)
    }

    #[inline]
    fn vshf_b(self, mask: V16i8, ws: V16i8, wt: V16i8) -> V16i8 {
        vshf_b_sse(self.0, mask, ws, wt)
    }

    #[inline]
    fn sldi_b(self, wd: V16i8, ws: V16i8, n: u32) -> V16i8 {
        debug_assert!(n < 16, "slide of {n} bytes");
        sldi_b_sse(self.0, wd, ws, n & 15)
    }

    #[inline]
    fn splati_h(self, v: V8i16, idx: u32) -> V8i16 {
        debug_assert!(idx < 8, "halfword lane {idx}");
        splati_h_sse(self.0, v, idx & 7)
    }

    #[inline]
    fn aver_u_b(self, a: V16u8, b: V16u8) -> V16u8 {
        aver_u_b_sse(self.0, a, b)
    }

    #[inline]
    fn adds_s_h(self, a: V8i16, b: V8i16) -> V8i16 {
        adds_s_h_sse(self.0, a, b)
    }

    #[inline]
    fn sat_u_h(self, v: V8u16, n: u32) -> V8u16 {
        debug_assert!(n < 16, "saturation to {} bits", n + 1);
        let max = ((1u32 << ((n & 15) + 1)) - 1) as u16;
        sat_u_h_sse(self.0, v, max)
    }

    #[inline]
    fn sat_s_h(self, v: V8i16, n: u32) -> V8i16 {
        debug_assert!(n < 16, "saturation to {} bits", n + 1);
        let n = n & 15;
        sat_s_h_sse(self.0, v, (-(1i32 << n)) as i16, ((1i32 << n) - 1) as i16)
    }

    #[inline]
    fn srari_h(self, v: V8i16, shift: u32) -> V8i16 {
        debug_assert!(shift < 16, "shift by {shift}");
        match shift & 15 {
            0 => v,
            shift => srari_h_sse(self.0, v, shift),
        }
    }

    #[inline]
    fn srari_w(self, v: V4i32, shift: u32) -> V4i32 {
        debug_assert!(shift < 32, "shift by {shift}");
        match shift & 31 {
            0 => v,
            shift => srari_w_sse(self.0, v, shift),
        }
    }

    #[inline]
    fn dotp_u_h(self, a: V16u8, b: V16u8) -> V8u16 {
        dotp_u_h_sse(self.0, a, b)
    }

    #[inline]
    fn dotp_s_h(self, a: V16i8, b: V16i8) -> V8i16 {
        dotp_s_h_sse(self.0, a, b)
    }

    #[inline]
    fn dotp_s_w(self, a: V8i16, b: V8i16) -> V4i32 {
        dotp_s_w_sse(self.0, a, b)
    }

    #[inline]
    fn dpadd_s_h(self, acc: V8i16, a: V16i8, b: V16i8) -> V8i16 {
        dpadd_s_h_sse(self.0, acc, a, b)
    }

    #[inline]
    fn min_u_h(self, a: V8u16, b: V8u16) -> V8u16 {
        min_u_h_sse(self.0, a, b)
    }

    #[inline]
    fn min_s_h(self, a: V8i16, b: V8i16) -> V8i16 {
        min_s_h_sse(self.0, a, b)
    }

    #[inline]
    fn maxi_s_h(self, v: V8i16, imm: i16) -> V8i16 {
        maxi_s_h_sse(self.0, v, imm)
    }

    #[inline]
    fn xori_b(self, v: V16u8, imm: u8) -> V16u8 {
        xori_b_sse(self.0, v, imm)
    }
}
