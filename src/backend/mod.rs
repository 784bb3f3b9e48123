//! The instruction-level contract every backend satisfies.
//!
//! [`Backend`] has one method per register primitive the block layers are
//! built from. Lane conventions follow the MIPS MSA definitions the codec's
//! reference output was produced with:
//!
//! * Two-source operations take `(ws, wt)`. Interleaves put `wt` lanes at even
//!   output positions and `ws` lanes at odd positions. Packs put the selected
//!   `wt` lanes in the low half of the result and the `ws` lanes in the high
//!   half.
//! * "Right" means the low-index half of a register, "left" the high half.
//!
//! [`Scalar`] is the reference. Other backends must be bit-identical to it
//! for every input, which the crate's parity tests check.

mod scalar;
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
mod x86;

pub use scalar::Scalar;
#[cfg(all(feature = "simd", target_arch = "x86_64"))]
pub use x86::X64;

use crate::vector::{V16i8, V16u8, V2i64, V4i32, V8i16, V8u16};

/// Register primitives shared by all backends.
///
/// Immediate operands (`n`, `idx`, shift and saturation counts) are masked to
/// their valid range; out-of-range values trip a debug assertion.
pub trait Backend: Copy + Send + Sync {
    /// Interleave the right halves of bytes: `out[2i] = wt[i]`, `out[2i+1] = ws[i]`.
    fn ilvr_b(self, ws: V16i8, wt: V16i8) -> V16i8;
    /// Interleave the right halves of halfwords.
    fn ilvr_h(self, ws: V8i16, wt: V8i16) -> V8i16;
    /// Interleave the right halves of words.
    fn ilvr_w(self, ws: V4i32, wt: V4i32) -> V4i32;
    /// Interleave the right doublewords: `[wt[0], ws[0]]`.
    fn ilvr_d(self, ws: V2i64, wt: V2i64) -> V2i64;

    /// Interleave the left halves of bytes: `out[2i] = wt[8+i]`, `out[2i+1] = ws[8+i]`.
    fn ilvl_b(self, ws: V16i8, wt: V16i8) -> V16i8;
    /// Interleave the left halves of halfwords.
    fn ilvl_h(self, ws: V8i16, wt: V8i16) -> V8i16;
    /// Interleave the left halves of words.
    fn ilvl_w(self, ws: V4i32, wt: V4i32) -> V4i32;
    /// Interleave the left doublewords: `[wt[1], ws[1]]`.
    fn ilvl_d(self, ws: V2i64, wt: V2i64) -> V2i64;

    /// Interleave even bytes: `out[2i] = wt[2i]`, `out[2i+1] = ws[2i]`.
    fn ilvev_b(self, ws: V16i8, wt: V16i8) -> V16i8;
    /// Interleave even halfwords.
    fn ilvev_h(self, ws: V8i16, wt: V8i16) -> V8i16;

    /// Pack even bytes: `out[i] = wt[2i]`, `out[8+i] = ws[2i]`.
    fn pckev_b(self, ws: V16i8, wt: V16i8) -> V16i8;
    /// Pack even halfwords.
    fn pckev_h(self, ws: V8i16, wt: V8i16) -> V8i16;
    /// Pack even doublewords: `[wt[0], ws[0]]`.
    fn pckev_d(self, ws: V2i64, wt: V2i64) -> V2i64;
    /// Pack odd bytes: `out[i] = wt[2i+1]`, `out[8+i] = ws[2i+1]`.
    fn pckod_b(self, ws: V16i8, wt: V16i8) -> V16i8;
    /// Pack odd halfwords.
    fn pckod_h(self, ws: V8i16, wt: V8i16) -> V8i16;
    /// Pack odd doublewords: `[wt[1], ws[1]]`.
    fn pckod_d(self, ws: V2i64, wt: V2i64) -> V2i64;

    /// Byte shuffle over the 32-byte concatenation `wt ++ ws`.
    ///
    /// With `m = mask[i]`: the lane is zero when bit 6 or 7 of `m` is set,
    /// otherwise `k = m & 31` selects `wt[k]` for `k < 16` and `ws[k - 16]`
    /// above.
    fn vshf_b(self, mask: V16i8, ws: V16i8, wt: V16i8) -> V16i8;

    /// Slide by `n` bytes: `out[i] = (ws ++ wd)[i + n]`, with `n` in `0..16`.
    fn sldi_b(self, wd: V16i8, ws: V16i8, n: u32) -> V16i8;

    /// Broadcast halfword lane `idx` (`0..8`).
    fn splati_h(self, v: V8i16, idx: u32) -> V8i16;

    /// Rounding average of unsigned bytes: `(a + b + 1) >> 1` without overflow.
    fn aver_u_b(self, a: V16u8, b: V16u8) -> V16u8;

    /// Signed halfword addition saturated to `[-32768, 32767]`.
    fn adds_s_h(self, a: V8i16, b: V8i16) -> V8i16;

    /// Saturate unsigned halfwords to `n + 1` bits: `min(x, 2^(n+1) - 1)`.
    fn sat_u_h(self, v: V8u16, n: u32) -> V8u16;
    /// Saturate signed halfwords to `n + 1` bits: `[-2^n, 2^n - 1]`.
    fn sat_s_h(self, v: V8i16, n: u32) -> V8i16;

    /// Rounding arithmetic shift right of halfwords by `shift` (`0..16`).
    ///
    /// The last discarded bit is added back, which equals
    /// `(x + (1 << (shift - 1))) >> shift` in full precision.
    fn srari_h(self, v: V8i16, shift: u32) -> V8i16;
    /// Rounding arithmetic shift right of words by `shift` (`0..32`).
    fn srari_w(self, v: V4i32, shift: u32) -> V4i32;

    /// Unsigned byte dot product into unsigned halfwords, wrapping:
    /// `out[i] = a[2i]*b[2i] + a[2i+1]*b[2i+1]`.
    fn dotp_u_h(self, a: V16u8, b: V16u8) -> V8u16;
    /// Signed byte dot product into signed halfwords, wrapping.
    fn dotp_s_h(self, a: V16i8, b: V16i8) -> V8i16;
    /// Signed halfword dot product into signed words, wrapping.
    fn dotp_s_w(self, a: V8i16, b: V8i16) -> V4i32;
    /// Signed byte dot product accumulated into `acc`, wrapping.
    fn dpadd_s_h(self, acc: V8i16, a: V16i8, b: V16i8) -> V8i16;

    /// Lanewise unsigned halfword minimum.
    fn min_u_h(self, a: V8u16, b: V8u16) -> V8u16;
    /// Lanewise signed halfword minimum.
    fn min_s_h(self, a: V8i16, b: V8i16) -> V8i16;
    /// Lanewise signed halfword maximum against an immediate.
    fn maxi_s_h(self, v: V8i16, imm: i16) -> V8i16;

    /// XOR every byte with `imm`.
    fn xori_b(self, v: V16u8, imm: u8) -> V16u8;
}

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
pub(crate) type SimdTokenType = Option<archmage::X64V3Token>;

#[cfg(not(all(feature = "simd", target_arch = "x86_64")))]
pub(crate) type SimdTokenType = Option<()>;

/// Runtime-selected backend.
///
/// Holds a pre-summoned SIMD token and routes every primitive either to the
/// SIMD backend or to [`Scalar`].
#[derive(Clone, Copy)]
pub struct Auto {
    token: SimdTokenType,
}

impl core::fmt::Debug for Auto {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Auto").field("backend", &self.name()).finish()
    }
}

/// Environment variable that forces the scalar path when set to `1`.
#[cfg(feature = "std")]
pub const FORCE_SCALAR_ENV: &str = "ZENBLOCK_FORCE_SCALAR";

impl Auto {
    /// Picks the best backend for the running CPU.
    ///
    /// Detection runs once per process; later calls return the cached result.
    #[cfg(feature = "std")]
    pub fn detect() -> Self {
        static DETECTED: std::sync::OnceLock<Auto> = std::sync::OnceLock::new();
        *DETECTED.get_or_init(|| {
            if std::env::var(FORCE_SCALAR_ENV).is_ok_and(|v| v == "1") {
                log::info!("{}=1: using scalar block primitives", FORCE_SCALAR_ENV);
                return Self::scalar();
            }
            let auto = Self::summon();
            log::debug!("block primitives backend: {}", auto.name());
            auto
        })
    }

    /// Picks the best backend for the running CPU.
    #[cfg(not(feature = "std"))]
    pub fn detect() -> Self {
        Self::summon()
    }

    fn summon() -> Self {
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        {
            use archmage::SimdToken;
            Self {
                token: archmage::X64V3Token::summon(),
            }
        }
        #[cfg(not(all(feature = "simd", target_arch = "x86_64")))]
        {
            Self::scalar()
        }
    }

    /// Always routes to [`Scalar`].
    pub const fn scalar() -> Self {
        Self { token: None }
    }

    /// Whether primitives run on SIMD registers.
    pub fn is_simd(&self) -> bool {
        self.token.is_some()
    }

    /// Human-readable backend name.
    pub fn name(&self) -> &'static str {
        if self.is_simd() {
            "x86-64 v3 (128-bit)"
        } else {
            "scalar"
        }
    }
}

impl Default for Auto {
    fn default() -> Self {
        Self::detect()
    }
}

macro_rules! dispatch {
    ($(fn $name:ident(self $(, $arg:ident: $ty:ty)*) -> $ret:ty;)*) => {
        impl Backend for Auto {
            $(
                #[inline]
                fn $name(self $(, $arg: $ty)*) -> $ret {
                    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
                    if let Some(token) = self.token {
                        return X64::new(token).$name($($arg),*);
                    }
                    Scalar.$name($($arg),*)
                }
            )*
        }
    };
}

dispatch! {
    fn ilvr_b(self, ws: V16i8, wt: V16i8) -> V16i8;
    fn ilvr_h(self, ws: V8i16, wt: V8i16) -> V8i16;
    fn ilvr_w(self, ws: V4i32, wt: V4i32) -> V4i32;
    fn ilvr_d(self, ws: V2i64, wt: V2i64) -> V2i64;
    fn ilvl_b(self, ws: V16i8, wt: V16i8) -> V16i8;
    fn ilvl_h(self, ws: V8i16, wt: V8i16) -> V8i16;
    fn ilvl_w(self, ws: V4i32, wt: V4i32) -> V4i32;
    fn ilvl_d(self, ws: V2i64, wt: V2i64) -> V2i64;
    fn ilvev_b(self, ws: V16i8, wt: V16i8) -> V16i8;
    fn ilvev_h(self, ws: V8i16, wt: V8i16) -> V8i16;
    fn pckev_b(self, ws: V16i8, wt: V16i8) -> V16i8;
    fn pckev_h(self, ws: V8i16, wt: V8i16) -> V8i16;
    fn pckev_d(self, ws: V2i64, wt: V2i64) -> V2i64;
    fn pckod_b(self, ws: V16i8, wt: V16i8) -> V16i8;
    fn pckod_h(self, ws: V8i16, wt: V8i16) -> V8i16;
    fn pckod_d(self, ws: V2i64, wt: V2i64) -> V2i64;
    fn vshf_b(self, mask: V16i8, ws: V16i8, wt: V16i8) -> V16i8;
    fn sldi_b(self, wd: V16i8, ws: V16i8, n: u32) -> V16i8;
    fn splati_h(self, v: V8i16, idx: u32) -> V8i16;
    fn aver_u_b(self, a: V16u8, b: V16u8) -> V16u8;
    fn adds_s_h(self, a: V8i16, b: V8i16) -> V8i16;
    fn sat_u_h(self, v: V8u16, n: u32) -> V8u16;
    fn sat_s_h(self, v: V8i16, n: u32) -> V8i16;
    fn srari_h(self, v: V8i16, shift: u32) -> V8i16;
    fn srari_w(self, v: V4i32, shift: u32) -> V4i32;
    fn dotp_u_h(self, a: V16u8, b: V16u8) -> V8u16;
    fn dotp_s_h(self, a: V16i8, b: V16i8) -> V8i16;
    fn dotp_s_w(self, a: V8i16, b: V8i16) -> V4i32;
    fn dpadd_s_h(self, acc: V8i16, a: V16i8, b: V16i8) -> V8i16;
    fn min_u_h(self, a: V8u16, b: V8u16) -> V8u16;
    fn min_s_h(self, a: V8i16, b: V8i16) -> V8i16;
    fn maxi_s_h(self, v: V8i16, imm: i16) -> V8i16;
    fn xori_b(self, v: V16u8, imm: u8) -> V16u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_auto_reports_scalar() {
        let auto = Auto::scalar();
        assert!(!auto.is_simd());
        assert_eq!(auto.name(), "scalar");
    }

    #[test]
    fn detect_is_stable() {
        let a = Auto::detect();
        let b = Auto::detect();
        assert_eq!(a.is_simd(), b.is_simd());
    }

    #[test]
    fn auto_matches_scalar_on_interleave() {
        let a = V16i8(core::array::from_fn(|i| i as i8));
        let b = V16i8(core::array::from_fn(|i| 100 + i as i8));
        let auto = Auto::detect();
        assert_eq!(auto.ilvr_b(a, b), Scalar.ilvr_b(a, b));
        assert_eq!(auto.ilvl_b(a, b), Scalar.ilvl_b(a, b));
    }
}
