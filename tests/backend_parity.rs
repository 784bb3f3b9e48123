//! Every backend must agree with the scalar reference on every input.
//!
//! Runs each primitive on random registers through the detected backend and
//! through [`Scalar`]. On machines without the SIMD backend both paths are
//! scalar and the test is a no-op comparison.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use zenblock::{Auto, Backend, Scalar, V16i8, V16u8, V2i64, V4i32, V8i16, V8u16, Vector};

const ITERATIONS: usize = 2000;

fn random<V: Vector>(rng: &mut StdRng) -> V {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    // Bias some lanes toward the extremes where saturation and rounding bite.
    if rng.gen_bool(0.25) {
        for b in bytes.iter_mut().step_by(2) {
            *b = if rng.gen_bool(0.5) { 0x7f } else { 0x80 };
        }
    }
    V::from_bytes(bytes)
}

fn check_backend<B: Backend>(be: B, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..ITERATIONS {
        let (b0, b1, b2): (V16i8, V16i8, V16i8) = (random(&mut rng), random(&mut rng), random(&mut rng));
        let (h0, h1): (V8i16, V8i16) = (random(&mut rng), random(&mut rng));
        let (w0, w1): (V4i32, V4i32) = (random(&mut rng), random(&mut rng));
        let (d0, d1): (V2i64, V2i64) = (random(&mut rng), random(&mut rng));
        let (u0, u1): (V16u8, V16u8) = (random(&mut rng), random(&mut rng));
        let (uh0, uh1): (V8u16, V8u16) = (random(&mut rng), random(&mut rng));

        assert_eq!(be.ilvr_b(b0, b1), Scalar.ilvr_b(b0, b1));
        assert_eq!(be.ilvr_h(h0, h1), Scalar.ilvr_h(h0, h1));
        assert_eq!(be.ilvr_w(w0, w1), Scalar.ilvr_w(w0, w1));
        assert_eq!(be.ilvr_d(d0, d1), Scalar.ilvr_d(d0, d1));
        assert_eq!(be.ilvl_b(b0, b1), Scalar.ilvl_b(b0, b1));
        assert_eq!(be.ilvl_h(h0, h1), Scalar.ilvl_h(h0, h1));
        assert_eq!(be.ilvl_w(w0, w1), Scalar.ilvl_w(w0, w1));
        assert_eq!(be.ilvl_d(d0, d1), Scalar.ilvl_d(d0, d1));
        assert_eq!(be.ilvev_b(b0, b1), Scalar.ilvev_b(b0, b1));
        assert_eq!(be.ilvev_h(h0, h1), Scalar.ilvev_h(h0, h1));

        assert_eq!(be.pckev_b(b0, b1), Scalar.pckev_b(b0, b1));
        assert_eq!(be.pckev_h(h0, h1), Scalar.pckev_h(h0, h1));
        assert_eq!(be.pckev_d(d0, d1), Scalar.pckev_d(d0, d1));
        assert_eq!(be.pckod_b(b0, b1), Scalar.pckod_b(b0, b1));
        assert_eq!(be.pckod_h(h0, h1), Scalar.pckod_h(h0, h1));
        assert_eq!(be.pckod_d(d0, d1), Scalar.pckod_d(d0, d1));

        assert_eq!(be.vshf_b(b2, b0, b1), Scalar.vshf_b(b2, b0, b1), "mask {b2:?}");
        let n = rng.gen_range(0..16);
        assert_eq!(be.sldi_b(b0, b1, n), Scalar.sldi_b(b0, b1, n), "slide {n}");
        let idx = rng.gen_range(0..8);
        assert_eq!(be.splati_h(h0, idx), Scalar.splati_h(h0, idx));

        assert_eq!(be.aver_u_b(u0, u1), Scalar.aver_u_b(u0, u1));
        assert_eq!(be.adds_s_h(h0, h1), Scalar.adds_s_h(h0, h1));

        let sat = rng.gen_range(0..16);
        assert_eq!(be.sat_u_h(uh0, sat), Scalar.sat_u_h(uh0, sat), "sat {sat}");
        assert_eq!(be.sat_s_h(h0, sat), Scalar.sat_s_h(h0, sat), "sat {sat}");
        let shift = rng.gen_range(0..16);
        assert_eq!(be.srari_h(h0, shift), Scalar.srari_h(h0, shift), "shift {shift}");
        let shift = rng.gen_range(0..32);
        assert_eq!(be.srari_w(w0, shift), Scalar.srari_w(w0, shift), "shift {shift}");

        assert_eq!(be.dotp_u_h(u0, u1), Scalar.dotp_u_h(u0, u1));
        assert_eq!(be.dotp_s_h(b0, b1), Scalar.dotp_s_h(b0, b1));
        assert_eq!(be.dotp_s_w(h0, h1), Scalar.dotp_s_w(h0, h1));
        assert_eq!(be.dpadd_s_h(h0, b0, b1), Scalar.dpadd_s_h(h0, b0, b1));

        assert_eq!(be.min_u_h(uh0, uh1), Scalar.min_u_h(uh0, uh1));
        assert_eq!(be.min_s_h(h0, h1), Scalar.min_s_h(h0, h1));
        let imm: i16 = rng.gen();
        assert_eq!(be.maxi_s_h(h0, imm), Scalar.maxi_s_h(h0, imm));
        let imm: u8 = rng.gen();
        assert_eq!(be.xori_b(u0, imm), Scalar.xori_b(u0, imm));
    }
}

#[test]
fn auto_matches_scalar() {
    check_backend(Auto::detect(), 0x00c0_ffee);
}

#[test]
fn forced_scalar_auto_matches_scalar() {
    let be = Auto::scalar();
    assert!(!be.is_simd());
    check_backend(be, 7);
}

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
#[test]
fn x64_matches_scalar() {
    let Some(be) = zenblock::X64::summon() else {
        eprintln!("x86-64 v3 not available, skipping");
        return;
    };
    check_backend(be, 0xdead_beef);
}

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
#[test]
fn x64_matches_scalar_on_edge_values() {
    let Some(be) = zenblock::X64::summon() else {
        return;
    };
    let edges_h = [i16::MIN, i16::MIN + 1, -256, -1, 0, 1, 255, i16::MAX];
    let h = V8i16(edges_h);
    let r = V8i16([i16::MAX, -1, 1, i16::MIN, 0, -256, 256, 7]);
    assert_eq!(be.adds_s_h(h, r), Scalar.adds_s_h(h, r));
    assert_eq!(be.dotp_s_w(h, h), Scalar.dotp_s_w(h, h));
    for shift in 0..16 {
        assert_eq!(be.srari_h(h, shift), Scalar.srari_h(h, shift));
        assert_eq!(be.sat_s_h(h, shift), Scalar.sat_s_h(h, shift));
    }

    let b = V16i8([-128, -128, 127, 127, -1, 1, 0, 0, -128, 127, 64, -64, 2, -2, 100, -100]);
    assert_eq!(be.dotp_s_h(b, b), Scalar.dotp_s_h(b, b));
    let u = V16u8([255; 16]);
    assert_eq!(be.dotp_u_h(u, u), Scalar.dotp_u_h(u, u));
    assert_eq!(be.aver_u_b(u, V16u8([254; 16])), Scalar.aver_u_b(u, V16u8([254; 16])));

    // Every mask byte value, covering both zeroing bits.
    for base in (0..=255u8).step_by(16) {
        let mask = V16i8(core::array::from_fn(|i| base.wrapping_add(i as u8) as i8));
        assert_eq!(be.vshf_b(mask, b, h.cast()), Scalar.vshf_b(mask, b, h.cast()));
    }
}
