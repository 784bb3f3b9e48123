//! Halfword transposes built from interleave sequences.
//!
//! Rows are vectors; lane `j` of row `i` is element `(i, j)`. Each transpose
//! is a fixed network of right/left interleaves followed by a doubleword
//! merge, the same network on every backend.

use crate::backend::Backend;
use crate::reorg::{ilvl_h2, ilvr_h2, ilvr_h4, ilvrl_h2, ilvrl_w2, pckev_d4};
use crate::vector::{V2i64, V4i32, V8i16, Vector};

/// Transposes an 8-row, 4-column block.
///
/// Only lanes 0..4 of each input are read. Outputs 0..4 hold the four
/// columns (8 elements each); outputs 4..8 are zero.
pub fn transpose4x8_sh_sh<B: Backend>(be: B, rows: [V8i16; 8]) -> [V8i16; 8] {
    let [in0, in1, in2, in3, in4, in5, in6, in7] = rows;
    let [t0, t1, t2, t3]: [V8i16; 4] = ilvr_h4(be, [in1, in0, in3, in2, in5, in4, in7, in6]);
    let [m0, m2]: [V2i64; 2] = ilvrl_w2(be, t1, t0);
    let [m1, m3]: [V2i64; 2] = ilvrl_w2(be, t3, t2);

    let zero = V8i16::default();
    [
        be.ilvr_d(m1, m0).cast(),
        be.ilvl_d(m1, m0).cast(),
        be.ilvr_d(m3, m2).cast(),
        be.ilvl_d(m3, m2).cast(),
        zero,
        zero,
        zero,
        zero,
    ]
}

/// Transposes a 4-row, 8-column block.
///
/// Output `k` holds columns `2k` and `2k + 1`, four elements each.
pub fn transpose8x4_sh_sh<B: Backend>(be: B, rows: [V8i16; 4]) -> [V8i16; 4] {
    let [in0, in1, in2, in3] = rows;
    let [t0, t1]: [V8i16; 2] = ilvr_h2(be, [in1, in0, in3, in2]);
    let [t2, t3]: [V8i16; 2] = ilvl_h2(be, [in1, in0, in3, in2]);

    let (t0, t1, t2, t3): (V4i32, V4i32, V4i32, V4i32) = (t0.cast(), t1.cast(), t2.cast(), t3.cast());
    [
        be.ilvr_w(t1, t0).cast(),
        be.ilvl_w(t1, t0).cast(),
        be.ilvr_w(t3, t2).cast(),
        be.ilvl_w(t3, t2).cast(),
    ]
}

/// Transposes a square 8x8 halfword block. Applying it twice is the identity.
pub fn transpose8x8_h<B: Backend, V: Vector, R: Vector>(be: B, rows: [V; 8]) -> [R; 8] {
    let [in0, in1, in2, in3, in4, in5, in6, in7] = rows.map(|v| v.cast::<V8i16>());

    // Columns of rows 4..8.
    let [s0, s1]: [V8i16; 2] = ilvr_h2(be, [in6, in4, in7, in5]);
    let [t0, t1]: [V2i64; 2] = ilvrl_h2(be, s1, s0);
    let [s0, s1]: [V8i16; 2] = ilvl_h2(be, [in6, in4, in7, in5]);
    let [t2, t3]: [V2i64; 2] = ilvrl_h2(be, s1, s0);

    // Columns of rows 0..4.
    let [s0, s1]: [V8i16; 2] = ilvr_h2(be, [in2, in0, in3, in1]);
    let [t4, t5]: [V2i64; 2] = ilvrl_h2(be, s1, s0);
    let [s0, s1]: [V8i16; 2] = ilvl_h2(be, [in2, in0, in3, in1]);
    let [t6, t7]: [V2i64; 2] = ilvrl_h2(be, s1, s0);

    let [out0, out2, out4, out6]: [R; 4] = pckev_d4(be, [t0, t4, t1, t5, t2, t6, t3, t7]);
    [
        out0,
        be.pckod_d(t0, t4).cast(),
        out2,
        be.pckod_d(t1, t5).cast(),
        out4,
        be.pckod_d(t2, t6).cast(),
        out6,
        be.pckod_d(t3, t7).cast(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Scalar;

    fn matrix() -> [V8i16; 8] {
        core::array::from_fn(|r| V8i16(core::array::from_fn(|c| (r * 10 + c) as i16)))
    }

    #[test]
    fn square_transpose_moves_elements() {
        let m = matrix();
        let t: [V8i16; 8] = transpose8x8_h(Scalar, m);
        for r in 0..8 {
            for c in 0..8 {
                assert_eq!(t[c].0[r], m[r].0[c], "({r}, {c})");
            }
        }
    }

    #[test]
    fn square_transpose_is_involutive() {
        let m = matrix();
        let t: [V8i16; 8] = transpose8x8_h(Scalar, m);
        let back: [V8i16; 8] = transpose8x8_h(Scalar, t);
        assert_eq!(back, m);
    }

    #[test]
    fn tall_block_to_columns() {
        let m = matrix();
        let t = transpose4x8_sh_sh(Scalar, m);
        for c in 0..4 {
            let column: [i16; 8] = core::array::from_fn(|r| m[r].0[c]);
            assert_eq!(t[c].0, column, "column {c}");
        }
        assert!(t[4..].iter().all(|v| *v == V8i16::default()));
    }

    #[test]
    fn wide_block_to_column_pairs() {
        let m = matrix();
        let t = transpose8x4_sh_sh(Scalar, [m[0], m[1], m[2], m[3]]);
        assert_eq!(t[0], V8i16([0, 10, 20, 30, 1, 11, 21, 31]));
        assert_eq!(t[3], V8i16([6, 16, 26, 36, 7, 17, 27, 37]));
    }
}
