//! Butterfly stages of the inverse transforms.
//!
//! Works on anything with `Add` and `Sub`: whole vectors (lanewise, wrapping)
//! or plain integers.

use core::ops::{Add, Sub};

/// 4-point butterfly: `[in0 + in3, in1 + in2, in1 - in2, in0 - in3]`.
#[inline]
pub fn butterfly_4<T>(ins: [T; 4]) -> [T; 4]
where
    T: Add<Output = T> + Sub<Output = T> + Copy,
{
    let [in0, in1, in2, in3] = ins;
    [in0 + in3, in1 + in2, in1 - in2, in0 - in3]
}

/// 8-point butterfly.
///
/// Sums of mirrored pairs `(k, 7 - k)` fill outputs 0..4; their differences
/// fill outputs 4..8 in reverse pair order.
#[inline]
pub fn butterfly_8<T>(ins: [T; 8]) -> [T; 8]
where
    T: Add<Output = T> + Sub<Output = T> + Copy,
{
    let [in0, in1, in2, in3, in4, in5, in6, in7] = ins;
    [
        in0 + in7,
        in1 + in6,
        in2 + in5,
        in3 + in4,
        in3 - in4,
        in2 - in5,
        in1 - in6,
        in0 - in7,
    ]
}
