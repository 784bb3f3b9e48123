//! Unaligned scalar and vector access.
//!
//! All accesses go through slice indexing, so a read or write past the end of
//! the slice panics instead of touching foreign memory. Multi-byte scalars are
//! little-endian regardless of the host.

use crate::vector::{Lane, Vector};

/// Loads a halfword from the first two bytes of `src`.
///
/// # Panics
/// If `src` is shorter than 2 bytes.
#[inline(always)]
pub fn lh(src: &[u8]) -> u16 {
    u16::from_le_bytes(<[u8; 2]>::try_from(&src[..2]).unwrap())
}

/// Loads a word from the first four bytes of `src`.
///
/// # Panics
/// If `src` is shorter than 4 bytes.
#[inline(always)]
pub fn lw(src: &[u8]) -> u32 {
    u32::from_le_bytes(<[u8; 4]>::try_from(&src[..4]).unwrap())
}

/// Loads a doubleword from the first eight bytes of `src`.
///
/// # Panics
/// If `src` is shorter than 8 bytes.
#[inline(always)]
pub fn ld(src: &[u8]) -> u64 {
    u64::from_le_bytes(<[u8; 8]>::try_from(&src[..8]).unwrap())
}

/// Stores a halfword to the first two bytes of `dst`.
#[inline(always)]
pub fn sh(val: u16, dst: &mut [u8]) {
    dst[..2].copy_from_slice(&val.to_le_bytes());
}

/// Stores a word to the first four bytes of `dst`.
#[inline(always)]
pub fn sw(val: u32, dst: &mut [u8]) {
    dst[..4].copy_from_slice(&val.to_le_bytes());
}

/// Stores a doubleword to the first eight bytes of `dst`.
#[inline(always)]
pub fn sd(val: u64, dst: &mut [u8]) {
    dst[..8].copy_from_slice(&val.to_le_bytes());
}

/// Stores four words at `dst`, `dst + stride`, `dst + 2 * stride` and
/// `dst + 3 * stride`.
#[inline]
pub fn sw4(vals: [u32; 4], dst: &mut [u8], stride: usize) {
    for (row, val) in vals.into_iter().enumerate() {
        sw(val, &mut dst[row * stride..]);
    }
}

/// Stores four doublewords at stride.
#[inline]
pub fn sd4(vals: [u64; 4], dst: &mut [u8], stride: usize) {
    for (row, val) in vals.into_iter().enumerate() {
        sd(val, &mut dst[row * stride..]);
    }
}

/// Loads one 16-byte vector from the first `16 / size_of::<T>()` elements of
/// `src`.
///
/// The element type only fixes how many elements the vector spans; the
/// result can be any lane view.
///
/// # Panics
/// If `src` holds fewer than 16 bytes' worth of elements.
#[inline(always)]
pub fn ld_v<T: Lane, V: Vector>(src: &[T]) -> V {
    let lanes = 16 / T::BYTES;
    let mut bytes = [0u8; 16];
    for (elem, chunk) in src[..lanes].iter().zip(bytes.chunks_exact_mut(T::BYTES)) {
        elem.write_le(chunk);
    }
    V::from_bytes(bytes)
}

/// Stores one 16-byte vector to the first `16 / size_of::<T>()` elements of
/// `dst`.
///
/// # Panics
/// If `dst` holds fewer than 16 bytes' worth of elements.
#[inline(always)]
pub fn st_v<T: Lane, V: Vector>(v: V, dst: &mut [T]) {
    let lanes = 16 / T::BYTES;
    let bytes = v.to_bytes();
    for (elem, chunk) in dst[..lanes].iter_mut().zip(bytes.chunks_exact(T::BYTES)) {
        *elem = T::read_le(chunk);
    }
}

/// Loads 16 bytes (`LD_B`).
#[inline(always)]
pub fn ld_b<V: Vector>(src: &[u8]) -> V {
    ld_v(src)
}

/// Loads 8 halfwords (`LD_H`).
#[inline(always)]
pub fn ld_h<V: Vector>(src: &[i16]) -> V {
    ld_v(src)
}

/// Loads 4 words (`LD_W`).
#[inline(always)]
pub fn ld_w<V: Vector>(src: &[i32]) -> V {
    ld_v(src)
}

/// Stores 16 bytes (`ST_B`).
#[inline(always)]
pub fn st_b<V: Vector>(v: V, dst: &mut [u8]) {
    st_v(v, dst)
}

/// Stores 8 halfwords (`ST_H`).
#[inline(always)]
pub fn st_h<V: Vector>(v: V, dst: &mut [i16]) {
    st_v(v, dst)
}

/// Stores 4 words (`ST_W`).
#[inline(always)]
pub fn st_w<V: Vector>(v: V, dst: &mut [i32]) {
    st_v(v, dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{V16u8, V4i32, V8i16};

    #[test]
    fn scalar_access_is_little_endian_and_unaligned() {
        let buf: [u8; 11] = [0xaa, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        assert_eq!(lh(&buf[1..]), 0x0201);
        assert_eq!(lw(&buf[1..]), 0x0403_0201);
        assert_eq!(ld(&buf[3..]), 0x0a09_0807_0605_0403);

        let mut out = [0u8; 9];
        sd(0x0807_0605_0403_0201, &mut out[1..]);
        assert_eq!(out, [0, 1, 2, 3, 4, 5, 6, 7, 8]);
        sh(0xbeef, &mut out[7..]);
        assert_eq!(&out[7..], &[0xef, 0xbe]);
    }

    #[test]
    #[should_panic]
    fn short_slice_panics() {
        let buf = [0u8; 3];
        let _ = lw(&buf);
    }

    #[test]
    fn strided_scalar_stores() {
        let mut out = [0u8; 4 * 6];
        sw4([0x0101_0101, 0x0202_0202, 0x0303_0303, 0x0404_0404], &mut out, 6);
        assert_eq!(&out[0..6], &[1, 1, 1, 1, 0, 0]);
        assert_eq!(&out[18..24], &[4, 4, 4, 4, 0, 0]);

        let mut wide = [0u8; 8 * 4];
        sd4([1, 2, 3, 4], &mut wide, 8);
        assert_eq!(wide[0], 1);
        assert_eq!(wide[24], 4);
    }

    #[test]
    fn vector_load_store_by_element_type() {
        let src: [i16; 9] = [0, 1, -1, 3, 4, 5, 6, 7, 99];
        let v: V8i16 = ld_h(&src);
        assert_eq!(v, V8i16([0, 1, -1, 3, 4, 5, 6, 7]));

        let bytes: V16u8 = ld_h(&src);
        assert_eq!(&bytes.0[..6], &[0, 0, 1, 0, 0xff, 0xff]);

        let mut dst = [0i32; 5];
        st_w(V4i32([1, -2, 3, -4]), &mut dst);
        assert_eq!(dst, [1, -2, 3, -4, 0]);
        let w: V4i32 = ld_w(&dst);
        assert_eq!(w, V4i32([1, -2, 3, -4]));

        let mut raw = [0u8; 16];
        st_b(v, &mut raw);
        let back: V8i16 = ld_b(&raw);
        assert_eq!(back, v);
    }
}
