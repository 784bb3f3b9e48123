//! 128-bit vector register types.
//!
//! Every vector is 16 bytes. Lane `i` occupies bytes `[i * w, (i + 1) * w)` of
//! the vector's byte image and is stored little-endian within the lane, so the
//! byte image is identical on every host and matches what a SIMD register
//! holds after an unaligned load on x86-64, AArch64 and little-endian MIPS.
//!
//! Vectors of different lane types reinterpret each other through
//! [`Vector::cast`], which keeps the byte image and changes only the lane view.

use core::fmt::Debug;
use core::ops::{Add, Sub};

mod sealed {
    pub trait Sealed {}
}

/// A scalar type that can occupy a vector lane or a block element.
pub trait Lane: sealed::Sealed + Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    /// Size of the lane in bytes.
    const BYTES: usize;

    /// Reads a lane from `BYTES` little-endian bytes.
    fn read_le(bytes: &[u8]) -> Self;

    /// Writes the lane as `BYTES` little-endian bytes.
    fn write_le(self, bytes: &mut [u8]);
}

macro_rules! impl_lane {
    ($($t:ty),*) => {$(
        impl sealed::Sealed for $t {}

        impl Lane for $t {
            const BYTES: usize = core::mem::size_of::<$t>();

            #[inline(always)]
            fn read_le(bytes: &[u8]) -> Self {
                <$t>::from_le_bytes(<[u8; core::mem::size_of::<$t>()]>::try_from(&bytes[..Self::BYTES]).unwrap())
            }

            #[inline(always)]
            fn write_le(self, bytes: &mut [u8]) {
                bytes[..Self::BYTES].copy_from_slice(&self.to_le_bytes());
            }
        }
    )*};
}

impl_lane!(u8, i8, u16, i16, u32, i32, u64, i64);

/// A 128-bit vector of homogeneous lanes.
pub trait Vector: Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    /// Lane element type.
    type Lane: Lane;

    /// Number of lanes.
    const LANES: usize;

    /// Builds the vector from its 16-byte image.
    fn from_bytes(bytes: [u8; 16]) -> Self;

    /// Returns the 16-byte image of the vector.
    fn to_bytes(self) -> [u8; 16];

    /// Returns lane `idx`.
    ///
    /// # Panics
    /// If `idx >= Self::LANES`.
    fn lane(self, idx: usize) -> Self::Lane;

    /// Reinterprets the register as another lane type.
    #[inline(always)]
    fn cast<R: Vector>(self) -> R {
        R::from_bytes(self.to_bytes())
    }
}

macro_rules! vector_type {
    ($(#[$meta:meta])* $name:ident, $lane:ty, $n:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        #[repr(C, align(16))]
        pub struct $name(pub [$lane; $n]);

        impl $name {
            /// Vector with every lane set to `value`.
            #[inline(always)]
            pub const fn splat(value: $lane) -> Self {
                Self([value; $n])
            }

            /// Lane array of the vector.
            #[inline(always)]
            pub const fn to_array(self) -> [$lane; $n] {
                self.0
            }
        }

        impl Vector for $name {
            type Lane = $lane;
            const LANES: usize = $n;

            #[inline(always)]
            fn from_bytes(bytes: [u8; 16]) -> Self {
                let mut lanes = [<$lane>::default(); $n];
                for (lane, chunk) in lanes.iter_mut().zip(bytes.chunks_exact(<$lane as Lane>::BYTES)) {
                    *lane = <$lane as Lane>::read_le(chunk);
                }
                Self(lanes)
            }

            #[inline(always)]
            fn to_bytes(self) -> [u8; 16] {
                let mut bytes = [0u8; 16];
                for (lane, chunk) in self.0.iter().zip(bytes.chunks_exact_mut(<$lane as Lane>::BYTES)) {
                    lane.write_le(chunk);
                }
                bytes
            }

            #[inline(always)]
            fn lane(self, idx: usize) -> $lane {
                self.0[idx]
            }
        }

        impl From<[$lane; $n]> for $name {
            #[inline(always)]
            fn from(lanes: [$lane; $n]) -> Self {
                Self(lanes)
            }
        }

        impl From<$name> for [$lane; $n] {
            #[inline(always)]
            fn from(v: $name) -> Self {
                v.0
            }
        }

        /// Lanewise wrapping addition.
        impl Add for $name {
            type Output = Self;

            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                Self(core::array::from_fn(|i| self.0[i].wrapping_add(rhs.0[i])))
            }
        }

        /// Lanewise wrapping subtraction.
        impl Sub for $name {
            type Output = Self;

            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                Self(core::array::from_fn(|i| self.0[i].wrapping_sub(rhs.0[i])))
            }
        }
    };
}

vector_type!(
    /// Sixteen unsigned bytes (`v16u8`), the pixel representation.
    V16u8, u8, 16
);
vector_type!(
    /// Sixteen signed bytes (`v16i8`), pixels after the XOR-128 range bias.
    V16i8, i8, 16
);
vector_type!(
    /// Eight unsigned halfwords (`v8u16`).
    V8u16, u16, 8
);
vector_type!(
    /// Eight signed halfwords (`v8i16`), filter and transform intermediates.
    V8i16, i16, 8
);
vector_type!(
    /// Four signed words (`v4i32`).
    V4i32, i32, 4
);
vector_type!(
    /// Two signed doublewords (`v2i64`).
    V2i64, i64, 2
);

impl V4i32 {
    /// Word lane `idx` as an unsigned value (`copy_u.w`).
    #[inline(always)]
    pub fn copy_u_w(self, idx: usize) -> u32 {
        self.0[idx & 3] as u32
    }
}

impl V2i64 {
    /// Doubleword lane `idx` as an unsigned value (`copy_u.d`).
    #[inline(always)]
    pub fn copy_u_d(self, idx: usize) -> u64 {
        self.0[idx & 1] as u64
    }
}

/// Concatenates two register arrays; used to compose wide fan-outs from
/// narrow ones.
#[inline(always)]
pub(crate) fn join<V: Copy, const A: usize, const B: usize, const N: usize>(
    lo: [V; A],
    hi: [V; B],
) -> [V; N] {
    debug_assert_eq!(A + B, N);
    core::array::from_fn(|i| if i < A { lo[i] } else { hi[i - A] })
}

/// Splits a register array into its first `H` and last `N - H` elements.
#[inline(always)]
pub(crate) fn split<V: Copy, const N: usize, const H: usize, const T: usize>(
    all: [V; N],
) -> ([V; H], [V; T]) {
    debug_assert_eq!(H + T, N);
    (
        core::array::from_fn(|i| all[i]),
        core::array::from_fn(|i| all[H + i]),
    )
}
