//! Implementations of the base field and of the scalars.
//!
//! This module provides type aliases for the structures that implement
//! the two rings used by the Kummer surface code: the base field
//! GF(2^127 - 1), and the integers modulo the prime order N of the
//! conventional base point. The implementations use 64-bit limbs; they
//! rely on `u128` products (and on the `_addcarry_u64()` and
//! `_subborrow_u64()` intrinsics on x86-64). On 32-bit architectures,
//! the code still works, but whether it is constant-time depends on how
//! the compiler implements multiplications on multi-limb integers.
//!
//! In general, the following properties apply to both types:
//!
//!  - An instance encapsulates a value; the constants `Self::ZERO` and
//!    `Self::ONE` contain the values 0 and 1, respectively.
//!
//!  - Usual arithmetic operators can be used (`+`, `-`, `*`, and the
//!    compound assignments `+=`, `-=` and `*=`), on both the raw types
//!    and references thereof. Field elements also support `/` and `/=`;
//!    division by zero is tolerated, and yields zero.
//!
//!  - Function `set_square(&mut self)` squares a value in place;
//!    `square(self) -> Self` returns the result as a new instance.
//!    Function `set_neg(&mut self)` negates the instance on which it is
//!    applied, and `set_condneg(&mut self, ctl: u32)` does so only if
//!    `ctl` is 0xFFFFFFFF.
//!
//!  - Function `set_cond(&mut self, a: &Self, ctl: u32)` sets the
//!    instance to the value of `a` if `ctl` is equal to 0xFFFFFFFF, or
//!    leaves it unmodified if `ctl` is equal to 0x00000000. Function
//!    `select(a0: &Self, a1: &Self, ctl: u32) -> Self` returns a copy of
//!    `a0` if `ctl` is 0x00000000, or a copy of `a1` if `ctl` is
//!    0xFFFFFFFF.
//!
//!  - Function `equals(self, rhs: Self) -> u32` returns 0xFFFFFFFF if
//!    `self` and `rhs` represent the same value, or 0x00000000 otherwise.
//!    Function `iszero(self) -> u32` is a specialized subcase that
//!    compares `self` with zero.
//!
//!  - Function `decode_reduce(buf: &[u8]) -> Self` decodes some bytes
//!    with unsigned little-endian convention. The obtained integer is
//!    reduced modulo the ring order, so the process never fails. Only
//!    the length of the source slice may leak through timing-based side
//!    channels.
//!
//! Field elements (`GF127`) additionally provide:
//!
//!  - `set_invert()` / `invert()`, with a fixed exponentiation chain.
//!
//!  - `sqrt(self) -> (Self, u32)`, which returns the square root with
//!    an even least significant bit and 0xFFFFFFFF on success, or zero
//!    and 0x00000000 if the value is not a quadratic residue; and
//!    `sqrt_signed(self, neg: u32)`, which returns the root of the
//!    requested "sign".
//!
//!  - `isodd(self) -> u32`, the "sign" of the value (least significant
//!    bit of its canonical representation, expanded to a mask).
//!
//!  - `mul_small(self, x: u32)` for multiplication by small constants.
//!
//!  - `encode16()` and `decode16()`, over exactly 16 bytes. Encoding
//!    is always canonical; decoding rejects non-canonical values.
//!
//! Scalars (`Scalar`) additionally provide:
//!
//!  - `mul_sub(a, b, c)`, which computes `a - b*c`.
//!
//!  - `isnegative(self) -> u32`, which returns 0xFFFFFFFF if the
//!    canonical integer representative is greater than (N-1)/2.
//!
//!  - `encode32()` and `decode32()`, over exactly 32 bytes. Encoding
//!    is always canonical; decoding rejects non-canonical values.

pub mod w64;

/// Finite field: integers modulo 2^127 - 1.
pub type GF127 = w64::GF127;

/// Scalars: integers modulo the prime order N of the Kummer base point
/// (N is slightly below 2^250).
pub type Scalar = w64::Scalar;
