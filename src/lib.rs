//! qDSA signatures and key exchange on a genus-2 Kummer surface.
//!
//! This library implements the quotient Digital Signature Algorithm
//! (qDSA) over the Kummer surface of the Gaudry-Schost genus-2 curve,
//! defined over the finite field GF(2^127 - 1). A Kummer surface is the
//! quotient of the Jacobian of the curve by the map `P -> -P`: points
//! are represented by four projective coordinates, and while scalar
//! multiplication is well-defined (and fast, with a Montgomery-like
//! ladder), there is no group addition law. qDSA is a Schnorr-like
//! signature scheme whose verification equation is checked directly on
//! the Kummer surface, through a set of biquadratic relations.
//!
//! The finite field and the scalars (integers modulo the prime order of
//! the conventional base point) are implemented in `backend` and exposed
//! through `field`. The Kummer surface arithmetic (ladder, point
//! compression, and the verification check) is in `kummer`. The
//! signature and key exchange schemes are in `qdsa`.
//!
//! # Usage
//!
//! The library is `no_std` and performs no heap allocation. By default,
//! it compiles against the standard library (this only matters for the
//! `std` feature of dependencies).
//!
//! The hash function used by the schemes is a parameter: any type that
//! implements `qdsa::Hash` (a function with a 64-byte output) can be
//! used. Implementations are provided for SHAKE128 (with a 64-byte
//! output; this is the default) and SHA-512. The `sha512` feature
//! makes SHA-512 the default hash function.
//!
//! # Conventions
//!
//! All implemented functions should be strictly constant-time, unless
//! explicitly documented otherwise. In order to avoid unwanted
//! side-channel leaks, Booleans are avoided (compilers tend to
//! "optimize" things a bit too eagerly when handling `bool` values). All
//! functions that return or use a potentially secret Boolean value use
//! the `u32` type; the convention is that 0xFFFFFFFF means "true", and
//! 0x00000000 means "false". No other value shall be used, for they would
//! lead to unpredictable results. Similarly, the `Eq` or `PartialEq`
//! traits are not implemented. Signature verification, which works on
//! public data only, returns a plain `bool`.
//!
//! Algebraic operations on field elements and scalars are performed
//! with the usual operators (e.g. `+`); appropriate traits are defined
//! so that structure types and pointers to structure types can be used
//! more or less interchangeably. Throughout the code, functions that
//! modify the object on which they are called tend to have a name in
//! `set_*()` (e.g. for a field element `x`, `x.set_square()` modifies
//! `x` in place, while `x.square()` leaves `x` unmodified and returns
//! the square as a new instance).

#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub use rand_core::{CryptoRng, RngCore, Error as RngError};

macro_rules! static_assert {
    ($condition:expr) => {
        let _ = &[()][1 - ($condition) as usize];
    }
}

pub mod backend;
pub mod field;
pub mod kummer;
pub mod qdsa;
