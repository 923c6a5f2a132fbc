use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use core::convert::TryFrom;

use super::{addcarry_u64, subborrow_u64, umull_add, umull_add2};

/// Integers modulo the order N of the Kummer base point.
///
/// N = 2^250 - 0x334D69820C75294D2C27FC9F9A154FF47730B4B840C05BD is a
/// 250-bit prime. Values are kept in Montgomery representation (x*2^256
/// mod N), always fully reduced.
#[derive(Clone, Copy, Debug)]
pub struct Scalar([u64; 4]);

// Modulus limbs (low-to-high order).
const N0: u64 = 0xB88CF4B47BF3FA43;
const N1: u64 = 0x2D3D8036065EAB00;
const N2: u64 = 0xFCCB2967DF38AD6B;
const N3: u64 = 0x03FFFFFFFFFFFFFF;

impl Scalar {

    // Montgomery multiplication assumes N < 2^255 (a single conditional
    // subtraction normalizes the result, and additions cannot overflow).
    #[allow(dead_code)]
    const COMPILE_TIME_CHECKS: () = Self::compile_time_checks();
    const fn compile_time_checks() {
        static_assert!((N0 & 1) != 0);
        static_assert!(N3 < 0x4000000000000000);
    }

    // Modulus, in base 2^64 (low-to-high order).
    pub const MODULUS: [u64; 4] = [ N0, N1, N2, N3 ];

    // Encoding length (in bytes).
    pub const ENC_LEN: usize = 32;

    pub const ZERO: Scalar = Scalar([ 0, 0, 0, 0 ]);
    pub const ONE: Scalar = Scalar::w64le(1, 0, 0, 0);

    // -1/N mod 2^64
    const M0I: u64 = Self::make_m0i();

    // 2^512 mod N (Montgomery representation of 2^256)
    const R2: Scalar = Scalar::make_r2();

    // Create a scalar from its four 64-bit limbs (little-endian order).
    // The value is implicitly reduced modulo N. This function can be
    // used in constant expressions; from_w64le() yields the same result
    // at runtime and is faster.
    pub const fn w64le(x0: u64, x1: u64, x2: u64, x3: u64) -> Self {
        Self::const_mmul(Self([ x0, x1, x2, x3 ]), Self::R2)
    }

    // Create a scalar from its four 64-bit limbs (little-endian order).
    // The value is implicitly reduced modulo N.
    #[inline(always)]
    pub fn from_w64le(x0: u64, x1: u64, x2: u64, x3: u64) -> Self {
        let mut r = Self([ x0, x1, x2, x3 ]);
        r.set_mul(&Self::R2);
        r
    }

    // Create a scalar by converting the provided integer.
    #[inline(always)]
    pub fn from_u32(x: u32) -> Self {
        Self::from_w64le(x as u64, 0, 0, 0)
    }

    // Create a scalar by converting the provided integer.
    #[inline(always)]
    pub fn from_u64(x: u64) -> Self {
        Self::from_w64le(x, 0, 0, 0)
    }

    // Create a scalar by converting the provided integer.
    #[inline(always)]
    pub fn from_u128(x: u128) -> Self {
        Self::from_w64le(x as u64, (x >> 64) as u64, 0, 0)
    }

    #[inline(always)]
    fn set_add(&mut self, rhs: &Self) {
        // Both operands are lower than N < 2^250, the sum fits.
        let (d0, cc) = addcarry_u64(self.0[0], rhs.0[0], 0);
        let (d1, cc) = addcarry_u64(self.0[1], rhs.0[1], cc);
        let (d2, cc) = addcarry_u64(self.0[2], rhs.0[2], cc);
        let (d3, _)  = addcarry_u64(self.0[3], rhs.0[3], cc);

        // Subtract the modulus, then add it back if the result was
        // negative.
        let (e0, cc) = subborrow_u64(d0, N0, 0);
        let (e1, cc) = subborrow_u64(d1, N1, cc);
        let (e2, cc) = subborrow_u64(d2, N2, cc);
        let (e3, cc) = subborrow_u64(d3, N3, cc);
        let w = (cc as u64).wrapping_neg();
        let (d0, cc) = addcarry_u64(e0, w & N0, 0);
        let (d1, cc) = addcarry_u64(e1, w & N1, cc);
        let (d2, cc) = addcarry_u64(e2, w & N2, cc);
        let (d3, _)  = addcarry_u64(e3, w & N3, cc);

        self.0 = [ d0, d1, d2, d3 ];
    }

    #[inline(always)]
    fn set_sub(&mut self, rhs: &Self) {
        let (d0, cc) = subborrow_u64(self.0[0], rhs.0[0], 0);
        let (d1, cc) = subborrow_u64(self.0[1], rhs.0[1], cc);
        let (d2, cc) = subborrow_u64(self.0[2], rhs.0[2], cc);
        let (d3, cc) = subborrow_u64(self.0[3], rhs.0[3], cc);

        // Add back the modulus if there was a borrow.
        let w = (cc as u64).wrapping_neg();
        let (d0, cc) = addcarry_u64(d0, w & N0, 0);
        let (d1, cc) = addcarry_u64(d1, w & N1, cc);
        let (d2, cc) = addcarry_u64(d2, w & N2, cc);
        let (d3, _)  = addcarry_u64(d3, w & N3, cc);

        self.0 = [ d0, d1, d2, d3 ];
    }

    // Negate this value (in place).
    #[inline(always)]
    pub fn set_neg(&mut self) {
        let mut r = Self::ZERO;
        r.set_sub(self);
        *self = r;
    }

    // Conditionally negate this value (in place): the value is negated
    // if ctl == 0xFFFFFFFF, unchanged if ctl == 0x00000000.
    #[inline(always)]
    pub fn set_condneg(&mut self, ctl: u32) {
        let mut y = *self;
        y.set_neg();
        self.set_cond(&y, ctl);
    }

    // Conditionally copy the provided value ('a') into self:
    //  - If ctl == 0xFFFFFFFF, then the value of 'a' is copied into self.
    //  - If ctl == 0, then the value of self is unchanged.
    // ctl MUST be equal to 0 or 0xFFFFFFFF.
    #[inline(always)]
    pub fn set_cond(&mut self, a: &Self, ctl: u32) {
        let cw = ((ctl as i32) as i64) as u64;
        self.0[0] ^= cw & (self.0[0] ^ a.0[0]);
        self.0[1] ^= cw & (self.0[1] ^ a.0[1]);
        self.0[2] ^= cw & (self.0[2] ^ a.0[2]);
        self.0[3] ^= cw & (self.0[3] ^ a.0[3]);
    }

    // Return a value equal to either a0 (if ctl == 0) or a1 (if
    // ctl == 0xFFFFFFFF). Value ctl MUST be either 0 or 0xFFFFFFFF.
    #[inline(always)]
    pub fn select(a0: &Self, a1: &Self, ctl: u32) -> Self {
        let mut r = *a0;
        r.set_cond(a1, ctl);
        r
    }

    // Montgomery reduction (division by 2^256). Input must be normalized;
    // output is normalized.
    #[inline(always)]
    fn set_montyred(&mut self) {
        let (mut d0, mut d1, mut d2, mut d3) =
            (self.0[0], self.0[1], self.0[2], self.0[3]);

        // Each round computes d <- (d + f*N) / 2^64 for the f that makes
        // the division exact; the value stays on four limbs, and after
        // four rounds it is (x + f'*N) / 2^256 < N.
        for _ in 0..4 {
            let f = d0.wrapping_mul(Self::M0I);
            let (_, hi)  = umull_add(f, N0, d0);
            let (e0, hi) = umull_add2(f, N1, d1, hi);
            let (e1, hi) = umull_add2(f, N2, d2, hi);
            let (e2, e3) = umull_add2(f, N3, d3, hi);
            d0 = e0;
            d1 = e1;
            d2 = e2;
            d3 = e3;
        }

        self.0 = [ d0, d1, d2, d3 ];
    }

    // Montgomery multiplication:
    //    self <- (self * rhs) / 2^256 mod N
    // rhs must be normalized (lower than N); self may range up to
    // 2^256 - 1. Output is normalized.
    #[inline(always)]
    fn set_mul(&mut self, rhs: &Self) {
        let b = rhs.0;
        let (mut d0, mut d1, mut d2, mut d3) = (0u64, 0u64, 0u64, 0u64);

        // Invariant: d <= 2*N - 1 at the start of each round; since
        // N < 2^255, d always fits on four limbs and d + aj*b on five.
        for j in 0..4 {
            let aj = self.0[j];
            let (e0, hi) = umull_add(aj, b[0], d0);
            let (e1, hi) = umull_add2(aj, b[1], d1, hi);
            let (e2, hi) = umull_add2(aj, b[2], d2, hi);
            let (e3, e4) = umull_add2(aj, b[3], d3, hi);
            let f = e0.wrapping_mul(Self::M0I);
            let (_, hi)  = umull_add(f, N0, e0);
            let (e0, hi) = umull_add2(f, N1, e1, hi);
            let (e1, hi) = umull_add2(f, N2, e2, hi);
            let (e2, hi) = umull_add2(f, N3, e3, hi);
            d0 = e0;
            d1 = e1;
            d2 = e2;
            d3 = e4.wrapping_add(hi);
        }

        // Subtract N if needed.
        let (_, cc) = subborrow_u64(d0, N0, 0);
        let (_, cc) = subborrow_u64(d1, N1, cc);
        let (_, cc) = subborrow_u64(d2, N2, cc);
        let (_, cc) = subborrow_u64(d3, N3, cc);
        let w = (cc as u64).wrapping_sub(1);
        let (d0, cc) = subborrow_u64(d0, w & N0, 0);
        let (d1, cc) = subborrow_u64(d1, w & N1, cc);
        let (d2, cc) = subborrow_u64(d2, w & N2, cc);
        let (d3, _)  = subborrow_u64(d3, w & N3, cc);

        self.0 = [ d0, d1, d2, d3 ];
    }

    // Square this value (in place).
    #[inline(always)]
    pub fn set_square(&mut self) {
        let r = *self;
        self.set_mul(&r);
    }

    // Square this value.
    #[inline(always)]
    pub fn square(self) -> Self {
        let mut r = self;
        r.set_square();
        r
    }

    // Compute a - b*c (mod N). This is the combination used to build
    // the response value of a signature.
    #[inline]
    pub fn mul_sub(a: &Self, b: &Self, c: &Self) -> Self {
        let mut r = *b;
        r.set_mul(c);
        let mut d = *a;
        d.set_sub(&r);
        d
    }

    // Get the plain integer (not in Montgomery representation), in the
    // 0..N-1 range.
    #[inline(always)]
    fn to_limbs(self) -> [u64; 4] {
        let mut r = self;
        r.set_montyred();
        r.0
    }

    // Return 0xFFFFFFFF if this scalar is "negative", i.e. its integer
    // representative (in 0..N-1) is greater than (N-1)/2; return 0
    // otherwise. Exactly one of x and -x is negative, for any non-zero x.
    #[inline]
    pub fn isnegative(self) -> u32 {
        // x > (N-1)/2 if and only if 2*x >= N (N is odd). Since
        // x < 2^250, 2*x fits on four limbs.
        let x = self.to_limbs();
        let d0 = x[0] << 1;
        let d1 = (x[1] << 1) | (x[0] >> 63);
        let d2 = (x[2] << 1) | (x[1] >> 63);
        let d3 = (x[3] << 1) | (x[2] >> 63);
        let (_, cc) = subborrow_u64(d0, N0, 0);
        let (_, cc) = subborrow_u64(d1, N1, cc);
        let (_, cc) = subborrow_u64(d2, N2, cc);
        let (_, cc) = subborrow_u64(d3, N3, cc);
        (cc as u32).wrapping_sub(1)
    }

    // Equality check between two scalars (constant-time); returned value
    // is 0xFFFFFFFF on equality, 0 otherwise.
    #[inline]
    pub fn equals(self, rhs: Self) -> u32 {
        let r = (self.0[0] ^ rhs.0[0])
              | (self.0[1] ^ rhs.0[1])
              | (self.0[2] ^ rhs.0[2])
              | (self.0[3] ^ rhs.0[3]);
        ((r | r.wrapping_neg()) >> 63).wrapping_sub(1) as u32
    }

    // Compare this value with zero (constant-time); returned value
    // is 0xFFFFFFFF if this scalar is zero, 0 otherwise.
    #[inline]
    pub fn iszero(self) -> u32 {
        let r = self.0[0] | self.0[1] | self.0[2] | self.0[3];
        ((r | r.wrapping_neg()) >> 63).wrapping_sub(1) as u32
    }

    #[inline(always)]
    fn set_raw32(&mut self, buf: &[u8]) {
        debug_assert!(buf.len() == 32);
        self.0[0] = u64::from_le_bytes(*<&[u8; 8]>::try_from(&buf[ 0.. 8]).unwrap());
        self.0[1] = u64::from_le_bytes(*<&[u8; 8]>::try_from(&buf[ 8..16]).unwrap());
        self.0[2] = u64::from_le_bytes(*<&[u8; 8]>::try_from(&buf[16..24]).unwrap());
        self.0[3] = u64::from_le_bytes(*<&[u8; 8]>::try_from(&buf[24..32]).unwrap());
    }

    // Set the value by decoding exactly 32 bytes in little-endian
    // convention; the value is implicitly reduced modulo N.
    #[inline]
    fn set_decode32_reduce(&mut self, buf: &[u8]) {
        self.set_raw32(buf);

        // Montgomery multiplication implies automatic reduction.
        self.set_mul(&Self::R2);
    }

    // Encode this scalar over exactly 32 bytes (unsigned little-endian
    // convention, canonical value in 0..N-1; the top six bits of the
    // last byte are always zero).
    #[inline]
    pub fn encode32(self) -> [u8; 32] {
        let x = self.to_limbs();
        let mut d = [0u8; 32];
        d[ 0.. 8].copy_from_slice(&x[0].to_le_bytes());
        d[ 8..16].copy_from_slice(&x[1].to_le_bytes());
        d[16..24].copy_from_slice(&x[2].to_le_bytes());
        d[24..32].copy_from_slice(&x[3].to_le_bytes());
        d
    }

    // Decode a scalar from exactly 32 bytes (little-endian). If the
    // provided slice does not have length exactly 32 bytes, or if the
    // value is not strictly lower than N, then the decoding fails: this
    // scalar is set to zero, and 0 is returned. Otherwise, this scalar
    // is set to the decoded value, and 0xFFFFFFFF is returned.
    #[inline]
    pub fn set_decode32(&mut self, buf: &[u8]) -> u32 {
        *self = Self::ZERO;
        if buf.len() != 32 {
            return 0;
        }
        self.set_raw32(buf);

        // Clear the value if not canonical.
        let (_, cc) = subborrow_u64(self.0[0], N0, 0);
        let (_, cc) = subborrow_u64(self.0[1], N1, cc);
        let (_, cc) = subborrow_u64(self.0[2], N2, cc);
        let (_, cc) = subborrow_u64(self.0[3], N3, cc);
        let w = (cc as u64).wrapping_neg();
        self.0[0] &= w;
        self.0[1] &= w;
        self.0[2] &= w;
        self.0[3] &= w;

        self.set_mul(&Self::R2);
        w as u32
    }

    // Decode a scalar from exactly 32 bytes (little-endian, strict).
    // Returned values are (r, cc): on success, r is the decoded scalar
    // and cc == 0xFFFFFFFF; on failure, r is zero and cc == 0.
    #[inline]
    pub fn decode32(buf: &[u8]) -> (Self, u32) {
        let mut r = Self::ZERO;
        let cc = r.set_decode32(buf);
        (r, cc)
    }

    // Decode a scalar from exactly 32 bytes (little-endian, strict).
    // `None` is returned if the slice length is wrong or the value is
    // not lower than N.
    #[inline]
    pub fn decode(buf: &[u8]) -> Option<Self> {
        let (r, cc) = Self::decode32(buf);
        if cc != 0 {
            Some(r)
        } else {
            None
        }
    }

    // Decode a scalar from some bytes. The bytes are interpreted in
    // unsigned little-endian convention, and the resulting integer is
    // reduced modulo N. This process never fails. Only the length of the
    // source may leak through timing.
    pub fn set_decode_reduce(&mut self, buf: &[u8]) {
        *self = Self::ZERO;
        let mut n = buf.len();
        if n == 0 {
            return;
        }
        if (n & 31) != 0 {
            let k = n & !(31 as usize);
            let mut tmp = [0u8; 32];
            tmp[..(n - k)].copy_from_slice(&buf[k..]);
            n = k;
            self.set_decode32_reduce(&tmp);
        } else {
            n -= 32;
            self.set_decode32_reduce(&buf[n..]);
        }

        // acc <- acc*2^256 + chunk; the multiplication by R2 followed
        // by the Montgomery division is a multiplication by 2^256.
        while n > 0 {
            n -= 32;
            let mut d = Self::ZERO;
            d.set_decode32_reduce(&buf[n..n + 32]);
            self.set_mul(&Self::R2);
            self.set_add(&d);
        }
    }

    // Decode a scalar from some bytes (unsigned little-endian, reduced
    // modulo N). This process never fails.
    #[inline(always)]
    pub fn decode_reduce(buf: &[u8]) -> Self {
        let mut r = Self::ZERO;
        r.set_decode_reduce(buf);
        r
    }

    // Compute -1/N0 mod 2^64 (Newton iteration; five steps bring the
    // precision from 5 to 64+ bits).
    const fn make_m0i() -> u64 {
        let y = 2u64.wrapping_sub(N0);
        let y = y.wrapping_mul(2u64.wrapping_sub(y.wrapping_mul(N0)));
        let y = y.wrapping_mul(2u64.wrapping_sub(y.wrapping_mul(N0)));
        let y = y.wrapping_mul(2u64.wrapping_sub(y.wrapping_mul(N0)));
        let y = y.wrapping_mul(2u64.wrapping_sub(y.wrapping_mul(N0)));
        let y = y.wrapping_mul(2u64.wrapping_sub(y.wrapping_mul(N0)));
        y.wrapping_neg()
    }

    // Given d = d0..d4 with d < 2*N, return d mod N. Constant-time.
    const fn const_mred1(d: [u64; 5]) -> [u64; 4] {
        let mut e = [0u64; 4];
        let mut cc = 0u64;
        let mut i = 0;
        while i < 4 {
            let z = (d[i] as u128)
                .wrapping_sub(Self::MODULUS[i] as u128)
                .wrapping_sub(cc as u128);
            e[i] = z as u64;
            cc = (z >> 127) as u64;
            i += 1;
        }

        // e4 is -1 if d was lower than N (keep d), 0 otherwise.
        let e4 = d[4].wrapping_sub(cc);
        let mut r = [0u64; 4];
        let mut i = 0;
        while i < 4 {
            r[i] = e[i] ^ (e4 & (e[i] ^ d[i]));
            i += 1;
        }
        r
    }

    // Montgomery multiplication in constant contexts: returns a*b/2^256
    // mod N, with b < N and a arbitrary. It is constant-time, but slower
    // than set_mul().
    const fn const_mmul(a: Self, b: Self) -> Self {
        let mut d = [0u64; 5];
        let mut j = 0;
        while j < 4 {
            // d <- d + aj*b
            let aj = a.0[j] as u128;
            let mut hi = 0u128;
            let mut i = 0;
            while i < 4 {
                let z = aj * (b.0[i] as u128) + (d[i] as u128) + hi;
                d[i] = z as u64;
                hi = z >> 64;
                i += 1;
            }
            let z = (d[4] as u128) + hi;
            d[4] = z as u64;
            let d5 = (z >> 64) as u64;

            // d <- (d + f*N) / 2^64
            let f = (d[0].wrapping_mul(Self::M0I)) as u128;
            let mut hi = (f * (Self::MODULUS[0] as u128) + (d[0] as u128)) >> 64;
            let mut i = 1;
            while i < 4 {
                let z = f * (Self::MODULUS[i] as u128) + (d[i] as u128) + hi;
                d[i - 1] = z as u64;
                hi = z >> 64;
                i += 1;
            }
            let z = (d[4] as u128) + hi;
            d[3] = z as u64;
            d[4] = d5 + ((z >> 64) as u64);
            j += 1;
        }
        Self(Self::const_mred1(d))
    }

    // Compute R2 = 2^512 mod N (compile-time).
    const fn make_r2() -> Self {
        // Start from 2^192 (lower than N), double it 65 times to get
        // 2^257 mod N (the Montgomery representation of 2), then apply
        // 8 Montgomery squarings to get the representation of 2^256.
        let mut a = [0u64, 0, 0, 1];
        let mut i = 0;
        while i < 65 {
            let d = [
                a[0] << 1,
                (a[0] >> 63) | (a[1] << 1),
                (a[1] >> 63) | (a[2] << 1),
                (a[2] >> 63) | (a[3] << 1),
                a[3] >> 63,
            ];
            a = Self::const_mred1(d);
            i += 1;
        }
        let mut r = Self(a);
        let mut i = 0;
        while i < 8 {
            r = Self::const_mmul(r, r);
            i += 1;
        }
        r
    }
}

// ========================================================================
// Implementations of all the traits needed to use the simple operators
// (+, *, /...) on scalar instances, with or without references.

impl Add<Scalar> for Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn add(self, other: Scalar) -> Scalar {
        let mut r = self;
        r.set_add(&other);
        r
    }
}

impl Add<&Scalar> for Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn add(self, other: &Scalar) -> Scalar {
        let mut r = self;
        r.set_add(other);
        r
    }
}

impl Add<Scalar> for &Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn add(self, other: Scalar) -> Scalar {
        let mut r = *self;
        r.set_add(&other);
        r
    }
}

impl Add<&Scalar> for &Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn add(self, other: &Scalar) -> Scalar {
        let mut r = *self;
        r.set_add(other);
        r
    }
}

impl AddAssign<Scalar> for Scalar {
    #[inline(always)]
    fn add_assign(&mut self, other: Scalar) {
        self.set_add(&other);
    }
}

impl AddAssign<&Scalar> for Scalar {
    #[inline(always)]
    fn add_assign(&mut self, other: &Scalar) {
        self.set_add(other);
    }
}

impl Mul<Scalar> for Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn mul(self, other: Scalar) -> Scalar {
        let mut r = self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&Scalar> for Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn mul(self, other: &Scalar) -> Scalar {
        let mut r = self;
        r.set_mul(other);
        r
    }
}

impl Mul<Scalar> for &Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn mul(self, other: Scalar) -> Scalar {
        let mut r = *self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&Scalar> for &Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn mul(self, other: &Scalar) -> Scalar {
        let mut r = *self;
        r.set_mul(other);
        r
    }
}

impl MulAssign<Scalar> for Scalar {
    #[inline(always)]
    fn mul_assign(&mut self, other: Scalar) {
        self.set_mul(&other);
    }
}

impl MulAssign<&Scalar> for Scalar {
    #[inline(always)]
    fn mul_assign(&mut self, other: &Scalar) {
        self.set_mul(other);
    }
}

impl Neg for Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn neg(self) -> Scalar {
        let mut r = self;
        r.set_neg();
        r
    }
}

impl Neg for &Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn neg(self) -> Scalar {
        let mut r = *self;
        r.set_neg();
        r
    }
}

impl Sub<Scalar> for Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn sub(self, other: Scalar) -> Scalar {
        let mut r = self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&Scalar> for Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn sub(self, other: &Scalar) -> Scalar {
        let mut r = self;
        r.set_sub(other);
        r
    }
}

impl Sub<Scalar> for &Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn sub(self, other: Scalar) -> Scalar {
        let mut r = *self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&Scalar> for &Scalar {
    type Output = Scalar;

    #[inline(always)]
    fn sub(self, other: &Scalar) -> Scalar {
        let mut r = *self;
        r.set_sub(other);
        r
    }
}

impl SubAssign<Scalar> for Scalar {
    #[inline(always)]
    fn sub_assign(&mut self, other: Scalar) {
        self.set_sub(&other);
    }
}

impl SubAssign<&Scalar> for Scalar {
    #[inline(always)]
    fn sub_assign(&mut self, other: &Scalar) {
        self.set_sub(other);
    }
}

// ========================================================================

#[cfg(test)]
mod tests {

    use super::Scalar;
    use num_bigint::{BigInt, Sign};
    use sha2::{Sha256, Digest};

    fn order() -> BigInt {
        let m = Scalar::MODULUS;
        BigInt::from_slice(Sign::Plus, &[
            m[0] as u32, (m[0] >> 32) as u32,
            m[1] as u32, (m[1] >> 32) as u32,
            m[2] as u32, (m[2] >> 32) as u32,
            m[3] as u32, (m[3] >> 32) as u32,
        ])
    }

    fn tobig(x: Scalar) -> BigInt {
        BigInt::from_bytes_le(Sign::Plus, &x.encode32())
    }

    // va, vb and vx must be 32 bytes each in length
    fn check_scalar_ops(va: &[u8], vb: &[u8], vx: &[u8]) {
        let zn = order();
        let znz = &zn << 64;

        let a = Scalar::decode_reduce(va);
        let b = Scalar::decode_reduce(vb);
        let x = Scalar::decode_reduce(vx);
        let za = BigInt::from_bytes_le(Sign::Plus, va);
        let zb = BigInt::from_bytes_le(Sign::Plus, vb);
        let zx = BigInt::from_bytes_le(Sign::Plus, vx);

        assert!(tobig(a) == &za % &zn);
        assert!(tobig(a + b) == (&za + &zb) % &zn);
        assert!(tobig(a - b) == ((&znz + &za) - &zb) % &zn);
        assert!(tobig(-a) == (&znz - &za) % &zn);
        assert!(tobig(a * b) == (&za * &zb) % &zn);
        assert!(tobig(a.square()) == (&za * &za) % &zn);
        assert!(tobig(Scalar::mul_sub(&a, &b, &x))
            == ((&znz * &znz + &za) - &zb * &zx) % &zn);

        // "Negative" values are those above (N-1)/2.
        let za_red = &za % &zn;
        let neg = (&za_red << 1) > zn;
        assert!(a.isnegative() == if neg { 0xFFFFFFFF } else { 0 });
        let mut c = a;
        c.set_condneg(a.isnegative());
        assert!(c.isnegative() == 0);
        assert!(tobig(c) == if neg { &zn - &za_red } else { za_red.clone() });

        let (e, cc) = Scalar::decode32(va);
        if za < zn {
            assert!(cc == 0xFFFFFFFF);
            assert!(e.encode32() == va);
            assert!(Scalar::decode(va).is_some());
        } else {
            assert!(cc == 0);
            assert!(e.iszero() == 0xFFFFFFFF);
            assert!(Scalar::decode(va).is_none());
        }

        let mut tmp = [0u8; 96];
        tmp[0..32].copy_from_slice(va);
        tmp[32..64].copy_from_slice(vb);
        tmp[64..96].copy_from_slice(vx);
        for k in 0..97 {
            let c = Scalar::decode_reduce(&tmp[0..k]);
            let zc = BigInt::from_bytes_le(Sign::Plus, &tmp[0..k]) % &zn;
            assert!(tobig(c) == zc);
        }
    }

    #[test]
    fn scalar_ops() {
        let mut va = [0u8; 32];
        let mut vb = [0u8; 32];
        let mut vx = [0u8; 32];
        check_scalar_ops(&va, &vb, &vx);
        assert!(Scalar::decode_reduce(&va).iszero() == 0xFFFFFFFF);
        for i in 0..32 {
            va[i] = 0xFF;
            vb[i] = 0xFF;
            vx[i] = 0xFF;
        }
        check_scalar_ops(&va, &vb, &vx);

        // N itself reduces to zero, and is rejected by strict decoding;
        // N - 1 is accepted.
        for i in 0..4 {
            va[(8 * i)..(8 * i + 8)].copy_from_slice(
                &Scalar::MODULUS[i].to_le_bytes());
        }
        assert!(Scalar::decode_reduce(&va).iszero() == 0xFFFFFFFF);
        assert!(Scalar::decode32(&va).1 == 0);
        va[0] -= 1;
        let (m1, cc) = Scalar::decode32(&va);
        assert!(cc == 0xFFFFFFFF);
        assert!((m1 + Scalar::ONE).iszero() == 0xFFFFFFFF);
        assert!(m1.isnegative() == 0xFFFFFFFF);
        assert!(Scalar::decode32(&va[..31]).1 == 0);

        let mut sh = Sha256::new();
        for i in 0..300 {
            sh.update(((3 * i + 0) as u64).to_le_bytes());
            let va = sh.finalize_reset();
            sh.update(((3 * i + 1) as u64).to_le_bytes());
            let vb = sh.finalize_reset();
            sh.update(((3 * i + 2) as u64).to_le_bytes());
            let vx = sh.finalize_reset();
            check_scalar_ops(&va, &vb, &vx);
            assert!(Scalar::decode_reduce(&va).iszero() == 0);
            assert!(Scalar::decode_reduce(&va).equals(
                Scalar::decode_reduce(&vb)) == 0);
        }
    }

    #[test]
    fn scalar_constructors() {
        assert!(Scalar::ONE.encode32()[0] == 1);
        assert!(Scalar::from_u32(7).equals(Scalar::w64le(7, 0, 0, 0)) == 0xFFFFFFFF);
        assert!(Scalar::from_u64(0x0123456789ABCDEF).equals(
            Scalar::from_w64le(0x0123456789ABCDEF, 0, 0, 0)) == 0xFFFFFFFF);
        let x = Scalar::from_u128(0x0123456789ABCDEF_FEDCBA9876543210);
        assert!(x.equals(Scalar::w64le(
            0xFEDCBA9876543210, 0x0123456789ABCDEF, 0, 0)) == 0xFFFFFFFF);
        let s = Scalar::select(&Scalar::ONE, &x, 0xFFFFFFFF);
        assert!(s.equals(x) == 0xFFFFFFFF);
        let s = Scalar::select(&Scalar::ONE, &x, 0);
        assert!(s.equals(Scalar::ONE) == 0xFFFFFFFF);
        assert!(Scalar::ZERO.isnegative() == 0);
    }
}
