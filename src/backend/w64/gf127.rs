use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use core::convert::TryFrom;

use super::{addcarry_u64, subborrow_u64, umull, umull_add, umull_add2};

/// Field element modulo p = 2^127 - 1.
///
/// Internally, the value is held over two 64-bit limbs and may range
/// over the whole 0..2^128-1 interval; reduction modulo p is lazy, and
/// uses the fact that 2^128 = 2 mod p. Values are normalized (into the
/// 0..p-1 range) only when encoded, compared, or when their "sign"
/// (least significant bit of the normalized integer) is needed.
#[derive(Clone, Copy, Debug)]
pub struct GF127([u64; 2]);

impl GF127 {

    // Element encoding length (in bytes).
    pub const ENC_LEN: usize = 16;

    // Modulus p = 2^127 - 1 in base 2^64 (low-to-high order).
    pub const MODULUS: [u64; 2] = [ 0xFFFFFFFFFFFFFFFF, 0x7FFFFFFFFFFFFFFF ];

    pub const ZERO: GF127 = GF127([ 0, 0 ]);
    pub const ONE: GF127 = GF127([ 1, 0 ]);
    pub const MINUS_ONE: GF127 = GF127([
        0xFFFFFFFFFFFFFFFE,
        0x7FFFFFFFFFFFFFFF,
    ]);

    // Create an element from a 128-bit value (implicitly reduced modulo
    // the field order) provided as two 64-bit limbs (in low-to-high order).
    pub const fn w64le(x0: u64, x1: u64) -> Self {
        Self([ x0, x1 ])
    }

    // Create an element from a 128-bit value (implicitly reduced modulo
    // the field order) provided as two 64-bit limbs (in high-to-low order).
    pub const fn w64be(x1: u64, x0: u64) -> Self {
        Self([ x0, x1 ])
    }

    // Create an element by converting the provided integer.
    #[inline(always)]
    pub const fn from_u32(x: u32) -> Self {
        Self([ x as u64, 0 ])
    }

    // Create an element by converting the provided integer.
    #[inline(always)]
    pub const fn from_u64(x: u64) -> Self {
        Self([ x, 0 ])
    }

    // Create an element by converting the provided integer.
    // If the source value is negative, then it is implicitly reduced
    // modulo the field order.
    #[inline(always)]
    pub const fn from_i32(x: i32) -> Self {
        Self::from_i64(x as i64)
    }

    // Create an element by converting the provided integer.
    // If the source value is negative, then it is implicitly reduced
    // modulo the field order. This function is usable in constant
    // expressions; the constant tables of the Kummer surface rely on it.
    #[inline(always)]
    pub const fn from_i64(x: i64) -> Self {
        // p + x is in the 1..2^128-1 range for all 64-bit x.
        let p = ((Self::MODULUS[1] as u128) << 64) | (Self::MODULUS[0] as u128);
        let v = p.wrapping_add((x as i128) as u128);
        Self([ v as u64, (v >> 64) as u64 ])
    }

    #[inline(always)]
    fn set_add(&mut self, rhs: &Self) {
        let (d0, cc) = addcarry_u64(self.0[0], rhs.0[0], 0);
        let (d1, cc) = addcarry_u64(self.0[1], rhs.0[1], cc);

        // Fold the carry (2^128 = 2 mod p). If this overflows again,
        // then the value is now 0 and adding 2 cannot overflow.
        let (d0, cc) = addcarry_u64(d0, (cc as u64) << 1, 0);
        let (d1, cc) = addcarry_u64(d1, 0, cc);
        self.0[0] = d0 | ((cc as u64) << 1);
        self.0[1] = d1;
    }

    #[inline(always)]
    fn set_sub(&mut self, rhs: &Self) {
        let (d0, cc) = subborrow_u64(self.0[0], rhs.0[0], 0);
        let (d1, cc) = subborrow_u64(self.0[1], rhs.0[1], cc);

        // On borrow, we got d + 2^128; subtract 2 to compensate. A
        // second borrow leaves a value of at least 2^128 - 2, from
        // which 2 can be subtracted safely.
        let (d0, cc) = subborrow_u64(d0, (cc as u64) << 1, 0);
        let (d1, cc) = subborrow_u64(d1, 0, cc);
        self.0[0] = d0.wrapping_sub((cc as u64) << 1);
        self.0[1] = d1;
    }

    // Negate this value (in place).
    #[inline(always)]
    pub fn set_neg(&mut self) {
        // Compute 2*p - x; a borrow occurs only for x = 2^128 - 1,
        // in which case we add p.
        let (d0, cc) = subborrow_u64(0xFFFFFFFFFFFFFFFE, self.0[0], 0);
        let (d1, cc) = subborrow_u64(0xFFFFFFFFFFFFFFFF, self.0[1], cc);
        let w = (cc as u64).wrapping_neg();
        let (d0, cc) = addcarry_u64(d0, w, 0);
        let (d1, _)  = addcarry_u64(d1, w >> 1, cc);
        self.0[0] = d0;
        self.0[1] = d1;
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
    }

    // Return a value equal to either a0 (if ctl == 0) or a1 (if
    // ctl == 0xFFFFFFFF). Value ctl MUST be either 0 or 0xFFFFFFFF.
    #[inline(always)]
    pub fn select(a0: &Self, a1: &Self, ctl: u32) -> Self {
        let mut r = *a0;
        r.set_cond(a1, ctl);
        r
    }

    // Conditionally swap two elements: values a and b are exchanged if
    // ctl == 0xFFFFFFFF, or not exchanged if ctl == 0x00000000. Value
    // ctl MUST be either 0x00000000 or 0xFFFFFFFF.
    #[inline(always)]
    pub fn cswap(a: &mut Self, b: &mut Self, ctl: u32) {
        let cw = ((ctl as i32) as i64) as u64;
        let t = cw & (a.0[0] ^ b.0[0]); a.0[0] ^= t; b.0[0] ^= t;
        let t = cw & (a.0[1] ^ b.0[1]); a.0[1] ^= t; b.0[1] ^= t;
    }

    // Multiply this value by 2.
    #[inline(always)]
    pub fn set_mul2(&mut self) {
        let r = *self;
        self.set_add(&r);
    }

    #[inline(always)]
    pub fn mul2(self) -> Self {
        let mut r = self;
        r.set_mul2();
        r
    }

    // Multiply this value by a small integer.
    #[inline(always)]
    pub fn set_mul_small(&mut self, x: u32) {
        let (d0, hi) = umull(self.0[0], x as u64);
        let (d1, hi) = umull_add(self.0[1], x as u64, hi);

        // hi < 2^32; after the fold, an overflow leaves a value lower
        // than 2^34, so the second fold cannot propagate.
        let (d0, cc) = addcarry_u64(d0, hi << 1, 0);
        let (d1, cc) = addcarry_u64(d1, 0, cc);
        self.0[0] = d0.wrapping_add((cc as u64) << 1);
        self.0[1] = d1;
    }

    #[inline(always)]
    pub fn mul_small(self, x: u32) -> Self {
        let mut r = self;
        r.set_mul_small(x);
        r
    }

    // Reduce a 256-bit value e0..e3 into this element.
    #[inline(always)]
    fn set_reduce256(&mut self, e0: u64, e1: u64, e2: u64, e3: u64) {
        // e = lo + 2^128*hi = lo + 2*hi mod p. 2*hi needs 129 bits; its
        // top bit (weight 2^128) is folded again as a 2.
        let h0 = e2 << 1;
        let h1 = (e3 << 1) | (e2 >> 63);
        let h2 = e3 >> 63;
        let (d0, cc) = addcarry_u64(e0, h0, 0);
        let (d1, cc) = addcarry_u64(e1, h1, cc);

        // At most 4 to add; if that overflows, the result is below 4.
        let (d0, cc) = addcarry_u64(d0, ((cc as u64) + h2) << 1, 0);
        let (d1, cc) = addcarry_u64(d1, 0, cc);
        self.0[0] = d0.wrapping_add((cc as u64) << 1);
        self.0[1] = d1;
    }

    #[inline(always)]
    fn set_mul(&mut self, rhs: &Self) {
        let (a0, a1) = (self.0[0], self.0[1]);
        let (b0, b1) = (rhs.0[0], rhs.0[1]);

        let (e0, hi) = umull(a0, b0);
        let (e1, e2) = umull_add(a0, b1, hi);
        let (e1, hi) = umull_add(a1, b0, e1);
        let (e2, e3) = umull_add2(a1, b1, e2, hi);

        self.set_reduce256(e0, e1, e2, e3);
    }

    // Square this value (in place).
    #[inline(always)]
    pub fn set_square(&mut self) {
        let (a0, a1) = (self.0[0], self.0[1]);

        let (e0, hi) = umull(a0, a0);
        let (t1, t2) = umull(a0, a1);
        let t3 = t2 >> 63;
        let t2 = (t2 << 1) | (t1 >> 63);
        let t1 = t1 << 1;
        let (e1, cc) = addcarry_u64(t1, hi, 0);
        let (lo, hi) = umull(a1, a1);
        let (e2, cc) = addcarry_u64(t2, lo, cc);
        let (e3, _)  = addcarry_u64(t3, hi, cc);

        self.set_reduce256(e0, e1, e2, e3);
    }

    // Square this value.
    #[inline(always)]
    pub fn square(self) -> Self {
        let mut r = self;
        r.set_square();
        r
    }

    // Square this value n times (in place).
    #[inline(always)]
    pub fn set_xsquare(&mut self, n: u32) {
        for _ in 0..n {
            self.set_square();
        }
    }

    // Square this value n times.
    #[inline(always)]
    pub fn xsquare(self, n: u32) -> Self {
        let mut r = self;
        r.set_xsquare(n);
        r
    }

    // Normalize this value to the 0..p-1 range.
    #[inline]
    fn set_normalized(&mut self) {
        // Fold bit 127 (2^127 = 1 mod p); the result is at most p + 1.
        let b = self.0[1] >> 63;
        let (d0, cc) = addcarry_u64(self.0[0], b, 0);
        let (d1, _)  = addcarry_u64(self.0[1] & 0x7FFFFFFFFFFFFFFF, 0, cc);

        // Subtract p, and keep the original value on borrow.
        let (e0, cc) = subborrow_u64(d0, Self::MODULUS[0], 0);
        let (e1, cc) = subborrow_u64(d1, Self::MODULUS[1], cc);
        let w = (cc as u64).wrapping_neg();
        self.0[0] = e0 ^ (w & (e0 ^ d0));
        self.0[1] = e1 ^ (w & (e1 ^ d1));
    }

    // Invert this value (in place). If this value is zero, then it
    // stays at zero.
    pub fn set_invert(&mut self) {
        // 1/x = x^(p-2) = x^(2^127 - 3). We use the following chain,
        // where aN = x^(2^N - 1):
        //   a2 = x^3, a3, a5, a10, a20, a40, a80, a120, a125
        //   x^(2^127 - 3) = a125^4 * x
        // (126 squarings, 11 multiplications).
        let x = *self;
        let a2 = x.square() * x;
        let a3 = a2.square() * x;
        let a5 = a3.xsquare(2) * a2;
        let a10 = a5.xsquare(5) * a5;
        let a20 = a10.xsquare(10) * a10;
        let a40 = a20.xsquare(20) * a20;
        let a80 = a40.xsquare(40) * a40;
        let a120 = a80.xsquare(40) * a40;
        let a125 = a120.xsquare(5) * a5;
        *self = a125.xsquare(2) * x;
    }

    // Invert this value; the inverse of zero is zero.
    #[inline(always)]
    pub fn invert(self) -> Self {
        let mut r = self;
        r.set_invert();
        r
    }

    #[inline(always)]
    fn set_div(&mut self, y: &Self) {
        self.set_mul(&y.invert());
    }

    // Set this value to its square root. Returned value is 0xFFFFFFFF
    // if the operation succeeded (value was indeed a quadratic residue),
    // 0 otherwise (value was not a quadratic residue). On success, the
    // root whose least significant bit (normalized value) is zero is
    // returned; on failure, the value is set to zero.
    pub fn set_sqrt(&mut self) -> u32 {
        // Since p = 3 mod 4, a candidate root is x^((p+1)/4) = x^(2^125).
        let x = *self;
        self.set_xsquare(125);
        let r = self.square().equals(x);
        let neg = self.isodd();
        self.set_condneg(neg);
        self.set_cond(&Self::ZERO, !r);
        r
    }

    // Compute the square root of this value. Returned value are (y, r):
    //  - If this value is indeed a quadratic residue, then y is the
    //    square root whose least significant bit (when normalized in 0..p-1)
    //    is 0, and r is equal to 0xFFFFFFFF.
    //  - If this value is not a quadratic residue, then y is zero, and
    //    r is equal to 0.
    #[inline(always)]
    pub fn sqrt(self) -> (Self, u32) {
        let mut y = self;
        let r = y.set_sqrt();
        (y, r)
    }

    // Compute the square root of this value with a chosen sign: the
    // returned root is "negative" (odd) if neg == 0xFFFFFFFF, "positive"
    // (even) if neg == 0. Returned values are (y, r), with r == 0xFFFFFFFF
    // on success. This fails (y = 0, r = 0) if the value is not a square,
    // or if the value is zero and a negative root is requested.
    pub fn sqrt_signed(self, neg: u32) -> (Self, u32) {
        let (mut y, mut r) = self.sqrt();
        y.set_condneg(neg);
        r &= !(neg & y.iszero());
        y.set_cond(&Self::ZERO, !r);
        (y, r)
    }

    // Equality check between two field elements (constant-time);
    // returned value is 0xFFFFFFFF on equality, 0 otherwise.
    #[inline(always)]
    pub fn equals(self, rhs: Self) -> u32 {
        (self - rhs).iszero()
    }

    // Compare this value with zero (constant-time); returned value
    // is 0xFFFFFFFF if this element is zero, 0 otherwise.
    #[inline]
    pub fn iszero(self) -> u32 {
        // Zero has three representations in 0..2^128-1: 0, p and 2*p.
        let (a0, a1) = (self.0[0], self.0[1]);
        let t0 = a0 | a1;
        let t1 = !a0 | (a1 ^ 0x7FFFFFFFFFFFFFFF);
        let t2 = (a0 ^ 0xFFFFFFFFFFFFFFFE) | !a1;

        // Top bit of r is 0 if and only if one of t0, t1 or t2 is zero.
        let r = (t0 | t0.wrapping_neg())
              & (t1 | t1.wrapping_neg())
              & (t2 | t2.wrapping_neg());
        ((r >> 63) as u32).wrapping_sub(1)
    }

    // Get the "sign" of this value: 0xFFFFFFFF if the normalized value
    // is odd, 0 if it is even.
    #[inline]
    pub fn isodd(self) -> u32 {
        let mut r = self;
        r.set_normalized();
        ((r.0[0] as u32) & 1).wrapping_neg()
    }

    // Encode this value over exactly 16 bytes. Encoding is always
    // canonical (little-endian encoding of the value in the 0..p-1 range,
    // top bit of the last byte is always 0).
    #[inline]
    pub fn encode16(self) -> [u8; 16] {
        let mut r = self;
        r.set_normalized();
        let mut d = [0u8; 16];
        d[0.. 8].copy_from_slice(&r.0[0].to_le_bytes());
        d[8..16].copy_from_slice(&r.0[1].to_le_bytes());
        d
    }

    #[inline(always)]
    fn set_decode16_reduce(&mut self, buf: &[u8]) {
        debug_assert!(buf.len() == 16);
        self.0[0] = u64::from_le_bytes(*<&[u8; 8]>::try_from(&buf[0.. 8]).unwrap());
        self.0[1] = u64::from_le_bytes(*<&[u8; 8]>::try_from(&buf[8..16]).unwrap());
    }

    // Decode the field element from the provided bytes. If the source
    // slice does not have length exactly 16 bytes, or if the encoding
    // is non-canonical (i.e. does not represent an integer in the 0
    // to p-1 range), then this element is set to zero, and 0 is returned.
    // Otherwise, this element is set to the decoded value, and 0xFFFFFFFF
    // is returned.
    #[inline]
    pub fn set_decode16(&mut self, buf: &[u8]) -> u32 {
        *self = Self::ZERO;
        if buf.len() != 16 {
            return 0;
        }
        self.set_decode16_reduce(buf);

        // Clear the value if not canonical.
        let (_, cc) = subborrow_u64(self.0[0], Self::MODULUS[0], 0);
        let (_, cc) = subborrow_u64(self.0[1], Self::MODULUS[1], cc);
        let w = (cc as u64).wrapping_neg();
        self.0[0] &= w;
        self.0[1] &= w;
        w as u32
    }

    // Decode a field element from 16 bytes. On success, this returns
    // (r, cc), where cc has value 0xFFFFFFFF. If the source encoding is not
    // canonical (i.e. the unsigned little-endian interpretation of the
    // 16 bytes yields an integer with is not lower than p), then this
    // returns (0, 0).
    #[inline(always)]
    pub fn decode16(buf: &[u8]) -> (Self, u32) {
        let mut r = Self::ZERO;
        let cc = r.set_decode16(buf);
        (r, cc)
    }

    // Decode an element from some bytes. The bytes are interpreted in
    // unsigned little-endian convention, and the resulting integer is
    // reduced modulo p. This process never fails.
    pub fn set_decode_reduce(&mut self, buf: &[u8]) {
        *self = Self::ZERO;
        let mut n = buf.len();
        if n == 0 {
            return;
        }
        if (n & 15) != 0 {
            let k = n & !(15 as usize);
            let mut tmp = [0u8; 16];
            tmp[..(n - k)].copy_from_slice(&buf[k..]);
            n = k;
            self.set_decode16_reduce(&tmp);
        } else {
            n -= 16;
            self.set_decode16_reduce(&buf[n..]);
        }

        // Each extra chunk multiplies the accumulator by 2^128 = 2.
        while n > 0 {
            n -= 16;
            let mut d = Self::ZERO;
            d.set_decode16_reduce(&buf[n..n + 16]);
            self.set_mul2();
            self.set_add(&d);
        }
    }

    // Decode an element from some bytes. The bytes are interpreted in
    // unsigned little-endian convention, and the resulting integer is
    // reduced modulo p. This process never fails.
    #[inline(always)]
    pub fn decode_reduce(buf: &[u8]) -> Self {
        let mut r = Self::ZERO;
        r.set_decode_reduce(buf);
        r
    }
}

// ========================================================================
// Implementations of all the traits needed to use the simple operators
// (+, *, /...) on field element instances, with or without references.

impl Add<GF127> for GF127 {
    type Output = GF127;

    #[inline(always)]
    fn add(self, other: GF127) -> GF127 {
        let mut r = self;
        r.set_add(&other);
        r
    }
}

impl Add<&GF127> for GF127 {
    type Output = GF127;

    #[inline(always)]
    fn add(self, other: &GF127) -> GF127 {
        let mut r = self;
        r.set_add(other);
        r
    }
}

impl Add<GF127> for &GF127 {
    type Output = GF127;

    #[inline(always)]
    fn add(self, other: GF127) -> GF127 {
        let mut r = *self;
        r.set_add(&other);
        r
    }
}

impl Add<&GF127> for &GF127 {
    type Output = GF127;

    #[inline(always)]
    fn add(self, other: &GF127) -> GF127 {
        let mut r = *self;
        r.set_add(other);
        r
    }
}

impl AddAssign<GF127> for GF127 {
    #[inline(always)]
    fn add_assign(&mut self, other: GF127) {
        self.set_add(&other);
    }
}

impl AddAssign<&GF127> for GF127 {
    #[inline(always)]
    fn add_assign(&mut self, other: &GF127) {
        self.set_add(other);
    }
}

impl Div<GF127> for GF127 {
    type Output = GF127;

    #[inline(always)]
    fn div(self, other: GF127) -> GF127 {
        let mut r = self;
        r.set_div(&other);
        r
    }
}

impl Div<&GF127> for GF127 {
    type Output = GF127;

    #[inline(always)]
    fn div(self, other: &GF127) -> GF127 {
        let mut r = self;
        r.set_div(other);
        r
    }
}

impl Div<GF127> for &GF127 {
    type Output = GF127;

    #[inline(always)]
    fn div(self, other: GF127) -> GF127 {
        let mut r = *self;
        r.set_div(&other);
        r
    }
}

impl Div<&GF127> for &GF127 {
    type Output = GF127;

    #[inline(always)]
    fn div(self, other: &GF127) -> GF127 {
        let mut r = *self;
        r.set_div(other);
        r
    }
}

impl DivAssign<GF127> for GF127 {
    #[inline(always)]
    fn div_assign(&mut self, other: GF127) {
        self.set_div(&other);
    }
}

impl DivAssign<&GF127> for GF127 {
    #[inline(always)]
    fn div_assign(&mut self, other: &GF127) {
        self.set_div(other);
    }
}

impl Mul<GF127> for GF127 {
    type Output = GF127;

    #[inline(always)]
    fn mul(self, other: GF127) -> GF127 {
        let mut r = self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&GF127> for GF127 {
    type Output = GF127;

    #[inline(always)]
    fn mul(self, other: &GF127) -> GF127 {
        let mut r = self;
        r.set_mul(other);
        r
    }
}

impl Mul<GF127> for &GF127 {
    type Output = GF127;

    #[inline(always)]
    fn mul(self, other: GF127) -> GF127 {
        let mut r = *self;
        r.set_mul(&other);
        r
    }
}

impl Mul<&GF127> for &GF127 {
    type Output = GF127;

    #[inline(always)]
    fn mul(self, other: &GF127) -> GF127 {
        let mut r = *self;
        r.set_mul(other);
        r
    }
}

impl MulAssign<GF127> for GF127 {
    #[inline(always)]
    fn mul_assign(&mut self, other: GF127) {
        self.set_mul(&other);
    }
}

impl MulAssign<&GF127> for GF127 {
    #[inline(always)]
    fn mul_assign(&mut self, other: &GF127) {
        self.set_mul(other);
    }
}

impl Neg for GF127 {
    type Output = GF127;

    #[inline(always)]
    fn neg(self) -> GF127 {
        let mut r = self;
        r.set_neg();
        r
    }
}

impl Neg for &GF127 {
    type Output = GF127;

    #[inline(always)]
    fn neg(self) -> GF127 {
        let mut r = *self;
        r.set_neg();
        r
    }
}

impl Sub<GF127> for GF127 {
    type Output = GF127;

    #[inline(always)]
    fn sub(self, other: GF127) -> GF127 {
        let mut r = self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&GF127> for GF127 {
    type Output = GF127;

    #[inline(always)]
    fn sub(self, other: &GF127) -> GF127 {
        let mut r = self;
        r.set_sub(other);
        r
    }
}

impl Sub<GF127> for &GF127 {
    type Output = GF127;

    #[inline(always)]
    fn sub(self, other: GF127) -> GF127 {
        let mut r = *self;
        r.set_sub(&other);
        r
    }
}

impl Sub<&GF127> for &GF127 {
    type Output = GF127;

    #[inline(always)]
    fn sub(self, other: &GF127) -> GF127 {
        let mut r = *self;
        r.set_sub(other);
        r
    }
}

impl SubAssign<GF127> for GF127 {
    #[inline(always)]
    fn sub_assign(&mut self, other: GF127) {
        self.set_sub(&other);
    }
}

impl SubAssign<&GF127> for GF127 {
    #[inline(always)]
    fn sub_assign(&mut self, other: &GF127) {
        self.set_sub(other);
    }
}

// ========================================================================

#[cfg(test)]
mod tests {

    use super::GF127;
    use num_bigint::{BigInt, Sign};
    use sha2::{Sha256, Digest};

    fn modulus() -> BigInt {
        (BigInt::from(1u32) << 127) - 1
    }

    fn tobig(x: GF127) -> BigInt {
        BigInt::from_bytes_le(Sign::Plus, &x.encode16())
    }

    // va, vb and vc must be 16 bytes each in length
    fn check_gf_ops(va: &[u8], vb: &[u8], vc: &[u8]) {
        let zp = modulus();
        let zp2 = &zp << 2;

        let a = GF127::decode_reduce(va);
        let b = GF127::decode_reduce(vb);
        let c = GF127::decode_reduce(vc);
        let za = BigInt::from_bytes_le(Sign::Plus, va);
        let zb = BigInt::from_bytes_le(Sign::Plus, vb);
        let zc = BigInt::from_bytes_le(Sign::Plus, vc);

        assert!(tobig(a) == &za % &zp);
        assert!(tobig(a + b) == (&za + &zb) % &zp);
        assert!(tobig(a - b) == ((&zp2 + &za) - &zb) % &zp);
        assert!(tobig(-a) == (&zp2 - &za) % &zp);
        assert!(tobig(a * b) == (&za * &zb) % &zp);
        assert!(tobig(a.square()) == (&za * &za) % &zp);
        assert!(tobig(a.mul2()) == (&za << 1) % &zp);

        let x = u32::from_le_bytes([vb[0], vb[1], vb[2], vb[3]]);
        assert!(tobig(a.mul_small(x)) == (&za * x) % &zp);
        assert!(tobig(a.mul_small(0xFFFFFFFF)) == (&za * 0xFFFFFFFFu32) % &zp);

        // Distributivity.
        assert!((a * (b + c)).equals(a * b + a * c) == 0xFFFFFFFF);

        // Inversion and division.
        let ai = a.invert();
        if a.iszero() != 0 {
            assert!(ai.iszero() == 0xFFFFFFFF);
        } else {
            assert!((a * ai).equals(GF127::ONE) == 0xFFFFFFFF);
            assert!((b / a * a).equals(b) == 0xFFFFFFFF);
        }

        // Sign and conditional negation.
        let za_red = &za % &zp;
        let odd = if (&za_red % 2u32) == BigInt::from(1u32) {
            0xFFFFFFFFu32
        } else {
            0
        };
        assert!(a.isodd() == odd);
        let mut e = a;
        e.set_condneg(0);
        assert!(e.equals(a) == 0xFFFFFFFF);
        e.set_condneg(0xFFFFFFFF);
        assert!(e.equals(-a) == 0xFFFFFFFF);

        // Strict decoding.
        let (d, cc) = GF127::decode16(va);
        if za < zp {
            assert!(cc == 0xFFFFFFFF);
            assert!(d.encode16() == va);
        } else {
            assert!(cc == 0);
            assert!(d.iszero() == 0xFFFFFFFF);
        }

        // Reduction of arbitrary-length inputs.
        let mut tmp = [0u8; 48];
        tmp[0..16].copy_from_slice(va);
        tmp[16..32].copy_from_slice(vb);
        tmp[32..48].copy_from_slice(vc);
        for k in 0..49 {
            let d = GF127::decode_reduce(&tmp[0..k]);
            let zd = BigInt::from_bytes_le(Sign::Plus, &tmp[0..k]) % &zp;
            assert!(tobig(d) == zd);
        }
    }

    #[test]
    fn gf127_ops() {
        let mut va = [0u8; 16];
        let mut vb = [0u8; 16];
        let mut vc = [0u8; 16];
        check_gf_ops(&va, &vb, &vc);
        assert!(GF127::decode_reduce(&va).iszero() == 0xFFFFFFFF);
        for i in 0..16 {
            va[i] = 0xFF;
            vb[i] = 0xFF;
            vc[i] = 0xFF;
        }
        check_gf_ops(&va, &vb, &vc);

        // 2^128 - 1 = 2*p + 1, 2^128 - 2 = 2*p, p
        assert!(GF127::decode_reduce(&va).equals(GF127::ONE) == 0xFFFFFFFF);
        va[0] = 0xFE;
        assert!(GF127::decode_reduce(&va).iszero() == 0xFFFFFFFF);
        va[0] = 0xFF;
        va[15] = 0x7F;
        assert!(GF127::decode_reduce(&va).iszero() == 0xFFFFFFFF);
        assert!(GF127::decode16(&va).1 == 0);
        va[0] = 0xFE;
        assert!(GF127::decode16(&va).1 == 0xFFFFFFFF);
        assert!(GF127::decode16(&va).0.equals(GF127::MINUS_ONE) == 0xFFFFFFFF);
        assert!(GF127::decode16(&va[..15]).1 == 0);

        let mut sh = Sha256::new();
        for i in 0..300 {
            sh.update(((3 * i + 0) as u64).to_le_bytes());
            let va = sh.finalize_reset();
            sh.update(((3 * i + 1) as u64).to_le_bytes());
            let vb = sh.finalize_reset();
            sh.update(((3 * i + 2) as u64).to_le_bytes());
            let vc = sh.finalize_reset();
            check_gf_ops(&va[0..16], &vb[0..16], &vc[0..16]);
            check_gf_ops(&va[16..32], &vb[16..32], &vc[16..32]);
        }
    }

    #[test]
    fn gf127_constructors() {
        assert!(GF127::from_i64(-1).equals(GF127::MINUS_ONE) == 0xFFFFFFFF);
        assert!(GF127::from_i32(-11).equals(-GF127::from_u32(11)) == 0xFFFFFFFF);
        assert!(GF127::from_i64(i64::MIN).equals(
            -GF127::w64le(0x8000000000000000, 0)) == 0xFFFFFFFF);
        assert!(GF127::from_i64(i64::MAX).equals(
            GF127::from_u64(0x7FFFFFFFFFFFFFFF)) == 0xFFFFFFFF);
        assert!(GF127::w64be(0, 5).equals(GF127::from_u32(5)) == 0xFFFFFFFF);
        assert!(GF127::MINUS_ONE.encode16()[15] == 0x7F);
    }

    #[test]
    fn gf127_sqrt() {
        let mut sh = Sha256::new();
        for i in 0..100 {
            sh.update((i as u64).to_le_bytes());
            let v = sh.finalize_reset();
            let x = GF127::decode_reduce(&v);
            let s = x.square();

            let (y, r) = s.sqrt();
            assert!(r == 0xFFFFFFFF);
            assert!(y.square().equals(s) == 0xFFFFFFFF);
            assert!(y.isodd() == 0);

            let (y, r) = s.sqrt_signed(0xFFFFFFFF);
            assert!(r == 0xFFFFFFFF);
            assert!(y.square().equals(s) == 0xFFFFFFFF);
            assert!(y.isodd() == 0xFFFFFFFF);

            // -1 is not a square since p = 3 mod 4.
            let (y, r) = (-s).sqrt();
            assert!(r == 0);
            assert!(y.iszero() == 0xFFFFFFFF);
            let (_, r) = (-s).sqrt_signed(0);
            assert!(r == 0);
        }

        let (y, r) = GF127::ZERO.sqrt_signed(0);
        assert!(r == 0xFFFFFFFF);
        assert!(y.iszero() == 0xFFFFFFFF);
        let (_, r) = GF127::ZERO.sqrt_signed(0xFFFFFFFF);
        assert!(r == 0);
    }
}
