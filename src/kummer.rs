//! Arithmetic on the Kummer surface of the Gaudry-Schost genus-2 curve.
//!
//! The curve is the genus-2 hyperelliptic curve over GF(2^127 - 1) used
//! by Gaudry and Schost (and later by the "Kummer strikes back" and qDSA
//! papers). Its Jacobian has a subgroup of prime order N, close to
//! 2^250; the Kummer surface is the quotient of the Jacobian by the
//! automorphism `P -> -P`. A point of the surface is represented in
//! projective "squared theta" coordinates `(X:Y:Z:T)`; since `P` and
//! `-P` map to the same point, only scalar multiplication is available
//! (there is no addition law). The neutral element is the point
//! `(-11:22:19:3)`.
//!
//! Scalar multiplication uses a Montgomery-like ladder with a combined
//! doubling-and-addition (`dbladd()`) which relies on the fact that the
//! difference between the two ladder registers is always the source
//! point. The source point is "wrapped" into three field elements
//! (`(X/Y, X/Z, X/T)`, with X negated) before the ladder starts.
//!
//! Points are compressed into 32 bytes: two field elements (l1 and l2,
//! normalized linear forms in the coordinates), each with a one-bit
//! marker in the otherwise unused top bit. Decompression recomputes the
//! fourth coordinate by solving a quadratic equation that describes the
//! surface. Compression of the neutral element yields 32 zero bytes,
//! and decompression rejects that value.
//!
//! The `check()` function implements the qDSA verification relation:
//! given points `P = [s]B` and `Q = [h]A` and a compressed point `R`,
//! it verifies that `R` is one of the two points `x(P + Q)` and
//! `x(P - Q)`, using biquadratic forms over the coordinates of `P` and
//! `Q` (since `P + Q` itself cannot be computed on the surface).
//!
//! Internally, the all-zero point `(0:0:0:0)` (which is not a valid
//! projective point) is used as a sentinel for "invalid point". Decoding
//! failures set the point to that value. `check()` rejects it on input,
//! along with the neutral element.

// Projective/fractional coordinates traditionally use uppercase letters,
// using lowercase only for affine coordinates.
#![allow(non_snake_case)]

use core::convert::TryFrom;

use super::field::{GF127, Scalar};

/// A point on the Kummer surface, in standard (squared theta)
/// projective coordinates.
#[derive(Clone, Copy, Debug)]
pub struct Point {
    X: GF127,
    Y: GF127,
    Z: GF127,
    T: GF127,
}

/// A field element and a one-bit marker.
///
/// In a compressed point, the marker of the first element (tau) tells
/// whether the normalization pivot was the third linear form, and the
/// marker of the second element (sigma) selects the root of the surface
/// equation. The `sign` field is 0x00000000 or 0xFFFFFFFF; it is stored
/// in the top bit of the last byte of the 16-byte encoding.
#[derive(Clone, Copy, Debug)]
pub struct PackedElement {
    pub magnitude: GF127,
    pub sign: u32,
}

impl PackedElement {

    /// Encode this element into 16 bytes (magnitude in the low 127 bits,
    /// marker in bit 127).
    #[inline]
    pub fn pack(self) -> [u8; 16] {
        let mut d = self.magnitude.encode16();
        d[15] |= (self.sign as u8) & 0x80;
        d
    }

    /// Decode an element from 16 bytes.
    ///
    /// Returned values are the element and a status (0xFFFFFFFF on
    /// success, 0x00000000 on failure). Decoding fails if the slice
    /// length is not 16, or if the magnitude is not lower than the field
    /// modulus; on failure, the returned element is zero.
    pub fn unpack(buf: &[u8]) -> (Self, u32) {
        let mut d = match <[u8; 16]>::try_from(buf) {
            Ok(d) => d,
            Err(_) => return (Self { magnitude: GF127::ZERO, sign: 0 }, 0),
        };
        let sign = ((d[15] >> 7) as u32).wrapping_neg();
        d[15] &= 0x7F;
        let (magnitude, r) = GF127::decode16(&d);
        (Self { magnitude, sign: sign & r }, r)
    }
}

// Squared theta constants (Ê) and their duals (E), used by dbladd().
const EPSH: [u32; 4] = [ 833, 2499, 1617, 561 ];
const EPS: [u32; 4] = [ 114, 57, 66, 418 ];

// Neutral element in twisted coordinates (first coordinate negated).
const NEUTRAL_TWISTED: [GF127; 4] = [
    GF127::from_i64(11),
    GF127::from_i64(22),
    GF127::from_i64(19),
    GF127::from_i64(3),
];

macro_rules! gf127_table {
    ($($x:expr),* $(,)?) => { [ $(GF127::from_i64($x)),* ] }
}

// Coefficients of the surface polynomials K2 (quadratic), K3 (cubic) and
// the quadratic whose square is K4 (up to the factor 1/302379). They are
// evaluated over (l1, l2, l3), monomials in lexicographic order:
//   quadratic: l1^2, l1*l2, l1*l3, l2^2, l2*l3, l3^2
//   cubic:     l1^3, l1^2*l2, l1^2*l3, l1*l2^2, l1*l2*l3, l1*l3^2,
//              l2^3, l2^2*l3, l2*l3^2, l3^3
const K2: [GF127; 6] = gf127_table![
    17892493971, -1371396972, -2643976236,
    576387876, -28045824, 150638244,
];
const K3: [GF127; 10] = gf127_table![
    2113758075, 1401485657, -82142775, 12344813, -259117381,
    -14598675, 11646050, 10992100, 13091300, 1838850,
];
const K4: [GF127; 6] = gf127_table![
    37083475, -134849, -5344625, 306475, 240875, 306475,
];

// 1/302379 mod p
const INV_K4: GF127 = GF127::w64le(0x0CA6E1DCE5BFB59B, 0x0C223D9D8342C0E0);

// Biquadratic forms for check(). For each of the three classes
// {a,b | c,d} = {0,1 | 2,3}, {0,2 | 1,3}, {0,3 | 1,2}, the values
// B_ab and B_cd are S + X and S - X, with:
//   S = sum_{k,l} BIJ_M[k][l] * p_k^2 * q_l^2
//   X = x1*(p_a p_b)(q_a q_b) + x2*((p_a p_b)(q_c q_d) + (p_c p_d)(q_a q_b))
//       + x3*(p_c p_d)(q_c q_d)
// where (p_i) and (q_i) are the Hadamard transforms of the two points.
// All values are scaled by 1537278600, which is compensated by CHECK_2C.
const CLASSES: [(usize, usize, usize, usize); 3] = [
    (0, 1, 2, 3),
    (0, 2, 1, 3),
    (0, 3, 1, 2),
];

const BIJ_M: [[[GF127; 4]; 4]; 3] = [
    [
        gf127_table![ 1064361454531375, 7193212027876875,
                      3973295022571875, -839697404070525 ],
        gf127_table![ 7193212027876875, 9579253090782375,
                      7260912846962775, -4135470329615625 ],
        gf127_table![ 3973295022571875, 7260912846962775,
                      4010690740431375, -3134617006145625 ],
        gf127_table![ -839697404070525, -4135470329615625,
                      -3134617006145625, 482752862967375 ],
    ],
    [
        gf127_table![ 1376971112505625, 6676449123878625,
                      5060636226671025, -1086321816454875 ],
        gf127_table![ 6676449123878625, 12392740012550625,
                      9393488648168625, -5267192807351475 ],
        gf127_table![ 5060636226671025, 9393488648168625,
                      5188655853005625, -2909425008364875 ],
        gf127_table![ -1086321816454875, -5267192807351475,
                      -2909425008364875, 624540417125625 ],
    ],
    [
        gf127_table![ -511446413216375, -2479823960297775,
                      -1909245660196875, 1070567643770625 ],
        gf127_table![ -2479823960297775, -4603017718947375,
                      -9257261390251875, 1987174054490625 ],
        gf127_table![ -1909245660196875, -9257261390251875,
                      -1927215031116375, 1080643574535525 ],
        gf127_table![ 1070567643770625, 1987174054490625,
                      1080643574535525, -231972154932375 ],
    ],
];

const BIJ_X: [[GF127; 3]; 3] = [
    gf127_table![ 2515130437743000, 3885073825109400, -1096029230373000 ],
    gf127_table![ -82826172813384, 4224134813482584, 86206832928216 ],
    gf127_table![ -1138911410637000, 2575691959440600, 9848233962567000 ],
];

// 2/1537278600 mod p
const CHECK_2C: GF127 = GF127::w64le(0xB63BD8590F7D8B8F, 0x4371CCC0BBBB8205);

// Number of ladder iterations; N < 2^250.
const LADDER_BITS: usize = 250;

// Hadamard transform: (x+y+z+t, x+y-z-t, x-y+z-t, x-y-z+t).
#[inline(always)]
fn hadamard(v: &[GF127; 4]) -> [GF127; 4] {
    let a = v[0] + v[1];
    let b = v[0] - v[1];
    let c = v[2] + v[3];
    let d = v[2] - v[3];
    [ a + c, a - c, b + d, b - d ]
}

// Hadamard transform applied to (-x, y, z, t).
#[inline(always)]
fn twisted_hadamard(v: &[GF127; 4]) -> [GF127; 4] {
    let a = v[1] - v[0];
    let b = -(v[0] + v[1]);
    let c = v[2] + v[3];
    let d = v[2] - v[3];
    [ a + c, a - c, b + d, b - d ]
}

#[inline(always)]
fn square4(v: &[GF127; 4]) -> [GF127; 4] {
    [ v[0].square(), v[1].square(), v[2].square(), v[3].square() ]
}

#[inline(always)]
fn mul4(u: &[GF127; 4], v: &[GF127; 4]) -> [GF127; 4] {
    [ u[0] * v[0], u[1] * v[1], u[2] * v[2], u[3] * v[3] ]
}

#[inline(always)]
fn mul4_small(v: &[GF127; 4], c: &[u32; 4]) -> [GF127; 4] {
    [
        v[0].mul_small(c[0]),
        v[1].mul_small(c[1]),
        v[2].mul_small(c[2]),
        v[3].mul_small(c[3]),
    ]
}

#[inline(always)]
fn cswap4(a: &mut [GF127; 4], b: &mut [GF127; 4], ctl: u32) {
    for i in 0..4 {
        GF127::cswap(&mut a[i], &mut b[i], ctl);
    }
}

// Map a point (in twisted coordinates) to (X/Y, X/Z, X/T), with a single
// inversion. If any of Y, Z or T is zero, then all three values are zero.
fn wrap(v: &[GF127; 4]) -> [GF127; 3] {
    let yz = v[1] * v[2];
    let xi = v[0] * (yz * v[3]).invert();
    [ xi * v[2] * v[3], xi * v[1] * v[3], xi * yz ]
}

// Inverse of wrap(), up to projective equivalence: (a, b, c) maps to
// (a*b*c : b*c : a*c : a*b).
fn unwrap(w: &[GF127; 3]) -> [GF127; 4] {
    let bc = w[1] * w[2];
    [ w[0] * bc, bc, w[0] * w[2], w[0] * w[1] ]
}

// Combined doubling and differential addition. On input, P and Q are
// points in twisted coordinates, and w is the wrapped form of P - Q (or
// Q - P). On output, P contains [2]P and Q contains P + Q.
fn dbladd(P: &mut [GF127; 4], Q: &mut [GF127; 4], w: &[GF127; 3]) {
    let u = twisted_hadamard(P);
    let v = twisted_hadamard(Q);
    let s = mul4_small(&mul4(&u, &v), &EPSH);
    let d = mul4_small(&square4(&u), &EPSH);
    let mut s = square4(&twisted_hadamard(&s));
    let d = square4(&twisted_hadamard(&d));
    s[1] *= w[0];
    s[2] *= w[1];
    s[3] *= w[2];
    *P = mul4_small(&d, &EPS);
    *Q = s;
}

// Evaluate a quadratic form over (l1, l2, l3).
fn quad(c: &[GF127; 6], l1: GF127, l2: GF127, l3: GF127) -> GF127 {
    c[0] * l1.square() + c[1] * (l1 * l2) + c[2] * (l1 * l3)
        + c[3] * l2.square() + c[4] * (l2 * l3) + c[5] * l3.square()
}

// Evaluate a cubic form over (l1, l2, l3).
fn cubic(c: &[GF127; 10], l1: GF127, l2: GF127, l3: GF127) -> GF127 {
    let l11 = l1.square();
    let l22 = l2.square();
    let l33 = l3.square();
    c[0] * (l11 * l1) + c[1] * (l11 * l2) + c[2] * (l11 * l3)
        + c[3] * (l1 * l22) + c[4] * (l1 * l2 * l3) + c[5] * (l1 * l33)
        + c[6] * (l22 * l2) + c[7] * (l22 * l3) + c[8] * (l2 * l33)
        + c[9] * (l33 * l3)
}

// Surface polynomials k2 and k3; a point with normalized forms
// (l1, l2, l3, l4) satisfies k2*l4^2 - 2*k3*l4 + k4 = 0.
#[inline]
fn k2k3(l1: GF127, l2: GF127, l3: GF127) -> (GF127, GF127) {
    (quad(&K2, l1, l2, l3), cubic(&K3, l1, l2, l3))
}

#[inline]
fn k4(l1: GF127, l2: GF127, l3: GF127) -> GF127 {
    quad(&K4, l1, l2, l3).square() * INV_K4
}

impl Point {

    /// The neutral element, `(-11:22:19:3)`.
    pub const NEUTRAL: Self = Self {
        X: GF127::from_i64(-11),
        Y: GF127::from_i64(22),
        Z: GF127::from_i64(19),
        T: GF127::from_i64(3),
    };

    /// The conventional base point, of prime order N.
    pub const BASE: Self = Self {
        X: GF127::ONE,
        Y: GF127::from_i64(3),
        Z: GF127::from_i64(8),
        T: GF127::w64le(0x776B01F400EA49F8, 0x4E78C9E52C769216),
    };

    // Sentinel for invalid points.
    const INVALID: Self = Self {
        X: GF127::ZERO,
        Y: GF127::ZERO,
        Z: GF127::ZERO,
        T: GF127::ZERO,
    };

    // wrap() applied to the base point in twisted coordinates:
    // (-1/3, -1/8, -1/T).
    const BASE_WRAPPED: [GF127; 3] = [
        GF127::w64le(0xAAAAAAAAAAAAAAAA, 0x2AAAAAAAAAAAAAAA),
        GF127::w64le(0xFFFFFFFFFFFFFFFF, 0x6FFFFFFFFFFFFFFF),
        GF127::w64le(0xF8A44E2ACC89939B, 0x10B577047DE9B2A1),
    ];

    #[inline(always)]
    fn coords(self) -> [GF127; 4] {
        [ self.X, self.Y, self.Z, self.T ]
    }

    /// Set this point to the value of `P` if `ctl` is 0xFFFFFFFF, or
    /// leave it unmodified if `ctl` is 0x00000000.
    #[inline]
    pub fn set_cond(&mut self, P: &Self, ctl: u32) {
        self.X.set_cond(&P.X, ctl);
        self.Y.set_cond(&P.Y, ctl);
        self.Z.set_cond(&P.Z, ctl);
        self.T.set_cond(&P.T, ctl);
    }

    // Run the ladder over a wrapped (twisted) source point, with the
    // scalar given as 32 bytes (unsigned little-endian). Only the low
    // LADDER_BITS bits of the scalar are used.
    fn ladder_wrapped(s: &[u8; 32], w: &[GF127; 3]) -> Self {
        let mut R0 = NEUTRAL_TWISTED;
        let mut R1 = unwrap(w);
        let mut swap = 0u32;
        for t in (0..LADDER_BITS).rev() {
            let kt = (((s[t >> 3] >> (t & 7)) & 1) as u32).wrapping_neg();
            swap ^= kt;
            cswap4(&mut R0, &mut R1, swap);
            swap = kt;
            dbladd(&mut R0, &mut R1, w);
        }
        cswap4(&mut R0, &mut R1, swap);
        Self { X: -R0[0], Y: R0[1], Z: R0[2], T: R0[3] }
    }

    /// Multiply this point by a scalar.
    ///
    /// The ladder needs a source point without any zero coordinate
    /// (points obtained from the base point or from a successful
    /// decoding of a public key never have one). If the source point
    /// has a zero coordinate, or is the invalid sentinel, then the
    /// result is the invalid sentinel.
    pub fn ladder(self, n: &Scalar) -> Self {
        let w = wrap(&[ -self.X, self.Y, self.Z, self.T ]);
        let mut P = Self::ladder_wrapped(&n.encode32(), &w);
        P.set_cond(&Self::INVALID, self.has_zero_coordinate());
        P
    }

    /// Double this point (in place).
    pub fn set_double(&mut self) {
        let u = twisted_hadamard(&[ -self.X, self.Y, self.Z, self.T ]);
        let d = mul4_small(&square4(&u), &EPSH);
        let d = mul4_small(&square4(&twisted_hadamard(&d)), &EPS);
        self.X = -d[0];
        self.Y = d[1];
        self.Z = d[2];
        self.T = d[3];
    }

    /// Double this point.
    #[inline(always)]
    pub fn double(self) -> Self {
        let mut r = self;
        r.set_double();
        r
    }

    /// Double this point n times (in place).
    #[inline(always)]
    pub fn set_xdouble(&mut self, n: u32) {
        for _ in 0..n {
            self.set_double();
        }
    }

    /// Double this point n times.
    #[inline(always)]
    pub fn xdouble(self, n: u32) -> Self {
        let mut r = self;
        r.set_xdouble(n);
        r
    }

    /// Multiply the conventional base point by a scalar.
    #[inline]
    pub fn mulgen(n: &Scalar) -> Self {
        Self::ladder_wrapped(&n.encode32(), &Self::BASE_WRAPPED)
    }

    /// Compare two points for projective equality.
    ///
    /// Returned value is 0xFFFFFFFF if the two points are equal, or
    /// 0x00000000 otherwise. The invalid sentinel is equal only to
    /// itself.
    pub fn equals(self, rhs: Self) -> u32 {
        let a = self.coords();
        let b = rhs.coords();
        let mut r = 0xFFFFFFFFu32;
        for i in 0..4 {
            for j in (i + 1)..4 {
                r &= (a[i] * b[j]).equals(a[j] * b[i]);
            }
        }
        r & !(self.isinvalid() ^ rhs.isinvalid())
    }

    /// Return 0xFFFFFFFF if this point is the neutral element,
    /// 0x00000000 otherwise.
    #[inline]
    pub fn isneutral(self) -> u32 {
        self.equals(Self::NEUTRAL)
    }

    /// Return 0xFFFFFFFF if this point is the invalid sentinel (all
    /// coordinates are zero), 0x00000000 otherwise.
    #[inline]
    pub fn isinvalid(self) -> u32 {
        self.X.iszero() & self.Y.iszero() & self.Z.iszero() & self.T.iszero()
    }

    /// Test whether this point has low order, i.e. an order that divides
    /// the cofactor 16 of the curve and of its twist.
    ///
    /// Returned value is 0xFFFFFFFF for a low order point, 0x00000000
    /// otherwise. The neutral element and the invalid sentinel are
    /// low-order points.
    pub fn has_low_order(self) -> u32 {
        // The images of the 2-torsion points are the 16 singular points
        // of the surface; all of them double to the neutral element.
        let P = self.xdouble(4);
        P.isneutral() | P.isinvalid()
    }

    /// Return 0xFFFFFFFF if at least one coordinate of this point is
    /// zero, 0x00000000 otherwise.
    #[inline]
    pub fn has_zero_coordinate(self) -> u32 {
        self.X.iszero() | self.Y.iszero() | self.Z.iszero() | self.T.iszero()
    }

    /// Encode this point into 32 bytes.
    ///
    /// The neutral element and the invalid sentinel both encode as 32
    /// zero bytes, which `decode()` rejects.
    pub fn encode(self) -> [u8; 32] {
        let l1 = self.X.mul2() + self.Y;
        let l2 = self.X.mul_small(3) + self.T.mul_small(11);
        let l3 = self.X.mul_small(19) + self.Z.mul_small(11);
        let l4 = self.X;

        // Normalize by the first non-zero form among l3, l2, l1 and l4,
        // in that order.
        let z1 = l1.iszero();
        let z2 = l2.iszero();
        let z3 = l3.iszero();
        let mut pv = l4;
        pv.set_cond(&l1, !z1);
        pv.set_cond(&l2, !z2);
        pv.set_cond(&l3, !z3);
        let tau = !z3;
        let ip = pv.invert();
        let l1 = l1 * ip;
        let l2 = l2 * ip;
        let l4 = l4 * ip;
        let l3 = GF127::select(&GF127::ZERO, &GF127::ONE, tau);

        let (k2, k3) = k2k3(l1, l2, l3);
        let sigma = (k2 * l4 - k3).isodd();

        let mut d = [0u8; 32];
        d[..16].copy_from_slice(&PackedElement { magnitude: l1, sign: tau }.pack());
        d[16..].copy_from_slice(&PackedElement { magnitude: l2, sign: sigma }.pack());
        d
    }

    /// Decode a point from 32 bytes.
    ///
    /// On success, this point is set to the decoded point, and
    /// 0xFFFFFFFF is returned. On failure, this point is set to the
    /// invalid sentinel, and 0x00000000 is returned. Decoding fails if
    /// the slice length is not 32, if either field element is not in
    /// canonical form, or if the bytes do not match a point of the
    /// surface. For inputs of length 32, this function is constant-time.
    pub fn set_decode(&mut self, buf: &[u8]) -> u32 {
        *self = Self::INVALID;
        if buf.len() != 32 {
            return 0;
        }
        let (e1, r1) = PackedElement::unpack(&buf[..16]);
        let (e2, r2) = PackedElement::unpack(&buf[16..]);
        let mut r = r1 & r2;
        let (l1, tau) = (e1.magnitude, e1.sign);
        let (l2, sigma) = (e2.magnitude, e2.sign);
        let l3 = GF127::select(&GF127::ZERO, &GF127::ONE, tau);

        // If tau = 0, then the encoder normalized by l2 (l2 = 1) or,
        // failing that, by l1 (l2 = 0 and l1 = 1).
        let canon = (l2 - GF127::ONE).iszero()
            | (l2.iszero() & (l1 - GF127::ONE).iszero());
        r &= tau | canon;

        let (k2, k3) = k2k3(l1, l2, l3);
        let k4 = k4(l1, l2, l3);
        let zk2 = k2.iszero();
        r &= !(zk2 & k3.iszero());

        // k2 = 0: the equation is linear, -2*k3*l4 + k4 = 0, and
        // k2*l4 - k3 = -k3 must have the expected sign.
        let la = k4 / k3.mul2();
        let ra = !((-k3).isodd() ^ sigma);

        // k2 != 0: l4 = (k3 + r)/k2 with r^2 = k3^2 - k2*k4.
        let (rt, rb) = (k3.square() - k2 * k4).sqrt_signed(sigma);
        let lb = (k3 + rt) / k2;

        let l4 = GF127::select(&lb, &la, zk2);
        r &= (zk2 & ra) | (!zk2 & rb);

        self.X = l4.mul_small(11);
        self.Y = l1.mul_small(11) - l4.mul_small(22);
        self.Z = l3 - l4.mul_small(19);
        self.T = l2 - l4.mul_small(3);
        self.set_cond(&Self::INVALID, !r);
        r
    }

    /// Decode a point from 32 bytes.
    ///
    /// `None` is returned on failure (see `set_decode()`).
    pub fn decode(buf: &[u8]) -> Option<Self> {
        let mut P = Self::INVALID;
        if P.set_decode(buf) != 0 {
            Some(P)
        } else {
            None
        }
    }
}

/// Verify the qDSA relation between two points and an encoded point.
///
/// This function returns `true` if `R_enc` decodes to a point `R` such
/// that `R` is `x(P + Q)` or `x(P - Q)`, where `P` and `Q` are points of
/// the Jacobian whose images on the Kummer surface are the provided `P`
/// and `Q`. If `R_enc` is not a valid encoding, or if `P` or `Q` is the
/// neutral element or the invalid sentinel, then `false` is returned.
///
/// This function is constant-time, and meant to be used only on public
/// values.
pub fn check(P: &Point, Q: &Point, R_enc: &[u8]) -> bool {
    let mut R = Point::INVALID;
    let mut r = R.set_decode(R_enc);
    r &= !(P.isinvalid() | P.isneutral());
    r &= !(Q.isinvalid() | Q.isneutral());

    let ph = hadamard(&P.coords());
    let qh = hadamard(&Q.coords());

    // Diagonal values B_ii.
    let mut u = mul4_small(&mul4(&ph, &qh), &EPSH);
    u[0].set_neg();
    let bii = square4(&hadamard(&u));

    // Off-diagonal values B_ij.
    let p2 = square4(&ph);
    let q2 = square4(&qh);
    let mut bij = [[GF127::ZERO; 4]; 4];
    for (k, &(a, b, c, d)) in CLASSES.iter().enumerate() {
        let m = &BIJ_M[k];
        let mut s = GF127::ZERO;
        for i in 0..4 {
            let mut t = GF127::ZERO;
            for j in 0..4 {
                t += m[i][j] * q2[j];
            }
            s += p2[i] * t;
        }

        let x = &BIJ_X[k];
        let pab = ph[a] * ph[b];
        let pcd = ph[c] * ph[d];
        let qab = qh[a] * qh[b];
        let qcd = qh[c] * qh[d];
        let xv = x[0] * (pab * qab)
            + x[1] * (pab * qcd + pcd * qab)
            + x[2] * (pcd * qcd);
        bij[a][b] = s + xv;
        bij[c][d] = s - xv;
    }

    // For all i < j:
    //   B_jj*R_i^2 - 2*C*B_ij*R_i*R_j + B_ii*R_j^2 = 0
    let rc = R.coords();
    for i in 0..4 {
        for j in (i + 1)..4 {
            let e = bii[j] * rc[i].square()
                - CHECK_2C * bij[i][j] * (rc[i] * rc[j])
                + bii[i] * rc[j].square();
            r &= e.iszero();
        }
    }
    r != 0
}

// ========================================================================
