//! qDSA signatures and Diffie-Hellman key exchange on the Kummer surface.
//!
//! This module implements the quotient Digital Signature Algorithm
//! (qDSA) over the genus-2 Kummer surface defined in `kummer`, along
//! with a Diffie-Hellman key exchange that uses the same keys.
//!
//! A private key is a 32-byte seed. The seed is hashed into 64 bytes;
//! the first 32 bytes, interpreted as an integer (unsigned little-endian
//! convention) and reduced modulo N, make the secret scalar `x`. The
//! whole 64-byte hashed seed is used to derive the per-signature nonces.
//! The public key is the compressed point `[x]B` (32 bytes).
//!
//! A signature over a message `m` is computed as follows:
//!
//!  1. `r = Hash(Hash(seed) || m)`, reduced modulo N;
//!  2. `R = encode([r]B)`;
//!  3. `h = Hash(R || pub || m)`, reduced modulo N;
//!  4. `s = r - h*x mod N`, replaced with `-s` if `s > (N-1)/2`;
//!  5. the signature is `R || s` (64 bytes).
//!
//! Signature generation is deterministic. Verification recomputes `h`
//! and checks that `R` is `x([s]B + [h]A)` or `x([s]B - [h]A)`, with the
//! biquadratic relation implemented by `kummer::check()`. Verification
//! rejects values of `s` that are not in canonical positive form (this
//! prevents the trivial malleability `s -> -s`), and public keys that
//! have a zero coordinate or a low order (a low-order key would make
//! `[h]A` the neutral element for some `h`, and the relation would then
//! hold for any `R = [s]B`).
//!
//! The key exchange computes the compressed point `[x]A`, where `x` is
//! the local secret scalar and `A` the peer's public key. This is
//! symmetric: both parties obtain the same 32 bytes.
//!
//! The hash function is a parameter, through the `Hash` trait.
//! Implementations are provided for SHAKE128 (with a 64-byte output)
//! and SHA-512. The `keypair()`, `sign()`, `verify()` and
//! `derive_shared_secret()` functions use `DefaultHash`, which is
//! SHAKE128, unless the `sha512` feature is enabled; the `*_with()`
//! variants take the hash function as a type parameter.

// Projective/fractional coordinates traditionally use uppercase letters,
// using lowercase only for affine coordinates.
#![allow(non_snake_case)]

use core::convert::TryFrom;
use core::fmt;

use sha2::{Sha512, Digest};
use sha3::{Shake128, digest::{Update, ExtendableOutput, XofReader}};

use super::field::Scalar;
use super::kummer::{Point, check};
use super::{CryptoRng, RngCore};

/// A hash function with a 64-byte output.
pub trait Hash {

    /// Hash the concatenation of the provided byte slices.
    fn hash(data: &[&[u8]]) -> [u8; 64];
}

impl Hash for Shake128 {

    fn hash(data: &[&[u8]]) -> [u8; 64] {
        let mut sh = Shake128::default();
        for &d in data.iter() {
            Update::update(&mut sh, d);
        }
        let mut hv = [0u8; 64];
        sh.finalize_xof().read(&mut hv);
        hv
    }
}

impl Hash for Sha512 {

    fn hash(data: &[&[u8]]) -> [u8; 64] {
        let mut sh = Sha512::new();
        for &d in data.iter() {
            Digest::update(&mut sh, d);
        }
        let mut hv = [0u8; 64];
        hv[..].copy_from_slice(&sh.finalize()[..]);
        hv
    }
}

/// Hash function used by the functions that do not take it as an
/// explicit type parameter.
#[cfg(not(feature = "sha512"))]
pub type DefaultHash = Shake128;

/// Hash function used by the functions that do not take it as an
/// explicit type parameter.
#[cfg(feature = "sha512")]
pub type DefaultHash = Sha512;

// Keys remember the hash function they were built with.
type HashFn = fn(&[&[u8]]) -> [u8; 64];

/// A qDSA private key.
///
/// It is built from a 32-byte seed (which should be generated from a
/// cryptographically secure random source). The secret scalar, the
/// nonce derivation prefix and the public key are derived from the seed.
#[derive(Clone, Copy)]
pub struct PrivateKey {
    x: Scalar,                  // secret scalar
    seed: [u8; 32],             // source seed
    prefix: [u8; 64],           // hashed seed
    hash: HashFn,               // hash function
    pub public_key: PublicKey,  // public key
}

/// A qDSA public key.
///
/// It wraps around the Kummer point, but also includes a copy of the
/// encoded point. The point and its encoded version can be accessed
/// directly; if modified, then the two values MUST match.
#[derive(Clone, Copy)]
pub struct PublicKey {
    pub point: Point,
    pub encoded: [u8; 32],
    hash: HashFn,
}

impl PrivateKey {

    /// Generates a new private key from a cryptographically secure RNG.
    pub fn generate<T: CryptoRng + RngCore>(rng: &mut T) -> Self {
        Self::generate_with::<DefaultHash, T>(rng)
    }

    /// Generates a new private key from a cryptographically secure RNG,
    /// using the specified hash function.
    pub fn generate_with<H: Hash, T: CryptoRng + RngCore>(rng: &mut T)
        -> Self
    {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        Self::from_seed_with::<H>(&seed)
    }

    /// Instantiates a private key from the provided seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::from_seed_with::<DefaultHash>(seed)
    }

    /// Instantiates a private key from the provided seed, using the
    /// specified hash function.
    pub fn from_seed_with<H: Hash>(seed: &[u8; 32]) -> Self {
        // The secret scalar is the first half of the hashed seed,
        // reduced modulo N.
        let prefix = H::hash(&[&seed[..]]);
        let x = Scalar::decode_reduce(&prefix[..32]);
        let public_key = PublicKey::from_point(&Point::mulgen(&x), H::hash);
        Self { x, seed: *seed, prefix, hash: H::hash, public_key }
    }

    /// Decodes a private key from bytes.
    ///
    /// If the source slice has length exactly 32 bytes, then these bytes
    /// are interpreted as a seed, and the private key is built on that
    /// seed (see `from_seed()`). Otherwise, `None` is returned.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        Self::decode_with::<DefaultHash>(buf)
    }

    /// Decodes a private key from bytes, using the specified hash
    /// function (see `decode()`).
    pub fn decode_with<H: Hash>(buf: &[u8]) -> Option<Self> {
        if buf.len() == 32 {
            Some(Self::from_seed_with::<H>(<&[u8; 32]>::try_from(buf).unwrap()))
        } else {
            None
        }
    }

    /// Encodes a private key into 32 bytes.
    ///
    /// This actually returns a copy of the seed.
    pub fn encode(self) -> [u8; 32] {
        self.seed
    }

    /// Signs a message.
    ///
    /// The signature is deterministic: signing the same message twice
    /// with the same key yields the same 64 bytes.
    pub fn sign(self, data: &[u8]) -> [u8; 64] {
        // r = Hash(prefix || m), R = [r]B
        let r = Scalar::decode_reduce(&(self.hash)(&[&self.prefix[..], data]));
        let R_enc = Point::mulgen(&r).encode();

        // h = Hash(R || A || m)
        let h = Scalar::decode_reduce(&(self.hash)(
            &[&R_enc[..], &self.public_key.encoded[..], data]));

        // s = r - h*x, in canonical positive form
        let mut s = Scalar::mul_sub(&r, &h, &self.x);
        s.set_condneg(s.isnegative());

        let mut sig = [0u8; 64];
        sig[..32].copy_from_slice(&R_enc);
        sig[32..].copy_from_slice(&s.encode32());
        sig
    }

    /// Computes the shared secret with the provided peer public key
    /// (encoded over 32 bytes).
    ///
    /// `None` is returned if the peer public key cannot be decoded
    /// (see `PublicKey::decode()`), or if the resulting point is the
    /// neutral element. The peer key is decoded with the hash function of
    /// this private key (the hash function does not influence the shared
    /// secret).
    pub fn shared_secret(self, peer: &[u8]) -> Option<[u8; 32]> {
        let pk = PublicKey::decode_hashfn(peer, self.hash)?;
        let P = pk.point.ladder(&self.x);
        if (P.isneutral() | P.isinvalid()) != 0 {
            return None;
        }
        Some(P.encode())
    }
}

impl fmt::Debug for PrivateKey {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key)
            .finish()
    }
}

impl PublicKey {

    // Creates an instance from a Kummer point.
    fn from_point(point: &Point, hash: HashFn) -> Self {
        Self { point: *point, encoded: point.encode(), hash }
    }

    fn decode_hashfn(buf: &[u8], hash: HashFn) -> Option<Self> {
        let point = Point::decode(buf)?;
        if (point.has_zero_coordinate() | point.has_low_order()) != 0 {
            return None;
        }
        let mut encoded = [0u8; 32];
        encoded[..].copy_from_slice(&buf[..32]);
        Some(Self { point, encoded, hash })
    }

    /// Decodes the provided bytes as a public key.
    ///
    /// This process fails if the source slice does not have length
    /// exactly 32 bytes, if these bytes are not the valid encoding of a
    /// point of the Kummer surface, or if the point has a zero
    /// coordinate or a low order (neither happens for a key obtained
    /// from a seed).
    pub fn decode(buf: &[u8]) -> Option<Self> {
        Self::decode_hashfn(buf, <DefaultHash as Hash>::hash)
    }

    /// Decodes the provided bytes as a public key, to be used with the
    /// specified hash function (see `decode()`).
    pub fn decode_with<H: Hash>(buf: &[u8]) -> Option<Self> {
        Self::decode_hashfn(buf, H::hash)
    }

    /// Encodes the key into exactly 32 bytes.
    ///
    /// This simply returns the contents of the `encoded` field.
    pub fn encode(self) -> [u8; 32] {
        self.encoded
    }

    /// Verifies a signature on a message.
    ///
    /// Return value is `true` on a valid signature, `false` otherwise.
    /// A signature with a length distinct from 64 bytes is invalid.
    pub fn verify(self, sig: &[u8], data: &[u8]) -> bool {
        if sig.len() != 64 {
            return false;
        }

        // The response must be canonical (lower than N) and in positive
        // form.
        let s = match Scalar::decode(&sig[32..]) {
            Some(s) => s,
            None    => { return false; }
        };
        if s.isnegative() != 0 {
            return false;
        }

        // h = Hash(R || A || m)
        let R_enc = &sig[..32];
        let h = Scalar::decode_reduce(&(self.hash)(
            &[R_enc, &self.encoded[..], data]));

        // R must be x([s]B + [h]A) or x([s]B - [h]A).
        let P = Point::mulgen(&s);
        let Q = self.point.ladder(&h);
        check(&P, &Q, R_enc)
    }
}

impl fmt::Debug for PublicKey {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("point", &self.point)
            .field("encoded", &self.encoded)
            .finish()
    }
}

/// Generates a key pair from a seed.
///
/// Returned values are the encoded public key, and the private key
/// (which is the seed itself).
pub fn keypair(seed: &[u8; 32]) -> ([u8; 32], [u8; 32]) {
    keypair_with::<DefaultHash>(seed)
}

/// Generates a key pair from a seed, with the specified hash function
/// (see `keypair()`).
pub fn keypair_with<H: Hash>(seed: &[u8; 32]) -> ([u8; 32], [u8; 32]) {
    let sk = PrivateKey::from_seed_with::<H>(seed);
    (sk.public_key.encode(), sk.encode())
}

/// Signs a message with the private key (seed).
pub fn sign(seed: &[u8; 32], data: &[u8]) -> [u8; 64] {
    sign_with::<DefaultHash>(seed, data)
}

/// Signs a message with the private key (seed), using the specified
/// hash function.
pub fn sign_with<H: Hash>(seed: &[u8; 32], data: &[u8]) -> [u8; 64] {
    PrivateKey::from_seed_with::<H>(seed).sign(data)
}

/// Verifies a signature on a message against an encoded public key.
pub fn verify(pk: &[u8; 32], sig: &[u8; 64], data: &[u8]) -> bool {
    verify_with::<DefaultHash>(pk, sig, data)
}

/// Verifies a signature on a message against an encoded public key,
/// using the specified hash function.
pub fn verify_with<H: Hash>(pk: &[u8; 32], sig: &[u8; 64], data: &[u8])
    -> bool
{
    match PublicKey::decode_with::<H>(&pk[..]) {
        Some(pk) => pk.verify(&sig[..], data),
        None     => false,
    }
}

/// Computes the shared secret between a private key (seed) and an
/// encoded peer public key.
///
/// `None` is returned if the peer public key is invalid, or has a low
/// order.
pub fn derive_shared_secret(pk: &[u8; 32], sk: &[u8; 32])
    -> Option<[u8; 32]>
{
    shared_secret_with::<DefaultHash>(pk, sk)
}

/// Computes the shared secret between a private key (seed) and an
/// encoded peer public key, using the specified hash function to derive
/// the secret scalar from the seed.
pub fn shared_secret_with<H: Hash>(pk: &[u8; 32], sk: &[u8; 32])
    -> Option<[u8; 32]>
{
    PrivateKey::from_seed_with::<H>(sk).shared_secret(&pk[..])
}

// ========================================================================

#[cfg(test)]
mod tests {

    use super::*;
    use sha2::{Sha256, Sha512, Digest};
    use sha3::Shake128;

    fn hex32(s: &str) -> [u8; 32] {
        let mut d = [0u8; 32];
        hex::decode_to_slice(s, &mut d[..]).unwrap();
        d
    }

    fn hex64(s: &str) -> [u8; 64] {
        let mut d = [0u8; 64];
        hex::decode_to_slice(s, &mut d[..]).unwrap();
        d
    }

    // Deterministic RNG for tests (NOT secure).
    struct TestRng(Sha256, u64);

    impl RngCore for TestRng {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }
        fn next_u64(&mut self) -> u64 {
            let mut d = [0u8; 8];
            self.fill_bytes(&mut d);
            u64::from_le_bytes(d)
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(32) {
                Digest::update(&mut self.0, self.1.to_le_bytes());
                self.1 += 1;
                let v = self.0.finalize_reset();
                chunk.copy_from_slice(&v[..chunk.len()]);
            }
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8])
            -> Result<(), crate::RngError>
        {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for TestRng { }

    const PK0: &str = "674fa1f18fef4e0e8c17178b58a036cd2c024934ddd69f48870116636dd677ce";
    const SIG0: &str = "fe669b75e44bd6f22adc03454d99fcd6ec36ddd0af52b10c9bc376cdb086eeab4dedc512d6c9d9a9ab29488e0a61e2b26cc8af1655e4dfa0e6ab28f28d799800";

    #[test]
    fn qdsa_kat_shake128() {
        let seed = [0u8; 32];
        let (pk, sk) = keypair_with::<Shake128>(&seed);
        assert!(pk == hex32(PK0));
        assert!(sk == seed);

        let sig = sign_with::<Shake128>(&seed, b"abc");
        assert!(sig == hex64(SIG0));
        assert!(verify_with::<Shake128>(&pk, &sig, b"abc"));
        assert!(!verify_with::<Shake128>(&pk, &sig, b"abd"));
        assert!(!verify_with::<Shake128>(&pk, &sig, b""));
    }

    #[test]
    fn qdsa_kat_sha512() {
        let seed = [0u8; 32];
        let (pk, _) = keypair_with::<Sha512>(&seed);
        assert!(pk == hex32("3a120c4cd2f8ed693ee9b9b265ca30b0fbb4e48a481d939dd2259ac534fd804f"));
        let sig = sign_with::<Sha512>(&seed, b"abc");
        assert!(sig == hex64("a3e6559d110c681ac4d7dd1064353fa8ca7425194e4616565546d17476d0ec9c1106763e013d9b537b209f3e5b2ae6f06bc60fd662ed0afc1b2e12cffa102601"));
        assert!(verify_with::<Sha512>(&pk, &sig, b"abc"));
        assert!(!verify_with::<Sha512>(&pk, &sig, b"abd"));

        // The hash function is part of the scheme.
        assert!(!verify_with::<Shake128>(&pk, &sig, b"abc"));
    }

    #[test]
    fn qdsa_default_hash() {
        let seed = [0u8; 32];
        let (pk, _) = keypair(&seed);
        let sig = sign(&seed, b"abc");
        assert!(pk == keypair_with::<DefaultHash>(&seed).0);
        assert!(sig == sign_with::<DefaultHash>(&seed, b"abc"));
        assert!(verify(&pk, &sig, b"abc"));
        assert!(!verify(&pk, &sig, b"abd"));
    }

    #[test]
    fn qdsa_dh() {
        let mut sa = [0u8; 32];
        let mut sb = [0u8; 32];
        for i in 0..32 {
            sa[i] = i as u8;
            sb[i] = (i + 32) as u8;
        }
        let (pa, _) = keypair_with::<Shake128>(&sa);
        let (pb, _) = keypair_with::<Shake128>(&sb);
        assert!(pa == hex32("d3a530e784d9672dc0f7ab43c3eac7aca4bf14c427160c3c7adfb99f7546bb1c"));
        assert!(pb == hex32("cde973c0855aa9e574fe704c6ad3e8a49a86659c3ed1dfad21b9fba5b26d6a2a"));

        let kab = shared_secret_with::<Shake128>(&pb, &sa).unwrap();
        let kba = shared_secret_with::<Shake128>(&pa, &sb).unwrap();
        assert!(kab == hex32("2b748ebc8b3f8c26628878676c4225abb39aefda74c6ba8d374b479ec3c8c930"));
        assert!(kab == kba);
        let kaa = shared_secret_with::<Shake128>(&pa, &sa).unwrap();
        assert!(kaa == hex32("8f30e154da323a7f69a66f181d7162ec18eae2c3aa53af49f0daddccf73c4029"));

        // Invalid peer keys.
        assert!(shared_secret_with::<Shake128>(&[0u8; 32], &sa).is_none());
        let mut bad = [0u8; 32];
        bad[0] = 0x01;
        bad[15] = 0x80;
        bad[16] = 0x01;
        assert!(derive_shared_secret(&bad, &sa).is_none());
        assert!(derive_shared_secret(&pb, &sa).is_some());

        let ka = PrivateKey::from_seed_with::<Shake128>(&sa);
        assert!(ka.shared_secret(&pb[..]) == Some(kab));
        assert!(ka.shared_secret(&pb[..31]).is_none());
    }

    #[test]
    fn qdsa_tamper() {
        let pk = hex32(PK0);
        let sig = hex64(SIG0);
        let pko = PublicKey::decode_with::<Shake128>(&pk[..]).unwrap();
        for i in 0..(64 * 8) {
            let mut s2 = sig;
            s2[i >> 3] ^= 1u8 << (i & 7);
            assert!(!pko.verify(&s2[..], b"abc"));
        }
        for i in 0..(32 * 8) {
            let mut pk2 = pk;
            pk2[i >> 3] ^= 1u8 << (i & 7);
            assert!(!verify_with::<Shake128>(&pk2, &sig, b"abc"));
        }

        // Wrong lengths.
        assert!(!pko.verify(&sig[..63], b"abc"));
        let mut sig65 = [0u8; 65];
        sig65[..64].copy_from_slice(&sig);
        assert!(!pko.verify(&sig65[..], b"abc"));

        // Negated response (non-canonical form).
        let s = Scalar::decode(&sig[32..]).unwrap();
        let mut s2 = sig;
        s2[32..].copy_from_slice(&(-s).encode32());
        assert!(!pko.verify(&s2[..], b"abc"));

        // Response out of range.
        let mut s2 = sig;
        for i in 32..64 {
            s2[i] = 0xFF;
        }
        assert!(!pko.verify(&s2[..], b"abc"));
    }

    #[test]
    fn qdsa_sign_verify() {
        let mut rng = TestRng(Sha256::new(), 0);
        let mut msg = [0u8; 100];
        for i in 0..10 {
            let skey = if i % 2 == 0 {
                PrivateKey::generate_with::<Shake128, _>(&mut rng)
            } else {
                PrivateKey::generate_with::<Sha512, _>(&mut rng)
            };
            let pkey = skey.public_key;
            rng.fill_bytes(&mut msg[..]);
            let m = &msg[..(i * 10)];

            let sig = skey.sign(m);
            assert!(sig == skey.sign(m));
            assert!(pkey.verify(&sig[..], m));

            // Response is in positive form.
            let s = Scalar::decode(&sig[32..]).unwrap();
            assert!(s.isnegative() == 0);

            // Encode/decode of keys.
            let sk2 = if i % 2 == 0 {
                PrivateKey::decode_with::<Shake128>(&skey.encode()[..]).unwrap()
            } else {
                PrivateKey::decode_with::<Sha512>(&skey.encode()[..]).unwrap()
            };
            assert!(sk2.public_key.encode() == pkey.encode());
            let pk2 = if i % 2 == 0 {
                PublicKey::decode_with::<Shake128>(&pkey.encode()[..]).unwrap()
            } else {
                PublicKey::decode_with::<Sha512>(&pkey.encode()[..]).unwrap()
            };
            assert!(pk2.point.equals(pkey.point) == 0xFFFFFFFF);
            assert!(pk2.verify(&sig[..], m));

            // Another key does not verify the signature.
            let other = PrivateKey::generate_with::<Shake128, _>(&mut rng);
            assert!(!other.public_key.verify(&sig[..], m));

            // Another message does not verify.
            let mut m2 = [0u8; 101];
            m2[..m.len()].copy_from_slice(m);
            assert!(!pkey.verify(&sig[..], &m2[..(m.len() + 1)]));
        }

        assert!(PrivateKey::decode(&[0u8; 31]).is_none());
        assert!(PublicKey::decode(&[0u8; 32]).is_none());
        let k = PrivateKey::generate(&mut rng);
        assert!(PublicKey::decode(&k.public_key.encode()[..]).is_some());
    }

    // Encodings of 2-torsion points of the surface.
    const LOW_PK: [&str; 3] = [
        "01fa94f6a0ccb38a1a2305eebee3e2e50277df71f1b20dd0a7b407659e55d418",
        "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbf3f0eeeeeeeeeeeeeeeeeeeeeeeeeeee16",
        "5d89da95a85d89da95a85d89da95a8dd0dcec7e07c0ccec7e07c0ccec7e07c0c",
    ];

    #[test]
    fn qdsa_low_order_keys() {
        let seed = [7u8; 32];
        let sk = PrivateKey::from_seed_with::<Shake128>(&seed);
        for s in LOW_PK.iter() {
            let pk = hex32(s);
            assert!(Point::decode(&pk[..]).is_some());
            assert!(PublicKey::decode_with::<Shake128>(&pk[..]).is_none());
            assert!(PublicKey::decode_with::<Sha512>(&pk[..]).is_none());

            // No shared secret with a low-order peer key.
            assert!(shared_secret_with::<Shake128>(&pk, &seed).is_none());
            assert!(derive_shared_secret(&pk, &seed).is_none());
            assert!(sk.shared_secret(&pk[..]).is_none());

            // Signatures R || s with R = [s]B, which need no secret, must
            // not verify, even if the key is used without going through
            // decoding.
            let T = Point::decode(&pk[..]).unwrap();
            let pko = PublicKey::from_point(&T, <Shake128 as Hash>::hash);
            for i in 0..16u32 {
                let mut msg = [0u8; 4];
                msg.copy_from_slice(&i.to_le_bytes());
                let mut sv = Scalar::from_u32(1000 + 17 * i);
                sv.set_condneg(sv.isnegative());
                let mut sig = [0u8; 64];
                sig[..32].copy_from_slice(&Point::mulgen(&sv).encode());
                sig[32..].copy_from_slice(&sv.encode32());
                assert!(!verify_with::<Shake128>(&pk, &sig, &msg));
                assert!(!pko.verify(&sig[..], &msg));
            }
        }
    }
}
