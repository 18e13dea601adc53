//! Yespower 1.0 proof-of-work hash.
//!
//! A memory-hard, CPU-friendly derivative of scrypt. The sequential-memory
//! pass of scrypt is kept, and every block mix additionally runs `pwxform`,
//! a chain of small multiplications and lookups into a write-back S-box that
//! is cheap for CPUs and costly to pipeline on dedicated hardware.

use bitcoin::block::Header;
use bitcoin::consensus::encode::serialize;
use hmac::{Hmac, Mac};
use rtid_types::constants::{YESPOWER_N, YESPOWER_R};
use rtid_types::error::RtidError;
use rtid_types::primitives::Hash;
use sha2::{Digest, Sha256};

// ─── pwxform Parameters ──────────────────────────────────────────────────────

/// 64-bit lanes processed per gather.
const PWX_SIMPLE: usize = 2;
/// Parallel gathers per 64-byte block.
const PWX_GATHER: usize = 4;
const PWX_ROUNDS: usize = 3;
/// log2 of the number of 16-byte entries in each S-box.
const S_WIDTH: usize = 11;
const SALSA_ROUNDS: usize = 2;

/// Words (u32) in each of the three rotating S-boxes.
const S_BOX_WORDS: usize = (1 << S_WIDTH) * PWX_SIMPLE * 2;
const S_WORDS: usize = 3 * S_BOX_WORDS;
const S_MASK: u32 = ((1 << S_WIDTH) - 1) * (PWX_SIMPLE as u32) * 8;
const W_MASK: usize = (1 << S_WIDTH) * 2 - 1;

/// Cost parameters of one yespower instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YespowerParams {
    /// Memory cost; a power of two.
    pub n: u32,
    /// Block size multiplier.
    pub r: u32,
    /// Optional personalization string, used as the PBKDF2 salt.
    pub pers: Option<&'static [u8]>,
}

impl YespowerParams {
    /// Parameters of the chain's proof-of-work hash.
    pub const CHAIN: YespowerParams = YespowerParams {
        n: YESPOWER_N,
        r: YESPOWER_R,
        pers: None,
    };

    pub fn validate(&self) -> Result<(), RtidError> {
        if !(8..=32).contains(&self.r) {
            return Err(RtidError::InvalidPowParams {
                reason: format!("r = {} is outside 8..=32", self.r),
            });
        }
        if !self.n.is_power_of_two() || !(1024..=512 * 1024).contains(&self.n) {
            return Err(RtidError::InvalidPowParams {
                reason: format!("N = {} is not a power of two in 1024..=524288", self.n),
            });
        }
        Ok(())
    }
}

/// Hash `input` with yespower 1.0.
pub fn yespower(params: &YespowerParams, input: &[u8]) -> Result<Hash, RtidError> {
    params.validate()?;
    let n = params.n as usize;
    let r = params.r as usize;

    let seed: Hash = Sha256::digest(input).into();
    let mut bytes = vec![0u8; 128 * r];
    pbkdf2::pbkdf2_hmac::<Sha256>(&seed, params.pers.unwrap_or(&[]), 1, &mut bytes);

    let mut prehash = [0u8; 32];
    prehash.copy_from_slice(&bytes[..32]);

    let mut b: Vec<u32> = bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    let mut v = vec![0u32; 32 * r * n];
    let mut ctx = PwxformCtx::new();
    smix(&mut b, r, n, &mut v, &mut ctx);

    let key: Vec<u8> = b[b.len() - 16..]
        .iter()
        .flat_map(|word| word.to_le_bytes())
        .collect();
    let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(&key)
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(&prehash);
    Ok(mac.finalize().into_bytes().into())
}

/// Proof-of-work hash of a block header, taken over its 80-byte consensus
/// encoding.
pub fn pow_hash(header: &Header) -> Result<Hash, RtidError> {
    yespower(&YespowerParams::CHAIN, &serialize(header))
}

// ─── Core ────────────────────────────────────────────────────────────────────

struct PwxformCtx {
    s: Vec<u32>,
    s0: usize,
    s1: usize,
    s2: usize,
    /// Write cursor into the current S-box, in 64-bit entries.
    w: usize,
}

impl PwxformCtx {
    fn new() -> Self {
        Self {
            s: vec![0u32; S_WORDS],
            s0: 0,
            s1: S_BOX_WORDS,
            s2: 2 * S_BOX_WORDS,
            w: 0,
        }
    }

    fn pwxform(&mut self, x: &mut [u32; 16]) {
        let (s0, s1) = (self.s0, self.s1);
        let mut w = self.w;

        for round in 0..PWX_ROUNDS {
            for j in 0..PWX_GATHER {
                let p0 = s0 + ((x[j * 4] & S_MASK) / 8) as usize * 2;
                let p1 = s1 + ((x[j * 4 + 1] & S_MASK) / 8) as usize * 2;
                for k in 0..PWX_SIMPLE {
                    let lo = j * 4 + 2 * k;
                    let a = u64::from(self.s[p0 + 2 * k]) | u64::from(self.s[p0 + 2 * k + 1]) << 32;
                    let b = u64::from(self.s[p1 + 2 * k]) | u64::from(self.s[p1 + 2 * k + 1]) << 32;
                    let v = (u64::from(x[lo + 1]) * u64::from(x[lo])).wrapping_add(a) ^ b;
                    x[lo] = v as u32;
                    x[lo + 1] = (v >> 32) as u32;
                }
                if round == 0 || j < 2 {
                    if j & 1 == 1 {
                        for k in 0..PWX_SIMPLE {
                            let lo = j * 4 + 2 * k;
                            self.s[s1 + 2 * w] = x[lo];
                            self.s[s1 + 2 * w + 1] = x[lo + 1];
                            w += 1;
                        }
                    } else {
                        for k in 0..PWX_SIMPLE {
                            let lo = j * 4 + 2 * k;
                            self.s[s0 + 2 * (w + k)] = x[lo];
                            self.s[s0 + 2 * (w + k) + 1] = x[lo + 1];
                        }
                    }
                }
            }
        }

        (self.s0, self.s1, self.s2) = (self.s2, s0, s1);
        self.w = w & W_MASK;
    }
}

fn salsa20(block: &mut [u32]) {
    let mut x = [0u32; 16];
    for i in 0..16 {
        x[i * 5 % 16] = block[i];
    }
    for _ in (0..SALSA_ROUNDS).step_by(2) {
        for (a, b, c, d) in [(0, 4, 8, 12), (5, 9, 13, 1), (10, 14, 2, 6), (15, 3, 7, 11)] {
            quarter_round(&mut x, a, b, c, d);
        }
        for (a, b, c, d) in [(0, 1, 2, 3), (5, 6, 7, 4), (10, 11, 8, 9), (15, 12, 13, 14)] {
            quarter_round(&mut x, a, b, c, d);
        }
    }
    for i in 0..16 {
        block[i] = block[i].wrapping_add(x[i * 5 % 16]);
    }
}

#[inline]
fn quarter_round(x: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    x[b] ^= x[a].wrapping_add(x[d]).rotate_left(7);
    x[c] ^= x[b].wrapping_add(x[a]).rotate_left(9);
    x[d] ^= x[c].wrapping_add(x[b]).rotate_left(13);
    x[a] ^= x[d].wrapping_add(x[c]).rotate_left(18);
}

fn xor_into(dst: &mut [u32], src: &[u32]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

/// Salsa20 block mix over a single 128-byte block; fills the S-boxes.
fn blockmix_salsa(b: &mut [u32]) {
    let mut x = [0u32; 16];
    x.copy_from_slice(&b[16..32]);
    for i in 0..2 {
        xor_into(&mut x, &b[i * 16..(i + 1) * 16]);
        salsa20(&mut x);
        b[i * 16..(i + 1) * 16].copy_from_slice(&x);
    }
}

fn blockmix_pwxform(b: &mut [u32], r: usize, ctx: &mut PwxformCtx) {
    let r1 = 2 * r;
    let mut x = [0u32; 16];
    x.copy_from_slice(&b[(r1 - 1) * 16..r1 * 16]);
    for i in 0..r1 {
        xor_into(&mut x, &b[i * 16..(i + 1) * 16]);
        ctx.pwxform(&mut x);
        b[i * 16..(i + 1) * 16].copy_from_slice(&x);
    }
    salsa20(&mut b[(r1 - 1) * 16..r1 * 16]);
}

/// Reorder each 64-byte sub-block into the diagonal layout salsa20 works on.
fn shuffle(src: &[u32], dst: &mut [u32]) {
    for k in 0..src.len() / 16 {
        for i in 0..16 {
            dst[k * 16 + i] = src[k * 16 + i * 5 % 16];
        }
    }
}

fn unshuffle(src: &[u32], dst: &mut [u32]) {
    for k in 0..src.len() / 16 {
        for i in 0..16 {
            dst[k * 16 + i * 5 % 16] = src[k * 16 + i];
        }
    }
}

fn integerify(x: &[u32], r: usize) -> u32 {
    x[(2 * r - 1) * 16]
}

fn p2floor(mut x: usize) -> usize {
    while x & (x - 1) != 0 {
        x &= x - 1;
    }
    x
}

/// Map `x` into the already-written window `[i - p2floor(i), i)`.
fn wrap(x: u32, i: usize) -> usize {
    let n = p2floor(i);
    (x as usize & (n - 1)) + (i - n)
}

fn smix1<F>(b: &mut [u32], r: usize, n: usize, v: &mut [u32], mut mix: F)
where
    F: FnMut(&mut [u32], usize),
{
    let s = 32 * r;
    let mut x = vec![0u32; s];
    shuffle(&b[..s], &mut x);

    for k in 1..r {
        x.copy_within((k - 1) * 32..k * 32, k * 32);
        mix(&mut x[k * 32..(k + 1) * 32], 1);
    }

    for i in 0..n {
        v[i * s..(i + 1) * s].copy_from_slice(&x);
        if i > 1 {
            let j = wrap(integerify(&x, r), i);
            xor_into(&mut x, &v[j * s..(j + 1) * s]);
        }
        mix(&mut x, r);
    }

    unshuffle(&x, &mut b[..s]);
}

fn smix2(b: &mut [u32], r: usize, n: usize, nloop: usize, v: &mut [u32], ctx: &mut PwxformCtx) {
    let s = 32 * r;
    let mut x = vec![0u32; s];
    shuffle(&b[..s], &mut x);

    for _ in 0..nloop {
        let j = integerify(&x, r) as usize & (n - 1);
        xor_into(&mut x, &v[j * s..(j + 1) * s]);
        if nloop != 2 {
            v[j * s..(j + 1) * s].copy_from_slice(&x);
        }
        blockmix_pwxform(&mut x, r, ctx);
    }

    unshuffle(&x, &mut b[..s]);
}

fn smix(b: &mut [u32], r: usize, n: usize, v: &mut [u32], ctx: &mut PwxformCtx) {
    let nloop_all = (n + 2) / 3;
    let nloop_rw = (nloop_all + 1) & !1;
    let nloop_all = (nloop_all + 1) & !1;

    smix1(&mut b[..32], 1, S_WORDS / 32, &mut ctx.s, |x, _| blockmix_salsa(x));
    smix1(b, r, n, v, |x, rr| blockmix_pwxform(x, rr, ctx));
    smix2(b, r, n, nloop_rw, v, ctx);
    smix2(b, r, n, nloop_all - nloop_rw, v, ctx);
}
