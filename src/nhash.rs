//! Bob Jenkins' lookup3 `hashlittle`, and the 15-bit WSPR callsign hash built on it.

/// Seed used by WSPR for callsign hashes.
pub const WSPR_NHASH_INITVAL: u32 = 146;

const NHASH_MASK: u32 = 0x7fff;

fn mix(a: &mut u32, b: &mut u32, c: &mut u32) {
    *a = a.wrapping_sub(*c);
    *a ^= c.rotate_left(4);
    *c = c.wrapping_add(*b);
    *b = b.wrapping_sub(*a);
    *b ^= a.rotate_left(6);
    *a = a.wrapping_add(*c);
    *c = c.wrapping_sub(*b);
    *c ^= b.rotate_left(8);
    *b = b.wrapping_add(*a);
    *a = a.wrapping_sub(*c);
    *a ^= c.rotate_left(16);
    *c = c.wrapping_add(*b);
    *b = b.wrapping_sub(*a);
    *b ^= a.rotate_left(19);
    *a = a.wrapping_add(*c);
    *c = c.wrapping_sub(*b);
    *c ^= b.rotate_left(4);
    *b = b.wrapping_add(*a);
}

fn finalize(a: &mut u32, b: &mut u32, c: &mut u32) {
    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(14));
    *a ^= *c;
    *a = a.wrapping_sub(c.rotate_left(11));
    *b ^= *a;
    *b = b.wrapping_sub(a.rotate_left(25));
    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(16));
    *a ^= *c;
    *a = a.wrapping_sub(c.rotate_left(4));
    *b ^= *a;
    *b = b.wrapping_sub(a.rotate_left(14));
    *c ^= *b;
    *c = c.wrapping_sub(b.rotate_left(24));
}

fn word_le(chunk: &[u8]) -> u32 {
    // Short chunks read as zero-padded.
    let mut w = [0u8; 4];
    w[..chunk.len()].copy_from_slice(chunk);
    u32::from_le_bytes(w)
}

/// lookup3 `hashlittle` (byte-wise path; identical on every host).
pub fn hashlittle(key: &[u8], initval: u32) -> u32 {
    let seed = 0xdead_beef_u32
        .wrapping_add(key.len() as u32)
        .wrapping_add(initval);
    let (mut a, mut b, mut c) = (seed, seed, seed);

    let mut k = key;
    while k.len() > 12 {
        a = a.wrapping_add(word_le(&k[0..4]));
        b = b.wrapping_add(word_le(&k[4..8]));
        c = c.wrapping_add(word_le(&k[8..12]));
        mix(&mut a, &mut b, &mut c);
        k = &k[12..];
    }
    if k.is_empty() {
        return c;
    }

    let mut tail = [0u8; 12];
    tail[..k.len()].copy_from_slice(k);
    a = a.wrapping_add(word_le(&tail[0..4]));
    b = b.wrapping_add(word_le(&tail[4..8]));
    c = c.wrapping_add(word_le(&tail[8..12]));
    finalize(&mut a, &mut b, &mut c);
    c
}

/// WSPR callsign hash: lookup3 masked to 15 bits.
///
/// An empty key returns the unmasked seed, as the reference hash does.
pub fn nhash(key: &[u8], initval: u32) -> u32 {
    if key.is_empty() {
        return hashlittle(key, initval);
    }
    hashlittle(key, initval) & NHASH_MASK
}

pub fn callsign_hash(callsign: &str) -> u32 {
    nhash(callsign.as_bytes(), WSPR_NHASH_INITVAL)
}
