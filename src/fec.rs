use crate::message::MESSAGE_BITS;
use crate::SYMBOL_COUNT;

/// Constraint length 32, rate 1/2; the tail flushes the register.
pub const TAIL_BITS: usize = 31;
pub const CODED_BITS: usize = 2 * (MESSAGE_BITS + TAIL_BITS);

pub const POLY1: u32 = 0xF2D0_5351;
pub const POLY2: u32 = 0xE461_3C47;

#[rustfmt::skip]
pub const SYNC_VECTOR: [u8; SYMBOL_COUNT] = [
    1, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 1, 1, 0, 0, 0, 1, 0,
    0, 1, 0, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 1,
    0, 0, 0, 0, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 0, 1,
    1, 0, 1, 0, 0, 0, 0, 1, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 0, 1,
    0, 0, 1, 0, 1, 1, 0, 0, 0, 1, 1, 0, 1, 0, 1, 0, 0, 0, 1, 0,
    0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 1, 1, 1, 0, 1, 1, 0, 0, 1, 1,
    0, 1, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 1, 0, 1, 0, 0, 1, 1,
    0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 1, 0, 1, 1, 0, 0, 0, 1, 1, 0,
    0, 0,
];

// Coded bit i goes to position MAP[i]: the bit-reversed 8-bit counter,
// skipping reversals that fall past the end of the frame.
const fn interleave_map() -> [usize; CODED_BITS] {
    let mut map = [0usize; CODED_BITS];
    let mut i = 0usize;
    let mut j = 0u32;
    while i < CODED_BITS {
        let r = (j as u8).reverse_bits() as usize;
        if r < CODED_BITS {
            map[i] = r;
            i += 1;
        }
        j += 1;
    }
    map
}

const MAP: [usize; CODED_BITS] = interleave_map();

fn parity(x: u32) -> u8 {
    (x.count_ones() & 1) as u8
}

pub fn convolve(msg_bits: &[u8; MESSAGE_BITS]) -> [u8; CODED_BITS] {
    let mut out = [0u8; CODED_BITS];
    let mut reg = 0u32;
    let tail = std::iter::repeat(0u8).take(TAIL_BITS);
    for (k, bit) in msg_bits.iter().copied().chain(tail).enumerate() {
        reg = (reg << 1) | (bit & 1) as u32;
        out[2 * k] = parity(reg & POLY1);
        out[2 * k + 1] = parity(reg & POLY2);
    }
    out
}

/// Hard-decision inverse of [`convolve`] for error-free input.
///
/// Returns `None` as soon as a parity bit or the zero tail disagrees.
pub fn unconvolve(coded: &[u8; CODED_BITS]) -> Option<[u8; MESSAGE_BITS]> {
    let mut out = [0u8; MESSAGE_BITS];
    let mut reg = 0u32;
    for k in 0..(MESSAGE_BITS + TAIL_BITS) {
        let shifted = reg << 1;
        // POLY1 taps the newest bit, so the first parity bit determines it.
        let bit = (coded[2 * k] & 1) ^ parity(shifted & POLY1);
        reg = shifted | bit as u32;
        if parity(reg & POLY2) != coded[2 * k + 1] & 1 {
            return None;
        }
        if k < MESSAGE_BITS {
            out[k] = bit;
        } else if bit != 0 {
            return None;
        }
    }
    Some(out)
}

pub fn interleave(bits: &[u8; CODED_BITS]) -> [u8; CODED_BITS] {
    let mut out = [0u8; CODED_BITS];
    for (i, &b) in bits.iter().enumerate() {
        out[MAP[i]] = b & 1;
    }
    out
}

pub fn deinterleave(bits: &[u8; CODED_BITS]) -> [u8; CODED_BITS] {
    let mut out = [0u8; CODED_BITS];
    for (i, o) in out.iter_mut().enumerate() {
        *o = bits[MAP[i]] & 1;
    }
    out
}
