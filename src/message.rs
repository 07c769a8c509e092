use log::warn;

use crate::error::{Error, Result};

/// Source bits of a type-1 message: 28-bit callsign + 22-bit locator/power.
pub const MESSAGE_BITS: usize = 50;
const CALL_BITS: usize = 28;
const GRID_POWER_BITS: usize = 22;

pub const LEGAL_POWER_DBM: [u8; 19] = [
    0, 3, 7, 10, 13, 17, 20, 23, 27, 30, 33, 37, 40, 43, 47, 50, 53, 57, 60,
];

const CALL_LEN: usize = 6;
const GRID_VALUES: u32 = 180 * 180;

/// A standard (type 1) WSPR message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Message {
    callsign: String,
    locator: String,
    power_dbm: u8,
}

/// Character value used by the callsign packing: digits 0-9, letters 10-35, space 36.
fn char_value(c: u8) -> Option<u32> {
    match c {
        b'0'..=b'9' => Some((c - b'0') as u32),
        b'A'..=b'Z' => Some((c - b'A') as u32 + 10),
        b' ' => Some(36),
        _ => None,
    }
}

fn value_char(v: u32) -> u8 {
    match v {
        0..=9 => b'0' + v as u8,
        10..=35 => b'A' + (v - 10) as u8,
        _ => b' ',
    }
}

/// Aligns the call so its digit lands in the third position, then pads to six.
fn pad_callsign(call: &str) -> Option<[u8; CALL_LEN]> {
    let b = call.as_bytes();
    let shift = b.len() >= 2 && b[1].is_ascii_digit() && !b.get(2).is_some_and(u8::is_ascii_digit);
    let start = usize::from(shift);
    if b.len() + start > CALL_LEN {
        return None;
    }
    let mut out = [b' '; CALL_LEN];
    out[start..start + b.len()].copy_from_slice(b);

    let ok = char_value(out[0]).is_some()
        && out[1].is_ascii_alphanumeric()
        && out[2].is_ascii_digit()
        && out[3..].iter().all(|&c| c == b' ' || c.is_ascii_uppercase());
    ok.then_some(out)
}

fn parse_locator(locator: &str) -> Result<String> {
    let loc = locator.trim().to_ascii_uppercase();
    let b = loc.as_bytes();
    if b.len() != 4 && b.len() != 6 {
        return Err(Error::InvalidLocator(locator.to_string()));
    }
    let ok = (b'A'..=b'R').contains(&b[0])
        && (b'A'..=b'R').contains(&b[1])
        && b[2].is_ascii_digit()
        && b[3].is_ascii_digit();
    if !ok {
        return Err(Error::InvalidLocator(locator.to_string()));
    }
    if b.len() == 6 {
        warn!("locator {locator} truncated to {}", &loc[..4]);
    }
    Ok(loc[..4].to_string())
}

fn legal_power(power_dbm: i32) -> Result<u8> {
    if !(0..=60).contains(&power_dbm) {
        return Err(Error::InvalidPower(power_dbm));
    }
    let p = power_dbm as u8;
    let legal = LEGAL_POWER_DBM
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= p)
        .unwrap_or(0);
    if legal != p {
        warn!("power {p} dBm rounded down to {legal} dBm");
    }
    Ok(legal)
}

fn push_bits_be(out: &mut Vec<u8>, value: u32, n: usize) {
    for bit in (0..n).rev() {
        out.push(((value >> bit) & 1) as u8);
    }
}

fn bits_be_to_u32(bits: &[u8]) -> u32 {
    bits.iter().fold(0u32, |acc, &b| (acc << 1) | (b & 1) as u32)
}

impl Message {
    pub fn new(callsign: &str, locator: &str, power_dbm: i32) -> Result<Self> {
        let call = callsign.trim().to_ascii_uppercase();
        if call.is_empty() || pad_callsign(&call).is_none() {
            return Err(Error::InvalidCallsign(callsign.to_string()));
        }
        Ok(Self {
            callsign: call,
            locator: parse_locator(locator)?,
            power_dbm: legal_power(power_dbm)?,
        })
    }

    pub fn callsign(&self) -> &str {
        &self.callsign
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn power_dbm(&self) -> u8 {
        self.power_dbm
    }

    /// Packed callsign (28 bits).
    pub fn pack_callsign(&self) -> u32 {
        // Validated in `new`.
        let c = pad_callsign(&self.callsign).unwrap_or([b' '; CALL_LEN]);
        let v = |i: usize| char_value(c[i]).unwrap_or(36);
        let mut n = v(0);
        n = n * 36 + v(1);
        n = n * 10 + v(2);
        n = n * 27 + v(3) - 10;
        n = n * 27 + v(4) - 10;
        n = n * 27 + v(5) - 10;
        n
    }

    /// Packed locator and power (22 bits).
    pub fn pack_grid_power(&self) -> u32 {
        let l = self.locator.as_bytes();
        let lon_field = (l[0] - b'A') as u32;
        let lat_field = (l[1] - b'A') as u32;
        let lon_sq = (l[2] - b'0') as u32;
        let lat_sq = (l[3] - b'0') as u32;
        let grid = (179 - 10 * lon_field - lon_sq) * 180 + 10 * lat_field + lat_sq;
        grid * 128 + self.power_dbm as u32 + 64
    }

    /// The 50 source bits, MSB first.
    pub fn to_bits(&self) -> [u8; MESSAGE_BITS] {
        let mut bits = Vec::with_capacity(MESSAGE_BITS);
        push_bits_be(&mut bits, self.pack_callsign(), CALL_BITS);
        push_bits_be(&mut bits, self.pack_grid_power(), GRID_POWER_BITS);
        let mut out = [0u8; MESSAGE_BITS];
        out.copy_from_slice(&bits);
        out
    }

    pub fn from_bits(bits: &[u8; MESSAGE_BITS]) -> Result<Self> {
        let n = bits_be_to_u32(&bits[..CALL_BITS]);
        let m = bits_be_to_u32(&bits[CALL_BITS..]);
        Self::unpack(n, m)
    }

    /// Inverse of the packing; only type-1 payloads are accepted.
    pub fn unpack(n: u32, m: u32) -> Result<Self> {
        let mut n = n;
        let mut call = [b' '; CALL_LEN];
        for c in call[3..].iter_mut().rev() {
            *c = value_char(n % 27 + 10);
            n /= 27;
        }
        call[2] = value_char(n % 10);
        n /= 10;
        call[1] = value_char(n % 36);
        n /= 36;
        if n > 36 {
            return Err(Error::InvalidCallsign(format!("packed value {n}")));
        }
        call[0] = value_char(n);
        let callsign = String::from_utf8_lossy(&call).trim().to_string();

        let power = (m % 128) as i32 - 64;
        if !(0..=60).contains(&power) || !LEGAL_POWER_DBM.contains(&(power as u8)) {
            return Err(Error::InvalidPower(power));
        }
        let grid = m / 128;
        if grid >= GRID_VALUES {
            return Err(Error::InvalidLocator(format!("packed value {grid}")));
        }
        let lon = 179 - grid / 180;
        let lat = grid % 180;
        let locator: String = [
            b'A' + (lon / 10) as u8,
            b'A' + (lat / 10) as u8,
            b'0' + (lon % 10) as u8,
            b'0' + (lat % 10) as u8,
        ]
        .iter()
        .map(|&b| b as char)
        .collect();

        Self::new(&callsign, &locator, power)
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.callsign, self.locator, self.power_dbm)
    }
}
