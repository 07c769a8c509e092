use log::debug;

use crate::error::{Error, Result};
use crate::fec::{convolve, deinterleave, interleave, unconvolve, CODED_BITS, SYNC_VECTOR};
use crate::message::Message;
use crate::SYMBOL_COUNT;

/// The 162 channel symbols of one WSPR transmission, each in `0..=3`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Symbols([u8; SYMBOL_COUNT]);

impl Symbols {
    pub fn from_slice(symbols: &[u8]) -> Result<Self> {
        if symbols.len() != SYMBOL_COUNT {
            return Err(Error::SymbolCount {
                expected: SYMBOL_COUNT,
                got: symbols.len(),
            });
        }
        if let Some((index, &value)) = symbols.iter().enumerate().find(|&(_, &s)| s > 3) {
            return Err(Error::InvalidSymbol { index, value });
        }
        let mut out = [0u8; SYMBOL_COUNT];
        out.copy_from_slice(symbols);
        Ok(Self(out))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Symbol as transmitted: LSB mode mirrors the tone order (`3 - s`).
    pub fn tone(&self, i: usize, lsb: bool) -> u8 {
        if lsb {
            3 - self.0[i]
        } else {
            self.0[i]
        }
    }

    pub fn sync_ok(&self) -> bool {
        self.0
            .iter()
            .zip(SYNC_VECTOR.iter())
            .all(|(&s, &sync)| s & 1 == sync)
    }

    /// Strips sync, deinterleaves and undoes the convolutional code.
    pub fn to_message(&self) -> Result<Option<Message>> {
        if !self.sync_ok() {
            return Ok(None);
        }
        let mut data = [0u8; CODED_BITS];
        for (d, &s) in data.iter_mut().zip(self.0.iter()) {
            *d = s >> 1;
        }
        match unconvolve(&deinterleave(&data)) {
            Some(bits) => Message::from_bits(&bits).map(Some),
            None => Ok(None),
        }
    }
}

pub fn encode_message(msg: &Message) -> Symbols {
    let data = interleave(&convolve(&msg.to_bits()));
    let mut out = [0u8; SYMBOL_COUNT];
    for (i, o) in out.iter_mut().enumerate() {
        *o = SYNC_VECTOR[i] + 2 * data[i];
    }
    debug!("encoded {msg}: first symbols {:?}", &out[..8]);
    Symbols(out)
}

/// Validates the message fields and encodes them.
pub fn encode(callsign: &str, locator: &str, power_dbm: i32) -> Result<Symbols> {
    let msg = Message::new(callsign, locator, power_dbm)?;
    Ok(encode_message(&msg))
}
