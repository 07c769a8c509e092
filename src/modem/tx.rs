use log::{debug, info};

use super::util::try_alloc;
use super::WsprModem;
use crate::error::{Error, Result};
use crate::params::ByteOrder;
use crate::symbols::Symbols;
use crate::SYMBOL_COUNT;

const TAU: f64 = 2.0 * std::f64::consts::PI;

impl WsprModem {
    /// Renders symbols as 16-bit PCM, `symbol_samples` per symbol.
    ///
    /// Each symbol restarts the sine at zero phase; no continuity is kept
    /// across symbol boundaries.
    pub fn encode_pcm(&self, symbols: &Symbols, offset_hz: i32, lsb: bool) -> Result<Vec<i16>> {
        let p = &self.p;
        let mut out = try_alloc::<i16>(p.frame_samples())?;
        let amp = p.amplitude();
        let fs = p.sample_rate_hz as f64;

        for i in 0..SYMBOL_COUNT {
            let freq = self.pcm_tone_hz(symbols.tone(i, lsb), offset_hz);
            let theta = freq * TAU / fs;
            out.extend((0..p.symbol_samples).map(|step| (amp * (theta * step as f64).sin()) as i16));
        }

        info!(
            "pcm encode: {} samples (offset={offset_hz}Hz, lsb={lsb})",
            out.len()
        );
        Ok(out)
    }

    /// Tone frequencies with 0.01 Hz resolution (`round(f * 100)`).
    pub fn encode_frequencies(
        &self,
        symbols: &Symbols,
        offset_hz: i32,
        lsb: bool,
    ) -> Result<Vec<i64>> {
        let mut out = try_alloc::<i64>(SYMBOL_COUNT)?;
        for i in 0..SYMBOL_COUNT {
            let tone = symbols.tone(i, lsb);
            let freq = self.list_tone_hz(tone, offset_hz);
            let fixed = (freq * 100.0).round() as i64;
            if i < 5 {
                debug!("symbol[{i}]={tone} freq={freq:.4}Hz encoded={fixed}");
            }
            out.push(fixed);
        }
        info!("frequency encode complete: {} frequencies", out.len());
        Ok(out)
    }
}

/// Serializes fixed-point frequencies as 8-byte big-endian integers.
pub fn frequencies_to_be_bytes(freqs: &[i64]) -> Result<Vec<u8>> {
    let mut out = try_alloc::<u8>(freqs.len() * 8)?;
    for f in freqs {
        out.extend_from_slice(&f.to_be_bytes());
    }
    Ok(out)
}

pub fn samples_to_bytes(samples: &[i16], order: ByteOrder) -> Result<Vec<u8>> {
    let mut out = try_alloc::<u8>(samples.len() * 2)?;
    for &s in samples {
        out.extend_from_slice(&order.i16_to_bytes(s));
    }
    Ok(out)
}

pub fn bytes_to_samples(bytes: &[u8], order: ByteOrder) -> Result<Vec<i16>> {
    if bytes.len() % 2 != 0 {
        return Err(Error::OddPcmBytes(bytes.len()));
    }
    let mut out = try_alloc::<i16>(bytes.len() / 2)?;
    for pair in bytes.chunks_exact(2) {
        out.push(order.i16_from_bytes([pair[0], pair[1]]));
    }
    Ok(out)
}
