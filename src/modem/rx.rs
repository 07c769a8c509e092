use log::{debug, info, warn};

use super::util::{argmax, tone_power};
use super::{DecodedSpot, Decoder, WsprModem};
use crate::error::{Error, Result};
use crate::fec::SYNC_VECTOR;
use crate::nhash::callsign_hash;
use crate::symbols::Symbols;
use crate::SYMBOL_COUNT;

impl WsprModem {
    fn check_len(&self, samples: &[i16]) -> Result<()> {
        let need = self.p.frame_samples();
        if samples.len() < need {
            return Err(Error::PcmLength {
                got: samples.len(),
                need,
                unit: "samples",
            });
        }
        Ok(())
    }

    fn block<'a>(&self, samples: &'a [i16], i: usize) -> &'a [i16] {
        let n = self.p.symbol_samples;
        &samples[i * n..(i + 1) * n]
    }

    fn tone_powers(&self, block: &[i16], offset_hz: i32) -> [f64; 4] {
        let fs = self.p.sample_rate_hz as f64;
        let mut out = [0f64; 4];
        for (t, o) in out.iter_mut().enumerate() {
            *o = tone_power(block, self.pcm_tone_hz(t as u8, offset_hz), fs);
        }
        out
    }

    /// Integer audio offset whose tone set best explains the first
    /// `decode_probe_symbols` blocks.
    pub fn estimate_offset(&self, samples: &[i16], lsb: bool) -> Result<i32> {
        self.check_len(samples)?;
        let fs = self.p.sample_rate_hz as f64;
        let search = self.p.decode_search_hz;

        let mut best = (0i32, f64::MIN);
        for offset in -search..=search {
            let mut score = 0.0;
            for (i, &sync) in SYNC_VECTOR
                .iter()
                .enumerate()
                .take(self.p.decode_probe_symbols)
            {
                let block = self.block(samples, i);
                // Only the two tones whose low bit matches the sync vector can occur.
                let low = if lsb { 1 - sync } else { sync };
                score += [low, low + 2]
                    .iter()
                    .map(|&t| tone_power(block, self.pcm_tone_hz(t, offset), fs))
                    .fold(0.0, f64::max);
            }
            if score > best.1 {
                best = (offset, score);
            }
        }
        debug!("offset search: best {}Hz (score {:.3e})", best.0, best.1);
        Ok(best.0)
    }

    /// Hard symbol decisions at a known offset, plus a tone power ratio in dB.
    pub fn demod_symbols(
        &self,
        samples: &[i16],
        offset_hz: i32,
        lsb: bool,
    ) -> Result<(Symbols, f32)> {
        self.check_len(samples)?;
        let mut raw = [0u8; SYMBOL_COUNT];
        let (mut sig, mut other) = (0f64, 0f64);
        for (i, r) in raw.iter_mut().enumerate() {
            let powers = self.tone_powers(self.block(samples, i), offset_hz);
            let (tone, p_max) = argmax(&powers);
            sig += p_max;
            other += (powers.iter().sum::<f64>() - p_max) / 3.0;
            *r = if lsb { 3 - tone as u8 } else { tone as u8 };
        }
        let snr_db = 10.0 * ((sig + 1e-9) / (other + 1e-9)).log10();
        Ok((Symbols::from_slice(&raw)?, snr_db.clamp(-99.0, 99.0) as f32))
    }

    /// Loopback decode of a single, time-aligned transmission.
    ///
    /// No error correction is attempted: any symbol error makes the frame
    /// fail its parity checks, and the result is empty.
    pub fn decode_samples(
        &self,
        samples: &[i16],
        dial_freq_hz: f64,
        lsb: bool,
    ) -> Result<Vec<DecodedSpot>> {
        let offset = self.estimate_offset(samples, lsb)?;
        let (symbols, snr) = self.demod_symbols(samples, offset, lsb)?;
        let msg = match symbols.to_message() {
            Ok(Some(msg)) => msg,
            Ok(None) => {
                debug!("no decode at offset {offset}Hz");
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!("undecodable payload at offset {offset}Hz: {e}");
                return Ok(Vec::new());
            }
        };

        let centre = self.pcm_tone_hz(0, offset) + 1.5 * self.p.pcm_tone_spacing_hz;
        let spot = DecodedSpot {
            snr,
            freq: dial_freq_hz + centre,
            dt: 0.0,
            drift: 0.0,
            message: msg.to_string(),
            callsign: msg.callsign().to_string(),
            callhash: callsign_hash(msg.callsign()),
            locator: msg.locator().to_string(),
            power: msg.power_dbm(),
        };
        info!("decoded {spot}");
        Ok(vec![spot])
    }
}

impl Decoder for WsprModem {
    fn decode(&self, samples: &[i16], dial_freq_hz: f64, lsb: bool) -> Result<Vec<DecodedSpot>> {
        self.decode_samples(samples, dial_freq_hz, lsb)
    }
}
