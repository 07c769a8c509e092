use crate::error::Result;
use crate::params::Params;

mod rx;
mod tx;
mod util;

pub use tx::{bytes_to_samples, frequencies_to_be_bytes, samples_to_bytes};

/// One decoded transmission.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedSpot {
    /// Strongest-tone to other-tone power ratio (dB).
    pub snr: f32,
    /// Dial frequency plus the audio centre of the tone set (Hz).
    pub freq: f64,
    pub dt: f32,
    pub drift: f32,
    pub message: String,
    pub callsign: String,
    pub callhash: u32,
    pub locator: String,
    pub power: u8,
}

impl std::fmt::Display for DecodedSpot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} -> {}", self.snr, self.freq, self.message)
    }
}

/// Turns one recording into decoded spots.
pub trait Decoder {
    fn decode(&self, samples: &[i16], dial_freq_hz: f64, lsb: bool) -> Result<Vec<DecodedSpot>>;
}

#[derive(Clone, Debug, Default)]
pub struct WsprModem {
    pub p: Params,
}

impl WsprModem {
    pub fn new(p: Params) -> Result<Self> {
        p.validate()?;
        Ok(Self { p })
    }

    /// PCM tone for a transmitted symbol value.
    pub fn pcm_tone_hz(&self, tone: u8, offset_hz: i32) -> f64 {
        self.p.base_freq_hz + offset_hz as f64 + tone as f64 * self.p.pcm_tone_spacing_hz
    }

    /// Tone used by the frequency list for a transmitted symbol value.
    pub fn list_tone_hz(&self, tone: u8, offset_hz: i32) -> f64 {
        self.p.base_freq_hz + offset_hz as f64 + tone as f64 * self.p.freq_tone_spacing_hz
    }
}

#[cfg(test)]
mod tests;
