use anyhow::Context;

use crate::error::{Error, Result};

/// Byte order used when PCM samples leave the crate as raw bytes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    Big,
    Little,
    #[default]
    Native,
}

impl ByteOrder {
    pub fn i16_to_bytes(self, v: i16) -> [u8; 2] {
        match self {
            ByteOrder::Big => v.to_be_bytes(),
            ByteOrder::Little => v.to_le_bytes(),
            ByteOrder::Native => v.to_ne_bytes(),
        }
    }

    pub fn i16_from_bytes(self, b: [u8; 2]) -> i16 {
        match self {
            ByteOrder::Big => i16::from_be_bytes(b),
            ByteOrder::Little => i16::from_le_bytes(b),
            ByteOrder::Native => i16::from_ne_bytes(b),
        }
    }
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct Params {
    pub sample_rate_hz: u32,
    pub symbol_samples: usize,
    pub base_freq_hz: f64,
    pub volume: i16,

    /// Tone spacing used when rendering PCM audio.
    pub pcm_tone_spacing_hz: f64,
    /// Tone spacing used for the fixed-point frequency list.
    pub freq_tone_spacing_hz: f64,

    pub nhash_initval: u32,
    pub pcm_byte_order: ByteOrder,

    pub decode_search_hz: i32,
    pub decode_probe_symbols: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            sample_rate_hz: 12_000,
            symbol_samples: 8192,
            base_freq_hz: 1500.0,
            volume: 16383,
            pcm_tone_spacing_hz: 1.4548,
            freq_tone_spacing_hz: 1.4648,
            nhash_initval: 146,
            pcm_byte_order: ByteOrder::Native,
            decode_search_hz: 150,
            decode_probe_symbols: 16,
        }
    }
}

impl Params {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("read params file {path}"))?;
        let params: Params = toml::from_str(&content).context("parse params toml")?;
        params.validate().context("validate params")?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate_hz == 0 {
            return Err(Error::InvalidParams("sample_rate_hz must be positive"));
        }
        if self.symbol_samples == 0 {
            return Err(Error::InvalidParams("symbol_samples must be positive"));
        }
        let frame_bytes = crate::SYMBOL_COUNT
            .checked_mul(self.symbol_samples)
            .and_then(|n| n.checked_mul(std::mem::size_of::<i16>()));
        if frame_bytes.is_none() {
            return Err(Error::InvalidParams("symbol_samples overflows the frame size"));
        }
        if self.volume < 0 {
            return Err(Error::InvalidParams("volume must be non-negative"));
        }
        if !(self.base_freq_hz.is_finite() && self.base_freq_hz > 0.0) {
            return Err(Error::InvalidParams("base_freq_hz must be positive"));
        }
        if !(self.pcm_tone_spacing_hz > 0.0 && self.freq_tone_spacing_hz > 0.0) {
            return Err(Error::InvalidParams("tone spacings must be positive"));
        }
        if self.decode_search_hz < 0 {
            return Err(Error::InvalidParams("decode_search_hz must be non-negative"));
        }
        if self.decode_probe_symbols == 0 || self.decode_probe_symbols > crate::SYMBOL_COUNT {
            return Err(Error::InvalidParams("decode_probe_symbols must be in 1..=162"));
        }
        Ok(())
    }

    /// Peak sample value. The volume is shifted down to leave headroom.
    pub fn amplitude(&self) -> f64 {
        (self.volume >> 2) as f64
    }

    pub fn symbol_duration_s(&self) -> f64 {
        self.symbol_samples as f64 / self.sample_rate_hz as f64
    }

    /// Samples in one transmission; saturates so unvalidated params fail allocation.
    pub fn frame_samples(&self) -> usize {
        crate::SYMBOL_COUNT.saturating_mul(self.symbol_samples)
    }

    pub fn pcm_bytes(&self) -> usize {
        self.frame_samples().saturating_mul(std::mem::size_of::<i16>())
    }
}
