//! Runtime-neutral boundary adapters.
//!
//! Every call works on plain strings, integers and byte buffers, owns its
//! buffers for the duration of the call only, and keeps no state between
//! calls. Host bindings (see the `jni` feature) are thin wrappers over these.

use log::info;

use crate::error::Result;
use crate::locator;
use crate::modem::{bytes_to_samples, frequencies_to_be_bytes, samples_to_bytes};
use crate::modem::{DecodedSpot, Decoder, WsprModem};
use crate::nhash::nhash;
use crate::params::Params;
use crate::symbols::{encode, Symbols};

/// Factor applied by [`radio_check`].
pub const RADIO_CHECK_FACTOR: i32 = 42;

#[derive(Clone, Debug, Default)]
pub struct Bridge {
    pub modem: WsprModem,
}

impl Bridge {
    pub fn new(p: Params) -> Result<Self> {
        Ok(Self {
            modem: WsprModem::new(p)?,
        })
    }

    fn symbols(&self, callsign: &str, locator: &str, power: i32) -> Result<Symbols> {
        info!("WSPR encode: {callsign} {locator} {power:02}");
        encode(callsign, locator, power)
    }

    /// PCM audio for one transmission, serialized with `Params::pcm_byte_order`.
    pub fn encode_to_pcm(
        &self,
        callsign: &str,
        locator: &str,
        power: i32,
        offset_hz: i32,
        lsb: bool,
    ) -> Result<Vec<u8>> {
        let symbols = self.symbols(callsign, locator, power)?;
        let pcm = self.modem.encode_pcm(&symbols, offset_hz, lsb)?;
        samples_to_bytes(&pcm, self.modem.p.pcm_byte_order)
    }

    pub fn encode_to_frequencies(
        &self,
        callsign: &str,
        locator: &str,
        power: i32,
        offset_hz: i32,
        lsb: bool,
    ) -> Result<Vec<i64>> {
        let symbols = self.symbols(callsign, locator, power)?;
        self.modem.encode_frequencies(&symbols, offset_hz, lsb)
    }

    /// Frequency list as 8-byte big-endian integers (0.01 Hz units).
    pub fn encode_to_frequency_bytes(
        &self,
        callsign: &str,
        locator: &str,
        power: i32,
        offset_hz: i32,
        lsb: bool,
    ) -> Result<Vec<u8>> {
        let freqs = self.encode_to_frequencies(callsign, locator, power, offset_hz, lsb)?;
        frequencies_to_be_bytes(&freqs)
    }

    /// Decodes PCM bytes with an external decoder.
    pub fn decode_from_pcm_with<D: Decoder + ?Sized>(
        &self,
        decoder: &D,
        sound: &[u8],
        dial_freq_hz: f64,
        lsb: bool,
    ) -> Result<Vec<DecodedSpot>> {
        let samples = bytes_to_samples(sound, self.modem.p.pcm_byte_order)?;
        decoder.decode(&samples, dial_freq_hz, lsb)
    }

    /// Decodes PCM bytes with the built-in loopback decoder.
    pub fn decode_from_pcm(
        &self,
        sound: &[u8],
        dial_freq_hz: f64,
        lsb: bool,
    ) -> Result<Vec<DecodedSpot>> {
        self.decode_from_pcm_with(&self.modem, sound, dial_freq_hz, lsb)
    }

    pub fn nhash(&self, callsign: &str) -> i32 {
        nhash(callsign.as_bytes(), self.modem.p.nhash_initval) as i32
    }
}

pub fn lat_lon_to_gsq(lat: f64, lon: f64) -> Result<String> {
    locator::lat_lon_to_locator(lat, lon)
}

pub fn locator_distance_km(a: &str, b: &str) -> Result<f64> {
    locator::distance_km(a, b)
}

/// Connectivity probe for host bindings.
pub fn radio_check(x: i32) -> i32 {
    x.wrapping_mul(RADIO_CHECK_FACTOR)
}
