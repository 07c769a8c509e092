use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Latitude or longitude is NaN")]
    CoordinateNaN,
    #[error("Latitude {0} is >= +-90 deg; grid squares are undefined at the poles")]
    PolarLatitude(f64),
    #[error("Longitude {0} cannot be wrapped into [-180, 180)")]
    LongitudeOutOfRange(f64),
    #[error("Failed to allocate {bytes} bytes")]
    Allocation { bytes: usize },
    #[error("Invalid callsign {0:?}")]
    InvalidCallsign(String),
    #[error("Invalid locator {0:?}")]
    InvalidLocator(String),
    #[error("Power {0} dBm outside 0..=60")]
    InvalidPower(i32),
    #[error("Symbol {value} at index {index} outside 0..=3")]
    InvalidSymbol { index: usize, value: u8 },
    #[error("Expected {expected} symbols, got {got}")]
    SymbolCount { expected: usize, got: usize },
    #[error("PCM buffer of {got} {unit} is malformed (need {need})")]
    PcmLength {
        got: usize,
        need: usize,
        unit: &'static str,
    },
    #[error("PCM byte buffer has odd length {0}")]
    OddPcmBytes(usize),
    #[error("Invalid params: {0}")]
    InvalidParams(&'static str),
}
