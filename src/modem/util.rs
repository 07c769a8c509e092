use num_complex::Complex64;

use crate::error::{Error, Result};

/// Empty vector with room for exactly `n` items, or an allocation error.
pub(super) fn try_alloc<T>(n: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(n).map_err(|_| Error::Allocation {
        bytes: n.saturating_mul(std::mem::size_of::<T>()),
    })?;
    Ok(v)
}

/// Goertzel: DFT term of `block` at `freq_hz`.
pub(super) fn tone_term(block: &[i16], freq_hz: f64, fs_hz: f64) -> Complex64 {
    let w = 2.0 * std::f64::consts::PI * freq_hz / fs_hz;
    let coeff = 2.0 * w.cos();
    let (mut s1, mut s2) = (0.0f64, 0.0f64);
    for &x in block {
        let s = x as f64 + coeff * s1 - s2;
        s2 = s1;
        s1 = s;
    }
    Complex64::new(s1 - s2 * w.cos(), s2 * w.sin())
}

pub(super) fn tone_power(block: &[i16], freq_hz: f64, fs_hz: f64) -> f64 {
    tone_term(block, freq_hz, fs_hz).norm_sqr()
}

/// Index and value of the largest entry.
pub(super) fn argmax(xs: &[f64]) -> (usize, f64) {
    xs.iter()
        .copied()
        .enumerate()
        .fold((0, f64::MIN), |best, (i, v)| if v > best.1 { (i, v) } else { best })
}
