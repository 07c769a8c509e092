use super::*;
use crate::error::Error;
use crate::params::{ByteOrder, Params};
use crate::symbols::{encode, Symbols};
use crate::SYMBOL_COUNT;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn flat(tone: u8) -> Symbols {
    Symbols::from_slice(&[tone; SYMBOL_COUNT]).unwrap()
}

#[test]
fn all_zero_symbols_render_base_tone() -> anyhow::Result<()> {
    let modem = WsprModem::default();
    let p = &modem.p;
    let pcm = modem.encode_pcm(&flat(0), 0, false)?;
    assert_eq!(pcm.len(), SYMBOL_COUNT * 8192);

    let amp = p.amplitude();
    let theta = 1500.0 * 2.0 * std::f64::consts::PI / 12_000.0;
    for block in pcm.chunks_exact(p.symbol_samples) {
        for (step, &s) in block.iter().enumerate() {
            assert_eq!(s, (amp * (theta * step as f64).sin()) as i16, "step={step}");
        }
    }
    // 1500 Hz at 12 kHz repeats every 8 samples.
    assert_eq!(pcm[0], 0);
    assert_eq!(pcm[2], 4095);
    assert_eq!(pcm[6], -4095);
    Ok(())
}

#[test]
fn lsb_zero_equals_usb_three() -> anyhow::Result<()> {
    let modem = WsprModem::default();
    let lsb = modem.encode_pcm(&flat(0), 25, true)?;
    let usb = modem.encode_pcm(&flat(3), 25, false)?;
    assert!(lsb == usb);
    Ok(())
}

#[test]
fn phase_restarts_each_symbol() -> anyhow::Result<()> {
    let modem = WsprModem::default();
    let s = encode("K1ABC", "FN42", 37)?;
    let pcm = modem.encode_pcm(&s, 0, false)?;
    for block in pcm.chunks_exact(modem.p.symbol_samples) {
        assert_eq!(block[0], 0);
    }
    Ok(())
}

#[test]
fn frequency_list_fixed_point() -> anyhow::Result<()> {
    let modem = WsprModem::default();
    let freqs = modem.encode_frequencies(&flat(0), 0, false)?;
    assert_eq!(freqs.len(), SYMBOL_COUNT);
    assert!(freqs.iter().all(|&f| f == 150_000));

    let bytes = frequencies_to_be_bytes(&freqs)?;
    assert_eq!(bytes.len(), 1296);
    assert_eq!(&bytes[..8], &[0, 0, 0, 0, 0, 0x02, 0x49, 0xF0]);

    let mut raw = [0u8; SYMBOL_COUNT];
    raw[..4].copy_from_slice(&[0, 1, 2, 3]);
    let freqs = modem.encode_frequencies(&Symbols::from_slice(&raw)?, 10, false)?;
    assert_eq!(&freqs[..4], &[151_000, 151_146, 151_293, 151_439]);

    let lsb = modem.encode_frequencies(&Symbols::from_slice(&raw)?, 10, true)?;
    assert_eq!(&lsb[..4], &[151_439, 151_293, 151_146, 151_000]);
    Ok(())
}

#[test]
fn tone_spacings_differ_between_outputs() {
    let modem = WsprModem::default();
    assert!((modem.pcm_tone_hz(1, 0) - 1501.4548).abs() < 1e-9);
    assert!((modem.list_tone_hz(1, 0) - 1501.4648).abs() < 1e-9);
}

#[test]
fn sample_bytes_follow_byte_order() -> anyhow::Result<()> {
    assert_eq!(samples_to_bytes(&[1, -2], ByteOrder::Big)?, vec![0, 1, 0xFF, 0xFE]);
    assert_eq!(samples_to_bytes(&[1, -2], ByteOrder::Little)?, vec![1, 0, 0xFE, 0xFF]);
    let back = bytes_to_samples(&samples_to_bytes(&[7, -300], ByteOrder::Native)?, ByteOrder::Native)?;
    assert_eq!(back, vec![7, -300]);
    assert!(matches!(
        bytes_to_samples(&[1, 2, 3], ByteOrder::Big),
        Err(Error::OddPcmBytes(3))
    ));
    Ok(())
}

#[test]
fn loopback_decode_usb() -> anyhow::Result<()> {
    let modem = WsprModem::default();
    let s = encode("K1ABC", "FN42", 37)?;
    let pcm = modem.encode_pcm(&s, 0, false)?;

    let spots = modem.decode(&pcm, 14_095_600.0, false)?;
    assert_eq!(spots.len(), 1, "spots={spots:?}");
    let spot = &spots[0];
    assert_eq!(spot.message, "K1ABC FN42 37");
    assert_eq!(spot.callsign, "K1ABC");
    assert_eq!(spot.locator, "FN42");
    assert_eq!(spot.power, 37);
    assert_eq!(spot.callhash, crate::nhash::callsign_hash("K1ABC"));
    assert!((spot.freq - (14_095_600.0 + 1500.0 + 1.5 * 1.4548)).abs() < 1e-6);
    assert!(spot.snr > 20.0, "snr={}", spot.snr);
    assert!(spot.to_string().ends_with(" -> K1ABC FN42 37"));
    Ok(())
}

#[test]
fn loopback_decode_lsb_with_offset() -> anyhow::Result<()> {
    let modem = WsprModem::default();
    let s = encode("DL1ABC", "JO62", 23)?;
    let pcm = modem.encode_pcm(&s, -73, true)?;

    assert_eq!(modem.estimate_offset(&pcm, true)?, -73);
    let spots = modem.decode(&pcm, 0.0, true)?;
    assert_eq!(spots.len(), 1);
    assert_eq!(spots[0].message, "DL1ABC JO62 23");
    Ok(())
}

#[test]
fn wrong_sideband_does_not_decode() -> anyhow::Result<()> {
    let modem = WsprModem::default();
    let pcm = modem.encode_pcm(&encode("W1AW", "FN31", 30)?, 40, false)?;
    assert!(modem.decode(&pcm, 0.0, true)?.is_empty());
    Ok(())
}

#[test]
fn loopback_decode_with_noise() -> anyhow::Result<()> {
    let modem = WsprModem::default();
    let pcm = modem.encode_pcm(&encode("W1AW", "FN31", 30)?, 55, false)?;

    let mut rng = StdRng::seed_from_u64(3);
    let n01 = Normal::<f64>::new(0.0, 2000.0)?;
    let noisy: Vec<i16> = pcm
        .iter()
        .map(|&s| (s as f64 + n01.sample(&mut rng)).clamp(-32768.0, 32767.0) as i16)
        .collect();

    let spots = modem.decode(&noisy, 7_038_600.0, false)?;
    assert_eq!(spots.len(), 1);
    assert_eq!(spots[0].message, "W1AW FN31 30");
    Ok(())
}

#[test]
fn silence_and_short_buffers() -> anyhow::Result<()> {
    let modem = WsprModem::default();
    let silence = vec![0i16; modem.p.frame_samples()];
    assert!(modem.decode(&silence, 0.0, false)?.is_empty());

    let short = vec![0i16; 1000];
    assert!(matches!(
        modem.decode(&short, 0.0, false),
        Err(Error::PcmLength { got: 1000, .. })
    ));
    Ok(())
}

#[test]
fn oversized_frame_reports_allocation_error() {
    // Bypasses `WsprModem::new`, which would reject these params.
    let modem = WsprModem {
        p: Params {
            symbol_samples: 1_000_000_000_000_000_000,
            ..Params::default()
        },
    };
    assert!(matches!(
        modem.encode_pcm(&flat(0), 0, false),
        Err(Error::Allocation { .. })
    ));
    assert!(matches!(
        WsprModem::new(modem.p.clone()),
        Err(Error::InvalidParams(_))
    ));
}
