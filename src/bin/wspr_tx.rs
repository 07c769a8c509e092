use anyhow::Context;
use audiocoder::bridge::Bridge;
use audiocoder::locator;
use audiocoder::params::Params;
use audiocoder::symbols::encode;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "WSPR encoder and grid-square tool (no system audio stack)")]
struct Args {
    /// Load modem parameters from a TOML file.
    #[arg(long, global = true)]
    params: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

/// Message fields shared by the encode commands.
#[derive(clap::Args, Debug)]
struct Msg {
    callsign: String,
    locator: String,
    /// Transmit power (dBm, 0..=60).
    power: i32,

    /// Audio offset from the base frequency (Hz).
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset: i32,

    /// Lower sideband: reverse the tone order.
    #[arg(long, default_value_t = false)]
    lsb: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Render one transmission to raw 16-bit PCM.
    Pcm {
        #[command(flatten)]
        msg: Msg,
        /// Output file.
        #[arg(long, short)]
        out: PathBuf,
    },
    /// Print the fixed-point (0.01 Hz) frequency of every symbol.
    Freqs {
        #[command(flatten)]
        msg: Msg,
    },
    /// Print the 162 channel symbols.
    Symbols {
        callsign: String,
        locator: String,
        power: i32,
    },
    /// Latitude/longitude (degrees) to a 6-character locator.
    Grid {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
        /// Print the 10-character extended locator too.
        #[arg(long, default_value_t = false)]
        extended: bool,
    },
    /// Great-circle distance and bearing between two locators.
    Distance { from: String, to: String },
    /// 15-bit callsign hash.
    Hash { callsign: String },
    /// Decode raw PCM written by `pcm` with the loopback decoder.
    Decode {
        input: PathBuf,
        /// Dial frequency (Hz) added to the reported audio frequency.
        #[arg(long, default_value_t = 0.0)]
        dial: f64,
        #[arg(long, default_value_t = false)]
        lsb: bool,
    },
}

fn load_params(path: Option<&str>) -> anyhow::Result<Params> {
    match path {
        Some(path) => Params::from_file(path),
        None => Ok(Params::default()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let bridge = Bridge::new(load_params(args.params.as_deref())?)?;

    match args.cmd {
        Cmd::Pcm { msg, out } => {
            let bytes =
                bridge.encode_to_pcm(&msg.callsign, &msg.locator, msg.power, msg.offset, msg.lsb)?;
            fs::write(&out, &bytes).with_context(|| format!("writing {}", out.display()))?;
            eprintln!(
                "[wspr_tx] wrote {} bytes ({:.1}s at {}Hz) to {}",
                bytes.len(),
                bridge.modem.p.symbol_duration_s() * audiocoder::SYMBOL_COUNT as f64,
                bridge.modem.p.sample_rate_hz,
                out.display()
            );
        }
        Cmd::Freqs { msg } => {
            let freqs = bridge.encode_to_frequencies(
                &msg.callsign,
                &msg.locator,
                msg.power,
                msg.offset,
                msg.lsb,
            )?;
            for f in freqs {
                println!("{f}");
            }
        }
        Cmd::Symbols {
            callsign,
            locator,
            power,
        } => {
            let symbols = encode(&callsign, &locator, power)?;
            let line: Vec<String> = symbols.as_slice().iter().map(u8::to_string).collect();
            println!("{}", line.join(" "));
        }
        Cmd::Grid { lat, lon, extended } => {
            let digits = locator::grid_digits(lat, lon)?;
            if extended {
                println!("{}", digits.extended());
            } else {
                println!("{}", digits.locator());
            }
        }
        Cmd::Distance { from, to } => {
            let km = locator::distance_km(&from, &to)?;
            let deg = locator::bearing_deg(&from, &to)?;
            println!("{km:.1} km, bearing {deg:.1} deg");
        }
        Cmd::Hash { callsign } => {
            println!("{}", bridge.nhash(&callsign));
        }
        Cmd::Decode { input, dial, lsb } => {
            let bytes = fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
            let spots = bridge.decode_from_pcm(&bytes, dial, lsb)?;
            if spots.is_empty() {
                eprintln!("[wspr_tx] no decode");
            }
            for spot in spots {
                println!("{spot}");
            }
        }
    }
    Ok(())
}
