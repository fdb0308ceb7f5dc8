use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use chip8_core::Config;

mod run;

/// Runs a CHIP-8 program without a window, printing the screen when it stops.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Instructions per second
    #[arg(long, default_value_t = Config::default().clock_hz)]
    hz: u32,

    /// Load the program at 0x600 as the ETI 660 did
    #[arg(long)]
    eti: bool,

    /// Seed for the random number generator, for repeatable runs
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many seconds of emulated time
    #[arg(long, value_parser = parse_seconds)]
    seconds: Option<Duration>,

    /// Run as fast as possible instead of in real time
    #[arg(long)]
    fast: bool,

    /// Keys (0-F) held down for the whole run
    #[arg(long, value_delimiter = ',', value_parser = parse_key)]
    hold: Vec<u8>,
}

fn parse_key(s: &str) -> Result<u8, String> {
    match u8::from_str_radix(s, 16) {
        Ok(key) if key <= 0xF => Ok(key),
        _ => Err(format!("`{}` is not a key between 0 and F", s)),
    }
}

fn parse_seconds(s: &str) -> Result<Duration, String> {
    let seconds: f64 = s
        .parse()
        .map_err(|_| format!("`{}` is not a number of seconds", s))?;
    Duration::try_from_secs_f64(seconds).map_err(|e| format!("`{}` seconds: {}", s, e))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = Config::default().with_clock_hz(args.hz);
    if args.eti {
        config = config.with_eti();
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    run::run(run::Options {
        rom: args.rom,
        config,
        seconds: args.seconds,
        fast: args.fast,
        held_keys: args.hold,
    })
}
