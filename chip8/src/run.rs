use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use log::{debug, info};

use chip8_core::{Chip8, Config, Status};

/// One 60Hz frame, the granularity the host hands time to the machine in
const FRAME_TIME: Duration = Duration::from_nanos(16_666_667);
/// Longest stretch of wall time fed to the machine at once, e.g. after the process was stopped
const MAX_STEP: Duration = Duration::from_millis(250);

pub struct Options {
    pub rom: PathBuf,
    pub config: Config,
    /// Emulated time to run for; forever if unset
    pub seconds: Option<Duration>,
    /// Skip real-time pacing
    pub fast: bool,
    pub held_keys: Vec<u8>,
}

pub fn run(options: Options) -> anyhow::Result<()> {
    let mut chip8 = Chip8::with_config(options.config).context("invalid configuration")?;

    // Load ROM
    let rom = std::fs::read(&options.rom)
        .with_context(|| format!("unable to read {}", options.rom.display()))?;
    chip8
        .load_rom(&rom)
        .with_context(|| format!("unable to load {}", options.rom.display()))?;

    for &key in &options.held_keys {
        chip8.key_press(key);
    }

    let limit = options.seconds;
    let mut emulated = Duration::ZERO;
    let mut last_cycle = Instant::now();

    let outcome = loop {
        if limit.map_or(false, |limit| emulated >= limit) {
            break Ok(());
        }

        let step = if options.fast {
            FRAME_TIME
        } else {
            // Handle timing
            let elapsed = last_cycle.elapsed();
            if elapsed < FRAME_TIME {
                std::thread::sleep(FRAME_TIME - elapsed);
            }
            let current_time = Instant::now();
            let step = (current_time - last_cycle).min(MAX_STEP);
            last_cycle = current_time;
            step
        };
        let step = match limit {
            Some(limit) => step.min(limit - emulated),
            None => step,
        };

        emulated += step;
        if let Err(e) = chip8.advance(step) {
            break Err(e);
        }

        // If the draw flag is set, unset it and note the new frame
        if let Some(frame) = chip8.take_frame() {
            debug!("redrawn at {:?}, {} pixels lit", emulated, frame.lit());
        }
        if chip8.sound_active() {
            debug!("beep, {} ticks left", chip8.sound_timer());
        }
    };

    println!("{}", chip8.frame());
    let state = chip8.snapshot();
    info!(
        "stopped after {:?} at {:#05X} with status {:?}",
        emulated,
        state.pc,
        chip8.status()
    );

    match (outcome, chip8.status()) {
        (Err(e), _) => Err(e).context("program faulted"),
        (Ok(()), Status::Faulted(e)) => Err(e).context("program faulted"),
        _ => Ok(()),
    }
}
