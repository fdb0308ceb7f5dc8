use std::time::Duration;

use crate::constants::{DEFAULT_CLOCK_HZ, TIMER_HZ};
use crate::error::Error;

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// One scheduled event from the clock
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Run one fetch-decode-execute cycle
    Cpu,
    /// Count the delay and sound timers down by one
    Timer,
}

/// # Clock
/// Two fixed-rate schedules sharing one timeline:
/// - the instruction clock, at a configurable rate
/// - the timer clock, always at 60Hz
///
/// Tick `k` of a schedule with rate `hz` falls at exactly `origin + k / hz` seconds.
/// Tick times are compared with integer cross-multiplication, so long runs never drift
/// and the interleaving of the two schedules is exact.
#[derive(Debug, Clone)]
pub struct Clock {
    cpu_hz: u32,
    /// Nanoseconds since the clock started
    now: u128,
    /// When the current instruction rate took effect
    cpu_origin: u128,
    /// Instruction ticks issued since `cpu_origin`
    cpu_ticks: u64,
    /// Timer ticks issued since the clock started
    timer_ticks: u64,
}

impl Clock {
    pub fn new(cpu_hz: u32) -> Result<Self, Error> {
        validate(cpu_hz)?;
        Ok(Clock {
            cpu_hz,
            now: 0,
            cpu_origin: 0,
            cpu_ticks: 0,
            timer_ticks: 0,
        })
    }

    pub fn cpu_hz(&self) -> u32 {
        self.cpu_hz
    }

    /// Changes the instruction rate from now on; the timer schedule is unaffected.
    pub fn set_cpu_hz(&mut self, cpu_hz: u32) -> Result<(), Error> {
        validate(cpu_hz)?;
        // Rebase onto the last tick that actually fired so no partial period is lost
        self.cpu_origin = self.cpu_tick_time(self.cpu_ticks);
        self.cpu_ticks = 0;
        self.cpu_hz = cpu_hz;
        Ok(())
    }

    /// Time since the clock started
    pub fn elapsed(&self) -> Duration {
        let secs = (self.now / NANOS_PER_SECOND) as u64;
        let nanos = (self.now % NANOS_PER_SECOND) as u32;
        Duration::new(secs, nanos)
    }

    /// Moves the clock forward by `elapsed`.
    ///
    /// Returns every tick that came due, in the order they fall on the timeline.
    /// A timer tick and an instruction tick at the same instant yield the timer tick first.
    pub fn advance(&mut self, elapsed: Duration) -> Ticks {
        self.now += elapsed.as_nanos();

        let cpu_due = (self.now - self.cpu_origin) * u128::from(self.cpu_hz) / NANOS_PER_SECOND;
        let timer_due = self.now * u128::from(TIMER_HZ) / NANOS_PER_SECOND;

        let ticks = Ticks {
            cpu_hz: u128::from(self.cpu_hz),
            cpu_origin: self.cpu_origin,
            cpu_next: u128::from(self.cpu_ticks) + 1,
            cpu_last: cpu_due,
            timer_next: u128::from(self.timer_ticks) + 1,
            timer_last: timer_due,
        };
        self.cpu_ticks = cpu_due as u64;
        self.timer_ticks = timer_due as u64;
        ticks
    }

    /// Nanoseconds at which instruction tick `k` falls, rounded down
    fn cpu_tick_time(&self, k: u64) -> u128 {
        self.cpu_origin + u128::from(k) * NANOS_PER_SECOND / u128::from(self.cpu_hz)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Clock {
            cpu_hz: DEFAULT_CLOCK_HZ,
            now: 0,
            cpu_origin: 0,
            cpu_ticks: 0,
            timer_ticks: 0,
        }
    }
}

fn validate(cpu_hz: u32) -> Result<(), Error> {
    if cpu_hz == 0 {
        return Err(Error::InvalidClockRate(cpu_hz));
    }
    Ok(())
}

/// The ticks produced by one call to `Clock::advance`, in timeline order.
///
/// Tick numbers are 1-based: tick `k` fires once `k` whole periods have passed.
#[derive(Debug, Clone)]
pub struct Ticks {
    cpu_hz: u128,
    cpu_origin: u128,
    cpu_next: u128,
    cpu_last: u128,
    timer_next: u128,
    timer_last: u128,
}

impl Ticks {
    /// Instruction ticks not yet yielded
    pub fn cpu_remaining(&self) -> u64 {
        (self.cpu_last + 1).saturating_sub(self.cpu_next) as u64
    }

    /// Timer ticks not yet yielded
    pub fn timer_remaining(&self) -> u64 {
        (self.timer_last + 1).saturating_sub(self.timer_next) as u64
    }

    /// Whether instruction tick `cpu_next` falls strictly before timer tick `timer_next`.
    ///
    /// Both times are scaled by `cpu_hz * TIMER_HZ` to stay in integers:
    /// `cpu_origin + k / cpu_hz` vs `t / TIMER_HZ`.
    fn cpu_first(&self) -> bool {
        let timer_hz = u128::from(TIMER_HZ);
        let cpu_time =
            self.cpu_origin * self.cpu_hz * timer_hz + self.cpu_next * NANOS_PER_SECOND * timer_hz;
        let timer_time = self.timer_next * NANOS_PER_SECOND * self.cpu_hz;
        cpu_time < timer_time
    }
}

impl Iterator for Ticks {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        let cpu_pending = self.cpu_next <= self.cpu_last;
        let timer_pending = self.timer_next <= self.timer_last;
        let tick = match (cpu_pending, timer_pending) {
            (false, false) => return None,
            (true, false) => Tick::Cpu,
            (false, true) => Tick::Timer,
            (true, true) if self.cpu_first() => Tick::Cpu,
            (true, true) => Tick::Timer,
        };
        match tick {
            Tick::Cpu => self.cpu_next += 1,
            Tick::Timer => self.timer_next += 1,
        }
        Some(tick)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.cpu_remaining() + self.timer_remaining()) as usize;
        (remaining, Some(remaining))
    }
}
