use crate::constants::{
    DEFAULT_CLOCK_HZ, ETI_ENTRY_POINT, MAX_SAVED_STATES, MEMORY_SIZE, STANDARD_ENTRY_POINT,
};
use crate::error::Error;

/// Where programs are loaded and start executing
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum EntryPoint {
    /// `0x200`, used by nearly every program
    #[default]
    Standard,
    /// `0x600`, used by programs written for the ETI 660
    Eti660,
}

impl EntryPoint {
    pub fn addr(self) -> u16 {
        match self {
            EntryPoint::Standard => STANDARD_ENTRY_POINT,
            EntryPoint::Eti660 => ETI_ENTRY_POINT,
        }
    }

    /// Largest ROM that fits between the entry point and the end of memory
    pub fn max_rom_size(self) -> usize {
        MEMORY_SIZE - self.addr() as usize
    }
}

/// The externally tunable parameters of a machine
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    pub entry_point: EntryPoint,
    /// Instructions per second
    pub clock_hz: u32,
    /// Seed for `Cxnn`; `None` seeds from the OS
    pub seed: Option<u64>,
    /// How many past states to keep for rewinding; 0 disables rewinding
    pub rewind_depth: usize,
}

impl Config {
    pub fn with_eti(mut self) -> Self {
        self.entry_point = EntryPoint::Eti660;
        self
    }

    pub fn with_clock_hz(mut self, clock_hz: u32) -> Self {
        self.clock_hz = clock_hz;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_rewind_depth(mut self, rewind_depth: usize) -> Self {
        self.rewind_depth = rewind_depth;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.clock_hz == 0 {
            return Err(Error::InvalidClockRate(self.clock_hz));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            entry_point: EntryPoint::Standard,
            clock_hz: DEFAULT_CLOCK_HZ,
            seed: None,
            rewind_depth: MAX_SAVED_STATES,
        }
    }
}
