use thiserror::Error;

/// Everything that can go wrong while loading or running a program.
///
/// Load-time errors leave the machine untouched. Execution-time errors halt the
/// instruction clock and are kept in the machine's status until the next load or reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("ROM is {size} bytes but at most {max} bytes fit above the entry point")]
    RomTooLarge { size: usize, max: usize },

    #[error("call at {pc:#05X} exceeds the call stack depth")]
    StackOverflow { pc: u16 },

    #[error("return at {pc:#05X} with an empty call stack")]
    StackUnderflow { pc: u16 },

    #[error("program counter {0:#06X} does not address a full instruction")]
    PcOutOfBounds(u16),

    #[error("unknown opcode {opcode:#06X} at {pc:#05X}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    #[error("instruction clock rate must be nonzero (got {0}Hz)")]
    InvalidClockRate(u32),
}
