use crate::constants::{REGISTER_COUNT, STACK_SIZE, STANDARD_ENTRY_POINT};
use crate::frame::FrameBuffer;
use crate::memory::Memory;

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) doubles as the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) the number of return addresses on the stack
///
/// Timers
/// - 2 8-bit timers (delay & sound), counted down at 60Hz by the clock
/// - A tone should play while the sound timer is nonzero
///
/// ## Memory
/// - 16 entry stack
///     - stores return addresses when subroutines are called
///     - kept apart from addressable memory
/// - 4096 bytes of addressable memory
/// - 64x32 pixel frame buffer
///     - stores the contents of the next frame to be drawn
///
/// ## Input
/// - Emulation may halt until a key's value is written to some register
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub sp: usize,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub register_needing_key: Option<u8>,
}

impl State {
    /// A machine at power-on, with the pc at the standard entry point
    pub fn new() -> Self {
        Self::with_memory(Memory::new(), STANDARD_ENTRY_POINT)
    }

    /// A freshly reset machine around existing memory, with the pc at `entry`
    pub fn with_memory(memory: Memory, entry: u16) -> Self {
        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: entry,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: FrameBuffer::new(),
            draw_flag: false,
            register_needing_key: None,
        }
    }

    /// The return addresses currently on the stack, oldest first
    pub fn call_stack(&self) -> &[u16] {
        &self.stack[..self.sp]
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
