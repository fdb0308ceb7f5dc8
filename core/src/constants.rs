/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;
/// Mask applied to data addresses derived from `I` or an opcode's `nnn`
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// Width of an opcode in bytes; also the distance the pc moves per instruction
pub const OPCODE_SIZE: u16 = 0x2;

/// Default load address of ROMs
pub const STANDARD_ENTRY_POINT: u16 = 0x200;
/// Load address of ROMs written for the ETI 660
pub const ETI_ENTRY_POINT: u16 = 0x600;

/// Depth of the call stack
pub const STACK_SIZE: usize = 16;
/// Number of general purpose registers (V0..VF)
pub const REGISTER_COUNT: usize = 16;
/// Index of VF, which doubles as the carry/borrow/collision flag
pub const FLAG_REGISTER: usize = 0xF;
/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// The delay and sound timers always count down at 60Hz
pub const TIMER_HZ: u32 = 60;
/// Instruction clock used when none is configured
pub const DEFAULT_CLOCK_HZ: u32 = 1000;
/// Number of past states kept for rewinding when none is configured
pub const MAX_SAVED_STATES: usize = 256;

/// Address of the first font glyph
pub const SPRITE_SHEET_ADDR: usize = 0x000;
/// Bytes per font glyph
pub const SPRITE_HEIGHT: u16 = 5;

/// # Sprite sheet
/// Glyphs for the hexadecimal digits 0..F, stored at the bottom of memory.
///
/// Each glyph is 5 rows of 8 pixels, one byte per row with the leftmost pixel in the MSB.
/// Only the high nibble of each row is ever set, e.g. `0`:
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
