use crate::constants::{ADDRESS_MASK, MEMORY_SIZE, SPRITE_SHEET, SPRITE_SHEET_ADDR};
use crate::error::Error;
use crate::opcode::from_bytes;

/// # Memory
/// 4096 bytes of flat, byte-addressed RAM.
///
/// ```text
/// 0x000 - 0x1FF  interpreter; 0x000 - 0x04F hold the font sprite sheet
/// 0x200 - 0xE9F  program (0x600 - 0xE9F for ETI 660 programs)
/// 0xEA0 - 0xEFF  reserved; the call stack lives outside memory
/// 0xF00 - 0xFFF  reserved; the frame buffer lives outside memory
/// ```
///
/// Data accesses wrap at the top of memory: address `0x1000` is `0x000` again.
/// Instruction fetches do not wrap; a pc that can't read a whole opcode is a fault.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Blank memory with the sprite sheet in place
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        bytes[SPRITE_SHEET_ADDR..SPRITE_SHEET_ADDR + SPRITE_SHEET.len()]
            .copy_from_slice(&SPRITE_SHEET);
        Memory { bytes }
    }

    /// Reads the byte at `addr`, wrapping out of range addresses
    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[wrap(addr)]
    }

    /// Writes the byte at `addr`, wrapping out of range addresses
    pub fn write(&mut self, addr: u16, value: u8) {
        self.bytes[wrap(addr)] = value;
    }

    /// Fetches the big-endian opcode at `pc`
    pub fn opcode(&self, pc: u16) -> Result<u16, Error> {
        let addr = pc as usize;
        if addr + 1 >= MEMORY_SIZE {
            return Err(Error::PcOutOfBounds(pc));
        }
        Ok(from_bytes(self.bytes[addr], self.bytes[addr + 1]))
    }

    /// Zeroes everything from `entry` up and copies `rom` in at `entry`.
    /// Anything below `entry`, the sprite sheet included, is left alone.
    pub fn load_program(&mut self, entry: u16, rom: &[u8]) -> Result<(), Error> {
        let start = entry as usize;
        let max = MEMORY_SIZE.saturating_sub(start);
        if rom.len() > max {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                max,
            });
        }
        self.bytes[start..].fill(0);
        self.bytes[start..start + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    /// Raw view of all of memory
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.bytes.iter().filter(|b| **b != 0).count();
        write!(f, "Memory {{ {} bytes, {} nonzero }}", MEMORY_SIZE, used)
    }
}

fn wrap(addr: u16) -> usize {
    (addr & ADDRESS_MASK) as usize
}
