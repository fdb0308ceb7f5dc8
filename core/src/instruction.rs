use std::fmt;

use crate::opcode::Opcode;

/// Every instruction the interpreter understands, with its operands already pulled out of the opcode.
///
/// `x` and `y` are register indices, `nn` an immediate byte, `n` an immediate nibble and
/// `nnn` a 12-bit address.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `00E0` clear the screen
    Clear,
    /// `00EE` return from a subroutine
    Return,
    /// `1nnn` pc = nnn
    Jump { nnn: u16 },
    /// `2nnn` call the subroutine at nnn
    Call { nnn: u16 },
    /// `3xnn` skip if Vx == nn
    SkipEqualByte { x: u8, nn: u8 },
    /// `4xnn` skip if Vx != nn
    SkipNotEqualByte { x: u8, nn: u8 },
    /// `5xy0` skip if Vx == Vy
    SkipEqual { x: u8, y: u8 },
    /// `6xnn` Vx = nn
    LoadByte { x: u8, nn: u8 },
    /// `7xnn` Vx += nn
    AddByte { x: u8, nn: u8 },
    /// `8xy0` Vx = Vy
    Move { x: u8, y: u8 },
    /// `8xy1` Vx |= Vy
    Or { x: u8, y: u8 },
    /// `8xy2` Vx &= Vy
    And { x: u8, y: u8 },
    /// `8xy3` Vx ^= Vy
    Xor { x: u8, y: u8 },
    /// `8xy4` Vx += Vy; VF = carry
    Add { x: u8, y: u8 },
    /// `8xy5` Vx -= Vy; VF = !borrow
    Sub { x: u8, y: u8 },
    /// `8xy6` Vx >>= 1; VF = shifted out bit
    ShiftRight { x: u8, y: u8 },
    /// `8xy7` Vx = Vy - Vx; VF = !borrow
    SubReversed { x: u8, y: u8 },
    /// `8xyE` Vx <<= 1; VF = shifted out bit
    ShiftLeft { x: u8, y: u8 },
    /// `9xy0` skip if Vx != Vy
    SkipNotEqual { x: u8, y: u8 },
    /// `Annn` I = nnn
    LoadIndex { nnn: u16 },
    /// `Bnnn` pc = nnn + V0
    JumpOffset { nnn: u16 },
    /// `Cxnn` Vx = random & nn
    Random { x: u8, nn: u8 },
    /// `Dxyn` draw n rows of the sprite at I to (Vx, Vy)
    Draw { x: u8, y: u8, n: u8 },
    /// `Ex9E` skip if the key in Vx is held
    SkipKeyDown { x: u8 },
    /// `ExA1` skip if the key in Vx is not held
    SkipKeyUp { x: u8 },
    /// `Fx07` Vx = DT
    LoadDelay { x: u8 },
    /// `Fx0A` block until a key is pressed, then Vx = key
    WaitKey { x: u8 },
    /// `Fx15` DT = Vx
    SetDelay { x: u8 },
    /// `Fx18` ST = Vx
    SetSound { x: u8 },
    /// `Fx1E` I += Vx
    AddIndex { x: u8 },
    /// `Fx29` I = address of the glyph for Vx
    LoadGlyph { x: u8 },
    /// `Fx33` memory[I..I+3] = bcd(Vx)
    StoreBcd { x: u8 },
    /// `Fx55` memory[I..=I+x] = V0..=Vx
    StoreRegisters { x: u8 },
    /// `Fx65` V0..=Vx = memory[I..=I+x]
    LoadRegisters { x: u8 },
}

impl Instruction {
    /// Selects the correct Instruction for a given Opcode.
    /// Returns `None` for patterns with no defined meaning, `0nnn` machine code calls included.
    pub fn decode(op: &dyn Opcode) -> Option<Instruction> {
        use Instruction::*;

        let (x, y, n, nn, nnn) = (op.x(), op.y(), op.n(), op.nn(), op.nnn());
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Clear,
            (0x0, 0x0, 0xE, 0xE) => Return,
            (0x1, ..) => Jump { nnn },
            (0x2, ..) => Call { nnn },
            (0x3, ..) => SkipEqualByte { x, nn },
            (0x4, ..) => SkipNotEqualByte { x, nn },
            (0x5, .., 0x0) => SkipEqual { x, y },
            (0x6, ..) => LoadByte { x, nn },
            (0x7, ..) => AddByte { x, nn },
            (0x8, .., 0x0) => Move { x, y },
            (0x8, .., 0x1) => Or { x, y },
            (0x8, .., 0x2) => And { x, y },
            (0x8, .., 0x3) => Xor { x, y },
            (0x8, .., 0x4) => Add { x, y },
            (0x8, .., 0x5) => Sub { x, y },
            (0x8, .., 0x6) => ShiftRight { x, y },
            (0x8, .., 0x7) => SubReversed { x, y },
            (0x8, .., 0xE) => ShiftLeft { x, y },
            (0x9, .., 0x0) => SkipNotEqual { x, y },
            (0xA, ..) => LoadIndex { nnn },
            (0xB, ..) => JumpOffset { nnn },
            (0xC, ..) => Random { x, nn },
            (0xD, ..) => Draw { x, y, n },
            (0xE, _, 0x9, 0xE) => SkipKeyDown { x },
            (0xE, _, 0xA, 0x1) => SkipKeyUp { x },
            (0xF, _, 0x0, 0x7) => LoadDelay { x },
            (0xF, _, 0x0, 0xA) => WaitKey { x },
            (0xF, _, 0x1, 0x5) => SetDelay { x },
            (0xF, _, 0x1, 0x8) => SetSound { x },
            (0xF, _, 0x1, 0xE) => AddIndex { x },
            (0xF, _, 0x2, 0x9) => LoadGlyph { x },
            (0xF, _, 0x3, 0x3) => StoreBcd { x },
            (0xF, _, 0x5, 0x5) => StoreRegisters { x },
            (0xF, _, 0x6, 0x5) => LoadRegisters { x },
            _ => return None,
        };
        Some(instruction)
    }
}

/// Conventional assembler mnemonics, e.g. `DRW V0, V1, 5`
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Clear => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump { nnn } => write!(f, "JP {:#05X}", nnn),
            Call { nnn } => write!(f, "CALL {:#05X}", nnn),
            SkipEqualByte { x, nn } => write!(f, "SE V{:X}, {:#04X}", x, nn),
            SkipNotEqualByte { x, nn } => write!(f, "SNE V{:X}, {:#04X}", x, nn),
            SkipEqual { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadByte { x, nn } => write!(f, "LD V{:X}, {:#04X}", x, nn),
            AddByte { x, nn } => write!(f, "ADD V{:X}, {:#04X}", x, nn),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Add { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x, .. } => write!(f, "SHR V{:X}", x),
            SubReversed { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x, .. } => write!(f, "SHL V{:X}", x),
            SkipNotEqual { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadIndex { nnn } => write!(f, "LD I, {:#05X}", nnn),
            JumpOffset { nnn } => write!(f, "JP V0, {:#05X}", nnn),
            Random { x, nn } => write!(f, "RND V{:X}, {:#04X}", x, nn),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKeyDown { x } => write!(f, "SKP V{:X}", x),
            SkipKeyUp { x } => write!(f, "SKNP V{:X}", x),
            LoadDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            LoadGlyph { x } => write!(f, "LD F, V{:X}", x),
            StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            StoreRegisters { x } => write!(f, "LD [I], V{:X}", x),
            LoadRegisters { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}
