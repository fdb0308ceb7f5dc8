use rand::Rng;

use crate::constants::{
    ADDRESS_MASK, FLAG_REGISTER, OPCODE_SIZE, SPRITE_HEIGHT, SPRITE_SHEET_ADDR, STACK_SIZE,
};
use crate::error::Error;
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::state::State;

/// Runs a single instruction against `state`, which must still have its pc on that instruction.
///
/// Returns the state after the instruction, with the pc moved on to whatever runs next.
/// On error `state` is untouched, so the fault can be inspected where it happened.
pub fn execute<R: Rng>(
    instruction: Instruction,
    state: &State,
    keypad: &Keypad,
    rng: &mut R,
) -> Result<State, Error> {
    use Instruction::*;

    let state = match instruction {
        Clear => clr(state),
        Return => rts(state)?,
        Jump { nnn } => jump(state, nnn),
        Call { nnn } => call(state, nnn)?,
        SkipEqualByte { x, nn } => ske(state, x, nn),
        SkipNotEqualByte { x, nn } => skne(state, x, nn),
        SkipEqual { x, y } => skre(state, x, y),
        LoadByte { x, nn } => load(state, x, nn),
        AddByte { x, nn } => add(state, x, nn),
        Move { x, y } => mv(state, x, y),
        Or { x, y } => or(state, x, y),
        And { x, y } => and(state, x, y),
        Xor { x, y } => xor(state, x, y),
        Add { x, y } => addr(state, x, y),
        Sub { x, y } => sub(state, x, y),
        ShiftRight { x, .. } => shr(state, x),
        SubReversed { x, y } => subn(state, x, y),
        ShiftLeft { x, .. } => shl(state, x),
        SkipNotEqual { x, y } => skrne(state, x, y),
        LoadIndex { nnn } => loadi(state, nnn),
        JumpOffset { nnn } => jumpi(state, nnn),
        Random { x, nn } => rand(state, x, nn, rng),
        Draw { x, y, n } => draw(state, x, y, n),
        SkipKeyDown { x } => skpr(state, x, keypad),
        SkipKeyUp { x } => skup(state, x, keypad),
        LoadDelay { x } => moved(state, x),
        WaitKey { x } => keyd(state, x),
        SetDelay { x } => loads(state, x),
        SetSound { x } => ld(state, x),
        AddIndex { x } => addi(state, x),
        LoadGlyph { x } => ldspr(state, x),
        StoreBcd { x } => bcd(state, x),
        StoreRegisters { x } => stor(state, x),
        LoadRegisters { x } => read(state, x),
    };
    Ok(state)
}

/// pc of the instruction after the current one
fn next(state: &State) -> u16 {
    state.pc + OPCODE_SIZE
}

/// pc of the next instruction, skipping one if `condition` holds
fn skip_if(state: &State, condition: bool) -> u16 {
    if condition {
        state.pc + OPCODE_SIZE * 2
    } else {
        next(state)
    }
}

/// Value of register Vx
fn vx(state: &State, x: u8) -> u8 {
    state.v[x as usize]
}

/// clear
pub fn clr(state: &State) -> State {
    let mut frame_buffer = state.frame_buffer;
    frame_buffer.clear();
    State {
        pc: next(state),
        frame_buffer,
        draw_flag: true,
        ..*state
    }
}

/// PC = STACK.pop()
pub fn rts(state: &State) -> Result<State, Error> {
    if state.sp == 0 {
        return Err(Error::StackUnderflow { pc: state.pc });
    }
    let sp = state.sp - 1;
    Ok(State {
        pc: state.stack[sp],
        sp,
        ..*state
    })
}

/// PC = nnn
pub fn jump(state: &State, nnn: u16) -> State {
    State { pc: nnn, ..*state }
}

/// STACK.push(PC + 2); PC = nnn
pub fn call(state: &State, nnn: u16) -> Result<State, Error> {
    if state.sp == STACK_SIZE {
        return Err(Error::StackOverflow { pc: state.pc });
    }
    let mut stack = state.stack;
    stack[state.sp] = next(state);
    Ok(State {
        pc: nnn,
        sp: state.sp + 1,
        stack,
        ..*state
    })
}

/// if Vx == nn then pc += 2
pub fn ske(state: &State, x: u8, nn: u8) -> State {
    let pc = skip_if(state, vx(state, x) == nn);
    State { pc, ..*state }
}

/// if Vx != nn then pc += 2
pub fn skne(state: &State, x: u8, nn: u8) -> State {
    let pc = skip_if(state, vx(state, x) != nn);
    State { pc, ..*state }
}

/// if Vx == Vy then pc += 2
pub fn skre(state: &State, x: u8, y: u8) -> State {
    let pc = skip_if(state, vx(state, x) == vx(state, y));
    State { pc, ..*state }
}

/// Vx = nn
pub fn load(state: &State, x: u8, nn: u8) -> State {
    let mut v = state.v;
    v[x as usize] = nn;
    State {
        pc: next(state),
        v,
        ..*state
    }
}

/// Vx += nn
/// Add nn to Vx; allow for overflow but implicitly drop it, VF is untouched
pub fn add(state: &State, x: u8, nn: u8) -> State {
    let mut v = state.v;
    v[x as usize] = vx(state, x).wrapping_add(nn);
    State {
        pc: next(state),
        v,
        ..*state
    }
}

/// Vx = Vy
pub fn mv(state: &State, x: u8, y: u8) -> State {
    let mut v = state.v;
    v[x as usize] = v[y as usize];
    State {
        pc: next(state),
        v,
        ..*state
    }
}

/// Vx |= Vy
pub fn or(state: &State, x: u8, y: u8) -> State {
    let mut v = state.v;
    v[x as usize] |= v[y as usize];
    State {
        pc: next(state),
        v,
        ..*state
    }
}

/// Vx &= Vy
pub fn and(state: &State, x: u8, y: u8) -> State {
    let mut v = state.v;
    v[x as usize] &= v[y as usize];
    State {
        pc: next(state),
        v,
        ..*state
    }
}

/// Vx ^= Vy
pub fn xor(state: &State, x: u8, y: u8) -> State {
    let mut v = state.v;
    v[x as usize] ^= v[y as usize];
    State {
        pc: next(state),
        v,
        ..*state
    }
}

/// Vx += Vy; VF = overflow
pub fn addr(state: &State, x: u8, y: u8) -> State {
    let (res, over) = vx(state, x).overflowing_add(vx(state, y));
    let mut v = state.v;
    v[x as usize] = res;
    v[FLAG_REGISTER] = if over { 0x1 } else { 0x0 };
    State {
        pc: next(state),
        v,
        ..*state
    }
}

/// Vx -= Vy; VF = !underflow
pub fn sub(state: &State, x: u8, y: u8) -> State {
    let (res, under) = vx(state, x).overflowing_sub(vx(state, y));
    let mut v = state.v;
    v[x as usize] = res;
    v[FLAG_REGISTER] = if under { 0x0 } else { 0x1 };
    State {
        pc: next(state),
        v,
        ..*state
    }
}

/// Vx >>= 1; VF = lsb
pub fn shr(state: &State, x: u8) -> State {
    let mut v = state.v;
    v[FLAG_REGISTER] = v[x as usize] & 0x1;
    v[x as usize] = vx(state, x) >> 1;
    State {
        pc: next(state),
        v,
        ..*state
    }
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(state: &State, x: u8, y: u8) -> State {
    let (res, under) = vx(state, y).overflowing_sub(vx(state, x));
    let mut v = state.v;
    v[x as usize] = res;
    v[FLAG_REGISTER] = if under { 0x0 } else { 0x1 };
    State {
        pc: next(state),
        v,
        ..*state
    }
}

/// Vx <<= 1; VF = msb
pub fn shl(state: &State, x: u8) -> State {
    let mut v = state.v;
    v[FLAG_REGISTER] = (v[x as usize] >> 7) & 0x1;
    v[x as usize] = vx(state, x) << 1;
    State {
        pc: next(state),
        v,
        ..*state
    }
}

/// if Vx != Vy then pc += 2
pub fn skrne(state: &State, x: u8, y: u8) -> State {
    let pc = skip_if(state, vx(state, x) != vx(state, y));
    State { pc, ..*state }
}

/// I = nnn
pub fn loadi(state: &State, nnn: u16) -> State {
    State {
        pc: next(state),
        i: nnn,
        ..*state
    }
}

/// PC = V0 + nnn
/// Not masked; a pc past the end of memory faults on the next fetch
pub fn jumpi(state: &State, nnn: u16) -> State {
    State {
        pc: u16::from(state.v[0x0]) + nnn,
        ..*state
    }
}

/// Vx = rand_byte & nn
pub fn rand<R: Rng>(state: &State, x: u8, nn: u8, rng: &mut R) -> State {
    let rand_byte: u8 = rng.gen();
    let mut v = state.v;
    v[x as usize] = rand_byte & nn;
    State {
        pc: next(state),
        v,
        ..*state
    }
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels were erased
pub fn draw(state: &State, x: u8, y: u8, n: u8) -> State {
    let mut rows = [0u8; 15];
    for (row, byte) in (0..).zip(rows.iter_mut().take(n as usize)) {
        *byte = state.memory.read(state.i.wrapping_add(row));
    }
    let rows = &rows[..n as usize];

    let mut frame_buffer = state.frame_buffer;
    let collision = frame_buffer.draw_sprite(
        usize::from(vx(state, x)),
        usize::from(vx(state, y)),
        rows,
    );

    let mut v = state.v;
    v[FLAG_REGISTER] = if collision { 0x1 } else { 0x0 };
    State {
        pc: next(state),
        draw_flag: true,
        v,
        frame_buffer,
        ..*state
    }
}

/// if Vx.pressed then pc += 2
pub fn skpr(state: &State, x: u8, keypad: &Keypad) -> State {
    let pc = skip_if(state, keypad.is_down(vx(state, x)));
    State { pc, ..*state }
}

/// if !Vx.pressed then pc += 2
pub fn skup(state: &State, x: u8, keypad: &Keypad) -> State {
    let pc = skip_if(state, !keypad.is_down(vx(state, x)));
    State { pc, ..*state }
}

/// Vx = DT
pub fn moved(state: &State, x: u8) -> State {
    let mut v = state.v;
    v[x as usize] = state.delay_timer;
    State {
        pc: next(state),
        v,
        ..*state
    }
}

/// await keypress for Vx
/// The instruction clock stalls until the key arrives; see `Chip8::key_press`
pub fn keyd(state: &State, x: u8) -> State {
    State {
        pc: next(state),
        register_needing_key: Some(x),
        ..*state
    }
}

/// DT = Vx
pub fn loads(state: &State, x: u8) -> State {
    State {
        pc: next(state),
        delay_timer: vx(state, x),
        ..*state
    }
}

/// ST = Vx
pub fn ld(state: &State, x: u8) -> State {
    State {
        pc: next(state),
        sound_timer: vx(state, x),
        ..*state
    }
}

/// I += Vx, wrapping within memory
pub fn addi(state: &State, x: u8) -> State {
    State {
        pc: next(state),
        i: (state.i + u16::from(vx(state, x))) & ADDRESS_MASK,
        ..*state
    }
}

/// I = Vx * 5
/// Set I to the memory address of the glyph for the low nibble of Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(state: &State, x: u8) -> State {
    let glyph = u16::from(vx(state, x) & 0xF);
    State {
        pc: next(state),
        i: SPRITE_SHEET_ADDR as u16 + glyph * SPRITE_HEIGHT,
        ..*state
    }
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(state: &State, x: u8) -> State {
    let value = vx(state, x);
    let digits = [value / 100 % 10, value / 10 % 10, value % 10];
    let mut memory = state.memory;
    for (offset, digit) in (0..).zip(digits) {
        memory.write(state.i.wrapping_add(offset), digit);
    }
    State {
        pc: next(state),
        memory,
        ..*state
    }
}

/// mem[I..=I+x] = V0..=Vx
/// Fill memory starting at address i with V0..=Vx; I is left unchanged
pub fn stor(state: &State, x: u8) -> State {
    let mut memory = state.memory;
    for r in 0..=u16::from(x) {
        memory.write(state.i.wrapping_add(r), state.v[r as usize]);
    }
    State {
        pc: next(state),
        memory,
        ..*state
    }
}

/// V0..=Vx = mem[I..=I+x]
/// Fill V0..=Vx with memory starting at address i; I is left unchanged
pub fn read(state: &State, x: u8) -> State {
    let mut v = state.v;
    for r in 0..=u16::from(x) {
        v[r as usize] = state.memory.read(state.i.wrapping_add(r));
    }
    State {
        pc: next(state),
        v,
        ..*state
    }
}

#[cfg(test)]
mod test_operations {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::frame::FrameBuffer;

    /// Decodes and executes `op` against `state` with no keys held
    fn run(op: u16, state: &State) -> State {
        run_with_keys(op, state, &Keypad::new())
    }

    fn run_with_keys(op: u16, state: &State, keypad: &Keypad) -> State {
        try_run(op, state, keypad).unwrap()
    }

    fn try_run(op: u16, state: &State, keypad: &Keypad) -> Result<State, Error> {
        let instruction = Instruction::decode(&op).unwrap();
        execute(instruction, state, keypad, &mut StdRng::seed_from_u64(0))
    }

    #[test]
    fn test_00e0_cls() {
        let mut state = State::new();
        state.frame_buffer.set(0, 0, true);
        let state = run(0x00E0, &state);
        assert_eq!(state.frame_buffer, FrameBuffer::new());
        assert!(state.draw_flag);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_00ee_ret() {
        let mut state = State::new();
        state.sp = 0x1;
        state.stack[0] = 0x0ABC;
        let state = run(0x00EE, &state);
        assert_eq!(state.sp, 0x0);
        assert_eq!(state.pc, 0x0ABC);
    }

    #[test]
    fn test_00ee_ret_underflows() {
        let state = State::new();
        assert_eq!(
            try_run(0x00EE, &state, &Keypad::new()),
            Err(Error::StackUnderflow { pc: 0x200 })
        );
    }

    #[test]
    fn test_1nnn_jp() {
        let state = State::new();
        let state = run(0x1ABC, &state);
        assert_eq!(state.pc, 0x0ABC);
    }

    #[test]
    fn test_2nnn_call() {
        let mut state = State::new();
        state.pc = 0x0ABC;
        let state = run(0x2123, &state);
        assert_eq!(state.sp, 0x1);
        assert_eq!(state.stack[0], 0x0ABE);
        assert_eq!(state.pc, 0x0123);
    }

    #[test]
    fn test_2nnn_call_overflows() {
        let mut state = State::new();
        for _ in 0..16 {
            state = run(0x2200, &state);
        }
        assert_eq!(state.sp, 16);
        assert_eq!(
            try_run(0x2200, &state, &Keypad::new()),
            Err(Error::StackOverflow { pc: 0x200 })
        );
    }

    #[test]
    fn test_call_then_return_resumes_after_call() {
        let state = State::new();
        let state = run(0x2400, &state);
        let state = run(0x00EE, &state);
        assert_eq!(state.pc, 0x0202);
        assert_eq!(state.sp, 0);
    }

    #[test]
    fn test_3xnn_se_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        let state = run(0x3111, &state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_3xnn_se_doesntskip() {
        let state = State::new();
        let state = run(0x3111, &state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_4xnn_sne_skips() {
        let state = State::new();
        let state = run(0x4111, &state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_4xnn_sne_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        let state = run(0x4111, &state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_5xy0_se_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        let state = run(0x5120, &state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_5xy0_se_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        let state = run(0x5120, &state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_6xnn_ld() {
        let state = State::new();
        let state = run(0x6122, &state);
        assert_eq!(state.v[0x1], 0x22);
    }

    #[test]
    fn test_7xnn_add() {
        let mut state = State::new();
        state.v[0x1] = 0x1;
        let state = run(0x7122, &state);
        assert_eq!(state.v[0x1], 0x23);
    }

    #[test]
    fn test_7xnn_add_wraps_without_flag() {
        let mut state = State::new();
        state.v[0x1] = 0xF0;
        state.v[0xF] = 0xA;
        let state = run(0x7111, &state);
        assert_eq!(state.v[0x1], 0x01);
        assert_eq!(state.v[0xF], 0xA);
    }

    #[test]
    fn test_8xy0_ld() {
        let mut state = State::new();
        state.v[0x2] = 0x1;
        let state = run(0x8120, &state);
        assert_eq!(state.v[0x1], 0x1);
    }

    #[test]
    fn test_8xy1_or() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        let state = run(0x8121, &state);
        assert_eq!(state.v[0x1], 0x7);
    }

    #[test]
    fn test_8xy2_and() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        let state = run(0x8122, &state);
        assert_eq!(state.v[0x1], 0x2);
    }

    #[test]
    fn test_8xy3_xor() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        let state = run(0x8123, &state);
        assert_eq!(state.v[0x1], 0x5);
    }

    #[test]
    fn test_8xy4_add_nocarry() {
        let mut state = State::new();
        state.v[0x1] = 0x01;
        state.v[0x2] = 0x01;
        let state = run(0x8124, &state);
        assert_eq!(state.v[0x1], 0x02);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy4_add_carry() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        state.v[0x2] = 0x01;
        let state = run(0x8124, &state);
        assert_eq!(state.v[0x1], 0x00);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_noborrow() {
        let mut state = State::new();
        state.v[0x1] = 0x33;
        state.v[0x2] = 0x11;
        let state = run(0x8125, &state);
        assert_eq!(state.v[0x1], 0x22);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_equal_is_noborrow() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        let state = run(0x8125, &state);
        assert_eq!(state.v[0x1], 0x00);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_borrow() {
        let mut state = State::new();
        state.v[0x1] = 0x01;
        state.v[0x2] = 0x02;
        let state = run(0x8125, &state);
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy6_shr_lsb() {
        let mut state = State::new();
        state.v[0x1] = 0x5;
        let state = run(0x8106, &state);
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy6_shr_nolsb() {
        let mut state = State::new();
        state.v[0x1] = 0x4;
        let state = run(0x8106, &state);
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy6_shr_ignores_vy() {
        let mut state = State::new();
        state.v[0x1] = 0x8;
        state.v[0x2] = 0xFF;
        let state = run(0x8126, &state);
        assert_eq!(state.v[0x1], 0x4);
    }

    #[test]
    fn test_8xy7_subn_noborrow() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x33;
        let state = run(0x8127, &state);
        assert_eq!(state.v[0x1], 0x22);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy7_subn_borrow() {
        let mut state = State::new();
        state.v[0x1] = 0x12;
        state.v[0x2] = 0x11;
        let state = run(0x8127, &state);
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xye_shl_msb() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        let state = run(0x810E, &state);
        // 0xFF * 2 = 0x01FE
        assert_eq!(state.v[0x1], 0xFE);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xye_shl_nomsb() {
        let mut state = State::new();
        state.v[0x1] = 0x4;
        let state = run(0x810E, &state);
        assert_eq!(state.v[0x1], 0x8);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8fy4_add_into_vf_keeps_carry() {
        let mut state = State::new();
        state.v[0xF] = 0xFF;
        state.v[0x1] = 0x01;
        let state = run(0x8F14, &state);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8fy5_sub_into_vf_keeps_borrow() {
        let mut state = State::new();
        state.v[0xF] = 0x01;
        state.v[0x1] = 0x02;
        let state = run(0x8F15, &state);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8fy6_shr_of_vf_keeps_result() {
        let mut state = State::new();
        state.v[0xF] = 0x06;
        let state = run(0x8F06, &state);
        assert_eq!(state.v[0xF], 0x03);
    }

    #[test]
    fn test_8fy7_subn_into_vf_keeps_borrow() {
        let mut state = State::new();
        state.v[0xF] = 0x01;
        state.v[0x1] = 0x03;
        let state = run(0x8F17, &state);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8fye_shl_of_vf_keeps_result() {
        let mut state = State::new();
        state.v[0xF] = 0x81;
        let state = run(0x8F0E, &state);
        assert_eq!(state.v[0xF], 0x02);
    }

    #[test]
    fn test_9xy0_sne_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        let state = run(0x9120, &state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_9xy0_sne_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        let state = run(0x9120, &state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_annn_ld() {
        let state = State::new();
        let state = run(0xAABC, &state);
        assert_eq!(state.i, 0xABC);
    }

    #[test]
    fn test_bnnn_jp() {
        let mut state = State::new();
        state.v[0x0] = 0x2;
        let state = run(0xBABC, &state);
        assert_eq!(state.pc, 0xABE);
    }

    #[test]
    fn test_bnnn_jp_past_memory_is_not_masked() {
        let mut state = State::new();
        state.v[0x0] = 0xFF;
        let state = run(0xBFFF, &state);
        assert_eq!(state.pc, 0x10FE);
    }

    #[test]
    fn test_cxnn_rnd_masks() {
        let state = State::new();
        let state = run(0xC10F, &state);
        assert_eq!(state.v[0x1] & 0xF0, 0x0);
        let state = run(0xC200, &state);
        assert_eq!(state.v[0x2], 0x0);
    }

    #[test]
    fn test_cxnn_rnd_is_seeded() {
        let state = State::new();
        let op = Instruction::Random { x: 0x3, nn: 0xFF };
        let a = execute(op, &state, &Keypad::new(), &mut StdRng::seed_from_u64(42)).unwrap();
        let b = execute(op, &state, &Keypad::new(), &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.v[0x3], b.v[0x3]);
    }

    #[test]
    fn test_dxyn_drw_draws() {
        let mut state = State::new();
        state.v[0x0] = 0x1;
        // Draw the 0x0 sprite with a 1x 1y offset
        let state = run(0xD005, &state);
        let mut expected = FrameBuffer::new();
        for x in 1..5 {
            expected.set(x, 1, true);
            expected.set(x, 5, true);
        }
        for y in 2..5 {
            expected.set(1, y, true);
            expected.set(4, y, true);
        }
        assert_eq!(state.frame_buffer, expected);
        assert_eq!(state.v[0xF], 0x0);
        assert!(state.draw_flag);
    }

    #[test]
    fn test_dxyn_drw_collides() {
        let mut state = State::new();
        state.frame_buffer.set(0, 0, true);
        let state = run(0xD001, &state);
        assert_eq!(state.v[0xF], 0x1)
    }

    #[test]
    fn test_dxyn_drw_twice_erases() {
        let mut state = State::new();
        state.v[0x3] = 0x3C;
        state.v[0x4] = 0x1E;
        state.i = 0x4B;
        let state = run(0xD345, &state);
        let lit = state.frame_buffer.lit();
        assert!(lit > 0);
        let state = run(0xD345, &state);
        assert_eq!(state.frame_buffer.lit(), 0);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_dxyn_drw_xors() {
        let mut state = State::new();
        // 0 1 0 1 -> Set
        state.frame_buffer.set(3, 0, true);
        state.frame_buffer.set(5, 0, true);
        // 1 1 1 1 -> Draw xor
        let state = run(0xD001, &state);
        let row = &state.frame_buffer.rows()[0];
        assert_eq!(row[0..6], [true, true, true, false, false, true]);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_dxyn_drw_reads_wrap_memory() {
        let mut state = State::new();
        state.i = 0xFFF;
        state.memory.write(0xFFF, 0x80);
        state.memory.write(0x000, 0x80);
        let state = run(0xD002, &state);
        assert!(state.frame_buffer.get(0, 0));
        assert!(state.frame_buffer.get(0, 1));
    }

    #[test]
    fn test_dxyn_drw_tallest_sprite() {
        let mut state = State::new();
        state.i = 0x300;
        for row in 0..15 {
            state.memory.write(0x300 + row, 0x80);
        }
        let state = run(0xD00F, &state);
        assert_eq!(state.frame_buffer.lit(), 15);
        assert!(state.frame_buffer.get(0, 14));
        assert!(!state.frame_buffer.get(0, 15));
    }

    #[test]
    fn test_dxyn_drw_zero_rows_draws_nothing() {
        let state = run(0xD000, &State::new());
        assert_eq!(state.frame_buffer.lit(), 0);
        assert_eq!(state.v[0xF], 0x0);
        assert!(state.draw_flag);
    }

    #[test]
    fn test_ex9e_skp_skips() {
        let mut state = State::new();
        let mut keypad = Keypad::new();
        keypad.press(0xE);
        state.v[0x1] = 0xE;
        let state = run_with_keys(0xE19E, &state, &keypad);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_ex9e_skp_doesntskip() {
        let state = State::new();
        let state = run(0xE19E, &state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_exa1_sknp_skips() {
        let state = State::new();
        let state = run(0xE1A1, &state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_exa1_sknp_doesntskip() {
        let mut state = State::new();
        let mut keypad = Keypad::new();
        keypad.press(0xE);
        state.v[0x1] = 0xE;
        let state = run_with_keys(0xE1A1, &state, &keypad);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_fx07_ld() {
        let mut state = State::new();
        state.delay_timer = 0xF;
        let state = run(0xF107, &state);
        assert_eq!(state.v[0x1], 0xF);
    }

    #[test]
    fn test_fx0a_ld_setsregisterneedingkey() {
        let state = State::new();
        let state = run(0xF10A, &state);
        assert_eq!(state.register_needing_key, Some(0x1));
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_fx15_ld() {
        let mut state = State::new();
        state.v[0x1] = 0xF;
        let state = run(0xF115, &state);
        assert_eq!(state.delay_timer, 0xF);
    }

    #[test]
    fn test_fx18_ld() {
        let mut state = State::new();
        state.v[0x1] = 0xF;
        let state = run(0xF118, &state);
        assert_eq!(state.sound_timer, 0xF);
    }

    #[test]
    fn test_fx1e_add() {
        let mut state = State::new();
        state.i = 0x1;
        state.v[0x1] = 0x1;
        let state = run(0xF11E, &state);
        assert_eq!(state.i, 0x2);
    }

    #[test]
    fn test_fx1e_add_wraps_within_memory() {
        let mut state = State::new();
        state.i = 0xFFE;
        state.v[0x1] = 0x4;
        let state = run(0xF11E, &state);
        assert_eq!(state.i, 0x002);
    }

    #[test]
    fn test_fx29_ld() {
        let mut state = State::new();
        state.v[0x1] = 0x2;
        let state = run(0xF129, &state);
        assert_eq!(state.i, 0xA);
    }

    #[test]
    fn test_fx29_ld_uses_low_nibble() {
        let mut state = State::new();
        state.v[0x1] = 0x1F;
        let state = run(0xF129, &state);
        assert_eq!(state.i, 0x4B);
    }

    #[test]
    fn test_fx33_ld() {
        let mut state = State::new();
        state.v[0x1] = 157;
        state.i = 0x300;
        let state = run(0xF133, &state);
        assert_eq!(state.memory.as_slice()[0x300..0x303], [0x1, 0x5, 0x7]);
    }

    #[test]
    fn test_fx55_ld() {
        let mut state = State::new();
        state.i = 0x300;
        state.v[0x0..0x5].copy_from_slice(&[0x1, 0x2, 0x3, 0x4, 0x5]);
        let state = run(0xF455, &state);
        assert_eq!(state.memory.as_slice()[0x300..0x306], [0x1, 0x2, 0x3, 0x4, 0x5, 0x0]);
        assert_eq!(state.i, 0x300);
    }

    #[test]
    fn test_fx65_ld() {
        let mut state = State::new();
        state.i = 0x300;
        for (offset, byte) in [0x1, 0x2, 0x3, 0x4, 0x5].into_iter().enumerate() {
            state.memory.write(0x300 + offset as u16, byte);
        }
        state.v[0x5] = 0xAA;
        let state = run(0xF465, &state);
        assert_eq!(state.v[0x0..0x6], [0x1, 0x2, 0x3, 0x4, 0x5, 0xAA]);
        assert_eq!(state.i, 0x300);
    }

    #[test]
    fn test_fx65_ld_wraps_memory() {
        let mut state = State::new();
        state.i = 0xFFF;
        state.memory.write(0xFFF, 0x7);
        let state = run(0xF165, &state);
        assert_eq!(state.v[0x0], 0x7);
        // 0x000 holds the first row of the 0 glyph
        assert_eq!(state.v[0x1], 0xF0);
    }
}
