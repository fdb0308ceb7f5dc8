//! A CHIP-8 interpreter core: memory, registers, the instruction set and the two clocks
//! that drive them. Rendering, sound and host input are left to whoever embeds it.

pub use chip8::{Chip8, Status};
pub use clock::{Clock, Tick};
pub use config::{Config, EntryPoint};
pub use constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, KEY_COUNT, TIMER_HZ};
pub use error::Error;
pub use frame::FrameBuffer;
pub use instruction::Instruction;
pub use keypad::Keypad;
pub use state::State;

mod chip8;
pub mod clock;
pub mod config;
pub mod constants;
mod error;
pub mod frame;
pub mod instruction;
pub mod keypad;
pub mod memory;
pub mod opcode;
mod operations;
pub mod state;
