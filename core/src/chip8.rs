use std::collections::VecDeque;
use std::time::Duration;

use log::{debug, error, info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clock::{Clock, Tick};
use crate::config::Config;
use crate::constants::KEY_COUNT;
use crate::error::Error;
use crate::frame::FrameBuffer;
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::memory::Memory;
use crate::operations;
use crate::state::State;

/// What the instruction clock is doing
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    /// No ROM loaded yet
    Idle,
    Running,
    /// Halted by the host; timers are frozen too
    Paused,
    /// Halted by a failed instruction; timers are frozen too
    Faulted(Error),
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `previous_states` for rewinding
///  - the `keypad` with public interfaces for manipulating it
///  - the `clock` that schedules instructions and timer ticks
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the clock by wall time, or the CPU and timers one tick at a time
/// - reversing the CPU
/// - inspecting its frame buffer and sound timer for some display and speaker
///
/// The machine is the only writer of its state and every method runs to completion,
/// so anything read between calls is a consistent snapshot. Hosts that drive it from
/// several threads should wrap it in a single `Mutex`.
pub struct Chip8 {
    config: Config,
    state: State,
    previous_states: VecDeque<State>,
    keypad: Keypad,
    rng: StdRng,
    clock: Clock,
    status: Status,
    rom: Option<Vec<u8>>,
}

impl Chip8 {
    pub fn new() -> Self {
        let config = Config::default();
        Self::assemble(config, Clock::default())
    }

    /// Builds a machine from `config`, failing if the config is unusable
    pub fn with_config(config: Config) -> Result<Self, Error> {
        config.validate()?;
        let clock = Clock::new(config.clock_hz)?;
        Ok(Self::assemble(config, clock))
    }

    fn assemble(config: Config, clock: Clock) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Chip8 {
            state: State::with_memory(Memory::new(), config.entry_point.addr()),
            previous_states: VecDeque::with_capacity(config.rewind_depth),
            keypad: Keypad::new(),
            rng,
            clock,
            status: Status::Idle,
            rom: None,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Whether the last `Fx0A` is still waiting for a key
    pub fn is_waiting_for_key(&self) -> bool {
        self.state.register_needing_key.is_some()
    }

    /// Load a rom and start running it.
    ///
    /// Everything from the entry point up is replaced and all registers, timers, the stack
    /// and the frame buffer are reset; the sprite sheet stays where it is.
    /// A rom that doesn't fit is rejected and the machine is left exactly as it was.
    ///
    /// # Arguments
    /// * `rom` the raw program image
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Error> {
        let entry = self.config.entry_point.addr();
        let mut memory = self.state.memory;
        if let Err(e) = memory.load_program(entry, rom) {
            warn!("rejected ROM: {}", e);
            return Err(e);
        }

        self.state = State::with_memory(memory, entry);
        self.state.draw_flag = true;
        self.previous_states.clear();
        self.rom = Some(rom.to_vec());
        self.status = Status::Running;
        info!("loaded {} byte ROM at {:#05X}", rom.len(), entry);
        Ok(())
    }

    /// Reloads the current rom into a freshly reset machine. Does nothing if no rom is loaded.
    pub fn reset(&mut self) -> Result<(), Error> {
        match self.rom.clone() {
            Some(rom) => {
                info!("resetting");
                self.load_rom(&rom)
            }
            None => Ok(()),
        }
    }

    /// Stops the instruction and timer clocks
    pub fn pause(&mut self) {
        if self.status == Status::Running {
            info!("paused at {:#05X}", self.state.pc);
            self.status = Status::Paused;
        }
    }

    /// Restarts a paused machine; idle and faulted machines stay as they are
    pub fn resume(&mut self) {
        if self.status == Status::Paused {
            info!("resumed at {:#05X}", self.state.pc);
            self.status = Status::Running;
        }
    }

    /// Returns the FrameBuffer if the display should be redrawn, and clears the draw flag
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    /// The current FrameBuffer, whether or not it changed
    pub fn frame(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// A copy of the whole machine state, for debuggers and the like
    pub fn snapshot(&self) -> State {
        self.state
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    /// Whether a speaker should be sounding a tone right now
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        if self.keypad.press(key) {
            self.deliver_key(key & 0xF);
        }
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.keypad.release(key);
    }

    /// Replace the pressed status of every key at once
    ///
    /// # Arguments
    /// * `keys` whether each key 0..F is held
    pub fn set_keys(&mut self, keys: [bool; KEY_COUNT]) {
        if let Some(key) = self.keypad.set_all(keys) {
            self.deliver_key(key);
        }
    }

    /// Hands a freshly pressed key to a pending `Fx0A`
    fn deliver_key(&mut self, key: u8) {
        if let Some(register) = self.state.register_needing_key {
            debug!("V{:X} <- key {:X}", register, key);
            self.state.v[register as usize] = key;
            self.state.register_needing_key = None;
        }
    }

    /// Changes the instruction rate; timers keep their 60Hz schedule
    pub fn set_clock_hz(&mut self, clock_hz: u32) -> Result<(), Error> {
        self.clock.set_cpu_hz(clock_hz)?;
        self.config.clock_hz = clock_hz;
        Ok(())
    }

    /// Lets `elapsed` of emulated time pass.
    ///
    /// Runs every instruction and timer tick that falls due, in timeline order.
    /// Stops at the first failed instruction and returns its error.
    pub fn advance(&mut self, elapsed: Duration) -> Result<(), Error> {
        for tick in self.clock.advance(elapsed) {
            match tick {
                Tick::Cpu => self.advance_cpu()?,
                Tick::Timer => self.advance_timers(),
            }
        }
        Ok(())
    }

    /// Advances the CPU by a single cycle
    /// - does nothing unless running
    /// - breaks if awaiting a keypress
    /// - gets and executes the next opcode
    ///
    /// A failed instruction leaves the state untouched and faults the machine.
    pub fn advance_cpu(&mut self) -> Result<(), Error> {
        if self.status != Status::Running || self.is_waiting_for_key() {
            return Ok(());
        }

        match self.execute_next() {
            Ok(state) => {
                self.save_state();
                self.state = state;
                if let Some(register) = self.state.register_needing_key {
                    debug!("waiting for a key for V{:X}", register);
                }
                Ok(())
            }
            Err(e) => {
                error!("faulted: {}", e);
                self.status = Status::Faulted(e);
                Err(e)
            }
        }
    }

    /// Fetches, decodes and executes the opcode at the pc, returning the resulting state
    fn execute_next(&mut self) -> Result<State, Error> {
        let pc = self.state.pc;
        let op = self.state.memory.opcode(pc)?;
        let instruction =
            Instruction::decode(&op).ok_or(Error::UnknownOpcode { opcode: op, pc })?;
        trace!(
            "{:03X}: {:04X} {:<16} v{:02X?} i{:03X}",
            pc,
            op,
            instruction.to_string(),
            self.state.v,
            self.state.i
        );
        operations::execute(instruction, &self.state, &self.keypad, &mut self.rng)
    }

    /// Counts the delay and sound timers down by one, as one 60Hz tick.
    /// Timers keep counting while waiting for a key, but not while paused or faulted.
    pub fn advance_timers(&mut self) {
        if self.status != Status::Running {
            return;
        }
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    /// Reverses the CPU by a single cycle if possible
    /// - if there are previous_states, pops the last one and restores it
    /// - a faulted machine becomes paused, so it can be resumed from the restored state
    ///
    /// Returns whether a state was restored.
    pub fn reverse_cpu(&mut self) -> bool {
        let Some(state) = self.previous_states.pop_front() else {
            return false;
        };
        self.state = state;
        self.state.draw_flag = true;
        if let Status::Faulted(_) = self.status {
            self.status = Status::Paused;
        }
        debug!("rewound to {:#05X}", self.state.pc);
        true
    }

    /// Puts the current state in previous_states
    /// - if there are already `rewind_depth` saved then the oldest is dropped
    fn save_state(&mut self) {
        if self.config.rewind_depth == 0 {
            return;
        }
        if self.previous_states.len() == self.config.rewind_depth {
            self.previous_states.pop_back();
        }
        self.previous_states.push_front(self.state);
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
