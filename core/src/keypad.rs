use crate::constants::KEY_COUNT;

/// # Keypad
/// Chip-8 input is generated with a hexadecimal keypad.
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
/// The keypad only tracks which of the 16 keys are held; translating host key events into
/// key indices is the host's job.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Keypad::default()
    }

    /// Marks `key` as held. Returns true if it was previously up.
    /// Only the low nibble of `key` is used.
    pub fn press(&mut self, key: u8) -> bool {
        let slot = &mut self.keys[index(key)];
        let pressed = !*slot;
        *slot = true;
        pressed
    }

    /// Marks `key` as released
    pub fn release(&mut self, key: u8) {
        self.keys[index(key)] = false;
    }

    /// Whether `key` is held; only the low nibble of `key` is used.
    pub fn is_down(&self, key: u8) -> bool {
        self.keys[index(key)]
    }

    /// Replaces the whole keypad state.
    /// Returns the lowest key that went from up to down, if any.
    pub fn set_all(&mut self, keys: [bool; KEY_COUNT]) -> Option<u8> {
        let pressed = (0..KEY_COUNT)
            .find(|&k| keys[k] && !self.keys[k])
            .map(|k| k as u8);
        self.keys = keys;
        pressed
    }

    /// The raw key-down vector, indexed by key
    pub fn snapshot(&self) -> [bool; KEY_COUNT] {
        self.keys
    }
}

fn index(key: u8) -> usize {
    (key & 0xF) as usize
}
