/*!
Standard joypad on the $4016 serial port.

Behavior:
- Buttons are represented as a bitmask in the order the CPU reads them:
  A, B, Select, Start, Up, Down, Left, Right  (bit 0 through bit 7)
- The controller watches the bus latches after every CPU step:
  * A write to $4016 with bit 0 set, immediately followed by a $4016 write with bit 0
    clear, is a strobe. It latches the live buttons and starts a 24-step poll.
    Any other write to $4016 disarms a half-finished strobe.
  * The current poll bit is placed at $4016 in main memory, where the CPU's next
    read finds it. Every latched read of $4016 advances the poll by one step.
- Poll sequence (24 steps):
    8 button bits (A first), 8 zero padding bits, signature 0,0,0,1, 4 zeros.
  After the last step $4016 reads 0.
*/

use crate::bus::{Bus, BusWrite, RegisterWriteObserver};

/// Main-memory address of the first controller port.
pub const JOYPAD1: u16 = 0x4016;

/// Steps in one poll.
const POLL_LENGTH: u8 = 24;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    A,
    B,
    Select,
    Start,
    Up,
    Down,
    Left,
    Right,
}

impl Button {
    #[inline]
    pub fn mask(self) -> u8 {
        match self {
            Button::A => 1 << 0,
            Button::B => 1 << 1,
            Button::Select => 1 << 2,
            Button::Start => 1 << 3,
            Button::Up => 1 << 4,
            Button::Down => 1 << 5,
            Button::Left => 1 << 6,
            Button::Right => 1 << 7,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Controller {
    // Current live button states. Bit set = pressed.
    buttons: u8,

    // Snapshot taken when the poll started.
    latched: u8,

    // Last $4016 write had bit 0 set.
    armed: bool,

    // Next poll step to publish; `POLL_LENGTH` when idle.
    step: u8,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self {
            buttons: 0,
            latched: 0,
            armed: false,
            step: POLL_LENGTH,
        }
    }

    /// Back to power-on: nothing pressed, no poll in progress.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        if pressed {
            self.buttons |= button.mask();
        } else {
            self.buttons &= !button.mask();
        }
    }

    pub fn press(&mut self, button: Button) {
        self.set_button(button, true);
    }

    pub fn release(&mut self, button: Button) {
        self.set_button(button, false);
    }

    /// Replace the whole live state. Bit layout matches `Button::mask`.
    pub fn set_state_mask(&mut self, mask: u8) {
        self.buttons = mask;
    }

    pub fn current_mask(&self) -> u8 {
        self.buttons
    }

    /// True while a poll sequence is being shifted out.
    pub fn is_polling(&self) -> bool {
        self.step < POLL_LENGTH
    }

    fn poll_bit(&self, step: u8) -> u8 {
        match step {
            0..=7 => (self.latched >> step) & 1,
            19 => 1,
            _ => 0,
        }
    }

    /// Place the current step's bit on the port and move to the next step.
    fn publish(&mut self, bus: &mut Bus) {
        if self.is_polling() {
            let bit = self.poll_bit(self.step);
            bus.poke(JOYPAD1, bit);
            self.step += 1;
        } else {
            bus.poke(JOYPAD1, 0);
        }
    }
}

impl RegisterWriteObserver for Controller {
    fn notify_write(&mut self, bus: &mut Bus, write: BusWrite) {
        if write.addr != JOYPAD1 {
            return;
        }
        let strobe = write.value & 1 != 0;
        if strobe {
            self.armed = true;
        } else if self.armed {
            self.armed = false;
            self.latched = self.buttons;
            self.step = 0;
            self.publish(bus);
        } else {
            self.armed = false;
        }
    }

    fn notify_read(&mut self, bus: &mut Bus, addr: u16) {
        if addr == JOYPAD1 {
            self.publish(bus);
        }
    }
}
