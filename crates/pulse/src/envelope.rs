#[cfg(feature = "save-states")]
use pulse_traits::SaveState;

use crate::channel::Envelope;

pub const LENGTH_TABLE: [u8; 0x20] = [
    10, 254, 20, 2, 40, 4, 80, 6, 160, 8, 60, 10, 14, 12, 26, 14, 12, 16, 24, 18, 48, 20, 96, 22,
    192, 24, 72, 26, 16, 28, 32, 30,
];

/// 2A03 envelope generator and length counter.
///
/// Length counter loads and halt changes are latched and only take effect on
/// [`ApuEnvelope::reload_length_counter`], which the frame sequencer calls
/// after clocking the counter.
#[cfg_attr(feature = "save-states", derive(SaveState))]
#[derive(Debug, Default, Clone)]
pub struct ApuEnvelope {
    enabled: bool,
    length_halt: bool,
    new_halt_value: bool,
    length_counter: u8,
    length_counter_reload: u8,
    length_counter_previous: u8,
    constant_volume: bool,
    volume: u8,
    start: bool,
    divider: u8,
    decay_counter: u8,
}

impl ApuEnvelope {
    pub fn new() -> ApuEnvelope {
        ApuEnvelope::default()
    }

    /// $4015 channel enable bit.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.length_counter = 0;
        }
        self.enabled = enabled;
    }

    pub fn status(&self) -> bool {
        self.length_counter > 0
    }

    pub fn length_counter(&self) -> u8 {
        self.length_counter
    }

    /// Quarter frame clock.
    pub fn tick_envelope(&mut self) {
        if self.start {
            self.start = false;
            self.decay_counter = 0xf;
            self.divider = self.volume;
        } else if self.divider == 0 {
            self.divider = self.volume;
            if self.decay_counter > 0 {
                self.decay_counter -= 1;
            } else if self.length_halt {
                self.decay_counter = 0xf;
            }
        } else {
            self.divider -= 1;
        }
    }

    /// Half frame clock.
    pub fn tick_length_counter(&mut self) {
        if self.length_counter > 0 && !self.length_halt {
            self.length_counter -= 1;
        }
    }

    /// A load racing a clock on the same cycle is dropped if the clock
    /// already decremented the counter.
    pub fn reload_length_counter(&mut self) {
        if self.length_counter_reload != 0 {
            if self.length_counter == self.length_counter_previous {
                self.length_counter = self.length_counter_reload;
            }
            self.length_counter_reload = 0;
        }
        self.length_halt = self.new_halt_value;
    }
}

impl Envelope for ApuEnvelope {
    fn initialize_envelope(&mut self, value: u8) {
        self.constant_volume = value & 0x10 != 0;
        self.volume = value & 0xf;
    }

    fn reset_envelope(&mut self) {
        self.start = true;
    }

    fn initialize_length_counter(&mut self, halt: bool) {
        self.new_halt_value = halt;
    }

    fn load_length_counter(&mut self, index: u8) {
        if self.enabled {
            self.length_counter_reload = LENGTH_TABLE[(index & 0x1f) as usize];
            self.length_counter_previous = self.length_counter;
        }
    }

    fn volume(&self) -> u8 {
        if self.length_counter == 0 {
            0
        } else if self.constant_volume {
            self.volume
        } else {
            self.decay_counter
        }
    }

    fn reset(&mut self, _soft_reset: bool) {
        *self = ApuEnvelope::default();
    }
}
