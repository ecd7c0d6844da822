#[cfg(feature = "save-states")]
use pulse_traits::SaveState;

use super::PulseChannel;

pub const MAX_PERIOD: u32 = 0x7ff;

/// Pulse frequency sweep unit.
///
/// The target period is kept even when it is not committed, the channel mutes
/// on it going past 11 bits.
#[cfg_attr(feature = "save-states", derive(SaveState))]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Sweep {
    enabled: bool,
    divider_period: u8,
    negate: bool,
    shift: u8,
    reload: bool,
    divider: u8,
    target_period: u32,
}

impl Sweep {
    pub fn new() -> Sweep {
        Sweep::default()
    }

    /// $4001/$4005: `EPPP NSSS`
    pub fn initialize(&mut self, value: u8) {
        self.enabled = value & 0x80 != 0;
        self.negate = value & 0x08 != 0;
        self.divider_period = ((value & 0x70) >> 4) + 1;
        self.shift = value & 0x07;
        self.reload = true;
    }

    pub fn update_target_period(&mut self, period: &mut u16, channel: PulseChannel, apply: bool) {
        let current = *period as u32;
        let delta = current >> self.shift;

        self.target_period = if self.negate {
            let target = current - delta;
            // Pulse one adds the ones' complement of the change
            match channel {
                PulseChannel::One => target.wrapping_sub(1),
                PulseChannel::Two => target,
            }
        } else {
            current + delta
        };

        if apply && self.shift > 0 && current >= 8 && self.target_period <= MAX_PERIOD {
            tracing::trace!(?channel, "sweep {:03x} -> {:03x}", current, self.target_period);
            *period = self.target_period as u16;
        }
    }

    /// Clocked by the frame sequencer on half frames.
    pub fn tick(&mut self, period: &mut u16, channel: PulseChannel) {
        if self.reload {
            if self.divider == 0 && self.enabled {
                self.update_target_period(period, channel, true);
            }
            self.divider = self.divider_period;
            self.reload = false;
        } else if self.divider > 0 {
            self.divider -= 1;
        } else if self.enabled {
            self.update_target_period(period, channel, true);
            self.divider = self.divider_period;
        }
    }

    pub fn target_period(&self) -> u32 {
        self.target_period
    }

    pub fn overflowed(&self) -> bool {
        self.target_period > MAX_PERIOD
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn negate(&self) -> bool {
        self.negate
    }

    pub fn shift(&self) -> u8 {
        self.shift
    }

    pub fn divider_period(&self) -> u8 {
        self.divider_period
    }

    pub fn divider(&self) -> u8 {
        self.divider
    }

    pub fn reload_pending(&self) -> bool {
        self.reload
    }
}
