use std::ops::RangeInclusive;

#[cfg(feature = "save-states")]
use pulse_traits::SaveState;

use super::sweep::Sweep;
use super::{Envelope, Synth};

const DUTY_SEQUENCES: [[u8; 8]; 4] = [
    [0, 1, 0, 0, 0, 0, 0, 0],
    [0, 1, 1, 0, 0, 0, 0, 0],
    [0, 1, 1, 1, 1, 0, 0, 0],
    [1, 0, 0, 1, 1, 1, 1, 1],
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PulseChannel {
    #[default]
    One,
    Two,
}

impl PulseChannel {
    /// CPU addresses decoded by this channel.
    pub fn registers(&self) -> RangeInclusive<u16> {
        match self {
            PulseChannel::One => 0x4000..=0x4003,
            PulseChannel::Two => 0x4004..=0x4007,
        }
    }
}

/// One of the two APU pulse channels.
///
/// Time is counted in timer clocks since the last [`Pulse::end_frame`]. The
/// owner must [`Pulse::run`] the channel up to the cycle of a register write
/// before delivering it.
#[cfg_attr(feature = "save-states", derive(SaveState))]
pub struct Pulse<E: Envelope> {
    #[cfg_attr(feature = "save-states", save(skip))]
    channel: PulseChannel,
    #[cfg_attr(feature = "save-states", save(nested))]
    envelope: E,
    period: u16,
    timer: u16,
    previous_cycle: u32,
    duty: u8,
    duty_pos: u8,
    #[cfg_attr(feature = "save-states", save(nested))]
    sweep: Sweep,
}

impl<E: Envelope> Pulse<E> {
    pub fn new(channel: PulseChannel, envelope: E) -> Pulse<E> {
        Pulse {
            channel,
            envelope,
            period: 0,
            timer: 0,
            previous_cycle: 0,
            duty: 0,
            duty_pos: 0,
            sweep: Sweep::new(),
        }
    }

    pub fn reset(&mut self, soft_reset: bool) {
        self.envelope.reset(soft_reset);

        self.period = 0;
        self.timer = 0;
        self.previous_cycle = 0;
        self.duty = 0;
        self.duty_pos = 0;
        self.sweep = Sweep::new();
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        tracing::trace!(channel = ?self.channel, "write {:04x}:{:02x}", addr, value);
        match addr & 3 {
            0 => {
                self.envelope.initialize_length_counter(value & 0x20 != 0);
                self.envelope.initialize_envelope(value);
                self.duty = (value & 0xc0) >> 6;
            }
            1 => {
                self.sweep.initialize(value);
            }
            2 => {
                self.period = (self.period & 0x700) | value as u16;
            }
            3 => {
                self.envelope.load_length_counter(value >> 3);
                self.period = (self.period & 0xff) | ((value as u16 & 7) << 8);

                // sequencer restarts at the first step of the current duty
                self.timer = self.period + 1;
                self.duty_pos = 0;
                self.envelope.reset_envelope();
            }
            _ => unreachable!(),
        }
    }

    pub fn tick_sweep(&mut self) {
        self.sweep.tick(&mut self.period, self.channel);
    }

    /// Runs the timer up to `target_cycle`, emitting a sample on every
    /// sequencer step.
    pub fn run<S: Synth>(&mut self, target_cycle: u32, synth: &mut S) {
        self.sweep
            .update_target_period(&mut self.period, self.channel, false);

        let mut cycles = target_cycle.saturating_sub(self.previous_cycle);
        while cycles > self.timer as u32 {
            let step = self.timer as u32 + 1;
            cycles -= step;
            self.previous_cycle += step;
            self.clock(synth);
            self.timer = self.period;
        }

        self.timer -= cycles as u16;
        self.previous_cycle = target_cycle;
    }

    pub fn end_frame(&mut self) {
        self.previous_cycle = 0;
    }

    fn clock<S: Synth>(&mut self, synth: &mut S) {
        self.duty_pos = self.duty_pos.wrapping_sub(1) & 7;

        let output = if self.is_muted() {
            0
        } else {
            DUTY_SEQUENCES[self.duty as usize][self.duty_pos as usize] * self.envelope.volume()
        };
        synth.add_output(output, self.previous_cycle);
    }

    /// A period under 8 or a sweep target past 11 bits silences the channel.
    pub fn is_muted(&self) -> bool {
        self.period < 8 || self.sweep.overflowed()
    }

    pub fn channel(&self) -> PulseChannel {
        self.channel
    }

    pub fn period(&self) -> u16 {
        self.period
    }

    pub fn timer(&self) -> u16 {
        self.timer
    }

    pub fn duty(&self) -> u8 {
        self.duty
    }

    pub fn duty_pos(&self) -> u8 {
        self.duty_pos
    }

    pub fn sweep(&self) -> &Sweep {
        &self.sweep
    }

    pub fn envelope(&self) -> &E {
        &self.envelope
    }

    pub fn envelope_mut(&mut self) -> &mut E {
        &mut self.envelope
    }
}
