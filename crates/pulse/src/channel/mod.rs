mod pulse;
mod sweep;

pub use self::pulse::{Pulse, PulseChannel};
pub use self::sweep::Sweep;

/// Volume envelope and length counter shared by the APU tone channels.
///
/// The pulse channel forwards the relevant register bits here and only reads
/// back the current volume.
pub trait Envelope {
    /// Constant volume flag and volume/divider period from the low 5 bits.
    fn initialize_envelope(&mut self, value: u8);
    /// Restart the envelope on the next quarter frame.
    fn reset_envelope(&mut self);
    fn initialize_length_counter(&mut self, halt: bool);
    /// `index` is the 5 bit length table index.
    fn load_length_counter(&mut self, index: u8);
    fn volume(&self) -> u8;
    fn reset(&mut self, soft_reset: bool);
}

/// Destination for the amplitude steps produced by a channel.
pub trait Synth {
    fn add_output(&mut self, amplitude: u8, cycle: u32);
}

impl<F: FnMut(u8, u32)> Synth for F {
    fn add_output(&mut self, amplitude: u8, cycle: u32) {
        self(amplitude, cycle)
    }
}
