mod channel;
mod envelope;

pub use channel::{Envelope, Pulse, PulseChannel, Sweep, Synth};
pub use envelope::{ApuEnvelope, LENGTH_TABLE};

#[cfg(feature = "save-states")]
pub use pulse_traits::{BinarySaveState, Error as SaveStateError, SaveState};
