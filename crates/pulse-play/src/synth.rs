use blip_buf::BlipBuf;
use pulse::Synth;

// Extra room for the samples still in flight in the filter kernel
const HEADROOM: u32 = 64;

/// Number of output samples produced by one frame of `frame_cycles` clocks.
pub fn frame_samples(clock_rate: f64, sample_rate: u32, frame_cycles: u32) -> f64 {
    (frame_cycles as f64 * sample_rate as f64 / clock_rate).ceil()
}

/// Feeds channel amplitude steps into a band limited buffer.
pub struct BlipSynth {
    blip: BlipBuf,
    gain: i32,
    last: i32,
}

impl BlipSynth {
    /// The buffer holds one full frame, rates must already be validated.
    pub fn new(clock_rate: f64, sample_rate: u32, frame_cycles: u32, gain: i32) -> Self {
        let size = frame_samples(clock_rate, sample_rate, frame_cycles) as u32 + HEADROOM;
        let mut blip = BlipBuf::new(size);
        blip.set_rates(clock_rate, sample_rate as f64);

        Self {
            blip,
            gain,
            last: 0,
        }
    }

    /// Drops buffered samples and returns the output level to silence.
    pub fn clear(&mut self) {
        self.blip.clear();
        self.last = 0;
    }

    pub fn end_frame(&mut self, cycles: u32) {
        self.blip.end_frame(cycles);
    }

    pub fn take_samples(&mut self) -> Vec<i16> {
        let mut samples = Vec::with_capacity(self.blip.samples_avail() as usize);
        let mut buf = [0i16; 1024];
        while self.blip.samples_avail() > 0 {
            let count = self.blip.read_samples(&mut buf, false);
            samples.extend_from_slice(&buf[..count]);
        }
        samples
    }
}

impl Synth for BlipSynth {
    fn add_output(&mut self, amplitude: u8, cycle: u32) {
        let value = amplitude as i32 * self.gain;
        if value != self.last {
            self.blip.add_delta(cycle, value - self.last);
            self.last = value;
        }
    }
}
