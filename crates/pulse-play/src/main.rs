use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use pulse::{ApuEnvelope, BinarySaveState, Envelope, Pulse, PulseChannel};
use tracing_subscriber::{Layer, filter, layer::SubscriberExt};

mod script;
mod sequencer;
mod synth;

use script::RegisterWrite;
use sequencer::FrameSequencer;
use synth::BlipSynth;

const GAIN: i32 = 512;
// blip_buf rejects larger clock to sample rate ratios
const MAX_RATE_RATIO: f64 = (1 << 20) as f64;

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    args.check()?;

    let channel = PulseChannel::from(args.channel);
    let mut pulse = Pulse::new(channel, ApuEnvelope::new());
    pulse.envelope_mut().set_enabled(true);
    apply_writes(&mut pulse, &args.writes);

    tracing::info!(?channel, writes = args.writes.len(), "running {} frames", args.frames);

    let sequencer = FrameSequencer::new(args.frame_cycles);
    let mut synth = BlipSynth::new(args.clock_rate, args.sample_rate, args.frame_cycles, GAIN);

    for frame in 0..args.frames {
        if args.reset_at == Some(frame) {
            tracing::info!("reset at frame {frame}");
            pulse.reset(false);
            synth.clear();
            pulse.envelope_mut().set_enabled(true);
            apply_writes(&mut pulse, &args.writes);
        }

        for step in sequencer.steps() {
            pulse.run(step.cycle, &mut synth);
            pulse.envelope_mut().tick_envelope();
            if step.half_frame {
                pulse.envelope_mut().tick_length_counter();
                pulse.tick_sweep();
            }
            pulse.envelope_mut().reload_length_counter();
        }
        pulse.end_frame();
        synth.end_frame(sequencer.frame_cycles());

        let samples = synth.take_samples();
        let (peak, rms) = levels(&samples);
        println!(
            "frame {frame:4}: period {:03x} target {:04x} volume {:2}{} samples {} peak {peak:5} rms {rms:7.1}",
            pulse.period(),
            pulse.sweep().target_period(),
            pulse.envelope().volume(),
            if pulse.is_muted() { " muted" } else { "" },
            samples.len(),
        );

        if args.save_states {
            pulse = round_trip(&pulse)?;
        }
    }

    Ok(())
}

fn apply_writes(pulse: &mut Pulse<ApuEnvelope>, writes: &[RegisterWrite]) {
    for write in writes {
        pulse.write(write.addr, write.value);
    }
    pulse.envelope_mut().reload_length_counter();
}

fn round_trip(pulse: &Pulse<ApuEnvelope>) -> Result<Pulse<ApuEnvelope>> {
    let state = pulse.binary_save_state()?;
    let mut restored = Pulse::new(pulse.channel(), ApuEnvelope::new());
    restored.binary_restore_state(&state)?;
    tracing::debug!("restored {} byte save state", state.len());
    Ok(restored)
}

fn levels(samples: &[i16]) -> (u16, f64) {
    if samples.is_empty() {
        return (0, 0.0);
    }

    let peak = samples.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0);
    let sum: f64 = samples.iter().map(|&s| s as f64 * s as f64).sum();
    (peak, (sum / samples.len() as f64).sqrt())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => filter::LevelFilter::INFO,
        1 => filter::LevelFilter::DEBUG,
        _ => filter::LevelFilter::TRACE,
    };
    let log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(level);

    tracing::subscriber::set_global_default(tracing_subscriber::registry().with(log))
        .expect("init tracing");
}

#[derive(Parser)]
struct Args {
    /// Selects which pulse channel receives the writes
    #[arg(short, long, value_enum, default_value_t)]
    channel: Channel,
    /// Register write as ADDR=VALUE in hex, applied in order before the first frame
    #[arg(short, long = "write", value_name = "ADDR=VALUE")]
    writes: Vec<RegisterWrite>,
    /// Number of frames to run
    #[arg(short, long, default_value_t = 60)]
    frames: u32,
    /// Timer clocks per frame, split evenly into four sequencer steps
    #[arg(long, default_value_t = 14915)]
    frame_cycles: u32,
    /// Timer clock rate in Hz
    #[arg(long, default_value_t = 894_886.5)]
    clock_rate: f64,
    /// Output sample rate in Hz
    #[arg(long, default_value_t = 48000)]
    sample_rate: u32,
    /// Round trip the channel through a save state after every frame
    #[arg(long)]
    save_states: bool,
    /// Reset the channel and replay the writes at the start of this frame
    #[arg(long, value_name = "FRAME")]
    reset_at: Option<u32>,
    /// Repeat for more log output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn check(&self) -> Result<()> {
        let channel = PulseChannel::from(self.channel);
        let registers = channel.registers();
        for write in &self.writes {
            if !registers.contains(&write.addr) {
                bail!(
                    "{:04x} is outside the {:?} registers {:04x}-{:04x}",
                    write.addr,
                    channel,
                    registers.start(),
                    registers.end()
                );
            }
        }

        if self.frame_cycles == 0 {
            bail!("frame cycles must be at least 1");
        }
        if self.sample_rate == 0 {
            bail!("sample rate must be at least 1");
        }
        if !self.clock_rate.is_finite() || self.clock_rate <= 0.0 {
            bail!("clock rate must be a positive number, got {}", self.clock_rate);
        }
        if self.clock_rate / self.sample_rate as f64 > MAX_RATE_RATIO {
            bail!(
                "clock rate {} is too high for a {} Hz sample rate",
                self.clock_rate,
                self.sample_rate
            );
        }

        let frame_samples =
            synth::frame_samples(self.clock_rate, self.sample_rate, self.frame_cycles);
        if frame_samples > self.sample_rate as f64 {
            bail!(
                "a frame of {} clocks is longer than one second at {} Hz",
                self.frame_cycles,
                self.clock_rate
            );
        }

        Ok(())
    }
}

#[derive(Debug, Copy, Clone, ValueEnum, Default)]
enum Channel {
    #[default]
    One,
    Two,
}

impl From<Channel> for PulseChannel {
    fn from(value: Channel) -> Self {
        match value {
            Channel::One => PulseChannel::One,
            Channel::Two => PulseChannel::Two,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(args: &[&str]) -> Result<()> {
        let args = Args::try_parse_from(std::iter::once("pulse-play").chain(args.iter().copied()))?;
        args.check()
    }

    #[test]
    fn defaults_are_accepted() {
        assert!(check(&[]).is_ok());
        assert!(check(&["--frame-cycles", "100000", "-w", "4003=08"]).is_ok());
        assert!(check(&["-c", "two", "-w", "$4007=$08"]).is_ok());
    }

    #[test]
    fn writes_outside_the_channel_are_rejected() {
        assert!(check(&["-w", "4004=00"]).is_err());
        assert!(check(&["-c", "two", "-w", "4003=00"]).is_err());
    }

    #[test]
    fn unusable_rates_are_rejected() {
        assert!(check(&["--sample-rate", "0"]).is_err());
        assert!(check(&["--frame-cycles", "0"]).is_err());
        assert!(check(&["--clock-rate", "0"]).is_err());
        assert!(check(&["--clock-rate=-5"]).is_err());
        assert!(check(&["--clock-rate", "NaN"]).is_err());
        assert!(check(&["--frame-cycles", "4294967295"]).is_err());
        assert!(check(&["--sample-rate", "1", "--clock-rate", "1e9"]).is_err());
    }
}
