
use helper::{Call, Recorder, set_period};
use pulse::PulseChannel;

#[test]
fn control_register_forwards_envelope_bits() {
    let mut pulse = helper::pulse(PulseChannel::One, 0);
    pulse.write(0, 0xf6);

    assert_eq!(pulse.duty(), 3);
    assert_eq!(
        pulse.envelope().calls,
        vec![
            Call::InitializeLengthCounter(true),
            Call::InitializeEnvelope(0xf6),
        ]
    );

    pulse.write(0, 0x5f);
    assert_eq!(pulse.duty(), 1);
    assert_eq!(
        pulse.envelope().calls[2..],
        [
            Call::InitializeLengthCounter(false),
            Call::InitializeEnvelope(0x5f),
        ]
    );
}

#[test]
fn sweep_register_sets_reload() {
    let mut pulse = helper::pulse(PulseChannel::Two, 0);
    pulse.write(1, 0xdb);

    let sweep = pulse.sweep();
    assert!(sweep.enabled());
    assert!(sweep.negate());
    assert_eq!(sweep.divider_period(), 6);
    assert_eq!(sweep.shift(), 3);
    assert!(sweep.reload_pending());
    assert!(pulse.envelope().calls.is_empty());
}

#[test]
fn low_period_keeps_high_bits() {
    let mut pulse = helper::pulse(PulseChannel::One, 0);
    pulse.write(3, 0x07);
    pulse.write(2, 0xff);
    assert_eq!(pulse.period(), 0x7ff);

    pulse.write(2, 0x00);
    assert_eq!(pulse.period(), 0x700);
}

#[test]
fn high_period_loads_length_and_restarts() {
    let mut pulse = helper::pulse(PulseChannel::One, 15);
    pulse.write(0, 0x80);
    set_period(&mut pulse, 0x20);
    pulse.run(300, &mut Recorder::default());
    assert_ne!(pulse.duty_pos(), 0);

    pulse.write(2, 0x34);
    pulse.write(3, 0b10101_101);

    assert_eq!(pulse.period(), 0x534);
    assert_eq!(pulse.timer(), 0x535);
    assert_eq!(pulse.duty_pos(), 0);
    assert_eq!(
        pulse.envelope().calls[pulse.envelope().calls.len() - 2..],
        [Call::LoadLengthCounter(0b10101), Call::ResetEnvelope]
    );

    let mut synth = Recorder::default();
    pulse.run(300 + 0x536, &mut synth);
    assert_eq!(synth.samples, vec![(300 + 0x536, 0)]);
    assert_eq!(pulse.duty_pos(), 7);
}

#[test]
fn writes_decode_the_low_address_bits() {
    assert_eq!(PulseChannel::One.registers(), 0x4000..=0x4003);
    assert_eq!(PulseChannel::Two.registers(), 0x4004..=0x4007);

    let mut pulse = helper::pulse(PulseChannel::Two, 0);
    for addr in PulseChannel::Two.registers() {
        pulse.write(addr, 0x42);
    }

    assert_eq!(pulse.duty(), 1);
    assert_eq!(pulse.period(), 0x242);
    assert_eq!(pulse.sweep().shift(), 2);
    assert_eq!(pulse.sweep().divider_period(), 5);
}
