/// Frame sequencer step, in timer clocks from the start of the frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Step {
    pub cycle: u32,
    pub half_frame: bool,
}

/// Four step frame sequencer cadence. Every step is a quarter frame, the
/// second and fourth are also half frames.
#[derive(Debug, Copy, Clone)]
pub struct FrameSequencer {
    frame_cycles: u32,
}

impl FrameSequencer {
    pub fn new(frame_cycles: u32) -> Self {
        Self { frame_cycles }
    }

    pub fn frame_cycles(&self) -> u32 {
        self.frame_cycles
    }

    pub fn steps(&self) -> impl Iterator<Item = Step> + '_ {
        let frame_cycles = self.frame_cycles;
        (1..=4u64).map(move |n| Step {
            cycle: (frame_cycles as u64 * n / 4) as u32,
            half_frame: n % 2 == 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ntsc_steps() {
        let steps: Vec<_> = FrameSequencer::new(14915).steps().collect();

        assert_eq!(
            steps.iter().map(|s| s.cycle).collect::<Vec<_>>(),
            vec![3728, 7457, 11186, 14915]
        );
        assert_eq!(
            steps.iter().map(|s| s.half_frame).collect::<Vec<_>>(),
            vec![false, true, false, true]
        );
    }

    #[test]
    fn long_frames_do_not_wrap() {
        let steps: Vec<_> = FrameSequencer::new(u32::MAX).steps().map(|s| s.cycle).collect();

        assert_eq!(steps, vec![0x3fff_ffff, 0x7fff_ffff, 0xbfff_ffff, u32::MAX]);
    }
}
