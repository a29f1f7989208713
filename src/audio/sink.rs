use super::frame::OutputFrame;
use crate::shared::Indicators;

/// Where the processor's outputs go. `index` is the sample position inside
/// the current block; `set_indicator` is called once per block, after the
/// sample loop.
pub trait OutputSink {
    fn set_gate(&mut self, index: usize, high: bool);
    fn set_cv(&mut self, index: usize, volts: f32);
    fn set_audio(&mut self, index: usize, sample: f32);
    fn set_indicator(&mut self, indicators: Indicators);
}

// Fills a caller-provided frame buffer; writes past its end are dropped.
pub struct FrameSink<'a> {
    frames: &'a mut [OutputFrame],
    indicators: Indicators,
}

impl<'a> FrameSink<'a> {
    pub fn new(frames: &'a mut [OutputFrame]) -> Self {
        Self {
            frames,
            indicators: Indicators::default(),
        }
    }

    #[cfg(test)]
    pub fn indicators(&self) -> Indicators {
        self.indicators
    }
}

impl OutputSink for FrameSink<'_> {
    fn set_gate(&mut self, index: usize, high: bool) {
        if let Some(f) = self.frames.get_mut(index) {
            f.gate = high;
        }
    }

    fn set_cv(&mut self, index: usize, volts: f32) {
        if let Some(f) = self.frames.get_mut(index) {
            f.cv = volts;
        }
    }

    fn set_audio(&mut self, index: usize, sample: f32) {
        if let Some(f) = self.frames.get_mut(index) {
            f.audio = sample;
        }
    }

    fn set_indicator(&mut self, indicators: Indicators) {
        self.indicators = indicators;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Rgb;

    #[test]
    fn writes_land_in_the_right_frame() {
        let mut frames = [OutputFrame::zero(); 4];
        let mut sink = FrameSink::new(&mut frames);
        sink.set_gate(1, true);
        sink.set_cv(2, 1.5);
        sink.set_audio(3, -0.25);
        sink.set_audio(9, 1.0); // out of range, ignored
        sink.set_indicator(Indicators { step: Rgb::CYAN, status: Rgb::GREEN, gate_in: false });
        assert_eq!(sink.indicators().step, Rgb::CYAN);

        assert_eq!(frames[0], OutputFrame::zero());
        assert!(frames[1].gate);
        assert_eq!(frames[2].cv, 1.5);
        assert_eq!(frames[3].audio, -0.25);
    }
}
