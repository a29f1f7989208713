// counters the audio path keeps about itself, read only by whoever reports them

use std::time::Duration;

use crate::dsp::Crossing;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub blocks: u64,
    pub samples: u64,
    pub step_advances: u64,
    // includes the first reference crossing
    pub crossings: u64,
    pub accepted_periods: u64,
    pub rejected_periods: u64,
    // rendered with no input sample available
    pub starved_input_samples: u64,
    // dropped because the input ring was full
    pub overflowed_input_samples: u64,
    // callbacks slower than the audio they produced
    pub deadline_overruns: u64,
}

impl Diagnostics {
    #[inline]
    pub fn record_crossing(&mut self, crossing: Crossing) {
        self.crossings += 1;
        match crossing {
            Crossing::Reference => {}
            Crossing::Accepted { .. } => self.accepted_periods += 1,
            Crossing::Rejected { .. } => self.rejected_periods += 1,
        }
    }

    #[inline]
    pub fn record_block(&mut self, samples: usize) {
        self.blocks += 1;
        self.samples += samples as u64;
    }

    #[inline]
    pub fn record_callback(&mut self, elapsed: Duration, budget: Duration) {
        if elapsed > budget {
            self.deadline_overruns += 1;
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "blocks={} samples={} steps={} crossings={} accepted={} rejected={} starved={} overflowed={} overruns={}",
            self.blocks,
            self.samples,
            self.step_advances,
            self.crossings,
            self.accepted_periods,
            self.rejected_periods,
            self.starved_input_samples,
            self.overflowed_input_samples,
            self.deadline_overruns,
        )
    }
}
