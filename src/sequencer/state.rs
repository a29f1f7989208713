use crate::dsp::Quantizer;
use crate::pipeline::config::EngineConfig;
use crate::shared::{Indicators, NUM_STEPS, Rgb, STEP_COLORS};

use super::controls::{ControlFrame, lerp, wrap_index};

// fraction of a step the gate stays high
pub const GATE_DUTY: f64 = 0.5;

const INITIAL_TEMPO: f32 = 120.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Edit, // select and edit steps
    View, // watch the sequence play
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Edit => Mode::View,
            Mode::View => Mode::Edit,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Edit => "EDIT",
            Mode::View => "VIEW",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepSlot {
    pub active: bool,
    pub interval: i32,
    pub frequency: f32, // always > 0
}

// apply_controls once per block, advance_sample once per sample;
// edits only ever touch the step under the cursor
#[derive(Clone, Debug)]
pub struct Sequencer {
    steps: [StepSlot; NUM_STEPS],
    current_step: usize,
    edit_cursor: usize,
    phase: f64, // [0, 1) through the current step
    tempo_bpm: f32,
    mode: Mode,
    gate_latched: bool,

    min_tempo: f32,
    max_tempo: f32,
    steps_per_beat: f64,
    quantizer: Quantizer,
}

impl Sequencer {
    pub fn new(config: &EngineConfig) -> Self {
        let quantizer = Quantizer::new(config.base_frequency, config.max_interval);
        let empty = StepSlot {
            active: false,
            interval: 0,
            frequency: quantizer.base(),
        };

        Self {
            steps: [empty; NUM_STEPS],
            current_step: 0,
            edit_cursor: 0,
            phase: 0.0,
            tempo_bpm: INITIAL_TEMPO.clamp(config.min_tempo, config.max_tempo),
            mode: Mode::Edit,
            gate_latched: false,
            min_tempo: config.min_tempo,
            max_tempo: config.max_tempo,
            steps_per_beat: config.steps_per_beat as f64,
            quantizer,
        }
    }

    // toggle first, the rest of the frame obeys the new mode
    pub fn apply_controls(&mut self, frame: &ControlFrame) {
        if frame.mode_toggle {
            self.toggle_mode();
        }

        match self.mode {
            Mode::Edit => {
                let tempo_knob = frame.tempo_knob.clamp(0.0, 1.0);
                self.tempo_bpm = lerp(self.min_tempo, self.max_tempo, tempo_knob);
                self.edit_cursor = wrap_index(self.edit_cursor, frame.encoder_delta);

                let interval = self.quantizer.interval_for_knob(frame.pitch_knob);
                let slot = &mut self.steps[self.edit_cursor];
                slot.interval = interval;
                slot.frequency = self.quantizer.frequency_for_interval(interval);

                if frame.activate {
                    slot.active = !slot.active;
                }
            }
            // playback only; controls are ignored apart from the toggle above
            Mode::View => {}
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    // steps per second
    pub fn step_frequency(&self) -> f64 {
        (self.tempo_bpm as f64 / 60.0) * self.steps_per_beat
    }

    // true when a new step began
    pub fn advance_sample(&mut self, sample_duration: f64) -> bool {
        let inc = self.step_frequency() * sample_duration;
        if !(inc.is_finite() && inc > 0.0) {
            return false;
        }

        self.phase += inc;
        if self.phase < 1.0 {
            return false;
        }

        self.phase -= 1.0;
        if self.phase >= 1.0 {
            self.phase = self.phase.fract(); // more than a whole step in one sample
        }
        self.current_step = (self.current_step + 1) % NUM_STEPS;
        self.gate_latched = self.steps[self.current_step].active;
        true
    }

    // high for the first half of every latched step
    pub fn gate(&self) -> bool {
        self.phase < GATE_DUTY && self.gate_latched
    }

    pub fn current_frequency(&self) -> f32 {
        self.steps[self.current_step].frequency
    }

    pub fn current_step_active(&self) -> bool {
        self.steps[self.current_step].active
    }

    pub fn indicators(&self, gate_in: bool) -> Indicators {
        let green_if = |on: bool| if on { Rgb::GREEN } else { Rgb::OFF };
        let (step, status) = match self.mode {
            Mode::Edit => (
                STEP_COLORS[self.edit_cursor],
                green_if(self.steps[self.edit_cursor].active),
            ),
            Mode::View => (STEP_COLORS[self.current_step], green_if(self.gate_latched)),
        };
        Indicators { step, status, gate_in }
    }

    pub fn steps(&self) -> &[StepSlot; NUM_STEPS] {
        &self.steps
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn edit_cursor(&self) -> usize {
        self.edit_cursor
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn tempo_bpm(&self) -> f32 {
        self.tempo_bpm
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn gate_latched(&self) -> bool {
        self.gate_latched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RATE: f64 = 48_000.0;

    fn fixed_tempo(bpm: f32) -> EngineConfig {
        EngineConfig {
            min_tempo: bpm,
            max_tempo: bpm,
            ..EngineConfig::default()
        }
    }

    fn edit(seq: &mut Sequencer, frame: ControlFrame) {
        seq.apply_controls(&frame);
    }

    fn activate_all(seq: &mut Sequencer) {
        for _ in 0..NUM_STEPS {
            edit(seq, ControlFrame { activate: true, ..ControlFrame::default() });
            edit(seq, ControlFrame { encoder_delta: 1, ..ControlFrame::default() });
        }
    }

    // samples until the next step boundary, inclusive
    fn run_to_boundary(seq: &mut Sequencer) -> usize {
        let mut n = 0;
        loop {
            n += 1;
            if seq.advance_sample(1.0 / RATE) {
                return n;
            }
            assert!(n < 1_000_000, "no step boundary");
        }
    }

    #[test]
    fn starts_empty_in_edit_mode() {
        let seq = Sequencer::new(&EngineConfig::default());
        assert_eq!(seq.mode(), Mode::Edit);
        assert_eq!(seq.current_step(), 0);
        assert_eq!(seq.edit_cursor(), 0);
        assert_eq!(seq.phase(), 0.0);
        assert!(!seq.gate());
        for slot in seq.steps() {
            assert!(!slot.active);
            assert_eq!(slot.frequency, 440.0);
        }
    }

    #[test]
    fn tempo_follows_the_knob_in_edit_mode() {
        let mut seq = Sequencer::new(&EngineConfig::default());
        edit(&mut seq, ControlFrame { tempo_knob: 0.0, ..ControlFrame::default() });
        assert_eq!(seq.tempo_bpm(), 40.0);
        edit(&mut seq, ControlFrame { tempo_knob: 1.0, ..ControlFrame::default() });
        assert_eq!(seq.tempo_bpm(), 400.0);
    }

    #[test]
    fn eighth_notes_at_120_bpm_last_12000_samples() {
        let mut seq = Sequencer::new(&fixed_tempo(120.0));
        assert_eq!(seq.tempo_bpm(), 120.0);
        activate_all(&mut seq);
        run_to_boundary(&mut seq);

        // one full step, gate sampled after every advance
        let mut high = 0;
        let mut len = 0;
        let mut went_low = false;
        loop {
            let boundary = seq.advance_sample(1.0 / RATE);
            len += 1;
            if boundary {
                break;
            }
            if seq.gate() {
                assert!(!went_low, "gate came back high inside a step");
                high += 1;
            } else {
                went_low = true;
            }
        }
        assert!((11_999..=12_001).contains(&len), "{len}");
        // the step began one sample before counting started
        assert!((5_998..=6_000).contains(&high), "{high}");
    }

    #[test]
    fn firmware_step_rate_is_selectable() {
        let config = EngineConfig { steps_per_beat: 0.5, ..fixed_tempo(120.0) };
        let mut seq = Sequencer::new(&config);
        assert_eq!(seq.step_frequency(), 1.0);
        run_to_boundary(&mut seq);
        let len = run_to_boundary(&mut seq);
        assert!((47_999..=48_001).contains(&len), "{len}");
    }

    #[test]
    fn inactive_steps_never_gate() {
        let mut seq = Sequencer::new(&EngineConfig::default());
        for _ in 0..100_000 {
            seq.advance_sample(1.0 / RATE);
            assert!(!seq.gate());
        }
    }

    #[test]
    fn gate_latches_at_the_boundary() {
        let mut seq = Sequencer::new(&fixed_tempo(120.0));
        // activate step 1 while step 0 plays
        edit(&mut seq, ControlFrame { encoder_delta: 1, activate: true, ..ControlFrame::default() });
        assert!(seq.steps()[1].active);
        assert!(!seq.gate());
        run_to_boundary(&mut seq);
        assert_eq!(seq.current_step(), 1);
        assert!(seq.gate_latched());
        assert!(seq.gate());
        run_to_boundary(&mut seq);
        assert!(!seq.gate_latched());
    }

    #[test]
    fn cursor_wraps_in_both_directions() {
        let mut seq = Sequencer::new(&EngineConfig::default());
        edit(&mut seq, ControlFrame { encoder_delta: -1, ..ControlFrame::default() });
        assert_eq!(seq.edit_cursor(), 7);
        edit(&mut seq, ControlFrame { encoder_delta: 3, ..ControlFrame::default() });
        assert_eq!(seq.edit_cursor(), 2);
    }

    #[test]
    fn pitch_knob_writes_the_selected_step() {
        let mut seq = Sequencer::new(&EngineConfig::default());
        edit(&mut seq, ControlFrame { encoder_delta: 3, pitch_knob: 1.0, ..ControlFrame::default() });
        let slot = seq.steps()[3];
        assert_eq!(slot.interval, 6);
        assert_eq!(slot.frequency, 440.0 * (15.0 / 8.0));
        assert_eq!(seq.steps()[0].frequency, 440.0);
    }

    #[test]
    fn view_mode_ignores_edits() {
        let mut seq = Sequencer::new(&EngineConfig::default());
        edit(&mut seq, ControlFrame { mode_toggle: true, ..ControlFrame::default() });
        assert_eq!(seq.mode(), Mode::View);
        let before = seq.clone();
        edit(
            &mut seq,
            ControlFrame {
                tempo_knob: 1.0,
                pitch_knob: 0.0,
                encoder_delta: 5,
                activate: true,
                mode_toggle: false,
            },
        );
        assert_eq!(seq.steps(), before.steps());
        assert_eq!(seq.edit_cursor(), before.edit_cursor());
        assert_eq!(seq.tempo_bpm(), before.tempo_bpm());
    }

    #[test]
    fn toggle_and_edit_in_one_block_uses_the_new_mode() {
        let mut seq = Sequencer::new(&EngineConfig::default());
        edit(&mut seq, ControlFrame { mode_toggle: true, activate: true, ..ControlFrame::default() });
        assert_eq!(seq.mode(), Mode::View);
        assert!(!seq.steps()[0].active);
    }

    #[test]
    fn indicators_follow_the_mode() {
        let mut seq = Sequencer::new(&fixed_tempo(120.0));
        edit(&mut seq, ControlFrame { encoder_delta: 2, activate: true, ..ControlFrame::default() });
        let led = seq.indicators(false);
        assert_eq!(led.step, Rgb::BLUE);
        assert_eq!(led.status, Rgb::GREEN);

        seq.toggle_mode();
        let led = seq.indicators(true);
        assert_eq!(led.step, Rgb::RED); // playing step 0
        assert_eq!(led.status, Rgb::OFF);
        assert!(led.gate_in);
    }

    #[test]
    fn current_frequency_follows_the_playhead() {
        let mut seq = Sequencer::new(&fixed_tempo(120.0));
        edit(&mut seq, ControlFrame { encoder_delta: 1, pitch_knob: 0.0, ..ControlFrame::default() });
        assert_eq!(seq.current_frequency(), 440.0);
        run_to_boundary(&mut seq);
        assert_eq!(seq.current_frequency(), seq.steps()[1].frequency);
        assert!(seq.current_frequency() < 440.0);
    }

    #[test]
    fn bad_sample_durations_are_ignored() {
        let mut seq = Sequencer::new(&EngineConfig::default());
        assert!(!seq.advance_sample(f64::NAN));
        assert!(!seq.advance_sample(-1.0));
        assert_eq!(seq.phase(), 0.0);
        // a huge step still leaves the phase in range
        seq.advance_sample(1_000.5);
        assert!((0.0..1.0).contains(&seq.phase()));
    }

    fn frame_strategy() -> impl Strategy<Value = ControlFrame> {
        (0.0f32..=1.0, 0.0f32..=1.0, -20i32..20, any::<bool>(), any::<bool>()).prop_map(
            |(tempo_knob, pitch_knob, encoder_delta, mode_toggle, activate)| ControlFrame {
                tempo_knob,
                pitch_knob,
                encoder_delta,
                mode_toggle,
                activate,
            },
        )
    }

    proptest! {
        #[test]
        fn state_stays_in_range(
            blocks in prop::collection::vec((frame_strategy(), 0usize..2_000), 1..40)
        ) {
            let mut seq = Sequencer::new(&EngineConfig::default());
            for (frame, samples) in blocks {
                seq.apply_controls(&frame);
                for _ in 0..samples {
                    seq.advance_sample(1.0 / RATE);
                    prop_assert!((0.0..1.0).contains(&seq.phase()));
                    prop_assert!(seq.current_step() < NUM_STEPS);
                    prop_assert_eq!(seq.gate(), seq.phase() < GATE_DUTY && seq.gate_latched());
                }
                prop_assert!(seq.edit_cursor() < NUM_STEPS);
                prop_assert!(seq.steps().iter().all(|s| s.frequency > 0.0));
            }
        }

        #[test]
        fn mode_toggle_touches_nothing_else(
            setup in prop::collection::vec(frame_strategy(), 0..20),
            samples in 0usize..50_000,
        ) {
            let mut seq = Sequencer::new(&EngineConfig::default());
            for frame in &setup {
                seq.apply_controls(frame);
            }
            for _ in 0..samples {
                seq.advance_sample(1.0 / RATE);
            }
            let before = seq.clone();
            seq.toggle_mode();
            prop_assert_eq!(seq.mode(), before.mode().toggled());
            prop_assert_eq!(seq.steps(), before.steps());
            prop_assert_eq!(seq.phase(), before.phase());
            prop_assert_eq!(seq.current_step(), before.current_step());
            prop_assert_eq!(seq.edit_cursor(), before.edit_cursor());
            prop_assert_eq!(seq.tempo_bpm(), before.tempo_bpm());
        }

        #[test]
        fn activation_touches_only_the_cursor_step(
            moves in prop::collection::vec(-9i32..9, 1..20),
            pitch_knob in 0.0f32..=1.0,
        ) {
            let mut seq = Sequencer::new(&EngineConfig::default());
            for delta in moves {
                seq.apply_controls(&ControlFrame { encoder_delta: delta, pitch_knob, ..ControlFrame::default() });
                let before = *seq.steps();
                let cursor = seq.edit_cursor();
                seq.apply_controls(&ControlFrame { activate: true, pitch_knob, ..ControlFrame::default() });
                for (i, (a, b)) in before.iter().zip(seq.steps()).enumerate() {
                    if i == cursor {
                        prop_assert_eq!(a.active, !b.active);
                    } else {
                        prop_assert_eq!(a, b);
                    }
                }
            }
        }
    }
}
