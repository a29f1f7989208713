// Diatonic just-intonation ratios, root through major seventh.
// Knob-selected intervals index straight into this table; negative intervals
// invert the ratio and drop an octave so they land below the root.
pub const DIATONIC_RATIOS: [f32; 7] = [
    1.0,        // root
    9.0 / 8.0,  // major second
    5.0 / 4.0,  // major third
    4.0 / 3.0,  // perfect fourth
    3.0 / 2.0,  // perfect fifth
    5.0 / 3.0,  // major sixth
    15.0 / 8.0, // major seventh
];

// largest |interval| the table can answer
pub const MAX_INTERVAL: i32 = (DIATONIC_RATIOS.len() - 1) as i32;

// signed interval -> frequency around base
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quantizer {
    base: f32,
    max_interval: i32,
}

impl Quantizer {
    pub fn new(base: f32, max_interval: i32) -> Self {
        Self {
            base,
            max_interval: max_interval.clamp(0, MAX_INTERVAL),
        }
    }

    pub fn base(&self) -> f32 {
        self.base
    }

    pub fn clamp_interval(&self, interval: i32) -> i32 {
        interval.clamp(-self.max_interval, self.max_interval)
    }

    // pure and total: out of range intervals are clamped before lookup
    pub fn frequency_for_interval(&self, interval: i32) -> f32 {
        let interval = self.clamp_interval(interval);
        if interval == 0 {
            return self.base;
        }
        let ratio = DIATONIC_RATIOS[interval.unsigned_abs() as usize];
        if interval > 0 {
            self.base * ratio
        } else {
            self.base * (1.0 / ratio) / 2.0 // octave below the root
        }
    }

    // knob in [0, 1] -> nearest interval in [-max, +max], centre is the root
    pub fn interval_for_knob(&self, knob: f32) -> i32 {
        let knob = if knob.is_finite() { knob.clamp(0.0, 1.0) } else { 0.5 };
        let span = (2 * self.max_interval) as f32;
        self.clamp_interval(((knob - 0.5) * span).round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q() -> Quantizer {
        Quantizer::new(440.0, MAX_INTERVAL)
    }

    #[test]
    fn root_is_exact() {
        assert_eq!(q().frequency_for_interval(0), 440.0);
    }

    #[test]
    fn positive_intervals_climb_the_scale() {
        let q = q();
        assert_eq!(q.frequency_for_interval(2), 440.0 * (5.0 / 4.0));
        assert_eq!(q.frequency_for_interval(4), 440.0 * (3.0 / 2.0));
        assert_eq!(q.frequency_for_interval(6), 440.0 * (15.0 / 8.0));
    }

    #[test]
    fn negative_intervals_drop_an_octave() {
        let q = q();
        assert_eq!(q.frequency_for_interval(-2), 440.0 * (1.0 / (5.0 / 4.0)) / 2.0);
        // -4 is a fourth below the root, not a fifth below
        let f = q.frequency_for_interval(-4);
        assert!((f - 440.0 / 3.0).abs() < 1e-3, "{f}");
        for k in 1..=MAX_INTERVAL {
            assert!(q.frequency_for_interval(-k) < 440.0);
        }
    }

    #[test]
    fn out_of_range_is_clamped() {
        let q = q();
        assert_eq!(q.frequency_for_interval(40), q.frequency_for_interval(MAX_INTERVAL));
        assert_eq!(q.frequency_for_interval(-40), q.frequency_for_interval(-MAX_INTERVAL));
        let narrow = Quantizer::new(440.0, 2);
        assert_eq!(narrow.frequency_for_interval(5), 440.0 * 1.25);
    }

    #[test]
    fn knob_maps_to_nearest_interval() {
        let q = q();
        assert_eq!(q.interval_for_knob(0.0), -MAX_INTERVAL);
        assert_eq!(q.interval_for_knob(0.5), 0);
        assert_eq!(q.interval_for_knob(1.0), MAX_INTERVAL);
        assert_eq!(q.interval_for_knob(0.5 + 1.0 / 12.0), 1);
        assert_eq!(q.interval_for_knob(f32::NAN), 0);
        assert_eq!(q.interval_for_knob(7.0), MAX_INTERVAL);
    }

    #[test]
    fn every_frequency_is_positive() {
        let q = q();
        for k in -MAX_INTERVAL..=MAX_INTERVAL {
            assert!(q.frequency_for_interval(k) > 0.0);
        }
    }
}
