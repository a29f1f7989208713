mod oscillator;
mod scale;
mod smoother;
mod tracker;

pub use oscillator::Oscillator;
pub use scale::{MAX_INTERVAL, Quantizer};
pub use smoother::Smoothing;
pub use tracker::{Crossing, PitchTracker};
