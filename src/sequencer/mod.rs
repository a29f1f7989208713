mod controls;
mod state;

pub use controls::{ControlAccumulator, ControlFrame};
pub use state::{Mode, Sequencer, StepSlot};
