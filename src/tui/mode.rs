use crate::sequencer::Mode;

// state local to the tui; mode is synced from DisplayState every frame
#[derive(Clone, Debug)]
pub struct TuiState {
    pub mode: Mode,
    pub show_help: bool,
}

impl Default for TuiState {
    fn default() -> Self {
        Self {
            mode: Mode::Edit,
            show_help: true,
        }
    }
}
