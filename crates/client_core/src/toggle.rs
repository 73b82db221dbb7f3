use std::sync::{Mutex, MutexGuard, PoisonError};

pub const STOP_DETECTION_LABEL: &str = "Stop Detection";
pub const START_DETECTION_LABEL: &str = "Start Detection";

pub fn button_label(running: bool) -> &'static str {
    if running {
        STOP_DETECTION_LABEL
    } else {
        START_DETECTION_LABEL
    }
}

/// Client-held belief about whether detection is running. Flipped before the
/// server has confirmed anything.
///
/// Every change bumps a generation so a late failure can tell whether the
/// value it sent is still the latest one.
#[derive(Debug)]
pub struct DetectionToggle {
    state: Mutex<ToggleState>,
    initial: bool,
}

#[derive(Debug, Clone, Copy)]
struct ToggleState {
    running: bool,
    generation: u64,
}

impl DetectionToggle {
    pub fn new(initial: bool) -> Self {
        Self {
            state: Mutex::new(ToggleState {
                running: initial,
                generation: 0,
            }),
            initial,
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Returns the new value and the generation it was written at.
    pub fn flip(&self) -> (bool, u64) {
        let mut state = self.lock();
        state.running = !state.running;
        state.generation += 1;
        (state.running, state.generation)
    }

    pub fn set(&self, running: bool) {
        let mut state = self.lock();
        state.running = running;
        state.generation += 1;
    }

    /// Undoes the flip made at `generation`, but only if nothing has changed
    /// the cell since. Returns the restored value.
    pub fn revert_if_current(&self, generation: u64) -> Option<bool> {
        let mut state = self.lock();
        if state.generation != generation {
            return None;
        }
        state.running = !state.running;
        state.generation += 1;
        Some(state.running)
    }

    pub fn reset(&self) {
        self.set(self.initial);
    }

    fn lock(&self) -> MutexGuard<'_, ToggleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DetectionToggle {
    fn default() -> Self {
        Self::new(true)
    }
}
