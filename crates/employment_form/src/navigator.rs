//! Linear section navigation with validation gating.

use tracing::debug;

use crate::effects::Effect;
use crate::state::FormState;
use crate::validate::validate_section;

/// `(index + 1) / total` as a percentage.
pub fn progress_percent(index: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (index + 1) as f32 / total as f32 * 100.0
}

/// Activate `index` and report section plus progress.
pub fn show_section(state: &mut FormState, index: usize, effects: &mut Vec<Effect>) {
    let total = state.section_count();
    let index = index.min(total.saturating_sub(1));
    state.activate(index);
    effects.push(Effect::ShowSection { index, total });
    effects.push(Effect::Progress {
        percent: progress_percent(index, total),
    });
}

/// Validate the current section and advance if it passes and is not the last one.
pub fn next(state: &mut FormState) -> Vec<Effect> {
    let mut effects = Vec::new();
    let current = state.current_index();
    if validate_section(state, current, &mut effects).is_err() {
        return effects;
    }
    if current + 1 < state.section_count() {
        show_section(state, current + 1, &mut effects);
        debug!(from = current, to = current + 1, "advanced");
    }
    effects
}

/// Step back without validation.
pub fn prev(state: &mut FormState) -> Vec<Effect> {
    let mut effects = Vec::new();
    let current = state.current_index();
    if current > 0 {
        show_section(state, current - 1, &mut effects);
        debug!(from = current, to = current - 1, "went back");
    }
    effects
}
