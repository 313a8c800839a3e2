//! Final submission: re-evaluate rules, validate every section, hand the payload off.

use tracing::{info, warn};

use crate::effects::{Effect, TaskKind, TaskResultKind};
use crate::navigator::show_section;
use crate::payload::SubmissionPayload;
use crate::rules::apply_rules;
use crate::state::{FormState, Phase};
use crate::validate::validate_section;

pub const SUBMIT_REJECTED: &str = "Submission failed. Please try again.";

pub fn begin_submit(state: &mut FormState) -> Vec<Effect> {
    let mut effects = apply_rules(state);

    for index in 0..state.section_count() {
        let mut failure_effects = Vec::new();
        if let Err(failure) = validate_section(state, index, &mut failure_effects) {
            info!(%failure, "submission blocked by validation");
            show_section(state, index, &mut effects);
            effects.extend(failure_effects);
            return effects;
        }
        effects.extend(failure_effects);
    }

    let payload = SubmissionPayload::assemble(state);
    state.set_phase(Phase::Submitting);
    effects.push(Effect::async_task(TaskKind::Submit(Box::new(payload))));
    effects
}

/// Apply the outcome of the workflow POST.
pub fn finish_submit(state: &mut FormState, result: TaskResultKind) -> Vec<Effect> {
    match result {
        TaskResultKind::Submitted => {
            state.set_phase(Phase::Confirmed);
            vec![Effect::Confirmed]
        }
        TaskResultKind::SubmitRejected { status } => {
            warn!(status, "submission rejected");
            state.set_phase(Phase::Editing);
            vec![Effect::alert(SUBMIT_REJECTED)]
        }
        TaskResultKind::SubmitFailed(message) => {
            warn!(%message, "submission transport failure");
            state.set_phase(Phase::Editing);
            vec![Effect::alert(format!("Submission error: {message}"))]
        }
        other => {
            warn!(?other, "unexpected task result for submission");
            Vec::new()
        }
    }
}
