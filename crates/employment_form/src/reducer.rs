//! Pure state-transition core: `reduce(&mut FormState, FormEvent) -> Vec<Effect>`.

use auth::Identity;
use tracing::{debug, info, warn};

use crate::effects::{Effect, TaskKind, TaskResultKind};
use crate::errors::FormError;
use crate::event::FormEvent;
use crate::executor::TaskId;
use crate::field::FieldRef;
use crate::group::{BlockId, GroupId};
use crate::guard::{fire, GuardTrigger};
use crate::navigator::{next, prev, show_section};
use crate::rules::{apply_rules, apply_rules_for, is_controller};
use crate::state::{FormState, Phase};
use crate::submit::{begin_submit, finish_submit};

/// Apply one event. Events the current phase does not accept are dropped.
pub fn reduce(state: &mut FormState, event: FormEvent) -> Vec<Effect> {
    debug!(event = %event, phase = %state.phase(), "reduce");

    if let Err(reason) = admit(state, &event) {
        debug!(event = %event, %reason, "event ignored");
        return Vec::new();
    }

    match event {
        FormEvent::Input { field, value } => edit(state, &field, value, GuardTrigger::Input),
        FormEvent::Paste { field, value } => edit(state, &field, value, GuardTrigger::Paste),
        FormEvent::Change { field, value } => edit(state, &field, value, GuardTrigger::Change),
        FormEvent::Blur { field } => blur(state, &field),
        FormEvent::AddBlock { group } => add_block(state, group),
        FormEvent::RemoveBlock { group, block } => remove_block(state, group, block),
        FormEvent::Next => next(state),
        FormEvent::Prev => prev(state),
        FormEvent::Submit => begin_submit(state),
        FormEvent::SignIn => vec![Effect::async_task(TaskKind::SignIn)],
        FormEvent::SignOut | FormEvent::AuthChanged { identity: None } => signed_out(state),
        FormEvent::AuthChanged {
            identity: Some(identity),
        } => signed_in(state, identity),
        FormEvent::TaskFinished { id, result } => task_finished(state, id, result),
    }
}

fn admit(state: &FormState, event: &FormEvent) -> Result<(), FormError> {
    match state.phase() {
        Phase::SignedOut if !event.passes_login_gate() => Err(FormError::NotSignedIn),
        Phase::Submitting if matches!(event, FormEvent::Submit) => {
            Err(FormError::SubmissionInFlight)
        }
        Phase::Confirmed
            if !matches!(event, FormEvent::SignOut | FormEvent::AuthChanged { .. }) =>
        {
            Err(FormError::AlreadySubmitted)
        }
        _ => Ok(()),
    }
}

fn edit(state: &mut FormState, at: &FieldRef, value: String, trigger: GuardTrigger) -> Vec<Effect> {
    let field = match state.field_at_mut(at) {
        Ok(field) => field,
        Err(err) => {
            warn!(%err, "edit dropped");
            return Vec::new();
        }
    };
    if !field.visible {
        debug!(field = %at, "edit of hidden field dropped");
        return Vec::new();
    }

    field.value = value;
    let mut effects = Vec::new();
    if fire(field, trigger) {
        effects.push(Effect::SetValue {
            field: at.clone(),
            value: field.value.clone(),
        });
    }
    effects.extend(after_mutation(state, at));
    effects
}

fn blur(state: &mut FormState, at: &FieldRef) -> Vec<Effect> {
    let field = match state.field_at_mut(at) {
        Ok(field) => field,
        Err(err) => {
            warn!(%err, "blur dropped");
            return Vec::new();
        }
    };
    if !fire(field, GuardTrigger::Blur) {
        return Vec::new();
    }
    let mut effects = vec![Effect::SetValue {
        field: at.clone(),
        value: field.value.clone(),
    }];
    effects.extend(after_mutation(state, at));
    effects
}

/// Re-run the rules a mutated top-level field controls.
fn after_mutation(state: &mut FormState, at: &FieldRef) -> Vec<Effect> {
    match at {
        FieldRef::Form(name) if is_controller(state.rules(), name) => apply_rules_for(state, name),
        _ => Vec::new(),
    }
}

fn add_block(state: &mut FormState, group: GroupId) -> Vec<Effect> {
    let group_state = match state.group_mut(group) {
        Ok(g) => g,
        Err(err) => {
            warn!(%err, "add block dropped");
            return Vec::new();
        }
    };
    let block = group_state.add_block();
    let present = group_state
        .block(block)
        .is_some_and(|b| b.has_remove_control());
    vec![
        Effect::BlockAdded { group, block },
        Effect::RemoveControl {
            group,
            block,
            present,
        },
    ]
}

fn remove_block(state: &mut FormState, group: GroupId, block: BlockId) -> Vec<Effect> {
    let group_state = match state.group_mut(group) {
        Ok(g) => g,
        Err(err) => {
            warn!(%err, "remove block dropped");
            return Vec::new();
        }
    };
    match group_state.remove_block(block) {
        Ok(()) => {
            let mut effects = vec![Effect::BlockRemoved { group, block }];
            if let Some(first) = group_state.blocks().first() {
                effects.push(Effect::RemoveControl {
                    group,
                    block: first.id(),
                    present: first.has_remove_control(),
                });
            }
            effects
        }
        Err(err @ FormError::MinimumBlocks { .. }) => vec![Effect::alert(err.to_string())],
        Err(err) => {
            warn!(%err, "remove block refused");
            Vec::new()
        }
    }
}

fn signed_in(state: &mut FormState, identity: Identity) -> Vec<Effect> {
    info!(email = %identity.email, "signed in");
    let email = identity.email.clone();
    state.set_identity(Some(identity));
    if state.phase() == Phase::SignedOut {
        state.set_phase(Phase::Editing);
    }

    let current = state.current_index();
    let mut effects = vec![Effect::LoginGate { visible: false }];
    show_section(state, current, &mut effects);
    effects.extend(apply_rules(state));
    effects.push(Effect::PersistIdentity(email));
    effects
}

fn signed_out(state: &mut FormState) -> Vec<Effect> {
    info!("signed out");
    state.set_identity(None);
    state.set_phase(Phase::SignedOut);
    vec![Effect::LoginGate { visible: true }, Effect::ClearIdentity]
}

fn task_finished(state: &mut FormState, id: TaskId, result: TaskResultKind) -> Vec<Effect> {
    debug!(task = id, "task finished");
    match result {
        TaskResultKind::SignedIn(identity) => signed_in(state, identity),
        TaskResultKind::SignInFailed(message) => {
            warn!(%message, "sign-in failed");
            vec![Effect::alert(format!("Login failed: {message}"))]
        }
        submission => finish_submit(state, submission),
    }
}
