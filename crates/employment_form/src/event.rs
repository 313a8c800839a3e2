use auth::Identity;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::effects::TaskResultKind;
use crate::executor::TaskId;
use crate::field::FieldRef;
use crate::group::{BlockId, GroupId};

/// Everything that can happen to the form.
///
/// UI events deserialize from scripts, e.g.
/// `{ "type": "change", "field": "citizenship", "value": "Other" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Display)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormEvent {
    /// Keystroke-level edit; carries the full new value.
    Input { field: FieldRef, value: String },
    Paste { field: FieldRef, value: String },
    /// Committed edit (selects, dates, checkboxes).
    Change { field: FieldRef, value: String },
    Blur { field: FieldRef },
    AddBlock { group: GroupId },
    RemoveBlock { group: GroupId, block: BlockId },
    Next,
    Prev,
    Submit,
    SignIn,
    SignOut,
    /// Identity provider reported a new auth state.
    AuthChanged { identity: Option<Identity> },
    #[serde(skip)]
    TaskFinished { id: TaskId, result: TaskResultKind },
}

impl FormEvent {
    pub fn input(field: impl Into<String>, value: impl Into<String>) -> Self {
        FormEvent::Input {
            field: FieldRef::form(field),
            value: value.into(),
        }
    }

    pub fn change(field: impl Into<String>, value: impl Into<String>) -> Self {
        FormEvent::Change {
            field: FieldRef::form(field),
            value: value.into(),
        }
    }

    pub fn change_at(field: FieldRef, value: impl Into<String>) -> Self {
        FormEvent::Change {
            field,
            value: value.into(),
        }
    }

    pub fn blur(field: impl Into<String>) -> Self {
        FormEvent::Blur {
            field: FieldRef::form(field),
        }
    }

    /// Events still handled while the login gate is shown.
    pub fn passes_login_gate(&self) -> bool {
        matches!(
            self,
            FormEvent::SignIn
                | FormEvent::SignOut
                | FormEvent::AuthChanged { .. }
                | FormEvent::TaskFinished { .. }
        )
    }
}
