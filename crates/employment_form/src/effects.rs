/*!
Effect & task model.

The reducer stays pure: it mutates `FormState` and returns `Vec<Effect>`.
The form loop interprets the effects:

- UI effects go to the `Renderer`
- `PersistIdentity` / `ClearIdentity` go to the `SessionStore`
- `Async(TaskKind)` goes to the `TaskExecutor`; its outcome re-enters the
  reducer as `FormEvent::TaskFinished`
*/

use auth::Identity;

use crate::field::FieldRef;
use crate::group::{BlockId, GroupId};
use crate::payload::SubmissionPayload;

/// Declarative instruction emitted by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Show or hide the login gate.
    LoginGate { visible: bool },
    /// Activate a section (all others inactive).
    ShowSection { index: usize, total: usize },
    /// Progress indicator width in percent.
    Progress { percent: f32 },
    SetVisible { field: FieldRef, visible: bool },
    SetRequired { field: FieldRef, required: bool },
    SetValue { field: FieldRef, value: String },
    FlagError { field: FieldRef, flagged: bool },
    Focus(FieldRef),
    /// User-visible message.
    Alert(String),
    BlockAdded { group: GroupId, block: BlockId },
    BlockRemoved { group: GroupId, block: BlockId },
    RemoveControl { group: GroupId, block: BlockId, present: bool },
    /// Remember the signed-in email across restarts.
    PersistIdentity(String),
    ClearIdentity,
    /// Terminal confirmation state reached.
    Confirmed,
    Async(TaskKind),
}

impl Effect {
    pub fn alert(msg: impl Into<String>) -> Self {
        Effect::Alert(msg.into())
    }

    pub fn async_task(kind: TaskKind) -> Self {
        Effect::Async(kind)
    }
}

/// Asynchronous work requested by the reducer. Each variant carries all of its input.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskKind {
    SignIn,
    Submit(Box<SubmissionPayload>),
}

impl TaskKind {
    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::SignIn => "sign_in",
            TaskKind::Submit(_) => "submit",
        }
    }
}

/// Outcome of a `TaskKind`, fed back into the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskResultKind {
    SignedIn(Identity),
    SignInFailed(String),
    Submitted,
    /// The endpoint answered with a non-success status.
    SubmitRejected { status: u16 },
    /// The request never produced a response.
    SubmitFailed(String),
}
