/*!
Task executor.

Runs the `TaskKind`s the reducer asks for against the identity provider and
the submission transport and turns each outcome into a
`FormEvent::TaskFinished`. Tasks are single-shot: no timeout, no retry.
*/

use std::sync::atomic::{AtomicU64, Ordering};

use auth::IdentityProvider;
use tracing::{info, warn};

use crate::effects::{TaskKind, TaskResultKind};
use crate::errors::SubmitError;
use crate::event::FormEvent;
use crate::transport::SubmissionTransport;

/// Monotonic task identifier type.
pub type TaskId = u64;

pub struct TaskExecutor<I, T> {
    identity: I,
    transport: T,
    next_id: AtomicU64,
}

impl<I, T> TaskExecutor<I, T>
where
    I: IdentityProvider,
    T: SubmissionTransport,
{
    pub fn new(identity: I, transport: T) -> Self {
        Self {
            identity,
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    fn alloc_id(&self) -> TaskId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Run one task to completion and wrap its outcome for the reducer.
    pub async fn run(&self, kind: TaskKind) -> FormEvent {
        let id = self.alloc_id();
        info!("[task:{id}] started ({})", kind.label());

        let result = match kind {
            TaskKind::SignIn => match self.identity.sign_in().await {
                Ok(identity) => {
                    info!("[task:{id}] signed in as {}", identity.email);
                    TaskResultKind::SignedIn(identity)
                }
                Err(err) => {
                    warn!("[task:{id}] sign-in failed: {err}");
                    TaskResultKind::SignInFailed(err.to_string())
                }
            },
            TaskKind::Submit(payload) => match self.transport.submit(&payload).await {
                Ok(()) => {
                    info!("[task:{id}] submission acknowledged");
                    TaskResultKind::Submitted
                }
                Err(SubmitError::Rejected { status }) => {
                    warn!("[task:{id}] submission rejected with status {status}");
                    TaskResultKind::SubmitRejected { status }
                }
                Err(err) => {
                    warn!("[task:{id}] submission failed: {err}");
                    TaskResultKind::SubmitFailed(err.to_string())
                }
            },
        };

        FormEvent::TaskFinished { id, result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::SubmissionPayload;
    use auth::{Identity, StaticIdentityProvider};
    use pretty_assertions::assert_eq;

    struct FixedStatus(u16);

    impl SubmissionTransport for FixedStatus {
        async fn submit(&self, _payload: &SubmissionPayload) -> Result<(), SubmitError> {
            match self.0 {
                200..=299 => Ok(()),
                status => Err(SubmitError::Rejected { status }),
            }
        }
    }

    #[tokio::test]
    async fn task_ids_are_monotonic() {
        let executor = TaskExecutor::new(StaticIdentityProvider::signed_in("a@example.com"), FixedStatus(200));
        let first = executor.run(TaskKind::SignIn).await;
        let second = executor.run(TaskKind::SignIn).await;
        assert_eq!(
            first,
            FormEvent::TaskFinished {
                id: 1,
                result: TaskResultKind::SignedIn(Identity::from_email("a@example.com")),
            }
        );
        assert!(matches!(second, FormEvent::TaskFinished { id: 2, .. }));
    }

    #[tokio::test]
    async fn outcomes_map_to_results() {
        let executor = TaskExecutor::new(StaticIdentityProvider::failing("popup closed"), FixedStatus(502));
        assert!(matches!(
            executor.run(TaskKind::SignIn).await,
            FormEvent::TaskFinished { result: TaskResultKind::SignInFailed(ref m), .. } if m == "popup closed"
        ));
        assert!(matches!(
            executor.run(TaskKind::Submit(Box::default())).await,
            FormEvent::TaskFinished { result: TaskResultKind::SubmitRejected { status: 502 }, .. }
        ));
    }
}
