//! Form loop.
//!
//! - drains the event channel
//! - reduces each event on this one task
//! - hands UI effects to the renderer, identity effects to the session store
//! - awaits async tasks inline and feeds their outcome back as events
//!
//! Awaiting tasks inline keeps every suspension point single-shot and makes
//! events queued behind a submission see its outcome first.

use std::collections::VecDeque;

use auth::{Identity, IdentityProvider, SessionError, SessionStore};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::effects::Effect;
use crate::event::FormEvent;
use crate::executor::TaskExecutor;
use crate::reducer::reduce;
use crate::render::Renderer;
use crate::state::{FormState, Phase};
use crate::transport::SubmissionTransport;

pub struct FormLoop<I, T, S, R> {
    state: FormState,
    executor: TaskExecutor<I, T>,
    session: S,
    renderer: R,
}

impl<I, T, S, R> FormLoop<I, T, S, R>
where
    I: IdentityProvider,
    T: SubmissionTransport,
    S: SessionStore,
    R: Renderer,
{
    pub fn new(state: FormState, executor: TaskExecutor<I, T>, session: S, renderer: R) -> Self {
        Self {
            state,
            executor,
            session,
            renderer,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Replay a stored email as an auth-state change. Returns whether one was found.
    pub async fn restore_session(&mut self) -> Result<bool, SessionError> {
        let Some(email) = self.session.load()? else {
            debug!("no stored session");
            return Ok(false);
        };
        info!(%email, "restoring stored session");
        self.dispatch(FormEvent::AuthChanged {
            identity: Some(Identity::from_email(email)),
        })
        .await;
        Ok(true)
    }

    /// Reduce `event` and everything it triggers.
    pub async fn dispatch(&mut self, event: FormEvent) {
        let mut pending = VecDeque::from([event]);
        while let Some(event) = pending.pop_front() {
            for effect in reduce(&mut self.state, event) {
                if let Some(follow_up) = self.handle(effect).await {
                    pending.push_back(follow_up);
                }
            }
        }
    }

    async fn handle(&mut self, effect: Effect) -> Option<FormEvent> {
        match effect {
            Effect::Async(kind) => Some(self.executor.run(kind).await),
            Effect::PersistIdentity(email) => {
                if let Err(err) = self.session.store(&email) {
                    warn!(%err, "failed to persist session");
                }
                None
            }
            Effect::ClearIdentity => {
                if let Err(err) = self.session.clear() {
                    warn!(%err, "failed to clear session");
                }
                None
            }
            ui => {
                self.renderer.apply(&ui);
                None
            }
        }
    }

    /// Run until the channel closes or the form is confirmed.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<FormEvent>) -> Self {
        info!(phase = %self.state.phase(), "form loop started");
        while let Some(event) = events.recv().await {
            self.dispatch(event).await;
            if self.state.phase() == Phase::Confirmed {
                info!("form confirmed; loop finished");
                break;
            }
        }
        debug!(phase = %self.state.phase(), "form loop stopped");
        self
    }
}
