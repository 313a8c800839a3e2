//! Multi-step employment application form.
//!
//! Layers, leaf first:
//! - `guard`: numeric-only and safe-leading sanitizers
//! - `group`: repeatable blocks built from a block schema
//! - `rules`: conditional required/visible/cleared states
//! - `validate` / `navigator`: section validation and linear navigation
//! - `payload` / `submit`: payload assembly and final submission
//! - `reducer`: `reduce(&mut FormState, FormEvent) -> Vec<Effect>`
//! - `executor` / `transport` / `runtime`: the async shell around the reducer

pub mod config;
pub mod effects;
pub mod errors;
pub mod event;
pub mod executor;
pub mod field;
pub mod group;
pub mod guard;
pub mod navigator;
pub mod payload;
pub mod reducer;
pub mod render;
pub mod rules;
pub mod runtime;
pub mod schema;
pub mod state;
pub mod submit;
pub mod transport;
pub mod validate;

pub use effects::{Effect, TaskKind, TaskResultKind};
pub use errors::{FieldIssue, FormError, SubmitError, ValidationFailure};
pub use event::FormEvent;
pub use executor::TaskExecutor;
pub use field::{Field, FieldDef, FieldKind, FieldRef};
pub use group::{BlockId, GroupId, RepeatableGroup};
pub use payload::SubmissionPayload;
pub use reducer::reduce;
pub use render::{RecordingRenderer, Renderer, TracingRenderer};
pub use runtime::FormLoop;
pub use schema::{employment_application, FormSchema};
pub use state::{FormState, Phase};
pub use transport::{HttpTransport, SubmissionTransport};
