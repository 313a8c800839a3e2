//! Identity boundary of the employment form.
//!
//! - [`IdentityProvider`]: the "sign in" capability. Produces an [`Identity`]
//!   (at least an email address) or an [`AuthError`] whose message is shown
//!   to the applicant.
//! - [`SessionStore`]: the single local flag that remembers the signed-in
//!   email across restarts and is cleared on sign-out.

mod errors;
mod identity;
mod password_flow;
mod session;

pub use errors::{AuthError, SessionError};
pub use identity::{Identity, IdentityProvider, StaticIdentityProvider};
pub use password_flow::{PasswordFlowConfig, PasswordFlowProvider};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
