use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::AuthError;

/// The authenticated applicant as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Identity {
    pub fn from_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            user_id: None,
            display_name: None,
        }
    }
}

/// Sign-in capability. A single-shot completion: no timeout, no retry.
pub trait IdentityProvider: Send + Sync + 'static {
    fn sign_in(&self) -> impl Future<Output = Result<Identity, AuthError>> + Send;
}

/// Provider with a fixed outcome; used by the CLI (`--email`) and in tests.
#[derive(Debug, Clone)]
pub struct StaticIdentityProvider {
    outcome: Result<Identity, String>,
}

impl StaticIdentityProvider {
    pub fn signed_in(email: impl Into<String>) -> Self {
        Self {
            outcome: Ok(Identity::from_email(email)),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
        }
    }
}

impl IdentityProvider for StaticIdentityProvider {
    async fn sign_in(&self) -> Result<Identity, AuthError> {
        self.outcome.clone().map_err(AuthError::Rejected)
    }
}
