use thiserror::Error;

/// Failure of a sign-in attempt. `Display` is the text shown after "Login failed: ".
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Rejected(String),

    #[error("identity provider returned {status}")]
    Status { status: u16 },

    #[error("identity provider unreachable: {0}")]
    Http(#[from] reqwest::Error),

    #[error("identity response is missing `{0}`")]
    MissingField(&'static str),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("session lock poisoned")]
    Poisoned,
}
