//! Password sign-in against a self-service login API.
//!
//! Two requests:
//! 1. `GET  {base}/self-service/login/api` -> `{ "id": "<flow id>" }`
//! 2. `POST {base}/self-service/login?flow=<id>` with
//!    `{ "method": "password", "identifier": ..., "password": ... }`
//!    -> `{ "session": { "identity": { "id", "traits": { "email", "name" } } } }`
//!
//! A non-2xx answer to step 2 carries the reason in `ui.messages[].text`.

use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::{AuthError, Identity, IdentityProvider};

#[derive(Debug, Clone)]
pub struct PasswordFlowConfig {
    pub base_url: String,
    pub identifier: String,
    pub password: String,
    /// Debug convenience for self-signed development certificates.
    pub accept_invalid_certs: bool,
}

#[derive(Debug, Deserialize)]
struct LoginFlowResponse {
    id: String,
}

#[derive(Debug)]
pub struct PasswordFlowProvider {
    client: Client,
    base_url: String,
    identifier: String,
    password: String,
}

impl PasswordFlowProvider {
    pub fn new(config: PasswordFlowConfig) -> Result<Self, AuthError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            identifier: config.identifier,
            password: config.password,
        })
    }

    async fn open_flow(&self) -> Result<String, AuthError> {
        let url = format!("{}/self-service/login/api", self.base_url);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AuthError::Status {
                status: response.status().as_u16(),
            });
        }
        let flow: LoginFlowResponse = response.json().await?;
        debug!(flow = %flow.id, "login flow opened");
        Ok(flow.id)
    }
}

impl IdentityProvider for PasswordFlowProvider {
    async fn sign_in(&self) -> Result<Identity, AuthError> {
        let flow_id = self.open_flow().await?;

        let payload = json!({
            "method": "password",
            "identifier": self.identifier,
            "password": self.password,
        });

        let response = self
            .client
            .post(format!("{}/self-service/login", self.base_url))
            .query(&[("flow", flow_id.as_str())])
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            warn!(status = status.as_u16(), "password sign-in rejected");
            return Err(match first_ui_message(&body) {
                Some(message) => AuthError::Rejected(message),
                None => AuthError::Status {
                    status: status.as_u16(),
                },
            });
        }

        identity_from_session(&body)
    }
}

fn first_ui_message(body: &Value) -> Option<String> {
    body["ui"]["messages"]
        .as_array()?
        .iter()
        .find_map(|m| m["text"].as_str())
        .map(str::to_string)
}

fn identity_from_session(body: &Value) -> Result<Identity, AuthError> {
    let identity = &body["session"]["identity"];
    let email = identity["traits"]["email"]
        .as_str()
        .ok_or(AuthError::MissingField("session.identity.traits.email"))?;

    Ok(Identity {
        email: email.to_string(),
        user_id: identity["id"].as_str().map(str::to_string),
        display_name: identity["traits"]["name"].as_str().map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_read_from_session_traits() {
        let body = json!({
            "session": {
                "identity": {
                    "id": "8f1c",
                    "traits": { "email": "nur@example.com", "name": "Nur Aisyah" }
                }
            }
        });
        let identity = identity_from_session(&body).unwrap();
        assert_eq!(identity.email, "nur@example.com");
        assert_eq!(identity.user_id.as_deref(), Some("8f1c"));
        assert_eq!(identity.display_name.as_deref(), Some("Nur Aisyah"));
    }

    #[test]
    fn missing_email_is_an_error() {
        let body = json!({ "session": { "identity": { "traits": {} } } });
        assert!(matches!(
            identity_from_session(&body),
            Err(AuthError::MissingField(_))
        ));
    }
}
