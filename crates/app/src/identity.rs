//! Identity providers.

use std::{
    fmt,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};
use zeroize::Zeroizing;

use cafe::admin::Identity;

/// Default Firebase Auth REST endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Errors returned by identity providers.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Wrong email or password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned a non-2xx response or unexpected body.
    #[error("unexpected response from identity provider: {0}")]
    UnexpectedResponse(String),
}

/// Bearer token shared between the identity provider and backend clients.
#[derive(Clone, Default)]
pub struct AuthToken {
    inner: Arc<RwLock<Option<Zeroizing<String>>>>,
}

impl AuthToken {
    /// Current token, if signed in.
    #[must_use]
    pub fn get(&self) -> Option<Zeroizing<String>> {
        self.inner.read().ok().and_then(|token| token.clone())
    }

    fn set(&self, token: Option<Zeroizing<String>>) {
        if let Ok(mut current) = self.inner.write() {
            *current = token;
        }
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("set", &self.get().is_some())
            .finish()
    }
}

/// Signs users in and reports who is signed in.
#[automock]
#[async_trait]
pub trait IdentityProvider: fmt::Debug + Send + Sync {
    /// The signed-in identity, if any.
    async fn current(&self) -> Option<Identity>;

    /// Sign in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;

    /// Forget the signed-in identity.
    async fn sign_out(&self);
}

/// Firebase Auth configuration.
#[derive(Debug, Clone)]
pub struct FirebaseAuthConfig {
    /// REST endpoint, normally [`DEFAULT_AUTH_URL`].
    pub base_url: String,

    /// Web API key of the Firebase project.
    pub api_key: String,
}

/// Email/password sign-in against Firebase Auth.
#[derive(Debug, Clone)]
pub struct FirebaseAuth {
    config: FirebaseAuthConfig,
    http: Client,
    token: AuthToken,
    current: Arc<RwLock<Option<Identity>>>,
}

impl FirebaseAuth {
    /// Create a provider that stores the session token in `token`.
    #[must_use]
    pub fn new(config: FirebaseAuthConfig, token: AuthToken) -> Self {
        Self {
            config,
            http: Client::new(),
            token,
            current: Arc::default(),
        }
    }

    fn set_current(&self, identity: Option<Identity>) {
        if let Ok(mut current) = self.current.write() {
            *current = identity;
        }
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuth {
    async fn current(&self) -> Option<Identity> {
        self.current.read().ok().and_then(|current| current.clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let url = format!(
            "{}/accounts:signInWithPassword",
            self.config.base_url.trim_end_matches('/')
        );

        let body = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if response.status() == StatusCode::BAD_REQUEST {
            debug!("sign-in rejected");

            return Err(IdentityError::InvalidCredentials);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(IdentityError::UnexpectedResponse(format!(
                "sign-in request failed with status {status}: {text}"
            )));
        }

        let parsed: SignInResponse = response.json().await?;

        let identity = Identity {
            email: parsed.email.filter(|email| !email.is_empty()),
        };

        self.token.set(Some(Zeroizing::new(parsed.id_token)));
        self.set_current(Some(identity.clone()));

        info!(email = ?identity.email, "signed in");

        Ok(identity)
    }

    async fn sign_out(&self) {
        self.token.set(None);
        self.set_current(None);

        info!("signed out");
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    email: Option<String>,
}

/// Offline provider used with the in-memory backend.
///
/// Any email is accepted as long as the password is not blank.
#[derive(Debug, Clone, Default)]
pub struct FixedIdentity {
    current: Arc<RwLock<Option<Identity>>>,
}

impl FixedIdentity {
    /// Provider with nobody signed in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider already signed in as `identity`.
    #[must_use]
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            current: Arc::new(RwLock::new(Some(identity))),
        }
    }
}

#[async_trait]
impl IdentityProvider for FixedIdentity {
    async fn current(&self) -> Option<Identity> {
        self.current.read().ok().and_then(|current| current.clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        if email.trim().is_empty() || password.trim().is_empty() {
            return Err(IdentityError::InvalidCredentials);
        }

        let identity = Identity::with_email(email.trim());

        if let Ok(mut current) = self.current.write() {
            *current = Some(identity.clone());
        }

        Ok(identity)
    }

    async fn sign_out(&self) {
        if let Ok(mut current) = self.current.write() {
            *current = None;
        }
    }
}
