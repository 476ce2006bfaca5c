//! Backend Config

use std::{path::PathBuf, time::Duration};

use clap::Args;

use cafe_app::{
    backend::firestore::{DEFAULT_BASE_URL, FirestoreConfig},
    identity::{DEFAULT_AUTH_URL, FirebaseAuthConfig},
};

use crate::errors::CliError;

/// Where the catalog and sales live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum BackendKind {
    /// In-process collections, lost on exit.
    Memory,

    /// Firestore project, signing in through Firebase Auth.
    Firestore,
}

/// Backend settings.
#[derive(Debug, Args)]
pub(crate) struct BackendConfig {
    /// Backend to use (memory, firestore)
    #[arg(long, env = "CAFE_BACKEND", value_enum, default_value_t = BackendKind::Memory)]
    pub backend: BackendKind,

    /// Firestore project id
    #[arg(long, env = "FIRESTORE_PROJECT_ID")]
    pub firestore_project_id: Option<String>,

    /// Firebase web API key
    #[arg(long, env = "FIREBASE_API_KEY", hide_env_values = true)]
    pub firebase_api_key: Option<String>,

    /// Firestore REST endpoint
    #[arg(long, env = "FIRESTORE_URL", default_value = DEFAULT_BASE_URL)]
    pub firestore_url: String,

    /// Firebase Auth REST endpoint
    #[arg(long, env = "FIREBASE_AUTH_URL", default_value = DEFAULT_AUTH_URL)]
    pub firebase_auth_url: String,

    /// Seconds between Firestore polls while listening
    #[arg(long, env = "FIRESTORE_POLL_INTERVAL_SECONDS", default_value_t = 2u64)]
    pub poll_interval_seconds: u64,

    /// YAML catalog loaded into the memory backend on start
    #[arg(long, env = "CAFE_FIXTURE")]
    pub fixture: Option<PathBuf>,
}

impl BackendConfig {
    /// Firestore and Firebase Auth settings.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::MissingSetting`] when the project id or API key
    /// is not configured.
    pub(crate) fn firestore(&self) -> Result<(FirestoreConfig, FirebaseAuthConfig), CliError> {
        let project_id = self
            .firestore_project_id
            .clone()
            .ok_or(CliError::MissingSetting("FIRESTORE_PROJECT_ID"))?;

        let api_key = self
            .firebase_api_key
            .clone()
            .ok_or(CliError::MissingSetting("FIREBASE_API_KEY"))?;

        Ok((
            FirestoreConfig {
                base_url: self.firestore_url.clone(),
                project_id,
                api_key: Some(api_key.clone()),
                poll_interval: Duration::from_secs(self.poll_interval_seconds.max(1)),
            },
            FirebaseAuthConfig {
                base_url: self.firebase_auth_url.clone(),
                api_key,
            },
        ))
    }
}
