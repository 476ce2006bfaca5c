//! Application service errors.

use thiserror::Error;

use cafe::{checkout::CheckoutError, validation::ValidationError};

use crate::{backend::BackendError, identity::IdentityError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("subscription failed: {0}")]
    Subscription(String),

    #[error("write failed")]
    Write(#[source] BackendError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("sign-in failed")]
    SignIn(#[source] IdentityError),

    #[error("not signed in")]
    Unauthenticated,

    #[error("account is not authorized to manage inventory")]
    Forbidden,
}

impl From<BackendError> for AppError {
    fn from(error: BackendError) -> Self {
        Self::Write(error)
    }
}

impl From<IdentityError> for AppError {
    fn from(error: IdentityError) -> Self {
        Self::SignIn(error)
    }
}
