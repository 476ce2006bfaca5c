//! CLI errors

use std::io;

use thiserror::Error;
use tracing_subscriber::util::TryInitError;

use cafe::sales::SaleDate;
use cafe_app::errors::AppError;

use crate::{fixtures::FixtureError, shutdown::ShutdownSignalError};

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error("failed to initialise logging: {0}")]
    Observability(#[from] TryInitError),

    #[error(transparent)]
    Shutdown(#[from] ShutdownSignalError),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("{0} must be set for the firestore backend")]
    MissingSetting(&'static str),

    #[error("{0}")]
    Feed(String),

    #[error("no product with id {0}")]
    UnknownProduct(String),

    #[error("{0} is out of stock")]
    OutOfStock(String),

    #[error("not a d/m/yyyy date: {0}")]
    InvalidDate(SaleDate),
}
