//! `cafe seed`

use std::{io, path::PathBuf};

use clap::Args;
use tracing::warn;

use cafe_app::errors::AppError;

use crate::{
    commands::{Shop, admin},
    config::backend::BackendKind,
    errors::CliError,
    fixtures::CatalogFixture,
};

#[derive(Debug, Args)]
pub(crate) struct SeedArgs {
    /// YAML catalog to import
    #[arg(long)]
    pub file: PathBuf,

    /// Admin account email, required on Firestore
    #[arg(long, env = "CAFE_ADMIN_EMAIL")]
    pub email: Option<String>,

    /// Admin account password, required on Firestore
    #[arg(long, env = "CAFE_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

pub(crate) async fn run(
    args: SeedArgs,
    shop: &Shop,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    let forms = CatalogFixture::from_file(&args.file)?.into_forms();

    let session = match (shop.backend, args.email, args.password) {
        (BackendKind::Memory, _, _) => None,
        (BackendKind::Firestore, Some(email), Some(password)) => {
            Some(admin::sign_in(shop, &email, password).await?)
        }
        (BackendKind::Firestore, _, _) => return Err(AppError::Unauthenticated.into()),
    };

    let inventory = shop.app.inventory();
    let mut created = 0_usize;
    let mut outcome = Ok(());

    for form in &forms {
        match inventory.create(form).await {
            Ok(id) => {
                created += 1;

                writeln!(out, "added {} ({id})", form.name)?;
            }
            Err(AppError::Validation(err)) => {
                warn!(name = %form.name, error = %err, "skipping fixture product");

                writeln!(out, "skipped {}: {err}", form.name)?;
            }
            Err(err) => {
                outcome = Err(err.into());

                break;
            }
        }
    }

    if let Some(session) = session {
        session.sign_out().await;
    }

    writeln!(out, "{created} of {} products imported", forms.len())?;

    outcome
}
