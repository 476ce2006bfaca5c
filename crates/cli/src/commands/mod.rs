//! Sub-commands

use std::io;

use clap::Subcommand;
use jiff::tz::TimeZone;
use tracing::info;

use cafe::{
    admin::AdminAllowList,
    checkout::PaymentInstructions,
    documents::{Document, encode_new_product},
};
use cafe_app::{
    backend::memory::MemoryBackend, checkout::store_time_zone, context::AppContext, errors::AppError,
    feeds::Feed,
};

use crate::{
    config::{CliConfig, backend::BackendKind},
    errors::CliError,
    fixtures::CatalogFixture,
};

pub(crate) mod admin;
pub(crate) mod catalog;
pub(crate) mod order;
pub(crate) mod sales;
pub(crate) mod seed;
pub(crate) mod watch;


#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List the products on sale
    Catalog,

    /// Fill a cart, show payment instructions and record the sale
    Order(order::OrderArgs),

    /// List recorded sales, newest first
    Sales(sales::SalesArgs),

    /// Manage the catalog (admins only)
    Admin(admin::AdminArgs),

    /// Import a YAML catalog
    Seed(seed::SeedArgs),

    /// Print every live update of a collection until interrupted
    Watch(watch::WatchArgs),
}

/// Everything a command needs to talk to the shop.
#[derive(Debug)]
pub(crate) struct Shop {
    pub app: AppContext,
    pub backend: BackendKind,
    pub time_zone: TimeZone,
    pub instructions: PaymentInstructions,
    pub allow_list: AdminAllowList,
}

impl Shop {
    /// Connect to the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error when Firestore settings are missing or the start-up
    /// fixture cannot be loaded.
    pub(crate) async fn connect(config: &CliConfig) -> Result<Self, CliError> {
        let memory = MemoryBackend::new();
        let app = match config.backend.backend {
            BackendKind::Memory => AppContext::in_memory(&memory),
            BackendKind::Firestore => {
                let (firestore, auth) = config.backend.firestore()?;

                AppContext::firestore(firestore, auth)
            }
        };

        let shop = Self {
            app,
            backend: config.backend.backend,
            time_zone: store_time_zone(&config.store.time_zone),
            instructions: PaymentInstructions {
                alias: config.store.transfer_alias.clone(),
            },
            allow_list: AdminAllowList::or_default(&config.store.admin_emails),
        };

        if let (BackendKind::Memory, Some(path)) = (shop.backend, &config.backend.fixture) {
            let count = preload(&memory, CatalogFixture::from_file(path)?)?;

            info!(count, path = %path.display(), "loaded catalog fixture");
        }

        Ok(shop)
    }

    /// Shop over an existing in-memory backend.
    #[cfg(test)]
    pub(crate) fn in_memory(backend: &MemoryBackend) -> Self {
        Self {
            app: AppContext::in_memory(backend),
            backend: BackendKind::Memory,
            time_zone: TimeZone::fixed(jiff::tz::offset(-3)),
            instructions: PaymentInstructions::default(),
            allow_list: AdminAllowList::new(["admin@cafe.test"]),
        }
    }

    /// Create products straight through the inventory service.
    #[cfg(test)]
    pub(crate) async fn stock(
        &self,
        forms: &[cafe::validation::ProductForm],
    ) -> Result<(), cafe_app::errors::AppError> {
        let inventory = self.app.inventory();

        for form in forms {
            inventory.create(form).await?;
        }

        Ok(())
    }
}

/// Store fixture products under their catalog ids so they stay addressable
/// from one invocation to the next.
///
/// # Errors
///
/// Returns an error when a fixture product does not validate.
fn preload(memory: &MemoryBackend, fixture: CatalogFixture) -> Result<usize, CliError> {
    let products = memory.products();
    let entries = fixture.into_keyed_forms();

    for (id, form) in &entries {
        let product = form.validate_new().map_err(AppError::from)?;

        products.insert(Document::new(id.clone(), encode_new_product(&product)));
    }

    Ok(entries.len())
}

/// Take one snapshot of a feed and stop listening.
///
/// # Errors
///
/// Returns [`CliError::Feed`] when the collection could not be loaded.
pub(crate) async fn snapshot<T>(mut feed: Feed<T>) -> Result<Vec<T>, CliError>
where
    T: Clone + Send + Sync + 'static,
{
    let state = feed.wait_until_loaded().await?;

    feed.unsubscribe();

    match state.error() {
        Some(message) => Err(CliError::Feed(message.to_string())),
        None => Ok(state.items().to_vec()),
    }
}

/// Run a parsed command.
///
/// # Errors
///
/// Returns the first error raised by the command.
pub(crate) async fn run(
    command: Command,
    shop: &Shop,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    match command {
        Command::Catalog => catalog::run(shop, out).await,
        Command::Order(args) => order::run(args, shop, out).await,
        Command::Sales(args) => sales::run(args, shop, out).await,
        Command::Admin(args) => admin::run(args, shop, out).await,
        Command::Seed(args) => seed::run(args, shop, out).await,
        Command::Watch(args) => watch::run(args.target, shop, out).await,
    }
}
