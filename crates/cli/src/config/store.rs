//! Store Config

use clap::Args;

use cafe::checkout::DEFAULT_TRANSFER_ALIAS;
use cafe_app::checkout::DEFAULT_TIME_ZONE;

/// Shop settings.
#[derive(Debug, Args)]
pub(crate) struct StoreConfig {
    /// Bank transfer alias shown at checkout
    #[arg(long, env = "TRANSFER_ALIAS", default_value = DEFAULT_TRANSFER_ALIAS)]
    pub transfer_alias: String,

    /// IANA time zone used to date sales
    #[arg(long, env = "STORE_TIME_ZONE", default_value = DEFAULT_TIME_ZONE)]
    pub time_zone: String,

    /// Comma-separated back-office admins; the built-in list when unset
    #[arg(long, env = "CAFE_ADMIN_EMAILS", value_delimiter = ',')]
    pub admin_emails: Vec<String>,
}
