//! Command-line configuration

use clap::Parser;

use crate::{
    commands::Command,
    config::{backend::BackendConfig, logging::LoggingConfig, store::StoreConfig},
};

pub(crate) mod backend;
pub(crate) mod logging;
pub(crate) mod store;

/// Cafe storefront
#[derive(Debug, Parser)]
#[command(name = "cafe", about = "Cafe storefront and back-office", long_about = None)]
pub(crate) struct CliConfig {
    /// Backend selection and connection settings.
    #[command(flatten)]
    pub backend: BackendConfig,

    /// Shop settings.
    #[command(flatten)]
    pub store: StoreConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::config::{backend::BackendKind, logging::LogFormat};

    use super::*;

    #[test]
    fn defaults_to_memory_backend_and_compact_logs() -> TestResult {
        let config = CliConfig::try_parse_from(["cafe", "catalog"])?;

        assert_eq!(config.backend.backend, BackendKind::Memory);
        assert!(matches!(config.logging.log_format, LogFormat::Compact));
        assert_eq!(config.store.transfer_alias, "rm.lecafe.vcp");

        Ok(())
    }

    #[test]
    fn splits_admin_emails_on_commas() -> TestResult {
        let config = CliConfig::try_parse_from([
            "cafe",
            "--admin-emails",
            "ops@cafe.test,owner@cafe.test",
            "catalog",
        ])?;

        assert_eq!(config.store.admin_emails, ["ops@cafe.test", "owner@cafe.test"]);

        Ok(())
    }

    #[test]
    fn parses_order_with_repeated_products() -> TestResult {
        let config = CliConfig::try_parse_from([
            "cafe", "order", "--add", "a", "--add", "b", "--add", "a", "--paid",
        ])?;

        let Command::Order(args) = config.command else {
            return Err("expected order command".into());
        };

        assert_eq!(args.add, ["a", "b", "a"]);
        assert!(args.paid);

        Ok(())
    }
}
