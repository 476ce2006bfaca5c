//! `cafe watch`

use std::io;

use clap::{Args, ValueEnum};
use tracing::info;

use cafe::{
    feed::FeedState,
    products::{Product, storefront},
    sales::{SaleRecord, sales_listing},
};
use cafe_app::feeds::Feed;

use crate::{commands::Shop, errors::CliError, render, shutdown};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum WatchTarget {
    /// The public catalog
    Products,

    /// The sales listing
    Sales,
}

#[derive(Debug, Args)]
pub(crate) struct WatchArgs {
    #[arg(value_enum)]
    pub target: WatchTarget,
}

pub(crate) async fn run(
    target: WatchTarget,
    shop: &Shop,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    match target {
        WatchTarget::Products => follow(shop.app.catalog_feed(), out, write_products).await,
        WatchTarget::Sales => follow(shop.app.sales_feed(), out, write_sales).await,
    }
}

fn write_products(out: &mut dyn io::Write, state: &FeedState<Product>) -> io::Result<()> {
    let visible: Vec<_> = storefront(state.items()).collect();

    render::write_catalog(out, &visible)
}

fn write_sales(out: &mut dyn io::Write, state: &FeedState<SaleRecord>) -> io::Result<()> {
    render::write_sales(out, &sales_listing(state.items()))
}

async fn follow<T>(
    mut feed: Feed<T>,
    out: &mut impl io::Write,
    write: fn(&mut dyn io::Write, &FeedState<T>) -> io::Result<()>,
) -> Result<(), CliError>
where
    T: Clone + Send + Sync + 'static,
{
    let mut state = feed.wait_until_loaded().await?;

    let shutdown = shutdown::wait();
    tokio::pin!(shutdown);

    loop {
        match state.error() {
            Some(message) => writeln!(out, "error: {message}")?,
            None => write(out, &state)?,
        }

        out.flush()?;

        tokio::select! {
            result = &mut shutdown => {
                result?;

                break;
            }
            changed = feed.changed() => state = changed?,
        }
    }

    feed.unsubscribe();

    info!("stopped watching");

    Ok(())
}
