//! `cafe catalog`

use std::io;

use cafe::products::storefront;

use crate::{
    commands::{Shop, snapshot},
    errors::CliError,
    render,
};

pub(crate) async fn run(shop: &Shop, out: &mut impl io::Write) -> Result<(), CliError> {
    let products = snapshot(shop.app.catalog_feed()).await?;
    let visible: Vec<_> = storefront(&products).collect();

    render::write_catalog(out, &visible)?;

    Ok(())
}
