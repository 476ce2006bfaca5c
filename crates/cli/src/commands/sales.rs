//! `cafe sales`

use std::io;

use clap::Args;

use cafe::sales::{DailySummary, SaleDate, sales_listing};

use crate::{
    commands::{Shop, snapshot},
    errors::CliError,
    render,
};

#[derive(Debug, Args)]
pub(crate) struct SalesArgs {
    /// Only show sales of this day (d/m/yyyy) and summarise them
    #[arg(long)]
    pub date: Option<String>,
}

pub(crate) async fn run(
    args: SalesArgs,
    shop: &Shop,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    let records = snapshot(shop.app.sales_feed()).await?;
    let listing = sales_listing(&records);

    let Some(raw) = args.date else {
        render::write_sales(out, &listing)?;

        return Ok(());
    };

    let wanted = SaleDate::new(raw);
    let day = wanted.parse().ok_or_else(|| CliError::InvalidDate(wanted.clone()))?;

    let of_day: Vec<_> = listing
        .into_iter()
        .filter(|record| record.date.parse() == Some(day))
        .collect();

    render::write_sales(out, &of_day)?;
    render::write_summary(out, &DailySummary::for_date(&of_day, day))?;

    Ok(())
}
