//! `cafe order`

use std::io;

use clap::Args;

use cafe::{cart::Cart, checkout::CheckoutFlow, products::ProductId, views::CartPanel};
use cafe_app::errors::AppError;

use crate::{
    commands::{Shop, snapshot},
    errors::CliError,
    render,
};

#[derive(Debug, Args)]
pub(crate) struct OrderArgs {
    /// Product to add; repeat to add more units
    #[arg(long, value_name = "PRODUCT_ID", required = true)]
    pub add: Vec<String>,

    /// Product to take one unit of back out
    #[arg(long, value_name = "PRODUCT_ID")]
    pub remove: Vec<String>,

    /// The transfer is done: record the sale
    #[arg(long)]
    pub paid: bool,
}

pub(crate) async fn run(
    args: OrderArgs,
    shop: &Shop,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    let products = snapshot(shop.app.catalog_feed()).await?;

    let mut cart = Cart::new();

    for id in args.add {
        let product = products
            .iter()
            .find(|product| product.id.as_str() == id)
            .ok_or(CliError::UnknownProduct(id))?;

        if !product.in_stock {
            return Err(CliError::OutOfStock(product.name.clone()));
        }

        cart.add_item(product);
    }

    for id in args.remove {
        cart.remove_item(&ProductId::from(id));
    }

    let mut flow = CheckoutFlow::new();

    flow.open_cart().map_err(AppError::from)?;

    let panel = CartPanel::from(&cart);

    render::write_cart(out, &panel)?;

    flow.request_payment(&cart).map_err(AppError::from)?;

    render::write_payment_instructions(out, &panel, &shop.instructions)?;

    if !args.paid {
        writeln!(out, "Run again with --paid once the transfer is done.")?;

        return Ok(());
    }

    let checkout = shop.app.checkout(shop.time_zone.clone(), shop.instructions.clone());
    let sale = checkout.confirm_payment(&mut flow, &mut cart).await?;

    writeln!(out, "Payment recorded, thank you! (sale {sale})")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use cafe::{checkout::CheckoutError, sales::sales_listing};
    use cafe_app::backend::memory::MemoryBackend;

    use crate::commands::test_support::form;

    use super::*;

    async fn stocked_shop(backend: &MemoryBackend) -> Result<(Shop, ProductId), CliError> {
        let shop = Shop::in_memory(backend);

        shop.stock(&[form("Cortado", "2.50")]).await?;

        let id = snapshot(shop.app.catalog_feed())
            .await?
            .first()
            .map(|product| product.id.clone())
            .ok_or_else(|| CliError::UnknownProduct("Cortado".to_string()))?;

        Ok((shop, id))
    }

    fn args(ids: &[&ProductId], paid: bool) -> OrderArgs {
        OrderArgs {
            add: ids.iter().map(ToString::to_string).collect(),
            remove: Vec::new(),
            paid,
        }
    }

    #[tokio::test]
    async fn unpaid_order_shows_instructions_without_recording() -> TestResult {
        let backend = MemoryBackend::new();
        let (shop, id) = stocked_shop(&backend).await?;

        let mut out = Vec::new();

        run(args(&[&id, &id], false), &shop, &mut out).await?;

        let text = String::from_utf8(out)?;

        assert!(text.contains("$5.00"));
        assert!(text.contains("rm.lecafe.vcp"));
        assert!(backend.sales().documents().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn paid_order_records_one_sale() -> TestResult {
        let backend = MemoryBackend::new();
        let (shop, id) = stocked_shop(&backend).await?;

        let mut out = Vec::new();

        run(args(&[&id], true), &shop, &mut out).await?;

        let sales = snapshot(shop.app.sales_feed()).await?;
        let listing = sales_listing(&sales);

        assert_eq!(listing.len(), 1);
        assert!(String::from_utf8(out)?.contains("Payment recorded"));

        Ok(())
    }

    #[tokio::test]
    async fn removing_everything_cannot_check_out() -> TestResult {
        let backend = MemoryBackend::new();
        let (shop, id) = stocked_shop(&backend).await?;

        let mut order = args(&[&id], true);
        order.remove = vec![id.to_string()];

        let result = run(order, &shop, &mut Vec::new()).await;

        assert!(matches!(
            result,
            Err(CliError::App(AppError::Checkout(CheckoutError::EmptyCart)))
        ));
        assert!(backend.sales().documents().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn unknown_product_is_reported() -> TestResult {
        let backend = MemoryBackend::new();
        let (shop, _) = stocked_shop(&backend).await?;

        let result = run(
            OrderArgs {
                add: vec!["missing".to_string()],
                remove: Vec::new(),
                paid: false,
            },
            &shop,
            &mut Vec::new(),
        )
        .await;

        assert!(matches!(result, Err(CliError::UnknownProduct(id)) if id == "missing"));

        Ok(())
    }
}
