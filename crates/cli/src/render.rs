//! Terminal rendering of the storefront views.

use std::io;

use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use cafe::{
    checkout::PaymentInstructions,
    money::format_money,
    products::Product,
    sales::{DailySummary, SaleDate, SaleRecord},
    views::{CartPanel, InventoryRow, ProductCard, SaleRow},
};

fn finish(builder: Builder, money_column: usize) -> Table {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(money_column..=money_column), Alignment::right());

    table
}

/// Public catalog.
pub(crate) fn write_catalog(
    out: &mut (impl io::Write + ?Sized),
    products: &[&Product],
) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products available.");
    }

    let mut builder = Builder::default();

    builder.push_record(["Id", "Product", "Category", "Price", "Image"]);

    for card in products.iter().copied().map(ProductCard::from) {
        builder.push_record([
            card.id.to_string(),
            card.name,
            card.category,
            card.price,
            card.image,
        ]);
    }

    writeln!(out, "{}", finish(builder, 3))
}

/// Cart panel with the total and badge count.
pub(crate) fn write_cart(
    out: &mut (impl io::Write + ?Sized),
    cart: &CartPanel,
) -> io::Result<()> {
    if !cart.can_checkout {
        return writeln!(out, "Your cart is empty.");
    }

    let mut builder = Builder::default();

    builder.push_record(["Product", "Qty", "Subtotal"]);

    for line in &cart.lines {
        builder.push_record([
            line.name.clone(),
            line.quantity.to_string(),
            line.line_total.clone(),
        ]);
    }

    builder.push_record([String::from("Total"), cart.badge.to_string(), cart.total.clone()]);

    writeln!(out, "{}", finish(builder, 2))
}

/// What to pay and where.
pub(crate) fn write_payment_instructions(
    out: &mut (impl io::Write + ?Sized),
    cart: &CartPanel,
    instructions: &PaymentInstructions,
) -> io::Result<()> {
    writeln!(out, "Transfer {} to the alias: {}", cart.total, instructions.alias)?;
    writeln!(out, "Confirm once the transfer is done.")
}

/// Admin inventory table.
pub(crate) fn write_inventory(
    out: &mut (impl io::Write + ?Sized),
    products: &[Product],
) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "The catalog is empty.");
    }

    let mut builder = Builder::default();

    builder.push_record(["Id", "Product", "Category", "Image", "Price", "Stock", "Action"]);

    for row in products.iter().map(InventoryRow::from) {
        builder.push_record([
            row.id.to_string(),
            row.name,
            row.category,
            row.image,
            row.price,
            row.stock.to_string(),
            row.toggle.to_string(),
        ]);
    }

    writeln!(out, "{}", finish(builder, 4))
}

/// Sales listing, newest first.
pub(crate) fn write_sales(
    out: &mut (impl io::Write + ?Sized),
    records: &[SaleRecord],
) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "No sales recorded.");
    }

    let mut builder = Builder::default();

    builder.push_record(["Products", "Quantities", "Total", "Date"]);

    for row in records.iter().map(SaleRow::from) {
        builder.push_record([
            row.products.join("\n"),
            row.quantities
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
            row.total,
            row.date,
        ]);
    }

    writeln!(out, "{}", finish(builder, 2))
}

/// Totals for one day.
pub(crate) fn write_summary(
    out: &mut (impl io::Write + ?Sized),
    summary: &DailySummary,
) -> io::Result<()> {
    writeln!(
        out,
        "{}: {} sales, {} units, {}",
        SaleDate::from_date(summary.date),
        summary.sales,
        summary.units,
        format_money(&summary.revenue)
    )?;

    for product in &summary.products {
        writeln!(out, "  {:>4}  {}", product.units, product.name)?;
    }

    Ok(())
}
